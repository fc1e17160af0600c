use crate::{Error, Ohlcv, Result};

/// Checks that bar timestamps are strictly ascending.
pub(crate) fn ensure_ascending(bars: &[impl Ohlcv]) -> Result<()> {
    for (index, pair) in bars.windows(2).enumerate() {
        let (previous, current) = (pair[0].open_time(), pair[1].open_time());
        let index = index + 1;

        if current == previous {
            tracing::debug!(index, timestamp = current, "rejecting duplicate timestamp");
            return Err(Error::DuplicateTimestamp {
                index,
                timestamp: current,
            });
        }
        if current < previous {
            tracing::debug!(index, previous, current, "rejecting unsorted timestamps");
            return Err(Error::UnsortedTimestamps {
                index,
                previous,
                current,
            });
        }
    }

    Ok(())
}
