use crate::{Ohlcv, Price};

use std::fmt::{Debug, Display};

/// Price extracted from each [`Ohlcv`] bar before it enters a recurrence.
///
/// Bollinger Bands, RSI and the Keltner centre line run on
/// [`Close`](PriceSource::Close) by default, matching the classic
/// definitions. Other sources let the same math run on derived prices.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
pub enum PriceSource {
    /// Opening price.
    Open,
    /// Highest price.
    High,
    /// Closing price.
    #[default]
    Close,
    /// Lowest price.
    Low,
    /// Median price: `(high + low) / 2`.
    HL2,
    /// Typical price: `(high + low + close) / 3`.
    HLC3,
    /// Average price: `(open + high + low + close) / 4`.
    OHLC4,
    /// Weighted close: `(high + low + close + close) / 4`.
    HLCC4,
    /// True range: `max(high - low, |high - prev_close|, |low - prev_close|)`.
    ///
    /// On the first bar (no previous close), falls back to `high - low`.
    TrueRange,
}

impl Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl PriceSource {
    /// Price of bar `index`, looking back at `index - 1` when the source
    /// needs the previous close.
    #[inline]
    pub(crate) fn at<B: Ohlcv>(self, bars: &[B], index: usize) -> Price {
        let bar = &bars[index];

        match self {
            Self::Open => bar.open(),
            Self::High => bar.high(),
            Self::Close => bar.close(),
            Self::Low => bar.low(),
            Self::HL2 => f64::midpoint(bar.high(), bar.low()),
            Self::HLC3 => (bar.high() + bar.low() + bar.close()) / 3.0,
            Self::OHLC4 => (bar.open() + bar.high() + bar.low() + bar.close()) / 4.0,
            Self::HLCC4 => (bar.high() + bar.low() + bar.close() + bar.close()) / 4.0,
            Self::TrueRange => {
                let hl = bar.high() - bar.low();

                match index.checked_sub(1).map(|prev| bars[prev].close()) {
                    Some(prev_close) => {
                        let hc = (bar.high() - prev_close).abs();
                        let lc = (bar.low() - prev_close).abs();
                        hl.max(hc).max(lc)
                    }
                    None => hl,
                }
            }
        }
    }

    /// Extracted price of every bar, in order.
    pub(crate) fn prices<B: Ohlcv>(self, bars: &[B]) -> impl Iterator<Item = Price> + '_ {
        (0..bars.len()).map(move |index| self.at(bars, index))
    }
}
