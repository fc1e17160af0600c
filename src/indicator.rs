use crate::{Ohlcv, Price, Result, Series, validate::ensure_ascending};

use std::{
    fmt::{Debug, Display},
    hash::Hash,
};

/// Configuration for a technical [`Indicator`].
///
/// Every indicator has a corresponding config type that holds its parameters
/// (window length, acceleration factors, price source, etc). Configs are
/// value types: cheap to copy, compare, and hash.
pub trait IndicatorConfig: Sized + Copy + PartialEq + Eq + Hash + Display + Debug {
    /// Builder type for constructing this config.
    type Builder: IndicatorConfigBuilder<Self>;

    /// Returns a new builder with default values.
    fn builder() -> Self::Builder;
}

/// Builder for an [`IndicatorConfig`].
///
/// Parameter setters are inherent methods on each builder, since the
/// indicators don't share a parameter set.
pub trait IndicatorConfigBuilder<Config>
where
    Config: IndicatorConfig,
{
    /// Builds the config. Panics if parameters are missing or inconsistent.
    #[must_use]
    fn build(self) -> Config;
}

/// Per-row indicator value that can be spread over named table columns.
///
/// Column `i` corresponds to [`Indicator::COLUMNS`]`[i]`.
pub trait IndicatorOutput: Copy + Send + Sync + Display + Debug {
    /// Value of column `column`, or `None` when the column is undefined for
    /// this row.
    fn cell(&self, column: usize) -> Option<Price>;
}

impl IndicatorOutput for Price {
    #[inline]
    fn cell(&self, column: usize) -> Option<Price> {
        (column == 0).then_some(*self)
    }
}

/// A batch technical indicator.
///
/// Indicators are immutable values built from a config. Each call to
/// [`compute`](Indicator::compute) runs over a complete, already loaded
/// sequence of bars and returns one row per bar. Rows without enough
/// history are `None`.
///
/// # Example
///
/// ```
/// use quantedge_batch::{Bar, Bb, BbConfig, Indicator};
/// use std::num::NonZero;
///
/// let bars: Vec<Bar> = [1.0, 2.0, 3.0, 4.0]
///     .iter()
///     .zip(1..)
///     .map(|(&c, t)| Bar::new(c, c, c, c).at(t))
///     .collect();
///
/// let bb = Bb::new(BbConfig::close(NonZero::new(3).unwrap()));
/// let series = bb.compute(&bars).unwrap();
///
/// assert_eq!(series.len(), 4);
/// assert!(series.get(1).is_none());
/// assert!(series.get(2).is_some());
/// ```
pub trait Indicator: Sized + Clone + Display + Debug + Send + Sync {
    /// Configuration type for this indicator.
    type Config: IndicatorConfig;

    /// Computed output type. `f64` for single-line indicators, a struct for
    /// composite ones (e.g. Bollinger Bands).
    type Output: IndicatorOutput;

    /// Column names used when the output is appended to a
    /// [`Frame`](crate::Frame).
    const COLUMNS: &'static [&'static str];

    /// Creates a new indicator from the given config.
    fn new(config: Self::Config) -> Self;

    /// Config this indicator was built from.
    fn config(&self) -> &Self::Config;

    /// Runs the indicator over `bars` without validating them.
    ///
    /// Returns exactly `bars.len()` values. Prefer
    /// [`compute`](Indicator::compute), which checks timestamp ordering
    /// first.
    fn evaluate<B: Ohlcv>(&self, bars: &[B]) -> Vec<Option<Self::Output>>;

    /// Validates `bars` and runs the indicator over them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsortedTimestamps`](crate::Error::UnsortedTimestamps)
    /// or [`Error::DuplicateTimestamp`](crate::Error::DuplicateTimestamp) when
    /// bar timestamps are not strictly ascending.
    fn compute<B: Ohlcv>(&self, bars: &[B]) -> Result<Series<Self::Output>> {
        ensure_ascending(bars)?;

        let values = self.evaluate(bars);
        let timestamps = bars.iter().map(Ohlcv::open_time).collect();

        Ok(Series::new(timestamps, values))
    }
}
