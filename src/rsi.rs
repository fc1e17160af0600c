use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource,
    rolling_window::RollingWindow,
};

/// Configuration for the Relative Strength Index ([`Rsi`])
/// indicator.
///
/// Gains and losses are averaged over a simple trailing window of `length`
/// price changes. The first bar has no change, so output begins at bar
/// `length` (zero-based).
///
/// # Example
///
/// ```
/// use quantedge_batch::RsiConfig;
/// use std::num::NonZero;
///
/// let config = RsiConfig::close(NonZero::new(14).unwrap());
/// assert_eq!(config.length(), 14);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct RsiConfig {
    length: usize,
    source: PriceSource,
}

impl IndicatorConfig for RsiConfig {
    type Builder = RsiConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        RsiConfigBuilder::new()
    }
}

impl RsiConfig {
    /// Number of price changes averaged.
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    #[inline]
    #[must_use]
    pub fn source(&self) -> PriceSource {
        self.source
    }

    /// RSI(14) on closing price.
    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn default_14() -> Self {
        Self::builder().length(NonZero::new(14).unwrap()).build()
    }

    /// RSI on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Default for RsiConfig {
    fn default() -> Self {
        Self::default_14()
    }
}

impl Display for RsiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RsiConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`RsiConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct RsiConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
}

impl RsiConfigBuilder {
    #[must_use]
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
        }
    }

    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length = Some(length.get());
        self
    }

    #[inline]
    #[must_use]
    pub fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }
}

impl IndicatorConfigBuilder<RsiConfig> for RsiConfigBuilder {
    #[inline]
    fn build(self) -> RsiConfig {
        let length = self.length.expect("length is required");

        RsiConfig {
            length,
            source: self.source,
        }
    }
}

/// Relative Strength Index (RSI) over simple rolling averages.
///
/// Measures the balance of recent gains and losses on a 0–100 scale. Values
/// above 70 are conventionally considered overbought; below 30, oversold.
///
/// Each bar's change is split into `gain = max(change, 0)` and
/// `loss = max(−change, 0)`. Both are averaged over the trailing `length`
/// changes:
///
/// ```text
/// RSI = 100 − 100 / (1 + avg_gain / avg_loss)
///     = 100 × avg_gain / (avg_gain + avg_loss)
/// ```
///
/// # Flat and one-sided windows
///
/// * no losses in the window, some gains: `100`;
/// * no gains, some losses: `0`;
/// * no movement at all: `None`, since there is no direction to measure.
///
/// A window whose losses are all exactly zero always averages to exactly
/// zero, so a rising window saturates at `100` rather than drifting below.
///
/// # Example
///
/// ```
/// use quantedge_batch::{Bar, Rsi, RsiConfig};
/// use std::num::NonZero;
///
/// let bars: Vec<Bar> = [1.0, 1.1, 1.05, 1.2]
///     .iter()
///     .zip(1..)
///     .map(|(&c, t)| Bar::new(c, c, c, c).at(t))
///     .collect();
///
/// let series = Rsi::new(RsiConfig::close(NonZero::new(2).unwrap()))
///     .compute(&bars)
///     .unwrap();
///
/// // gains [0.1, 0, 0.15], losses [0, 0.05, 0]
/// // bar 3: avg_gain 0.075, avg_loss 0.025 → RSI 75
/// assert!(series.get(1).is_none());
/// assert!((series.get(3).unwrap() - 75.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug)]
pub struct Rsi {
    config: RsiConfig,
}

impl Indicator for Rsi {
    type Config = RsiConfig;
    type Output = Price;

    const COLUMNS: &'static [&'static str] = &["RSI"];

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn evaluate<B: Ohlcv>(&self, bars: &[B]) -> Vec<Option<Self::Output>> {
        let mut gains = RollingWindow::new(self.config.length);
        let mut losses = RollingWindow::new(self.config.length);
        let mut previous = None;

        self.config
            .source
            .prices(bars)
            .map(|price| {
                let change = price - previous.replace(price)?;

                let (gain, loss) = Self::gain_and_loss(change);
                gains.push(gain);
                losses.push(loss);

                Self::rsi_from_sums(gains.sum()?, losses.sum()?)
            })
            .collect()
    }
}

impl Rsi {
    #[inline]
    fn gain_and_loss(change: Price) -> (Price, Price) {
        (change.max(0.0), (-change).max(0.0))
    }

    /// Window sums share the divisor, so the ratio needs no averaging.
    #[inline]
    fn rsi_from_sums(gain: f64, loss: f64) -> Option<f64> {
        let (gain, loss) = (gain.max(0.0), loss.max(0.0));

        match (gain == 0.0, loss == 0.0) {
            (true, true) => None,
            (false, true) => Some(100.0),
            (true, false) => Some(0.0),
            (false, false) => Some(100.0 * gain / (gain + loss)),
        }
    }
}

impl Display for Rsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RSI({}, {})", self.config.length, self.config.source)
    }
}
