use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, IndicatorOutput, Multiplier, Ohlcv, Price,
    PriceSource, ema::Ema,
};

/// Configuration for the Keltner Channels ([`Kc`]) indicator.
///
/// `length` drives both recurrences: the centre EMA runs over `length` bars,
/// the ATR over `length / 2` (rounded down). Length must be at least 2 so the
/// ATR period is non-zero.
///
/// # Example
///
/// ```
/// use quantedge_batch::{IndicatorConfig, IndicatorConfigBuilder, KcConfig};
/// use std::num::NonZero;
///
/// let config = KcConfig::builder()
///     .length(NonZero::new(20).unwrap())
///     .build();
///
/// assert_eq!(config.length(), 20);
/// assert_eq!(config.atr_length(), 10);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct KcConfig {
    length: usize,
    source: PriceSource,
    multiplier: Multiplier,
}

impl IndicatorConfig for KcConfig {
    type Builder = KcConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        KcConfigBuilder::new()
    }
}

impl KcConfig {
    /// Centre line EMA length.
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// ATR smoothing period: `length / 2`, rounded down.
    #[inline]
    #[must_use]
    pub fn atr_length(&self) -> usize {
        self.length / 2
    }

    /// Price source of the centre line.
    #[inline]
    #[must_use]
    pub fn source(&self) -> PriceSource {
        self.source
    }

    /// ATR multiplier for the outer channels.
    #[inline]
    #[must_use]
    pub fn multiplier(&self) -> Multiplier {
        self.multiplier
    }

    /// KC(20, Close, 2 × ATR(10)).
    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn default_20() -> Self {
        Self::builder().length(NonZero::new(20).unwrap()).build()
    }

    /// KC with custom length on close, 2 × ATR.
    ///
    /// # Panics
    ///
    /// Panics if `length` is 1.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Default for KcConfig {
    fn default() -> Self {
        Self::default_20()
    }
}

impl Display for KcConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "KcConfig({}, {}, {})",
            self.length,
            self.source,
            self.multiplier.value()
        )
    }
}

/// Builder for [`KcConfig`].
///
/// Defaults: source = [`PriceSource::Close`], multiplier = `2.0`.
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct KcConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
    multiplier: Multiplier,
}

impl KcConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
            multiplier: Multiplier::default(),
        }
    }

    /// Sets the centre line length. Must be at least 2.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length.get());
        self
    }

    #[inline]
    #[must_use]
    pub fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    #[must_use]
    pub fn multiplier(mut self, multiplier: Multiplier) -> Self {
        self.multiplier = multiplier;
        self
    }
}

impl IndicatorConfigBuilder<KcConfig> for KcConfigBuilder {
    #[inline]
    fn build(self) -> KcConfig {
        let length = self.length.expect("length is required");
        assert!(length >= 2, "length must be at least 2");

        KcConfig {
            length,
            source: self.source,
            multiplier: self.multiplier,
        }
    }
}

/// Keltner Channels output for one bar.
///
/// ```text
/// upper = basic + m × ATR
/// basic = EMA
/// lower = basic − m × ATR
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KcValue {
    upper: Price,
    basic: Price,
    lower: Price,
    atr: Price,
}

impl KcValue {
    #[inline]
    #[must_use]
    pub fn upper(&self) -> Price {
        self.upper
    }

    /// Centre line: EMA of the configured source.
    #[inline]
    #[must_use]
    pub fn basic(&self) -> Price {
        self.basic
    }

    #[inline]
    #[must_use]
    pub fn lower(&self) -> Price {
        self.lower
    }

    /// Average true range the channels were offset by.
    #[inline]
    #[must_use]
    pub fn atr(&self) -> Price {
        self.atr
    }
}

impl Display for KcValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "KC(u: {}, b: {}, l: {})",
            self.upper, self.basic, self.lower
        )
    }
}

impl IndicatorOutput for KcValue {
    #[inline]
    fn cell(&self, column: usize) -> Option<Price> {
        match column {
            0 => Some(self.basic),
            1 => Some(self.upper),
            2 => Some(self.lower),
            _ => None,
        }
    }
}

/// Keltner Channels (KC).
///
/// A volatility envelope around an exponential moving average. Two seeded
/// recurrences run side by side:
///
/// * ATR over true range with period `p = length / 2`: the first value (bar
///   `p − 1`) is the mean true range of bars `0..p`, then
///   `atr = prev + (tr − prev) × 2 / (p + 1)`;
/// * EMA over the source price with period `length`: the first value (bar
///   `length − 1`) is the window mean, then
///   `ema = prev + (price − prev) × 2 / (length + 1)`.
///
/// A row is defined once both are, i.e. from bar `length − 1`.
///
/// # Example
///
/// ```
/// use quantedge_batch::{Bar, Kc, KcConfig};
///
/// let bars: Vec<Bar> = (0..30)
///     .map(|i| {
///         let c = 100.0 + f64::from(i);
///         Bar::new(c, c + 1.0, c - 1.0, c).at(i as u64)
///     })
///     .collect();
///
/// let kc = Kc::new(KcConfig::default_20());
/// let series = kc.compute(&bars).unwrap();
///
/// assert_eq!(series.warm_up(), 19);
/// let value = series.get(29).unwrap();
/// assert!(value.lower() < value.basic() && value.basic() < value.upper());
/// ```
#[derive(Clone, Debug)]
pub struct Kc {
    config: KcConfig,
    multiplier: f64,
}

impl Indicator for Kc {
    type Config = KcConfig;
    type Output = KcValue;

    const COLUMNS: &'static [&'static str] = &[
        "basic_Keltner_channel",
        "upper_Keltner_channel",
        "lower_Keltner_channel",
    ];

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            multiplier: config.multiplier.value(),
        }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn evaluate<B: Ohlcv>(&self, bars: &[B]) -> Vec<Option<Self::Output>> {
        let mut average_true_range = Ema::new(self.config.atr_length());
        let mut centre = Ema::new(self.config.length);

        (0..bars.len())
            .map(|index| {
                // Both recurrences advance on every bar, defined or not.
                let atr = average_true_range.push(PriceSource::TrueRange.at(bars, index));
                let basic = centre.push(self.config.source.at(bars, index));
                let (basic, atr) = (basic?, atr?);
                let offset = atr * self.multiplier;

                Some(KcValue {
                    upper: basic + offset,
                    basic,
                    lower: basic - offset,
                    atr,
                })
            })
            .collect()
    }
}

impl Display for Kc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "KC({}, {}, {})",
            self.config.length, self.config.source, self.multiplier
        )
    }
}
