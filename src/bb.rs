use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, IndicatorOutput, Multiplier, Ohlcv, Price,
    PriceSource,
};

/// Configuration for the Bollinger Bands ([`Bb`]) indicator.
///
/// # Warm-up
///
/// Bands are undefined for the first `length − 1` bars. Once the window is
/// full, values are exact: there is no seed to decay.
///
/// # Example
///
/// ```
/// use quantedge_batch::{BbConfig, IndicatorConfig, IndicatorConfigBuilder};
/// use std::num::NonZero;
///
/// // Default: close, 2.0 std devs
/// let config = BbConfig::builder()
///     .length(NonZero::new(20).unwrap())
///     .build();
///
/// assert_eq!(config.length(), 20);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct BbConfig {
    length: usize,
    source: PriceSource,
    std_dev: Multiplier,
}

impl IndicatorConfig for BbConfig {
    type Builder = BbConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        BbConfigBuilder::new()
    }
}

impl BbConfig {
    /// Window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Price source the bands are computed on.
    #[inline]
    #[must_use]
    pub fn source(&self) -> PriceSource {
        self.source
    }

    /// Standard deviation multiplier for the upper and lower bands.
    #[inline]
    #[must_use]
    pub fn std_dev(&self) -> Multiplier {
        self.std_dev
    }

    /// BB(20, Close, 2σ), the standard Bollinger Bands setting.
    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn default_20() -> Self {
        Self::builder().length(NonZero::new(20).unwrap()).build()
    }

    /// BB with custom length, close price, 2σ.
    ///
    /// # Panics
    ///
    /// Panics if `length` is 1: the sample standard deviation needs at
    /// least two bars.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Default for BbConfig {
    fn default() -> Self {
        Self::default_20()
    }
}

impl Display for BbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BbConfig({}, {}, {})",
            self.length,
            self.source,
            self.std_dev.value()
        )
    }
}

/// Builder for [`BbConfig`].
///
/// Defaults: source = [`PriceSource::Close`], `std_dev` = `2.0`.
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct BbConfigBuilder {
    length: Option<usize>,
    source: PriceSource,
    std_dev: Multiplier,
}

impl BbConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
            std_dev: Multiplier::default(),
        }
    }

    /// Sets the window length. Must be at least 2.
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
    pub fn std_dev(mut self, std_dev: Multiplier) -> Self {
        self.std_dev = std_dev;
        self
    }
}

impl IndicatorConfigBuilder<BbConfig> for BbConfigBuilder {
    #[inline]
    fn build(self) -> BbConfig {
        let length = self.length.expect("length is required");
        assert!(length >= 2, "length must be at least 2");

        BbConfig {
            length,
            source: self.source,
            std_dev: self.std_dev,
        }
    }
}

/// Bollinger Bands output for one bar.
///
/// The middle band is the simple mean of the window. Upper and lower bands
/// are offset by `k × σ`, where `σ` is the **sample** standard deviation
/// (divisor `length − 1`) of the window.
///
/// ```text
/// upper  = mean + k × σ
/// middle = mean
/// lower  = mean − k × σ
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BbValue {
    upper: Price,
    middle: Price,
    lower: Price,
    std_dev: Price,
}

impl BbValue {
    /// Upper band: `mean + k × σ`.
    #[inline]
    #[must_use]
    pub fn upper(&self) -> Price {
        self.upper
    }

    /// Middle band: mean of the window.
    #[inline]
    #[must_use]
    pub fn middle(&self) -> Price {
        self.middle
    }

    /// Lower band: `mean − k × σ`.
    #[inline]
    #[must_use]
    pub fn lower(&self) -> Price {
        self.lower
    }

    /// Sample standard deviation of the window, before the multiplier.
    #[inline]
    #[must_use]
    pub fn std_dev(&self) -> Price {
        self.std_dev
    }

    /// Band width: `upper − lower`.
    ///
    /// Narrow width indicates consolidation (Bollinger squeeze); wide width
    /// indicates high volatility.
    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

impl Display for BbValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BB(u: {}, m: {}, l: {})",
            self.upper, self.middle, self.lower
        )
    }
}

impl IndicatorOutput for BbValue {
    #[inline]
    fn cell(&self, column: usize) -> Option<Price> {
        match column {
            0 => Some(self.upper),
            1 => Some(self.lower),
            _ => None,
        }
    }
}

/// Bollinger Bands (BB).
///
/// A volatility indicator: a rolling mean with upper and lower bands offset
/// by a configurable number of sample standard deviations.
///
/// Each row is computed from its own trailing window, so no rounding error
/// carries over between rows. Rounding that would push the variance below
/// zero is clamped.
///
/// # Example
///
/// ```
/// use quantedge_batch::{Bar, Bb, BbConfig};
/// use std::num::NonZero;
///
/// let bars: Vec<Bar> = [1.0, 2.0, 3.0, 4.0, 5.0]
///     .iter()
///     .zip(1..)
///     .map(|(&c, t)| Bar::new(c, c, c, c).at(t))
///     .collect();
///
/// let bb = Bb::new(BbConfig::close(NonZero::new(3).unwrap()));
/// let series = bb.compute(&bars).unwrap();
///
/// // Window [1, 2, 3]: mean 2, sample σ 1
/// let value = series.get(2).unwrap();
/// assert_eq!(value.upper(), 4.0);
/// assert_eq!(value.lower(), 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct Bb {
    config: BbConfig,
    length: f64,
    degrees_of_freedom: f64,
    std_dev_multiplier: f64,
}

impl Indicator for Bb {
    type Config = BbConfig;
    type Output = BbValue;

    const COLUMNS: &'static [&'static str] = &["upper_BL_band", "lower_BL_band"];

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            #[allow(clippy::cast_precision_loss)]
            length: config.length as f64,
            #[allow(clippy::cast_precision_loss)]
            degrees_of_freedom: (config.length - 1) as f64,
            std_dev_multiplier: config.std_dev.value(),
        }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn evaluate<B: Ohlcv>(&self, bars: &[B]) -> Vec<Option<Self::Output>> {
        let prices: Vec<Price> = self.config.source.prices(bars).collect();
        let warm_up = self.config.length - 1;

        (0..prices.len())
            .map(|index| {
                let start = index.checked_sub(warm_up)?;
                Some(self.bands(&prices[start..=index]))
            })
            .collect()
    }
}

impl Bb {
    /// Bands of one full window.
    ///
    /// Moments are taken about the window's first price, so a flat window
    /// yields exactly zero deviation at any price level.
    fn bands(&self, window: &[Price]) -> BbValue {
        let pivot = window[0];
        let (sum, sum_of_squares) = window.iter().fold((0.0, 0.0), |(sum, squares), &price| {
            let deviation = price - pivot;
            (sum + deviation, deviation.mul_add(deviation, squares))
        });

        // Sample variance = (Σd² − n·mean_d²) / (n − 1), with n·mean_d² = Σd·mean_d
        let shift = sum / self.length;
        let variance = sum.mul_add(-shift, sum_of_squares) / self.degrees_of_freedom;
        let std_dev = variance.max(0.0).sqrt();
        let offset = std_dev * self.std_dev_multiplier;
        let mean = pivot + shift;

        BbValue {
            upper: mean + offset,
            middle: mean,
            lower: mean - offset,
            std_dev,
        }
    }
}

impl Display for Bb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BB({}, {}, {})",
            self.config.length, self.config.source, self.std_dev_multiplier,
        )
    }
}
