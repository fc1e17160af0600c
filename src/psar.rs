use std::{
    fmt::Display,
    hash::{Hash, Hasher},
};

use crate::{Indicator, IndicatorConfig, IndicatorConfigBuilder, IndicatorOutput, Ohlcv, Price};

/// Configuration for the Parabolic SAR ([`Psar`]) indicator.
///
/// The acceleration factor starts at `acceleration`, grows by the same
/// amount every time the trend makes a new extreme, and is capped at
/// `max_acceleration`.
///
/// # Example
///
/// ```
/// use quantedge_batch::{IndicatorConfig, IndicatorConfigBuilder, PsarConfig};
///
/// let config = PsarConfig::builder()
///     .acceleration(0.01)
///     .max_acceleration(0.1)
///     .build();
///
/// assert_eq!(config.acceleration(), 0.01);
/// assert_eq!(PsarConfig::default().max_acceleration(), 0.2);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct PsarConfig {
    acceleration: f64,
    max_acceleration: f64,
}

impl IndicatorConfig for PsarConfig {
    type Builder = PsarConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        PsarConfigBuilder::new()
    }
}

impl PsarConfig {
    /// Initial acceleration factor, also the increment per new extreme.
    #[inline]
    #[must_use]
    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    /// Upper bound of the acceleration factor.
    #[inline]
    #[must_use]
    pub fn max_acceleration(&self) -> f64 {
        self.max_acceleration
    }
}

impl Default for PsarConfig {
    /// PSAR(0.02, 0.2), Wilder's original setting.
    fn default() -> Self {
        Self::builder().build()
    }
}

impl PartialEq for PsarConfig {
    fn eq(&self, other: &Self) -> bool {
        self.acceleration.to_bits() == other.acceleration.to_bits()
            && self.max_acceleration.to_bits() == other.max_acceleration.to_bits()
    }
}

impl Eq for PsarConfig {}

impl Hash for PsarConfig {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.acceleration.to_bits().hash(state);
        self.max_acceleration.to_bits().hash(state);
    }
}

impl Display for PsarConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PsarConfig({}, {})",
            self.acceleration, self.max_acceleration
        )
    }
}

/// Builder for [`PsarConfig`].
///
/// Defaults: `acceleration` = `0.02`, `max_acceleration` = `0.2`.
pub struct PsarConfigBuilder {
    acceleration: f64,
    max_acceleration: f64,
}

impl PsarConfigBuilder {
    fn new() -> Self {
        Self {
            acceleration: 0.02,
            max_acceleration: 0.2,
        }
    }

    #[inline]
    #[must_use]
    pub fn acceleration(mut self, acceleration: f64) -> Self {
        self.acceleration = acceleration;
        self
    }

    #[inline]
    #[must_use]
    pub fn max_acceleration(mut self, max_acceleration: f64) -> Self {
        self.max_acceleration = max_acceleration;
        self
    }
}

impl IndicatorConfigBuilder<PsarConfig> for PsarConfigBuilder {
    fn build(self) -> PsarConfig {
        assert!(
            self.acceleration.is_finite() && self.acceleration > 0.0,
            "acceleration must be positive and finite"
        );
        assert!(
            self.max_acceleration.is_finite() && self.max_acceleration > 0.0,
            "max_acceleration must be positive and finite"
        );
        assert!(
            self.acceleration <= self.max_acceleration,
            "acceleration must not exceed max_acceleration"
        );

        PsarConfig {
            acceleration: self.acceleration,
            max_acceleration: self.max_acceleration,
        }
    }
}

/// Direction the SAR is trailing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trend {
    /// SAR trails below price, extreme point is the highest high.
    Bullish,
    /// SAR trails above price, extreme point is the lowest low.
    Bearish,
}

impl Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Parabolic SAR output for one bar.
///
/// Carries the SAR itself and the state it was computed with. The first two
/// bars are seeds: their SAR is the bar's close and they belong to neither
/// the bullish nor the bearish series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PsarValue {
    sar: Price,
    trend: Trend,
    acceleration: f64,
    extreme_point: Price,
    seed: bool,
}

impl PsarValue {
    /// Stop-and-reverse level.
    #[inline]
    #[must_use]
    pub fn sar(&self) -> Price {
        self.sar
    }

    #[inline]
    #[must_use]
    pub fn trend(&self) -> Trend {
        self.trend
    }

    /// Acceleration factor after this bar.
    #[inline]
    #[must_use]
    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    /// Most favourable price since the last reversal.
    #[inline]
    #[must_use]
    pub fn extreme_point(&self) -> Price {
        self.extreme_point
    }

    /// `true` for the two leading bars, whose SAR is a placeholder close.
    #[inline]
    #[must_use]
    pub fn is_seed(&self) -> bool {
        self.seed
    }

    /// SAR when this bar is in an uptrend, `None` otherwise or on seeds.
    #[inline]
    #[must_use]
    pub fn bullish(&self) -> Option<Price> {
        (!self.seed && self.trend == Trend::Bullish).then_some(self.sar)
    }

    /// SAR when this bar is in a downtrend, `None` otherwise or on seeds.
    #[inline]
    #[must_use]
    pub fn bearish(&self) -> Option<Price> {
        (!self.seed && self.trend == Trend::Bearish).then_some(self.sar)
    }
}

impl Display for PsarValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PSAR({}, {}, af: {}, ep: {})",
            self.sar, self.trend, self.acceleration, self.extreme_point
        )
    }
}

impl IndicatorOutput for PsarValue {
    #[inline]
    fn cell(&self, column: usize) -> Option<Price> {
        match column {
            0 => Some(self.sar),
            1 => self.bullish(),
            2 => self.bearish(),
            _ => None,
        }
    }
}

/// State carried from one bar to the next.
#[derive(Debug, Clone, Copy)]
struct SarState {
    trend: Trend,
    acceleration: f64,
    extreme_point: Price,
    sar: Price,
}

impl SarState {
    fn seed(first: &impl Ohlcv, acceleration: f64) -> Self {
        Self {
            trend: Trend::Bullish,
            acceleration,
            extreme_point: first.high(),
            sar: first.close(),
        }
    }

    /// Advances over `bar`, given the two bars before it. Returns `true`
    /// when the trend reversed.
    fn advance<B: Ohlcv>(&mut self, config: &PsarConfig, bar: &B, prev: &B, prev2: &B) -> bool {
        let mut sar = self
            .acceleration
            .mul_add(self.extreme_point - self.sar, self.sar);

        let reversed = match self.trend {
            Trend::Bullish if bar.low() < sar => {
                self.trend = Trend::Bearish;
                sar = self.extreme_point;
                self.extreme_point = bar.low();
                true
            }
            Trend::Bearish if bar.high() > sar => {
                self.trend = Trend::Bullish;
                sar = self.extreme_point;
                self.extreme_point = bar.high();
                true
            }
            _ => false,
        };

        if reversed {
            self.acceleration = config.acceleration;
        } else {
            match self.trend {
                Trend::Bullish => {
                    if bar.high() > self.extreme_point {
                        self.extreme_point = bar.high();
                        self.accelerate(config);
                    }
                    // SAR may not rise into the two previous lows
                    sar = sar.min(prev.low()).min(prev2.low());
                }
                Trend::Bearish => {
                    if bar.low() < self.extreme_point {
                        self.extreme_point = bar.low();
                        self.accelerate(config);
                    }
                    // SAR may not fall into the two previous highs
                    sar = sar.max(prev.high()).max(prev2.high());
                }
            }
        }

        self.sar = sar;
        reversed
    }

    #[inline]
    fn accelerate(&mut self, config: &PsarConfig) {
        self.acceleration = (self.acceleration + config.acceleration).min(config.max_acceleration);
    }

    fn value(&self, seed: bool) -> PsarValue {
        PsarValue {
            sar: self.sar,
            trend: self.trend,
            acceleration: self.acceleration,
            extreme_point: self.extreme_point,
            seed,
        }
    }
}

/// Parabolic Stop and Reverse (PSAR).
///
/// A trend-following stop that trails price and accelerates towards the
/// trend's extreme point:
///
/// ```text
/// sar = prev_sar + af × (ep − prev_sar)
/// ```
///
/// When price crosses the SAR the trend reverses: the SAR jumps to the old
/// extreme point, the extreme point restarts at the crossing bar and the
/// acceleration factor resets. Without a reversal, a new extreme raises the
/// acceleration factor (capped at the configured maximum) and the SAR is
/// kept clear of the two previous bars' lows (uptrend) or highs (downtrend).
///
/// The first two bars have no SAR of their own; their output is the bar's
/// close, used as the seed. The trend starts bullish with the first bar's
/// high as extreme point. Every row is defined, there is no warm-up gap.
///
/// The recurrence is strictly sequential and runs as a single forward pass.
///
/// # Example
///
/// ```
/// use quantedge_batch::{Bar, Psar, PsarConfig, Trend};
///
/// let bars = [
///     Bar::new(9.5, 10.0, 9.0, 9.5).at(1),
///     Bar::new(10.5, 11.0, 10.0, 10.5).at(2),
///     Bar::new(11.5, 12.0, 11.0, 11.5).at(3),
/// ];
///
/// let series = Psar::new(PsarConfig::default()).compute(&bars).unwrap();
///
/// assert_eq!(series.get(0).unwrap().sar(), 9.5);
/// // Clamped to the lowest of the two previous lows
/// assert_eq!(series.get(2).unwrap().sar(), 9.0);
/// assert_eq!(series.get(2).unwrap().trend(), Trend::Bullish);
/// ```
#[derive(Clone, Debug)]
pub struct Psar {
    config: PsarConfig,
}

impl Indicator for Psar {
    type Config = PsarConfig;
    type Output = PsarValue;

    const COLUMNS: &'static [&'static str] = &["psar", "psar_bull", "psar_bear"];

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn evaluate<B: Ohlcv>(&self, bars: &[B]) -> Vec<Option<Self::Output>> {
        let mut values = Vec::with_capacity(bars.len());
        let Some(first) = bars.first() else {
            return values;
        };

        let mut state = SarState::seed(first, self.config.acceleration);

        for (index, bar) in bars.iter().enumerate() {
            if index < 2 {
                state.sar = bar.close();
                values.push(Some(state.value(true)));
                continue;
            }

            if state.advance(&self.config, bar, &bars[index - 1], &bars[index - 2]) {
                tracing::trace!(index, trend = %state.trend, sar = state.sar, "psar reversal");
            }
            values.push(Some(state.value(false)));
        }

        values
    }
}

impl Display for Psar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PSAR({}, {})",
            self.config.acceleration, self.config.max_acceleration
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{assert_approx, hlc};

    fn psar() -> Psar {
        Psar::new(PsarConfig::default())
    }

    /// Rally, a collapse that flips bearish, then a spike that flips back.
    fn swing() -> Vec<crate::Bar> {
        hlc(&[
            (10.0, 9.0, 9.5),
            (11.0, 10.0, 10.5),
            (12.0, 11.0, 11.5),
            (13.0, 12.0, 12.5),
            (9.0, 8.0, 8.5),
            (8.0, 7.0, 7.5),
            (14.0, 12.0, 13.5),
        ])
    }

    fn run(bars: &[crate::Bar]) -> Vec<PsarValue> {
        psar().evaluate(bars).into_iter().map(Option::unwrap).collect()
    }

    mod seeding {
        use super::*;

        #[test]
        fn empty_input_is_empty_output() {
            assert!(psar().evaluate(&hlc(&[])).is_empty());
        }

        #[test]
        fn first_two_rows_are_closes() {
            let out = run(&swing());
            assert_approx!(out[0].sar(), 9.5);
            assert_approx!(out[1].sar(), 10.5);
            assert!(out[0].is_seed() && out[1].is_seed());
            assert!(!out[2].is_seed());
        }

        #[test]
        fn seeds_have_no_trend_series() {
            let out = run(&swing());
            assert_eq!(out[0].bullish(), None);
            assert_eq!(out[0].bearish(), None);
            assert_eq!(out[1].cell(1), None);
            assert_eq!(out[1].cell(0), Some(out[1].sar()));
        }

        #[test]
        fn starts_bullish_at_first_high() {
            let out = run(&swing());
            assert_eq!(out[0].trend(), Trend::Bullish);
            assert_approx!(out[0].extreme_point(), 10.0);
            assert_approx!(out[0].acceleration(), 0.02);
        }

        #[test]
        fn early_reversal_jumps_to_first_high() {
            // sar = 10 + 0.02 × (12 − 10) = 10.04 > low 9.9, reverses onto the first high
            let out = run(&hlc(&[(12.0, 8.0, 10.0), (11.0, 9.5, 10.0), (11.0, 9.9, 10.5)]));
            assert_eq!(out[2].trend(), Trend::Bearish);
            assert_approx!(out[2].sar(), 12.0);
            assert_approx!(out[2].extreme_point(), 9.9);
        }
    }

    mod recurrence {
        use super::*;

        #[test]
        fn follows_hand_computed_path() {
            // i=2: 10.5 + 0.02·(10 − 10.5) = 10.49, new high → ep 12, af 0.04,
            //      clamped to min(low[1], low[0]) = 9
            // i=3: 9 + 0.04·(12 − 9) = 9.12, ep 13, af 0.06
            // i=4: 9.12 + 0.06·(13 − 9.12) = 9.3528 > low 8 → bearish at ep 13
            // i=5: 13 + 0.02·(8 − 13) = 12.9, ep 7, af 0.04, clamped to high[3] = 13
            // i=6: 13 + 0.04·(7 − 13) = 12.76 < high 14 → bullish at ep 7
            let out = run(&swing());
            let expected = [9.5, 10.5, 9.0, 9.12, 13.0, 13.0, 7.0];
            for (v, e) in out.iter().zip(expected) {
                assert_approx!(v.sar(), e);
            }
        }

        #[test]
        fn trend_flips_on_crossing() {
            let trends: Vec<_> = run(&swing()).iter().map(PsarValue::trend).collect();
            assert_eq!(
                trends,
                vec![
                    Trend::Bullish,
                    Trend::Bullish,
                    Trend::Bullish,
                    Trend::Bullish,
                    Trend::Bearish,
                    Trend::Bearish,
                    Trend::Bullish,
                ]
            );
        }

        #[test]
        fn acceleration_grows_and_resets() {
            let out = run(&swing());
            let expected = [0.02, 0.02, 0.04, 0.06, 0.02, 0.04, 0.02];
            for (v, e) in out.iter().zip(expected) {
                assert_approx!(v.acceleration(), e);
            }
        }

        #[test]
        fn extreme_point_restarts_on_reversal() {
            let out = run(&swing());
            assert_approx!(out[4].extreme_point(), 8.0);
            assert_approx!(out[5].extreme_point(), 7.0);
            assert_approx!(out[6].extreme_point(), 14.0);
        }

        #[test]
        fn acceleration_capped_at_max() {
            // Every bar makes a new high: af would reach 0.02 · 19 without the cap
            let rows: Vec<_> = (0..20)
                .map(|i| {
                    let base = f64::from(i);
                    (base + 1.0, base, base + 0.5)
                })
                .collect();
            let out = run(&hlc(&rows));
            assert!(out.iter().all(|v| v.acceleration() <= 0.2 + 1e-12));
            assert_approx!(out[19].acceleration(), 0.2);
        }
    }

    mod trend_series {
        use super::*;

        #[test]
        fn splits_sar_by_trend() {
            let out = run(&swing());
            assert_eq!(out[3].bullish(), Some(out[3].sar()));
            assert_eq!(out[3].bearish(), None);
            assert_eq!(out[4].bearish(), Some(out[4].sar()));
            assert_eq!(out[4].bullish(), None);
            assert_eq!(out[4].cell(2), Some(out[4].sar()));
        }
    }

    mod config {
        use super::*;

        #[test]
        fn default_is_wilder_setting() {
            let config = PsarConfig::default();
            assert_approx!(config.acceleration(), 0.02);
            assert_approx!(config.max_acceleration(), 0.2);
        }

        #[test]
        #[should_panic(expected = "acceleration must not exceed max_acceleration")]
        fn rejects_initial_above_max() {
            let _ = PsarConfig::builder()
                .acceleration(0.3)
                .max_acceleration(0.2)
                .build();
        }

        #[test]
        #[should_panic(expected = "acceleration must be positive and finite")]
        fn rejects_zero_acceleration() {
            let _ = PsarConfig::builder().acceleration(0.0).build();
        }

        #[test]
        #[should_panic(expected = "max_acceleration must be positive and finite")]
        fn rejects_nan_max() {
            let _ = PsarConfig::builder().max_acceleration(f64::NAN).build();
        }

        #[test]
        fn equal_configs_hash_alike() {
            use std::collections::HashSet;

            let mut set = HashSet::new();
            set.insert(PsarConfig::default());
            assert!(set.contains(&PsarConfig::builder().build()));
            assert!(!set.contains(&PsarConfig::builder().acceleration(0.01).build()));
        }
    }

    mod display {
        use super::*;

        #[test]
        fn psar_formats_correctly() {
            assert_eq!(psar().to_string(), "PSAR(0.02, 0.2)");
        }

        #[test]
        fn config_formats_correctly() {
            assert_eq!(PsarConfig::default().to_string(), "PsarConfig(0.02, 0.2)");
        }
    }
}
