//! Batch technical analysis indicators for Rust.
//!
//! Indicators run once over a complete, already loaded sequence of bars
//! (any type implementing [`Ohlcv`]) and return one typed row per bar in a
//! [`Series`]. Rows are `None` until enough history has been seen.
//!
//! Each indicator type ([`Bb`], [`Psar`], [`Kc`], [`Rsi`]) exposes
//! [`new`](Bb::new) and [`compute`](Bb::compute) as inherent methods, no
//! trait import needed. Import [`Indicator`] only for generic code.
//!
//! For tabular data, [`Frame`] holds a timestamp index plus named columns
//! and appends indicator output by timestamp, with column names configured
//! through [`ColumnLabels`].

mod bb;
mod ema;
mod error;
mod frame;
mod indicator;
mod kc;
mod multiplier;
mod ohlcv;
mod price_source;
mod psar;
mod rolling_window;
mod rsi;
mod series;
mod validate;

pub use crate::error::{Error, Result};
pub use crate::frame::{ColumnLabels, Frame};
pub use crate::indicator::{Indicator, IndicatorConfig, IndicatorConfigBuilder, IndicatorOutput};
pub use crate::multiplier::Multiplier;
pub use crate::ohlcv::{Bar, Ohlcv, Price, Timestamp};
pub use crate::price_source::PriceSource;
pub use crate::series::Series;

pub use crate::bb::{Bb, BbConfig, BbConfigBuilder, BbValue};
pub use crate::kc::{Kc, KcConfig, KcConfigBuilder, KcValue};
pub use crate::psar::{Psar, PsarConfig, PsarConfigBuilder, PsarValue, Trend};
pub use crate::rsi::{Rsi, RsiConfig, RsiConfigBuilder};

macro_rules! impl_indicator_methods {
    ($type:ty, $config:ty, $output:ty) => {
        impl $type {
            /// See [`Indicator::new`].
            #[must_use]
            pub fn new(config: $config) -> Self {
                <Self as Indicator>::new(config)
            }

            /// See [`Indicator::compute`].
            ///
            /// # Errors
            ///
            /// Fails when bar timestamps are not strictly ascending.
            #[inline]
            pub fn compute(&self, bars: &[impl Ohlcv]) -> Result<Series<$output>> {
                <Self as Indicator>::compute(self, bars)
            }

            /// See [`Indicator::config`].
            #[must_use]
            #[inline]
            pub fn config(&self) -> &$config {
                <Self as Indicator>::config(self)
            }
        }
    };
}

impl_indicator_methods!(Bb, BbConfig, BbValue);
impl_indicator_methods!(Psar, PsarConfig, PsarValue);
impl_indicator_methods!(Kc, KcConfig, KcValue);
impl_indicator_methods!(Rsi, RsiConfig, Price);

#[cfg(test)]
mod test_util;
