/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead.
pub type Price = f64;

/// Bar open timestamp or sequence number.
///
/// Acts as the join key between input bars and indicator output. Must be
/// strictly ascending across a batch.
pub type Timestamp = u64;

/// OHLC bar data used as input to all indicators.
///
/// Implement this on your own kline/candle type to avoid conversion.
/// Indicators accept `&[impl Ohlcv]` and extract the prices they need
/// internally.
///
/// # Example
///
/// ```
/// use quantedge_batch::{Ohlcv, Price, Timestamp};
///
/// struct MyKline {
///     o: f64, h: f64, l: f64, c: f64,
///     ts: u64,
/// }
///
/// impl Ohlcv for MyKline {
///     fn open(&self) -> Price { self.o }
///     fn high(&self) -> Price { self.h }
///     fn low(&self) -> Price { self.l }
///     fn close(&self) -> Price { self.c }
///     fn open_time(&self) -> Timestamp { self.ts }
/// }
/// ```
pub trait Ohlcv {
    /// Opening price of the bar.
    fn open(&self) -> Price;

    /// Highest price during the bar.
    fn high(&self) -> Price;

    /// Lowest price during the bar.
    fn low(&self) -> Price;

    /// Closing price of the bar.
    fn close(&self) -> Price;

    /// Bar open timestamp or sequence number.
    ///
    /// Values must be strictly ascending within a batch, otherwise
    /// [`Indicator::compute`](crate::Indicator::compute) refuses the input.
    fn open_time(&self) -> Timestamp;
}

/// Plain OHLC bar.
///
/// Ready-made [`Ohlcv`] implementation for callers that don't have a
/// candle type of their own. Also what [`Frame::bars`](crate::Frame::bars)
/// produces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub open_time: Timestamp,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
}

impl Bar {
    #[must_use]
    pub fn new(open: Price, high: Price, low: Price, close: Price) -> Self {
        Self {
            open_time: 0,
            open,
            high,
            low,
            close,
        }
    }

    /// Sets the bar's open time.
    #[must_use]
    pub fn at(mut self, open_time: Timestamp) -> Self {
        self.open_time = open_time;
        self
    }
}

impl Ohlcv for Bar {
    fn open(&self) -> Price {
        self.open
    }
    fn high(&self) -> Price {
        self.high
    }
    fn low(&self) -> Price {
        self.low
    }
    fn close(&self) -> Price {
        self.close
    }
    fn open_time(&self) -> Timestamp {
        self.open_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_sets_open_time() {
        let bar = Bar::new(1.0, 2.0, 0.5, 1.5).at(42);
        assert_eq!(bar.open_time(), 42);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn accessors_return_fields() {
        let bar = Bar::new(1.0, 2.0, 0.5, 1.5);
        assert_eq!(bar.open(), 1.0);
        assert_eq!(bar.high(), 2.0);
        assert_eq!(bar.low(), 0.5);
        assert_eq!(bar.close(), 1.5);
    }
}
