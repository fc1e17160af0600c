// src/test_util.rs

use crate::{Bar, Timestamp};

use std::num::NonZero;

/// Asserts that two `f64` values are within `1e-9` of each other.
macro_rules! assert_approx {
    ($actual:expr, $expected:expr) => {{
        let (a, e): (f64, f64) = ($actual, $expected);
        assert!(
            (a - e).abs() < 1e-9,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use assert_approx;

pub fn nz(n: usize) -> NonZero<usize> {
    NonZero::new(n).unwrap()
}

/// Convenience: bar with just a close price and timestamp (OHLC all equal to close).
pub fn bar(close: f64, time: Timestamp) -> Bar {
    Bar::new(close, close, close, close).at(time)
}

/// Bars with the given closes at timestamps `1..`.
pub fn closes(prices: &[f64]) -> Vec<Bar> {
    prices
        .iter()
        .zip(1..)
        .map(|(&close, time)| bar(close, time))
        .collect()
}

/// Bars from `(high, low, close)` triples at timestamps `1..`, open = close.
pub fn hlc(rows: &[(f64, f64, f64)]) -> Vec<Bar> {
    rows.iter()
        .zip(1..)
        .map(|(&(high, low, close), time)| Bar::new(close, high, low, close).at(time))
        .collect()
}
