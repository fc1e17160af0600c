use std::hash::{Hash, Hasher};

/// Band width multiplier.
///
/// Wraps a positive, non-NaN `f64`. Scales the standard deviation in
/// Bollinger Bands and the ATR in Keltner Channels. Defaults to `2.0`, the
/// classic setting for both.
///
/// Implements `Eq` and `Hash` via bit-level comparison, which is safe because
/// NaN is rejected at construction.
#[derive(Clone, Copy, Debug)]
pub struct Multiplier(f64);

impl Multiplier {
    /// Creates a new multiplier.
    ///
    /// # Panics
    ///
    /// Panics if `value` is zero, negative, or NaN.
    #[must_use]
    pub fn new(value: f64) -> Self {
        assert!(!value.is_nan(), "multiplier must not be NaN");
        assert!(value > 0.0, "multiplier must be positive");
        Self(value)
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Multiplier {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Multiplier {}

impl Hash for Multiplier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self(2.0)
    }
}
