use crate::Timestamp;

/// Indicator output aligned to the input bars.
///
/// Holds exactly one entry per input bar, in input order, each tagged with
/// the bar's timestamp. Rows without enough history hold `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Series<T> {
    timestamps: Vec<Timestamp>,
    values: Vec<Option<T>>,
}

impl<T> Series<T> {
    pub(crate) fn new(timestamps: Vec<Timestamp>, values: Vec<Option<T>>) -> Self {
        debug_assert_eq!(
            timestamps.len(),
            values.len(),
            "series timestamps and values must align"
        );
        Self { timestamps, values }
    }

    /// Number of rows, always equal to the number of input bars.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Timestamps in row order.
    #[inline]
    #[must_use]
    pub fn timestamps(&self) -> &[Timestamp] {
        &self.timestamps
    }

    /// Values in row order.
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[Option<T>] {
        &self.values
    }

    /// Iterates `(timestamp, value)` pairs in row order.
    pub fn iter(&self) -> impl Iterator<Item = (Timestamp, Option<&T>)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().map(Option::as_ref))
    }

    /// Number of leading rows without a value.
    #[must_use]
    pub fn warm_up(&self) -> usize {
        self.values.iter().take_while(|v| v.is_none()).count()
    }
}

impl<T: Copy> Series<T> {
    /// Value at row `index`, `None` during warm-up or past the end.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        self.values.get(index).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> Series<f64> {
        Series::new(vec![10, 20, 30], vec![None, Some(1.5), Some(2.5)])
    }

    #[test]
    fn len_matches_rows() {
        assert_eq!(series().len(), 3);
        assert!(!series().is_empty());
    }

    #[test]
    fn get_returns_value_or_none() {
        let s = series();
        assert_eq!(s.get(0), None);
        assert_eq!(s.get(1), Some(1.5));
        assert_eq!(s.get(3), None);
    }

    #[test]
    fn iter_pairs_timestamps_with_values() {
        let pairs: Vec<_> = series().iter().map(|(t, v)| (t, v.copied())).collect();
        assert_eq!(pairs, vec![(10, None), (20, Some(1.5)), (30, Some(2.5))]);
    }

    #[test]
    fn warm_up_counts_leading_none() {
        assert_eq!(series().warm_up(), 1);
    }
}
