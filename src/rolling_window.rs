use crate::Price;

use std::collections::VecDeque;

/// Fixed-size trailing window over a price series.
///
/// Keeps a running sum updated by add/subtract on every push, so each step
/// is O(1). The sum is rebuilt from the window contents once every `size`
/// pushes, which bounds rounding drift to a single window's worth of
/// updates regardless of series length.
#[derive(Clone, Debug)]
pub(crate) struct RollingWindow {
    size: usize,
    window: VecDeque<Price>,
    sum: Price,
    /// Pushes since `sum` was last rebuilt.
    since_resum: usize,
    /// Members that are not exactly zero. When this drops to zero the sum
    /// is reported as an exact zero instead of leftover rounding residue.
    non_zero: usize,
}

impl RollingWindow {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            window: VecDeque::with_capacity(size),
            sum: 0.0,
            since_resum: 0,
            non_zero: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, price: Price) {
        if self.is_ready()
            && let Some(old) = self.window.pop_front()
        {
            self.sum -= old;
            if old != 0.0 {
                self.non_zero -= 1;
            }
        }

        self.window.push_back(price);
        self.sum += price;
        if price != 0.0 {
            self.non_zero += 1;
        }

        self.since_resum += 1;
        if self.since_resum >= self.size {
            self.sum = self.window.iter().sum();
            self.since_resum = 0;
        }
    }

    /// Sum of the window, `None` until it holds `size` values.
    #[inline]
    pub fn sum(&self) -> Option<Price> {
        self.is_ready()
            .then(|| if self.non_zero == 0 { 0.0 } else { self.sum })
    }

    #[inline]
    fn is_ready(&self) -> bool {
        self.window.len() == self.size
    }
}
