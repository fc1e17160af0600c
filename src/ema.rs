use crate::Price;

#[derive(Clone, Debug)]
enum Phase {
    Seeding { sum: Price, seen: usize },
    Active { previous: Price },
}

/// Seeded exponential smoothing recurrence.
///
/// The first `length` values are averaged with a simple mean, which becomes
/// the first output. After that each value is blended in with
/// `α = 2 / (length + 1)`:
///
/// ```text
/// ema = prev + (price − prev) × α
/// ```
///
/// Keltner Channels run one of these over close (the centre line) and one
/// over true range (ATR).
#[derive(Clone, Debug)]
pub(crate) struct Ema {
    length: usize,
    alpha: f64,
    length_reciprocal: f64,
    phase: Phase,
}

impl Ema {
    pub fn new(length: usize) -> Self {
        debug_assert!(length > 0, "EMA length must be positive");

        Self {
            length,
            #[allow(clippy::cast_precision_loss)]
            alpha: 2.0 / (length + 1) as f64,
            #[allow(clippy::cast_precision_loss)]
            length_reciprocal: 1.0 / length as f64,
            phase: Phase::Seeding { sum: 0.0, seen: 0 },
        }
    }

    /// Feeds the next value, returning the smoothed value once seeded.
    #[inline]
    pub fn push(&mut self, price: Price) -> Option<Price> {
        match &mut self.phase {
            Phase::Seeding { sum, seen } => {
                *sum += price;
                *seen += 1;

                if *seen < self.length {
                    return None;
                }

                let seed = *sum * self.length_reciprocal;
                self.phase = Phase::Active { previous: seed };
                Some(seed)
            }
            Phase::Active { previous } => {
                *previous = (price - *previous).mul_add(self.alpha, *previous);
                Some(*previous)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::assert_approx;

    fn run(length: usize, prices: &[f64]) -> Vec<Option<f64>> {
        let mut ema = Ema::new(length);
        prices.iter().map(|&p| ema.push(p)).collect()
    }

    mod seeding {
        use super::*;

        #[test]
        fn none_during_seeding() {
            assert_eq!(run(3, &[10.0, 20.0]), vec![None, None]);
        }

        #[test]
        fn first_value_is_sma_seed() {
            // SMA(3) = (2 + 4 + 6) / 3 = 4.0
            assert_eq!(run(3, &[2.0, 4.0, 6.0])[2], Some(4.0));
        }

        #[test]
        fn length_one_seeds_immediately() {
            assert_eq!(run(1, &[7.0]), vec![Some(7.0)]);
        }
    }

    mod computation {
        use super::*;

        #[test]
        fn applies_formula_after_seed() {
            // α = 2/(3+1) = 0.5, seed 4 → 4 + (8 − 4) × 0.5 = 6
            let out = run(3, &[2.0, 4.0, 6.0, 8.0, 10.0]);
            assert_eq!(out[3], Some(6.0));
            // 6 + (10 − 6) × 0.5 = 8
            assert_eq!(out[4], Some(8.0));
        }

        #[test]
        fn ema_2_alpha_is_two_thirds() {
            // seed [3, 6] → 4.5; 4.5 + (9 − 4.5) × 2/3 = 7.5
            let out = run(2, &[3.0, 6.0, 9.0]);
            assert_approx!(out[2].unwrap(), 7.5);
        }

        #[test]
        fn constant_input_stays_constant() {
            let out = run(3, &[50.0; 20]);
            assert!(out[2..].iter().all(|v| *v == Some(50.0)));
        }
    }
}
