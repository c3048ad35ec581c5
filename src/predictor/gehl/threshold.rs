//! Dynamic training threshold for the GEHL predictor.
//!
//! See "Analysis of the O-GEometric History Length branch predictor"
//! (Seznec, 2005) for the adaptive threshold scheme.

use crate::predictor::counter::*;

/// The result of adapting the threshold after an update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThresholdChange {
    Unchanged,
    Raised,
    Lowered,
}

/// Controls when the GEHL components are trained.
///
/// Counters are only trained on a misprediction, or when the magnitude of
/// the sum falls below the threshold. The threshold drifts with a slow
/// integral counter: mispredictions push it up, correct-but-unconfident
/// predictions push it down.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThresholdController {
    /// Current training threshold
    thresh: usize,

    /// Upper limit on the threshold (the number of components)
    max: usize,

    /// Threshold adaptation counter
    tc: SaturatingCounter,
}
impl ThresholdController {
    /// Create a controller whose threshold starts at its upper limit.
    pub fn new(max: usize, tc_bits: usize) -> Self {
        Self::with_threshold(max, max, tc_bits)
    }

    pub fn with_threshold(max: usize, thresh: usize, tc_bits: usize) -> Self {
        Self {
            thresh: thresh.min(max),
            max,
            tc: SaturatingCounterConfig::signed(tc_bits).build(),
        }
    }

    /// The current training threshold.
    pub fn threshold(&self) -> usize { self.thresh }

    /// The current value of the adaptation counter.
    pub fn counter(&self) -> i16 { self.tc.value() }

    fn below(&self, magnitude: f64) -> bool {
        magnitude < self.thresh as f64
    }

    /// Returns 'true' when the components should be trained.
    pub fn should_train(&self, mispredicted: bool, magnitude: f64) -> bool {
        mispredicted || self.below(magnitude)
    }

    /// Adapt the threshold after some prediction was resolved.
    pub fn adapt(&mut self, mispredicted: bool, magnitude: f64)
        -> ThresholdChange
    {
        if mispredicted {
            self.tc.inc();
            if self.tc.is_max() {
                self.tc.set(0);
                if self.thresh < self.max {
                    self.thresh += 1;
                    return ThresholdChange::Raised;
                }
            }
        } else if self.below(magnitude) {
            self.tc.dec();
            if self.tc.is_min() {
                self.tc.set(0);
                if self.thresh > 0 {
                    self.thresh -= 1;
                    return ThresholdChange::Lowered;
                }
            }
        }
        ThresholdChange::Unchanged
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn trains_on_miss_or_low_confidence() {
        let t = ThresholdController::new(8, 7);
        assert!(t.should_train(true, 100.0));
        assert!(t.should_train(false, 7.9));
        assert!(!t.should_train(false, 8.0));
    }

    #[test]
    fn sixty_three_misses_raise_by_one() {
        let mut t = ThresholdController::with_threshold(8, 5, 7);
        for _ in 0..62 {
            assert_eq!(t.adapt(true, 0.0), ThresholdChange::Unchanged);
        }
        assert_eq!(t.counter(), 62);
        assert_eq!(t.threshold(), 5);
        assert_eq!(t.adapt(true, 0.0), ThresholdChange::Raised);
        assert_eq!(t.threshold(), 6);
        assert_eq!(t.counter(), 0);
    }

    #[test]
    fn sixty_four_unconfident_hits_lower_by_one() {
        let mut t = ThresholdController::new(8, 7);
        for _ in 0..63 {
            t.adapt(false, 1.0);
        }
        assert_eq!(t.counter(), -63);
        assert_eq!(t.adapt(false, 1.0), ThresholdChange::Lowered);
        assert_eq!(t.threshold(), 7);
        assert_eq!(t.counter(), 0);

        // Confident hits leave the controller alone
        for _ in 0..200 {
            assert_eq!(t.adapt(false, 7.0), ThresholdChange::Unchanged);
        }
        assert_eq!(t.counter(), 0);
        assert_eq!(t.threshold(), 7);
    }

    #[test]
    fn threshold_is_capped_and_floored() {
        let mut t = ThresholdController::new(8, 7);
        for _ in 0..63 {
            t.adapt(true, 0.0);
        }
        assert_eq!(t.threshold(), 8);
        assert_eq!(t.counter(), 0);

        let mut t = ThresholdController::with_threshold(2, 1, 7);
        for _ in 0..64 {
            t.adapt(false, 0.0);
        }
        assert_eq!(t.threshold(), 0);
        for _ in 0..1000 {
            assert_eq!(t.adapt(false, 0.0), ThresholdChange::Unchanged);
        }
        assert_eq!(t.threshold(), 0);
    }
}
