//! Chooses between the loop predictor and the GEHL predictor.

use crate::Outcome;
use crate::predictor::*;

/// A single global counter ('WITHLOOP') deciding whether valid predictions
/// from the [`LoopPredictor`] override the [`GEHLPredictor`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetaSelector {
    ctr: SaturatingCounter,
}
impl MetaSelector {
    /// Create a selector with a signed counter of 'bits' bits.
    pub fn new(bits: usize) -> Self {
        Self { ctr: SaturatingCounterConfig::signed(bits).build() }
    }

    /// Returns 'true' if the loop predictor should be used for this
    /// prediction.
    pub fn use_loop(&self, lp: &LoopPrediction) -> bool {
        lp.valid && self.ctr.value() >= 0
    }

    /// Select the final prediction.
    pub fn choose(&self, lp: &LoopPrediction, base: Outcome) -> Outcome {
        if self.use_loop(lp) { lp.outcome } else { base }
    }

    /// Train the selector when the loop predictor was valid and disagreed
    /// with the GEHL predictor.
    pub fn update(&mut self, lp: &LoopPrediction, base: Outcome,
        outcome: Outcome)
    {
        if lp.valid && lp.outcome != base {
            if lp.outcome == outcome {
                self.ctr.inc();
            } else {
                self.ctr.dec();
            }
        }
    }

    /// The current value of the counter.
    pub fn value(&self) -> i16 { self.ctr.value() }

    /// Get the [approximate] number of storage bits.
    pub fn storage_bits(&self) -> usize {
        SaturatingCounterConfig { lo: self.ctr.lo(), hi: self.ctr.hi(), init: 0 }
            .storage_bits()
    }
}
