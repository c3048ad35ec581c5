
use crate::branch::*;
use crate::Outcome;
use crate::predictor::*;

/// Wraps an [`LGEHLPredictor`] behind the [`BranchPredictor`] interface,
/// holding the output of the last call to `predict` until the matching
/// call to `update`.
#[derive(Clone, Debug)]
pub struct LGEHLSession {
    pub predictor: LGEHLPredictor,
    pending: Option<LGEHLPrediction>,
}
impl LGEHLSession {
    pub fn new(predictor: LGEHLPredictor) -> Self {
        Self { predictor, pending: None }
    }

    /// Returns 'true' if a prediction is waiting for an update.
    pub fn is_pending(&self) -> bool { self.pending.is_some() }
}

impl BranchPredictor for LGEHLSession {
    fn name(&self) -> &'static str { "L-GEHL" }

    fn predict(&mut self, record: &BranchRecord) -> Outcome {
        let pred = self.predictor.predict(record);
        if record.is_conditional() {
            self.pending = Some(pred);
        }
        pred.outcome
    }

    fn update(&mut self, record: &BranchRecord, outcome: Outcome) {
        if !record.is_conditional() {
            self.predictor.update_transfer(record);
            return;
        }
        match self.pending.take() {
            Some(pred) => self.predictor.update(record, pred, outcome),
            // Nothing to train with
            None => self.predictor.record_outcome(record, outcome),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn matches_explicit_interface() {
        let mut a = LGEHLSession::new(LGEHLConfig::default().build().unwrap());
        let mut b = LGEHLConfig::default().build().unwrap();
        for i in 0..1000u32 {
            let rec = BranchRecord::conditional(0x0040_0000 + (i % 7) * 8);
            let outcome = Outcome::from_bool(i % 5 != 0);
            let pa = a.predict(&rec);
            assert!(a.is_pending());
            let pb = b.predict(&rec);
            assert_eq!(pa, pb.outcome);
            a.update(&rec, outcome);
            assert!(!a.is_pending());
            b.update(&rec, pb, outcome);
        }
        assert_eq!(a.predictor, b);
    }

    #[test]
    fn update_without_prediction_only_advances_history() {
        let mut s = LGEHLSession::new(LGEHLConfig::default().build().unwrap());
        let gehl = s.predictor.gehl.clone();
        let rec = BranchRecord::conditional(0x0040_0001);
        s.update(&rec, Outcome::T);
        s.update(&rec, Outcome::N);
        assert_eq!(s.predictor.gehl, gehl);
        assert_eq!(s.predictor.history().ghist.low_bits_u64(2), 0b10);
        assert_eq!(s.predictor.history().phist.low_bits_u64(2), 0b11);
        assert_eq!(s.predictor.stats().clk, 0);
    }

    #[test]
    fn unconditional_predictions_are_not_kept() {
        let mut s = LGEHLSession::new(LGEHLConfig::default().build().unwrap());
        let ret = BranchRecord::new(0x0040_0010, BranchKind::Return);
        assert_eq!(s.predict(&ret), Outcome::N);
        assert!(!s.is_pending());
        s.update(&ret, Outcome::T);
        assert_eq!(s.predictor.stats().transfers, 1);
        assert_eq!(s.name(), "L-GEHL");
    }
}
