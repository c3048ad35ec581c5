//! A GEHL predictor combined with a loop predictor ("L-GEHL").

pub mod config;
pub mod session;

pub use config::*;
pub use session::*;

use tracing::trace;

use crate::branch::*;
use crate::error::ConfigError;
use crate::history::*;
use crate::Outcome;
use crate::predictor::*;

/// Container for output from [`LGEHLPredictor::predict`].
///
/// This must be passed back to [`LGEHLPredictor::update`] along with the
/// resolved outcome of the same branch.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LGEHLPrediction {
    /// The final predicted direction
    pub outcome: Outcome,

    /// Output from the GEHL predictor
    pub gehl: GEHLPrediction,

    /// Output from the loop predictor
    pub lp: LoopPrediction,

    /// Whether the final direction was taken from the loop predictor
    pub used_loop: bool,
}

/// Container for [`LGEHLPredictor`] runtime stats.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LGEHLStats {
    /// Number of conditional branches resolved
    pub clk: usize,

    /// Number of unconditional transfers recorded in history
    pub transfers: usize,

    /// Number of mispredictions from the GEHL predictor
    pub base_miss: usize,

    /// Number of mispredictions from the combined predictor
    pub final_miss: usize,

    /// Number of predictions taken from the loop predictor
    pub loop_overrides: usize,

    /// Number of loop predictions which corrected the GEHL predictor
    pub loop_corrections: usize,
}

/// A [`GEHLPredictor`] and [`LoopPredictor`] sharing one set of history
/// registers, with a [`MetaSelector`] deciding between them.
#[derive(Clone, Debug, PartialEq)]
pub struct LGEHLPredictor {
    /// The configuration used to create this object
    pub cfg: LGEHLConfig,

    pub stat: LGEHLStats,

    pub gehl: GEHLPredictor,
    pub loops: LoopPredictor,
    pub selector: MetaSelector,

    hist: HistoryRegisters,
}

impl LGEHLPredictor {
    pub fn new(cfg: LGEHLConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let hist = HistoryRegisters::new(
            cfg.gehl.ghist_bits(), cfg.gehl.phist_bits
        );
        Ok(Self {
            gehl: cfg.gehl.clone().build()?,
            loops: cfg.loops.build()?,
            selector: MetaSelector::new(cfg.withloop_bits),
            stat: LGEHLStats::default(),
            hist,
            cfg,
        })
    }

    /// Make a prediction for some branch.
    ///
    /// Only conditional branches are predicted; anything else gets a
    /// default (not-taken) prediction.
    pub fn predict(&self, record: &BranchRecord) -> LGEHLPrediction {
        if !record.is_conditional() {
            return LGEHLPrediction::default();
        }
        let gehl = self.gehl.predict(record.pc, &self.hist);
        let lp = self.loops.predict(record.pc);
        let used_loop = self.selector.use_loop(&lp);
        let outcome = self.selector.choose(&lp, gehl.outcome);
        trace!(pc = record.pc, sum = gehl.sum, base = ?gehl.outcome,
            loop_valid = lp.valid, used_loop, ?outcome, "predict");
        LGEHLPrediction { outcome, gehl, lp, used_loop }
    }

    /// Update the predictor with the resolved outcome of a branch.
    ///
    /// For conditional branches, 'prediction' must be the value returned
    /// by [`LGEHLPredictor::predict`] for this branch. Unconditional
    /// transfers ignore it and only advance history.
    pub fn update(&mut self, record: &BranchRecord,
        prediction: LGEHLPrediction, outcome: Outcome)
    {
        if !record.is_conditional() {
            self.update_transfer(record);
            return;
        }

        let base = prediction.gehl.outcome;
        let mispredicted = prediction.outcome != outcome;

        self.gehl.update(&prediction.gehl, outcome);
        self.loops.update(&prediction.lp, outcome, base, mispredicted,
            &self.hist);
        self.selector.update(&prediction.lp, base, outcome);

        self.stat.clk += 1;
        if base != outcome {
            self.stat.base_miss += 1;
        }
        if mispredicted {
            self.stat.final_miss += 1;
        }
        if prediction.used_loop {
            self.stat.loop_overrides += 1;
            if base != outcome && !mispredicted {
                self.stat.loop_corrections += 1;
            }
        }

        self.hist.record_transfer(outcome.is_taken(), record.path_bit());
    }

    /// Record an unconditional transfer in history. Calls, returns, and
    /// indirect branches are recorded as 'taken'; anything else is ignored.
    pub fn update_transfer(&mut self, record: &BranchRecord) {
        if record.advances_history() {
            self.hist.record_transfer(true, record.path_bit());
            self.stat.transfers += 1;
        }
    }

    /// Record the outcome of a branch in history without training.
    pub fn record_outcome(&mut self, record: &BranchRecord, outcome: Outcome) {
        if record.is_conditional() {
            self.hist.record_transfer(outcome.is_taken(), record.path_bit());
        } else {
            self.update_transfer(record);
        }
    }

    /// The current GEHL training threshold.
    pub fn threshold(&self) -> usize { self.gehl.threshold.threshold() }

    /// The current value of the threshold adaptation counter.
    pub fn threshold_counter(&self) -> i16 { self.gehl.threshold.counter() }

    /// The current value of the meta-selector counter.
    pub fn withloop(&self) -> i16 { self.selector.value() }

    pub fn history(&self) -> &HistoryRegisters { &self.hist }

    pub fn stats(&self) -> &LGEHLStats { &self.stat }

    /// Get the [approximate] number of storage bits.
    pub fn storage_bits(&self) -> usize { self.cfg.storage_bits() }
}
