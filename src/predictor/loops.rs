//! Implementation of a loop predictor.
//!
//! A loop predictor learns the trip count of branches which close loops
//! with a constant number of iterations, and predicts the exit of the loop
//! once the count has been confirmed a few times.
//!
//! See the following:
//!  - "A 256 Kbits L-TAGE branch predictor" (Seznec, 2007).

pub mod config;
pub mod replace;
pub mod rng;
pub mod table;

pub use config::*;
pub use replace::*;
pub use rng::*;
pub use table::*;

use tracing::debug;

use crate::history::*;
use crate::Outcome;
use crate::predictor::*;

/// The location of an entry matching some branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopHit {
    /// The way which matched
    pub way: usize,

    /// The slot in the [`LoopTable`]
    pub slot: usize,
}

/// Container for output from [`LoopPredictor::predict`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopPrediction {
    /// The matching entry (if any)
    pub hit: Option<LoopHit>,

    /// Whether or not this prediction should be trusted
    pub valid: bool,

    /// Predicted direction (only meaningful when there was a hit)
    pub outcome: Outcome,

    /// Hash of the branch address
    pub hash: LoopHash,
}

/// Container for [`LoopPredictor`] runtime stats.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Number of updates
    pub clk: usize,

    /// Number of updates with a matching entry
    pub hits: usize,

    /// Number of updates where the prediction was valid
    pub valid: usize,

    /// Number of valid predictions which were wrong
    pub valid_miss: usize,

    /// Number of allocated entries
    pub allocs: usize,

    /// Number of allocation requests which did not allocate an entry
    pub failed_allocs: usize,

    /// Number of entries freed after a wrong valid prediction
    pub frees: usize,
}

/// The loop predictor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoopPredictor {
    /// The configuration used to create this object
    pub cfg: LoopConfig,

    pub table: LoopTable,

    /// Source of pseudo-random values for replacement
    pub rng: LoopRng,

    pub stat: LoopStats,
}

impl LoopPredictor {
    /// Look up the branch at 'pc'.
    pub fn predict(&self, pc: u32) -> LoopPrediction {
        let hash = self.table.hash(pc);
        match self.table.probe(&hash) {
            Some((way, slot)) => {
                let entry = self.table.get_entry(slot);
                LoopPrediction {
                    hit: Some(LoopHit { way, slot }),
                    valid: entry.is_valid(),
                    outcome: entry.predict(),
                    hash,
                }
            },
            None => LoopPrediction { hash, ..Default::default() },
        }
    }

    /// Update the predictor with the resolved outcome.
    ///
    /// - 'base' is the direction predicted by the main predictor
    /// - 'allocate' requests a new entry when there was no hit
    /// - 'hist' is the history used to stir the pseudo-random source
    pub fn update(&mut self,
        prediction: &LoopPrediction,
        outcome: Outcome,
        base: Outcome,
        allocate: bool,
        hist: &HistoryRegisters,
    )
    {
        self.stat.clk += 1;
        self.rng.observe(hist);

        let hit = match prediction.hit {
            Some(hit) => hit,
            None => {
                if allocate {
                    self.allocate(&prediction.hash, outcome);
                }
                return;
            },
        };

        self.stat.hits += 1;
        let iter_mask = self.cfg.iter_mask();
        let entry = self.table.get_entry_mut(hit.slot);

        if prediction.valid {
            self.stat.valid += 1;
            if prediction.outcome != outcome {
                // The learned count is wrong
                entry.free();
                self.stat.valid_miss += 1;
                self.stat.frees += 1;
                debug!(slot = hit.slot, tag = entry.tag, "freed loop entry");
                return;
            }
            if prediction.outcome != base || (self.rng.next_u32() & 7) == 0 {
                entry.age.inc();
            }
        }

        entry.cur_iter = (entry.cur_iter + 1) & iter_mask;
        if entry.cur_iter > entry.past_iter {
            entry.forget();
        }

        if outcome != entry.dir {
            if entry.cur_iter == entry.past_iter {
                entry.confidence.inc();
                // Too short to be worth predicting
                if entry.past_iter < 3 {
                    entry.dir = outcome;
                    entry.past_iter = 0;
                    entry.age.set(0);
                    entry.confidence.set(0);
                }
            } else if entry.past_iter == 0 {
                entry.past_iter = entry.cur_iter;
                entry.confidence.set(0);
            } else {
                entry.forget();
            }
            entry.cur_iter = 0;
        }
    }

    fn allocate(&mut self, hash: &LoopHash, outcome: Outcome) {
        let res = self.cfg.replace_strat.replace(&mut self.table, hash,
            outcome, self.cfg.alloc_age, &mut self.rng);
        match res {
            Some(slot) => {
                self.stat.allocs += 1;
                debug!(slot, tag = hash.tag, "allocated loop entry");
            },
            None => self.stat.failed_allocs += 1,
        }
    }

    /// Get the [approximate] number of storage bits.
    pub fn storage_bits(&self) -> usize {
        self.cfg.storage_bits()
    }
}
