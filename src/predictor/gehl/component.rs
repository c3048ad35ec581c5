
use crate::Outcome;
use crate::history::*;
use crate::predictor::*;

/// Container for inputs passed to a [`GEHLComponent`].
#[derive(Clone, Copy, Debug)]
pub struct GEHLInputs<'a> {
    /// Program counter associated with a predicted branch
    pub pc: u32,

    /// Global and path history
    pub hist: &'a HistoryRegisters,
}

/// A single GEHL component: a table of counters indexed with a fixed
/// length of global/path history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GEHLComponent {
    pub cfg: GEHLComponentConfig,

    /// Table of saturating counters
    pub pht: PatternTable,
}
impl GEHLComponent {
    /// The contribution of the counter at 'idx' to the prediction sum.
    pub fn contribution(&self, idx: usize, summation: Summation) -> f64 {
        let val = self.pht.get_entry(idx).value() as f64;
        match summation {
            Summation::Normalized => val / self.cfg.counter_bits as f64,
            Summation::Raw { .. } => val,
        }
    }

    /// Move the counter at 'idx' toward the provided outcome.
    pub fn update(&mut self, idx: usize, outcome: Outcome) {
        self.pht.update(idx, outcome);
    }
}

impl PredictorTable for GEHLComponent {
    type Input<'a> = GEHLInputs<'a>;
    type Index = usize;
    type Entry = SaturatingCounter;

    fn size(&self) -> usize { self.cfg.size() }

    fn get_index(&self, input: GEHLInputs) -> usize {
        gehl_index(input.pc, input.hist, self.cfg.history_len,
            self.cfg.index_bits)
    }

    fn get_entry(&self, idx: usize) -> &SaturatingCounter {
        self.pht.get_entry(idx)
    }

    fn get_entry_mut(&mut self, idx: usize) -> &mut SaturatingCounter {
        self.pht.get_entry_mut(idx)
    }
}
