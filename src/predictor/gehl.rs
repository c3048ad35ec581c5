//! Implementation of a "GEometric History Length" (GEHL) predictor.

pub mod component;
pub mod config;
pub mod index;
pub mod threshold;

pub use component::*;
pub use config::*;
pub use index::*;
pub use threshold::*;

use itertools::Itertools;
use tracing::debug;

use crate::history::*;
use crate::Outcome;
use crate::predictor::*;

/// Container for output from [`GEHLPredictor::predict`]: the predicted
/// outcome, plus everything needed to update the predictor afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GEHLPrediction {
    /// Predicted direction (the sign of the sum)
    pub outcome: Outcome,

    /// The sum of all component outputs
    pub sum: f64,

    /// Index used in each component
    indices: [usize; MAX_GEHL_COMPONENTS],

    /// Number of valid entries in 'indices'
    num_comp: usize,
}
impl GEHLPrediction {
    /// The index used in each component, in component order.
    pub fn indices(&self) -> &[usize] {
        &self.indices[..self.num_comp]
    }

    /// The magnitude of the sum.
    pub fn confidence(&self) -> f64 {
        self.sum.abs()
    }
}

/// Container for [`GEHLPredictor`] runtime stats.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GEHLStats {
    /// Number of updates
    pub clk: usize,

    /// Number of mispredictions
    pub miss: usize,

    /// Number of updates which trained the components
    pub trained: usize,

    /// Number of times the training threshold was raised
    pub threshold_raises: usize,

    /// Number of times the training threshold was lowered
    pub threshold_drops: usize,
}

/// The GEHL predictor.
///
/// Each component is a table of signed counters indexed with a different
/// (geometrically increasing) length of history. The prediction is the
/// sign of the sum of all selected counters.
///
/// See the following:
///  - "The O-GEHL branch predictor" (Seznec, 2004).
///  - "Analysis of the O-GEometric History Length branch predictor"
///  (Seznec, 2005).
#[derive(Clone, Debug, PartialEq)]
pub struct GEHLPredictor {
    /// The configuration used to create this object
    pub cfg: GEHLConfig,

    pub stat: GEHLStats,

    /// Components, sorted by increasing history length
    pub comp: Vec<GEHLComponent>,

    /// Controls when the components are trained
    pub threshold: ThresholdController,
}

impl GEHLPredictor {
    /// Compute the index into every component.
    pub fn get_indices(&self, pc: u32, hist: &HistoryRegisters)
        -> ([usize; MAX_GEHL_COMPONENTS], usize)
    {
        let input = GEHLInputs { pc, hist };
        let mut indices = [0; MAX_GEHL_COMPONENTS];
        for (slot, comp) in indices.iter_mut().zip(self.comp.iter()) {
            *slot = comp.get_index(input);
        }
        (indices, self.comp.len())
    }

    /// Sum the outputs of all components at the given indices.
    pub fn get_sum(&self, indices: &[usize]) -> f64 {
        let summation = self.cfg.summation;
        let bias = match summation {
            Summation::Normalized => 0.0,
            Summation::Raw { bias } => bias as f64,
        };
        self.comp.iter().zip_eq(indices.iter())
            .fold(bias, |sum, (comp, idx)| {
                sum + comp.contribution(*idx, summation)
            })
    }

    /// Make a prediction for the branch at 'pc'.
    pub fn predict(&self, pc: u32, hist: &HistoryRegisters) -> GEHLPrediction {
        let (indices, num_comp) = self.get_indices(pc, hist);
        let sum = self.get_sum(&indices[..num_comp]);
        GEHLPrediction {
            outcome: Outcome::from_bool(sum >= 0.0),
            sum,
            indices,
            num_comp,
        }
    }

    /// Given a particular prediction and the resolved outcome, update the
    /// state of the predictor.
    pub fn update(&mut self, prediction: &GEHLPrediction, outcome: Outcome) {
        let mispredicted = prediction.outcome != outcome;
        let magnitude = prediction.confidence();

        // Only train when we were wrong, or when we were right but not
        // confident enough.
        if self.threshold.should_train(mispredicted, magnitude) {
            let indices = prediction.indices();
            for (comp, idx) in self.comp.iter_mut().zip_eq(indices.iter()) {
                comp.update(*idx, outcome);
            }
            self.stat.trained += 1;
        }

        match self.threshold.adapt(mispredicted, magnitude) {
            ThresholdChange::Raised => {
                self.stat.threshold_raises += 1;
                debug!(threshold = self.threshold.threshold(),
                    "raised GEHL training threshold");
            },
            ThresholdChange::Lowered => {
                self.stat.threshold_drops += 1;
                debug!(threshold = self.threshold.threshold(),
                    "lowered GEHL training threshold");
            },
            ThresholdChange::Unchanged => {},
        }

        if mispredicted {
            self.stat.miss += 1;
        }
        self.stat.clk += 1;
    }
}
