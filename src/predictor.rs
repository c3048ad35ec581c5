//! Implementations of the components of an L-GEHL branch predictor.

pub mod table;
pub mod counter;
pub mod pht;
pub mod gehl;
pub mod loops;
pub mod selector;
pub mod lgehl;

pub use table::*;
pub use counter::*;
pub use pht::*;
pub use gehl::*;
pub use loops::*;
pub use selector::*;
pub use lgehl::*;

use crate::branch::BranchRecord;
use crate::Outcome;

/// Interface to a predictor driven by a simulator: each branch is
/// predicted, and then updated with the correct outcome.
pub trait BranchPredictor {
    fn name(&self) -> &'static str;

    /// Return the predicted outcome for some branch.
    fn predict(&mut self, record: &BranchRecord) -> Outcome;

    /// Update the internal state of the predictor with the correct outcome.
    fn update(&mut self, record: &BranchRecord, outcome: Outcome);
}
