//! Allocation and aging of [`LoopTable`] entries after a miss.

use crate::Outcome;
use crate::predictor::*;

/// A function used to allocate a new entry for a missed branch.
///
/// Receives the table, the hash of the branch, the resolved outcome, the
/// age given to new entries, and a pseudo-random source. Returns the slot
/// of the allocated entry, or [None] if nothing was allocated.
pub type ReplacementFn =
    fn(&mut LoopTable, &LoopHash, Outcome, u8, &mut LoopRng) -> Option<usize>;

/// A user-provided strategy for replacing entries in a [`LoopTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplacementStrategy {
    /// See [`single_probe`].
    SingleProbe,

    /// See [`exhaustive_probe`].
    ExhaustiveProbe,

    Custom(ReplacementFn),
}
impl ReplacementStrategy {
    pub fn replace(&self,
        table: &mut LoopTable,
        hash: &LoopHash,
        outcome: Outcome,
        alloc_age: u8,
        rng: &mut LoopRng,
    ) -> Option<usize>
    {
        let func: ReplacementFn = match self {
            Self::SingleProbe => single_probe,
            Self::ExhaustiveProbe => exhaustive_probe,
            Self::Custom(func) => *func,
        };
        (func)(table, hash, outcome, alloc_age, rng)
    }
}

/// Install a new loop in the entry at 'slot'.
///
/// Mispredictions tend to happen on the last iteration, so the loop
/// direction is assumed to be the opposite of the outcome.
fn install(table: &mut LoopTable, slot: usize, hash: &LoopHash,
    outcome: Outcome, alloc_age: u8)
{
    table.get_entry_mut(slot).install(hash.tag, !outcome, alloc_age);
}

/// Visit ways starting from a random one. Each visited entry is either
/// allocated (when its age is zero) or aged. Returns after the first
/// allocation, or after visiting 'limit' ways.
fn probe_ways(table: &mut LoopTable, hash: &LoopHash, outcome: Outcome,
    alloc_age: u8, rng: &mut LoopRng, limit: usize) -> Option<usize>
{
    let start = (rng.next_u32() as usize) & (LOOP_WAYS - 1);
    if rng.next_u32() & 3 != 0 {
        return None;
    }
    for i in 0..limit {
        let way = (start + i) & (LOOP_WAYS - 1);
        let slot = table.slot(hash, way);
        if table.get_entry(slot).is_replaceable() {
            install(table, slot, hash, outcome, alloc_age);
            return Some(slot);
        }
        table.get_entry_mut(slot).age.dec();
    }
    None
}

/// With 1-in-4 probability, visit exactly one randomly-chosen way: allocate
/// it if its age is zero, otherwise decrement its age.
pub fn single_probe(table: &mut LoopTable, hash: &LoopHash, outcome: Outcome,
    alloc_age: u8, rng: &mut LoopRng) -> Option<usize>
{
    probe_ways(table, hash, outcome, alloc_age, rng, 1)
}

/// Like [`single_probe`], but keep visiting ways (aging each one) until an
/// entry is allocated or all ways have been visited.
pub fn exhaustive_probe(table: &mut LoopTable, hash: &LoopHash,
    outcome: Outcome, alloc_age: u8, rng: &mut LoopRng) -> Option<usize>
{
    probe_ways(table, hash, outcome, alloc_age, rng, LOOP_WAYS)
}
