//! Implementations of a pattern history table (PHT).

use crate::Outcome;
use crate::predictor::*;
use crate::predictor::counter::*;

/// A table of [SaturatingCounter] indexed by some pre-computed hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternTable {
    /// Saturating counter configuration
    cfg: SaturatingCounterConfig,

    /// Table of counters
    data: Vec<SaturatingCounter>,

    /// Number of entries
    size: usize,
}
impl PatternTable {
    pub fn new(size: usize, cfg: SaturatingCounterConfig) -> Self {
        assert!(size.is_power_of_two());
        Self {
            cfg,
            data: vec![cfg.build(); size],
            size,
        }
    }

    /// Move the counter at 'idx' toward the provided outcome.
    pub fn update(&mut self, idx: usize, outcome: Outcome) {
        self.get_entry_mut(idx).update(outcome);
    }

    /// Get the [approximate] number of storage bits.
    pub fn storage_bits(&self) -> usize {
        self.cfg.storage_bits() * self.size
    }

    /// Reset every counter to its initial value.
    pub fn reset(&mut self) {
        for ctr in self.data.iter_mut() {
            ctr.reset();
        }
    }
}

impl PredictorTable for PatternTable {
    type Input<'a> = usize;
    type Index = usize;
    type Entry = SaturatingCounter;

    fn size(&self) -> usize { self.size }

    fn get_index(&self, hash: usize) -> usize {
        hash & self.index_mask()
    }

    fn get_entry(&self, idx: usize) -> &SaturatingCounter {
        let index = idx & self.index_mask();
        &self.data[index]
    }

    fn get_entry_mut(&mut self, idx: usize) -> &mut SaturatingCounter {
        let index = idx & self.index_mask();
        &mut self.data[index]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn entries_start_neutral() {
        let pht = PatternTable::new(16, SaturatingCounterConfig::signed(3));
        assert!((0..16).all(|i| pht.get_entry(i).value() == 0));
        assert_eq!(pht.storage_bits(), 48);
    }

    #[test]
    fn indices_wrap_into_range() {
        let mut pht = PatternTable::new(16, SaturatingCounterConfig::signed(4));
        assert_eq!(pht.get_index(0x1234_5673), 3);
        pht.update(0x13, Outcome::T);
        assert_eq!(pht.get_entry(3).value(), 1);

        for _ in 0..20 {
            pht.update(3, Outcome::N);
        }
        assert_eq!(pht.get_entry(3).value(), -8);
        pht.reset();
        assert_eq!(pht.get_entry(3).value(), 0);
    }
}
