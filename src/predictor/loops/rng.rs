
use crate::history::*;

/// A cheap, deterministic pseudo-random source used when allocating and
/// aging loop entries.
///
/// The seed is stirred with a counter and the current contents of path
/// and global history. Identical input sequences always produce identical
/// values. This is not suitable for anything other than replacement.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoopRng {
    seed: u32,
    phist: u32,
    ghist: u32,
}
impl LoopRng {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current state of history (mixed into every value drawn
    /// until the next call).
    pub fn observe(&mut self, hist: &HistoryRegisters) {
        self.phist = hist.phist.low_bits_u64(32) as u32;
        self.ghist = hist.ghist.low_bits_u64(32) as u32;
    }

    /// Draw the next value.
    pub fn next_u32(&mut self) -> u32 {
        self.seed = self.seed.wrapping_add(1);
        self.seed = self.seed.wrapping_add(self.phist);
        self.seed = self.seed.rotate_left(11);
        self.seed = self.seed.wrapping_add(self.ghist);
        self.seed
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sequence_is_reproducible() {
        let mut hist = HistoryRegisters::new(64, 16);
        let mut a = LoopRng::new();
        let mut b = LoopRng::new();
        for i in 0..100u32 {
            hist.record_transfer(i % 7 < 4, i % 3 == 0);
            a.observe(&hist);
            b.observe(&hist);
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn values_cover_low_bits() {
        let mut hist = HistoryRegisters::new(64, 16);
        let mut rng = LoopRng::new();
        let mut seen = [false; 4];
        for i in 0..64u32 {
            hist.record_transfer(i % 5 != 0, i & 1 == 1);
            rng.observe(&hist);
            seen[(rng.next_u32() & 3) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
