
use crate::Outcome;
use crate::predictor::*;

/// Number of ways probed for each branch.
pub const LOOP_WAYS: usize = 4;

/// An entry is trusted with partial confidence when
/// `confidence * past_iter` exceeds this value.
pub const LOOP_TRUST_PRODUCT: u32 = 128;

/// An entry in the [`LoopTable`], tracking the trip count of one loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopEntry {
    /// Tag associated with this entry
    pub tag: u16,

    /// Learned number of iterations (zero when untrained)
    pub past_iter: u16,

    /// Iterations observed since the last exit
    pub cur_iter: u16,

    /// Number of times the learned count was confirmed
    pub confidence: SaturatingCounter,

    /// Replacement counter; zero when the entry may be replaced
    pub age: SaturatingCounter,

    /// Direction of the loop body (the exit is the opposite direction)
    pub dir: Outcome,
}
impl LoopEntry {
    pub fn new(cfg: &LoopConfig) -> Self {
        Self {
            tag: 0,
            past_iter: 0,
            cur_iter: 0,
            confidence: cfg.confidence_ctr().build(),
            age: cfg.age_ctr().build(),
            dir: Outcome::N,
        }
    }

    /// Returns 'true' if no iteration count has been learned.
    pub fn is_untrained(&self) -> bool { self.past_iter == 0 }

    /// Returns 'true' if this entry may be replaced.
    pub fn is_replaceable(&self) -> bool { self.age.value() == 0 }

    /// Returns 'true' if predictions from this entry should be trusted.
    pub fn is_valid(&self) -> bool {
        let conf = self.confidence.value() as u32;
        self.confidence.is_max()
            || conf * self.past_iter as u32 > LOOP_TRUST_PRODUCT
    }

    /// The predicted direction: the opposite of the loop direction on the
    /// last known iteration.
    pub fn predict(&self) -> Outcome {
        if self.cur_iter as u32 + 1 == self.past_iter as u32 {
            !self.dir
        } else {
            self.dir
        }
    }

    /// Forget the learned iteration count.
    pub fn forget(&mut self) {
        self.past_iter = 0;
        self.confidence.set(0);
    }

    /// Free this entry (the tag and direction are kept).
    pub fn free(&mut self) {
        self.forget();
        self.age.set(0);
        self.cur_iter = 0;
    }

    /// Start tracking a new loop in this entry.
    pub fn install(&mut self, tag: u16, dir: Outcome, age: u8) {
        self.free();
        self.tag = tag;
        self.dir = dir;
        self.age.set(age as i16);
    }
}

/// The hashed view of a branch address used to probe a [`LoopTable`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopHash {
    /// Base index, aligned to a group of [`LOOP_WAYS`] entries
    pub li: usize,

    /// Bits used to skew the group selected by each way
    pub lib: usize,

    /// Tag
    pub tag: u16,
}

/// Container for inputs passed to a [`LoopTable`].
#[derive(Clone, Copy, Debug)]
pub struct LoopInputs {
    pub pc: u32,
    pub way: usize,
}

/// A small skewed-associative table of [`LoopEntry`].
///
/// Each way probes a different group of entries for the same address: way
/// 'w' uses slot `(LI ^ ((LIB >> w) << 2)) + w`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoopTable {
    cfg: LoopConfig,
    data: Vec<LoopEntry>,
}
impl LoopTable {
    pub fn new(cfg: LoopConfig) -> Self {
        Self {
            data: vec![LoopEntry::new(&cfg); cfg.size()],
            cfg,
        }
    }

    /// Compute the base index, skew bits, and tag for some address.
    pub fn hash(&self, pc: u32) -> LoopHash {
        let pc = pc as u64;
        let group_bits = self.cfg.log_entries - 2;
        let group_mask = (1u64 << group_bits) - 1;
        let tag_bits = self.cfg.tag_bits;

        let li = ((pc ^ (pc >> 2)) & group_mask) << 2;
        let lib = (pc >> group_bits) & group_mask;

        let mut tag = (pc >> group_bits) & ((1u64 << (2 * tag_bits)) - 1);
        tag ^= tag >> tag_bits;
        tag &= (1u64 << tag_bits) - 1;

        LoopHash { li: li as usize, lib: lib as usize, tag: tag as u16 }
    }

    /// The slot probed by some way.
    pub fn slot(&self, hash: &LoopHash, way: usize) -> usize {
        (hash.li ^ ((hash.lib >> way) << 2)) + way
    }

    /// The slots probed by all ways, in way order.
    pub fn slots(&self, hash: &LoopHash) -> [usize; LOOP_WAYS] {
        std::array::from_fn(|way| self.slot(hash, way))
    }

    /// Find the first way whose entry matches the tag.
    /// Returns the way and the slot.
    pub fn probe(&self, hash: &LoopHash) -> Option<(usize, usize)> {
        self.slots(hash).into_iter().enumerate()
            .find(|(_, slot)| self.data[*slot].tag == hash.tag)
    }

    /// Returns a reference to all entries.
    pub fn entries(&self) -> &[LoopEntry] { &self.data }

    /// Returns a mutable reference to all entries.
    pub fn entries_mut(&mut self) -> &mut [LoopEntry] { &mut self.data }
}

impl PredictorTable for LoopTable {
    type Input<'a> = LoopInputs;
    type Index = usize;
    type Entry = LoopEntry;

    fn size(&self) -> usize { self.data.len() }

    fn get_index(&self, input: LoopInputs) -> usize {
        let hash = self.hash(input.pc);
        self.slot(&hash, input.way % LOOP_WAYS)
    }

    fn get_entry(&self, idx: usize) -> &LoopEntry {
        &self.data[idx & self.index_mask()]
    }

    fn get_entry_mut(&mut self, idx: usize) -> &mut LoopEntry {
        let index = idx & self.index_mask();
        &mut self.data[index]
    }
}

impl TaggedPredictorTable for LoopTable {
    fn get_tag(&self, input: LoopInputs) -> usize {
        self.hash(input.pc).tag as usize
    }
}
