
use crate::error::ConfigError;
use crate::predictor::*;

/// Limits on the geometry of a [`LoopTable`].
pub const MIN_LOOP_LOG_ENTRIES: usize = 2;
pub const MAX_LOOP_LOG_ENTRIES: usize = 12;
pub const MAX_LOOP_TAG_BITS: usize = 16;
pub const MAX_LOOP_ITER_BITS: usize = 15;
pub const MAX_LOOP_LIMIT: u8 = 15;

/// Configuration for a [`LoopPredictor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopConfig {
    /// Number of entries (log2); entries are probed in groups of
    /// [`LOOP_WAYS`]
    pub log_entries: usize,

    /// Number of tag bits
    pub tag_bits: usize,

    /// Width of the iteration counters [in bits]
    pub iter_bits: usize,

    /// Confidence required before an entry is always trusted
    pub max_confidence: u8,

    /// Upper limit on the 'age' counter
    pub max_age: u8,

    /// Age given to a newly-allocated entry
    pub alloc_age: u8,

    /// Strategy for allocating entries after a miss
    pub replace_strat: ReplacementStrategy,
}
impl Default for LoopConfig {
    /// 32 entries, 12-bit tags, 10-bit iteration counters.
    fn default() -> Self {
        Self {
            log_entries: 5,
            tag_bits: 12,
            iter_bits: 10,
            max_confidence: 3,
            max_age: 15,
            alloc_age: 7,
            replace_strat: ReplacementStrategy::SingleProbe,
        }
    }
}
impl LoopConfig {
    /// Number of entries
    pub fn size(&self) -> usize { 1 << self.log_entries }

    /// Mask for the iteration counters
    pub fn iter_mask(&self) -> u16 { ((1u32 << self.iter_bits) - 1) as u16 }

    pub(crate) fn confidence_ctr(&self) -> SaturatingCounterConfig {
        SaturatingCounterConfig::range(0..=self.max_confidence as i16)
    }

    pub(crate) fn age_ctr(&self) -> SaturatingCounterConfig {
        SaturatingCounterConfig::range(0..=self.max_age as i16)
    }

    /// Get the [approximate] number of storage bits.
    pub fn storage_bits(&self) -> usize {
        let entry_size = (
            self.tag_bits +
            2 * self.iter_bits +
            self.confidence_ctr().storage_bits() +
            self.age_ctr().storage_bits() +
            1
        );
        entry_size * self.size()
    }

    /// Check that this configuration describes a buildable predictor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_entries < MIN_LOOP_LOG_ENTRIES
            || self.log_entries > MAX_LOOP_LOG_ENTRIES
        {
            return Err(ConfigError::LoopEntries {
                log_entries: self.log_entries,
                min: 1 << (MIN_LOOP_LOG_ENTRIES - 2),
                max: 1 << (MAX_LOOP_LOG_ENTRIES - 2),
            });
        }
        if self.tag_bits == 0 || self.tag_bits > MAX_LOOP_TAG_BITS {
            return Err(ConfigError::LoopTagBits {
                bits: self.tag_bits, max: MAX_LOOP_TAG_BITS
            });
        }
        if self.iter_bits == 0 || self.iter_bits > MAX_LOOP_ITER_BITS {
            return Err(ConfigError::LoopIterBits {
                bits: self.iter_bits, max: MAX_LOOP_ITER_BITS
            });
        }
        for (field, val) in [
            ("confidence", self.max_confidence),
            ("age", self.max_age),
            ("allocation age", self.alloc_age),
        ] {
            if val == 0 || val > MAX_LOOP_LIMIT {
                return Err(ConfigError::LoopLimit {
                    field, val, max: MAX_LOOP_LIMIT
                });
            }
        }
        if self.alloc_age > self.max_age {
            return Err(ConfigError::LoopAllocAge {
                alloc_age: self.alloc_age, max_age: self.max_age
            });
        }
        Ok(())
    }

    /// Use this configuration to create a new [`LoopPredictor`].
    pub fn build(self) -> Result<LoopPredictor, ConfigError> {
        self.validate()?;
        Ok(LoopPredictor {
            cfg: self,
            table: LoopTable::new(self),
            rng: LoopRng::new(),
            stat: LoopStats::default(),
        })
    }
}
