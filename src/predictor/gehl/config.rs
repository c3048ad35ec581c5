
use crate::error::ConfigError;
use crate::history::*;
use crate::predictor::*;

/// The largest number of components in a [`GEHLPredictor`].
pub const MAX_GEHL_COMPONENTS: usize = 16;

/// The widest supported table index [in bits].
pub const MAX_INDEX_BITS: usize = 24;

/// The widest supported counter [in bits].
pub const MAX_COUNTER_BITS: usize = 8;

/// How the outputs of all components are combined into a single sum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Summation {
    /// Each counter is divided by its width before summing.
    Normalized,

    /// Counters are summed as plain integers, starting from some bias.
    Raw { bias: i32 },
}

/// Configuration for a [`GEHLComponent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GEHLComponentConfig {
    /// Number of global history bits used to form an index
    pub history_len: usize,

    /// Number of index bits (the table holds `2^index_bits` counters)
    pub index_bits: usize,

    /// Width of each counter [in bits]
    pub counter_bits: usize,
}
impl GEHLComponentConfig {
    pub fn new(history_len: usize, index_bits: usize, counter_bits: usize)
        -> Self
    {
        Self { history_len, index_bits, counter_bits }
    }

    /// Number of entries
    pub fn size(&self) -> usize { 1 << self.index_bits }

    /// Get the [approximate] number of storage bits.
    pub fn storage_bits(&self) -> usize {
        self.counter_bits * self.size()
    }

    /// Use this configuration to create a new [`GEHLComponent`].
    pub fn build(self) -> GEHLComponent {
        let ctr = SaturatingCounterConfig::signed(self.counter_bits);
        GEHLComponent {
            pht: PatternTable::new(self.size(), ctr),
            cfg: self,
        }
    }
}

/// Configuration for a [`GEHLPredictor`].
#[derive(Clone, Debug, PartialEq)]
pub struct GEHLConfig {
    /// Component configurations (sorted by increasing history length)
    pub comp: Vec<GEHLComponentConfig>,

    /// Length of the path history register [in bits]
    pub phist_bits: usize,

    /// Strategy for combining component outputs
    pub summation: Summation,

    /// Width of the threshold adaptation counter [in bits]
    pub tc_bits: usize,
}
impl Default for GEHLConfig {
    /// Eight components with geometric history lengths (0, 2, 4, ..., 128)
    /// and 2K counters each: 2 x 2K x 5 + 4 x 2K x 4 + 2 x 2K x 3 = 64Kib.
    fn default() -> Self {
        let history_len  = [0, 2, 4, 8, 16, 32, 64, 128];
        let counter_bits = [5, 5, 4, 4, 4, 4, 3, 3];
        let comp = history_len.iter().zip(counter_bits.iter())
            .map(|(l, c)| GEHLComponentConfig::new(*l, 11, *c))
            .collect();
        Self {
            comp,
            phist_bits: 32,
            summation: Summation::Normalized,
            tc_bits: 7,
        }
    }
}
impl GEHLConfig {
    pub fn new(phist_bits: usize) -> Self {
        Self {
            comp: Vec::new(),
            phist_bits,
            summation: Summation::Normalized,
            tc_bits: 7,
        }
    }

    /// Add a component to the predictor.
    pub fn add_component(&mut self, c: GEHLComponentConfig) {
        self.comp.push(c);
        self.comp.sort_by_key(|c| c.history_len);
    }

    /// Number of global history bits required by the longest component.
    pub fn ghist_bits(&self) -> usize {
        self.comp.iter().map(|c| c.history_len).max().unwrap_or(0)
    }

    pub fn total_entries(&self) -> usize {
        self.comp.iter().map(|c| c.size()).sum()
    }

    /// Get the [approximate] number of storage bits.
    pub fn storage_bits(&self) -> usize {
        self.comp.iter().map(|c| c.storage_bits()).sum()
    }

    /// Check that this configuration describes a buildable predictor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.comp.is_empty() {
            return Err(ConfigError::NoComponents);
        }
        if self.comp.len() > MAX_GEHL_COMPONENTS {
            return Err(ConfigError::TooManyComponents {
                num: self.comp.len(), max: MAX_GEHL_COMPONENTS
            });
        }
        if self.phist_bits == 0 || self.phist_bits > MAX_PHIST_BITS {
            return Err(ConfigError::PathBits {
                bits: self.phist_bits, max: MAX_PHIST_BITS
            });
        }
        if self.tc_bits == 0 || self.tc_bits > MAX_COUNTER_BITS {
            return Err(ConfigError::CounterWidth {
                field: "threshold", bits: self.tc_bits, max: MAX_COUNTER_BITS
            });
        }

        let mut prev: Option<usize> = None;
        for (idx, c) in self.comp.iter().enumerate() {
            if let Some(prev) = prev {
                if c.history_len <= prev {
                    return Err(ConfigError::HistoryNotIncreasing {
                        idx, prev, len: c.history_len
                    });
                }
            }
            if c.history_len > MAX_GHIST_BITS {
                return Err(ConfigError::HistoryTooLong {
                    idx, len: c.history_len, max: MAX_GHIST_BITS
                });
            }
            if c.index_bits == 0 || c.index_bits > MAX_INDEX_BITS {
                return Err(ConfigError::IndexBits {
                    idx, bits: c.index_bits, max: MAX_INDEX_BITS
                });
            }
            if c.counter_bits == 0 || c.counter_bits > MAX_COUNTER_BITS {
                return Err(ConfigError::CounterBits {
                    idx, bits: c.counter_bits, max: MAX_COUNTER_BITS
                });
            }
            prev = Some(c.history_len);
        }
        Ok(())
    }

    /// Use this configuration to create a new [`GEHLPredictor`].
    pub fn build(self) -> Result<GEHLPredictor, ConfigError> {
        self.validate()?;
        let comp = self.comp.iter().map(|c| c.build()).collect();
        let threshold = ThresholdController::new(self.comp.len(), self.tc_bits);
        Ok(GEHLPredictor {
            cfg: self,
            comp,
            threshold,
            stat: GEHLStats::default(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_geometry() {
        let cfg = GEHLConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.comp.len(), 8);
        assert_eq!(cfg.ghist_bits(), 128);
        assert_eq!(cfg.total_entries(), 8 * 2048);
        assert_eq!(cfg.storage_bits(), 64 * 1024);
    }

    #[test]
    fn add_component_keeps_history_order() {
        let mut cfg = GEHLConfig::new(16);
        cfg.add_component(GEHLComponentConfig::new(8, 6, 4));
        cfg.add_component(GEHLComponentConfig::new(0, 6, 4));
        cfg.add_component(GEHLComponentConfig::new(3, 6, 4));
        let lens: Vec<usize> = cfg.comp.iter().map(|c| c.history_len).collect();
        assert_eq!(lens, vec![0, 3, 8]);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_bad_geometry() {
        assert_eq!(GEHLConfig::new(16).validate(), Err(ConfigError::NoComponents));

        let mut cfg = GEHLConfig::default();
        cfg.comp[3].history_len = 4;
        assert_eq!(cfg.validate(),
            Err(ConfigError::HistoryNotIncreasing { idx: 3, prev: 4, len: 4 }));

        let mut cfg = GEHLConfig::default();
        cfg.comp[7].history_len = 200;
        assert!(matches!(cfg.validate(),
            Err(ConfigError::HistoryTooLong { idx: 7, .. })));

        let mut cfg = GEHLConfig::default();
        cfg.comp[0].counter_bits = 0;
        assert!(matches!(cfg.validate(),
            Err(ConfigError::CounterBits { idx: 0, bits: 0, .. })));

        let mut cfg = GEHLConfig::default();
        cfg.comp[2].index_bits = 0;
        assert!(matches!(cfg.validate(),
            Err(ConfigError::IndexBits { idx: 2, bits: 0, .. })));

        let mut cfg = GEHLConfig::default();
        cfg.phist_bits = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::PathBits { .. })));
        assert!(cfg.build().is_err());
    }
}
