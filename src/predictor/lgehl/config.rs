
use crate::error::ConfigError;
use crate::predictor::*;

/// Configuration for an [`LGEHLPredictor`].
#[derive(Clone, Debug, PartialEq)]
pub struct LGEHLConfig {
    pub gehl: GEHLConfig,
    pub loops: LoopConfig,

    /// Width of the counter used by the [`MetaSelector`] [in bits]
    pub withloop_bits: usize,
}
impl Default for LGEHLConfig {
    fn default() -> Self {
        Self {
            gehl: GEHLConfig::default(),
            loops: LoopConfig::default(),
            withloop_bits: 7,
        }
    }
}
impl LGEHLConfig {
    /// Get the [approximate] number of storage bits.
    pub fn storage_bits(&self) -> usize {
        self.gehl.storage_bits()
            + self.loops.storage_bits()
            + self.gehl.tc_bits
            + self.withloop_bits
    }

    /// Check that this configuration describes a buildable predictor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gehl.validate()?;
        self.loops.validate()?;
        if self.withloop_bits == 0 || self.withloop_bits > MAX_COUNTER_BITS {
            return Err(ConfigError::CounterWidth {
                field: "selector",
                bits: self.withloop_bits,
                max: MAX_COUNTER_BITS,
            });
        }
        Ok(())
    }

    /// Use this configuration to create a new [`LGEHLPredictor`].
    pub fn build(self) -> Result<LGEHLPredictor, ConfigError> {
        LGEHLPredictor::new(self)
    }
}
