//! Errors reported while building a predictor.

use thiserror::Error;

/// A predictor configuration was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("a GEHL predictor needs at least one component")]
    NoComponents,

    #[error("{num} components exceeds the supported maximum of {max}")]
    TooManyComponents { num: usize, max: usize },

    #[error("history lengths must strictly increase (component {idx}: {len} after {prev})")]
    HistoryNotIncreasing { idx: usize, prev: usize, len: usize },

    #[error("component {idx}: history length {len} exceeds the {max}-bit global history")]
    HistoryTooLong { idx: usize, len: usize, max: usize },

    #[error("component {idx}: index width {bits} is outside 1..={max}")]
    IndexBits { idx: usize, bits: usize, max: usize },

    #[error("component {idx}: counter width {bits} is outside 1..={max}")]
    CounterBits { idx: usize, bits: usize, max: usize },

    #[error("path history width {bits} is outside 1..={max}")]
    PathBits { bits: usize, max: usize },

    #[error("loop table must hold between {min} and {max} 4-way groups (log2 entries = {log_entries})")]
    LoopEntries { log_entries: usize, min: usize, max: usize },

    #[error("loop tag width {bits} is outside 1..={max}")]
    LoopTagBits { bits: usize, max: usize },

    #[error("loop iteration counter width {bits} is outside 1..={max}")]
    LoopIterBits { bits: usize, max: usize },

    #[error("loop {field} limit {val} is outside 1..={max}")]
    LoopLimit { field: &'static str, val: u8, max: u8 },

    #[error("loop allocation age {alloc_age} exceeds the maximum age {max_age}")]
    LoopAllocAge { alloc_age: u8, max_age: u8 },

    #[error("{field} counter width {bits} is outside 1..={max}")]
    CounterWidth { field: &'static str, bits: usize, max: usize },
}
