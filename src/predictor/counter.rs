//! Implementation of a saturating counter.

use crate::Outcome;
use std::ops::RangeInclusive;

/// Configuration for building a [`SaturatingCounter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaturatingCounterConfig {
    /// Lower bound (inclusive)
    pub lo: i16,
    /// Upper bound (inclusive)
    pub hi: i16,
    /// Initial value
    pub init: i16,
}
impl SaturatingCounterConfig {
    /// A two's complement 'bits'-wide counter: `-2^(bits-1) ..= 2^(bits-1)-1`.
    pub fn signed(bits: usize) -> Self {
        assert!(bits >= 1 && bits <= 8);
        let hi = (1i16 << (bits - 1)) - 1;
        Self { lo: -hi - 1, hi, init: 0 }
    }

    /// An unsigned 'bits'-wide counter: `0 ..= 2^bits-1`.
    pub fn unsigned(bits: usize) -> Self {
        assert!(bits >= 1 && bits <= 7);
        Self { lo: 0, hi: (1i16 << bits) - 1, init: 0 }
    }

    /// A counter over an arbitrary inclusive range.
    pub fn range(range: RangeInclusive<i16>) -> Self {
        assert!(range.start() <= range.end());
        assert!(*range.start() >= i8::MIN as i16 && *range.end() <= i8::MAX as i16);
        let init = 0.clamp(*range.start(), *range.end());
        Self { lo: *range.start(), hi: *range.end(), init }
    }

    /// Change the initial value.
    pub fn with_init(mut self, init: i16) -> Self {
        self.init = init.clamp(self.lo, self.hi);
        self
    }

    pub fn storage_bits(&self) -> usize {
        let span = (self.hi - self.lo) as u32 + 1;
        span.next_power_of_two().ilog2() as usize
    }

    pub fn build(self) -> SaturatingCounter {
        SaturatingCounter {
            lo: self.lo as i8,
            hi: self.hi as i8,
            init: self.init as i8,
            state: self.init as i8,
        }
    }
}

/// A counter that clamps at its bounds instead of overflowing.
///
/// Bounds are fixed when the counter is built; the value can never leave
/// `[lo, hi]`. Bounds must fit in an [i8] (up to 8-bit signed or 7-bit
/// unsigned widths).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaturatingCounter {
    lo: i8,
    hi: i8,
    init: i8,
    state: i8,
}
impl SaturatingCounter {
    fn clamp(&self, x: i16) -> i8 {
        x.clamp(self.lo as i16, self.hi as i16) as i8
    }

    /// Increment, saturating at the upper bound.
    pub fn inc(&mut self) { self.state = self.clamp(self.state as i16 + 1); }

    /// Decrement, saturating at the lower bound.
    pub fn dec(&mut self) { self.state = self.clamp(self.state as i16 - 1); }

    /// Move the counter toward the provided outcome.
    pub fn update(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::T => self.inc(),
            Outcome::N => self.dec(),
        }
    }

    /// Set the value (clamped to the bounds).
    pub fn set(&mut self, val: i16) {
        self.state = self.clamp(val);
    }

    /// Reset to the initial value.
    pub fn reset(&mut self) {
        self.state = self.init;
    }

    /// Return the current value.
    pub fn value(&self) -> i16 { self.state as i16 }

    pub fn lo(&self) -> i16 { self.lo as i16 }
    pub fn hi(&self) -> i16 { self.hi as i16 }

    pub fn is_max(&self) -> bool { self.state == self.hi }
    pub fn is_min(&self) -> bool { self.state == self.lo }

    /// The sign of the counter interpreted as a direction (zero is taken).
    pub fn predict(&self) -> Outcome {
        Outcome::from_bool(self.state >= 0)
    }
}
