//! Global and path history registers.

use bitvec::prelude::*;
use std::ops::{ RangeInclusive };

/// The longest supported global history [in bits].
pub const MAX_GHIST_BITS: usize = 128;

/// The longest supported path history [in bits].
pub const MAX_PHIST_BITS: usize = 64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRegister {
    pub data: BitVec<usize, Lsb0>,
    len: usize,
}

// NOTE: This *reverses* the all of the bits and presents them in a format
// where the leftmost bit is the most-significant (index n) and the rightmost
// bit is the least-significant (index 0).
impl std::fmt::Display for HistoryRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let x: String = self.data.as_bitslice().iter().by_vals()
            .map(|b| if b { '1' } else { '0' })
            .rev()
            .collect();
        write!(f, "{}", x)
    }
}

impl HistoryRegister {
    /// Create a register with the specified length in bits.
    /// All bits in the register are initialized to zero.
    pub fn new(len: usize) -> Self {
        Self {
            data: bitvec![usize, Lsb0; 0; len],
            len,
        }
    }

    pub fn len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }
    pub fn data(&self) -> &BitSlice { self.data.as_bitslice() }
}

impl HistoryRegister {
    /// Shift the register by 'n' bits.
    /// The bottom 'n' bits become zero, and the top 'n' bits are discarded.
    pub fn shift_by(&mut self, n: usize) {
        self.data.shift_right(n);
    }

    /// Shift in a single bit at index 0.
    pub fn push(&mut self, bit: bool) {
        if self.len == 0 {
            return;
        }
        self.shift_by(1);
        self.data.set(0, bit);
    }

    /// Return the newest 'n' bits (clamped to the register length).
    pub fn newest(&self, n: usize) -> &BitSlice {
        &self.data[..n.min(self.len)]
    }

    /// Return some slice of bits.
    pub fn read(&self, range: RangeInclusive<usize>) -> &BitSlice {
        &self.data[range]
    }

    /// Return the newest 'n' bits (up to 64) as an integer.
    pub fn low_bits_u64(&self, n: usize) -> u64 {
        let n = n.min(self.len).min(64);
        if n == 0 {
            return 0;
        }
        self.data[..n].load_le::<u64>()
    }

    /// Fold [with XOR] some slice of bits.
    pub fn fold(&self, range: RangeInclusive<usize>, output_bits: usize)
        -> usize
    {
        fold_bits(&self.data[range], output_bits)
    }
}

/// Fold [with XOR] a slice of bits into 'output_bits' bits: consecutive
/// chunks of 'output_bits' (starting from index 0) are XOR'ed together.
pub fn fold_bits<T: BitStore>(bits: &BitSlice<T, Lsb0>, output_bits: usize)
    -> usize
{
    debug_assert!(output_bits > 0 && output_bits <= usize::BITS as usize);
    bits.chunks(output_bits)
        .fold(0, |res, x| res ^ x.load_le::<usize>())
}

/// The global outcome history and path history registers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRegisters {
    /// Global history: the most recent outcomes, newest at index 0
    pub ghist: HistoryRegister,

    /// Path history: the lowest address bit of the most recent transfers
    pub phist: HistoryRegister,
}
impl HistoryRegisters {
    pub fn new(ghist_bits: usize, phist_bits: usize) -> Self {
        debug_assert!(ghist_bits <= MAX_GHIST_BITS);
        debug_assert!(phist_bits <= MAX_PHIST_BITS);
        Self {
            ghist: HistoryRegister::new(ghist_bits),
            phist: HistoryRegister::new(phist_bits),
        }
    }

    /// Record a single control transfer.
    ///
    /// Conditional branches record their outcome. Calls, returns, and
    /// indirect transfers are always recorded as 'taken'.
    pub fn record_transfer(&mut self, taken: bool, path_bit: bool) {
        self.ghist.push(taken);
        self.phist.push(path_bit);
    }
}
