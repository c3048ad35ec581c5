//! Index generation for GEHL components.

use bitvec::prelude::*;
use crate::history::*;

/// Maximum length of the vector folded into an index [in bits]: path
/// history, then global history, then the branch address.
const MAX_FOLD_BITS: usize = MAX_PHIST_BITS + MAX_GHIST_BITS + u32::BITS as usize;
const FOLD_WORDS: usize =
    (MAX_FOLD_BITS + usize::BITS as usize - 1) / usize::BITS as usize;

/// Form an 'index_bits'-wide index from (a) the newest `min(L, |phist|)`
/// bits of path history, (b) the newest `L` bits of global history, and
/// (c) the branch address, where `L` is 'history_len'.
///
/// The three fields are concatenated (low bits first) and folded with XOR.
/// When `L == 0` the index is taken directly from the low address bits.
pub fn gehl_index(pc: u32, hist: &HistoryRegisters, history_len: usize,
    index_bits: usize) -> usize
{
    let mask = (1usize << index_bits) - 1;
    if history_len == 0 {
        return pc as usize & mask;
    }

    let mut bits = BitArray::<[usize; FOLD_WORDS], Lsb0>::new([0; FOLD_WORDS]);
    let mut filled = 0;

    let path = hist.phist.newest(history_len);
    bits[filled..filled + path.len()].copy_from_bitslice(path);
    filled += path.len();

    let global = hist.ghist.newest(history_len);
    bits[filled..filled + global.len()].copy_from_bitslice(global);
    filled += global.len();

    bits[filled..filled + u32::BITS as usize].store_le::<u32>(pc);
    filled += u32::BITS as usize;

    fold_bits(&bits[..filled], index_bits) & mask
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn address_only_when_history_is_zero() {
        let hist = HistoryRegisters::new(128, 32);
        assert_eq!(gehl_index(0xdead_beef, &hist, 0, 11), 0xdead_beef & 0x7ff);
    }

    #[test]
    fn folds_path_history_address() {
        let mut hist = HistoryRegisters::new(8, 4);
        // ghist = 0b0000_0011, phist = 0b0010
        hist.record_transfer(true, true);
        hist.record_transfer(true, false);

        // L = 2: phist[1:0] = 0b10, ghist[1:0] = 0b11, then the address.
        // vector = pc << 4 | 0b11 << 2 | 0b10
        let pc: u32 = 0x0000_0a5c;
        let vector: u64 = ((pc as u64) << 4) | (0b11 << 2) | 0b10;
        let expected = (0..36).step_by(6)
            .fold(0u64, |acc, shift| acc ^ ((vector >> shift) & 0x3f));
        assert_eq!(gehl_index(pc, &hist, 2, 6), expected as usize);
    }

    #[test]
    fn path_slice_is_clamped_to_register() {
        let mut hist = HistoryRegisters::new(8, 2);
        for _ in 0..8 {
            hist.record_transfer(true, true);
        }
        // L = 8 but only 2 path bits: vector = pc << 10 | 0xff << 2 | 0b11
        let pc: u32 = 0x1234_5678;
        let vector: u64 = ((pc as u64) << 10) | (0xff << 2) | 0b11;
        let expected = (0..42).step_by(7)
            .fold(0u64, |acc, shift| acc ^ ((vector >> shift) & 0x7f));
        assert_eq!(gehl_index(pc, &hist, 8, 7), expected as usize);
    }

    #[test]
    fn index_is_pure() {
        let mut hist = HistoryRegisters::new(128, 32);
        for i in 0..200u32 {
            hist.record_transfer(i % 3 != 0, i % 5 == 0);
        }
        for len in [2, 4, 8, 16, 32, 64, 128] {
            let a = gehl_index(0x0040_1234, &hist, len, 11);
            let b = gehl_index(0x0040_1234, &hist, len, 11);
            assert_eq!(a, b);
            assert!(a < 2048);
        }
    }
}
