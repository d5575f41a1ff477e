//! Two-level decode lookup table.
//!
//! The first 256 cells form the root table, indexed by the next 8 unread
//! bits. Codewords of up to 8 bits are replicated across every root index
//! sharing their prefix, so they decode in a single access. Longer codewords
//! redirect through their 8-bit prefix to a subtable appended after the root,
//! giving at most two accesses per symbol.

use crate::HuffmanTable;
use crate::canonical::{CodeWord, assign_codes};
use crate::tree::MAX_CODE_LENGTH;

/// Bits resolved by the root table.
pub const ROOT_BITS: u8 = 8;

const ROOT_SIZE: usize = 1 << ROOT_BITS;

/// Fixed decode-table capacity, in cells.
///
/// Sized for a 257-symbol alphabet with 16-bit codes and an 8-bit root:
/// the root cells, one subtable cell per symbol, and the worst-case
/// triangular growth of repeated second-level cells sum to slightly less
/// than 1024. Validation rejects any table projecting past this before
/// construction runs.
pub const LUT_SIZE: usize = 1024;

/// Marker value for cells no codeword maps to.
pub const INVALID_VALUE: u16 = 0xffff;

/// A single decode cell.
///
/// For direct cells, `bits` is the codeword length consumed (counted past
/// the root for second-level cells) and `value` the decoded symbol. For
/// redirect cells in the root table, `bits` is 8 plus the subtable's index
/// width and `value` the subtable's base offset. Cells with `bits == 0`
/// mark invalid codewords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
    /// Number of bits this cell resolves.
    pub bits: u8,
    /// Decoded symbol, or subtable base offset for redirect cells.
    pub value: u16,
}

/// A fully built decode table.
///
/// Construction is the only mutation; afterwards the table is plain shared
/// data that any number of readers may consume concurrently.
#[derive(Debug, Clone)]
pub struct HuffmanLut {
    entries: [TableEntry; LUT_SIZE],
}

impl HuffmanLut {
    /// Build the decode table for a validated canonical table.
    ///
    /// Capacity is checked up front by validation via [`projected_size`];
    /// construction itself never writes past [`LUT_SIZE`].
    pub fn build(table: &HuffmanTable) -> Self {
        debug_assert!(projected_size(&table.counts) <= LUT_SIZE);

        let codes = assign_codes(&table.counts);
        let mut entries = [TableEntry {
            bits: 0,
            value: INVALID_VALUE,
        }; LUT_SIZE];

        // Root table: short codewords, replicated across every index whose
        // top bits equal the codeword.
        for (code, &symbol) in codes.iter().zip(&table.values) {
            if code.length > ROOT_BITS {
                continue;
            }
            let shift = ROOT_BITS - code.length;
            let first = usize::from(code.code) << shift;
            let cell = TableEntry {
                bits: code.length,
                value: u16::from(symbol),
            };
            entries[first..first + (1 << shift)].fill(cell);
        }

        // Longer codewords share one subtable per distinct 8-bit prefix.
        // Canonical order visits equal prefixes contiguously with the
        // longest code last, so each subtable's width is known before any
        // of its cells are written.
        let prefixes = long_code_prefixes(&codes);
        let mut bases = Vec::with_capacity(prefixes.len());
        let mut base = ROOT_SIZE;
        for &(prefix, width) in &prefixes {
            entries[prefix] = TableEntry {
                bits: ROOT_BITS + width,
                value: base as u16,
            };
            bases.push(base);
            base += 1_usize << width;
        }

        let mut slot = 0;
        for (code, &symbol) in codes.iter().zip(&table.values) {
            if code.length <= ROOT_BITS {
                continue;
            }
            let sub_len = code.length - ROOT_BITS;
            let prefix = usize::from(code.code >> sub_len);
            while prefixes[slot].0 != prefix {
                slot += 1;
            }

            let width = prefixes[slot].1;
            let shift = width - sub_len;
            let low = usize::from(code.code) & ((1 << sub_len) - 1);
            let first = bases[slot] + (low << shift);
            let cell = TableEntry {
                bits: sub_len,
                value: u16::from(symbol),
            };
            entries[first..first + (1 << shift)].fill(cell);
        }

        Self { entries }
    }

    /// Resolve one decode step from the next 16 unread bits, MSB-aligned.
    ///
    /// Returns the total number of bits consumed and the decoded symbol. A
    /// result with `bits == 0` means the bits match no codeword and the
    /// stream is corrupt.
    #[inline]
    pub fn lookup(&self, window: u16) -> TableEntry {
        let root = self.entries[usize::from(window >> ROOT_BITS)];
        if root.bits <= ROOT_BITS {
            return root;
        }

        let width = root.bits - ROOT_BITS;
        let low = usize::from(window >> (ROOT_BITS - width)) & ((1 << width) - 1);
        let cell = self.entries[usize::from(root.value) + low];
        if cell.bits == 0 {
            return cell;
        }

        TableEntry {
            bits: ROOT_BITS + cell.bits,
            value: cell.value,
        }
    }

    /// The raw cells, root table first.
    pub fn entries(&self) -> &[TableEntry; LUT_SIZE] {
        &self.entries
    }
}

/// Exact number of cells the decode table for `counts` would occupy.
///
/// Used by validation to reject tables before any table memory is written.
pub fn projected_size(counts: &[u32; MAX_CODE_LENGTH + 1]) -> usize {
    let codes = assign_codes(counts);
    let subtables: usize = long_code_prefixes(&codes)
        .iter()
        .map(|&(_, width)| 1_usize << width)
        .sum();
    ROOT_SIZE + subtables
}

/// The distinct 8-bit prefixes of codewords longer than the root, each with
/// the index width of its subtable, in order of first appearance.
fn long_code_prefixes(codes: &[CodeWord]) -> Vec<(usize, u8)> {
    let mut prefixes: Vec<(usize, u8)> = Vec::new();

    for code in codes {
        if code.length <= ROOT_BITS {
            continue;
        }
        let width = code.length - ROOT_BITS;
        let prefix = usize::from(code.code >> width);
        match prefixes.last_mut() {
            // A later code under the same prefix is at least as long; the
            // subtable is sized for the longest.
            Some(last) if last.0 == prefix => last.1 = width,
            _ => prefixes.push((prefix, width)),
        }
    }

    prefixes
}
