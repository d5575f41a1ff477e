//! Structural validation of canonical tables.
//!
//! Externally-supplied tables arrive from untrusted bitstream headers and
//! must pass every check here before the decode table is built. Validation
//! is defensive-first: nothing is written to table memory until the whole
//! table is known to be sound.

use log::debug;

use crate::error::{InvalidTable, Result, UnsupportedLength, bail};
use crate::lut::{LUT_SIZE, projected_size};
use crate::tree::{ALPHABET_SIZE, MAX_CODE_LENGTH};
use crate::{HuffmanTable, TableClass};

/// Largest DC symbol value (magnitude categories 0..=11).
const MAX_DC_SYMBOL: u8 = 11;

/// Check a candidate table for the given role.
///
/// Checks run in a fixed order and each failure maps to a distinct error:
/// a malformed count array, a count/symbol-list mismatch, an empty table, a
/// Kraft violation, an out-of-range symbol for the role, and finally a
/// projected decode-table footprint past the fixed capacity. A table that
/// fails must not be installed; the caller aborts the current scan instead.
pub fn validate_table(table: &HuffmanTable, class: TableClass) -> Result<()> {
    if table.counts[0] != 0 {
        bail!(UnsupportedLength::BadLengthCount);
    }
    for length in 1..=MAX_CODE_LENGTH {
        if table.counts[length] > ALPHABET_SIZE as u32 {
            bail!(UnsupportedLength::BadLengthCount);
        }
    }

    let total: u32 = table.counts[1..].iter().sum();
    if total as usize != table.values.len() {
        bail!(InvalidTable::CountMismatch);
    }
    if total == 0 {
        bail!(InvalidTable::Empty);
    }

    // Kraft inequality, scaled by 2^16.
    let mut kraft = 0_u64;
    for length in 1..=MAX_CODE_LENGTH {
        kraft += u64::from(table.counts[length]) << (MAX_CODE_LENGTH - length);
    }
    if kraft > 1 << MAX_CODE_LENGTH {
        bail!(InvalidTable::Oversubscribed);
    }
    if kraft < 1 << MAX_CODE_LENGTH {
        // Incomplete codes are legal and common in real streams.
        debug!("incomplete huffman code (kraft sum {kraft}/65536)");
    }

    if class == TableClass::Dc && table.values.iter().any(|&v| v > MAX_DC_SYMBOL) {
        bail!(InvalidTable::SymbolOutOfRange);
    }

    if projected_size(&table.counts) > LUT_SIZE {
        bail!(InvalidTable::LutOverflow);
    }

    Ok(())
}
