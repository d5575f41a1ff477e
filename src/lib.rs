/*!
Huffman table machinery for baseline JPEG streams.

This crate builds, validates, and inverts the entropy-coding tables of a
JPEG-family codec:

- Length-limited code construction from symbol histograms
  ([`tree::build_optimal_table`]), deterministic across platforms.
- Canonical codeword assignment ([`canonical::assign_codes`]) so that
  independent implementations derive bit-identical codes from the wire form.
- A fixed-capacity two-level decode table ([`lut::HuffmanLut`]) resolving
  any codeword in at most two memory accesses.
- Validation of externally-supplied tables ([`validate::validate_table`])
  before any decode structure is built from them.
- The baseline tables from Annex K ([`standard`]) and a DHT segment parser
  ([`segment`]).
*/

#![forbid(unsafe_code)]

pub mod canonical;
pub mod error;
pub mod lut;
mod reader;
pub mod segment;
pub mod standard;
pub mod tree;
pub mod validate;

pub use error::{Error, Result};
pub use lut::{HuffmanLut, TableEntry};
pub use segment::{TableDefinition, parse_dht};
pub use standard::{ComponentClass, standard_table};
pub use tree::build_optimal_table;
pub use validate::validate_table;

use crate::tree::MAX_CODE_LENGTH;

/// Whether a table decodes DC or AC coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableClass {
    /// DC coefficient (magnitude category) table.
    Dc,
    /// AC coefficient (run/size) table.
    Ac,
}

/// A canonical table in wire form: per-length code counts and the symbol
/// values in code order.
///
/// `counts[l]` is the number of codes of length `l`; index 0 is always zero
/// and exists so lengths index directly. This is the interchange type
/// between construction, validation, and decode-table building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTable {
    /// Number of codes per bit length, indexed 1..=16.
    pub counts: [u32; MAX_CODE_LENGTH + 1],
    /// Symbol values ordered by (code length, code value).
    pub values: Vec<u8>,
}

impl HuffmanTable {
    /// Number of symbols the table covers.
    pub fn num_symbols(&self) -> usize {
        self.values.len()
    }

    /// Whether the table covers no symbols at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Validate a table for the given role and build its decode table.
///
/// This is the one path by which untrusted tables become decode structures;
/// [`HuffmanLut::build`] alone assumes its input already passed validation.
pub fn decoder_lut(table: &HuffmanTable, class: TableClass) -> Result<HuffmanLut> {
    validate_table(table, class)?;
    Ok(HuffmanLut::build(table))
}
