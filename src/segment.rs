//! DHT segment parsing.
//!
//! A DHT payload is a sequence of table definitions, each a class/slot byte,
//! sixteen per-length counts, and the symbol list. Every parsed table is
//! validated before it is handed back.

use log::warn;

use crate::error::{ParseError, Result, bail};
use crate::reader::Reader;
use crate::tree::MAX_CODE_LENGTH;
use crate::validate::validate_table;
use crate::{HuffmanTable, TableClass};

/// Highest table slot a stream may target.
const MAX_SLOT: u8 = 3;

/// One table definition parsed out of a DHT segment.
#[derive(Debug, Clone)]
pub struct TableDefinition {
    /// Whether the table decodes DC or AC coefficients.
    pub class: TableClass,
    /// Destination slot (0..=3).
    pub id: u8,
    /// The validated table.
    pub table: HuffmanTable,
}

/// Parse the payload of a DHT segment (marker and length already stripped).
///
/// Definitions are returned in stream order; a later definition for an
/// already-seen slot legitimately replaces the earlier one, so both are kept.
pub fn parse_dht(data: &[u8]) -> Result<Vec<TableDefinition>> {
    let mut reader = Reader::new(data);
    let mut definitions: Vec<TableDefinition> = Vec::new();

    while !reader.at_end() {
        let slot_byte = reader.read_byte().ok_or(ParseError::UnexpectedEof)?;
        let class = match slot_byte >> 4 {
            0 => TableClass::Dc,
            1 => TableClass::Ac,
            _ => bail!(ParseError::InvalidSlot),
        };
        let id = slot_byte & 0x0f;
        if id > MAX_SLOT {
            bail!(ParseError::InvalidSlot);
        }

        let count_bytes = reader
            .read_bytes(MAX_CODE_LENGTH)
            .ok_or(ParseError::UnexpectedEof)?;
        let mut counts = [0_u32; MAX_CODE_LENGTH + 1];
        for (length, &count) in count_bytes.iter().enumerate() {
            counts[length + 1] = u32::from(count);
        }

        let total = counts.iter().sum::<u32>() as usize;
        let values = reader
            .read_bytes(total)
            .ok_or(ParseError::UnexpectedEof)?
            .to_vec();

        let table = HuffmanTable { counts, values };
        validate_table(&table, class)?;

        if definitions
            .iter()
            .any(|d| d.class == class && d.id == id)
        {
            warn!("DHT segment redefines {class:?} table {id}");
        }

        definitions.push(TableDefinition { class, id, table });
    }

    Ok(definitions)
}
