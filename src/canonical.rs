//! Canonical code assignment.
//!
//! Codewords are generated from per-length counts alone, so an encoder and
//! any independent decoder that agree on the `(counts, symbols)` wire form
//! reconstruct bit-identical codes.

use crate::HuffmanTable;
use crate::tree::{ALPHABET_SIZE, MAX_CODE_LENGTH};

/// A canonical codeword: its bit length and its value, MSB first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeWord {
    /// Codeword length in bits (1..=16); 0 marks an unused slot.
    pub length: u8,
    /// Codeword value in the low `length` bits.
    pub code: u16,
}

/// Assign canonical code values for the given per-length counts.
///
/// Lengths are processed in increasing order; the first code of each length
/// is the previous running value shifted left once, and codes within a
/// length are consecutive. The result is ordered exactly like the table's
/// symbol list.
pub fn assign_codes(counts: &[u32; MAX_CODE_LENGTH + 1]) -> Vec<CodeWord> {
    let mut codes = Vec::new();
    let mut code = 0_u32;

    for length in 1..=MAX_CODE_LENGTH {
        for _ in 0..counts[length] {
            debug_assert!(code < 1 << length);
            codes.push(CodeWord {
                length: length as u8,
                code: code as u16,
            });
            code += 1;
        }
        code <<= 1;
    }

    codes
}

/// Per-symbol encoder view of a table: `(length, code)` indexed by symbol
/// value, with length 0 for symbols the table does not cover.
pub fn code_lookup(table: &HuffmanTable) -> [CodeWord; ALPHABET_SIZE] {
    let codes = assign_codes(&table.counts);
    let mut lookup = [CodeWord { length: 0, code: 0 }; ALPHABET_SIZE];

    for (&symbol, &code) in table.values.iter().zip(&codes) {
        lookup[usize::from(symbol)] = code;
    }

    lookup
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standard::{ComponentClass, standard_table};

    #[test]
    fn dc_luminance_codes_match_the_standard_assignment() {
        let table = standard_table(ComponentClass::Luma, true);
        let codes = assign_codes(&table.counts);

        assert_eq!(codes.len(), 12);
        // Symbol 0: the single 2-bit code.
        assert_eq!(codes[0], CodeWord { length: 2, code: 0b00 });
        // Symbols 1..=5: five consecutive 3-bit codes starting at 010.
        assert_eq!(codes[1], CodeWord { length: 3, code: 0b010 });
        assert_eq!(codes[5], CodeWord { length: 3, code: 0b110 });
        // Symbol 6 carries the running value into length 4.
        assert_eq!(codes[6], CodeWord { length: 4, code: 0b1110 });
        // The deepest code stops one short of the all-ones pattern.
        assert_eq!(codes[11], CodeWord { length: 9, code: 0b111111110 });
    }

    #[test]
    fn ac_luminance_codes_are_prefix_free() {
        let table = standard_table(ComponentClass::Luma, false);
        let codes = assign_codes(&table.counts);
        assert_eq!(codes.len(), 162);

        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                // Codes are ordered by length, so `a` is the shorter one.
                let shifted = b.code >> (b.length - a.length);
                assert_ne!(shifted, a.code, "{a:?} is a prefix of {b:?}");
            }
        }
    }

    #[test]
    fn code_lookup_is_indexed_by_symbol() {
        let table = standard_table(ComponentClass::Luma, true);
        let lookup = code_lookup(table);

        assert_eq!(lookup[0].length, 2);
        assert_eq!(lookup[11].length, 9);
        // Symbols outside the table stay empty.
        assert_eq!(lookup[12].length, 0);
        assert_eq!(lookup[255].length, 0);
    }
}
