//! Byte and bit reading primitives.

/// A reader for reading bits and bytes from a byte stream.
///
/// Table-definition segments are byte oriented; the bit-level methods step
/// through entropy-coded data, MSB first, with a built table.
#[derive(Debug, Clone)]
pub(crate) struct Reader<'a> {
    /// The underlying data.
    data: &'a [u8],
    /// The position in bits.
    cur_pos: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader over `data`, positioned at the first bit.
    #[inline(always)]
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, cur_pos: 0 }
    }

    /// Whether every byte has been consumed.
    #[inline(always)]
    pub(crate) fn at_end(&self) -> bool {
        self.byte_pos() >= self.data.len()
    }

    /// Read the given number of bytes.
    ///
    /// Assumes that the reader is currently byte-aligned.
    #[inline(always)]
    pub(crate) fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        debug_assert_eq!(self.bit_pos(), 0);

        let start = self.byte_pos();
        let end = start.checked_add(len)?;
        let bytes = self.data.get(start..end)?;
        self.cur_pos += len * 8;

        Some(bytes)
    }

    /// Read a single byte.
    ///
    /// Assumes that the reader is currently byte-aligned.
    #[inline(always)]
    pub(crate) fn read_byte(&mut self) -> Option<u8> {
        debug_assert_eq!(self.bit_pos(), 0);

        let byte = self.cur_byte()?;
        self.cur_pos += 8;

        Some(byte)
    }

    /// Read a single bit, most significant first.
    #[cfg(test)]
    #[inline(always)]
    pub(crate) fn read_bit(&mut self) -> Option<u8> {
        let byte = self.cur_byte()?;
        let bit = (byte >> (7 - self.bit_pos())) & 1;
        self.cur_pos += 1;

        Some(bit)
    }

    /// Read the given number of bits, most significant first.
    ///
    /// Either all `count` bits are consumed or, when fewer remain, none.
    #[cfg(test)]
    #[inline(always)]
    pub(crate) fn read_bits(&mut self, count: u8) -> Option<u32> {
        debug_assert!(count <= 32);

        if self.cur_pos + usize::from(count) > self.data.len() * 8 {
            return None;
        }

        let mut value = 0_u32;
        for _ in 0..count {
            value = (value << 1) | u32::from(self.read_bit()?);
        }

        Some(value)
    }

    /// The current byte position.
    #[inline(always)]
    pub(crate) fn byte_pos(&self) -> usize {
        self.cur_pos >> 3
    }

    /// The bit offset within the current byte.
    #[inline(always)]
    pub(crate) fn bit_pos(&self) -> usize {
        self.cur_pos & 7
    }

    #[inline(always)]
    fn cur_byte(&self) -> Option<u8> {
        self.data.get(self.byte_pos()).copied()
    }
}
