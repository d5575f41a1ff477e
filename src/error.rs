//! Error types for Huffman table construction and validation.

use core::fmt;

/// The main error type for table operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The table is structurally impossible or unusable.
    InvalidTable(InvalidTable),
    /// The length-count array itself is malformed.
    UnsupportedLength(UnsupportedLength),
    /// Errors related to reading a table-definition segment.
    Parse(ParseError),
}

/// Reasons a table is rejected by validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidTable {
    /// The table defines no codes at all.
    Empty,
    /// The code lengths violate the Kraft inequality.
    Oversubscribed,
    /// A symbol value is outside the legal range for the table's role.
    SymbolOutOfRange,
    /// The length counts do not match the number of listed symbols.
    CountMismatch,
    /// The decode table would exceed its fixed capacity.
    LutOverflow,
}

/// Reasons the length-count array is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedLength {
    /// A single length claims more codes than the alphabet holds.
    BadLengthCount,
}

/// Errors related to reading a table-definition segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Unexpected end of input.
    UnexpectedEof,
    /// Invalid table class or identifier nibble.
    InvalidSlot,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTable(e) => write!(f, "{e}"),
            Self::UnsupportedLength(e) => write!(f, "{e}"),
            Self::Parse(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for InvalidTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "table defines no codes"),
            Self::Oversubscribed => write!(f, "code lengths violate the Kraft inequality"),
            Self::SymbolOutOfRange => write!(f, "symbol value out of range for table class"),
            Self::CountMismatch => write!(f, "length counts do not match the symbol list"),
            Self::LutOverflow => write!(f, "decode table would exceed its fixed capacity"),
        }
    }
}

impl fmt::Display for UnsupportedLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadLengthCount => write!(f, "malformed length-count array"),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => write!(f, "unexpected end of input"),
            Self::InvalidSlot => write!(f, "invalid table class or identifier"),
        }
    }
}

impl core::error::Error for Error {}
impl core::error::Error for InvalidTable {}
impl core::error::Error for UnsupportedLength {}
impl core::error::Error for ParseError {}

impl From<InvalidTable> for Error {
    fn from(e: InvalidTable) -> Self {
        Self::InvalidTable(e)
    }
}

impl From<UnsupportedLength> for Error {
    fn from(e: UnsupportedLength) -> Self {
        Self::UnsupportedLength(e)
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

/// Result type for table operations.
pub type Result<T> = core::result::Result<T, Error>;

macro_rules! bail {
    ($err:expr) => {
        return Err($err.into())
    };
}

pub(crate) use bail;
