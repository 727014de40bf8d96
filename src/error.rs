use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every failure a compress or decompress call can end in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("failed to allocate {requested} bytes")]
    AllocationFailure { requested: usize },

    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    #[error("malformed alphabet: {0}")]
    MalformedAlphabet(#[from] MalformedAlphabet),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("input is empty")]
    Empty,

    #[error("embedded zero byte at position {position}")]
    EmbeddedNul { position: usize },

    #[error("{0} distinct symbols, at most 255 are representable")]
    TooManySymbols(usize),

    #[error("a tree of height {0} needs more than 255 bytes per code")]
    WidthOverflow(usize),

    #[error("symbol {0:#04x} has no code")]
    UnknownSymbol(u8),

    #[error("bit length {bit_length} exceeds the {available} bits available")]
    BitLengthOutOfRange { bit_length: u64, available: u64 },

    #[error("bit {offset} does not lead to any symbol")]
    UndecodableBits { offset: usize },

    #[error("stream ends in the middle of a code")]
    TruncatedCode,

    #[error("decoded {actual} bytes, expected {expected}")]
    LengthMismatch { expected: u64, actual: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedAlphabet {
    #[error("block of {0} bytes is shorter than its header")]
    TooShort(usize),

    #[error("no symbols")]
    NoSymbols,

    #[error("code width is zero")]
    ZeroWidth,

    #[error("block is {actual} bytes, header implies {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("code of symbol {0:#04x} never terminates")]
    UnterminatedCode(u8),

    #[error("code of symbol {0:#04x} is empty")]
    EmptyCode(u8),

    #[error("symbol {0:#04x} appears twice")]
    DuplicateSymbol(u8),

    #[error("declared code width {declared}, longest code needs {expected}")]
    WidthMismatch { declared: u8, expected: u8 },

    #[error("code of symbol {0:#04x} collides with another code")]
    PrefixConflict(u8),
}

/// Grows `buf` by `additional` elements, surfacing a failed reservation
/// instead of aborting.
pub(crate) fn try_reserve<T>(buf: &mut Vec<T>, additional: usize) -> Result<()> {
    buf.try_reserve(additional)
        .map_err(|_| Error::AllocationFailure {
            requested: additional.saturating_mul(std::mem::size_of::<T>()),
        })
}
