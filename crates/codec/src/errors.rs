use thiserror::Error;

/// Errors from ordfs-codec.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// If we tried to read past the end of the underlying buffer.
    #[error("would overrun end of input (needed {needed}, remaining {remaining})")]
    Underrun {
        /// Bytes the read required.
        needed: usize,
        /// Bytes that were left.
        remaining: usize,
    },

    /// A length prefix declared more bytes than the buffer holds.
    #[error("length prefix declared {expected} bytes but only {available} remain")]
    ShortRead {
        /// Length declared by the prefix.
        expected: u64,
        /// Bytes that were left after the prefix.
        available: usize,
    },

    /// A compact length was too large for the narrow read.
    #[error("compact length {0} exceeds the exact integer range, use read_compact_size")]
    PrecisionLoss(u64),

    /// Fixed-width read with a width we don't decode.
    #[error("unsupported integer width {0}")]
    UnsupportedWidth(usize),

    /// Hex input was odd-length or had a non-hex character.
    #[error("invalid hex input: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}
