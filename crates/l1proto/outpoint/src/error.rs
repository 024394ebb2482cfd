use ordfs_codec::CodecError;
use thiserror::Error;

use crate::origin::ORIGIN_BINARY_LEN;

/// Errors for decoding origins.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OriginError {
    /// Binary form was not exactly [`ORIGIN_BINARY_LEN`] bytes.
    #[error("origin must be {ORIGIN_BINARY_LEN} bytes (found {0})")]
    InvalidLength(usize),

    /// Textual form did not parse.
    #[error("malformed outpoint {text:?}: {reason}")]
    MalformedOutpoint {
        /// The rejected input.
        text: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// Underlying buffer decode failed.
    #[error("codec: {0}")]
    Codec(#[from] CodecError),
}

impl OriginError {
    pub(crate) fn malformed(text: &str, reason: &'static str) -> Self {
        Self::MalformedOutpoint {
            text: text.to_owned(),
            reason,
        }
    }
}

/// Wrapper result type.
pub type OriginResult<T> = Result<T, OriginError>;
