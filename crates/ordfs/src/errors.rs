use std::path::PathBuf;

use ordfs_codec::CodecError;
use ordfs_envelope_fmt::EnvelopeBuildError;
use ordfs_funding::FundingError;
use ordfs_outpoint::{Origin, OriginError};
use thiserror::Error;

/// Errors from uploading or downloading inscribed content.
#[derive(Debug, Error)]
pub enum OrdfsError {
    /// Config text could not be parsed.
    #[error("config: {0}")]
    Config(#[from] toml::de::Error),

    /// Funding, signing or broadcast failed.
    #[error("funding: {0}")]
    Funding(#[from] FundingError),

    /// Content too large for an envelope push.
    #[error("envelope: {0}")]
    Envelope(#[from] EnvelopeBuildError),

    /// Fetched output bytes were malformed.
    #[error("decoding output: {0}")]
    Codec(#[from] CodecError),

    /// A manifest entry held a bad origin.
    #[error("origin: {0}")]
    Origin(#[from] OriginError),

    /// Manifest JSON could not be read or written.
    #[error("manifest json: {0}")]
    Manifest(#[from] serde_json::Error),

    /// The fetched output had bytes left over after its script.
    #[error("output has {0} trailing bytes")]
    TrailingBytes(usize),

    /// The output exists but carries no envelope content.
    #[error("{0} is not an inscription")]
    NotAnInscription(Origin),

    /// A directory entry name that can't be a single path component.
    #[error("invalid entry name {0:?}")]
    InvalidEntryName(String),

    /// Two children of one directory share a name.
    #[error("duplicate entry name {0:?}")]
    DuplicateEntry(String),

    /// A tree upload finished without producing the root's inscription.
    #[error("tree upload ended without a root inscription")]
    IncompleteUpload,

    /// Fetcher failed.
    #[error("fetching {origin}: {err}")]
    Fetch {
        /// Origin being fetched.
        origin: Origin,
        /// Fetcher's error.
        err: anyhow::Error,
    },

    /// Sink failed.
    #[error("writing {}: {err}", .path.display())]
    Sink {
        /// Path being written.
        path: PathBuf,
        /// Sink's error.
        err: anyhow::Error,
    },
}

/// Wrapper result type.
pub type OrdfsResult<T> = Result<T, OrdfsError>;
