//! Interfaces to where content is read from and written to.

use std::future::Future;
use std::path::Path;

use ordfs_outpoint::Origin;

/// Looks up transaction outputs by origin.
pub trait ContentFetcher {
    /// Returns the output at `origin` in the ledger's serialization: 8-byte
    /// little-endian value followed by the compact-length-prefixed script.
    fn fetch_output(&self, origin: Origin) -> impl Future<Output = anyhow::Result<Vec<u8>>> + Send;
}

/// Destination for downloaded trees.
pub trait ContentSink {
    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> impl Future<Output = anyhow::Result<bool>> + Send;

    /// Creates a directory whose parent already exists.
    fn create_dir(&self, path: &Path) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Writes a file, replacing any existing one.
    fn write(&self, path: &Path, data: &[u8]) -> impl Future<Output = anyhow::Result<()>> + Send;
}
