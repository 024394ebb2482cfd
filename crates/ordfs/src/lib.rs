//! Stores files and directory trees as inscriptions and reads them back.
//!
//! Every file becomes one transaction whose first output carries the file
//! inside an envelope; a directory becomes one more transaction carrying a
//! JSON map from child names to the children's origins.  Uploading goes
//! through [`Inscriber`], which funds each transaction from a shared
//! [`UtxoPool`](ordfs_funding::UtxoPool).  [`Resolver`] follows an origin
//! back to its content and can rebuild the whole tree through a
//! [`ContentSink`].

mod collaborators;
mod config;
mod errors;
mod inscriber;
mod models;
mod output;
mod resolver;

#[cfg(test)]
mod test_utils;

pub use collaborators::{ContentFetcher, ContentSink};
pub use config::OrdfsConfig;
pub use errors::{OrdfsError, OrdfsResult};
pub use inscriber::Inscriber;
pub use models::{
    DIR_CONTENT_TYPE, DirManifest, FileRecord, InscribedContent, InscriptionRecord, UploadNode,
};
pub use output::decode_output;
pub use resolver::{ResolvedInscription, Resolver};
