use thiserror::Error;

/// Errors that can occur while building envelope scripts.
#[derive(Debug, Error)]
pub enum EnvelopeBuildError {
    /// A field was too large for a single script push.
    #[error("{field} of {len} bytes does not fit in a script push")]
    PushTooLarge {
        /// Which envelope field.
        field: &'static str,
        /// Its size.
        len: usize,
    },
}
