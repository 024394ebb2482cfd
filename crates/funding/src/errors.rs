use thiserror::Error;

/// Errors from funding, signing and broadcasting a transaction.
#[derive(Debug, Error)]
pub enum FundingError {
    /// The pool ran out before the inputs covered outputs and fee.
    #[error("insufficient funds (needed {needed} sats, pool provided {available})")]
    InsufficientFunds {
        /// Outputs plus fee at the point the pool ran dry.
        needed: u64,
        /// Sum of everything that was selected.
        available: u64,
    },

    /// Output or input values add up past `u64::MAX`.
    #[error("amount overflow while totalling sats")]
    AmountOverflow,

    /// Funding parameters don't make sense together.
    #[error("invalid funding params: {0}")]
    InvalidParams(&'static str),

    /// Signer could not produce an unlock script.
    #[error("signer failed on input {index}: {err}")]
    Signer {
        /// Input being signed.
        index: usize,
        /// Signer's error.
        err: anyhow::Error,
    },

    /// Broadcaster rejected the transaction.
    #[error("broadcast failed: {0}")]
    Broadcast(anyhow::Error),

    /// Could not list spendable outputs.
    #[error("listing unspent outputs failed: {0}")]
    UnspentSource(anyhow::Error),
}

/// Wrapper result type.
pub type FundingResult<T> = Result<T, FundingError>;
