//! Pays for transactions out of a queue of spendable outputs.
//!
//! Given a transaction that only has its outputs, the [`FundingEngine`] pulls
//! outputs off the front of a [`UtxoPool`] until they cover the outputs plus
//! a fee that is recomputed as the transaction grows, then turns what is
//! left into change.  Large change is split into several fixed-size outputs
//! so later transactions have more than one output to draw on.  After a
//! successful broadcast the new outputs go to the back of the pool.
//!
//! Signing and broadcasting are done by the caller's [`InputSigner`] and
//! [`Broadcaster`].

mod collaborators;
mod engine;
mod errors;
mod params;
mod pool;

pub use collaborators::{Broadcaster, InputSigner, UnspentSource};
pub use engine::{FundedTx, FundingEngine, sign_funded};
pub use errors::{FundingError, FundingResult};
pub use params::FundingParams;
pub use pool::{SpendableOutput, UnspentListing, UtxoPool};
