//! Interfaces to the services funding depends on.

use std::future::Future;

use bitcoin::{ScriptBuf, Transaction, TxOut};

use crate::pool::UnspentListing;

/// Produces the unlock script for one input.
pub trait InputSigner {
    /// Signs input `input_index` of `unsigned_tx`, which spends `prevout`.
    ///
    /// Called once per input, in input order, after every input and output is
    /// in place.  All calls see the same unsigned transaction.
    fn sign_input(
        &self,
        unsigned_tx: &Transaction,
        input_index: usize,
        prevout: &TxOut,
    ) -> anyhow::Result<ScriptBuf>;
}

/// Submits finished transactions to the network.
pub trait Broadcaster {
    /// Submits `tx`.  `parents` holds the output spent by each input, in
    /// input order, so a relay can check it without a chain index.
    fn submit(
        &self,
        tx: &Transaction,
        parents: &[TxOut],
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}

/// Lists the spendable outputs of an address.
pub trait UnspentSource {
    /// Returns the address's unspent outputs in the order they should be
    /// used.
    fn list_unspent(
        &self,
        address: &str,
    ) -> impl Future<Output = anyhow::Result<Vec<UnspentListing>>> + Send;
}
