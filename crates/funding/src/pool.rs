use std::collections::VecDeque;

use bitcoin::{Amount, Script, ScriptBuf, TxOut};
use ordfs_outpoint::Origin;
use serde::{Deserialize, Serialize};

use crate::{
    collaborators::UnspentSource,
    errors::{FundingError, FundingResult},
};

/// An output that funding can spend.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SpendableOutput {
    /// Where the output lives.
    pub outpoint: Origin,

    /// Its locking script.
    pub script_pubkey: ScriptBuf,

    /// Its value in sats.
    pub value: u64,
}

impl SpendableOutput {
    /// Creates a new instance.
    pub fn new(outpoint: Origin, script_pubkey: ScriptBuf, value: u64) -> Self {
        Self {
            outpoint,
            script_pubkey,
            value,
        }
    }

    /// The output as it appears in its creating transaction.
    pub fn to_txout(&self) -> TxOut {
        TxOut {
            value: Amount::from_sat(self.value),
            script_pubkey: self.script_pubkey.clone(),
        }
    }
}

/// One entry of an unspent-output listing, as an indexer reports it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UnspentListing {
    /// `<txid>_<vout>`.
    pub outpoint: Origin,

    /// Value in sats.
    pub value: u64,
}

/// First-in first-out queue of spendable outputs.
///
/// Funding takes from the front; new change goes on the back.
#[derive(Clone, Debug, Default)]
pub struct UtxoPool {
    entries: VecDeque<SpendableOutput>,
}

impl UtxoPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a pool from a listing, all locked by `script_pubkey`.
    pub fn from_listing(
        listing: impl IntoIterator<Item = UnspentListing>,
        script_pubkey: &Script,
    ) -> Self {
        listing
            .into_iter()
            .map(|l| SpendableOutput::new(l.outpoint, script_pubkey.to_owned(), l.value))
            .collect()
    }

    /// Asks `source` for the unspent outputs of `address` and builds a pool
    /// from them.
    pub async fn load(
        source: &impl UnspentSource,
        address: &str,
        script_pubkey: &Script,
    ) -> FundingResult<Self> {
        let listing = source
            .list_unspent(address)
            .await
            .map_err(FundingError::UnspentSource)?;
        Ok(Self::from_listing(listing, script_pubkey))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pool has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all entry values, saturating at `u64::MAX`.
    pub fn total_value(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |acc, e| acc.saturating_add(e.value))
    }

    /// Iterates entries front to back.
    pub fn iter(&self) -> impl Iterator<Item = &SpendableOutput> {
        self.entries.iter()
    }

    /// Appends an entry to the back.
    pub fn push_back(&mut self, entry: SpendableOutput) {
        self.entries.push_back(entry);
    }

    pub(crate) fn pop_front(&mut self) -> Option<SpendableOutput> {
        self.entries.pop_front()
    }

    /// Puts entries back at the front, keeping their order.
    pub(crate) fn restore_front(&mut self, entries: Vec<SpendableOutput>) {
        for entry in entries.into_iter().rev() {
            self.entries.push_front(entry);
        }
    }
}

impl FromIterator<SpendableOutput> for UtxoPool {
    fn from_iter<T: IntoIterator<Item = SpendableOutput>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Extend<SpendableOutput> for UtxoPool {
    fn extend<T: IntoIterator<Item = SpendableOutput>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}
