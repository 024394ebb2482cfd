//! In-memory collaborators for tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use bitcoin::{
    OutPoint, PubkeyHash, ScriptBuf, Transaction, TxOut, consensus,
    hashes::Hash,
    script::{Builder, PushBytesBuf},
};
use ordfs_funding::{Broadcaster, InputSigner, SpendableOutput, UtxoPool};
use ordfs_outpoint::Origin;

use crate::collaborators::{ContentFetcher, ContentSink};

pub(crate) fn funds_script() -> ScriptBuf {
    ScriptBuf::new_p2pkh(&PubkeyHash::from_byte_array([0xf0; 20]))
}

pub(crate) fn files_script() -> ScriptBuf {
    ScriptBuf::new_p2pkh(&PubkeyHash::from_byte_array([0xf1; 20]))
}

/// Pool holding one output per value, locked by [`funds_script`].
pub(crate) fn funded_pool(values: &[u64]) -> UtxoPool {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            SpendableOutput::new(Origin::from_parts([0xee; 32], i as u32), funds_script(), *v)
        })
        .collect()
}

/// Signs with a fixed fake signature and key.
pub(crate) struct TestSigner;

impl InputSigner for TestSigner {
    fn sign_input(
        &self,
        _unsigned_tx: &Transaction,
        input_index: usize,
        _prevout: &TxOut,
    ) -> anyhow::Result<ScriptBuf> {
        let sig = PushBytesBuf::try_from(vec![input_index as u8; 71])?;
        let key = PushBytesBuf::try_from(vec![3; 33])?;
        Ok(Builder::new().push_slice(sig).push_slice(key).into_script())
    }
}

/// Ledger that accepts every broadcast and serves outputs back by origin.
#[derive(Clone, Default)]
pub(crate) struct MockChain {
    outputs: Arc<Mutex<BTreeMap<Origin, TxOut>>>,
    broadcasts: Arc<Mutex<Vec<Transaction>>>,
}

impl MockChain {
    pub(crate) fn insert_output(&self, origin: Origin, out: TxOut) {
        self.outputs.lock().unwrap().insert(origin, out);
    }

    pub(crate) fn broadcasts(&self) -> Vec<Transaction> {
        self.broadcasts.lock().unwrap().clone()
    }
}

impl Broadcaster for MockChain {
    async fn submit(&self, tx: &Transaction, parents: &[TxOut]) -> anyhow::Result<()> {
        anyhow::ensure!(tx.input.len() == parents.len(), "missing parent outputs");
        anyhow::ensure!(
            tx.input.iter().all(|i| !i.script_sig.is_empty()),
            "unsigned input"
        );

        let txid = tx.compute_txid();
        for (vout, out) in tx.output.iter().enumerate() {
            let origin = Origin::from(OutPoint {
                txid,
                vout: vout as u32,
            });
            self.insert_output(origin, out.clone());
        }
        self.broadcasts.lock().unwrap().push(tx.clone());
        Ok(())
    }
}

impl ContentFetcher for MockChain {
    async fn fetch_output(&self, origin: Origin) -> anyhow::Result<Vec<u8>> {
        let outputs = self.outputs.lock().unwrap();
        let out = outputs
            .get(&origin)
            .ok_or_else(|| anyhow::anyhow!("no output at {origin}"))?;
        Ok(consensus::serialize(out))
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum SinkEntry {
    Dir,
    File(Vec<u8>),
}

/// Filesystem stand-in.  Like a real one, creating an existing directory or
/// writing into a missing one fails.
#[derive(Default)]
pub(crate) struct MemorySink {
    entries: Mutex<BTreeMap<PathBuf, SinkEntry>>,
}

impl MemorySink {
    pub(crate) fn entries(&self) -> BTreeMap<PathBuf, SinkEntry> {
        self.entries.lock().unwrap().clone()
    }

    fn check_parent(entries: &BTreeMap<PathBuf, SinkEntry>, path: &Path) -> anyhow::Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                anyhow::ensure!(
                    entries.get(parent) == Some(&SinkEntry::Dir),
                    "no directory {}",
                    parent.display()
                );
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl ContentSink for MemorySink {
    async fn exists(&self, path: &Path) -> anyhow::Result<bool> {
        Ok(self.entries.lock().unwrap().contains_key(path))
    }

    async fn create_dir(&self, path: &Path) -> anyhow::Result<()> {
        let mut entries = self.entries.lock().unwrap();
        anyhow::ensure!(!entries.contains_key(path), "{} exists", path.display());
        Self::check_parent(&entries, path)?;
        entries.insert(path.to_path_buf(), SinkEntry::Dir);
        Ok(())
    }

    async fn write(&self, path: &Path, data: &[u8]) -> anyhow::Result<()> {
        let mut entries = self.entries.lock().unwrap();
        anyhow::ensure!(
            entries.get(path) != Some(&SinkEntry::Dir),
            "{} is a directory",
            path.display()
        );
        Self::check_parent(&entries, path)?;
        entries.insert(path.to_path_buf(), SinkEntry::File(data.to_vec()));
        Ok(())
    }
}
