use std::collections::{BTreeMap, BTreeSet};

use bitcoin::{
    Amount, OutPoint, ScriptBuf, Transaction, TxOut, absolute::LockTime, transaction::Version,
};
use ordfs_envelope_fmt::build_envelope_script;
use ordfs_funding::{Broadcaster, FundingEngine, InputSigner, UtxoPool};
use ordfs_outpoint::Origin;
use tracing::info;

use crate::{
    config::OrdfsConfig,
    errors::{OrdfsError, OrdfsResult},
    models::{DIR_CONTENT_TYPE, DirManifest, InscribedContent, UploadNode},
    resolver::check_entry_name,
};

/// Uploads files and directories, one transaction each.
#[derive(Debug)]
pub struct Inscriber<S, B> {
    engine: FundingEngine,
    files_script: ScriptBuf,
    inscription_value: u64,
    signer: S,
    broadcaster: B,
}

/// Work item for the post-order tree walk.
enum Step {
    Visit(UploadNode),
    Seal { name: String, children: usize },
}

impl<S: InputSigner, B: Broadcaster> Inscriber<S, B> {
    /// Creates an inscriber that pays change to `funds_script` and locks
    /// inscriptions to `files_script`.
    pub fn new(
        config: &OrdfsConfig,
        funds_script: ScriptBuf,
        files_script: ScriptBuf,
        signer: S,
        broadcaster: B,
    ) -> OrdfsResult<Self> {
        Ok(Self {
            engine: FundingEngine::new(config.funding.clone(), funds_script)?,
            files_script,
            inscription_value: config.inscription_value,
            signer,
            broadcaster,
        })
    }

    /// Engine used to fund each inscription.
    pub fn engine(&self) -> &FundingEngine {
        &self.engine
    }

    /// Inscribes `body` and returns the origin of the carrying output.
    async fn inscribe(
        &self,
        pool: &mut UtxoPool,
        content_type: &str,
        body: &[u8],
    ) -> OrdfsResult<Origin> {
        let script = build_envelope_script(&self.files_script, content_type, body)?;
        let tx = Transaction {
            version: Version::ONE,
            lock_time: LockTime::ZERO,
            input: vec![],
            output: vec![TxOut {
                value: Amount::from_sat(self.inscription_value),
                script_pubkey: script,
            }],
        };

        let tx = self
            .engine
            .fund_sign_broadcast(tx, pool, &self.signer, &self.broadcaster)
            .await?;

        Ok(Origin::from(OutPoint {
            txid: tx.compute_txid(),
            vout: 0,
        }))
    }

    /// Inscribes one file.
    pub async fn inscribe_file(
        &self,
        pool: &mut UtxoPool,
        name: &str,
        content_type: &str,
        body: &[u8],
    ) -> OrdfsResult<InscribedContent> {
        let origin = self.inscribe(pool, content_type, body).await?;
        info!(%origin, name, content_type, len = body.len(), "inscribed file");

        Ok(InscribedContent {
            origin,
            name: name.to_owned(),
            data: body.to_vec(),
        })
    }

    /// Inscribes a directory whose children already have origins.
    ///
    /// The inscription holds only the entry map; the returned data is the
    /// whole manifest including the new origin.
    pub async fn inscribe_dir(
        &self,
        pool: &mut UtxoPool,
        name: &str,
        entries: BTreeMap<String, Origin>,
    ) -> OrdfsResult<InscribedContent> {
        for entry in entries.keys() {
            check_entry_name(entry)?;
        }

        let body = serde_json::to_vec(&entries)?;
        let origin = self.inscribe(pool, DIR_CONTENT_TYPE, &body).await?;
        info!(%origin, name, entries = entries.len(), "inscribed directory");

        let manifest = DirManifest {
            origin: Some(origin),
            name: name.to_owned(),
            entries,
        };

        Ok(InscribedContent {
            origin,
            name: name.to_owned(),
            data: serde_json::to_vec(&manifest)?,
        })
    }

    /// Inscribes a whole tree, children before the directory holding them.
    ///
    /// Child names must be valid, unique path components.  Returns the
    /// root's inscription.
    pub async fn inscribe_tree(
        &self,
        pool: &mut UtxoPool,
        root: UploadNode,
    ) -> OrdfsResult<InscribedContent> {
        let mut steps = vec![Step::Visit(root)];
        let mut done: Vec<InscribedContent> = Vec::new();

        while let Some(step) = steps.pop() {
            let content = match step {
                Step::Visit(UploadNode::File {
                    name,
                    content_type,
                    body,
                }) => self.inscribe_file(pool, &name, &content_type, &body).await?,

                Step::Visit(UploadNode::Dir { name, children }) => {
                    check_child_names(&children)?;

                    steps.push(Step::Seal {
                        name,
                        children: children.len(),
                    });
                    steps.extend(children.into_iter().rev().map(Step::Visit));
                    continue;
                }

                Step::Seal { name, children } => {
                    let first = done
                        .len()
                        .checked_sub(children)
                        .ok_or(OrdfsError::IncompleteUpload)?;
                    let entries = done
                        .split_off(first)
                        .into_iter()
                        .map(|c| (c.name, c.origin))
                        .collect();
                    self.inscribe_dir(pool, &name, entries).await?
                }
            };

            done.push(content);
        }

        // Everything below the root was folded into it by its seal step.
        done.pop().ok_or(OrdfsError::IncompleteUpload)
    }
}

/// Rejects children that can't live side by side in one directory.
fn check_child_names(children: &[UploadNode]) -> OrdfsResult<()> {
    let mut seen = BTreeSet::new();
    for child in children {
        check_entry_name(child.name())?;
        if !seen.insert(child.name()) {
            return Err(OrdfsError::DuplicateEntry(child.name().to_owned()));
        }
    }
    Ok(())
}
