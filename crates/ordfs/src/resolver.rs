use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bitcoin::hashes::{Hash, sha256};
use ordfs_envelope_fmt::{LockHash, parse_envelope_script};
use ordfs_outpoint::{Origin, parse_origin_uri};
use tracing::{debug, info, warn};

use crate::{
    collaborators::{ContentFetcher, ContentSink},
    errors::{OrdfsError, OrdfsResult},
    models::{DIR_CONTENT_TYPE, FileRecord, InscriptionRecord},
    output::decode_output,
};

/// Content read back from an inscribed output.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedInscription {
    origin: Origin,
    value: u64,
    content_type: Option<String>,
    data: Vec<u8>,
    lock: LockHash,
}

impl ResolvedInscription {
    /// Where the content was read from.
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Value of the output, sats.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Content type, if the envelope had one.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Content bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Hash of the output's lock script.
    pub fn lock(&self) -> LockHash {
        self.lock
    }

    /// Whether the content is a directory manifest.
    pub fn is_directory(&self) -> bool {
        self.content_type() == Some(DIR_CONTENT_TYPE)
    }

    /// Parses the content as a directory's entry map.
    ///
    /// Values may carry an `ord://` prefix.
    pub fn dir_entries(&self) -> OrdfsResult<BTreeMap<String, Origin>> {
        let raw: BTreeMap<String, String> = serde_json::from_slice(&self.data)?;
        raw.into_iter()
            .map(|(name, origin)| Ok((name, parse_origin_uri(&origin)?)))
            .collect()
    }

    /// Describes the content the way an indexer would.
    pub fn file_record(&self) -> FileRecord {
        FileRecord {
            hash: hex::encode(sha256::Hash::hash(&self.data).to_byte_array()),
            size: self.data.len() as u64,
            content_type: self.content_type.clone().unwrap_or_default(),
        }
    }

    /// Builds the indexer record, given where the transaction was mined.
    pub fn to_record(&self, height: u32, idx: u64) -> InscriptionRecord {
        let outpoint = bitcoin::OutPoint::from(self.origin);
        InscriptionRecord {
            txid: outpoint.txid.to_string(),
            vout: outpoint.vout,
            file: Some(self.file_record()),
            origin: self.origin,
            height,
            idx,
            lock: self.lock.to_string(),
        }
    }
}

/// Reads inscriptions and rebuilds inscribed trees.
#[derive(Debug)]
pub struct Resolver<F> {
    fetcher: F,
}

impl<F: ContentFetcher> Resolver<F> {
    /// Creates a resolver reading through `fetcher`.
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Fetches the output at `origin` and parses its envelope.
    pub async fn resolve(&self, origin: Origin) -> OrdfsResult<ResolvedInscription> {
        let bytes = self
            .fetcher
            .fetch_output(origin)
            .await
            .map_err(|err| OrdfsError::Fetch { origin, err })?;

        let out = decode_output(&bytes)?;
        let (lock, content_type, content) = parse_envelope_script(&out.script_pubkey).into_parts();

        let Some(data) = content else {
            warn!(%origin, "output carries no inscription");
            return Err(OrdfsError::NotAnInscription(origin));
        };

        debug!(%origin, content_type = ?content_type, len = data.len(), "resolved inscription");
        Ok(ResolvedInscription {
            origin,
            value: out.value.to_sat(),
            content_type,
            data,
            lock,
        })
    }

    /// Writes the content at `origin` to `dest`.
    ///
    /// A directory becomes a directory at `dest` (which may already exist)
    /// with each entry downloaded beneath it; anything else is written as a
    /// file.
    pub async fn download(
        &self,
        origin: Origin,
        dest: &Path,
        sink: &impl ContentSink,
    ) -> OrdfsResult<()> {
        let mut pending = vec![(origin, dest.to_path_buf())];

        while let Some((origin, path)) = pending.pop() {
            let resolved = self.resolve(origin).await?;

            if !resolved.is_directory() {
                sink.write(&path, resolved.data())
                    .await
                    .map_err(|err| sink_error(&path, err))?;
                info!(%origin, path = %path.display(), len = resolved.data().len(), "wrote file");
                continue;
            }

            let entries = resolved.dir_entries()?;
            for name in entries.keys() {
                check_entry_name(name)?;
            }

            let exists = sink
                .exists(&path)
                .await
                .map_err(|err| sink_error(&path, err))?;
            if !exists {
                sink.create_dir(&path)
                    .await
                    .map_err(|err| sink_error(&path, err))?;
            }
            info!(%origin, path = %path.display(), entries = entries.len(), "created directory");

            for (name, child) in entries.into_iter().rev() {
                let child_path = path.join(name);
                pending.push((child, child_path));
            }
        }

        Ok(())
    }
}

fn sink_error(path: &Path, err: anyhow::Error) -> OrdfsError {
    OrdfsError::Sink {
        path: PathBuf::from(path),
        err,
    }
}

/// Rejects names that aren't a single normal path component.
pub(crate) fn check_entry_name(name: &str) -> OrdfsResult<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');

    if bad {
        return Err(OrdfsError::InvalidEntryName(name.to_owned()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use bitcoin::{Amount, TxOut};
    use ordfs_envelope_fmt::build_envelope_script;

    use super::*;
    use crate::test_utils::{MemorySink, MockChain, SinkEntry, files_script, funds_script};

    fn put(chain: &MockChain, n: u8, content_type: &str, data: &[u8]) -> Origin {
        let script = build_envelope_script(&files_script(), content_type, data).unwrap();
        let origin = Origin::from_parts([n; 32], 0);
        chain.insert_output(
            origin,
            TxOut {
                value: Amount::from_sat(1),
                script_pubkey: script,
            },
        );
        origin
    }

    fn put_dir(chain: &MockChain, n: u8, entries: &[(&str, Origin)]) -> Origin {
        let map: BTreeMap<_, _> = entries.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        put(chain, n, DIR_CONTENT_TYPE, &serde_json::to_vec(&map).unwrap())
    }

    #[tokio::test]
    async fn test_resolve_file() {
        let chain = MockChain::default();
        let origin = put(&chain, 1, "text/plain", b"hello");

        let resolver = Resolver::new(chain);
        let resolved = resolver.resolve(origin).await.unwrap();

        assert_eq!(resolved.origin(), origin);
        assert_eq!(resolved.value(), 1);
        assert_eq!(resolved.content_type(), Some("text/plain"));
        assert_eq!(resolved.data(), b"hello");
        assert_eq!(resolved.lock(), LockHash::of_script(files_script().as_bytes()));
        assert!(!resolved.is_directory());
    }

    #[tokio::test]
    async fn test_resolve_plain_output() {
        let chain = MockChain::default();
        let origin = Origin::from_parts([9; 32], 2);
        chain.insert_output(
            origin,
            TxOut {
                value: Amount::from_sat(5000),
                script_pubkey: files_script(),
            },
        );

        let resolver = Resolver::new(chain);
        assert!(matches!(
            resolver.resolve(origin).await,
            Err(OrdfsError::NotAnInscription(o)) if o == origin
        ));
    }

    #[tokio::test]
    async fn test_resolve_unknown_origin() {
        let resolver = Resolver::new(MockChain::default());
        let err = resolver
            .resolve(Origin::from_parts([1; 32], 0))
            .await
            .unwrap_err();
        assert!(matches!(err, OrdfsError::Fetch { .. }));
    }

    #[tokio::test]
    async fn test_record_from_resolved() {
        let chain = MockChain::default();
        let origin = put(&chain, 3, "text/plain", b"");

        let resolver = Resolver::new(chain);
        let record = resolver.resolve(origin).await.unwrap().to_record(800_000, 4);

        assert_eq!(record.txid, "03".repeat(32));
        assert_eq!(record.vout, 0);
        assert_eq!(record.origin, origin);
        assert_eq!(record.height, 800_000);
        let file = record.file.unwrap();
        assert_eq!(file.size, 0);
        assert_eq!(file.content_type, "text/plain");
        assert_eq!(
            file.hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(record.lock, LockHash::of_script(files_script().as_bytes()).to_string());
    }

    #[tokio::test]
    async fn test_download_tree() {
        let chain = MockChain::default();
        let a = put(&chain, 1, "text/plain", b"aaa");
        let b = put(&chain, 2, "image/png", &[0x89, b'P', b'N', b'G']);
        let sub = put_dir(&chain, 3, &[("b.png", b)]);
        let root = put_dir(&chain, 4, &[("a.txt", a), ("sub", sub)]);

        let resolver = Resolver::new(chain);
        let sink = MemorySink::default();
        resolver.download(root, Path::new("out"), &sink).await.unwrap();

        let entries = sink.entries();
        assert_eq!(entries.get(Path::new("out")), Some(&SinkEntry::Dir));
        assert_eq!(entries.get(Path::new("out/sub")), Some(&SinkEntry::Dir));
        assert_eq!(
            entries.get(Path::new("out/a.txt")),
            Some(&SinkEntry::File(b"aaa".to_vec()))
        );
        assert_eq!(
            entries.get(Path::new("out/sub/b.png")),
            Some(&SinkEntry::File(vec![0x89, b'P', b'N', b'G']))
        );
        assert_eq!(entries.len(), 4);
    }

    #[tokio::test]
    async fn test_download_into_existing_dir() {
        let chain = MockChain::default();
        let a = put(&chain, 1, "text/plain", b"x");
        let root = put_dir(&chain, 2, &[("a.txt", a)]);

        let sink = MemorySink::default();
        sink.create_dir(Path::new("out")).await.unwrap();

        let resolver = Resolver::new(chain);
        resolver.download(root, Path::new("out"), &sink).await.unwrap();
        assert_eq!(
            sink.entries().get(Path::new("out/a.txt")),
            Some(&SinkEntry::File(b"x".to_vec()))
        );
    }

    #[tokio::test]
    async fn test_download_single_file() {
        let chain = MockChain::default();
        let origin = put(&chain, 1, "text/plain", b"just me");

        let sink = MemorySink::default();
        Resolver::new(chain)
            .download(origin, Path::new("me.txt"), &sink)
            .await
            .unwrap();
        assert_eq!(
            sink.entries().get(Path::new("me.txt")),
            Some(&SinkEntry::File(b"just me".to_vec()))
        );
    }

    #[tokio::test]
    async fn test_download_rejects_traversal() {
        for bad in ["..", ".", "", "a/b", "..\\x"] {
            let chain = MockChain::default();
            let a = put(&chain, 1, "text/plain", b"x");
            let root = put_dir(&chain, 2, &[(bad, a)]);

            let sink = MemorySink::default();
            let err = Resolver::new(chain)
                .download(root, Path::new("out"), &sink)
                .await
                .unwrap_err();
            assert!(matches!(err, OrdfsError::InvalidEntryName(n) if n == bad));
            assert!(sink.entries().is_empty());
        }
    }

    #[tokio::test]
    async fn test_entries_accept_uri_prefix() {
        let chain = MockChain::default();
        let a = put(&chain, 1, "text/plain", b"x");
        let json = format!(r#"{{"a.txt":"ord://{a}"}}"#);
        let root = put(&chain, 2, DIR_CONTENT_TYPE, json.as_bytes());

        let resolver = Resolver::new(chain);
        let entries = resolver.resolve(root).await.unwrap().dir_entries().unwrap();
        assert_eq!(entries.get("a.txt"), Some(&a));
    }

    #[tokio::test]
    async fn test_malformed_manifest() {
        let chain = MockChain::default();
        let root = put(&chain, 2, DIR_CONTENT_TYPE, b"[1, 2]");

        let err = Resolver::new(chain)
            .download(root, Path::new("out"), &MemorySink::default())
            .await
            .unwrap_err();
        assert!(matches!(err, OrdfsError::Manifest(_)));
    }

    #[test]
    fn test_lock_scripts_keep_envelope_intact() {
        for lock in [files_script(), funds_script()] {
            let script = build_envelope_script(&lock, "text/plain", b"x").unwrap();
            let parsed = parse_envelope_script(&script);
            assert_eq!(parsed.lock_hash(), LockHash::of_script(lock.as_bytes()));
            assert_eq!(parsed.content(), Some(&b"x"[..]));
        }
    }

    #[test]
    fn test_check_entry_name() {
        assert!(check_entry_name("index.html").is_ok());
        assert!(check_entry_name("..hidden").is_ok());
        assert!(check_entry_name("a/b").is_err());
        assert!(check_entry_name("..").is_err());
    }
}
