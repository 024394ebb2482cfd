use std::collections::BTreeMap;

use ordfs_outpoint::Origin;
use serde::{Deserialize, Serialize};

/// Content type of an inscribed directory manifest.
pub const DIR_CONTENT_TYPE: &str = "ord-fs/json";

/// Indexer description of a file's content.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Lowercase hex SHA-256 of the content.
    pub hash: String,
    /// Content length in bytes.
    pub size: u64,
    /// MIME type.
    #[serde(rename = "type")]
    pub content_type: String,
}

/// A directory and the origins of its children.
///
/// Only `entries` is inscribed; the origin is filled in once the directory's
/// own transaction exists.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct DirManifest {
    /// Origin of the directory's own inscription.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
    /// Directory name.
    pub name: String,
    /// Child name to child origin.
    pub entries: BTreeMap<String, Origin>,
}

/// Something that was inscribed, or read back from an inscription.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InscribedContent {
    /// Output carrying the content.
    pub origin: Origin,
    /// File or directory name.
    pub name: String,
    /// Content bytes; for a directory, its manifest JSON.
    pub data: Vec<u8>,
}

/// What an indexer reports about one inscription.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct InscriptionRecord {
    /// Hex txid of the transaction holding the output.
    pub txid: String,
    /// Output index.
    pub vout: u32,
    /// Content description, absent for non-file outputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileRecord>,
    /// Output that first carried the content.
    pub origin: Origin,
    /// Block height.
    pub height: u32,
    /// Position within the block.
    pub idx: u64,
    /// Hex lock hash.
    pub lock: String,
}

impl InscriptionRecord {
    /// Whether the inscription is a directory manifest.
    pub fn is_directory(&self) -> bool {
        self.file
            .as_ref()
            .is_some_and(|f| f.content_type == DIR_CONTENT_TYPE)
    }
}

/// In-memory tree handed to
/// [`Inscriber::inscribe_tree`](crate::Inscriber::inscribe_tree).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UploadNode {
    /// File with its content.
    File {
        /// Entry name in the parent directory.
        name: String,
        /// MIME type recorded in the envelope.
        content_type: String,
        /// File content.
        body: Vec<u8>,
    },
    /// Directory with its children.
    Dir {
        /// Entry name in the parent directory.
        name: String,
        /// Children, inscribed in this order.
        children: Vec<UploadNode>,
    },
}

impl UploadNode {
    /// Creates a file node.
    pub fn file(name: impl Into<String>, content_type: impl Into<String>, body: Vec<u8>) -> Self {
        Self::File {
            name: name.into(),
            content_type: content_type.into(),
            body,
        }
    }

    /// Creates a directory node.
    pub fn dir(name: impl Into<String>, children: Vec<UploadNode>) -> Self {
        Self::Dir {
            name: name.into(),
            children,
        }
    }

    /// Name of the node.
    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } | Self::Dir { name, .. } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin(n: u8) -> Origin {
        Origin::from_parts([n; 32], n as u32)
    }

    #[test]
    fn test_manifest_json_shape() {
        let mut manifest = DirManifest {
            origin: None,
            name: "site".to_owned(),
            entries: BTreeMap::new(),
        };
        manifest.entries.insert("index.html".to_owned(), origin(1));

        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "site",
                "entries": { "index.html": format!("{}_1", "01".repeat(32)) },
            })
        );

        manifest.origin = Some(origin(2));
        let back: DirManifest =
            serde_json::from_slice(&serde_json::to_vec(&manifest).unwrap()).unwrap();
        assert_eq!(back, manifest);
    }

    #[test]
    fn test_inscription_record_json() {
        let json = serde_json::json!({
            "txid": "02".repeat(32),
            "vout": 0,
            "file": { "hash": "ab", "size": 12, "type": "ord-fs/json" },
            "origin": format!("{}_0", "02".repeat(32)),
            "height": 800000,
            "idx": 3,
            "lock": "cd",
        });

        let record: InscriptionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.origin, Origin::from_parts([2; 32], 0));
        assert!(record.is_directory());
        assert_eq!(record.file.unwrap().size, 12);
    }

    #[test]
    fn test_record_without_file() {
        let json = serde_json::json!({
            "txid": "02".repeat(32),
            "vout": 1,
            "origin": format!("{}_1", "02".repeat(32)),
            "height": 1,
            "idx": 0,
            "lock": "",
        });
        let record: InscriptionRecord = serde_json::from_value(json).unwrap();
        assert!(record.file.is_none());
        assert!(!record.is_directory());
    }

    #[test]
    fn test_upload_node_name() {
        let tree = UploadNode::dir("a", vec![UploadNode::file("b", "text/plain", vec![])]);
        assert_eq!(tree.name(), "a");
    }
}
