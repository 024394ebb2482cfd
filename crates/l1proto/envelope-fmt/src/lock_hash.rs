use std::fmt;

use bitcoin::hashes::{Hash, sha256};

/// Hash of a lock script.
///
/// Single SHA-256 of the script bytes, stored reversed like other 32-byte
/// ledger identifiers, so it prints the way indexers show it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct LockHash([u8; 32]);

impl LockHash {
    /// Hashes raw script bytes.
    pub fn of_script(script: &[u8]) -> Self {
        let mut buf = sha256::Hash::hash(script).to_byte_array();
        buf.reverse();
        Self(buf)
    }

    /// Returns the hash bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for LockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}
