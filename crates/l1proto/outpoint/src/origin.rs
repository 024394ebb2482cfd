use std::fmt;
use std::str;

use bitcoin::{OutPoint, Txid, hashes::Hash};
use ordfs_codec::ByteCursor;

use crate::error::{OriginError, OriginResult};

/// Length of the creating hash in bytes.
pub const ORIGIN_HASH_LEN: usize = 32;

/// Length of the binary form in bytes.
pub const ORIGIN_BINARY_LEN: usize = ORIGIN_HASH_LEN + 4;

/// URI scheme clients may put in front of a textual origin.
pub const ORIGIN_URI_SCHEME: &str = "ord://";

/// Coordinate of a transaction output.
///
/// Ordering is by binary value, hash bytes first and then index, so origins
/// can key sorted maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Origin {
    hash: [u8; ORIGIN_HASH_LEN],
    index: u32,
}

impl Origin {
    /// Creates a new instance from a display-order hash and an output index.
    pub const fn from_parts(hash: [u8; ORIGIN_HASH_LEN], index: u32) -> Self {
        Self { hash, index }
    }

    /// Returns the creating hash, display order.
    pub const fn hash(&self) -> &[u8; ORIGIN_HASH_LEN] {
        &self.hash
    }

    /// Returns the output index.
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Decodes the 36-byte binary form.
    pub fn from_binary(bytes: &[u8]) -> OriginResult<Self> {
        if bytes.len() != ORIGIN_BINARY_LEN {
            return Err(OriginError::InvalidLength(bytes.len()));
        }

        let mut cur = ByteCursor::new(bytes);
        let hash = cur.read_arr::<ORIGIN_HASH_LEN>()?;
        let index = cur.read_u32_be()?;
        Ok(Self { hash, index })
    }

    /// Encodes the 36-byte binary form.
    pub fn to_binary(&self) -> [u8; ORIGIN_BINARY_LEN] {
        let mut out = [0; ORIGIN_BINARY_LEN];
        out[..ORIGIN_HASH_LEN].copy_from_slice(&self.hash);
        out[ORIGIN_HASH_LEN..].copy_from_slice(&self.index.to_be_bytes());
        out
    }

    /// Parses the `<hash>_<index>` textual form.
    ///
    /// Splits on the last `_`; the hash must be exactly 64 hex characters and
    /// the index a plain decimal number that fits in a `u32`.
    pub fn from_text(s: &str) -> OriginResult<Self> {
        let (hash_part, index_part) = s
            .rsplit_once('_')
            .ok_or_else(|| OriginError::malformed(s, "missing '_' separator"))?;

        if hash_part.len() != ORIGIN_HASH_LEN * 2 {
            return Err(OriginError::malformed(s, "hash must be 64 hex characters"));
        }
        let mut hash = [0; ORIGIN_HASH_LEN];
        hex::decode_to_slice(hash_part, &mut hash)
            .map_err(|_| OriginError::malformed(s, "hash is not hex"))?;

        if index_part.is_empty() || !index_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OriginError::malformed(s, "index is not a decimal integer"));
        }
        let index = index_part
            .parse::<u32>()
            .map_err(|_| OriginError::malformed(s, "index out of range"))?;

        Ok(Self { hash, index })
    }

    /// Formats the `<hash>_<index>` textual form.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Parses the hex-only form, which is just the hex of the binary form.
    pub fn from_hex_index_text(s: &str) -> OriginResult<Self> {
        if s.len() != ORIGIN_BINARY_LEN * 2 {
            return Err(OriginError::malformed(s, "expected 72 hex characters"));
        }
        let mut buf = [0; ORIGIN_BINARY_LEN];
        hex::decode_to_slice(s, &mut buf).map_err(|_| OriginError::malformed(s, "not hex"))?;
        Self::from_binary(&buf)
    }

    /// Formats the hex-only form.
    pub fn to_hex_index_text(&self) -> String {
        hex::encode(self.to_binary())
    }

    /// Decodes the ledger's own outpoint serialization, hash in internal
    /// (reversed) order followed by a little-endian index.
    pub fn from_consensus_bytes(bytes: &[u8]) -> OriginResult<Self> {
        if bytes.len() != ORIGIN_BINARY_LEN {
            return Err(OriginError::InvalidLength(bytes.len()));
        }

        let mut cur = ByteCursor::new(bytes);
        let mut hash = [0; ORIGIN_HASH_LEN];
        hash.copy_from_slice(&cur.read_reversed(Some(ORIGIN_HASH_LEN))?);
        let index = cur.read_u32_le()?;
        Ok(Self { hash, index })
    }

    /// Encodes the ledger's own outpoint serialization.
    pub fn to_consensus_bytes(&self) -> [u8; ORIGIN_BINARY_LEN] {
        let mut out = [0; ORIGIN_BINARY_LEN];
        out[..ORIGIN_HASH_LEN].copy_from_slice(&self.hash);
        out[..ORIGIN_HASH_LEN].reverse();
        out[ORIGIN_HASH_LEN..].copy_from_slice(&self.index.to_le_bytes());
        out
    }
}

impl From<OutPoint> for Origin {
    fn from(op: OutPoint) -> Self {
        let mut hash = op.txid.to_byte_array();
        hash.reverse();
        Self::from_parts(hash, op.vout)
    }
}

impl From<Origin> for OutPoint {
    fn from(origin: Origin) -> Self {
        let mut internal = origin.hash;
        internal.reverse();
        OutPoint {
            txid: Txid::from_byte_array(internal),
            vout: origin.index,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", hex::encode(self.hash), self.index)
    }
}

impl str::FromStr for Origin {
    type Err = OriginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

/// Parses an origin that may carry an `ord://` prefix.
pub fn parse_origin_uri(s: &str) -> OriginResult<Origin> {
    Origin::from_text(s.strip_prefix(ORIGIN_URI_SCHEME).unwrap_or(s))
}
