use bitcoin::{Amount, ScriptBuf, TxOut};
use ordfs_codec::ByteCursor;

use crate::errors::{OrdfsError, OrdfsResult};

/// Decodes one serialized transaction output.
///
/// The layout is an 8-byte little-endian value followed by the locking
/// script with a compact-size length prefix.  Bytes after the script are an
/// error.
pub fn decode_output(bytes: &[u8]) -> OrdfsResult<TxOut> {
    let mut cur = ByteCursor::new(bytes);
    let value = cur.read_u64_le()?;
    let script = cur.read_length_prefixed()?.to_vec();

    if !cur.at_end() {
        return Err(OrdfsError::TrailingBytes(cur.remaining()));
    }

    Ok(TxOut {
        value: Amount::from_sat(value),
        script_pubkey: ScriptBuf::from_bytes(script),
    })
}
