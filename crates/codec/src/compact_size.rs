//! The ledger's compact-size integer.
//!
//! The first byte is either the value itself or a prefix naming the width of
//! the little-endian value that follows.
//!
//! ```txt
//! 0x00..=0xfc                value
//! 0xfd bbbbbbbb_bbbbbbbb     u16
//! 0xfe (4 bytes)             u32
//! 0xff (8 bytes)             u64
//! ```
//!
//! Encoders must pick the smallest form that fits; readers here accept any
//! form.

/// Prefix of the 2-byte form.
pub const COMPACT_U16_PREFIX: u8 = 0xfd;

/// Prefix of the 4-byte form.
pub const COMPACT_U32_PREFIX: u8 = 0xfe;

/// Prefix of the 8-byte form.
pub const COMPACT_U64_PREFIX: u8 = 0xff;

/// Largest value the narrow compact length read will return.
///
/// Lengths cross into JSON and double-based consumers, which only represent
/// integers up to 2^53 exactly.
pub const MAX_EXACT_INT: u64 = 1 << 53;

/// Returns the total encoded width, prefix included, implied by a first byte.
pub(crate) fn width_from_prefix(first: u8) -> usize {
    match first {
        COMPACT_U16_PREFIX => 3,
        COMPACT_U32_PREFIX => 5,
        COMPACT_U64_PREFIX => 9,
        _ => 1,
    }
}

/// Returns the number of bytes the minimal encoding of `v` takes.
pub fn compact_size_len(v: u64) -> usize {
    if v < COMPACT_U16_PREFIX as u64 {
        1
    } else if v <= u16::MAX as u64 {
        3
    } else if v <= u32::MAX as u64 {
        5
    } else {
        9
    }
}

/// Appends the minimal compact-size encoding of `v` to `out`.
pub fn encode_compact_size(v: u64, out: &mut Vec<u8>) {
    match compact_size_len(v) {
        1 => out.push(v as u8),
        3 => {
            out.push(COMPACT_U16_PREFIX);
            out.extend_from_slice(&(v as u16).to_le_bytes());
        }
        5 => {
            out.push(COMPACT_U32_PREFIX);
            out.extend_from_slice(&(v as u32).to_le_bytes());
        }
        _ => {
            out.push(COMPACT_U64_PREFIX);
            out.extend_from_slice(&v.to_le_bytes());
        }
    }
}
