//! Cursor-style decoding of the ledger's compact binary encodings.
//!
//! The ledger mixes fixed-width integers of both byte orders with a
//! self-describing variable-length integer ("compact size") that prefixes
//! most variable-length fields.  [`ByteCursor`] reads all of these from a
//! flat buffer, and [`encode_compact_size`] produces the compact form.

#[macro_use]
mod macros;

mod compact_size;
pub use compact_size::{
    COMPACT_U16_PREFIX, COMPACT_U32_PREFIX, COMPACT_U64_PREFIX, MAX_EXACT_INT, compact_size_len,
    encode_compact_size,
};

mod cursor;
pub use cursor::{ByteCursor, Endian};

mod errors;
pub use errors::CodecError;
