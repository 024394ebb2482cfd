//! Outpoint coordinates used both to reference spent outputs and to name the
//! output that first carried a piece of inscribed content (its "origin").
//!
//! An [`Origin`] is a 32-byte creating hash plus a 32-bit output index, with
//! three interchangeable encodings:
//!
//! ```text
//! binary     <hash (32)> <index u32 BE (4)>
//! text       <hex(hash)>_<decimal index>
//! hex-index  <hex(hash)><hex(index u32 BE)>
//! ```
//!
//! The hash is kept in display order, the way block explorers and indexers
//! print transaction ids.

mod error;
mod origin;
#[cfg(feature = "serde")]
mod serde;

pub use error::{OriginError, OriginResult};
pub use origin::{ORIGIN_BINARY_LEN, ORIGIN_HASH_LEN, ORIGIN_URI_SCHEME, Origin, parse_origin_uri};
