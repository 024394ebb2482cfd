//! Inscription envelope format.
//!
//! Content is carried in an output script, after the ordinary locking
//! condition, inside a branch that never executes:
//!
//! ```text
//! <lock script...>
//! OP_FALSE OP_IF
//!   "ord"
//!   OP_1 <content type>
//!   OP_0 <content>
//! OP_ENDIF
//! ```
//!
//! The `"ord"` push right after `OP_FALSE OP_IF` is what tells an envelope
//! apart from any other dead branch.  Everything before the `OP_FALSE` is the
//! lock script, whose hash identifies who can spend the output.
//!
//! Parsing never fails: a script with no envelope yields only the hash of
//! the whole script, and a truncated envelope yields whatever fields were
//! read before it ran out.
//!
//! # Examples
//!
//! ```
//! use bitcoin::ScriptBuf;
//! use ordfs_envelope_fmt::{LockHash, build_envelope_script, parse_envelope_script};
//!
//! let lock = ScriptBuf::from_bytes(vec![0x51]);
//! let script = build_envelope_script(&lock, "text/plain", b"hello").unwrap();
//!
//! let parsed = parse_envelope_script(&script);
//! assert_eq!(parsed.lock_hash(), LockHash::of_script(lock.as_bytes()));
//! assert_eq!(parsed.content_type(), Some("text/plain"));
//! assert_eq!(parsed.content(), Some(&b"hello"[..]));
//! ```

/// Envelope script builder.
pub mod builder;

/// Opcode-level view of scripts.
pub mod chunk;

/// Error types for envelope operations.
pub mod errors;

mod lock_hash;

/// Envelope script parser.
pub mod parser;

pub use builder::build_envelope_script;
pub use chunk::{ScriptChunk, script_chunks};
pub use errors::EnvelopeBuildError;
pub use lock_hash::LockHash;
pub use parser::{ParsedScript, parse_envelope_script};

/// Push that marks an `OP_FALSE OP_IF` branch as an inscription envelope.
pub const ORD_MARKER: &[u8] = b"ord";
