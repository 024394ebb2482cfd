use bitcoin::{
    Opcode, Script,
    opcodes::{
        OP_0, OP_FALSE,
        all::{OP_ENDIF, OP_IF, OP_PUSHNUM_1},
    },
};

use crate::{
    ORD_MARKER,
    chunk::{ScriptChunk, script_chunks},
    lock_hash::LockHash,
};

/// What could be recovered from an output script.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParsedScript {
    lock_hash: LockHash,
    content_type: Option<String>,
    content: Option<Vec<u8>>,
}

impl ParsedScript {
    /// Hash of the lock script, or of the whole script if there was no
    /// envelope.
    pub fn lock_hash(&self) -> LockHash {
        self.lock_hash
    }

    /// Content type, if the envelope had one.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Content bytes, if the envelope had them.
    pub fn content(&self) -> Option<&[u8]> {
        self.content.as_deref()
    }

    /// Whether any content was found.
    pub fn is_inscription(&self) -> bool {
        self.content.is_some()
    }

    /// Splits into lock hash, content type and content.
    pub fn into_parts(self) -> (LockHash, Option<String>, Option<Vec<u8>>) {
        (self.lock_hash, self.content_type, self.content)
    }
}

/// Scanner position within the script.
#[derive(Copy, Clone, Debug)]
enum ScanState {
    /// Still in the lock, remembering where the last `OP_FALSE` and `OP_IF`
    /// were seen.
    Accumulating {
        last_false: Option<usize>,
        last_if: Option<usize>,
    },

    /// Inside the envelope, expecting a tag opcode or, if `tag` is set, the
    /// value for it.
    ReadingFields { tag: Option<Opcode> },

    /// Nothing more to read.
    Done,
}

/// Parses the lock hash and any envelope content out of an output script.
///
/// The envelope starts at the first `"ord"` push that directly follows
/// `OP_FALSE OP_IF`; the bytes before the `OP_FALSE` are the lock.  Without
/// such a start the whole script is the lock.  Fields are read as
/// `<tag> <value>` pairs: `OP_1` sets the content type, `OP_0` the content,
/// unknown tags are skipped.  `OP_ENDIF`, or a data push where a tag was
/// expected, ends the envelope.
///
/// This never fails; a malformed or truncated envelope keeps whatever was
/// read before the problem.
pub fn parse_envelope_script(script: &Script) -> ParsedScript {
    let mut lock_end = script.len();
    let mut content_type = None;
    let mut content = None;

    let chunks: Vec<ScriptChunk<'_>> = script_chunks(script).collect();
    let mut state = ScanState::Accumulating {
        last_false: None,
        last_if: None,
    };

    for (i, chunk) in chunks.iter().enumerate() {
        state = match state {
            ScanState::Accumulating {
                mut last_false,
                mut last_if,
            } => {
                if chunk.opcode() == OP_FALSE {
                    last_false = Some(i);
                }
                if chunk.opcode() == OP_IF {
                    last_if = Some(i);
                }

                let is_marker = chunk.is_data_push() && chunk.push_bytes() == Some(ORD_MARKER);
                if is_marker && i >= 2 && last_false == Some(i - 2) && last_if == Some(i - 1) {
                    lock_end = chunks[i - 2].offset();
                    ScanState::ReadingFields { tag: None }
                } else {
                    ScanState::Accumulating {
                        last_false,
                        last_if,
                    }
                }
            }

            ScanState::ReadingFields { tag: None } => {
                if chunk.is_data_push() || chunk.opcode() == OP_ENDIF {
                    ScanState::Done
                } else {
                    ScanState::ReadingFields {
                        tag: Some(chunk.opcode()),
                    }
                }
            }

            ScanState::ReadingFields { tag: Some(tag) } => {
                if let Some(value) = chunk.push_bytes() {
                    match tag {
                        t if t == OP_0 => content = Some(value.to_vec()),
                        OP_PUSHNUM_1 => {
                            content_type = Some(String::from_utf8_lossy(value).into_owned())
                        }
                        _ => {}
                    }
                }
                ScanState::ReadingFields { tag: None }
            }

            ScanState::Done => break,
        };
    }

    ParsedScript {
        lock_hash: LockHash::of_script(&script.as_bytes()[..lock_end]),
        content_type,
        content,
    }
}
