use bitcoin::{
    Script, ScriptBuf,
    blockdata::script,
    opcodes::{
        OP_0, OP_FALSE,
        all::{OP_ENDIF, OP_IF, OP_PUSHNUM_1},
    },
    script::PushBytesBuf,
};

use crate::{ORD_MARKER, errors::EnvelopeBuildError};

/// Builds an output script carrying typed content after a lock script.
///
/// Creates a script with the structure:
/// ```text
/// <lock> OP_FALSE OP_IF "ord" OP_1 <content_type> OP_0 <content> OP_ENDIF
/// ```
///
/// The content goes in a single push regardless of size.
///
/// # Errors
///
/// Returns [`EnvelopeBuildError`] if a field is too large to be pushed at all.
pub fn build_envelope_script(
    lock: &Script,
    content_type: &str,
    content: &[u8],
) -> Result<ScriptBuf, EnvelopeBuildError> {
    let builder = script::Builder::from(lock.to_bytes());
    let builder = push_envelope(builder, content_type, content)?;
    Ok(builder.into_script())
}

/// Extends the builder with `OP_FALSE OP_IF "ord" OP_1 <type> OP_0 <content> OP_ENDIF`.
fn push_envelope(
    builder: script::Builder,
    content_type: &str,
    content: &[u8],
) -> Result<script::Builder, EnvelopeBuildError> {
    let builder = builder.push_opcode(OP_FALSE).push_opcode(OP_IF);
    let builder = builder.push_slice(to_push_bytes("marker", ORD_MARKER)?);

    let builder = builder
        .push_opcode(OP_PUSHNUM_1)
        .push_slice(to_push_bytes("content type", content_type.as_bytes())?);

    let builder = builder
        .push_opcode(OP_0)
        .push_slice(to_push_bytes("content", content)?);

    Ok(builder.push_opcode(OP_ENDIF))
}

fn to_push_bytes(field: &'static str, data: &[u8]) -> Result<PushBytesBuf, EnvelopeBuildError> {
    PushBytesBuf::try_from(data.to_vec()).map_err(|_| EnvelopeBuildError::PushTooLarge {
        field,
        len: data.len(),
    })
}
