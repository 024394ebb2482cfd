use bitcoin::{
    Opcode, Script,
    opcodes::all::{OP_PUSHBYTES_0, OP_PUSHDATA4},
    script::Instruction,
};

/// One opcode of a script together with the data it pushes, if any.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ScriptChunk<'s> {
    offset: usize,
    opcode: Opcode,
    data: Option<&'s [u8]>,
}

impl<'s> ScriptChunk<'s> {
    /// Byte offset of the opcode within the script.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The opcode byte.
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Bytes pushed by a push opcode.  `OP_0` pushes the empty slice.
    pub fn push_bytes(&self) -> Option<&'s [u8]> {
        self.data
    }

    /// Whether this is a push opcode carrying data bytes
    /// (`OP_PUSHBYTES_1` through `OP_PUSHDATA4`).  `OP_0` is not.
    pub fn is_data_push(&self) -> bool {
        let code = self.opcode.to_u8();
        code > OP_PUSHBYTES_0.to_u8() && code <= OP_PUSHDATA4.to_u8()
    }
}

/// Iterates the chunks of a script.
///
/// Stops at the first instruction that can't be decoded, such as a push
/// running past the end of the script.
pub fn script_chunks(script: &Script) -> impl Iterator<Item = ScriptChunk<'_>> {
    let bytes = script.as_bytes();
    script.instruction_indices().map_while(move |res| {
        let (offset, ins) = res.ok()?;
        let opcode = Opcode::from(*bytes.get(offset)?);
        let data = match ins {
            Instruction::PushBytes(pb) => Some(pb.as_bytes()),
            Instruction::Op(_) => None,
        };
        Some(ScriptChunk {
            offset,
            opcode,
            data,
        })
    })
}

#[cfg(test)]
mod tests {
    use bitcoin::opcodes::all::{OP_CHECKSIG, OP_PUSHBYTES_2, OP_PUSHDATA1, OP_PUSHNUM_1};

    use super::*;

    #[test]
    fn test_chunk_kinds() {
        // OP_0, PUSHBYTES_2 aabb, OP_1, PUSHDATA1 0 (empty but explicit), OP_CHECKSIG
        let script = Script::from_bytes(&[0x00, 0x02, 0xaa, 0xbb, 0x51, 0x4c, 0x00, 0xac]);
        let chunks: Vec<_> = script_chunks(script).collect();

        assert_eq!(chunks.len(), 5);

        assert_eq!(chunks[0].opcode(), OP_PUSHBYTES_0);
        assert_eq!(chunks[0].push_bytes(), Some(&[][..]));
        assert!(!chunks[0].is_data_push());

        assert_eq!(chunks[1].opcode(), OP_PUSHBYTES_2);
        assert_eq!(chunks[1].offset(), 1);
        assert_eq!(chunks[1].push_bytes(), Some(&[0xaa, 0xbb][..]));
        assert!(chunks[1].is_data_push());

        assert_eq!(chunks[2].opcode(), OP_PUSHNUM_1);
        assert_eq!(chunks[2].push_bytes(), None);
        assert!(!chunks[2].is_data_push());

        assert_eq!(chunks[3].opcode(), OP_PUSHDATA1);
        assert!(chunks[3].is_data_push());

        assert_eq!(chunks[4].opcode(), OP_CHECKSIG);
        assert_eq!(chunks[4].offset(), 7);
    }

    #[test]
    fn test_stops_at_truncated_push() {
        let script = Script::from_bytes(&[0x51, 0x05, 0x01]);
        let chunks: Vec<_> = script_chunks(script).collect();
        assert_eq!(chunks.len(), 1);
    }
}
