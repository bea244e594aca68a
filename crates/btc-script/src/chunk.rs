//! Tokenizing scripts into opcodes and pushes.
//!
//! Pushes keep the opcode they were read with, so a non-minimal push stays
//! distinguishable from its minimal form.

use btc_primitives::util::ByteReader;
use btc_primitives::PrimitivesError;

use crate::opcodes::*;
use crate::ScriptError;

/// One element of a script: a bare opcode, or a push with its payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptChunk {
    /// For OP_DATA_1..OP_DATA_75 this is also the payload length.
    pub op: u8,
    /// `Some` exactly when `op` is a push opcode.
    pub data: Option<Vec<u8>>,
}

impl ScriptChunk {
    /// Hex for a push, the opcode name otherwise.
    pub fn to_asm_string(&self) -> String {
        match &self.data {
            Some(data) => hex::encode(data),
            None => opcode_to_string(self.op),
        }
    }
}

/// Split raw script bytes into chunks.
///
/// Bytes after OP_RETURN are tokenized like any others.
///
/// # Returns
/// `DataTooSmall` if a push length or payload runs past the end.
pub fn decode_script(bytes: &[u8]) -> Result<Vec<ScriptChunk>, ScriptError> {
    let mut reader = ByteReader::new(bytes);
    let mut chunks = Vec::new();

    while reader.remaining() > 0 {
        let op = reader.read_u8().map_err(truncated)?;
        let len = match op {
            OP_DATA_1..=OP_DATA_75 => op as usize,
            OP_PUSHDATA1 => reader.read_u8().map_err(truncated)? as usize,
            OP_PUSHDATA2 => reader.read_u16_le().map_err(truncated)? as usize,
            OP_PUSHDATA4 => reader.read_u32_le().map_err(truncated)? as usize,
            _ => {
                chunks.push(ScriptChunk { op, data: None });
                continue;
            }
        };
        let data = reader.read_bytes(len).map_err(truncated)?;
        chunks.push(ScriptChunk { op, data: Some(data.to_vec()) });
    }

    Ok(chunks)
}

fn truncated(_: PrimitivesError) -> ScriptError {
    ScriptError::DataTooSmall
}

/// Length prefix for pushing `data_len` bytes: the length itself up to 75,
/// then OP_PUSHDATA1/2/4 with a little-endian length.
///
/// Small-integer opcodes are chosen by `Script::compile`, not here.
///
/// # Returns
/// `DataTooBig` past `u32::MAX` bytes.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ScriptError> {
    let prefix = match data_len {
        0..=75 => vec![data_len as u8],
        76..=0xff => vec![OP_PUSHDATA1, data_len as u8],
        0x100..=0xffff => [&[OP_PUSHDATA2][..], &(data_len as u16).to_le_bytes()[..]].concat(),
        _ => {
            let len = u32::try_from(data_len).map_err(|_| ScriptError::DataTooBig)?;
            [&[OP_PUSHDATA4][..], &len.to_le_bytes()[..]].concat()
        }
    };
    Ok(prefix)
}
