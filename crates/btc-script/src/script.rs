//! The `Script` byte string and its token compiler.
//!
//! Scripts are kept as raw bytes and only tokenized on demand, so a script
//! with a truncated push can still be stored, hashed and re-serialized.

use std::fmt;

use crate::chunk::{decode_script, push_data_prefix, ScriptChunk};
use crate::opcodes::*;
use crate::script_num;
use crate::ScriptError;

/// One element of a script to be compiled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptToken {
    /// A bare opcode, emitted as-is.
    Op(u8),
    /// A data push, emitted with the minimal push encoding.
    Push(Vec<u8>),
    /// A number, emitted as a small-integer opcode or a minimal script-number push.
    Num(i64),
}

/// Raw script bytes. `Display` and `Debug` print hex.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Script(Vec<u8>);

impl Script {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    pub fn new() -> Self {
        Script(Vec::new())
    }

    /// Decode hex into a script without tokenizing it.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        let bytes = hex::decode(hex_str).map_err(|e| ScriptError::InvalidHex(e.to_string()))?;
        Ok(Script(bytes))
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }

    /// Compile a token sequence into a script.
    ///
    /// Data pushes use the minimal encoding: an empty push becomes `OP_0`,
    /// a single byte `1..=16` becomes `OP_1..OP_16`, `0x81` becomes
    /// `OP_1NEGATE`, and anything else gets the shortest length prefix.
    /// Numbers are first encoded as script numbers and then pushed the same way.
    ///
    /// # Arguments
    /// * `tokens` - The opcodes, pushes and numbers in order.
    ///
    /// # Returns
    /// The compiled `Script`, or an error if a push is too large or an
    /// `Op` token carries a push opcode.
    pub fn compile(tokens: &[ScriptToken]) -> Result<Self, ScriptError> {
        let mut script = Script::new();
        for token in tokens {
            match token {
                ScriptToken::Op(op) => script.append_opcodes(&[*op])?,
                ScriptToken::Push(data) => script.append_minimal_push(data)?,
                ScriptToken::Num(n) => script.append_minimal_push(&script_num::encode(*n))?,
            }
        }
        Ok(script)
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Space-separated opcode names and push hex, for logs.
    ///
    /// A script that does not tokenize renders as the empty string.
    pub fn to_asm(&self) -> String {
        match self.chunks() {
            Ok(chunks) => chunks
                .iter()
                .map(ScriptChunk::to_asm_string)
                .collect::<Vec<_>>()
                .join(" "),
            Err(_) => String::new(),
        }
    }

    pub fn to_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    // -----------------------------------------------------------------------
    // Script classification
    // -----------------------------------------------------------------------

    /// `OP_DUP OP_HASH160 <20> OP_EQUALVERIFY OP_CHECKSIG`
    pub fn is_p2pkh(&self) -> bool {
        let b = &self.0;
        b.len() == 25
            && b[0] == OP_DUP
            && b[1] == OP_HASH160
            && b[2] == OP_DATA_20
            && b[23] == OP_EQUALVERIFY
            && b[24] == OP_CHECKSIG
    }

    /// `OP_0 <20>`
    pub fn is_p2wpkh(&self) -> bool {
        let b = &self.0;
        b.len() == 22 && b[0] == OP_0 && b[1] == OP_DATA_20
    }

    /// `OP_0 <32>`
    pub fn is_p2wsh(&self) -> bool {
        let b = &self.0;
        b.len() == 34 && b[0] == OP_0 && b[1] == OP_DATA_32
    }

    // -----------------------------------------------------------------------
    // Parsing
    // -----------------------------------------------------------------------

    /// Tokenize into chunks. Fails on a truncated push.
    pub fn chunks(&self) -> Result<Vec<ScriptChunk>, ScriptError> {
        decode_script(&self.0)
    }

    /// Return a copy of the script with every OP_CODESEPARATOR opcode removed.
    ///
    /// Only opcodes are removed; a `0xab` byte inside pushed data is kept.
    /// If the script ends in a truncated push, the unparsable tail is copied
    /// unchanged.
    pub fn remove_codeseparators(&self) -> Script {
        let b = &self.0;
        let mut out = Vec::with_capacity(b.len());
        let mut pos = 0;
        while pos < b.len() {
            match op_span(b, pos) {
                Some(len) => {
                    if !(len == 1 && b[pos] == OP_CODESEPARATOR) {
                        out.extend_from_slice(&b[pos..pos + len]);
                    }
                    pos += len;
                }
                None => {
                    out.extend_from_slice(&b[pos..]);
                    break;
                }
            }
        }
        Script(out)
    }

    // -----------------------------------------------------------------------
    // Mutation / building
    // -----------------------------------------------------------------------

    /// Push `data` behind its shortest length prefix.
    ///
    /// Signatures and keys are pushed this way. Unlike `compile`, a single
    /// byte 1..=16 stays a one-byte push rather than becoming OP_N.
    pub fn append_push_data(&mut self, data: &[u8]) -> Result<(), ScriptError> {
        let prefix = push_data_prefix(data.len())?;
        self.0.extend_from_slice(&prefix);
        self.0.extend_from_slice(data);
        Ok(())
    }

    /// Append non-push opcodes.
    ///
    /// # Returns
    /// `InvalidOpcodeType` if any byte is OP_DATA_1..=OP_PUSHDATA4, in which
    /// case nothing is appended.
    pub fn append_opcodes(&mut self, opcodes: &[u8]) -> Result<(), ScriptError> {
        if let Some(&op) = opcodes
            .iter()
            .find(|&&op| (OP_DATA_1..=OP_PUSHDATA4).contains(&op))
        {
            return Err(ScriptError::InvalidOpcodeType(opcode_to_string(op)));
        }
        self.0.extend_from_slice(opcodes);
        Ok(())
    }

    /// Push `data` using the minimal-push rule.
    fn append_minimal_push(&mut self, data: &[u8]) -> Result<(), ScriptError> {
        match data {
            [] => self.0.push(OP_0),
            [n @ 1..=16] => self.0.push(OP_1 + n - 1),
            [0x81] => self.0.push(OP_1NEGATE),
            _ => self.append_push_data(data)?,
        }
        Ok(())
    }
}

/// Length of the operation starting at `pos`, or `None` if its push is truncated.
fn op_span(b: &[u8], pos: usize) -> Option<usize> {
    let op = b[pos];
    let (header, len) = match op {
        OP_DATA_1..=OP_DATA_75 => (1usize, op as usize),
        OP_PUSHDATA1 => (2, *b.get(pos + 1)? as usize),
        OP_PUSHDATA2 => {
            let raw = b.get(pos + 1..pos + 3)?;
            (3, u16::from_le_bytes([raw[0], raw[1]]) as usize)
        }
        OP_PUSHDATA4 => {
            let raw = b.get(pos + 1..pos + 5)?;
            (5, u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize)
        }
        _ => return Some(1),
    };
    let span = header.checked_add(len)?;
    if pos.checked_add(span)? > b.len() {
        return None;
    }
    Some(span)
}

impl Default for Script {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}
