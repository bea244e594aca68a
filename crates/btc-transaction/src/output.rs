//! Transaction output with a value and locking script.
//!
//! Provides binary deserialization following the Bitcoin wire format;
//! encoding goes through the shared field walk in `encode`.

use btc_primitives::util::ByteReader;
use btc_script::Script;

use crate::error::reading;
use crate::TransactionError;

/// An amount and the script that locks it.
///
/// # Wire format
///
/// | Field          | Size           |
/// |----------------|----------------|
/// | value          | 8 bytes (LE)   |
/// | script length  | VarInt         |
/// | script         | variable       |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionOutput {
    /// Satoshis.
    pub value: u64,

    /// scriptPubKey.
    pub script: Script,
}

impl TransactionOutput {
    /// Create an output paying `value` satoshis to `script`.
    pub fn new(value: u64, script: Script) -> Self {
        TransactionOutput { value, script }
    }

    /// Read one output.
    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let value = reader.read_u64_le().map_err(reading("value"))?;

        let script_bytes = reader.read_var_bytes().map_err(reading("locking script"))?;

        Ok(TransactionOutput {
            value,
            script: Script::from_bytes(script_bytes),
        })
    }
}
