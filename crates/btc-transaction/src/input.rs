//! Inputs: a reference to a previous output plus the script that unlocks
//! it.

use btc_primitives::chainhash::ChainHash;
use btc_primitives::util::ByteReader;
use btc_script::Script;

use crate::output::TransactionOutput;
use crate::error::reading;
use crate::TransactionError;

/// Final sequence number. Disables lock time and relative lock time for the input.
pub const DEFAULT_SEQUENCE_NUMBER: u32 = 0xFFFF_FFFF;

/// One input of a transaction.
///
/// Encoded as the 32-byte hash, the u32 LE index, the script with a
/// compact-size length, then the u32 LE sequence. `script` is empty until
/// the input is signed.
///
/// `set_source_output` attaches the output being spent. Templates check the
/// signing key against it. It is never encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionInput {
    /// Internal byte order, i.e. the txid reversed.
    pub prev_tx_hash: [u8; 32],
    pub prev_output_index: u32,
    /// scriptSig.
    pub script: Script,
    pub sequence: u32,

    source_output: Option<TransactionOutput>,
}

impl TransactionInput {
    /// Create an unsigned input spending `prev_output_index` of `prev_tx_hash`.
    ///
    /// # Arguments
    /// * `prev_tx_hash` - Previous transaction hash in internal byte order.
    /// * `prev_output_index` - Output index being spent.
    pub fn new(prev_tx_hash: [u8; 32], prev_output_index: u32) -> Self {
        TransactionInput {
            prev_tx_hash,
            prev_output_index,
            script: Script::new(),
            sequence: DEFAULT_SEQUENCE_NUMBER,
            source_output: None,
        }
    }

    /// Create an unsigned input from a display-order txid hex string.
    ///
    /// The txid is byte-reversed into internal order.
    ///
    /// # Arguments
    /// * `txid` - 64-character txid as shown by explorers and RPC.
    /// * `prev_output_index` - Output index being spent.
    ///
    /// # Returns
    /// The input, or an error if the txid is not 64 hex characters.
    pub fn from_txid_hex(txid: &str, prev_output_index: u32) -> Result<Self, TransactionError> {
        let hash = ChainHash::from_hex(txid)?;
        Ok(Self::new(*hash.as_bytes(), prev_output_index))
    }

    /// Return the previous txid in display (reversed) order.
    pub fn prev_txid_hex(&self) -> String {
        ChainHash::new(self.prev_tx_hash).to_string()
    }

    /// Read one input. The result has no source output attached.
    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let prev_tx_hash = reader.read_array::<32>().map_err(reading("previous tx hash"))?;

        let prev_output_index = reader.read_u32_le().map_err(reading("output index"))?;

        let script_bytes = reader.read_var_bytes().map_err(reading("input script"))?;

        let sequence = reader.read_u32_le().map_err(reading("sequence number"))?;

        Ok(TransactionInput {
            prev_tx_hash,
            prev_output_index,
            script: Script::from_bytes(script_bytes),
            sequence,
            source_output: None,
        })
    }

    /// Attach (or clear) the output this input spends.
    pub fn set_source_output(&mut self, output: Option<TransactionOutput>) {
        self.source_output = output;
    }

    /// The output this input spends, if one was attached.
    pub fn source_output(&self) -> Option<&TransactionOutput> {
        self.source_output.as_ref()
    }
}
