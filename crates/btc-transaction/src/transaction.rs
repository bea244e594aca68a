//! Core transaction type.
//!
//! Represents a legacy (non-witness) transaction with version, inputs,
//! outputs and lock time. Supports binary and hex serialization into
//! exactly-sized buffers, decoding, and transaction ID computation.

use btc_primitives::chainhash::ChainHash;
use btc_primitives::hash::sha256d;
use btc_primitives::util::ByteReader;

use crate::encode::{write_fields, SizeCounter, SliceWriter};
use crate::input::TransactionInput;
use crate::output::TransactionOutput;
use crate::size::calc_tx_bytes;
use crate::error::reading;
use crate::TransactionError;

/// Version used by `Transaction::new`.
pub const DEFAULT_VERSION: i32 = 2;

/// A legacy transaction.
///
/// There is no witness section, even when outputs are segwit-shaped. On the
/// wire the fields appear in declaration order, with a compact-size count
/// before each list. `version` is signed, and every fixed-width field is
/// little-endian.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub version: i32,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    /// Block height (below 500,000,000) or Unix time before which the
    /// transaction cannot be mined. Zero disables it.
    pub lock_time: u32,
}

impl Transaction {
    /// An empty transaction with `DEFAULT_VERSION` and lock time 0.
    pub fn new() -> Self {
        Transaction {
            version: DEFAULT_VERSION,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: 0,
        }
    }

    // -----------------------------------------------------------------
    // Deserialization
    // -----------------------------------------------------------------

    /// Hex form of `from_bytes`.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str).map_err(|e| {
            TransactionError::SerializationError(format!("invalid hex: {}", e))
        })?;
        Self::from_bytes(&bytes)
    }

    /// Decode a transaction that spans all of `bytes`.
    ///
    /// # Returns
    /// `SerializationError` naming the field that ran short, or the count
    /// of leftover bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = ByteReader::new(bytes);
        let tx = Self::read_from(&mut reader)?;
        if reader.remaining() != 0 {
            return Err(TransactionError::SerializationError(format!(
                "trailing {} bytes after transaction",
                reader.remaining()
            )));
        }
        Ok(tx)
    }

    /// Read one legacy transaction and stop, leaving anything after it in
    /// `reader`. A zero input count means zero inputs; there is no segwit
    /// marker to look for.
    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let version = reader.read_i32_le().map_err(reading("version"))?;

        let input_count = reader.read_varint().map_err(reading("input count"))?;

        // Each input is at least 41 bytes; cap the preallocation by what is left.
        let mut inputs = Vec::with_capacity(capacity_hint(input_count.value(), reader, 41));
        for _ in 0..input_count.value() {
            inputs.push(TransactionInput::read_from(reader)?);
        }

        let output_count = reader.read_varint().map_err(reading("output count"))?;

        let mut outputs = Vec::with_capacity(capacity_hint(output_count.value(), reader, 9));
        for _ in 0..output_count.value() {
            outputs.push(TransactionOutput::read_from(reader)?);
        }

        let lock_time = reader.read_u32_le().map_err(reading("lock time"))?;

        Ok(Transaction {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    // -----------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------

    /// Return the legacy serialized size of this transaction in bytes.
    ///
    /// Recomputed on every call.
    pub fn size(&self) -> usize {
        calc_tx_bytes(&self.inputs, &self.outputs)
    }

    /// Encode this transaction into `buf`.
    ///
    /// Nothing is written unless `buf` can hold the whole transaction;
    /// extra space after the encoding is left untouched.
    ///
    /// # Arguments
    /// * `buf` - Destination buffer of at least `size()` bytes.
    ///
    /// # Returns
    /// The number of bytes written, or `BufferTooSmall` if `buf` is shorter
    /// than `size()`.
    pub fn encode_into(&self, buf: &mut [u8]) -> Result<usize, TransactionError> {
        let needed = self.size();
        if buf.len() < needed {
            return Err(TransactionError::BufferTooSmall {
                needed,
                available: buf.len(),
            });
        }

        let mut writer = SliceWriter::new(&mut buf[..needed]);
        write_fields(&mut writer, self);
        if writer.overflowed() || writer.written() != needed {
            return Err(TransactionError::SerializationError(format!(
                "encoded {} bytes, expected {}",
                writer.written(),
                needed
            )));
        }
        Ok(needed)
    }

    /// The wire encoding, allocated at exactly `size()` bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        let mut buf = vec![0u8; self.size()];
        self.encode_into(&mut buf)?;
        Ok(buf)
    }

    /// Lowercase hex of `to_bytes`.
    pub fn to_hex(&self) -> Result<String, TransactionError> {
        Ok(hex::encode(self.to_bytes()?))
    }

    /// Count the bytes of the field walk without writing them.
    pub fn walked_size(&self) -> usize {
        let mut counter = SizeCounter::new();
        write_fields(&mut counter, self);
        counter.total()
    }

    // -----------------------------------------------------------------
    // Transaction ID
    // -----------------------------------------------------------------

    /// sha256d of the encoding, in internal order. `tx_id_hex` gives the
    /// reversed form that explorers show.
    pub fn tx_id(&self) -> Result<[u8; 32], TransactionError> {
        Ok(sha256d(&self.to_bytes()?))
    }

    pub fn tx_id_hex(&self) -> Result<String, TransactionError> {
        Ok(ChainHash::new(self.tx_id()?).to_string())
    }

    // -----------------------------------------------------------------
    // Builders
    // -----------------------------------------------------------------

    pub fn add_input(&mut self, input: TransactionInput) {
        self.inputs.push(input);
    }

    pub fn add_output(&mut self, output: TransactionOutput) {
        self.outputs.push(output);
    }

    /// Sum of output values, or `None` if it overflows.
    pub fn total_output_value(&self) -> Option<u64> {
        self.outputs
            .iter()
            .try_fold(0u64, |acc, o| acc.checked_add(o.value))
    }

    /// Return the input at `index`, or `InputIndexOutOfRange`.
    pub fn input(&self, index: usize) -> Result<&TransactionInput, TransactionError> {
        self.inputs
            .get(index)
            .ok_or(TransactionError::InputIndexOutOfRange {
                index,
                count: self.inputs.len(),
            })
    }
}

/// Bound a declared element count by the bytes actually available.
fn capacity_hint(declared: u64, reader: &ByteReader, min_element_len: usize) -> usize {
    let available = reader.remaining() / min_element_len;
    usize::try_from(declared).map_or(available, |d| d.min(available))
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}
