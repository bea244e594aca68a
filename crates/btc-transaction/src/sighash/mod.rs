//! Legacy signature hash computation.
//!
//! Computes the digest that is signed by ECDSA to authorize spending a
//! transaction input under the original (pre-segwit) algorithm: the
//! transaction is re-serialized with the spent output's script in place of
//! the signing input's scriptSig, empty scripts on the other inputs, and the
//! 4-byte sighash type appended, then double-SHA256 hashed.
//!
//! The caller's transaction is never modified. The substituted copy lives in
//! a `PreimageView`.

use btc_primitives::hash::sha256d;
use btc_primitives::util::ByteWriter;
use btc_script::Script;
use tracing::debug;

use crate::encode::write_fields;
use crate::input::TransactionInput;
use crate::output::TransactionOutput;
use crate::transaction::Transaction;
use crate::TransactionError;

// -----------------------------------------------------------------------
// Sighash flag constants
// -----------------------------------------------------------------------

/// Sign all inputs and all outputs (the default).
pub const SIGHASH_ALL: u32 = 0x01;

/// Sign all inputs but no outputs, allowing outputs to be modified.
pub const SIGHASH_NONE: u32 = 0x02;

/// Sign all inputs and only the output with the same index as the signed input.
pub const SIGHASH_SINGLE: u32 = 0x03;

/// Combined with another flag: only sign the current input, allowing other
/// inputs to be added later.
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;

/// Mask applied to extract the base sighash type (ALL, NONE, SINGLE).
pub const SIGHASH_BASE_MASK: u32 = 0x7f;

/// Digest returned for SIGHASH_SINGLE when the input has no matching output:
/// the little-endian integer one.
pub const SIGHASH_SINGLE_NO_OUTPUT: [u8; 32] = {
    let mut one = [0u8; 32];
    one[0] = 0x01;
    one
};

/// Check that `sighash_type` is ALL, NONE or SINGLE, optionally with
/// ANYONECANPAY.
///
/// Only the ANYONECANPAY bit is masked off, so any other high bit is
/// rejected and a valid type always fits the appended signature byte.
///
/// # Returns
/// `Ok(())`, or `InvalidSighashType` carrying the rejected value.
pub fn check_sighash_type(sighash_type: u32) -> Result<(), TransactionError> {
    match sighash_type & !SIGHASH_ANYONECANPAY {
        SIGHASH_ALL | SIGHASH_NONE | SIGHASH_SINGLE => Ok(()),
        _ => Err(TransactionError::InvalidSighashType(sighash_type)),
    }
}

// -----------------------------------------------------------------------
// Preimage view
// -----------------------------------------------------------------------

/// An owned copy of a transaction prepared for legacy signature hashing.
///
/// Built from a borrowed transaction; the original is left untouched.
#[derive(Clone, Debug)]
pub struct PreimageView {
    tx: Transaction,
    sighash_type: u32,
}

impl PreimageView {
    /// Build the view for signing `input_index` against `prev_script`.
    ///
    /// The signing input gets `prev_script` with every OP_CODESEPARATOR
    /// opcode removed; other inputs get empty scripts. The base type then
    /// shapes the copy:
    /// - NONE drops all outputs and zeroes the other inputs' sequences.
    /// - SINGLE keeps outputs up to `input_index`, blanks the earlier ones
    ///   (value `u64::MAX`, empty script) and zeroes other sequences.
    /// - ANYONECANPAY keeps only the signing input.
    ///
    /// # Arguments
    /// * `tx` - The transaction being signed.
    /// * `input_index` - Index of the input being signed.
    /// * `prev_script` - Locking script of the output being spent.
    /// * `sighash_type` - Full sighash type, including ANYONECANPAY.
    ///
    /// # Returns
    /// The view, `InputIndexOutOfRange`, `InvalidSighashType`, or
    /// `InvalidTransaction` for SINGLE without a matching output.
    pub fn new(
        tx: &Transaction,
        input_index: usize,
        prev_script: &Script,
        sighash_type: u32,
    ) -> Result<Self, TransactionError> {
        tx.input(input_index)?;
        check_sighash_type(sighash_type)?;

        let base = sighash_type & SIGHASH_BASE_MASK;
        let anyone_can_pay = sighash_type & SIGHASH_ANYONECANPAY != 0;

        if base == SIGHASH_SINGLE && input_index >= tx.outputs.len() {
            return Err(TransactionError::InvalidTransaction(format!(
                "SIGHASH_SINGLE input {} has no matching output (tx has {} outputs)",
                input_index,
                tx.outputs.len()
            )));
        }

        let script_code = prev_script.remove_codeseparators();

        let inputs: Vec<TransactionInput> = tx
            .inputs
            .iter()
            .enumerate()
            .filter(|(j, _)| !anyone_can_pay || *j == input_index)
            .map(|(j, original)| {
                let mut input =
                    TransactionInput::new(original.prev_tx_hash, original.prev_output_index);
                input.sequence = original.sequence;
                if j == input_index {
                    input.script = script_code.clone();
                } else if base == SIGHASH_NONE || base == SIGHASH_SINGLE {
                    input.sequence = 0;
                }
                input
            })
            .collect();

        let outputs: Vec<TransactionOutput> = match base {
            SIGHASH_NONE => Vec::new(),
            SIGHASH_SINGLE => tx.outputs[..=input_index]
                .iter()
                .enumerate()
                .map(|(j, output)| {
                    if j == input_index {
                        output.clone()
                    } else {
                        TransactionOutput::new(u64::MAX, Script::new())
                    }
                })
                .collect(),
            _ => tx.outputs.clone(),
        };

        Ok(PreimageView {
            tx: Transaction {
                version: tx.version,
                inputs,
                outputs,
                lock_time: tx.lock_time,
            },
            sighash_type,
        })
    }

    /// The substituted transaction copy.
    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    /// The sighash type appended to the preimage.
    pub fn sighash_type(&self) -> u32 {
        self.sighash_type
    }

    /// Length of the preimage: the copy's size plus the 4-byte type.
    pub fn size(&self) -> usize {
        self.tx.size() + 4
    }

    /// Serialize the preimage.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        let mut writer = ByteWriter::with_capacity(self.size());
        write_fields(&mut writer, &self.tx);
        writer.write_u32_le(self.sighash_type);
        if writer.len() != self.size() {
            return Err(TransactionError::SerializationError(format!(
                "preimage is {} bytes, expected {}",
                writer.len(),
                self.size()
            )));
        }
        Ok(writer.into_bytes())
    }
}

// -----------------------------------------------------------------------
// Legacy signature hash
// -----------------------------------------------------------------------

/// Compute the raw legacy preimage for an input.
///
/// # Returns
/// The bytes that `legacy_signature_hash` double-hashes. Fails where
/// `PreimageView::new` fails.
pub fn legacy_preimage(
    tx: &Transaction,
    input_index: usize,
    prev_script: &Script,
    sighash_type: u32,
) -> Result<Vec<u8>, TransactionError> {
    PreimageView::new(tx, input_index, prev_script, sighash_type)?.to_bytes()
}

/// Compute the legacy signature hash for a given input.
///
/// # Arguments
/// * `tx`           - The transaction being signed.
/// * `input_index`  - Index of the input being signed.
/// * `prev_script`  - The locking script of the output being spent.
/// * `sighash_type` - The sighash type (e.g. `SIGHASH_ALL`).
///
/// # Returns
/// A 32-byte double-SHA256 digest to be signed by ECDSA. For SINGLE with
/// no output at `input_index` this is `SIGHASH_SINGLE_NO_OUTPUT`.
pub fn legacy_signature_hash(
    tx: &Transaction,
    input_index: usize,
    prev_script: &Script,
    sighash_type: u32,
) -> Result<[u8; 32], TransactionError> {
    tx.input(input_index)?;
    check_sighash_type(sighash_type)?;

    if sighash_type & SIGHASH_BASE_MASK == SIGHASH_SINGLE && input_index >= tx.outputs.len() {
        debug!(input_index, "SIGHASH_SINGLE without matching output, using constant digest");
        return Ok(SIGHASH_SINGLE_NO_OUTPUT);
    }

    let preimage = legacy_preimage(tx, input_index, prev_script, sighash_type)?;
    let digest = sha256d(&preimage);
    debug!(
        input_index,
        sighash_type,
        preimage_len = preimage.len(),
        digest = %hex::encode(digest),
        "computed legacy sighash"
    );
    Ok(digest)
}
