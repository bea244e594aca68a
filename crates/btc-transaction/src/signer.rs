//! Legacy input signing.
//!
//! Produces the scriptSig-ready signature: strict DER followed by the
//! one-byte sighash type.

use btc_primitives::ec::{PrivateKey, Signature};
use btc_script::Script;
use tracing::debug;

use crate::sighash::{check_sighash_type, legacy_signature_hash};
use crate::transaction::Transaction;
use crate::TransactionError;

/// Encode a signature as DER with the sighash type byte appended.
///
/// # Returns
/// `DER(sig) || sighash_type`, or `InvalidSighashType` when the type is not
/// a valid one-byte sighash type.
pub fn encode_signature(sig: &Signature, sighash_type: u32) -> Result<Vec<u8>, TransactionError> {
    check_sighash_type(sighash_type)?;
    let type_byte = u8::try_from(sighash_type)
        .map_err(|_| TransactionError::InvalidSighashType(sighash_type))?;

    let der = sig.to_der();
    let mut out = Vec::with_capacity(der.len() + 1);
    out.extend_from_slice(&der);
    out.push(type_byte);
    Ok(out)
}

/// Sign one input of `tx` under the legacy sighash algorithm.
///
/// The transaction is only borrowed; scripts already installed on other
/// inputs do not affect the digest.
///
/// # Arguments
/// * `tx` - The transaction being signed.
/// * `input_index` - Index of the input to sign.
/// * `prev_script` - Locking script of the output being spent.
/// * `private_key` - Signing key.
/// * `sighash_type` - Sighash type to commit to and append.
///
/// # Returns
/// `DER(sig) || sighash_type`.
pub fn sign_legacy_input(
    tx: &Transaction,
    input_index: usize,
    prev_script: &Script,
    private_key: &PrivateKey,
    sighash_type: u32,
) -> Result<Vec<u8>, TransactionError> {
    let digest = legacy_signature_hash(tx, input_index, prev_script, sighash_type)?;
    let signature = private_key.sign(&digest)?;
    let encoded = encode_signature(&signature, sighash_type)?;
    debug!(
        input_index,
        signature = %hex::encode(&encoded),
        "signed legacy input"
    );
    Ok(encoded)
}
