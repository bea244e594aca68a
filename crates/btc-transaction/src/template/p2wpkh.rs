//! Pay-to-Witness-Public-Key-Hash (version 0) output template.

use btc_primitives::hash::hash160;
use btc_script::opcodes::OP_0;
use btc_script::{Script, ScriptToken};

use crate::output::TransactionOutput;
use crate::template::check_pubkey_encoding;
use crate::TransactionError;

/// Create a P2WPKH locking script: `OP_0 <hash160(pubkey)>`.
///
/// # Returns
/// The 22-byte script, or `InvalidKeyLength` for a malformed key.
pub fn lock(pubkey: &[u8]) -> Result<Script, TransactionError> {
    check_pubkey_encoding(pubkey)?;
    Ok(Script::compile(&[
        ScriptToken::Op(OP_0),
        ScriptToken::Push(hash160(pubkey).to_vec()),
    ])?)
}

/// Create an output paying `satoshis` to the P2WPKH script of `pubkey`.
pub fn output(pubkey: &[u8], satoshis: u64) -> Result<TransactionOutput, TransactionError> {
    Ok(TransactionOutput::new(satoshis, lock(pubkey)?))
}
