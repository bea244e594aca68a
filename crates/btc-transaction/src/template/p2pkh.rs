//! Pay-to-Public-Key-Hash (P2PKH) script template.
//!
//! Creates standard P2PKH locking scripts (`OP_DUP OP_HASH160 <hash>
//! OP_EQUALVERIFY OP_CHECKSIG`) and unlocking scripts (`<sig> <pubkey>`).

use btc_primitives::ec::PrivateKey;
use btc_primitives::hash::hash160;
use btc_script::opcodes::*;
use btc_script::{Script, ScriptToken};

use crate::output::TransactionOutput;
use crate::sighash::SIGHASH_ALL;
use crate::signer::sign_legacy_input;
use crate::template::{check_pubkey_encoding, UnlockingScriptTemplate};
use crate::transaction::Transaction;
use crate::TransactionError;

/// Upper bound of a low-S P2PKH scriptSig with a compressed key:
/// push(71-byte DER + type) + push(33-byte key).
const UNLOCKING_SCRIPT_MAX_LEN: u32 = 1 + 72 + 1 + 33;

/// Create a P2PKH locking script for a public key.
///
/// Produces: `OP_DUP OP_HASH160 <hash160(pubkey)> OP_EQUALVERIFY OP_CHECKSIG`
///
/// # Arguments
/// * `pubkey` - SEC1 public key, compressed or uncompressed.
///
/// # Returns
/// `Ok(Script)` containing the 25-byte locking script, or
/// `InvalidKeyLength` if the key encoding is malformed.
pub fn lock(pubkey: &[u8]) -> Result<Script, TransactionError> {
    check_pubkey_encoding(pubkey)?;
    Ok(Script::compile(&[
        ScriptToken::Op(OP_DUP),
        ScriptToken::Op(OP_HASH160),
        ScriptToken::Push(hash160(pubkey).to_vec()),
        ScriptToken::Op(OP_EQUALVERIFY),
        ScriptToken::Op(OP_CHECKSIG),
    ])?)
}

/// Create an output paying `satoshis` to the P2PKH script of `pubkey`.
pub fn output(pubkey: &[u8], satoshis: u64) -> Result<TransactionOutput, TransactionError> {
    Ok(TransactionOutput::new(satoshis, lock(pubkey)?))
}

/// Create a P2PKH unlocker for signing transaction inputs.
///
/// # Arguments
/// * `private_key` - The private key used to sign.
/// * `sighash_type` - Optional sighash type. Defaults to `SIGHASH_ALL`.
///
/// # Returns
/// A `P2PKH` instance implementing `UnlockingScriptTemplate`.
pub fn unlock(private_key: PrivateKey, sighash_type: Option<u32>) -> P2PKH {
    P2PKH {
        private_key,
        sighash_type: sighash_type.unwrap_or(SIGHASH_ALL),
    }
}

/// P2PKH signing template holding a private key and sighash type.
///
/// Implements `UnlockingScriptTemplate` to produce unlocking scripts
/// of the form `<DER_signature + sighash_byte> <compressed_pubkey>`.
pub struct P2PKH {
    private_key: PrivateKey,
    sighash_type: u32,
}

impl P2PKH {
    /// The locking script this template can spend.
    pub fn locking_script(&self) -> Result<Script, TransactionError> {
        lock(&self.private_key.pub_key().to_compressed())
    }
}

impl UnlockingScriptTemplate for P2PKH {
    /// Sign the specified input and produce the unlocking script.
    ///
    /// The script committed to is the P2PKH script of this template's key.
    /// When the input carries its source output, that output's script must
    /// be the same script.
    ///
    /// # Returns
    /// `Ok(Script)` containing `<DER_sig || sighash_byte> <compressed_pubkey>`,
    /// or `SigningError` if the source output is locked to something else.
    fn sign(&self, tx: &Transaction, input_index: u32) -> Result<Script, TransactionError> {
        let idx = input_index as usize;
        let input = tx.input(idx)?;

        let locking_script = self.locking_script()?;
        if let Some(source) = input.source_output() {
            if source.script != locking_script {
                return Err(TransactionError::SigningError(format!(
                    "input {} spends script {} which is not the P2PKH script of the signing key",
                    idx, source.script
                )));
            }
        }

        let sig_buf = sign_legacy_input(
            tx,
            idx,
            &locking_script,
            &self.private_key,
            self.sighash_type,
        )?;
        let pub_key_bytes = self.private_key.pub_key().to_compressed();

        // Build the unlocking script: PUSHDATA(sig) PUSHDATA(pubkey).
        let mut script = Script::new();
        script.append_push_data(&sig_buf)?;
        script.append_push_data(&pub_key_bytes)?;

        Ok(script)
    }

    /// Upper bound of the P2PKH unlocking script length (107 bytes).
    fn estimate_length(&self, _tx: &Transaction, _input_index: u32) -> u32 {
        UNLOCKING_SCRIPT_MAX_LEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::TransactionInput;

    const FUNDING_PUBKEY: &str =
        "03535b32d5eb0a6ed0982a0479bbadc9868d9836f6ba94dd5a63be16d875069184";

    #[test]
    fn test_lock() {
        let pubkey = hex::decode(FUNDING_PUBKEY).unwrap();
        let script = lock(&pubkey).unwrap();
        assert_eq!(
            script.to_hex(),
            "76a9143ca33c2e4446f4a305f23c80df8ad1afdcf652f988ac"
        );
        assert!(script.is_p2pkh());
    }

    #[test]
    fn test_lock_invalid_key() {
        assert!(matches!(
            lock(&[0x02; 20]),
            Err(TransactionError::InvalidKeyLength(20))
        ));
    }

    #[test]
    fn test_sign_rejects_foreign_source_output() {
        let key = PrivateKey::from_hex(
            "6bd078650fcee8444e4e09825227b801a1ca928debb750eb36e6d56124bb20e8",
        )
        .unwrap();
        let mut tx = Transaction::new();
        let mut input = TransactionInput::new([7u8; 32], 0);
        input.set_source_output(Some(TransactionOutput::new(
            1000,
            Script::from_hex("76a914000000000000000000000000000000000000000088ac").unwrap(),
        )));
        tx.add_input(input);
        tx.add_output(output(&hex::decode(FUNDING_PUBKEY).unwrap(), 900).unwrap());

        let template = unlock(key, None);
        assert!(matches!(
            template.sign(&tx, 0),
            Err(TransactionError::SigningError(_))
        ));
        assert!(matches!(
            template.sign(&tx, 1),
            Err(TransactionError::InputIndexOutOfRange { index: 1, count: 1 })
        ));
    }

    #[test]
    fn test_sign_shape() {
        let key = PrivateKey::from_hex(
            "6bd078650fcee8444e4e09825227b801a1ca928debb750eb36e6d56124bb20e8",
        )
        .unwrap();
        let pubkey = key.pub_key().to_compressed();
        let mut tx = Transaction::new();
        let mut input = TransactionInput::new([7u8; 32], 3);
        input.set_source_output(Some(output(&pubkey, 5000).unwrap()));
        tx.add_input(input);
        tx.add_output(output(&pubkey, 4000).unwrap());

        let template = unlock(key, None);
        let script = template.sign(&tx, 0).unwrap();
        let chunks = script.chunks().unwrap();
        assert_eq!(chunks.len(), 2);
        let sig = chunks[0].data.as_ref().unwrap();
        assert_eq!(*sig.last().unwrap(), SIGHASH_ALL as u8);
        assert_eq!(chunks[1].data.as_deref(), Some(&pubkey[..]));
        assert!(script.len() as u32 <= template.estimate_length(&tx, 0));
    }
}
