//! Output scripts for P2PKH, P2WPKH, P2WSH and m-of-n multisig, and the
//! P2PKH unlocker.

pub mod multisig;
pub mod p2pkh;
pub mod p2wpkh;
pub mod p2wsh;

use btc_script::Script;

use crate::transaction::Transaction;
use crate::TransactionError;

/// Something that can fill in the scriptSig of one input.
///
/// Implementations compute the sighash themselves, so `tx` must already
/// hold every input and output that the signature commits to.
pub trait UnlockingScriptTemplate {
    /// Build the scriptSig for input `input_index` of `tx`.
    fn sign(&self, tx: &Transaction, input_index: u32) -> Result<Script, TransactionError>;

    /// Upper bound on the scriptSig size, for fee estimates before signing.
    fn estimate_length(&self, tx: &Transaction, input_index: u32) -> u32;
}

/// Check that `pubkey` has a SEC1 length and prefix.
///
/// Accepts 33 bytes starting with `0x02`/`0x03` or 65 bytes starting with
/// `0x04`. Does not check that the point is on the curve.
pub(crate) fn check_pubkey_encoding(pubkey: &[u8]) -> Result<(), TransactionError> {
    match (pubkey.len(), pubkey.first()) {
        (33, Some(0x02 | 0x03)) | (65, Some(0x04)) => Ok(()),
        (len, _) => Err(TransactionError::InvalidKeyLength(len)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_pubkey_encoding() {
        assert!(check_pubkey_encoding(&[0x02; 33]).is_ok());
        assert!(check_pubkey_encoding(&[0x04; 65]).is_ok());
        assert!(matches!(
            check_pubkey_encoding(&[0x04; 33]),
            Err(TransactionError::InvalidKeyLength(33))
        ));
        assert!(matches!(
            check_pubkey_encoding(&[0x02; 32]),
            Err(TransactionError::InvalidKeyLength(32))
        ));
        assert!(matches!(
            check_pubkey_encoding(&[]),
            Err(TransactionError::InvalidKeyLength(0))
        ));
    }
}
