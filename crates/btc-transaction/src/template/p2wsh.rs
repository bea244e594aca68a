//! Pay-to-Witness-Script-Hash (version 0) output template.

use btc_primitives::hash::sha256;
use btc_script::opcodes::OP_0;
use btc_script::{Script, ScriptToken};

use crate::output::TransactionOutput;
use crate::TransactionError;

/// Consensus limit on script size.
pub const MAX_SCRIPT_SIZE: usize = 10_000;

/// Create a P2WSH locking script: `OP_0 <sha256(redeem_script)>`.
///
/// # Returns
/// The 34-byte script, or `InvalidScriptLength` if the redeem script is
/// empty or larger than `MAX_SCRIPT_SIZE`.
pub fn lock(redeem_script: &Script) -> Result<Script, TransactionError> {
    let len = redeem_script.len();
    if len == 0 || len > MAX_SCRIPT_SIZE {
        return Err(TransactionError::InvalidScriptLength(len));
    }
    Ok(Script::compile(&[
        ScriptToken::Op(OP_0),
        ScriptToken::Push(sha256(redeem_script.to_bytes()).to_vec()),
    ])?)
}

/// Create an output paying `satoshis` to the P2WSH script of `redeem_script`.
pub fn output(redeem_script: &Script, satoshis: u64) -> Result<TransactionOutput, TransactionError> {
    Ok(TransactionOutput::new(satoshis, lock(redeem_script)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_funding_redeem_script() {
        let redeem = Script::from_hex(
            "5221023da092f6980e58d2c037173180e9a465476026ee50f96695963e8efe436f54eb21030e9f7b623d2ccc7c9bd44d66d5ce21ce504c0acf6385a132cec6d3c39fa711c152ae",
        )
        .unwrap();
        let script = lock(&redeem).unwrap();
        assert_eq!(
            script.to_hex(),
            "0020c015c4a6be010e21657068fc2e6a9d02b27ebe4d490a25846f7237f104d1a3cd"
        );
        assert!(script.is_p2wsh());
    }

    #[test]
    fn test_lock_length_limits() {
        assert!(matches!(
            lock(&Script::new()),
            Err(TransactionError::InvalidScriptLength(0))
        ));
        assert!(lock(&Script::from_bytes(&vec![0x51; MAX_SCRIPT_SIZE])).is_ok());
        assert!(matches!(
            lock(&Script::from_bytes(&vec![0x51; MAX_SCRIPT_SIZE + 1])),
            Err(TransactionError::InvalidScriptLength(10_001))
        ));
    }
}
