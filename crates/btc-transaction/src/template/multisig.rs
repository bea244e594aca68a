//! Bare m-of-n multisig redeem scripts.

use btc_script::opcodes::OP_CHECKMULTISIG;
use btc_script::{Script, ScriptError, ScriptToken};

use crate::template::check_pubkey_encoding;
use crate::TransactionError;

/// Largest key count expressible with a small-integer opcode.
pub const MAX_PUBKEYS: usize = 16;

/// Build `OP_m <pubkey_1> … <pubkey_n> OP_n OP_CHECKMULTISIG`.
///
/// Keys are used in the order given.
///
/// # Arguments
/// * `m` - Required signature count.
/// * `pubkeys` - SEC1 public keys.
///
/// # Returns
/// The redeem script, `InvalidScript` for a bad threshold or key count,
/// or `InvalidKeyLength` for a malformed key.
pub fn redeem_script<K: AsRef<[u8]>>(m: usize, pubkeys: &[K]) -> Result<Script, TransactionError> {
    let n = pubkeys.len();
    if m == 0 || m > n || n > MAX_PUBKEYS {
        return Err(ScriptError::InvalidScript(format!(
            "invalid multisig threshold {} of {} (max {} keys)",
            m, n, MAX_PUBKEYS
        ))
        .into());
    }

    let mut tokens = Vec::with_capacity(n + 3);
    tokens.push(ScriptToken::Num(m as i64));
    for pubkey in pubkeys {
        let pubkey = pubkey.as_ref();
        check_pubkey_encoding(pubkey)?;
        tokens.push(ScriptToken::Push(pubkey.to_vec()));
    }
    tokens.push(ScriptToken::Num(n as i64));
    tokens.push(ScriptToken::Op(OP_CHECKMULTISIG));

    Ok(Script::compile(&tokens)?)
}
