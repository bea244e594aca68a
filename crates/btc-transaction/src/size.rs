//! Closed-form byte size of a legacy transaction.

use btc_primitives::util::VarInt;

use crate::input::TransactionInput;
use crate::output::TransactionOutput;

/// Fixed bytes per input: previous hash, output index and sequence.
const INPUT_FIXED_BYTES: usize = 32 + 4 + 4;

/// Fixed bytes per output: the value.
const OUTPUT_FIXED_BYTES: usize = 8;

/// Version plus lock time.
const TX_FIXED_BYTES: usize = 4 + 4;

/// Encoded length of a compact-size integer holding `n`.
pub fn varint_len(n: usize) -> usize {
    VarInt::from(n).length()
}

/// Compute the legacy serialized size of a transaction with these inputs
/// and outputs.
///
/// `8 + varint(n_in) + varint(n_out)
///  + Σ in (40 + varint(script) + script)
///  + Σ out (8 + varint(script) + script)`
pub fn calc_tx_bytes(inputs: &[TransactionInput], outputs: &[TransactionOutput]) -> usize {
    let inputs_len: usize = inputs
        .iter()
        .map(|input| {
            let script_len = input.script.len();
            INPUT_FIXED_BYTES + varint_len(script_len) + script_len
        })
        .sum();

    let outputs_len: usize = outputs
        .iter()
        .map(|output| {
            let script_len = output.script.len();
            OUTPUT_FIXED_BYTES + varint_len(script_len) + script_len
        })
        .sum();

    TX_FIXED_BYTES + varint_len(inputs.len()) + varint_len(outputs.len()) + inputs_len + outputs_len
}
