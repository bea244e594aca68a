//! BIP69 lexicographical ordering of inputs and outputs.
//!
//! Both sorts are stable, so equal keys keep their relative order and
//! sorting twice is a no-op.

use std::cmp::Ordering;

use crate::input::TransactionInput;
use crate::output::TransactionOutput;

/// Sort outputs by value, then by locking script bytes, ascending.
pub fn sort_outputs(outputs: &mut [TransactionOutput]) {
    outputs.sort_by(compare_outputs);
}

/// Sort inputs by previous txid in display order, then by output index.
pub fn sort_inputs(inputs: &mut [TransactionInput]) {
    inputs.sort_by(compare_inputs);
}

fn compare_outputs(a: &TransactionOutput, b: &TransactionOutput) -> Ordering {
    a.value
        .cmp(&b.value)
        .then_with(|| a.script.to_bytes().cmp(b.script.to_bytes()))
}

fn compare_inputs(a: &TransactionInput, b: &TransactionInput) -> Ordering {
    // Display order is the reverse of the stored hash bytes.
    a.prev_tx_hash
        .iter()
        .rev()
        .cmp(b.prev_tx_hash.iter().rev())
        .then_with(|| a.prev_output_index.cmp(&b.prev_output_index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use btc_script::Script;

    #[test]
    fn test_sort_outputs_funding_pair() {
        let p2wpkh = Script::from_hex("00143ca33c2e4446f4a305f23c80df8ad1afdcf652f9").unwrap();
        let p2wsh = Script::from_hex(
            "0020c015c4a6be010e21657068fc2e6a9d02b27ebe4d490a25846f7237f104d1a3cd",
        )
        .unwrap();
        let mut outputs = vec![
            TransactionOutput::new(4_989_986_080, p2wpkh.clone()),
            TransactionOutput::new(10_000_000, p2wsh.clone()),
        ];
        sort_outputs(&mut outputs);
        assert_eq!(outputs[0].script, p2wsh);
        assert_eq!(outputs[1].script, p2wpkh);
    }

    #[test]
    fn test_sort_outputs_equal_value_by_script() {
        let mut outputs = vec![
            TransactionOutput::new(100, Script::from_hex("76a9").unwrap()),
            TransactionOutput::new(100, Script::from_hex("0014").unwrap()),
            TransactionOutput::new(100, Script::from_hex("00").unwrap()),
        ];
        sort_outputs(&mut outputs);
        let hexes: Vec<String> = outputs.iter().map(|o| o.script.to_hex()).collect();
        assert_eq!(hexes, vec!["00", "0014", "76a9"]);
    }

    #[test]
    fn test_sort_inputs_uses_display_order() {
        // Internal bytes: a ends in 0x01, b ends in 0x02 and starts higher.
        let mut a_hash = [0u8; 32];
        a_hash[0] = 0xff;
        a_hash[31] = 0x01;
        let mut b_hash = [0u8; 32];
        b_hash[31] = 0x02;

        let mut inputs = vec![
            TransactionInput::new(b_hash, 0),
            TransactionInput::new(a_hash, 5),
            TransactionInput::new(a_hash, 1),
        ];
        sort_inputs(&mut inputs);
        assert_eq!(inputs[0].prev_tx_hash, a_hash);
        assert_eq!(inputs[0].prev_output_index, 1);
        assert_eq!(inputs[1].prev_output_index, 5);
        assert_eq!(inputs[2].prev_tx_hash, b_hash);
    }
}
