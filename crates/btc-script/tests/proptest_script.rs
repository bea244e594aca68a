use proptest::prelude::*;

use btc_script::chunk::decode_script;
use btc_script::opcodes::OP_CODESEPARATOR;
use btc_script::{script_num, Script, ScriptToken};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn script_number_encode_decode_roundtrip(val in -0x7FFF_FFFF_FFFF_FFFFi64..=0x7FFF_FFFF_FFFF_FFFFi64) {
        let bytes = script_num::encode(val);
        let decoded = script_num::decode(&bytes, 8, true).unwrap();
        prop_assert_eq!(decoded, val);
    }

    #[test]
    fn script_hex_roundtrip(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let script = Script::from_bytes(&data);
        let script2 = Script::from_hex(&script.to_hex()).unwrap();
        prop_assert_eq!(script.to_bytes(), script2.to_bytes());
    }

    #[test]
    fn compiled_pushes_decode_to_their_data(
        pushes in prop::collection::vec(prop::collection::vec(any::<u8>(), 2..300), 0..8)
    ) {
        // Pushes of two or more bytes never collapse into small-integer opcodes.
        let tokens: Vec<ScriptToken> = pushes.iter().cloned().map(ScriptToken::Push).collect();
        let script = Script::compile(&tokens).unwrap();
        let chunks = decode_script(script.to_bytes()).unwrap();
        let data: Vec<Vec<u8>> = chunks.into_iter().filter_map(|c| c.data).collect();
        prop_assert_eq!(data, pushes);
    }

    #[test]
    fn codeseparator_removal_is_idempotent(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let once = Script::from_bytes(&data).remove_codeseparators();
        prop_assert_eq!(once.remove_codeseparators(), once.clone());
        if let Ok(chunks) = once.chunks() {
            prop_assert!(chunks.iter().all(|c| c.data.is_some() || c.op != OP_CODESEPARATOR));
        }
    }
}
