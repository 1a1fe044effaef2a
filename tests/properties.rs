//! Property checks over numeric encoding, pushes and evaluation.

use proptest::prelude::*;
use svscript::script::{
    eval_script, is_minimally_encoded, minimally_encode, Op, Operand, Script, ScriptConfig, ScriptFlags,
    ScriptNum, Stack, TransactionlessChecker,
};

proptest! {
    #[test]
    fn minimal_encoding_is_idempotent(data in proptest::collection::vec(any::<u8>(), 0..12)) {
        let once = minimally_encode(&data);
        prop_assert!(is_minimally_encoded(&once, usize::MAX));
        prop_assert_eq!(minimally_encode(&once), once);
    }

    #[test]
    fn minimal_encoding_keeps_value(data in proptest::collection::vec(any::<u8>(), 0..=8)) {
        let encoded = minimally_encode(&data);
        let before = ScriptNum::from_operand(&data, false, 8).unwrap();
        let after = ScriptNum::from_operand(&encoded, true, 8).unwrap();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn serialized_numbers_are_minimal(n in any::<i64>().prop_filter("i64::MIN needs nine bytes", |n| *n != i64::MIN)) {
        let bytes = ScriptNum::new(n).serialize();
        prop_assert!(is_minimally_encoded(&bytes, 9));
        prop_assert_eq!(Operand::owned(bytes).to_bool(), n != 0);
    }

    #[test]
    fn to_bool_ignores_sign_of_zero(zeros in 0usize..10, negative in any::<bool>()) {
        let mut bytes = vec![0u8; zeros];
        if negative {
            bytes.push(0x80);
        }
        prop_assert!(!Operand::owned(bytes.clone()).to_bool());
        bytes.insert(0, 1);
        prop_assert!(Operand::owned(bytes).to_bool());
    }

    #[test]
    fn pushes_are_minimal(data in proptest::collection::vec(any::<u8>(), 0..600)) {
        let op = Op::push_data(&data);
        prop_assert!(op.is_minimal_push());
        let bytes = op.to_bytes();
        let (decoded, end) = Op::decode(&bytes, 0).unwrap();
        prop_assert_eq!(end, bytes.len());
        let pushed = decoded.push_value().unwrap();
        prop_assert_eq!(pushed.as_bytes(), &data[..]);
    }

    #[test]
    fn pushed_numbers_evaluate_to_their_encoding(n in -(1i64 << 31)..(1i64 << 31)) {
        let mut script = Script::new();
        script.append_num(n);
        let mut stack = Stack::new();
        let flags = ScriptFlags::MINIMALDATA;
        prop_assert!(eval_script(&mut stack, &script, flags, &TransactionlessChecker, &ScriptConfig::default()).is_ok());
        prop_assert_eq!(stack.len(), 1);
        let expected = ScriptNum::new(n).serialize();
        prop_assert_eq!(stack.top().unwrap().as_bytes(), &expected[..]);
    }
}
