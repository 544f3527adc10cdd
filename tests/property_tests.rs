//! Property-based tests - pragmatic approach testing the codec's core
//! guarantees (round-trip law, width selection, no partial results)
//! across a wide range of generated inputs.

use bson_value::{
    from_bson, from_bson_with_options, to_bson, DecodeOptions, DefaultTypes, Value,
};
use indexmap::IndexMap;
use proptest::prelude::*;

fn arb_key() -> impl Strategy<Value = String> {
    // NUL is unencodable in a cstring key and tested separately
    "[a-zA-Z0-9_]{0,8}"
}

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (0..=i64::MAX as u64).prop_map(Value::Uint),
        any::<f64>()
            .prop_filter("NaN never compares equal", |f| !f.is_nan())
            .prop_map(Value::Float),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::from),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec((arb_key(), inner), 0..6).prop_map(|entries| {
                let mut map = IndexMap::new();
                for (key, value) in entries {
                    map.insert(key, value);
                }
                Value::Object(map)
            }),
        ]
    })
}

fn arb_document() -> impl Strategy<Value = Value> {
    prop::collection::vec((arb_key(), arb_value()), 0..8).prop_map(|entries| {
        let mut map = IndexMap::new();
        for (key, value) in entries {
            map.insert(key, value);
        }
        Value::Object(map)
    })
}

fn entry_doc(value: Value) -> Value {
    let mut map = IndexMap::new();
    map.insert("n".to_string(), value);
    Value::Object(map)
}

proptest! {
    #[test]
    fn prop_roundtrip_default_mode(value in arb_document()) {
        let bytes = to_bson(&value).unwrap();
        let decoded: Value = from_bson(&bytes).unwrap();
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn prop_roundtrip_lenient_mode(value in arb_document()) {
        let bytes = to_bson(&value).unwrap();
        let decoded: Value =
            from_bson_with_options(&bytes, DecodeOptions::lenient()).unwrap();
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn prop_size_field_matches_output_length(value in arb_document()) {
        let bytes = to_bson(&value).unwrap();
        let size = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        prop_assert_eq!(size as usize, bytes.len());
    }

    #[test]
    fn prop_encode_is_deterministic(value in arb_document()) {
        prop_assert_eq!(to_bson(&value).unwrap(), to_bson(&value).unwrap());
    }

    #[test]
    fn prop_integer_width_follows_magnitude(n in any::<i64>()) {
        let bytes = to_bson(&entry_doc(Value::Int(n))).unwrap();
        let narrow = (i32::MIN as i64..=i32::MAX as i64).contains(&n);
        prop_assert_eq!(bytes[4], if narrow { 0x10 } else { 0x12 });
    }

    #[test]
    fn prop_unsigned_encodes_like_signed(n in 0..=i64::MAX) {
        let signed = to_bson(&entry_doc(Value::Int(n))).unwrap();
        let unsigned = to_bson(&entry_doc(Value::Uint(n as u64))).unwrap();
        prop_assert_eq!(signed, unsigned);
    }

    #[test]
    fn prop_decoding_noise_never_panics_or_leaks_partials(
        bytes in prop::collection::vec(any::<u8>(), 0..64)
    ) {
        // raising mode: complete value or error, nothing in between
        match from_bson::<DefaultTypes>(&bytes) {
            Ok(value) => prop_assert!(value.is_object()),
            Err(err) => prop_assert!(err.is_parse_error()),
        }
        // discarding mode: the same inputs never produce an error
        let value: Value =
            from_bson_with_options(&bytes, DecodeOptions::lenient()).unwrap();
        prop_assert!(value.is_object() || value.is_discarded());
    }

    #[test]
    fn prop_truncation_is_always_detected(value in arb_document()) {
        let bytes = to_bson(&value).unwrap();
        if bytes.len() > 1 {
            let truncated = &bytes[..bytes.len() - 1];
            prop_assert!(from_bson::<DefaultTypes>(truncated).is_err());
        }
    }
}
