use crate::Encoding;
use serde_json::{json, Value};
use std::sync::Arc;

fn run_test(encoding: &Encoding, value: Value, expected: &[u8]) {
    let bytes = crate::to_vec(&value, encoding).unwrap();
    assert_eq!(bytes, expected);

    let actual = crate::from_slice(&bytes, encoding).unwrap();
    assert_eq!(value, actual);
}

fn varint_object(encoding: Encoding) -> Encoding {
    Encoding::VarintTypedArbitraryObject {
        key_encoding: Arc::new(Encoding::PrefixVarintLengthStringShared),
        encoding: Arc::new(encoding),
    }
}

#[test]
fn fixed() {
    let encoding = Encoding::FixedTypedArbitraryObject {
        size: 1,
        key_encoding: Arc::new(Encoding::Utf8StringNoLength { size: 3 }),
        encoding: Arc::new(Encoding::AnyPackedTypeTagBytePrefix),
    };
    run_test(&encoding, json!({ "foo": true }), &[b'f', b'o', b'o', 0x0f]);
}

#[test]
fn varint() {
    let encoding = varint_object(Encoding::ArbitraryMultipleZigzagVarint { multiplier: 1 });
    run_test(&encoding, json!({}), &[0x00]);
    run_test(&encoding, json!({ "foo": -1 }), &[0x01, 0x04, b'f', b'o', b'o', 0x01]);
}

#[test]
fn many_members() {
    let encoding = varint_object(Encoding::ArbitraryMultipleZigzagVarint { multiplier: 1 });
    let value = json!({ "alpha": 1, "beta": -2, "gamma": 300 });
    let bytes = crate::to_vec(&value, &encoding).unwrap();
    assert_eq!(crate::from_slice(&bytes, &encoding).unwrap(), value);
    assert_eq!(crate::from_reader(&*bytes, &encoding).unwrap(), value);
}

#[test]
fn shared_keys() {
    let encoding = Encoding::FixedTypedArray {
        size: 2,
        encoding: Arc::new(varint_object(Encoding::ConstNone { value: json!(null) })),
        prefix_encodings: vec![],
    };
    run_test(
        &encoding,
        json!([{ "key": null }, { "key": null }]),
        &[0x01, 0x04, b'k', b'e', b'y', 0x01, 0x00, 0x06],
    );
}

#[test]
fn invalid_key() {
    let encoding = Encoding::FixedTypedArbitraryObject {
        size: 1,
        key_encoding: Arc::new(Encoding::ArbitraryMultipleZigzagVarint { multiplier: 1 }),
        encoding: Arc::new(Encoding::AnyPackedTypeTagBytePrefix),
    };
    let error = crate::from_slice(&[0x02, 0x17], &encoding).unwrap_err();
    assert_eq!(error.to_string(), "object key must be a string");
}
