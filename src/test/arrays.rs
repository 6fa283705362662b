use crate::Encoding;
use serde_json::{json, Value};
use std::sync::Arc;

fn byte() -> Encoding {
    Encoding::BoundedMultiple8BitsEnumFixed {
        minimum: 0,
        maximum: 255,
        multiplier: 1,
    }
}

fn run_test(encoding: &Encoding, value: Value, expected: &[u8]) {
    let bytes = crate::to_vec(&value, encoding).unwrap();
    assert_eq!(bytes, expected);

    let actual = crate::from_slice(&bytes, encoding).unwrap();
    assert_eq!(value, actual);
}

#[test]
fn fixed() {
    let encoding = Encoding::FixedTypedArray {
        size: 3,
        encoding: Arc::new(byte()),
        prefix_encodings: vec![],
    };
    run_test(&encoding, json!([1, 2, 3]), &[0x01, 0x02, 0x03]);
}

#[test]
fn prefix_encodings() {
    let encoding = Encoding::FixedTypedArray {
        size: 3,
        encoding: Arc::new(byte()),
        prefix_encodings: vec![
            Encoding::Utf8StringNoLength { size: 2 },
            Encoding::ConstNone { value: json!(null) },
        ],
    };
    run_test(&encoding, json!(["hi", null, 7]), &[b'h', b'i', 0x07]);
}

#[test]
fn bounded() {
    let encoding = Encoding::Bounded8BitsTypedArray {
        minimum: 1,
        maximum: 3,
        encoding: Arc::new(byte()),
        prefix_encodings: vec![],
    };
    run_test(&encoding, json!([9]), &[0x00, 0x09]);
    run_test(&encoding, json!([9, 8, 7]), &[0x02, 0x09, 0x08, 0x07]);

    let error = crate::from_slice(&[0x03, 0x01, 0x01, 0x01, 0x01], &encoding).unwrap_err();
    assert_eq!(error.to_string(), "invalid length prefix");
}

#[test]
fn floor() {
    let encoding = Encoding::FloorTypedArray {
        minimum: 2,
        encoding: Arc::new(byte()),
        prefix_encodings: vec![],
    };
    run_test(&encoding, json!([1, 2]), &[0x00, 0x01, 0x02]);
    run_test(&encoding, json!([1, 2, 3, 4]), &[0x02, 0x01, 0x02, 0x03, 0x04]);
}

#[test]
fn roof() {
    let encoding = Encoding::RoofTypedArray {
        maximum: 4,
        encoding: Arc::new(byte()),
        prefix_encodings: vec![],
    };
    run_test(&encoding, json!([]), &[0x04]);
    run_test(&encoding, json!([5, 6]), &[0x02, 0x05, 0x06]);

    let error = crate::from_slice(&[0x05], &encoding).unwrap_err();
    assert_eq!(error.to_string(), "invalid length prefix");
}

#[test]
#[should_panic]
fn length_precondition() {
    let encoding = Encoding::FixedTypedArray {
        size: 2,
        encoding: Arc::new(byte()),
        prefix_encodings: vec![],
    };
    let _ = crate::to_vec(&json!([1]), &encoding);
}

#[test]
fn truncated() {
    let encoding = Encoding::FloorTypedArray {
        minimum: 0,
        encoding: Arc::new(byte()),
        prefix_encodings: vec![],
    };
    let error = crate::from_slice(&[0x02, 0x01], &encoding).unwrap_err();
    assert_eq!(error.to_string(), "EOF while parsing a value");
}

#[test]
fn recursion_limit() {
    let mut encoding = byte();
    for _ in 0..200 {
        encoding = Encoding::FixedTypedArray {
            size: 1,
            encoding: Arc::new(encoding),
            prefix_encodings: vec![],
        };
    }

    let error = crate::from_slice(&[0x00], &encoding).unwrap_err();
    assert_eq!(error.to_string(), "recursion limit exceeded");
}
