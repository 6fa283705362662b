use crate::Encoding;
use serde_json::{json, Value};

fn run_test(value: Value) -> Vec<u8> {
    let encoding = Encoding::AnyPackedTypeTagBytePrefix;
    let bytes = crate::to_vec(&value, &encoding).unwrap();

    let actual = crate::from_slice(&bytes, &encoding).unwrap();
    assert_eq!(value, actual);

    let actual = crate::from_reader(&*bytes, &encoding).unwrap();
    assert_eq!(value, actual);

    bytes
}

#[test]
fn scalars() {
    assert_eq!(run_test(json!(null)), [0x17]);
    assert_eq!(run_test(json!(false)), [0x07]);
    assert_eq!(run_test(json!(true)), [0x0f]);
}

#[test]
fn integers() {
    assert_eq!(run_test(json!(0)), [0x0d]);
    assert_eq!(run_test(json!(30)), [0xfd]);
    assert_eq!(run_test(json!(31)), [0x05, 0x1f]);
    assert_eq!(run_test(json!(255)), [0x05, 0xff]);
    assert_eq!(run_test(json!(256)), [0x1f, 0x80, 0x02]);
    assert_eq!(run_test(json!(-1)), [0x0e]);
    assert_eq!(run_test(json!(-256)), [0x06, 0xff]);
    assert_eq!(run_test(json!(-257)), [0x27, 0x80, 0x02]);
    run_test(json!(u64::MAX));
    run_test(json!(i64::MIN));
}

#[test]
fn reals() {
    assert_eq!(run_test(json!(7.0)), [0x37, 0x07]);
    assert_eq!(run_test(json!(3.5)), [0x2f, 0x46, 0x01]);
    run_test(json!(-7.0));
    run_test(json!(256.0));
    run_test(json!(-0.001));
    run_test(json!(1e18));
}

#[test]
fn large_reals() {
    let encoding = Encoding::AnyPackedTypeTagBytePrefix;

    let error = crate::to_vec(&json!(1e20), &encoding).unwrap_err();
    assert_eq!(error.to_string(), "real number has too many integral digits");
    crate::to_vec(&json!(-1e300), &encoding).unwrap_err();

    // the largest digit count, with no decimal places
    let bytes = [0x2f, 0xfe, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01, 0x00];
    let value = crate::from_slice(&bytes, &encoding).unwrap();
    assert_eq!(value, json!(i64::MAX as f64));
    crate::to_vec(&value, &encoding).unwrap_err();
}

#[test]
fn strings() {
    assert_eq!(run_test(json!("")), [0x09]);
    assert_eq!(run_test(json!("hi")), [0x19, b'h', b'i']);

    let bytes = run_test(json!("x".repeat(31)));
    assert_eq!(bytes[0], 0x02);
    assert_eq!(bytes.len(), 32);

    let bytes = run_test(json!("x".repeat(61)));
    assert_eq!(bytes[0], 0xf2);
    assert_eq!(bytes.len(), 62);

    let bytes = run_test(json!("x".repeat(62)));
    assert_eq!(&bytes[..2], [0x01, 0x01]);
    assert_eq!(bytes.len(), 64);

    let bytes = run_test(json!("x".repeat(128)));
    assert_eq!(&bytes[..2], [0x3f, 0x00]);
    assert_eq!(bytes.len(), 130);

    let bytes = run_test(json!("x".repeat(2000)));
    assert_eq!(&bytes[..3], [0x57, 0xd0, 0x07]);
    assert_eq!(bytes.len(), 2003);
}

#[test]
fn shared_strings() {
    let bytes = run_test(json!(["foo", "foo"]));
    assert_eq!(bytes, [0x1c, 0x21, b'f', b'o', b'o', 0x20, 0x04]);

    let long = "y".repeat(40);
    let bytes = run_test(json!([long, long]));
    assert_eq!(bytes.len(), 1 + 2 * 41);

    let long = "z".repeat(100);
    let bytes = run_test(json!([long, long]));
    assert_eq!(bytes.len(), 1 + 102 + 3);

    let long = "w".repeat(300);
    let bytes = run_test(json!([long, long]));
    assert_eq!(bytes.len(), 1 + 302 + 5);
}

#[test]
fn containers() {
    assert_eq!(run_test(json!([])), [0x0c]);
    assert_eq!(run_test(json!({})), [0x0b]);
    assert_eq!(
        run_test(json!({ "a": [1, -1, true, null, "hello"] })),
        [0x13, 0x02, b'a', 0x34, 0x15, 0x0e, 0x0f, 0x17, 0x31, b'h', b'e', b'l', b'l', b'o']
    );

    let bytes = run_test(Value::Array(vec![json!(null); 40]));
    assert_eq!(&bytes[..2], [0x04, 0x09]);

    run_test(json!({ "name": "value", "nested": { "name": "value" }, "list": [{ "name": 1 }] }));
}

#[test]
fn invalid_tag() {
    let error = crate::from_slice(&[0x5f], &Encoding::AnyPackedTypeTagBytePrefix).unwrap_err();
    assert_eq!(error.to_string(), "invalid tag byte 0x5f");
}

#[test]
fn recursion_limit() {
    let bytes = vec![0x14; 200];
    let error = crate::from_slice(&bytes, &Encoding::AnyPackedTypeTagBytePrefix).unwrap_err();
    assert_eq!(error.to_string(), "recursion limit exceeded");
}
