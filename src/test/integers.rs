use crate::Encoding;
use serde_json::{json, Value};

fn run_test(encoding: &Encoding, value: Value, expected: &[u8]) {
    let bytes = crate::to_vec(&value, encoding).unwrap();
    assert_eq!(bytes, expected, "{}", value);

    let actual = crate::from_slice(&bytes, encoding).unwrap();
    assert_eq!(value, actual);
}

#[test]
fn bounded() {
    let encoding = Encoding::BoundedMultiple8BitsEnumFixed {
        minimum: -5,
        maximum: 5,
        multiplier: 1,
    };
    run_test(&encoding, json!(-5), &[0x00]);
    run_test(&encoding, json!(0), &[0x05]);
    run_test(&encoding, json!(5), &[0x0a]);
}

#[test]
fn bounded_multiple() {
    let encoding = Encoding::BoundedMultiple8BitsEnumFixed {
        minimum: 1,
        maximum: 19,
        multiplier: 5,
    };
    run_test(&encoding, json!(5), &[0x00]);
    run_test(&encoding, json!(15), &[0x02]);

    let encoding = Encoding::BoundedMultiple8BitsEnumFixed {
        minimum: -20,
        maximum: -3,
        multiplier: 4,
    };
    run_test(&encoding, json!(-20), &[0x00]);
    run_test(&encoding, json!(-4), &[0x04]);
}

#[test]
fn bounded_out_of_range() {
    let encoding = Encoding::BoundedMultiple8BitsEnumFixed {
        minimum: 0,
        maximum: 10,
        multiplier: 1,
    };
    let error = crate::from_slice(&[0x0b], &encoding).unwrap_err();
    assert_eq!(error.to_string(), "integer out of range");
}

#[test]
#[should_panic]
fn bounded_precondition() {
    let encoding = Encoding::BoundedMultiple8BitsEnumFixed {
        minimum: 0,
        maximum: 10,
        multiplier: 1,
    };
    let _ = crate::to_vec(&json!(11), &encoding);
}

#[test]
#[should_panic]
fn multiple_precondition() {
    let encoding = Encoding::ArbitraryMultipleZigzagVarint { multiplier: 3 };
    let _ = crate::to_vec(&json!(4), &encoding);
}

#[test]
fn floor() {
    let encoding = Encoding::FloorMultipleEnumVarint {
        minimum: -10,
        multiplier: 1,
    };
    run_test(&encoding, json!(-10), &[0x00]);
    run_test(&encoding, json!(0), &[0x0a]);

    let encoding = Encoding::FloorMultipleEnumVarint {
        minimum: 7,
        multiplier: 3,
    };
    run_test(&encoding, json!(9), &[0x00]);
    run_test(&encoding, json!(30), &[0x07]);
}

#[test]
fn roof() {
    let encoding = Encoding::RoofMultipleMirrorEnumVarint {
        maximum: 10,
        multiplier: 1,
    };
    run_test(&encoding, json!(10), &[0x00]);
    run_test(&encoding, json!(-118), &[0x80, 0x01]);

    let encoding = Encoding::RoofMultipleMirrorEnumVarint {
        maximum: 20,
        multiplier: 6,
    };
    run_test(&encoding, json!(18), &[0x00]);
    run_test(&encoding, json!(-6), &[0x04]);
}

#[test]
fn arbitrary() {
    let encoding = Encoding::ArbitraryMultipleZigzagVarint { multiplier: 1 };
    run_test(&encoding, json!(0), &[0x00]);
    run_test(&encoding, json!(-1), &[0x01]);
    run_test(&encoding, json!(1), &[0x02]);
    run_test(&encoding, json!(-64), &[0x7f]);

    let encoding = Encoding::ArbitraryMultipleZigzagVarint { multiplier: 10 };
    run_test(&encoding, json!(-30), &[0x05]);
}

#[test]
fn integral_reals() {
    let encoding = Encoding::FloorMultipleEnumVarint {
        minimum: 0,
        multiplier: 1,
    };
    let bytes = crate::to_vec(&json!(3.0), &encoding).unwrap();
    assert_eq!(bytes, [0x03]);
    assert_eq!(crate::from_slice(&bytes, &encoding).unwrap(), json!(3));
}

#[test]
fn decoded_overflow() {
    let encoding = Encoding::FloorMultipleEnumVarint {
        minimum: i64::MAX,
        multiplier: 1,
    };
    let error = crate::from_slice(&[0x01], &encoding).unwrap_err();
    assert_eq!(error.to_string(), "integer out of range");
}

#[test]
fn reals() {
    let encoding = Encoding::DoubleVarintTuple;
    run_test(&encoding, json!(3.14), &[0xf4, 0x04, 0x02]);
    run_test(&encoding, json!(-5.0), &[0x09, 0x00]);
    run_test(&encoding, json!(0.5), &[0x0a, 0x01]);
    run_test(&encoding, json!(1.0e10), &[0x80, 0x90, 0xdf, 0xc0, 0x4a, 0x00]);

    let bytes = crate::to_vec(&json!(7), &encoding).unwrap();
    assert_eq!(crate::from_slice(&bytes, &encoding).unwrap(), json!(7.0));

    let error = crate::to_vec(&json!(1e19), &encoding).unwrap_err();
    assert_eq!(error.to_string(), "real number has too many integral digits");
}

// Numbers decode as reals, so integral instances only compare equal by value.
fn assert_numeric_eq(expected: &Value, actual: &Value) {
    assert!(actual.is_f64(), "{} is not a real", actual);
    assert_eq!(expected.as_f64(), actual.as_f64(), "{} != {}", expected, actual);
}

#[test]
fn integral_numbers() {
    let encoding = Encoding::DoubleVarintTuple;
    for (value, expected) in &[
        (json!(5), &[0x0a, 0x00][..]),
        (json!(-3), &[0x05, 0x00][..]),
        (json!(0), &[0x00, 0x00][..]),
        (json!(1_000_000), &[0x80, 0x89, 0x7a, 0x00][..]),
    ] {
        let bytes = crate::to_vec(value, &encoding).unwrap();
        assert_eq!(bytes, *expected, "{}", value);

        let actual = crate::from_slice(&bytes, &encoding).unwrap();
        assert_ne!(*value, actual);
        assert_numeric_eq(value, &actual);
    }
}
