use crate::schema::DRAFT_2020_12;
use crate::{canonicalize, OfficialResolver};
use serde_json::{json, Value};

fn canonical(mut schema: Value) -> Value {
    canonicalize(&mut schema, &OfficialResolver, Some(DRAFT_2020_12)).unwrap();
    schema
}

#[test]
fn const_as_enum() {
    let schema = canonical(json!({ "$schema": DRAFT_2020_12, "const": 5, "title": "five" }));
    assert_eq!(schema, json!({ "$schema": DRAFT_2020_12, "enum": [5], "title": "five" }));
}

#[test]
fn duplicate_enum_values() {
    let schema = canonical(json!({ "$schema": DRAFT_2020_12, "enum": [1, 1, 2] }));
    assert_eq!(schema, json!({ "$schema": DRAFT_2020_12, "enum": [1, 2] }));
}

#[test]
fn boolean_as_enum() {
    let schema = canonical(json!({ "$schema": DRAFT_2020_12, "type": "boolean" }));
    assert_eq!(schema, json!({ "$schema": DRAFT_2020_12, "enum": [false, true] }));
}

#[test]
fn equal_bounds_as_const() {
    let schema = canonical(json!({ "$schema": DRAFT_2020_12, "type": "number", "minimum": 2, "maximum": 2 }));
    assert_eq!(schema, json!({ "$schema": DRAFT_2020_12, "enum": [2] }));
}

#[test]
fn equal_bounds_beyond_double_precision() {
    let schema = canonical(json!({
        "$schema": DRAFT_2020_12,
        "type": "integer",
        "minimum": 9007199254740992u64,
        "maximum": 9007199254740993u64,
    }));
    assert_eq!(
        schema,
        json!({
            "$schema": DRAFT_2020_12,
            "type": "integer",
            "minimum": 9007199254740992u64,
            "maximum": 9007199254740993u64,
            "multipleOf": 1,
        })
    );

    let schema = canonical(json!({ "$schema": DRAFT_2020_12, "type": "integer", "minimum": 3.0, "maximum": 3 }));
    assert_eq!(schema, json!({ "$schema": DRAFT_2020_12, "enum": [3] }));

    let schema = canonical(json!({ "$schema": DRAFT_2020_12, "type": "integer", "minimum": 2.5, "maximum": 2.5 }));
    assert_eq!(
        schema,
        json!({ "$schema": DRAFT_2020_12, "type": "integer", "minimum": 3, "maximum": 2, "multipleOf": 1 })
    );
}

#[test]
fn empty_array_as_const() {
    let schema = canonical(json!({ "$schema": DRAFT_2020_12, "type": "array", "maxItems": 0 }));
    assert_eq!(schema, json!({ "$schema": DRAFT_2020_12, "enum": [[]] }));
}

#[test]
fn exclusive_integer_bounds() {
    let schema = canonical(json!({
        "$schema": DRAFT_2020_12,
        "type": "integer",
        "exclusiveMinimum": 0,
        "exclusiveMaximum": 10,
    }));
    assert_eq!(
        schema,
        json!({
            "$schema": DRAFT_2020_12,
            "type": "integer",
            "minimum": 1,
            "maximum": 9,
            "multipleOf": 1,
        })
    );
}

#[test]
fn exclusive_real_bounds() {
    let schema = canonical(json!({ "$schema": DRAFT_2020_12, "type": "number", "exclusiveMinimum": 0 }));
    assert_eq!(
        schema,
        json!({ "$schema": DRAFT_2020_12, "type": "number", "minimum": f64::from_bits(1) })
    );
}

#[test]
fn exclusive_bounds_at_integer_limits() {
    let schema = canonical(json!({ "$schema": DRAFT_2020_12, "type": "integer", "exclusiveMinimum": i64::MIN }));
    assert_eq!(
        schema,
        json!({ "$schema": DRAFT_2020_12, "type": "integer", "minimum": i64::MIN + 1, "multipleOf": 1 })
    );

    let schema = canonical(json!({ "$schema": DRAFT_2020_12, "type": "integer", "exclusiveMaximum": i64::MAX }));
    assert_eq!(
        schema,
        json!({ "$schema": DRAFT_2020_12, "type": "integer", "maximum": i64::MAX - 1, "multipleOf": 1 })
    );

    // no 64-bit integer lies beyond these, so they stay exclusive
    for (keyword, bound) in &[
        ("exclusiveMinimum", json!(i64::MAX)),
        ("exclusiveMinimum", json!(u64::MAX)),
        ("exclusiveMinimum", json!(1e300)),
        ("exclusiveMaximum", json!(i64::MIN)),
        ("exclusiveMaximum", json!(-1e300)),
    ] {
        let mut schema = json!({ "$schema": DRAFT_2020_12, "type": "integer" });
        schema[*keyword] = bound.clone();
        let mut expected = schema.clone();
        expected["multipleOf"] = json!(1);
        assert_eq!(canonical(schema), expected);
    }
}

#[test]
fn exclusive_real_bounds_at_limits() {
    let schema = canonical(json!({ "$schema": DRAFT_2020_12, "type": "number", "exclusiveMaximum": -f64::MAX }));
    assert_eq!(
        schema,
        json!({ "$schema": DRAFT_2020_12, "type": "number", "exclusiveMaximum": -f64::MAX })
    );

    let schema = canonical(json!({
        "$schema": DRAFT_2020_12,
        "type": "number",
        "maximum": 1,
        "exclusiveMaximum": 5,
    }));
    assert_eq!(schema, json!({ "$schema": DRAFT_2020_12, "type": "number", "maximum": 1 }));
}

#[test]
fn integer_real_bounds() {
    let schema = canonical(json!({
        "$schema": DRAFT_2020_12,
        "type": "integer",
        "minimum": 0.5,
        "maximum": 9.5,
    }));
    assert_eq!(
        schema,
        json!({
            "$schema": DRAFT_2020_12,
            "type": "integer",
            "minimum": 1,
            "maximum": 9,
            "multipleOf": 1,
        })
    );
}

#[test]
fn integer_real_bounds_beyond_range() {
    let schema = canonical(json!({
        "$schema": DRAFT_2020_12,
        "type": "integer",
        "minimum": -1e300,
        "maximum": 1e300,
    }));
    assert_eq!(
        schema,
        json!({
            "$schema": DRAFT_2020_12,
            "type": "integer",
            "minimum": -1e300,
            "maximum": 1e300,
            "multipleOf": 1,
        })
    );
}

#[test]
fn type_union() {
    let schema = canonical(json!({ "$schema": DRAFT_2020_12, "type": ["string", "null"] }));
    assert_eq!(
        schema,
        json!({
            "$schema": DRAFT_2020_12,
            "anyOf": [
                { "type": "string", "minLength": 0 },
                { "enum": [null] },
            ],
        })
    );
}

#[test]
fn single_type_array() {
    let schema = canonical(json!({ "$schema": DRAFT_2020_12, "type": ["string"] }));
    assert_eq!(schema, json!({ "$schema": DRAFT_2020_12, "type": "string", "minLength": 0 }));
}

#[test]
fn implicit_type_union() {
    let schema = canonical(json!({ "$schema": DRAFT_2020_12 }));
    assert_eq!(
        schema,
        json!({
            "$schema": DRAFT_2020_12,
            "anyOf": [
                { "enum": [null] },
                { "enum": [false, true] },
                { "type": "object", "minProperties": 0, "properties": {} },
                { "type": "array", "minItems": 0 },
                { "type": "string", "minLength": 0 },
                { "type": "number" },
            ],
        })
    );
}

#[test]
fn drop_inapplicable_keywords() {
    let schema = canonical(json!({
        "$schema": DRAFT_2020_12,
        "type": "string",
        "minimum": 3,
        "items": {},
        "maxLength": 8,
    }));
    assert_eq!(
        schema,
        json!({ "$schema": DRAFT_2020_12, "type": "string", "maxLength": 8, "minLength": 0 })
    );
}

#[test]
fn required_properties() {
    let schema = canonical(json!({
        "$schema": DRAFT_2020_12,
        "type": "object",
        "properties": { "a": { "type": "null" } },
        "required": ["a", "a"],
    }));
    assert_eq!(
        schema,
        json!({
            "$schema": DRAFT_2020_12,
            "type": "object",
            "properties": { "a": { "enum": [null] } },
            "required": ["a"],
            "minProperties": 1,
        })
    );
}

#[test]
fn dependent_required() {
    let schema = canonical(json!({
        "$schema": DRAFT_2020_12,
        "type": "object",
        "properties": { "a": { "type": "null" }, "b": { "type": "null" } },
        "required": ["a"],
        "dependentRequired": { "a": ["b"] },
    }));
    assert_eq!(
        schema,
        json!({
            "$schema": DRAFT_2020_12,
            "type": "object",
            "properties": { "a": { "enum": [null] }, "b": { "enum": [null] } },
            "required": ["a", "b"],
            "minProperties": 2,
        })
    );
}

#[test]
fn conditional_cleanup() {
    let schema = canonical(json!({
        "$schema": DRAFT_2020_12,
        "type": "string",
        "if": { "type": "string" },
    }));
    assert_eq!(schema, json!({ "$schema": DRAFT_2020_12, "type": "string", "minLength": 0 }));

    let schema = canonical(json!({
        "$schema": DRAFT_2020_12,
        "type": "string",
        "then": { "type": "null" },
        "else": { "type": "null" },
    }));
    assert_eq!(schema, json!({ "$schema": DRAFT_2020_12, "type": "string", "minLength": 0 }));
}

#[test]
fn contains_bounds() {
    let schema = canonical(json!({
        "$schema": DRAFT_2020_12,
        "type": "array",
        "contains": { "type": "null" },
        "minContains": 2,
        "uniqueItems": false,
    }));
    assert_eq!(
        schema,
        json!({
            "$schema": DRAFT_2020_12,
            "type": "array",
            "contains": { "enum": [null] },
            "minContains": 2,
            "minItems": 2,
        })
    );

    let schema = canonical(json!({
        "$schema": DRAFT_2020_12,
        "type": "array",
        "maxContains": 2,
    }));
    assert_eq!(schema, json!({ "$schema": DRAFT_2020_12, "type": "array", "minItems": 0 }));
}

#[test]
fn idempotence() {
    let corpus = vec![
        json!({ "$schema": DRAFT_2020_12 }),
        json!({ "$schema": DRAFT_2020_12, "type": ["integer", "string", "integer"], "minimum": 3 }),
        json!({ "$schema": DRAFT_2020_12, "items": true, "prefixItems": [{ "const": "x" }] }),
        json!({
            "$schema": DRAFT_2020_12,
            "type": "object",
            "properties": { "a": { "type": "integer", "exclusiveMaximum": 1.5 } },
            "additionalProperties": false,
            "required": ["b"],
        }),
        json!({
            "$schema": DRAFT_2020_12,
            "anyOf": [{ "type": "boolean" }, { "enum": [false, true] }],
        }),
        json!({
            "$schema": DRAFT_2020_12,
            "$defs": { "node": { "type": "array", "items": { "$ref": "#/$defs/node" } } },
            "$ref": "#/$defs/node",
        }),
        json!({
            "$schema": DRAFT_2020_12,
            "if": { "type": "string" },
            "then": { "maxLength": 3 },
            "else": { "type": "number", "maximum": 3, "minimum": 3 },
        }),
    ];

    for schema in corpus {
        let once = canonical(schema);
        let twice = canonical(once.clone());
        assert_eq!(once, twice);
    }
}

#[test]
fn unknown_dialect() {
    let mut schema = json!({ "type": "string" });
    let error = canonicalize(&mut schema, &OfficialResolver, None).unwrap_err();
    assert_eq!(error.to_string(), "could not determine the base dialect of the schema");
}

#[test]
fn default_dialect() {
    let mut schema = json!({ "type": "boolean" });
    canonicalize(&mut schema, &OfficialResolver, Some(DRAFT_2020_12)).unwrap();
    assert_eq!(schema, json!({ "enum": [false, true] }));
}
