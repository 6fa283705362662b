//! Converts encoding markers into [`Encoding`] trees.
use crate::encoding::{is_encoding, Encoding, ENCODING_KEYWORD, ENCODING_SCHEMA, OPTIONS_KEYWORD};
use crate::Error;
use serde::de::{self, DeserializeOwned};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct BoundedIntegerOptions {
    minimum: i64,
    maximum: i64,
    multiplier: u64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FloorIntegerOptions {
    minimum: i64,
    multiplier: u64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RoofIntegerOptions {
    maximum: i64,
    multiplier: u64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MultiplierOptions {
    multiplier: u64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ChoicesOptions {
    choices: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConstOptions {
    value: Value,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SizeOptions {
    size: u64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MinimumOptions {
    minimum: u64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MaximumOptions {
    maximum: u64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RangeOptions {
    minimum: u64,
    maximum: u64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct EmptyOptions {}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct ArrayOptions {
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    minimum: Option<u64>,
    #[serde(default)]
    maximum: Option<u64>,
    encoding: Value,
    prefix_encodings: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct ObjectOptions {
    #[serde(default)]
    size: Option<u64>,
    key_encoding: Value,
    encoding: Value,
}

/// The length indicator of a typed array encoding.
#[derive(Clone, Copy)]
enum ArrayKind {
    Fixed,
    Bounded,
    Floor,
    Roof,
}

/// Parses a root encoding marker.
///
/// The marker must carry the encoding `$schema`. Markers nested in the options of a container may omit it.
pub fn parse(marker: &Value) -> Result<Encoding, Error> {
    if !is_encoding(marker) {
        return Err(Error::not_an_encoding());
    }
    parse_marker(marker)
}

fn parse_marker(marker: &Value) -> Result<Encoding, Error> {
    let map = marker.as_object().ok_or_else(Error::not_an_encoding)?;
    if let Some(schema) = map.get("$schema") {
        if schema.as_str() != Some(ENCODING_SCHEMA) {
            return Err(Error::not_an_encoding());
        }
    }

    let name = map
        .get(ENCODING_KEYWORD)
        .and_then(Value::as_str)
        .ok_or_else(Error::not_an_encoding)?;
    let options = map
        .get(OPTIONS_KEYWORD)
        .filter(|options| options.is_object())
        .ok_or_else(Error::not_an_encoding)?;

    let encoding = match name {
        "BOUNDED_MULTIPLE_8BITS_ENUM_FIXED" => {
            let o: BoundedIntegerOptions = deserialize(name, options)?;
            Encoding::BoundedMultiple8BitsEnumFixed {
                minimum: o.minimum,
                maximum: o.maximum,
                multiplier: positive(name, o.multiplier)?,
            }
        }
        "FLOOR_MULTIPLE_ENUM_VARINT" => {
            let o: FloorIntegerOptions = deserialize(name, options)?;
            Encoding::FloorMultipleEnumVarint {
                minimum: o.minimum,
                multiplier: positive(name, o.multiplier)?,
            }
        }
        "ROOF_MULTIPLE_MIRROR_ENUM_VARINT" => {
            let o: RoofIntegerOptions = deserialize(name, options)?;
            Encoding::RoofMultipleMirrorEnumVarint {
                maximum: o.maximum,
                multiplier: positive(name, o.multiplier)?,
            }
        }
        "ARBITRARY_MULTIPLE_ZIGZAG_VARINT" => {
            let o: MultiplierOptions = deserialize(name, options)?;
            Encoding::ArbitraryMultipleZigzagVarint {
                multiplier: positive(name, o.multiplier)?,
            }
        }
        "DOUBLE_VARINT_TUPLE" => {
            deserialize::<EmptyOptions>(name, options)?;
            Encoding::DoubleVarintTuple
        }
        "BYTE_CHOICE_INDEX" => Encoding::ByteChoiceIndex {
            choices: deserialize::<ChoicesOptions>(name, options)?.choices,
        },
        "LARGE_CHOICE_INDEX" => Encoding::LargeChoiceIndex {
            choices: deserialize::<ChoicesOptions>(name, options)?.choices,
        },
        "TOP_LEVEL_BYTE_CHOICE_INDEX" => Encoding::TopLevelByteChoiceIndex {
            choices: deserialize::<ChoicesOptions>(name, options)?.choices,
        },
        "CONST_NONE" => Encoding::ConstNone {
            value: deserialize::<ConstOptions>(name, options)?.value,
        },
        "UTF8_STRING_NO_LENGTH" => Encoding::Utf8StringNoLength {
            size: deserialize::<SizeOptions>(name, options)?.size,
        },
        "FLOOR_VARINT_PREFIX_UTF8_STRING_SHARED" => Encoding::FloorVarintPrefixUtf8StringShared {
            minimum: deserialize::<MinimumOptions>(name, options)?.minimum,
        },
        "ROOF_VARINT_PREFIX_UTF8_STRING_SHARED" => Encoding::RoofVarintPrefixUtf8StringShared {
            maximum: deserialize::<MaximumOptions>(name, options)?.maximum,
        },
        "BOUNDED_8BIT_PREFIX_UTF8_STRING_SHARED" => {
            let o: RangeOptions = deserialize(name, options)?;
            Encoding::Bounded8BitPrefixUtf8StringShared {
                minimum: o.minimum,
                maximum: o.maximum,
            }
        }
        "RFC3339_DATE_INTEGER_TRIPLET" => {
            deserialize::<EmptyOptions>(name, options)?;
            Encoding::Rfc3339DateIntegerTriplet
        }
        "PREFIX_VARINT_LENGTH_STRING_SHARED" => {
            deserialize::<EmptyOptions>(name, options)?;
            Encoding::PrefixVarintLengthStringShared
        }
        "FIXED_TYPED_ARRAY" => parse_array(name, options, ArrayKind::Fixed)?,
        "BOUNDED_8BITS_TYPED_ARRAY" => parse_array(name, options, ArrayKind::Bounded)?,
        "FLOOR_TYPED_ARRAY" => parse_array(name, options, ArrayKind::Floor)?,
        "ROOF_TYPED_ARRAY" => parse_array(name, options, ArrayKind::Roof)?,
        "FIXED_TYPED_ARBITRARY_OBJECT" => {
            let o: ObjectOptions = deserialize(name, options)?;
            Encoding::FixedTypedArbitraryObject {
                size: required(name, o.size, "size")?,
                key_encoding: Arc::new(parse_marker(&o.key_encoding)?),
                encoding: Arc::new(parse_marker(&o.encoding)?),
            }
        }
        "VARINT_TYPED_ARBITRARY_OBJECT" => {
            let o: ObjectOptions = deserialize(name, options)?;
            forbidden(name, o.size.is_some(), "size")?;
            Encoding::VarintTypedArbitraryObject {
                key_encoding: Arc::new(parse_marker(&o.key_encoding)?),
                encoding: Arc::new(parse_marker(&o.encoding)?),
            }
        }
        "ANY_PACKED_TYPE_TAG_BYTE_PREFIX" => {
            deserialize::<EmptyOptions>(name, options)?;
            Encoding::AnyPackedTypeTagBytePrefix
        }
        _ => return Err(Error::unknown_encoding(name)),
    };

    Ok(encoding)
}

fn parse_array(name: &str, options: &Value, kind: ArrayKind) -> Result<Encoding, Error> {
    let o: ArrayOptions = deserialize(name, options)?;
    let encoding = Arc::new(parse_marker(&o.encoding)?);
    let prefix_encodings = o
        .prefix_encodings
        .iter()
        .map(parse_marker)
        .collect::<Result<Vec<_>, _>>()?;

    let encoding = match kind {
        ArrayKind::Fixed => {
            forbidden(name, o.minimum.is_some() || o.maximum.is_some(), "minimum")?;
            Encoding::FixedTypedArray {
                size: required(name, o.size, "size")?,
                encoding,
                prefix_encodings,
            }
        }
        ArrayKind::Bounded => {
            forbidden(name, o.size.is_some(), "size")?;
            Encoding::Bounded8BitsTypedArray {
                minimum: required(name, o.minimum, "minimum")?,
                maximum: required(name, o.maximum, "maximum")?,
                encoding,
                prefix_encodings,
            }
        }
        ArrayKind::Floor => {
            forbidden(name, o.size.is_some() || o.maximum.is_some(), "maximum")?;
            Encoding::FloorTypedArray {
                minimum: required(name, o.minimum, "minimum")?,
                encoding,
                prefix_encodings,
            }
        }
        ArrayKind::Roof => {
            forbidden(name, o.size.is_some() || o.minimum.is_some(), "minimum")?;
            Encoding::RoofTypedArray {
                maximum: required(name, o.maximum, "maximum")?,
                encoding,
                prefix_encodings,
            }
        }
    };

    Ok(encoding)
}

fn deserialize<T>(name: &str, options: &Value) -> Result<T, Error>
where
    T: DeserializeOwned,
{
    T::deserialize(options).map_err(|e| Error::invalid_options(name, e))
}

fn positive(name: &str, multiplier: u64) -> Result<u64, Error> {
    if multiplier == 0 {
        return Err(Error::invalid_options(
            name,
            de::Error::invalid_value(de::Unexpected::Unsigned(0), &"a positive multiplier"),
        ));
    }
    Ok(multiplier)
}

fn required(name: &str, value: Option<u64>, field: &'static str) -> Result<u64, Error> {
    value.ok_or_else(|| Error::invalid_options(name, de::Error::missing_field(field)))
}

fn forbidden(name: &str, present: bool, field: &'static str) -> Result<(), Error> {
    if present {
        return Err(Error::invalid_options(name, de::Error::unknown_field(field, &[])));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn integer() {
        let marker = json!({
            "$schema": ENCODING_SCHEMA,
            "binpackEncoding": "BOUNDED_MULTIPLE_8BITS_ENUM_FIXED",
            "binpackOptions": { "minimum": 1, "maximum": 19, "multiplier": 5 },
        });
        assert_eq!(
            parse(&marker).unwrap(),
            Encoding::BoundedMultiple8BitsEnumFixed {
                minimum: 1,
                maximum: 19,
                multiplier: 5
            }
        );
    }

    #[test]
    fn nested_markers() {
        let marker = json!({
            "$schema": ENCODING_SCHEMA,
            "binpackEncoding": "FLOOR_TYPED_ARRAY",
            "binpackOptions": {
                "minimum": 0,
                "encoding": {
                    "binpackEncoding": "UTF8_STRING_NO_LENGTH",
                    "binpackOptions": { "size": 3 },
                },
                "prefixEncodings": [{
                    "binpackEncoding": "CONST_NONE",
                    "binpackOptions": { "value": true },
                }],
            },
        });
        assert_eq!(
            parse(&marker).unwrap(),
            Encoding::FloorTypedArray {
                minimum: 0,
                encoding: Arc::new(Encoding::Utf8StringNoLength { size: 3 }),
                prefix_encodings: vec![Encoding::ConstNone { value: json!(true) }],
            }
        );
    }

    #[test]
    fn root_requires_schema() {
        let marker = json!({
            "binpackEncoding": "DOUBLE_VARINT_TUPLE",
            "binpackOptions": {},
        });
        let error = parse(&marker).unwrap_err();
        assert_eq!(error.to_string(), "schema is not an encoding marker");
    }

    #[test]
    fn unknown_encoding() {
        let marker = json!({
            "$schema": ENCODING_SCHEMA,
            "binpackEncoding": "HUFFMAN",
            "binpackOptions": {},
        });
        let error = parse(&marker).unwrap_err();
        assert_eq!(error.to_string(), "unknown encoding `HUFFMAN`");
    }

    #[test]
    fn invalid_options() {
        let missing = json!({
            "$schema": ENCODING_SCHEMA,
            "binpackEncoding": "FLOOR_MULTIPLE_ENUM_VARINT",
            "binpackOptions": { "minimum": 0 },
        });
        let error = parse(&missing).unwrap_err();
        assert!(error.to_string().starts_with("invalid options for `FLOOR_MULTIPLE_ENUM_VARINT`"));

        let unknown = json!({
            "$schema": ENCODING_SCHEMA,
            "binpackEncoding": "DOUBLE_VARINT_TUPLE",
            "binpackOptions": { "precision": 2 },
        });
        assert!(parse(&unknown).is_err());

        let malformed = json!({
            "$schema": ENCODING_SCHEMA,
            "binpackEncoding": "UTF8_STRING_NO_LENGTH",
            "binpackOptions": { "size": -1 },
        });
        assert!(parse(&malformed).is_err());

        let zero = json!({
            "$schema": ENCODING_SCHEMA,
            "binpackEncoding": "ARBITRARY_MULTIPLE_ZIGZAG_VARINT",
            "binpackOptions": { "multiplier": 0 },
        });
        assert!(parse(&zero).is_err());
    }

    #[test]
    fn markers_round_trip() {
        let any = Arc::new(Encoding::AnyPackedTypeTagBytePrefix);
        let encodings = vec![
            Encoding::RoofMultipleMirrorEnumVarint {
                maximum: -3,
                multiplier: 2,
            },
            Encoding::LargeChoiceIndex {
                choices: vec![json!("a"), json!({ "b": [1, 2] })],
            },
            Encoding::Bounded8BitPrefixUtf8StringShared { minimum: 2, maximum: 40 },
            Encoding::RoofTypedArray {
                maximum: 8,
                encoding: any.clone(),
                prefix_encodings: vec![Encoding::Rfc3339DateIntegerTriplet],
            },
            Encoding::FixedTypedArbitraryObject {
                size: 2,
                key_encoding: Arc::new(Encoding::PrefixVarintLengthStringShared),
                encoding: any,
            },
        ];

        for encoding in encodings {
            assert_eq!(parse(&encoding.to_marker()).unwrap(), encoding);
        }
    }
}
