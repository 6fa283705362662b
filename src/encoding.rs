//! The binary encodings a schema node can be compiled to.
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// The `$schema` identifier of an encoding marker.
pub const ENCODING_SCHEMA: &str = "tag:binpack,2024:encoding/v1";

/// The marker keyword holding the encoding name.
pub const ENCODING_KEYWORD: &str = "binpackEncoding";

/// The marker keyword holding the encoding options.
pub const OPTIONS_KEYWORD: &str = "binpackOptions";

/// A concrete binary layout for one schema node.
///
/// Integer bounds are signed 64-bit values and multipliers are strictly positive. Container variants share their
/// default element, key, and value encodings through [`Arc`], so a parsed tree can be cloned cheaply and used from
/// several threads at once.
#[derive(Debug, Clone, PartialEq)]
pub enum Encoding {
    /// An integer in `[minimum, maximum]`, divisible by `multiplier`, stored as a single byte.
    BoundedMultiple8BitsEnumFixed {
        /// The inclusive lower bound.
        minimum: i64,
        /// The inclusive upper bound.
        maximum: i64,
        /// The divisor of every admissible value.
        multiplier: u64,
    },
    /// An integer greater than or equal to `minimum`, stored as a varint offset from the bound.
    FloorMultipleEnumVarint {
        /// The inclusive lower bound.
        minimum: i64,
        /// The divisor of every admissible value.
        multiplier: u64,
    },
    /// An integer less than or equal to `maximum`, stored as a varint distance to the bound.
    RoofMultipleMirrorEnumVarint {
        /// The inclusive upper bound.
        maximum: i64,
        /// The divisor of every admissible value.
        multiplier: u64,
    },
    /// An unbounded integer, stored as a ZigZag varint.
    ArbitraryMultipleZigzagVarint {
        /// The divisor of every admissible value.
        multiplier: u64,
    },
    /// A real number, stored as a ZigZag varint of its significant digits and a varint decimal point position.
    DoubleVarintTuple,
    /// One of up to 256 choices, stored as a byte index.
    ByteChoiceIndex {
        /// The admissible values, in order.
        choices: Vec<Value>,
    },
    /// One of an arbitrary number of choices, stored as a varint index.
    LargeChoiceIndex {
        /// The admissible values, in order.
        choices: Vec<Value>,
    },
    /// One of up to 256 choices at the root of a document, where the first choice takes no space.
    TopLevelByteChoiceIndex {
        /// The admissible values, in order.
        choices: Vec<Value>,
    },
    /// A constant, which takes no space.
    ConstNone {
        /// The only admissible value.
        value: Value,
    },
    /// A string of a known UTF-8 byte length.
    Utf8StringNoLength {
        /// The length of the string in bytes.
        size: u64,
    },
    /// A string of at least `minimum` bytes, prefixed by its length and shared on repetition.
    FloorVarintPrefixUtf8StringShared {
        /// The minimum length of the string in bytes.
        minimum: u64,
    },
    /// A string of at most `maximum` bytes, prefixed by its distance to the maximum length and shared on repetition.
    RoofVarintPrefixUtf8StringShared {
        /// The maximum length of the string in bytes.
        maximum: u64,
    },
    /// A string whose byte length lies in a range narrower than 255, prefixed by a length byte and shared on
    /// repetition.
    Bounded8BitPrefixUtf8StringShared {
        /// The minimum length of the string in bytes.
        minimum: u64,
        /// The maximum length of the string in bytes.
        maximum: u64,
    },
    /// A `YYYY-MM-DD` date, stored as a 16-bit little endian year followed by a month and a day byte.
    Rfc3339DateIntegerTriplet,
    /// A string prefixed by its length plus one, shared on repetition.
    PrefixVarintLengthStringShared,
    /// An array of exactly `size` elements.
    FixedTypedArray {
        /// The number of elements.
        size: u64,
        /// The encoding of elements without a positional encoding.
        encoding: Arc<Encoding>,
        /// The encodings of the leading elements.
        prefix_encodings: Vec<Encoding>,
    },
    /// An array whose length lies in `[minimum, maximum]`, with the length stored as a byte.
    Bounded8BitsTypedArray {
        /// The minimum number of elements.
        minimum: u64,
        /// The maximum number of elements.
        maximum: u64,
        /// The encoding of elements without a positional encoding.
        encoding: Arc<Encoding>,
        /// The encodings of the leading elements.
        prefix_encodings: Vec<Encoding>,
    },
    /// An array of at least `minimum` elements, with the length stored as a varint.
    FloorTypedArray {
        /// The minimum number of elements.
        minimum: u64,
        /// The encoding of elements without a positional encoding.
        encoding: Arc<Encoding>,
        /// The encodings of the leading elements.
        prefix_encodings: Vec<Encoding>,
    },
    /// An array of at most `maximum` elements, with the distance to the maximum length stored as a varint.
    RoofTypedArray {
        /// The maximum number of elements.
        maximum: u64,
        /// The encoding of elements without a positional encoding.
        encoding: Arc<Encoding>,
        /// The encodings of the leading elements.
        prefix_encodings: Vec<Encoding>,
    },
    /// An object with exactly `size` properties.
    FixedTypedArbitraryObject {
        /// The number of properties.
        size: u64,
        /// The encoding of every key.
        key_encoding: Arc<Encoding>,
        /// The encoding of every value.
        encoding: Arc<Encoding>,
    },
    /// An object with a varint property count.
    VarintTypedArbitraryObject {
        /// The encoding of every key.
        key_encoding: Arc<Encoding>,
        /// The encoding of every value.
        encoding: Arc<Encoding>,
    },
    /// Any JSON value, prefixed by a packed type tag byte.
    AnyPackedTypeTagBytePrefix,
}

impl Encoding {
    /// Returns the marker name of the encoding.
    pub fn name(&self) -> &'static str {
        match self {
            Encoding::BoundedMultiple8BitsEnumFixed { .. } => "BOUNDED_MULTIPLE_8BITS_ENUM_FIXED",
            Encoding::FloorMultipleEnumVarint { .. } => "FLOOR_MULTIPLE_ENUM_VARINT",
            Encoding::RoofMultipleMirrorEnumVarint { .. } => "ROOF_MULTIPLE_MIRROR_ENUM_VARINT",
            Encoding::ArbitraryMultipleZigzagVarint { .. } => "ARBITRARY_MULTIPLE_ZIGZAG_VARINT",
            Encoding::DoubleVarintTuple => "DOUBLE_VARINT_TUPLE",
            Encoding::ByteChoiceIndex { .. } => "BYTE_CHOICE_INDEX",
            Encoding::LargeChoiceIndex { .. } => "LARGE_CHOICE_INDEX",
            Encoding::TopLevelByteChoiceIndex { .. } => "TOP_LEVEL_BYTE_CHOICE_INDEX",
            Encoding::ConstNone { .. } => "CONST_NONE",
            Encoding::Utf8StringNoLength { .. } => "UTF8_STRING_NO_LENGTH",
            Encoding::FloorVarintPrefixUtf8StringShared { .. } => "FLOOR_VARINT_PREFIX_UTF8_STRING_SHARED",
            Encoding::RoofVarintPrefixUtf8StringShared { .. } => "ROOF_VARINT_PREFIX_UTF8_STRING_SHARED",
            Encoding::Bounded8BitPrefixUtf8StringShared { .. } => "BOUNDED_8BIT_PREFIX_UTF8_STRING_SHARED",
            Encoding::Rfc3339DateIntegerTriplet => "RFC3339_DATE_INTEGER_TRIPLET",
            Encoding::PrefixVarintLengthStringShared => "PREFIX_VARINT_LENGTH_STRING_SHARED",
            Encoding::FixedTypedArray { .. } => "FIXED_TYPED_ARRAY",
            Encoding::Bounded8BitsTypedArray { .. } => "BOUNDED_8BITS_TYPED_ARRAY",
            Encoding::FloorTypedArray { .. } => "FLOOR_TYPED_ARRAY",
            Encoding::RoofTypedArray { .. } => "ROOF_TYPED_ARRAY",
            Encoding::FixedTypedArbitraryObject { .. } => "FIXED_TYPED_ARBITRARY_OBJECT",
            Encoding::VarintTypedArbitraryObject { .. } => "VARINT_TYPED_ARBITRARY_OBJECT",
            Encoding::AnyPackedTypeTagBytePrefix => "ANY_PACKED_TYPE_TAG_BYTE_PREFIX",
        }
    }

    /// Serializes the encoding into a root encoding marker.
    ///
    /// The result is accepted by [`parse`](crate::parse), which returns an equal encoding.
    pub fn to_marker(&self) -> Value {
        let mut marker = self.to_nested_marker();
        if let Value::Object(map) = &mut marker {
            map.insert("$schema".to_string(), Value::from(ENCODING_SCHEMA));
        }
        marker
    }

    fn to_nested_marker(&self) -> Value {
        json!({
            ENCODING_KEYWORD: self.name(),
            OPTIONS_KEYWORD: self.options(),
        })
    }

    fn options(&self) -> Value {
        match self {
            Encoding::BoundedMultiple8BitsEnumFixed {
                minimum,
                maximum,
                multiplier,
            } => json!({ "minimum": minimum, "maximum": maximum, "multiplier": multiplier }),
            Encoding::FloorMultipleEnumVarint {
                minimum,
                multiplier,
            } => json!({ "minimum": minimum, "multiplier": multiplier }),
            Encoding::RoofMultipleMirrorEnumVarint {
                maximum,
                multiplier,
            } => json!({ "maximum": maximum, "multiplier": multiplier }),
            Encoding::ArbitraryMultipleZigzagVarint { multiplier } => json!({ "multiplier": multiplier }),
            Encoding::ByteChoiceIndex { choices }
            | Encoding::LargeChoiceIndex { choices }
            | Encoding::TopLevelByteChoiceIndex { choices } => json!({ "choices": choices }),
            Encoding::ConstNone { value } => json!({ "value": value }),
            Encoding::Utf8StringNoLength { size } => json!({ "size": size }),
            Encoding::FloorVarintPrefixUtf8StringShared { minimum } => json!({ "minimum": minimum }),
            Encoding::RoofVarintPrefixUtf8StringShared { maximum } => json!({ "maximum": maximum }),
            Encoding::Bounded8BitPrefixUtf8StringShared { minimum, maximum } => {
                json!({ "minimum": minimum, "maximum": maximum })
            }
            Encoding::FixedTypedArray {
                size,
                encoding,
                prefix_encodings,
            } => {
                let mut options = array_options(encoding, prefix_encodings);
                options.insert("size".to_string(), Value::from(*size));
                Value::Object(options)
            }
            Encoding::Bounded8BitsTypedArray {
                minimum,
                maximum,
                encoding,
                prefix_encodings,
            } => {
                let mut options = array_options(encoding, prefix_encodings);
                options.insert("minimum".to_string(), Value::from(*minimum));
                options.insert("maximum".to_string(), Value::from(*maximum));
                Value::Object(options)
            }
            Encoding::FloorTypedArray {
                minimum,
                encoding,
                prefix_encodings,
            } => {
                let mut options = array_options(encoding, prefix_encodings);
                options.insert("minimum".to_string(), Value::from(*minimum));
                Value::Object(options)
            }
            Encoding::RoofTypedArray {
                maximum,
                encoding,
                prefix_encodings,
            } => {
                let mut options = array_options(encoding, prefix_encodings);
                options.insert("maximum".to_string(), Value::from(*maximum));
                Value::Object(options)
            }
            Encoding::FixedTypedArbitraryObject {
                size,
                key_encoding,
                encoding,
            } => json!({
                "size": size,
                "keyEncoding": key_encoding.to_nested_marker(),
                "encoding": encoding.to_nested_marker(),
            }),
            Encoding::VarintTypedArbitraryObject {
                key_encoding,
                encoding,
            } => json!({
                "keyEncoding": key_encoding.to_nested_marker(),
                "encoding": encoding.to_nested_marker(),
            }),
            Encoding::DoubleVarintTuple
            | Encoding::Rfc3339DateIntegerTriplet
            | Encoding::PrefixVarintLengthStringShared
            | Encoding::AnyPackedTypeTagBytePrefix => Value::Object(Map::new()),
        }
    }
}

fn array_options(encoding: &Encoding, prefix_encodings: &[Encoding]) -> Map<String, Value> {
    let mut options = Map::new();
    options.insert("encoding".to_string(), encoding.to_nested_marker());
    options.insert(
        "prefixEncodings".to_string(),
        Value::Array(prefix_encodings.iter().map(Encoding::to_nested_marker).collect()),
    );
    options
}

/// Returns `true` if the JSON value is a root encoding marker rather than a schema.
pub fn is_encoding(value: &Value) -> bool {
    match value {
        Value::Object(map) => {
            map.get("$schema").and_then(Value::as_str) == Some(ENCODING_SCHEMA)
                && map.get(ENCODING_KEYWORD).map_or(false, Value::is_string)
                && map.get(OPTIONS_KEYWORD).map_or(false, Value::is_object)
        }
        _ => false,
    }
}

/// Builds a root encoding marker from a name and its options.
pub(crate) fn make_marker(name: &str, options: Value) -> Value {
    json!({
        "$schema": ENCODING_SCHEMA,
        ENCODING_KEYWORD: name,
        OPTIONS_KEYWORD: options,
    })
}

/// Strips the `$schema` keyword of a root marker so it can be embedded in the options of another marker.
pub(crate) fn nest_marker(mut marker: Value) -> Value {
    if let Value::Object(map) = &mut marker {
        map.remove("$schema");
    }
    marker
}
