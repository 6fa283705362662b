use super::numeric::exact;
use super::{CORE_KEYWORDS, META_DATA_KEYWORDS};
use crate::bundle::{Rule, RuleContext};
use crate::schema::{defines, has_duplicates, is_numeric_type, is_type, keyword, unique, vocabularies};
use serde_json::{json, Value};
use std::convert::TryFrom;

/// `const: x` becomes `enum: [x]`.
pub struct ConstAsEnum;

impl Rule for ConstAsEnum {
    fn name(&self) -> &'static str {
        "const_as_enum"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        context.has_vocabulary(vocabularies::VALIDATION) && defines(schema, "const") && !defines(schema, "enum")
    }

    fn transform(&self, schema: &mut Value) {
        if let Some(map) = schema.as_object_mut() {
            if let Some(value) = map.remove("const") {
                map.insert("enum".to_string(), Value::Array(vec![value]));
            }
        }
    }
}

pub struct DuplicateEnumValues;

impl Rule for DuplicateEnumValues {
    fn name(&self) -> &'static str {
        "duplicate_enum_values"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        context.has_vocabulary(vocabularies::VALIDATION)
            && keyword(schema, "enum")
                .and_then(Value::as_array)
                .map_or(false, |values| has_duplicates(values))
    }

    fn transform(&self, schema: &mut Value) {
        if let Some(Value::Array(values)) = schema.get_mut("enum") {
            unique(values);
        }
    }
}

/// An enumeration is the tightest possible constraint, so every other validation keyword beside it is redundant.
pub struct DropKeywordsBesideEnum;

impl DropKeywordsBesideEnum {
    fn is_redundant(keyword: &str) -> bool {
        keyword != "enum" && !CORE_KEYWORDS.contains(&keyword) && !META_DATA_KEYWORDS.contains(&keyword)
    }
}

impl Rule for DropKeywordsBesideEnum {
    fn name(&self) -> &'static str {
        "drop_keywords_beside_enum"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        if !context.has_vocabulary(vocabularies::VALIDATION) {
            return false;
        }

        match schema.as_object() {
            Some(map) if map.get("enum").map_or(false, Value::is_array) => {
                map.keys().any(|keyword| Self::is_redundant(keyword))
            }
            _ => false,
        }
    }

    fn transform(&self, schema: &mut Value) {
        if let Some(map) = schema.as_object_mut() {
            map.retain(|keyword, _| !Self::is_redundant(keyword));
        }
    }
}

/// Replaces a single-valued `type` with the enumeration of its instances.
pub struct TypeAsEnum {
    name: &'static str,
    type_name: &'static str,
    choices: fn() -> Value,
}

pub const TYPE_BOOLEAN_AS_ENUM: TypeAsEnum = TypeAsEnum {
    name: "type_boolean_as_enum",
    type_name: "boolean",
    choices: || json!([false, true]),
};

pub const TYPE_NULL_AS_ENUM: TypeAsEnum = TypeAsEnum {
    name: "type_null_as_enum",
    type_name: "null",
    choices: || json!([null]),
};

impl Rule for TypeAsEnum {
    fn name(&self) -> &'static str {
        self.name
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        context.has_vocabulary(vocabularies::VALIDATION) && is_type(schema, self.type_name) && !defines(schema, "enum")
    }

    fn transform(&self, schema: &mut Value) {
        if let Some(map) = schema.as_object_mut() {
            map.remove("type");
            map.insert("enum".to_string(), (self.choices)());
        }
    }
}

/// A numeric node whose bounds coincide admits a single value.
pub struct EqualNumericBoundsAsConst;

impl Rule for EqualNumericBoundsAsConst {
    fn name(&self) -> &'static str {
        "equal_numeric_bounds_as_const"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        if !context.has_vocabulary(vocabularies::VALIDATION) || !is_numeric_type(schema) || defines(schema, "enum") {
            return false;
        }

        let (minimum, maximum) = match (keyword(schema, "minimum"), keyword(schema, "maximum")) {
            (Some(minimum), Some(maximum)) => (minimum, maximum),
            _ => return false,
        };
        // integral bounds compare exactly, whatever their representation
        match (exact(minimum), exact(maximum)) {
            (Some(minimum), Some(maximum)) => minimum == maximum,
            _ if is_type(schema, "integer") => false,
            _ => match (minimum.as_f64(), maximum.as_f64()) {
                (Some(minimum), Some(maximum)) => minimum == maximum,
                _ => false,
            },
        }
    }

    fn transform(&self, schema: &mut Value) {
        let integer = is_type(schema, "integer");
        if let Some(map) = schema.as_object_mut() {
            let minimum = match map.remove("minimum") {
                Some(minimum) => minimum,
                None => return,
            };
            let value = match exact(&minimum).and_then(|exact| i64::try_from(exact).ok()) {
                Some(exact) if integer && minimum.is_f64() => Value::from(exact),
                _ => minimum,
            };
            map.remove("maximum");
            map.insert("enum".to_string(), Value::Array(vec![value]));
        }
    }
}

/// A container limited to zero elements is a constant.
pub struct EmptyAsConst {
    name: &'static str,
    type_name: &'static str,
    keyword: &'static str,
    value: fn() -> Value,
}

pub const EMPTY_STRING_AS_CONST: EmptyAsConst = EmptyAsConst {
    name: "empty_string_as_const",
    type_name: "string",
    keyword: "maxLength",
    value: || json!(""),
};

pub const EMPTY_ARRAY_AS_CONST: EmptyAsConst = EmptyAsConst {
    name: "empty_array_as_const",
    type_name: "array",
    keyword: "maxItems",
    value: || json!([]),
};

pub const EMPTY_OBJECT_AS_CONST: EmptyAsConst = EmptyAsConst {
    name: "empty_object_as_const",
    type_name: "object",
    keyword: "maxProperties",
    value: || json!({}),
};

impl Rule for EmptyAsConst {
    fn name(&self) -> &'static str {
        self.name
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        context.has_vocabulary(vocabularies::VALIDATION)
            && is_type(schema, self.type_name)
            && !defines(schema, "enum")
            && keyword(schema, self.keyword).and_then(Value::as_f64) == Some(0.0)
    }

    fn transform(&self, schema: &mut Value) {
        if let Some(map) = schema.as_object_mut() {
            map.insert("enum".to_string(), Value::Array(vec![(self.value)()]));
        }
    }
}
