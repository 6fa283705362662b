use super::{any_marker, nested, replace};
use crate::bundle::{Rule, RuleContext};
use crate::encoding::{is_encoding, nest_marker};
use crate::numeric::is_byte;
use crate::schema::{is_type, keyword, vocabularies};
use serde_json::{Map, Value};

struct Bounds {
    minimum: u64,
    maximum: Option<u64>,
}

// Returns the length bounds of an array node whose children are all mapped.
fn bounds(schema: &Value, context: &RuleContext<'_>) -> Option<Bounds> {
    if !context.has_vocabulary(vocabularies::VALIDATION)
        || !context.has_vocabulary(vocabularies::APPLICATOR)
        || !is_type(schema, "array")
    {
        return None;
    }

    if let Some(items) = keyword(schema, "items") {
        if !is_encoding(items) {
            return None;
        }
    }

    if let Some(prefix) = keyword(schema, "prefixItems") {
        match prefix.as_array() {
            Some(prefix) if prefix.iter().all(is_encoding) => {}
            _ => return None,
        }
    }

    Some(Bounds {
        minimum: keyword(schema, "minItems").and_then(Value::as_u64)?,
        maximum: keyword(schema, "maxItems").and_then(Value::as_u64),
    })
}

fn element_options(schema: &Value) -> Map<String, Value> {
    let prefix = keyword(schema, "prefixItems")
        .and_then(Value::as_array)
        .map(|prefix| prefix.iter().cloned().map(nest_marker).collect())
        .unwrap_or_default();

    let mut options = Map::new();
    options.insert(
        "encoding".to_string(),
        nested(schema, "items").unwrap_or_else(any_marker),
    );
    options.insert("prefixEncodings".to_string(), Value::Array(prefix));
    options
}

pub struct ArrayFixed;

impl Rule for ArrayFixed {
    fn name(&self) -> &'static str {
        "array_fixed"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        match bounds(schema, context) {
            Some(Bounds {
                minimum,
                maximum: Some(maximum),
            }) => minimum == maximum,
            _ => false,
        }
    }

    fn transform(&self, schema: &mut Value) {
        let size = keyword(schema, "minItems").and_then(Value::as_u64).unwrap_or(0);
        let mut options = element_options(schema);
        options.insert("size".to_string(), Value::from(size));
        replace(schema, "FIXED_TYPED_ARRAY", options);
    }
}

/// An array whose length varies by at most 255 stores the length as a byte.
pub struct ArrayBounded8Bit;

impl Rule for ArrayBounded8Bit {
    fn name(&self) -> &'static str {
        "array_bounded_8_bit"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        match bounds(schema, context) {
            Some(Bounds {
                minimum,
                maximum: Some(maximum),
            }) => maximum > minimum && is_byte(maximum - minimum),
            _ => false,
        }
    }

    fn transform(&self, schema: &mut Value) {
        let minimum = keyword(schema, "minItems").and_then(Value::as_u64).unwrap_or(0);
        let maximum = keyword(schema, "maxItems").and_then(Value::as_u64).unwrap_or(minimum);
        let mut options = element_options(schema);
        options.insert("minimum".to_string(), Value::from(minimum));
        options.insert("maximum".to_string(), Value::from(maximum));
        replace(schema, "BOUNDED_8BITS_TYPED_ARRAY", options);
    }
}

pub struct ArrayLowerBound;

impl Rule for ArrayLowerBound {
    fn name(&self) -> &'static str {
        "array_lower_bound"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        bounds(schema, context).is_some()
    }

    fn transform(&self, schema: &mut Value) {
        let minimum = keyword(schema, "minItems").and_then(Value::as_u64).unwrap_or(0);
        let mut options = element_options(schema);
        options.insert("minimum".to_string(), Value::from(minimum));
        replace(schema, "FLOOR_TYPED_ARRAY", options);
    }
}
