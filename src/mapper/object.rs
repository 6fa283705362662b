use super::{any_marker, nested, replace};
use crate::bundle::{Rule, RuleContext};
use crate::encoding::{is_encoding, nest_marker, Encoding};
use crate::schema::{is_type, keyword, vocabularies};
use serde_json::{Map, Value};

// Returns `true` for object nodes that only constrain their keys and values as a whole.
fn is_arbitrary_object(schema: &Value, context: &RuleContext<'_>) -> bool {
    if !context.has_vocabulary(vocabularies::VALIDATION)
        || !context.has_vocabulary(vocabularies::APPLICATOR)
        || !is_type(schema, "object")
    {
        return false;
    }

    let named = keyword(schema, "properties")
        .and_then(Value::as_object)
        .map_or(false, |properties| !properties.is_empty());
    if named || keyword(schema, "patternProperties").is_some() || keyword(schema, "dependentSchemas").is_some() {
        return false;
    }

    ["additionalProperties", "propertyNames"]
        .iter()
        .all(|child| keyword(schema, child).map_or(true, is_encoding))
}

fn pair_options(schema: &Value) -> Map<String, Value> {
    let key_encoding = nested(schema, "propertyNames")
        .unwrap_or_else(|| nest_marker(Encoding::PrefixVarintLengthStringShared.to_marker()));
    let encoding = nested(schema, "additionalProperties").unwrap_or_else(any_marker);

    let mut options = Map::new();
    options.insert("keyEncoding".to_string(), key_encoding);
    options.insert("encoding".to_string(), encoding);
    options
}

fn size_bounds(schema: &Value) -> (Option<u64>, Option<u64>) {
    (
        keyword(schema, "minProperties").and_then(Value::as_u64),
        keyword(schema, "maxProperties").and_then(Value::as_u64),
    )
}

pub struct ObjectFixedSize;

impl Rule for ObjectFixedSize {
    fn name(&self) -> &'static str {
        "object_fixed_size"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        is_arbitrary_object(schema, context)
            && match size_bounds(schema) {
                (Some(minimum), Some(maximum)) => minimum == maximum,
                _ => false,
            }
    }

    fn transform(&self, schema: &mut Value) {
        let size = size_bounds(schema).0.unwrap_or(0);
        let mut options = pair_options(schema);
        options.insert("size".to_string(), Value::from(size));
        replace(schema, "FIXED_TYPED_ARBITRARY_OBJECT", options);
    }
}

pub struct ObjectArbitrary;

impl Rule for ObjectArbitrary {
    fn name(&self) -> &'static str {
        "object_arbitrary"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        is_arbitrary_object(schema, context)
    }

    fn transform(&self, schema: &mut Value) {
        let options = pair_options(schema);
        replace(schema, "VARINT_TYPED_ARBITRARY_OBJECT", options);
    }
}
