use super::replace;
use crate::bundle::{Rule, RuleContext};
use crate::schema::{is_type, keyword, vocabularies};
use serde_json::{Map, Value};

fn is_string(schema: &Value, context: &RuleContext<'_>) -> bool {
    context.has_vocabulary(vocabularies::VALIDATION) && is_type(schema, "string")
}

pub struct StringDate;

impl Rule for StringDate {
    fn name(&self) -> &'static str {
        "string_date"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        is_string(schema, context)
            && (context.has_vocabulary(vocabularies::FORMAT_ANNOTATION)
                || context.has_vocabulary(vocabularies::FORMAT_ASSERTION))
            && keyword(schema, "format").and_then(Value::as_str) == Some("date")
    }

    fn transform(&self, schema: &mut Value) {
        replace(schema, "RFC3339_DATE_INTEGER_TRIPLET", Map::new());
    }
}

/// `minLength` counts code points, and a string never has fewer UTF-8 bytes than code points, so it is a sound lower
/// bound on the byte length.
pub struct StringLowerBound;

impl Rule for StringLowerBound {
    fn name(&self) -> &'static str {
        "string_lower_bound"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        is_string(schema, context) && keyword(schema, "minLength").map_or(false, Value::is_u64)
    }

    fn transform(&self, schema: &mut Value) {
        let minimum = match keyword(schema, "minLength").and_then(Value::as_u64) {
            Some(minimum) => minimum,
            None => return,
        };
        let mut options = Map::new();
        options.insert("minimum".to_string(), Value::from(minimum));
        replace(schema, "FLOOR_VARINT_PREFIX_UTF8_STRING_SHARED", options);
    }
}
