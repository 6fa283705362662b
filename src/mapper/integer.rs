use super::replace;
use super::states::{bounds, multiplier};
use crate::bundle::{Rule, RuleContext};
use crate::numeric::{divide_ceil, divide_floor, is_byte};
use crate::schema::{is_type, vocabularies};
use serde_json::{Map, Value};

fn is_integer(schema: &Value, context: &RuleContext<'_>) -> bool {
    context.has_vocabulary(vocabularies::VALIDATION) && is_type(schema, "integer")
}

fn fits_byte(minimum: i64, maximum: i64, multiplier: u64) -> bool {
    let states = i128::from(divide_floor(maximum, multiplier)) - i128::from(divide_ceil(minimum, multiplier));
    is_byte(states)
}

fn options(minimum: Option<i64>, maximum: Option<i64>, multiplier: u64) -> Map<String, Value> {
    let mut options = Map::new();
    if let Some(minimum) = minimum {
        options.insert("minimum".to_string(), Value::from(minimum));
    }
    if let Some(maximum) = maximum {
        options.insert("maximum".to_string(), Value::from(maximum));
    }
    options.insert("multiplier".to_string(), Value::from(multiplier));
    options
}

/// A bounded integer with at most 256 admissible multiples fits a byte.
pub struct IntegerBounded8Bit;

impl Rule for IntegerBounded8Bit {
    fn name(&self) -> &'static str {
        "integer_bounded_8_bit"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        if !is_integer(schema, context) {
            return false;
        }
        match bounds(schema) {
            (Some(minimum), Some(maximum)) => fits_byte(minimum, maximum, multiplier(schema)),
            _ => false,
        }
    }

    fn transform(&self, schema: &mut Value) {
        let (minimum, maximum) = bounds(schema);
        let options = options(minimum, maximum, multiplier(schema));
        replace(schema, "BOUNDED_MULTIPLE_8BITS_ENUM_FIXED", options);
    }
}

/// A bounded integer with too many multiples for a byte is encoded from its lower bound.
pub struct IntegerBoundedGreaterThan8Bit;

impl Rule for IntegerBoundedGreaterThan8Bit {
    fn name(&self) -> &'static str {
        "integer_bounded_greater_than_8_bit"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        if !is_integer(schema, context) {
            return false;
        }
        match bounds(schema) {
            (Some(minimum), Some(maximum)) => !fits_byte(minimum, maximum, multiplier(schema)),
            _ => false,
        }
    }

    fn transform(&self, schema: &mut Value) {
        let (minimum, _) = bounds(schema);
        let options = options(minimum, None, multiplier(schema));
        replace(schema, "FLOOR_MULTIPLE_ENUM_VARINT", options);
    }
}

pub struct IntegerLowerBound;

impl Rule for IntegerLowerBound {
    fn name(&self) -> &'static str {
        "integer_lower_bound"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        is_integer(schema, context) && matches!(bounds(schema), (Some(_), None))
    }

    fn transform(&self, schema: &mut Value) {
        let (minimum, _) = bounds(schema);
        let options = options(minimum, None, multiplier(schema));
        replace(schema, "FLOOR_MULTIPLE_ENUM_VARINT", options);
    }
}

pub struct IntegerUpperBound;

impl Rule for IntegerUpperBound {
    fn name(&self) -> &'static str {
        "integer_upper_bound"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        is_integer(schema, context) && matches!(bounds(schema), (None, Some(_)))
    }

    fn transform(&self, schema: &mut Value) {
        let (_, maximum) = bounds(schema);
        let options = options(None, maximum, multiplier(schema));
        replace(schema, "ROOF_MULTIPLE_MIRROR_ENUM_VARINT", options);
    }
}

pub struct IntegerUnbound;

impl Rule for IntegerUnbound {
    fn name(&self) -> &'static str {
        "integer_unbound"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        is_integer(schema, context) && matches!(bounds(schema), (None, None))
    }

    fn transform(&self, schema: &mut Value) {
        let options = options(None, None, multiplier(schema));
        replace(schema, "ARBITRARY_MULTIPLE_ZIGZAG_VARINT", options);
    }
}

/// Reals are encoded as a digits and decimal point tuple whatever their bounds.
pub struct NumberArbitrary;

impl Rule for NumberArbitrary {
    fn name(&self) -> &'static str {
        "number_arbitrary"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        context.has_vocabulary(vocabularies::VALIDATION) && is_type(schema, "number")
    }

    fn transform(&self, schema: &mut Value) {
        replace(schema, "DOUBLE_VARINT_TUPLE", Map::new());
    }
}
