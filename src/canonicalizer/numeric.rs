use crate::bundle::{Rule, RuleContext};
use crate::numeric::{next_down, next_up};
use crate::schema::{is_numeric_type, is_type, keyword, vocabularies};
use serde_json::Value;
use std::cmp::Ordering;

/// Returns the exact value of an integral number, whether it is written as an integer or as a real.
pub(super) fn exact(value: &Value) -> Option<i128> {
    value
        .as_i64()
        .map(i128::from)
        .or_else(|| value.as_u64().map(i128::from))
        .or_else(|| {
            value
                .as_f64()
                .filter(|real| real.fract() == 0.0 && real.abs() < 1e30)
                .map(|real| real as i128)
        })
}

/// Orders two numbers, exactly when both are integral.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (exact(a), exact(b)) {
        (Some(a), Some(b)) => Some(a.cmp(&b)),
        _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}

fn to_i64(real: f64) -> Option<i64> {
    if real >= i64::MIN as f64 && real < i64::MAX as f64 {
        Some(real as i64)
    } else {
        None
    }
}

fn floor_integer(value: &Value) -> Option<i64> {
    match value.as_i64() {
        Some(integer) => Some(integer),
        None => to_i64(value.as_f64()?.floor()),
    }
}

fn ceil_integer(value: &Value) -> Option<i64> {
    match value.as_i64() {
        Some(integer) => Some(integer),
        None => to_i64(value.as_f64()?.ceil()),
    }
}

fn finite(real: f64) -> Option<Value> {
    if real.is_finite() {
        Some(Value::from(real))
    } else {
        None
    }
}

fn is_numeric(schema: &Value, context: &RuleContext<'_>) -> bool {
    context.has_vocabulary(vocabularies::VALIDATION) && is_numeric_type(schema)
}

// The inclusive bound implied by an exclusive one, or `None` if it is not representable.
fn inclusive_maximum(schema: &Value) -> Option<Value> {
    let exclusive = keyword(schema, "exclusiveMaximum")?;
    if is_type(schema, "integer") {
        ceil_integer(exclusive)?.checked_sub(1).map(Value::from)
    } else {
        finite(next_down(exclusive.as_f64()?))
    }
}

fn inclusive_minimum(schema: &Value) -> Option<Value> {
    let exclusive = keyword(schema, "exclusiveMinimum")?;
    if is_type(schema, "integer") {
        floor_integer(exclusive)?.checked_add(1).map(Value::from)
    } else {
        finite(next_up(exclusive.as_f64()?))
    }
}

// Replaces the exclusive keyword with the tighter of the inclusive bound it implies and the current one.
fn fold(schema: &mut Value, exclusive: &str, inclusive: &str, bound: Value, keep: Ordering) {
    let map = match schema.as_object_mut() {
        Some(map) => map,
        None => return,
    };
    map.remove(exclusive);

    let tighter = match map.get(inclusive) {
        Some(current) => compare(current, &bound).map_or(false, |order| order == keep),
        None => false,
    };
    if !tighter {
        map.insert(inclusive.to_string(), bound);
    }
}

/// Folds `exclusiveMaximum` into an inclusive `maximum`.
pub struct ExclusiveMaximumToMaximum;

impl Rule for ExclusiveMaximumToMaximum {
    fn name(&self) -> &'static str {
        "exclusive_maximum_to_maximum"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        is_numeric(schema, context) && inclusive_maximum(schema).is_some()
    }

    fn transform(&self, schema: &mut Value) {
        if let Some(bound) = inclusive_maximum(schema) {
            fold(schema, "exclusiveMaximum", "maximum", bound, Ordering::Less);
        }
    }
}

/// Folds `exclusiveMinimum` into an inclusive `minimum`.
pub struct ExclusiveMinimumToMinimum;

impl Rule for ExclusiveMinimumToMinimum {
    fn name(&self) -> &'static str {
        "exclusive_minimum_to_minimum"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        is_numeric(schema, context) && inclusive_minimum(schema).is_some()
    }

    fn transform(&self, schema: &mut Value) {
        if let Some(bound) = inclusive_minimum(schema) {
            fold(schema, "exclusiveMinimum", "minimum", bound, Ordering::Greater);
        }
    }
}

/// Integer bounds written as reals are rounded inwards.
///
/// Bounds beyond the 64-bit range are left alone.
pub struct IntegerRealBounds;

impl IntegerRealBounds {
    fn rounded(schema: &Value) -> (Option<i64>, Option<i64>) {
        let real = |name: &str| keyword(schema, name).filter(|value| value.is_f64());
        (
            real("minimum").and_then(ceil_integer),
            real("maximum").and_then(floor_integer),
        )
    }
}

impl Rule for IntegerRealBounds {
    fn name(&self) -> &'static str {
        "integer_real_bounds"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        context.has_vocabulary(vocabularies::VALIDATION)
            && is_type(schema, "integer")
            && Self::rounded(schema) != (None, None)
    }

    fn transform(&self, schema: &mut Value) {
        let (minimum, maximum) = Self::rounded(schema);
        if let Some(map) = schema.as_object_mut() {
            if let Some(minimum) = minimum {
                map.insert("minimum".to_string(), Value::from(minimum));
            }
            if let Some(maximum) = maximum {
                map.insert("maximum".to_string(), Value::from(maximum));
            }
        }
    }
}
