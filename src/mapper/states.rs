//! Counting the instances an integer schema admits.
use crate::numeric::{divide_ceil, divide_floor};
use crate::schema::keyword;
use serde_json::Value;
use std::convert::TryFrom;

/// Returns the integral multiplier of an integer schema.
///
/// A `multipleOf` that is not a positive integer constrains nothing beyond integrality, so it counts as `1`.
pub fn multiplier(schema: &Value) -> u64 {
    match keyword(schema, "multipleOf") {
        Some(value) => match value.as_u64() {
            Some(multiplier) if multiplier > 0 => multiplier,
            Some(_) => 1,
            None => match value.as_f64() {
                Some(real) if real >= 1.0 && real.fract() == 0.0 && real <= u64::MAX as f64 => real as u64,
                _ => 1,
            },
        },
        None => 1,
    }
}

/// Returns the integer bounds of a schema, if it declares them.
pub fn bounds(schema: &Value) -> (Option<i64>, Option<i64>) {
    let minimum = keyword(schema, "minimum").and_then(Value::as_i64);
    let maximum = keyword(schema, "maximum").and_then(Value::as_i64);
    (minimum, maximum)
}

/// Returns the number of multiples of `multiplier` in `[minimum, maximum]`.
pub fn count(minimum: i64, maximum: i64, multiplier: u64) -> u64 {
    let lowest = divide_ceil(minimum, multiplier);
    let highest = divide_floor(maximum, multiplier);
    if highest < lowest {
        0
    } else {
        u64::try_from(i128::from(highest) - i128::from(lowest) + 1).unwrap_or(u64::MAX)
    }
}

/// Enumerates the multiples of `multiplier` in `[minimum, maximum]`, or returns `None` if there are more than
/// `limit` of them.
pub fn enumerate(minimum: i64, maximum: i64, multiplier: u64, limit: u64) -> Option<Vec<i64>> {
    let total = count(minimum, maximum, multiplier);
    if total > limit {
        return None;
    }

    let lowest = divide_ceil(minimum, multiplier);
    Some(
        (0..total)
            .map(|i| ((i128::from(lowest) + i as i128) * i128::from(multiplier)) as i64)
            .collect(),
    )
}

/// Enumerates the instances of a bounded integer schema, or returns `None` if the schema is unbounded or admits more
/// than `limit` instances.
pub fn integer(schema: &Value, limit: u64) -> Option<Vec<i64>> {
    match bounds(schema) {
        (Some(minimum), Some(maximum)) => enumerate(minimum, maximum, multiplier(schema), limit),
        _ => None,
    }
}
