//! Selects an encoding for every node of a canonical schema.
//!
//! The mapper replaces each node it understands with an encoding marker. Containers are mapped after their children,
//! so their markers embed the markers already chosen for their elements, keys, and values. Whatever is left once the
//! specific rules are exhausted falls back to the self-describing "any" encoding, which makes every schema mappable.
use crate::bundle::{Bundle, Rule, RuleContext};
use crate::encoding::{is_encoding, make_marker, nest_marker, Encoding};
use crate::{Error, SchemaResolver};
use serde_json::{Map, Value};

mod array;
mod enums;
mod integer;
mod object;
pub mod states;
mod string;

/// The encoding-selection rule bundle.
#[derive(Debug)]
pub struct Mapper {
    bundle: Bundle,
}

impl Default for Mapper {
    fn default() -> Mapper {
        Mapper::new()
    }
}

impl Mapper {
    /// Creates a mapper with every rule enabled.
    pub fn new() -> Mapper {
        let mut bundle = Bundle::new();
        bundle
            .add(enums::EnumSingleton)
            .add(enums::ENUM_8_BIT)
            .add(enums::ENUM_8_BIT_TOP_LEVEL)
            .add(enums::EnumArbitrary)
            .add(integer::IntegerBounded8Bit)
            .add(integer::IntegerBoundedGreaterThan8Bit)
            .add(integer::IntegerLowerBound)
            .add(integer::IntegerUpperBound)
            .add(integer::IntegerUnbound)
            .add(integer::NumberArbitrary)
            .add(string::StringDate)
            .add(string::StringLowerBound)
            .add(array::ArrayFixed)
            .add(array::ArrayBounded8Bit)
            .add(array::ArrayLowerBound)
            .add(object::ObjectFixedSize)
            .add(object::ObjectArbitrary)
            .add(AnyFallback);

        Mapper { bundle }
    }

    /// Returns the underlying rule bundle.
    pub fn bundle(&self) -> &Bundle {
        &self.bundle
    }

    /// Maps a canonical schema in place, leaving an encoding marker at its root.
    pub fn apply(
        &self,
        schema: &mut Value,
        resolver: &dyn SchemaResolver,
        default_dialect: Option<&str>,
    ) -> Result<(), Error> {
        self.bundle.apply(schema, resolver, default_dialect)
    }
}

/// Replaces the node with a root marker.
fn replace(schema: &mut Value, name: &str, options: Map<String, Value>) {
    *schema = make_marker(name, Value::Object(options));
}

/// Returns the child at `keyword` as a nested marker, if the child has already been mapped.
fn nested(schema: &Value, keyword: &str) -> Option<Value> {
    crate::schema::keyword(schema, keyword)
        .filter(|child| is_encoding(child))
        .cloned()
        .map(nest_marker)
}

fn any_marker() -> Value {
    nest_marker(Encoding::AnyPackedTypeTagBytePrefix.to_marker())
}

/// Maps every remaining node to the "any" encoding.
struct AnyFallback;

impl Rule for AnyFallback {
    fn name(&self) -> &'static str {
        "any_fallback"
    }

    fn condition(&self, schema: &Value, _: &RuleContext<'_>) -> bool {
        !is_encoding(schema)
    }

    fn transform(&self, schema: &mut Value) {
        replace(schema, Encoding::AnyPackedTypeTagBytePrefix.name(), Map::new());
    }
}
