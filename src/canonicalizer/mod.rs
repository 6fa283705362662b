//! Rewrites JSON Schemas into a restricted canonical form.
//!
//! A canonical schema declares at most one `type` per node, spells out every implicit bound, and replaces constants
//! and booleans with enumerations, so the mapper only needs to recognize a small set of keyword combinations.
use crate::bundle::Bundle;
use crate::{Error, SchemaResolver};
use serde_json::Value;

mod applicators;
mod enums;
mod implicit;
mod numeric;
mod types;

/// Keywords that never constrain an instance and are kept on every rewritten node.
pub(crate) const CORE_KEYWORDS: &[&str] = &[
    "$schema",
    "$id",
    "$anchor",
    "$dynamicAnchor",
    "$vocabulary",
    "$comment",
    "$defs",
];

pub(crate) const META_DATA_KEYWORDS: &[&str] = &[
    "title",
    "description",
    "default",
    "deprecated",
    "readOnly",
    "writeOnly",
    "examples",
];

/// The canonicalization rule bundle.
#[derive(Debug)]
pub struct Canonicalizer {
    bundle: Bundle,
}

impl Default for Canonicalizer {
    fn default() -> Canonicalizer {
        Canonicalizer::new()
    }
}

impl Canonicalizer {
    /// Creates a canonicalizer with every rule enabled.
    pub fn new() -> Canonicalizer {
        let mut bundle = Bundle::new();
        bundle
            .add(types::BooleanTrueSchema)
            .add(enums::ConstAsEnum)
            .add(enums::DuplicateEnumValues)
            .add(enums::DropKeywordsBesideEnum)
            .add(enums::TYPE_BOOLEAN_AS_ENUM)
            .add(enums::TYPE_NULL_AS_ENUM)
            .add(types::SingleTypeArray)
            .add(types::TypeUnionAnyOf)
            .add(types::ImplicitTypeUnion)
            .add(enums::EqualNumericBoundsAsConst)
            .add(enums::EMPTY_STRING_AS_CONST)
            .add(enums::EMPTY_ARRAY_AS_CONST)
            .add(enums::EMPTY_OBJECT_AS_CONST)
            .add(types::DROP_NON_NUMERIC_KEYWORDS)
            .add(types::DROP_NON_STRING_KEYWORDS)
            .add(types::DROP_NON_ARRAY_KEYWORDS)
            .add(types::DROP_NON_OBJECT_KEYWORDS)
            .add(numeric::ExclusiveMaximumToMaximum)
            .add(numeric::ExclusiveMinimumToMinimum)
            .add(numeric::IntegerRealBounds)
            .add(implicit::IMPLICIT_UNIT_MULTIPLE_OF)
            .add(implicit::IMPLICIT_STRING_LOWER_BOUND)
            .add(implicit::IMPLICIT_ARRAY_LOWER_BOUND)
            .add(implicit::IMPLICIT_OBJECT_LOWER_BOUND)
            .add(implicit::IMPLICIT_OBJECT_PROPERTIES)
            .add(implicit::ImplicitObjectRequired)
            .add(implicit::DuplicateRequiredValues)
            .add(implicit::MinPropertiesRequiredTautology)
            .add(implicit::DependentRequiredTautology)
            .add(applicators::IfWithoutThenElse)
            .add(applicators::ThenElseWithoutIf)
            .add(applicators::MIN_CONTAINS_WITHOUT_CONTAINS)
            .add(applicators::MAX_CONTAINS_WITHOUT_CONTAINS)
            .add(applicators::MinContainsImpliesMinItems)
            .add(applicators::UnsatisfiableMaxContains)
            .add(applicators::ImpliedArrayUniqueItems)
            .add(applicators::DuplicateAnyOfBranches);

        Canonicalizer { bundle }
    }

    /// Returns the underlying rule bundle.
    pub fn bundle(&self) -> &Bundle {
        &self.bundle
    }

    /// Canonicalizes a schema in place.
    ///
    /// The base dialect of the schema is its `$schema`, or `default_dialect` if it has none, and must be JSON Schema
    /// 2020-12 or a dialect built on top of it. The resolver is used to look up custom metaschemas.
    pub fn apply(
        &self,
        schema: &mut Value,
        resolver: &dyn SchemaResolver,
        default_dialect: Option<&str>,
    ) -> Result<(), Error> {
        self.bundle.apply(schema, resolver, default_dialect)
    }
}
