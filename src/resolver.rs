//! Resolution of schema identifiers into JSON documents.
use crate::encoding::ENCODING_SCHEMA;
use crate::schema::{vocabularies, DRAFT_2020_12};
use serde_json::{json, Value};
use std::collections::HashMap;

/// A synchronous lookup of a schema by its identifier.
///
/// The canonicalizer and the mapper use a resolver to fetch the metaschema of a custom dialect so they can tell which
/// vocabularies are active.
pub trait SchemaResolver {
    /// Returns the document identified by `identifier`, if it is known.
    fn resolve(&self, identifier: &str) -> Option<Value>;
}

impl<F> SchemaResolver for F
where
    F: Fn(&str) -> Option<Value>,
{
    fn resolve(&self, identifier: &str) -> Option<Value> {
        self(identifier)
    }
}

impl SchemaResolver for HashMap<String, Value> {
    fn resolve(&self, identifier: &str) -> Option<Value> {
        self.get(identifier).cloned()
    }
}

/// A resolver that knows the official JSON Schema 2020-12 metaschema and the encoding marker schema.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfficialResolver;

impl SchemaResolver for OfficialResolver {
    fn resolve(&self, identifier: &str) -> Option<Value> {
        match identifier.trim_end_matches('#') {
            DRAFT_2020_12 => Some(json!({
                "$schema": DRAFT_2020_12,
                "$id": DRAFT_2020_12,
                "$vocabulary": {
                    (vocabularies::CORE): true,
                    (vocabularies::APPLICATOR): true,
                    (vocabularies::UNEVALUATED): true,
                    (vocabularies::VALIDATION): true,
                    (vocabularies::META_DATA): true,
                    (vocabularies::FORMAT_ANNOTATION): true,
                    (vocabularies::CONTENT): true,
                },
                "$dynamicAnchor": "meta",
                "title": "Core and Validation specifications meta-schema",
                "type": ["object", "boolean"],
            })),
            ENCODING_SCHEMA => Some(json!({
                "$schema": DRAFT_2020_12,
                "$id": ENCODING_SCHEMA,
                "type": "object",
                "required": ["binpackEncoding", "binpackOptions"],
                "properties": {
                    "binpackEncoding": { "type": "string" },
                    "binpackOptions": { "type": "object" },
                },
            })),
            _ => None,
        }
    }
}

/// Resolves an identifier with `resolver`, falling back to [`OfficialResolver`].
pub(crate) fn resolve_with_fallback(resolver: &dyn SchemaResolver, identifier: &str) -> Option<Value> {
    resolver
        .resolve(identifier)
        .or_else(|| OfficialResolver.resolve(identifier))
}
