//! JSON Schema infrastructure: dialects, vocabularies and pointers.
use crate::resolver::{resolve_with_fallback, SchemaResolver};
use crate::Error;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::iter::FromIterator;

pub use walker::{DefaultWalker, SchemaWalker, Traversal};

mod walker;

/// The identifier of the official JSON Schema 2020-12 metaschema.
pub const DRAFT_2020_12: &str = "https://json-schema.org/draft/2020-12/schema";

/// The identifiers of the official JSON Schema 2020-12 vocabularies.
pub mod vocabularies {
    /// The core vocabulary.
    pub const CORE: &str = "https://json-schema.org/draft/2020-12/vocab/core";
    /// The applicator vocabulary.
    pub const APPLICATOR: &str = "https://json-schema.org/draft/2020-12/vocab/applicator";
    /// The unevaluated vocabulary.
    pub const UNEVALUATED: &str = "https://json-schema.org/draft/2020-12/vocab/unevaluated";
    /// The validation vocabulary.
    pub const VALIDATION: &str = "https://json-schema.org/draft/2020-12/vocab/validation";
    /// The meta-data vocabulary.
    pub const META_DATA: &str = "https://json-schema.org/draft/2020-12/vocab/meta-data";
    /// The format annotation vocabulary.
    pub const FORMAT_ANNOTATION: &str = "https://json-schema.org/draft/2020-12/vocab/format-annotation";
    /// The format assertion vocabulary.
    pub const FORMAT_ASSERTION: &str = "https://json-schema.org/draft/2020-12/vocab/format-assertion";
    /// The content vocabulary.
    pub const CONTENT: &str = "https://json-schema.org/draft/2020-12/vocab/content";
}

const OFFICIAL_VOCABULARIES: &[&str] = &[
    vocabularies::CORE,
    vocabularies::APPLICATOR,
    vocabularies::UNEVALUATED,
    vocabularies::VALIDATION,
    vocabularies::META_DATA,
    vocabularies::FORMAT_ANNOTATION,
    vocabularies::CONTENT,
];

// Bounds the length of a chain of custom metaschemas.
const MAX_METASCHEMA_DEPTH: usize = 16;

/// The set of vocabularies active for a schema.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Vocabularies(BTreeSet<String>);

impl Vocabularies {
    /// The vocabularies of the official 2020-12 dialect.
    pub fn official() -> Vocabularies {
        Vocabularies(OFFICIAL_VOCABULARIES.iter().map(|v| v.to_string()).collect())
    }

    /// Returns `true` if the vocabulary is active.
    pub fn contains(&self, vocabulary: &str) -> bool {
        self.0.contains(vocabulary)
    }

    /// Returns an iterator over the active vocabulary identifiers.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S> FromIterator<S> for Vocabularies
where
    S: Into<String>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        Vocabularies(iter.into_iter().map(Into::into).collect())
    }
}

/// Returns the dialect of a schema: its `$schema`, or the default dialect.
pub fn dialect<'a>(schema: &'a Value, default_dialect: Option<&'a str>) -> Option<&'a str> {
    schema
        .get("$schema")
        .and_then(Value::as_str)
        .or(default_dialect)
}

/// Determines the base dialect of a schema and the vocabularies it activates.
///
/// The base dialect is always 2020-12. A custom dialect is followed through its metaschema, which must itself lead to
/// 2020-12, and whose `$vocabulary` lists the active vocabularies.
pub fn vocabularies(
    schema: &Value,
    resolver: &dyn SchemaResolver,
    default_dialect: Option<&str>,
) -> Result<(String, Vocabularies), Error> {
    let dialect = match dialect(schema, default_dialect) {
        Some(dialect) => dialect,
        None => return Err(Error::unknown_dialect()),
    };

    if is_official(dialect) {
        return Ok((DRAFT_2020_12.to_string(), Vocabularies::official()));
    }

    let metaschema =
        resolve_with_fallback(resolver, dialect).ok_or_else(|| Error::unresolved_metaschema(dialect))?;

    let mut current = metaschema.clone();
    for _ in 0..MAX_METASCHEMA_DEPTH {
        let parent = match current.get("$schema").and_then(Value::as_str) {
            Some(parent) => parent.to_string(),
            None => return Err(Error::unsupported_dialect(dialect)),
        };

        if is_official(&parent) {
            let vocabularies = match metaschema.get("$vocabulary").and_then(Value::as_object) {
                Some(declared) => declared.keys().cloned().collect(),
                None => Vocabularies::official(),
            };
            return Ok((DRAFT_2020_12.to_string(), vocabularies));
        }

        current = resolve_with_fallback(resolver, &parent).ok_or_else(|| Error::unresolved_metaschema(&parent))?;
    }

    Err(Error::unsupported_dialect(dialect))
}

fn is_official(dialect: &str) -> bool {
    dialect.trim_end_matches('#') == DRAFT_2020_12
}

/// A JSON pointer to a subschema.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pointer(String);

impl Pointer {
    /// The pointer to the root of a document.
    pub fn root() -> Pointer {
        Pointer(String::new())
    }

    /// Returns a new pointer with one more reference token.
    pub fn push(&self, token: &str) -> Pointer {
        let mut pointer = self.0.clone();
        pointer.push('/');
        for c in token.chars() {
            match c {
                '~' => pointer.push_str("~0"),
                '/' => pointer.push_str("~1"),
                c => pointer.push(c),
            }
        }
        Pointer(pointer)
    }

    /// Returns a new pointer indexing into an array.
    pub fn push_index(&self, index: usize) -> Pointer {
        self.push(&index.to_string())
    }

    /// Returns `true` if the pointer refers to the root of the document.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the pointer in its string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the value of a keyword of an object schema.
pub(crate) fn keyword<'a>(schema: &'a Value, keyword: &str) -> Option<&'a Value> {
    schema.as_object()?.get(keyword)
}

pub(crate) fn defines(schema: &Value, keyword: &str) -> bool {
    self::keyword(schema, keyword).is_some()
}

pub(crate) fn defines_any(schema: &Value, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| defines(schema, keyword))
}

/// Returns `true` if the schema declares a single `type` equal to `name`.
pub(crate) fn is_type(schema: &Value, name: &str) -> bool {
    keyword(schema, "type").and_then(Value::as_str) == Some(name)
}

pub(crate) fn is_numeric_type(schema: &Value) -> bool {
    is_type(schema, "integer") || is_type(schema, "number")
}

/// Returns `true` if the values hold at least one repeated element.
pub(crate) fn has_duplicates(values: &[Value]) -> bool {
    values
        .iter()
        .enumerate()
        .any(|(i, value)| values[..i].contains(value))
}

/// Removes repeated elements, keeping the first occurrence of each.
pub(crate) fn unique(values: &mut Vec<Value>) {
    let mut seen: Vec<Value> = Vec::with_capacity(values.len());
    for value in values.drain(..) {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    *values = seen;
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn unique_keeps_first() {
        let mut values = vec![json!(1), json!("a"), json!(1), json!({ "b": 2 }), json!("a")];
        assert!(has_duplicates(&values));
        unique(&mut values);
        assert_eq!(values, vec![json!(1), json!("a"), json!({ "b": 2 })]);
        assert!(!has_duplicates(&values));
    }

    #[test]
    fn pointer_escaping() {
        let pointer = Pointer::root().push("properties").push("a/b~c").push_index(3);
        assert_eq!(pointer.as_str(), "/properties/a~1b~0c/3");
        assert!(Pointer::root().is_root());
    }

    #[test]
    fn official_dialect() {
        let (base, vocabularies) =
            vocabularies(&json!({ "$schema": DRAFT_2020_12 }), &crate::OfficialResolver, None).unwrap();
        assert_eq!(base, DRAFT_2020_12);
        assert_eq!(vocabularies, Vocabularies::official());
    }

    #[test]
    fn default_dialect() {
        let (_, vocabularies) = vocabularies(&json!({}), &crate::OfficialResolver, Some(DRAFT_2020_12)).unwrap();
        assert!(vocabularies.contains(vocabularies::APPLICATOR));

        let error = super::vocabularies(&json!({}), &crate::OfficialResolver, None).unwrap_err();
        assert_eq!(error.to_string(), "could not determine the base dialect of the schema");
    }

    #[test]
    fn custom_dialect() {
        let mut resolver = HashMap::new();
        resolver.insert(
            "https://example.com/meta".to_string(),
            json!({
                "$schema": DRAFT_2020_12,
                "$id": "https://example.com/meta",
                "$vocabulary": {
                    (vocabularies::CORE): true,
                    (vocabularies::VALIDATION): true,
                },
            }),
        );

        let schema = json!({ "$schema": "https://example.com/meta" });
        let (base, active) = vocabularies(&schema, &resolver, None).unwrap();
        assert_eq!(base, DRAFT_2020_12);
        assert!(active.contains(vocabularies::VALIDATION));
        assert!(!active.contains(vocabularies::APPLICATOR));
    }

    #[test]
    fn older_dialect() {
        let resolver = |id: &str| {
            if id == "http://json-schema.org/draft-07/schema#" {
                Some(json!({ "$schema": "http://json-schema.org/draft-07/schema#" }))
            } else {
                None
            }
        };

        let schema = json!({ "$schema": "http://json-schema.org/draft-07/schema#" });
        let error = vocabularies(&schema, &resolver, None).unwrap_err();
        assert!(error.to_string().contains("only JSON Schema 2020-12 is supported"));
    }
}
