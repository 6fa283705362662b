use super::{vocabularies, Vocabularies};

/// How a keyword holds subschemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// The keyword does not hold subschemas.
    None,
    /// The value of the keyword is a subschema.
    Value,
    /// The value of the keyword is an array of subschemas.
    Elements,
    /// The value of the keyword is an object whose members are subschemas.
    Members,
}

/// Determines which keywords of a schema hold subschemas.
pub trait SchemaWalker {
    /// Returns how `keyword` holds subschemas under the given vocabularies.
    fn traversal(&self, keyword: &str, vocabularies: &Vocabularies) -> Traversal;
}

/// A walker that knows the applicators of the official 2020-12 vocabularies.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultWalker;

impl SchemaWalker for DefaultWalker {
    fn traversal(&self, keyword: &str, vocabularies: &Vocabularies) -> Traversal {
        let (vocabulary, traversal) = match keyword {
            "items" | "contains" | "additionalProperties" | "propertyNames" | "not" | "if" | "then" | "else" => {
                (vocabularies::APPLICATOR, Traversal::Value)
            }
            "allOf" | "anyOf" | "oneOf" | "prefixItems" => (vocabularies::APPLICATOR, Traversal::Elements),
            "properties" | "patternProperties" | "dependentSchemas" => {
                (vocabularies::APPLICATOR, Traversal::Members)
            }
            "unevaluatedItems" | "unevaluatedProperties" => (vocabularies::UNEVALUATED, Traversal::Value),
            "contentSchema" => (vocabularies::CONTENT, Traversal::Value),
            "$defs" => (vocabularies::CORE, Traversal::Members),
            _ => return Traversal::None,
        };

        if vocabularies.contains(vocabulary) {
            traversal
        } else {
            Traversal::None
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn applicators() {
        let official = Vocabularies::official();
        assert_eq!(DefaultWalker.traversal("items", &official), Traversal::Value);
        assert_eq!(DefaultWalker.traversal("prefixItems", &official), Traversal::Elements);
        assert_eq!(DefaultWalker.traversal("$defs", &official), Traversal::Members);
        assert_eq!(DefaultWalker.traversal("minimum", &official), Traversal::None);

        let core: Vocabularies = vec![vocabularies::CORE].into_iter().collect();
        assert_eq!(DefaultWalker.traversal("items", &core), Traversal::None);
        assert_eq!(DefaultWalker.traversal("$defs", &core), Traversal::Members);
    }
}
