use super::CORE_KEYWORDS;
use crate::bundle::{Rule, RuleContext};
use crate::schema::{defines_any, is_numeric_type, is_type, keyword, unique, vocabularies};
use serde_json::{Map, Value};

pub struct BooleanTrueSchema;

impl Rule for BooleanTrueSchema {
    fn name(&self) -> &'static str {
        "boolean_true_schema"
    }

    fn condition(&self, schema: &Value, _: &RuleContext<'_>) -> bool {
        *schema == Value::Bool(true)
    }

    fn transform(&self, schema: &mut Value) {
        *schema = Value::Object(Map::new());
    }
}

/// `type: [t]` becomes `type: t`.
pub struct SingleTypeArray;

impl Rule for SingleTypeArray {
    fn name(&self) -> &'static str {
        "single_type_array"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        context.has_vocabulary(vocabularies::VALIDATION)
            && keyword(schema, "type")
                .and_then(Value::as_array)
                .map_or(false, |types| types.len() == 1 && types[0].is_string())
    }

    fn transform(&self, schema: &mut Value) {
        if let Some(types) = schema.get_mut("type") {
            if let Value::Array(array) = types {
                if let Some(single) = array.pop() {
                    *types = single;
                }
            }
        }
    }
}

/// Splits a node declaring several types into an `anyOf` with one branch per type.
///
/// Every branch receives a copy of the keywords of the node, except the core ones, which stay at the top.
pub struct TypeUnionAnyOf;

impl Rule for TypeUnionAnyOf {
    fn name(&self) -> &'static str {
        "type_union_anyof"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        context.has_vocabulary(vocabularies::VALIDATION)
            && context.has_vocabulary(vocabularies::APPLICATOR)
            && keyword(schema, "type")
                .and_then(Value::as_array)
                .map_or(false, |types| types.len() > 1)
    }

    fn transform(&self, schema: &mut Value) {
        let map = match schema.as_object_mut() {
            Some(map) => map,
            None => return,
        };

        let mut types = match map.remove("type") {
            Some(Value::Array(types)) => types,
            _ => return,
        };
        unique(&mut types);

        let mut core = Map::new();
        let mut rest = Map::new();
        for (keyword, value) in std::mem::take(map) {
            if CORE_KEYWORDS.contains(&keyword.as_str()) {
                core.insert(keyword, value);
            } else {
                rest.insert(keyword, value);
            }
        }

        let branches = types
            .into_iter()
            .map(|type_name| {
                let mut branch = rest.clone();
                branch.insert("type".to_string(), type_name);
                Value::Object(branch)
            })
            .collect();

        core.insert("anyOf".to_string(), Value::Array(branches));
        *map = core;
    }
}

const IN_PLACE_APPLICATORS: &[&str] = &[
    "allOf",
    "anyOf",
    "oneOf",
    "not",
    "if",
    "then",
    "else",
    "$ref",
    "$dynamicRef",
];

/// A node without a type admits every type.
pub struct ImplicitTypeUnion;

impl Rule for ImplicitTypeUnion {
    fn name(&self) -> &'static str {
        "implicit_type_union"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        context.has_vocabulary(vocabularies::VALIDATION)
            && context.has_vocabulary(vocabularies::APPLICATOR)
            && schema.is_object()
            && !defines_any(schema, &["type", "enum", "const"])
            && !defines_any(schema, IN_PLACE_APPLICATORS)
    }

    fn transform(&self, schema: &mut Value) {
        if let Some(map) = schema.as_object_mut() {
            let types = ["null", "boolean", "object", "array", "string", "number"]
                .iter()
                .map(|t| Value::from(*t))
                .collect();
            map.insert("type".to_string(), Value::Array(types));
        }
    }
}

const APPLICATOR_ARRAY: &[&str] = &["prefixItems", "items", "contains"];
const APPLICATOR_OBJECT: &[&str] = &[
    "additionalProperties",
    "properties",
    "patternProperties",
    "dependentSchemas",
    "propertyNames",
];
const UNEVALUATED_ARRAY: &[&str] = &["unevaluatedItems"];
const UNEVALUATED_OBJECT: &[&str] = &["unevaluatedProperties"];
const VALIDATION_NUMERIC: &[&str] = &["minimum", "maximum", "exclusiveMinimum", "exclusiveMaximum", "multipleOf"];
const VALIDATION_STRING: &[&str] = &["minLength", "maxLength", "pattern"];
const VALIDATION_ARRAY: &[&str] = &["minItems", "maxItems", "uniqueItems", "minContains", "maxContains"];
const VALIDATION_OBJECT: &[&str] = &["minProperties", "maxProperties", "dependentRequired", "required"];
const FORMAT: &[&str] = &["format"];
const CONTENT: &[&str] = &["contentEncoding", "contentMediaType", "contentSchema"];

/// Removes the keywords that cannot apply to the single type a node declares.
pub struct DropKeywords {
    name: &'static str,
    matches: fn(&Value) -> bool,
    keywords: &'static [(&'static str, &'static [&'static str])],
}

pub const DROP_NON_NUMERIC_KEYWORDS: DropKeywords = DropKeywords {
    name: "drop_non_numeric_keywords",
    matches: is_numeric_type,
    keywords: &[
        (vocabularies::APPLICATOR, APPLICATOR_ARRAY),
        (vocabularies::APPLICATOR, APPLICATOR_OBJECT),
        (vocabularies::UNEVALUATED, UNEVALUATED_ARRAY),
        (vocabularies::UNEVALUATED, UNEVALUATED_OBJECT),
        (vocabularies::VALIDATION, VALIDATION_STRING),
        (vocabularies::VALIDATION, VALIDATION_ARRAY),
        (vocabularies::VALIDATION, VALIDATION_OBJECT),
        (vocabularies::FORMAT_ANNOTATION, FORMAT),
        (vocabularies::FORMAT_ASSERTION, FORMAT),
        (vocabularies::CONTENT, CONTENT),
    ],
};

pub const DROP_NON_STRING_KEYWORDS: DropKeywords = DropKeywords {
    name: "drop_non_string_keywords",
    matches: |schema| is_type(schema, "string"),
    keywords: &[
        (vocabularies::APPLICATOR, APPLICATOR_ARRAY),
        (vocabularies::APPLICATOR, APPLICATOR_OBJECT),
        (vocabularies::UNEVALUATED, UNEVALUATED_ARRAY),
        (vocabularies::UNEVALUATED, UNEVALUATED_OBJECT),
        (vocabularies::VALIDATION, VALIDATION_NUMERIC),
        (vocabularies::VALIDATION, VALIDATION_ARRAY),
        (vocabularies::VALIDATION, VALIDATION_OBJECT),
    ],
};

pub const DROP_NON_ARRAY_KEYWORDS: DropKeywords = DropKeywords {
    name: "drop_non_array_keywords",
    matches: |schema| is_type(schema, "array"),
    keywords: &[
        (vocabularies::APPLICATOR, APPLICATOR_OBJECT),
        (vocabularies::UNEVALUATED, UNEVALUATED_OBJECT),
        (vocabularies::VALIDATION, VALIDATION_NUMERIC),
        (vocabularies::VALIDATION, VALIDATION_STRING),
        (vocabularies::VALIDATION, VALIDATION_OBJECT),
        (vocabularies::FORMAT_ANNOTATION, FORMAT),
        (vocabularies::FORMAT_ASSERTION, FORMAT),
        (vocabularies::CONTENT, CONTENT),
    ],
};

pub const DROP_NON_OBJECT_KEYWORDS: DropKeywords = DropKeywords {
    name: "drop_non_object_keywords",
    matches: |schema| is_type(schema, "object"),
    keywords: &[
        (vocabularies::APPLICATOR, APPLICATOR_ARRAY),
        (vocabularies::UNEVALUATED, UNEVALUATED_ARRAY),
        (vocabularies::VALIDATION, VALIDATION_NUMERIC),
        (vocabularies::VALIDATION, VALIDATION_STRING),
        (vocabularies::VALIDATION, VALIDATION_ARRAY),
        (vocabularies::FORMAT_ANNOTATION, FORMAT),
        (vocabularies::FORMAT_ASSERTION, FORMAT),
        (vocabularies::CONTENT, CONTENT),
    ],
};

impl DropKeywords {
    fn redundant<'a>(&self, schema: &'a Value, context: &RuleContext<'_>) -> Vec<&'a str> {
        let map = match schema.as_object() {
            Some(map) => map,
            None => return vec![],
        };

        map.keys()
            .map(String::as_str)
            .filter(|keyword| {
                self.keywords
                    .iter()
                    .any(|(vocabulary, keywords)| context.has_vocabulary(vocabulary) && keywords.contains(keyword))
            })
            .collect()
    }
}

impl Rule for DropKeywords {
    fn name(&self) -> &'static str {
        self.name
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        context.has_vocabulary(vocabularies::VALIDATION)
            && (self.matches)(schema)
            && !self.redundant(schema, context).is_empty()
    }

    fn transform(&self, schema: &mut Value) {
        let keywords = self
            .keywords
            .iter()
            .flat_map(|(_, keywords)| keywords.iter())
            .copied()
            .collect::<Vec<_>>();
        if let Some(map) = schema.as_object_mut() {
            map.retain(|keyword, _| !keywords.contains(&keyword.as_str()));
        }
    }
}
