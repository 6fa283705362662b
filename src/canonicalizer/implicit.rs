use crate::bundle::{Rule, RuleContext};
use crate::schema::{defines, has_duplicates, is_type, keyword, vocabularies};
use serde_json::{json, Map, Value};

/// Spells out a keyword whose absence is equivalent to a default value.
pub struct ImplicitKeyword {
    name: &'static str,
    type_name: &'static str,
    vocabulary: &'static str,
    keyword: &'static str,
    value: fn() -> Value,
}

pub const IMPLICIT_UNIT_MULTIPLE_OF: ImplicitKeyword = ImplicitKeyword {
    name: "implicit_unit_multiple_of",
    type_name: "integer",
    vocabulary: vocabularies::VALIDATION,
    keyword: "multipleOf",
    value: || json!(1),
};

pub const IMPLICIT_STRING_LOWER_BOUND: ImplicitKeyword = ImplicitKeyword {
    name: "implicit_string_lower_bound",
    type_name: "string",
    vocabulary: vocabularies::VALIDATION,
    keyword: "minLength",
    value: || json!(0),
};

pub const IMPLICIT_ARRAY_LOWER_BOUND: ImplicitKeyword = ImplicitKeyword {
    name: "implicit_array_lower_bound",
    type_name: "array",
    vocabulary: vocabularies::VALIDATION,
    keyword: "minItems",
    value: || json!(0),
};

pub const IMPLICIT_OBJECT_LOWER_BOUND: ImplicitKeyword = ImplicitKeyword {
    name: "implicit_object_lower_bound",
    type_name: "object",
    vocabulary: vocabularies::VALIDATION,
    keyword: "minProperties",
    value: || json!(0),
};

pub const IMPLICIT_OBJECT_PROPERTIES: ImplicitKeyword = ImplicitKeyword {
    name: "implicit_object_properties",
    type_name: "object",
    vocabulary: vocabularies::APPLICATOR,
    keyword: "properties",
    value: || json!({}),
};

impl Rule for ImplicitKeyword {
    fn name(&self) -> &'static str {
        self.name
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        context.has_vocabulary(vocabularies::VALIDATION)
            && context.has_vocabulary(self.vocabulary)
            && is_type(schema, self.type_name)
            && !defines(schema, self.keyword)
    }

    fn transform(&self, schema: &mut Value) {
        if let Some(map) = schema.as_object_mut() {
            map.insert(self.keyword.to_string(), (self.value)());
        }
    }
}

fn required(schema: &Value) -> Option<&Vec<Value>> {
    keyword(schema, "required").and_then(Value::as_array)
}

fn is_object_schema(schema: &Value, context: &RuleContext<'_>) -> bool {
    context.has_vocabulary(vocabularies::VALIDATION) && is_type(schema, "object")
}

/// Every required property gets an explicit, unconstrained entry in `properties`.
pub struct ImplicitObjectRequired;

impl Rule for ImplicitObjectRequired {
    fn name(&self) -> &'static str {
        "implicit_object_required"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        if !is_object_schema(schema, context) || !context.has_vocabulary(vocabularies::APPLICATOR) {
            return false;
        }

        let properties = match keyword(schema, "properties").and_then(Value::as_object) {
            Some(properties) => properties,
            None => return false,
        };

        required(schema).map_or(false, |required| {
            required
                .iter()
                .filter_map(Value::as_str)
                .any(|name| !properties.contains_key(name))
        })
    }

    fn transform(&self, schema: &mut Value) {
        let names = required(schema)
            .map(|required| {
                required
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        if let Some(Value::Object(properties)) = schema.get_mut("properties") {
            for name in names {
                properties.entry(name).or_insert_with(|| Value::Object(Map::new()));
            }
        }
    }
}

pub struct DuplicateRequiredValues;

impl Rule for DuplicateRequiredValues {
    fn name(&self) -> &'static str {
        "duplicate_required_values"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        context.has_vocabulary(vocabularies::VALIDATION)
            && required(schema).map_or(false, |required| has_duplicates(required))
    }

    fn transform(&self, schema: &mut Value) {
        if let Some(Value::Array(required)) = schema.get_mut("required") {
            required.sort_by(|a, b| a.as_str().cmp(&b.as_str()));
            required.dedup();
        }
    }
}

/// An object needs at least as many properties as it has distinct required names.
pub struct MinPropertiesRequiredTautology;

impl Rule for MinPropertiesRequiredTautology {
    fn name(&self) -> &'static str {
        "min_properties_required_tautology"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        if !is_object_schema(schema, context) {
            return false;
        }

        let required = match required(schema) {
            Some(required) if !has_duplicates(required) => required,
            _ => return false,
        };

        match keyword(schema, "minProperties").and_then(Value::as_u64) {
            Some(minimum) => minimum < required.len() as u64,
            None => !required.is_empty(),
        }
    }

    fn transform(&self, schema: &mut Value) {
        let count = required(schema).map_or(0, Vec::len);
        if let Some(map) = schema.as_object_mut() {
            map.insert("minProperties".to_string(), Value::from(count as u64));
        }
    }
}

/// The dependencies of a property that is always present are always required too.
pub struct DependentRequiredTautology;

impl DependentRequiredTautology {
    fn satisfied(schema: &Value) -> Vec<String> {
        let dependencies = match keyword(schema, "dependentRequired").and_then(Value::as_object) {
            Some(dependencies) => dependencies,
            None => return vec![],
        };
        let required = match required(schema) {
            Some(required) => required,
            None => return vec![],
        };

        dependencies
            .keys()
            .filter(|name| required.iter().any(|r| r.as_str() == Some(name.as_str())))
            .cloned()
            .collect()
    }
}

impl Rule for DependentRequiredTautology {
    fn name(&self) -> &'static str {
        "dependent_required_tautology"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        context.has_vocabulary(vocabularies::VALIDATION) && !Self::satisfied(schema).is_empty()
    }

    fn transform(&self, schema: &mut Value) {
        let satisfied = Self::satisfied(schema);
        let map = match schema.as_object_mut() {
            Some(map) => map,
            None => return,
        };

        let mut implied = vec![];
        let mut exhausted = false;
        if let Some(Value::Object(dependencies)) = map.get_mut("dependentRequired") {
            for name in &satisfied {
                if let Some(Value::Array(names)) = dependencies.remove(name) {
                    implied.extend(names);
                }
            }
            exhausted = dependencies.is_empty();
        }
        if exhausted {
            map.remove("dependentRequired");
        }

        if let Some(Value::Array(required)) = map.get_mut("required") {
            for name in implied {
                if !required.contains(&name) {
                    required.push(name);
                }
            }
        }
    }
}
