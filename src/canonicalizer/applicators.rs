use crate::bundle::{Rule, RuleContext};
use crate::schema::{defines, defines_any, has_duplicates, keyword, unique, vocabularies};
use serde_json::Value;

fn remove(schema: &mut Value, keywords: &[&str]) {
    if let Some(map) = schema.as_object_mut() {
        for keyword in keywords {
            map.remove(*keyword);
        }
    }
}

fn uint(schema: &Value, name: &str) -> Option<u64> {
    keyword(schema, name).and_then(Value::as_u64)
}

pub struct IfWithoutThenElse;

impl Rule for IfWithoutThenElse {
    fn name(&self) -> &'static str {
        "if_without_then_else"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        context.has_vocabulary(vocabularies::APPLICATOR)
            && defines(schema, "if")
            && !defines_any(schema, &["then", "else"])
    }

    fn transform(&self, schema: &mut Value) {
        remove(schema, &["if"]);
    }
}

pub struct ThenElseWithoutIf;

impl Rule for ThenElseWithoutIf {
    fn name(&self) -> &'static str {
        "then_else_without_if"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        context.has_vocabulary(vocabularies::APPLICATOR)
            && !defines(schema, "if")
            && defines_any(schema, &["then", "else"])
    }

    fn transform(&self, schema: &mut Value) {
        remove(schema, &["then", "else"]);
    }
}

/// Drops a `contains` cardinality that has no `contains` to count.
pub struct DanglingContainsBound {
    name: &'static str,
    keyword: &'static str,
}

pub const MIN_CONTAINS_WITHOUT_CONTAINS: DanglingContainsBound = DanglingContainsBound {
    name: "min_contains_without_contains",
    keyword: "minContains",
};

pub const MAX_CONTAINS_WITHOUT_CONTAINS: DanglingContainsBound = DanglingContainsBound {
    name: "max_contains_without_contains",
    keyword: "maxContains",
};

impl Rule for DanglingContainsBound {
    fn name(&self) -> &'static str {
        self.name
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        context.has_vocabulary(vocabularies::VALIDATION)
            && context.has_vocabulary(vocabularies::APPLICATOR)
            && defines(schema, self.keyword)
            && !defines(schema, "contains")
    }

    fn transform(&self, schema: &mut Value) {
        remove(schema, &[self.keyword]);
    }
}

/// An array holding `minContains` matching elements holds at least that many elements.
pub struct MinContainsImpliesMinItems;

impl Rule for MinContainsImpliesMinItems {
    fn name(&self) -> &'static str {
        "min_contains_implies_min_items"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        if !context.has_vocabulary(vocabularies::VALIDATION)
            || !context.has_vocabulary(vocabularies::APPLICATOR)
            || !defines(schema, "contains")
        {
            return false;
        }

        match uint(schema, "minContains") {
            Some(contains) => uint(schema, "minItems").unwrap_or(0) < contains,
            None => false,
        }
    }

    fn transform(&self, schema: &mut Value) {
        if let Some(contains) = uint(schema, "minContains") {
            if let Some(map) = schema.as_object_mut() {
                map.insert("minItems".to_string(), Value::from(contains));
            }
        }
    }
}

pub struct UnsatisfiableMaxContains;

impl Rule for UnsatisfiableMaxContains {
    fn name(&self) -> &'static str {
        "unsatisfiable_max_contains"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        if !context.has_vocabulary(vocabularies::VALIDATION) {
            return false;
        }

        match (uint(schema, "maxContains"), uint(schema, "maxItems")) {
            (Some(contains), Some(items)) => contains > items,
            _ => false,
        }
    }

    fn transform(&self, schema: &mut Value) {
        if let Some(items) = uint(schema, "maxItems") {
            if let Some(map) = schema.as_object_mut() {
                map.insert("maxContains".to_string(), Value::from(items));
            }
        }
    }
}

/// `uniqueItems` is a no-op when it is `false` or when the array holds at most one element.
pub struct ImpliedArrayUniqueItems;

impl Rule for ImpliedArrayUniqueItems {
    fn name(&self) -> &'static str {
        "implied_array_unique_items"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        if !context.has_vocabulary(vocabularies::VALIDATION) {
            return false;
        }

        match keyword(schema, "uniqueItems") {
            Some(Value::Bool(false)) => true,
            Some(_) => uint(schema, "maxItems").map_or(false, |items| items <= 1),
            None => false,
        }
    }

    fn transform(&self, schema: &mut Value) {
        remove(schema, &["uniqueItems"]);
    }
}

pub struct DuplicateAnyOfBranches;

impl Rule for DuplicateAnyOfBranches {
    fn name(&self) -> &'static str {
        "duplicate_anyof_branches"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        context.has_vocabulary(vocabularies::APPLICATOR)
            && keyword(schema, "anyOf")
                .and_then(Value::as_array)
                .map_or(false, |branches| has_duplicates(branches))
    }

    fn transform(&self, schema: &mut Value) {
        if let Some(Value::Array(branches)) = schema.get_mut("anyOf") {
            unique(branches);
        }
    }
}
