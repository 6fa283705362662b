//! A fixed-point schema rewrite engine.
use crate::encoding::is_encoding;
use crate::schema::{self, DefaultWalker, Pointer, SchemaWalker, Traversal, Vocabularies};
use crate::{Error, SchemaResolver};
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use tracing::debug;

// The number of rule applications a single node may go through in one visit.
const MAX_NODE_APPLICATIONS: usize = 128;

// The number of whole-document passes before giving up.
const MAX_PASSES: usize = 256;

/// The information a [`Rule`] receives about the node it is matched against.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// The base dialect of the document.
    pub dialect: &'a str,
    /// The vocabularies active in the document.
    pub vocabularies: &'a Vocabularies,
    /// The location of the node inside the document.
    pub pointer: &'a Pointer,
}

impl RuleContext<'_> {
    /// Returns `true` if the given vocabulary is active.
    pub fn has_vocabulary(&self, vocabulary: &str) -> bool {
        self.vocabularies.contains(vocabulary)
    }

    /// Returns `true` if the node is the root of the document.
    pub fn is_root(&self) -> bool {
        self.pointer.is_root()
    }
}

/// A single schema rewrite.
pub trait Rule {
    /// Returns the unique name of the rule.
    fn name(&self) -> &'static str;

    /// Returns `true` if the rule applies to the schema node.
    ///
    /// Conditions must not depend on anything other than the node and its context.
    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool;

    /// Rewrites the schema node the condition held for.
    fn transform(&self, schema: &mut Value);
}

/// An ordered set of named rules, applied until none of them holds anywhere in a schema.
#[derive(Default)]
pub struct Bundle {
    rules: IndexMap<&'static str, Box<dyn Rule>>,
}

impl fmt::Debug for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bundle")
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Bundle {
    /// Creates an empty bundle.
    pub fn new() -> Bundle {
        Bundle::default()
    }

    /// Appends a rule to the bundle.
    ///
    /// A rule with the same name as an existing one replaces it in place.
    pub fn add<R>(&mut self, rule: R) -> &mut Bundle
    where
        R: Rule + 'static,
    {
        self.rules.insert(rule.name(), Box::new(rule));
        self
    }

    /// Returns the names of the rules, in application order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.keys().copied()
    }

    /// Returns the number of rules in the bundle.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if the bundle holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rewrites the schema in place until no rule applies, walking it with the [`DefaultWalker`].
    pub fn apply(
        &self,
        schema: &mut Value,
        resolver: &dyn SchemaResolver,
        default_dialect: Option<&str>,
    ) -> Result<(), Error> {
        self.apply_with(schema, &DefaultWalker, resolver, default_dialect)
    }

    /// Rewrites the schema in place until no rule applies.
    pub fn apply_with(
        &self,
        schema: &mut Value,
        walker: &dyn SchemaWalker,
        resolver: &dyn SchemaResolver,
        default_dialect: Option<&str>,
    ) -> Result<(), Error> {
        let (dialect, vocabularies) = schema::vocabularies(schema, resolver, default_dialect)?;
        let state = State {
            walker,
            dialect: &dialect,
            vocabularies: &vocabularies,
        };

        let mut last = None;
        for _ in 0..MAX_PASSES {
            match self.apply_node(schema, &Pointer::root(), &state)? {
                Some(rule) => last = Some(rule),
                None => return Ok(()),
            }
        }

        Err(Error::fixed_point_not_reached(last.unwrap_or("*"), ""))
    }

    // Returns the name of the last rule applied under this node, if any.
    fn apply_node(
        &self,
        schema: &mut Value,
        pointer: &Pointer,
        state: &State<'_>,
    ) -> Result<Option<&'static str>, Error> {
        if is_encoding(schema) {
            return Ok(None);
        }

        let mut applied = None;

        if let Value::Object(map) = schema {
            let keywords = map.keys().cloned().collect::<Vec<_>>();
            for keyword in keywords {
                let child = match map.get_mut(&keyword) {
                    Some(child) => child,
                    None => continue,
                };
                let pointer = pointer.push(&keyword);

                match state.walker.traversal(&keyword, state.vocabularies) {
                    Traversal::None => {}
                    Traversal::Value => {
                        applied = self.apply_node(child, &pointer, state)?.or(applied);
                    }
                    Traversal::Elements => {
                        if let Value::Array(elements) = child {
                            for (i, element) in elements.iter_mut().enumerate() {
                                applied = self.apply_node(element, &pointer.push_index(i), state)?.or(applied);
                            }
                        }
                    }
                    Traversal::Members => {
                        if let Value::Object(members) = child {
                            for (name, member) in members.iter_mut() {
                                applied = self.apply_node(member, &pointer.push(name), state)?.or(applied);
                            }
                        }
                    }
                }
            }
        }

        let context = RuleContext {
            dialect: state.dialect,
            vocabularies: state.vocabularies,
            pointer,
        };

        let mut applications = 0;
        while let Some(rule) = self.rules.values().find(|rule| rule.condition(schema, &context)) {
            if applications == MAX_NODE_APPLICATIONS {
                return Err(Error::fixed_point_not_reached(rule.name(), pointer.as_str()));
            }

            rule.transform(schema);
            debug!(rule = rule.name(), pointer = %pointer, "applied rule");
            applications += 1;
            applied = Some(rule.name());
        }

        Ok(applied)
    }
}

struct State<'a> {
    walker: &'a dyn SchemaWalker,
    dialect: &'a str,
    vocabularies: &'a Vocabularies,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::schema::DRAFT_2020_12;
    use crate::OfficialResolver;
    use serde_json::json;

    struct Rename;

    impl Rule for Rename {
        fn name(&self) -> &'static str {
            "rename"
        }

        fn condition(&self, schema: &Value, _: &RuleContext<'_>) -> bool {
            schema.get("foo").is_some()
        }

        fn transform(&self, schema: &mut Value) {
            let map = schema.as_object_mut().unwrap();
            let value = map.remove("foo").unwrap();
            map.insert("bar".to_string(), value);
        }
    }

    struct Cycle;

    impl Rule for Cycle {
        fn name(&self) -> &'static str {
            "cycle"
        }

        fn condition(&self, schema: &Value, _: &RuleContext<'_>) -> bool {
            schema.is_object()
        }

        fn transform(&self, schema: &mut Value) {
            let map = schema.as_object_mut().unwrap();
            map.insert("flip".to_string(), Value::Bool(!map.contains_key("flip")));
        }
    }

    #[test]
    fn nested_rewrite() {
        let mut bundle = Bundle::new();
        bundle.add(Rename);

        let mut schema = json!({
            "$schema": DRAFT_2020_12,
            "foo": 1,
            "properties": { "a": { "foo": 2 } },
            "anyOf": [{ "foo": 3 }],
            "const": { "foo": 4 },
        });
        bundle.apply(&mut schema, &OfficialResolver, None).unwrap();

        assert_eq!(
            schema,
            json!({
                "$schema": DRAFT_2020_12,
                "bar": 1,
                "properties": { "a": { "bar": 2 } },
                "anyOf": [{ "bar": 3 }],
                "const": { "foo": 4 },
            })
        );
    }

    #[test]
    fn visit_order() {
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        struct Shared(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

        impl Rule for Shared {
            fn name(&self) -> &'static str {
                "shared"
            }

            fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
                if schema.get("seen").is_none() {
                    self.0.lock().unwrap().push(context.pointer.to_string());
                    true
                } else {
                    false
                }
            }

            fn transform(&self, schema: &mut Value) {
                schema.as_object_mut().unwrap().insert("seen".to_string(), Value::Bool(true));
            }
        }

        let mut bundle = Bundle::new();
        bundle.add(Shared(seen.clone()));
        let mut schema = json!({
            "$schema": DRAFT_2020_12,
            "items": { "not": {} },
        });
        bundle.apply(&mut schema, &OfficialResolver, None).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["/items/not", "/items", ""]);
    }

    #[test]
    fn markers_are_skipped() {
        let mut bundle = Bundle::new();
        bundle.add(Rename);

        let marker = crate::Encoding::AnyPackedTypeTagBytePrefix.to_marker();
        let mut schema = json!({ "$schema": DRAFT_2020_12, "items": marker });
        schema["items"]["foo"] = json!(1);
        let expected = schema.clone();
        bundle.apply(&mut schema, &OfficialResolver, None).unwrap();
        assert_eq!(schema, expected);
    }

    #[test]
    fn cycling_rules() {
        let mut bundle = Bundle::new();
        bundle.add(Cycle);

        let mut schema = json!({ "$schema": DRAFT_2020_12 });
        let error = bundle.apply(&mut schema, &OfficialResolver, None).unwrap_err();
        assert_eq!(error.to_string(), "rule `cycle` did not reach a fixed point at ``");
    }

    #[test]
    fn names_in_order() {
        let mut bundle = Bundle::new();
        bundle.add(Rename).add(Cycle);
        assert_eq!(bundle.names().collect::<Vec<_>>(), vec!["rename", "cycle"]);
        assert_eq!(bundle.len(), 2);
    }
}
