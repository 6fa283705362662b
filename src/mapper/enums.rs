use super::replace;
use crate::bundle::{Rule, RuleContext};
use crate::schema::{keyword, vocabularies};
use serde_json::{Map, Value};

fn choices<'a>(schema: &'a Value, context: &RuleContext<'_>) -> Option<&'a Vec<Value>> {
    if !context.has_vocabulary(vocabularies::VALIDATION) {
        return None;
    }
    keyword(schema, "enum").and_then(Value::as_array)
}

fn replace_with_choices(schema: &mut Value, name: &str) {
    let choices = match keyword(schema, "enum") {
        Some(choices) => choices.clone(),
        None => return,
    };
    let mut options = Map::new();
    options.insert("choices".to_string(), choices);
    replace(schema, name, options);
}

pub struct EnumSingleton;

impl Rule for EnumSingleton {
    fn name(&self) -> &'static str {
        "enum_singleton"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        choices(schema, context).map_or(false, |choices| choices.len() == 1)
    }

    fn transform(&self, schema: &mut Value) {
        let value = match keyword(schema, "enum").and_then(Value::as_array).and_then(|c| c.first()) {
            Some(value) => value.clone(),
            None => return,
        };
        let mut options = Map::new();
        options.insert("value".to_string(), value);
        replace(schema, "CONST_NONE", options);
    }
}

/// Up to 256 choices fit a byte index.
pub struct Enum8Bit {
    name: &'static str,
    top_level: bool,
}

pub const ENUM_8_BIT: Enum8Bit = Enum8Bit {
    name: "enum_8_bit",
    top_level: false,
};

pub const ENUM_8_BIT_TOP_LEVEL: Enum8Bit = Enum8Bit {
    name: "enum_8_bit_top_level",
    top_level: true,
};

impl Rule for Enum8Bit {
    fn name(&self) -> &'static str {
        self.name
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        context.is_root() == self.top_level
            && choices(schema, context).map_or(false, |choices| (2..=256).contains(&choices.len()))
    }

    fn transform(&self, schema: &mut Value) {
        let name = if self.top_level {
            "TOP_LEVEL_BYTE_CHOICE_INDEX"
        } else {
            "BYTE_CHOICE_INDEX"
        };
        replace_with_choices(schema, name);
    }
}

pub struct EnumArbitrary;

impl Rule for EnumArbitrary {
    fn name(&self) -> &'static str {
        "enum_arbitrary"
    }

    fn condition(&self, schema: &Value, context: &RuleContext<'_>) -> bool {
        choices(schema, context).map_or(false, |choices| choices.len() > 256)
    }

    fn transform(&self, schema: &mut Value) {
        replace_with_choices(schema, "LARGE_CHOICE_INDEX");
    }
}
