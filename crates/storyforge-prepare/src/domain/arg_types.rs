//! Argument type descriptors.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use storyforge_core::value::{Args, Globals, is_truthy};

/// ArgType descriptors keyed by argument name.
pub type ArgTypes = BTreeMap<String, ArgType>;

/// Describes one argument: where it is routed, how its raw values map to
/// resolved values, and when it is visible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgType {
    /// Argument name; filled from the map key when not declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Routing bucket for targeted args.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Raw value to resolved value table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<Map<String, Value>>,
    /// Visibility condition.
    #[serde(rename = "if", default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    /// Any other descriptor fields (`control`, `description`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ArgType {
    /// Creates a descriptor routed to `target`.
    #[must_use]
    pub fn targeted(target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
            ..Self::default()
        }
    }

    /// Returns this descriptor with a value-mapping table.
    #[must_use]
    pub fn with_mapping(mut self, mapping: Map<String, Value>) -> Self {
        self.mapping = Some(mapping);
        self
    }

    /// Returns this descriptor with a visibility condition.
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Resolves a single raw value through the mapping table.
    ///
    /// Strings look up by themselves, numbers and booleans by their textual
    /// form (whole-valued floats as integers, so `1.0` looks up `"1"`).
    /// Unmapped values pass through unchanged.
    #[must_use]
    pub fn map_value(&self, raw: &Value) -> Value {
        let Some(mapping) = &self.mapping else {
            return raw.clone();
        };
        let key = match raw {
            Value::String(s) => s.clone(),
            Value::Number(n) => number_key(n),
            Value::Bool(b) => b.to_string(),
            _ => return raw.clone(),
        };
        mapping.get(&key).cloned().unwrap_or_else(|| raw.clone())
    }
}

/// Textual form of a number as a mapping key.
fn number_key(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f == 0.0 => "0".to_owned(),
        Some(f) if f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

/// What a condition inspects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionSubject {
    /// Another argument's current (mapped) value.
    Arg(String),
    /// A global value.
    Global(String),
}

/// How a condition judges its subject.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionTest {
    /// Subject truthiness must equal the flag.
    Truthy(bool),
    /// Subject presence must equal the flag.
    Exists(bool),
    /// Subject must equal the value.
    Eq(Value),
    /// Subject must differ from the value.
    Neq(Value),
}

/// A visibility predicate over other arguments or globals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCondition", into = "RawCondition")]
pub struct Condition {
    /// The value under test.
    pub subject: ConditionSubject,
    /// The test applied to it.
    pub test: ConditionTest,
}

impl Condition {
    /// Condition on another argument.
    #[must_use]
    pub fn arg(name: impl Into<String>, test: ConditionTest) -> Self {
        Self {
            subject: ConditionSubject::Arg(name.into()),
            test,
        }
    }

    /// Condition on a global.
    #[must_use]
    pub fn global(name: impl Into<String>, test: ConditionTest) -> Self {
        Self {
            subject: ConditionSubject::Global(name.into()),
            test,
        }
    }

    /// Evaluates the condition against the mapped args and current globals.
    #[must_use]
    pub fn evaluate(&self, args: &Args, globals: &Globals) -> bool {
        let value = match &self.subject {
            ConditionSubject::Arg(name) => args.get(name),
            ConditionSubject::Global(name) => globals.get(name),
        };
        match &self.test {
            ConditionTest::Exists(expected) => value.is_some() == *expected,
            ConditionTest::Eq(expected) => value == Some(expected),
            ConditionTest::Neq(expected) => value != Some(expected),
            ConditionTest::Truthy(expected) => is_truthy(value) == *expected,
        }
    }
}

/// Returns whether an argument described by `arg_type` is visible.
/// Arguments without a condition are always included.
#[must_use]
pub fn include_conditional_arg(arg_type: Option<&ArgType>, args: &Args, globals: &Globals) -> bool {
    arg_type
        .and_then(|a| a.condition.as_ref())
        .is_none_or(|condition| condition.evaluate(args, globals))
}

/// Wire shape of a condition: `{ arg | global, exists | eq | neq | truthy }`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RawCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    arg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    global: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    truthy: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exists: Option<bool>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    eq: Option<Value>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    neq: Option<Value>,
}

/// Keeps an explicit `null` distinct from an absent key.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl TryFrom<RawCondition> for Condition {
    type Error = String;

    fn try_from(raw: RawCondition) -> Result<Self, Self::Error> {
        let subject = match (raw.arg, raw.global) {
            (Some(arg), None) => ConditionSubject::Arg(arg),
            (None, Some(global)) => ConditionSubject::Global(global),
            (Some(arg), Some(global)) => {
                return Err(format!(
                    "condition cannot reference both arg {arg:?} and global {global:?}"
                ));
            }
            (None, None) => return Err("condition must reference an arg or a global".to_owned()),
        };
        let test = if let Some(exists) = raw.exists {
            ConditionTest::Exists(exists)
        } else if let Some(eq) = raw.eq {
            ConditionTest::Eq(eq)
        } else if let Some(neq) = raw.neq {
            ConditionTest::Neq(neq)
        } else {
            ConditionTest::Truthy(raw.truthy.unwrap_or(true))
        };
        Ok(Self { subject, test })
    }
}

impl From<Condition> for RawCondition {
    fn from(condition: Condition) -> Self {
        let mut raw = Self::default();
        match condition.subject {
            ConditionSubject::Arg(name) => raw.arg = Some(name),
            ConditionSubject::Global(name) => raw.global = Some(name),
        }
        match condition.test {
            ConditionTest::Truthy(flag) => raw.truthy = Some(flag),
            ConditionTest::Exists(flag) => raw.exists = Some(flag),
            ConditionTest::Eq(value) => raw.eq = Some(value),
            ConditionTest::Neq(value) => raw.neq = Some(value),
        }
        raw
    }
}
