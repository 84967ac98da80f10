//! Value model shared by every annotation level.

use serde_json::{Map, Value};

/// Argument values keyed by argument name.
pub type Args = Map<String, Value>;

/// Nested story parameters.
pub type Parameters = Map<String, Value>;

/// Global values (theme, locale, ...) shared by every story.
pub type Globals = Map<String, Value>;

/// Data produced by loaders, keyed by loader-chosen names.
pub type Loaded = Map<String, Value>;

/// Returns the JavaScript-style truthiness of an optional JSON value.
///
/// Absent values, `null`, `false`, `0` and the empty string are falsy;
/// everything else (including empty arrays and objects) is truthy.
#[must_use]
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_is_truthy_matches_falsy_set() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&json!(null))));
        assert!(!is_truthy(Some(&json!(false))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(0.0))));
        assert!(!is_truthy(Some(&json!(""))));
    }

    #[test]
    fn test_is_truthy_accepts_containers_and_values() {
        assert!(is_truthy(Some(&json!(true))));
        assert!(is_truthy(Some(&json!(-1))));
        assert!(is_truthy(Some(&json!("no"))));
        assert!(is_truthy(Some(&json!([]))));
        assert!(is_truthy(Some(&json!({}))));
    }
}
