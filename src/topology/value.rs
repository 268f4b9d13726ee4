use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;
use std::fmt;

/// A node property value as it is held by documents and by the canvas.
///
/// Strings of the exact form `${name}` are parameter references. They stay typed
/// as references through every conversion and are only substituted when an
/// instance is activated on a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Parameter(String),
    List(Vec<PropertyValue>),
    Object(BTreeMap<String, PropertyValue>),
}

impl PropertyValue {
    pub fn string(value: impl Into<String>) -> Self {
        PropertyValue::String(value.into())
    }

    pub fn parameter(name: impl Into<String>) -> Self {
        PropertyValue::Parameter(name.into())
    }

    /// A value counts as empty when a required field holding it would still need input.
    pub fn is_empty(&self) -> bool {
        match self {
            PropertyValue::Null => true,
            PropertyValue::String(s) => s.trim().is_empty(),
            PropertyValue::List(items) => items.is_empty(),
            PropertyValue::Object(map) => map.is_empty(),
            PropertyValue::Bool(_) | PropertyValue::Number(_) | PropertyValue::Parameter(_) => {
                false
            }
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, PropertyValue>> {
        match self {
            PropertyValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Follows `path` through nested objects.
    pub fn get_path(&self, path: &[String]) -> Option<&PropertyValue> {
        match path.split_first() {
            None => Some(self),
            Some((head, rest)) => self.as_object()?.get(head)?.get_path(rest),
        }
    }

    /// Collects every parameter reference below this value as `(path, parameter name)`.
    pub fn collect_references(&self, prefix: &mut Vec<String>, out: &mut Vec<(Vec<String>, String)>) {
        match self {
            PropertyValue::Parameter(name) => out.push((prefix.clone(), name.clone())),
            PropertyValue::Object(map) => {
                for (key, value) in map {
                    prefix.push(key.clone());
                    value.collect_references(prefix, out);
                    prefix.pop();
                }
            }
            PropertyValue::List(items) => {
                for (index, value) in items.iter().enumerate() {
                    prefix.push(index.to_string());
                    value.collect_references(prefix, out);
                    prefix.pop();
                }
            }
            _ => {}
        }
    }
}

/// Returns the parameter name if `text` is a `${name}` reference.
pub fn parameter_name(text: &str) -> Option<&str> {
    let name = text.strip_prefix("${")?.strip_suffix('}')?;
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.');
    valid.then_some(name)
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => PropertyValue::Null,
            Value::Bool(b) => PropertyValue::Bool(b),
            Value::Number(n) => PropertyValue::Number(n),
            Value::String(s) => match parameter_name(&s) {
                Some(name) => PropertyValue::Parameter(name.to_string()),
                None => PropertyValue::String(s),
            },
            Value::Array(items) => {
                PropertyValue::List(items.into_iter().map(PropertyValue::from).collect())
            }
            Value::Object(map) => PropertyValue::Object(
                map.into_iter()
                    .map(|(key, value)| (key, PropertyValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<PropertyValue> for Value {
    fn from(value: PropertyValue) -> Self {
        match value {
            PropertyValue::Null => Value::Null,
            PropertyValue::Bool(b) => Value::Bool(b),
            PropertyValue::Number(n) => Value::Number(n),
            PropertyValue::String(s) => Value::String(s),
            PropertyValue::Parameter(name) => Value::String(format!("${{{}}}", name)),
            PropertyValue::List(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            PropertyValue::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(text: &str) -> Self {
        PropertyValue::from(Value::String(text.to_string()))
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Parameter(name) => write!(f, "${{{}}}", name),
            PropertyValue::String(s) => write!(f, "{}", s),
            other => write!(f, "{}", Value::from(other.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parameter_references_are_typed_at_any_depth() {
        let value = PropertyValue::from(json!({
            "url": "${rtspUrl}",
            "credentials": { "username": "${user}", "password": "literal" }
        }));

        let mut refs = Vec::new();
        value.collect_references(&mut Vec::new(), &mut refs);
        assert_eq!(
            refs,
            vec![
                (
                    vec!["credentials".to_string(), "username".to_string()],
                    "user".to_string()
                ),
                (vec!["url".to_string()], "rtspUrl".to_string()),
            ]
        );
        assert_eq!(Value::from(value)["url"], json!("${rtspUrl}"));
    }

    #[test]
    fn malformed_references_stay_literal() {
        assert_eq!(parameter_name("${}"), None);
        assert_eq!(parameter_name("${a b}"), None);
        assert_eq!(parameter_name("prefix ${a}"), None);
        assert_eq!(parameter_name("${hubOutput}"), Some("hubOutput"));
    }

    #[test]
    fn emptiness_follows_input_needs() {
        assert!(PropertyValue::Null.is_empty());
        assert!(PropertyValue::string("  ").is_empty());
        assert!(PropertyValue::from(json!({})).is_empty());
        assert!(!PropertyValue::parameter("x").is_empty());
        assert!(!PropertyValue::from(json!(false)).is_empty());
    }
}
