use serde::{Deserialize, Serialize};

/// Value types a topology parameter may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterType {
    String,
    SecretString,
    Int,
    Double,
    Bool,
}

impl ParameterType {
    /// Whether a bound textual value can be read as this type.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            ParameterType::String | ParameterType::SecretString => true,
            ParameterType::Int => value.trim().parse::<i64>().is_ok(),
            ParameterType::Double => value.trim().parse::<f64>().is_ok(),
            ParameterType::Bool => matches!(value.trim(), "true" | "false"),
        }
    }
}

/// A parameter declared at topology scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub parameter_type: ParameterType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl ParameterDeclaration {
    pub fn new(name: impl Into<String>, parameter_type: ParameterType) -> Self {
        Self {
            name: name.into(),
            parameter_type,
            description: None,
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// A concrete value bound to a parameter by an instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterBinding {
    pub name: String,
    pub value: String,
}
