use serde::{Deserialize, Serialize};
use std::fmt;

/// Localization keys for validation error descriptions.
///
/// The engine never renders text; the UI looks these keys up in its string table.
pub mod keys {
    pub const TOPOLOGY_NAME_MISSING: &str = "sidebarGraphTopologyNameMissing";
    pub const INSTANCE_NAME_MISSING: &str = "sidebarGraphInstanceNameMissing";
    pub const NAME_NOT_AVAILABLE: &str = "nameNotAvailableError";
    pub const PARAMETER_MISSING: &str = "sidebarGraphInstanceParameterMissing";
    pub const PARAMETER_TYPE_MISMATCH: &str = "sidebarGraphInstanceParameterTypeMismatch";
    pub const PARAMETER_UNDECLARED: &str = "nodePropertyParameterUndeclared";
    pub const PROPERTY_MISSING: &str = "nodePropertyMissing";
    pub const PROPERTY_TYPE_MISMATCH: &str = "nodePropertyTypeMismatch";
    pub const PROPERTY_NOT_ALLOWED: &str = "nodePropertyValueNotAllowed";
    pub const NODE_NAME_DUPLICATE: &str = "nodeNameAlreadyInUse";
    pub const EDGE_TYPE_MISMATCH: &str = "edgeTypesIncompatible";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationErrorKind {
    MissingField,
    NameAlreadyInUse,
    TypeMismatch,
    ServerError,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ValidationErrorKind::MissingField => "missing-field",
            ValidationErrorKind::NameAlreadyInUse => "name-already-in-use",
            ValidationErrorKind::TypeMismatch => "type-mismatch",
            ValidationErrorKind::ServerError => "server-error",
        };
        f.write_str(text)
    }
}

/// A single problem found in a candidate document, attributed to the field causing it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    /// A localization key, or the verbatim message for server errors.
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property: Vec<String>,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            node_name: None,
            property: Vec::new(),
        }
    }

    pub fn missing_field(description: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::MissingField, description)
    }

    pub fn type_mismatch(description: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::TypeMismatch, description)
    }

    pub fn on_node(mut self, node_name: impl Into<String>) -> Self {
        self.node_name = Some(node_name.into());
        self
    }

    pub fn at<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.property = path.into_iter().map(Into::into).collect();
        self
    }

    /// The triple errors are deduplicated by.
    pub fn identity(&self) -> (ValidationErrorKind, Option<String>, Vec<String>) {
        (self.kind, self.node_name.clone(), self.property.clone())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.kind)?;
        match (&self.node_name, self.property.is_empty()) {
            (Some(node), true) => write!(f, " {}", node)?,
            (Some(node), false) => write!(f, " {}.{}", node, self.property.join("."))?,
            (None, false) => write!(f, " {}", self.property.join("."))?,
            (None, true) => {}
        }
        write!(f, ": {}", self.description)
    }
}

/// An error reported by the remote plane after a save attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerError {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_property: Option<String>,
}

impl ServerError {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            node_name: None,
            node_property: None,
        }
    }
}

impl From<ServerError> for ValidationError {
    fn from(error: ServerError) -> Self {
        ValidationError {
            kind: ValidationErrorKind::ServerError,
            description: error.value,
            node_name: error.node_name,
            property: error.node_property.into_iter().collect(),
        }
    }
}
