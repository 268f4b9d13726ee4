//! Parameter resolution for instance creation.

use crate::error::ParameterError;
use crate::topology::{InstanceDocument, ParameterBinding, ParameterType, TopologyDocument};
use crate::validation::{ValidationError, keys};
use serde::{Deserialize, Serialize};

pub mod reference;

pub use reference::{ParameterReference, property_references, references};

/// A declared parameter together with the value bound to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    pub parameter_type: ParameterType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub value: String,
    /// Set by the last activation check; cleared whenever the value changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ValidationError>,
}

impl Parameter {
    fn activation_error(&self) -> Option<ValidationError> {
        let path = ["parameters".to_string(), self.name.clone()];
        if self.value.trim().is_empty() {
            Some(ValidationError::missing_field(keys::PARAMETER_MISSING).at(path))
        } else if !self.parameter_type.accepts(&self.value) {
            Some(ValidationError::type_mismatch(keys::PARAMETER_TYPE_MISMATCH).at(path))
        } else {
            None
        }
    }
}

/// The parameters of one instance, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParameterSet {
    parameters: Vec<Parameter>,
}

impl ParameterSet {
    /// One parameter per declaration of `topology`.
    ///
    /// Values come from `instance` when it binds the name, else from the
    /// declared default, else empty.
    pub fn declare(topology: &TopologyDocument, instance: Option<&InstanceDocument>) -> Self {
        let parameters = topology
            .properties
            .parameters
            .iter()
            .map(|declaration| {
                let value = instance
                    .and_then(|instance| instance.binding(&declaration.name))
                    .map(str::to_string)
                    .or_else(|| declaration.default.clone())
                    .unwrap_or_default();
                Parameter {
                    name: declaration.name.clone(),
                    parameter_type: declaration.parameter_type,
                    description: declaration.description.clone(),
                    value,
                    error: None,
                }
            })
            .collect();
        Self { parameters }
    }

    pub fn bind(&mut self, name: &str, value: impl Into<String>) -> Result<(), ParameterError> {
        let parameter = self
            .parameters
            .iter_mut()
            .find(|parameter| parameter.name == name)
            .ok_or_else(|| ParameterError::Unknown(name.to_string()))?;
        parameter.value = value.into();
        parameter.error = None;
        Ok(())
    }

    /// Errors that block activation, without touching the error slots.
    pub fn activation_errors(&self) -> Vec<ValidationError> {
        self.parameters
            .iter()
            .filter_map(Parameter::activation_error)
            .collect()
    }

    /// Like [`activation_errors`](Self::activation_errors), but also records each
    /// error in its parameter's slot.
    pub fn check_for_activation(&mut self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for parameter in &mut self.parameters {
            parameter.error = parameter.activation_error();
            errors.extend(parameter.error.clone());
        }
        errors
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|parameter| parameter.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.parameters.iter().map(|parameter| parameter.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// The `[{name, value}]` list an instance document carries.
    pub fn to_bindings(&self) -> Vec<ParameterBinding> {
        self.parameters
            .iter()
            .map(|parameter| ParameterBinding {
                name: parameter.name.clone(),
                value: parameter.value.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::ParameterDeclaration;
    use crate::validation::ValidationErrorKind;

    fn topology() -> TopologyDocument {
        let mut topology = TopologyDocument::new("pipeline");
        topology.properties.parameters = vec![
            ParameterDeclaration::new("url", ParameterType::String),
            ParameterDeclaration::new("retries", ParameterType::Int).with_default("3"),
            ParameterDeclaration::new("password", ParameterType::SecretString),
        ];
        topology
    }

    #[test]
    fn instance_values_override_defaults() {
        let mut instance = InstanceDocument::new("run", "pipeline");
        instance.properties.parameters.push(ParameterBinding {
            name: "retries".to_string(),
            value: "5".to_string(),
        });
        let set = ParameterSet::declare(&topology(), Some(&instance));
        assert_eq!(set.names(), vec!["url", "retries", "password"]);
        assert_eq!(set.get("retries").map(|p| p.value.as_str()), Some("5"));
        assert_eq!(set.get("url").map(|p| p.value.as_str()), Some(""));
    }

    #[test]
    fn activation_flags_every_empty_value() {
        let mut set = ParameterSet::declare(&topology(), None);
        let errors = set.check_for_activation();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.kind == ValidationErrorKind::MissingField));
        assert_eq!(errors[1].property, vec!["parameters", "password"]);
        assert!(set.get("url").is_some_and(|p| p.error.is_some()));
    }

    #[test]
    fn binding_clears_the_error_slot() {
        let mut set = ParameterSet::declare(&topology(), None);
        set.check_for_activation();
        set.bind("url", "rtsp://camera").expect("bind");
        assert!(set.get("url").is_some_and(|p| p.error.is_none()));
        assert_eq!(
            set.bind("missing", "x"),
            Err(ParameterError::Unknown("missing".to_string()))
        );
    }

    #[test]
    fn unparsable_values_are_type_mismatches() {
        let mut set = ParameterSet::declare(&topology(), None);
        set.bind("url", "a").expect("bind");
        set.bind("password", "b").expect("bind");
        set.bind("retries", "many").expect("bind");
        let errors = set.activation_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::TypeMismatch);
        assert!(set.get("retries").is_some_and(|p| p.error.is_none()));
    }
}
