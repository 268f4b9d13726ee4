use super::port::{Port, TypeSet};
use crate::topology::{NodeKind, PropertyValue};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Declared value type of a node property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    #[default]
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
}

impl PropertyType {
    /// Whether a literal value fits this type. Parameter references fit any type.
    pub fn accepts(&self, value: &PropertyValue) -> bool {
        match (self, value) {
            (_, PropertyValue::Parameter(_) | PropertyValue::Null) => true,
            (PropertyType::String, PropertyValue::String(_)) => true,
            (PropertyType::Integer, PropertyValue::Number(n)) => n.is_i64() || n.is_u64(),
            (PropertyType::Number, PropertyValue::Number(_)) => true,
            (PropertyType::Boolean, PropertyValue::Bool(_)) => true,
            (PropertyType::Object, PropertyValue::Object(_)) => true,
            (PropertyType::Array, PropertyValue::List(_)) => true,
            _ => false,
        }
    }
}

/// Declaration of one property of a node type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDefinition {
    #[serde(rename = "type", default)]
    pub property_type: PropertyType,
    #[serde(default)]
    pub required: bool,
    /// Allowed literal values. Empty means unrestricted.
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<String>,
    /// Nested fields of an object-typed property.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertyDefinition>,
}

impl PropertyDefinition {
    pub fn new(property_type: PropertyType) -> Self {
        Self {
            property_type,
            ..Self::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_allowed<I, S>(mut self, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = allowed.into_iter().map(Into::into).collect();
        self
    }

    /// Whether `value` lies in the allowed domain. Only string literals are constrained.
    pub fn allows(&self, value: &PropertyValue) -> bool {
        match value {
            PropertyValue::String(s) if !self.allowed.is_empty() => self.allowed.contains(s),
            _ => true,
        }
    }
}

fn default_display_name() -> String {
    "name".to_string()
}

/// Declarative definition of a node type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyDefinition>,
    #[serde(default)]
    pub required: BTreeSet<String>,
    #[serde(default = "default_display_name")]
    pub display_name: String,
    /// Accepted input types; one input port per entry.
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Produced types; a single output port carries all of them.
    #[serde(default)]
    pub outputs: Vec<String>,
}

impl Default for NodeDefinition {
    fn default() -> Self {
        Self {
            kind: None,
            properties: BTreeMap::new(),
            required: BTreeSet::new(),
            display_name: default_display_name(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }
}

impl NodeDefinition {
    /// The node kind, inferred from the port shape when not declared.
    pub fn kind(&self) -> NodeKind {
        self.kind.unwrap_or(match (self.inputs.is_empty(), self.outputs.is_empty()) {
            (true, _) => NodeKind::Source,
            (false, true) => NodeKind::Sink,
            (false, false) => NodeKind::Processor,
        })
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
            || self.properties.get(name).is_some_and(|p| p.required)
    }

    /// Every required property path, parents before their children.
    ///
    /// Nested fields are only listed below required parents; an optional object
    /// that is absent does not make its inner fields missing.
    pub fn required_paths(&self) -> Vec<Vec<String>> {
        let mut paths = Vec::new();
        let mut names: Vec<&String> = self.properties.keys().collect();
        for extra in &self.required {
            if !self.properties.contains_key(extra) {
                names.push(extra);
            }
        }
        for name in names {
            if !self.is_required(name) {
                continue;
            }
            let mut path = vec![name.clone()];
            paths.push(path.clone());
            if let Some(property) = self.properties.get(name) {
                collect_required(&property.properties, &mut path, &mut paths);
            }
        }
        paths
    }

    pub fn ports(&self) -> Vec<Port> {
        let mut ports: Vec<Port> = self
            .inputs
            .iter()
            .map(|label| Port::input(Some(label)))
            .collect();
        if !self.outputs.is_empty() {
            ports.push(Port::output(TypeSet::only(self.outputs.iter().cloned())));
        }
        ports
    }
}

fn collect_required(
    properties: &BTreeMap<String, PropertyDefinition>,
    prefix: &mut Vec<String>,
    out: &mut Vec<Vec<String>>,
) {
    for (name, property) in properties {
        if !property.required {
            continue;
        }
        prefix.push(name.clone());
        out.push(prefix.clone());
        collect_required(&property.properties, prefix, out);
        prefix.pop();
    }
}
