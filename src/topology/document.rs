use super::parameter::{ParameterBinding, ParameterDeclaration};
use super::value::PropertyValue;
use crate::error::MappingError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which collection of a topology a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Source,
    Processor,
    Sink,
}

impl NodeKind {
    pub const ALL: [NodeKind; 3] = [NodeKind::Source, NodeKind::Processor, NodeKind::Sink];
}

/// The persisted and transmitted form of a pipeline graph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TopologyDocument {
    pub name: String,
    #[serde(default)]
    pub properties: TopologyProperties,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopologyProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterDeclaration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<NodeDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub processors: Vec<NodeDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sinks: Vec<NodeDescriptor>,
}

/// A single node of a topology.
///
/// Properties other than the type tag, the name and the inputs are flattened into
/// the property bag so that node types unknown to the registry survive untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    #[serde(rename = "@type")]
    pub node_type: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<NodeInput>,
    #[serde(flatten)]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl NodeDescriptor {
    pub fn new(node_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            name: name.into(),
            inputs: Vec::new(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_input(mut self, input: NodeInput) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

/// A reference from a node to one of its upstream nodes.
///
/// `types` restricts which data types flow over the connection. When it is empty,
/// every type the two ports share is allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInput {
    pub node_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
}

impl NodeInput {
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            types: Vec::new(),
        }
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }
}

/// The document-level fields that the canvas does not carry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TopologyHeader {
    pub name: String,
    pub description: Option<String>,
    pub parameters: Vec<ParameterDeclaration>,
}

impl TopologyDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: TopologyProperties::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, MappingError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, MappingError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn header(&self) -> TopologyHeader {
        TopologyHeader {
            name: self.name.clone(),
            description: self.properties.description.clone(),
            parameters: self.properties.parameters.clone(),
        }
    }

    pub fn nodes_of(&self, kind: NodeKind) -> &[NodeDescriptor] {
        match kind {
            NodeKind::Source => &self.properties.sources,
            NodeKind::Processor => &self.properties.processors,
            NodeKind::Sink => &self.properties.sinks,
        }
    }

    pub fn nodes_of_mut(&mut self, kind: NodeKind) -> &mut Vec<NodeDescriptor> {
        match kind {
            NodeKind::Source => &mut self.properties.sources,
            NodeKind::Processor => &mut self.properties.processors,
            NodeKind::Sink => &mut self.properties.sinks,
        }
    }

    /// All nodes in declaration order: sources, then processors, then sinks.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeKind, &NodeDescriptor)> {
        NodeKind::ALL
            .into_iter()
            .flat_map(move |kind| self.nodes_of(kind).iter().map(move |node| (kind, node)))
    }

    pub fn node(&self, name: &str) -> Option<&NodeDescriptor> {
        self.nodes().map(|(_, node)| node).find(|node| node.name == name)
    }

    pub fn add_node(mut self, kind: NodeKind, node: NodeDescriptor) -> Self {
        self.nodes_of_mut(kind).push(node);
        self
    }
}

/// A named activation of a topology with bound parameter values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InstanceDocument {
    pub name: String,
    #[serde(default)]
    pub properties: InstanceProperties,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceProperties {
    pub topology_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterBinding>,
}

impl InstanceDocument {
    pub fn new(name: impl Into<String>, topology_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: InstanceProperties {
                topology_name: topology_name.into(),
                description: None,
                parameters: Vec::new(),
            },
        }
    }

    pub fn binding(&self, name: &str) -> Option<&str> {
        self.properties
            .parameters
            .iter()
            .find(|binding| binding.name == name)
            .map(|binding| binding.value.as_str())
    }
}
