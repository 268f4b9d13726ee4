use crate::schema::{Port, PortDirection, TypeSet, OUTPUT_PORT_ID};
use crate::topology::{NodeKind, PropertyValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeState {
    #[default]
    Default,
    Selected,
}

/// A node as it lives on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasNode {
    /// Canvas-local identifier; stable across renames.
    pub id: String,
    pub name: String,
    pub node_type: String,
    pub kind: NodeKind,
    pub properties: BTreeMap<String, PropertyValue>,
    pub position: Position,
    pub state: NodeState,
    pub ports: Vec<Port>,
}

impl CanvasNode {
    pub fn port(&self, id: &str) -> Option<&Port> {
        self.ports.iter().find(|port| port.id == id)
    }

    pub fn output_port(&self) -> Option<&Port> {
        self.port(OUTPUT_PORT_ID)
    }

    pub fn input_ports(&self) -> impl Iterator<Item = &Port> {
        self.ports
            .iter()
            .filter(|port| port.direction == PortDirection::Input)
    }

    /// Types this node produces; empty when it has no output port.
    pub fn produced_types(&self) -> TypeSet {
        self.output_port()
            .map(|port| port.types.clone())
            .unwrap_or_else(TypeSet::empty)
    }

    /// Union of the types accepted by all input ports.
    pub fn accepted_types(&self) -> TypeSet {
        self.input_ports()
            .fold(TypeSet::empty(), |acc, port| acc.union(&port.types))
    }

    /// The input port an edge carrying `types` attaches to.
    pub fn input_port_for(&self, types: &TypeSet) -> Option<&Port> {
        self.input_ports()
            .find(|port| !port.types.intersect(types).is_empty())
            .or_else(|| self.input_ports().next())
    }

    pub fn property(&self, path: &[String]) -> Option<&PropertyValue> {
        let (head, rest) = path.split_first()?;
        self.properties.get(head)?.get_path(rest)
    }
}
