//! The editable graph: an immutable snapshot that every edit replaces.
//!
//! Consumers (toolbars, side panels, the validation summary) hold on to an
//! `Arc<CanvasModel>` for one edit cycle at most and re-read after each edit, so a
//! panel showing an edge always reflects the edge of the latest snapshot.

use crate::error::GraphError;
use crate::schema::{SchemaRegistry, TypeSet, INPUT_PORT_ID, OUTPUT_PORT_ID};
use crate::topology::{NodeKind, PropertyValue};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

mod checks;
pub mod edge;
pub mod layout;
pub mod node;
pub mod view;

pub use edge::CanvasEdge;
pub use layout::{LayoutSpacing, Orientation};
pub use node::{CanvasNode, NodeState, Position};
pub use view::ZoomPanSettings;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasModel {
    revision: u64,
    nodes: Vec<CanvasNode>,
    edges: Vec<CanvasEdge>,
    next_id: u64,
}

impl CanvasModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increases by one with every edit that produced this snapshot.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn nodes(&self) -> &[CanvasNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[CanvasEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&CanvasNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn node_by_name(&self, name: &str) -> Option<&CanvasNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    pub fn edge(&self, id: &str) -> Option<&CanvasEdge> {
        self.edges.iter().find(|edge| edge.id == id)
    }

    pub fn edges_touching<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a CanvasEdge> {
        self.edges.iter().filter(move |edge| edge.touches(node_id))
    }

    /// Types both endpoints of `edge` can exchange; empty when an endpoint is gone.
    pub fn shared_types(&self, edge: &CanvasEdge) -> TypeSet {
        match (self.node(&edge.source), self.node(&edge.target)) {
            (Some(source), Some(target)) => {
                source.produced_types().intersect(&target.accepted_types())
            }
            _ => TypeSet::empty(),
        }
    }

    pub(crate) fn allocate_id(&mut self, prefix: &str) -> String {
        let id = format!("{}-{}", prefix, self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn push_node(&mut self, node: CanvasNode) {
        self.nodes.push(node);
    }

    pub(crate) fn push_edge(&mut self, edge: CanvasEdge) {
        self.edges.push(edge);
    }

    fn successor(&self) -> Self {
        let mut next = self.clone();
        next.revision += 1;
        next
    }

    fn node_index(&self, name: &str) -> Result<usize, GraphError> {
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .ok_or_else(|| GraphError::NodeNotFound(name.to_string()))
    }

    /// Renames a node. Edges reference nodes by id and follow automatically.
    pub fn renamed(&self, old_name: &str, new_name: &str) -> Result<Self, GraphError> {
        let index = self.node_index(old_name)?;
        let mut next = self.successor();
        next.nodes[index].name = new_name.to_string();
        Ok(next)
    }

    /// Replaces the allowed types of an edge with an explicit choice.
    pub fn with_edge_types(&self, edge_id: &str, types: Vec<String>) -> Result<Self, GraphError> {
        let index = self
            .edges
            .iter()
            .position(|edge| edge.id == edge_id)
            .ok_or_else(|| GraphError::EdgeNotFound(edge_id.to_string()))?;
        let mut next = self.successor();
        let edge = &mut next.edges[index];
        edge.types = TypeSet::Only(types);
        edge.inferred = false;
        Ok(next)
    }

    /// Adds a node of `node_type` with ports taken from the registry. Returns the new id.
    ///
    /// `kind` decides the document collection the node is saved under; without it
    /// the registry's definition decides.
    pub fn with_node(
        &self,
        registry: &SchemaRegistry,
        node_type: &str,
        name: &str,
        kind: Option<NodeKind>,
        position: Position,
    ) -> (Self, String) {
        let mut next = self.successor();
        let id = next.allocate_id("node");
        next.nodes.push(CanvasNode {
            id: id.clone(),
            name: name.to_string(),
            node_type: node_type.to_string(),
            kind: kind.unwrap_or_else(|| registry.resolve(node_type).kind()),
            properties: BTreeMap::new(),
            position,
            state: NodeState::Default,
            ports: registry.ports_for(node_type),
        });
        (next, id)
    }

    /// Removes a node together with every edge attached to it.
    pub fn without_node(&self, name: &str) -> Result<Self, GraphError> {
        let index = self.node_index(name)?;
        let mut next = self.successor();
        let removed = next.nodes.remove(index);
        next.edges.retain(|edge| !edge.touches(&removed.id));
        Ok(next)
    }

    /// Connects the output of `source` to an input of `target`.
    ///
    /// Without explicit `types` the edge carries every type both ports share.
    pub fn connected(
        &self,
        source: &str,
        target: &str,
        types: Option<Vec<String>>,
    ) -> Result<(Self, String), GraphError> {
        let source_node = &self.nodes[self.node_index(source)?];
        let target_node = &self.nodes[self.node_index(target)?];
        if self
            .edges
            .iter()
            .any(|edge| edge.source == source_node.id && edge.target == target_node.id)
        {
            return Err(GraphError::DuplicateConnection {
                source_node: source.to_string(),
                target_node: target.to_string(),
            });
        }

        let shared = source_node
            .produced_types()
            .intersect(&target_node.accepted_types());
        let (types, inferred) = match types {
            Some(types) => (TypeSet::Only(types), false),
            None => (shared, true),
        };
        let target_port = target_node
            .input_port_for(&types)
            .map(|port| port.id.clone())
            .unwrap_or_else(|| INPUT_PORT_ID.to_string());
        let (source_id, target_id) = (source_node.id.clone(), target_node.id.clone());

        let mut next = self.successor();
        let id = next.allocate_id("edge");
        next.edges.push(CanvasEdge {
            id: id.clone(),
            source: source_id,
            source_port: OUTPUT_PORT_ID.to_string(),
            target: target_id,
            target_port,
            types,
            inferred,
        });
        Ok((next, id))
    }

    pub fn disconnected(&self, edge_id: &str) -> Result<Self, GraphError> {
        if self.edge(edge_id).is_none() {
            return Err(GraphError::EdgeNotFound(edge_id.to_string()));
        }
        let mut next = self.successor();
        next.edges.retain(|edge| edge.id != edge_id);
        Ok(next)
    }

    /// Sets (or with `None`, clears) a possibly nested property of a node.
    pub fn with_property(
        &self,
        node: &str,
        path: &[String],
        value: Option<PropertyValue>,
    ) -> Result<Self, GraphError> {
        if path.is_empty() {
            return Err(GraphError::EmptyPropertyPath);
        }
        let index = self.node_index(node)?;
        let mut next = self.successor();
        set_path(&mut next.nodes[index].properties, path, value, 0).map_err(|end| {
            GraphError::NotAnObject {
                node: node.to_string(),
                path: path[..end].join("."),
            }
        })?;
        Ok(next)
    }

    pub fn moved(&self, node: &str, position: Position) -> Result<Self, GraphError> {
        let index = self.node_index(node)?;
        let mut next = self.successor();
        next.nodes[index].position = position;
        Ok(next)
    }

    /// Selects one node (or none), resetting every other node's state.
    pub fn selected(&self, node: Option<&str>) -> Result<Self, GraphError> {
        let index = node.map(|name| self.node_index(name)).transpose()?;
        let mut next = self.successor();
        for (i, n) in next.nodes.iter_mut().enumerate() {
            n.state = if Some(i) == index {
                NodeState::Selected
            } else {
                NodeState::Default
            };
        }
        Ok(next)
    }

    /// Recomputes every position from scratch.
    pub fn relayout(&self, orientation: Orientation, spacing: &LayoutSpacing) -> Self {
        let mut next = self.successor();
        let positions = layout::layout_positions(&self.ranks(), orientation, spacing);
        for (node, position) in next.nodes.iter_mut().zip(positions) {
            node.position = position;
        }
        next
    }

    pub(crate) fn ranks(&self) -> Vec<usize> {
        let index: AHashMap<&str, usize> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.as_str(), i))
            .collect();
        let edges: Vec<(usize, usize)> = self
            .edges
            .iter()
            .filter_map(|edge| {
                Some((*index.get(edge.source.as_str())?, *index.get(edge.target.as_str())?))
            })
            .collect();
        layout::compute_ranks(self.nodes.len(), &edges)
    }

    /// A spot for a newly added node: the first lane of a fresh rank after all others.
    pub fn next_free_position(&self, orientation: Orientation, spacing: &LayoutSpacing) -> Position {
        let axis = |p: &Position| match orientation {
            Orientation::Horizontal => p.x,
            Orientation::Vertical => p.y,
        };
        let furthest = self
            .nodes
            .iter()
            .map(|node| axis(&node.position))
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))));
        let along = furthest.map_or(0.0, |f| f + spacing.rank_gap);
        match orientation {
            Orientation::Horizontal => Position::new(along, 0.0),
            Orientation::Vertical => Position::new(0.0, along),
        }
    }
}

/// Writes `value` at `path`, creating missing objects on the way.
///
/// Fails with the offending prefix when the path runs through a value that is
/// not an object; nothing is changed in that case.
fn set_path(
    map: &mut BTreeMap<String, PropertyValue>,
    path: &[String],
    value: Option<PropertyValue>,
    depth: usize,
) -> Result<(), usize> {
    let Some((head, rest)) = path.split_first() else {
        return Ok(());
    };
    if rest.is_empty() {
        match value {
            Some(value) => {
                map.insert(head.clone(), value);
            }
            None => {
                map.remove(head);
            }
        }
        return Ok(());
    }
    if !map.contains_key(head) {
        let Some(value) = value else {
            return Ok(());
        };
        let mut inner = BTreeMap::new();
        set_path(&mut inner, rest, Some(value), depth + 1)?;
        map.insert(head.clone(), PropertyValue::Object(inner));
        return Ok(());
    }
    match map.get_mut(head) {
        Some(PropertyValue::Object(inner)) => set_path(inner, rest, value, depth + 1),
        _ => Err(depth + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_nodes() -> CanvasModel {
        let registry = SchemaRegistry::new();
        let (canvas, _) = CanvasModel::new().with_node(&registry, "custom", "a", None, Position::default());
        let (canvas, _) = canvas.with_node(&registry, "custom", "b", None, Position::default());
        canvas
    }

    #[test]
    fn every_edit_produces_a_new_revision() {
        let canvas = two_nodes();
        let (connected, edge_id) = canvas.connected("a", "b", None).expect("connect");
        assert_eq!(connected.revision(), canvas.revision() + 1);
        assert_eq!(canvas.edges().len(), 0);
        assert!(connected.edge(&edge_id).is_some_and(|e| e.inferred));
    }

    #[test]
    fn duplicate_connections_are_rejected() {
        let (canvas, _) = two_nodes().connected("a", "b", None).expect("connect");
        assert_eq!(
            canvas.connected("a", "b", None).err(),
            Some(GraphError::DuplicateConnection {
                source_node: "a".to_string(),
                target_node: "b".to_string()
            })
        );
    }

    #[test]
    fn removing_a_node_drops_its_edges() {
        let (canvas, _) = two_nodes().connected("a", "b", None).expect("connect");
        let canvas = canvas.without_node("a").expect("remove");
        assert!(canvas.edges().is_empty());
        assert_eq!(canvas.nodes().len(), 1);
    }

    #[test]
    fn nested_properties_are_created_and_cleared() {
        let path = vec!["endpoint".to_string(), "url".to_string()];
        let canvas = two_nodes()
            .with_property("a", &path, Some(PropertyValue::string("rtsp://cam")))
            .expect("set");
        let node = canvas.node_by_name("a").expect("node a");
        assert_eq!(node.property(&path), Some(&PropertyValue::string("rtsp://cam")));

        let canvas = canvas.with_property("a", &path, None).expect("clear");
        let node = canvas.node_by_name("a").expect("node a");
        assert_eq!(node.property(&path), None);
        assert!(node.properties.contains_key("endpoint"));
    }

    #[test]
    fn nested_paths_never_overwrite_non_objects() {
        let list = PropertyValue::List(vec![PropertyValue::string("a")]);
        let canvas = two_nodes()
            .with_property("a", &["tags".to_string()], Some(list.clone()))
            .expect("set");
        let path = vec!["tags".to_string(), "first".to_string()];

        assert_eq!(
            canvas.with_property("a", &path, Some(PropertyValue::string("b"))),
            Err(GraphError::NotAnObject {
                node: "a".to_string(),
                path: "tags".to_string()
            })
        );
        assert!(canvas.with_property("a", &path, None).is_err());
        let node = canvas.node_by_name("a").expect("node a");
        assert_eq!(node.properties.get("tags"), Some(&list));
    }
}
