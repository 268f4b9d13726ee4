use crate::canvas::layout::{compute_ranks, layout_positions};
use crate::canvas::{
    CanvasEdge, CanvasModel, CanvasNode, LayoutSpacing, NodeState, Orientation, Position,
};
use crate::error::MappingError;
use crate::schema::{SchemaRegistry, TypeSet, INPUT_PORT_ID, OUTPUT_PORT_ID};
use crate::topology::{NodeDescriptor, NodeKind, TopologyDocument};
use ahash::AHashMap;
use tracing::debug;

/// One `inputs` entry, resolved to node indices.
struct Connection<'t> {
    source: usize,
    target: usize,
    types: &'t [String],
}

/// Resolves a document's name references before any canvas ids are assigned.
pub(super) struct CanvasBuilder<'a, 't> {
    registry: &'a SchemaRegistry,
    nodes: Vec<(NodeKind, &'t NodeDescriptor)>,
    connections: Vec<Connection<'t>>,
}

impl<'a, 't> CanvasBuilder<'a, 't> {
    pub(super) fn new(
        registry: &'a SchemaRegistry,
        topology: &'t TopologyDocument,
    ) -> Result<Self, MappingError> {
        let nodes: Vec<(NodeKind, &NodeDescriptor)> = topology.nodes().collect();

        // Duplicate names resolve to the first declaration.
        let mut by_name: AHashMap<&str, usize> = AHashMap::new();
        for (index, (_, node)) in nodes.iter().enumerate() {
            by_name.entry(node.name.as_str()).or_insert(index);
        }

        let mut connections = Vec::new();
        for (target, (_, node)) in nodes.iter().enumerate() {
            for input in &node.inputs {
                let source = *by_name.get(input.node_name.as_str()).ok_or_else(|| {
                    MappingError::NodeNotFound {
                        missing_node: input.node_name.clone(),
                        referenced_by: node.name.clone(),
                    }
                })?;
                connections.push(Connection {
                    source,
                    target,
                    types: &input.types,
                });
            }
        }

        Ok(Self {
            registry,
            nodes,
            connections,
        })
    }

    pub(super) fn build(
        self,
        orientation: Orientation,
        spacing: &LayoutSpacing,
        prior: Option<&CanvasModel>,
    ) -> CanvasModel {
        let pairs: Vec<(usize, usize)> = self
            .connections
            .iter()
            .map(|connection| (connection.source, connection.target))
            .collect();
        let positions = layout_positions(&compute_ranks(self.nodes.len(), &pairs), orientation, spacing);

        let mut canvas = CanvasModel::new();
        let mut ids = Vec::with_capacity(self.nodes.len());
        for ((kind, node), laid_out) in self.nodes.iter().zip(positions) {
            let id = canvas.allocate_id("node");
            ids.push(id.clone());
            let position = prior
                .and_then(|prior| prior.node_by_name(&node.name))
                .map_or(laid_out, |previous| previous.position);
            canvas.push_node(self.canvas_node(id, *kind, node, position));
        }

        for connection in &self.connections {
            let (Some(source), Some(target)) = (
                canvas.node(&ids[connection.source]).cloned(),
                canvas.node(&ids[connection.target]).cloned(),
            ) else {
                continue;
            };
            let (types, inferred) = if connection.types.is_empty() {
                (source.produced_types().intersect(&target.accepted_types()), true)
            } else {
                (TypeSet::Only(connection.types.to_vec()), false)
            };
            let target_port = target
                .input_port_for(&types)
                .map_or_else(|| INPUT_PORT_ID.to_string(), |port| port.id.clone());
            let id = canvas.allocate_id("edge");
            canvas.push_edge(CanvasEdge {
                id,
                source: source.id.clone(),
                source_port: OUTPUT_PORT_ID.to_string(),
                target: target.id.clone(),
                target_port,
                types,
                inferred,
            });
        }

        debug!(
            nodes = canvas.nodes().len(),
            edges = canvas.edges().len(),
            kept_positions = prior.is_some(),
            "Mapped topology onto canvas"
        );
        canvas
    }

    fn canvas_node(&self, id: String, kind: NodeKind, node: &NodeDescriptor, position: Position) -> CanvasNode {
        CanvasNode {
            id,
            name: node.name.clone(),
            node_type: node.node_type.clone(),
            kind,
            properties: node.properties.clone(),
            position,
            state: NodeState::Default,
            ports: self.registry.ports_for(&node.node_type),
        }
    }
}
