use crate::canvas::CanvasModel;
use crate::topology::{
    NodeDescriptor, NodeInput, TopologyDocument, TopologyHeader, TopologyProperties,
};
use tracing::debug;

pub(super) fn to_topology(canvas: &CanvasModel, header: &TopologyHeader) -> TopologyDocument {
    let mut topology = TopologyDocument {
        name: header.name.clone(),
        properties: TopologyProperties {
            description: header
                .description
                .clone()
                .filter(|text| !text.trim().is_empty()),
            parameters: header.parameters.clone(),
            ..TopologyProperties::default()
        },
    };

    for node in canvas.nodes() {
        let inputs = canvas
            .edges()
            .iter()
            .filter(|edge| edge.target == node.id)
            .filter_map(|edge| {
                let source = canvas.node(&edge.source)?;
                let input = NodeInput::new(source.name.clone());
                Some(if edge.inferred {
                    input
                } else {
                    input.with_types(edge.types.labels().iter().cloned())
                })
            })
            .collect();
        topology.nodes_of_mut(node.kind).push(NodeDescriptor {
            node_type: node.node_type.clone(),
            name: node.name.clone(),
            inputs,
            properties: node.properties.clone(),
        });
    }

    debug!(
        name = %topology.name,
        revision = canvas.revision(),
        "Mapped canvas back to topology"
    );
    topology
}
