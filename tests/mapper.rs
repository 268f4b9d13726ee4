//! Tests for mapping topology documents onto canvas snapshots and back.
mod common;
use common::*;
use topograph::prelude::*;

#[cfg(test)]
mod mapper_tests {
    use super::*;

    fn round_trip(registry: &SchemaRegistry, topology: &TopologyDocument) -> TopologyDocument {
        let mapper = Mapper::new(registry);
        let canvas = mapper.to_canvas(topology).expect("mapping must succeed");
        mapper.to_topology(&canvas, &topology.header())
    }

    #[test]
    fn test_simple_topology_round_trips() {
        let registry = test_registry();
        let topology = simple_topology();
        assert_eq!(round_trip(&registry, &topology), topology);
    }

    #[test]
    fn test_bundled_samples_round_trip_under_builtin_catalogue() {
        let registry = SchemaRegistry::builtin().expect("builtin catalogue");
        for name in topograph::data::SAMPLE_NAMES {
            let topology = topograph::data::sample(name)
                .expect("sample parses")
                .expect("sample exists");
            assert_eq!(round_trip(&registry, &topology), topology, "sample {}", name);
        }
    }

    #[test]
    fn test_unknown_node_types_survive_untouched() {
        let registry = test_registry();
        let topology = simple_topology().add_node(
            NodeKind::Processor,
            NodeDescriptor::new("#Vendor.Custom", "custom")
                .with_input(NodeInput::new("camera"))
                .with_property("threshold", PropertyValue::from(serde_json::json!(0.5))),
        );

        let canvas = Mapper::new(&registry).to_canvas(&topology).expect("mapping");
        let custom = canvas.node_by_name("custom").expect("custom node");
        assert_eq!(custom.accepted_types(), TypeSet::Any);
        let edge = canvas
            .edges_touching(&custom.id)
            .next()
            .expect("edge into custom");
        assert_eq!(canvas.shared_types(edge), TypeSet::only(["video", "audio"]));

        assert_eq!(round_trip(&registry, &topology), topology);
    }

    #[test]
    fn test_parameter_references_stay_references() {
        let registry = test_registry();
        let canvas = Mapper::new(&registry)
            .to_canvas(&simple_topology())
            .expect("mapping");
        let camera = canvas.node_by_name("camera").expect("camera");
        assert_eq!(
            camera.property(&path(&["endpoint", "url"])),
            Some(&PropertyValue::parameter("url"))
        );
        let json = serde_json::to_value(Mapper::new(&registry).to_topology(&canvas, &simple_topology().header()))
            .expect("serialize");
        assert_eq!(json["properties"]["sources"][0]["endpoint"]["url"], "${url}");
    }

    #[test]
    fn test_explicit_and_inferred_edge_types() {
        let registry = test_registry();
        let canvas = Mapper::new(&registry)
            .to_canvas(&simple_topology())
            .expect("mapping");
        let explicit = &canvas.edges()[0];
        let inferred = &canvas.edges()[1];
        assert!(!explicit.inferred);
        assert_eq!(explicit.types, TypeSet::only(["video"]));
        assert_eq!(explicit.target_port, "input-video");
        assert!(inferred.inferred);
        assert_eq!(inferred.types, TypeSet::only(["video"]));
    }

    #[test]
    fn test_missing_input_node_is_an_error() {
        let registry = test_registry();
        let topology = simple_topology().add_node(
            NodeKind::Sink,
            NodeDescriptor::new("sink", "orphan").with_input(NodeInput::new("ghost")),
        );
        match Mapper::new(&registry).to_canvas(&topology) {
            Err(MappingError::NodeNotFound {
                missing_node,
                referenced_by,
            }) => {
                assert_eq!(missing_node, "ghost");
                assert_eq!(referenced_by, "orphan");
            }
            other => panic!("expected NodeNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_layout_ranks_by_input_depth() {
        let registry = test_registry();
        let spacing = topograph::canvas::LayoutSpacing::default();
        let horizontal = Mapper::new(&registry)
            .to_canvas(&simple_topology())
            .expect("mapping");
        let xs: Vec<f64> = horizontal.nodes().iter().map(|n| n.position.x).collect();
        assert_eq!(xs, vec![0.0, spacing.rank_gap, 2.0 * spacing.rank_gap]);

        let vertical = Mapper::new(&registry)
            .with_orientation(Orientation::Vertical)
            .to_canvas(&simple_topology())
            .expect("mapping");
        let ys: Vec<f64> = vertical.nodes().iter().map(|n| n.position.y).collect();
        assert_eq!(ys, xs);
        assert!(vertical.nodes().iter().all(|n| n.position.x == 0.0));
    }

    #[test]
    fn test_prior_positions_are_kept_by_name() {
        let registry = test_registry();
        let mapper = Mapper::new(&registry);
        let prior = mapper
            .to_canvas(&simple_topology())
            .expect("mapping")
            .moved("fps", Position::new(42.0, 7.0))
            .expect("move");

        let extended = simple_topology().add_node(
            NodeKind::Sink,
            NodeDescriptor::new("sink", "backup").with_input(NodeInput::new("camera")),
        );
        let canvas = mapper.to_canvas_with(&extended, Some(&prior)).expect("mapping");
        assert_eq!(
            canvas.node_by_name("fps").map(|n| n.position),
            Some(Position::new(42.0, 7.0))
        );
        assert!(canvas.node_by_name("backup").is_some());
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let registry = test_registry();
        let mapper = Mapper::new(&registry);
        let first = mapper.to_canvas(&simple_topology()).expect("mapping");
        let second = mapper.to_canvas(&simple_topology()).expect("mapping");
        assert_eq!(first, second);
    }

    #[test]
    fn test_rename_rewrites_exactly_the_touching_edges() {
        let registry = test_registry();
        let topology = simple_topology()
            .add_node(
                NodeKind::Processor,
                NodeDescriptor::new("detector", "motion").with_input(NodeInput::new("fps")),
            )
            .add_node(
                NodeKind::Sink,
                NodeDescriptor::new("eventSink", "events")
                    .with_input(NodeInput::new("motion"))
                    .with_property("hubOutputName", "out"),
            )
            .add_node(NodeKind::Sink, NodeDescriptor::new("sink", "idle"));
        let canvas = Mapper::new(&registry).to_canvas(&topology).expect("mapping");

        let endpoint_names = |canvas: &CanvasModel| -> Vec<(String, String)> {
            canvas
                .edges()
                .iter()
                .map(|edge| {
                    let name = |id: &str| canvas.node(id).map(|n| n.name.clone()).unwrap_or_default();
                    (name(&edge.source), name(&edge.target))
                })
                .collect()
        };
        let before = endpoint_names(&canvas);

        for node in canvas.nodes() {
            let renamed_to = format!("{}-renamed", node.name);
            let renamed = canvas.renamed(&node.name, &renamed_to).expect("rename");
            assert_eq!(renamed.edges(), canvas.edges());

            let expected: Vec<(String, String)> = before
                .iter()
                .map(|(source, target)| {
                    let swap = |name: &String| {
                        if *name == node.name { renamed_to.clone() } else { name.clone() }
                    };
                    (swap(source), swap(target))
                })
                .collect();
            assert_eq!(endpoint_names(&renamed), expected, "renaming {}", node.name);

            let document = Mapper::new(&registry).to_topology(&renamed, &topology.header());
            let references: usize = document
                .nodes()
                .flat_map(|(_, n)| n.inputs.iter())
                .filter(|input| input.node_name == node.name)
                .count();
            assert_eq!(references, 0);
        }
    }
}
