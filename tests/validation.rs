//! Tests for the validation battery run over canvas snapshots.
mod common;
use common::*;
use topograph::parameters::ParameterSet;
use topograph::prelude::*;
use topograph::validation::{ServerError, keys};

#[cfg(test)]
mod validation_tests {
    use super::*;

    fn validate(registry: &SchemaRegistry, topology: &TopologyDocument) -> Vec<ValidationError> {
        let canvas = Mapper::new(registry).to_canvas(topology).expect("mapping");
        let declared: Vec<&str> = topology
            .properties
            .parameters
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        let candidate = ValidationCandidate::topology(&topology.name, &canvas, registry, declared);
        ValidationEngine::new().validate(&candidate, None).to_vec()
    }

    #[test]
    fn test_valid_topology_has_no_errors() {
        assert!(validate(&test_registry(), &simple_topology()).is_empty());
    }

    #[test]
    fn test_bundled_sample_is_valid() {
        let registry = SchemaRegistry::builtin().expect("builtin catalogue");
        let topology = topograph::data::sample_topology().expect("sample");
        assert_eq!(validate(&registry, &topology), vec![]);
    }

    #[test]
    fn test_every_missing_property_is_reported() {
        let mut topology = topology_without_endpoint();
        topology.properties.sources.push(NodeDescriptor::new("source", "second"));
        topology.properties.sinks.push(NodeDescriptor::new("eventSink", "events"));

        let errors = validate(&test_registry(), &topology);
        let missing: Vec<(Option<String>, Vec<String>)> = errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::MissingField)
            .map(|e| (e.node_name.clone(), e.property.clone()))
            .collect();
        assert_eq!(
            missing,
            vec![
                (Some("camera".to_string()), path(&["endpoint"])),
                (Some("second".to_string()), path(&["endpoint"])),
                (Some("events".to_string()), path(&["hubOutputName"])),
            ]
        );
    }

    #[test]
    fn test_nested_required_field_is_reported_under_its_parent() {
        let mut topology = simple_topology();
        topology.properties.sources[0].properties.insert(
            "endpoint".to_string(),
            PropertyValue::from(serde_json::json!({ "url": "" })),
        );
        let errors = validate(&test_registry(), &topology);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].property, path(&["endpoint", "url"]));
        assert_eq!(errors[0].description, keys::PROPERTY_MISSING);
    }

    #[test]
    fn test_validation_is_deterministic() {
        let registry = test_registry();
        let topology = topology_without_endpoint();
        let canvas = Mapper::new(&registry).to_canvas(&topology).expect("mapping");
        let candidate = ValidationCandidate::topology("", &canvas, &registry, vec!["url"]);
        let mut engine = ValidationEngine::new();
        let first = engine.validate(&candidate, None).to_vec();
        let second = engine.validate(&candidate, None).to_vec();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_disjoint_port_types_yield_one_type_mismatch() {
        let registry = test_registry();
        let topology = simple_topology()
            .add_node(
                NodeKind::Processor,
                NodeDescriptor::new("detector", "motion").with_input(NodeInput::new("fps")),
            )
            .add_node(
                NodeKind::Sink,
                NodeDescriptor::new("sink", "wrong").with_input(NodeInput::new("motion")),
            );
        let errors = validate(&registry, &topology);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::TypeMismatch);
        assert_eq!(errors[0].node_name.as_deref(), Some("wrong"));
        assert_eq!(errors[0].property, path(&["inputs", "motion"]));
    }

    #[test]
    fn test_explicit_types_outside_the_shared_set_mismatch() {
        let mut topology = simple_topology();
        topology.properties.processors[0].inputs[0].types = vec!["video".to_string(), "audio".to_string()];
        let errors = validate(&test_registry(), &topology);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::TypeMismatch);
        assert_eq!(errors[0].node_name.as_deref(), Some("fps"));
    }

    #[test]
    fn test_literal_values_are_checked_against_their_domain() {
        let mut topology = simple_topology();
        let camera = &mut topology.properties.sources[0].properties;
        camera.insert("transport".to_string(), PropertyValue::string("udp"));
        let errors = validate(&test_registry(), &topology);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::TypeMismatch);
        assert_eq!(errors[0].description, keys::PROPERTY_NOT_ALLOWED);

        let camera = &mut topology.properties.sources[0].properties;
        camera.insert("transport".to_string(), PropertyValue::parameter("url"));
        assert!(validate(&test_registry(), &topology).is_empty());
    }

    #[test]
    fn test_undeclared_parameter_references_are_missing_fields() {
        let mut topology = simple_topology();
        topology.properties.parameters.clear();
        let errors = validate(&test_registry(), &topology);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::MissingField);
        assert_eq!(errors[0].description, keys::PARAMETER_UNDECLARED);
        assert_eq!(errors[0].property, path(&["endpoint", "url"]));
    }

    #[test]
    fn test_duplicate_node_names_are_reported_once() {
        let topology = simple_topology().add_node(NodeKind::Sink, NodeDescriptor::new("sink", "recorder"));
        let errors = validate(&test_registry(), &topology);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::NameAlreadyInUse);
        assert_eq!(errors[0].node_name.as_deref(), Some("recorder"));
    }

    #[test]
    fn test_server_errors_are_merged_verbatim() {
        let registry = test_registry();
        let canvas = Mapper::new(&registry)
            .to_canvas(&simple_topology())
            .expect("mapping");
        let candidate = ValidationCandidate::topology("pipeline", &canvas, &registry, vec!["url"]);
        let reason = ServerError {
            value: "Quota exceeded".to_string(),
            node_name: Some("recorder".to_string()),
            node_property: Some("name".to_string()),
        };
        let mut engine = ValidationEngine::new();
        let errors = engine.validate(&candidate, Some(vec![reason])).to_vec();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::ServerError);
        assert_eq!(errors[0].description, "Quota exceeded");
        assert_eq!(errors[0].property, path(&["name"]));
        assert!(engine.validate(&candidate, None).is_empty());
    }

    #[test]
    fn test_instance_candidates_check_parameter_values() {
        let registry = test_registry();
        let topology = simple_topology();
        let canvas = Mapper::new(&registry).to_canvas(&topology).expect("mapping");
        let mut parameters = ParameterSet::declare(&topology, None);

        let mut engine = ValidationEngine::new();
        let errors = engine
            .validate(&ValidationCandidate::instance("", &canvas, &registry, &parameters), None)
            .to_vec();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].description, keys::INSTANCE_NAME_MISSING);
        assert_eq!(errors[1].property, path(&["parameters", "url"]));

        parameters.bind("url", "rtsp://camera").expect("bind");
        let candidate = ValidationCandidate::instance("run", &canvas, &registry, &parameters);
        assert!(engine.validate(&candidate, None).is_empty());
    }
}
