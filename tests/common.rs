//! Common test utilities for building registries, topologies and sessions.
use topograph::prelude::*;

/// A small node catalogue.
///
/// `source` produces video and audio and requires `endpoint.url`; `detector`
/// turns video into application events; `sink` records video or audio;
/// `eventSink` consumes application events and requires `hubOutputName`.
#[allow(dead_code)]
pub const TEST_DEFINITIONS_JSON: &str = r#"{
    "source": {
        "properties": {
            "endpoint": {
                "type": "object",
                "required": true,
                "properties": { "url": { "type": "string", "required": true } }
            },
            "transport": { "type": "string", "enum": ["tcp", "http"] }
        },
        "outputs": ["video", "audio"]
    },
    "filter": {
        "properties": { "maximumFps": { "type": "string" } },
        "inputs": ["video"],
        "outputs": ["video"]
    },
    "detector": {
        "properties": { "sensitivity": { "type": "string", "enum": ["low", "medium", "high"] } },
        "inputs": ["video"],
        "outputs": ["application"]
    },
    "audioProcessor": { "inputs": ["audio"], "outputs": ["audio"] },
    "sink": { "inputs": ["video", "audio"] },
    "eventSink": {
        "properties": { "hubOutputName": { "type": "string", "required": true } },
        "inputs": ["application"]
    }
}"#;

#[allow(dead_code)]
pub fn test_registry() -> SchemaRegistry {
    SchemaRegistry::from_json(TEST_DEFINITIONS_JSON).expect("test definitions must parse")
}

/// `camera (source) -> fps (filter, video only) -> recorder (sink)`, with the
/// camera url bound to the `url` parameter. Valid under [`test_registry`].
#[allow(dead_code)]
pub fn simple_topology() -> TopologyDocument {
    let mut endpoint = std::collections::BTreeMap::new();
    endpoint.insert("url".to_string(), PropertyValue::parameter("url"));

    let mut topology = TopologyDocument::new("pipeline")
        .add_node(
            NodeKind::Source,
            NodeDescriptor::new("source", "camera")
                .with_property("endpoint", PropertyValue::Object(endpoint)),
        )
        .add_node(
            NodeKind::Processor,
            NodeDescriptor::new("filter", "fps")
                .with_input(NodeInput::new("camera").with_types(["video"]))
                .with_property("maximumFps", "15"),
        )
        .add_node(
            NodeKind::Sink,
            NodeDescriptor::new("sink", "recorder").with_input(NodeInput::new("fps")),
        );
    topology.properties.description = Some("Records a throttled camera feed".to_string());
    topology
        .properties
        .parameters
        .push(ParameterDeclaration::new("url", ParameterType::String));
    topology
}

/// The same pipeline with the camera's required endpoint left out.
#[allow(dead_code)]
pub fn topology_without_endpoint() -> TopologyDocument {
    let mut topology = simple_topology();
    topology.properties.sources[0].properties.remove("endpoint");
    topology
}

/// Opens a topology page on `topology` with the test registry.
#[allow(dead_code)]
pub fn open_session(topology: TopologyDocument, check_names: bool) -> (GraphSession, HostEndpoint) {
    let (bridge, endpoint) = HostBridge::new();
    let session = GraphSession::builder(bridge)
        .with_registry(test_registry())
        .with_name_check(check_names)
        .build(InitialData::topology(topology))
        .expect("session must open");
    (session, endpoint)
}

/// Plays the host for one exchange: takes the next outbound message, then
/// answers with `event`.
#[allow(dead_code)]
pub async fn answer_next(endpoint: &mut HostEndpoint, event: HostEvent) -> Option<HostMessage> {
    let message = endpoint.recv().await;
    endpoint.dispatch(event);
    message
}

#[allow(dead_code)]
pub fn path(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|part| part.to_string()).collect()
}
