use crate::error::SchemaError;
use ahash::AHashMap;
use std::borrow::Cow;
use tracing::debug;

pub mod definition;
pub mod port;

pub use definition::*;
pub use port::*;

const BUILTIN_DEFINITIONS: &str = include_str!("definitions.json");

/// Holds the declarative definition of every known node type.
///
/// Lookups never fail: a type the registry does not know is a valid outcome and
/// callers fall back to [`SchemaRegistry::resolve`]'s permissive definition.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    definitions: AHashMap<String, NodeDefinition>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a definitions source: a JSON object keyed by node type name.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let definitions: AHashMap<String, NodeDefinition> = serde_json::from_str(json)?;
        debug!(count = definitions.len(), "loaded node definitions");
        Ok(Self { definitions })
    }

    /// The bundled media-graph node catalogue.
    pub fn builtin() -> Result<Self, SchemaError> {
        Self::from_json(BUILTIN_DEFINITIONS)
    }

    pub fn with_definition(mut self, type_name: &str, definition: NodeDefinition) -> Self {
        self.definitions.insert(type_name.to_string(), definition);
        self
    }

    pub fn node_definition(&self, type_name: &str) -> Option<&NodeDefinition> {
        self.definitions.get(type_name)
    }

    /// The definition for `type_name`, or a permissive stand-in for unknown types.
    pub fn resolve(&self, type_name: &str) -> Cow<'_, NodeDefinition> {
        match self.definitions.get(type_name) {
            Some(definition) => Cow::Borrowed(definition),
            None => Cow::Owned(NodeDefinition::default()),
        }
    }

    /// Ports of a node of this type. Unknown types get one input and one output
    /// port that accept anything.
    pub fn ports_for(&self, type_name: &str) -> Vec<Port> {
        match self.definitions.get(type_name) {
            Some(definition) => definition.ports(),
            None => vec![Port::input(None), Port::output(TypeSet::Any)],
        }
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
