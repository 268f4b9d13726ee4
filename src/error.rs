use crate::host::MessageKind;
use thiserror::Error;

/// Errors that can occur while loading node type definitions.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to parse node definitions JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),
}

/// Errors that can occur while mapping a topology document onto the canvas.
#[derive(Error, Debug)]
pub enum MappingError {
    #[error("Failed to parse topology JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error(
        "Node '{missing_node}' not found, which is required by an input of node '{referenced_by}'"
    )]
    NodeNotFound {
        missing_node: String,
        referenced_by: String,
    },
}

/// Errors raised by edits applied to a canvas snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("No node named '{0}' exists on the canvas")]
    NodeNotFound(String),

    #[error("No edge with id '{0}' exists on the canvas")]
    EdgeNotFound(String),

    #[error("Node '{source_node}' is already connected to node '{target_node}'")]
    DuplicateConnection {
        source_node: String,
        target_node: String,
    },

    #[error("Property path must not be empty")]
    EmptyPropertyPath,

    #[error("Property '{path}' of node '{node}' is not an object")]
    NotAnObject { node: String, path: String },
}

/// Errors raised when binding or declaring parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParameterError {
    #[error("Parameter '{0}' is not declared by the topology")]
    Unknown(String),

    #[error("Parameter '{0}' is already declared")]
    AlreadyDeclared(String),
}

/// Errors on the boundary with the embedding host process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("The host channel is disconnected")]
    Disconnected,

    #[error("Expected a response of kind {expected:?}, but the host answered with {found:?}")]
    UnexpectedResponse {
        expected: Vec<MessageKind>,
        found: MessageKind,
    },
}

/// Errors returned by graph session operations.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("The session is closed")]
    Closed,

    #[error("A save is already in flight")]
    SaveInFlight,

    #[error("This operation is not available on the current page")]
    WrongPage,

    #[error("The session is read-only")]
    ReadOnly,

    #[error("No bundled sample is called '{0}'")]
    UnknownSample(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error(transparent)]
    Host(#[from] HostError),
}
