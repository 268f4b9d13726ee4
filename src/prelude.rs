//! Prelude module for convenient imports
//!
//! Re-exports the types most callers need to map, validate and edit topologies.
//!
//! # Example
//!
//! ```rust,no_run
//! use topograph::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let (bridge, _endpoint) = HostBridge::new();
//! let topology = topograph::data::sample_topology()?;
//! let mut session = GraphSession::builder(bridge).build(InitialData::topology(topology))?;
//!
//! session.set_property("rtspSource", &["transport"], Some(PropertyValue::string("Tcp")))?;
//! let errors = session.check()?;
//! println!("{:?}", ErrorFormatter::summary(&errors));
//! # Ok(())
//! # }
//! ```

// Documents
pub use crate::topology::{
    InstanceDocument, NodeDescriptor, NodeInput, NodeKind, ParameterDeclaration, ParameterType,
    PropertyValue, TopologyDocument, TopologyHeader,
};

// Schema and canvas
pub use crate::canvas::{CanvasEdge, CanvasModel, CanvasNode, Orientation, Position};
pub use crate::mapper::Mapper;
pub use crate::schema::{NodeDefinition, SchemaRegistry, TypeSet};

// Validation
pub use crate::parameters::ParameterSet;
pub use crate::report::ErrorFormatter;
pub use crate::validation::{ValidationCandidate, ValidationEngine, ValidationError, ValidationErrorKind};

// Session and host channel
pub use crate::host::{HostBridge, HostEndpoint, HostEvent, HostMessage, InitialData, PageType};
pub use crate::session::{GraphSession, SaveOutcome, SessionConfig, SessionState};

// Error types
pub use crate::error::{GraphError, MappingError, SchemaError, SessionError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
