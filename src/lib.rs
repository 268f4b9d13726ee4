//! # Topograph - Pipeline Topology Mapping and Validation Engine
//!
//! **Topograph** is the engine behind a visual editor for media-processing
//! pipelines. A pipeline is described by a *topology* document: named source,
//! processor and sink nodes with typed properties, `${parameter}` references
//! and typed connections. Topograph turns that document into an editable canvas
//! graph, turns the edited graph back into a document, and checks the result
//! before the host is allowed to persist or activate it.
//!
//! ## Core Workflow
//!
//! 1.  **Describe Your Node Types**: Load a [`schema::SchemaRegistry`] from a JSON
//!     definitions source, or use the bundled media-graph catalogue.
//! 2.  **Map**: Use a [`mapper::Mapper`] to turn a [`topology::TopologyDocument`]
//!     into a [`canvas::CanvasModel`] snapshot, and back.
//! 3.  **Validate**: Run a [`validation::ValidationEngine`] pass over the candidate.
//!     A pass never fails; an empty error list is the success signal.
//! 4.  **Edit and Save**: A [`session::GraphSession`] ties everything to a host
//!     channel, tracking dirty state and refusing saves that would not validate.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use topograph::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let registry = SchemaRegistry::builtin()?;
//!     let topology = TopologyDocument::from_json(&std::fs::read_to_string("topology.json")?)?;
//!
//!     // Map the document onto a canvas and validate it.
//!     let canvas = Mapper::new(&registry).to_canvas(&topology)?;
//!     let declared: Vec<&str> = topology
//!         .properties
//!         .parameters
//!         .iter()
//!         .map(|p| p.name.as_str())
//!         .collect();
//!     let candidate = ValidationCandidate::topology(&topology.name, &canvas, &registry, declared);
//!
//!     let mut engine = ValidationEngine::new();
//!     let errors = engine.validate(&candidate, None);
//!     println!("{}", ErrorFormatter::format_report(errors));
//!
//!     // Write the canvas back; the document round-trips.
//!     let saved = Mapper::new(&registry).to_topology(&canvas, &topology.header());
//!     assert_eq!(saved.name, topology.name);
//!     Ok(())
//! }
//! ```

pub mod canvas;
pub mod data;
pub mod error;
pub mod host;
pub mod mapper;
pub mod parameters;
pub mod prelude;
pub mod report;
pub mod schema;
pub mod session;
pub mod topology;
pub mod validation;
