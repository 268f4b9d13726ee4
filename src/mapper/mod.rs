//! Conversion between topology documents and canvas snapshots.

use crate::canvas::{CanvasModel, LayoutSpacing, Orientation};
use crate::error::MappingError;
use crate::schema::SchemaRegistry;
use crate::topology::{TopologyDocument, TopologyHeader};

mod inbound;
mod outbound;

use inbound::CanvasBuilder;

pub struct Mapper<'a> {
    registry: &'a SchemaRegistry,
    orientation: Orientation,
    spacing: LayoutSpacing,
}

impl<'a> Mapper<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            orientation: Orientation::default(),
            spacing: LayoutSpacing::default(),
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_spacing(mut self, spacing: LayoutSpacing) -> Self {
        self.spacing = spacing;
        self
    }

    /// Builds a fresh canvas for `topology`, laid out from scratch.
    pub fn to_canvas(&self, topology: &TopologyDocument) -> Result<CanvasModel, MappingError> {
        self.to_canvas_with(topology, None)
    }

    /// Builds a canvas for `topology`, keeping the position of every node whose
    /// name also appears on `prior`.
    pub fn to_canvas_with(
        &self,
        topology: &TopologyDocument,
        prior: Option<&CanvasModel>,
    ) -> Result<CanvasModel, MappingError> {
        Ok(CanvasBuilder::new(self.registry, topology)?.build(
            self.orientation,
            &self.spacing,
            prior,
        ))
    }

    /// Writes `canvas` back into a document carrying `header`.
    pub fn to_topology(&self, canvas: &CanvasModel, header: &TopologyHeader) -> TopologyDocument {
        outbound::to_topology(canvas, header)
    }
}
