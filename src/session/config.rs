use crate::canvas::{LayoutSpacing, Orientation};
use serde::{Deserialize, Serialize};

/// Knobs of a graph session. Every field has a default, so a partial JSON
/// object is a valid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    pub orientation: Orientation,
    pub spacing: LayoutSpacing,
    /// Ask the host whether an edited topology name is still free.
    pub check_name_availability: bool,
    /// Refuse every canvas and document edit.
    pub read_only: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            spacing: LayoutSpacing::default(),
            check_name_availability: true,
            read_only: false,
        }
    }
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
