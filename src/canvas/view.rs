use serde::{Deserialize, Serialize};

/// View transform of the canvas. Kept only so the editor reopens where it was left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomPanSettings {
    pub transform_matrix: [f64; 6],
}

impl Default for ZoomPanSettings {
    fn default() -> Self {
        Self {
            transform_matrix: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        }
    }
}
