//! Bundled sample topologies.
//!
//! The editor opens the default sample when the host hands over no topology.

use crate::error::MappingError;
use crate::topology::TopologyDocument;

const MOTION_DETECTION: &str = include_str!("samples/motion-detection.json");
const CVR_TO_ASSET: &str = include_str!("samples/cvr-to-asset.json");

/// Names accepted by [`sample`].
pub const SAMPLE_NAMES: [&str; 2] = ["motion-detection", "cvr-to-asset"];

/// The topology used when nothing else is provided.
pub fn sample_topology() -> Result<TopologyDocument, MappingError> {
    TopologyDocument::from_json(MOTION_DETECTION)
}

/// Looks up a bundled sample by name. Unknown names yield `Ok(None)`.
pub fn sample(name: &str) -> Result<Option<TopologyDocument>, MappingError> {
    let source = match name {
        "motion-detection" => MOTION_DETECTION,
        "cvr-to-asset" => CVR_TO_ASSET,
        _ => return Ok(None),
    };
    TopologyDocument::from_json(source).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_sample_parses() {
        for name in SAMPLE_NAMES {
            let topology = sample(name).expect("parse").expect("bundled");
            assert!(!topology.name.is_empty());
        }
        assert!(sample("nope").expect("lookup").is_none());
    }
}
