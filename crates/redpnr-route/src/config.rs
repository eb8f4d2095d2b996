use serde::{Deserialize, Serialize};

/// Signal-strength model and support placement for route extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Strength a run of wire starts with (cell outputs keep a margin below 15).
    pub start_strength: i32,
    /// Lowest strength a wire voxel may carry.
    pub min_strength: i32,
    /// Strength on a repeater's own voxel.
    pub repeater_strength: i32,
    /// Layer on which supports are stone rather than planks.
    pub floor_layer: i32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            start_strength: 13,
            min_strength: 1,
            repeater_strength: 16,
            floor_layer: 0,
        }
    }
}
