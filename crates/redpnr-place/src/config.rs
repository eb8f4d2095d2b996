use serde::{Deserialize, Serialize};

/// Tunables for initial placement, scoring and annealing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacerConfig {
    /// Seed of the annealing random stream.
    pub seed: u64,
    pub initial_temperature: f64,
    /// Temperature reached on the last iteration.
    pub final_temperature: f64,
    pub iterations: usize,
    /// Cost added per pair of cells whose masks share a voxel.
    pub overlap_penalty: f64,
    /// Cost added per cell not fully inside the grid.
    pub out_of_bounds_penalty: f64,
    pub wirelength_weight: f64,
    /// Empty voxels between initial placement slots (rows and columns).
    pub slot_spacing: usize,
    /// Largest row/column displacement of a relocation move.
    pub max_step: i32,
    pub swap_probability: f64,
    pub rotate_probability: f64,
}

impl Default for PlacerConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            initial_temperature: 250.0,
            final_temperature: 0.01,
            iterations: 1000,
            overlap_penalty: 10_000.0,
            out_of_bounds_penalty: 10_000.0,
            wirelength_weight: 1.0,
            slot_spacing: 1,
            max_step: 4,
            swap_probability: 0.3,
            rotate_probability: 0.2,
        }
    }
}
