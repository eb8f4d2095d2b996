use std::path::Path;

use redpnr_core::Dimensions;
use redpnr_place::Placement;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::json::{read_json, write_json};

/// A finished placement, persisted so routing can run without re-placing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementSnapshot {
    pub id: Uuid,
    pub placement: Placement,
    pub dimensions: Dimensions,
}

impl PlacementSnapshot {
    pub fn new(placement: Placement, dimensions: Dimensions) -> Self {
        Self {
            id: Uuid::new_v4(),
            placement,
            dimensions,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let snapshot: Self = read_json(path)?;
        log::info!(
            "Loaded placement {} ({} instances, {})",
            snapshot.id,
            snapshot.placement.len(),
            snapshot.dimensions
        );
        Ok(snapshot)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(path, self)?;
        log::info!("Saved placement {} to {}", self.id, path.display());
        Ok(())
    }
}
