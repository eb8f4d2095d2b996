use std::path::Path;

use redpnr_core::BlockRegistry;
use redpnr_place::PlacerConfig;
use redpnr_route::ExtractorConfig;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::json::read_json;

/// Everything tunable about a run. Missing sections and fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PnrConfig {
    pub registry: BlockRegistry,
    pub placer: PlacerConfig,
    pub extractor: ExtractorConfig,
}

impl PnrConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let config = read_json(path)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// `path` when given, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}
