use std::collections::BTreeMap;
use std::path::Path;

use redpnr_core::{BlockRegistry, CellLibrary, CellTemplate};

use crate::error::Result;
use crate::json::read_json;

/// Build a library from `{ "<cell type>": CellTemplate, ... }`.
pub fn parse_library(json: &str, registry: &BlockRegistry, pad: usize) -> Result<CellLibrary> {
    let templates: BTreeMap<String, CellTemplate> = serde_json::from_str(json)?;
    Ok(CellLibrary::from_templates(&templates, registry, pad)?)
}

pub fn load_library(path: &Path, registry: &BlockRegistry, pad: usize) -> Result<CellLibrary> {
    let templates: BTreeMap<String, CellTemplate> = read_json(path)?;
    log::info!("Read {} cell templates from {}", templates.len(), path.display());
    Ok(CellLibrary::from_templates(&templates, registry, pad)?)
}
