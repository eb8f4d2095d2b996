use std::collections::BTreeMap;

use crate::blocks::BlockRegistry;
use crate::cell::{CellGeometry, CellTemplate};
use crate::error::{CoreError, Result};
use crate::geometry::Rotation;

/// Cell types by name, in their library orientation.
#[derive(Debug, Clone, Default)]
pub struct CellLibrary {
    cells: BTreeMap<String, CellGeometry>,
}

impl CellLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every template into a cell geometry.
    pub fn from_templates<'a, I>(templates: I, registry: &BlockRegistry, pad: usize) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a String, &'a CellTemplate)>,
    {
        let mut library = Self::new();
        for (name, template) in templates {
            library.insert(CellGeometry::from_template(name, template, registry, pad)?);
        }
        log::info!("Cell library loaded: {} cell types", library.len());
        Ok(library)
    }

    pub fn insert(&mut self, cell: CellGeometry) -> Option<CellGeometry> {
        self.cells.insert(cell.name().to_string(), cell)
    }

    pub fn get(&self, name: &str) -> Option<&CellGeometry> {
        self.cells.get(name)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Compute all four rotations of every cell type.
    pub fn pregenerate(&self, registry: &BlockRegistry) -> RotatedCells {
        let cells = self
            .cells
            .iter()
            .map(|(name, cell)| {
                log::debug!("Pregenerating rotations of {}", name);
                (name.clone(), Rotation::ALL.map(|r| cell.rotated(r, registry)))
            })
            .collect();
        RotatedCells { cells }
    }
}

/// The rotation cache: every cell type in all four orientations.
#[derive(Debug, Clone, Default)]
pub struct RotatedCells {
    cells: BTreeMap<String, [CellGeometry; 4]>,
}

impl RotatedCells {
    pub fn get(&self, cell_type: &str, rotation: Rotation) -> Option<&CellGeometry> {
        self.cells
            .get(cell_type)
            .map(|rotations| &rotations[rotation.turns() as usize])
    }

    pub fn require(&self, cell_type: &str, rotation: Rotation) -> Result<&CellGeometry> {
        self.get(cell_type, rotation)
            .ok_or_else(|| CoreError::UnknownCellType(cell_type.to_string()))
    }

    pub fn contains(&self, cell_type: &str) -> bool {
        self.cells.contains_key(cell_type)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
