use std::collections::HashMap;
use std::fmt;

use ndarray::Array3;
use serde::{Deserialize, Serialize};

use crate::blocks::BlockId;
use crate::error::{CoreError, Result};
use crate::geometry::{Coord, Dimensions};
use crate::netlist::InstanceId;

/// Co-indexed block and metadata grids addressed by `(layer, row, col)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub blocks: Array3<BlockId>,
    pub data: Array3<u8>,
}

impl Layout {
    pub fn new(dimensions: Dimensions, background: BlockId) -> Self {
        Self {
            blocks: Array3::from_elem(dimensions.shape(), background),
            data: Array3::zeros(dimensions.shape()),
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::from(self.blocks.dim())
    }

    pub fn block(&self, at: Coord) -> Option<BlockId> {
        self.dimensions().index(&at).map(|idx| self.blocks[idx])
    }

    pub fn data_at(&self, at: Coord) -> Option<u8> {
        self.dimensions().index(&at).map(|idx| self.data[idx])
    }

    pub fn voxel(&self, at: Coord) -> Option<(BlockId, u8)> {
        self.dimensions()
            .index(&at)
            .map(|idx| (self.blocks[idx], self.data[idx]))
    }

    pub fn count(&self, block: BlockId) -> usize {
        self.blocks.iter().filter(|&&b| b == block).count()
    }
}

/// Who wrote a voxel on a [`Canvas`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Owner {
    /// Present before the canvas started tracking writes.
    Fixed,
    Cell(InstanceId),
    Net(String),
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Fixed => f.write_str("placed layout"),
            Owner::Cell(id) => write!(f, "cell {id}"),
            Owner::Net(name) => write!(f, "net {name}"),
        }
    }
}

/// A layout with a shadow record of every voxel written through it.
///
/// A voxel has at most one owner. A net may rewrite its own voxel with the
/// identical block and metadata; any other second write is an error.
#[derive(Debug, Clone)]
pub struct Canvas {
    layout: Layout,
    owners: HashMap<Coord, Owner>,
}

impl Canvas {
    pub fn new(dimensions: Dimensions, background: BlockId) -> Self {
        Self {
            layout: Layout::new(dimensions, background),
            owners: HashMap::new(),
        }
    }

    /// Track writes over an existing layout; every non-background voxel
    /// is owned by [`Owner::Fixed`].
    pub fn over(layout: Layout, background: BlockId) -> Self {
        let owners = layout
            .blocks
            .indexed_iter()
            .filter(|(_, b)| **b != background)
            .map(|((y, z, x), _)| (Coord::new(y as i32, z as i32, x as i32), Owner::Fixed))
            .collect();
        Self { layout, owners }
    }

    pub fn write(&mut self, at: Coord, block: BlockId, data: u8, owner: &Owner) -> Result<()> {
        let dimensions = self.layout.dimensions();
        let idx = dimensions
            .index(&at)
            .ok_or(CoreError::OutOfBounds { coord: at, dimensions })?;

        if let Some(existing) = self.owners.get(&at) {
            let held = (self.layout.blocks[idx], self.layout.data[idx]);
            return match (existing, owner) {
                (Owner::Net(a), Owner::Net(b)) if a == b && held == (block, data) => Ok(()),
                (Owner::Net(a), Owner::Net(b)) if a == b => Err(CoreError::AmbiguousWrite {
                    coord: at,
                    owner: owner.to_string(),
                    existing: held,
                    attempted: (block, data),
                }),
                _ => Err(CoreError::OverlapViolation {
                    coord: at,
                    existing: existing.to_string(),
                    attempted: owner.to_string(),
                }),
            };
        }

        self.layout.blocks[idx] = block;
        self.layout.data[idx] = data;
        self.owners.insert(at, owner.clone());
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.owners.len()
    }

    pub fn into_layout(self) -> Layout {
        self.layout
    }
}
