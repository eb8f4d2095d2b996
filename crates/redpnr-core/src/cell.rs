use std::collections::BTreeMap;

use ndarray::{s, Array3};
use serde::{Deserialize, Serialize};

use crate::blocks::{BlockId, BlockRegistry};
use crate::error::{CoreError, Result};
use crate::geometry::{Coord, Dimensions, Facing, Rotation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinDirection {
    Input,
    Output,
    Inout,
}

/// A named attachment point on a cell, relative to the cell's arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub coordinates: Coord,
    pub facing: Facing,
    pub direction: PinDirection,
    pub level: u32,
}

/// Declarative description of a cell type, as stored in a cell library.
///
/// `blocks` and `data` are nested `[layer][row][col]` arrays of equal shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellTemplate {
    pub blocks: Vec<Vec<Vec<BlockId>>>,
    pub data: Vec<Vec<Vec<u8>>>,
    pub pins: BTreeMap<String, Port>,
    #[serde(default)]
    pub delay: u32,
}

/// Immutable voxel geometry of one cell type in one rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellGeometry {
    name: String,
    blocks: Array3<BlockId>,
    data: Array3<u8>,
    mask: Array3<bool>,
    ports: BTreeMap<String, Port>,
    delay: u32,
}

impl CellGeometry {
    pub fn new(
        name: &str,
        blocks: Array3<BlockId>,
        data: Array3<u8>,
        mask: Array3<bool>,
        ports: BTreeMap<String, Port>,
        delay: u32,
    ) -> Result<Self> {
        let expected = blocks.dim();
        for (what, found) in [("data", data.dim()), ("mask", mask.dim())] {
            if found != expected {
                return Err(CoreError::ShapeMismatch {
                    cell: name.to_string(),
                    what,
                    expected,
                    found,
                });
            }
        }
        let dims = Dimensions::from(expected);
        if let Some((port, p)) = ports.iter().find(|(_, p)| !dims.contains(&p.coordinates)) {
            return Err(CoreError::PortOutOfBounds {
                cell: name.to_string(),
                port: port.clone(),
                coord: p.coordinates,
            });
        }
        Ok(Self {
            name: name.to_string(),
            blocks,
            data,
            mask,
            ports,
            delay,
        })
    }

    /// Build a solid cell from its library template.
    ///
    /// Air inside the template becomes glass so the whole footprint is
    /// occupied. With `pad > 0` every axis gains `pad` empty voxels on each
    /// side and a stone base is laid directly under the original footprint.
    pub fn from_template(
        name: &str,
        template: &CellTemplate,
        registry: &BlockRegistry,
        pad: usize,
    ) -> Result<Self> {
        let mut blocks = nested_to_array(name, "blocks", &template.blocks, None)?;
        let data = nested_to_array(name, "data", &template.data, Some(blocks.dim()))?;
        blocks.mapv_inplace(|b| if b == registry.air { registry.glass } else { b });
        let mask = Array3::from_elem(blocks.dim(), true);

        if pad == 0 {
            return Self::new(name, blocks, data, mask, template.pins.clone(), template.delay);
        }

        let (h, w, l) = blocks.dim();
        let padded = (h + 2 * pad, w + 2 * pad, l + 2 * pad);
        let mut padded_blocks = Array3::from_elem(padded, registry.air);
        let mut padded_data = Array3::zeros(padded);
        let mut padded_mask = Array3::from_elem(padded, false);

        let inner = s![pad..pad + h, pad..pad + w, pad..pad + l];
        padded_blocks.slice_mut(&inner).assign(&blocks);
        padded_data.slice_mut(&inner).assign(&data);
        padded_mask.slice_mut(&inner).assign(&mask);

        let base = s![pad - 1, pad..pad + w, pad..pad + l];
        padded_blocks.slice_mut(&base).fill(registry.stone);
        padded_mask.slice_mut(&base).fill(true);

        let shift = Coord::new(pad as i32, pad as i32, pad as i32);
        let ports = template
            .pins
            .iter()
            .map(|(pin, p)| {
                let mut port = p.clone();
                port.coordinates = p.coordinates.offset(&shift);
                (pin.clone(), port)
            })
            .collect();

        Self::new(name, padded_blocks, padded_data, padded_mask, ports, template.delay)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn blocks(&self) -> &Array3<BlockId> {
        &self.blocks
    }

    pub fn data(&self) -> &Array3<u8> {
        &self.data
    }

    pub fn mask(&self) -> &Array3<bool> {
        &self.mask
    }

    pub fn ports(&self) -> &BTreeMap<String, Port> {
        &self.ports
    }

    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.get(name)
    }

    pub fn delay(&self) -> u32 {
        self.delay
    }

    /// `(layers, rows, cols)` of the cell arrays.
    pub fn shape(&self) -> (usize, usize, usize) {
        self.blocks.dim()
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::from(self.shape())
    }

    /// Cell-relative coordinate, block and metadata of every masked voxel.
    pub fn occupied(&self) -> impl Iterator<Item = (Coord, BlockId, u8)> + '_ {
        self.mask
            .indexed_iter()
            .filter(|(_, m)| **m)
            .map(move |(idx, _)| {
                let (y, z, x) = idx;
                (
                    Coord::new(y as i32, z as i32, x as i32),
                    self.blocks[idx],
                    self.data[idx],
                )
            })
    }

    pub fn occupied_count(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }

    /// A new geometry turned counter-clockwise by `rotation`.
    pub fn rotated(&self, rotation: Rotation, registry: &BlockRegistry) -> CellGeometry {
        (0..rotation.turns()).fold(self.clone(), |cell, _| cell.quarter_turn(registry))
    }

    /// `(y, z, x)` of an `(H, W, L)` array moves to `(y, L-1-x, z)` of an
    /// `(H, L, W)` array.
    fn quarter_turn(&self, registry: &BlockRegistry) -> CellGeometry {
        let (h, w, l) = self.shape();
        let turned = (h, l, w);
        let one = Rotation::new(1);

        let mut blocks = Array3::from_elem(turned, registry.air);
        let mut data = Array3::zeros(turned);
        let mut mask = Array3::from_elem(turned, false);
        for ((y, z, x), &block) in self.blocks.indexed_iter() {
            let to = (y, l - 1 - x, z);
            let meta = self.data[(y, z, x)];
            blocks[to] = block;
            data[to] = if registry.is_direction_sensitive(block) {
                registry.counter_rotate(meta, one)
            } else {
                meta
            };
            mask[to] = self.mask[(y, z, x)];
        }

        let ports = self
            .ports
            .iter()
            .map(|(pin, p)| {
                let c = p.coordinates;
                let port = Port {
                    coordinates: Coord::new(c.layer, l as i32 - 1 - c.col, c.row),
                    facing: p.facing.rotated(one),
                    direction: p.direction,
                    level: p.level,
                };
                (pin.clone(), port)
            })
            .collect();

        CellGeometry {
            name: self.name.clone(),
            blocks,
            data,
            mask,
            ports,
            delay: self.delay,
        }
    }
}

fn nested_to_array<T: Copy>(
    cell: &str,
    what: &'static str,
    nested: &[Vec<Vec<T>>],
    expected: Option<(usize, usize, usize)>,
) -> Result<Array3<T>> {
    let rows = nested.first().map_or(0, |layer| layer.len());
    let cols = nested
        .first()
        .and_then(|layer| layer.first())
        .map_or(0, |row| row.len());
    let shape = (nested.len(), rows, cols);
    let mismatch = |found| CoreError::ShapeMismatch {
        cell: cell.to_string(),
        what,
        expected: expected.unwrap_or(shape),
        found,
    };

    let mut flat = Vec::with_capacity(shape.0 * rows * cols);
    for layer in nested {
        if layer.len() != rows {
            return Err(mismatch((nested.len(), layer.len(), cols)));
        }
        for row in layer {
            if row.len() != cols {
                return Err(mismatch((nested.len(), rows, row.len())));
            }
            flat.extend_from_slice(row);
        }
    }
    if expected.is_some_and(|e| e != shape) {
        return Err(mismatch(shape));
    }
    Array3::from_shape_vec(shape, flat).map_err(|_| mismatch(shape))
}
