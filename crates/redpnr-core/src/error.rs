use thiserror::Error;

use crate::geometry::{Coord, Dimensions};
use crate::BlockId;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Cell '{cell}': {what} array has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        cell: String,
        what: &'static str,
        expected: (usize, usize, usize),
        found: (usize, usize, usize),
    },

    #[error("Cell '{cell}': port '{port}' at {coord} lies outside the cell arrays")]
    PortOutOfBounds {
        cell: String,
        port: String,
        coord: Coord,
    },

    #[error("Unknown cell type '{0}'")]
    UnknownCellType(String),

    #[error("Unknown cell instance '{0}'")]
    UnknownInstance(String),

    #[error("Cell type '{cell_type}' has no port '{port}'")]
    UnknownPort { cell_type: String, port: String },

    #[error("Cell instance '{0}' is defined more than once")]
    DuplicateInstance(String),

    #[error("Voxel {coord} is outside the grid {dimensions}")]
    OutOfBounds { coord: Coord, dimensions: Dimensions },

    #[error("Overlap at {coord}: already written by {existing}, rewritten by {attempted}")]
    OverlapViolation {
        coord: Coord,
        existing: String,
        attempted: String,
    },

    #[error("Ambiguous write at {coord} by {owner}: holds {existing:?}, attempted {attempted:?}")]
    AmbiguousWrite {
        coord: Coord,
        owner: String,
        existing: (BlockId, u8),
        attempted: (BlockId, u8),
    },
}
