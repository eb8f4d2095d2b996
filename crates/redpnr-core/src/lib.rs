//! # redpnr Core
//!
//! Voxel grid model shared by the placer and the route extractor: coordinates
//! and rotations, the block-code registry, rotatable cell geometry with its
//! pregenerated rotation cache, the netlist, an ownership-tracked layout canvas,
//! and a 3-D R-tree for cell overlap queries.

pub mod geometry;
pub mod blocks;
pub mod cell;
pub mod library;
pub mod netlist;
pub mod layout;
pub mod spatial;
pub mod error;

pub use blocks::{BlockId, BlockRegistry};
pub use cell::{CellGeometry, CellTemplate, PinDirection, Port};
pub use error::{CoreError, Result};
pub use geometry::{BBox3, Coord, Dimensions, Facing, Rotation};
pub use layout::{Canvas, Layout, Owner};
pub use library::{CellLibrary, RotatedCells};
pub use netlist::{CellInstance, InstanceId, Net, Netlist, PinRef};
pub use spatial::{SpatialEntry, SpatialIndex};
