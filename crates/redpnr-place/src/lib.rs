//! # redpnr Place
//!
//! Simulated-annealing placement of cell instances on the voxel grid.
//!
//! ```text
//! Netlist + RotatedCells
//!   → initial_placement            (slot grid, rotation 0)
//!   → simulated_annealing_placement (overlap / wirelength / bounds cost)
//!   → shrink                        (zero-slack bounding grid)
//!   → placement_to_layout           (cells stamped into a Layout)
//! ```

pub mod annealing;
pub mod config;
pub mod error;
pub mod placement;
pub mod placer;

pub use config::PlacerConfig;
pub use error::{PlaceError, Result};
pub use placement::{Placed, Placement};
pub use placer::Placer;
