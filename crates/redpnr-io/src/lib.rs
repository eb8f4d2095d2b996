//! # redpnr I/O
//!
//! JSON readers and writers for everything that crosses a process boundary:
//! the run configuration, cell libraries, netlists, routing requests,
//! placement snapshots and routed layouts.

pub mod config;
pub mod error;
pub mod json;
pub mod library;
pub mod netlist;
pub mod routed;
pub mod snapshot;

pub use config::PnrConfig;
pub use error::{IoError, Result};
pub use library::{load_library, parse_library};
pub use netlist::{load_netlist, load_routing};
pub use routed::RoutedOutput;
pub use snapshot::PlacementSnapshot;
