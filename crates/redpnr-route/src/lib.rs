//! # redpnr Route
//!
//! Turns coarse per-net waypoint paths into legal wire, repeater and via
//! sequences and stamps them into a placed voxel grid.
//!
//! 1. [`classify`] every step of a segment into a movement kind.
//! 2. [`split_segment`] cuts the kinds at via and repeater landmarks and runs
//!    [`place_repeaters`] on the wire runs in between.
//! 3. [`RouteExtractor::extract_layout`] stamps all nets through an
//!    ownership-tracked canvas.

pub mod classify;
pub mod config;
pub mod element;
pub mod error;
pub mod extractor;
pub mod repeaters;
pub mod routing;
pub mod split;
pub mod stamp;

pub use classify::{classify, transitions};
pub use config::ExtractorConfig;
pub use element::{ElementKind, PathElement};
pub use error::{Result, RouteError};
pub use extractor::RouteExtractor;
pub use repeaters::{place_repeaters, strength_profile};
pub use routing::{ExtractedRouting, ExtractedSegment, NetSegment, Routing, SegmentEndpoint};
pub use split::split_segment;
pub use stamp::Stamper;
