use redpnr_core::{Coord, CoreError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RouteError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    #[error("No legal movement from {from} to {to}")]
    GeometryViolation { from: Coord, to: Coord },

    #[error("Signal strength drops to {strength} at {at} and no repeater position is eligible")]
    UnsatisfiableSignal { at: Coord, strength: i32 },

    #[error("Repeater at {at} has no lateral predecessor to orient by")]
    AmbiguousOrientation { at: Coord },

    #[error("Via leaving {at} is not entered by a wire")]
    DetachedVia { at: Coord },

    #[error(transparent)]
    Core(#[from] CoreError),
}
