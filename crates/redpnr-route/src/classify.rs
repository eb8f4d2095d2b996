use redpnr_core::Coord;

use crate::element::ElementKind;
use crate::error::{Result, RouteError};

/// Layers a via spans between its entry and its landing.
pub const VIA_HEIGHT: i32 = 3;

/// Movement kind of one step from `from` to `to`.
///
/// A wire moves one voxel along a row or a column without changing layer;
/// a via moves exactly [`VIA_HEIGHT`] layers straight up or down.
pub fn classify(from: Coord, to: Coord) -> Result<ElementKind> {
    match from.delta(&to) {
        (0, dr, dc) if dr.abs() + dc.abs() == 1 => Ok(ElementKind::Wire),
        (VIA_HEIGHT, 0, 0) => Ok(ElementKind::UpVia),
        (dl, 0, 0) if dl == -VIA_HEIGHT => Ok(ElementKind::DownVia),
        _ => Err(RouteError::GeometryViolation { from, to }),
    }
}

/// Kinds of every step of `start → waypoints… → stop`.
///
/// Entry `i` describes the step arriving at `waypoints[i]`; the final entry
/// is the step into `stop`.
pub fn transitions(start: Coord, waypoints: &[Coord], stop: Coord) -> Result<Vec<ElementKind>> {
    let points: Vec<Coord> = std::iter::once(start)
        .chain(waypoints.iter().copied())
        .chain(std::iter::once(stop))
        .collect();
    points.windows(2).map(|w| classify(w[0], w[1])).collect()
}
