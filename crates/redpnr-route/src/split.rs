use redpnr_core::Coord;

use crate::config::ExtractorConfig;
use crate::element::{ElementKind, PathElement};
use crate::error::{Result, RouteError};
use crate::repeaters::place_repeaters;

/// Cut a segment's transition kinds at its landmarks and legalize the wire
/// runs between them.
///
/// `kinds[i]` is the step arriving at `waypoints[i]`; the extra trailing kind
/// is the step into `stop`. A lone repeater or a wire followed by a via is a
/// landmark and becomes one element at the landmark's first waypoint. The
/// via's landing waypoint is absorbed into the via.
pub fn split_segment(
    kinds: &[ElementKind],
    waypoints: &[Coord],
    start: Coord,
    stop: Coord,
    config: &ExtractorConfig,
) -> Result<Vec<PathElement>> {
    debug_assert_eq!(kinds.len(), waypoints.len() + 1);
    let n = waypoints.len();
    let origin = |i: usize| if i == 0 { start } else { waypoints[i - 1] };

    let mut path = Vec::with_capacity(n);
    let mut prev = 0;
    let mut curr = 0;

    while curr < kinds.len() {
        let landmark = match (kinds[curr], kinds.get(curr + 1)) {
            (ElementKind::Repeater, _) if curr < n => Some((ElementKind::Repeater, 1)),
            (ElementKind::Wire, Some(&next)) if next.is_via() => Some((next, 2)),
            (kind, _) if kind.is_via() => return Err(RouteError::DetachedVia { at: origin(curr) }),
            _ => None,
        };
        let Some((kind, width)) = landmark else {
            curr += 1;
            continue;
        };

        if prev < curr {
            let (run, _) = place_repeaters(
                &kinds[prev..curr],
                &waypoints[prev..curr],
                origin(prev),
                waypoints[curr],
                config,
            )?;
            push_run(&mut path, &run, &waypoints[prev..curr]);
        }
        path.push(PathElement::new(kind, waypoints[curr]));
        curr += width;
        prev = curr;
    }

    if prev < n {
        let (run, terminal) = place_repeaters(
            &kinds[prev..n],
            &waypoints[prev..n],
            origin(prev),
            stop,
            config,
        )?;
        log::debug!("Final run of {} voxels reaches {} at strength {}", n - prev, stop, terminal);
        push_run(&mut path, &run, &waypoints[prev..n]);
    }
    Ok(path)
}

fn push_run(path: &mut Vec<PathElement>, run: &[ElementKind], coords: &[Coord]) {
    path.extend(run.iter().zip(coords).map(|(&kind, &at)| PathElement::new(kind, at)));
}
