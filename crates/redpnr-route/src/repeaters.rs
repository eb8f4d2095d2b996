use redpnr_core::Coord;

use crate::config::ExtractorConfig;
use crate::element::ElementKind;
use crate::error::{Result, RouteError};

/// Strength carried by each voxel of a wire run.
///
/// Strength enters at `start_strength`, every wire costs one, and a
/// repeater resets its own voxel to `repeater_strength`. Vias never occur
/// inside a run.
pub fn strength_profile(run: &[ElementKind], coords: &[Coord], config: &ExtractorConfig) -> Result<Vec<i32>> {
    let mut strength = config.start_strength;
    run.iter()
        .zip(coords)
        .map(|(kind, &at)| {
            strength = match kind {
                ElementKind::Wire => strength - 1,
                ElementKind::Repeater => config.repeater_strength,
                ElementKind::UpVia | ElementKind::DownVia => return Err(RouteError::DetachedVia { at }),
            };
            Ok(strength)
        })
        .collect()
}

/// A repeater needs a straight run through it: its neighbours share a layer
/// and sit two voxels apart on one axis.
fn repeatable(before: Coord, after: Coord) -> bool {
    match before.delta(&after) {
        (0, 0, dc) => dc.abs() == 2,
        (0, dr, 0) => dr.abs() == 2,
        _ => false,
    }
}

/// Convert the fewest wires of `run` into repeaters so that no voxel falls
/// below `min_strength`. `before` and `after` are the coordinates bracketing
/// the run. Returns the new kinds and the strength at the run's last voxel.
pub fn place_repeaters(
    run: &[ElementKind],
    coords: &[Coord],
    before: Coord,
    after: Coord,
    config: &ExtractorConfig,
) -> Result<(Vec<ElementKind>, i32)> {
    debug_assert_eq!(run.len(), coords.len());
    let mut kinds = run.to_vec();
    let neighbours = |i: usize| {
        let prev = if i == 0 { before } else { coords[i - 1] };
        let next = coords.get(i + 1).copied().unwrap_or(after);
        (prev, next)
    };

    loop {
        let profile = strength_profile(&kinds, coords, config)?;
        let Some(violation) = profile.iter().position(|&s| s < config.min_strength) else {
            let terminal = profile.last().copied().unwrap_or(config.start_strength);
            return Ok((kinds, terminal));
        };

        // positions at or before the latest repeater cannot help this violation
        let floor = kinds[..violation]
            .iter()
            .rposition(|k| *k == ElementKind::Repeater)
            .map_or(0, |i| i + 1);
        let slot = (floor..=violation).rev().find(|&i| {
            let (prev, next) = neighbours(i);
            repeatable(prev, next)
        });

        match slot {
            // a repeater that is itself too weak cannot be fixed by another one
            Some(i) if kinds[i] != ElementKind::Repeater => {
                log::debug!("Repeater at {} (strength {} at {})", coords[i], profile[violation], coords[violation]);
                kinds[i] = ElementKind::Repeater;
            }
            _ => {
                return Err(RouteError::UnsatisfiableSignal {
                    at: coords[violation],
                    strength: profile[violation],
                })
            }
        }
    }
}
