//! Simulated annealing placement optimization
//!
//! Refines a placement with single-instance moves scored by [`Placer::score`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use redpnr_core::{Coord, Dimensions, InstanceId, Rotation};

use crate::error::Result;
use crate::placement::{Placed, Placement};
use crate::placer::Placer;

/// Move operation for simulated annealing
#[derive(Debug, Clone)]
enum Move {
    /// Exchange the positions of two instances, each keeping its rotation
    Swap(InstanceId, InstanceId),
    /// Move an instance to a new position
    Relocate(InstanceId, Coord),
    /// Turn an instance in place
    Rotate(InstanceId, Rotation),
}

/// Simulated annealing optimizer over one placer's netlist
pub struct SimulatedAnnealing<'p, 'a> {
    placer: &'p Placer<'a>,
    initial_temp: f64,
    cooling_rate: f64,
    max_iterations: usize,
}

impl<'p, 'a> SimulatedAnnealing<'p, 'a> {
    /// Cooling is geometric from `initial_temp` down to the configured final temperature.
    pub fn new(placer: &'p Placer<'a>, initial_temp: f64, max_iterations: usize) -> Self {
        let final_temp = placer.config().final_temperature;
        let cooling_rate = if max_iterations > 1 && initial_temp > 0.0 && final_temp > 0.0 {
            (final_temp / initial_temp).powf(1.0 / (max_iterations - 1) as f64)
        } else {
            1.0
        };
        Self {
            placer,
            initial_temp,
            cooling_rate,
            max_iterations,
        }
    }

    /// Returns the best placement seen and its cost.
    pub fn optimize(&self, initial: Placement, dimensions: Dimensions) -> Result<(Placement, f64)> {
        let mut rng = StdRng::seed_from_u64(self.placer.config().seed);
        let mut current_cost = self.placer.score(&initial, dimensions)?;
        let mut current = initial;
        let mut best = current.clone();
        let mut best_cost = current_cost;

        let cells: Vec<InstanceId> = current.instances().cloned().collect();
        if cells.is_empty() {
            return Ok((best, best_cost));
        }

        let log_interval = (self.max_iterations / 10).max(1);
        let mut temperature = self.initial_temp;
        let mut accepted = 0usize;

        for iteration in 0..self.max_iterations {
            let move_op = self.generate_move(&current, &cells, dimensions, &mut rng);
            let candidate = apply_move(&current, &move_op);
            let new_cost = self.placer.score(&candidate, dimensions)?;
            let delta = new_cost - current_cost;

            let accept = if delta <= 0.0 {
                true
            } else if temperature > 0.0 {
                rng.gen::<f64>() < (-delta / temperature).exp()
            } else {
                false
            };

            if accept {
                accepted += 1;
                current = candidate;
                current_cost = new_cost;
                if current_cost < best_cost {
                    best = current.clone();
                    best_cost = current_cost;
                }
            }

            if iteration % log_interval == 0 {
                log::debug!(
                    "Annealing iteration {}: T={:.3} cost={:.1} best={:.1}",
                    iteration,
                    temperature,
                    current_cost,
                    best_cost
                );
            }
            temperature *= self.cooling_rate;
        }

        log::info!(
            "Annealing finished: {} iterations, {} accepted, best cost {:.1}",
            self.max_iterations,
            accepted,
            best_cost
        );
        Ok((best, best_cost))
    }

    fn generate_move<R: Rng>(
        &self,
        placement: &Placement,
        cells: &[InstanceId],
        dimensions: Dimensions,
        rng: &mut R,
    ) -> Move {
        let config = self.placer.config();

        if cells.len() >= 2 && rng.gen::<f64>() < config.swap_probability {
            let i = rng.gen_range(0..cells.len());
            let mut j = rng.gen_range(0..cells.len() - 1);
            if j >= i {
                j += 1;
            }
            return Move::Swap(cells[i].clone(), cells[j].clone());
        }

        let id = &cells[rng.gen_range(0..cells.len())];
        let Some(current) = placement.get(id) else {
            return Move::Relocate(id.clone(), Coord::ORIGIN);
        };

        if rng.gen::<f64>() < config.rotate_probability {
            let turns = rng.gen_range(1..4);
            return Move::Rotate(id.clone(), current.rotation.then(Rotation::new(turns)));
        }

        let step = config.max_step.max(1);
        let dlayer = if dimensions.layers > 1 { rng.gen_range(-1..=1) } else { 0 };
        let drow = rng.gen_range(-step..=step);
        let dcol = rng.gen_range(-step..=step);
        let moved = current.position.translate(dlayer, drow, dcol);
        let clamped = Coord::new(
            clamp_axis(moved.layer, dimensions.layers),
            clamp_axis(moved.row, dimensions.rows),
            clamp_axis(moved.col, dimensions.cols),
        );
        Move::Relocate(id.clone(), clamped)
    }
}

fn clamp_axis(value: i32, extent: usize) -> i32 {
    value.clamp(0, (extent as i32 - 1).max(0))
}

fn apply_move(placement: &Placement, move_op: &Move) -> Placement {
    let mut next = placement.clone();
    match move_op {
        Move::Swap(a, b) => {
            if let (Some(pa), Some(pb)) = (placement.get(a).copied(), placement.get(b).copied()) {
                next.insert(a, Placed::new(pb.position, pa.rotation));
                next.insert(b, Placed::new(pa.position, pb.rotation));
            }
        }
        Move::Relocate(id, position) => {
            if let Some(placed) = next.get_mut(id) {
                placed.position = *position;
            }
        }
        Move::Rotate(id, rotation) => {
            if let Some(placed) = next.get_mut(id) {
                placed.rotation = *rotation;
            }
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_swap_keeps_rotations() {
        let mut p = Placement::new();
        p.insert("a", Placed::new(Coord::new(0, 0, 0), Rotation::new(1)));
        p.insert("b", Placed::new(Coord::new(0, 4, 4), Rotation::new(2)));
        let next = apply_move(&p, &Move::Swap("a".into(), "b".into()));
        assert_eq!(next.get("a").unwrap(), &Placed::new(Coord::new(0, 4, 4), Rotation::new(1)));
        assert_eq!(next.get("b").unwrap(), &Placed::new(Coord::new(0, 0, 0), Rotation::new(2)));
        // input untouched
        assert_eq!(p.get("a").unwrap().position, Coord::ORIGIN);
    }

    #[test]
    fn test_clamp_axis() {
        assert_eq!(clamp_axis(-3, 10), 0);
        assert_eq!(clamp_axis(12, 10), 9);
        assert_eq!(clamp_axis(5, 0), 0);
    }
}
