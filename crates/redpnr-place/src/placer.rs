use std::collections::BTreeMap;

use redpnr_core::{
    BBox3, BlockRegistry, Canvas, CellGeometry, Coord, CoreError, Dimensions, InstanceId, Layout,
    Netlist, Owner, PinRef, RotatedCells, Rotation, SpatialEntry, SpatialIndex,
};

use crate::annealing::SimulatedAnnealing;
use crate::config::PlacerConfig;
use crate::error::{PlaceError, Result};
use crate::placement::{Placed, Placement};

/// One instance resolved against the rotation cache.
struct PlacedCell<'c> {
    id: &'c str,
    origin: Coord,
    geometry: &'c CellGeometry,
}

impl PlacedCell<'_> {
    fn bbox(&self) -> Option<BBox3> {
        BBox3::from_origin_shape(self.origin, self.geometry.shape())
    }

    fn occupies(&self, at: &Coord) -> bool {
        let (dl, dr, dc) = self.origin.delta(at);
        self.geometry
            .dimensions()
            .index(&Coord::new(dl, dr, dc))
            .is_some_and(|idx| self.geometry.mask()[idx])
    }
}

/// Places the instances of one netlist using a pregenerated rotation cache.
pub struct Placer<'a> {
    netlist: &'a Netlist,
    cells: &'a RotatedCells,
    registry: &'a BlockRegistry,
    config: PlacerConfig,
    cell_types: BTreeMap<InstanceId, String>,
}

impl<'a> Placer<'a> {
    /// Validates the netlist against the cache before anything is placed.
    pub fn new(
        netlist: &'a Netlist,
        cells: &'a RotatedCells,
        registry: &'a BlockRegistry,
        config: PlacerConfig,
    ) -> Result<Self> {
        netlist.validate(cells)?;
        let cell_types = netlist
            .instances
            .iter()
            .map(|i| (i.id.clone(), i.cell_type.clone()))
            .collect();
        Ok(Self {
            netlist,
            cells,
            registry,
            config,
            cell_types,
        })
    }

    pub fn config(&self) -> &PlacerConfig {
        &self.config
    }

    pub fn geometry(&self, id: &str, rotation: Rotation) -> Result<&'a CellGeometry> {
        let cell_type = self
            .cell_types
            .get(id)
            .ok_or_else(|| CoreError::UnknownInstance(id.to_string()))?;
        Ok(self.cells.require(cell_type, rotation)?)
    }

    /// World coordinate of `pin` under `placement`.
    pub fn pin_coordinate(&self, placement: &Placement, pin: &PinRef) -> Result<Coord> {
        let placed = placement
            .get(&pin.instance)
            .ok_or_else(|| PlaceError::Unplaced(pin.instance.clone()))?;
        let geometry = self.geometry(&pin.instance, placed.rotation)?;
        let port = geometry.port(&pin.port).ok_or_else(|| CoreError::UnknownPort {
            cell_type: geometry.name().to_string(),
            port: pin.port.clone(),
        })?;
        Ok(placed.position.offset(&port.coordinates))
    }

    /// Deal instances, in id order, onto a square grid of equal slots.
    pub fn initial_placement(&self) -> Result<(Placement, Dimensions)> {
        if self.cell_types.is_empty() {
            return Err(PlaceError::EmptyNetlist);
        }

        let mut slot = (0, 0, 0);
        for id in self.cell_types.keys() {
            let (h, w, l) = self.geometry(id, Rotation::IDENTITY)?.shape();
            slot = (slot.0.max(h), slot.1.max(w), slot.2.max(l));
        }
        let slot_rows = slot.1 + self.config.slot_spacing;
        let slot_cols = slot.2 + self.config.slot_spacing;

        let count = self.cell_types.len();
        let per_row = ((count as f64).sqrt().ceil() as usize).max(1);
        let grid_rows = count.div_ceil(per_row);

        let placement = self
            .cell_types
            .keys()
            .enumerate()
            .map(|(k, id)| {
                let position = Coord::new(
                    0,
                    ((k / per_row) * slot_rows) as i32,
                    ((k % per_row) * slot_cols) as i32,
                );
                (id.clone(), Placed::new(position, Rotation::IDENTITY))
            })
            .collect();
        let dimensions = Dimensions::new(slot.0, grid_rows * slot_rows, per_row * slot_cols);

        log::info!(
            "Initial placement: {} instances on a {}x{} slot grid, dimensions {}",
            count,
            grid_rows,
            per_row,
            dimensions
        );
        Ok((placement, dimensions))
    }

    fn resolve<'p>(&'p self, placement: &'p Placement) -> Result<Vec<PlacedCell<'p>>> {
        if let Some(missing) = self.cell_types.keys().find(|id| placement.get(id).is_none()) {
            return Err(PlaceError::Unplaced(missing.clone()));
        }
        placement
            .iter()
            .map(|(id, placed)| {
                Ok(PlacedCell {
                    id,
                    origin: placed.position,
                    geometry: self.geometry(id, placed.rotation)?,
                })
            })
            .collect()
    }

    /// Cost of `placement` within `dimensions`; lower is better.
    pub fn score(&self, placement: &Placement, dimensions: Dimensions) -> Result<f64> {
        let placed = self.resolve(placement)?;

        let overlaps = overlapping_pairs(&placed).len();
        let out_of_bounds = placed
            .iter()
            .filter(|c| !dimensions.fits(&c.origin, c.geometry.shape()))
            .count();
        let wirelength = self.wirelength(placement)?;

        Ok(self.config.overlap_penalty * overlaps as f64
            + self.config.out_of_bounds_penalty * out_of_bounds as f64
            + self.config.wirelength_weight * wirelength as f64)
    }

    /// Sum over nets of the half perimeter of the pins' bounding box.
    pub fn wirelength(&self, placement: &Placement) -> Result<u64> {
        let mut total = 0u64;
        for net in &self.netlist.nets {
            let pins = net
                .pins
                .iter()
                .map(|pin| self.pin_coordinate(placement, pin))
                .collect::<Result<Vec<_>>>()?;
            if let Some(bbox) = BBox3::from_points(&pins) {
                total += u64::from(bbox.half_perimeter());
            }
        }
        Ok(total)
    }

    /// Instance pairs whose occupancy masks share at least one voxel.
    pub fn overlaps(&self, placement: &Placement) -> Result<Vec<(InstanceId, InstanceId)>> {
        let placed = self.resolve(placement)?;
        Ok(overlapping_pairs(&placed)
            .into_iter()
            .map(|(i, j)| (placed[i].id.to_string(), placed[j].id.to_string()))
            .collect())
    }

    pub fn simulated_annealing_placement(
        &self,
        placement: &Placement,
        dimensions: Dimensions,
        initial_temperature: f64,
        iterations: usize,
    ) -> Result<Placement> {
        let annealer = SimulatedAnnealing::new(self, initial_temperature, iterations);
        let (best, cost) = annealer.optimize(placement.clone(), dimensions)?;
        log::info!("Annealed placement cost: {:.1}", cost);
        Ok(best)
    }

    /// Translate `placement` to the origin and return its tight bounds.
    pub fn shrink(&self, placement: &Placement) -> Result<(Placement, Dimensions)> {
        let placed = self.resolve(placement)?;
        let bounds = placed
            .iter()
            .filter_map(PlacedCell::bbox)
            .reduce(|a, b| a.union(&b));

        let Some(bounds) = bounds else {
            return Ok((placement.clone(), Dimensions::new(0, 0, 0)));
        };
        let shrunk = placement.translated(-bounds.min.layer, -bounds.min.row, -bounds.min.col);
        let dimensions = bounds.dimensions();
        log::debug!("Shrunk placement to {}", dimensions);
        Ok((shrunk, dimensions))
    }

    /// Stamp every instance's masked voxels into a fresh air-filled grid.
    pub fn placement_to_layout(&self, dimensions: Dimensions, placement: &Placement) -> Result<Layout> {
        let placed = self.resolve(placement)?;
        let mut canvas = Canvas::new(dimensions, self.registry.air);
        for cell in &placed {
            let owner = Owner::Cell(cell.id.to_string());
            for (rel, block, data) in cell.geometry.occupied() {
                canvas.write(cell.origin.offset(&rel), block, data, &owner)?;
            }
        }
        log::info!(
            "Materialized {} instances ({} voxels) into {}",
            placed.len(),
            canvas.written(),
            dimensions
        );
        Ok(canvas.into_layout())
    }
}

fn overlapping_pairs(placed: &[PlacedCell<'_>]) -> Vec<(usize, usize)> {
    let entries = placed
        .iter()
        .enumerate()
        .filter_map(|(index, c)| c.bbox().map(|bbox| SpatialEntry { index, bbox }))
        .collect();
    SpatialIndex::build(entries)
        .intersecting_pairs()
        .into_iter()
        .filter(|&(i, j)| masks_overlap(&placed[i], &placed[j]))
        .collect()
}

fn masks_overlap(a: &PlacedCell<'_>, b: &PlacedCell<'_>) -> bool {
    let (Some(ba), Some(bb)) = (a.bbox(), b.bbox()) else {
        return false;
    };
    if !ba.intersects(&bb) {
        return false;
    }
    let lo = Coord::new(
        ba.min.layer.max(bb.min.layer),
        ba.min.row.max(bb.min.row),
        ba.min.col.max(bb.min.col),
    );
    let hi = Coord::new(
        ba.max.layer.min(bb.max.layer),
        ba.max.row.min(bb.max.row),
        ba.max.col.min(bb.max.col),
    );
    (lo.layer..=hi.layer).any(|layer| {
        (lo.row..=hi.row).any(|row| {
            (lo.col..=hi.col).any(|col| {
                let at = Coord::new(layer, row, col);
                a.occupies(&at) && b.occupies(&at)
            })
        })
    })
}
