use std::collections::HashSet;

use redpnr_core::{BlockId, BlockRegistry, Canvas, Coord, Facing, Layout, Owner};

use crate::element::PathElement;
use crate::error::{Result, RouteError};

/// Writes extracted paths onto a canvas seeded with the placed cells.
///
/// Pin endpoints already exist as cell voxels and are never written, nor are
/// their supports.
pub struct Stamper<'a> {
    registry: &'a BlockRegistry,
    floor_layer: i32,
    canvas: Canvas,
    pins: HashSet<Coord>,
}

impl<'a> Stamper<'a> {
    pub fn new(registry: &'a BlockRegistry, floor_layer: i32, placed: Layout, pins: HashSet<Coord>) -> Self {
        Self {
            registry,
            floor_layer,
            canvas: Canvas::over(placed, registry.air),
            pins,
        }
    }

    /// Stamp a concatenated `(net, element)` sequence in one pass.
    pub fn stamp(&mut self, sequence: &[(&str, PathElement)]) -> Result<()> {
        for (i, &(net, element)) in sequence.iter().enumerate() {
            let owner = Owner::Net(net.to_string());
            let prev = i.checked_sub(1).map(|j| sequence[j].1);
            let next = sequence.get(i + 1).map(|&(_, e)| e);
            match element {
                PathElement::Wire(at) => self.wire(at, next, &owner)?,
                PathElement::Repeater(at) => self.repeater(at, prev, &owner)?,
                PathElement::UpVia(at) => self.up_via(at, &owner)?,
                PathElement::DownVia(at) => self.down_via(at, &owner)?,
                PathElement::Noop => {}
            }
        }
        Ok(())
    }

    /// A wire entering an up via on its own layer must drive the via's base
    /// strongly, so it is stamped as a repeater facing the via.
    fn wire(&mut self, at: Coord, next: Option<PathElement>, owner: &Owner) -> Result<()> {
        if self.pins.contains(&at) {
            return Ok(());
        }
        let (block, data) = match next {
            Some(PathElement::UpVia(via)) if via.layer == at.layer => {
                let facing = Facing::between(&at, &via).ok_or(RouteError::AmbiguousOrientation { at })?;
                (self.registry.unpowered_repeater, self.registry.repeater_data(facing))
            }
            _ => (self.registry.redstone_wire, 0),
        };
        self.write(at, block, data, owner)?;
        self.support(at, owner)
    }

    fn repeater(&mut self, at: Coord, prev: Option<PathElement>, owner: &Owner) -> Result<()> {
        let facing = prev
            .and_then(|p| p.coord())
            .and_then(|from| Facing::between(&from, &at))
            .ok_or(RouteError::AmbiguousOrientation { at })?;
        self.write(at, self.registry.unpowered_repeater, self.registry.repeater_data(facing), owner)?;
        self.support(at, owner)
    }

    fn up_via(&mut self, at: Coord, owner: &Owner) -> Result<()> {
        let r = self.registry;
        self.column(
            at,
            &[
                (-1, r.stone, 0),
                (0, r.stone, 0),
                (1, r.redstone_torch, r.torch_up),
                (2, r.planks, 0),
                (3, r.unlit_redstone_torch, r.torch_up),
            ],
            owner,
        )
    }

    fn down_via(&mut self, at: Coord, owner: &Owner) -> Result<()> {
        let r = self.registry;
        self.column(
            at,
            &[
                (-1, r.sticky_piston, r.piston_down),
                (-2, r.redstone_block, 0),
                (-3, r.air, 0),
                (-4, r.stone, 0),
            ],
            owner,
        )
    }

    fn column(&mut self, at: Coord, template: &[(i32, BlockId, u8)], owner: &Owner) -> Result<()> {
        for &(dy, block, data) in template {
            let target = at.above(dy);
            // a via may land directly on its stop pin
            if self.pins.contains(&target) {
                continue;
            }
            self.write(target, block, data, owner)?;
        }
        Ok(())
    }

    fn support(&mut self, at: Coord, owner: &Owner) -> Result<()> {
        let below = at.below(1);
        let block = self.registry.support_for(below.layer, self.floor_layer);
        self.write(below, block, 0, owner)
    }

    fn write(&mut self, at: Coord, block: BlockId, data: u8, owner: &Owner) -> Result<()> {
        Ok(self.canvas.write(at, block, data, owner)?)
    }

    pub fn written(&self) -> usize {
        self.canvas.written()
    }

    pub fn into_layout(self) -> Layout {
        self.canvas.into_layout()
    }
}
