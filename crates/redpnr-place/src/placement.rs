use std::collections::BTreeMap;

use redpnr_core::{Coord, InstanceId, Rotation};
use serde::{Deserialize, Serialize};

/// Where one instance sits: the grid coordinate of its array origin and its rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placed {
    pub position: Coord,
    pub rotation: Rotation,
}

impl Placed {
    pub fn new(position: Coord, rotation: Rotation) -> Self {
        Self { position, rotation }
    }
}

/// Instance id → placement, iterated in id order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Placement {
    cells: BTreeMap<InstanceId, Placed>,
}

impl Placement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: &str, placed: Placed) -> Option<Placed> {
        self.cells.insert(id.to_string(), placed)
    }

    pub fn get(&self, id: &str) -> Option<&Placed> {
        self.cells.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Placed> {
        self.cells.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&InstanceId, &Placed)> {
        self.cells.iter()
    }

    pub fn instances(&self) -> impl Iterator<Item = &InstanceId> {
        self.cells.keys()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Move every instance by `(dlayer, drow, dcol)`.
    pub fn translated(&self, dlayer: i32, drow: i32, dcol: i32) -> Self {
        let cells = self
            .cells
            .iter()
            .map(|(id, p)| (id.clone(), Placed::new(p.position.translate(dlayer, drow, dcol), p.rotation)))
            .collect();
        Self { cells }
    }
}

impl FromIterator<(InstanceId, Placed)> for Placement {
    fn from_iter<I: IntoIterator<Item = (InstanceId, Placed)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}
