use std::fmt;

use serde::{Deserialize, Serialize};

/// A voxel address. Row grows southward, column grows eastward.
///
/// Serialized as a `[layer, row, col]` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[i32; 3]", into = "[i32; 3]")]
pub struct Coord {
    pub layer: i32,
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub const ORIGIN: Coord = Coord::new(0, 0, 0);

    pub const fn new(layer: i32, row: i32, col: i32) -> Self {
        Self { layer, row, col }
    }

    pub fn translate(&self, dlayer: i32, drow: i32, dcol: i32) -> Self {
        Self {
            layer: self.layer + dlayer,
            row: self.row + drow,
            col: self.col + dcol,
        }
    }

    /// Component-wise sum, used to move cell-relative coordinates into the grid.
    pub fn offset(&self, by: &Coord) -> Self {
        self.translate(by.layer, by.row, by.col)
    }

    /// `(dlayer, drow, dcol)` from `self` to `to`.
    pub fn delta(&self, to: &Coord) -> (i32, i32, i32) {
        (to.layer - self.layer, to.row - self.row, to.col - self.col)
    }

    pub fn above(&self, n: i32) -> Self {
        self.translate(n, 0, 0)
    }

    pub fn below(&self, n: i32) -> Self {
        self.translate(-n, 0, 0)
    }
}

impl From<[i32; 3]> for Coord {
    fn from([layer, row, col]: [i32; 3]) -> Self {
        Self { layer, row, col }
    }
}

impl From<Coord> for [i32; 3] {
    fn from(c: Coord) -> Self {
        [c.layer, c.row, c.col]
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.layer, self.row, self.col)
    }
}

/// Extent of a voxel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub layers: usize,
    pub rows: usize,
    pub cols: usize,
}

impl Dimensions {
    pub const fn new(layers: usize, rows: usize, cols: usize) -> Self {
        Self { layers, rows, cols }
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        (self.layers, self.rows, self.cols)
    }

    pub fn contains(&self, c: &Coord) -> bool {
        self.index(c).is_some()
    }

    /// Array index of `c`, or `None` if it lies outside the grid.
    pub fn index(&self, c: &Coord) -> Option<(usize, usize, usize)> {
        let layer = usize::try_from(c.layer).ok()?;
        let row = usize::try_from(c.row).ok()?;
        let col = usize::try_from(c.col).ok()?;
        (layer < self.layers && row < self.rows && col < self.cols).then_some((layer, row, col))
    }

    /// Whether a box of `shape` anchored at `origin` fits entirely inside.
    pub fn fits(&self, origin: &Coord, shape: (usize, usize, usize)) -> bool {
        match BBox3::from_origin_shape(*origin, shape) {
            Some(b) => self.contains(&b.min) && self.contains(&b.max),
            None => true,
        }
    }

    pub fn grow(&self, layers: usize, rows: usize, cols: usize) -> Self {
        Self::new(self.layers + layers, self.rows + rows, self.cols + cols)
    }
}

impl From<(usize, usize, usize)> for Dimensions {
    fn from((layers, rows, cols): (usize, usize, usize)) -> Self {
        Self { layers, rows, cols }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.layers, self.rows, self.cols)
    }
}

/// Compass direction a port or a repeater faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    East,
    North,
    West,
    South,
}

impl Facing {
    /// Counter-clockwise order, the order a quarter turn advances through.
    pub const CYCLE: [Facing; 4] = [Facing::East, Facing::North, Facing::West, Facing::South];

    fn cycle_index(self) -> usize {
        match self {
            Facing::East => 0,
            Facing::North => 1,
            Facing::West => 2,
            Facing::South => 3,
        }
    }

    pub fn rotated(self, rotation: Rotation) -> Facing {
        Self::CYCLE[(self.cycle_index() + rotation.turns() as usize) % 4]
    }

    /// Clockwise index starting at north, the order repeater metadata uses.
    pub fn clockwise_index(self) -> u8 {
        match self {
            Facing::North => 0,
            Facing::East => 1,
            Facing::South => 2,
            Facing::West => 3,
        }
    }

    /// Direction of travel for a lateral step. Row movement wins over column
    /// movement; no lateral movement yields `None`.
    pub fn from_step(drow: i32, dcol: i32) -> Option<Facing> {
        if drow > 0 {
            Some(Facing::South)
        } else if drow < 0 {
            Some(Facing::North)
        } else if dcol > 0 {
            Some(Facing::East)
        } else if dcol < 0 {
            Some(Facing::West)
        } else {
            None
        }
    }

    /// Direction from `from` to `to`, ignoring layers.
    pub fn between(from: &Coord, to: &Coord) -> Option<Facing> {
        let (_, drow, dcol) = from.delta(to);
        Self::from_step(drow, dcol)
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Facing::East => "east",
            Facing::North => "north",
            Facing::West => "west",
            Facing::South => "south",
        };
        f.write_str(s)
    }
}

/// A counter-clockwise quarter-turn count about the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rotation(u8);

impl Rotation {
    pub const IDENTITY: Rotation = Rotation(0);
    pub const ALL: [Rotation; 4] = [Rotation(0), Rotation(1), Rotation(2), Rotation(3)];

    /// Any turn count, reduced mod 4.
    pub fn new(turns: i32) -> Self {
        Self(turns.rem_euclid(4) as u8)
    }

    pub fn turns(self) -> u8 {
        self.0
    }

    pub fn inverse(self) -> Self {
        Self((4 - self.0) % 4)
    }

    pub fn then(self, next: Rotation) -> Self {
        Self((self.0 + next.0) % 4)
    }
}

impl TryFrom<u8> for Rotation {
    type Error = String;

    fn try_from(turns: u8) -> Result<Self, Self::Error> {
        if turns < 4 {
            Ok(Self(turns))
        } else {
            Err(format!("rotation must be 0..=3, got {turns}"))
        }
    }
}

impl From<Rotation> for u8 {
    fn from(r: Rotation) -> Self {
        r.0
    }
}

/// An inclusive axis-aligned voxel box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BBox3 {
    pub min: Coord,
    pub max: Coord,
}

impl BBox3 {
    pub fn new(min: Coord, max: Coord) -> Self {
        Self { min, max }
    }

    /// Box covering an array of `shape` placed at `origin`; `None` for empty shapes.
    pub fn from_origin_shape(origin: Coord, (layers, rows, cols): (usize, usize, usize)) -> Option<Self> {
        if layers == 0 || rows == 0 || cols == 0 {
            return None;
        }
        let max = origin.translate(layers as i32 - 1, rows as i32 - 1, cols as i32 - 1);
        Some(Self { min: origin, max })
    }

    pub fn from_points(points: &[Coord]) -> Option<Self> {
        let first = points.first()?;
        Some(points[1..].iter().fold(Self::new(*first, *first), |bb, p| {
            bb.union(&Self::new(*p, *p))
        }))
    }

    pub fn intersects(&self, other: &BBox3) -> bool {
        self.min.layer <= other.max.layer
            && self.max.layer >= other.min.layer
            && self.min.row <= other.max.row
            && self.max.row >= other.min.row
            && self.min.col <= other.max.col
            && self.max.col >= other.min.col
    }

    pub fn union(&self, other: &BBox3) -> Self {
        Self {
            min: Coord::new(
                self.min.layer.min(other.min.layer),
                self.min.row.min(other.min.row),
                self.min.col.min(other.min.col),
            ),
            max: Coord::new(
                self.max.layer.max(other.max.layer),
                self.max.row.max(other.max.row),
                self.max.col.max(other.max.col),
            ),
        }
    }

    /// Voxel extent of the box.
    pub fn dimensions(&self) -> Dimensions {
        let (dl, dr, dc) = self.min.delta(&self.max);
        Dimensions::new(dl as usize + 1, dr as usize + 1, dc as usize + 1)
    }

    /// Sum of the box's edge lengths along each axis.
    pub fn half_perimeter(&self) -> u32 {
        let (dl, dr, dc) = self.min.delta(&self.max);
        (dl + dr + dc) as u32
    }
}
