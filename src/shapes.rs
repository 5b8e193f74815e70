//! Cell coordinates, shape kinds and weighted candidate shapes.
//!
//! Weights are fixed priority bands. A shape's [`Tier`] decides when the
//! partition solver considers it; its weight only competes against shapes
//! solved in the same pass.

use std::cmp::Ordering;
use std::fmt;

use rustc_hash::FxHashSet;

use crate::geometry::Axis;

/// A grid coordinate. `x` grows to the right, `y` grows downward.
///
/// Cells order row-major: by `y`, then by `x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the cell displaced by `(dx, dy)`.
    #[inline(always)]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Weight of a color-clear shape (a line of five).
pub const COLOR_CLEAR_WEIGHT: u32 = 130;
/// Weight of an area shape (a cross).
pub const AREA_WEIGHT: u32 = 60;
/// Weight of a line-clear shape (a line of four).
pub const LINE_WEIGHT: u32 = 40;
/// Weight of a 2x2 square.
pub const UFO_WEIGHT: u32 = 20;

/// The structural pattern a candidate was detected as.
///
/// Variant order is used as the last ranking tie-break.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    Line5,
    Cross,
    Line4Horizontal,
    Line4Vertical,
    Square,
    /// Plain three-or-more line with no special shape.
    Simple3,
}

impl ShapeKind {
    /// Fixed weight of this kind.
    pub const fn weight(self) -> u32 {
        match self {
            ShapeKind::Line5 => COLOR_CLEAR_WEIGHT,
            ShapeKind::Cross => AREA_WEIGHT,
            ShapeKind::Line4Horizontal | ShapeKind::Line4Vertical => LINE_WEIGHT,
            ShapeKind::Square => UFO_WEIGHT,
            ShapeKind::Simple3 => 0,
        }
    }

    /// The bomb a shape of this kind spawns under the identity mapping.
    pub const fn default_bomb(self) -> Option<BombKind> {
        match self {
            ShapeKind::Line5 => Some(BombKind::ColorClear),
            ShapeKind::Cross => Some(BombKind::Area),
            ShapeKind::Line4Horizontal => Some(BombKind::LineHorizontal),
            ShapeKind::Line4Vertical => Some(BombKind::LineVertical),
            ShapeKind::Square => Some(BombKind::Ufo),
            ShapeKind::Simple3 => None,
        }
    }
}

/// The power-up spawned for a resolved shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BombKind {
    LineHorizontal,
    LineVertical,
    Area,
    ColorClear,
    /// Clears a random cell elsewhere on the board.
    Ufo,
}

/// Weight bands, highest priority first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    ColorClear,
    Area,
    Line,
    Lowest,
}

impl Tier {
    /// Buckets a weight into its band.
    pub const fn of_weight(weight: u32) -> Tier {
        if weight >= COLOR_CLEAR_WEIGHT {
            Tier::ColorClear
        } else if weight >= AREA_WEIGHT {
            Tier::Area
        } else if weight >= LINE_WEIGHT {
            Tier::Line
        } else {
            Tier::Lowest
        }
    }
}

/// A detected sub-shape of a component that may become a bomb.
///
/// `cells` is kept sorted row-major and free of duplicates. Only the scrap
/// absorber grows it after detection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub kind: ShapeKind,
    pub cells: Vec<Cell>,
    pub weight: u32,
    /// Shared cell of the two runs of a cross.
    pub intersection: Option<Cell>,
}

impl Candidate {
    /// Creates a candidate weighted by its kind.
    pub fn new(kind: ShapeKind, mut cells: Vec<Cell>) -> Self {
        cells.sort_unstable();
        cells.dedup();
        Self {
            kind,
            cells,
            weight: kind.weight(),
            intersection: None,
        }
    }

    /// Creates a cross candidate centred on `intersection`.
    pub fn cross(cells: Vec<Cell>, intersection: Cell) -> Self {
        Self {
            intersection: Some(intersection),
            ..Self::new(ShapeKind::Cross, cells)
        }
    }

    #[inline]
    pub fn tier(&self) -> Tier {
        Tier::of_weight(self.weight)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.binary_search(&cell).is_ok()
    }

    /// Adds `cell`, keeping the cells sorted. Returns `false` if it was present.
    pub fn insert(&mut self, cell: Cell) -> bool {
        match self.cells.binary_search(&cell) {
            Ok(_) => false,
            Err(position) => {
                self.cells.insert(position, cell);
                true
            }
        }
    }

    /// Whether any cell of this shape is a focus cell.
    pub fn touches(&self, foci: &FxHashSet<Cell>) -> bool {
        !foci.is_empty() && self.cells.iter().any(|cell| foci.contains(cell))
    }

    /// The axis of a line shape, `None` for every other kind.
    ///
    /// A line of five carries no orientation in its kind, so it is read from
    /// the cells.
    pub fn axis(&self) -> Option<Axis> {
        match self.kind {
            ShapeKind::Line4Horizontal => Some(Axis::Horizontal),
            ShapeKind::Line4Vertical => Some(Axis::Vertical),
            ShapeKind::Line5 => {
                let first = self.cells.first()?;
                if self.cells.iter().all(|cell| cell.y == first.y) {
                    Some(Axis::Horizontal)
                } else {
                    Some(Axis::Vertical)
                }
            }
            _ => None,
        }
    }
}
