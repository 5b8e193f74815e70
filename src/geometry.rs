//! Grid adjacency and straight-run scanning.
//!
//! Matches are orthogonal only: a cell has four neighbours, and a line is a
//! run of consecutive cells along one row or one column.

use rustc_hash::FxHashSet;

use crate::shapes::Cell;

/// Shortest run that counts as a match.
pub const MIN_RUN: usize = 3;

/// The four orthogonal neighbour functions: right, left, down, up.
pub const NEIGHBORS: [fn(Cell) -> Cell; 4] = [
    |cell| cell.offset(1, 0),
    |cell| cell.offset(-1, 0),
    |cell| cell.offset(0, 1),
    |cell| cell.offset(0, -1),
];

/// Iterates the orthogonal neighbours of `cell`.
#[inline]
pub fn neighbors(cell: Cell) -> impl Iterator<Item = Cell> {
    NEIGHBORS.into_iter().map(move |step| step(cell))
}

/// Direction of a row (`Horizontal`) or a column (`Vertical`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub const BOTH: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

    /// Unit step `(dx, dy)` along the axis.
    #[inline(always)]
    pub const fn step(self) -> (i32, i32) {
        match self {
            Axis::Horizontal => (1, 0),
            Axis::Vertical => (0, 1),
        }
    }

    /// The row (for horizontal) or column (for vertical) a cell lies on.
    #[inline(always)]
    pub const fn lane(self, cell: Cell) -> i32 {
        match self {
            Axis::Horizontal => cell.y,
            Axis::Vertical => cell.x,
        }
    }

    /// Position of a cell along its lane.
    #[inline(always)]
    pub const fn position(self, cell: Cell) -> i32 {
        match self {
            Axis::Horizontal => cell.x,
            Axis::Vertical => cell.y,
        }
    }

    #[inline(always)]
    pub const fn advance(self, cell: Cell, distance: i32) -> Cell {
        let (dx, dy) = self.step();
        cell.offset(dx * distance, dy * distance)
    }
}

/// A maximal run of consecutive member cells along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Run {
    pub axis: Axis,
    /// Lowest cell of the run (leftmost or topmost).
    pub start: Cell,
    pub len: usize,
}

impl Run {
    /// Cells `offset..offset + len` of the run.
    pub fn window(&self, offset: usize, len: usize) -> impl Iterator<Item = Cell> + '_ {
        (offset..offset + len).map(move |i| self.axis.advance(self.start, i as i32))
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.window(0, self.len)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        let along = self.axis.position(cell) - self.axis.position(self.start);
        self.axis.lane(cell) == self.axis.lane(self.start)
            && along >= 0
            && (along as usize) < self.len
    }
}

/// Appends every maximal run of at least `min_len` members along `axis`.
///
/// `cells` must list the members in row-major order; runs come out in the
/// order of their start cells.
pub fn maximal_runs(
    members: &FxHashSet<Cell>,
    cells: &[Cell],
    axis: Axis,
    min_len: usize,
    out: &mut Vec<Run>,
) {
    for &start in cells {
        // only walk from the first cell of a run
        if members.contains(&axis.advance(start, -1)) {
            continue;
        }

        let mut len = 1;
        while members.contains(&axis.advance(start, len as i32)) {
            len += 1;
        }

        if len >= min_len {
            out.push(Run { axis, start, len });
        }
    }
}

/// Collects the members that lie on some run of at least [`MIN_RUN`] cells.
///
/// Stray cells attached to a match without completing a line of their own are
/// left out. `out` receives the cells sorted row-major without duplicates;
/// `runs` is working storage.
pub fn line_cells(
    members: &FxHashSet<Cell>,
    cells: &[Cell],
    runs: &mut Vec<Run>,
    out: &mut Vec<Cell>,
) {
    runs.clear();
    for axis in Axis::BOTH {
        maximal_runs(members, cells, axis, MIN_RUN, runs);
    }

    out.clear();
    for run in runs.iter() {
        out.extend(run.cells());
    }
    out.sort_unstable();
    out.dedup();
}
