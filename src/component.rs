//! The validated input cell set.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::shapes::Cell;

/// Largest absolute coordinate accepted, leaving headroom for neighbour arithmetic.
pub const MAX_COORDINATE: i32 = 1 << 24;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComponentError {
    #[error("Duplicate cell {0} in component")]
    Duplicate(Cell),

    #[error("Cell {0} is outside the supported range of ±{MAX_COORDINATE}")]
    OutOfRange(Cell),
}

/// A set of unique same-colored cells forming one connected match region.
///
/// Connectivity and color are the caller's guarantee; only uniqueness and
/// coordinate range are checked here.
#[derive(Clone, Debug, Default)]
pub struct Component {
    /// Row-major sorted cells.
    cells: Vec<Cell>,
    members: FxHashSet<Cell>,
}

impl Component {
    /// Builds a component, rejecting duplicates and out-of-range coordinates.
    pub fn new<I: IntoIterator<Item = Cell>>(cells: I) -> Result<Self, ComponentError> {
        let mut members = FxHashSet::default();
        let mut sorted = Vec::new();

        for cell in cells {
            let limit = MAX_COORDINATE.unsigned_abs();
            if cell.x.unsigned_abs() > limit || cell.y.unsigned_abs() > limit {
                return Err(ComponentError::OutOfRange(cell));
            }
            if !members.insert(cell) {
                return Err(ComponentError::Duplicate(cell));
            }
            sorted.push(cell);
        }

        sorted.sort_unstable();
        Ok(Self {
            cells: sorted,
            members,
        })
    }

    /// Cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn members(&self) -> &FxHashSet<Cell> {
        &self.members
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        self.members.contains(&cell)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_sorts_cells() {
        let component =
            Component::new([Cell::new(1, 1), Cell::new(5, 0), Cell::new(0, 1)]).unwrap();
        assert_eq!(
            component.cells(),
            &[Cell::new(5, 0), Cell::new(0, 1), Cell::new(1, 1)]
        );
        assert!(component.contains(Cell::new(5, 0)));
        assert!(!component.contains(Cell::new(4, 0)));
    }

    #[test]
    fn test_component_rejects_duplicates() {
        let result = Component::new([Cell::new(0, 0), Cell::new(1, 0), Cell::new(0, 0)]);
        assert_eq!(result.unwrap_err(), ComponentError::Duplicate(Cell::new(0, 0)));
    }

    #[test]
    fn test_component_rejects_out_of_range() {
        let far = Cell::new(i32::MAX, 0);
        let result = Component::new([far]);
        assert_eq!(result.unwrap_err(), ComponentError::OutOfRange(far));
        assert!(Component::new([Cell::new(-MAX_COORDINATE, MAX_COORDINATE)]).is_ok());
    }

    #[test]
    fn test_empty_component() {
        let component = Component::new(Vec::new()).unwrap();
        assert!(component.is_empty());
        assert_eq!(component.len(), 0);
    }
}
