//! Candidate shape detection.
//!
//! Scans a component for lines of four and five, 2x2 squares, and crosses
//! formed where a row run meets a column run.

use tracing::debug;

use crate::arena::ScratchArena;
use crate::component::Component;
use crate::geometry::{maximal_runs, Axis, Run, MIN_RUN};
use crate::shapes::{Candidate, Cell, ShapeKind};

/// Length of a line-clear window.
const LINE4_LEN: usize = 4;
/// Length of a color-clear window.
const LINE5_LEN: usize = 5;
/// Smallest cross: two runs of three sharing one cell.
const MIN_CROSS_LEN: usize = 5;

/// Finds weighted candidate shapes in a component.
pub trait ShapeDetector {
    /// Appends every candidate found in `component` to `out`.
    fn detect(&self, component: &Component, arena: &ScratchArena, out: &mut Vec<Candidate>);
}

/// Lines, squares and crosses on the orthogonal grid.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardDetector;

impl ShapeDetector for StandardDetector {
    fn detect(&self, component: &Component, arena: &ScratchArena, out: &mut Vec<Candidate>) {
        if component.len() < MIN_RUN {
            return;
        }

        let mut rows = arena.acquire::<Vec<Run>>();
        let mut columns = arena.acquire::<Vec<Run>>();
        maximal_runs(component.members(), component.cells(), Axis::Horizontal, MIN_RUN, &mut rows);
        maximal_runs(component.members(), component.cells(), Axis::Vertical, MIN_RUN, &mut columns);

        let before = out.len();
        for run in rows.iter().chain(columns.iter()) {
            push_line_windows(run, out);
        }
        let lines = out.len() - before;

        push_squares(component, out);
        let squares = out.len() - before - lines;

        push_crosses(&rows, &columns, out);
        let crosses = out.len() - before - lines - squares;

        debug!(
            cells = component.len(),
            rows = rows.len(),
            columns = columns.len(),
            lines,
            squares,
            crosses,
            "detected candidates"
        );
    }
}

/// Emits a line of four at every offset with four cells left in the run, and
/// a line of five at every offset with five left.
fn push_line_windows(run: &Run, out: &mut Vec<Candidate>) {
    let line4 = match run.axis {
        Axis::Horizontal => ShapeKind::Line4Horizontal,
        Axis::Vertical => ShapeKind::Line4Vertical,
    };

    for offset in 0..run.len {
        let remaining = run.len - offset;
        if remaining >= LINE5_LEN {
            out.push(Candidate::new(ShapeKind::Line5, run.window(offset, LINE5_LEN).collect()));
        }
        if remaining >= LINE4_LEN {
            out.push(Candidate::new(line4, run.window(offset, LINE4_LEN).collect()));
        }
    }
}

/// Emits every 2x2 block whose four cells are all in the component.
fn push_squares(component: &Component, out: &mut Vec<Candidate>) {
    for &corner in component.cells() {
        let block = [
            corner,
            corner.offset(1, 0),
            corner.offset(0, 1),
            corner.offset(1, 1),
        ];
        if block.iter().all(|&cell| component.contains(cell)) {
            out.push(Candidate::new(ShapeKind::Square, block.to_vec()));
        }
    }
}

/// Emits the union of every row run and column run that share a cell.
fn push_crosses(rows: &[Run], columns: &[Run], out: &mut Vec<Candidate>) {
    for row in rows {
        for column in columns {
            let shared = Cell::new(column.start.x, row.start.y);
            if !row.contains(shared) || !column.contains(shared) {
                continue;
            }

            let cells: Vec<Cell> = row
                .cells()
                .chain(column.cells().filter(|&cell| cell != shared))
                .collect();
            if cells.len() >= MIN_CROSS_LEN {
                out.push(Candidate::cross(cells, shared));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::parse_rows;

    fn detect(rows: &[&str]) -> Vec<Candidate> {
        let pattern = parse_rows(rows).unwrap();
        let arena = ScratchArena::new();
        let mut out = Vec::new();
        StandardDetector.detect(&pattern.component, &arena, &mut out);
        assert_eq!(arena.outstanding(), 0);
        out
    }

    fn count(candidates: &[Candidate], kind: ShapeKind) -> usize {
        candidates.iter().filter(|c| c.kind == kind).count()
    }

    #[test]
    fn test_three_in_a_row_is_not_a_candidate() {
        assert!(detect(&["###"]).is_empty());
    }

    #[test]
    fn test_small_component_short_circuits() {
        assert!(detect(&["##"]).is_empty());
    }

    #[test]
    fn test_line_of_four() {
        let candidates = detect(&["####"]);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].kind, ShapeKind::Line4Horizontal);
        assert_eq!(candidates[0].len(), 4);

        let column = detect(&["#", "#", "#", "#"]);
        assert_eq!(column.len(), 1);
        assert_eq!(column[0].kind, ShapeKind::Line4Vertical);
    }

    #[test]
    fn test_line_of_five_emits_overlapping_windows() {
        let candidates = detect(&["#####"]);
        assert_eq!(count(&candidates, ShapeKind::Line5), 1);
        assert_eq!(count(&candidates, ShapeKind::Line4Horizontal), 2);
    }

    #[test]
    fn test_line_of_seven_windows() {
        let candidates = detect(&["#######"]);
        assert_eq!(count(&candidates, ShapeKind::Line5), 3);
        assert_eq!(count(&candidates, ShapeKind::Line4Horizontal), 4);
        assert!(candidates.iter().all(|c| c.len() == 4 || c.len() == 5));
    }

    #[test]
    fn test_squares() {
        let candidates = detect(&["###", "###"]);
        assert_eq!(count(&candidates, ShapeKind::Square), 2);
        assert!(candidates
            .iter()
            .filter(|c| c.kind == ShapeKind::Square)
            .all(|c| c.len() == 4));
    }

    #[test]
    fn test_plus_is_a_cross() {
        let candidates = detect(&[".#.", "###", ".#."]);
        assert_eq!(candidates.len(), 1);
        let cross = &candidates[0];
        assert_eq!(cross.kind, ShapeKind::Cross);
        assert_eq!(cross.len(), 5);
        assert_eq!(cross.intersection, Some(Cell::new(1, 1)));
    }

    #[test]
    fn test_l_and_t_are_crosses() {
        let l_shape = detect(&["#..", "#..", "###"]);
        assert_eq!(count(&l_shape, ShapeKind::Cross), 1);
        assert_eq!(l_shape[0].intersection, Some(Cell::new(0, 2)));

        let t_shape = detect(&["###", ".#.", ".#."]);
        assert_eq!(count(&t_shape, ShapeKind::Cross), 1);
        assert_eq!(t_shape[0].intersection, Some(Cell::new(1, 0)));
    }

    #[test]
    fn test_cross_spans_whole_runs() {
        let candidates = detect(&["####", "#...", "#..."]);
        let cross = candidates
            .iter()
            .find(|c| c.kind == ShapeKind::Cross)
            .unwrap();
        assert_eq!(cross.len(), 6);
        assert_eq!(count(&candidates, ShapeKind::Line4Horizontal), 1);
    }

    #[test]
    fn test_diagonal_cells_yield_nothing() {
        assert!(detect(&["#..", ".#.", "..#"]).is_empty());
    }
}
