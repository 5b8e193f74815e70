//! Scrap absorption.
//!
//! Component cells left uncovered by the winning shapes are offered to an
//! orthogonally adjacent winner whose kind accepts them. Passes repeat until
//! one places nothing, since each absorbed cell can make another scrap adjacent.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::arena::ScratchArena;
use crate::component::Component;
use crate::geometry::{neighbors, Axis};
use crate::shapes::{Candidate, Cell, ShapeKind};

/// Grows the winning `shapes` with the scraps they accept.
///
/// `winners` are indices into `shapes` in rank order. Returns the number of
/// cells absorbed; a second call on the result absorbs nothing.
pub fn absorb(
    component: &Component,
    shapes: &mut [Candidate],
    winners: &[usize],
    arena: &ScratchArena,
) -> usize {
    let mut owners = arena.acquire::<FxHashMap<Cell, usize>>();
    for &winner in winners {
        for &cell in &shapes[winner].cells {
            owners.insert(cell, winner);
        }
    }

    let mut scraps = arena.acquire::<Vec<Cell>>();
    scraps.extend(
        component
            .cells()
            .iter()
            .copied()
            .filter(|cell| !owners.contains_key(cell)),
    );
    if scraps.is_empty() {
        return 0;
    }

    let initial = scraps.len();
    let mut absorbed = 0;
    let mut passes = 0;
    loop {
        passes += 1;
        let mut placed = 0;
        scraps.retain(|&scrap| match best_owner(scrap, shapes, &owners) {
            Some(owner) => {
                shapes[owner].insert(scrap);
                owners.insert(scrap, owner);
                placed += 1;
                false
            }
            None => true,
        });

        absorbed += placed;
        if placed == 0 || scraps.is_empty() {
            break;
        }
    }

    debug!(
        scraps = initial,
        absorbed,
        unplaced = scraps.len(),
        passes,
        "absorbed scraps"
    );
    absorbed
}

/// The heaviest adjacent shape accepting `scrap`; equal weights go to the
/// earlier-ranked shape.
fn best_owner(scrap: Cell, shapes: &[Candidate], owners: &FxHashMap<Cell, usize>) -> Option<usize> {
    let mut best: Option<usize> = None;
    for neighbor in neighbors(scrap) {
        let Some(&owner) = owners.get(&neighbor) else {
            continue;
        };
        if !accepts(&shapes[owner], scrap) {
            continue;
        }
        best = match best {
            Some(current)
                if shapes[current].weight > shapes[owner].weight
                    || (shapes[current].weight == shapes[owner].weight && current <= owner) =>
            {
                Some(current)
            }
            _ => Some(owner),
        };
    }
    best
}

/// Whether `shape` may take `scrap`, given that `scrap` touches it.
fn accepts(shape: &Candidate, scrap: Cell) -> bool {
    match shape.kind {
        ShapeKind::Square => true,
        ShapeKind::Cross => shape
            .intersection
            .is_some_and(|center| reaches_center(shape, scrap, center)),
        ShapeKind::Line4Horizontal | ShapeKind::Line4Vertical | ShapeKind::Line5 => {
            shape.axis().is_some_and(|axis| extends_line(shape, axis, scrap))
        }
        ShapeKind::Simple3 => false,
    }
}

/// `scrap` shares a row or column with `center` and every cell between them
/// is already part of the cross.
fn reaches_center(shape: &Candidate, scrap: Cell, center: Cell) -> bool {
    let axis = if scrap.y == center.y {
        Axis::Horizontal
    } else if scrap.x == center.x {
        Axis::Vertical
    } else {
        return false;
    };

    let distance = axis.position(scrap) - axis.position(center);
    if distance == 0 {
        return false;
    }
    let toward = -distance.signum();
    (1..distance.abs()).all(|step| shape.contains(axis.advance(scrap, step * toward)))
}

/// `scrap` lies on the line's lane directly before or after one of its cells.
fn extends_line(shape: &Candidate, axis: Axis, scrap: Cell) -> bool {
    let Some(&first) = shape.cells.first() else {
        return false;
    };
    axis.lane(scrap) == axis.lane(first)
        && (shape.contains(axis.advance(scrap, -1)) || shape.contains(axis.advance(scrap, 1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(cells: &[(i32, i32)]) -> Component {
        Component::new(cells.iter().map(|&(x, y)| Cell::new(x, y))).unwrap()
    }

    fn row(kind: ShapeKind, x0: i32, y: i32, len: i32) -> Candidate {
        Candidate::new(kind, (x0..x0 + len).map(|x| Cell::new(x, y)).collect())
    }

    #[test]
    fn test_line_extends_along_its_axis() {
        let component = component(&[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0), (5, 0), (6, 0), (4, 1)]);
        let mut shapes = vec![row(ShapeKind::Line5, 0, 0, 5)];
        let arena = ScratchArena::new();

        let absorbed = absorb(&component, &mut shapes, &[0], &arena);
        assert_eq!(absorbed, 2, "Both collinear scraps should join the line");
        assert_eq!(shapes[0].len(), 7);
        assert!(!shapes[0].contains(Cell::new(4, 1)), "Side cells never extend a line");
        assert_eq!(arena.outstanding(), 0);
    }

    #[test]
    fn test_vertical_line_extension() {
        let component = component(&[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)]);
        let mut shapes = vec![Candidate::new(
            ShapeKind::Line4Vertical,
            (0..4).map(|y| Cell::new(0, y)).collect(),
        )];
        assert_eq!(absorb(&component, &mut shapes, &[0], &ScratchArena::new()), 1);
        assert!(shapes[0].contains(Cell::new(0, 4)));
    }

    #[test]
    fn test_square_takes_any_neighbor() {
        let component = component(&[(0, 0), (1, 0), (0, 1), (1, 1), (2, 1), (2, 2)]);
        let mut shapes = vec![Candidate::new(
            ShapeKind::Square,
            vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(0, 1), Cell::new(1, 1)],
        )];
        let absorbed = absorb(&component, &mut shapes, &[0], &ScratchArena::new());
        assert_eq!(absorbed, 2, "Cells chained off the square are pulled in too");
        assert_eq!(shapes[0].len(), 6);
    }

    #[test]
    fn test_cross_requires_continuity_to_center() {
        // plus centred on (2, 2); (4, 2) reaches it, (3, 3) does not
        let component = component(&[(1, 2), (2, 2), (3, 2), (2, 1), (2, 3), (4, 2), (3, 3)]);
        let mut shapes = vec![Candidate::cross(
            vec![Cell::new(1, 2), Cell::new(2, 2), Cell::new(3, 2), Cell::new(2, 1), Cell::new(2, 3)],
            Cell::new(2, 2),
        )];
        let absorbed = absorb(&component, &mut shapes, &[0], &ScratchArena::new());
        assert_eq!(absorbed, 1);
        assert!(shapes[0].contains(Cell::new(4, 2)));
        assert!(!shapes[0].contains(Cell::new(3, 3)));
    }

    #[test]
    fn test_cross_extends_arm_outward() {
        let component = component(&[(0, 0), (1, 0), (2, 0), (0, 1), (0, 2), (3, 0), (4, 0)]);
        let mut shapes = vec![Candidate::cross(
            vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0), Cell::new(0, 1), Cell::new(0, 2)],
            Cell::new(0, 0),
        )];
        assert_eq!(absorb(&component, &mut shapes, &[0], &ScratchArena::new()), 2);
        assert_eq!(shapes[0].len(), 7);
    }

    #[test]
    fn test_heavier_neighbor_wins_contested_scrap() {
        // (5, 0) extends the line of five and also touches the square below it
        let component = component(&[
            (0, 0),
            (1, 0),
            (2, 0),
            (3, 0),
            (4, 0),
            (5, 0),
            (5, 1),
            (6, 1),
            (5, 2),
            (6, 2),
        ]);
        let mut shapes = vec![
            row(ShapeKind::Line5, 0, 0, 5),
            Candidate::new(
                ShapeKind::Square,
                vec![Cell::new(5, 1), Cell::new(6, 1), Cell::new(5, 2), Cell::new(6, 2)],
            ),
        ];
        absorb(&component, &mut shapes, &[0, 1], &ScratchArena::new());
        assert!(shapes[0].contains(Cell::new(5, 0)));
        assert!(!shapes[1].contains(Cell::new(5, 0)));
    }

    #[test]
    fn test_simple_shapes_never_absorb() {
        let component = component(&[(0, 0), (1, 0), (2, 0), (3, 0)]);
        let mut shapes = vec![row(ShapeKind::Simple3, 0, 0, 3)];
        assert_eq!(absorb(&component, &mut shapes, &[0], &ScratchArena::new()), 0);
    }

    #[test]
    fn test_absorption_is_idempotent() {
        let component = component(&[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0), (5, 0), (0, 1), (7, 0)]);
        let mut shapes = vec![row(ShapeKind::Line5, 0, 0, 5)];
        let arena = ScratchArena::new();
        absorb(&component, &mut shapes, &[0], &arena);
        let fixed = shapes.clone();

        assert_eq!(absorb(&component, &mut shapes, &[0], &arena), 0);
        assert_eq!(shapes, fixed);
    }

    #[test]
    fn test_only_winners_absorb() {
        let component = component(&[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)]);
        let mut shapes = vec![row(ShapeKind::Line5, 0, 0, 5), row(ShapeKind::Line4Horizontal, 0, 0, 4)];
        assert_eq!(absorb(&component, &mut shapes, &[1], &ScratchArena::new()), 1);
        assert_eq!(shapes[0].len(), 5);
        assert_eq!(shapes[1].len(), 5);
    }
}
