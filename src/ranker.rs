//! Total order over candidates.
//!
//! Heavier shapes first, then shapes touching a focus cell, then larger
//! shapes. The remaining keys only make the order total so output is stable.

use std::cmp::Ordering;

use rustc_hash::FxHashSet;

use crate::shapes::{Candidate, Cell};

/// Compares two candidates; `Less` means `a` ranks ahead of `b`.
pub fn compare(a: &Candidate, b: &Candidate, foci: &FxHashSet<Cell>) -> Ordering {
    b.weight
        .cmp(&a.weight)
        .then_with(|| b.touches(foci).cmp(&a.touches(foci)))
        .then_with(|| b.len().cmp(&a.len()))
        .then_with(|| a.cells.cmp(&b.cells))
        .then_with(|| a.kind.cmp(&b.kind))
}

/// Sorts `candidates` best first.
pub fn rank(candidates: &mut [Candidate], foci: &FxHashSet<Cell>) {
    candidates.sort_by(|a, b| compare(a, b, foci));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeKind;

    fn row(kind: ShapeKind, x0: i32, len: i32) -> Candidate {
        Candidate::new(kind, (x0..x0 + len).map(|x| Cell::new(x, 0)).collect())
    }

    #[test]
    fn test_weight_dominates() {
        let mut candidates = vec![
            Candidate::new(
                ShapeKind::Square,
                vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(0, 1), Cell::new(1, 1)],
            ),
            row(ShapeKind::Line4Horizontal, 0, 4),
            row(ShapeKind::Line5, 0, 5),
        ];
        rank(&mut candidates, &FxHashSet::default());
        let kinds: Vec<ShapeKind> = candidates.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ShapeKind::Line5, ShapeKind::Line4Horizontal, ShapeKind::Square]
        );
    }

    #[test]
    fn test_focus_breaks_weight_ties() {
        let mut candidates = vec![row(ShapeKind::Line5, 0, 5), row(ShapeKind::Line5, 3, 5)];
        let foci: FxHashSet<Cell> = [Cell::new(7, 0)].into_iter().collect();
        rank(&mut candidates, &foci);
        assert_eq!(candidates[0].cells[0], Cell::new(3, 0), "Focused run should rank first");

        rank(&mut candidates, &FxHashSet::default());
        assert_eq!(candidates[0].cells[0], Cell::new(0, 0), "Without foci the leftmost run wins");
    }

    #[test]
    fn test_size_breaks_remaining_ties() {
        let small = Candidate::cross(
            vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0), Cell::new(0, 1), Cell::new(0, 2)],
            Cell::new(0, 0),
        );
        let mut large = small.clone();
        large.insert(Cell::new(3, 0));
        let mut candidates = vec![small, large];
        rank(&mut candidates, &FxHashSet::default());
        assert_eq!(candidates[0].len(), 6);
    }

    #[test]
    fn test_order_is_total() {
        let a = row(ShapeKind::Line4Horizontal, 0, 4);
        let b = row(ShapeKind::Line4Horizontal, 1, 4);
        let foci = FxHashSet::default();
        assert_eq!(compare(&a, &b, &foci), Ordering::Less);
        assert_eq!(compare(&b, &a, &foci), Ordering::Greater);
        assert_eq!(compare(&a, &a, &foci), Ordering::Equal);
    }
}
