//! Output match groups and the policies that finish them.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::arena::ScratchArena;
use crate::component::Component;
use crate::geometry::{line_cells, Run, MIN_RUN};
use crate::shapes::{BombKind, Candidate, Cell, ShapeKind};

/// One set of cells to clear, and the bomb it leaves behind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchGroup {
    /// Sorted row-major.
    pub cells: Vec<Cell>,
    pub shape: ShapeKind,
    /// `None` for plain matches.
    pub bomb: Option<BombKind>,
    /// Where the bomb spawns. `None` exactly when `bomb` is.
    pub origin: Option<Cell>,
    /// Colour tag, filled in by the caller.
    pub color: Option<u8>,
}

impl MatchGroup {
    /// A plain three-or-more match with no bomb.
    pub fn simple(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            shape: ShapeKind::Simple3,
            bomb: None,
            origin: None,
            color: None,
        }
    }

    pub fn with_color(mut self, color: u8) -> Self {
        self.color = Some(color);
        self
    }

    pub fn weight(&self) -> u32 {
        self.shape.weight()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Reborrows an optional random source for a single call.
pub(crate) fn reborrow<'a>(rng: &'a mut Option<&mut dyn RngCore>) -> Option<&'a mut dyn RngCore> {
    match rng {
        Some(rng) => {
            let rng: &mut dyn RngCore = &mut **rng;
            Some(rng)
        }
        None => None,
    }
}

/// Chooses the bomb a resolved shape spawns.
pub trait BombTypeSelector {
    fn select(
        &self,
        shape: &Candidate,
        foci: &[Cell],
        rng: Option<&mut dyn RngCore>,
    ) -> Option<BombKind>;
}

/// The bomb fixed by the shape kind at detection time.
#[derive(Clone, Copy, Debug, Default)]
pub struct KindSelector;

impl BombTypeSelector for KindSelector {
    fn select(
        &self,
        shape: &Candidate,
        _foci: &[Cell],
        _rng: Option<&mut dyn RngCore>,
    ) -> Option<BombKind> {
        shape.kind.default_bomb()
    }
}

/// Like [`KindSelector`], but a line of four clears a random direction when a
/// random source is given and no focus cell lies in the line.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomLineSelector;

impl BombTypeSelector for RandomLineSelector {
    fn select(
        &self,
        shape: &Candidate,
        foci: &[Cell],
        rng: Option<&mut dyn RngCore>,
    ) -> Option<BombKind> {
        let focused = foci.iter().any(|&focus| shape.contains(focus));
        match (shape.kind, rng) {
            (ShapeKind::Line4Horizontal | ShapeKind::Line4Vertical, Some(rng)) if !focused => {
                if rng.gen_bool(0.5) {
                    Some(BombKind::LineHorizontal)
                } else {
                    Some(BombKind::LineVertical)
                }
            }
            (kind, _) => kind.default_bomb(),
        }
    }
}

/// Chooses the cell a bomb spawns on.
pub trait OriginPlacement {
    fn place(&self, shape: &Candidate, foci: &[Cell], rng: Option<&mut dyn RngCore>) -> Option<Cell>;
}

/// First focus inside the shape, then the cross centre, then a random cell
/// when a random source is given, then the first cell.
#[derive(Clone, Copy, Debug, Default)]
pub struct FocusFirstPlacement;

impl OriginPlacement for FocusFirstPlacement {
    fn place(&self, shape: &Candidate, foci: &[Cell], rng: Option<&mut dyn RngCore>) -> Option<Cell> {
        if let Some(&focus) = foci.iter().find(|&&focus| shape.contains(focus)) {
            return Some(focus);
        }
        if let Some(center) = shape.intersection {
            return Some(center);
        }
        match rng {
            Some(rng) => shape.cells.choose(rng).copied(),
            None => shape.cells.first().copied(),
        }
    }
}

/// Turns the absorbed winners into match groups.
pub struct Constructor<'a> {
    pub selector: &'a dyn BombTypeSelector,
    pub placement: &'a dyn OriginPlacement,
}

impl Constructor<'_> {
    /// Emits one group per winner in rank order, then one plain group for the
    /// leftover cells that still form a run of three.
    pub fn build(
        &self,
        component: &Component,
        shapes: &[Candidate],
        winners: &[usize],
        foci: &[Cell],
        mut rng: Option<&mut dyn RngCore>,
        arena: &ScratchArena,
    ) -> Vec<MatchGroup> {
        let mut groups = Vec::with_capacity(winners.len() + 1);
        let mut covered = arena.acquire::<FxHashSet<Cell>>();

        for &winner in winners {
            let shape = &shapes[winner];
            covered.extend(shape.cells.iter().copied());

            let bomb = self.selector.select(shape, foci, reborrow(&mut rng));
            let origin = match bomb {
                Some(_) => self.placement.place(shape, foci, reborrow(&mut rng)),
                None => None,
            };
            groups.push(MatchGroup {
                cells: shape.cells.clone(),
                shape: shape.kind,
                bomb,
                origin,
                color: None,
            });
        }

        let mut orphans = arena.acquire::<FxHashSet<Cell>>();
        let mut orphan_cells = arena.acquire::<Vec<Cell>>();
        for &cell in component.cells() {
            if !covered.contains(&cell) {
                orphans.insert(cell);
                orphan_cells.push(cell);
            }
        }

        if orphan_cells.len() >= MIN_RUN {
            if let Some(group) = simple_group(&orphans, &orphan_cells, arena) {
                debug!(cells = group.len(), orphans = orphan_cells.len(), "leftover run kept as a plain match");
                groups.push(group);
            }
        }
        groups
    }
}

/// The plain match for a component with no special shape, if any of its
/// cells line up in threes.
pub fn fallback_group(component: &Component, arena: &ScratchArena) -> Option<MatchGroup> {
    let group = simple_group(component.members(), component.cells(), arena)?;
    debug!(cells = group.len(), component = component.len(), "no special shape, plain match");
    Some(group)
}

fn simple_group(members: &FxHashSet<Cell>, cells: &[Cell], arena: &ScratchArena) -> Option<MatchGroup> {
    let mut runs = arena.acquire::<Vec<Run>>();
    let mut lined = arena.acquire::<Vec<Cell>>();
    line_cells(members, cells, &mut runs, &mut lined);
    if lined.len() < MIN_RUN {
        return None;
    }
    Some(MatchGroup::simple(lined.to_vec()))
}
