//! Special Combination Resolver
//!
//! Decides which parts of a matched same-colored region turn into bombs.
//! Candidate shapes are detected, ranked, packed into a maximum-weight
//! disjoint selection, grown with the leftover cells they accept, and turned
//! into match groups.

pub mod absorber;
pub mod arena;
pub mod component;
pub mod config;
pub mod detector;
pub mod geometry;
pub mod grid;
pub mod pattern;
pub mod ranker;
pub mod result;
pub mod shapes;
pub mod solver;

use rand::RngCore;
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use arena::ScratchArena;
use component::Component;
use config::GeneratorConfig;
use detector::{ShapeDetector, StandardDetector};
use grid::{CellIndex, MASK_CAPACITY};
use result::{
    fallback_group, BombTypeSelector, Constructor, FocusFirstPlacement, KindSelector, MatchGroup,
    OriginPlacement,
};
use shapes::{Candidate, Cell};
use solver::{PartitionSolver, TieredSolver};

/// The resolution pipeline with its pluggable policies.
///
/// Holds no per-call state, so one generator can serve many threads as long
/// as each brings its own [`ScratchArena`].
pub struct Generator {
    detector: Box<dyn ShapeDetector + Send + Sync>,
    solver: Box<dyn PartitionSolver + Send + Sync>,
    selector: Box<dyn BombTypeSelector + Send + Sync>,
    placement: Box<dyn OriginPlacement + Send + Sync>,
}

/// Every intermediate result of one call, for inspection.
#[derive(Clone, Debug, Default)]
pub struct Resolution {
    /// Ranked best first; winners include the cells they absorbed.
    pub candidates: Vec<Candidate>,
    /// Indices into `candidates`, ascending.
    pub winners: Vec<usize>,
    pub groups: Vec<MatchGroup>,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(&GeneratorConfig::default())
    }
}

impl Generator {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            detector: Box::new(StandardDetector),
            solver: Box::new(TieredSolver::from(config)),
            selector: Box::new(KindSelector),
            placement: Box::new(FocusFirstPlacement),
        }
    }

    pub fn with_detector(mut self, detector: impl ShapeDetector + Send + Sync + 'static) -> Self {
        self.detector = Box::new(detector);
        self
    }

    pub fn with_solver(mut self, solver: impl PartitionSolver + Send + Sync + 'static) -> Self {
        self.solver = Box::new(solver);
        self
    }

    pub fn with_selector(mut self, selector: impl BombTypeSelector + Send + Sync + 'static) -> Self {
        self.selector = Box::new(selector);
        self
    }

    pub fn with_placement(mut self, placement: impl OriginPlacement + Send + Sync + 'static) -> Self {
        self.placement = Box::new(placement);
        self
    }

    /// Resolves `component` into match groups.
    ///
    /// `foci` are the cells the triggering action touched; they break ranking
    /// ties and attract bomb origins. `rng` is only consulted by the policies
    /// when nothing deterministic decides.
    pub fn generate(
        &self,
        component: &Component,
        foci: &[Cell],
        rng: Option<&mut dyn RngCore>,
        arena: &ScratchArena,
    ) -> Vec<MatchGroup> {
        let mut candidates = arena.acquire::<Vec<Candidate>>();
        let mut winners = arena.acquire::<Vec<usize>>();
        self.run(component, foci, rng, arena, &mut candidates, &mut winners)
    }

    /// Like [`Generator::generate`], but also returns the ranked candidates
    /// and the solver's choice.
    pub fn resolve(
        &self,
        component: &Component,
        foci: &[Cell],
        rng: Option<&mut dyn RngCore>,
        arena: &ScratchArena,
    ) -> Resolution {
        let mut candidates = Vec::new();
        let mut winners = Vec::new();
        let groups = self.run(component, foci, rng, arena, &mut candidates, &mut winners);
        Resolution {
            candidates,
            winners,
            groups,
        }
    }

    fn run(
        &self,
        component: &Component,
        foci: &[Cell],
        rng: Option<&mut dyn RngCore>,
        arena: &ScratchArena,
        candidates: &mut Vec<Candidate>,
        winners: &mut Vec<usize>,
    ) -> Vec<MatchGroup> {
        candidates.clear();
        winners.clear();
        if component.len() < geometry::MIN_RUN {
            return Vec::new();
        }

        self.detector.detect(component, arena, candidates);
        if candidates.is_empty() {
            return fallback_group(component, arena).into_iter().collect();
        }

        let mut focus_set = arena.acquire::<FxHashSet<Cell>>();
        focus_set.extend(foci.iter().copied());
        ranker::rank(candidates, &focus_set);

        let mut index = arena.acquire::<CellIndex>();
        index.assign(component.cells());
        if index.overflow() > 0 {
            warn!(
                cells = component.len(),
                capacity = MASK_CAPACITY,
                unindexed = index.overflow(),
                "component exceeds the mask capacity, excess shapes are placed greedily"
            );
        }

        self.solver.solve(candidates, &index, arena, winners);
        let absorbed = absorber::absorb(component, candidates, winners, arena);

        let constructor = Constructor {
            selector: &*self.selector,
            placement: &*self.placement,
        };
        let groups = constructor.build(component, candidates, winners, foci, rng, arena);

        debug!(
            cells = component.len(),
            candidates = candidates.len(),
            winners = winners.len(),
            absorbed,
            groups = groups.len(),
            "resolved component"
        );
        groups
    }
}

/// Resolves `component` with the default policies and a fresh arena.
pub fn generate(component: &Component, foci: &[Cell], rng: Option<&mut dyn RngCore>) -> Vec<MatchGroup> {
    Generator::default().generate(component, foci, rng, &ScratchArena::new())
}
