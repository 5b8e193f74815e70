//! Tiered partition solver.
//!
//! Picks a pairwise-disjoint subset of the ranked candidates with maximum
//! weight, one tier group at a time:
//! - Cell sets are fixed-width bitmasks, so overlap is a word-wise AND
//! - Small tier groups are solved exactly by branch-and-bound over an explicit stack
//! - Large groups, the lowest tier, and shapes past the mask capacity fall back to greedy
//! - A bounded local search tries single-shape swaps within each group before
//!   the next group is solved, so cells it frees stay open to lower tiers

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::arena::{Lease, ScratchArena};
use crate::config::{GeneratorConfig, DEFAULT_EXACT_LIMIT, DEFAULT_LOCAL_SEARCH_ROUNDS};
use crate::grid::{CellIndex, CellMask, Footprint};
use crate::shapes::{Candidate, Cell, Tier};

/// Largest group the exact search accepts; chosen sets are tracked in a `u32`.
pub const MAX_EXACT_LIMIT: usize = 32;

/// Tier groups in solve order. Area and line shapes compete for the same
/// cells, so they are solved together.
const TIER_GROUPS: [&[Tier]; 3] = [&[Tier::ColorClear], &[Tier::Area, Tier::Line], &[Tier::Lowest]];

/// Selects mutually disjoint candidates.
pub trait PartitionSolver {
    /// Writes the indices of the chosen `candidates` into `winners`, ascending.
    ///
    /// `candidates` arrive ranked best first.
    fn solve(
        &self,
        candidates: &[Candidate],
        index: &CellIndex,
        arena: &ScratchArena,
        winners: &mut Vec<usize>,
    );
}

/// Exact-where-small, greedy-where-large solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TieredSolver {
    /// Largest tier group solved exactly; clamped to [`MAX_EXACT_LIMIT`].
    pub exact_limit: usize,
    /// Upper bound on local-search rounds.
    pub local_search_rounds: usize,
}

impl Default for TieredSolver {
    fn default() -> Self {
        Self {
            exact_limit: DEFAULT_EXACT_LIMIT,
            local_search_rounds: DEFAULT_LOCAL_SEARCH_ROUNDS,
        }
    }
}

impl From<&GeneratorConfig> for TieredSolver {
    fn from(config: &GeneratorConfig) -> Self {
        Self {
            exact_limit: config.exact_limit,
            local_search_rounds: config.local_search_rounds,
        }
    }
}

/// Position of a tier in [`TIER_GROUPS`].
fn group_of(tier: Tier) -> usize {
    TIER_GROUPS
        .iter()
        .position(|group| group.contains(&tier))
        .unwrap_or(TIER_GROUPS.len() - 1)
}

/// Cells claimed by the selection so far.
struct Occupancy<'a> {
    mask: CellMask,
    overflow: Lease<'a, FxHashSet<Cell>>,
}

impl<'a> Occupancy<'a> {
    fn new(arena: &'a ScratchArena) -> Self {
        Self {
            mask: CellMask::EMPTY,
            overflow: arena.acquire(),
        }
    }

    fn conflicts(&self, footprint: &Footprint) -> bool {
        self.mask.overlaps(&footprint.mask)
            || footprint
                .overflow
                .iter()
                .any(|cell| self.overflow.contains(cell))
    }

    fn claim(&mut self, footprint: &Footprint) {
        self.mask = self.mask.union(&footprint.mask);
        self.overflow.extend(footprint.overflow.iter().copied());
    }

    fn release(&mut self, footprint: &Footprint) {
        self.mask = self.mask.difference(&footprint.mask);
        for cell in &footprint.overflow {
            self.overflow.remove(cell);
        }
    }
}

/// Working state shared by the solve phases.
struct Selection<'a> {
    candidates: &'a [Candidate],
    footprints: &'a [Footprint],
    occupancy: Occupancy<'a>,
    selected: Lease<'a, Vec<bool>>,
}

impl Selection<'_> {
    fn take(&mut self, i: usize) {
        self.occupancy.claim(&self.footprints[i]);
        self.selected[i] = true;
    }

    /// Takes each candidate in `order` that still fits.
    fn take_greedily(&mut self, order: &[usize]) -> usize {
        let mut taken = 0;
        for &i in order {
            if !self.selected[i] && !self.occupancy.conflicts(&self.footprints[i]) {
                self.take(i);
                taken += 1;
            }
        }
        taken
    }
}

/// One node of the include/exclude search tree.
#[derive(Clone, Copy)]
struct SearchNode {
    /// Index into the pool of the next candidate to decide.
    depth: usize,
    /// Cells covered by the candidates included so far.
    occupied: CellMask,
    /// Summed weight of the included candidates.
    score: u32,
    /// Bit `i` set = pool entry `i` included.
    chosen: u32,
}

/// Finds the heaviest disjoint subset of `pool` by branch-and-bound.
///
/// Uses an explicit stack; the include branch is explored first, so among
/// equally heavy subsets the one favouring earlier-ranked entries wins.
/// Returns the chosen pool positions as a bitmask.
fn branch_and_bound(
    pool: &[usize],
    candidates: &[Candidate],
    footprints: &[Footprint],
    arena: &ScratchArena,
) -> u32 {
    // suffix[i] = total weight of pool[i..], the best any subtree can still add
    let mut suffix = arena.acquire::<Vec<u32>>();
    suffix.resize(pool.len() + 1, 0);
    for position in (0..pool.len()).rev() {
        suffix[position] = suffix[position + 1] + candidates[pool[position]].weight;
    }

    let mut best_score = 0;
    let mut best_chosen = 0u32;
    let mut visited = 0usize;

    let mut stack = arena.acquire::<Vec<SearchNode>>();
    stack.push(SearchNode {
        depth: 0,
        occupied: CellMask::EMPTY,
        score: 0,
        chosen: 0,
    });

    while let Some(node) = stack.pop() {
        visited += 1;
        if node.score > best_score {
            best_score = node.score;
            best_chosen = node.chosen;
        }

        if node.depth == pool.len() {
            continue;
        }

        // prune: even taking everything left cannot beat the incumbent
        if node.score + suffix[node.depth] <= best_score {
            continue;
        }

        let candidate = pool[node.depth];
        let footprint = &footprints[candidate];

        // exclude is pushed first so include is popped first
        stack.push(SearchNode {
            depth: node.depth + 1,
            ..node
        });
        if !node.occupied.overlaps(&footprint.mask) {
            stack.push(SearchNode {
                depth: node.depth + 1,
                occupied: node.occupied.union(&footprint.mask),
                score: node.score + candidates[candidate].weight,
                chosen: node.chosen | (1 << node.depth),
            });
        }
    }

    trace!(pool = pool.len(), visited, best_score, "exact search finished");
    best_chosen
}

impl TieredSolver {
    /// Solves one tier group against the cells already claimed.
    fn solve_group(&self, group: usize, selection: &mut Selection<'_>, arena: &ScratchArena) {
        let tiers = TIER_GROUPS[group];
        let mut exact = arena.acquire::<Vec<usize>>();
        let mut overflowing = arena.acquire::<Vec<usize>>();

        for (i, candidate) in selection.candidates.iter().enumerate() {
            if !tiers.contains(&candidate.tier())
                || selection.occupancy.conflicts(&selection.footprints[i])
            {
                continue;
            }
            if selection.footprints[i].is_exact() {
                exact.push(i);
            } else {
                overflowing.push(i);
            }
        }

        if exact.is_empty() && overflowing.is_empty() {
            return;
        }

        let is_lowest = group == TIER_GROUPS.len() - 1;
        let limit = self.exact_limit.min(MAX_EXACT_LIMIT);

        if exact.is_empty() {
            trace!(group, "only shapes past the mask capacity remain");
        } else if is_lowest {
            // ranked order, one pass
            let taken = selection.take_greedily(&exact);
            debug!(group, pool = exact.len(), taken, "lowest tier filled greedily");
        } else if exact.len() <= limit {
            let chosen = branch_and_bound(&exact, selection.candidates, selection.footprints, arena);
            for (position, &i) in exact.iter().enumerate() {
                if chosen & (1 << position) != 0 {
                    selection.take(i);
                }
            }
            debug!(group, pool = exact.len(), taken = chosen.count_ones(), "tier solved exactly");
        } else {
            // heavier first, then the smaller footprint to block fewer cells
            let candidates = selection.candidates;
            exact.sort_by(|&a, &b| {
                candidates[b]
                    .weight
                    .cmp(&candidates[a].weight)
                    .then_with(|| candidates[a].len().cmp(&candidates[b].len()))
            });
            let taken = selection.take_greedily(&exact);
            debug!(group, pool = exact.len(), taken, "tier too large for exact search, solved greedily");
        }

        if !overflowing.is_empty() {
            let taken = selection.take_greedily(&overflowing);
            debug!(
                group,
                pool = overflowing.len(),
                taken,
                "shapes past the mask capacity admitted greedily"
            );
        }
    }

    /// Tries to replace one selected shape of `group` with several excluded
    /// shapes of the same group that together weigh more.
    fn local_search(&self, group: usize, selection: &mut Selection<'_>, arena: &ScratchArena) {
        let candidates = selection.candidates;
        let footprints = selection.footprints;

        for round in 0..self.local_search_rounds {
            let mut swaps = 0;

            for removed in 0..candidates.len() {
                if !selection.selected[removed] || group_of(candidates[removed].tier()) != group {
                    continue;
                }
                let removed_footprint = &footprints[removed];
                selection.occupancy.release(removed_footprint);

                let mut refill = arena.acquire::<Vec<usize>>();
                let mut gained = 0;
                for (other, candidate) in candidates.iter().enumerate() {
                    if other == removed
                        || selection.selected[other]
                        || group_of(candidate.tier()) != group
                    {
                        continue;
                    }
                    let footprint = &footprints[other];
                    if footprint.overlaps(removed_footprint)
                        && !selection.occupancy.conflicts(footprint)
                    {
                        selection.occupancy.claim(footprint);
                        refill.push(other);
                        gained += candidate.weight;
                    }
                }

                if gained > candidates[removed].weight {
                    selection.selected[removed] = false;
                    for &other in refill.iter() {
                        selection.selected[other] = true;
                    }
                    swaps += 1;
                    trace!(round, removed, replacements = refill.len(), gained, "local search swap");
                } else {
                    for &other in refill.iter() {
                        selection.occupancy.release(&footprints[other]);
                    }
                    selection.occupancy.claim(removed_footprint);
                }
            }

            if swaps == 0 {
                break;
            }
            debug!(group, round, swaps, "local search improved the selection");
        }
    }
}

impl PartitionSolver for TieredSolver {
    fn solve(
        &self,
        candidates: &[Candidate],
        index: &CellIndex,
        arena: &ScratchArena,
        winners: &mut Vec<usize>,
    ) {
        winners.clear();
        if candidates.is_empty() {
            return;
        }

        let mut footprints = arena.acquire::<Vec<Footprint>>();
        footprints.extend(candidates.iter().map(|candidate| index.footprint(&candidate.cells)));

        let mut selected = arena.acquire::<Vec<bool>>();
        selected.resize(candidates.len(), false);

        let mut selection = Selection {
            candidates,
            footprints: &footprints,
            occupancy: Occupancy::new(arena),
            selected,
        };

        for group in 0..TIER_GROUPS.len() {
            self.solve_group(group, &mut selection, arena);
            self.local_search(group, &mut selection, arena);
        }
        debug!(
            winners = selection.selected.iter().filter(|&&chosen| chosen).count(),
            covered = selection.occupancy.mask.count(),
            "partition solved"
        );

        winners.extend(
            selection
                .selected
                .iter()
                .enumerate()
                .filter_map(|(i, &chosen)| chosen.then_some(i)),
        );
    }
}
