//! Tuning knobs for the resolution pipeline.

/// Largest tier group solved by exact search.
pub const DEFAULT_EXACT_LIMIT: usize = 25;
/// Upper bound on local-search improvement rounds.
pub const DEFAULT_LOCAL_SEARCH_ROUNDS: usize = 4;

/// Read-only settings shared by every call of a [`crate::Generator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Tier groups with at most this many candidates are solved exactly;
    /// larger ones are filled greedily. Values above
    /// [`crate::solver::MAX_EXACT_LIMIT`] are clamped.
    pub exact_limit: usize,
    /// Zero disables local search.
    pub local_search_rounds: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            exact_limit: DEFAULT_EXACT_LIMIT,
            local_search_rounds: DEFAULT_LOCAL_SEARCH_ROUNDS,
        }
    }
}
