//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the planner produces identical
//! results given identical configs.
//!
//! # Sources of non-determinism
//!
//! - **Floating-point math**: elapsed time is fixed-point throughout.
//! - **HashMap iteration order**: the search only uses hash maps for
//!   lookups; ordering decisions come from the frontier's total order.
//! - **Frontier ties**: broken by carry, state order and insertion order.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use rush_core::config::PlannerConfig;
use rush_core::search::{plan, NoProgress, SearchOutcome};
use tracing::{debug, warn};

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Outcome hashes from each run.
    pub hashes: Vec<u64>,
}

impl DeterminismResult {
    fn from_hashes(hashes: Vec<u64>) -> Self {
        let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
        if is_deterministic {
            debug!(runs = hashes.len(), "planner runs matched");
        } else {
            warn!(runs = hashes.len(), ?hashes, "planner runs diverged");
        }
        Self {
            is_deterministic,
            hashes,
        }
    }

    /// Get all unique hashes (should be 1 for a deterministic planner).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the planner was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Planner is non-deterministic!\n\
                 Runs: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Hash everything observable about an outcome.
#[must_use]
pub fn outcome_hash(outcome: &SearchOutcome) -> u64 {
    let mut hasher = DefaultHasher::new();
    match outcome {
        SearchOutcome::Found(solution) => {
            0u8.hash(&mut hasher);
            solution.elapsed.to_bits().hash(&mut hasher);
            solution.carry.hash(&mut hasher);
            solution.state.hash(&mut hasher);
            solution.build_order.len().hash(&mut hasher);
            for step in &solution.build_order {
                step.choice.hash(&mut hasher);
                step.completed_at.to_bits().hash(&mut hasher);
                step.carry.hash(&mut hasher);
                step.state.hash(&mut hasher);
            }
        }
        SearchOutcome::Exhausted(_) => 1u8.hash(&mut hasher),
        SearchOutcome::Cancelled(_) => 2u8.hash(&mut hasher),
    }
    outcome.stats().settled.hash(&mut hasher);
    hasher.finish()
}

/// Plan the same config several times and compare outcomes.
///
/// # Panics
///
/// Panics if a run fails with an error.
pub fn verify_determinism<Setup>(runs: usize, setup: Setup) -> DeterminismResult
where
    Setup: Fn() -> PlannerConfig,
{
    let hashes: Vec<u64> = (0..runs)
        .map(|_| {
            let outcome = plan(&setup(), &mut NoProgress).expect("planning failed");
            outcome_hash(&outcome)
        })
        .collect();
    DeterminismResult::from_hashes(hashes)
}

/// Plan the same config on several threads at once and compare outcomes.
///
/// Each thread owns its own search engine; nothing is shared.
///
/// # Panics
///
/// Panics if a run fails or a thread panics.
pub fn verify_parallel_determinism<Setup>(threads: usize, setup: Setup) -> DeterminismResult
where
    Setup: Fn() -> PlannerConfig + Sync,
{
    let setup_ref = &setup;
    let hashes: Vec<u64> = thread::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                scope.spawn(move || {
                    let outcome = plan(&setup_ref(), &mut NoProgress).expect("planning failed");
                    outcome_hash(&outcome)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("planner thread panicked"))
            .collect()
    });
    DeterminismResult::from_hashes(hashes)
}
