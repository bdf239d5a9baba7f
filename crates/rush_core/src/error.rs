//! Error types for build-order planning.

use thiserror::Error;

use crate::config::ConfigError;
use crate::math::Fixed;
use crate::production::ProductionChoice;
use crate::state::EconomyState;

/// Result type alias using [`PlannerError`].
pub type Result<T> = std::result::Result<T, PlannerError>;

/// Top-level error type for all planning errors.
///
/// Running out of frontier is not an error; it is reported as
/// [`SearchOutcome::Exhausted`](crate::search::SearchOutcome::Exhausted).
#[derive(Debug, Error)]
pub enum PlannerError {
    /// A generated production choice would break a state invariant.
    ///
    /// Indicates a defect in the buildable-count bounds.
    #[error("Production bounds violated: {detail} (state {state}, choice {choice})")]
    BoundsViolation {
        /// State the choice was applied to.
        state: EconomyState,
        /// The offending choice.
        choice: ProductionChoice,
        /// Which invariant broke.
        detail: String,
    },

    /// Income is zero but the round still costs resources.
    #[error("Economy is stuck: {state} has no income but needs {cost} resources")]
    StuckEconomy {
        /// State with zero income.
        state: EconomyState,
        /// Outstanding cost after carry-over.
        cost: u64,
    },

    /// A transition produced a negative time delta.
    #[error("Negative edge weight {elapsed} leaving {state}")]
    NegativeEdge {
        /// Source state of the edge.
        state: EconomyState,
        /// The computed time delta.
        elapsed: Fixed,
    },

    /// The search settled more states than allowed.
    #[error("Search aborted after settling {limit} states")]
    StateLimitExceeded {
        /// Configured limit.
        limit: usize,
    },

    /// Configuration could not be loaded or is inconsistent.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
