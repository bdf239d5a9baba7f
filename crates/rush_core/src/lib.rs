//! # Rush Core
//!
//! Deterministic build-order planning core.
//!
//! Given a starting economy (facilities, workers, supply providers, military
//! units and an optional tech facility) this crate finds the minimum-time
//! sequence of production rounds that reaches a target military count.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO beyond loading a config file
//! - No randomness
//! - No floating-point math (elapsed time uses fixed-point)
//!
//! ## Crate Structure
//!
//! - [`cost`] - Resource cost of every unit and building kind
//! - [`config`] - Tunable rules, start state, goal and search limits
//! - [`state`] - Economy snapshot and its derived capacities
//! - [`production`] - Enumeration of legal production choices
//! - [`transition`] - Advancing the economy through one production round
//! - [`search`] - Uniform-cost search over the state graph
//! - [`math`] - Fixed-point time utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod config;
pub mod cost;
pub mod error;
pub mod math;
pub mod production;
pub mod search;
pub mod state;
pub mod transition;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{
        ConfigError, EconomyRules, PlannerConfig, SearchLimits, SupplyHeuristic, TimingModel,
    };
    pub use crate::cost::{CostTable, UnitKind};
    pub use crate::error::{PlannerError, Result};
    pub use crate::math::Fixed;
    pub use crate::production::{production_choices, ProductionChoice, SlotOutput, WorkerOutput};
    pub use crate::search::{
        plan, BuildStep, LogProgress, NoProgress, SearchEngine, SearchObserver, SearchOutcome,
        SearchStats, Solution,
    };
    pub use crate::state::EconomyState;
    pub use crate::transition::{advance, Transition};
}
