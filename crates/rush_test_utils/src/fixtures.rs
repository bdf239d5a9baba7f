//! Test fixtures and helpers.
//!
//! Pre-built planner configurations for consistent testing.

use fixed::types::I32F32;
use rush_core::config::PlannerConfig;

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// The standard opening with a custom military goal.
#[must_use]
pub fn opening_config(goal_military: u32) -> PlannerConfig {
    PlannerConfig {
        goal_military,
        ..PlannerConfig::default()
    }
}

/// A small economy whose state space stays tiny: at most two facilities,
/// ten workers and four supply providers.
#[must_use]
pub fn compact_config(goal_military: u32) -> PlannerConfig {
    let mut config = opening_config(goal_military);
    config.rules.max_workers = 10;
    config.rules.max_supply_providers = 4;
    config.rules.facility_cap_enabled = true;
    config.rules.max_facilities = 2;
    config
}

/// Workers pinned at the starting five and no room to grow supply or
/// facilities: the population can never hold the default goal.
#[must_use]
pub fn dead_end_config() -> PlannerConfig {
    let mut config = opening_config(150);
    config.rules.max_workers = config.start.workers;
    config.rules.max_supply_providers = config.start.supply_providers;
    config.rules.facility_cap_enabled = true;
    config.rules.max_facilities = config.start.facilities;
    config
}
