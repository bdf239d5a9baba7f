//! Command-line overrides for individual config fields.
//!
//! Flags are applied on top of the loaded config (or the defaults) and the
//! result is validated again before planning.

use clap::{Args, ValueEnum};
use rush_core::prelude::{PlannerConfig, SupplyHeuristic, TimingModel};
use tracing::debug;

/// Supply heuristic names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HeuristicArg {
    /// Keep supply providers in step with population.
    Ratio,
    /// Build a supply provider only once capacity is full.
    CapacityThreshold,
}

impl From<HeuristicArg> for SupplyHeuristic {
    fn from(arg: HeuristicArg) -> Self {
        match arg {
            HeuristicArg::Ratio => Self::Ratio,
            HeuristicArg::CapacityThreshold => Self::CapacityThreshold,
        }
    }
}

/// Timing model names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TimingArg {
    /// Whole income rounds with banked surplus.
    Banked,
    /// Fractional waits without carry.
    Continuous,
}

impl From<TimingArg> for TimingModel {
    fn from(arg: TimingArg) -> Self {
        match arg {
            TimingArg::Banked => Self::Banked,
            TimingArg::Continuous => Self::Continuous,
        }
    }
}

/// Optional overrides shared by `plan` and `sweep`.
#[derive(Debug, Clone, Default, Args)]
pub struct RuleOverrides {
    /// Maximum number of workers
    #[arg(long)]
    pub max_workers: Option<u32>,

    /// Maximum number of supply providers
    #[arg(long)]
    pub max_supply_providers: Option<u32>,

    /// Cap the number of facilities (enables the facility cap)
    #[arg(long, conflicts_with = "no_facility_cap")]
    pub max_facilities: Option<u32>,

    /// Lift the facility cap; requires --max-states
    #[arg(long, requires = "max_states")]
    pub no_facility_cap: bool,

    /// Supply provider heuristic
    #[arg(long, value_enum)]
    pub supply_heuristic: Option<HeuristicArg>,

    /// Timing model
    #[arg(long, value_enum)]
    pub timing: Option<TimingArg>,

    /// Give up after settling this many states
    #[arg(long)]
    pub max_states: Option<usize>,
}

impl RuleOverrides {
    /// Apply every set override to `config`.
    pub fn apply(&self, config: &mut PlannerConfig) {
        let rules = &mut config.rules;
        if let Some(max) = self.max_workers {
            rules.max_workers = max;
        }
        if let Some(max) = self.max_supply_providers {
            rules.max_supply_providers = max;
        }
        if let Some(max) = self.max_facilities {
            rules.facility_cap_enabled = true;
            rules.max_facilities = max;
        }
        if self.no_facility_cap {
            rules.facility_cap_enabled = false;
        }
        if let Some(heuristic) = self.supply_heuristic {
            rules.supply_heuristic = heuristic.into();
        }
        if let Some(timing) = self.timing {
            rules.timing = timing.into();
        }
        if let Some(limit) = self.max_states {
            config.limits.max_settled_states = Some(limit);
        }
        debug!(?config, "applied overrides");
    }
}
