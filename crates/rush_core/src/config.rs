//! Planner configuration.
//!
//! Every constant that parameterizes the economy, the goal and the search
//! lives here so it can be changed from a RON file without touching code.
//!
//! # Example RON
//!
//! ```ron
//! PlannerConfig(
//!     rules: (
//!         max_workers: 50,
//!         max_supply_providers: 25,
//!         supply_heuristic: Ratio,
//!         timing: Banked,
//!     ),
//!     start: (facilities: 1, workers: 5, military: 0, supply_providers: 1, has_tech_facility: false),
//!     goal_military: 150,
//! )
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cost::CostTable;
use crate::state::EconomyState;

/// Error type for configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File not found.
    #[error("Config file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// Failed to write RON.
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] ron::Error),
    /// Values are inconsistent with each other.
    #[error("Invalid config: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// How many supply providers a state may start in one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SupplyHeuristic {
    /// Keep roughly one provider per `units_per_provider` population,
    /// at most one new provider per production slot per round.
    #[default]
    Ratio,
    /// Allow exactly one new provider, and only once population has
    /// reached capacity.
    CapacityThreshold,
}

/// How waiting for resources is turned into elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimingModel {
    /// Wait whole income rounds; surplus income is banked as carry-over.
    #[default]
    Banked,
    /// Wait exactly `cost / income` (fractional); nothing is carried over.
    Continuous,
}

/// Rules of the economy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyRules {
    /// Global worker cap.
    pub max_workers: u32,
    /// Global supply provider cap.
    pub max_supply_providers: u32,
    /// Whether `max_facilities` applies.
    ///
    /// Without it facilities grow without bound, so disabling the cap
    /// requires [`SearchLimits::max_settled_states`].
    pub facility_cap_enabled: bool,
    /// Global facility cap (only when `facility_cap_enabled`).
    pub max_facilities: u32,
    /// Population capacity granted by each supply provider.
    pub supply_per_provider: u32,
    /// Population per supply provider targeted by [`SupplyHeuristic::Ratio`].
    pub units_per_provider: u32,
    /// Resources per time unit gathered by each worker.
    pub income_per_worker: u32,
    /// Time units added when a round uses any production slot.
    pub production_delay: u32,
    /// Supply provider production policy.
    pub supply_heuristic: SupplyHeuristic,
    /// Resource waiting model.
    pub timing: TimingModel,
    /// Cost of each kind.
    pub costs: CostTable,
}

impl Default for EconomyRules {
    fn default() -> Self {
        Self {
            max_workers: 50,
            max_supply_providers: 25,
            facility_cap_enabled: true,
            max_facilities: 4,
            supply_per_provider: 8,
            units_per_provider: 4,
            income_per_worker: 8,
            production_delay: 1,
            supply_heuristic: SupplyHeuristic::Ratio,
            timing: TimingModel::Banked,
            costs: CostTable::default(),
        }
    }
}

impl EconomyRules {
    /// Facility cap in effect, if any.
    #[must_use]
    pub const fn facility_cap(&self) -> Option<u32> {
        if self.facility_cap_enabled {
            Some(self.max_facilities)
        } else {
            None
        }
    }
}

/// Bounds on a single search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    /// Abort once this many distinct states have been settled.
    pub max_settled_states: Option<usize>,
}

/// Complete planner configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Economy rules.
    pub rules: EconomyRules,
    /// Starting state.
    pub start: EconomyState,
    /// Search stops at the first settled state with at least this many military units.
    pub goal_military: u32,
    /// Memory bounds for the search.
    pub limits: SearchLimits,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            rules: EconomyRules::default(),
            start: EconomyState::default(),
            goal_military: 150,
            limits: SearchLimits::default(),
        }
    }
}

impl PlannerConfig {
    /// Load a config from a RON file and validate it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Parse a config from a RON string and validate it.
    pub fn from_ron_str(ron: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(ron)?;
        config.validate()?;
        Ok(config)
    }

    /// Render the config as pretty RON.
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Check internal consistency.
    ///
    /// Returns a list of problems; empty means the config is usable.
    #[must_use]
    pub fn problems(&self) -> Vec<String> {
        let rules = &self.rules;
        let start = &self.start;
        let mut problems = Vec::new();

        if start.facilities == 0 {
            problems.push("start must have at least one facility".to_string());
        }
        if start.supply_providers == 0 {
            problems.push("start must have at least one supply provider".to_string());
        }
        if rules.supply_per_provider == 0 {
            problems.push("supply_per_provider must be positive".to_string());
        }
        if rules.units_per_provider == 0 {
            problems.push("units_per_provider must be positive".to_string());
        }
        if rules.max_workers < start.workers {
            problems.push(format!(
                "max_workers ({}) is below the starting worker count ({})",
                rules.max_workers, start.workers
            ));
        }
        if rules.max_supply_providers < start.supply_providers {
            problems.push(format!(
                "max_supply_providers ({}) is below the starting supply provider count ({})",
                rules.max_supply_providers, start.supply_providers
            ));
        }
        match rules.facility_cap() {
            Some(cap) if cap < start.facilities => problems.push(format!(
                "max_facilities ({cap}) is below the starting facility count ({})",
                start.facilities
            )),
            Some(_) => {}
            None if self.limits.max_settled_states.is_none() => problems.push(
                "facility_cap_enabled is false but max_settled_states is unset; \
                 the search would never end"
                    .to_string(),
            ),
            None => {}
        }
        if rules
            .supply_per_provider
            .checked_mul(rules.max_supply_providers)
            .is_none()
        {
            problems.push(format!(
                "supply_per_provider ({}) times max_supply_providers ({}) overflows",
                rules.supply_per_provider, rules.max_supply_providers
            ));
        }
        if start.total_population() > start.population_capacity(rules) {
            problems.push(format!(
                "starting population ({}) exceeds starting capacity ({})",
                start.total_population(),
                start.population_capacity(rules)
            ));
        }

        problems
    }

    /// Reject inconsistent configs before any search starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }
}
