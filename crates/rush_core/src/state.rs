//! Economy snapshot and its derived capacities.
//!
//! [`EconomyState`] stores only the five counted attributes. Everything else
//! (population, income, production slots, buildable counts) is derived on
//! demand against the [`EconomyRules`] so the graph nodes stay small and
//! their equality stays structural.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{EconomyRules, SupplyHeuristic};

/// One reachable economic configuration.
///
/// Equality, hashing and ordering are field-wise over all five attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyState {
    /// Production buildings.
    pub facilities: u32,
    /// Resource gatherers.
    pub workers: u32,
    /// Units counted towards the goal.
    pub military: u32,
    /// Population capacity providers.
    pub supply_providers: u32,
    /// Whether military production is unlocked.
    pub has_tech_facility: bool,
}

impl Default for EconomyState {
    /// The standard opening: one facility, five workers, one supply provider.
    fn default() -> Self {
        Self {
            facilities: 1,
            workers: 5,
            military: 0,
            supply_providers: 1,
            has_tech_facility: false,
        }
    }
}

impl EconomyState {
    /// Create a state from explicit counts.
    #[must_use]
    pub const fn new(
        facilities: u32,
        workers: u32,
        military: u32,
        supply_providers: u32,
        has_tech_facility: bool,
    ) -> Self {
        Self {
            facilities,
            workers,
            military,
            supply_providers,
            has_tech_facility,
        }
    }

    /// Population currently in use.
    #[must_use]
    pub const fn total_population(&self) -> u32 {
        self.workers.saturating_add(self.military)
    }

    /// Population the supply providers allow, saturating at `u32::MAX`.
    #[must_use]
    pub const fn population_capacity(&self, rules: &EconomyRules) -> u32 {
        rules.supply_per_provider.saturating_mul(self.supply_providers)
    }

    /// Resources gathered per time unit.
    #[must_use]
    pub const fn income_rate(&self, rules: &EconomyRules) -> u64 {
        rules.income_per_worker as u64 * self.workers as u64
    }

    /// Population headroom, never negative.
    #[must_use]
    pub const fn population_headroom(&self, rules: &EconomyRules) -> u32 {
        self.population_capacity(rules)
            .saturating_sub(self.total_population())
    }

    /// Units that can start this round: one per facility, limited by headroom.
    #[must_use]
    pub fn production_slots(&self, rules: &EconomyRules) -> u32 {
        self.facilities.min(self.population_headroom(rules))
    }

    /// Workers free to construct buildings. One worker always stays mining.
    #[must_use]
    pub const fn facilities_buildable(&self) -> u32 {
        self.workers.saturating_sub(1)
    }

    /// New facilities allowed this round, including the facility cap.
    #[must_use]
    pub fn facilities_buildable_bounded(&self, rules: &EconomyRules) -> u32 {
        match rules.facility_cap() {
            Some(cap) => self
                .facilities_buildable()
                .min(cap.saturating_sub(self.facilities)),
            None => self.facilities_buildable(),
        }
    }

    /// New workers allowed this round.
    #[must_use]
    pub fn workers_buildable(&self, rules: &EconomyRules) -> u32 {
        self.production_slots(rules)
            .min(rules.max_workers.saturating_sub(self.workers))
    }

    /// New supply providers allowed this round, per the configured heuristic.
    #[must_use]
    pub fn supply_providers_buildable(&self, rules: &EconomyRules) -> u32 {
        let remaining = rules
            .max_supply_providers
            .saturating_sub(self.supply_providers);
        match rules.supply_heuristic {
            SupplyHeuristic::Ratio => {
                let target = (self.total_population() / rules.units_per_provider)
                    .saturating_add(1)
                    .min(rules.max_supply_providers);
                self.production_slots(rules)
                    .min(target.saturating_sub(self.supply_providers))
            }
            SupplyHeuristic::CapacityThreshold => {
                let at_capacity = self.total_population() >= self.population_capacity(rules);
                u32::from(at_capacity && remaining > 0)
            }
        }
    }

    /// New military units allowed this round.
    #[must_use]
    pub fn military_buildable(&self, rules: &EconomyRules) -> u32 {
        if self.has_tech_facility {
            self.production_slots(rules)
        } else {
            0
        }
    }

    /// Whether this state satisfies a military goal.
    #[must_use]
    pub const fn reaches_goal(&self, goal_military: u32) -> bool {
        self.military >= goal_military
    }

    /// Describe the first broken invariant, if any.
    #[must_use]
    pub fn invariant_violation(&self, rules: &EconomyRules) -> Option<String> {
        if self.facilities == 0 {
            return Some("no facilities left".to_string());
        }
        if self.supply_providers == 0 {
            return Some("no supply providers left".to_string());
        }
        if self.workers > rules.max_workers {
            return Some(format!(
                "{} workers exceed the cap of {}",
                self.workers, rules.max_workers
            ));
        }
        if self.supply_providers > rules.max_supply_providers {
            return Some(format!(
                "{} supply providers exceed the cap of {}",
                self.supply_providers, rules.max_supply_providers
            ));
        }
        if let Some(cap) = rules.facility_cap() {
            if self.facilities > cap {
                return Some(format!(
                    "{} facilities exceed the cap of {cap}",
                    self.facilities
                ));
            }
        }
        if self.total_population() > self.population_capacity(rules) {
            return Some(format!(
                "population {} exceeds capacity {}",
                self.total_population(),
                self.population_capacity(rules)
            ));
        }
        None
    }
}

impl fmt::Display for EconomyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "State(facilities={}, workers={}, military={}, supply_providers={}, has_tech_facility={})",
            self.facilities,
            self.workers,
            self.military,
            self.supply_providers,
            self.has_tech_facility
        )
    }
}
