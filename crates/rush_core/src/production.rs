//! Enumeration of legal production choices.
//!
//! A round combines two independent decisions:
//! - [`SlotOutput`]: units started at facilities (workers, supply
//!   providers, military units).
//! - [`WorkerOutput`]: buildings constructed by consuming workers
//!   (facilities and the one-time tech facility).
//!
//! Ranges are bounded by the global caps, so plain enumeration of the
//! cross products is cheap and keeps the generator obviously complete.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::EconomyRules;
use crate::cost::{CostTable, UnitKind};
use crate::state::EconomyState;

/// Units started at facilities this round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SlotOutput {
    /// Workers to produce.
    pub workers: u32,
    /// Supply providers to produce.
    pub supply_providers: u32,
    /// Military units to produce.
    pub military: u32,
}

impl SlotOutput {
    /// Create a slot output.
    #[must_use]
    pub const fn new(workers: u32, supply_providers: u32, military: u32) -> Self {
        Self {
            workers,
            supply_providers,
            military,
        }
    }

    /// Whether nothing is produced.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.workers == 0 && self.supply_providers == 0 && self.military == 0
    }

    /// Production slots consumed. Supply providers do not occupy one.
    #[must_use]
    pub const fn slots_used(&self) -> u32 {
        self.workers + self.military
    }

    /// Resource cost of this output.
    #[must_use]
    pub const fn cost(&self, costs: &CostTable) -> u64 {
        self.workers as u64 * costs.cost(UnitKind::Worker) as u64
            + self.supply_providers as u64 * costs.cost(UnitKind::SupplyProvider) as u64
            + self.military as u64 * costs.cost(UnitKind::Military) as u64
    }
}

/// Buildings constructed by workers this round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WorkerOutput {
    /// Facilities to construct.
    pub facilities: u32,
    /// Whether to construct the tech facility.
    pub tech_facility: bool,
}

impl WorkerOutput {
    /// Create a worker output.
    #[must_use]
    pub const fn new(facilities: u32, tech_facility: bool) -> Self {
        Self {
            facilities,
            tech_facility,
        }
    }

    /// Whether nothing is constructed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.facilities == 0 && !self.tech_facility
    }

    /// Whether this output newly builds the tech facility in `state`.
    #[must_use]
    pub const fn builds_tech_facility(&self, state: &EconomyState) -> bool {
        self.tech_facility && !state.has_tech_facility
    }

    /// Workers consumed when applied to `state`.
    #[must_use]
    pub const fn workers_consumed(&self, state: &EconomyState) -> u32 {
        self.facilities + if self.builds_tech_facility(state) { 1 } else { 0 }
    }

    /// Resource cost when applied to `state`.
    ///
    /// The tech facility is only charged the first time it is built.
    #[must_use]
    pub const fn cost(&self, state: &EconomyState, costs: &CostTable) -> u64 {
        let tech = if self.builds_tech_facility(state) {
            costs.cost(UnitKind::TechFacility) as u64
        } else {
            0
        };
        self.facilities as u64 * costs.cost(UnitKind::Facility) as u64 + tech
    }
}

/// One round's complete decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ProductionChoice {
    /// Units started at facilities.
    pub slots: SlotOutput,
    /// Buildings constructed by workers.
    pub builds: WorkerOutput,
}

impl ProductionChoice {
    /// Combine the two halves of a round.
    #[must_use]
    pub const fn new(slots: SlotOutput, builds: WorkerOutput) -> Self {
        Self { slots, builds }
    }

    /// Whether the round does nothing at all.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.slots.is_empty() && self.builds.is_empty()
    }

    /// Total resource cost when applied to `state`.
    #[must_use]
    pub const fn cost(&self, state: &EconomyState, costs: &CostTable) -> u64 {
        self.slots.cost(costs) + self.builds.cost(state, costs)
    }

    /// Count of each kind requested, skipping zeros.
    #[must_use]
    pub fn items(&self) -> Vec<(UnitKind, u32)> {
        [
            (UnitKind::Worker, self.slots.workers),
            (UnitKind::SupplyProvider, self.slots.supply_providers),
            (UnitKind::Military, self.slots.military),
            (UnitKind::Facility, self.builds.facilities),
            (UnitKind::TechFacility, u32::from(self.builds.tech_facility)),
        ]
        .into_iter()
        .filter(|&(_, count)| count > 0)
        .collect()
    }
}

impl fmt::Display for ProductionChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items = self.items();
        if items.is_empty() {
            return f.write_str("nothing");
        }
        for (i, (kind, count)) in items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{count}x {}", kind.name())?;
        }
        Ok(())
    }
}

/// Every legal slot output for `state`.
///
/// Enumerates `(workers, supply_providers, military)` over their inclusive
/// buildable ranges and keeps those that fit the production slots.
#[must_use]
pub fn slot_outputs(state: &EconomyState, rules: &EconomyRules) -> Vec<SlotOutput> {
    let slots = state.production_slots(rules);
    let max_workers = state.workers_buildable(rules);
    let max_supply = state.supply_providers_buildable(rules);
    let max_military = state.military_buildable(rules);

    let mut outputs = Vec::new();
    for workers in 0..=max_workers {
        for supply_providers in 0..=max_supply {
            for military in 0..=max_military {
                let output = SlotOutput::new(workers, supply_providers, military);
                if output.slots_used() <= slots {
                    outputs.push(output);
                }
            }
        }
    }
    outputs
}

/// Every legal worker output for `state`.
///
/// The tech facility is only offered while it does not exist yet.
#[must_use]
pub fn worker_outputs(state: &EconomyState, rules: &EconomyRules) -> Vec<WorkerOutput> {
    let builders = state.facilities_buildable();
    let max_facilities = state.facilities_buildable_bounded(rules);
    let tech_options: &[bool] = if state.has_tech_facility {
        &[false]
    } else {
        &[false, true]
    };

    let mut outputs = Vec::new();
    for facilities in 0..=max_facilities {
        for &tech_facility in tech_options {
            if facilities + u32::from(tech_facility) <= builders {
                outputs.push(WorkerOutput::new(facilities, tech_facility));
            }
        }
    }
    outputs
}

/// Cross product of both halves, minus the do-nothing round.
#[must_use]
pub fn combine(slots: &[SlotOutput], builds: &[WorkerOutput]) -> Vec<ProductionChoice> {
    let mut choices = Vec::with_capacity(slots.len() * builds.len());
    for &slot in slots {
        for &build in builds {
            let choice = ProductionChoice::new(slot, build);
            if !choice.is_noop() {
                choices.push(choice);
            }
        }
    }
    choices
}

/// Every legal production choice from `state`.
#[must_use]
pub fn production_choices(state: &EconomyState, rules: &EconomyRules) -> Vec<ProductionChoice> {
    combine(&slot_outputs(state, rules), &worker_outputs(state, rules))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn rules() -> EconomyRules {
        EconomyRules::default()
    }

    #[test]
    fn test_opening_slot_outputs() {
        let outputs = slot_outputs(&EconomyState::default(), &rules());
        // one slot, no tech: (0,0,0) (0,1,0) (1,0,0) (1,1,0)
        assert_eq!(outputs.len(), 4);
        assert!(outputs.contains(&SlotOutput::new(1, 1, 0)));
        assert!(outputs.iter().all(|o| o.military == 0));
    }

    #[test]
    fn test_opening_worker_outputs() {
        let outputs = worker_outputs(&EconomyState::default(), &rules());
        // 4 spare workers, cap of 4 leaves room for 3 facilities:
        // f in 0..=3 with and without tech
        assert_eq!(outputs.len(), 8);
        assert!(outputs.contains(&WorkerOutput::new(3, true)));
        assert!(!outputs.contains(&WorkerOutput::new(4, false)));
    }

    #[test]
    fn test_opening_choice_count() {
        let choices = production_choices(&EconomyState::default(), &rules());
        assert_eq!(choices.len(), 4 * 8 - 1);
        assert!(choices.iter().all(|c| !c.is_noop()));
    }

    #[test]
    fn test_choices_are_unique() {
        let state = EconomyState::new(3, 12, 4, 4, true);
        let choices = production_choices(&state, &rules());
        let unique: HashSet<_> = choices.iter().copied().collect();
        assert_eq!(unique.len(), choices.len());
    }

    #[test]
    fn test_slot_constraint_is_shared_by_workers_and_military() {
        let rules = rules();
        let state = EconomyState::new(3, 10, 0, 4, true);
        let slots = state.production_slots(&rules);
        assert_eq!(slots, 3);
        for output in slot_outputs(&state, &rules) {
            assert!(output.workers + output.military <= slots);
        }
        assert!(slot_outputs(&state, &rules).contains(&SlotOutput::new(1, 0, 2)));
        assert!(!slot_outputs(&state, &rules).contains(&SlotOutput::new(2, 0, 2)));
    }

    #[test]
    fn test_tech_facility_never_offered_twice() {
        let state = EconomyState::new(1, 5, 0, 1, true);
        let outputs = worker_outputs(&state, &rules());
        assert!(outputs.iter().all(|o| !o.tech_facility));
        assert_eq!(outputs.len(), 4);
    }

    #[test]
    fn test_tech_facility_charged_once() {
        let costs = CostTable::default();
        let build = WorkerOutput::new(0, true);
        let without = EconomyState::new(1, 5, 0, 1, false);
        let with = EconomyState::new(1, 5, 0, 1, true);

        assert_eq!(build.cost(&without, &costs), 200);
        assert_eq!(build.cost(&with, &costs), 0);
        assert_eq!(build.workers_consumed(&without), 1);
        assert_eq!(build.workers_consumed(&with), 0);
    }

    #[test]
    fn test_single_worker_cannot_build() {
        let state = EconomyState::new(1, 1, 0, 1, false);
        let outputs = worker_outputs(&state, &rules());
        assert_eq!(outputs, vec![WorkerOutput::new(0, false)]);
    }

    #[test]
    fn test_facility_cap_limits_worker_outputs() {
        let mut rules = rules();
        rules.facility_cap_enabled = true;
        rules.max_facilities = 2;
        let state = EconomyState::new(1, 10, 0, 2, true);
        let outputs = worker_outputs(&state, &rules);
        assert_eq!(
            outputs,
            vec![WorkerOutput::new(0, false), WorkerOutput::new(1, false)]
        );
    }

    #[test]
    fn test_stuck_at_capacity_without_supply_options() {
        let mut rules = rules();
        rules.max_supply_providers = 1;
        let state = EconomyState::new(1, 8, 0, 1, false);
        let slots = slot_outputs(&state, &rules);
        assert_eq!(slots, vec![SlotOutput::default()]);

        // Only building options remain.
        let choices = production_choices(&state, &rules);
        assert!(choices.iter().all(|c| c.slots.is_empty()));
        assert!(!choices.is_empty());
    }

    #[test]
    fn test_costs() {
        let costs = CostTable::default();
        let state = EconomyState::default();
        let choice = ProductionChoice::new(SlotOutput::new(1, 1, 2), WorkerOutput::new(1, true));
        assert_eq!(choice.cost(&state, &costs), 50 + 100 + 100 + 450 + 200);
    }

    #[test]
    fn test_choice_display() {
        let choice = ProductionChoice::new(SlotOutput::new(1, 0, 0), WorkerOutput::new(0, true));
        assert_eq!(choice.to_string(), "1x worker, 1x tech_facility");
        assert_eq!(ProductionChoice::default().to_string(), "nothing");
    }
}
