//! End-to-end planning scenarios.

use std::collections::HashMap;
use std::ops::ControlFlow;

use rush_core::prelude::*;
use rush_test_utils::fixtures::{compact_config, dead_end_config, fixed, opening_config};

// =============================================================================
// Observers
// =============================================================================

/// Records every offered and settled time per state.
#[derive(Default)]
struct Recorder {
    offered: HashMap<EconomyState, Vec<Fixed>>,
    settled: Vec<(EconomyState, Fixed)>,
}

impl SearchObserver for Recorder {
    fn on_settled(&mut self, elapsed: Fixed, _carry: u64, state: &EconomyState) -> ControlFlow<()> {
        self.settled.push((*state, elapsed));
        ControlFlow::Continue(())
    }

    fn on_offered(&mut self, elapsed: Fixed, state: &EconomyState) {
        self.offered.entry(*state).or_default().push(elapsed);
    }
}

// =============================================================================
// Goal scenarios
// =============================================================================

#[test]
fn goal_zero_is_met_at_the_start() {
    let outcome = plan(&opening_config(0), &mut NoProgress).unwrap();
    let solution = outcome.solution().unwrap();
    assert_eq!(solution.elapsed, fixed(0));
    assert_eq!(solution.state, EconomyState::default());
}

#[test]
fn first_military_unit_needs_tech_and_time() {
    let outcome = plan(&opening_config(1), &mut NoProgress).unwrap();
    let solution = outcome.solution().unwrap();

    assert_eq!(solution.state.military, 1);
    assert!(solution.state.has_tech_facility);
    // The tech facility alone takes 5 units at the opening income; the
    // military round adds its cost wait plus the production delay.
    assert!(solution.elapsed > fixed(5));
}

#[test]
fn compact_economy_reaches_moderate_goal() {
    let outcome = plan(&compact_config(12), &mut NoProgress).unwrap();
    let solution = outcome.solution().unwrap();

    assert!(solution.state.military >= 12);
    assert!(solution.state.has_tech_facility);
    assert!(solution.state.facilities <= 2);
    assert!(solution.state.workers <= 10);
    assert_eq!(
        solution.build_order.last().map(|s| s.state),
        Some(solution.state)
    );
}

#[test]
fn dead_end_reports_exhaustion() {
    let outcome = plan(&dead_end_config(), &mut NoProgress).unwrap();
    assert!(
        matches!(outcome, SearchOutcome::Exhausted(_)),
        "expected exhaustion, got {outcome:?}"
    );
    assert!(outcome.solution().is_none());
}

#[test]
fn default_goal_of_150_terminates() {
    let config = PlannerConfig::default();
    assert_eq!(config.rules.facility_cap(), Some(4));
    let outcome = plan(&config, &mut NoProgress).unwrap();
    let solution = outcome.solution().expect("150 military units are reachable");
    assert!(solution.state.military >= 150);
    assert!(solution.state.has_tech_facility);
    assert!(solution.state.facilities <= 4);
    assert!(solution.elapsed > fixed(0));
}

#[test]
fn capped_economy_without_supply_exhausts() {
    let mut config = PlannerConfig::default();
    config.rules.max_workers = 5;
    config.rules.max_supply_providers = 1;

    let mut recorder = Recorder::default();
    let outcome = plan(&config, &mut recorder).unwrap();
    let SearchOutcome::Exhausted(stats) = outcome else {
        panic!("expected exhaustion, got {outcome:?}");
    };
    assert_eq!(stats.settled, recorder.settled.len());
    // One supply provider caps population at eight.
    assert!(recorder
        .settled
        .iter()
        .all(|(s, _)| s.total_population() <= 8 && s.military < 8));
    assert!(recorder.settled.iter().all(|(s, _)| s.facilities <= 4));
}

#[test]
fn larger_goals_never_take_less_time() {
    let mut previous = fixed(0);
    for goal in [0, 2, 4, 6, 8] {
        let outcome = plan(&compact_config(goal), &mut NoProgress).unwrap();
        let elapsed = outcome.solution().unwrap().elapsed;
        assert!(elapsed >= previous, "goal {goal}: {elapsed} < {previous}");
        previous = elapsed;
    }
}

#[test]
fn supply_heuristics_both_find_solutions() {
    for heuristic in [SupplyHeuristic::Ratio, SupplyHeuristic::CapacityThreshold] {
        let mut config = compact_config(6);
        config.rules.supply_heuristic = heuristic;
        let outcome = plan(&config, &mut NoProgress).unwrap();
        assert!(outcome.solution().is_some(), "{heuristic:?} found nothing");
    }
}

#[test]
fn continuous_timing_finds_solutions() {
    let mut config = compact_config(6);
    config.rules.timing = TimingModel::Continuous;
    let outcome = plan(&config, &mut NoProgress).unwrap();
    let solution = outcome.solution().unwrap();

    assert!(solution.state.military >= 6);
    assert_eq!(solution.carry, 0);
    assert!(solution.build_order.iter().all(|s| s.carry == 0));
}

// =============================================================================
// Optimality properties
// =============================================================================

#[test]
fn settled_time_is_the_minimum_ever_offered() {
    let mut recorder = Recorder::default();
    plan(&compact_config(6), &mut recorder).unwrap();

    for (state, settled_at) in &recorder.settled {
        if *state == EconomyState::default() {
            continue;
        }
        if let Some(offers) = recorder.offered.get(state) {
            let best = offers.iter().min().unwrap();
            assert_eq!(settled_at, best, "{state} settled late");
        }
    }
}

#[test]
fn every_state_is_settled_once() {
    let mut recorder = Recorder::default();
    plan(&compact_config(6), &mut recorder).unwrap();

    let mut counts: HashMap<EconomyState, usize> = HashMap::new();
    for (state, _) in &recorder.settled {
        *counts.entry(*state).or_default() += 1;
    }
    assert!(counts.values().all(|&c| c == 1));
}

#[test]
fn progress_lines_cover_every_settled_state() {
    let mut lines = Vec::new();
    let mut observer = |elapsed: Fixed, _: u64, state: &EconomyState| {
        lines.push(format!("{}: {state}", rush_core::math::format_hundredths(elapsed)));
        ControlFlow::Continue(())
    };
    let outcome = plan(&compact_config(2), &mut observer).unwrap();

    assert_eq!(lines.len(), outcome.stats().settled);
    assert_eq!(
        lines[0],
        "0.00: State(facilities=1, workers=5, military=0, supply_providers=1, has_tech_facility=false)"
    );
}
