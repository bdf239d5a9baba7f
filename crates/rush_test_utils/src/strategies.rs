//! Proptest strategies for planner testing.
//!
//! States are generated by random walks from the opening through legal
//! production choices, so every generated state is actually reachable.

use proptest::prelude::*;
use proptest::sample::Index;
use rush_core::config::{EconomyRules, SupplyHeuristic, TimingModel};
use rush_core::production::production_choices;
use rush_core::state::EconomyState;
use rush_core::transition::advance;

/// A random walk through the state graph.
#[derive(Debug, Clone)]
pub struct Walk {
    /// Rules the walk was taken under.
    pub rules: EconomyRules,
    /// Every visited state with its carry, starting with the opening.
    pub states: Vec<(EconomyState, u64)>,
}

impl Walk {
    /// Last state reached.
    #[must_use]
    pub fn last(&self) -> &EconomyState {
        &self.states[self.states.len() - 1].0
    }
}

/// Generate either supply heuristic.
pub fn arb_supply_heuristic() -> impl Strategy<Value = SupplyHeuristic> {
    prop_oneof![
        Just(SupplyHeuristic::Ratio),
        Just(SupplyHeuristic::CapacityThreshold),
    ]
}

/// Generate either timing model.
pub fn arb_timing() -> impl Strategy<Value = TimingModel> {
    prop_oneof![Just(TimingModel::Banked), Just(TimingModel::Continuous)]
}

/// Generate rules that accept the default opening.
pub fn arb_rules() -> impl Strategy<Value = EconomyRules> {
    (
        5u32..60,
        1u32..30,
        any::<bool>(),
        1u32..12,
        5u32..12,
        1u32..8,
        arb_supply_heuristic(),
        arb_timing(),
    )
        .prop_map(
            |(
                max_workers,
                max_supply_providers,
                facility_cap_enabled,
                max_facilities,
                supply_per_provider,
                units_per_provider,
                supply_heuristic,
                timing,
            )| EconomyRules {
                max_workers,
                max_supply_providers,
                facility_cap_enabled,
                max_facilities,
                supply_per_provider,
                units_per_provider,
                supply_heuristic,
                timing,
                ..EconomyRules::default()
            },
        )
}

/// Walk from the default opening, picking a random legal choice each round.
///
/// Stops early if a state has no legal choices left.
///
/// # Panics
///
/// Panics if a generated choice cannot be applied, which means the
/// production bounds are broken.
#[must_use]
pub fn walk(rules: EconomyRules, picks: &[Index]) -> Walk {
    let mut state = EconomyState::default();
    let mut carry = 0;
    let mut states = vec![(state, carry)];

    for pick in picks {
        let choices = production_choices(&state, &rules);
        if choices.is_empty() {
            break;
        }
        let choice = choices[pick.index(choices.len())];
        let transition = advance(&state, &choice, carry, &rules)
            .unwrap_or_else(|e| panic!("generated choice {choice} failed from {state}: {e}"));
        state = transition.state;
        carry = transition.carry;
        states.push((state, carry));
    }

    Walk { rules, states }
}

/// Generate a random walk of up to `max_steps` rounds.
pub fn arb_walk(max_steps: usize) -> impl Strategy<Value = Walk> {
    (
        arb_rules(),
        proptest::collection::vec(any::<Index>(), 0..max_steps),
    )
        .prop_map(|(rules, picks)| walk(rules, &picks))
}
