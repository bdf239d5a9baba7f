//! Advancing the economy through one production round.
//!
//! A round waits until its total cost is affordable from current income plus
//! carried-over resources, then applies every requested unit and building at
//! once. Using any production slot adds the configured production delay.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::{EconomyRules, TimingModel};
use crate::error::{PlannerError, Result};
use crate::math::{ceil_div, fixed_serde, Fixed};
use crate::production::ProductionChoice;
use crate::state::EconomyState;

/// Outcome of applying one production choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Time spent on this round.
    #[serde(with = "fixed_serde")]
    pub elapsed: Fixed,
    /// Resources left over after paying for the round.
    pub carry: u64,
    /// The economy after the round.
    pub state: EconomyState,
}

/// Apply `choice` to `state` with `carry` banked resources.
///
/// # Errors
///
/// - [`PlannerError::StuckEconomy`] if the round costs more than the carry
///   and the state has no income.
/// - [`PlannerError::BoundsViolation`] if the resulting state would break an
///   invariant (negative counts, caps, population above capacity).
/// - [`PlannerError::NegativeEdge`] if the time delta came out negative.
pub fn advance(
    state: &EconomyState,
    choice: &ProductionChoice,
    carry: u64,
    rules: &EconomyRules,
) -> Result<Transition> {
    let cost = choice.cost(state, &rules.costs);
    let (wait, carry) = wait_for_resources(state, cost, carry, rules)?;

    let delay = if choice.slots.is_empty() {
        Fixed::ZERO
    } else {
        Fixed::from_num(rules.production_delay)
    };
    let elapsed = wait.saturating_add(delay);
    if elapsed < Fixed::ZERO {
        return Err(PlannerError::NegativeEdge {
            state: *state,
            elapsed,
        });
    }

    let next = apply_choice(state, choice, rules)?;
    trace!(%state, %choice, %next, cost, elapsed = %elapsed, carry, "advanced");

    Ok(Transition {
        elapsed,
        carry,
        state: next,
    })
}

/// Time until `cost` is affordable, and the carry left afterwards.
fn wait_for_resources(
    state: &EconomyState,
    cost: u64,
    carry: u64,
    rules: &EconomyRules,
) -> Result<(Fixed, u64)> {
    if cost <= carry {
        return Ok((Fixed::ZERO, carry - cost));
    }

    let outstanding = cost - carry;
    let income = state.income_rate(rules);
    if income == 0 {
        return Err(PlannerError::StuckEconomy {
            state: *state,
            cost: outstanding,
        });
    }

    match rules.timing {
        TimingModel::Banked => {
            let rounds = ceil_div(outstanding, income);
            let surplus = income * rounds - outstanding;
            Ok((Fixed::saturating_from_num(rounds), surplus))
        }
        TimingModel::Continuous => {
            let wait =
                Fixed::saturating_from_num(outstanding) / Fixed::saturating_from_num(income);
            Ok((wait, 0))
        }
    }
}

/// The state after `choice`, with every invariant checked.
fn apply_choice(
    state: &EconomyState,
    choice: &ProductionChoice,
    rules: &EconomyRules,
) -> Result<EconomyState> {
    let violation = |detail: String| PlannerError::BoundsViolation {
        state: *state,
        choice: *choice,
        detail,
    };

    if choice.slots.military > 0 && !state.has_tech_facility {
        return Err(violation(
            "military units requested before the tech facility exists".to_string(),
        ));
    }
    if choice.slots.slots_used() > state.production_slots(rules) {
        return Err(violation(format!(
            "{} slots requested but only {} available",
            choice.slots.slots_used(),
            state.production_slots(rules)
        )));
    }

    let consumed = choice.builds.workers_consumed(state);
    let workers = state
        .workers
        .checked_add(choice.slots.workers)
        .and_then(|w| w.checked_sub(consumed))
        .ok_or_else(|| {
            violation(format!(
                "{} workers cannot cover {consumed} construction jobs",
                state.workers.saturating_add(choice.slots.workers)
            ))
        })?;
    let add = |have: u32, more: u32, what: &str| {
        have.checked_add(more)
            .ok_or_else(|| violation(format!("{what} count overflows")))
    };

    let next = EconomyState {
        facilities: add(state.facilities, choice.builds.facilities, "facility")?,
        workers,
        military: add(state.military, choice.slots.military, "military")?,
        supply_providers: add(
            state.supply_providers,
            choice.slots.supply_providers,
            "supply provider",
        )?,
        has_tech_facility: state.has_tech_facility || choice.builds.tech_facility,
    };

    match next.invariant_violation(rules) {
        Some(detail) => Err(violation(detail)),
        None => Ok(next),
    }
}
