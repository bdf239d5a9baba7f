//! Text and JSON rendering of search outcomes.

use std::fmt::Write as _;

use rush_core::math::format_hundredths;
use rush_core::prelude::{EconomyState, SearchOutcome, SearchStats};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// A goal state was reached.
    Found,
    /// No build order reaches the goal.
    Exhausted,
    /// The search was stopped early.
    Cancelled,
}

impl From<&SearchOutcome> for PlanStatus {
    fn from(outcome: &SearchOutcome) -> Self {
        match outcome {
            SearchOutcome::Found(_) => Self::Found,
            SearchOutcome::Exhausted(_) => Self::Exhausted,
            SearchOutcome::Cancelled(_) => Self::Cancelled,
        }
    }
}

/// One round of the build order, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// Completion time, two decimals.
    pub completed_at: String,
    /// Resources banked after the round.
    pub carry: u64,
    /// What was produced.
    pub choice: String,
    /// Economy after the round.
    pub state: EconomyState,
}

/// Serializable summary of one planning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanReport {
    /// Military goal searched for.
    pub goal_military: u32,
    /// How the search ended.
    pub status: PlanStatus,
    /// Time the goal was reached, two decimals.
    pub elapsed: Option<String>,
    /// Resources banked at the goal.
    pub carry: Option<u64>,
    /// Goal state.
    pub final_state: Option<EconomyState>,
    /// Production rounds from the start to the goal.
    pub build_order: Vec<StepReport>,
    /// Search counters.
    pub stats: SearchStats,
}

impl PlanReport {
    /// Summarize an outcome.
    pub fn from_outcome(goal_military: u32, outcome: &SearchOutcome) -> Self {
        let solution = outcome.solution();
        let build_order = solution
            .map(|s| {
                s.build_order
                    .iter()
                    .map(|step| StepReport {
                        completed_at: format_hundredths(step.completed_at),
                        carry: step.carry,
                        choice: step.choice.to_string(),
                        state: step.state,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            goal_military,
            status: PlanStatus::from(outcome),
            elapsed: solution.map(|s| format_hundredths(s.elapsed)),
            carry: solution.map(|s| s.carry),
            final_state: solution.map(|s| s.state),
            build_order,
            stats: *outcome.stats(),
        }
    }

    /// Pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Human-readable summary with the build order.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        match (self.status, &self.elapsed, &self.final_state) {
            (PlanStatus::Found, Some(elapsed), Some(state)) => {
                let _ = writeln!(
                    out,
                    "Reached {} military at {elapsed} (carry {})",
                    self.goal_military,
                    self.carry.unwrap_or(0)
                );
                let _ = writeln!(out, "Final: {state}");
                let _ = writeln!(out, "Build order ({} rounds):", self.build_order.len());
                for step in &self.build_order {
                    let _ = writeln!(out, "  {:>8}  {}", step.completed_at, step.choice);
                }
            }
            (PlanStatus::Cancelled, ..) => {
                let _ = writeln!(
                    out,
                    "Search cancelled before reaching {} military",
                    self.goal_military
                );
            }
            _ => {
                let _ = writeln!(
                    out,
                    "No build order reaches {} military",
                    self.goal_military
                );
            }
        }
        let _ = writeln!(
            out,
            "Settled {} states ({} pushed, {} dominated, peak frontier {})",
            self.stats.settled,
            self.stats.pushed,
            self.stats.dominated,
            self.stats.peak_frontier
        );
        out
    }
}
