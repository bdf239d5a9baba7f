//! Parallel planning over a range of goals.
//!
//! Each goal gets its own search engine, so runs share nothing and can be
//! spread across a rayon thread pool.

use std::time::Instant;

use rayon::prelude::*;
use rush_core::math::format_hundredths;
use rush_core::prelude::{plan, NoProgress, PlannerConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::report::PlanStatus;

/// Configuration for a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Config every run starts from; only the goal changes.
    pub base: PlannerConfig,
    /// Goals to plan for.
    pub goals: Vec<u32>,
    /// Worker threads (0 = rayon default).
    pub parallel: usize,
}

impl SweepConfig {
    /// Sweep `goals` over `base`.
    pub fn new(base: PlannerConfig, goals: Vec<u32>) -> Self {
        Self {
            base,
            goals,
            parallel: 0,
        }
    }

    /// Set the number of worker threads.
    pub fn with_parallel(mut self, threads: usize) -> Self {
        self.parallel = threads;
        self
    }
}

/// Result of planning for one goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepRow {
    /// Military goal.
    pub goal_military: u32,
    /// How the search ended, if it ran to an outcome.
    pub status: Option<PlanStatus>,
    /// Time the goal was reached, two decimals.
    pub elapsed: Option<String>,
    /// Length of the build order.
    pub rounds: Option<usize>,
    /// States settled.
    pub settled: usize,
    /// Error message if planning failed.
    pub error: Option<String>,
}

/// Results from a sweep, ordered by the input goals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResults {
    /// One row per goal.
    pub rows: Vec<SweepRow>,
    /// Wall-clock runtime.
    pub duration_seconds: f64,
}

impl SweepResults {
    /// Rows that ended in an error.
    pub fn failures(&self) -> impl Iterator<Item = &SweepRow> {
        self.rows.iter().filter(|row| row.error.is_some())
    }

    /// Plain-text table.
    pub fn render_text(&self) -> String {
        let mut out = format!(
            "{:>6}  {:>10}  {:>6}  {:>9}  status\n",
            "goal", "elapsed", "rounds", "settled"
        );
        for row in &self.rows {
            let status = match (&row.error, row.status) {
                (Some(error), _) => format!("error: {error}"),
                (None, Some(PlanStatus::Found)) => "found".to_string(),
                (None, Some(PlanStatus::Exhausted)) => "exhausted".to_string(),
                (None, Some(PlanStatus::Cancelled)) => "cancelled".to_string(),
                (None, None) => "-".to_string(),
            };
            out.push_str(&format!(
                "{:>6}  {:>10}  {:>6}  {:>9}  {status}\n",
                row.goal_military,
                row.elapsed.as_deref().unwrap_or("-"),
                row.rounds.map_or_else(|| "-".to_string(), |r| r.to_string()),
                row.settled,
            ));
        }
        out
    }
}

fn run_one(base: &PlannerConfig, goal_military: u32) -> SweepRow {
    let config = PlannerConfig {
        goal_military,
        ..*base
    };
    match plan(&config, &mut NoProgress) {
        Ok(outcome) => {
            let solution = outcome.solution();
            let status = PlanStatus::from(&outcome);
            debug!(goal = goal_military, ?status, "sweep run finished");
            SweepRow {
                goal_military,
                status: Some(status),
                elapsed: solution.map(|s| format_hundredths(s.elapsed)),
                rounds: solution.map(|s| s.build_order.len()),
                settled: outcome.stats().settled,
                error: None,
            }
        }
        Err(e) => {
            warn!(goal = goal_military, error = %e, "sweep run failed");
            SweepRow {
                goal_military,
                status: None,
                elapsed: None,
                rounds: None,
                settled: 0,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Plan every goal in parallel.
///
/// Failed runs are reported per row; only pool construction fails the sweep.
pub fn run_sweep(config: &SweepConfig) -> Result<SweepResults> {
    let start = Instant::now();
    info!(
        goals = config.goals.len(),
        parallel = config.parallel,
        "Starting sweep"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.parallel)
        .build()?;
    let rows: Vec<SweepRow> = pool.install(|| {
        config
            .goals
            .par_iter()
            .map(|&goal| run_one(&config.base, goal))
            .collect()
    });

    let duration_seconds = start.elapsed().as_secs_f64();
    info!(
        "Sweep complete: {} goals in {:.1}s",
        rows.len(),
        duration_seconds
    );

    Ok(SweepResults {
        rows,
        duration_seconds,
    })
}
