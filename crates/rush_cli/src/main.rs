//! Build-order planner.
//!
//! Finds the fastest production schedule from a starting economy to a
//! military goal.
//!
//! # Usage
//!
//! ```bash
//! # Plan with the defaults, streaming every settled state to stdout
//! cargo run -p rush_cli -- plan
//!
//! # Plan from a config file with overrides, printing only a JSON report
//! cargo run -p rush_cli -- plan --config assets/planner.ron --goal 20 --quiet --json
//!
//! # Plan several goals in parallel
//! cargo run -p rush_cli -- sweep --goals 5,10,20 --parallel 4
//!
//! # Check config files
//! cargo run -p rush_cli -- validate assets
//! ```
//!
//! Progress lines and reports go to stdout, logs go to stderr.

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rush_cli::overrides::RuleOverrides;
use rush_cli::progress::StreamProgress;
use rush_cli::report::{PlanReport, PlanStatus};
use rush_cli::sweep::{run_sweep, SweepConfig};
use rush_cli::validate::validate_path;
use rush_cli::Result;
use rush_core::prelude::{plan, LogProgress, PlannerConfig};

#[derive(Parser)]
#[command(name = "rush")]
#[command(about = "Minimum-time build-order planner")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the fastest build order for one goal
    Plan {
        /// RON config file (defaults apply when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Military units to reach
        #[arg(short, long)]
        goal: Option<u32>,

        #[command(flatten)]
        overrides: RuleOverrides,

        /// Log settled states at debug level instead of printing them
        #[arg(short, long)]
        quiet: bool,

        /// Print the final report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Plan several goals in parallel
    Sweep {
        /// RON config file (defaults apply when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Goals to plan for
        #[arg(long, value_delimiter = ',', required = true)]
        goals: Vec<u32>,

        /// Worker threads (0 = auto)
        #[arg(short, long, default_value = "0")]
        parallel: usize,

        #[command(flatten)]
        overrides: RuleOverrides,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a config file or a directory of them
    Validate {
        /// File or directory to check
        #[arg(default_value = "assets")]
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries progress and reports
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    let result = match cli.command {
        Commands::Plan {
            config,
            goal,
            overrides,
            quiet,
            json,
        } => cmd_plan(config.as_deref(), goal, &overrides, quiet, json),
        Commands::Sweep {
            config,
            goals,
            parallel,
            overrides,
            json,
        } => cmd_sweep(config.as_deref(), goals, parallel, &overrides, json),
        Commands::Validate { path } => cmd_validate(&path),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Load the config (or defaults) and apply command-line overrides.
fn load_config(path: Option<&Path>, overrides: &RuleOverrides) -> Result<PlannerConfig> {
    let mut config = match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading config");
            PlannerConfig::load(path)?
        }
        None => PlannerConfig::default(),
    };
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// Run one search; `Ok(false)` when no build order was found.
fn cmd_plan(
    path: Option<&Path>,
    goal: Option<u32>,
    overrides: &RuleOverrides,
    quiet: bool,
    json: bool,
) -> Result<bool> {
    let mut config = load_config(path, overrides)?;
    if let Some(goal) = goal {
        config.goal_military = goal;
    }
    tracing::info!(
        goal = config.goal_military,
        heuristic = ?config.rules.supply_heuristic,
        timing = ?config.rules.timing,
        "Planning"
    );

    let stdout = io::stdout();
    let outcome = if quiet {
        plan(&config, &mut LogProgress)?
    } else {
        let mut progress = StreamProgress::new(BufWriter::new(stdout.lock()));
        let outcome = plan(&config, &mut progress)?;
        progress.finish()?;
        outcome
    };

    let report = PlanReport::from_outcome(config.goal_military, &outcome);
    let mut out = stdout.lock();
    if json {
        writeln!(out, "{}", report.to_json()?)?;
    } else {
        write!(out, "{}", report.render_text())?;
    }
    Ok(report.status == PlanStatus::Found)
}

/// Plan every goal; `Ok(false)` when any run failed.
fn cmd_sweep(
    path: Option<&Path>,
    goals: Vec<u32>,
    parallel: usize,
    overrides: &RuleOverrides,
    json: bool,
) -> Result<bool> {
    let base = load_config(path, overrides)?;
    let results = run_sweep(&SweepConfig::new(base, goals).with_parallel(parallel))?;

    let mut out = io::stdout().lock();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&results)?)?;
    } else {
        write!(out, "{}", results.render_text())?;
    }
    Ok(results.failures().count() == 0)
}

/// Check config files; `Ok(false)` when any was rejected.
fn cmd_validate(path: &Path) -> Result<bool> {
    tracing::info!("Validating config files in: {}", path.display());
    let checks = validate_path(path)?;
    let mut all_ok = true;
    for check in &checks {
        match &check.error {
            None => println!("ok      {}", check.path.display()),
            Some(e) => {
                all_ok = false;
                println!("invalid {}: {e}", check.path.display());
            }
        }
    }
    if all_ok {
        tracing::info!("Validation passed ({} files)", checks.len());
    } else {
        tracing::error!("Validation failed");
    }
    Ok(all_ok)
}
