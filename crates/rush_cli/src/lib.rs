//! # Rush CLI
//!
//! Command-line front end for the build-order planner.
//!
//! - [`progress`] - Progress stream of settled states
//! - [`report`] - Text and JSON rendering of search outcomes
//! - [`overrides`] - Command-line overrides for config fields
//! - [`sweep`] - Parallel planning over many goals
//! - [`validate`] - Config file validation

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod error;
pub mod overrides;
pub mod progress;
pub mod report;
pub mod sweep;
pub mod validate;

pub use error::{CliError, Result};
