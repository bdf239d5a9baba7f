//! # Rush Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Planner config fixtures
//! - Determinism test harness
//! - Property-based testing strategies over reachable states

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;
pub mod strategies;

/// Re-export proptest for convenience.
pub use proptest;
