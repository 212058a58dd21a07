//! Integration test utilities for the parish scheduling API
//!
//! Spawns the real router on a local port over the in-memory store and
//! drives it over HTTP.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
