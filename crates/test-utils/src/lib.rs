//! Shared test utilities for the cf-metadata workspace.
//!
//! This crate provides common testing infrastructure:
//! - An instrumented in-memory [`VariableStore`](cf_model::VariableStore)
//!   implementation with per-variable call counters
//! - Canned dataset fixtures used by the resolver's integration tests
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod store;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use store::{MemoryStore, VariableDef};
