//! Shared utilities for the casetally workspace.
//!
//! Currently this is just the centralised `tracing` setup in
//! [`observability`]; every binary and integration test goes through the same
//! initialiser so log records land in one rolling file sink.
pub mod observability;
