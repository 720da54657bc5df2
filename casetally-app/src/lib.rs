//! Library surface of the `casetally` binary: just the run pipeline, exposed
//! so integration tests can drive it with synthetic configurations.
pub mod run;
