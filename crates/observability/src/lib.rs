//! Process-wide tracing setup shared by portal hosts and tests.

pub mod tracing;

pub use crate::tracing::{init, init_for_tests, DEFAULT_FILTER};
