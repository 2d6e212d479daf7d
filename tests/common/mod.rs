//! Common utilities for integration tests

pub mod mock_integrators;
pub mod test_helpers;

// Re-export commonly used items
#[allow(unused_imports)]
pub use mock_integrators::{ExponentialDecay, FixedStepEuler, Unreachable};
#[allow(unused_imports)]
pub use test_helpers::{relative_error, reference_scenario, uniform_scenario, weighted_mass};
