//! Numerical solvers
//!
//! This module turns a problem definition into a time-resolved solution.
//!
//! # Core Concepts
//!
//! ## The Architecture (WHAT vs HOW)
//!
//! The solver layer separates concerns into three parts:
//!
//! 1. **Scenario** (`Scenario`) - WHAT to solve
//!    - Physical parameters (D1, D2, L1, L2, a, n)
//!    - Time window and initial concentrations
//!    - Exterior boundary values and types
//!
//! 2. **Integrator** (`Integrator` trait, `SolverConfiguration`) - HOW to solve
//!    - Time stepping of the semi-discrete system
//!    - Tolerances and step controls
//!
//! 3. **Orchestrator** (`MethodOfLines`) - the pipeline
//!    - Validation, normalization, boundary construction
//!    - Operator assembly and a single integration call
//!    - Post-processing into a [`Solution`]
//!
//! # Module Organization
//!
//! - **`traits`**: `Integrator`, `SolverConfiguration`, `SimulationResult`, `IntegrationError`
//! - **`scenario`**: `Scenario` and its builder
//! - **`method_of_lines`**: `MethodOfLines` and `Solution`
//! - **`methods`**: concrete integrators (`RosenbrockSolver`)
//!
//! # Workflow Diagram
//!
//! ```text
//! ┌─────────────────┐
//! │    Scenario     │  ← WHAT to solve
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐      ┌──────────────────┐
//! │ MethodOfLines   │─────▶│ TwoRegionDiffusion│ (operator)
//! └────────┬────────┘      └──────────────────┘
//!          │
//! ┌────────▼────────┐
//! │   Integrator    │  ← HOW to solve (Rosenbrock by default)
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐
//! │    Solution     │  ← x1, x2, c1, c2, t
//! └─────────────────┘
//! ```
//!
//! # Quick Start Example
//!
//! ```rust
//! use transdiff_rs::solver::{MethodOfLines, RosenbrockSolver, Scenario, SolverConfiguration};
//!
//! let n = 20;
//! let scenario = Scenario::builder()
//!     .diffusion_coefficients(1e-9, 5e-10)
//!     .region_lengths(1e-3, 1e-3)
//!     .partition_coefficient(1.5)
//!     .grid_points(n)
//!     .time_span(0.0, 100.0)
//!     .initial_conditions(vec![1.0; n], vec![0.0; n])
//!     .left_boundary(0.0, "neumann")
//!     .right_boundary(0.0, "neumann")
//!     .build()?;
//!
//! let integrator = RosenbrockSolver::with_configuration(
//!     SolverConfiguration::default().with_tolerances(1e-8, 1e-12),
//! );
//!
//! let solution = MethodOfLines::with_integrator(scenario, integrator).solve_pde_system()?;
//! println!("{} time points", solution.len());
//! # Ok::<(), transdiff_rs::error::TransportError>(())
//! ```
//!
//! # Error Handling
//!
//! Input problems are reported before any integration as
//! [`TransportError`](crate::error::TransportError) variants; integrator
//! failures arrive wrapped in `TransportError::IntegrationFailure`.

// =================================================================================================
// Module Declarations
// =================================================================================================

mod method_of_lines;
pub mod methods;
mod scenario;
mod traits;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use method_of_lines::{MethodOfLines, Solution};
pub use methods::RosenbrockSolver;
pub use scenario::{Scenario, ScenarioBuilder};
pub use traits::{IntegrationError, Integrator, SimulationResult, SolverConfiguration};

// =================================================================================================
// Helper Functions
// =================================================================================================

use nalgebra::DVector;

/// Validate a state vector for numerical issues
///
/// NaN can arise from 0/0 or Inf − Inf; infinity from overflow. Either one
/// means the integration cannot continue.
///
/// ```rust,ignore
/// validate_state(&state, t, 42)?;  // Validates state at step 42
/// ```
pub(crate) fn validate_state(state: &DVector<f64>, t: f64, step: usize) -> Result<(), IntegrationError> {
    match state.iter().position(|value| !value.is_finite()) {
        Some(index) => Err(IntegrationError::NonFiniteState { t, step, index }),
        None => Ok(()),
    }
}

// =================================================================================================
// Tests
// =================================================================================================
