//! Time integration methods
//!
//! Concrete implementations of the [`Integrator`](crate::solver::Integrator) trait.
//!
//! # Architecture
//!
//! The separation between the abstract interface (`solver::traits`) and the
//! concrete methods (`solver::methods`) lets new integrators be added without
//! touching the orchestrator or the discretization.
//!
//! # Available Methods
//!
//! ## Linearly Implicit Methods
//!
//! The two-region operator is stiff: the diffusivity ratio and grid spacing
//! put its eigenvalues many decades apart, which rules out explicit schemes.
//!
//! - **[`RosenbrockSolver`]**: two-stage L-stable Rosenbrock method (ROS2)
//!   - Order: second order with an embedded first-order error estimate
//!   - Cost: 2 function evaluations, 1 Jacobian and 1 LU factorization per step
//!   - Use: stiff semi-discrete diffusion systems
//!
//! # Design Philosophy
//!
//! Each integrator is:
//! - **Self-contained**: No shared mutable state
//! - **Stateless**: Can be reused for multiple simulations

mod rosenbrock;

pub use rosenbrock::RosenbrockSolver;
