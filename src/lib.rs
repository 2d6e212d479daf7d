//! transdiff-rs: Transmission Diffusion across Two Regions
//!
//! Simulates one-dimensional transient diffusion of a solute across two
//! abutting regions with different diffusivities and lengths. The regions are
//! coupled at their interface by flux continuity and a linear partition
//! relation `c2 = a·c1`; each exterior end carries a Neumann (flux) or
//! Dirichlet (value) condition.
//!
//! # Architecture
//!
//! transdiff-rs is built on two core principles:
//!
//! 1. **Separation of Physics and Numerics**
//!    - The discretized model defines the right-hand side (what to solve)
//!    - The integrator advances it in time (how to solve)
//!
//! 2. **Method of Lines**
//!    - Space is discretized by finite differences on a dimensionless grid
//!    - Time is integrated by an adaptive stiff integrator
//!
//! # Quick Start
//!
//! ```rust
//! use transdiff_rs::prelude::*;
//!
//! # fn main() -> transdiff_rs::error::Result<()> {
//! let n = 20;
//!
//! // 1. Describe the problem
//! let scenario = Scenario::builder()
//!     .diffusion_coefficients(1e-9, 1e-10)
//!     .region_lengths(1e-3, 1e-3)
//!     .partition_coefficient(2.0)
//!     .grid_points(n)
//!     .time_span(0.0, 3600.0)
//!     .initial_conditions(vec![1.0; n], vec![0.0; n])
//!     .left_boundary(0.0, "neumann")
//!     .right_boundary(0.0, "neumann")
//!     .build()?;
//!
//! // 2. Solve with the default Rosenbrock integrator
//! let solution = MethodOfLines::new(scenario).solve_pde_system()?;
//!
//! // 3. Access results
//! println!("{} time points", solution.len());
//! println!("final interface value: {}", solution.final_c1()[n - 1]);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error taxonomy
//! - [`physics`]: Model trait, parameters and normalization
//! - [`models`]: The two-region operator and its boundary conditions
//! - [`solver`]: Integrators, problem definition and orchestrator
//! - [`output`]: CSV export

// Core modules
pub mod error;
pub mod physics;

pub mod models;
pub mod output;
pub mod solver;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use transdiff_rs::prelude::*;
    //! ```
    pub use crate::error::{Result, TransportError};
    pub use crate::models::{BoundaryCondition, BoundaryKind, BoundarySide, TwoRegionDiffusion};
    pub use crate::physics::{Normalizer, Parameters, PhysicalModel};
    pub use crate::solver::{
        IntegrationError, Integrator, MethodOfLines, RosenbrockSolver, Scenario, SimulationResult, Solution,
        SolverConfiguration,
    };
}
