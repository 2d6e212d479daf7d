//! Physics layer
//!
//! This module provides the physical side of the two-region problem:
//! the model trait consumed by integrators, the validated parameter set and
//! the normalization that makes the discretized system well scaled.
//!
//! # Core Concepts
//!
//! - **Physical Model**: Computes the semi-discrete right-hand side at a given state
//! - **Parameters**: Diffusivities, region lengths, partition coefficient, grid size
//! - **Normalizer**: Physical ↔ dimensionless conversions (concentration, time, space)
//! - **Tridiagonal**: Banded Jacobian storage with an O(n) factorization
//!
//! # Architecture
//!
//! Physical models are **separate from numerical integrators**:
//! - The model provides the **equations** (physics)
//! - The integrator provides the **method** to solve them (numerics)
//!
//! # Example
//!
//! ```rust
//! use transdiff_rs::physics::{initial_scale, Normalizer, Parameters};
//!
//! let c1 = vec![1.0; 10];
//! let c2 = vec![0.0; 10];
//!
//! let c_max = initial_scale(&c1).unwrap();
//! let parameters = Parameters::new(1e-5, 1e-12, 1e-1, 1e-3, 1e5, 10, c_max).unwrap();
//! let normalizer = Normalizer::new(parameters);
//!
//! let state = normalizer.normalize_initial_conditions(&c1, &c2).unwrap();
//! assert_eq!(state.len(), 20);
//! ```

// module declaration
pub mod traits;
pub mod parameters;
pub mod normalization;
pub mod tridiagonal;

// re-export commonly used types for convenience
pub use traits::PhysicalModel;
pub use parameters::{DimensionlessCoefficients, Parameters};
pub use normalization::{initial_scale, Normalizer};
pub use tridiagonal::{Tridiagonal, TridiagonalLu};
