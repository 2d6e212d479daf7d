//! Discretized diffusion models
//!
//! All models implement the [`PhysicalModel`](crate::physics::PhysicalModel) trait.
//! The integrator calls `compute_physics` at every stage: models are responsible
//! for the physics (diffusion, interface coupling, exterior boundaries), the
//! integrator for the time stepping.
//!
//! # Available Models
//!
//! ## [`TwoRegionDiffusion`]
//!
//! Solute diffusing across two abutting regions with different diffusivities,
//! coupled through flux continuity and a linear partition relation.
//!
//! # Boundary conditions
//!
//! The two exterior ends use [`BoundaryCondition`] (Neumann flux or Dirichlet
//! value), built from raw `(value, type)` pairs by [`BoundaryConditionApplier`].

// =================================================================================================
// Module Declarations
// =================================================================================================

pub mod boundary;
pub mod two_region;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use boundary::{
    BoundaryCondition, BoundaryConditionApplier, BoundaryKind, BoundaryPair, BoundaryScaling, BoundarySide,
};
pub use two_region::TwoRegionDiffusion;
