//! Physical model trait
//!
//! This module defines the seam between physics and numerics:
//! - `PhysicalModel`: a spatially discretized system `dC/dt = f(t, C)`
//!
//! The model provides `f` (and optionally its Jacobian), the time integrator
//! provides the method to advance it.

use nalgebra::{DMatrix, DVector};

use crate::physics::Tridiagonal;

// ==================================================================================================
// Physical Model Trait
// =================================================================================================

/// Trait for spatially discretized physical models
///
/// # Responsibility
/// Computes the right-hand side of the semi-discrete system at a given state.
/// Does NOT integrate it (that's the integrator's job).
///
/// The model provides the "physics" (equations), the integrator provides
/// the "numerics" (method to solve them).
///
/// # Purity
///
/// `compute_physics` must be pure with respect to the model's own data:
/// integrators call it an unbounded number of times, in any order, and
/// rely on identical inputs producing identical outputs.
pub trait PhysicalModel: Send + Sync {
    /// Dimension of the state vector
    ///
    /// Used by the integrator to allocate vectors and matrices
    fn points(&self) -> usize;

    /// Computes the right-hand side `f(t, state)`
    ///
    /// # Arguments
    /// * `t` - Current (dimensionless) time
    /// * `state` - Current state vector, never mutated
    ///
    /// # Note
    /// This method encapsulates ALL the physics:
    /// - Spatial derivatives (finite differences)
    /// - Exterior boundary conditions
    /// - Interface coupling
    fn compute_physics(&self, t: f64, state: &DVector<f64>) -> DVector<f64>;

    /// Jacobian `∂f/∂state` at `(t, state)`
    ///
    /// The default implementation uses forward finite differences (one extra
    /// right-hand side evaluation per state entry). Models with a known
    /// Jacobian should override it.
    fn jacobian(&self, t: f64, state: &DVector<f64>) -> DMatrix<f64> {
        let size = state.len();
        let base = self.compute_physics(t, state);
        let mut jacobian = DMatrix::zeros(size, size);
        let mut perturbed = state.clone();

        for j in 0..size {
            let original = perturbed[j];
            let eps = f64::EPSILON.sqrt() * original.abs().max(1.0);
            perturbed[j] = original + eps;

            let shifted = self.compute_physics(t, &perturbed);
            for i in 0..size {
                jacobian[(i, j)] = (shifted[i] - base[i]) / eps;
            }

            perturbed[j] = original;
        }

        jacobian
    }

    /// Jacobian in tridiagonal form, for models whose stencil only couples neighbours
    ///
    /// Integrators prefer it over [`PhysicalModel::jacobian`] when present: the
    /// iteration matrix is then factored in O(n) instead of O(n³). The default
    /// (`None`) keeps the dense path for generic models.
    fn tridiagonal_jacobian(&self, _t: f64, _state: &DVector<f64>) -> Option<Tridiagonal> {
        None
    }

    /// Name of the model (used to display and logging)
    fn name(&self) -> &str;

    /// Description of the model (option)
    fn description(&self) -> Option<&str> {
        None
    }
}
