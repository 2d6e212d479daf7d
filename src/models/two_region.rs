//! Two-region coupled diffusion operator
//!
//! # Mathematical Background
//!
//! ## Governing equations
//!
//! A solute diffuses through two abutting regions, region 1 on `[-L1, 0]`
//! and region 2 on `[0, L2]`. After scaling each region onto a unit interval
//! (see [`Parameters`](crate::physics::Parameters)), the dimensionless system reads:
//!
//! ```text
//! ∂c1/∂T = a1 · ∂²c1/∂ξ²       ξ ∈ [-1, 0]
//! ∂c2/∂T =      ∂²c2/∂ξ²       ξ ∈ [0, 1]
//! ```
//!
//! ## Interface matching
//!
//! At ξ = 0 the physical flux is continuous (D1·∂c1/∂x = D2·∂c2/∂x) and the
//! two sides obey the linear partition relation c2 = a·c1. In normalized
//! variables this becomes a Robin-type matching condition that couples the
//! last node of region 1 with the first node of region 2:
//!
//! ```text
//! d²c1[n-1] = ( -(2+a2)/(1+a2)·c1[n-1] + c1[n-2] + c2[0]/(1+a2) ) / h²
//! d²c2[0]   = ( c2[1] - (1+2·a2)/(1+a2)·c2[0] + a2/(1+a2)·c1[n-1] ) / h²
//! ```
//!
//! Both expressions are second differences against the implied interface
//! value `u* = (a2·c1[n-1] + c2[0]) / (1+a2)`.
//!
//! ## Spatial discretization
//!
//! Each region holds `n` nodes with spacing `h = 1/n`. Interior nodes use the
//! central stencil:
//!
//! ```text
//! d²c[i] ≈ (c[i-1] - 2·c[i] + c[i+1]) / h²
//! ```
//!
//! The exterior nodes (first node of region 1, last node of region 2) are
//! handled by their [`BoundaryCondition`].
//!
//! # State layout
//!
//! ```text
//! [ c1[0] … c1[n-1] | c2[0] … c2[n-1] ]
//!   ↑ x = -L1                 ↑ x = +L2
//! ```
//!
//! # Conservation
//!
//! With zero-flux exterior boundaries the operator conserves the weighted mass
//! `L1·Σ w·c1 + a·L2·Σ w·c2` exactly (weights ½ on the exterior nodes and 1
//! elsewhere). The analytic Jacobian keeps that property intact inside an
//! implicit integrator.
//!
//! # Example
//!
//! ```rust
//! use nalgebra::DVector;
//! use transdiff_rs::models::{BoundaryConditionApplier, TwoRegionDiffusion};
//! use transdiff_rs::physics::{Parameters, PhysicalModel};
//!
//! let parameters = Parameters::new(1e-5, 1e-12, 1e-1, 1e-3, 1e5, 10, 1.0).unwrap();
//! let boundaries = BoundaryConditionApplier::new(&[0.0, 0.0], &["neumann", "neumann"])
//!     .unwrap()
//!     .generate_boundary_conditions()
//!     .unwrap();
//!
//! let model = TwoRegionDiffusion::from_parameters(&parameters, boundaries);
//! let uniform = DVector::from_element(model.points(), 0.3);
//!
//! // a uniform profile is an equilibrium under zero-flux boundaries
//! let rate = model.compute_physics(0.0, &uniform);
//! assert!(rate.iter().all(|r| r.abs() < 1e-9));
//! ```

use log::warn;
use nalgebra::{DMatrix, DVector};

use crate::models::boundary::{BoundaryKind, BoundaryPair, BoundaryScaling};
use crate::physics::{DimensionlessCoefficients, Parameters, PhysicalModel, Tridiagonal};

// =================================================================================================
// Two-Region Diffusion Model
// =================================================================================================

/// Semi-discrete two-region diffusion operator
///
/// Holds the dimensionless coefficients, the exterior boundary pair and the
/// boundary scaling parameters. All fields are immutable `Copy` data: every
/// call to [`compute_physics`](PhysicalModel::compute_physics) works on its own
/// buffers, so one instance can be shared freely between threads.
///
/// # Complexity
///
/// - `compute_physics`: O(n) time, O(n) scratch
/// - `tridiagonal_jacobian`: O(n), three diagonals
/// - `jacobian`: O(n²), dense copy for generic consumers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoRegionDiffusion {
    // ==================== Discretization ====================

    /// Grid points per region
    region_points: usize,

    /// a1, a2 and h
    coefficients: DimensionlessCoefficients,

    // ==================== Exterior boundaries ====================

    boundaries: BoundaryPair,

    /// Lengths, c_max and partition coefficient used to normalize boundary values
    scaling: BoundaryScaling,
}

impl TwoRegionDiffusion {
    /// Build the operator from its parts
    ///
    /// `region_points` must be at least 2; [`Parameters::new`] enforces this
    /// for operators built through [`TwoRegionDiffusion::from_parameters`].
    pub fn new(
        region_points: usize,
        coefficients: DimensionlessCoefficients,
        boundaries: BoundaryPair,
        scaling: BoundaryScaling,
    ) -> Self {
        debug_assert!(region_points >= 2, "two-region operator needs n >= 2");

        Self {
            region_points,
            coefficients,
            boundaries,
            scaling,
        }
    }

    /// Build the operator from validated parameters
    pub fn from_parameters(parameters: &Parameters, boundaries: BoundaryPair) -> Self {
        Self::new(
            parameters.points(),
            parameters.coefficients(),
            boundaries,
            BoundaryScaling::from(parameters),
        )
    }

    /// Grid points per region
    pub fn region_points(&self) -> usize {
        self.region_points
    }

    /// Dimensionless coefficients
    pub fn coefficients(&self) -> DimensionlessCoefficients {
        self.coefficients
    }

    /// Exterior boundary pair
    pub fn boundaries(&self) -> &BoundaryPair {
        &self.boundaries
    }

    /// Second spatial derivative of a state, before the `a1` time scaling
    ///
    /// Order of evaluation: exterior boundaries (which may pin entries of the
    /// local copy), interior stencil, then the interface stencil.
    pub fn second_derivative(&self, state: &DVector<f64>) -> DVector<f64> {
        let n = self.region_points;
        let len = 2 * n;
        debug_assert_eq!(state.len(), len, "state length must be 2n");

        let h = self.coefficients.h;
        let h2 = h * h;

        let mut concentration: Vec<f64> = state.iter().copied().collect();
        let mut d2c = vec![0.0; len];

        for boundary in self.boundaries.iter() {
            boundary.apply(&mut d2c, &mut concentration, h, &self.scaling);
        }

        let c = &concentration;

        // interior of region 1, then region 2; both empty when n = 2
        for i in (1..n - 1).chain(n + 1..len - 1) {
            d2c[i] = (c[i - 1] - 2.0 * c[i] + c[i + 1]) / h2;
        }

        let a2 = self.coefficients.a2;
        let w = 1.0 / (1.0 + a2);

        d2c[n - 1] = (-(2.0 + a2) * w * c[n - 1] + c[n - 2] + w * c[n]) / h2;
        d2c[n] = (c[n + 1] - (1.0 + 2.0 * a2) * w * c[n] + a2 * w * c[n - 1]) / h2;

        DVector::from_vec(d2c)
    }

    /// Interface concentration `u* = (a2·c1[n-1] + c2[0]) / (1+a2)` implied by the matching condition
    ///
    /// Expressed in region-2 normalized units.
    pub fn interface_value(&self, state: &DVector<f64>) -> f64 {
        let n = self.region_points;
        let a2 = self.coefficients.a2;

        (a2 * state[n - 1] + state[n]) / (1.0 + a2)
    }

    /// Overwrite Dirichlet-constrained entries of `state` with their pinned value
    ///
    /// Returns the number of entries whose value changed.
    pub fn pin_boundaries(&self, state: &mut DVector<f64>) -> usize {
        let len = state.len();
        let mut changed = 0;

        for boundary in self.boundaries.iter() {
            if let Some(pinned) = boundary.pinned_value(&self.scaling) {
                let position = boundary.side().position(len);

                if state[position] != pinned {
                    warn!(
                        "Dirichlet boundary {} replaces initial value {:.6e} with {:.6e}",
                        boundary, state[position], pinned
                    );
                    state[position] = pinned;
                    changed += 1;
                }
            }
        }

        changed
    }

    /// Exact tridiagonal Jacobian
    ///
    /// The operator is affine in the state, so the Jacobian is constant.
    /// Dirichlet rows are zero and the pinned column is removed, because the
    /// stencils read the pinned value instead of the state entry. The
    /// interface couples `n-1` and `n`, which are neighbours, so every entry
    /// stays inside the three bands.
    pub fn banded_jacobian(&self) -> Tridiagonal {
        let n = self.region_points;
        let len = 2 * n;

        let mut jacobian = Tridiagonal::zeros(len);

        for i in (1..n - 1).chain(n + 1..len - 1) {
            let scale = self.row_scale(i);
            jacobian.set(i, i - 1, scale);
            jacobian.set(i, i, -2.0 * scale);
            jacobian.set(i, i + 1, scale);
        }

        for boundary in self.boundaries.iter() {
            let side = boundary.side();
            let position = side.position(len);

            if boundary.kind() == BoundaryKind::Neumann {
                let scale = self.row_scale(position);
                jacobian.set(position, position, -2.0 * scale);
                jacobian.set(position, side.neighbor(len), 2.0 * scale);
            }
        }

        let a2 = self.coefficients.a2;
        let w = 1.0 / (1.0 + a2);

        let scale = self.row_scale(n - 1);
        jacobian.set(n - 1, n - 2, scale);
        jacobian.set(n - 1, n - 1, -(2.0 + a2) * w * scale);
        jacobian.set(n - 1, n, w * scale);

        let scale = self.row_scale(n);
        jacobian.set(n, n - 1, a2 * w * scale);
        jacobian.set(n, n, -(1.0 + 2.0 * a2) * w * scale);
        jacobian.set(n, n + 1, scale);

        for boundary in self.boundaries.iter() {
            if boundary.kind() == BoundaryKind::Dirichlet {
                jacobian.clear_column(boundary.side().position(len));
            }
        }

        jacobian
    }

    /// `1/h²` scaled by `a1` in region 1
    fn row_scale(&self, row: usize) -> f64 {
        let h = self.coefficients.h;
        if row < self.region_points {
            self.coefficients.a1 / (h * h)
        } else {
            1.0 / (h * h)
        }
    }
}

impl PhysicalModel for TwoRegionDiffusion {
    fn points(&self) -> usize {
        2 * self.region_points
    }

    /// `[a1 · d²c1, d²c2]`
    fn compute_physics(&self, _t: f64, state: &DVector<f64>) -> DVector<f64> {
        let n = self.region_points;
        let a1 = self.coefficients.a1;

        let mut rate = self.second_derivative(state);
        rate.rows_mut(0, n).scale_mut(a1);

        rate
    }

    /// Exact Jacobian, dense copy of [`TwoRegionDiffusion::banded_jacobian`]
    fn jacobian(&self, _t: f64, state: &DVector<f64>) -> DMatrix<f64> {
        debug_assert_eq!(state.len(), 2 * self.region_points, "state length must be 2n");
        self.banded_jacobian().to_dense()
    }

    fn tridiagonal_jacobian(&self, _t: f64, state: &DVector<f64>) -> Option<Tridiagonal> {
        debug_assert_eq!(state.len(), 2 * self.region_points, "state length must be 2n");
        Some(self.banded_jacobian())
    }

    fn name(&self) -> &str {
        "Two-Region Diffusion"
    }

    fn description(&self) -> Option<&str> {
        Some("1D diffusion across two regions coupled by flux continuity and linear partitioning")
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::boundary::{BoundaryCondition, BoundarySide};
    use approx::assert_relative_eq;

    fn pair(left: BoundaryCondition, right: BoundaryCondition) -> BoundaryPair {
        BoundaryPair { left, right }
    }

    fn zero_flux() -> BoundaryPair {
        pair(
            BoundaryCondition::neumann(0.0, BoundarySide::Left).unwrap(),
            BoundaryCondition::neumann(0.0, BoundarySide::Right).unwrap(),
        )
    }

    fn model(n: usize, a: f64, boundaries: BoundaryPair) -> TwoRegionDiffusion {
        let parameters = Parameters::new(2.0, 1.0, 1.0, 1.0, a, n, 1.0).unwrap();
        TwoRegionDiffusion::from_parameters(&parameters, boundaries)
    }

    fn finite_difference_jacobian(model: &TwoRegionDiffusion, state: &DVector<f64>) -> DMatrix<f64> {
        let size = state.len();
        let mut jacobian = DMatrix::zeros(size, size);

        for j in 0..size {
            let mut plus = state.clone();
            let mut minus = state.clone();
            plus[j] += 1e-4;
            minus[j] -= 1e-4;

            let column = (model.compute_physics(0.0, &plus) - model.compute_physics(0.0, &minus)) / 2e-4;
            jacobian.set_column(j, &column);
        }

        jacobian
    }

    // ======================================== Stencils ========================================

    #[test]
    fn test_uniform_state_is_equilibrium() {
        let model = model(6, 3.0, zero_flux());
        let state = DVector::from_element(12, 0.42);

        let rate = model.compute_physics(0.0, &state);

        for value in rate.iter() {
            assert!(value.abs() < 1e-10, "non-zero rate {value}");
        }
    }

    #[test]
    fn test_interior_stencil_and_time_scaling() {
        // D1 = 2, D2 = 1, L1 = L2 = 1, a = 1 → a1 = 2, a2 = 2, h = 0.25
        let model = model(4, 1.0, zero_flux());
        let state = DVector::from_vec(vec![0.0, 1.0, 4.0, 9.0, 0.0, 1.0, 3.0, 6.0]);

        let d2c = model.second_derivative(&state);
        let rate = model.compute_physics(0.0, &state);

        // (0 − 2 + 4) / 0.0625
        assert_relative_eq!(d2c[1], 32.0);
        assert_relative_eq!(rate[1], 64.0);
        // region 2 node 2: (1 − 6 + 6) / 0.0625
        assert_relative_eq!(d2c[6], 16.0);
        assert_relative_eq!(rate[6], 16.0);
    }

    #[test]
    fn test_interface_stencil() {
        let model = model(3, 1.0, zero_flux());
        let a2 = model.coefficients().a2;
        let h2 = model.coefficients().h.powi(2);
        let state = DVector::from_vec(vec![0.2, 0.5, 0.9, 0.3, 0.1, 0.05]);

        let d2c = model.second_derivative(&state);

        let expected_left = (-(2.0 + a2) / (1.0 + a2) * 0.9 + 0.5 + 0.3 / (1.0 + a2)) / h2;
        let expected_right = (0.1 - (1.0 + 2.0 * a2) / (1.0 + a2) * 0.3 + a2 / (1.0 + a2) * 0.9) / h2;

        assert_relative_eq!(d2c[2], expected_left, max_relative = 1e-12);
        assert_relative_eq!(d2c[3], expected_right, max_relative = 1e-12);
    }

    #[test]
    fn test_interface_value_matches_stencil() {
        let model = model(3, 4.0, zero_flux());
        let state = DVector::from_vec(vec![0.2, 0.5, 0.9, 0.3, 0.1, 0.05]);
        let h2 = model.coefficients().h.powi(2);

        let u = model.interface_value(&state);
        let d2c = model.second_derivative(&state);

        // both interface rows are second differences against u*
        assert_relative_eq!(d2c[2], (state[1] - 2.0 * state[2] + u) / h2, max_relative = 1e-12);
        assert_relative_eq!(d2c[3], (u - 2.0 * state[3] + state[4]) / h2, max_relative = 1e-12);
    }

    #[test]
    fn test_minimal_grid() {
        let model = model(2, 2.0, zero_flux());
        let state = DVector::from_vec(vec![1.0, 0.5, 0.25, 0.0]);

        let rate = model.compute_physics(0.0, &state);

        assert_eq!(rate.len(), 4);
        assert!(rate.iter().all(|r| r.is_finite()));
        // left Neumann: a1·(2·0.5 − 2·1.0)/h² with a1 = 2, h = 0.5
        assert_relative_eq!(rate[0], -8.0);
    }

    #[test]
    fn test_zero_flux_conserves_weighted_mass() {
        let a = 7.0;
        let n = 5;
        let model = model(n, a, zero_flux());
        let state = DVector::from_vec(vec![1.0, 0.8, 0.3, 0.6, 0.2, 0.0, 0.4, 0.9, 0.1, 0.05]);

        let rate = model.compute_physics(0.0, &state);

        // half weight on the exterior node of each region
        let region1: f64 = (0..n).map(|i| if i == 0 { 0.5 * rate[i] } else { rate[i] }).sum();
        let region2: f64 = (0..n)
            .map(|i| if i == n - 1 { 0.5 * rate[n + i] } else { rate[n + i] })
            .sum();

        // L1 = L2 = 1
        assert!((region1 + a * region2).abs() < 1e-10);
    }

    // ======================================== Boundaries =======================================

    #[test]
    fn test_dirichlet_pins_local_copy_only() {
        let boundaries = pair(
            BoundaryCondition::dirichlet(0.5, BoundarySide::Left).unwrap(),
            BoundaryCondition::neumann(0.0, BoundarySide::Right).unwrap(),
        );
        let model = model(3, 1.0, boundaries);
        let state = DVector::from_vec(vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);

        let d2c = model.second_derivative(&state);

        assert_eq!(state, DVector::zeros(6));
        assert_eq!(d2c[0], 0.0);
        // neighbor sees the pinned 0.5: (0.5 − 0 + 0) / h²
        assert_relative_eq!(d2c[1], 0.5 * 9.0, max_relative = 1e-12);
    }

    #[test]
    fn test_pin_boundaries() {
        let boundaries = pair(
            BoundaryCondition::neumann(0.0, BoundarySide::Left).unwrap(),
            BoundaryCondition::dirichlet(6.0, BoundarySide::Right).unwrap(),
        );
        // a = 3, c_max = 1 → pinned value 2
        let model = model(2, 3.0, boundaries);
        let mut state = DVector::from_vec(vec![1.0, 1.0, 0.0, 0.0]);

        assert_eq!(model.pin_boundaries(&mut state), 1);
        assert_relative_eq!(state[3], 2.0);
        assert_eq!(model.pin_boundaries(&mut state), 0);
    }

    // ========================================= Jacobian ========================================

    #[test]
    fn test_jacobian_matches_finite_differences() {
        let boundaries = pair(
            BoundaryCondition::neumann(0.3, BoundarySide::Left).unwrap(),
            BoundaryCondition::neumann(-0.2, BoundarySide::Right).unwrap(),
        );
        let model = model(5, 2.5, boundaries);
        let state = DVector::from_fn(10, |i, _| 0.1 * i as f64 + 0.05 * (i % 3) as f64);

        let exact = model.jacobian(0.0, &state);
        let approximate = finite_difference_jacobian(&model, &state);

        for i in 0..10 {
            for j in 0..10 {
                assert_relative_eq!(exact[(i, j)], approximate[(i, j)], epsilon = 1e-6, max_relative = 1e-6);
            }
        }
    }

    #[test]
    fn test_jacobian_with_dirichlet_matches_finite_differences() {
        let boundaries = pair(
            BoundaryCondition::dirichlet(0.8, BoundarySide::Left).unwrap(),
            BoundaryCondition::dirichlet(0.1, BoundarySide::Right).unwrap(),
        );
        let model = model(4, 1.5, boundaries);
        let state = DVector::from_element(8, 0.25);

        let exact = model.jacobian(0.0, &state);
        let approximate = finite_difference_jacobian(&model, &state);

        assert!(exact.row(0).iter().all(|v| *v == 0.0));
        assert!(exact.column(7).iter().all(|v| *v == 0.0));
        for i in 0..8 {
            for j in 0..8 {
                assert_relative_eq!(exact[(i, j)], approximate[(i, j)], epsilon = 1e-6, max_relative = 1e-6);
            }
        }
    }

    #[test]
    fn test_banded_jacobian_matches_dense() {
        let boundaries = pair(
            BoundaryCondition::dirichlet(0.5, BoundarySide::Left).unwrap(),
            BoundaryCondition::neumann(0.4, BoundarySide::Right).unwrap(),
        );
        let model = model(6, 3.0, boundaries);
        let state = DVector::from_element(12, 0.3);

        let banded = model.tridiagonal_jacobian(0.0, &state).unwrap();
        let dense = model.jacobian(0.0, &state);

        assert_eq!(banded.len(), 12);
        for i in 0..12 {
            for j in 0..12 {
                assert_eq!(banded.get(i, j), dense[(i, j)]);
            }
        }
        // interface entries sit on the off-diagonals
        assert!(banded.get(5, 6) > 0.0);
        assert!(banded.get(6, 5) > 0.0);
        // pinned column removed from the neighbour row
        assert_eq!(banded.get(1, 0), 0.0);
    }

    #[test]
    fn test_banded_jacobian_applies_operator() {
        // affine operator: f(y) − f(0) = J·y
        let boundaries = pair(
            BoundaryCondition::neumann(0.0, BoundarySide::Left).unwrap(),
            BoundaryCondition::neumann(0.0, BoundarySide::Right).unwrap(),
        );
        let model = model(5, 2.0, boundaries);
        let state = DVector::from_fn(10, |i, _| (0.7 * i as f64).cos());

        let rate = model.compute_physics(0.0, &state);
        let product = model.banded_jacobian().mul_vector(&state);

        for (a, b) in rate.iter().zip(product.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-9, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_metadata() {
        let model = model(3, 1.0, zero_flux());
        assert_eq!(model.points(), 6);
        assert_eq!(model.region_points(), 3);
        assert_eq!(model.name(), "Two-Region Diffusion");
        assert!(model.description().is_some());
    }
}
