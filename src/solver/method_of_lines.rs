//! Method-of-lines orchestrator
//!
//! Composes the pieces of a solve:
//!
//! ```text
//! Scenario ──validate──▶ Parameters ──▶ Normalizer ──▶ (a1, a2, h, u₀, T window)
//!                    └──▶ BoundaryConditionApplier ──▶ BoundaryPair
//!                                         │
//!                     TwoRegionDiffusion ◀┘
//!                             │
//!                     Integrator::integrate(model, (T₀, T₁), u₀)
//!                             │
//!                     Solution (x1, x2, c1, c2, t)
//! ```
//!
//! # Output contract
//!
//! - `c1`, `c2` are **normalized** concentrations exactly as integrated:
//!   `c1 / c_max` and `c2 / (a·c_max)`, one column per reported time
//! - `t` is **physical** time, `t[0] = t_start` and `t[last] = t_end`
//! - `x1`, `x2` are the dimensionless grids `[-1, -h]` and `[h, 1]`
//!
//! Use [`Solution::physical_c1`] / [`Solution::physical_c2`] for physical units.

use std::collections::HashMap;

use log::{debug, info};
use nalgebra::{DMatrix, DVector};

use crate::error::{Result, TransportError};
use crate::models::TwoRegionDiffusion;
use crate::physics::{Normalizer, PhysicalModel};
use crate::solver::{Integrator, RosenbrockSolver, Scenario, SimulationResult};

// =================================================================================================
// Solution
// =================================================================================================

/// Result of [`MethodOfLines::solve_pde_system`]
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Region-1 grid, `n` points over `[-1, -h]`
    pub x1: DVector<f64>,

    /// Region-2 grid, `n` points over `[h, 1]`
    pub x2: DVector<f64>,

    /// Normalized region-1 concentrations, `n × T`
    pub c1: DMatrix<f64>,

    /// Normalized region-2 concentrations, `n × T`
    pub c2: DMatrix<f64>,

    /// Physical time points, ascending
    pub t: Vec<f64>,

    /// Integrator statistics and derived coefficients
    pub metadata: HashMap<String, String>,

    normalizer: Normalizer,
}

impl Solution {
    fn from_result(result: SimulationResult, normalizer: Normalizer, span: (f64, f64)) -> Self {
        let n = normalizer.parameters().points();
        let steps = result.len();
        let trajectory = &result.state_trajectory;

        let c1 = DMatrix::from_fn(n, steps, |i, j| trajectory[j][i]);
        let c2 = DMatrix::from_fn(n, steps, |i, j| trajectory[j][n + i]);

        let mut t: Vec<f64> = result
            .time_points
            .iter()
            .map(|&t_dim| normalizer.to_physical_time(t_dim))
            .collect();

        // pin the endpoints against round-off of the time scaling
        if let Some(first) = t.first_mut() {
            *first = span.0;
        }
        if let Some(last) = t.last_mut() {
            *last = span.1;
        }

        let (x1, x2) = normalizer.grids();

        Self {
            x1,
            x2,
            c1,
            c2,
            t,
            metadata: result.metadata,
            normalizer,
        }
    }

    /// Number of reported time points
    pub fn len(&self) -> usize {
        self.t.len()
    }

    /// True when no time point was reported
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Grid points per region
    pub fn points(&self) -> usize {
        self.c1.nrows()
    }

    /// Normalizer used for the solve
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Region-1 concentrations in physical units (`c1 · c_max`)
    pub fn physical_c1(&self) -> DMatrix<f64> {
        let c_max = self.normalizer.parameters().c_max();
        &self.c1 * c_max
    }

    /// Region-2 concentrations in physical units (`c2 · a · c_max`)
    pub fn physical_c2(&self) -> DMatrix<f64> {
        let parameters = self.normalizer.parameters();
        &self.c2 * (parameters.partition_coefficient() * parameters.c_max())
    }

    /// Normalized region-1 profile at the last time point
    pub fn final_c1(&self) -> DVector<f64> {
        self.c1.column(self.c1.ncols() - 1).into_owned()
    }

    /// Normalized region-2 profile at the last time point
    pub fn final_c2(&self) -> DVector<f64> {
        self.c2.column(self.c2.ncols() - 1).into_owned()
    }

    /// Normalized state `[c1, c2]` at time index `index`
    pub fn state(&self, index: usize) -> Option<DVector<f64>> {
        if index >= self.len() {
            return None;
        }

        let n = self.points();
        Some(DVector::from_iterator(
            2 * n,
            self.c1.column(index).iter().chain(self.c2.column(index).iter()).copied(),
        ))
    }
}

// =================================================================================================
// Method of lines
// =================================================================================================

/// Solver orchestrator for the two-region problem
///
/// Generic over the time integrator, so any [`Integrator`] can be swapped in
/// without touching the discretization.
///
/// Stateless between calls: `solve_pde_system` is deterministic and
/// idempotent for a given scenario and integrator.
///
/// # Example
///
/// ```rust
/// use transdiff_rs::solver::{MethodOfLines, Scenario};
///
/// let n = 10;
/// let scenario = Scenario::builder()
///     .diffusion_coefficients(1e-9, 1e-9)
///     .region_lengths(1e-3, 1e-3)
///     .partition_coefficient(2.0)
///     .grid_points(n)
///     .time_span(0.0, 10.0)
///     .initial_conditions(vec![1.0; n], vec![0.0; n])
///     .left_boundary(0.0, "neumann")
///     .right_boundary(0.0, "neumann")
///     .build()
///     .unwrap();
///
/// let solution = MethodOfLines::new(scenario).solve_pde_system().unwrap();
///
/// assert_eq!(solution.t[0], 0.0);
/// assert_eq!(*solution.t.last().unwrap(), 10.0);
/// assert_eq!(solution.c1.nrows(), n);
/// ```
#[derive(Debug, Clone)]
pub struct MethodOfLines<I: Integrator = RosenbrockSolver> {
    scenario: Scenario,
    integrator: I,
}

impl MethodOfLines<RosenbrockSolver> {
    /// Orchestrator with the default Rosenbrock integrator
    pub fn new(scenario: Scenario) -> Self {
        Self::with_integrator(scenario, RosenbrockSolver::default())
    }
}

impl<I: Integrator> MethodOfLines<I> {
    /// Orchestrator with a custom integrator
    pub fn with_integrator(scenario: Scenario, integrator: I) -> Self {
        Self { scenario, integrator }
    }

    /// Problem definition
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Time integrator
    pub fn integrator(&self) -> &I {
        &self.integrator
    }

    /// Solve the two-region diffusion problem
    ///
    /// 1. validate every input (fail fast)
    /// 2. normalize parameters, initial state and time window
    /// 3. build the exterior boundary pair
    /// 4. bind the coefficients and boundaries into the operator
    /// 5. integrate once, without retry
    /// 6. split the trajectory into `c1`/`c2`, build grids, rescale time
    ///
    /// # Errors
    ///
    /// Validation errors before any integration; `IntegrationFailure` from
    /// the integrator, unchanged.
    pub fn solve_pde_system(&self) -> Result<Solution> {
        // ====== Steps 1-3: Validation, normalization, boundaries ======

        self.integrator
            .validate()
            .map_err(|error| TransportError::InvalidConfiguration(error.to_string()))?;

        let prepared = self.scenario.prepare()?;
        let coefficients = prepared.normalizer.coefficients();

        debug!(
            "Dimensionless coefficients: a1 = {:.6e}, a2 = {:.6e}, h = {:.6e}",
            coefficients.a1, coefficients.a2, coefficients.h
        );
        debug!(
            "Dimensionless window: [{:.6e}, {:.6e}]; boundaries: {}, {}",
            prepared.window.0, prepared.window.1, prepared.boundaries.left, prepared.boundaries.right
        );

        // ====== Step 4: Operator ======

        let model = TwoRegionDiffusion::from_parameters(prepared.normalizer.parameters(), prepared.boundaries);

        let mut initial_state = prepared.initial_state;
        model.pin_boundaries(&mut initial_state);

        // ====== Step 5: Integration ======

        info!(
            "Solving {} ({} points per region) with {}",
            model.name(),
            model.region_points(),
            self.integrator.name()
        );

        let mut result = self.integrator.integrate(&model, prepared.window, &initial_state)?;

        info!(
            "{} finished: {} time points, final t = {:.6e}",
            self.integrator.name(),
            result.len(),
            result.time_points.last().copied().unwrap_or(prepared.window.0)
        );

        // ====== Step 6: Output ======

        if result.is_empty() {
            return Err(TransportError::InvalidConfiguration(format!(
                "integrator '{}' returned an empty trajectory",
                self.integrator.name()
            )));
        }

        result.add_metadata("model", model.name());
        result.add_metadata("integrator", self.integrator.name());
        result.add_metadata("a1", coefficients.a1);
        result.add_metadata("a2", coefficients.a2);
        result.add_metadata("h", coefficients.h);
        result.add_metadata("c_max", prepared.normalizer.parameters().c_max());

        Ok(Solution::from_result(
            result,
            prepared.normalizer,
            (self.scenario.t_start, self.scenario.t_end),
        ))
    }
}

// =================================================================================================
// Tests
// =================================================================================================
