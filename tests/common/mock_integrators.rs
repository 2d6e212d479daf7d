//! Mock integrators and models for testing
//!
//! The integrators plug into `MethodOfLines` through the `Integrator` trait;
//! the model has a known analytical solution.

use nalgebra::DVector;
use transdiff_rs::physics::PhysicalModel;
use transdiff_rs::solver::{IntegrationError, Integrator, SimulationResult};

// =================================================================================================
// Fixed-step forward Euler
// =================================================================================================

/// Explicit Euler with a fixed number of steps
///
/// Only stable for `dt` below the diffusive limit `h² / (2·max(a1, 1))`.
pub struct FixedStepEuler {
    pub steps: usize,
}

impl Integrator for FixedStepEuler {
    fn integrate(
        &self,
        model: &dyn PhysicalModel,
        span: (f64, f64),
        initial: &DVector<f64>,
    ) -> Result<SimulationResult, IntegrationError> {
        let dt = (span.1 - span.0) / self.steps as f64;
        let mut y = initial.clone();
        let mut time_points = vec![span.0];
        let mut trajectory = vec![y.clone()];

        for step in 1..=self.steps {
            let t = span.0 + (step - 1) as f64 * dt;
            y += model.compute_physics(t, &y) * dt;

            time_points.push(if step == self.steps { span.1 } else { span.0 + step as f64 * dt });
            trajectory.push(y.clone());
        }

        Ok(SimulationResult::new(time_points, trajectory, y))
    }

    fn name(&self) -> &str {
        "Fixed-step Euler"
    }
}

// =================================================================================================
// Unreachable
// =================================================================================================

/// Panics when called; proves validation fails before integration
pub struct Unreachable;

impl Integrator for Unreachable {
    fn integrate(
        &self,
        _model: &dyn PhysicalModel,
        _span: (f64, f64),
        _initial: &DVector<f64>,
    ) -> Result<SimulationResult, IntegrationError> {
        panic!("integration must not start for an invalid scenario");
    }

    fn name(&self) -> &str {
        "Unreachable"
    }
}

// =================================================================================================
// Exponential Decay: dy/dt = -k*y
// =================================================================================================

/// Exponential decay model: dy/dt = -k*y
///
/// Analytical solution: y(t) = y₀ * exp(-k*t)
pub struct ExponentialDecay {
    pub points: usize,
    pub decay_rate: f64,
}

impl ExponentialDecay {
    pub fn new(points: usize, decay_rate: f64) -> Self {
        Self { points, decay_rate }
    }

    /// Compute analytical solution at time t
    pub fn analytical_solution(&self, t: f64, y0: f64) -> f64 {
        y0 * (-self.decay_rate * t).exp()
    }
}

impl PhysicalModel for ExponentialDecay {
    fn points(&self) -> usize {
        self.points
    }

    fn compute_physics(&self, _t: f64, state: &DVector<f64>) -> DVector<f64> {
        state * -self.decay_rate
    }

    fn name(&self) -> &str {
        "Exponential Decay"
    }
}
