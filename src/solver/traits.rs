//! Integrator traits and types
//!
//! # Design Philosophy
//!
//! The integrator is a collaborator of the discretized model, consumed
//! through a narrow interface:
//! - `Integrator` trait: advances a [`PhysicalModel`] over a time span
//! - `SolverConfiguration`: tolerances and step controls (HOW to integrate)
//! - `SimulationResult`: accepted time points, trajectory and metadata
//! - `IntegrationError`: why an integration could not complete
//!
//! # Stability Guarantee
//!
//! - `Integrator` trait: the orchestrator is generic over it, so any
//!   implementation can be swapped in without touching the discretizer
//! - Core structures: fields won't be removed

use std::collections::HashMap;

use nalgebra::DVector;
use thiserror::Error;

use crate::physics::PhysicalModel;

// =================================================================================================
// Integration errors
// =================================================================================================

/// Failure reported by a time integrator
///
/// Surfaced unchanged to the caller as
/// [`TransportError::IntegrationFailure`](crate::error::TransportError::IntegrationFailure).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrationError {
    /// The step budget ran out before reaching the end of the span
    #[error("maximum number of steps ({max_steps}) exceeded at t = {t:e}")]
    MaxStepsExceeded { max_steps: usize, t: f64 },

    /// The error controller asked for a step below floating-point resolution
    #[error("step size {step_size:e} underflowed at t = {t:e}; the problem may be too stiff for the tolerances")]
    StepSizeUnderflow { t: f64, step_size: f64 },

    /// NaN or infinity in the state or its derivative
    #[error("non-finite value at index {index} (step {step}, t = {t:e}); this indicates numerical instability")]
    NonFiniteState { t: f64, step: usize, index: usize },

    /// `I − γ·h·J` could not be factorized
    #[error("iteration matrix is singular at t = {t:e} (step size {step_size:e})")]
    SingularMatrix { t: f64, step_size: f64 },

    /// Time span is not finite or not increasing
    #[error("invalid time span [{t_start}, {t_end}]: bounds must be finite with t_end > t_start")]
    InvalidSpan { t_start: f64, t_end: f64 },

    /// Initial state length differs from the model dimension
    #[error("initial state has {actual} entries but the model expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Tolerances or step bounds are not usable
    #[error("invalid solver configuration: {0}")]
    InvalidConfiguration(String),
}

// =================================================================================================
// Solver configuration
// =================================================================================================

/// Configuration of an adaptive integrator
///
/// All values are expressed in the integrator's time unit (dimensionless
/// time for the two-region problem).
///
/// # Examples
///
/// ```rust
/// use transdiff_rs::solver::SolverConfiguration;
///
/// let config = SolverConfiguration::default()
///     .with_tolerances(1e-8, 1e-12)
///     .with_max_step(10.0);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.max_step, Some(10.0));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfiguration {
    /// Relative tolerance
    pub rtol: f64,

    /// Absolute tolerance
    pub atol: f64,

    /// First trial step; chosen from the initial slope when `None`
    pub first_step: Option<f64>,

    /// Upper bound on the step size
    pub max_step: Option<f64>,

    /// Step attempts (accepted and rejected) before giving up
    pub max_steps: usize,
}

impl Default for SolverConfiguration {
    fn default() -> Self {
        Self {
            rtol: 1e-6,
            atol: 1e-10,
            first_step: None,
            max_step: None,
            max_steps: 500_000,
        }
    }
}

impl SolverConfiguration {
    /// Default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set relative and absolute tolerances
    pub fn with_tolerances(mut self, rtol: f64, atol: f64) -> Self {
        self.rtol = rtol;
        self.atol = atol;
        self
    }

    /// Fix the first trial step
    pub fn with_first_step(mut self, first_step: f64) -> Self {
        self.first_step = Some(first_step);
        self
    }

    /// Bound the step size from above
    pub fn with_max_step(mut self, max_step: f64) -> Self {
        self.max_step = Some(max_step);
        self
    }

    /// Set the step budget
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), IntegrationError> {
        if !self.rtol.is_finite() || self.rtol <= 0.0 {
            return Err(IntegrationError::InvalidConfiguration(format!(
                "rtol must be finite and > 0, got {}",
                self.rtol
            )));
        }
        if !self.atol.is_finite() || self.atol <= 0.0 {
            return Err(IntegrationError::InvalidConfiguration(format!(
                "atol must be finite and > 0, got {}",
                self.atol
            )));
        }
        for (name, bound) in [("first_step", self.first_step), ("max_step", self.max_step)] {
            if let Some(value) = bound
                && (!value.is_finite() || value <= 0.0)
            {
                return Err(IntegrationError::InvalidConfiguration(format!(
                    "{name} must be finite and > 0, got {value}"
                )));
            }
        }
        if self.max_steps == 0 {
            return Err(IntegrationError::InvalidConfiguration(
                "max_steps must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =================================================================================================
// Simulation result
// =================================================================================================

/// Output of one integration
///
/// `time_points[0]` is the start of the span and `time_points.last()` its end;
/// `state_trajectory[i]` is the state at `time_points[i]`.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationResult {
    /// Accepted time points, ascending
    pub time_points: Vec<f64>,

    /// State at every time point
    pub state_trajectory: Vec<DVector<f64>>,

    /// State at the last time point
    pub final_state: DVector<f64>,

    /// Solver statistics and free-form annotations
    pub metadata: HashMap<String, String>,
}

impl SimulationResult {
    /// Build a result from a trajectory
    pub fn new(time_points: Vec<f64>, state_trajectory: Vec<DVector<f64>>, final_state: DVector<f64>) -> Self {
        Self {
            time_points,
            state_trajectory,
            final_state,
            metadata: HashMap::new(),
        }
    }

    /// Attach a metadata entry
    pub fn add_metadata(&mut self, key: impl Into<String>, value: impl ToString) {
        self.metadata.insert(key.into(), value.to_string());
    }

    /// Number of stored time points
    pub fn len(&self) -> usize {
        self.time_points.len()
    }

    /// True when no time point was stored
    pub fn is_empty(&self) -> bool {
        self.time_points.is_empty()
    }
}

// =================================================================================================
// Integrator trait
// =================================================================================================

/// Time integrator for a semi-discrete model `dy/dt = f(t, y)`
///
/// # Contract
///
/// - the first reported time point is `span.0`, the last is exactly `span.1`
/// - a failure is reported once, without internal retry
/// - the integrator never mutates the model
///
/// # Example
///
/// ```rust
/// use nalgebra::DVector;
/// use transdiff_rs::physics::PhysicalModel;
/// use transdiff_rs::solver::{IntegrationError, Integrator, SimulationResult};
///
/// /// Reports only the two endpoints, holding the state constant
/// struct Frozen;
///
/// impl Integrator for Frozen {
///     fn integrate(
///         &self,
///         _model: &dyn PhysicalModel,
///         span: (f64, f64),
///         initial: &DVector<f64>,
///     ) -> Result<SimulationResult, IntegrationError> {
///         Ok(SimulationResult::new(
///             vec![span.0, span.1],
///             vec![initial.clone(), initial.clone()],
///             initial.clone(),
///         ))
///     }
///
///     fn name(&self) -> &str {
///         "Frozen"
///     }
/// }
/// ```
pub trait Integrator {
    /// Advance `initial` from `span.0` to `span.1`
    fn integrate(
        &self,
        model: &dyn PhysicalModel,
        span: (f64, f64),
        initial: &DVector<f64>,
    ) -> Result<SimulationResult, IntegrationError>;

    /// Name of the method (used in metadata and logging)
    fn name(&self) -> &str;

    /// Check the integrator's own settings before any integration attempt
    fn validate(&self) -> Result<(), IntegrationError> {
        Ok(())
    }
}

// =================================================================================================
// Tests
// =================================================================================================
