//! Error types
//!
//! All validation happens eagerly, before any integration attempt, so every
//! failure below is reported without producing partial results.
//!
//! | Variant                   | Raised by                                   |
//! |---------------------------|---------------------------------------------|
//! | `InvalidConfiguration`    | boundary applier, solver configuration      |
//! | `InvalidParameterValue`   | parameter validation                        |
//! | `InvalidInitialCondition` | normalization of the initial profiles       |
//! | `InvalidBoundaryValue`    | boundary condition construction             |
//! | `IntegrationFailure`      | the time integrator (surfaced unchanged)    |

use thiserror::Error;

use crate::solver::IntegrationError;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, TransportError>;

/// Failure taxonomy of a transmission-diffusion solve
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    /// Wrong number of boundary values/types, unknown boundary type,
    /// or an invalid solver configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A physical or numerical parameter is out of its admissible range.
    #[error("invalid value for parameter '{parameter}' ({value}): {reason}")]
    InvalidParameterValue {
        parameter: &'static str,
        value: f64,
        reason: String,
    },

    /// Initial concentration profile is negative, wrongly sized or has no
    /// positive maximum.
    #[error("invalid initial condition for '{field}': {reason}")]
    InvalidInitialCondition {
        field: &'static str,
        reason: String,
    },

    /// Boundary value is not a finite number, or a Dirichlet value is negative.
    #[error("invalid boundary value {value} at boundary {index}: {reason}")]
    InvalidBoundaryValue {
        value: f64,
        index: usize,
        reason: String,
    },

    /// Failure reported by the time integrator.
    #[error("integration failed: {0}")]
    IntegrationFailure(#[from] IntegrationError),
}

impl TransportError {
    pub(crate) fn parameter(parameter: &'static str, value: f64, reason: impl Into<String>) -> Self {
        Self::InvalidParameterValue {
            parameter,
            value,
            reason: reason.into(),
        }
    }

    pub(crate) fn initial(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInitialCondition {
            field,
            reason: reason.into(),
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
