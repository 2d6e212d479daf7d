//! Dimensionless normalization
//!
//! Converts physical inputs into the well-scaled quantities the two-region
//! operator works with, and back:
//!
//! | Quantity        | Physical → dimensionless      | Dimensionless → physical |
//! |-----------------|-------------------------------|--------------------------|
//! | region-1 conc.  | `c1 / c_max`                  | `u1 · c_max`             |
//! | region-2 conc.  | `c2 / (a · c_max)`            | `u2 · a · c_max`         |
//! | time            | `t · D2 / L2²`                | `T · L2² / D2`           |
//! | space (region 1)| `x / L1 ∈ [-1, 0]`            | grid `[-1, -h]`          |
//! | space (region 2)| `x / L2 ∈ [0, 1]`             | grid `[h, 1]`            |

use nalgebra::DVector;

use crate::error::{Result, TransportError};
use crate::physics::parameters::{DimensionlessCoefficients, Parameters};

/// Scale the initial condition by its region-1 maximum
///
/// Returns `max(c1_initial)`, which must be strictly positive.
///
/// # Example
///
/// ```rust
/// use transdiff_rs::physics::initial_scale;
///
/// assert_eq!(initial_scale(&[0.2, 0.8, 0.5]).unwrap(), 0.8);
/// assert!(initial_scale(&[0.0, 0.0]).is_err());
/// ```
pub fn initial_scale(c1_initial: &[f64]) -> Result<f64> {
    check_profile("c1_initial", c1_initial)?;

    let c_max = c1_initial.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if c_max <= 0.0 {
        return Err(TransportError::initial(
            "c1_initial",
            format!("maximum must be positive to normalize, got {c_max}"),
        ));
    }

    Ok(c_max)
}

fn check_profile(field: &'static str, profile: &[f64]) -> Result<()> {
    if profile.is_empty() {
        return Err(TransportError::initial(field, "profile is empty"));
    }

    if let Some((index, value)) = profile
        .iter()
        .enumerate()
        .find(|(_, value)| !value.is_finite() || **value < 0.0)
    {
        return Err(TransportError::initial(
            field,
            format!("entry {index} is {value}; concentrations must be finite and non-negative"),
        ));
    }

    Ok(())
}

/// Physical ↔ dimensionless conversions for one solve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    parameters: Parameters,
}

impl Normalizer {
    /// Create a normalizer bound to validated parameters
    pub fn new(parameters: Parameters) -> Self {
        Self { parameters }
    }

    /// Bound parameters
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Dimensionless coefficients (a1, a2, h)
    pub fn coefficients(&self) -> DimensionlessCoefficients {
        self.parameters.coefficients()
    }

    /// Build the dimensionless initial state `[c1 / c_max, c2 / (a·c_max)]`
    ///
    /// # Errors
    ///
    /// `InvalidInitialCondition` when a profile does not have `n` entries or
    /// holds a negative / non-finite value.
    pub fn normalize_initial_conditions(&self, c1_initial: &[f64], c2_initial: &[f64]) -> Result<DVector<f64>> {
        let n = self.parameters.points();

        for (field, profile) in [("c1_initial", c1_initial), ("c2_initial", c2_initial)] {
            if profile.len() != n {
                return Err(TransportError::initial(
                    field,
                    format!("expected {n} entries (one per grid point), got {}", profile.len()),
                ));
            }
            check_profile(field, profile)?;
        }

        let c_max = self.parameters.c_max();
        let a = self.parameters.partition_coefficient();

        Ok(DVector::from_iterator(
            2 * n,
            c1_initial
                .iter()
                .map(|c| c / c_max)
                .chain(c2_initial.iter().map(|c| c / a / c_max)),
        ))
    }

    /// Rescale a dimensionless state back to physical concentrations
    ///
    /// Inverse of [`Normalizer::normalize_initial_conditions`].
    pub fn denormalize(&self, state: &DVector<f64>) -> (DVector<f64>, DVector<f64>) {
        let n = self.parameters.points();
        let c_max = self.parameters.c_max();
        let a = self.parameters.partition_coefficient();

        let c1 = state.rows(0, n).map(|u| u * c_max);
        let c2 = state.rows(n, n).map(|u| u * a * c_max);

        (c1, c2)
    }

    /// Physical time → dimensionless time `t·D2/L2²`
    pub fn to_dimensionless_time(&self, t: f64) -> f64 {
        let l2 = self.parameters.len_region2();
        t * self.parameters.diffusion_coefficient2() / (l2 * l2)
    }

    /// Dimensionless time → physical time `T·L2²/D2`
    pub fn to_physical_time(&self, t_dim: f64) -> f64 {
        let l2 = self.parameters.len_region2();
        t_dim * l2 * l2 / self.parameters.diffusion_coefficient2()
    }

    /// Validate a physical time window and convert it to dimensionless form
    ///
    /// # Errors
    ///
    /// `InvalidParameterValue` when `t_start < 0` or `t_end <= t_start`.
    pub fn time_window(&self, t_start: f64, t_end: f64) -> Result<(f64, f64)> {
        if !t_start.is_finite() || t_start < 0.0 {
            return Err(TransportError::parameter("t_start", t_start, "must be finite and non-negative"));
        }
        if !t_end.is_finite() || t_end <= t_start {
            return Err(TransportError::parameter(
                "t_end",
                t_end,
                format!("must be finite and greater than t_start ({t_start})"),
            ));
        }

        Ok((self.to_dimensionless_time(t_start), self.to_dimensionless_time(t_end)))
    }

    /// Dimensionless grids `x1 = linspace(-1, -h, n)`, `x2 = linspace(h, 1, n)`
    pub fn grids(&self) -> (DVector<f64>, DVector<f64>) {
        let n = self.parameters.points();
        let h = self.coefficients().h;

        (linspace(-1.0, -h, n), linspace(h, 1.0, n))
    }
}

/// `n` evenly spaced points from `start` to `end` inclusive
fn linspace(start: f64, end: f64, n: usize) -> DVector<f64> {
    if n == 1 {
        return DVector::from_element(1, start);
    }
    let step = (end - start) / (n - 1) as f64;
    DVector::from_fn(n, |i, _| if i == n - 1 { end } else { start + step * i as f64 })
}

// =================================================================================================
// Tests
// =================================================================================================
