//! Physical parameters and derived dimensionless coefficients
//!
//! # Scaling
//!
//! Region 1 occupies `[-L1, 0]`, region 2 occupies `[0, L2]`. Each region is
//! mapped onto a unit interval with its own length, time is scaled with the
//! region-2 diffusion time `L2²/D2`, and concentrations with `c_max`
//! (region 2 additionally with the partition coefficient `a`):
//!
//! ```text
//! ∂c1/∂T = a1 · ∂²c1/∂ξ²        a1 = (D1/D2)·(L2/L1)²
//! ∂c2/∂T =      ∂²c2/∂ξ²
//! ∂c2/∂ξ = a2 · ∂c1/∂ξ  at ξ=0   a2 = (D1/D2)·(L2/L1)/a
//! ```

use crate::error::{Result, TransportError};

/// Validated physical parameters of one solve
///
/// Immutable once constructed; all checks run in [`Parameters::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    diffusion_coefficient1: f64,
    diffusion_coefficient2: f64,
    len_region1: f64,
    len_region2: f64,
    partition_coefficient: f64,
    points: usize,
    c_max: f64,
}

impl Parameters {
    /// Validate and build the parameter set
    ///
    /// # Arguments
    ///
    /// * `diffusion_coefficient1` - D1 > 0 \[m²/s\]
    /// * `diffusion_coefficient2` - D2 > 0 \[m²/s\]
    /// * `len_region1` - L1 > 0 \[m\]
    /// * `len_region2` - L2 > 0 \[m\]
    /// * `a` - partition coefficient, a ≥ 1 (swap the regions when a < 1)
    /// * `n` - grid points per region, n ≥ 2
    /// * `c_max` - concentration scale, > 0
    ///
    /// # Example
    ///
    /// ```rust
    /// use transdiff_rs::physics::Parameters;
    ///
    /// let parameters = Parameters::new(1e-5, 1e-12, 1e-1, 1e-3, 1e5, 50, 1.0).unwrap();
    /// assert_eq!(parameters.points(), 50);
    /// ```
    pub fn new(
        diffusion_coefficient1: f64,
        diffusion_coefficient2: f64,
        len_region1: f64,
        len_region2: f64,
        a: f64,
        n: usize,
        c_max: f64,
    ) -> Result<Self> {
        positive("diffusion_coefficient1", diffusion_coefficient1)?;
        positive("diffusion_coefficient2", diffusion_coefficient2)?;
        positive("len_region1", len_region1)?;
        positive("len_region2", len_region2)?;

        if !a.is_finite() || a < 1.0 {
            return Err(TransportError::parameter(
                "a",
                a,
                "partition coefficient must be finite and >= 1 (swap the regions when a < 1)",
            ));
        }

        Self::check_points(n)?;

        if !c_max.is_finite() || c_max <= 0.0 {
            return Err(TransportError::initial(
                "c_max",
                format!("normalization constant must be positive and finite, got {c_max}"),
            ));
        }

        Ok(Self {
            diffusion_coefficient1,
            diffusion_coefficient2,
            len_region1,
            len_region2,
            partition_coefficient: a,
            points: n,
            c_max,
        })
    }

    /// Check the grid size on its own, before anything is sized by it
    pub fn check_points(n: usize) -> Result<()> {
        if n < 2 {
            return Err(TransportError::parameter(
                "n",
                n as f64,
                "at least 2 grid points per region are required",
            ));
        }
        Ok(())
    }

    /// D1 \[m²/s\]
    pub fn diffusion_coefficient1(&self) -> f64 {
        self.diffusion_coefficient1
    }

    /// D2 \[m²/s\]
    pub fn diffusion_coefficient2(&self) -> f64 {
        self.diffusion_coefficient2
    }

    /// L1 \[m\]
    pub fn len_region1(&self) -> f64 {
        self.len_region1
    }

    /// L2 \[m\]
    pub fn len_region2(&self) -> f64 {
        self.len_region2
    }

    /// Partition coefficient a
    pub fn partition_coefficient(&self) -> f64 {
        self.partition_coefficient
    }

    /// Grid points per region
    pub fn points(&self) -> usize {
        self.points
    }

    /// Concentration scale
    pub fn c_max(&self) -> f64 {
        self.c_max
    }

    /// Derive the dimensionless coefficients
    pub fn coefficients(&self) -> DimensionlessCoefficients {
        let diffusivity_ratio = self.diffusion_coefficient1 / self.diffusion_coefficient2;
        let length_ratio = self.len_region2 / self.len_region1;

        DimensionlessCoefficients {
            a1: diffusivity_ratio * length_ratio * length_ratio,
            a2: diffusivity_ratio * length_ratio / self.partition_coefficient,
            h: 1.0 / self.points as f64,
        }
    }
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(TransportError::parameter(name, value, "must be positive and finite"));
    }
    Ok(())
}

/// Coefficients of the dimensionless two-region system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionlessCoefficients {
    /// Region-1 diffusion number `(D1/D2)·(L2/L1)²`
    pub a1: f64,
    /// Interface coupling ratio `(D1/D2)·(L2/L1)/a`
    pub a2: f64,
    /// Grid spacing `1/n`
    pub h: f64,
}

// =================================================================================================
// Tests
// =================================================================================================
