//! Tridiagonal matrices and their factorization
//!
//! Second-difference operators on a 1-D grid couple each node only with its
//! two neighbours, so their Jacobian is tridiagonal. Storing the three
//! diagonals keeps memory at O(n), and the Thomas algorithm (Gaussian
//! elimination without pivoting, specialized to three bands) factors and
//! solves in O(n).
//!
//! # Storage
//!
//! For a matrix `M` of size `len`:
//!
//! ```text
//! lower[i] = M[i, i-1]    (lower[0] = 0)
//! diag[i]  = M[i, i]
//! upper[i] = M[i, i+1]    (upper[len-1] = 0)
//! ```
//!
//! # Stability
//!
//! Elimination without pivoting is stable for diagonally dominant matrices.
//! Iteration matrices `I − γ·h·J` built from a diffusion Jacobian are strictly
//! diagonally dominant for every `h > 0`; a vanishing pivot is still reported
//! instead of dividing by it.

use nalgebra::{DMatrix, DVector};

/// Pivot magnitude below which a factorization is declared singular
const PIVOT_THRESHOLD: f64 = 1e-300;

/// Square tridiagonal matrix stored by diagonals
#[derive(Debug, Clone, PartialEq)]
pub struct Tridiagonal {
    lower: Vec<f64>,
    diag: Vec<f64>,
    upper: Vec<f64>,
}

impl Tridiagonal {
    /// Zero matrix of size `len`
    pub fn zeros(len: usize) -> Self {
        Self {
            lower: vec![0.0; len],
            diag: vec![0.0; len],
            upper: vec![0.0; len],
        }
    }

    /// Matrix size
    pub fn len(&self) -> usize {
        self.diag.len()
    }

    /// `true` for the 0×0 matrix
    pub fn is_empty(&self) -> bool {
        self.diag.is_empty()
    }

    /// Entry `(row, column)`; zero outside the three bands
    pub fn get(&self, row: usize, column: usize) -> f64 {
        if row == column {
            self.diag[row]
        } else if column + 1 == row {
            self.lower[row]
        } else if row + 1 == column {
            self.upper[row]
        } else {
            0.0
        }
    }

    /// Set entry `(row, column)`
    ///
    /// # Panics
    ///
    /// If `(row, column)` lies outside the three bands.
    pub fn set(&mut self, row: usize, column: usize, value: f64) {
        if row == column {
            self.diag[row] = value;
        } else if column + 1 == row {
            self.lower[row] = value;
        } else if row + 1 == column {
            self.upper[row] = value;
        } else {
            panic!("entry ({row}, {column}) is outside the tridiagonal band");
        }
    }

    /// Zero the band entries of `column`
    pub fn clear_column(&mut self, column: usize) {
        self.diag[column] = 0.0;
        if column > 0 {
            self.upper[column - 1] = 0.0;
        }
        if column + 1 < self.len() {
            self.lower[column + 1] = 0.0;
        }
    }

    /// `I + factor·self`
    pub fn scaled_identity_shift(&self, factor: f64) -> Self {
        Self {
            lower: self.lower.iter().map(|v| factor * v).collect(),
            diag: self.diag.iter().map(|v| 1.0 + factor * v).collect(),
            upper: self.upper.iter().map(|v| factor * v).collect(),
        }
    }

    /// Matrix-vector product
    pub fn mul_vector(&self, x: &DVector<f64>) -> DVector<f64> {
        let len = self.len();
        debug_assert_eq!(x.len(), len, "vector length must match matrix size");

        DVector::from_fn(len, |i, _| {
            let mut value = self.diag[i] * x[i];
            if i > 0 {
                value += self.lower[i] * x[i - 1];
            }
            if i + 1 < len {
                value += self.upper[i] * x[i + 1];
            }
            value
        })
    }

    /// Dense copy, for generic consumers and tests
    pub fn to_dense(&self) -> DMatrix<f64> {
        let len = self.len();
        let mut dense = DMatrix::zeros(len, len);

        for i in 0..len {
            dense[(i, i)] = self.diag[i];
            if i > 0 {
                dense[(i, i - 1)] = self.lower[i];
            }
            if i + 1 < len {
                dense[(i, i + 1)] = self.upper[i];
            }
        }

        dense
    }

    /// LU factorization without pivoting (Thomas forward sweep)
    ///
    /// Returns `None` when a pivot vanishes or is not finite.
    pub fn factor(&self) -> Option<TridiagonalLu> {
        let len = self.len();
        let mut pivots = Vec::with_capacity(len);
        let mut multipliers = vec![0.0; len];

        for i in 0..len {
            let mut pivot = self.diag[i];
            if i > 0 {
                multipliers[i] = self.lower[i] / pivots[i - 1];
                pivot -= multipliers[i] * self.upper[i - 1];
            }

            if !pivot.is_finite() || pivot.abs() < PIVOT_THRESHOLD {
                return None;
            }
            pivots.push(pivot);
        }

        Some(TridiagonalLu {
            multipliers,
            pivots,
            upper: self.upper.clone(),
        })
    }
}

/// Factorization `M = L·U` of a [`Tridiagonal`] matrix
///
/// `L` is unit lower bidiagonal (`multipliers` below the diagonal), `U` upper
/// bidiagonal (`pivots` on the diagonal, the original super-diagonal above).
#[derive(Debug, Clone, PartialEq)]
pub struct TridiagonalLu {
    multipliers: Vec<f64>,
    pivots: Vec<f64>,
    upper: Vec<f64>,
}

impl TridiagonalLu {
    /// Solve `M·x = rhs` in O(n)
    pub fn solve(&self, rhs: &DVector<f64>) -> DVector<f64> {
        let len = self.pivots.len();
        debug_assert_eq!(rhs.len(), len, "right-hand side length must match matrix size");

        let mut x = rhs.clone();

        // forward sweep: L·y = rhs
        for i in 1..len {
            x[i] -= self.multipliers[i] * x[i - 1];
        }

        // back substitution: U·x = y
        for i in (0..len).rev() {
            if i + 1 < len {
                x[i] -= self.upper[i] * x[i + 1];
            }
            x[i] /= self.pivots[i];
        }

        x
    }
}

// =================================================================================================
// Tests
// =================================================================================================
