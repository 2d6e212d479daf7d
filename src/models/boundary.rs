//! Exterior boundary conditions
//!
//! Defines how the two outer ends of the domain (x = -L1 and x = +L2) are
//! constrained. The interface between the regions is NOT a boundary condition
//! here: it is part of the coupled operator (see `two_region.rs`).
//!
//! # Variants
//!
//! - **Neumann**: prescribed flux, enforced with a ghost-point reflection
//! - **Dirichlet**: prescribed concentration, the boundary node is pinned
//!
//! # Index convention
//!
//! Index 0 is the left boundary (first entry of the state vector), index 1 the
//! right boundary (last entry of the state vector).
//!
//! # Example
//!
//! ```rust
//! use transdiff_rs::models::{BoundaryConditionApplier, BoundaryKind};
//!
//! let applier = BoundaryConditionApplier::new(&[0.0, 0.5], &["Neumann", "dirichlet"]).unwrap();
//! let pair = applier.generate_boundary_conditions().unwrap();
//!
//! assert_eq!(pair.left.kind(), BoundaryKind::Neumann);
//! assert_eq!(pair.right.kind(), BoundaryKind::Dirichlet);
//! assert_eq!(pair.right.index(), 1);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TransportError};
use crate::physics::Parameters;

// =================================================================================================
// Boundary kind and side
// =================================================================================================

/// Kind of exterior boundary condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    /// Prescribed flux dC/dx
    Neumann,
    /// Prescribed concentration C
    Dirichlet,
}

impl BoundaryKind {
    /// Symbol used when displaying a condition
    pub fn symbol(&self) -> &'static str {
        match self {
            BoundaryKind::Neumann => "dC/dx",
            BoundaryKind::Dirichlet => "C",
        }
    }
}

impl FromStr for BoundaryKind {
    type Err = TransportError;

    /// Case-insensitive parse of `"neumann"` / `"dirichlet"`
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "neumann" => Ok(BoundaryKind::Neumann),
            "dirichlet" => Ok(BoundaryKind::Dirichlet),
            _ => Err(TransportError::InvalidConfiguration(format!(
                "unknown boundary condition type '{s}' (expected 'neumann' or 'dirichlet')"
            ))),
        }
    }
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BoundaryKind::Neumann => write!(f, "Neumann"),
            BoundaryKind::Dirichlet => write!(f, "Dirichlet"),
        }
    }
}

/// Exterior end of the domain a condition applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundarySide {
    /// x = -L1, first entry of the state vector (index 0)
    Left,
    /// x = +L2, last entry of the state vector (index 1)
    Right,
}

impl BoundarySide {
    /// 0 for the left boundary, 1 for the right boundary
    pub fn index(&self) -> usize {
        match self {
            BoundarySide::Left => 0,
            BoundarySide::Right => 1,
        }
    }

    /// `(-1)^index`
    pub fn sign(&self) -> f64 {
        match self {
            BoundarySide::Left => 1.0,
            BoundarySide::Right => -1.0,
        }
    }

    /// Position of the boundary node in a state of length `len`
    pub fn position(&self, len: usize) -> usize {
        match self {
            BoundarySide::Left => 0,
            BoundarySide::Right => len - 1,
        }
    }

    /// Position of the interior neighbor of the boundary node
    pub fn neighbor(&self, len: usize) -> usize {
        match self {
            BoundarySide::Left => 1,
            BoundarySide::Right => len - 2,
        }
    }
}

// =================================================================================================
// Scaling parameters
// =================================================================================================

/// Parameters needed to express a physical boundary value in normalized form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryScaling {
    /// `[L1, L2]`
    pub region_lengths: [f64; 2],
    /// Concentration scale
    pub c_max: f64,
    /// Partition coefficient a
    pub partition_coefficient: f64,
}

impl BoundaryScaling {
    /// Region length for a side (L1 on the left, L2 on the right)
    pub fn region_length(&self, side: BoundarySide) -> f64 {
        self.region_lengths[side.index()]
    }

    /// Concentration divisor `a^index · c_max` for a side
    pub fn concentration_scale(&self, side: BoundarySide) -> f64 {
        self.partition_coefficient.powi(side.index() as i32) * self.c_max
    }
}

impl From<&Parameters> for BoundaryScaling {
    fn from(parameters: &Parameters) -> Self {
        Self {
            region_lengths: [parameters.len_region1(), parameters.len_region2()],
            c_max: parameters.c_max(),
            partition_coefficient: parameters.partition_coefficient(),
        }
    }
}

// =================================================================================================
// Boundary condition
// =================================================================================================

/// One exterior boundary constraint
///
/// Immutable after construction. Values are physical: a Neumann value is the
/// physical flux dC/dx, a Dirichlet value the physical concentration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryCondition {
    /// Prescribed flux, applied through a ghost-point reflection
    Neumann { value: f64, side: BoundarySide },
    /// Prescribed non-negative concentration
    Dirichlet { value: f64, side: BoundarySide },
}

impl BoundaryCondition {
    /// Create a Neumann (flux) condition
    ///
    /// # Errors
    ///
    /// `InvalidBoundaryValue` when `value` is not a finite number.
    pub fn neumann(value: f64, side: BoundarySide) -> Result<Self> {
        check_numeric(value, side)?;
        Ok(Self::Neumann { value, side })
    }

    /// Create a Dirichlet (fixed concentration) condition
    ///
    /// # Errors
    ///
    /// `InvalidBoundaryValue` when `value` is not finite or is negative.
    pub fn dirichlet(value: f64, side: BoundarySide) -> Result<Self> {
        check_numeric(value, side)?;
        if value < 0.0 {
            return Err(TransportError::InvalidBoundaryValue {
                value,
                index: side.index(),
                reason: "Dirichlet concentration must be non-negative".to_string(),
            });
        }
        Ok(Self::Dirichlet { value, side })
    }

    /// Create a condition of the given kind
    pub fn new(kind: BoundaryKind, value: f64, side: BoundarySide) -> Result<Self> {
        match kind {
            BoundaryKind::Neumann => Self::neumann(value, side),
            BoundaryKind::Dirichlet => Self::dirichlet(value, side),
        }
    }

    /// Physical boundary value
    pub fn value(&self) -> f64 {
        match self {
            Self::Neumann { value, .. } | Self::Dirichlet { value, .. } => *value,
        }
    }

    /// Side of the domain
    pub fn side(&self) -> BoundarySide {
        match self {
            Self::Neumann { side, .. } | Self::Dirichlet { side, .. } => *side,
        }
    }

    /// 0 (left) or 1 (right)
    pub fn index(&self) -> usize {
        self.side().index()
    }

    /// Variant tag
    pub fn kind(&self) -> BoundaryKind {
        match self {
            Self::Neumann { .. } => BoundaryKind::Neumann,
            Self::Dirichlet { .. } => BoundaryKind::Dirichlet,
        }
    }

    /// Normalized pinned concentration, `None` for a Neumann condition
    pub fn pinned_value(&self, scaling: &BoundaryScaling) -> Option<f64> {
        match self {
            Self::Dirichlet { value, side } => Some(value / scaling.concentration_scale(*side)),
            Self::Neumann { .. } => None,
        }
    }

    /// Normalized flux `value · L_index / (c_max · a^index)`, `None` for Dirichlet
    pub fn scaled_flux(&self, scaling: &BoundaryScaling) -> Option<f64> {
        match self {
            Self::Neumann { value, side } => {
                Some(value * scaling.region_length(*side) / scaling.concentration_scale(*side))
            }
            Self::Dirichlet { .. } => None,
        }
    }

    /// Apply the condition at its boundary node
    ///
    /// `derivative` receives the second spatial derivative at the boundary
    /// node; `concentration` is the caller's working copy of the state and is
    /// modified only by a Dirichlet condition. Both buffers span the full
    /// two-region state.
    ///
    /// - Neumann: `d²c[b] = (2·c[nb] − 2·c[b] − (−1)^index · h · q) / h²`
    ///   with `q` the normalized flux
    /// - Dirichlet: `d²c[b] = 0`, `c[b] = value / (a^index · c_max)`
    pub fn apply(
        &self,
        derivative: &mut [f64],
        concentration: &mut [f64],
        step: f64,
        scaling: &BoundaryScaling,
    ) {
        let len = concentration.len();
        let side = self.side();
        let boundary = side.position(len);

        match self {
            Self::Neumann { .. } => {
                let neighbor = side.neighbor(len);
                let flux = self.scaled_flux(scaling).unwrap_or_default();

                derivative[boundary] = (2.0 * concentration[neighbor]
                    - 2.0 * concentration[boundary]
                    - side.sign() * step * flux)
                    / (step * step);
            }
            Self::Dirichlet { .. } => {
                derivative[boundary] = 0.0;
                concentration[boundary] = self.pinned_value(scaling).unwrap_or_default();
            }
        }
    }
}

fn check_numeric(value: f64, side: BoundarySide) -> Result<()> {
    if !value.is_finite() {
        return Err(TransportError::InvalidBoundaryValue {
            value,
            index: side.index(),
            reason: "boundary value must be a finite number".to_string(),
        });
    }
    Ok(())
}

impl fmt::Display for BoundaryCondition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}[{}] = {}", self.kind().symbol(), self.index(), self.value())
    }
}

// =================================================================================================
// Boundary pair and applier
// =================================================================================================

/// The two exterior conditions of one solve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryPair {
    /// Condition at x = -L1
    pub left: BoundaryCondition,
    /// Condition at x = +L2
    pub right: BoundaryCondition,
}

impl BoundaryPair {
    /// Both conditions, left first
    pub fn iter(&self) -> impl Iterator<Item = &BoundaryCondition> {
        [&self.left, &self.right].into_iter()
    }
}

/// Builds the exterior boundary pair from raw `(value, type)` sequences
///
/// The first element describes the left boundary (index 0), the second the
/// right boundary (index 1).
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryConditionApplier {
    values: Vec<f64>,
    kinds: Vec<BoundaryKind>,
}

impl BoundaryConditionApplier {
    /// Validate the raw boundary specification
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` when either sequence does not hold exactly two
    /// elements or a type string is neither `neumann` nor `dirichlet`
    /// (case-insensitive).
    pub fn new<S: AsRef<str>>(values: &[f64], types: &[S]) -> Result<Self> {
        if values.len() != 2 {
            return Err(TransportError::InvalidConfiguration(format!(
                "expected 2 boundary values (left, right), got {}",
                values.len()
            )));
        }
        if types.len() != 2 {
            return Err(TransportError::InvalidConfiguration(format!(
                "expected 2 boundary types (left, right), got {}",
                types.len()
            )));
        }

        let kinds = types
            .iter()
            .map(|t| t.as_ref().parse::<BoundaryKind>())
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            values: values.to_vec(),
            kinds,
        })
    }

    /// Create the left and right boundary condition instances
    ///
    /// # Errors
    ///
    /// `InvalidBoundaryValue` for a non-finite value or a negative Dirichlet value.
    pub fn generate_boundary_conditions(&self) -> Result<BoundaryPair> {
        let left = BoundaryCondition::new(self.kinds[0], self.values[0], BoundarySide::Left)?;
        let right = BoundaryCondition::new(self.kinds[1], self.values[1], BoundarySide::Right)?;

        Ok(BoundaryPair { left, right })
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scaling() -> BoundaryScaling {
        BoundaryScaling {
            region_lengths: [2.0, 3.0],
            c_max: 4.0,
            partition_coefficient: 5.0,
        }
    }

    // ====================================== Kinds and sides ======================================

    #[test]
    fn test_kind_parse_is_case_insensitive() {
        assert_eq!("neumann".parse::<BoundaryKind>().unwrap(), BoundaryKind::Neumann);
        assert_eq!("Neumann".parse::<BoundaryKind>().unwrap(), BoundaryKind::Neumann);
        assert_eq!("DIRICHLET".parse::<BoundaryKind>().unwrap(), BoundaryKind::Dirichlet);
        assert_eq!("Dirichlet".parse::<BoundaryKind>().unwrap(), BoundaryKind::Dirichlet);
    }

    #[test]
    fn test_kind_parse_rejects_unknown() {
        let result = "robin".parse::<BoundaryKind>();
        assert!(matches!(result, Err(TransportError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_side_positions() {
        assert_eq!(BoundarySide::Left.position(10), 0);
        assert_eq!(BoundarySide::Left.neighbor(10), 1);
        assert_eq!(BoundarySide::Right.position(10), 9);
        assert_eq!(BoundarySide::Right.neighbor(10), 8);
        assert_eq!(BoundarySide::Left.sign(), 1.0);
        assert_eq!(BoundarySide::Right.sign(), -1.0);
    }

    // ======================================== Construction =======================================

    #[test]
    fn test_dirichlet_rejects_negative_value() {
        let result = BoundaryCondition::dirichlet(-0.1, BoundarySide::Left);

        match result {
            Err(TransportError::InvalidBoundaryValue { index, .. }) => assert_eq!(index, 0),
            other => panic!("expected InvalidBoundaryValue, got {other:?}"),
        }
    }

    #[test]
    fn test_neumann_accepts_negative_flux() {
        let condition = BoundaryCondition::neumann(-3.0, BoundarySide::Right).unwrap();
        assert_eq!(condition.value(), -3.0);
        assert_eq!(condition.index(), 1);
    }

    #[test]
    fn test_non_numeric_values_rejected() {
        assert!(matches!(
            BoundaryCondition::neumann(f64::NAN, BoundarySide::Left),
            Err(TransportError::InvalidBoundaryValue { .. })
        ));
        assert!(matches!(
            BoundaryCondition::dirichlet(f64::INFINITY, BoundarySide::Right),
            Err(TransportError::InvalidBoundaryValue { index: 1, .. })
        ));
    }

    #[test]
    fn test_display() {
        let neumann = BoundaryCondition::neumann(0.0, BoundarySide::Left).unwrap();
        let dirichlet = BoundaryCondition::dirichlet(0.5, BoundarySide::Right).unwrap();

        assert_eq!(format!("{}", neumann), "dC/dx[0] = 0");
        assert_eq!(format!("{}", dirichlet), "C[1] = 0.5");
    }

    // ========================================== Apply ==========================================

    #[test]
    fn test_neumann_left_zero_flux_reflects() {
        let condition = BoundaryCondition::neumann(0.0, BoundarySide::Left).unwrap();
        let mut derivative = vec![0.0; 4];
        let mut concentration = vec![1.0, 0.5, 0.2, 0.1];

        condition.apply(&mut derivative, &mut concentration, 0.5, &scaling());

        // (2·0.5 − 2·1.0) / 0.25
        assert_relative_eq!(derivative[0], -4.0);
        assert_eq!(&derivative[1..], &[0.0, 0.0, 0.0]);
        assert_eq!(concentration, vec![1.0, 0.5, 0.2, 0.1]);
    }

    #[test]
    fn test_neumann_scaled_flux_on_both_sides() {
        let scaling = scaling();
        let step = 0.5;
        let mut concentration = vec![0.0; 4];

        let left = BoundaryCondition::neumann(8.0, BoundarySide::Left).unwrap();
        let mut derivative = vec![0.0; 4];
        left.apply(&mut derivative, &mut concentration, step, &scaling);
        // q = 8·L1/c_max = 8·2/4 = 4 → −(+1)·0.5·4 / 0.25
        assert_relative_eq!(derivative[0], -8.0);

        let right = BoundaryCondition::neumann(40.0, BoundarySide::Right).unwrap();
        let mut derivative = vec![0.0; 4];
        right.apply(&mut derivative, &mut concentration, step, &scaling);
        // q = 40·L2/(c_max·a) = 40·3/20 = 6 → −(−1)·0.5·6 / 0.25
        assert_relative_eq!(derivative[3], 12.0);
    }

    #[test]
    fn test_dirichlet_pins_value() {
        let condition = BoundaryCondition::dirichlet(10.0, BoundarySide::Right).unwrap();
        let mut derivative = vec![7.0; 4];
        let mut concentration = vec![0.3; 4];

        condition.apply(&mut derivative, &mut concentration, 0.5, &scaling());

        assert_eq!(derivative[3], 0.0);
        // 10 / (a·c_max) = 10 / 20
        assert_relative_eq!(concentration[3], 0.5);
        assert_eq!(&concentration[..3], &[0.3, 0.3, 0.3]);
    }

    #[test]
    fn test_dirichlet_left_uses_c_max_only() {
        let condition = BoundaryCondition::dirichlet(2.0, BoundarySide::Left).unwrap();
        assert_relative_eq!(condition.pinned_value(&scaling()).unwrap(), 0.5);
        assert!(condition.scaled_flux(&scaling()).is_none());
    }

    // ========================================= Applier =========================================

    #[test]
    fn test_applier_generates_pair() {
        let applier = BoundaryConditionApplier::new(&[0.0, 1.0], &["dirichlet", "neumann"]).unwrap();
        let pair = applier.generate_boundary_conditions().unwrap();

        assert_eq!(pair.left.kind(), BoundaryKind::Dirichlet);
        assert_eq!(pair.left.value(), 0.0);
        assert_eq!(pair.left.index(), 0);

        assert_eq!(pair.right.kind(), BoundaryKind::Neumann);
        assert_eq!(pair.right.value(), 1.0);
        assert_eq!(pair.right.index(), 1);

        assert_eq!(pair.iter().count(), 2);
    }

    #[test]
    fn test_applier_accepts_owned_strings() {
        let types = vec!["Neumann".to_string(), "Neumann".to_string()];
        assert!(BoundaryConditionApplier::new(&[0.0, 0.0], &types).is_ok());
    }

    #[test]
    fn test_applier_rejects_wrong_counts() {
        assert!(matches!(
            BoundaryConditionApplier::new(&[0.0], &["neumann", "neumann"]),
            Err(TransportError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            BoundaryConditionApplier::new(&[0.0, 0.0, 0.0], &["neumann", "neumann"]),
            Err(TransportError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            BoundaryConditionApplier::new(&[0.0, 0.0], &["neumann"]),
            Err(TransportError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_applier_rejects_unknown_type() {
        let result = BoundaryConditionApplier::new(&[0.0, 0.0], &["neumann", "periodic"]);

        match result {
            Err(TransportError::InvalidConfiguration(message)) => assert!(message.contains("periodic")),
            other => panic!("expected InvalidConfiguration, got {other:?}"),
        }
    }

    #[test]
    fn test_applier_propagates_negative_dirichlet() {
        let applier = BoundaryConditionApplier::new(&[0.0, -1.0], &["neumann", "dirichlet"]).unwrap();
        let result = applier.generate_boundary_conditions();

        assert!(matches!(result, Err(TransportError::InvalidBoundaryValue { index: 1, .. })));
    }
}
