//! Simulation scenario definition
//!
//! A scenario is the complete physical problem: material and geometry
//! parameters, the time window, the initial profiles of both regions and the
//! two exterior boundary conditions. It is the "WHAT to solve"; the integrator
//! configuration is the "HOW".
//!
//! All inputs are required. Validation is eager: [`Scenario::validate`] runs
//! every check before any integration is attempted.

use nalgebra::DVector;

use crate::error::{Result, TransportError};
use crate::models::{BoundaryConditionApplier, BoundaryPair};
use crate::physics::{initial_scale, Normalizer, Parameters};

/// Two-region diffusion problem
///
/// # Examples
///
/// ```rust
/// use transdiff_rs::solver::Scenario;
///
/// let n = 20;
/// let scenario = Scenario::builder()
///     .diffusion_coefficients(1e-5, 1e-12)
///     .region_lengths(1e-1, 1e-3)
///     .partition_coefficient(1e5)
///     .grid_points(n)
///     .time_span(0.0, 1e3)
///     .initial_conditions(vec![1.0; n], vec![0.0; n])
///     .left_boundary(0.0, "neumann")
///     .right_boundary(0.0, "neumann")
///     .build()
///     .unwrap();
///
/// assert!(scenario.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// D1 \[m²/s\]
    pub diffusion_coefficient1: f64,

    /// D2 \[m²/s\]
    pub diffusion_coefficient2: f64,

    /// L1 \[m\]
    pub len_region1: f64,

    /// L2 \[m\]
    pub len_region2: f64,

    /// Partition coefficient
    pub a: f64,

    /// Grid points per region
    pub n: usize,

    /// Start of the physical time window \[s\]
    pub t_start: f64,

    /// End of the physical time window \[s\]
    pub t_end: f64,

    /// Physical initial concentrations of region 1 (n entries)
    pub c1_initial: Vec<f64>,

    /// Physical initial concentrations of region 2 (n entries)
    pub c2_initial: Vec<f64>,

    /// Boundary values, left then right
    pub boundary_values: Vec<f64>,

    /// Boundary types (`neumann` / `dirichlet`), left then right
    pub boundary_types: Vec<String>,
}

/// Everything derived from a validated scenario
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PreparedScenario {
    pub normalizer: Normalizer,
    pub boundaries: BoundaryPair,
    /// Dimensionless initial state, length 2n
    pub initial_state: DVector<f64>,
    /// Dimensionless time window
    pub window: (f64, f64),
}

impl Scenario {
    /// Start a fluent construction
    pub fn builder() -> ScenarioBuilder {
        ScenarioBuilder::default()
    }

    /// Run every check without solving
    ///
    /// # Errors
    ///
    /// Any `InvalidParameterValue`, `InvalidInitialCondition`,
    /// `InvalidConfiguration` or `InvalidBoundaryValue` the inputs trigger.
    pub fn validate(&self) -> Result<()> {
        self.prepare().map(|_| ())
    }

    /// Validated physical parameters (with `c_max` taken from `c1_initial`)
    ///
    /// The grid size is checked before the initial profile, so an empty grid
    /// is reported as an invalid `n`.
    pub fn parameters(&self) -> Result<Parameters> {
        Parameters::check_points(self.n)?;
        let c_max = initial_scale(&self.c1_initial)?;

        Parameters::new(
            self.diffusion_coefficient1,
            self.diffusion_coefficient2,
            self.len_region1,
            self.len_region2,
            self.a,
            self.n,
            c_max,
        )
    }

    /// Normalized uniform value the system relaxes to under zero-flux boundaries
    ///
    /// The discrete operator conserves the weighted mass
    /// `L1·Σw·u1 + a·L2·Σw·u2` (weights ½ on the exterior nodes, 1 elsewhere),
    /// so the uniform limit is that mass divided by `(L1 + a·L2)·Σw`.
    /// For `c1 ≡ c_max`, `c2 ≡ 0` this is `1 / (1 + a·L2/L1)`.
    ///
    /// Only meaningful when both boundaries are Neumann with value 0.
    pub fn equilibrium_value(&self) -> Result<f64> {
        let prepared = self.prepare()?;
        let n = self.n;
        let state = &prepared.initial_state;

        let weighted = |values: &[f64], exterior: usize| -> f64 {
            values
                .iter()
                .enumerate()
                .map(|(i, v)| if i == exterior { 0.5 * v } else { *v })
                .sum()
        };

        let (u1, u2) = state.as_slice().split_at(n);
        let region1 = weighted(u1, 0);
        let region2 = weighted(u2, n - 1);

        let total = self.len_region1 * region1 + self.a * self.len_region2 * region2;
        let capacity = (self.len_region1 + self.a * self.len_region2) * (n as f64 - 0.5);

        Ok(total / capacity)
    }

    /// Validate and derive everything the orchestrator needs
    pub(crate) fn prepare(&self) -> Result<PreparedScenario> {
        let parameters = self.parameters()?;
        let normalizer = Normalizer::new(parameters);

        let window = normalizer.time_window(self.t_start, self.t_end)?;
        let initial_state = normalizer.normalize_initial_conditions(&self.c1_initial, &self.c2_initial)?;

        let boundaries =
            BoundaryConditionApplier::new(&self.boundary_values, &self.boundary_types)?.generate_boundary_conditions()?;

        Ok(PreparedScenario {
            normalizer,
            boundaries,
            initial_state,
            window,
        })
    }
}

// =================================================================================================
// Scenario builder
// =================================================================================================

/// Fluent construction of a [`Scenario`]
///
/// Every setter must be called before [`ScenarioBuilder::build`]; there are no
/// defaults for physical inputs.
#[derive(Debug, Clone, Default)]
pub struct ScenarioBuilder {
    diffusion_coefficients: Option<(f64, f64)>,
    region_lengths: Option<(f64, f64)>,
    a: Option<f64>,
    n: Option<usize>,
    time_span: Option<(f64, f64)>,
    initial_conditions: Option<(Vec<f64>, Vec<f64>)>,
    boundaries: BoundaryInput,
}

/// Boundary input, either raw sequences or one slot per side
#[derive(Debug, Clone, Default)]
enum BoundaryInput {
    #[default]
    Unset,
    Raw { values: Vec<f64>, types: Vec<String> },
    Sides { left: Option<(f64, String)>, right: Option<(f64, String)> },
}

impl ScenarioBuilder {
    /// D1 and D2 \[m²/s\]
    pub fn diffusion_coefficients(mut self, d1: f64, d2: f64) -> Self {
        self.diffusion_coefficients = Some((d1, d2));
        self
    }

    /// L1 and L2 \[m\]
    pub fn region_lengths(mut self, l1: f64, l2: f64) -> Self {
        self.region_lengths = Some((l1, l2));
        self
    }

    /// Partition coefficient a (≥ 1)
    pub fn partition_coefficient(mut self, a: f64) -> Self {
        self.a = Some(a);
        self
    }

    /// Grid points per region (≥ 2)
    pub fn grid_points(mut self, n: usize) -> Self {
        self.n = Some(n);
        self
    }

    /// Physical time window \[s\]
    pub fn time_span(mut self, t_start: f64, t_end: f64) -> Self {
        self.time_span = Some((t_start, t_end));
        self
    }

    /// Physical initial profiles of both regions
    pub fn initial_conditions(mut self, c1: Vec<f64>, c2: Vec<f64>) -> Self {
        self.initial_conditions = Some((c1, c2));
        self
    }

    /// Raw boundary sequences, left then right
    ///
    /// Replaces anything set by [`left_boundary`](Self::left_boundary) or
    /// [`right_boundary`](Self::right_boundary).
    pub fn boundary_conditions<S: AsRef<str>>(mut self, values: &[f64], types: &[S]) -> Self {
        self.boundaries = BoundaryInput::Raw {
            values: values.to_vec(),
            types: types.iter().map(|t| t.as_ref().to_string()).collect(),
        };
        self
    }

    /// Boundary at x = -L1 (first node of region 1)
    pub fn left_boundary(mut self, value: f64, kind: &str) -> Self {
        let (_, right) = self.side_slots();
        self.boundaries = BoundaryInput::Sides {
            left: Some((value, kind.to_string())),
            right,
        };
        self
    }

    /// Boundary at x = +L2 (last node of region 2)
    pub fn right_boundary(mut self, value: f64, kind: &str) -> Self {
        let (left, _) = self.side_slots();
        self.boundaries = BoundaryInput::Sides {
            left,
            right: Some((value, kind.to_string())),
        };
        self
    }

    /// Current per-side slots; raw sequences are discarded
    fn side_slots(&mut self) -> (Option<(f64, String)>, Option<(f64, String)>) {
        match std::mem::take(&mut self.boundaries) {
            BoundaryInput::Sides { left, right } => (left, right),
            BoundaryInput::Unset | BoundaryInput::Raw { .. } => (None, None),
        }
    }

    /// Assemble the scenario
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` naming the first missing input. Value checks are
    /// left to [`Scenario::validate`].
    pub fn build(self) -> Result<Scenario> {
        let (diffusion_coefficient1, diffusion_coefficient2) =
            self.diffusion_coefficients.ok_or_else(|| missing("diffusion_coefficients"))?;
        let (len_region1, len_region2) = self.region_lengths.ok_or_else(|| missing("region_lengths"))?;
        let a = self.a.ok_or_else(|| missing("partition_coefficient"))?;
        let n = self.n.ok_or_else(|| missing("grid_points"))?;
        let (t_start, t_end) = self.time_span.ok_or_else(|| missing("time_span"))?;
        let (c1_initial, c2_initial) = self.initial_conditions.ok_or_else(|| missing("initial_conditions"))?;

        let (boundary_values, boundary_types) = match self.boundaries {
            BoundaryInput::Unset => return Err(missing("boundary_conditions")),
            BoundaryInput::Raw { values, types } => (values, types),
            BoundaryInput::Sides { left, right } => {
                let (left_value, left_type) = left.ok_or_else(|| missing("left_boundary"))?;
                let (right_value, right_type) = right.ok_or_else(|| missing("right_boundary"))?;
                (vec![left_value, right_value], vec![left_type, right_type])
            }
        };

        Ok(Scenario {
            diffusion_coefficient1,
            diffusion_coefficient2,
            len_region1,
            len_region2,
            a,
            n,
            t_start,
            t_end,
            c1_initial,
            c2_initial,
            boundary_values,
            boundary_types,
        })
    }
}

fn missing(input: &str) -> TransportError {
    TransportError::InvalidConfiguration(format!("scenario input '{input}' was not provided"))
}

// ================================================================================================
// Tests
// ================================================================================================
