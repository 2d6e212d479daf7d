//! Integration tests: long-time behaviour of the two-region system
//!
//! Zero-flux ends on both sides, so the weighted mass is conserved and the
//! normalized profile relaxes to a uniform value.

use approx::assert_relative_eq;
use transdiff_rs::models::{BoundaryCondition, BoundaryPair, BoundarySide, TwoRegionDiffusion};
use transdiff_rs::physics::PhysicalModel;
use transdiff_rs::solver::MethodOfLines;

mod common;
use common::{reference_scenario, relative_error, uniform_scenario, weighted_mass};

// =================================================================================================
// Steady state
// =================================================================================================

#[test]
fn test_reference_problem_reaches_uniform_value() {
    // 50 dimensionless time units
    let scenario = reference_scenario(5e7);
    let expected = 1.0 / 1001.0;

    assert_relative_eq!(scenario.equilibrium_value().unwrap(), expected, max_relative = 1e-12);

    let solution = MethodOfLines::new(scenario).solve_pde_system().unwrap();

    for value in solution.final_c1().iter().chain(solution.final_c2().iter()) {
        let error = relative_error(*value, expected);
        assert!(error < 1e-4, "value {value:e} differs from {expected:e} by {error:e}");
    }
}

#[test]
fn test_interface_residual_vanishes_at_steady_state() {
    let scenario = reference_scenario(5e7);
    let parameters = scenario.parameters().unwrap();
    let n = scenario.n;

    let solution = MethodOfLines::new(scenario).solve_pde_system().unwrap();
    let last = solution.len() - 1;
    let state = solution.state(last).unwrap();

    let boundaries = BoundaryPair {
        left: BoundaryCondition::neumann(0.0, BoundarySide::Left).unwrap(),
        right: BoundaryCondition::neumann(0.0, BoundarySide::Right).unwrap(),
    };
    let model = TwoRegionDiffusion::from_parameters(&parameters, boundaries);

    let rate = model.compute_physics(0.0, &state);

    assert!(rate[n - 1].abs() < 1e-6, "region-1 interface rate {:e}", rate[n - 1]);
    assert!(rate[n].abs() < 1e-6, "region-2 interface rate {:e}", rate[n]);

    // both sides agree with the matched interface value
    let interface = model.interface_value(&state);
    assert_relative_eq!(state[n - 1], interface, max_relative = 1e-6);
    assert_relative_eq!(state[n], interface, max_relative = 1e-6);
}

#[test]
fn test_symmetric_problem_reaches_equilibrium() {
    let scenario = uniform_scenario(20, 3.0, 2e4);
    let expected = scenario.equilibrium_value().unwrap();

    // c1 ≡ 1, c2 ≡ 0 → 1 / (1 + a·L2/L1)
    assert_relative_eq!(expected, 0.25, max_relative = 1e-12);

    let solution = MethodOfLines::new(scenario).solve_pde_system().unwrap();

    for value in solution.final_c1().iter().chain(solution.final_c2().iter()) {
        assert_relative_eq!(*value, expected, max_relative = 1e-5);
    }
}

// =================================================================================================
// Invariants along the trajectory
// =================================================================================================

#[test]
fn test_weighted_mass_is_conserved() {
    let scenario = uniform_scenario(12, 2.0, 500.0);
    let (l1, l2, a) = (scenario.len_region1, scenario.len_region2, scenario.a);

    let solution = MethodOfLines::new(scenario).solve_pde_system().unwrap();

    let mass = |j: usize| {
        let u1: Vec<f64> = solution.c1.column(j).iter().copied().collect();
        let u2: Vec<f64> = solution.c2.column(j).iter().copied().collect();
        weighted_mass(&u1, &u2, l1, l2, a)
    };

    let initial = mass(0);
    for j in 1..solution.len() {
        assert_relative_eq!(mass(j), initial, max_relative = 1e-9);
    }
}

#[test]
fn test_normalized_concentrations_stay_bounded() {
    for scenario in [uniform_scenario(15, 4.0, 1e3), reference_scenario(1e6)] {
        let solution = MethodOfLines::new(scenario).solve_pde_system().unwrap();

        for value in solution.c1.iter().chain(solution.c2.iter()) {
            assert!(
                (-1e-5..=1.0 + 1e-5).contains(value),
                "normalized concentration {value:e} left [0, 1]"
            );
        }
    }
}
