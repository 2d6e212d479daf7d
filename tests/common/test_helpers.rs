//! Helper functions for integration tests

use transdiff_rs::solver::Scenario;

/// Compute relative error: |actual - expected| / |expected|
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-10 {
        (actual - expected).abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}

/// Discretely conserved mass `L1·Σw·u1 + a·L2·Σw·u2` of a normalized state
///
/// Weights are ½ on the two exterior nodes and 1 elsewhere.
pub fn weighted_mass(u1: &[f64], u2: &[f64], l1: f64, l2: f64, a: f64) -> f64 {
    let weighted = |values: &[f64], exterior: usize| -> f64 {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| if i == exterior { 0.5 * v } else { *v })
            .sum::<f64>()
    };

    l1 * weighted(u1, 0) + a * l2 * weighted(u2, u2.len() - 1)
}

/// Highly asymmetric reference problem
///
/// D1 = 1e-5, D2 = 1e-12, L1 = 1e-1, L2 = 1e-3, a = 1e5, n = 50, zero-flux
/// ends, region 1 full and region 2 empty. Relaxes to 1 / 1001.
/// One dimensionless time unit is `L2² / D2 = 1e6` s.
pub fn reference_scenario(t_end: f64) -> Scenario {
    let n = 50;

    Scenario::builder()
        .diffusion_coefficients(1e-5, 1e-12)
        .region_lengths(1e-1, 1e-3)
        .partition_coefficient(1e5)
        .grid_points(n)
        .time_span(0.0, t_end)
        .initial_conditions(vec![1.0; n], vec![0.0; n])
        .left_boundary(0.0, "neumann")
        .right_boundary(0.0, "neumann")
        .build()
        .expect("reference scenario is valid")
}

/// Symmetric geometry (D1 = D2, L1 = L2 = 1 mm) with partition coefficient `a`
///
/// One dimensionless time unit is 1000 s.
pub fn uniform_scenario(n: usize, a: f64, t_end: f64) -> Scenario {
    Scenario::builder()
        .diffusion_coefficients(1e-9, 1e-9)
        .region_lengths(1e-3, 1e-3)
        .partition_coefficient(a)
        .grid_points(n)
        .time_span(0.0, t_end)
        .initial_conditions(vec![1.0; n], vec![0.0; n])
        .left_boundary(0.0, "neumann")
        .right_boundary(0.0, "neumann")
        .build()
        .expect("uniform scenario is valid")
}
