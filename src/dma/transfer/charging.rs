//! Bipolar charging efficiency `Tc(dp, k)`.
//!
//! - `|k| ≤ 2`: Wiedensohler's regression, `Tc = 10^{Σ_i a_i(k)·[log10(dp/nm)]^i}`
//!   for `i = 0..5`, with the coefficient table from the TSI 3080 manual.
//!   Valid for 1–1000 nm (|k| = 1) and 20–1000 nm (|k| = 2).
//! - `|k| ≥ 3`: Gaussian (Boltzmann-type) approximation in `k²`, with the
//!   Coulomb constant `K_E`.
//!
//! The two branches are not blended at the |k| = 2/3 boundary. At 50 nm
//! and 298.15 K the polynomial gives ≈ 6.77e-3 for k = 2 and the closed form
//! ≈ 2.45e-5 for k = 3, a drop of more than two decades.
use crate::physics::constants::{K_B, K_E, Q_E};
use std::f64::consts::PI;

/// Wiedensohler coefficients `a_0..a_5`, indexed by `charge + 2`.
pub const WIEDENSOHLER_COEFFICIENTS: [[f64; 6]; 5] = [
    [-26.3328, 35.9044, -21.4608, 7.0867, -1.3088, 0.1051],
    [-2.3197, 0.6175, 0.6201, -0.1105, -0.1260, 0.0297],
    [-0.0003, -0.1014, 0.3073, -0.3372, 0.1023, -0.0105],
    [-2.3484, 0.6044, 0.4800, 0.0013, -0.1544, 0.0320],
    [-44.4756, 79.3772, -62.8900, 26.4492, -5.7480, 0.5059],
];

/// Highest |charge| covered by the regression table.
pub const MAX_POLYNOMIAL_CHARGE: i32 = 2;

/// Charge fraction from the regression table; `None` for |charge| > 2.
pub fn polynomial_charge_fraction(dp: f64, charge: i32) -> Option<f64> {
    if charge.abs() > MAX_POLYNOMIAL_CHARGE {
        return None;
    }
    let coefficients = &WIEDENSOHLER_COEFFICIENTS[(charge + MAX_POLYNOMIAL_CHARGE) as usize];
    let x = (dp * 1e9).log10();
    let exponent: f64 = coefficients.iter().enumerate().map(|(i, a)| a * x.powi(i as i32)).sum();
    Some(10f64.powf(exponent))
}

/// Boltzmann-type charge fraction, defined for any `charge`.
///
/// ```text
/// c  = π·dp·k_B·T / (e²·K_E)
/// Tc = exp(−k² / (c/π)) / √c
/// ```
pub fn boltzmann_charge_fraction(dp: f64, charge: i32, t: f64) -> f64 {
    let scale = PI * dp * K_B * t / Q_E.powi(2) / K_E;
    let width = scale / PI;
    let k2 = f64::from(charge).powi(2);
    (1.0 / scale.sqrt()) * (-k2 / width).exp()
}

/// Charging efficiency: polynomial branch for |charge| ≤ 2, Boltzmann
/// branch otherwise.
pub fn charging_efficiency(dp: f64, charge: i32, t: f64) -> f64 {
    match polynomial_charge_fraction(dp, charge) {
        Some(fraction) => fraction,
        None => boltzmann_charge_fraction(dp, charge, t),
    }
}
