//! Stokes–Cunningham friction coefficient of a spherical particle in air.
//!
//! The friction coefficient is `f = 3πμDp / Cc`, where `μ(T)` follows
//! Sutherland's law, the mean free path scales as
//! `λ(T, P) = λ₀ (P₀/P)(T/T₀)(1 + S/T₀)/(1 + S/T)`, and the Cunningham slip
//! correction is `Cc = 1 + Kn (A + B exp(-C/Kn))` with `Kn = 2λ/Dp`.
//!
//! All functions here are pure and assume positive, finite arguments.
use crate::physics::constants::{
    REFERENCE_MEAN_FREE_PATH, REFERENCE_TEMPERATURE, REFERENCE_VISCOSITY, SLIP_COEFFICIENTS,
    STANDARD_PRESSURE, SUTHERLAND_CONSTANT,
};
use std::f64::consts::PI;

/// Dynamic viscosity of air [Pa·s] at temperature `t` [K] (Sutherland).
pub fn air_viscosity(t: f64) -> f64 {
    REFERENCE_VISCOSITY
        * (t / REFERENCE_TEMPERATURE).powf(1.5)
        * (REFERENCE_TEMPERATURE + SUTHERLAND_CONSTANT)
        / (t + SUTHERLAND_CONSTANT)
}

/// Mean free path of air [m] at temperature `t` [K] and pressure `p` [Pa].
pub fn mean_free_path(t: f64, p: f64) -> f64 {
    REFERENCE_MEAN_FREE_PATH
        * (STANDARD_PRESSURE / p)
        * (t / REFERENCE_TEMPERATURE)
        * (1.0 + SUTHERLAND_CONSTANT / REFERENCE_TEMPERATURE)
        / (1.0 + SUTHERLAND_CONSTANT / t)
}

/// Cunningham slip correction for diameter `dp` [m].
pub fn slip_correction(dp: f64, t: f64, p: f64) -> f64 {
    let (a, b, c) = SLIP_COEFFICIENTS;
    let kn = 2.0 * mean_free_path(t, p) / dp;
    1.0 + kn * (a + b * (-c / kn).exp())
}

/// Friction coefficient [kg/s] at standard pressure.
///
/// This is the two-argument form consumed by the DMA transfer model.
pub fn friction(dp: f64, t: f64) -> f64 {
    friction_at_pressure(dp, t, STANDARD_PRESSURE)
}

/// Friction coefficient [kg/s] at an explicit gas pressure.
pub fn friction_at_pressure(dp: f64, t: f64, p: f64) -> f64 {
    3.0 * PI * air_viscosity(t) * dp / slip_correction(dp, t, p)
}
