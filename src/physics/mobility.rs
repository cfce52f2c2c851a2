//! Electrical mobility of charged particles and its inversion.
//!
//! Purpose
//! -------
//! Map a particle diameter and charge state to the electrical mobility
//! `Z = q·e / f(Dp, T)`, and invert that map for a target mobility with a
//! plain bisection search. The search target is captured by the objective
//! closure, so concurrent searches never share state.
//!
//! Conventions
//! -----------
//! - Diameters in metres, mobility in m²/(V·s), temperature in kelvin.
//! - The default search bracket is `[1 nm, 1 mm]`, wide enough for every
//!   mobility a DMA can select.
use crate::physics::{
    constants::Q_E,
    errors::{PhysicsError, PhysicsResult},
    friction::friction,
};

/// Lower end of the diameter search bracket [m].
pub const SEARCH_DIAMETER_MIN: f64 = 1e-9;

/// Upper end of the diameter search bracket [m].
pub const SEARCH_DIAMETER_MAX: f64 = 1e-3;

/// Number of interval halvings performed by [`bisect`].
///
/// 54 halvings exhaust the resolution of an `f64` mantissa for any bracket.
pub const BISECTION_STEPS: usize = 54;

/// Electrical mobility [m²/(V·s)] of a particle with `charge` elementary
/// charges. Negative charges give negative mobilities.
pub fn electrical_mobility(dp: f64, charge: i32, t: f64) -> f64 {
    f64::from(charge) * Q_E / friction(dp, t)
}

/// bisect — root of a continuous scalar function on a sign-changing bracket.
///
/// Parameters
/// ----------
/// - `func`: continuous function with `func(low)` and `func(high)` of
///   opposite sign (or one of them exactly zero).
/// - `low`, `high`: bracket end points.
///
/// Returns
/// -------
/// The midpoint of the final bracket after [`BISECTION_STEPS`] halvings.
///
/// Errors
/// ------
/// - [`PhysicsError::NoSignChange`] when both end points have the same sign.
pub fn bisect<F: Fn(f64) -> f64>(func: F, low: f64, high: f64) -> PhysicsResult<f64> {
    let (mut low, mut high) = (low, high);
    let mut f_low = func(low);
    if same_sign(f_low, func(high)) {
        return Err(PhysicsError::NoSignChange { low, high });
    }
    let mut midpoint = 0.5 * (low + high);
    for _ in 0..BISECTION_STEPS {
        midpoint = 0.5 * (low + high);
        let f_mid = func(midpoint);
        if same_sign(f_low, f_mid) {
            low = midpoint;
            f_low = f_mid;
        } else {
            high = midpoint;
        }
    }
    Ok(midpoint)
}

/// diameter_from_mobility — particle diameter selected at a given mobility.
///
/// Solves `(Z(Dp, charge, T) - target) / target = 0` for `Dp` on
/// `[SEARCH_DIAMETER_MIN, SEARCH_DIAMETER_MAX]`.
///
/// Errors
/// ------
/// - [`PhysicsError::InvalidMobility`] for a non-finite or zero target, or a
///   target whose sign disagrees with `charge`.
/// - [`PhysicsError::ZeroCharge`] when `charge == 0`.
/// - [`PhysicsError::InvalidTemperature`] for a non-positive temperature.
/// - [`PhysicsError::NoSignChange`] if the target lies outside the mobility
///   range spanned by the bracket.
pub fn diameter_from_mobility(target: f64, charge: i32, t: f64) -> PhysicsResult<f64> {
    if charge == 0 {
        return Err(PhysicsError::ZeroCharge);
    }
    if !target.is_finite() || target == 0.0 || target.signum() != f64::from(charge).signum() {
        return Err(PhysicsError::InvalidMobility { value: target });
    }
    if !(t.is_finite() && t > 0.0) {
        return Err(PhysicsError::InvalidTemperature { value: t });
    }
    let residual = |dp: f64| (electrical_mobility(dp, charge, t) - target) / target;
    bisect(residual, SEARCH_DIAMETER_MIN, SEARCH_DIAMETER_MAX)
}

fn same_sign(a: f64, b: f64) -> bool {
    a * b > 0.0
}
