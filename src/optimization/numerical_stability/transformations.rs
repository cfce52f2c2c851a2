//! Stable softplus transforms for positivity-constrained parameters.
//!
//! The regularization strength is searched in an unconstrained coordinate
//! `θ ∈ ℝ` and mapped back with `α = softplus(θ)`, so every trial point the
//! solver proposes is a valid, strictly positive `α`.
//!
//! Both directions switch to the identity above `x = 20`, where
//! `exp(-x)` is below `f64` resolution relative to `x`.

/// Cutoff above which softplus and its inverse are the identity in `f64`.
pub const SOFTPLUS_CUTOFF: f64 = 20.0;

/// Numerically stable softplus: `ln(1 + exp(x))`, mapping ℝ → (0, ∞).
///
/// Returns `x` for `x > 20` and `ln1p(exp(x))` otherwise, which keeps full
/// relative precision for large negative `x` (where the result is ≈ `exp(x)`).
pub fn safe_softplus(x: f64) -> f64 {
    if x > SOFTPLUS_CUTOFF { x } else { x.exp().ln_1p() }
}

/// Inverse softplus on `(0, ∞)`: `ln(exp(x) − 1)`.
///
/// Uses `ln(expm1(x))` below the cutoff so small positive inputs such as
/// `1e-8` map to `≈ ln(1e-8)` without cancellation.
///
/// The input must be finite and `> 0`; callers validate this.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > SOFTPLUS_CUTOFF { x } else { x.exp_m1().ln() }
}
