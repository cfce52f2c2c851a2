//! Consistency checks shared by the minimizer.
//!
//! Option tolerances, starting points, gradients, solver estimates, and cost
//! values are all screened here before they reach (or after they leave)
//! argmin. Every check reports the first offending entry.
use crate::optimization::{
    cost_optimizer::{Grad, Theta},
    errors::{OptError, OptResult},
};

/// Index and value of the first non-finite entry, if any.
fn first_non_finite<'a, I: IntoIterator<Item = &'a f64>>(values: I) -> Option<(usize, f64)> {
    values.into_iter().copied().enumerate().find(|(_, v)| !v.is_finite())
}

/// Why `tol` is unusable as a stopping threshold, if it is.
fn tolerance_problem(tol: f64) -> Option<&'static str> {
    if !tol.is_finite() {
        Some("must be finite")
    } else if tol <= 0.0 {
        Some("must be strictly positive")
    } else {
        None
    }
}

/// `None` passes; `Some(tol)` must be finite and > 0.
///
/// # Errors
/// [`OptError::InvalidTolGrad`].
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    match tol.and_then(|t| tolerance_problem(t).map(|reason| (t, reason))) {
        Some((tol, reason)) => Err(OptError::InvalidTolGrad { tol, reason }),
        None => Ok(()),
    }
}

/// `None` passes; `Some(tol)` must be finite and > 0.
///
/// # Errors
/// [`OptError::InvalidTolCost`].
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    match tol.and_then(|t| tolerance_problem(t).map(|reason| (t, reason))) {
        Some((tol, reason)) => Err(OptError::InvalidTolCost { tol, reason }),
        None => Ok(()),
    }
}

/// Starting point of length `dim` with finite coordinates.
///
/// # Errors
/// - [`OptError::ThetaLengthMismatch`], checked first.
/// - [`OptError::InvalidThetaInput`].
pub fn validate_theta0(theta: &Theta, dim: usize) -> OptResult<()> {
    if theta.len() != dim {
        return Err(OptError::ThetaLengthMismatch { expected: dim, actual: theta.len() });
    }
    match first_non_finite(theta) {
        Some((index, value)) => Err(OptError::InvalidThetaInput { index, value }),
        None => Ok(()),
    }
}

/// Gradient of length `dim` with finite entries.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`].
/// - [`OptError::InvalidGradient`].
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    match first_non_finite(grad) {
        Some((index, value)) => {
            Err(OptError::InvalidGradient { index, value, reason: "entries must be finite" })
        }
        None => Ok(()),
    }
}

/// Unwrap the solver's best parameter, requiring finite entries.
///
/// # Errors
/// - [`OptError::MissingThetaHat`].
/// - [`OptError::InvalidThetaHat`].
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    let theta = theta_hat.ok_or(OptError::MissingThetaHat)?;
    if let Some((index, value)) = first_non_finite(&theta) {
        return Err(OptError::InvalidThetaHat { index, value, reason: "estimates must be finite" });
    }
    Ok(theta)
}

/// # Errors
/// [`OptError::NonFiniteCost`] for `NaN` or `±∞`.
pub fn validate_value(value: f64) -> OptResult<()> {
    if value.is_finite() { Ok(()) } else { Err(OptError::NonFiniteCost { value }) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Tolerances must be finite and strictly positive when present.
    fn tolerance_checks_reject_non_positive_and_non_finite() {
        assert!(verify_tol_grad(None).is_ok());
        assert!(verify_tol_grad(Some(1e-6)).is_ok());
        assert!(matches!(verify_tol_grad(Some(0.0)), Err(OptError::InvalidTolGrad { .. })));
        assert!(matches!(verify_tol_cost(Some(f64::NAN)), Err(OptError::InvalidTolCost { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Starting points are checked for length before finiteness.
    fn validate_theta0_reports_length_then_finiteness() {
        assert_eq!(
            validate_theta0(&array![0.0, 1.0], 1),
            Err(OptError::ThetaLengthMismatch { expected: 1, actual: 2 })
        );
        assert!(matches!(
            validate_theta0(&array![f64::INFINITY], 1),
            Err(OptError::InvalidThetaInput { index: 0, .. })
        ));
        assert!(validate_theta0(&array![-3.0], 1).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Estimates must be present and finite.
    fn validate_theta_hat_requires_finite_values() {
        assert_eq!(validate_theta_hat(None), Err(OptError::MissingThetaHat));
        assert!(matches!(
            validate_theta_hat(Some(array![f64::NAN])),
            Err(OptError::InvalidThetaHat { index: 0, .. })
        ));
        assert_eq!(validate_theta_hat(Some(array![2.0])), Ok(array![2.0]));
    }
}
