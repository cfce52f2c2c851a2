//! Forward-difference gradient fallback with error capture.
use crate::optimization::{
    cost_optimizer::{Grad, Theta, validation::validate_grad},
    errors::OptResult,
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Forward-difference gradient of `func` at `theta`.
///
/// `func` is expected to route evaluation errors into `closure_err` and
/// return `NaN`. The cell is cleared on entry; if it holds an error after the
/// sweep, that error is returned. Otherwise the gradient is validated for
/// dimension and finiteness.
///
/// # Errors
/// - The first error captured in `closure_err` during the sweep.
/// - [`OptError::GradientDimMismatch`](crate::optimization::errors::OptError::GradientDimMismatch)
///   or [`OptError::InvalidGradient`](crate::optimization::errors::OptError::InvalidGradient)
///   from validation.
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    let dim = theta.len();
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, dim)?;
    Ok(fd_grad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptError;
    use argmin::core::ArgminError;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The happy path of `run_fd_diff` on a smooth function.
    // - Propagation of a captured closure error.
    // - Rejection of non-finite gradients.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // A linear function has a constant gradient equal to its coefficients.
    //
    // Given
    // -----
    // - f(θ) = 2 θ₀ − 3 θ₁ and an empty error cell.
    //
    // Expect
    // ------
    // - Gradient ≈ [2, −3].
    fn run_fd_diff_recovers_linear_gradient() {
        // Arrange
        let theta = array![0.5, -1.5];
        let cell = RefCell::new(None);
        let f = |t: &Theta| 2.0 * t[0] - 3.0 * t[1];

        // Act
        let grad = run_fd_diff(&theta, &f, &cell).unwrap();

        // Assert
        assert!((grad[0] - 2.0).abs() < 1e-6);
        assert!((grad[1] + 3.0).abs() < 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // An error stored by the closure is returned instead of the gradient.
    fn run_fd_diff_returns_captured_error() {
        // Arrange
        let theta = array![1.0];
        let cell: RefCell<Option<Error>> = RefCell::new(None);
        let f = |_: &Theta| {
            *cell.borrow_mut() =
                Some(ArgminError::InvalidParameter { text: "boom".to_string() }.into());
            f64::NAN
        };

        // Act
        let err = run_fd_diff(&theta, &f, &cell).unwrap_err();

        // Assert
        assert!(matches!(err, OptError::Backend { kind: "invalid parameter", .. }));
    }

    #[test]
    // Purpose
    // -------
    // A closure that yields NaN without recording an error fails validation.
    fn run_fd_diff_rejects_non_finite_gradient() {
        let theta = array![1.0, 2.0];
        let cell = RefCell::new(None);
        let f = |_: &Theta| f64::NAN;
        let err = run_fd_diff(&theta, &f, &cell).unwrap_err();
        assert!(matches!(err, OptError::InvalidGradient { .. }));
    }
}
