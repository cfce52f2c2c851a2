//! Forward convolution and Tikhonov-regularized deconvolution.
//!
//! Purpose
//! -------
//! - [`convolve`]: simulate the instrument response `R = A·N` of a size
//!   distribution `N`.
//! - [`deconvolve`]: recover `N` from `R` by solving the regularized normal
//!   equations
//!
//!   ```text
//!   (AᵀA + α·I)·N = AᵀR
//!   ```
//!
//! Conventions
//! -----------
//! - `α = 0` is ordinary least squares and is allowed; it is usually badly
//!   conditioned for DMA kernels. Larger `α` smooths the solution.
//! - The normal-equations matrix is built with `ndarray`, copied into a
//!   `nalgebra::DMatrix`, and solved by LU with partial pivoting.
//! - A failed factorization or a non-finite solution is reported as
//!   `SingularSystem`; nothing is retried.
use crate::dma::{
    core::validation::{validate_alpha, validate_len, validate_response},
    errors::{DMAError, DMAResult},
    kernel::ResponseMatrix,
};
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2, ArrayView1};

/// Simulated response `R[i] = Σ_j A[i, j]·N[j]`.
///
/// # Errors
/// - `DimensionMismatch` if `distribution.len() != matrix.dim()`.
pub fn convolve(matrix: &ResponseMatrix, distribution: ArrayView1<f64>) -> DMAResult<Array1<f64>> {
    validate_len("size distribution", matrix.dim(), distribution.len())?;
    Ok(matrix.view().dot(&distribution))
}

/// Regularized inverse of [`convolve`] at strength `alpha`.
///
/// Parameters
/// ----------
/// - `response`: observed (or simulated) channel signals, length `n`.
/// - `matrix`: `n×n` response matrix.
/// - `alpha`: Tikhonov strength, finite and ≥ 0.
///
/// Errors
/// ------
/// - `DimensionMismatch` if `response.len() != matrix.dim()`.
/// - `NonFiniteObserved` for NaN/±∞ response entries.
/// - `InvalidAlpha` for negative or non-finite `alpha`.
/// - `SingularSystem` if `AᵀA + αI` cannot be factorized or yields a
///   non-finite solution.
pub fn deconvolve(
    response: ArrayView1<f64>, matrix: &ResponseMatrix, alpha: f64,
) -> DMAResult<Array1<f64>> {
    validate_len("observed response", matrix.dim(), response.len())?;
    validate_response(response)?;
    let alpha = validate_alpha(alpha)?;

    let (normal, rhs) = normal_equations(matrix, response, alpha);
    let n = normal.nrows();
    let mut normal_nalg = DMatrix::<f64>::zeros(n, n);
    fill_dmatrix(&normal, &mut normal_nalg);
    let rhs_nalg = DVector::from_iterator(n, rhs.iter().copied());

    let solution = normal_nalg.lu().solve(&rhs_nalg).ok_or(DMAError::SingularSystem { alpha })?;
    if solution.iter().any(|x| !x.is_finite()) {
        return Err(DMAError::SingularSystem { alpha });
    }
    Ok(Array1::from_iter(solution.iter().copied()))
}

/// `(AᵀA + α·I, AᵀR)`.
pub fn normal_equations(
    matrix: &ResponseMatrix, response: ArrayView1<f64>, alpha: f64,
) -> (Array2<f64>, Array1<f64>) {
    let a = matrix.view();
    let mut normal = a.t().dot(&a);
    normal.diag_mut().mapv_inplace(|d| d + alpha);
    let rhs = a.t().dot(&response);
    (normal, rhs)
}

// ---- Helper methods ----

/// Copy a symmetric `ndarray` matrix into a preallocated `DMatrix`,
/// walking the lower triangle column by column.
fn fill_dmatrix(source: &Array2<f64>, target: &mut DMatrix<f64>) {
    let n = source.ncols();
    for j in 0..n {
        for i in j..n {
            target[(i, j)] = source[[i, j]];
            target[(j, i)] = source[[j, i]];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `convolve` as a plain matrix–vector product with length checks.
    // - `deconvolve` against hand-solved 2×2 systems, with and without α.
    // - Singular systems at α = 0.
    // -------------------------------------------------------------------------

    fn matrix(a: Array2<f64>) -> ResponseMatrix {
        ResponseMatrix::from_array(a).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // `convolve` is `A·N`.
    fn convolve_is_matrix_vector_product() {
        let a = matrix(array![[1.0, 2.0], [0.5, 0.0]]);
        let r = convolve(&a, array![3.0, 4.0].view()).unwrap();
        assert_eq!(r, array![11.0, 1.5]);
        assert!(matches!(
            convolve(&a, array![1.0].view()),
            Err(DMAError::DimensionMismatch { context: "size distribution", .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // With α = 0 and an invertible A, deconvolution inverts convolution.
    //
    // Given
    // -----
    // - A = [[2, 1], [1, 3]], N = [1, 2] → R = [4, 7].
    //
    // Expect
    // ------
    // - deconvolve(R, A, 0) ≈ [1, 2].
    fn deconvolve_inverts_convolve_without_regularization() {
        // Arrange
        let a = matrix(array![[2.0, 1.0], [1.0, 3.0]]);
        let r = convolve(&a, array![1.0, 2.0].view()).unwrap();

        // Act
        let n = deconvolve(r.view(), &a, 0.0).unwrap();

        // Assert
        assert_relative_eq!(n[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(n[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // With A = I the solution is R / (1 + α), so regularization shrinks it.
    fn deconvolve_shrinks_with_alpha() {
        let a = matrix(Array2::eye(3));
        let r = array![1.0, 2.0, 3.0];
        let n = deconvolve(r.view(), &a, 1.0).unwrap();
        for (x, y) in n.iter().zip(r.iter()) {
            assert_relative_eq!(*x, y / 2.0, max_relative = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // A rank-deficient A with α = 0 is singular; any α > 0 repairs it.
    fn deconvolve_reports_singular_system() {
        let a = matrix(array![[1.0, 1.0], [1.0, 1.0]]);
        let r = array![2.0, 2.0];
        assert_eq!(deconvolve(r.view(), &a, 0.0), Err(DMAError::SingularSystem { alpha: 0.0 }));
        let n = deconvolve(r.view(), &a, 1e-3).unwrap();
        assert_relative_eq!(n[0], n[1], max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Input checks run before any linear algebra.
    fn deconvolve_validates_inputs() {
        let a = matrix(Array2::eye(2));
        assert!(matches!(
            deconvolve(array![1.0].view(), &a, 0.1),
            Err(DMAError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            deconvolve(array![1.0, f64::NAN].view(), &a, 0.1),
            Err(DMAError::NonFiniteObserved { index: 1, .. })
        ));
        assert!(matches!(
            deconvolve(array![1.0, 1.0].view(), &a, -1.0),
            Err(DMAError::InvalidAlpha { .. })
        ));
    }
}
