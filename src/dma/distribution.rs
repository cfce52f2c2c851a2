//! Tabulated size distributions.
//!
//! [`interpolate_distribution`] evaluates a tabulated distribution at an
//! arbitrary diameter by piecewise-linear interpolation, returning the end
//! values outside the table.
use crate::dma::{
    core::validation::{validate_diameters, validate_len, validate_response},
    errors::{DMAError, DMAResult},
};
use ndarray::{Array1, ArrayView1};

/// Value of the tabulated distribution `(diameters, values)` at `dp`.
///
/// Errors
/// ------
/// - `EmptyGrid`, `InvalidDiameter` for a bad diameter table.
/// - `UnsortedGrid` if the diameters are not strictly increasing.
/// - `DimensionMismatch` if the tables differ in length.
/// - `NonFiniteObserved` for NaN/±∞ values.
/// - `InvalidDiameter` (index 0) if `dp` itself is NaN.
pub fn interpolate_distribution(
    dp: f64, diameters: ArrayView1<f64>, values: ArrayView1<f64>,
) -> DMAResult<f64> {
    check_table(diameters, values)?;
    if dp.is_nan() {
        return Err(DMAError::InvalidDiameter { index: 0, value: dp });
    }
    Ok(interpolate_unchecked(dp, diameters, values))
}

/// [`interpolate_distribution`] at every entry of `targets`.
pub fn interpolate_onto(
    targets: ArrayView1<f64>, diameters: ArrayView1<f64>, values: ArrayView1<f64>,
) -> DMAResult<Array1<f64>> {
    check_table(diameters, values)?;
    if let Some((index, &value)) = targets.iter().enumerate().find(|(_, x)| x.is_nan()) {
        return Err(DMAError::InvalidDiameter { index, value });
    }
    Ok(targets.mapv(|dp| interpolate_unchecked(dp, diameters, values)))
}

// ---- Helper methods ----

fn check_table(diameters: ArrayView1<f64>, values: ArrayView1<f64>) -> DMAResult<()> {
    let n = validate_diameters(diameters)?;
    validate_len("distribution values", n, values.len())?;
    validate_response(values)?;
    for i in 1..n {
        if diameters[i] <= diameters[i - 1] {
            return Err(DMAError::UnsortedGrid { index: i });
        }
    }
    Ok(())
}

fn interpolate_unchecked(dp: f64, diameters: ArrayView1<f64>, values: ArrayView1<f64>) -> f64 {
    let n = diameters.len();
    if dp <= diameters[0] {
        return values[0];
    }
    if dp >= diameters[n - 1] {
        return values[n - 1];
    }
    // First index with diameters[hi] > dp; dp lies in [diameters[hi-1], diameters[hi]).
    let hi = diameters.iter().position(|&d| d > dp).unwrap_or(n - 1);
    let lo = hi - 1;
    let slope = (values[hi] - values[lo]) / (diameters[hi] - diameters[lo]);
    values[lo] + slope * (dp - diameters[lo])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Interior points are interpolated linearly; knots are reproduced;
    // points outside the table take the end values.
    fn interpolation_is_linear_and_clamped() {
        let d = array![10e-9, 20e-9, 40e-9];
        let f = array![1.0, 3.0, 2.0];
        assert_relative_eq!(
            interpolate_distribution(15e-9, d.view(), f.view()).unwrap(),
            2.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            interpolate_distribution(30e-9, d.view(), f.view()).unwrap(),
            2.5,
            max_relative = 1e-12
        );
        assert_eq!(interpolate_distribution(20e-9, d.view(), f.view()).unwrap(), 3.0);
        assert_eq!(interpolate_distribution(1e-9, d.view(), f.view()).unwrap(), 1.0);
        assert_eq!(interpolate_distribution(1e-6, d.view(), f.view()).unwrap(), 2.0);

        let out = interpolate_onto(array![5e-9, 15e-9].view(), d.view(), f.view()).unwrap();
        assert_eq!(out[0], 1.0);
        assert_relative_eq!(out[1], 2.0, max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Unsorted or mismatched tables are rejected.
    fn interpolation_validates_table() {
        let f = array![1.0, 2.0];
        assert_eq!(
            interpolate_distribution(1e-8, array![2e-8, 1e-8].view(), f.view()),
            Err(DMAError::UnsortedGrid { index: 1 })
        );
        assert!(matches!(
            interpolate_distribution(1e-8, array![1e-8].view(), f.view()),
            Err(DMAError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            interpolate_distribution(f64::NAN, array![1e-8, 2e-8].view(), f.view()),
            Err(DMAError::InvalidDiameter { .. })
        ));
    }
}
