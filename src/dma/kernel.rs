//! Response (convolution) matrix assembly.
//!
//! Entry `(i, j)` is the expected signal in voltage channel `i` per unit
//! concentration in diameter bin `j`:
//!
//! ```text
//! A[i, j] = Σ_{k=1..charge_limit} Ω(dp_j, V_i, k) · Tc(dp_j, k) · Tl(dp_j)
//! ```
//!
//! `Tl` and `Tc` do not depend on the channel, so they are evaluated once per
//! diameter (and charge) before the channel loop. The products are
//! accumulated over charges in increasing order, as a direct triple loop
//! would.
use crate::dma::{
    core::validation::{validate_charge_limit, validate_diameters, validate_len, validate_voltages},
    errors::{DMAError, DMAResult},
    transfer::ResponseTerms,
};
use nalgebra::DMatrix;
use ndarray::{Array2, ArrayView1, ArrayView2};
use std::str::FromStr;

/// Lower bound applied to every built matrix entry.
pub const MATRIX_FLOOR: f64 = f64::MIN_POSITIVE;

/// Which terms enter the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KernelMode {
    /// `Ω · Tc · Tl`.
    #[default]
    Full,
    /// `Ω · Tc` (penetration treated as 1), for diagnostic comparisons.
    WithoutPenetration,
}

impl FromStr for KernelMode {
    type Err = DMAError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(KernelMode::Full),
            "simplified" | "without_penetration" => Ok(KernelMode::WithoutPenetration),
            _ => Err(DMAError::UnknownKernelMode { name: s.to_string() }),
        }
    }
}

/// Square, finite, non-negative response matrix.
///
/// Read-only after construction; build it with [`build_response_matrix`] or
/// wrap an existing array with [`ResponseMatrix::from_array`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseMatrix(Array2<f64>);

impl ResponseMatrix {
    /// Validate and wrap an externally supplied matrix.
    ///
    /// # Errors
    /// - `EmptyGrid` for a 0×0 matrix.
    /// - `DimensionMismatch` if the matrix is not square.
    /// - `InvalidMatrixEntry` for the first NaN/±∞ or negative entry.
    pub fn from_array(matrix: Array2<f64>) -> DMAResult<Self> {
        let (rows, cols) = matrix.dim();
        if rows == 0 {
            return Err(DMAError::EmptyGrid);
        }
        validate_len("response matrix columns", rows, cols)?;
        for ((row, col), &value) in matrix.indexed_iter() {
            if !value.is_finite() || value < 0.0 {
                return Err(DMAError::InvalidMatrixEntry { row, col, value });
            }
        }
        Ok(Self(matrix))
    }

    /// Number of channels (= number of diameter bins).
    pub fn dim(&self) -> usize {
        self.0.nrows()
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.0.view()
    }

    pub fn into_inner(self) -> Array2<f64> {
        self.0
    }

    /// Copy into a column-major `nalgebra` matrix for factorization.
    pub fn to_dmatrix(&self) -> DMatrix<f64> {
        let n = self.dim();
        DMatrix::from_fn(n, n, |i, j| self.0[[i, j]])
    }
}

impl AsRef<Array2<f64>> for ResponseMatrix {
    fn as_ref(&self) -> &Array2<f64> {
        &self.0
    }
}

/// Build the response matrix for a square diameter/voltage grid.
///
/// Parameters
/// ----------
/// - `terms`: provider of `Tl`, `Tc`, `Ω` and the charge limit.
/// - `diameters`: diameter bins in m (finite, > 0).
/// - `voltages`: channel voltages in V (finite, > 0), same length.
/// - `mode`: include (`Full`) or omit (`WithoutPenetration`) `Tl`.
///
/// Errors
/// ------
/// - `EmptyGrid`, `InvalidDiameter`, `InvalidVoltage` for bad grids.
/// - `DimensionMismatch` if the grids differ in length.
/// - `InvalidChargeLimit` if the provider tracks no charge state.
///
/// Cost is `O(n² · charge_limit)` transfer-function evaluations.
pub fn build_response_matrix<T: ResponseTerms + ?Sized>(
    terms: &T, diameters: ArrayView1<f64>, voltages: ArrayView1<f64>, mode: KernelMode,
) -> DMAResult<ResponseMatrix> {
    let n = validate_diameters(diameters)?;
    let m = validate_voltages(voltages)?;
    validate_len("voltage grid", n, m)?;
    let charge_limit = validate_charge_limit(terms.charge_limit())?;
    let charges = (1..=charge_limit)
        .map(|k| i32::try_from(k).map_err(|_| DMAError::InvalidChargeLimit { value: charge_limit }))
        .collect::<DMAResult<Vec<i32>>>()?;

    let penetration: Vec<f64> = diameters
        .iter()
        .map(|&dp| match mode {
            KernelMode::Full => terms.penetration(dp),
            KernelMode::WithoutPenetration => 1.0,
        })
        .collect();
    let charging: Vec<Vec<f64>> = diameters
        .iter()
        .map(|&dp| charges.iter().map(|&k| terms.charging(dp, k)).collect())
        .collect();

    let mut matrix = Array2::<f64>::zeros((n, n));
    for (i, &voltage) in voltages.iter().enumerate() {
        for (j, &dp) in diameters.iter().enumerate() {
            let tl = penetration[j];
            let mut entry = 0.0;
            for (c, &k) in charges.iter().enumerate() {
                entry += terms.transfer(dp, voltage, k) * charging[j][c] * tl;
            }
            matrix[[i, j]] = entry.max(MATRIX_FLOOR);
        }
    }
    Ok(ResponseMatrix(matrix))
}
