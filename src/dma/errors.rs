//! Errors for the DMA inversion pipeline (configuration, grids, response
//! matrices, deconvolution, and the regularization search).
//!
//! [`DMAError`] is the single error surface returned by every public DMA
//! operation. It implements `Display`/`Error`, wraps [`PhysicsError`] and
//! converts from [`OptError`], and maps to a Python `ValueError` behind the
//! `python-bindings` feature.
//!
//! ## Conventions
//! - **Indices are 0-based** (match Rust/NumPy).
//! - Flows are reported in L/min, voltages in V, diameters in m.
//! - Optimizer/backend errors that have no DMA-specific meaning are
//!   normalized to [`DMAError::OptimizationFailed`] with a readable status.
use crate::{optimization::errors::OptError, physics::errors::PhysicsError};
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

/// Result alias for DMA operations that may produce [`DMAError`].
pub type DMAResult<T> = Result<T, DMAError>;

#[derive(Debug, Clone, PartialEq)]
pub enum DMAError {
    // ---- Configuration ----
    /// Unknown instrument model name.
    UnknownModel { name: String },

    /// Aerosol or sheath flow must be finite and > 0.
    InvalidFlow { name: &'static str, value: f64 },

    /// Temperature must be finite and > 0.
    InvalidTemperature { value: f64 },

    /// Pressure must be finite and > 0.
    InvalidPressure { value: f64 },

    /// Effective diffusion length must be finite and > 0.
    InvalidEffectiveLength { value: f64 },

    /// Unknown response-matrix build mode.
    UnknownKernelMode { name: String },

    /// At least one charge state must be tracked.
    InvalidChargeLimit { value: u32 },

    /// Voltage outside the instrument's operating domain.
    OutOfRangeVoltage { voltage: f64, min: f64, max: f64 },

    // ---- Grids and vectors ----
    /// A grid or vector is empty.
    EmptyGrid,

    /// A voltage entry is NaN/±inf or ≤ 0.
    InvalidVoltage { index: usize, value: f64 },

    /// A diameter entry is NaN/±inf or ≤ 0.
    InvalidDiameter { index: usize, value: f64 },

    /// Grid entries must be strictly increasing.
    UnsortedGrid { index: usize },

    /// Vector/matrix sizes disagree.
    DimensionMismatch { context: &'static str, expected: usize, found: usize },

    /// A response-matrix entry is NaN/±inf or negative.
    InvalidMatrixEntry { row: usize, col: usize, value: f64 },

    /// An observed channel value is NaN/±inf.
    NonFiniteObserved { index: usize, value: f64 },

    /// An observed channel is zero (or too small to divide by).
    ZeroObservedChannel { index: usize, value: f64 },

    // ---- Inversion ----
    /// Tikhonov strength must be finite and ≥ 0 (> 0 for a starting guess).
    InvalidAlpha { value: f64, reason: &'static str },

    /// Regularized normal equations are singular at this alpha.
    SingularSystem { alpha: f64 },

    // ---- Regularization search ----
    /// Search stopped on its iteration budget; carries the best alpha found.
    NonConvergence { best_alpha: f64, iterations: usize, status: String },

    /// Optimizer failed for a reason without a DMA-specific meaning.
    OptimizationFailed { status: String },

    // ---- Wrapped ----
    /// Failure in the underlying aerosol-physics helpers.
    Physics(PhysicsError),
}

impl std::error::Error for DMAError {}

impl std::fmt::Display for DMAError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            DMAError::UnknownModel { name } => {
                write!(f, "Unknown DMA model '{name}': expected 'nano' or 'long'")
            }
            DMAError::InvalidFlow { name, value } => {
                write!(f, "Invalid {name} flow {value} L/min: must be finite and > 0")
            }
            DMAError::InvalidTemperature { value } => {
                write!(f, "Invalid temperature {value} K: must be finite and > 0")
            }
            DMAError::InvalidPressure { value } => {
                write!(f, "Invalid pressure {value} Pa: must be finite and > 0")
            }
            DMAError::InvalidEffectiveLength { value } => {
                write!(f, "Invalid effective diffusion length {value} m: must be finite and > 0")
            }
            DMAError::UnknownKernelMode { name } => {
                write!(f, "Unknown kernel mode '{name}': expected 'full' or 'simplified'")
            }
            DMAError::InvalidChargeLimit { value } => {
                write!(f, "Invalid charge limit {value}: must be in 1..={}", i32::MAX)
            }
            DMAError::OutOfRangeVoltage { voltage, min, max } => {
                write!(f, "Voltage {voltage} V out of range for this DMA: valid range [{min}, {max}]")
            }

            // ---- Grids and vectors ----
            DMAError::EmptyGrid => write!(f, "Grid must contain at least one entry"),
            DMAError::InvalidVoltage { index, value } => {
                write!(f, "Invalid voltage at index {index}: {value} (must be finite and > 0)")
            }
            DMAError::InvalidDiameter { index, value } => {
                write!(f, "Invalid diameter at index {index}: {value} (must be finite and > 0)")
            }
            DMAError::UnsortedGrid { index } => {
                write!(f, "Grid is not strictly increasing at index {index}")
            }
            DMAError::DimensionMismatch { context, expected, found } => {
                write!(f, "Dimension mismatch in {context}: expected {expected}, found {found}")
            }
            DMAError::InvalidMatrixEntry { row, col, value } => {
                write!(f, "Invalid response-matrix entry at ({row}, {col}): {value}")
            }
            DMAError::NonFiniteObserved { index, value } => {
                write!(f, "Non-finite observed response at index {index}: {value}")
            }
            DMAError::ZeroObservedChannel { index, value } => {
                write!(
                    f,
                    "Observed response at index {index} is {value}; the discrepancy divides by \
                     each observed channel, so zero channels must be removed or rebinned"
                )
            }

            // ---- Inversion ----
            DMAError::InvalidAlpha { value, reason } => {
                write!(f, "Invalid regularization strength {value}: {reason}")
            }
            DMAError::SingularSystem { alpha } => {
                write!(f, "Regularized normal equations are singular at alpha = {alpha}")
            }

            // ---- Regularization search ----
            DMAError::NonConvergence { best_alpha, iterations, status } => {
                write!(
                    f,
                    "Regularization search did not converge after {iterations} iterations \
                     ({status}); best alpha = {best_alpha}"
                )
            }
            DMAError::OptimizationFailed { status } => {
                write!(f, "Regularization search failed: {status}")
            }

            // ---- Wrapped ----
            DMAError::Physics(err) => write!(f, "Physics error: {err}"),
        }
    }
}

impl From<PhysicsError> for DMAError {
    fn from(err: PhysicsError) -> DMAError {
        DMAError::Physics(err)
    }
}

impl From<OptError> for DMAError {
    fn from(err: OptError) -> DMAError {
        match err {
            OptError::SingularSystem { alpha } => DMAError::SingularSystem { alpha },
            OptError::DimensionMismatch { context, expected, found } => {
                DMAError::DimensionMismatch { context, expected, found }
            }
            OptError::ObjectiveFailed { text } => DMAError::OptimizationFailed { status: text },
            other => DMAError::OptimizationFailed { status: other.to_string() },
        }
    }
}

#[cfg(feature = "python-bindings")]
impl std::convert::From<DMAError> for PyErr {
    fn from(err: DMAError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
