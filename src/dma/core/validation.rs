//! Validation helpers for DMA configuration, grids, and observed responses.
//!
//! Every public DMA operation checks its inputs at the boundary with these
//! helpers and returns a [`DMAError`] naming the offending value (and index,
//! for vectors). Nothing here panics.
use crate::{
    dma::errors::{DMAError, DMAResult},
    physics::errors::PhysicsError,
};
use ndarray::ArrayView1;

/// Largest charge limit a response model can track; charge states are
/// evaluated as `i32`.
pub const MAX_CHARGE_LIMIT: u32 = i32::MAX as u32;

/// Validate a volumetric flow in L/min.
///
/// Parameters
/// ----------
/// - `name`: `&'static str`
///   Which flow is being checked (`"aerosol"` or `"sheath"`); echoed in the
///   error.
/// - `value`: `f64`
///   Flow rate. Must be finite and strictly positive.
///
/// Errors
/// ------
/// - `DMAError::InvalidFlow` if `value` is NaN, ±∞, or ≤ 0.
///
/// Examples
/// --------
/// ```rust
/// # use dma_inversion::dma::core::validation::validate_flow;
/// use dma_inversion::dma::errors::DMAError;
///
/// assert!(validate_flow("sheath", 15.0).is_ok());
/// assert!(matches!(validate_flow("aerosol", 0.0), Err(DMAError::InvalidFlow { .. })));
/// ```
pub fn validate_flow(name: &'static str, value: f64) -> DMAResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(DMAError::InvalidFlow { name, value });
    }
    Ok(value)
}

/// Temperature in K; finite and > 0.
pub fn validate_temperature(value: f64) -> DMAResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(DMAError::InvalidTemperature { value });
    }
    Ok(value)
}

/// Pressure in Pa; finite and > 0.
pub fn validate_pressure(value: f64) -> DMAResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(DMAError::InvalidPressure { value });
    }
    Ok(value)
}

/// Effective diffusion length in m; finite and > 0.
pub fn validate_effective_length(value: f64) -> DMAResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(DMAError::InvalidEffectiveLength { value });
    }
    Ok(value)
}

/// Charge limit in `1..=MAX_CHARGE_LIMIT`.
pub fn validate_charge_limit(value: u32) -> DMAResult<u32> {
    if value == 0 || value > MAX_CHARGE_LIMIT {
        return Err(DMAError::InvalidChargeLimit { value });
    }
    Ok(value)
}

/// Check that `voltage` lies inside the closed interval `range`.
///
/// # Errors
/// - [`DMAError::OutOfRangeVoltage`] for values outside `[min, max]`
///   (including NaN).
pub fn validate_voltage_in_range(voltage: f64, range: (f64, f64)) -> DMAResult<f64> {
    let (min, max) = range;
    if !(voltage >= min && voltage <= max) {
        return Err(DMAError::OutOfRangeVoltage { voltage, min, max });
    }
    Ok(voltage)
}

/// Single particle diameter in m; finite and > 0.
///
/// # Errors
/// - `Physics(InvalidDiameter)`.
pub fn validate_diameter(value: f64) -> DMAResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PhysicsError::InvalidDiameter { value }.into());
    }
    Ok(value)
}

/// Single applied voltage in V; finite and > 0. Not range-checked.
///
/// # Errors
/// - `InvalidVoltage` reported at index 0.
pub fn validate_voltage(value: f64) -> DMAResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(DMAError::InvalidVoltage { index: 0, value });
    }
    Ok(value)
}

/// Validate a diameter grid: non-empty, every entry finite and > 0.
///
/// Returns the grid length.
pub fn validate_diameters(diameters: ArrayView1<f64>) -> DMAResult<usize> {
    if diameters.is_empty() {
        return Err(DMAError::EmptyGrid);
    }
    for (index, &value) in diameters.iter().enumerate() {
        if !value.is_finite() || value <= 0.0 {
            return Err(DMAError::InvalidDiameter { index, value });
        }
    }
    Ok(diameters.len())
}

/// Validate a voltage grid: non-empty, every entry finite and > 0.
///
/// Entries are not range-checked against an instrument: a grid may be built
/// for analysis outside the operating domain.
pub fn validate_voltages(voltages: ArrayView1<f64>) -> DMAResult<usize> {
    if voltages.is_empty() {
        return Err(DMAError::EmptyGrid);
    }
    for (index, &value) in voltages.iter().enumerate() {
        if !value.is_finite() || value <= 0.0 {
            return Err(DMAError::InvalidVoltage { index, value });
        }
    }
    Ok(voltages.len())
}

/// Require `found == expected`, reporting `context` otherwise.
pub fn validate_len(context: &'static str, expected: usize, found: usize) -> DMAResult<()> {
    if expected != found {
        return Err(DMAError::DimensionMismatch { context, expected, found });
    }
    Ok(())
}

/// Validate an observed response used as a divisor in the discrepancy.
///
/// Errors
/// ------
/// - `DMAError::EmptyGrid` for an empty response.
/// - `DMAError::NonFiniteObserved` for NaN/±∞ channels.
/// - `DMAError::ZeroObservedChannel` for channels whose magnitude is zero or
///   subnormal (`< f64::MIN_POSITIVE`); dividing by them overflows.
pub fn validate_observed(observed: ArrayView1<f64>) -> DMAResult<()> {
    if observed.is_empty() {
        return Err(DMAError::EmptyGrid);
    }
    for (index, &value) in observed.iter().enumerate() {
        if !value.is_finite() {
            return Err(DMAError::NonFiniteObserved { index, value });
        }
        if value.abs() < f64::MIN_POSITIVE {
            return Err(DMAError::ZeroObservedChannel { index, value });
        }
    }
    Ok(())
}

/// Any finite response vector (zeros allowed), e.g. for deconvolution.
pub fn validate_response(response: ArrayView1<f64>) -> DMAResult<()> {
    if response.is_empty() {
        return Err(DMAError::EmptyGrid);
    }
    for (index, &value) in response.iter().enumerate() {
        if !value.is_finite() {
            return Err(DMAError::NonFiniteObserved { index, value });
        }
    }
    Ok(())
}

/// Tikhonov strength for a single deconvolution: finite and ≥ 0.
pub fn validate_alpha(value: f64) -> DMAResult<f64> {
    if !value.is_finite() {
        return Err(DMAError::InvalidAlpha { value, reason: "Alpha must be finite." });
    }
    if value < 0.0 {
        return Err(DMAError::InvalidAlpha { value, reason: "Alpha must be non-negative." });
    }
    Ok(value)
}

/// Starting guess for the alpha search: finite and > 0.
pub fn validate_alpha_guess(value: f64) -> DMAResult<f64> {
    validate_alpha(value)?;
    if value == 0.0 {
        return Err(DMAError::InvalidAlpha {
            value,
            reason: "Initial alpha guess must be strictly positive.",
        });
    }
    Ok(value)
}
