//! Physical constants and unit factors.
//!
//! Values are SI unless the name states otherwise. The reference air
//! properties follow the usual aerosol-instrument convention of 23 °C and one
//! standard atmosphere.

/// Boltzmann constant [J/K].
pub const K_B: f64 = 1.380649e-23;

/// Elementary charge [C].
pub const Q_E: f64 = 1.602176634e-19;

/// Coulomb constant `1/(4πε₀)` [N·m²/C²], rounded as in the bipolar
/// charge-distribution parameterisation.
pub const K_E: f64 = 9.0e9;

/// Conversion from litres per minute to m³/s.
pub const LPM_TO_M3_PER_S: f64 = 1.66667e-5;

/// Standard atmospheric pressure [Pa].
pub const STANDARD_PRESSURE: f64 = 101_325.0;

// ---- Reference air properties ----

/// Reference temperature for the air-property correlations [K].
pub const REFERENCE_TEMPERATURE: f64 = 296.15;

/// Dynamic viscosity of air at [`REFERENCE_TEMPERATURE`] [Pa·s].
pub const REFERENCE_VISCOSITY: f64 = 1.8325e-5;

/// Mean free path of air at [`REFERENCE_TEMPERATURE`] and
/// [`STANDARD_PRESSURE`] [m].
pub const REFERENCE_MEAN_FREE_PATH: f64 = 67.3e-9;

/// Sutherland constant for air [K].
pub const SUTHERLAND_CONSTANT: f64 = 110.4;

// ---- Cunningham slip-correction coefficients ----

/// Slip-correction coefficients `(A, B, C)` in
/// `Cc = 1 + Kn (A + B exp(-C / Kn))`, with `Kn = 2λ / Dp`.
pub const SLIP_COEFFICIENTS: (f64, f64, f64) = (1.257, 0.4, 1.1);
