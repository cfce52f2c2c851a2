//! Diffusional penetration efficiency `Tl` (Reineking & Porstendörfer).
//!
//! ```text
//! u  = D·L_eff / Q_a                     (Q_a in m³/s)
//! Tl = 0.82·e^{−11.5u} + 0.10·e^{−70u} + 0.03·e^{−180u} + 0.02·e^{−340u}
//! ```
use crate::physics::constants::LPM_TO_M3_PER_S;

/// `(weight, decay rate)` pairs of the four-term fit, summed in this order.
pub const PENETRATION_TERMS: [(f64, f64); 4] =
    [(0.82, 11.5), (0.10, 70.0), (0.03, 180.0), (0.02, 340.0)];

/// Dimensionless deposition parameter `u` for diffusion coefficient
/// `diffusion` [m²/s], effective length `l_eff` [m], and aerosol flow
/// `flow_aerosol` [L/min].
pub fn deposition_parameter(diffusion: f64, l_eff: f64, flow_aerosol: f64) -> f64 {
    diffusion * l_eff / (flow_aerosol * LPM_TO_M3_PER_S)
}

/// Penetration efficiency for deposition parameter `u`.
pub fn penetration_from_parameter(u: f64) -> f64 {
    PENETRATION_TERMS.iter().map(|&(weight, rate)| weight * (-rate * u).exp()).sum()
}
