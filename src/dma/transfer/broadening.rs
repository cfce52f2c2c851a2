//! Diffusion-broadened DMA transfer function (Stolzenburg & McMurry).
//!
//! For balanced sheath/excess flows, with `β = Q_a/Q_sh`, `γ = (R1/R2)²`:
//!
//! ```text
//! I = (1 + γ)/2
//! κ = L·R2 / (R2² − R1²)
//! G = 4(1+β)² / (1−γ) · [I + (2(1+β)κ)^{-2}]
//! σ = √(2·G·π·L·D / Q_sh)
//!
//! Ω(z̃) = σ/(√2 β) · [ε((z̃−(1+β))/(√2σ)) + ε((z̃−(1−β))/(√2σ)) − 2ε((z̃−1)/(√2σ))]
//! ε(x) = x·erf(x) + e^{−x²}/√π
//! ```
//!
//! `Ω` is floored at [`TRANSFER_FLOOR`]: far from the centroid the three ε
//! terms cancel to rounding noise that may be negative.
use crate::{dma::core::Electrodes, physics::constants::LPM_TO_M3_PER_S};
use statrs::function::erf::erf;
use std::f64::consts::{PI, SQRT_2};

/// Lower bound applied to every transfer-function value.
pub const TRANSFER_FLOOR: f64 = 1e-60;

/// `ε(x) = x·erf(x) + exp(−x²)/√π`.
pub fn epsilon(x: f64) -> f64 {
    x * erf(x) + (-x * x).exp() / PI.sqrt()
}

/// Geometry factor `G` for flow ratio `beta`.
pub fn geometry_factor(electrodes: &Electrodes, beta: f64) -> f64 {
    let Electrodes { r1, r2, length } = *electrodes;
    let gamma = (r1 / r2).powi(2);
    let i_term = 0.5 * (1.0 + gamma);
    let kappa = length * r2 / (r2.powi(2) - r1.powi(2));
    4.0 * (1.0 + beta).powi(2) / (1.0 - gamma) * (i_term + (2.0 * (1.0 + beta) * kappa).powi(-2))
}

/// Broadening width `σ` for diffusion coefficient `diffusion` [m²/s] and
/// sheath flow `flow_sheath` [L/min].
pub fn broadening_sigma(g_factor: f64, length: f64, diffusion: f64, flow_sheath: f64) -> f64 {
    (2.0 * g_factor * PI * length * diffusion / (flow_sheath * LPM_TO_M3_PER_S)).sqrt()
}

/// Transfer probability `Ω(z̃, β, σ)`, floored at [`TRANSFER_FLOOR`].
pub fn stolzenburg_transfer(z_tilde: f64, beta: f64, sigma: f64) -> f64 {
    let scale = SQRT_2 * sigma;
    let omega = sigma / (SQRT_2 * beta)
        * (epsilon((z_tilde - (1.0 + beta)) / scale) + epsilon((z_tilde - (1.0 - beta)) / scale)
            - 2.0 * epsilon((z_tilde - 1.0) / scale));
    omega.max(TRANSFER_FLOOR)
}
