//! dma::transfer — per-particle response terms of a DMA.
//!
//! Purpose
//! -------
//! Evaluate, for a particle of diameter `dp` carrying `k` charges at applied
//! voltage `V`, the three factors that make up one response-matrix term:
//!
//! - penetration efficiency `Tl(dp)` ([`penetration`]),
//! - bipolar charging efficiency `Tc(dp, k)` ([`charging`]),
//! - diffusion-broadened transfer function `Ω(dp, V, k)` ([`broadening`]).
//!
//! Key behaviors
//! -------------
//! - [`TransferModel`] borrows a [`DMAGeometry`] and precomputes everything
//!   that does not depend on the particle (`β`, `G`).
//! - [`ResponseTerms`] is the seam consumed by the matrix builder; any term
//!   provider (a stub in tests, a calibrated model) can drive it.
//!
//! Conventions
//! -----------
//! - SI units throughout (m, K, V); flows are converted from L/min inside.
//! - Friction is evaluated at the geometry temperature and standard
//!   pressure.
//! - Methods are infallible and expect `dp > 0`, `V > 0`; grids are
//!   validated once by the callers.

pub mod broadening;
pub mod charging;
pub mod penetration;

use crate::{
    dma::core::DMAGeometry,
    dma::transfer::{
        broadening::{broadening_sigma, geometry_factor, stolzenburg_transfer},
        charging::{boltzmann_charge_fraction, charging_efficiency},
        penetration::{deposition_parameter, penetration_from_parameter},
    },
    physics::{
        constants::{K_B, Q_E},
        friction::friction,
        mobility::electrical_mobility,
    },
};

/// Terms summed into a response-matrix entry.
///
/// An entry is `Σ_{k=1..charge_limit} transfer(dp, V, k) · charging(dp, k) · penetration(dp)`.
pub trait ResponseTerms {
    /// Highest charge state included in the sum.
    fn charge_limit(&self) -> u32;

    /// Penetration efficiency; independent of voltage and charge.
    fn penetration(&self, dp: f64) -> f64;

    /// Charging efficiency; independent of voltage.
    fn charging(&self, dp: f64, charge: i32) -> f64;

    /// Transfer probability at `voltage`.
    fn transfer(&self, dp: f64, voltage: f64, charge: i32) -> f64;
}

/// Physical transfer model bound to one instrument geometry.
#[derive(Debug, Clone, Copy)]
pub struct TransferModel<'g> {
    geometry: &'g DMAGeometry,
    beta: f64,
    g_factor: f64,
}

impl<'g> TransferModel<'g> {
    pub fn new(geometry: &'g DMAGeometry) -> Self {
        let beta = geometry.flow_ratio();
        let g_factor = geometry_factor(&geometry.electrodes(), beta);
        Self { geometry, beta, g_factor }
    }

    pub fn geometry(&self) -> &DMAGeometry {
        self.geometry
    }

    /// `D = k_B·T / f(dp, T)` in m²/s.
    pub fn diffusion_coefficient(&self, dp: f64) -> f64 {
        let t = self.geometry.temperature();
        K_B * t / friction(dp, t)
    }

    /// Electrical mobility `Z = k·e / f(dp, T)` in m²/(V·s).
    pub fn electrical_mobility(&self, dp: f64, charge: i32) -> f64 {
        electrical_mobility(dp, charge, self.geometry.temperature())
    }

    /// Penetration efficiency `Tl(dp)` through the inlet plumbing.
    pub fn penetration_efficiency(&self, dp: f64) -> f64 {
        let u = deposition_parameter(
            self.diffusion_coefficient(dp),
            self.geometry.l_eff(),
            self.geometry.flow_aerosol(),
        );
        penetration_from_parameter(u)
    }

    /// Charging efficiency `Tc(dp, k)`; see [`charging`] for the branches.
    pub fn charging_efficiency(&self, dp: f64, charge: i32) -> f64 {
        charging_efficiency(dp, charge, self.geometry.temperature())
    }

    /// Closed-form Boltzmann charge fraction for any `charge`.
    pub fn boltzmann_charge_fraction(&self, dp: f64, charge: i32) -> f64 {
        boltzmann_charge_fraction(dp, charge, self.geometry.temperature())
    }

    /// Diffusional broadening width `σ(dp)`.
    pub fn sigma(&self, dp: f64) -> f64 {
        broadening_sigma(
            self.g_factor,
            self.geometry.electrodes().length,
            self.diffusion_coefficient(dp),
            self.geometry.flow_sheath(),
        )
    }

    /// Transfer probability `Ω(dp, V, k)`, floored at 1e-60.
    ///
    /// `z̃ = |Z(dp, k) / Z*(V)|` is the particle mobility relative to the
    /// centroid selected at `voltage`.
    pub fn transfer_function(&self, dp: f64, voltage: f64, charge: i32) -> f64 {
        let t = self.geometry.temperature();
        let f = friction(dp, t);
        let diffusion = K_B * t / f;
        let sigma = broadening_sigma(
            self.g_factor,
            self.geometry.electrodes().length,
            diffusion,
            self.geometry.flow_sheath(),
        );
        let z = f64::from(charge) * Q_E / f;
        let z_tilde = (z / self.geometry.centroid_mobility(voltage)).abs();
        stolzenburg_transfer(z_tilde, self.beta, sigma)
    }
}

impl ResponseTerms for TransferModel<'_> {
    fn charge_limit(&self) -> u32 {
        self.geometry.charge_limit()
    }

    fn penetration(&self, dp: f64) -> f64 {
        self.penetration_efficiency(dp)
    }

    fn charging(&self, dp: f64, charge: i32) -> f64 {
        self.charging_efficiency(dp, charge)
    }

    fn transfer(&self, dp: f64, voltage: f64, charge: i32) -> f64 {
        self.transfer_function(dp, voltage, charge)
    }
}
