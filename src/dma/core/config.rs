//! Construction-time configuration for a DMA session.
//!
//! [`DMAConfig`] is a plain record; validation happens in
//! [`DMAGeometry::new`](crate::dma::core::DMAGeometry::new).
use crate::dma::core::model::DMAModel;
use crate::physics::constants::STANDARD_PRESSURE;

/// Configuration record for [`DMAGeometry`](crate::dma::core::DMAGeometry).
///
/// Units
/// -----
/// - `flow_aerosol`, `flow_sheath`: L/min
/// - `l_eff`: m (effective diffusion length of the inlet plumbing)
/// - `voltage`: V (initial applied voltage, must be inside the model's
///   voltage domain)
/// - `pressure`: Pa
/// - `temperature`: K
/// - `charge_limit`: highest charge state summed in the response matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DMAConfig {
    pub model: DMAModel,
    pub flow_aerosol: f64,
    pub flow_sheath: f64,
    pub l_eff: f64,
    pub voltage: f64,
    pub pressure: f64,
    pub temperature: f64,
    pub charge_limit: u32,
}

impl DMAConfig {
    /// Record for `model` at standard pressure and 298.15 K with a 10:1
    /// sheath-to-aerosol ratio (1.5 / 15 L/min), `l_eff = 5 m`, 100 V, and
    /// three charge states.
    pub fn with_model(model: DMAModel) -> Self {
        Self {
            model,
            flow_aerosol: 1.5,
            flow_sheath: 15.0,
            l_eff: 5.0,
            voltage: 100.0,
            pressure: STANDARD_PRESSURE,
            temperature: 298.15,
            charge_limit: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // `with_model` fills ambient defaults and keeps the requested model.
    fn with_model_sets_ambient_defaults() {
        let cfg = DMAConfig::with_model(DMAModel::Long);
        assert_eq!(cfg.model, DMAModel::Long);
        assert_eq!(cfg.pressure, 101_325.0);
        assert_eq!(cfg.flow_sheath / cfg.flow_aerosol, 10.0);
        assert_eq!(cfg.charge_limit, 3);
    }
}
