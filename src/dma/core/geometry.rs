//! DMAGeometry — validated instrument state and centroid mobility.
//!
//! Purpose
//! -------
//! Hold a DMA column's physical and operating configuration (electrodes,
//! flows, ambient conditions, charge limit) and derive the geometric constant
//! `A = L / ln(R2/R1)` and the centroid electrical mobility selected at a
//! given voltage:
//!
//! ```text
//! Z*(V) = 2·Q_sh / (4π·A·V)        (Q_sh in m³/s)
//! ```
//!
//! Invariants & assumptions
//! ------------------------
//! - Everything except the applied voltage (and its centroid mobility) is
//!   fixed at construction.
//! - [`DMAGeometry::update_voltage`] is the only mutator. On failure it
//!   leaves the previous voltage and mobility untouched.
//! - [`DMAGeometry::update_voltage_or_invalidate`] opts into the zeroed
//!   "invalid" state instead; [`DMAGeometry::has_valid_voltage`] reports it.
//! - Pressure is recorded for completeness; the transfer model evaluates
//!   friction at standard pressure.
use crate::{
    dma::{
        core::{
            config::DMAConfig,
            model::{DMAModel, Electrodes},
            validation::{
                validate_charge_limit, validate_effective_length, validate_flow,
                validate_pressure, validate_temperature, validate_voltage_in_range,
            },
        },
        errors::DMAResult,
    },
    physics::constants::LPM_TO_M3_PER_S,
};
use std::f64::consts::PI;

#[derive(Debug, Clone, PartialEq)]
pub struct DMAGeometry {
    model: DMAModel,
    electrodes: Electrodes,
    geometric_constant: f64,
    flow_aerosol: f64,
    flow_sheath: f64,
    l_eff: f64,
    pressure: f64,
    temperature: f64,
    charge_limit: u32,
    voltage_range: (f64, f64),
    voltage: f64,
    mobility: f64,
}

impl DMAGeometry {
    /// Validate `config` and build the instrument state.
    ///
    /// # Errors
    /// - `InvalidFlow`, `InvalidTemperature`, `InvalidPressure`,
    ///   `InvalidEffectiveLength`, `InvalidChargeLimit` for bad scalars.
    /// - `OutOfRangeVoltage` if the initial voltage is outside the model's
    ///   voltage domain.
    pub fn new(config: &DMAConfig) -> DMAResult<Self> {
        let flow_aerosol = validate_flow("aerosol", config.flow_aerosol)?;
        let flow_sheath = validate_flow("sheath", config.flow_sheath)?;
        let l_eff = validate_effective_length(config.l_eff)?;
        let pressure = validate_pressure(config.pressure)?;
        let temperature = validate_temperature(config.temperature)?;
        let charge_limit = validate_charge_limit(config.charge_limit)?;
        let voltage_range = config.model.voltage_range();
        let voltage = validate_voltage_in_range(config.voltage, voltage_range)?;

        let electrodes = config.model.electrodes();
        let geometric_constant = electrodes.length / (electrodes.r2 / electrodes.r1).ln();
        let mut geometry = Self {
            model: config.model,
            electrodes,
            geometric_constant,
            flow_aerosol,
            flow_sheath,
            l_eff,
            pressure,
            temperature,
            charge_limit,
            voltage_range,
            voltage,
            mobility: 0.0,
        };
        geometry.mobility = geometry.centroid_mobility(voltage);
        Ok(geometry)
    }

    /// Centroid mobility `Z*(V)` in m²/(V·s) selected at `voltage`.
    ///
    /// Pure; does not touch the stored voltage. Callers pass `voltage > 0`.
    pub fn centroid_mobility(&self, voltage: f64) -> f64 {
        2.0 * self.flow_sheath * LPM_TO_M3_PER_S / (4.0 * PI * self.geometric_constant * voltage)
    }

    /// Inverse of [`centroid_mobility`](Self::centroid_mobility): the voltage
    /// that selects `mobility`.
    pub fn voltage_for_mobility(&self, mobility: f64) -> f64 {
        2.0 * self.flow_sheath * LPM_TO_M3_PER_S / (4.0 * PI * self.geometric_constant * mobility)
    }

    /// Set a new applied voltage and recompute the centroid mobility.
    ///
    /// # Errors
    /// - `OutOfRangeVoltage` if `voltage` is outside the domain; the previous
    ///   voltage and mobility are kept.
    pub fn update_voltage(&mut self, voltage: f64) -> DMAResult<()> {
        let voltage = validate_voltage_in_range(voltage, self.voltage_range)?;
        self.voltage = voltage;
        self.mobility = self.centroid_mobility(voltage);
        Ok(())
    }

    /// Like [`update_voltage`](Self::update_voltage), but on failure zeroes
    /// voltage and mobility before returning the error.
    pub fn update_voltage_or_invalidate(&mut self, voltage: f64) -> DMAResult<()> {
        let result = self.update_voltage(voltage);
        if result.is_err() {
            self.voltage = 0.0;
            self.mobility = 0.0;
        }
        result
    }

    /// `false` after a failed [`update_voltage_or_invalidate`](Self::update_voltage_or_invalidate).
    pub fn has_valid_voltage(&self) -> bool {
        self.voltage > 0.0
    }

    /// Mobility domain `(min, max)` reachable inside the voltage domain.
    pub fn mobility_range(&self) -> (f64, f64) {
        let (v_min, v_max) = self.voltage_range;
        (self.centroid_mobility(v_max), self.centroid_mobility(v_min))
    }

    /// Aerosol-to-sheath flow ratio `β = Q_a / Q_sh`.
    pub fn flow_ratio(&self) -> f64 {
        self.flow_aerosol / self.flow_sheath
    }

    pub fn model(&self) -> DMAModel {
        self.model
    }

    pub fn electrodes(&self) -> Electrodes {
        self.electrodes
    }

    /// `A = L / ln(R2/R1)` in m.
    pub fn geometric_constant(&self) -> f64 {
        self.geometric_constant
    }

    pub fn flow_aerosol(&self) -> f64 {
        self.flow_aerosol
    }

    pub fn flow_sheath(&self) -> f64 {
        self.flow_sheath
    }

    pub fn l_eff(&self) -> f64 {
        self.l_eff
    }

    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn charge_limit(&self) -> u32 {
        self.charge_limit
    }

    pub fn voltage_range(&self) -> (f64, f64) {
        self.voltage_range
    }

    pub fn voltage(&self) -> f64 {
        self.voltage
    }

    /// Centroid mobility at the current voltage.
    pub fn mobility(&self) -> f64 {
        self.mobility
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dma::errors::DMAError;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Construction-time validation and derived quantities.
    // - The two voltage-update policies (keep state vs invalidate).
    // - Inverse relation between voltage and centroid mobility.
    // -------------------------------------------------------------------------

    fn long_config() -> DMAConfig {
        DMAConfig {
            model: DMAModel::Long,
            flow_aerosol: 0.3,
            flow_sheath: 3.0,
            l_eff: 5.0,
            voltage: 100.0,
            pressure: 101_325.0,
            temperature: 298.15,
            charge_limit: 3,
        }
    }

    #[test]
    // Purpose
    // -------
    // Derived quantities follow from the electrodes and flows.
    //
    // Given
    // -----
    // - Long column, Q_sh = 3 L/min, V = 100 V.
    //
    // Expect
    // ------
    // - A = L / ln(R2/R1), Z* = 2 Q_sh / (4π A V), β = 0.1.
    fn new_derives_geometric_constant_and_mobility() {
        // Arrange
        let cfg = long_config();

        // Act
        let g = DMAGeometry::new(&cfg).unwrap();

        // Assert
        let a = 44.37e-2 / (19.61e-3f64 / 9.37e-3).ln();
        assert_relative_eq!(g.geometric_constant(), a, max_relative = 1e-12);
        let z = 2.0 * 3.0 * 1.66667e-5 / (4.0 * PI * a * 100.0);
        assert_relative_eq!(g.mobility(), z, max_relative = 1e-12);
        assert_relative_eq!(g.flow_ratio(), 0.1, max_relative = 1e-12);
        assert!(g.has_valid_voltage());
    }

    #[test]
    // Purpose
    // -------
    // Construction rejects an initial voltage outside the domain and bad
    // scalars.
    fn new_rejects_invalid_configuration() {
        let mut cfg = long_config();
        cfg.voltage = 2.0e4;
        assert!(matches!(DMAGeometry::new(&cfg), Err(DMAError::OutOfRangeVoltage { .. })));

        let mut cfg = long_config();
        cfg.flow_sheath = 0.0;
        assert_eq!(
            DMAGeometry::new(&cfg),
            Err(DMAError::InvalidFlow { name: "sheath", value: 0.0 })
        );

        let mut cfg = long_config();
        cfg.charge_limit = 0;
        assert!(matches!(DMAGeometry::new(&cfg), Err(DMAError::InvalidChargeLimit { .. })));
    }

    #[test]
    // Purpose
    // -------
    // `update_voltage` rejects 2.0e4 V on the long column and keeps the
    // previous state, accepts a voltage strictly inside, and updates the
    // mobility accordingly.
    fn update_voltage_rejects_out_of_range_and_keeps_state() {
        // Arrange
        let mut g = DMAGeometry::new(&long_config()).unwrap();
        let before = (g.voltage(), g.mobility());

        // Act
        let err = g.update_voltage(2.0e4).unwrap_err();

        // Assert
        assert_eq!(err, DMAError::OutOfRangeVoltage { voltage: 2.0e4, min: 0.998, max: 1.0001e4 });
        assert_eq!((g.voltage(), g.mobility()), before);

        g.update_voltage(5000.0).unwrap();
        assert_eq!(g.voltage(), 5000.0);
        assert_relative_eq!(g.mobility(), before.1 / 50.0, max_relative = 1e-12);
        assert!(g.update_voltage(0.5).is_err());
    }

    #[test]
    // Purpose
    // -------
    // The invalidating policy zeroes voltage and mobility on failure.
    fn update_voltage_or_invalidate_zeroes_state() {
        let mut g = DMAGeometry::new(&long_config()).unwrap();
        assert!(g.update_voltage_or_invalidate(2.0e4).is_err());
        assert_eq!(g.voltage(), 0.0);
        assert_eq!(g.mobility(), 0.0);
        assert!(!g.has_valid_voltage());

        g.update_voltage_or_invalidate(250.0).unwrap();
        assert!(g.has_valid_voltage());
    }

    #[test]
    // Purpose
    // -------
    // `voltage_for_mobility` inverts `centroid_mobility`, and the mobility
    // domain is ordered (high voltage selects low mobility).
    fn voltage_and_mobility_are_inverse() {
        let g = DMAGeometry::new(&long_config()).unwrap();
        for &v in &[1.0, 37.5, 9999.0] {
            assert_relative_eq!(
                g.voltage_for_mobility(g.centroid_mobility(v)),
                v,
                max_relative = 1e-12
            );
        }
        let (z_min, z_max) = g.mobility_range();
        assert!(z_min < z_max);
        assert_relative_eq!(z_min, g.centroid_mobility(1.0001e4), max_relative = 1e-12);
    }
}
