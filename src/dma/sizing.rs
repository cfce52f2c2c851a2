//! Mapping between channel voltages and the particle diameters they select.
//!
//! - [`channel_diameters`]: for each voltage, the centroid mobility `Z*(V)`
//!   and the diameter of a particle with `charge` charges at that mobility.
//! - [`channel_voltages`]: the inverse, the voltage whose centroid mobility
//!   equals each diameter's mobility. Useful for building square
//!   diameter/voltage grids.
//!
//! Both use the geometry temperature for the gas properties.
use crate::{
    dma::{
        core::{
            DMAGeometry,
            validation::{validate_diameters, validate_voltage_in_range, validate_voltages},
        },
        errors::DMAResult,
    },
    physics::{
        errors::PhysicsError,
        mobility::{diameter_from_mobility, electrical_mobility},
    },
};
use ndarray::{Array1, ArrayView1};

/// Diameters and centroid mobilities selected by a voltage grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSizing {
    /// Selected diameter per channel, m.
    pub diameters: Array1<f64>,
    /// Centroid mobility per channel, m²/(V·s).
    pub mobilities: Array1<f64>,
}

/// Diameter selected at each voltage for particles carrying `charge`.
///
/// Errors
/// ------
/// - `EmptyGrid` / `InvalidVoltage` for a bad grid.
/// - `OutOfRangeVoltage` for voltages outside the instrument domain.
/// - `Physics(ZeroCharge)` for `charge == 0`, `Physics(NoSignChange)` if a
///   mobility falls outside the 1 nm – 1 mm search bracket.
pub fn channel_diameters(
    geometry: &DMAGeometry, voltages: ArrayView1<f64>, charge: i32,
) -> DMAResult<ChannelSizing> {
    let n = validate_voltages(voltages)?;
    if charge == 0 {
        return Err(PhysicsError::ZeroCharge.into());
    }
    let sign = f64::from(charge.signum());
    let mut diameters = Array1::<f64>::zeros(n);
    let mut mobilities = Array1::<f64>::zeros(n);
    for (i, &voltage) in voltages.iter().enumerate() {
        validate_voltage_in_range(voltage, geometry.voltage_range())?;
        let mobility = geometry.centroid_mobility(voltage);
        diameters[i] = diameter_from_mobility(sign * mobility, charge, geometry.temperature())?;
        mobilities[i] = mobility;
    }
    Ok(ChannelSizing { diameters, mobilities })
}

/// Voltage that centres the transfer window on each diameter for
/// particles carrying `charge`.
///
/// Voltages are not range-checked: small diameters map above the operating
/// domain on short columns.
pub fn channel_voltages(
    geometry: &DMAGeometry, diameters: ArrayView1<f64>, charge: i32,
) -> DMAResult<Array1<f64>> {
    validate_diameters(diameters)?;
    if charge == 0 {
        return Err(PhysicsError::ZeroCharge.into());
    }
    let t = geometry.temperature();
    Ok(diameters.mapv(|dp| geometry.voltage_for_mobility(electrical_mobility(dp, charge, t).abs())))
}
