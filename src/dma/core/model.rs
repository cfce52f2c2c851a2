//! Instrument variants and their fixed electrode geometry.
//!
//! - [`DMAModel`] selects the column (`nano` or `long`).
//! - [`Electrodes`] carries the inner/outer radii and classification length.
//!
//! Both variants share the same operating voltage domain. The long column
//! also carries nominal diameter and concentration ranges taken from its
//! operating manual; they are informational and not enforced.
use crate::dma::errors::{DMAError, DMAResult};
use std::str::FromStr;

/// Operating voltage domain shared by both columns, in volts.
pub const VOLTAGE_RANGE: (f64, f64) = (0.998, 1.0001e4);

/// Electrode geometry of a cylindrical DMA column, in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Electrodes {
    /// Inner electrode radius `R1`.
    pub r1: f64,
    /// Outer electrode radius `R2`.
    pub r2: f64,
    /// Classification length `L`.
    pub length: f64,
}

/// DMA column variant.
///
/// Parsing is case-insensitive (`"nano"`, `"long"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DMAModel {
    /// Short column for sub-50 nm particles.
    Nano,
    /// Long column.
    Long,
}

impl DMAModel {
    pub fn electrodes(&self) -> Electrodes {
        match self {
            DMAModel::Nano => Electrodes { r1: 0.937e-2, r2: 1.905e-2, length: 4.987e-2 },
            DMAModel::Long => Electrodes { r1: 9.37e-3, r2: 19.61e-3, length: 44.37e-2 },
        }
    }

    /// Valid applied-voltage domain `(min, max)` in volts.
    pub fn voltage_range(&self) -> (f64, f64) {
        VOLTAGE_RANGE
    }

    /// Nominal sizing range `(min, max)` in metres, when documented.
    pub fn nominal_diameter_range(&self) -> Option<(f64, f64)> {
        match self {
            DMAModel::Nano => None,
            DMAModel::Long => Some((10e-9, 487e-9)),
        }
    }

    /// Nominal number-concentration range `(min, max)` in particles/cm³,
    /// when documented.
    pub fn nominal_concentration_range(&self) -> Option<(f64, f64)> {
        match self {
            DMAModel::Nano => None,
            DMAModel::Long => Some((1e2, 1e7)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DMAModel::Nano => "nano",
            DMAModel::Long => "long",
        }
    }
}

impl FromStr for DMAModel {
    type Err = DMAError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nano" => Ok(DMAModel::Nano),
            "long" => Ok(DMAModel::Long),
            _ => Err(DMAError::UnknownModel { name: s.to_string() }),
        }
    }
}

impl std::fmt::Display for DMAModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Parse a model name, mapping failures to [`DMAError::UnknownModel`].
pub fn parse_model(name: &str) -> DMAResult<DMAModel> {
    DMAModel::from_str(name)
}
