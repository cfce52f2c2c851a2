//! dma::core — instrument configuration, geometry, and input validation.
//!
//! - [`model`]: column variants and their electrode constants.
//! - [`config`]: the construction-time [`DMAConfig`] record.
//! - [`geometry`]: validated [`DMAGeometry`] with centroid mobility and the
//!   voltage-update policies.
//! - [`validation`]: boundary checks shared by every DMA operation.

pub mod config;
pub mod geometry;
pub mod model;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::config::DMAConfig;
pub use self::geometry::DMAGeometry;
pub use self::model::{DMAModel, Electrodes, VOLTAGE_RANGE};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use dma_inversion::dma::core::prelude::*;
//
// to import the configuration surface in a single line.

pub mod prelude {
    pub use super::config::DMAConfig;
    pub use super::geometry::DMAGeometry;
    pub use super::model::{DMAModel, Electrodes};
}
