//! dma — forward and inverse modeling of Differential Mobility Analyzer data.
//!
//! Purpose
//! -------
//! Reconstruct an aerosol size distribution from DMA channel signals. The
//! measured response is a convolution of the true distribution with the
//! instrument's response matrix; recovering the distribution is an
//! ill-posed inverse problem solved by Tikhonov regularization.
//!
//! Key behaviors
//! -------------
//! - [`core`]: instrument configuration ([`DMAConfig`]), validated geometry
//!   ([`DMAGeometry`]) with centroid mobility and voltage updates.
//! - [`transfer`]: penetration, charging, and broadened transfer terms
//!   ([`TransferModel`]) behind the [`ResponseTerms`] seam.
//! - [`kernel`]: square response matrix over a diameter/voltage grid, with
//!   or without penetration losses.
//! - [`inversion`]: forward convolution and regularized deconvolution.
//! - [`regularization`]: search for the regularization strength.
//! - [`sizing`], [`distribution`]: voltage ↔ diameter mapping and tabulated
//!   distribution lookup.
//!
//! Conventions
//! -----------
//! - SI units (m, K, Pa, V) except flows, which are L/min.
//! - Diameter bin `j` and voltage channel `i` index the columns and rows of
//!   the response matrix; the system is square.
//! - Every public operation validates its inputs and returns
//!   [`DMAResult<T>`]; nothing panics on bad input.
//!
//! Data flow
//! ---------
//! ```text
//! DMAConfig → DMAGeometry → TransferModel → build_response_matrix
//!                                              ↓
//!          observed R ─────────→ find_optimal_alpha → deconvolve → N
//! ```

pub mod core;
pub mod distribution;
pub mod errors;
pub mod inversion;
pub mod kernel;
pub mod regularization;
pub mod sizing;
pub mod transfer;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{DMAConfig, DMAGeometry, DMAModel, Electrodes};
pub use self::distribution::{interpolate_distribution, interpolate_onto};
pub use self::errors::{DMAError, DMAResult};
pub use self::inversion::{convolve, deconvolve};
pub use self::kernel::{KernelMode, ResponseMatrix, build_response_matrix};
pub use self::regularization::{
    AlphaSearchContext, AlphaSearchOptions, AlphaSearchOutcome, DEFAULT_ALPHA_GUESS,
    find_optimal_alpha,
};
pub use self::sizing::{ChannelSizing, channel_diameters, channel_voltages};
pub use self::transfer::{ResponseTerms, TransferModel};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use dma_inversion::dma::prelude::*;
//
// to import the main DMA surface in a single line.

pub mod prelude {
    pub use super::{
        AlphaSearchOptions, AlphaSearchOutcome, DMAConfig, DMAError, DMAGeometry, DMAModel,
        DMAResult, KernelMode, ResponseMatrix, ResponseTerms, TransferModel,
        build_response_matrix, channel_diameters, channel_voltages, convolve, deconvolve,
        find_optimal_alpha,
    };
}
