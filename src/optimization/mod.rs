//! optimization — cost minimizer, numerical helpers, and unified error surface.
//!
//! Purpose
//! -------
//! Provide a small, reusable optimization layer on top of `argmin`. Callers
//! implement [`cost_optimizer::Objective`], choose a solver and stopping
//! rules, and get back a normalized [`cost_optimizer::OptimOutcome`]
//! without touching backend solver types.
//!
//! Key behaviors
//! -------------
//! - `cost_optimizer`: **minimizes** a scalar cost `c(θ)` with L-BFGS
//!   (More–Thuente or Hager–Zhang line search, finite-difference gradients
//!   by default) or with derivative-free Nelder–Mead.
//! - `numerical_stability`: softplus transforms for mapping unconstrained
//!   `θ` to strictly positive model parameters.
//! - `errors`: one enum (`OptError`) with a common alias (`OptResult<T>`)
//!   for configuration issues, numerical failures, backend errors, and the
//!   objective failures the DMA layer forwards into the optimizer.
//!
//! Conventions
//! -----------
//! - Parameters and gradients are `ndarray` vectors (`Theta`, `Grad`).
//! - Running out of iterations is reported through
//!   `OptimOutcome::converged`, not as an error; the caller decides whether
//!   that is acceptable.
//! - Progress output is opt-in via the `obs_slog` feature and
//!   `MinimizeOptions::verbose`.

pub mod cost_optimizer;
pub mod errors;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use dma_inversion::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::cost_optimizer::prelude::*;
    pub use super::errors::{OptError, OptResult};
    pub use super::numerical_stability::prelude::*;
}
