//! cost_optimizer::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the core numeric types and solver aliases used by the cost
//! optimizer, so the rest of the optimization code stays agnostic to
//! `ndarray` and Argmin generics.
//!
//! Conventions
//! -----------
//! - `Theta` and `Grad` are column vectors with length equal to the number
//!   of free parameters (one for the regularization search).
//! - `Cost` is the scalar being **minimized**; no sign flips happen in this
//!   layer.
//! - `DEFAULT_LBFGS_MEM` is the L-BFGS history used unless
//!   `MinimizeOptions::lbfgs_mem` overrides it.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    neldermead::NelderMead,
    quasinewton::LBFGS,
};
use ndarray::Array1;
use std::collections::HashMap;

/// Parameter vector `θ` in unconstrained optimizer space.
pub type Theta = Array1<f64>;

/// Gradient vector `∇c(θ)`, matching the shape of `Theta`.
pub type Grad = Array1<f64>;

/// Scalar objective value being minimized.
pub type Cost = f64;

/// argmin evaluation counters keyed by name (`"cost_count"`, `"gradient_count"`).
pub type FnEvalMap = HashMap<String, u64>;

/// L-BFGS history length.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Hager–Zhang line search over `Theta`/`Grad`.
pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

/// More–Thuente line search over `Theta`/`Grad`.
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS + Hager–Zhang.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS + More–Thuente.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;

/// Derivative-free simplex solver over `Theta`.
pub type NelderMeadSimplex = NelderMead<Theta, Cost>;
