//! cost_optimizer — thin wrapper over `argmin` for minimizing scalar costs.
//!
//! Users implement [`Objective`] for their problem, pick a
//! [`SearchMethod`] in [`MinimizeOptions`], and call [`minimize`]. Gradients
//! are finite-differenced unless the objective supplies one.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::minimize;
pub use self::traits::{
    LineSearcher, MinimizeOptions, Objective, OptimOutcome, SearchMethod, Tolerances,
};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use dma_inversion::optimization::cost_optimizer::prelude::*;
//
// to import the main optimizer surface in a single line.

pub mod prelude {
    pub use super::api::minimize;
    pub use super::traits::{
        LineSearcher, MinimizeOptions, Objective, OptimOutcome, SearchMethod, Tolerances,
    };
    pub use super::types::{Cost, Grad, Theta};
}
