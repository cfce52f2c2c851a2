//! numerical_stability — guarded scalar transforms.
//!
//! Houses the softplus pair used to keep positivity-constrained
//! optimizer parameters (the Tikhonov strength `α`) inside their domain
//! while the solver works in unconstrained `θ`-space.
//!
//! These helpers are pure: no logging, I/O, or error values. Domain checks
//! happen in the callers.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{SOFTPLUS_CUTOFF, safe_softplus, safe_softplus_inv};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::transformations::{safe_softplus, safe_softplus_inv};
}
