//! physics — gas-phase aerosol constants, particle friction, and mobility.
//!
//! Purpose
//! -------
//! Supply the fundamental constants and particle-transport relations that the
//! DMA response model consumes: Boltzmann constant, elementary charge, air
//! viscosity and mean free path, Cunningham slip correction, the Stokes
//! friction coefficient, and the electrical mobility of a charged sphere.
//!
//! Key behaviors
//! -------------
//! - [`constants`] exposes named physical constants and unit factors.
//! - [`friction`] evaluates `f(Dp, T) = 3πμDp / Cc(Dp)` with Sutherland
//!   viscosity and a pressure/temperature-scaled mean free path.
//! - [`mobility`] maps `(Dp, q)` to electrical mobility and inverts that map
//!   with a closure-driven bisection search.
//!
//! Invariants & assumptions
//! ------------------------
//! - All lengths are in metres, temperatures in kelvin, pressures in pascal.
//! - The pure evaluation functions assume positive, finite inputs; callers
//!   validate at their public boundary. Fallible searches return
//!   [`PhysicsResult`].
//!
//! Conventions
//! -----------
//! - Mobility is reported in m²/(V·s) and friction in kg/s (N·s/m).
//! - `friction(Dp, T)` is evaluated at standard pressure, matching the
//!   two-argument collaborator contract used by the DMA model.
//!
//! Testing notes
//! -------------
//! - Unit tests check textbook reference values (slip correction and
//!   mobility near 100 nm), the continuum/free-molecular limits, and the
//!   round trip `Dp → Z → Dp` of the bisection search.

pub mod constants;
pub mod errors;
pub mod friction;
pub mod mobility;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::constants::{K_B, K_E, LPM_TO_M3_PER_S, Q_E, STANDARD_PRESSURE};
pub use self::errors::{PhysicsError, PhysicsResult};
pub use self::friction::{friction, friction_at_pressure};
pub use self::mobility::{bisect, diameter_from_mobility, electrical_mobility};
