//! Errors for particle-physics helpers (friction, mobility, root finding).
//!
//! [`PhysicsError`] is small and cloneable so it can be embedded in the DMA
//! error surface without loss of information.

/// Result alias for fallible physics routines.
pub type PhysicsResult<T> = Result<T, PhysicsError>;

#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Particle diameter must be finite and > 0.
    InvalidDiameter { value: f64 },

    /// Gas temperature must be finite and > 0.
    InvalidTemperature { value: f64 },

    /// Gas pressure must be finite and > 0.
    InvalidPressure { value: f64 },

    /// Target mobility must be finite and > 0.
    InvalidMobility { value: f64 },

    /// Charge state must be non-zero for a mobility inversion.
    ZeroCharge,

    /// Bisection bracket does not enclose a root.
    NoSignChange { low: f64, high: f64 },
}

impl std::error::Error for PhysicsError {}

impl std::fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhysicsError::InvalidDiameter { value } => {
                write!(f, "Invalid particle diameter {value}: must be finite and > 0")
            }
            PhysicsError::InvalidTemperature { value } => {
                write!(f, "Invalid temperature {value}: must be finite and > 0")
            }
            PhysicsError::InvalidPressure { value } => {
                write!(f, "Invalid pressure {value}: must be finite and > 0")
            }
            PhysicsError::InvalidMobility { value } => {
                write!(f, "Invalid electrical mobility {value}: must be finite and > 0")
            }
            PhysicsError::ZeroCharge => {
                write!(f, "Charge state must be non-zero to invert a mobility")
            }
            PhysicsError::NoSignChange { low, high } => {
                write!(f, "Bisection bracket [{low:e}, {high:e}] does not enclose a sign change")
            }
        }
    }
}
