//! Error surface of the optimizer layer.
//!
//! [`OptError`] covers option validation, objective evaluation, solver
//! outcomes, and failures reported by argmin itself. Objective errors raised
//! from DMA code travel through argmin boxed as `argmin::core::Error` and are
//! recovered intact by `From<argmin::core::Error>`.
use argmin::core::{ArgminError, Error};

use crate::dma::errors::DMAError;

/// Result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// No analytic gradient; callers fall back to finite differences.
    GradientNotImplemented,
    GradientDimMismatch { expected: usize, found: usize },
    InvalidGradient { index: usize, value: f64, reason: &'static str },

    // ---- Options ----
    InvalidTolGrad { tol: f64, reason: &'static str },
    InvalidTolCost { tol: f64, reason: &'static str },
    InvalidMaxIter { max_iter: usize, reason: &'static str },
    /// `tol_grad`, `tol_cost`, and `max_iter` were all `None`.
    NoTolerancesProvided,
    InvalidLineSearch { name: String, reason: &'static str },
    InvalidLBFGSMem { mem: usize, reason: &'static str },
    /// Nelder–Mead initial step or spread tolerance.
    InvalidSimplex { value: f64, reason: &'static str },

    // ---- Objective ----
    NonFiniteCost { value: f64 },
    InvalidThetaInput { index: usize, value: f64 },
    ThetaLengthMismatch { expected: usize, actual: usize },
    /// The regularized normal equations could not be solved at `alpha`.
    SingularSystem { alpha: f64 },
    DimensionMismatch { context: &'static str, expected: usize, found: usize },
    /// Any other DMA failure raised while evaluating the objective.
    ObjectiveFailed { text: String },

    // ---- Outcome ----
    InvalidThetaHat { index: usize, value: f64, reason: &'static str },
    MissingThetaHat,

    // ---- Backend ----
    /// Error raised by argmin. `kind` names the `ArgminError` variant, or
    /// `"other"` for errors that are not argmin's own.
    Backend { kind: &'static str, text: String },
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptError::GradientNotImplemented => write!(f, "no analytic gradient available"),
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "gradient has {found} entries, expected {expected}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "gradient entry {index} = {value}: {reason}")
            }
            OptError::InvalidTolGrad { tol, reason } => write!(f, "tol_grad = {tol}: {reason}"),
            OptError::InvalidTolCost { tol, reason } => write!(f, "tol_cost = {tol}: {reason}"),
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "max_iter = {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "at least one of tol_grad, tol_cost, max_iter is required")
            }
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "unknown line search '{name}': {reason}")
            }
            OptError::InvalidLBFGSMem { mem, reason } => write!(f, "lbfgs_mem = {mem}: {reason}"),
            OptError::InvalidSimplex { value, reason } => {
                write!(f, "Nelder-Mead setting {value}: {reason}")
            }
            OptError::NonFiniteCost { value } => write!(f, "objective returned {value}"),
            OptError::InvalidThetaInput { index, value } => {
                write!(f, "starting point entry {index} = {value} is not finite")
            }
            OptError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "starting point has {actual} entries, expected {expected}")
            }
            OptError::SingularSystem { alpha } => {
                write!(f, "regularized system is singular at alpha = {alpha}")
            }
            OptError::DimensionMismatch { context, expected, found } => {
                write!(f, "{context}: expected length {expected}, found {found}")
            }
            OptError::ObjectiveFailed { text } => write!(f, "objective failed: {text}"),
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "solution entry {index} = {value}: {reason}")
            }
            OptError::MissingThetaHat => write!(f, "solver finished without a best parameter"),
            OptError::Backend { kind, text } => write!(f, "argmin ({kind}): {text}"),
        }
    }
}

impl From<Error> for OptError {
    fn from(err: Error) -> Self {
        let err = match err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match err.downcast::<ArgminError>() {
            Ok(argmin_err) => {
                let kind = match &argmin_err {
                    ArgminError::InvalidParameter { .. } => "invalid parameter",
                    ArgminError::NotImplemented { .. } => "not implemented",
                    ArgminError::NotInitialized { .. } => "not initialized",
                    ArgminError::ConditionViolated { .. } => "condition violated",
                    ArgminError::CheckpointNotFound { .. } => "checkpoint not found",
                    ArgminError::PotentialBug { .. } => "potential bug",
                    ArgminError::ImpossibleError { .. } => "impossible error",
                    _ => "unknown",
                };
                OptError::Backend { kind, text: argmin_err.to_string() }
            }
            Err(other) => OptError::Backend { kind: "other", text: other.to_string() },
        }
    }
}

impl From<DMAError> for OptError {
    fn from(err: DMAError) -> Self {
        match err {
            DMAError::SingularSystem { alpha } => OptError::SingularSystem { alpha },
            DMAError::DimensionMismatch { context, expected, found } => {
                OptError::DimensionMismatch { context, expected, found }
            }
            other => OptError::ObjectiveFailed { text: other.to_string() },
        }
    }
}
