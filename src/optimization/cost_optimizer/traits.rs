//! Public API surface for cost minimization.
//!
//! - [`Objective`]: trait users implement for their cost.
//! - [`MinimizeOptions`] and [`Tolerances`]: configuration for the optimizer.
//! - [`SearchMethod`] / [`LineSearcher`]: choice of solver and line search.
//! - [`OptimOutcome`]: normalized result returned by the high-level `minimize` API.
//!
//! Convention: the cost `c(θ)` is minimized directly. If an analytic gradient
//! is provided it must be `∇c(θ)`; otherwise finite differences are used.
use crate::optimization::{
    cost_optimizer::{
        Cost, FnEvalMap, Grad, Theta,
        validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
    },
    errors::{OptError, OptResult},
};
use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// User-implemented cost interface.
///
/// - `type Data`: per-problem context carried into `value`/`grad`/`check`.
///   It is borrowed immutably for the whole run.
///
/// Required:
/// - `value(&Theta, &Data) -> OptResult<Cost>`: evaluate `c(θ)`.
/// - `check(&Theta, &Data) -> OptResult<()>`: reject obviously invalid
///   `θ`/`data` pairs. Called once before optimization.
///
/// Optional:
/// - `grad(&Theta, &Data) -> OptResult<Grad>`: analytic gradient `∇c(θ)`.
///   If not implemented, finite differences are used automatically.
pub trait Objective {
    type Data;

    // Required methods
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    // Optional methods
    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Line search paired with L-BFGS.
///
/// Parsing is case-insensitive (`"MoreThuente"`, `"HagerZhang"`). Unknown
/// names return `OptError::InvalidLineSearch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "expected 'morethuente' or 'hagerzhang' (any case)",
            }),
        }
    }
}

/// Solver family used for the minimization.
///
/// - `Lbfgs`: quasi-Newton with finite-difference gradients unless the
///   objective supplies one.
/// - `NelderMead`: derivative-free simplex started from `θ₀` and `θ₀ + step`
///   along each axis; terminates when the standard deviation of the simplex
///   costs drops below `sd_tolerance`. The tolerance is absolute, so it
///   must be scaled to the size of the objective; a fixed value stops early
///   on costs that are already tiny at the start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchMethod {
    Lbfgs { line_searcher: LineSearcher },
    NelderMead { initial_step: f64, sd_tolerance: f64 },
}

impl SearchMethod {
    /// Nelder–Mead with a unit initial step and `sd_tolerance = 1e-12`.
    pub fn nelder_mead() -> Self {
        SearchMethod::NelderMead { initial_step: 1.0, sd_tolerance: 1e-12 }
    }

    /// Reject simplex settings Argmin cannot work with.
    ///
    /// # Errors
    /// - [`OptError::InvalidSimplex`] for a zero/non-finite step or a
    ///   non-positive/non-finite spread tolerance.
    pub fn validate(&self) -> OptResult<()> {
        if let SearchMethod::NelderMead { initial_step, sd_tolerance } = *self {
            if !initial_step.is_finite() || initial_step == 0.0 {
                return Err(OptError::InvalidSimplex {
                    value: initial_step,
                    reason: "initial step must be finite and non-zero",
                });
            }
            if !sd_tolerance.is_finite() || sd_tolerance <= 0.0 {
                return Err(OptError::InvalidSimplex {
                    value: sd_tolerance,
                    reason: "spread tolerance must be finite and positive",
                });
            }
        }
        Ok(())
    }
}

impl Default for SearchMethod {
    fn default() -> Self {
        SearchMethod::Lbfgs { line_searcher: LineSearcher::MoreThuente }
    }
}

impl FromStr for SearchMethod {
    type Err = OptError;

    /// Accepts `"lbfgs"` (More–Thuente), any [`LineSearcher`] name (L-BFGS
    /// with that line search), or `"neldermead"` / `"nelder-mead"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lbfgs" | "l-bfgs" => Ok(SearchMethod::default()),
            "neldermead" | "nelder-mead" => Ok(SearchMethod::nelder_mead()),
            other => Ok(SearchMethod::Lbfgs { line_searcher: LineSearcher::from_str(other)? }),
        }
    }
}

/// Everything [`minimize`](super::minimize) needs besides the objective.
///
/// Fields:
/// - `tols` — stopping rules.
/// - `method: SearchMethod` — solver family (and line search for L-BFGS).
/// - `verbose` — with the `obs_slog` feature, log every iteration.
/// - `lbfgs_mem: Option<usize>` — L-BFGS history size; `None` uses
///   [`DEFAULT_LBFGS_MEM`](crate::optimization::cost_optimizer::DEFAULT_LBFGS_MEM).
///
/// Default:
/// - `tols`: `tol_grad = 1e-8`, `tol_cost = None`, `max_iter = 200`
/// - `method`: L-BFGS with More–Thuente
/// - `verbose`: `false`
#[derive(Debug, Clone, PartialEq)]
pub struct MinimizeOptions {
    pub tols: Tolerances,
    pub method: SearchMethod,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl MinimizeOptions {
    /// Validated options.
    ///
    /// # Errors
    /// - [`OptError::InvalidLBFGSMem`] if `lbfgs_mem == Some(0)`.
    /// - [`OptError::InvalidSimplex`] for invalid Nelder–Mead settings.
    pub fn new(
        tols: Tolerances, method: SearchMethod, verbose: bool, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if let Some(m) = lbfgs_mem {
            if m == 0 {
                return Err(OptError::InvalidLBFGSMem {
                    mem: m,
                    reason: "history size must be at least 1",
                });
            }
        }
        method.validate()?;
        Ok(Self { tols, method, verbose, lbfgs_mem })
    }
}

impl Default for MinimizeOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: Some(1e-8), tol_cost: None, max_iter: Some(200) },
            method: SearchMethod::default(),
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Stopping rules.
///
/// - `tol_grad`: stop once the gradient norm drops below it.
/// - `tol_cost`: stop once the cost change drops below it.
/// - `max_iter`: iteration cap.
///
/// Each rule is optional, but [`Tolerances::new`] rejects an empty set
/// (see [`Tolerances::new`]). Nelder–Mead ignores `tol_grad`/`tol_cost` and
/// uses its own spread tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Validated stopping rules.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] when every rule is `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for
    ///   non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "iteration cap must be at least 1",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Canonical result returned by `minimize`.
///
/// - `theta_hat`: best point visited.
/// - `value`: best cost `c(θ̂)`.
/// - `converged`: `false` when the run stopped on the iteration cap (or was
///   never terminated), `true` for any other termination reason.
/// - `status`: argmin termination status, formatted.
/// - `iterations`: completed iterations.
/// - `fn_evals`: argmin evaluation counters (`"cost_count"`, ...).
/// - `grad_norm`: L2 norm of the final gradient (L-BFGS only).
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Condense a finished solver state.
    ///
    /// # Errors
    /// - `MissingThetaHat` / `InvalidThetaHat` / `NonFiniteCost`.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let (converged, status) = match &termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            TerminationStatus::Terminated(TerminationReason::MaxItersReached) => {
                (false, format!("{termination:?}"))
            }
            _ => (true, format!("{termination:?}")),
        };
        let iterations = iterations as usize;
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self { theta_hat, value, converged, status, iterations, fn_evals, grad_norm })
    }

    /// Number of cost evaluations reported by the solver (0 if absent).
    pub fn cost_evals(&self) -> u64 {
        self.fn_evals.get("cost_count").copied().unwrap_or(0)
    }
}
