//! High-level entry point for cost minimization.
use crate::optimization::{
    cost_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_nelder_mead, build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::{run_lbfgs, run_nelder_mead},
        traits::{LineSearcher, MinimizeOptions, Objective, SearchMethod},
        validation::validate_theta0,
    },
    errors::OptResult,
};

/// Minimize `f` starting from `theta0`.
///
/// Steps:
/// 1. Reject non-finite starting points and let `f.check` validate
///    `(θ₀, data)`.
/// 2. Build the solver named by `opts.method`.
/// 3. Run it and return a validated [`OptimOutcome`].
///
/// Running out of iterations is **not** an error here; it is reported
/// through `OptimOutcome::converged == false` so callers can decide.
///
/// # Errors
/// - Validation errors for `theta0` or from `f.check`.
/// - Builder errors (invalid tolerances or simplex).
/// - Any error raised by the objective during the run.
pub fn minimize<F: Objective>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MinimizeOptions,
) -> OptResult<OptimOutcome> {
    validate_theta0(&theta0, theta0.len())?;
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.method {
        SearchMethod::Lbfgs { line_searcher: LineSearcher::MoreThuente } => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        SearchMethod::Lbfgs { line_searcher: LineSearcher::HagerZhang } => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        SearchMethod::NelderMead { initial_step, sd_tolerance } => {
            let solver = build_nelder_mead(&theta0, initial_step, sd_tolerance)?;
            run_nelder_mead(opts, problem, solver)
        }
    }
}
