//! Executor wrappers.
//!
//! Each runner hands the adapter and a prepared solver to an `argmin`
//! `Executor`, applies the iteration cap, optionally attaches the `slog`
//! observer, and condenses the final `IterState` into an [`OptimOutcome`].
use crate::optimization::{
    cost_optimizer::{
        Grad, MinimizeOptions, Objective, OptimOutcome, Theta, adapter::ArgMinAdapter,
        types::NelderMeadSimplex,
    },
    errors::OptResult,
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient, observers::ObserverMode};
use argmin::core::{Executor, IterState, Solver, State};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;
#[cfg(feature = "obs_slog")]
use argmin_observer_slog::SlogLogger;

/// Run L-BFGS (either line search) from `theta0`.
///
/// # Errors
/// Propagates executor errors and outcome validation failures.
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MinimizeOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: Objective,
    S: Solver<ArgMinAdapter<'a, F>, IterState<Theta, Grad, (), (), (), f64>> + Send + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        report_start(&theta0, &problem)?;
    }
    let cap = opts.tols.max_iter.map(|n| n as u64);
    let mut executor = Executor::new(problem, solver);
    executor = executor.configure(|state| {
        let state = state.param(theta0);
        match cap {
            Some(n) => state.max_iters(n),
            None => state,
        }
    });
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        executor = executor.add_observer(SlogLogger::term_noblock(), ObserverMode::Always);
    }

    let mut state = executor.run()?.state().clone();
    let evals = state.get_func_counts().clone();
    let status = state.get_termination_status().clone();
    let iters = state.get_iter();
    let best_cost = state.get_best_cost();
    let last_grad = state.take_gradient();
    OptimOutcome::new(state.take_best_param(), best_cost, status, iters, evals, last_grad)
}

/// Run Nelder–Mead. The starting point lives in the simplex.
pub fn run_nelder_mead<'a, F>(
    opts: &MinimizeOptions, problem: ArgMinAdapter<'a, F>, solver: NelderMeadSimplex,
) -> OptResult<OptimOutcome>
where
    F: Objective,
{
    let cap = opts.tols.max_iter.map(|n| n as u64);
    let mut executor = Executor::new(problem, solver);
    executor = executor.configure(|state| match cap {
        Some(n) => state.max_iters(n),
        None => state,
    });
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        executor = executor.add_observer(SlogLogger::term_noblock(), ObserverMode::Always);
    }

    let mut state = executor.run()?.state().clone();
    let evals = state.get_func_counts().clone();
    let status = state.get_termination_status().clone();
    let iters = state.get_iter();
    let best_cost = state.get_best_cost();
    OptimOutcome::new(state.take_best_param(), best_cost, status, iters, evals, None)
}

#[cfg(feature = "obs_slog")]
fn report_start<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: Objective,
{
    let cost = problem.cost(theta0)?;
    match problem.gradient(theta0) {
        Ok(g) => eprintln!("start: cost = {cost:.6e}, |grad| = {:.6e}", g.l2_norm()),
        Err(_) => eprintln!("start: cost = {cost:.6e}"),
    }
    Ok(())
}
