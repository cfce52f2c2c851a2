//! Solver builders.
//!
//! Construct `argmin` L-BFGS solvers with the chosen line search and
//! Nelder–Mead solvers with an axis-aligned initial simplex, applying the
//! tolerances in [`MinimizeOptions`].
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    cost_optimizer::{
        traits::MinimizeOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, NelderMeadSimplex, Theta,
        },
    },
    errors::OptResult,
};

/// L-BFGS with a Hager–Zhang line search.
pub fn build_optimizer_hager_zhang(opts: &MinimizeOptions) -> OptResult<LbfgsHagerZhang> {
    let hager_zhang = HagerZhangLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsHagerZhang::new(hager_zhang, mem);
    configure_lbfgs(lbfgs, opts)
}

/// L-BFGS with a More–Thuente line search.
pub fn build_optimizer_more_thuente(opts: &MinimizeOptions) -> OptResult<LbfgsMoreThuente> {
    let more_thuente = MoreThuenteLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(more_thuente, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Apply optional gradient/cost tolerances to an L-BFGS solver.
///
/// # Errors
/// Propagates `argmin` validation errors (converted to `OptError`).
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MinimizeOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

/// Nelder–Mead over `theta0.len() + 1` vertices: `θ₀` plus `θ₀ + step·e_i`
/// for each axis `i`.
///
/// # Errors
/// Propagates `argmin` errors for an invalid spread tolerance.
pub fn build_nelder_mead(
    theta0: &Theta, initial_step: f64, sd_tolerance: f64,
) -> OptResult<NelderMeadSimplex> {
    let mut vertices = Vec::with_capacity(theta0.len() + 1);
    vertices.push(theta0.clone());
    for i in 0..theta0.len() {
        let mut vertex = theta0.clone();
        vertex[i] += initial_step;
        vertices.push(vertex);
    }
    Ok(NelderMeadSimplex::new(vertices).with_sd_tolerance(sd_tolerance)?)
}
