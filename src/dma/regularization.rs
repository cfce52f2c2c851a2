//! Regularization-strength search.
//!
//! Purpose
//! -------
//! Pick the Tikhonov strength `α` that best reconciles an observed response
//! `R` with the forward simulation of its own deconvolution:
//!
//! ```text
//! N(α) = deconvolve(R, A, α)
//! d(α) = Σ_i (convolve(A, N(α))_i / R_i − 1)⁴
//! ```
//!
//! Key behaviors
//! -------------
//! - The search runs in `θ ∈ ℝ` with `α = softplus(θ)`, so every trial
//!   strength is positive; the starting point is `θ₀ = softplus⁻¹(α₀)`.
//! - [`AlphaSearchContext`] owns copies of `R` and `A` and is borrowed
//!   immutably by the objective for the whole search. Two searches never
//!   share mutable state.
//! - The minimizer is the crate's `argmin` wrapper: L-BFGS with
//!   finite-difference gradients by default, or Nelder–Mead.
//! - Hitting the iteration cap is reported in the outcome
//!   (`converged == false`) together with the best `α` found;
//!   [`AlphaSearchOutcome::require_converged`] turns that into
//!   `DMAError::NonConvergence`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Observed channels must be finite and not zero/subnormal: the
//!   discrepancy divides by them. They are rejected up front rather than
//!   padded with an epsilon.
//! - Each objective evaluation costs one `n×n` solve plus one matrix–vector
//!   product.
use crate::{
    dma::{
        core::validation::{validate_alpha_guess, validate_len, validate_observed},
        errors::{DMAError, DMAResult},
        inversion::{convolve, deconvolve},
        kernel::ResponseMatrix,
    },
    optimization::{
        cost_optimizer::{
            Cost, MinimizeOptions, Objective, SearchMethod, Theta, Tolerances, minimize,
        },
        errors::{OptError, OptResult},
        numerical_stability::transformations::{safe_softplus, safe_softplus_inv},
    },
};
use ndarray::{Array1, ArrayView1, array};

/// Default starting guess for `α`.
pub const DEFAULT_ALPHA_GUESS: f64 = 0.1;

/// `Σ (simulated_i / observed_i − 1)⁴`.
///
/// Callers guarantee equal lengths and non-zero `observed` entries.
pub fn discrepancy(observed: ArrayView1<f64>, simulated: ArrayView1<f64>) -> f64 {
    observed.iter().zip(simulated.iter()).map(|(&r, &s)| (s / r - 1.0).powi(4)).sum()
}

/// Map an unconstrained search coordinate to a strictly positive `α`.
pub fn alpha_from_theta(theta: f64) -> f64 {
    safe_softplus(theta).max(f64::MIN_POSITIVE)
}

/// Immutable inputs of one regularization search.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaSearchContext {
    observed: Array1<f64>,
    matrix: ResponseMatrix,
}

impl AlphaSearchContext {
    /// Validate and copy the observed response and matrix.
    ///
    /// # Errors
    /// - `DimensionMismatch` if `observed.len() != matrix.dim()`.
    /// - `NonFiniteObserved` / `ZeroObservedChannel` for unusable channels.
    pub fn new(observed: ArrayView1<f64>, matrix: &ResponseMatrix) -> DMAResult<Self> {
        validate_len("observed response", matrix.dim(), observed.len())?;
        validate_observed(observed)?;
        Ok(Self { observed: observed.to_owned(), matrix: matrix.clone() })
    }

    pub fn observed(&self) -> ArrayView1<'_, f64> {
        self.observed.view()
    }

    pub fn matrix(&self) -> &ResponseMatrix {
        &self.matrix
    }

    /// Deconvolve at `alpha` and return `(N(α), A·N(α))`.
    pub fn reconstruct(&self, alpha: f64) -> DMAResult<(Array1<f64>, Array1<f64>)> {
        let distribution = deconvolve(self.observed.view(), &self.matrix, alpha)?;
        let simulated = convolve(&self.matrix, distribution.view())?;
        Ok((distribution, simulated))
    }

    /// Discrepancy `d(α)` between the observed and re-simulated response.
    pub fn discrepancy(&self, alpha: f64) -> DMAResult<f64> {
        let (_, simulated) = self.reconstruct(alpha)?;
        Ok(discrepancy(self.observed.view(), simulated.view()))
    }
}

/// `θ ↦ d(softplus(θ))` over an [`AlphaSearchContext`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscrepancyObjective;

impl Objective for DiscrepancyObjective {
    type Data = AlphaSearchContext;

    fn value(&self, theta: &Theta, data: &AlphaSearchContext) -> OptResult<Cost> {
        Ok(data.discrepancy(alpha_from_theta(theta[0]))?)
    }

    fn check(&self, theta: &Theta, _data: &AlphaSearchContext) -> OptResult<()> {
        if theta.len() != 1 {
            return Err(OptError::ThetaLengthMismatch { expected: 1, actual: theta.len() });
        }
        Ok(())
    }
}

/// Configuration of the `α` search.
///
/// Defaults: L-BFGS with More–Thuente, `tol_grad = 1e-8`, `max_iter = 200`,
/// no progress output.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlphaSearchOptions {
    pub optimizer: MinimizeOptions,
}

impl AlphaSearchOptions {
    /// Validated options.
    ///
    /// # Errors
    /// - `OptimizationFailed` wrapping any optimizer-option error.
    pub fn new(
        tols: Tolerances, method: SearchMethod, verbose: bool, lbfgs_mem: Option<usize>,
    ) -> DMAResult<Self> {
        Ok(Self { optimizer: MinimizeOptions::new(tols, method, verbose, lbfgs_mem)? })
    }

    /// Nelder–Mead with the given iteration cap and default simplex.
    pub fn nelder_mead(max_iter: usize) -> DMAResult<Self> {
        let tols = Tolerances::new(None, None, Some(max_iter))?;
        Self::new(tols, SearchMethod::nelder_mead(), false, None)
    }
}

/// Result of [`find_optimal_alpha`].
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaSearchOutcome {
    /// Best strength found.
    pub alpha: f64,
    /// `d(alpha)`.
    pub discrepancy: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub cost_evals: u64,
}

impl AlphaSearchOutcome {
    /// Return `self` if the search converged, `NonConvergence` otherwise.
    pub fn require_converged(self) -> DMAResult<Self> {
        if self.converged {
            return Ok(self);
        }
        Err(DMAError::NonConvergence {
            best_alpha: self.alpha,
            iterations: self.iterations,
            status: self.status,
        })
    }
}

/// Search for the `α` minimizing the discrepancy, starting at
/// `initial_guess`.
///
/// Errors
/// ------
/// - `InvalidAlpha` for a non-positive or non-finite `initial_guess`.
/// - Context validation errors (see [`AlphaSearchContext::new`]).
/// - `SingularSystem` if a trial deconvolution fails.
/// - `OptimizationFailed` for backend failures.
///
/// A Nelder–Mead `sd_tolerance` is read relative to `d(initial_guess)`.
///
/// Running out of iterations is not an error; inspect
/// [`AlphaSearchOutcome::converged`] or call `require_converged`.
pub fn find_optimal_alpha(
    observed: ArrayView1<f64>, matrix: &ResponseMatrix, initial_guess: f64,
    opts: &AlphaSearchOptions,
) -> DMAResult<AlphaSearchOutcome> {
    let initial_guess = validate_alpha_guess(initial_guess)?;
    let context = AlphaSearchContext::new(observed, matrix)?;
    let optimizer = match opts.optimizer.method {
        SearchMethod::NelderMead { .. } => {
            relative_simplex_tolerance(&opts.optimizer, context.discrepancy(initial_guess)?)
        }
        SearchMethod::Lbfgs { .. } => opts.optimizer.clone(),
    };
    let theta0 = array![safe_softplus_inv(initial_guess)];
    let outcome = minimize(&DiscrepancyObjective, theta0, &context, &optimizer)?;
    let cost_evals = outcome.cost_evals();
    Ok(AlphaSearchOutcome {
        alpha: alpha_from_theta(outcome.theta_hat[0]),
        discrepancy: outcome.value,
        converged: outcome.converged,
        status: outcome.status,
        iterations: outcome.iterations,
        cost_evals,
    })
}

/// Copy of `opts` with a Nelder–Mead spread tolerance multiplied by the
/// starting discrepancy `d0`. L-BFGS options are returned unchanged.
fn relative_simplex_tolerance(opts: &MinimizeOptions, d0: f64) -> MinimizeOptions {
    let mut scaled = opts.clone();
    if let SearchMethod::NelderMead { initial_step, sd_tolerance } = opts.method {
        let scale = d0.max(f64::MIN_POSITIVE);
        scaled.method =
            SearchMethod::NelderMead { initial_step, sd_tolerance: sd_tolerance * scale };
    }
    scaled
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array2;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The discrepancy formula and the positivity of the α mapping.
    // - Context validation (zero channels, dimension mismatch).
    // - Search behavior on a small diagonal system where d(α) has a closed
    //   form: with A = diag(a), d(α) = Σ (a_i² / (a_i² + α) − 1)⁴.
    // -------------------------------------------------------------------------

    fn diagonal_matrix() -> ResponseMatrix {
        ResponseMatrix::from_array(Array2::from_diag(&array![0.5, 1.0, 2.0])).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // The discrepancy is the sum of fourth powers of relative residuals.
    fn discrepancy_uses_fourth_power_of_relative_error() {
        let d = discrepancy(array![1.0, 2.0].view(), array![1.5, 1.0].view());
        assert_relative_eq!(d, 0.5f64.powi(4) * 2.0, max_relative = 1e-12);
        assert!(alpha_from_theta(-1e4) > 0.0);
    }

    #[test]
    // Purpose
    // -------
    // On a diagonal system the context reproduces the closed form.
    //
    // Given
    // -----
    // - A = diag(0.5, 1, 2), R = [1, 1, 1], α = 0.25.
    //
    // Expect
    // ------
    // - d(α) = Σ (a²/(a²+α) − 1)⁴.
    fn context_discrepancy_matches_closed_form() {
        // Arrange
        let a = [0.5, 1.0, 2.0];
        let alpha = 0.25;
        let ctx = AlphaSearchContext::new(array![1.0, 1.0, 1.0].view(), &diagonal_matrix()).unwrap();

        // Act
        let d = ctx.discrepancy(alpha).unwrap();

        // Assert
        let expected: f64 = a.iter().map(|x: &f64| (x * x / (x * x + alpha) - 1.0).powi(4)).sum();
        assert_relative_eq!(d, expected, max_relative = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Zero observed channels and length mismatches are rejected before the
    // search starts, as are non-positive starting guesses.
    fn search_rejects_unusable_inputs() {
        let m = diagonal_matrix();
        assert_eq!(
            AlphaSearchContext::new(array![1.0, 0.0, 1.0].view(), &m),
            Err(DMAError::ZeroObservedChannel { index: 1, value: 0.0 })
        );
        assert!(matches!(
            AlphaSearchContext::new(array![1.0].view(), &m),
            Err(DMAError::DimensionMismatch { .. })
        ));
        let opts = AlphaSearchOptions::default();
        assert!(matches!(
            find_optimal_alpha(array![1.0, 1.0, 1.0].view(), &m, 0.0, &opts),
            Err(DMAError::InvalidAlpha { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // d(α) increases with α on a square invertible system, so both solvers
    // move α below the starting guess and lower the discrepancy.
    //
    // Given
    // -----
    // - A = diag(0.5, 1, 2), R = [1, 2, 3], α₀ = 0.1.
    //
    // Expect
    // ------
    // - alpha < 0.1 and discrepancy < d(0.1) for L-BFGS and Nelder–Mead.
    fn search_lowers_discrepancy_from_initial_guess() {
        // Arrange
        let m = diagonal_matrix();
        let r = array![1.0, 2.0, 3.0];
        let ctx = AlphaSearchContext::new(r.view(), &m).unwrap();
        let d0 = ctx.discrepancy(0.1).unwrap();
        let all_opts = [AlphaSearchOptions::default(), AlphaSearchOptions::nelder_mead(200).unwrap()];

        for opts in all_opts {
            // Act
            let out = find_optimal_alpha(r.view(), &m, 0.1, &opts).unwrap();

            // Assert
            assert!(out.alpha < 0.1, "{:?}", out);
            assert!(out.discrepancy < d0, "{:?}", out);
            assert!(out.cost_evals > 0);
        }
    }

    #[test]
    // Purpose
    // -------
    // The simplex stopping rule follows the size of the starting
    // discrepancy, so a search that starts with d(α₀) far below the
    // absolute tolerance still iterates.
    //
    // Given
    // -----
    // - Nelder–Mead with sd_tolerance 1e-12; d0 = 1e-20 and d0 = 0.
    // - A near-perfect fit: A = diag(0.5, 1, 2), R = [1, 2, 3], α₀ = 1e-6,
    //   where d(α₀) is far below 1e-12.
    //
    // Expect
    // ------
    // - The tolerance becomes 1e-32 (and stays positive for d0 = 0); L-BFGS
    //   options are untouched.
    // - The search performs more than the initial simplex evaluations and
    //   does not end above d(α₀).
    fn simplex_tolerance_is_relative_to_start() {
        // Arrange
        let nm = AlphaSearchOptions::nelder_mead(50).unwrap().optimizer;
        let lbfgs = AlphaSearchOptions::default().optimizer;

        // Act
        let scaled = relative_simplex_tolerance(&nm, 1e-20);
        let zero = relative_simplex_tolerance(&nm, 0.0);

        // Assert
        match scaled.method {
            SearchMethod::NelderMead { sd_tolerance, initial_step } => {
                assert_relative_eq!(sd_tolerance, 1e-32, max_relative = 1e-12);
                assert_eq!(initial_step, 1.0);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            zero.method,
            SearchMethod::NelderMead { sd_tolerance, .. } if sd_tolerance > 0.0
        ));
        assert_eq!(relative_simplex_tolerance(&lbfgs, 1e-20), lbfgs);

        let m = diagonal_matrix();
        let r = array![1.0, 2.0, 3.0];
        let d0 = AlphaSearchContext::new(r.view(), &m).unwrap().discrepancy(1e-6).unwrap();
        assert!(d0 < 1e-12);
        let opts = AlphaSearchOptions::nelder_mead(50).unwrap();
        let out = find_optimal_alpha(r.view(), &m, 1e-6, &opts).unwrap();
        assert!(out.iterations > 1, "{out:?}");
        assert!(out.discrepancy <= d0, "{out:?}");
    }

    #[test]
    // Purpose
    // -------
    // A one-iteration Nelder–Mead search is reported as non-converged and
    // `require_converged` surfaces the best α found.
    fn require_converged_reports_best_alpha() {
        let m = diagonal_matrix();
        let opts = AlphaSearchOptions::nelder_mead(1).unwrap();
        let out = find_optimal_alpha(array![1.0, 2.0, 3.0].view(), &m, 0.1, &opts).unwrap();
        assert!(!out.converged);
        let best = out.alpha;
        match out.require_converged() {
            Err(DMAError::NonConvergence { best_alpha, iterations, .. }) => {
                assert_eq!(best_alpha, best);
                assert_eq!(iterations, 1);
            }
            other => panic!("expected NonConvergence, got {other:?}"),
        }
    }
}
