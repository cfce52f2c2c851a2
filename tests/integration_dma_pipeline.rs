//! Integration tests for the DMA forward/inverse pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end path: instrument geometry → transfer terms →
//!   response matrix → forward convolution → regularized deconvolution →
//!   regularization-strength search.
//! - Use a realistic bimodal aerosol (20 nm and 100 nm lognormal modes)
//!   on a 20-bin nano-column grid.
//!
//! Coverage
//! --------
//! - `dma::core`: geometry construction and voltage updates.
//! - `dma::sizing`: square diameter/voltage grids via `channel_voltages`.
//! - `dma::kernel`: both kernel modes.
//! - `dma::inversion`: linearity of `convolve`, round trip through
//!   `deconvolve`, peak recovery under smoothing.
//! - `dma::regularization`: L-BFGS and Nelder–Mead searches.
//!
//! Exclusions
//! ----------
//! - Closed-form checks of individual transfer terms; those live in the
//!   unit tests of `dma::transfer`.
//! - Python bindings.
use approx::assert_relative_eq;
use dma_inversion::{
    dma::{
        core::{DMAConfig, DMAGeometry, DMAModel},
        errors::DMAError,
        inversion::{convolve, deconvolve},
        kernel::{KernelMode, ResponseMatrix, build_response_matrix},
        regularization::{AlphaSearchContext, AlphaSearchOptions, find_optimal_alpha},
        sizing::channel_voltages,
        transfer::TransferModel,
    },
    optimization::cost_optimizer::{LineSearcher, SearchMethod, Tolerances},
};
use ndarray::{Array1, ArrayView1};

const BINS: usize = 20;

/// Nano column with 1.5/15 L/min flows, 298.15 K, charges up to 3.
fn nano_geometry() -> DMAGeometry {
    DMAGeometry::new(&DMAConfig::with_model(DMAModel::Nano)).expect("default nano config is valid")
}

/// Log-spaced diameters from 10 nm to 200 nm.
fn diameter_grid() -> Array1<f64> {
    Array1::from_iter((0..BINS).map(|i| 10e-9 * 20f64.powf(i as f64 / (BINS - 1) as f64)))
}

fn lognormal(dp: f64, median: f64, sigma_g: f64, total: f64) -> f64 {
    let ln_sg = sigma_g.ln();
    let ln_ratio = (dp / median).ln();
    total / ((2.0 * std::f64::consts::PI).sqrt() * ln_sg)
        * (-ln_ratio * ln_ratio / (2.0 * ln_sg * ln_sg)).exp()
}

/// Bimodal distribution: 1000 particles around 20 nm, 600 around 100 nm.
fn bimodal(diameters: ArrayView1<f64>) -> Array1<f64> {
    diameters.mapv(|dp| lognormal(dp, 20e-9, 1.3, 1000.0) + lognormal(dp, 100e-9, 1.3, 600.0))
}

fn matrix_for(geometry: &DMAGeometry, mode: KernelMode) -> (Array1<f64>, ResponseMatrix) {
    let diameters = diameter_grid();
    let voltages = channel_voltages(geometry, diameters.view(), 1).expect("grid is valid");
    let terms = TransferModel::new(geometry);
    let matrix = build_response_matrix(&terms, diameters.view(), voltages.view(), mode)
        .expect("matrix builds on a valid grid");
    (diameters, matrix)
}

/// Index of the largest entry within `range`.
fn argmax_in(values: ArrayView1<f64>, range: std::ops::Range<usize>) -> usize {
    range.fold(None::<usize>, |best, i| match best {
        Some(b) if values[b] >= values[i] => Some(b),
        _ => Some(i),
    })
    .unwrap_or(0)
}

#[test]
// Purpose
// -------
// With weak regularization the inversion reproduces the distribution that
// generated the response.
//
// Given
// -----
// - Bimodal N₀ on the 20-bin nano grid, R = A·N₀, α = 1e-6.
//
// Expect
// ------
// - ‖N − N₀‖ / ‖N₀‖ < 1e-2.
fn weakly_regularized_inversion_recovers_distribution() {
    // Arrange
    let geometry = nano_geometry();
    let (diameters, matrix) = matrix_for(&geometry, KernelMode::Full);
    let truth = bimodal(diameters.view());
    let response = convolve(&matrix, truth.view()).expect("dimensions agree");

    // Act
    let recovered = deconvolve(response.view(), &matrix, 1e-6).expect("system is solvable");

    // Assert
    let err = (&recovered - &truth).mapv(|x| x * x).sum().sqrt();
    let norm = truth.mapv(|x| x * x).sum().sqrt();
    assert!(err / norm < 1e-2, "relative error {}", err / norm);
}

#[test]
// Purpose
// -------
// Stronger smoothing keeps both modes of the distribution in place.
//
// Given
// -----
// - Same setup as above with α = 0.1.
//
// Expect
// ------
// - The recovered maxima over the lower and upper halves of the grid sit
//   within one bin of the true maxima.
fn smoothed_inversion_keeps_both_peaks() {
    // Arrange
    let geometry = nano_geometry();
    let (diameters, matrix) = matrix_for(&geometry, KernelMode::Full);
    let truth = bimodal(diameters.view());
    let response = convolve(&matrix, truth.view()).unwrap();

    // Act
    let recovered = deconvolve(response.view(), &matrix, 0.1).unwrap();

    // Assert
    for range in [0..10, 10..BINS] {
        let true_peak = argmax_in(truth.view(), range.clone());
        let found_peak = argmax_in(recovered.view(), range);
        assert!(
            true_peak.abs_diff(found_peak) <= 1,
            "peak moved from bin {true_peak} to {found_peak}"
        );
    }
}

#[test]
// Purpose
// -------
// The forward operator is linear.
fn convolution_is_linear() {
    let geometry = nano_geometry();
    let (diameters, matrix) = matrix_for(&geometry, KernelMode::Full);
    let x = bimodal(diameters.view());
    let y = diameters.mapv(|dp| lognormal(dp, 50e-9, 1.5, 300.0));

    let combined = convolve(&matrix, (&x * 2.5 + &y).view()).unwrap();
    let separate = convolve(&matrix, x.view()).unwrap() * 2.5 + convolve(&matrix, y.view()).unwrap();

    for (a, b) in combined.iter().zip(separate.iter()) {
        assert_relative_eq!(*a, *b, max_relative = 1e-12);
    }
}

#[test]
// Purpose
// -------
// Dropping penetration losses can only raise each entry, and both modes
// share the floor.
fn kernel_without_penetration_dominates_full_kernel() {
    let geometry = nano_geometry();
    let (_, full) = matrix_for(&geometry, KernelMode::Full);
    let (_, simplified) = matrix_for(&geometry, KernelMode::WithoutPenetration);

    assert_eq!(full.dim(), BINS);
    for (f, s) in full.view().iter().zip(simplified.view().iter()) {
        assert!(*f > 0.0);
        assert!(*s >= *f, "simplified {s} < full {f}");
    }
}

#[test]
// Purpose
// -------
// An out-of-range voltage is rejected and the session is invalidated
// rather than left with stale values.
fn long_column_rejects_out_of_range_voltage() {
    let mut geometry = DMAGeometry::new(&DMAConfig::with_model(DMAModel::Long)).unwrap();
    let before = geometry.voltage();

    let strict = geometry.update_voltage(2.0e4);
    assert!(matches!(strict, Err(DMAError::OutOfRangeVoltage { .. })));
    assert_eq!(geometry.voltage(), before);

    let invalidating = geometry.update_voltage_or_invalidate(2.0e4);
    assert!(matches!(invalidating, Err(DMAError::OutOfRangeVoltage { .. })));
    assert!(!geometry.has_valid_voltage());
    assert_eq!(geometry.voltage(), 0.0);
    assert_eq!(geometry.mobility(), 0.0);

    geometry.update_voltage(1.0e3).expect("in-range voltage is accepted");
    assert!(geometry.has_valid_voltage());
}

#[test]
// Purpose
// -------
// The L-BFGS search moves α to a point that fits the observations better
// than the starting guess.
//
// Given
// -----
// - Observed response from the bimodal distribution, initial α = 0.1.
//
// Expect
// ------
// - d(α̂) < d(0.1) and α̂ > 0.
fn lbfgs_alpha_search_improves_discrepancy() {
    // Arrange
    let geometry = nano_geometry();
    let (diameters, matrix) = matrix_for(&geometry, KernelMode::Full);
    let observed = convolve(&matrix, bimodal(diameters.view()).view()).unwrap();
    let tols = Tolerances::new(Some(1e-10), None, Some(50)).unwrap();
    let method = SearchMethod::Lbfgs { line_searcher: LineSearcher::MoreThuente };
    let opts = AlphaSearchOptions::new(tols, method, false, None).unwrap();
    let start = AlphaSearchContext::new(observed.view(), &matrix).unwrap().discrepancy(0.1).unwrap();

    // Act
    let outcome = find_optimal_alpha(observed.view(), &matrix, 0.1, &opts).unwrap();

    // Assert
    assert!(outcome.alpha > 0.0);
    assert!(outcome.discrepancy < start, "{} !< {}", outcome.discrepancy, start);
    assert!(outcome.cost_evals > 0);
}

#[test]
// Purpose
// -------
// A Nelder–Mead search capped at one iteration reports non-convergence
// with the best α so far.
fn nelder_mead_iteration_cap_surfaces_non_convergence() {
    // Arrange
    let geometry = nano_geometry();
    let (diameters, matrix) = matrix_for(&geometry, KernelMode::WithoutPenetration);
    let observed = convolve(&matrix, bimodal(diameters.view()).view()).unwrap();
    let opts = AlphaSearchOptions::nelder_mead(1).unwrap();

    // Act
    let outcome = find_optimal_alpha(observed.view(), &matrix, 0.1, &opts).unwrap();

    // Assert
    assert!(!outcome.converged);
    let best = outcome.alpha;
    match outcome.require_converged() {
        Err(DMAError::NonConvergence { best_alpha, .. }) => assert_eq!(best_alpha, best),
        other => panic!("expected NonConvergence, got {other:?}"),
    }
}
