//! dma_inversion — Differential Mobility Analyzer response modeling and
//! size-distribution inversion, with optional Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the DMA pipeline to Python through the `_dma_inversion`
//! extension module.
//!
//! Key behaviors
//! -------------
//! - Re-export the core modules: [`physics`] (aerosol constants, friction,
//!   mobility), [`dma`] (instrument geometry, transfer terms, response
//!   matrix, inversion) and [`optimization`] (argmin-backed minimizer).
//! - Under the `python-bindings` feature, define the `DMA` session class and
//!   the `AlphaSearch` result class.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file performs only
//!   FFI glue and error mapping.
//! - Errors cross the boundary as `ValueError` via `From<DMAError> for PyErr`.
//!
//! Downstream usage
//! ----------------
//! - Rust code should use [`dma::prelude`] and ignore the PyO3 items.
//! - Python code imports `_dma_inversion.DMA`.

pub mod dma;
pub mod optimization;
pub mod physics;
pub mod utils;

#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use numpy::{PyArray1, PyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    dma::{
        core::{
            DMAConfig, DMAGeometry, DMAModel,
            validation::{validate_diameter, validate_voltage},
        },
        inversion::{convolve, deconvolve},
        kernel::{KernelMode, build_response_matrix},
        regularization::{AlphaSearchOutcome, DEFAULT_ALPHA_GUESS, find_optimal_alpha},
        sizing::channel_diameters,
        transfer::TransferModel,
    },
    utils::{
        extract_response_matrix, extract_search_options, extract_vector, matrix_to_py,
        vector_to_py,
    },
};

/// DMA — Python-facing instrument session.
///
/// Purpose
/// -------
/// Hold one validated [`DMAGeometry`] and expose the transfer terms, the
/// response matrix in both kernel modes, and the inversion routines.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `DMA(model="nano", flow_aerosol=1.5, flow_sheath=15.0, l_eff=5.0,
/// voltage=100.0, pressure=101325.0, temperature=298.15, charge_limit=3)`.
/// Flows are in L/min, lengths in m, temperature in K, pressure in Pa.
///
/// Invariants
/// ----------
/// - `inner` always passed [`DMAGeometry::new`]. After a failed
///   `update_voltage` the voltage and mobility read back as `0.0`.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "dma_inversion", unsendable)]
pub struct DMA {
    inner: DMAGeometry,
}

#[cfg(feature = "python-bindings")]
impl DMA {
    fn build_matrix<'py>(
        &self, py: Python<'py>, diameters: &Bound<'py, PyAny>, voltages: &Bound<'py, PyAny>,
        mode: KernelMode,
    ) -> PyResult<Bound<'py, PyArray2<f64>>> {
        let diameters = extract_vector(diameters, "diameters")?;
        let voltages = extract_vector(voltages, "voltages")?;
        let terms = TransferModel::new(&self.inner);
        let matrix = build_response_matrix(&terms, diameters.view(), voltages.view(), mode)?;
        matrix_to_py(py, &matrix.into_inner())
    }
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl DMA {
    #[new]
    #[pyo3(
        signature = (
            model = "nano",
            flow_aerosol = 1.5,
            flow_sheath = 15.0,
            l_eff = 5.0,
            voltage = 100.0,
            pressure = 101325.0,
            temperature = 298.15,
            charge_limit = 3,
        ),
        text_signature = "(model='nano', flow_aerosol=1.5, flow_sheath=15.0, l_eff=5.0, \
                          voltage=100.0, pressure=101325.0, temperature=298.15, charge_limit=3)"
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        model: &str, flow_aerosol: f64, flow_sheath: f64, l_eff: f64, voltage: f64,
        pressure: f64, temperature: f64, charge_limit: u32,
    ) -> PyResult<Self> {
        let model: DMAModel = model.parse()?;
        let config = DMAConfig {
            model,
            flow_aerosol,
            flow_sheath,
            l_eff,
            voltage,
            pressure,
            temperature,
            charge_limit,
        };
        Ok(DMA { inner: DMAGeometry::new(&config)? })
    }

    /// Set a new operating voltage. On failure the session is left with a
    /// zeroed voltage and mobility.
    pub fn update_voltage(&mut self, voltage: f64) -> PyResult<()> {
        self.inner.update_voltage_or_invalidate(voltage)?;
        Ok(())
    }

    #[getter]
    pub fn model(&self) -> &'static str {
        self.inner.model().name()
    }

    #[getter]
    pub fn voltage(&self) -> f64 {
        self.inner.voltage()
    }

    /// Centroid mobility at the current voltage, m²/(V·s).
    #[getter]
    pub fn mobility(&self) -> f64 {
        self.inner.mobility()
    }

    #[getter]
    pub fn voltage_range(&self) -> (f64, f64) {
        self.inner.voltage_range()
    }

    #[getter]
    pub fn mobility_range(&self) -> (f64, f64) {
        self.inner.mobility_range()
    }

    #[getter]
    pub fn geometric_constant(&self) -> f64 {
        self.inner.geometric_constant()
    }

    #[getter]
    pub fn flow_aerosol(&self) -> f64 {
        self.inner.flow_aerosol()
    }

    #[getter]
    pub fn flow_sheath(&self) -> f64 {
        self.inner.flow_sheath()
    }

    #[getter]
    pub fn temperature(&self) -> f64 {
        self.inner.temperature()
    }

    #[getter]
    pub fn pressure(&self) -> f64 {
        self.inner.pressure()
    }

    #[getter]
    pub fn charge_limit(&self) -> u32 {
        self.inner.charge_limit()
    }

    pub fn penetration_efficiency(&self, dp: f64) -> PyResult<f64> {
        let dp = validate_diameter(dp)?;
        Ok(TransferModel::new(&self.inner).penetration_efficiency(dp))
    }

    pub fn charging_efficiency(&self, dp: f64, charge: i32) -> PyResult<f64> {
        let dp = validate_diameter(dp)?;
        Ok(TransferModel::new(&self.inner).charging_efficiency(dp, charge))
    }

    pub fn transfer_function(&self, dp: f64, voltage: f64, charge: i32) -> PyResult<f64> {
        let dp = validate_diameter(dp)?;
        let voltage = validate_voltage(voltage)?;
        Ok(TransferModel::new(&self.inner).transfer_function(dp, voltage, charge))
    }

    /// Response matrix including penetration losses.
    pub fn convolution_matrix<'py>(
        &self, py: Python<'py>, diameters: &Bound<'py, PyAny>, voltages: &Bound<'py, PyAny>,
    ) -> PyResult<Bound<'py, PyArray2<f64>>> {
        self.build_matrix(py, diameters, voltages, KernelMode::Full)
    }

    /// Response matrix without penetration losses.
    pub fn convolution_matrix_simplified<'py>(
        &self, py: Python<'py>, diameters: &Bound<'py, PyAny>, voltages: &Bound<'py, PyAny>,
    ) -> PyResult<Bound<'py, PyArray2<f64>>> {
        self.build_matrix(py, diameters, voltages, KernelMode::WithoutPenetration)
    }

    #[staticmethod]
    pub fn convolution<'py>(
        py: Python<'py>, matrix: &Bound<'py, PyAny>, distribution: &Bound<'py, PyAny>,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let matrix = extract_response_matrix(matrix)?;
        let distribution = extract_vector(distribution, "distribution")?;
        let response: Array1<f64> = convolve(&matrix, distribution.view())?;
        Ok(vector_to_py(py, response))
    }

    #[staticmethod]
    pub fn deconvolution<'py>(
        py: Python<'py>, response: &Bound<'py, PyAny>, matrix: &Bound<'py, PyAny>, alpha: f64,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let matrix = extract_response_matrix(matrix)?;
        let response = extract_vector(response, "response")?;
        let distribution = deconvolve(response.view(), &matrix, alpha)?;
        Ok(vector_to_py(py, distribution))
    }

    /// Search the regularization strength. Non-convergence is reported on
    /// the returned `AlphaSearch`, not raised.
    #[staticmethod]
    #[pyo3(
        signature = (
            observed,
            matrix,
            initial_guess = DEFAULT_ALPHA_GUESS,
            method = None,
            tol_grad = None,
            tol_cost = None,
            max_iter = None,
            lbfgs_mem = None,
            verbose = false,
        ),
        text_signature = "(observed, matrix, initial_guess=0.1, method=None, tol_grad=None, \
                          tol_cost=None, max_iter=None, lbfgs_mem=None, verbose=False)"
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn find_optimum_alpha<'py>(
        py: Python<'py>, observed: &Bound<'py, PyAny>, matrix: &Bound<'py, PyAny>,
        initial_guess: f64, method: Option<&str>, tol_grad: Option<f64>, tol_cost: Option<f64>,
        max_iter: Option<usize>, lbfgs_mem: Option<usize>, verbose: bool,
    ) -> PyResult<AlphaSearch> {
        let matrix = extract_response_matrix(matrix)?;
        let observed = extract_vector(observed, "observed")?;
        let opts =
            extract_search_options(method, tol_grad, tol_cost, max_iter, lbfgs_mem, verbose)?;
        let inner = find_optimal_alpha(observed.view(), &matrix, initial_guess, &opts)?;
        Ok(AlphaSearch { inner })
    }

    /// Diameters (and centroid mobilities) selected at each voltage.
    #[pyo3(signature = (voltages, charge = 1))]
    pub fn search_dp_given_voltages<'py>(
        &self, py: Python<'py>, voltages: &Bound<'py, PyAny>, charge: i32,
    ) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>)> {
        let voltages = extract_vector(voltages, "voltages")?;
        let sizing = channel_diameters(&self.inner, voltages.view(), charge)?;
        Ok((vector_to_py(py, sizing.diameters), vector_to_py(py, sizing.mobilities)))
    }
}

/// AlphaSearch — result of `DMA.find_optimum_alpha`.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "dma_inversion")]
pub struct AlphaSearch {
    inner: AlphaSearchOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl AlphaSearch {
    #[getter]
    pub fn alpha(&self) -> f64 {
        self.inner.alpha
    }

    #[getter]
    pub fn discrepancy(&self) -> f64 {
        self.inner.discrepancy
    }

    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.converged
    }

    #[getter]
    pub fn status(&self) -> String {
        self.inner.status.clone()
    }

    #[getter]
    pub fn iterations(&self) -> usize {
        self.inner.iterations
    }

    #[getter]
    pub fn cost_evals(&self) -> u64 {
        self.inner.cost_evals
    }

    fn __repr__(&self) -> String {
        format!(
            "AlphaSearch(alpha={:e}, discrepancy={:e}, converged={})",
            self.inner.alpha, self.inner.discrepancy, self.inner.converged
        )
    }
}

#[cfg(feature = "python-bindings")]
#[pymodule]
fn _dma_inversion<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<DMA>()?;
    m.add_class::<AlphaSearch>()?;
    Ok(())
}
