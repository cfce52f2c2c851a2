//! Python-side argument conversion for the `_dma_inversion` bindings.
//!
//! Every helper here accepts loosely-typed Python input (NumPy arrays,
//! pandas objects, plain sequences) and returns owned `ndarray` buffers or
//! validated option structs. Domain validation stays in [`crate::dma`];
//! these functions only reject what cannot be converted.
#[cfg(feature = "python-bindings")]
use std::str::FromStr;

#[cfg(feature = "python-bindings")]
use ndarray::Array1;
use ndarray::Array2;

#[cfg(feature = "python-bindings")]
use numpy::{PyArray1, PyArray2, PyArrayMethods, PyReadonlyArray1, PyReadonlyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::PyAny,
};

#[cfg(feature = "python-bindings")]
use crate::{
    dma::{errors::DMAError, kernel::ResponseMatrix, regularization::AlphaSearchOptions},
    optimization::cost_optimizer::{SearchMethod, Tolerances},
};

/// Assemble a row-major matrix from equally long rows.
///
/// An empty `rows` gives a `0 × 0` matrix; ragged rows are an error naming
/// the first offending row.
pub fn matrix_from_rows(rows: Vec<Vec<f64>>) -> Result<Array2<f64>, String> {
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);
    if let Some(i) = rows.iter().position(|r| r.len() != n_cols) {
        return Err(format!("row {i} has {} entries, expected {n_cols}", rows[i].len()));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n_rows, n_cols), flat).map_err(|e| e.to_string())
}

/// Split a matrix into owned rows.
pub fn matrix_to_rows(matrix: &Array2<f64>) -> Vec<Vec<f64>> {
    matrix.rows().into_iter().map(|row| row.to_vec()).collect()
}

/// Read a 1-D float64 input into an owned array.
///
/// Accepts a NumPy array (any stride), anything exposing `to_numpy()`
/// (pandas Series), or a sequence of floats. Data is copied out through a
/// `Vec`, so numpy's own `ndarray` types never meet this crate's. `name` is
/// used in the error message.
#[cfg(feature = "python-bindings")]
pub fn extract_vector<'py>(raw: &Bound<'py, PyAny>, name: &str) -> PyResult<Array1<f64>> {
    if let Ok(arr_ro) = raw.extract::<PyReadonlyArray1<f64>>() {
        return Ok(Array1::from(readonly_to_vec(&arr_ro)));
    }

    if let Ok(obj) = raw.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            return Ok(Array1::from(readonly_to_vec(&series_ro)));
        }
    }

    let vec: Vec<f64> = raw.extract().map_err(|_| {
        PyTypeError::new_err(format!(
            "{name} must be a 1-D numpy.ndarray, pandas.Series, or sequence of float64"
        ))
    })?;
    Ok(Array1::from(vec))
}

#[cfg(feature = "python-bindings")]
fn readonly_to_vec(arr: &PyReadonlyArray1<'_, f64>) -> Vec<f64> {
    arr.as_array().iter().copied().collect()
}

/// Read a 2-D float64 input into an owned array.
#[cfg(feature = "python-bindings")]
pub fn extract_matrix<'py>(raw: &Bound<'py, PyAny>, name: &str) -> PyResult<Array2<f64>> {
    if let Ok(arr_ro) = raw.extract::<PyReadonlyArray2<f64>>() {
        let view = arr_ro.as_array();
        let (n_rows, n_cols) = view.dim();
        let flat: Vec<f64> = view.iter().copied().collect();
        return Array2::from_shape_vec((n_rows, n_cols), flat)
            .map_err(|e| PyValueError::new_err(format!("{name}: {e}")));
    }
    let rows: Vec<Vec<f64>> = raw.extract().map_err(|_| {
        PyTypeError::new_err(format!("{name} must be a 2-D numpy.ndarray or nested sequence"))
    })?;
    matrix_from_rows(rows).map_err(|e| PyValueError::new_err(format!("{name}: {e}")))
}

/// Hand a vector back to Python as a new 1-D NumPy array.
#[cfg(feature = "python-bindings")]
pub fn vector_to_py<'py>(py: Python<'py>, values: Array1<f64>) -> Bound<'py, PyArray1<f64>> {
    PyArray1::from_vec(py, values.to_vec())
}

/// Hand a matrix back to Python as a new 2-D NumPy array.
#[cfg(feature = "python-bindings")]
pub fn matrix_to_py<'py>(
    py: Python<'py>, matrix: &Array2<f64>,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    PyArray2::from_vec2(py, &matrix_to_rows(matrix))
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Read and validate a response matrix.
#[cfg(feature = "python-bindings")]
pub fn extract_response_matrix<'py>(raw: &Bound<'py, PyAny>) -> PyResult<ResponseMatrix> {
    let matrix = extract_matrix(raw, "matrix")?;
    Ok(ResponseMatrix::from_array(matrix)?)
}

/// Build [`AlphaSearchOptions`] from the keyword arguments of
/// `DMA.find_optimum_alpha`.
///
/// `method` accepts `"lbfgs"`, `"morethuente"`, `"hagerzhang"`, or
/// `"neldermead"`; `None` selects L-BFGS with More–Thuente.
#[cfg(feature = "python-bindings")]
pub fn extract_search_options(
    method: Option<&str>, tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    lbfgs_mem: Option<usize>, verbose: bool,
) -> PyResult<AlphaSearchOptions> {
    let method = match method {
        Some(name) => SearchMethod::from_str(name).map_err(DMAError::from)?,
        None => SearchMethod::default(),
    };

    // Keep the library defaults unless the caller overrides something.
    let tols = if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
        AlphaSearchOptions::default().optimizer.tols
    } else {
        Tolerances::new(tol_grad, tol_cost, max_iter).map_err(DMAError::from)?
    };

    Ok(AlphaSearchOptions::new(tols, method, verbose, lbfgs_mem)?)
}
