//! wstat — weighted statistics over n-dimensional arrays, with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the weighted estimators to Python via the `_wstat` extension
//! module. When the `python-bindings` feature is enabled, this module defines
//! the Python-facing functions and result class.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`reduction`, `dispersion`,
//!   `order_stats`, `nan`) as the public crate surface.
//! - Define `#[pyfunction]` wrappers and the `#[pymodule]` initializer for
//!   the `_wstat` Python extension, mapping the `axis`/`dim` and `w`/`e`
//!   keyword pairs onto [`Reduction`](reduction::Reduction) and
//!   [`Weighting`](reduction::Weighting).
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work is implemented in the inner Rust modules; this file
//!   performs only FFI glue, argument conversion, and error mapping.
//! - Inputs are converted to `float64`; caller arrays are only borrowed.
//!
//! Conventions
//! -----------
//! - `axis` wins over `dim` when both are given; `w` wins over `e`.
//! - 0-dimensional results are returned as Python floats, everything else as
//!   numpy arrays; list requests (moments, probabilities) return lists.
//! - Errors from core Rust code are [`WStatError`](errors::WStatError)s and
//!   are converted to `ValueError` at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code depends on the inner modules and can ignore the PyO3
//!   items guarded by the `python-bindings` feature:
//!
//!   ```rust
//!   use wstat::prelude::*;
//!   ```
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules
//!   and by the integration tests under `tests/`.

pub mod dispersion;
pub mod errors;
pub mod nan;
pub mod order_stats;
pub mod reduction;
pub mod utils;

pub mod prelude {
    pub use crate::dispersion::prelude::*;
    pub use crate::errors::{WStatError, WStatResult};
    pub use crate::nan::prelude::*;
    pub use crate::order_stats::prelude::*;
    pub use crate::reduction::prelude::*;
}

#[cfg(feature = "python-bindings")]
use pyo3::{
    prelude::*,
    types::{PyAny, PyFloat},
};

#[cfg(feature = "python-bindings")]
use crate::{
    dispersion::{JitterMode, MLRmsOptions, MLRmsOutcome, SemOptions, StdOptions},
    utils::{
        array_to_py, extract_f64_array, extract_f64_array_dyn, extract_moments,
        extract_optional_array_dyn, extract_probabilities, one_or_many_to_py, reduction_from_py,
        weighting_from_py,
    },
};

/// MLRmsResult — Python-facing view of a jitter-solver run.
///
/// Purpose
/// -------
/// Expose every field of [`MLRmsOutcome`] to Python when `mlrms` is called
/// with `full_output=True`.
///
/// Fields
/// ------
/// - `inner`: [`MLRmsOutcome`]
///   Rust-side outcome backing the accessors.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "wstat", frozen)]
pub struct MLRmsResult {
    inner: MLRmsOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl MLRmsResult {
    /// Weighted RMS of the residuals.
    #[getter]
    pub fn rms(&self) -> f64 {
        self.inner.rms
    }

    /// Estimated extra scatter.
    #[getter]
    pub fn jitter(&self) -> f64 {
        self.inner.jitter
    }

    /// Reweighted mean.
    #[getter]
    pub fn mean(&self) -> f64 {
        self.inner.mean
    }

    #[getter]
    pub fn log_likelihood(&self) -> f64 {
        self.inner.log_likelihood
    }

    #[getter]
    pub fn iterations(&self) -> usize {
        self.inner.iterations
    }

    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.converged
    }

    /// Stopping reason as text.
    #[getter]
    pub fn termination(&self) -> String {
        self.inner.termination.to_string()
    }

    fn __repr__(&self) -> String {
        format!(
            "MLRmsResult(rms={}, jitter={}, mean={}, iterations={}, converged={})",
            self.inner.rms,
            self.inner.jitter,
            self.inner.mean,
            self.inner.iterations,
            self.inner.converged
        )
    }
}

/// Weighted moments `Σ w·y^k`; returns one result or a list for a list of
/// orders.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (
    y, w = None, e = None, moment = None, axis = None, dim = None, keepdims = false
))]
#[allow(clippy::too_many_arguments)]
fn wmom<'py>(
    py: Python<'py>, y: &Bound<'py, PyAny>, w: Option<&Bound<'py, PyAny>>,
    e: Option<&Bound<'py, PyAny>>, moment: Option<&Bound<'py, PyAny>>,
    axis: Option<&Bound<'py, PyAny>>, dim: Option<&Bound<'py, PyAny>>, keepdims: bool,
) -> PyResult<PyObject> {
    let y = extract_f64_array_dyn(py, y)?;
    let (w, e) = (extract_optional_array_dyn(py, w)?, extract_optional_array_dyn(py, e)?);
    let moments = match moment {
        Some(m) => extract_moments(m)?,
        None => reduction::OneOrMany::One(1),
    };
    let reduction = reduction_from_py(axis, dim)?;
    let weighting = weighting_from_py(w.as_ref(), e.as_ref());
    let sums = reduction::wmom(&y.as_array(), &weighting, moments, &reduction, keepdims)?;
    one_or_many_to_py(py, sums, array_to_py)
}

/// Weighted mean.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (y, w = None, e = None, axis = None, dim = None))]
fn wmean<'py>(
    py: Python<'py>, y: &Bound<'py, PyAny>, w: Option<&Bound<'py, PyAny>>,
    e: Option<&Bound<'py, PyAny>>, axis: Option<&Bound<'py, PyAny>>,
    dim: Option<&Bound<'py, PyAny>>,
) -> PyResult<PyObject> {
    let y = extract_f64_array_dyn(py, y)?;
    let (w, e) = (extract_optional_array_dyn(py, w)?, extract_optional_array_dyn(py, e)?);
    let reduction = reduction_from_py(axis, dim)?;
    let weighting = weighting_from_py(w.as_ref(), e.as_ref());
    let mean = dispersion::wmean(&y.as_array(), &weighting, &reduction)?;
    Ok(array_to_py(py, mean))
}

/// Weighted root mean square.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (y, w = None, e = None, axis = None, dim = None))]
fn wrms<'py>(
    py: Python<'py>, y: &Bound<'py, PyAny>, w: Option<&Bound<'py, PyAny>>,
    e: Option<&Bound<'py, PyAny>>, axis: Option<&Bound<'py, PyAny>>,
    dim: Option<&Bound<'py, PyAny>>,
) -> PyResult<PyObject> {
    let y = extract_f64_array_dyn(py, y)?;
    let (w, e) = (extract_optional_array_dyn(py, w)?, extract_optional_array_dyn(py, e)?);
    let reduction = reduction_from_py(axis, dim)?;
    let weighting = weighting_from_py(w.as_ref(), e.as_ref());
    let rms = dispersion::wrms(&y.as_array(), &weighting, &reduction)?;
    Ok(array_to_py(py, rms))
}

/// Weighted mean and its standard error, `(mean, err)`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (
    y, w = None, e = None, axis = None, dim = None, rescale = true, ddof = 1.0,
    keepdims = false, strict = false
))]
#[allow(clippy::too_many_arguments)]
fn wsem<'py>(
    py: Python<'py>, y: &Bound<'py, PyAny>, w: Option<&Bound<'py, PyAny>>,
    e: Option<&Bound<'py, PyAny>>, axis: Option<&Bound<'py, PyAny>>,
    dim: Option<&Bound<'py, PyAny>>, rescale: bool, ddof: f64, keepdims: bool, strict: bool,
) -> PyResult<(PyObject, PyObject)> {
    let y = extract_f64_array_dyn(py, y)?;
    let (w, e) = (extract_optional_array_dyn(py, w)?, extract_optional_array_dyn(py, e)?);
    let reduction = reduction_from_py(axis, dim)?;
    let weighting = weighting_from_py(w.as_ref(), e.as_ref());
    let opts = SemOptions::new(rescale, ddof, keepdims, strict)?;
    let (mean, err) = dispersion::wsem(&y.as_array(), &weighting, &reduction, &opts)?;
    Ok((array_to_py(py, mean), array_to_py(py, err)))
}

/// Error-weighted standard deviation, `(std, mean)` or `(std, mean, mean_err)`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (y, e, axis = None, dim = None, ret_err = false))]
fn wstd<'py>(
    py: Python<'py>, y: &Bound<'py, PyAny>, e: &Bound<'py, PyAny>,
    axis: Option<&Bound<'py, PyAny>>, dim: Option<&Bound<'py, PyAny>>, ret_err: bool,
) -> PyResult<PyObject> {
    let y = extract_f64_array_dyn(py, y)?;
    let e = extract_f64_array_dyn(py, e)?;
    let reduction = reduction_from_py(axis, dim)?;
    let out = dispersion::wstd(&y.as_array(), &e.as_array(), &reduction, ret_err)?;
    let std = array_to_py(py, out.std);
    let mean = array_to_py(py, out.mean);
    let tuple = match out.mean_err {
        Some(err) => (std, mean, array_to_py(py, err)).into_pyobject(py)?.into_any(),
        None => (std, mean).into_pyobject(py)?.into_any(),
    };
    Ok(tuple.unbind())
}

/// Weighted RMS and jitter, `(rms, jitter)`, `(rms, jitter, mean)`, or an
/// `MLRmsResult` with `full_output=True`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (
    y, e, s = 0.0, ml = true, ret_mean = false, tol = 1e-6, max_iter = 20,
    require_convergence = false, verbose = false, full_output = false
))]
#[allow(clippy::too_many_arguments)]
fn mlrms<'py>(
    py: Python<'py>, y: &Bound<'py, PyAny>, e: &Bound<'py, PyAny>, s: f64, ml: bool,
    ret_mean: bool, tol: f64, max_iter: usize, require_convergence: bool, verbose: bool,
    full_output: bool,
) -> PyResult<PyObject> {
    let y = extract_f64_array(py, y)?;
    let e = extract_f64_array(py, e)?;
    let mode = if ml { JitterMode::MaxLikelihood } else { JitterMode::ReducedChiSquare };
    let opts = MLRmsOptions::new(s, mode, tol, max_iter, require_convergence, verbose)?;
    let out = dispersion::mlrms(&y.as_array(), &e.as_array(), &opts)?;
    let obj = if full_output {
        Bound::new(py, MLRmsResult { inner: out })?.into_any()
    } else if ret_mean {
        (out.rms, out.jitter, out.mean).into_pyobject(py)?.into_any()
    } else {
        (out.rms, out.jitter).into_pyobject(py)?.into_any()
    };
    Ok(obj.unbind())
}

/// Sample-valued quantile(s).
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (x, p, w = None, middle = false))]
fn quantile<'py>(
    py: Python<'py>, x: &Bound<'py, PyAny>, p: &Bound<'py, PyAny>,
    w: Option<&Bound<'py, PyAny>>, middle: bool,
) -> PyResult<PyObject> {
    let x = extract_f64_array(py, x)?;
    let w = w.filter(|obj| !obj.is_none()).map(|obj| extract_f64_array(py, obj)).transpose()?;
    let p = extract_probabilities(p)?;
    let q = order_stats::quantile(&x.as_array(), p, w.as_ref().map(|w| w.as_array()), middle)?;
    one_or_many_to_py(py, q, |py, v| PyFloat::new(py, v).into_any().unbind())
}

/// Interquartile range, optionally as a 1-sigma estimate.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (x, w = None, sigma = false))]
fn iqr<'py>(
    py: Python<'py>, x: &Bound<'py, PyAny>, w: Option<&Bound<'py, PyAny>>, sigma: bool,
) -> PyResult<f64> {
    let x = extract_f64_array(py, x)?;
    let w = w.filter(|obj| !obj.is_none()).map(|obj| extract_f64_array(py, obj)).transpose()?;
    Ok(order_stats::iqr(&x.as_array(), w.as_ref().map(|w| w.as_array()), sigma)?)
}

/// Interpolating median over a reduction.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (data, axis = None, dim = None))]
fn median<'py>(
    py: Python<'py>, data: &Bound<'py, PyAny>, axis: Option<&Bound<'py, PyAny>>,
    dim: Option<&Bound<'py, PyAny>>,
) -> PyResult<PyObject> {
    let data = extract_f64_array_dyn(py, data)?;
    let reduction = reduction_from_py(axis, dim)?;
    let out = order_stats::median(&data.as_array(), &reduction)?;
    Ok(array_to_py(py, out))
}

/// Median absolute deviation, optionally as a 1-sigma estimate.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (data, axis = None, dim = None, sigma = false))]
fn mad<'py>(
    py: Python<'py>, data: &Bound<'py, PyAny>, axis: Option<&Bound<'py, PyAny>>,
    dim: Option<&Bound<'py, PyAny>>, sigma: bool,
) -> PyResult<PyObject> {
    let data = extract_f64_array_dyn(py, data)?;
    let reduction = reduction_from_py(axis, dim)?;
    let out = order_stats::mad(&data.as_array(), &reduction, sigma)?;
    Ok(array_to_py(py, out))
}

/// Sanitized copies `(y, w)`: non-finite samples and unusable weights or
/// errors become zero-weight entries.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (y, w = None, e = None))]
fn wnan_to_num<'py>(
    py: Python<'py>, y: &Bound<'py, PyAny>, w: Option<&Bound<'py, PyAny>>,
    e: Option<&Bound<'py, PyAny>>,
) -> PyResult<(PyObject, PyObject)> {
    let y = extract_f64_array_dyn(py, y)?;
    let (w, e) = (extract_optional_array_dyn(py, w)?, extract_optional_array_dyn(py, e)?);
    let weighting = weighting_from_py(w.as_ref(), e.as_ref());
    let (y, w) = nan::wnan_to_num(&y.as_array(), &weighting)?;
    Ok((array_to_py(py, y), array_to_py(py, w)))
}

/// NaN-tolerant [`wsem`].
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (
    y, w = None, e = None, axis = None, dim = None, rescale = true, ddof = 1.0,
    keepdims = false, strict = false
))]
#[allow(clippy::too_many_arguments)]
fn nanwsem<'py>(
    py: Python<'py>, y: &Bound<'py, PyAny>, w: Option<&Bound<'py, PyAny>>,
    e: Option<&Bound<'py, PyAny>>, axis: Option<&Bound<'py, PyAny>>,
    dim: Option<&Bound<'py, PyAny>>, rescale: bool, ddof: f64, keepdims: bool, strict: bool,
) -> PyResult<(PyObject, PyObject)> {
    let y = extract_f64_array_dyn(py, y)?;
    let (w, e) = (extract_optional_array_dyn(py, w)?, extract_optional_array_dyn(py, e)?);
    let reduction = reduction_from_py(axis, dim)?;
    let weighting = weighting_from_py(w.as_ref(), e.as_ref());
    let opts = SemOptions::new(rescale, ddof, keepdims, strict)?;
    let (mean, err) = nan::nanwsem(&y.as_array(), &weighting, &reduction, &opts)?;
    Ok((array_to_py(py, mean), array_to_py(py, err)))
}

/// NaN-tolerant moment-based standard deviation.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (
    y, w = None, e = None, axis = None, dim = None, ddof = 1.0, keepdims = false,
    strict = false
))]
#[allow(clippy::too_many_arguments)]
fn nanwstd<'py>(
    py: Python<'py>, y: &Bound<'py, PyAny>, w: Option<&Bound<'py, PyAny>>,
    e: Option<&Bound<'py, PyAny>>, axis: Option<&Bound<'py, PyAny>>,
    dim: Option<&Bound<'py, PyAny>>, ddof: f64, keepdims: bool, strict: bool,
) -> PyResult<PyObject> {
    let y = extract_f64_array_dyn(py, y)?;
    let (w, e) = (extract_optional_array_dyn(py, w)?, extract_optional_array_dyn(py, e)?);
    let reduction = reduction_from_py(axis, dim)?;
    let weighting = weighting_from_py(w.as_ref(), e.as_ref());
    let opts = StdOptions::new(ddof, keepdims, strict)?;
    let out = nan::nanwstd(&y.as_array(), &weighting, &reduction, &opts)?;
    Ok(array_to_py(py, out))
}

/// NaN-tolerant interquartile range of a 1-D sample.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (x, w = None, e = None, sigma = false))]
fn naniqr<'py>(
    py: Python<'py>, x: &Bound<'py, PyAny>, w: Option<&Bound<'py, PyAny>>,
    e: Option<&Bound<'py, PyAny>>, sigma: bool,
) -> PyResult<f64> {
    let x = extract_f64_array(py, x)?;
    let (w, e) = (extract_optional_array_dyn(py, w)?, extract_optional_array_dyn(py, e)?);
    let weighting = weighting_from_py(w.as_ref(), e.as_ref());
    Ok(nan::naniqr(&x.as_array(), &weighting, sigma)?)
}

/// _wstat — PyO3 module initializer for the weighted-statistics extension.
///
/// Purpose
/// -------
/// Register the estimator functions and the `MLRmsResult` class on the
/// `_wstat` module, which the pure-Python `wstat` package re-exports.
///
/// Errors
/// ------
/// - `PyErr`
///   If registering a function or class fails.
///
/// Notes
/// -----
/// - This function is invoked automatically by Python when importing the
///   compiled extension; it is not called directly by user code.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _wstat<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<MLRmsResult>()?;
    m.add_function(wrap_pyfunction!(wmom, m)?)?;
    m.add_function(wrap_pyfunction!(wmean, m)?)?;
    m.add_function(wrap_pyfunction!(wrms, m)?)?;
    m.add_function(wrap_pyfunction!(wsem, m)?)?;
    m.add_function(wrap_pyfunction!(wstd, m)?)?;
    m.add_function(wrap_pyfunction!(mlrms, m)?)?;
    m.add_function(wrap_pyfunction!(quantile, m)?)?;
    m.add_function(wrap_pyfunction!(iqr, m)?)?;
    m.add_function(wrap_pyfunction!(median, m)?)?;
    m.add_function(wrap_pyfunction!(mad, m)?)?;
    m.add_function(wrap_pyfunction!(wnan_to_num, m)?)?;
    m.add_function(wrap_pyfunction!(nanwsem, m)?)?;
    m.add_function(wrap_pyfunction!(nanwstd, m)?)?;
    m.add_function(wrap_pyfunction!(naniqr, m)?)?;
    Ok(())
}

#[cfg(all(test, feature = "python-bindings"))]
mod tests {
    use super::*;
    use pyo3::types::PyList;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The Python-facing wrappers on integer and list inputs, as a Python
    //   caller would pass them.
    //
    // They need an embedded interpreter with numpy installed and therefore
    // run only with the `python-bindings` feature (not `extension-module`).
    // -------------------------------------------------------------------------

    fn int_grid(py: Python<'_>) -> Bound<'_, PyAny> {
        py.import("numpy")
            .unwrap()
            .call_method1("arange", (20,))
            .unwrap()
            .call_method1("reshape", ((5, 4),))
            .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // `wsem` accepts the integer grid `arange(20).reshape(5, 4)`.
    //
    // Given
    // -----
    // - The int64 grid, `ddof = 0`.
    //
    // Expect
    // ------
    // - `(9.5, 1.28938)` as Python floats.
    fn wsem_accepts_integer_grid() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            // Arrange
            let y = int_grid(py);

            // Act
            let (mean, err) =
                wsem(py, &y, None, None, None, None, true, 0.0, false, false).unwrap();

            // Assert
            assert_eq!(mean.extract::<f64>(py).unwrap(), 9.5);
            assert!((err.extract::<f64>(py).unwrap() - 1.2893796958227628).abs() < 1e-9);
        });
    }

    #[test]
    // Purpose
    // -------
    // `wrms`, `median`, and `wnan_to_num` are reachable from Python with
    // list inputs.
    //
    // Given
    // -----
    // - `y = [3, 4]` (ints) for `wrms`; the int grid for `median`.
    // - `y = [NaN, 0, 1, 2, 3]`, `e = [NaN, NaN, -1, 0, 2]` for `wnan_to_num`.
    //
    // Expect
    // ------
    // - `wrms = √12.5`; `median = 9.5`; `w' = [0, 0, 0, 0, 0.25]`.
    fn rms_median_and_sanitize_wrappers() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            // Arrange
            let pair = PyList::new(py, [3i64, 4]).unwrap();
            let y = PyList::new(py, [f64::NAN, 0.0, 1.0, 2.0, 3.0]).unwrap();
            let e = PyList::new(py, [f64::NAN, f64::NAN, -1.0, 0.0, 2.0]).unwrap();

            // Act
            let rms = wrms(py, pair.as_any(), None, None, None, None).unwrap();
            let mid = median(py, &int_grid(py), None, None).unwrap();
            let (_, w) = wnan_to_num(py, y.as_any(), None, Some(e.as_any())).unwrap();

            // Assert
            assert!((rms.extract::<f64>(py).unwrap() - 12.5f64.sqrt()).abs() < 1e-12);
            assert_eq!(mid.extract::<f64>(py).unwrap(), 9.5);
            assert_eq!(w.extract::<Vec<f64>>(py).unwrap(), vec![0.0, 0.0, 0.0, 0.0, 0.25]);
        });
    }
}
