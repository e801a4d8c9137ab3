//! utils — conversion helpers for the Python bindings.
//!
//! Everything here is compiled only with the `python-bindings` feature. The
//! helpers turn loosely typed Python arguments (numpy arrays, pandas
//! objects, sequences, ints or tuples of ints) into the typed Rust inputs of
//! the estimators, and estimator outputs back into Python objects.
#[cfg(feature = "python-bindings")]
use ndarray::ArrayD;

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::PyTypeError,
    prelude::*,
    types::{PyAny, PyFloat, PyList},
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray, // ArrayD → PyArray
    PyReadonlyArray1,
    PyReadonlyArrayDyn,
};

#[cfg(feature = "python-bindings")]
use crate::reduction::{OneOrMany, Reduction, Weighting};

/// Borrow an n-dimensional `float64` array from a numpy array of any numeric
/// dtype, a pandas object (via `to_numpy`), a scalar, or a (nested) sequence.
///
/// Anything that is not already a `float64` ndarray is converted with
/// `numpy.asarray(raw, "float64")`.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_array_dyn<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArrayDyn<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArrayDyn<f64>>() {
        return Ok(arr_ro);
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(frame_ro) = obj.extract::<PyReadonlyArrayDyn<f64>>() {
            return Ok(frame_ro);
        }
    }

    as_float64(py, raw_data)?.extract::<PyReadonlyArrayDyn<f64>>().map_err(|_| {
        PyTypeError::new_err("expected a numpy.ndarray, pandas object, or sequence of numbers")
    })
}

/// Borrow a 1-D `float64` array; conversions as in [`extract_f64_array_dyn`].
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        return Ok(arr_ro);
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            return Ok(series_ro);
        }
    }

    as_float64(py, raw_data)?.extract::<PyReadonlyArray1<f64>>().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of numbers")
    })
}

/// Optional array argument; `None` stays `None`.
#[cfg(feature = "python-bindings")]
pub fn extract_optional_array_dyn<'py>(
    py: Python<'py>, raw: Option<&Bound<'py, PyAny>>,
) -> PyResult<Option<PyReadonlyArrayDyn<'py, f64>>> {
    raw.filter(|obj| !obj.is_none()).map(|obj| extract_f64_array_dyn(py, obj)).transpose()
}

/// Map the `axis` / `dim` keyword pair onto a [`Reduction`].
///
/// Each may be an int or a sequence of ints. When both are given, `axis`
/// wins.
#[cfg(feature = "python-bindings")]
pub fn reduction_from_py(
    axis: Option<&Bound<'_, PyAny>>, dim: Option<&Bound<'_, PyAny>>,
) -> PyResult<Reduction> {
    if let Some(axis) = axis.filter(|obj| !obj.is_none()) {
        return Ok(Reduction::Axes(extract_axes(axis)?));
    }
    if let Some(dim) = dim.filter(|obj| !obj.is_none()) {
        return Ok(Reduction::Keep(extract_axes(dim)?));
    }
    Ok(Reduction::All)
}

/// Weights win over errors; neither means uniform weighting.
#[cfg(feature = "python-bindings")]
pub fn weighting_from_py<'a>(
    w: Option<&'a PyReadonlyArrayDyn<'_, f64>>, e: Option<&'a PyReadonlyArrayDyn<'_, f64>>,
) -> Weighting<'a> {
    match (w, e) {
        (Some(w), _) => Weighting::Weights(w.as_array()),
        (None, Some(e)) => Weighting::Errors(e.as_array()),
        (None, None) => Weighting::Unit,
    }
}

/// A moment order or a list of orders.
#[cfg(feature = "python-bindings")]
pub fn extract_moments(raw: &Bound<'_, PyAny>) -> PyResult<OneOrMany<u32>> {
    if let Ok(order) = raw.extract::<u32>() {
        return Ok(OneOrMany::One(order));
    }
    let orders: Vec<u32> = raw.extract().map_err(|_| {
        PyTypeError::new_err("moment must be a non-negative int or a sequence of them")
    })?;
    Ok(OneOrMany::Many(orders))
}

/// A probability or a list of probabilities.
#[cfg(feature = "python-bindings")]
pub fn extract_probabilities(raw: &Bound<'_, PyAny>) -> PyResult<OneOrMany<f64>> {
    if let Ok(p) = raw.extract::<f64>() {
        return Ok(OneOrMany::One(p));
    }
    let ps: Vec<f64> = raw
        .extract()
        .map_err(|_| PyTypeError::new_err("p must be a float or a sequence of floats"))?;
    Ok(OneOrMany::Many(ps))
}

/// A 0-dimensional result becomes a Python float, anything else an ndarray.
#[cfg(feature = "python-bindings")]
pub fn array_to_py(py: Python<'_>, values: ArrayD<f64>) -> PyObject {
    if values.ndim() == 0 {
        if let Some(&v) = values.iter().next() {
            return PyFloat::new(py, v).into_any().unbind();
        }
    }
    values.into_pyarray(py).into_any().unbind()
}

/// Mirror a one-or-many request: a single value, or a Python list.
#[cfg(feature = "python-bindings")]
pub fn one_or_many_to_py<T, F>(py: Python<'_>, values: OneOrMany<T>, mut f: F) -> PyResult<PyObject>
where
    F: FnMut(Python<'_>, T) -> PyObject,
{
    match values {
        OneOrMany::One(v) => Ok(f(py, v)),
        OneOrMany::Many(vs) => {
            let items: Vec<PyObject> = vs.into_iter().map(|v| f(py, v)).collect();
            Ok(PyList::new(py, items)?.into_any().unbind())
        }
    }
}

// ---- Helper Methods ----

/// `numpy.asarray(raw, "float64")`; conversion failures become `TypeError`.
#[cfg(feature = "python-bindings")]
fn as_float64<'py>(py: Python<'py>, raw: &Bound<'py, PyAny>) -> PyResult<Bound<'py, PyAny>> {
    py.import("numpy")?.call_method1("asarray", (raw, "float64")).map_err(|err| {
        PyTypeError::new_err(format!("cannot convert argument to a float64 array: {err}"))
    })
}

#[cfg(feature = "python-bindings")]
fn extract_axes(raw: &Bound<'_, PyAny>) -> PyResult<Vec<isize>> {
    if let Ok(axis) = raw.extract::<isize>() {
        return Ok(vec![axis]);
    }
    raw.extract::<Vec<isize>>()
        .map_err(|_| PyTypeError::new_err("axis/dim must be an int or a sequence of ints"))
}

#[cfg(all(test, feature = "python-bindings"))]
mod tests {
    use super::*;
    use ndarray::{IxDyn, array};
    use pyo3::types::PyString;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Conversion of integer ndarrays, nested lists, and integer sequences
    //   into `float64` views.
    // - The `TypeError` raised for inputs numpy cannot convert.
    //
    // They need an embedded interpreter with numpy installed and therefore
    // run only with the `python-bindings` feature (not `extension-module`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Non-float64 inputs are cast instead of rejected.
    //
    // Given
    // -----
    // - `numpy.arange(6).reshape(2, 3)` (int64), `[[1, 2], [3, 4]]`, and
    //   `[1, 2, 3]`.
    //
    // Expect
    // ------
    // - `float64` views with the same shapes and values.
    fn integer_and_nested_inputs_become_float64() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            // Arrange
            let np = py.import("numpy").unwrap();
            let ints = np
                .call_method1("arange", (6,))
                .unwrap()
                .call_method1("reshape", ((2, 3),))
                .unwrap();
            let nested = PyList::new(py, [vec![1i64, 2], vec![3, 4]]).unwrap();
            let flat = PyList::new(py, [1i64, 2, 3]).unwrap();

            // Act
            let grid = extract_f64_array_dyn(py, &ints).unwrap();
            let nested = extract_f64_array_dyn(py, nested.as_any()).unwrap();
            let flat = extract_f64_array(py, flat.as_any()).unwrap();

            // Assert
            assert_eq!(grid.as_array().shape(), &[2, 3]);
            assert_eq!(grid.as_array()[IxDyn(&[1, 2])], 5.0);
            assert_eq!(nested.as_array(), array![[1.0, 2.0], [3.0, 4.0]].into_dyn());
            assert_eq!(flat.as_array(), array![1.0, 2.0, 3.0]);
        });
    }

    #[test]
    // Purpose
    // -------
    // Unconvertible input surfaces as `TypeError`.
    //
    // Given
    // -----
    // - The string `"abc"`.
    //
    // Expect
    // ------
    // - `extract_f64_array_dyn` fails with `TypeError`.
    fn unconvertible_input_is_type_error() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let text = PyString::new(py, "abc");
            let err = extract_f64_array_dyn(py, text.as_any()).unwrap_err();
            assert!(err.is_instance_of::<PyTypeError>(py));
        });
    }
}
