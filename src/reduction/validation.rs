//! Input guards shared by the reduction-based estimators.
//!
//! - [`ensure_positive_weight`]: strict-mode check that every reduction cell
//!   has a positive summed weight before it is used as a divisor.
//! - [`ensure_finite`]: reject NaN/±inf samples where finite data is required.
//! - [`ensure_same_len`]: paired 1-D inputs must have equal length.
use crate::errors::{WStatError, WStatResult};
use ndarray::ArrayViewD;

/// Check that every summed weight is strictly positive.
///
/// NaN sums fail as well. The reported cell is the 0-based row-major index
/// into the reduced result.
///
/// # Errors
/// Returns [`WStatError::DegenerateReduction`] for the first failing cell.
pub fn ensure_positive_weight(weight_sums: &ArrayViewD<'_, f64>) -> WStatResult<()> {
    match weight_sums.iter().position(|&s| !(s > 0.0)) {
        Some(cell) => Err(WStatError::DegenerateReduction { cell }),
        None => Ok(()),
    }
}

/// Check that all values are finite.
///
/// # Errors
/// Returns [`WStatError::NonFiniteData`] with the index/value of the first
/// offending element.
pub fn ensure_finite<'a, I>(values: I) -> WStatResult<()>
where
    I: IntoIterator<Item = &'a f64>,
{
    for (index, &value) in values.into_iter().enumerate() {
        if !value.is_finite() {
            return Err(WStatError::NonFiniteData { index, value });
        }
    }
    Ok(())
}

/// Check that two paired 1-D inputs have the same length.
///
/// # Errors
/// Returns [`WStatError::ShapeMismatch`] when `found != expected`.
pub fn ensure_same_len(expected: usize, found: usize) -> WStatResult<()> {
    if expected != found {
        return Err(WStatError::ShapeMismatch { expected: vec![expected], found: vec![found] });
    }
    Ok(())
}
