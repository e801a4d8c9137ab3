//! nan::sanitize — replace non-finite samples by zero-weight zeros.
//!
//! Purpose
//! -------
//! Turn a possibly NaN-laden sample and its weighting into a clean pair
//! `(y', w')` that every weighted estimator in the crate can consume: the
//! shapes are preserved and invalid entries simply stop contributing.
//!
//! Key behaviors
//! -------------
//! - Non-finite `y` ⇒ `y' = 0` and `w' = 0`.
//! - Explicit weights: non-finite entries ⇒ `0`.
//! - Errors: `1/e²` for `e > 0`, otherwise (non-positive, NaN, ±inf) ⇒ `0`.
//! - Uniform weighting: `w' = 1` wherever `y` is finite.
//!
//! Invariants & assumptions
//! ------------------------
//! - The caller's arrays are never modified; both outputs are fresh.
//! - `w'` has `y`'s shape even if the weighting was broadcast.
//! - Negative weights are passed through untouched.
use crate::{errors::WStatResult, reduction::Weighting};
use ndarray::{ArrayBase, ArrayD, Data, Dimension, Zip};

/// Sanitize `y` and its weighting.
///
/// Parameters
/// ----------
/// - `y`: `&ArrayBase<S, D>`
///   Sample values, possibly containing NaN/±inf.
/// - `weighting`: `&Weighting`
///   Uniform, weights, or 1-sigma errors (broadcast to `y`).
///
/// Returns
/// -------
/// `WStatResult<(ArrayD<f64>, ArrayD<f64>)>`
///   `(y', w')`, both shaped like `y`.
///
/// Errors
/// ------
/// - `WStatError::ShapeMismatch` if the weighting does not broadcast to `y`.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use wstat::nan::wnan_to_num;
/// # use wstat::reduction::Weighting;
/// let y = array![f64::NAN, 0.0, 1.0, 2.0, 3.0];
/// let e = array![f64::NAN, f64::NAN, -1.0, 0.0, 2.0];
/// let (y, w) = wnan_to_num(&y, &Weighting::errors(&e)).unwrap();
/// assert_eq!(y, array![0.0, 0.0, 1.0, 2.0, 3.0].into_dyn());
/// assert_eq!(w, array![0.0, 0.0, 0.0, 0.0, 0.25].into_dyn());
/// ```
pub fn wnan_to_num<S, D>(
    y: &ArrayBase<S, D>, weighting: &Weighting<'_>,
) -> WStatResult<(ArrayD<f64>, ArrayD<f64>)>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let y = y.view().into_dyn();
    let weights = weighting.resolve(y.shape())?;

    let w = match &weights {
        None => y.mapv(|yv| if yv.is_finite() { 1.0 } else { 0.0 }),
        Some(w) => Zip::from(&y).and(w).map_collect(|&yv, &wv| {
            if yv.is_finite() && wv.is_finite() { wv } else { 0.0 }
        }),
    };
    let y = y.mapv(|yv| if yv.is_finite() { yv } else { 0.0 });
    Ok((y, w))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Non-finite samples and unusable errors end up with zero weight.
    //
    // Given
    // -----
    // - `y = [NaN, 0, 1, 2, 3]`, `e = [NaN, NaN, -1, 0, 2]`.
    //
    // Expect
    // ------
    // - `y' = [0, 0, 1, 2, 3]`, `w' = [0, 0, 0, 0, 0.25]`; inputs unchanged.
    fn errors_are_sanitized() {
        // Arrange
        let y = array![f64::NAN, 0.0, 1.0, 2.0, 3.0];
        let e = array![f64::NAN, f64::NAN, -1.0, 0.0, 2.0];

        // Act
        let (y2, w2) = wnan_to_num(&y, &Weighting::errors(&e)).unwrap();

        // Assert
        assert_eq!(y2, array![0.0, 0.0, 1.0, 2.0, 3.0].into_dyn());
        assert_eq!(w2, array![0.0, 0.0, 0.0, 0.0, 0.25].into_dyn());
        assert!(y[0].is_nan());
    }

    #[test]
    // Purpose
    // -------
    // Explicit weights lose their non-finite entries; uniform weighting
    // becomes a finiteness mask.
    //
    // Given
    // -----
    // - `y = [1, inf, 3]`, `w = [NaN, 2, 0.5]`; uniform weighting.
    //
    // Expect
    // ------
    // - `w' = [0, 0, 0.5]`; uniform `w' = [1, 0, 1]`; `y' = [1, 0, 3]`.
    fn weights_and_uniform_are_sanitized() {
        // Arrange
        let y = array![1.0, f64::INFINITY, 3.0];
        let w = array![f64::NAN, 2.0, 0.5];

        // Act
        let (y2, w2) = wnan_to_num(&y, &Weighting::weights(&w)).unwrap();
        let (_, unit) = wnan_to_num(&y, &Weighting::Unit).unwrap();

        // Assert
        assert_eq!(y2, array![1.0, 0.0, 3.0].into_dyn());
        assert_eq!(w2, array![0.0, 0.0, 0.5].into_dyn());
        assert_eq!(unit, array![1.0, 0.0, 1.0].into_dyn());
    }
}
