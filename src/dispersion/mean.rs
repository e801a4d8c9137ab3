//! dispersion::mean — weighted mean and weighted RMS.
//!
//! Purpose
//! -------
//! Provide the location estimators built directly on the moment engine:
//! [`wmean`] (`S₁/S₀`) and [`wrms`] (`√(S₂/S₀)`), both per cell of a
//! [`Reduction`].
//!
//! Key behaviors
//! -------------
//! - A total reduction takes a fast path (plain mean, or a single fused
//!   weighted dot product) instead of the generic axis-by-axis sum.
//! - Cells with zero summed weight yield NaN (0/0) or ±inf; they are not
//!   errors.
//!
//! Testing notes
//! -------------
//! - Unit tests check self-weighted means of `arange(12).reshape(3, 4)` for
//!   total and per-axis reductions and the fast path against the generic
//!   path.
use crate::{
    errors::WStatResult,
    reduction::{Reduction, Weighting, moments::weighted_sum},
};
use ndarray::{ArrayBase, ArrayD, Data, Dimension, IxDyn, Zip};

/// Weighted mean `Σ w·y / Σ w` over a reduction.
///
/// Parameters
/// ----------
/// - `y`: `&ArrayBase<S, D>`
///   Sample values.
/// - `weighting`: `&Weighting`
///   Uniform, weights, or 1-sigma errors (broadcast to `y`).
/// - `reduction`: `&Reduction`
///   Axes to collapse.
///
/// Returns
/// -------
/// `WStatResult<ArrayD<f64>>`
///   One mean per cell; 0-dimensional for a total reduction.
///
/// Errors
/// ------
/// - Reduction or broadcast errors from the engine.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::Array;
/// # use wstat::dispersion::wmean;
/// # use wstat::reduction::{Reduction, Weighting, as_scalar};
/// let a = Array::range(0.0, 12.0, 1.0).into_shape_with_order((3, 4)).unwrap();
/// let m = wmean(&a, &Weighting::weights(&a), &Reduction::All).unwrap();
/// assert!((as_scalar(&m).unwrap() - 506.0 / 66.0).abs() < 1e-12);
/// ```
pub fn wmean<S, D>(
    y: &ArrayBase<S, D>, weighting: &Weighting<'_>, reduction: &Reduction,
) -> WStatResult<ArrayD<f64>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let y = y.view().into_dyn();
    let resolved = reduction.resolve(y.shape())?;
    let weights = weighting.resolve(y.shape())?;

    if resolved.is_total() {
        let mean = match &weights {
            None => y.sum() / y.len() as f64,
            Some(w) => {
                let (s0, s1) = Zip::from(&y)
                    .and(w)
                    .fold((0.0, 0.0), |(s0, s1), &yv, &wv| (s0 + wv, s1 + wv * yv));
                s1 / s0
            }
        };
        return Ok(ArrayD::from_elem(IxDyn(&[]), mean));
    }

    let weights = weights.as_ref().map(|w| w.view());
    let s1 = weighted_sum(&y, weights.as_ref(), 1, &resolved);
    match weights {
        None => Ok(s1 / resolved.lane_len() as f64),
        Some(w) => {
            let s0 = weighted_sum(&y, Some(&w), 0, &resolved);
            Ok(s1 / s0)
        }
    }
}

/// Weighted root mean square `√(Σ w·y² / Σ w)` over a reduction.
///
/// Returns one value per cell; see [`wmean`] for parameters and errors.
pub fn wrms<S, D>(
    y: &ArrayBase<S, D>, weighting: &Weighting<'_>, reduction: &Reduction,
) -> WStatResult<ArrayD<f64>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let y = y.view().into_dyn();
    let resolved = reduction.resolve(y.shape())?;
    let weights = weighting.resolve(y.shape())?;
    let weights = weights.as_ref().map(|w| w.view());

    let s0 = weighted_sum(&y, weights.as_ref(), 0, &resolved);
    let s2 = weighted_sum(&y, weights.as_ref(), 2, &resolved);
    Ok(Zip::from(&s2).and(&s0).map_collect(|&s2, &s0| (s2 / s0).sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reduction::as_scalar;
    use approx::assert_relative_eq;
    use ndarray::{Array, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Self-weighted means of `a = arange(12).reshape(3, 4)`, totally and per
    //   axis.
    // - Agreement of the total-reduction fast path with the generic path.
    // - The weighted RMS of a constant-magnitude sample.
    // -------------------------------------------------------------------------

    fn grid() -> ndarray::Array2<f64> {
        Array::range(0.0, 12.0, 1.0).into_shape_with_order((3, 4)).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Self-weighted mean over all axes is `Σa² / Σa`.
    //
    // Given
    // -----
    // - `a = arange(12).reshape(3, 4)`, `w = a`.
    //
    // Expect
    // ------
    // - `506 / 66 = 7.666…`.
    fn total_self_weighted_mean() {
        // Arrange
        let a = grid();

        // Act
        let m = wmean(&a, &Weighting::weights(&a), &Reduction::All).unwrap();

        // Assert
        assert_eq!(m.ndim(), 0);
        assert_relative_eq!(as_scalar(&m).unwrap(), 506.0 / 66.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Per-row self-weighted means.
    //
    // Given
    // -----
    // - `a = arange(12).reshape(3, 4)`, `w = a`, reducing axis 1.
    //
    // Expect
    // ------
    // - `[14/6, 126/22, 366/38]`.
    fn per_row_self_weighted_mean() {
        // Arrange
        let a = grid();

        // Act
        let m = wmean(&a, &Weighting::weights(&a), &Reduction::axis(1)).unwrap();

        // Assert
        let expected = [14.0 / 6.0, 126.0 / 22.0, 366.0 / 38.0];
        for (got, want) in m.iter().zip(expected) {
            assert_relative_eq!(*got, want, epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // Per-column means, and the total-reduction fast path agrees with the
    // generic path on the same samples laid out as a 12×1 column.
    //
    // Given
    // -----
    // - `a = arange(12).reshape(3, 4)`, uniform and self weights.
    //
    // Expect
    // ------
    // - Column means `[4, 5, 6, 7]`; total mean 5.5 both ways; equal
    //   self-weighted means both ways.
    fn uniform_means_match_across_paths() {
        // Arrange
        let a = grid();

        // Act
        let cols = wmean(&a, &Weighting::Unit, &Reduction::axis(0)).unwrap();
        let fast = wmean(&a, &Weighting::Unit, &Reduction::All).unwrap();
        let column = a.clone().into_shape_with_order((12, 1)).unwrap();
        let generic = wmean(&column, &Weighting::Unit, &Reduction::axis(0)).unwrap();
        let weighted_fast = wmean(&a, &Weighting::weights(&a), &Reduction::All).unwrap();
        let weighted_generic =
            wmean(&column, &Weighting::weights(&column), &Reduction::axis(0)).unwrap();

        // Assert
        assert_eq!(cols, array![4.0, 5.0, 6.0, 7.0].into_dyn());
        assert_relative_eq!(as_scalar(&fast).unwrap(), 5.5, epsilon = 1e-12);
        assert_eq!(generic.shape(), &[1]);
        assert_relative_eq!(as_scalar(&generic).unwrap(), 5.5, epsilon = 1e-12);
        assert_relative_eq!(
            as_scalar(&weighted_fast).unwrap(),
            as_scalar(&weighted_generic).unwrap(),
            epsilon = 1e-12
        );
    }

    #[test]
    // Purpose
    // -------
    // RMS of `±2` with error weights is 2 regardless of the weights.
    //
    // Given
    // -----
    // - `y = [2, -2, 2]`, `e = [1, 2, 4]`.
    //
    // Expect
    // ------
    // - `2`.
    fn wrms_of_constant_magnitude() {
        // Arrange
        let y = array![2.0, -2.0, 2.0];
        let e = array![1.0, 2.0, 4.0];

        // Act
        let r = wrms(&y, &Weighting::errors(&e), &Reduction::All).unwrap();

        // Assert
        assert_relative_eq!(as_scalar(&r).unwrap(), 2.0, epsilon = 1e-12);
    }
}
