//! dispersion::sem — weighted mean with its standard error.
//!
//! Purpose
//! -------
//! Estimate the weighted mean of each reduction cell together with the
//! standard error of that mean. The formal variance of the mean is `1/S₀`;
//! by default it is rescaled by the reduced χ² of the residuals so that the
//! error reflects the observed scatter rather than the stated weights only.
//!
//! Key behaviors
//! -------------
//! - Rescaling applies per cell when `n > 1` and `n > ddof`, where `n` is the
//!   number of input elements collapsing into the cell:
//!   `var_mean ← (1/S₀) · Σw(y − ȳ)² / (n − ddof)`.
//! - Residuals are centered on each cell's own mean (the mean is broadcast
//!   back over the collapsed axes).
//! - The variance is clipped at 0 before the square root; NaN propagates.
//!
//! Invariants & assumptions
//! ------------------------
//! - With `strict = false`, cells whose summed weight is 0 yield NaN/inf.
//!   With `strict = true` they fail with `DegenerateReduction`.
//!
//! Testing notes
//! -------------
//! - Unit tests reproduce the reference values for `arange(20).reshape(5, 4)`
//!   (total and per column), the single-sample error pass-through, the
//!   unrescaled formal error, keepdims shapes, and strict mode.
use crate::{
    dispersion::options::SemOptions,
    errors::WStatResult,
    reduction::{Reduction, Weighting, moments::weighted_sum, validation::ensure_positive_weight},
};
use ndarray::{ArrayBase, ArrayD, Data, Dimension, Zip};

/// Weighted mean and its standard error over a reduction.
///
/// Parameters
/// ----------
/// - `y`: `&ArrayBase<S, D>`
///   Sample values.
/// - `weighting`: `&Weighting`
///   Uniform, weights, or 1-sigma errors (broadcast to `y`).
/// - `reduction`: `&Reduction`
///   Axes to collapse.
/// - `opts`: `&SemOptions`
///   Rescaling, ddof, keepdims, and strictness.
///
/// Returns
/// -------
/// `WStatResult<(ArrayD<f64>, ArrayD<f64>)>`
///   `(mean, standard_error)`, both shaped like the reduced result (with
///   singleton collapsed axes if `opts.keepdims`).
///
/// Errors
/// ------
/// - Reduction or broadcast errors from the engine.
/// - `WStatError::DegenerateReduction`
///   In strict mode, if a cell's summed weight is not positive.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::Array;
/// # use wstat::dispersion::{SemOptions, wsem};
/// # use wstat::reduction::{Reduction, Weighting, as_scalar};
/// let y = Array::range(0.0, 20.0, 1.0).into_shape_with_order((5, 4)).unwrap();
/// let opts = SemOptions::new(true, 0.0, false, false).unwrap();
/// let (mean, err) = wsem(&y, &Weighting::Unit, &Reduction::All, &opts).unwrap();
/// assert_eq!(as_scalar(&mean), Some(9.5));
/// assert!((as_scalar(&err).unwrap() - 1.289380).abs() < 1e-6);
/// ```
pub fn wsem<S, D>(
    y: &ArrayBase<S, D>, weighting: &Weighting<'_>, reduction: &Reduction, opts: &SemOptions,
) -> WStatResult<(ArrayD<f64>, ArrayD<f64>)>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let y = y.view().into_dyn();
    let resolved = reduction.resolve(y.shape())?;
    let weights = weighting.resolve(y.shape())?;
    let weights = weights.as_ref().map(|w| w.view());

    let s0 = weighted_sum(&y, weights.as_ref(), 0, &resolved);
    if opts.strict {
        ensure_positive_weight(&s0.view())?;
    }
    let s1 = weighted_sum(&y, weights.as_ref(), 1, &resolved);
    let mean = &s1 / &s0;
    let mut var_mean = s0.mapv(|s| 1.0 / s);

    let n = resolved.lane_len() as f64;
    if opts.rescale && n > 1.0 && n > opts.ddof {
        let centered = &y - &resolved.expand(mean.clone())?;
        let s2 = weighted_sum(&centered.view(), weights.as_ref(), 2, &resolved);
        let dof = n - opts.ddof;
        var_mean.zip_mut_with(&s2, |v, &chi2| *v *= chi2 / dof);
    }

    let err = var_mean.mapv(clipped_sqrt);
    if opts.keepdims {
        Ok((resolved.expand(mean)?, resolved.expand(err)?))
    } else {
        Ok((mean, err))
    }
}

/// `√max(v, 0)` that keeps NaN as NaN.
#[inline]
pub(crate) fn clipped_sqrt(v: f64) -> f64 {
    if v < 0.0 { 0.0 } else { v.sqrt() }
}

/// Element-wise [`clipped_sqrt`] of `num / den`.
pub(crate) fn clipped_sqrt_ratio(num: &ArrayD<f64>, den: &ArrayD<f64>) -> ArrayD<f64> {
    Zip::from(num).and(den).map_collect(|&n, &d| clipped_sqrt(n / d))
}
