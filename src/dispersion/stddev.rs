//! dispersion::stddev — weighted standard deviations.
//!
//! Purpose
//! -------
//! Two weighted standard-deviation estimators over a [`Reduction`]:
//!
//! - [`wstd`]: the error-weighted scatter `√(Σw(y − ȳ)² / Σw)` with
//!   `w = 1/e²`, optionally together with the weighted mean and the error of
//!   that mean `√(n_valid / Σw)`.
//! - [`wstd_moments`]: a moment-based variant that treats the summed weight
//!   `S₀` as the effective number of degrees of freedom, applying a
//!   `S₀/(S₀ − ddof)` correction when `S₀ > 1` and falling back to the
//!   formal `1/S₀` variance otherwise.
//!
//! Invariants & assumptions
//! ------------------------
//! - Samples with non-positive (or NaN) errors get weight 0.
//! - The `S₀ > 1` decision is taken per cell.
//! - Negative variances are clipped to 0 before the square root.
//!
//! Testing notes
//! -------------
//! - Unit tests check equal-error scatter against the population standard
//!   deviation, `n_valid` counting, the `arange(20)` reference value, the
//!   low-weight fallback, and keepdims/strict handling.
use crate::{
    dispersion::{
        options::StdOptions,
        sem::{clipped_sqrt, clipped_sqrt_ratio},
    },
    errors::{WStatError, WStatResult},
    reduction::{Reduction, Weighting, moments::weighted_sum, validation::ensure_positive_weight},
};
use ndarray::{ArrayBase, ArrayD, Data, Dimension, IxDyn, Zip};

/// WStdOutcome — result of [`wstd`].
///
/// - `std`: weighted standard deviation per cell.
/// - `mean`: weighted mean per cell.
/// - `mean_err`: `√(n_valid / Σw)` per cell, where `n_valid` counts the
///   samples with a positive error; `None` unless requested.
#[derive(Debug, Clone, PartialEq)]
pub struct WStdOutcome {
    pub std: ArrayD<f64>,
    pub mean: ArrayD<f64>,
    pub mean_err: Option<ArrayD<f64>>,
}

/// Error-weighted standard deviation.
///
/// Parameters
/// ----------
/// - `y`: `&ArrayBase<S, D>`
///   Sample values.
/// - `e`: `&ArrayBase<S2, D2>`
///   1-sigma errors, broadcast to `y`; weights are `1/e²`, and samples with
///   `e ≤ 0` are excluded.
/// - `reduction`: `&Reduction`
///   Axes to collapse.
/// - `with_mean_err`: `bool`
///   Also compute the error of the mean.
///
/// Returns
/// -------
/// `WStatResult<WStdOutcome>`
///
/// Errors
/// ------
/// - Reduction or broadcast errors from the engine.
///
/// Notes
/// -----
/// - A cell without any positive error yields NaN for all three values.
pub fn wstd<S, D, S2, D2>(
    y: &ArrayBase<S, D>, e: &ArrayBase<S2, D2>, reduction: &Reduction, with_mean_err: bool,
) -> WStatResult<WStdOutcome>
where
    S: Data<Elem = f64>,
    D: Dimension,
    S2: Data<Elem = f64>,
    D2: Dimension,
{
    let y = y.view().into_dyn();
    let resolved = reduction.resolve(y.shape())?;
    let weighting = Weighting::errors(e);
    let weights = weighting.resolve(y.shape())?;
    let weights = weights.as_ref().map(|w| w.view());

    let s0 = weighted_sum(&y, weights.as_ref(), 0, &resolved);
    let s1 = weighted_sum(&y, weights.as_ref(), 1, &resolved);
    let mean = &s1 / &s0;
    let centered = &y - &resolved.expand(mean.clone())?;
    let s2 = weighted_sum(&centered.view(), weights.as_ref(), 2, &resolved);
    let std = clipped_sqrt_ratio(&s2, &s0);

    let mean_err = if with_mean_err {
        let e = e.view().into_dyn();
        let valid = e
            .broadcast(IxDyn(y.shape()))
            .map(|e| e.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 }))
            .ok_or_else(|| WStatError::ShapeMismatch {
                expected: y.shape().to_vec(),
                found: e.shape().to_vec(),
            })?;
        let n_valid = resolved.sum_reduced(valid);
        Some(clipped_sqrt_ratio(&n_valid, &s0))
    } else {
        None
    };

    Ok(WStdOutcome { std, mean, mean_err })
}

/// Moment-based weighted standard deviation.
///
/// Parameters
/// ----------
/// - `y`: `&ArrayBase<S, D>`
///   Sample values.
/// - `weighting`: `&Weighting`
///   Uniform, weights, or 1-sigma errors (broadcast to `y`).
/// - `reduction`: `&Reduction`
///   Axes to collapse.
/// - `opts`: `&StdOptions`
///   ddof, keepdims, strictness.
///
/// Returns
/// -------
/// `WStatResult<ArrayD<f64>>`
///   Per cell: `√((1/S₀) · S₂ · S₀/(S₀ − ddof))` if `S₀ > 1`, else `√(1/S₀)`,
///   where `S₂` is the weighted sum of squared residuals about the weighted
///   mean.
///
/// Errors
/// ------
/// - Reduction or broadcast errors from the engine.
/// - `WStatError::DegenerateReduction` in strict mode.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::Array;
/// # use wstat::dispersion::{StdOptions, wstd_moments};
/// # use wstat::reduction::{Reduction, Weighting, as_scalar};
/// let y = Array::range(0.0, 20.0, 1.0);
/// let s = wstd_moments(&y, &Weighting::Unit, &Reduction::All, &StdOptions::default()).unwrap();
/// assert!((as_scalar(&s).unwrap() - 35f64.sqrt()).abs() < 1e-12);
/// ```
pub fn wstd_moments<S, D>(
    y: &ArrayBase<S, D>, weighting: &Weighting<'_>, reduction: &Reduction, opts: &StdOptions,
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
    if opts.strict {
        ensure_positive_weight(&s0.view())?;
    }
    let s1 = weighted_sum(&y, weights.as_ref(), 1, &resolved);
    let mean = &s1 / &s0;
    let centered = &y - &resolved.expand(mean)?;
    let s2 = weighted_sum(&centered.view(), weights.as_ref(), 2, &resolved);

    let ddof = opts.ddof;
    let std = Zip::from(&s0).and(&s2).map_collect(|&dof, &chi2| {
        let var_mean = 1.0 / dof;
        let var = if dof > 1.0 { var_mean * chi2 * dof / (dof - ddof) } else { var_mean };
        clipped_sqrt(var)
    });

    if opts.keepdims { resolved.expand(std) } else { Ok(std) }
}
