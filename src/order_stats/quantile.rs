//! order_stats::quantile — discrete (sample-valued) weighted quantiles.
//!
//! Purpose
//! -------
//! Compute quantiles that are always members of the sample: the sample is
//! sorted and a single index is picked per probability, either from the
//! sample count (`i = ⌊p·n⌋`) or from the normalized cumulative weights
//! (first sorted index whose cumulative weight exceeds `p`). [`iqr`] builds
//! the interquartile range on top.
//!
//! Key behaviors
//! -------------
//! - Probabilities outside `[0, 1]` clip to the extreme samples.
//! - NaN samples sort after every number.
//! - A weighted sample whose total weight is not positive has no defined
//!   quantile; the result is NaN.
//! - At an exact cumulative-weight tie the upper sample is returned; with
//!   `middle = true` the two weighted samples around the tie are averaged
//!   instead (zero-weight samples never take part).
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are 1-D; weights, when given, have the same length as `x`.
//! - Weights are expected to be non-negative; negative weights make the
//!   cumulative distribution non-monotone and the pick is unspecified.
//!
//! Testing notes
//! -------------
//! - Unit tests check discreteness, the extremes, the tie rule and its
//!   `middle` variant, NaN ordering, zero total weight, and the errors.
use crate::{
    errors::{WStatError, WStatResult},
    reduction::{OneOrMany, validation::ensure_same_len},
};
use ndarray::{ArrayBase, ArrayView1, Data, Ix1};
use std::cmp::Ordering;

/// Interquartile range of a standard normal distribution.
pub const IQR_TO_SIGMA: f64 = 1.349;

/// Weighted, sample-valued quantile(s) of a 1-D sample.
///
/// Parameters
/// ----------
/// - `x`: `&ArrayBase<S, Ix1>`
///   Sample values.
/// - `p`: `impl Into<OneOrMany<f64>>`
///   One probability or a list.
/// - `w`: `Option<ArrayView1<f64>>`
///   Optional weights, one per sample.
/// - `middle`: `bool`
///   Average the two neighboring samples when `p` falls exactly on a step
///   of the cumulative distribution.
///
/// Returns
/// -------
/// `WStatResult<OneOrMany<f64>>`
///   One value per probability, mirroring the request.
///
/// Errors
/// ------
/// - `WStatError::EmptyInput` if `x` is empty.
/// - `WStatError::InvalidProbability` for a NaN probability.
/// - `WStatError::ShapeMismatch` if `w` and `x` differ in length.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::Array;
/// # use wstat::order_stats::quantile;
/// let x = Array::range(0.0, 10.0, 1.0);
/// let q = quantile(&x, [0.0, 0.5, 1.0], None, false).unwrap().into_vec();
/// assert_eq!(q, vec![0.0, 5.0, 9.0]);
/// ```
pub fn quantile<S, P>(
    x: &ArrayBase<S, Ix1>, p: P, w: Option<ArrayView1<'_, f64>>, middle: bool,
) -> WStatResult<OneOrMany<f64>>
where
    S: Data<Elem = f64>,
    P: Into<OneOrMany<f64>>,
{
    let n = x.len();
    if n == 0 {
        return Err(WStatError::EmptyInput);
    }
    if let Some(w) = &w {
        ensure_same_len(n, w.len())?;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| nan_last_cmp(x[a], x[b]));
    let sorted: Vec<f64> = order.iter().map(|&i| x[i]).collect();
    let cdf = w.map(|w| cumulative_weights(&order, &w));

    p.into().try_map(|p| {
        if p.is_nan() {
            return Err(WStatError::InvalidProbability { value: p });
        }
        Ok(match &cdf {
            None => pick_by_count(&sorted, p, middle),
            Some(cdf) => pick_by_weight(&sorted, cdf, p, middle),
        })
    })
}

/// Interquartile range `q(0.75) − q(0.25)`, optionally as a 1-sigma estimate.
///
/// With `sigma = true` the range is divided by [`IQR_TO_SIGMA`].
///
/// # Errors
/// As for [`quantile`].
pub fn iqr<S>(
    x: &ArrayBase<S, Ix1>, w: Option<ArrayView1<'_, f64>>, sigma: bool,
) -> WStatResult<f64>
where
    S: Data<Elem = f64>,
{
    let q = quantile(x, [0.25, 0.75], w, false)?;
    let q = q.as_slice();
    let range = q[1] - q[0];
    Ok(if sigma { range / IQR_TO_SIGMA } else { range })
}

// ---- Helper Methods ----

/// Ascending order with NaN (of either sign) after every number.
pub(crate) fn nan_last_cmp(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

fn cumulative_weights(order: &[usize], w: &ArrayView1<'_, f64>) -> Vec<f64> {
    let mut acc = 0.0;
    order
        .iter()
        .map(|&i| {
            acc += w[i];
            acc
        })
        .collect()
}

fn pick_by_count(sorted: &[f64], p: f64, middle: bool) -> f64 {
    let n = sorted.len();
    let pos = (p * n as f64).floor();
    let i = pos.clamp(0.0, (n - 1) as f64) as usize;
    if middle && pos == p * n as f64 && i > 0 && pos < n as f64 {
        return 0.5 * (sorted[i - 1] + sorted[i]);
    }
    sorted[i]
}

fn pick_by_weight(sorted: &[f64], cdf: &[f64], p: f64, middle: bool) -> f64 {
    let n = sorted.len();
    let total = cdf[n - 1];
    if !(total > 0.0) {
        return f64::NAN;
    }
    // Zero-weight samples sorted after the last positive weight are never picked.
    let last = cdf.partition_point(|&c| c < total);
    let i = cdf.partition_point(|&c| c / total <= p).min(last);
    if middle && i > 0 && cdf[i - 1] > 0.0 && cdf[i - 1] / total == p {
        // First index reaching the tied level: the last positive weight below `i`.
        let below = cdf.partition_point(|&c| c < cdf[i - 1]);
        return 0.5 * (sorted[below] + sorted[i]);
    }
    sorted[i]
}
