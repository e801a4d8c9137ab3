//! reduction::moments — weighted moment sums over a reduction.
//!
//! Purpose
//! -------
//! Implement the reduction engine every estimator in this crate is built on:
//! for each requested order `k`, the weighted moment sum
//!
//! ```text
//! S_k = Σ_{collapsed axes} w · y^k
//! ```
//!
//! evaluated per cell of the preserved axes.
//!
//! Key behaviors
//! -------------
//! - [`wmom`] is the public entry point: it resolves the reduction and the
//!   weighting once, then evaluates each requested order, returning results
//!   with the same arity as the request.
//! - [`weighted_sum`] is the crate-internal kernel used by the dispersion
//!   estimators when they need individual moments of derived arrays
//!   (e.g. centered residuals).
//!
//! Invariants & assumptions
//! ------------------------
//! - Accumulation is always in `f64`.
//! - Order 0 with uniform weights is the per-cell sample count (every
//!   sample, NaN included, has `y^0 = 1`).
//! - Zero weights make a sample invisible only when its value is finite;
//!   `0 · NaN` is still NaN, which is why the NaN-tolerant adapters replace
//!   non-finite samples before delegating here.
//!
//! Testing notes
//! -------------
//! - Unit tests reproduce hand-computed sums for full, `Axes`, and `Keep`
//!   reductions, the keepdims shape, and the count/sum identities for
//!   uniform weights.
use crate::{
    errors::WStatResult,
    reduction::{
        axes::{Reduction, ResolvedReduction},
        request::{OneOrMany, validate_moments},
        weights::Weighting,
    },
};
use ndarray::{ArrayBase, ArrayD, ArrayViewD, Data, Dimension, Zip};

/// Weighted moments `Σ w·y^k` for one or several orders `k`.
///
/// Parameters
/// ----------
/// - `y`: `&ArrayBase<S, D>`
///   Sample values of any shape.
/// - `weighting`: `&Weighting`
///   Uniform, explicit weights, or 1-sigma errors; must broadcast to `y`.
/// - `moments`: `impl Into<OneOrMany<u32>>`
///   A single order (`2u32`) or an ordered list (`[0u32, 1, 2]`).
/// - `reduction`: `&Reduction`
///   Axes to collapse (or keep).
/// - `keepdims`: `bool`
///   If `true`, collapsed axes are retained with extent 1.
///
/// Returns
/// -------
/// `WStatResult<OneOrMany<ArrayD<f64>>>`
///   `One(S_k)` for a single order, `Many([S_k0, S_k1, …])` for a list, in
///   request order. A total reduction yields 0-dimensional arrays (or all-1
///   shapes with `keepdims`).
///
/// Errors
/// ------
/// - `WStatError::EmptyMomentRequest` / `WStatError::MomentOrderTooLarge`
///   for malformed order requests.
/// - `WStatError::AxisOutOfBounds` / `WStatError::DuplicateAxis`
///   for a malformed reduction.
/// - `WStatError::ShapeMismatch`
///   if weights/errors do not broadcast to `y`.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::Array;
/// # use wstat::reduction::{Reduction, Weighting, wmom};
/// let a = Array::range(0.0, 12.0, 1.0).into_shape_with_order((3, 4)).unwrap();
/// let sums = wmom(&a, &Weighting::weights(&a), [0u32, 1, 2], &Reduction::All, false)
///     .unwrap()
///     .into_vec();
/// assert_eq!(sums[0].sum(), 66.0);
/// assert_eq!(sums[1].sum(), 506.0);
/// assert_eq!(sums[2].sum(), 4356.0);
/// ```
pub fn wmom<S, D, M>(
    y: &ArrayBase<S, D>, weighting: &Weighting<'_>, moments: M, reduction: &Reduction,
    keepdims: bool,
) -> WStatResult<OneOrMany<ArrayD<f64>>>
where
    S: Data<Elem = f64>,
    D: Dimension,
    M: Into<OneOrMany<u32>>,
{
    let moments = moments.into();
    validate_moments(&moments)?;

    let y = y.view().into_dyn();
    let resolved = reduction.resolve(y.shape())?;
    let weights = weighting.resolve(y.shape())?;
    let weights = weights.as_ref().map(|w| w.view());

    moments.try_map(|order| {
        let sums = weighted_sum(&y, weights.as_ref(), order, &resolved);
        if keepdims { resolved.expand(sums) } else { Ok(sums) }
    })
}

/// Per-cell `Σ w·y^order` over the collapsed axes of `resolved`.
///
/// `weights`, when present, must already have `y`'s shape. `order` must fit
/// in an `i32` (guaranteed by [`validate_moments`] on public paths).
pub(crate) fn weighted_sum(
    y: &ArrayViewD<'_, f64>, weights: Option<&ArrayViewD<'_, f64>>, order: u32,
    resolved: &ResolvedReduction,
) -> ArrayD<f64> {
    let exp = order as i32;
    let terms = match weights {
        Some(w) => Zip::from(y).and(w).map_collect(|&yv, &wv| wv * yv.powi(exp)),
        None => y.mapv(|yv| yv.powi(exp)),
    };
    resolved.sum_reduced(terms)
}

/// The value of a single-element result (e.g. a total reduction).
///
/// Returns `None` when `values` holds zero or several elements.
pub fn as_scalar(values: &ArrayD<f64>) -> Option<f64> {
    if values.len() == 1 { values.iter().next().copied() } else { None }
}
