//! order_stats::mad — median and median absolute deviation over a reduction.
//!
//! - [`median`]: interpolating median of every reduction lane.
//! - [`mad`]: `median(|y − median(y)|)` per lane, each lane centered on its
//!   own median; with `sigma = true` scaled by [`MAD_TO_SIGMA`].
//!
//! A lane containing NaN has a NaN median; an empty lane has a NaN median.
use crate::{
    errors::WStatResult,
    order_stats::quantile::nan_last_cmp,
    reduction::Reduction,
};
use ndarray::{ArrayBase, ArrayD, Data, Dimension};

/// Ratio of a normal distribution's sigma to its median absolute deviation.
pub const MAD_TO_SIGMA: f64 = 1.4826;

/// Median of every lane collapsed by `reduction`.
///
/// Returns an array shaped like the kept axes (0-dimensional for
/// [`Reduction::All`]).
///
/// # Errors
/// Reduction errors (`AxisOutOfBounds`, `DuplicateAxis`).
pub fn median<S, D>(y: &ArrayBase<S, D>, reduction: &Reduction) -> WStatResult<ArrayD<f64>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    map_lanes(y, reduction, lane_median)
}

/// Median absolute deviation of every lane collapsed by `reduction`.
///
/// Parameters
/// ----------
/// - `y`: `&ArrayBase<S, D>`
///   Sample values.
/// - `reduction`: `&Reduction`
///   Axes to collapse.
/// - `sigma`: `bool`
///   Multiply by [`MAD_TO_SIGMA`] to obtain a 1-sigma estimate.
///
/// Returns
/// -------
/// `WStatResult<ArrayD<f64>>`
///   One value per cell of the kept axes.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use wstat::order_stats::mad;
/// # use wstat::reduction::{Reduction, as_scalar};
/// let y = array![1.0, 1.0, 2.0, 2.0, 4.0, 6.0, 9.0];
/// let m = mad(&y, &Reduction::All, false).unwrap();
/// assert_eq!(as_scalar(&m), Some(1.0));
/// ```
pub fn mad<S, D>(
    y: &ArrayBase<S, D>, reduction: &Reduction, sigma: bool,
) -> WStatResult<ArrayD<f64>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let scale = if sigma { MAD_TO_SIGMA } else { 1.0 };
    map_lanes(y, reduction, |lane| {
        let center = lane_median(lane);
        for v in lane.iter_mut() {
            *v = (*v - center).abs();
        }
        scale * lane_median(lane)
    })
}

// ---- Helper Methods ----

fn map_lanes<S, D, F>(
    y: &ArrayBase<S, D>, reduction: &Reduction, mut f: F,
) -> WStatResult<ArrayD<f64>>
where
    S: Data<Elem = f64>,
    D: Dimension,
    F: FnMut(&mut [f64]) -> f64,
{
    let y = y.view().into_dyn();
    let resolved = reduction.resolve(y.shape())?;
    let lanes = resolved.lanes(&y)?;
    let values: Vec<f64> = lanes
        .rows()
        .into_iter()
        .map(|row| {
            let mut lane = row.to_vec();
            f(&mut lane)
        })
        .collect();
    Ok(ArrayD::from_shape_vec(resolved.out_shape(), values)?)
}

/// Interpolating median; sorts `lane` in place.
fn lane_median(lane: &mut [f64]) -> f64 {
    let n = lane.len();
    if n == 0 || lane.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    lane.sort_by(|a, b| nan_last_cmp(*a, *b));
    if n % 2 == 1 { lane[n / 2] } else { 0.5 * (lane[n / 2 - 1] + lane[n / 2]) }
}
