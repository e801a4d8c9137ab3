//! nan::wrappers — NaN-tolerant variants of the weighted estimators.
//!
//! Each function sanitizes its input with
//! [`wnan_to_num`](super::wnan_to_num) and delegates unchanged:
//!
//! - [`nanwsem`] → [`wsem`]
//! - [`nanwstd`] → [`wstd_moments`]
//! - [`naniqr`] → [`iqr`] (always weighted, so NaN samples drop out)
//!
//! Sanitized samples keep their slot with zero weight. Element counts used
//! by the delegate (e.g. the rescaling `n` of `wsem`) therefore include them.
use crate::{
    dispersion::{SemOptions, StdOptions, wsem, wstd_moments},
    errors::WStatResult,
    nan::sanitize::wnan_to_num,
    order_stats::iqr,
    reduction::{Reduction, Weighting},
};
use ndarray::{ArrayBase, ArrayD, Data, Dimension, Ix1};

/// [`wsem`] on sanitized input.
///
/// # Errors
/// As for [`wnan_to_num`] and [`wsem`].
pub fn nanwsem<S, D>(
    y: &ArrayBase<S, D>, weighting: &Weighting<'_>, reduction: &Reduction, opts: &SemOptions,
) -> WStatResult<(ArrayD<f64>, ArrayD<f64>)>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let (y, w) = wnan_to_num(y, weighting)?;
    wsem(&y, &Weighting::weights(&w), reduction, opts)
}

/// [`wstd_moments`] on sanitized input.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use wstat::dispersion::StdOptions;
/// # use wstat::nan::nanwstd;
/// # use wstat::reduction::{Reduction, Weighting, as_scalar};
/// let y = array![f64::NAN, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
/// let e = array![f64::NAN, f64::NAN, -1.0, 0.0, 2.0, 2.0, 2.0];
/// let s = nanwstd(&y, &Weighting::errors(&e), &Reduction::All, &StdOptions::default()).unwrap();
/// assert!((as_scalar(&s).unwrap() - 1.1547005383792515).abs() < 1e-12);
/// ```
pub fn nanwstd<S, D>(
    y: &ArrayBase<S, D>, weighting: &Weighting<'_>, reduction: &Reduction, opts: &StdOptions,
) -> WStatResult<ArrayD<f64>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let (y, w) = wnan_to_num(y, weighting)?;
    wstd_moments(&y, &Weighting::weights(&w), reduction, opts)
}

/// [`iqr`] of a 1-D sample on sanitized input.
///
/// # Errors
/// As for [`wnan_to_num`] and [`iqr`].
pub fn naniqr<S>(x: &ArrayBase<S, Ix1>, weighting: &Weighting<'_>, sigma: bool) -> WStatResult<f64>
where
    S: Data<Elem = f64>,
{
    let (x, w) = wnan_to_num(x, weighting)?;
    let x = x.into_dimensionality::<Ix1>()?;
    let w = w.into_dimensionality::<Ix1>()?;
    iqr(&x, Some(w.view()), sigma)
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
    // - Reference values of the three adapters on NaN-laden input.
    // - Independence from the values hidden behind NaN/zero weights.
    // -------------------------------------------------------------------------

    fn sample() -> (ndarray::Array1<f64>, ndarray::Array1<f64>) {
        (
            array![f64::NAN, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
            array![f64::NAN, f64::NAN, -1.0, 0.0, 2.0, 2.0, 2.0],
        )
    }

    #[test]
    // Purpose
    // -------
    // NaN-tolerant std and IQR reproduce their reference values.
    //
    // Given
    // -----
    // - `y = [NaN, 0, 1, 2, 3, 4, 5]`, `e = [NaN, NaN, -1, 0, 2, 2, 2]`.
    //
    // Expect
    // ------
    // - `nanwstd = √(4/3) = 1.154701`; `naniqr(sigma) = 2/1.349 = 1.482580`.
    fn nanwstd_and_naniqr_reference_values() {
        // Arrange
        let (y, e) = sample();
        let weighting = Weighting::errors(&e);

        // Act
        let s = nanwstd(&y, &weighting, &Reduction::All, &StdOptions::default()).unwrap();
        let q = naniqr(&y, &weighting, true).unwrap();

        // Assert
        assert_relative_eq!(as_scalar(&s).unwrap(), 1.1547005383792515, epsilon = 1e-12);
        assert_relative_eq!(q, 1.4825796886582654, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Unweighted NaN-tolerant std matches the plain sample std of the finite
    // values when no NaN is present.
    //
    // Given
    // -----
    // - `arange(20).reshape(5, 4)`.
    //
    // Expect
    // ------
    // - `√35 = 5.916080`.
    fn nanwstd_without_nans_is_sample_std() {
        // Arrange
        let y = Array::range(0.0, 20.0, 1.0).into_shape_with_order((5, 4)).unwrap();

        // Act
        let s = nanwstd(&y, &Weighting::Unit, &Reduction::All, &StdOptions::default()).unwrap();

        // Assert
        assert_relative_eq!(as_scalar(&s).unwrap(), 5.916079783099616, epsilon = 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // `nanwsem` ignores NaN samples; the rescaling count still includes them.
    //
    // Given
    // -----
    // - `y = [NaN, 1, 2, 3, 4]`, uniform weights, ddof 1.
    //
    // Expect
    // ------
    // - mean 2.5; error `√((1/4)·5/(5−1)) = √0.3125`.
    fn nanwsem_ignores_nan_samples() {
        // Arrange
        let y = array![f64::NAN, 1.0, 2.0, 3.0, 4.0];

        // Act
        let (mean, err) =
            nanwsem(&y, &Weighting::Unit, &Reduction::All, &SemOptions::default()).unwrap();

        // Assert
        assert_relative_eq!(as_scalar(&mean).unwrap(), 2.5, epsilon = 1e-12);
        assert_relative_eq!(as_scalar(&err).unwrap(), 0.3125f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Values behind zero weights never influence the adapters.
    //
    // Given
    // -----
    // - The reference sample, and a copy with indices 0–3 replaced by
    //   arbitrary values.
    //
    // Expect
    // ------
    // - Identical `nanwstd`, `nanwsem`, and `naniqr` results.
    fn hidden_values_do_not_matter() {
        // Arrange
        let (y, e) = sample();
        let mut perturbed = y.clone();
        perturbed[0] = -1e6;
        perturbed[1] = 42.0;
        perturbed[2] = f64::INFINITY;
        perturbed[3] = 7.5;
        let weighting = Weighting::errors(&e);
        let std_opts = StdOptions::default();
        let sem_opts = SemOptions::default();

        // Act
        let s0 = nanwstd(&y, &weighting, &Reduction::All, &std_opts).unwrap();
        let s1 = nanwstd(&perturbed, &weighting, &Reduction::All, &std_opts).unwrap();
        let m0 = nanwsem(&y, &weighting, &Reduction::All, &sem_opts).unwrap();
        let m1 = nanwsem(&perturbed, &weighting, &Reduction::All, &sem_opts).unwrap();
        let q0 = naniqr(&y, &weighting, false).unwrap();
        let q1 = naniqr(&perturbed, &weighting, false).unwrap();

        // Assert
        assert_eq!(s0, s1);
        assert_eq!(m0, m1);
        assert_eq!(q0, q1);
    }
}
