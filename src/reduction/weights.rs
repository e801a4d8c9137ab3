//! reduction::weights — per-sample weights from weights, errors, or nothing.
//!
//! Purpose
//! -------
//! Describe how each sample is weighted before a reduction: uniformly, by an
//! explicit weight array, or by inverse-variance weights derived from 1-sigma
//! error estimates. [`Weighting::resolve`] turns the description into a
//! weight array shaped like the samples.
//!
//! Invariants & assumptions
//! ------------------------
//! - Error-derived weights are `1/e²` for `e > 0` and exactly `0` otherwise
//!   (including NaN errors), so a non-positive error never divides.
//! - Weight and error arrays must broadcast to the sample shape.
//! - Uniform weighting never materializes a weight array.
use crate::errors::{WStatError, WStatResult};
use ndarray::{ArrayBase, ArrayViewD, CowArray, Data, Dimension, IxDyn};

/// Weighting — how samples are weighted in a reduction.
///
/// Variants
/// --------
/// - `Unit`: every sample has weight 1.
/// - `Weights(w)`: explicit non-negative weights; 0 excludes a sample.
/// - `Errors(e)`: 1-sigma errors, converted with [`sigma_to_weight`].
#[derive(Debug, Clone, Default)]
pub enum Weighting<'a> {
    #[default]
    Unit,
    Weights(ArrayViewD<'a, f64>),
    Errors(ArrayViewD<'a, f64>),
}

impl<'a> Weighting<'a> {
    /// Weight by an explicit weight array of any dimensionality.
    pub fn weights<S, D>(w: &'a ArrayBase<S, D>) -> Self
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        Weighting::Weights(w.view().into_dyn())
    }

    /// Weight by inverse variance derived from 1-sigma errors.
    pub fn errors<S, D>(e: &'a ArrayBase<S, D>) -> Self
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        Weighting::Errors(e.view().into_dyn())
    }

    /// Weights shaped like the samples, or `None` for uniform weighting.
    ///
    /// Explicit weights of the same shape are borrowed; everything else is
    /// broadcast and, for errors, converted into a fresh array.
    ///
    /// Errors
    /// ------
    /// - `WStatError::ShapeMismatch`
    ///   The weight/error array cannot be broadcast to `shape`.
    pub fn resolve(&self, shape: &[usize]) -> WStatResult<Option<CowArray<'_, f64, IxDyn>>> {
        match self {
            Weighting::Unit => Ok(None),
            Weighting::Weights(w) => {
                let view = broadcast_to(w, shape)?;
                Ok(Some(CowArray::from(view)))
            }
            Weighting::Errors(e) => {
                let view = broadcast_to(e, shape)?;
                Ok(Some(CowArray::from(view.mapv(sigma_to_weight))))
            }
        }
    }
}

/// Inverse-variance weight of a 1-sigma error: `1/e²` if `e > 0`, else `0`.
#[inline]
pub fn sigma_to_weight(e: f64) -> f64 {
    if e > 0.0 { 1.0 / (e * e) } else { 0.0 }
}

fn broadcast_to<'b>(
    values: &'b ArrayViewD<'_, f64>, shape: &[usize],
) -> WStatResult<ArrayViewD<'b, f64>> {
    values.broadcast(IxDyn(shape)).ok_or_else(|| WStatError::ShapeMismatch {
        expected: shape.to_vec(),
        found: values.shape().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Error conversion never divides by a non-positive or NaN error.
    //
    // Given
    // -----
    // - Errors `[NaN, -1, 0, 2]`.
    //
    // Expect
    // ------
    // - Weights `[0, 0, 0, 0.25]`.
    fn sigma_to_weight_zeroes_unusable_errors() {
        // Arrange
        let e = array![f64::NAN, -1.0, 0.0, 2.0];

        // Act
        let w = e.mapv(sigma_to_weight);

        // Assert
        assert_eq!(w, array![0.0, 0.0, 0.0, 0.25]);
    }

    #[test]
    // Purpose
    // -------
    // Unit weighting resolves to `None`; explicit weights broadcast.
    //
    // Given
    // -----
    // - A length-3 weight row broadcast against a 2×3 sample shape.
    //
    // Expect
    // ------
    // - A 2×3 array repeating the row.
    fn resolve_broadcasts_weights() {
        // Arrange
        let w = array![1.0, 2.0, 3.0];
        let weighting = Weighting::weights(&w);
        let uniform = Weighting::Unit;

        // Act
        let unit = uniform.resolve(&[2, 3]).unwrap();
        let resolved = weighting.resolve(&[2, 3]).unwrap().unwrap();

        // Assert
        assert!(unit.is_none());
        assert_eq!(resolved.shape(), &[2, 3]);
        assert_eq!(resolved.sum(), 12.0);
    }

    #[test]
    // Purpose
    // -------
    // Non-broadcastable weights are reported as a shape mismatch.
    //
    // Given
    // -----
    // - Length-4 errors against a 2×3 sample shape.
    //
    // Expect
    // ------
    // - `ShapeMismatch { expected: [2, 3], found: [4] }`.
    fn resolve_rejects_incompatible_shapes() {
        // Arrange
        let e = array![1.0, 1.0, 1.0, 1.0];

        // Act
        let err = Weighting::errors(&e).resolve(&[2, 3]).unwrap_err();

        // Assert
        assert_eq!(err, WStatError::ShapeMismatch { expected: vec![2, 3], found: vec![4] });
    }
}
