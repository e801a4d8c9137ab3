//! reduction::axes — which axes a reduction collapses and which it keeps.
//!
//! Purpose
//! -------
//! Represent the "axis vs dim" duality of weighted reductions as one explicit
//! value, [`Reduction`], and resolve it exactly once per call into a concrete
//! [`ResolvedReduction`] that every downstream routine consumes. No routine
//! re-derives the complement of an axis set on its own.
//!
//! Key behaviors
//! -------------
//! - [`Reduction::resolve`] normalizes negative indices, rejects out-of-range
//!   and repeated axes, and computes the sorted keep/reduce partition.
//! - [`ResolvedReduction`] provides the shape bookkeeping used by the engine:
//!   output shape, keepdims shape, cell and lane counts, summation over the
//!   reduced axes, re-insertion of singleton axes, and lane extraction for
//!   order statistics.
//!
//! Invariants & assumptions
//! ------------------------
//! - `keep` and `reduce` are disjoint, sorted ascending, and together cover
//!   `0..ndim`.
//! - Kept axes appear in ascending order in every result; a `Keep` list given
//!   out of order does not transpose the output.
//! - `Reduction::Keep(vec![])` is the same as `Reduction::All`.
//!
//! Conventions
//! -----------
//! - Shapes are row-major; "cell" means one element of the reduced output,
//!   "lane" means the set of input elements that collapse into one cell.
//!
//! Testing notes
//! -------------
//! - Unit tests cover index normalization, both error branches, the
//!   keep/reduce partition for `Axes` and `Keep`, and the shape helpers.
use crate::errors::{WStatError, WStatResult};
use ndarray::{Array2, ArrayD, ArrayViewD, Axis};

/// Reduction — the axes a weighted reduction collapses.
///
/// Variants
/// --------
/// - `All`
///   Collapse every axis; the result is 0-dimensional.
/// - `Axes(axes)`
///   Collapse the listed axes and keep the rest.
/// - `Keep(dims)`
///   Keep the listed axes and collapse the rest (the complement of `Axes`).
///
/// Notes
/// -----
/// - Indices may be negative and then count from the last axis, so `-1`
///   is the trailing axis.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Reduction {
    #[default]
    All,
    Axes(Vec<isize>),
    Keep(Vec<isize>),
}

impl Reduction {
    /// Collapse a single axis.
    pub fn axis(axis: isize) -> Self {
        Reduction::Axes(vec![axis])
    }

    /// Keep a single axis.
    pub fn keep(dim: isize) -> Self {
        Reduction::Keep(vec![dim])
    }

    /// Resolve this reduction against a concrete array shape.
    ///
    /// Parameters
    /// ----------
    /// - `shape`: `&[usize]`
    ///   Shape of the sample array the reduction will run over.
    ///
    /// Returns
    /// -------
    /// `WStatResult<ResolvedReduction>`
    ///   The sorted keep/reduce partition together with a copy of `shape`.
    ///
    /// Errors
    /// ------
    /// - `WStatError::AxisOutOfBounds`
    ///   An index falls outside `-ndim..ndim`.
    /// - `WStatError::DuplicateAxis`
    ///   Two indices name the same axis after normalization.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use wstat::reduction::Reduction;
    /// let r = Reduction::Axes(vec![-1]).resolve(&[2, 5, 3]).unwrap();
    /// assert_eq!(r.keep(), &[0, 1]);
    /// assert_eq!(r.reduce(), &[2]);
    /// assert_eq!(r.out_shape(), vec![2, 5]);
    /// ```
    pub fn resolve(&self, shape: &[usize]) -> WStatResult<ResolvedReduction> {
        let ndim = shape.len();
        let (keep, reduce) = match self {
            Reduction::All => (Vec::new(), (0..ndim).collect()),
            Reduction::Axes(axes) => {
                let reduce = normalize_axes(axes, ndim)?;
                (complement(&reduce, ndim), reduce)
            }
            Reduction::Keep(dims) => {
                let keep = normalize_axes(dims, ndim)?;
                let reduce = complement(&keep, ndim);
                (keep, reduce)
            }
        };
        Ok(ResolvedReduction { shape: shape.to_vec(), keep, reduce })
    }
}

/// ResolvedReduction — a [`Reduction`] bound to a concrete shape.
///
/// Fields
/// ------
/// - `shape`: the sample shape the partition was computed for.
/// - `keep`: preserved axes, ascending.
/// - `reduce`: collapsed axes, ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReduction {
    shape: Vec<usize>,
    keep: Vec<usize>,
    reduce: Vec<usize>,
}

impl ResolvedReduction {
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn keep(&self) -> &[usize] {
        &self.keep
    }

    pub fn reduce(&self) -> &[usize] {
        &self.reduce
    }

    /// `true` when every axis is collapsed (scalar result).
    pub fn is_total(&self) -> bool {
        self.keep.is_empty()
    }

    /// Shape of the reduced result with collapsed axes dropped.
    pub fn out_shape(&self) -> Vec<usize> {
        self.keep.iter().map(|&ax| self.shape[ax]).collect()
    }

    /// Shape of the reduced result with collapsed axes kept at extent 1.
    pub fn keepdims_shape(&self) -> Vec<usize> {
        self.shape
            .iter()
            .enumerate()
            .map(|(ax, &n)| if self.keep.contains(&ax) { n } else { 1 })
            .collect()
    }

    /// Number of cells in the reduced result.
    pub fn cell_count(&self) -> usize {
        self.keep.iter().map(|&ax| self.shape[ax]).product()
    }

    /// Number of input elements collapsing into each cell.
    pub fn lane_len(&self) -> usize {
        self.reduce.iter().map(|&ax| self.shape[ax]).product()
    }

    /// Sum `values` (shaped like the sample) over the collapsed axes.
    ///
    /// Axes are summed from the last to the first so that the remaining
    /// indices stay valid; the result has [`out_shape`](Self::out_shape).
    pub fn sum_reduced(&self, values: ArrayD<f64>) -> ArrayD<f64> {
        let mut acc = values;
        for &ax in self.reduce.iter().rev() {
            acc = acc.sum_axis(Axis(ax));
        }
        acc
    }

    /// Reshape an `out_shape` array to the keepdims shape.
    ///
    /// Errors
    /// ------
    /// - `WStatError::Backend`
    ///   `reduced` does not hold exactly [`cell_count`](Self::cell_count)
    ///   elements.
    pub fn expand(&self, reduced: ArrayD<f64>) -> WStatResult<ArrayD<f64>> {
        let reduced = reduced.as_standard_layout().into_owned();
        Ok(reduced.into_shape_with_order(self.keepdims_shape())?)
    }

    /// Reshape a keepdims array back to `out_shape`.
    ///
    /// Only the collapsed axes are removed; kept axes of extent 1 survive.
    pub fn squeeze(&self, kept: ArrayD<f64>) -> WStatResult<ArrayD<f64>> {
        let kept = kept.as_standard_layout().into_owned();
        Ok(kept.into_shape_with_order(self.out_shape())?)
    }

    /// Gather each lane of `values` into one row of a `cells × lane_len`
    /// matrix, with rows in row-major order of the kept axes.
    ///
    /// Errors
    /// ------
    /// - `WStatError::ShapeMismatch`
    ///   `values` does not have the shape this reduction was resolved for.
    pub fn lanes(&self, values: &ArrayViewD<'_, f64>) -> WStatResult<Array2<f64>> {
        if values.shape() != self.shape.as_slice() {
            return Err(WStatError::ShapeMismatch {
                expected: self.shape.clone(),
                found: values.shape().to_vec(),
            });
        }
        let mut order = self.keep.clone();
        order.extend_from_slice(&self.reduce);
        let permuted = values.view().permuted_axes(order);
        let data: Vec<f64> = permuted.iter().copied().collect();
        Ok(Array2::from_shape_vec((self.cell_count(), self.lane_len()), data)?)
    }
}

// ---- Helper methods ----

fn normalize_axes(axes: &[isize], ndim: usize) -> WStatResult<Vec<usize>> {
    let mut out: Vec<usize> = Vec::with_capacity(axes.len());
    for &axis in axes {
        let resolved = if axis < 0 { axis + ndim as isize } else { axis };
        if resolved < 0 || resolved >= ndim as isize {
            return Err(WStatError::AxisOutOfBounds { axis, ndim });
        }
        let resolved = resolved as usize;
        if out.contains(&resolved) {
            return Err(WStatError::DuplicateAxis { axis: resolved });
        }
        out.push(resolved);
    }
    out.sort_unstable();
    Ok(out)
}

fn complement(axes: &[usize], ndim: usize) -> Vec<usize> {
    (0..ndim).filter(|ax| !axes.contains(ax)).collect()
}
