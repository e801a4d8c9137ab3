//! order_stats — sample-valued quantiles, IQR, median, and MAD.
//!
//! Purpose
//! -------
//! Order-statistic estimators of location and scale that are robust to
//! outliers, with optional conversion to a 1-sigma-equivalent scale for
//! normally distributed data.
//!
//! Key behaviors
//! -------------
//! - [`quantile`] returns actual sample members (no interpolation), with
//!   optional weights; [`iqr`] is the 25–75 % range.
//! - [`median`] / [`mad`] work over any [`Reduction`](crate::reduction::Reduction)
//!   and interpolate between the two middle samples of even lanes.
//! - [`IQR_TO_SIGMA`] and [`MAD_TO_SIGMA`] convert to 1-sigma estimates.
//!
//! Invariants & assumptions
//! ------------------------
//! - NaN samples sort after every number; a NaN inside a median lane makes
//!   that median NaN.
//!
//! Downstream usage
//! ----------------
//! - `use wstat::order_stats::prelude::*;`
//!
//! Testing notes
//! -------------
//! - Sigma scaling is checked against stratified standard-normal grids built
//!   with `statrs`.

pub mod mad;
pub mod quantile;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::mad::{MAD_TO_SIGMA, mad, median};
pub use self::quantile::{IQR_TO_SIGMA, iqr, quantile};

pub mod prelude {
    pub use super::mad::{MAD_TO_SIGMA, mad, median};
    pub use super::quantile::{IQR_TO_SIGMA, iqr, quantile};
}
