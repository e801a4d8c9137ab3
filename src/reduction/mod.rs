//! reduction — the weighted-moment engine behind every estimator.
//!
//! Purpose
//! -------
//! Collect the building blocks shared by all weighted statistics: the
//! reduction axes (which axes collapse), the weighting (how samples count),
//! one-or-many requests, input guards, and the moment engine [`wmom`].
//!
//! Key behaviors
//! -------------
//! - [`Reduction`] models the axis/keep duality as one explicit value and is
//!   resolved once per call into a [`ResolvedReduction`].
//! - [`Weighting`] turns explicit weights or 1-sigma errors into a weight
//!   array broadcast to the sample shape.
//! - [`wmom`] evaluates `Σ w·y^k` for one or many orders `k`, optionally
//!   keeping collapsed axes as singleton dimensions.
//!
//! Invariants & assumptions
//! ------------------------
//! - All computation is pure: inputs are borrowed immutably and every
//!   result is freshly allocated.
//! - Errors are reported via [`WStatResult`](crate::errors::WStatResult);
//!   zero-weight cells are not errors here and propagate as NaN/inf in
//!   derived ratios.
//!
//! Downstream usage
//! ----------------
//! - Typical Rust code imports the surface as:
//!
//!   ```rust
//!   use wstat::reduction::{Reduction, Weighting, wmom};
//!   ```
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests; cross-module behavior is exercised
//!   in `tests/`.

pub mod axes;
pub mod moments;
pub mod request;
pub mod validation;
pub mod weights;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::axes::{Reduction, ResolvedReduction};
pub use self::moments::{as_scalar, wmom};
pub use self::request::OneOrMany;
pub use self::weights::{Weighting, sigma_to_weight};

pub mod prelude {
    pub use super::axes::Reduction;
    pub use super::moments::{as_scalar, wmom};
    pub use super::request::OneOrMany;
    pub use super::weights::Weighting;
}
