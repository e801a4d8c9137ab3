//! dispersion — weighted location and scale estimators.
//!
//! Purpose
//! -------
//! Build the user-facing estimators on top of the reduction engine: the
//! weighted mean and RMS, the standard error of the weighted mean, two
//! weighted standard deviations, and the iterative RMS/jitter solver.
//!
//! Key behaviors
//! -------------
//! - [`wmean`] / [`wrms`]: `S₁/S₀` and `√(S₂/S₀)` per reduction cell.
//! - [`wsem`]: weighted mean plus its standard error, optionally rescaled by
//!   the reduced χ² of the residuals ([`SemOptions`]).
//! - [`wstd`]: error-weighted scatter with optional mean and mean error
//!   ([`WStdOutcome`]).
//! - [`wstd_moments`]: moment-based standard deviation treating `S₀` as the
//!   effective degrees of freedom ([`StdOptions`]).
//! - [`mlrms`]: fixed-point estimate of extra jitter for 1-D samples with
//!   errors ([`MLRmsOptions`], [`MLRmsOutcome`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Residuals are always centered on the weighted mean of their own cell.
//! - Zero-weight cells produce NaN/inf unless an options struct asks for
//!   strict mode, in which case they are `DegenerateReduction` errors.
//! - Variances are clipped at 0 before square roots; NaN propagates.
//!
//! Conventions
//! -----------
//! - Options structs validate in `new` and carry the conventional settings in
//!   `Default`; pass them by reference.
//! - Only [`mlrms`] may log, and only with the `obs_slog` feature and
//!   `verbose = true`.
//!
//! Downstream usage
//! ----------------
//! - `use wstat::dispersion::prelude::*;` brings the estimators and their
//!   options into scope.
//!
//! Testing notes
//! -------------
//! - Unit tests live beside each estimator; the NaN-tolerant adapters and
//!   the integration suite exercise them on sanitized inputs.

pub mod mean;
pub mod mlrms;
pub mod options;
pub mod sem;
pub mod stddev;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::mean::{wmean, wrms};
pub use self::mlrms::{MLRmsOutcome, Termination, mlrms};
pub use self::options::{JitterMode, MLRmsOptions, SemOptions, StdOptions};
pub use self::sem::wsem;
pub use self::stddev::{WStdOutcome, wstd, wstd_moments};

pub mod prelude {
    pub use super::mean::{wmean, wrms};
    pub use super::mlrms::{MLRmsOutcome, Termination, mlrms};
    pub use super::options::{JitterMode, MLRmsOptions, SemOptions, StdOptions};
    pub use super::sem::wsem;
    pub use super::stddev::{WStdOutcome, wstd, wstd_moments};
}
