//! errors — shared error type and Python bridge for weighted statistics.
//!
//! Purpose
//! -------
//! Provide the single error enum and result alias used by every routine in
//! this crate, together with a conversion layer to Python exceptions for
//! PyO3-based bindings. Reductions, dispersion estimators, order statistics,
//! and the NaN-tolerant adapters all report failures through [`WStatError`].
//!
//! Key behaviors
//! -------------
//! - Define [`WStatResult`] and [`WStatError`] as the canonical result and
//!   error types for the crate.
//! - Attach human-readable `Display` messages to each variant so that
//!   diagnostics are meaningful without additional context.
//! - Map internal `ndarray::ShapeError`s into [`WStatError::Backend`].
//! - Implement `From<WStatError> for PyErr` (behind `python-bindings`) so
//!   Python callers see a `ValueError` carrying the Rust message.
//!
//! Invariants & assumptions
//! ------------------------
//! - Invalid *arguments* (axes, shapes, options, probabilities) are always
//!   reported as errors; routines never panic on user-facing input.
//! - Degenerate reductions (a cell with zero total weight) are NOT errors by
//!   default: they propagate as `NaN`/`inf` in the numeric result. Only the
//!   strict mode of the options types turns them into
//!   [`WStatError::DegenerateReduction`].
//! - Non-convergence of the maximum-likelihood jitter solver is reported in
//!   its outcome; [`WStatError::NonConvergence`] is only produced when the
//!   caller asks for convergence to be enforced.
//!
//! Conventions
//! -----------
//! - Axis indices in messages are the caller-facing values (possibly
//!   negative) when they come straight from a [`Reduction`]; element indices
//!   are 0-based positions in row-major (logical) order.
//! - Messages are phrased in terms of domain constraints ("ddof must be
//!   non-negative") rather than low-level details.
//!
//! Testing notes
//! -------------
//! - Unit tests verify that `Display` messages embed their payloads and that
//!   `ShapeError` conversion lands in the backend variant.
//!
//! [`Reduction`]: crate::reduction::Reduction

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Crate-wide result alias for weighted-statistics operations.
pub type WStatResult<T> = Result<T, WStatError>;

/// WStatError — error conditions for weighted statistics.
///
/// Variants
/// --------
/// - Reduction axes: `AxisOutOfBounds`, `DuplicateAxis`.
/// - Shapes and requests: `ShapeMismatch`, `EmptyMomentRequest`,
///   `MomentOrderTooLarge`, `EmptyInput`.
/// - Data: `NonFiniteData`, `InvalidSigma`, `InvalidProbability`.
/// - Options: `InvalidDdof`, `InvalidStartJitter`, `InvalidTolerance`,
///   `InvalidMaxIter`.
/// - Strict modes: `DegenerateReduction`, `NonConvergence`.
/// - Backend passthrough: `Backend`.
///
/// Notes
/// -----
/// - This enum implements [`std::error::Error`] and [`std::fmt::Display`]
///   so it composes with `?`-based propagation.
#[derive(Debug, Clone, PartialEq)]
pub enum WStatError {
    // ---- Reduction axes ----
    /// Axis index is outside `-ndim..ndim`.
    AxisOutOfBounds { axis: isize, ndim: usize },

    /// The same axis was named twice (after resolving negative indices).
    DuplicateAxis { axis: usize },

    // ---- Shapes and requests ----
    /// Weight/error array cannot be broadcast to the sample shape.
    ShapeMismatch { expected: Vec<usize>, found: Vec<usize> },

    /// A moment request listed no orders.
    EmptyMomentRequest,

    /// Moment order cannot be represented as an integer power.
    MomentOrderTooLarge { order: u32 },

    /// Routine needs at least one sample.
    EmptyInput,

    // ---- Data ----
    /// A sample value is NaN/±inf where finite data is required.
    NonFiniteData { index: usize, value: f64 },

    /// A 1-sigma error estimate is unusable (negative, non-finite, or zero
    /// without a positive start jitter).
    InvalidSigma { index: usize, value: f64, reason: &'static str },

    /// A requested probability is NaN.
    InvalidProbability { value: f64 },

    // ---- Options ----
    /// ddof must be finite and non-negative.
    InvalidDdof { value: f64, reason: &'static str },

    /// Start jitter must be finite and non-negative.
    InvalidStartJitter { value: f64, reason: &'static str },

    /// Convergence tolerance must be finite and positive.
    InvalidTolerance { tol: f64, reason: &'static str },

    /// Iteration cap must be positive.
    InvalidMaxIter { max_iter: usize, reason: &'static str },

    // ---- Strict modes ----
    /// A reduction cell has no positive total weight.
    DegenerateReduction { cell: usize },

    /// The jitter solver hit its iteration cap without meeting the tolerance.
    NonConvergence { iterations: usize, ratio: f64 },

    // ---- Backend ----
    /// Wrapper for `ndarray::ShapeError`.
    Backend { text: String },
}

impl std::error::Error for WStatError {}

impl std::fmt::Display for WStatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Reduction axes ----
            WStatError::AxisOutOfBounds { axis, ndim } => {
                write!(f, "Axis {axis} is out of bounds for an array of dimension {ndim}")
            }
            WStatError::DuplicateAxis { axis } => {
                write!(f, "Axis {axis} is listed more than once")
            }

            // ---- Shapes and requests ----
            WStatError::ShapeMismatch { expected, found } => {
                write!(f, "Shape mismatch: cannot broadcast {found:?} to {expected:?}")
            }
            WStatError::EmptyMomentRequest => {
                write!(f, "At least one moment order must be requested")
            }
            WStatError::MomentOrderTooLarge { order } => {
                write!(f, "Moment order {order} is too large; must be at most {}", i32::MAX)
            }
            WStatError::EmptyInput => write!(f, "Input must contain at least one sample"),

            // ---- Data ----
            WStatError::NonFiniteData { index, value } => {
                write!(f, "Invalid data value at index {index}: {value}. Must be a finite number.")
            }
            WStatError::InvalidSigma { index, value, reason } => {
                write!(f, "Invalid error estimate at index {index}: {value}: {reason}")
            }
            WStatError::InvalidProbability { value } => {
                write!(f, "Invalid probability {value}: must not be NaN")
            }

            // ---- Options ----
            WStatError::InvalidDdof { value, reason } => {
                write!(f, "Invalid ddof {value}: {reason}")
            }
            WStatError::InvalidStartJitter { value, reason } => {
                write!(f, "Invalid start jitter {value}: {reason}")
            }
            WStatError::InvalidTolerance { tol, reason } => {
                write!(f, "Invalid tolerance {tol}: {reason}")
            }
            WStatError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }

            // ---- Strict modes ----
            WStatError::DegenerateReduction { cell } => {
                write!(f, "Reduction cell {cell} has no positive total weight")
            }
            WStatError::NonConvergence { iterations, ratio } => write!(
                f,
                "Jitter estimate did not converge after {iterations} iterations (ratio = {ratio})"
            ),

            // ---- Backend ----
            WStatError::Backend { text } => write!(f, "Backend error: {text}"),
        }
    }
}

impl From<ndarray::ShapeError> for WStatError {
    fn from(err: ndarray::ShapeError) -> Self {
        WStatError::Backend { text: err.to_string() }
    }
}

#[cfg(feature = "python-bindings")]
impl From<WStatError> for PyErr {
    fn from(err: WStatError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
