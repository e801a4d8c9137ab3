//! dispersion::options — configuration for the dispersion estimators.
//!
//! - [`SemOptions`]: standard error of the weighted mean ([`wsem`](super::wsem)).
//! - [`StdOptions`]: moment-based weighted standard deviation
//!   ([`wstd_moments`](super::wstd_moments)).
//! - [`MLRmsOptions`] and [`JitterMode`]: the jitter solver
//!   ([`mlrms`](super::mlrms)).
//!
//! Every struct has public fields, a validating `new` and a `Default` that
//! reproduces the conventional settings.
use crate::{
    dispersion::validation::{verify_ddof, verify_max_iter, verify_start_jitter, verify_tol},
    errors::WStatResult,
};

/// Options for [`wsem`](super::wsem).
///
/// - `rescale`: scale the formal variance `1/S₀` by the reduced χ² of the
///   residuals (only when a cell has more samples than `ddof` and more than
///   one sample).
/// - `ddof`: delta degrees of freedom subtracted from the per-cell sample
///   count when rescaling.
/// - `keepdims`: keep collapsed axes with extent 1.
/// - `strict`: fail on cells whose summed weight is not positive instead of
///   returning NaN/inf for them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SemOptions {
    pub rescale: bool,
    pub ddof: f64,
    pub keepdims: bool,
    pub strict: bool,
}

impl SemOptions {
    /// Construct validated options.
    ///
    /// # Errors
    /// - [`WStatError::InvalidDdof`](crate::errors::WStatError::InvalidDdof)
    ///   if `ddof` is non-finite or negative.
    pub fn new(rescale: bool, ddof: f64, keepdims: bool, strict: bool) -> WStatResult<Self> {
        verify_ddof(ddof)?;
        Ok(Self { rescale, ddof, keepdims, strict })
    }
}

impl Default for SemOptions {
    fn default() -> Self {
        Self { rescale: true, ddof: 1.0, keepdims: false, strict: false }
    }
}

/// Options for [`wstd_moments`](super::wstd_moments).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StdOptions {
    pub ddof: f64,
    pub keepdims: bool,
    pub strict: bool,
}

impl StdOptions {
    /// Construct validated options.
    ///
    /// # Errors
    /// - [`WStatError::InvalidDdof`](crate::errors::WStatError::InvalidDdof)
    ///   if `ddof` is non-finite or negative.
    pub fn new(ddof: f64, keepdims: bool, strict: bool) -> WStatResult<Self> {
        verify_ddof(ddof)?;
        Ok(Self { ddof, keepdims, strict })
    }
}

impl Default for StdOptions {
    fn default() -> Self {
        Self { ddof: 1.0, keepdims: false, strict: false }
    }
}

/// JitterMode — the fixed-point update used by the jitter solver.
///
/// Variants
/// --------
/// - `MaxLikelihood`
///   Maximum-likelihood update `s² = Σw²(r² − e²) / Σw²`; converges when
///   `Σw²r² / Σw = 1`.
/// - `ReducedChiSquare`
///   Update `s² ← s² + wrms² − q²` driving the weighted RMS of the residuals
///   towards the typical error `q`; converges when `wrms / q = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JitterMode {
    #[default]
    MaxLikelihood,
    ReducedChiSquare,
}

/// Options for [`mlrms`](super::mlrms).
///
/// - `start_jitter`: initial jitter `s ≥ 0`.
/// - `mode`: fixed-point update, see [`JitterMode`].
/// - `tol`: stop once `|ratio − 1| < tol`.
/// - `max_iter`: inclusive cap on iterations; at most `max_iter` fixed-point
///   steps run, so a capped run reports `iterations == max_iter`. Callers
///   expecting a loop that stops only after exceeding 20 steps should pass
///   21.
/// - `require_convergence`: return
///   [`WStatError::NonConvergence`](crate::errors::WStatError::NonConvergence)
///   instead of the last iterate when the cap is reached.
/// - `verbose`: emit per-iteration progress (requires the `obs_slog`
///   feature; ignored otherwise).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MLRmsOptions {
    pub start_jitter: f64,
    pub mode: JitterMode,
    pub tol: f64,
    pub max_iter: usize,
    pub require_convergence: bool,
    pub verbose: bool,
}

impl MLRmsOptions {
    /// Construct validated solver options.
    ///
    /// # Rules
    /// - `start_jitter` must be finite and `>= 0`.
    /// - `tol` must be finite and `> 0`.
    /// - `max_iter` must be `> 0`.
    ///
    /// # Errors
    /// - `InvalidStartJitter`, `InvalidTolerance`, `InvalidMaxIter`.
    pub fn new(
        start_jitter: f64, mode: JitterMode, tol: f64, max_iter: usize, require_convergence: bool,
        verbose: bool,
    ) -> WStatResult<Self> {
        verify_start_jitter(start_jitter)?;
        verify_tol(tol)?;
        verify_max_iter(max_iter)?;
        Ok(Self { start_jitter, mode, tol, max_iter, require_convergence, verbose })
    }

    /// Default settings with a different update rule.
    pub fn with_mode(mode: JitterMode) -> Self {
        Self { mode, ..Self::default() }
    }
}

impl Default for MLRmsOptions {
    fn default() -> Self {
        Self {
            start_jitter: 0.0,
            mode: JitterMode::MaxLikelihood,
            tol: 1e-6,
            max_iter: 20,
            require_convergence: false,
            verbose: false,
        }
    }
}
