//! Validation helpers for dispersion-estimator options.
//!
//! - [`verify_ddof`]: delta degrees of freedom must be finite and `>= 0`.
//! - [`verify_tol`]: convergence tolerances must be finite and `> 0`.
//! - [`verify_max_iter`]: iteration caps must be `> 0`.
//! - [`verify_start_jitter`]: the solver's starting jitter must be finite and
//!   `>= 0`.
//! - [`verify_sigmas`]: 1-sigma errors fed to the jitter solver must be
//!   usable as variances.
use crate::errors::{WStatError, WStatResult};

/// Validate a delta-degrees-of-freedom value.
///
/// # Errors
/// Returns [`WStatError::InvalidDdof`] if the value is non-finite or < 0.
pub fn verify_ddof(ddof: f64) -> WStatResult<()> {
    if !ddof.is_finite() {
        return Err(WStatError::InvalidDdof { value: ddof, reason: "ddof must be finite." });
    }
    if ddof < 0.0 {
        return Err(WStatError::InvalidDdof { value: ddof, reason: "ddof must be non-negative." });
    }
    Ok(())
}

/// Validate a convergence tolerance.
///
/// # Errors
/// Returns [`WStatError::InvalidTolerance`] if the value is non-finite or ≤ 0.
pub fn verify_tol(tol: f64) -> WStatResult<()> {
    if !tol.is_finite() {
        return Err(WStatError::InvalidTolerance { tol, reason: "Tolerance must be finite." });
    }
    if tol <= 0.0 {
        return Err(WStatError::InvalidTolerance { tol, reason: "Tolerance must be positive." });
    }
    Ok(())
}

/// Validate an iteration cap.
///
/// # Errors
/// Returns [`WStatError::InvalidMaxIter`] if `max_iter == 0`.
pub fn verify_max_iter(max_iter: usize) -> WStatResult<()> {
    if max_iter == 0 {
        return Err(WStatError::InvalidMaxIter {
            max_iter,
            reason: "Maximum iterations must be greater than zero.",
        });
    }
    Ok(())
}

/// Validate the starting jitter of the ML solver.
///
/// # Errors
/// Returns [`WStatError::InvalidStartJitter`] if the value is non-finite or < 0.
pub fn verify_start_jitter(s0: f64) -> WStatResult<()> {
    if !s0.is_finite() {
        return Err(WStatError::InvalidStartJitter {
            value: s0,
            reason: "Start jitter must be finite.",
        });
    }
    if s0 < 0.0 {
        return Err(WStatError::InvalidStartJitter {
            value: s0,
            reason: "Start jitter must be non-negative.",
        });
    }
    Ok(())
}

/// Validate 1-sigma errors for the jitter solver.
///
/// Errors must be finite and non-negative. A zero error is only usable when
/// the starting jitter is positive, otherwise its weight `1/(e² + s²)` is
/// infinite on the first iteration.
///
/// # Errors
/// Returns [`WStatError::InvalidSigma`] for the first offending element.
pub fn verify_sigmas<'a, I>(sigmas: I, start_jitter: f64) -> WStatResult<()>
where
    I: IntoIterator<Item = &'a f64>,
{
    for (index, &value) in sigmas.into_iter().enumerate() {
        if !value.is_finite() {
            return Err(WStatError::InvalidSigma {
                index,
                value,
                reason: "Error estimates must be finite.",
            });
        }
        if value < 0.0 {
            return Err(WStatError::InvalidSigma {
                index,
                value,
                reason: "Error estimates must be non-negative.",
            });
        }
        if value == 0.0 && start_jitter == 0.0 {
            return Err(WStatError::InvalidSigma {
                index,
                value,
                reason: "Zero error estimates need a positive start jitter.",
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover every error branch of the option validators and a
    // success path for each.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // ddof must be finite and non-negative.
    //
    // Given
    // -----
    // - `NaN`, `-1`, `0`, `1.5`.
    //
    // Expect
    // ------
    // - Errors for the first two, `Ok` for the rest.
    fn verify_ddof_branches() {
        assert!(matches!(verify_ddof(f64::NAN), Err(WStatError::InvalidDdof { .. })));
        assert!(matches!(verify_ddof(-1.0), Err(WStatError::InvalidDdof { .. })));
        assert!(verify_ddof(0.0).is_ok());
        assert!(verify_ddof(1.5).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Tolerance and iteration caps reject degenerate values.
    //
    // Given
    // -----
    // - Tolerances `inf`, `0`, `1e-6`; caps `0`, `20`.
    //
    // Expect
    // ------
    // - Errors for `inf`, `0`, cap `0`; `Ok` otherwise.
    fn verify_tol_and_max_iter_branches() {
        assert!(matches!(verify_tol(f64::INFINITY), Err(WStatError::InvalidTolerance { .. })));
        assert!(matches!(verify_tol(0.0), Err(WStatError::InvalidTolerance { .. })));
        assert!(verify_tol(1e-6).is_ok());
        assert!(matches!(verify_max_iter(0), Err(WStatError::InvalidMaxIter { .. })));
        assert!(verify_max_iter(20).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Start jitter must be finite and non-negative.
    //
    // Given
    // -----
    // - `-0.5`, `NaN`, `0`.
    //
    // Expect
    // ------
    // - Errors, then `Ok`.
    fn verify_start_jitter_branches() {
        assert!(matches!(verify_start_jitter(-0.5), Err(WStatError::InvalidStartJitter { .. })));
        assert!(matches!(
            verify_start_jitter(f64::NAN),
            Err(WStatError::InvalidStartJitter { .. })
        ));
        assert!(verify_start_jitter(0.0).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Zero errors are accepted only with a positive start jitter.
    //
    // Given
    // -----
    // - Errors `[1, 0]` with start jitter `0` and `0.1`; errors `[1, -1]`.
    //
    // Expect
    // ------
    // - Error at index 1 for start jitter 0; `Ok` for 0.1; error for `-1`.
    fn verify_sigmas_branches() {
        let zero = [1.0, 0.0];
        match verify_sigmas(zero.iter(), 0.0) {
            Err(WStatError::InvalidSigma { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected InvalidSigma, got {other:?}"),
        }
        assert!(verify_sigmas(zero.iter(), 0.1).is_ok());
        assert!(matches!(
            verify_sigmas([1.0, -1.0].iter(), 0.1),
            Err(WStatError::InvalidSigma { index: 1, .. })
        ));
    }
}
