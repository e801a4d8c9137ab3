//! dispersion::mlrms — weighted RMS with an estimated extra jitter term.
//!
//! Purpose
//! -------
//! Given samples `y` with 1-sigma errors `e`, estimate an additional
//! variance component `s²` ("jitter") such that the total variance of each
//! sample is `e² + s²`, together with the reweighted mean and RMS. The
//! estimate is a fixed-point iteration; each step reweights with
//! `w = 1/(e² + s²)` and updates `s` according to a [`JitterMode`].
//!
//! Key behaviors
//! -------------
//! - One iteration computes
//!   `W = Σw`, `q = 1/√(mean w)`, `Ȳ = Σwy/W`, `r = y − Ȳ`, `χ² = Σwr²`,
//!   `wrms = √(χ²/W)` and `lnL = −½Σln(2π/w) − ½χ²`, then updates `s`:
//!   - `MaxLikelihood`: `s = √max(0, Σw²(r² − e²)/Σw²)`, ratio `Σw²r²/W`.
//!   - `ReducedChiSquare`: `s = √max(0, s² + wrms² − q²)`, ratio `wrms/q`.
//! - Iteration stops when `|ratio − 1| < tol` ([`Termination::Converged`]),
//!   when the updated jitter is exactly 0 ([`Termination::ZeroJitter`]), or
//!   after `max_iter` iterations ([`Termination::MaxIterReached`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - `y` and `e` are 1-D, non-empty, of equal length; `y` is finite; `e` is
//!   finite and `>= 0`, and strictly positive when the start jitter is 0.
//! - The returned jitter is always `>= 0`.
//!
//! Conventions
//! -----------
//! - `rms`, `mean` and `log_likelihood` are those of the last iteration
//!   (weights built from the jitter entering that iteration); `jitter` is the
//!   updated value leaving it.
//! - With the `obs_slog` feature and `verbose = true`, one structured record
//!   per iteration goes to a terminal logger.
//!
//! Testing notes
//! -------------
//! - Unit tests cover input validation, the constant-sample case
//!   (`jitter → 0`), recovery of a known jitter on a deterministic grid in
//!   both modes, and the non-convergence error.
use crate::{
    dispersion::{
        options::{JitterMode, MLRmsOptions},
        validation::verify_sigmas,
    },
    errors::{WStatError, WStatResult},
    reduction::validation::{ensure_finite, ensure_same_len},
};
use ndarray::{ArrayBase, ArrayView1, Data, Ix1, Zip};
use std::f64::consts::PI;

/// Termination — why the jitter iteration stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// `|ratio − 1| < tol`.
    Converged,
    /// The updated jitter was clipped to exactly 0.
    ZeroJitter,
    /// The iteration cap was reached first.
    MaxIterReached,
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::Converged => write!(f, "converged"),
            Termination::ZeroJitter => write!(f, "jitter reached zero"),
            Termination::MaxIterReached => write!(f, "maximum iterations reached"),
        }
    }
}

/// MLRmsOutcome — result of [`mlrms`].
///
/// - `rms`: weighted RMS of the residuals about the reweighted mean.
/// - `jitter`: estimated extra 1-sigma scatter `s >= 0`.
/// - `mean`: reweighted mean.
/// - `log_likelihood`: Gaussian log-likelihood of the last iteration.
/// - `iterations`: number of iterations run (`>= 1`).
/// - `converged`: `false` only when the cap was hit.
/// - `termination`: the stopping reason.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MLRmsOutcome {
    pub rms: f64,
    pub jitter: f64,
    pub mean: f64,
    pub log_likelihood: f64,
    pub iterations: usize,
    pub converged: bool,
    pub termination: Termination,
}

/// Quantities produced by one fixed-point step.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(not(feature = "obs_slog"), allow(dead_code))]
struct Step {
    mean: f64,
    scale: f64,
    rms: f64,
    chi2: f64,
    log_likelihood: f64,
    ratio: f64,
    jitter: f64,
}

/// Estimate the weighted RMS and jitter of `y` with errors `e`.
///
/// Parameters
/// ----------
/// - `y`: `&ArrayBase<S, Ix1>`
///   Sample values.
/// - `e`: `&ArrayBase<S2, Ix1>`
///   1-sigma errors, same length as `y`.
/// - `opts`: `&MLRmsOptions`
///   Start jitter, update mode, tolerance, iteration cap, strictness,
///   verbosity.
///
/// Returns
/// -------
/// `WStatResult<MLRmsOutcome>`
///
/// Errors
/// ------
/// - `WStatError::ShapeMismatch` if `y` and `e` differ in length.
/// - `WStatError::EmptyInput` if `y` is empty.
/// - `WStatError::NonFiniteData` if `y` holds NaN/±inf.
/// - `WStatError::InvalidSigma` for unusable errors.
/// - `WStatError::NonConvergence` if `opts.require_convergence` and the cap
///   is reached.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use wstat::dispersion::{MLRmsOptions, mlrms};
/// let y = array![3.0, 3.0, 3.0, 3.0];
/// let e = array![0.5, 1.0, 0.5, 1.0];
/// let out = mlrms(&y, &e, &MLRmsOptions::default()).unwrap();
/// assert_eq!(out.jitter, 0.0);
/// assert_eq!(out.mean, 3.0);
/// ```
pub fn mlrms<S, S2>(
    y: &ArrayBase<S, Ix1>, e: &ArrayBase<S2, Ix1>, opts: &MLRmsOptions,
) -> WStatResult<MLRmsOutcome>
where
    S: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    let (y, e) = (y.view(), e.view());
    ensure_same_len(y.len(), e.len())?;
    if y.is_empty() {
        return Err(WStatError::EmptyInput);
    }
    ensure_finite(y.iter())?;
    verify_sigmas(e.iter(), opts.start_jitter)?;

    #[cfg(feature = "obs_slog")]
    let logger = opts.verbose.then(observer::term_logger);

    let mut jitter = opts.start_jitter;
    let mut iterations = 0;
    loop {
        iterations += 1;
        let step = iterate(&y, &e, jitter, opts.mode);
        jitter = step.jitter;

        #[cfg(feature = "obs_slog")]
        if let Some(log) = &logger {
            observer::log_step(log, iterations, &step, y.len());
        }

        let termination = if (step.ratio - 1.0).abs() < opts.tol {
            Some(Termination::Converged)
        } else if step.jitter == 0.0 {
            Some(Termination::ZeroJitter)
        } else if iterations >= opts.max_iter {
            Some(Termination::MaxIterReached)
        } else {
            None
        };

        if let Some(termination) = termination {
            let converged = termination != Termination::MaxIterReached;
            #[cfg(feature = "obs_slog")]
            if let (Some(log), false) = (&logger, converged) {
                slog::warn!(log, "iteration cap reached";
                    "iterations" => iterations, "ratio" => step.ratio);
            }
            if !converged && opts.require_convergence {
                return Err(WStatError::NonConvergence { iterations, ratio: step.ratio });
            }
            return Ok(MLRmsOutcome {
                rms: step.rms,
                jitter: step.jitter,
                mean: step.mean,
                log_likelihood: step.log_likelihood,
                iterations,
                converged,
                termination,
            });
        }
    }
}

// ---- Helper Methods ----

fn iterate(
    y: &ArrayView1<'_, f64>, e: &ArrayView1<'_, f64>, jitter: f64, mode: JitterMode,
) -> Step {
    let n = y.len() as f64;
    let s2 = jitter * jitter;
    let w = e.mapv(|ev| 1.0 / (ev * ev + s2));
    let w_sum = w.sum();
    let scale = (n / w_sum).sqrt();
    let mean = w.dot(y) / w_sum;
    let r = y.mapv(|yv| yv - mean);

    let chi2 = Zip::from(&w).and(&r).fold(0.0, |acc, &wv, &rv| acc + wv * rv * rv);
    let rms = (chi2 / w_sum).sqrt();
    let log_likelihood =
        -0.5 * w.iter().map(|&wv| (2.0 * PI / wv).ln()).sum::<f64>() - 0.5 * chi2;

    let (jitter, ratio) = match mode {
        JitterMode::MaxLikelihood => {
            let (mut ww, mut ww_excess, mut ww_rr) = (0.0, 0.0, 0.0);
            Zip::from(&w).and(&r).and(e).for_each(|&wv, &rv, &ev| {
                let wv2 = wv * wv;
                ww += wv2;
                ww_excess += wv2 * (rv * rv - ev * ev);
                ww_rr += wv2 * rv * rv;
            });
            ((ww_excess / ww).max(0.0).sqrt(), ww_rr / w_sum)
        }
        JitterMode::ReducedChiSquare => {
            ((s2 + rms * rms - scale * scale).max(0.0).sqrt(), rms / scale)
        }
    };

    Step { mean, scale, rms, chi2, log_likelihood, ratio, jitter }
}

#[cfg(feature = "obs_slog")]
mod observer {
    use super::Step;
    use slog::Drain;

    /// Terminal logger with asynchronous draining.
    pub(super) fn term_logger() -> slog::Logger {
        let decorator = slog_term::TermDecorator::new().build();
        let drain = slog_term::FullFormat::new(decorator).build().fuse();
        let drain = slog_async::Async::new(drain).build().fuse();
        slog::Logger::root(drain, slog::o!("estimator" => "mlrms"))
    }

    pub(super) fn log_step(log: &slog::Logger, iter: usize, step: &Step, n: usize) {
        slog::info!(log, "iteration";
            "iter" => iter,
            "mean" => step.mean,
            "scale" => step.scale,
            "rms" => step.rms,
            "lnL" => step.log_likelihood,
            "rchi2" => step.chi2 / n as f64,
            "ratio" => step.ratio,
            "jitter" => step.jitter
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use ndarray::{Array1, array};
    use statrs::distribution::{ContinuousCDF, Normal};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Input validation (length, emptiness, finiteness, usable errors).
    // - Zero intrinsic scatter: constant samples give zero jitter.
    // - Recovery of a known jitter from a deterministic normal grid in both
    //   update modes.
    // - The iteration cap and the optional non-convergence error.
    //
    // They intentionally DO NOT cover:
    // - Log output under `obs_slog` (side effect only).
    // -------------------------------------------------------------------------

    /// `n` stratified standard-normal quantiles scaled by `sigma`.
    fn normal_grid(n: usize, sigma: f64) -> Array1<f64> {
        let normal = Normal::new(0.0, sigma).unwrap();
        Array1::from_iter((0..n).map(|i| normal.inverse_cdf((i as f64 + 0.5) / n as f64)))
    }

    #[test]
    // Purpose
    // -------
    // Invalid inputs are reported before any iteration.
    //
    // Given
    // -----
    // - Mismatched lengths, empty input, NaN sample, zero error.
    //
    // Expect
    // ------
    // - `ShapeMismatch`, `EmptyInput`, `NonFiniteData`, `InvalidSigma`.
    fn mlrms_validates_inputs() {
        let opts = MLRmsOptions::default();
        assert!(matches!(
            mlrms(&array![1.0, 2.0], &array![1.0], &opts),
            Err(WStatError::ShapeMismatch { .. })
        ));
        assert_eq!(
            mlrms(&Array1::<f64>::zeros(0), &Array1::<f64>::zeros(0), &opts),
            Err(WStatError::EmptyInput)
        );
        assert!(matches!(
            mlrms(&array![1.0, f64::NAN], &array![1.0, 1.0], &opts),
            Err(WStatError::NonFiniteData { index: 1, .. })
        ));
        assert!(matches!(
            mlrms(&array![1.0, 2.0], &array![1.0, 0.0], &opts),
            Err(WStatError::InvalidSigma { index: 1, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Constant samples have no excess scatter.
    //
    // Given
    // -----
    // - `y = 5` everywhere, errors `[1, 2, 0.5, 1]`, both modes.
    //
    // Expect
    // ------
    // - One iteration, jitter 0, rms 0, mean 5, terminated by zero jitter.
    fn constant_samples_give_zero_jitter() {
        // Arrange
        let y = array![5.0, 5.0, 5.0, 5.0];
        let e = array![1.0, 2.0, 0.5, 1.0];

        for mode in [JitterMode::MaxLikelihood, JitterMode::ReducedChiSquare] {
            // Act
            let out = mlrms(&y, &e, &MLRmsOptions::with_mode(mode)).unwrap();

            // Assert
            assert_eq!(out.iterations, 1);
            assert_eq!(out.jitter, 0.0);
            assert_abs_diff_eq!(out.rms, 0.0, epsilon = 1e-12);
            assert_relative_eq!(out.mean, 5.0, epsilon = 1e-12);
            assert_eq!(out.termination, Termination::ZeroJitter);
            assert!(out.converged);
        }
    }

    #[test]
    // Purpose
    // -------
    // The reduced-χ² update recovers the excess scatter of equal-error data.
    //
    // Given
    // -----
    // - 2000 stratified N(0, 2) samples, errors all 1.
    //
    // Expect
    // ------
    // - Convergence within 20 iterations, jitter ≈ √(σ̂² − 1), where σ̂ is
    //   the population std of the grid; `rms / scale ≈ 1`.
    fn reduced_chi_square_recovers_known_jitter() {
        // Arrange
        let y = normal_grid(2000, 2.0);
        let e = Array1::from_elem(2000, 1.0);
        let opts = MLRmsOptions::new(0.1, JitterMode::ReducedChiSquare, 1e-6, 20, true, false)
            .unwrap();
        let mean = y.mean().unwrap();
        let pop_var = y.mapv(|v| (v - mean) * (v - mean)).mean().unwrap();

        // Act
        let out = mlrms(&y, &e, &opts).unwrap();

        // Assert
        assert!(out.converged);
        assert!(out.iterations <= 20);
        assert_relative_eq!(out.jitter, (pop_var - 1.0).sqrt(), epsilon = 1e-4);
        assert_relative_eq!(out.mean, 0.0, epsilon = 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // The ML update lands on the same jitter for homoscedastic errors.
    //
    // Given
    // -----
    // - 2000 stratified N(0, 2) samples, errors all 1, ML mode.
    //
    // Expect
    // ------
    // - Jitter ≈ √(σ̂² − 1), non-negative, finite log-likelihood.
    fn max_likelihood_recovers_known_jitter() {
        // Arrange
        let y = normal_grid(2000, 2.0);
        let e = Array1::from_elem(2000, 1.0);
        let mean = y.mean().unwrap();
        let pop_var = y.mapv(|v| (v - mean) * (v - mean)).mean().unwrap();

        // Act
        let out = mlrms(&y, &e, &MLRmsOptions::default()).unwrap();

        // Assert
        assert!(out.jitter >= 0.0);
        assert!(out.iterations <= 20);
        assert!(out.log_likelihood.is_finite());
        assert_relative_eq!(out.jitter, (pop_var - 1.0).sqrt(), epsilon = 1e-4);
    }

    #[test]
    // Purpose
    // -------
    // Hitting the cap is reported, and optionally turned into an error.
    //
    // Given
    // -----
    // - Scattered data with a single allowed iteration starting from jitter 0.
    //
    // Expect
    // ------
    // - `MaxIterReached` with `converged = false`; `NonConvergence` when
    //   convergence is required.
    fn iteration_cap_is_reported() {
        // Arrange
        let y = normal_grid(200, 3.0);
        let e = Array1::from_elem(200, 1.0);
        let lenient = MLRmsOptions { max_iter: 1, ..MLRmsOptions::default() };
        let strict = MLRmsOptions { require_convergence: true, ..lenient };

        // Act
        let out = mlrms(&y, &e, &lenient).unwrap();
        let err = mlrms(&y, &e, &strict);

        // Assert
        assert_eq!(out.iterations, 1);
        assert_eq!(out.termination, Termination::MaxIterReached);
        assert!(!out.converged);
        assert!(matches!(err, Err(WStatError::NonConvergence { iterations: 1, .. })));
    }
}
