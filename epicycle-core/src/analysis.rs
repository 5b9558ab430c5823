//! # Spectral Analyzer
//!
//! Converts a path into ranked epicycle coefficients:
//! 1. Forward transform of the samples
//! 2. One `(amplitude, frequency, phase)` triple per spectrum bin
//! 3. Descending sort by amplitude
//! 4. Truncation to the requested count
//!
//! Bin indices above `n/2` are wrapped to negative frequencies so the
//! value can be used directly as an angular velocity.

use rustfft::num_complex::Complex64;
use thiserror::Error;

use crate::fft::forward_transform_into;
use crate::{AnalysisResult, Coefficient};

/// Reasons an analysis can fail. Degenerate input is not one of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("could not allocate working memory for {points} samples")]
    Allocation { points: usize },
}

/// Maps an FFT bin index to a signed cycle count.
///
/// Index `i` stays `i` while `i <= n/2`, otherwise it becomes `i - n`.
pub fn centered_frequency(index: usize, n: usize) -> i64 {
    if index <= n / 2 {
        index as i64
    } else {
        index as i64 - n as i64
    }
}

/// Index-aligned coefficients for every bin of `spectrum`, unsorted.
pub fn spectrum_to_coefficients(spectrum: &[Complex64]) -> Vec<Coefficient> {
    let n = spectrum.len();
    spectrum
        .iter()
        .enumerate()
        .map(|(i, &value)| Coefficient::from_bin(value, i, n))
        .collect()
}

/// Limits a requested epicycle count for a path of `n` samples.
///
/// With `cap_at_nyquist` the request is held to `n/2` (never below one
/// for a non-empty path); otherwise only to `n`.
pub fn coefficient_budget(requested: usize, n: usize, cap_at_nyquist: bool) -> usize {
    if n == 0 {
        return 0;
    }
    let limit = if cap_at_nyquist { (n / 2).max(1) } else { n };
    requested.min(limit)
}

/// Analyzes `points` and keeps the `requested_count` largest coefficients.
///
/// # Returns
/// * `Ok(result)` - Coefficients sorted by non-increasing amplitude;
///   `min(requested_count, points.len())` of them. Empty input or a zero
///   request gives an empty result.
/// * `Err(AnalysisError::Allocation)` - Working memory could not be reserved
///
/// Every buffer is reserved fallibly and the sort runs in place, so an
/// out-of-memory condition surfaces as an error instead of an abort. The
/// order among equal amplitudes is unspecified.
pub fn analyze(points: &[Complex64], requested_count: usize) -> Result<AnalysisResult, AnalysisError> {
    let n = points.len();
    if n == 0 || requested_count == 0 {
        return Ok(AnalysisResult::empty(n));
    }
    let count = requested_count.min(n);

    let alloc_failed = |_| AnalysisError::Allocation { points: n };
    let mut spectrum: Vec<Complex64> = Vec::new();
    spectrum.try_reserve_exact(n).map_err(alloc_failed)?;
    let mut coefficients: Vec<Coefficient> = Vec::new();
    coefficients.try_reserve_exact(n).map_err(alloc_failed)?;

    forward_transform_into(points, &mut spectrum);
    coefficients.extend(
        spectrum
            .iter()
            .enumerate()
            .map(|(i, &value)| Coefficient::from_bin(value, i, n)),
    );

    coefficients.sort_unstable_by(|a, b| b.amplitude.total_cmp(&a.amplitude));

    let mut kept: Vec<Coefficient> = Vec::new();
    kept.try_reserve_exact(count).map_err(alloc_failed)?;
    kept.extend_from_slice(&coefficients[..count]);

    Ok(AnalysisResult::new(kept, n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fft::forward_transform;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::PI;

    fn unit_circle(n: usize) -> Vec<Complex64> {
        (0..n)
            .map(|i| Complex64::from_polar(1.0, 2.0 * PI * i as f64 / n as f64))
            .collect()
    }

    fn random_points(n: usize, seed: u64) -> Vec<Complex64> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
            .collect()
    }

    #[test]
    fn centering_wraps_upper_bins() {
        assert_eq!(centered_frequency(0, 8), 0);
        assert_eq!(centered_frequency(3, 8), 3);
        assert_eq!(centered_frequency(4, 8), 4);
        assert_eq!(centered_frequency(5, 8), -3);
        assert_eq!(centered_frequency(7, 8), -1);
        assert_eq!(centered_frequency(2, 5), 2);
        assert_eq!(centered_frequency(3, 5), -2);
    }

    #[test]
    fn coefficients_follow_spectrum_bins() {
        let points = random_points(8, 3);
        let spectrum = forward_transform(&points);
        let coefficients = spectrum_to_coefficients(&spectrum);
        assert_eq!(coefficients.len(), 8);
        for (c, bin) in coefficients.iter().zip(&spectrum) {
            assert_eq!(c.amplitude, bin.norm());
            assert_eq!(c.phase, bin.arg());
        }
        assert_eq!(coefficients[5].frequency, -3);
    }

    #[test]
    fn degenerate_inputs_give_empty_results() {
        let empty = analyze(&[], 10).expect("empty input is not an error");
        assert!(empty.is_empty());
        assert_eq!(empty.point_count(), 0);

        let none_requested = analyze(&unit_circle(16), 0).expect("zero request is not an error");
        assert!(none_requested.is_empty());
        assert_eq!(none_requested.point_count(), 16);
    }

    #[test]
    fn request_is_clamped_to_point_count() {
        let result = analyze(&random_points(5, 9), 50).unwrap();
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn returns_largest_amplitudes_in_order() {
        for &(n, k) in &[(16usize, 4usize), (17, 6), (64, 64), (30, 1)] {
            let points = random_points(n, n as u64 * 7);
            let result = analyze(&points, k).unwrap();
            assert_eq!(result.len(), k.min(n));

            let amplitudes: Vec<f64> = result.coefficients().iter().map(|c| c.amplitude).collect();
            assert!(amplitudes.windows(2).all(|w| w[0] >= w[1]));

            let mut all: Vec<f64> = forward_transform(&points).iter().map(|c| c.norm()).collect();
            all.sort_by(|a, b| b.total_cmp(a));
            for (got, want) in amplitudes.iter().zip(&all) {
                assert!((got - want).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn ties_are_reported_as_a_set() {
        // Two equal-radius circles in opposite directions.
        let n = 32;
        let points: Vec<Complex64> = (0..n)
            .map(|i| {
                let theta = 2.0 * PI * i as f64 / n as f64;
                Complex64::from_polar(1.0, 2.0 * theta) + Complex64::from_polar(1.0, -2.0 * theta)
            })
            .collect();
        let result = analyze(&points, 2).unwrap();
        let mut frequencies: Vec<i64> = result.coefficients().iter().map(|c| c.frequency).collect();
        frequencies.sort();
        assert_eq!(frequencies, vec![-2, 2]);
        for c in result.coefficients() {
            assert!((c.amplitude - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn phase_stays_in_half_open_range() {
        // atan2(-0.0, -1.0) is exactly -π.
        let result = analyze(&[Complex64::new(-1.0, -0.0)], 1).unwrap();
        assert_eq!(result.coefficients()[0].phase, PI);

        for c in analyze(&random_points(33, 5), 33).unwrap().coefficients() {
            assert!(c.phase > -PI && c.phase <= PI);
        }
    }

    #[test]
    fn result_holds_only_the_kept_coefficients() {
        let result = analyze(&random_points(512, 21), 3).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result.coefficients.capacity(), 3);
    }

    #[test]
    fn unit_circle_has_single_dominant_term() {
        let result = analyze(&unit_circle(64), 1).unwrap();
        assert_eq!(result.len(), 1);
        let c = result.coefficients()[0];
        assert!((c.amplitude - 1.0).abs() < 1e-9);
        assert_eq!(c.frequency, 1);
        assert!(c.phase.abs() < 1e-9);
    }

    #[test]
    fn reversed_circle_has_negative_frequency() {
        let mut points = unit_circle(64);
        points[1..].reverse();
        let c = analyze(&points, 1).unwrap().coefficients()[0];
        assert_eq!(c.frequency, -1);
        assert!((c.amplitude - 1.0).abs() < 1e-9);
    }

    #[test]
    fn budget_respects_nyquist_cap() {
        assert_eq!(coefficient_budget(150, 400, true), 150);
        assert_eq!(coefficient_budget(150, 100, true), 50);
        assert_eq!(coefficient_budget(150, 100, false), 100);
        assert_eq!(coefficient_budget(5, 1, true), 1);
        assert_eq!(coefficient_budget(5, 0, true), 0);
    }
}
