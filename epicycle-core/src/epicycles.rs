//! # Epicycle Reconstructor
//!
//! Evaluates a ranked coefficient chain at a time value `t`. One full
//! traversal of the path corresponds to `t` in `[0, 2π)`.
//!
//! Every function here is pure: the same `(result, t)` always gives the
//! same output, so time may be scrubbed freely in either direction.

use std::f64::consts::TAU;

use rustfft::num_complex::Complex64;

use crate::{AnalysisResult, Coefficient};

const ORIGIN: Complex64 = Complex64::new(0.0, 0.0);

/// Positions of the epicycle chain at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    /// End of the last vector; the point being drawn.
    pub tip: Complex64,
    /// Partial sums: `trail[0]` is the origin, `trail[k]` the sum of the first `k` vectors.
    pub trail: Vec<Complex64>,
}

/// The rotating vector of a single coefficient at time `t`.
pub fn contribution(coefficient: &Coefficient, t: f64) -> Complex64 {
    Complex64::from_polar(
        coefficient.amplitude,
        coefficient.phase + t * coefficient.frequency as f64,
    )
}

/// Computes the tip and every intermediate joint of the chain at `t`.
///
/// # Arguments
/// * `result` - Ranked coefficients; vectors are chained in ranking order
/// * `t` - Time value, any real number (one traversal spans `2π`)
///
/// # Returns
/// * `Reconstruction` - The tip plus a trail of exactly `result.len() + 1`
///   points starting at the origin. An empty result yields the origin alone.
pub fn reconstruct(result: &AnalysisResult, t: f64) -> Reconstruction {
    let mut trail = Vec::with_capacity(result.len() + 1);
    trail.push(ORIGIN);

    let mut cumulative = ORIGIN;
    for coefficient in result.coefficients() {
        cumulative += contribution(coefficient, t);
        trail.push(cumulative);
    }

    Reconstruction {
        tip: cumulative,
        trail,
    }
}

/// Tip position at `t` without collecting the joints.
pub fn tip_at(result: &AnalysisResult, t: f64) -> Complex64 {
    result
        .coefficients()
        .iter()
        .fold(ORIGIN, |acc, c| acc + contribution(c, t))
}

/// Samples the tip at `samples` evenly spaced times over one period.
///
/// # Arguments
/// * `result` - Ranked coefficients
/// * `samples` - Number of points to take
///
/// # Returns
/// * `Vec<Complex64>` - Tip positions at `t = 2π·k/samples` for
///   `k in 0..samples`; empty when `samples` is zero
pub fn trace_outline(result: &AnalysisResult, samples: usize) -> Vec<Complex64> {
    (0..samples)
        .map(|k| tip_at(result, TAU * k as f64 / samples as f64))
        .collect()
}
