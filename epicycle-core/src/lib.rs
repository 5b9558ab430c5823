// epicycle-core/src/lib.rs

//! The core logic for Fourier epicycle drawing.
//! This crate turns a closed path of complex sample points into a ranked
//! set of rotating vectors, and evaluates that chain at any time value.
//! It is completely headless and contains no rendering code.

pub mod analysis;
pub mod epicycles;
pub mod fft;
pub mod path;
pub mod playback;
pub mod settings;
pub mod shapes;

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

pub use rustfft::num_complex::Complex64;

/// A single rotating vector derived from one spectrum bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coefficient {
    /// Magnitude of the bin; the radius of the epicycle.
    pub amplitude: f64,
    /// Signed cycle count per traversal (the centered bin index).
    pub frequency: i64,
    /// Starting angle in `(-π, π]`.
    pub phase: f64,
}

impl Coefficient {
    /// Builds the coefficient for spectrum bin `index` of an `n`-point transform.
    ///
    /// # Arguments
    /// * `value` - Normalized spectrum value of the bin
    /// * `index` - Bin index in `[0, n)`
    /// * `n` - Transform size
    pub fn from_bin(value: Complex64, index: usize, n: usize) -> Self {
        // arg() yields -π on the negative real axis with a -0.0 imaginary part.
        let phase = value.arg();
        Self {
            amplitude: value.norm(),
            frequency: analysis::centered_frequency(index, n),
            phase: if phase == -PI { PI } else { phase },
        }
    }
}

/// Represents the ranked outcome of analysing one path.
///
/// Coefficients are stored largest amplitude first. A result is never
/// modified once built; re-analysing produces a new one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    coefficients: Vec<Coefficient>,
    /// Number of samples in the analysed path.
    point_count: usize,
}

impl AnalysisResult {
    pub(crate) fn new(coefficients: Vec<Coefficient>, point_count: usize) -> Self {
        Self {
            coefficients,
            point_count,
        }
    }

    /// An empty result for a path of `point_count` samples.
    pub fn empty(point_count: usize) -> Self {
        Self::new(Vec::new(), point_count)
    }

    /// Coefficients in ranking order.
    pub fn coefficients(&self) -> &[Coefficient] {
        &self.coefficients
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// Sum of all retained radii, i.e. the farthest the tip can reach from the origin.
    pub fn total_amplitude(&self) -> f64 {
        self.coefficients.iter().map(|c| c.amplitude).sum()
    }
}
