//! # Transform Engine
//!
//! Forward and inverse discrete Fourier transforms over complex path samples.
//! Power-of-two sizes run through an iterative radix-2 Cooley-Tukey transform;
//! every other size falls back to direct summation.
//!
//! ## Normalization
//! The *forward* transform divides every output value by `n` and the inverse
//! does not. Amplitudes and phases computed from the spectrum assume this,
//! so consumers must never normalize the spectrum again.

use std::f64::consts::PI;

use rustfft::num_complex::Complex64;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Returns true when `n` is a non-zero power of two.
pub fn is_power_of_two(n: usize) -> bool {
    n > 0 && n & (n - 1) == 0
}

/// Smallest power of two that is `>= n`. Zero maps to 1.
pub fn next_power_of_two(n: usize) -> usize {
    if n == 0 {
        return 1;
    }
    n.next_power_of_two()
}

/// Computes the normalized forward transform of `points`.
///
/// Output length equals input length and `output[k]` carries the `1/n`
/// factor. An empty input yields an empty spectrum.
pub fn forward_transform(points: &[Complex64]) -> Vec<Complex64> {
    let mut output = Vec::with_capacity(points.len());
    forward_transform_into(points, &mut output);
    output
}

/// Same as [`forward_transform`] but writes into a caller-provided buffer.
///
/// The buffer is cleared first. When it already holds enough capacity no
/// allocation takes place, which lets the analyzer reserve memory fallibly.
pub fn forward_transform_into(points: &[Complex64], output: &mut Vec<Complex64>) {
    output.clear();
    let n = points.len();
    if !is_power_of_two(n) {
        direct_sum_into(points, -1.0, output);
        let scale = n as f64;
        for value in output.iter_mut() {
            *value /= scale;
        }
        return;
    }

    radix2_into(points, output);
    let scale = n as f64;
    for value in output.iter_mut() {
        *value /= scale;
    }
}

/// Reconstructs the sample domain from a spectrum made by [`forward_transform`].
///
/// Power-of-two sizes reuse the fast forward path through conjugation;
/// other sizes sum directly. No `1/n` factor is applied here.
pub fn inverse_transform(spectrum: &[Complex64]) -> Vec<Complex64> {
    let n = spectrum.len();
    if !is_power_of_two(n) {
        let mut output = Vec::with_capacity(n);
        direct_sum_into(spectrum, 1.0, &mut output);
        return output;
    }

    // Scaling by n undoes the 1/n the forward path is about to apply.
    let scale = n as f64;
    let conjugated: Vec<Complex64> = spectrum.iter().map(|c| c.conj() * scale).collect();
    let mut output = forward_transform(&conjugated);
    for value in output.iter_mut() {
        *value = value.conj();
    }
    output
}

/// The `O(n²)` reference transform, valid for every `n`.
///
/// `output[k] = (1/n) * Σ_j points[j] * exp(-2πi·j·k/n)`
pub fn direct_transform(points: &[Complex64]) -> Vec<Complex64> {
    let n = points.len();
    let mut output = Vec::with_capacity(n);
    direct_sum_into(points, -1.0, &mut output);
    let scale = n as f64;
    for value in output.iter_mut() {
        *value /= scale;
    }
    output
}

/// Unnormalized direct summation with exponent sign `sign` (-1 forward, +1 inverse).
fn direct_sum_into(input: &[Complex64], sign: f64, output: &mut Vec<Complex64>) {
    let n = input.len();
    for k in 0..n {
        let mut acc = ZERO;
        for (j, &value) in input.iter().enumerate() {
            // j*k is periodic in n; reducing it first keeps the angle small.
            let angle = sign * 2.0 * PI * ((j * k) % n) as f64 / n as f64;
            acc += value * Complex64::from_polar(1.0, angle);
        }
        output.push(acc);
    }
}

/// Writes `input` into `output` in bit-reversed index order.
fn bit_reverse_permute_into(input: &[Complex64], output: &mut Vec<Complex64>) {
    let n = input.len();
    output.resize(n, ZERO);
    let bits = n.trailing_zeros();
    if bits == 0 {
        output.copy_from_slice(input);
        return;
    }
    for (i, &value) in input.iter().enumerate() {
        let rev = i.reverse_bits() >> (usize::BITS - bits);
        output[rev] = value;
    }
}

/// Iterative radix-2 decimation-in-time transform, unnormalized.
///
/// `input.len()` must be a power of two.
fn radix2_into(input: &[Complex64], output: &mut Vec<Complex64>) {
    let n = input.len();
    bit_reverse_permute_into(input, output);

    let mut m = 2;
    while m <= n {
        let half = m / 2;
        // Twiddles advance by repeated multiplication, one exp per stage.
        let wm = Complex64::from_polar(1.0, -2.0 * PI / m as f64);
        for block in output.chunks_exact_mut(m) {
            let (lower, upper) = block.split_at_mut(half);
            let mut w = ONE;
            for (u, v) in lower.iter_mut().zip(upper.iter_mut()) {
                let t = w * *v;
                let a = *u;
                *u = a + t;
                *v = a - t;
                w *= wm;
            }
        }
        m <<= 1;
    }
}
