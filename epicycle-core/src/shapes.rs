//! Built-in test shapes, useful as demo input and as known-answer fixtures.

use std::f64::consts::TAU;

use rustfft::num_complex::Complex64;

/// Generates `n` points on a circle, counter-clockwise from `(radius, 0)`.
///
/// # Arguments
/// * `n` - Number of points
/// * `radius` - Circle radius
///
/// # Returns
/// * `Vec<Complex64>` - Point `i` at angle `2π·i/n`
pub fn circle(n: usize, radius: f64) -> Vec<Complex64> {
    (0..n)
        .map(|i| Complex64::from_polar(radius, TAU * i as f64 / n as f64))
        .collect()
}

/// `n` points around an axis-aligned square with side `size`, centered on the origin.
///
/// Sides are walked top, right, bottom, left (clockwise) with `n / 4` points
/// each; any remainder lands on the left side.
pub fn square(n: usize, size: f64) -> Vec<Complex64> {
    let per_side = (n / 4).max(1);
    let half = size / 2.0;

    (0..n)
        .map(|i| {
            let side = i / per_side;
            let t = (i % per_side) as f64 / per_side as f64;
            match side {
                0 => Complex64::new(-half + t * size, half),
                1 => Complex64::new(half, half - t * size),
                2 => Complex64::new(half - t * size, -half),
                _ => Complex64::new(-half, -half + t * size),
            }
        })
        .collect()
}
