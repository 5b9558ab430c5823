//! # Playback Module
//!
//! Caller-owned animation state for drawing a path over time. The core
//! reconstructor is stateless; this type threads the current time and the
//! drawn trail between frames.
//!
//! Each step samples the tip at evenly spaced intermediate times so the
//! drawn trail stays smooth regardless of speed or frame rate.

use std::f64::consts::TAU;

use rustfft::num_complex::Complex64;

use crate::epicycles::{reconstruct, tip_at, Reconstruction};
use crate::settings::Settings;
use crate::AnalysisResult;

/// Time between consecutive trail samples.
pub const TRAIL_TIME_STEP: f64 = 0.02;

/// Upper bound on trail samples added by one step.
pub const MAX_SAMPLES_PER_STEP: usize = 20;

/// Default number of trail points kept per traversal.
pub const DEFAULT_TRAIL_CAPACITY: usize = 2000;

#[derive(Debug, Clone)]
pub struct Playback {
    time: f64,
    speed: f64,
    capacity: usize,
    trail: Vec<Complex64>,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(1.0, DEFAULT_TRAIL_CAPACITY)
    }
}

impl Playback {
    /// Creates playback at `t = 0`.
    ///
    /// The trail grows on demand; at most [`DEFAULT_TRAIL_CAPACITY`] slots
    /// are reserved up front whatever `capacity` says.
    pub fn new(speed: f64, capacity: usize) -> Self {
        Self {
            time: 0.0,
            speed,
            capacity,
            trail: Vec::with_capacity(capacity.min(DEFAULT_TRAIL_CAPACITY)),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.speed, settings.trail_capacity)
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    /// Tip positions drawn so far in the current traversal.
    pub fn trail(&self) -> &[Complex64] {
        &self.trail
    }

    /// Returns to `t = 0` with an empty trail.
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.trail.clear();
    }

    /// Moves time forward by `dt * speed` and returns the chain at the new time.
    ///
    /// Passing `2π` wraps time back to zero and clears the trail. Otherwise
    /// one tip sample per [`TRAIL_TIME_STEP`] of elapsed time is appended
    /// (at least one, at most [`MAX_SAMPLES_PER_STEP`]) until the trail is full.
    ///
    /// # Arguments
    /// * `result` - Coefficients being drawn
    /// * `dt` - Elapsed frame time, before the speed multiplier
    ///
    /// # Returns
    /// * `Reconstruction` - Tip and joints at the updated time
    pub fn advance(&mut self, result: &AnalysisResult, dt: f64) -> Reconstruction {
        let start = self.time;
        let step = dt * self.speed;
        self.time += step;

        if self.time > TAU {
            self.reset();
        } else {
            let samples = ((step / TRAIL_TIME_STEP) as usize + 1).min(MAX_SAMPLES_PER_STEP);
            for i in 0..samples {
                if self.trail.len() >= self.capacity {
                    break;
                }
                let t = start + step * (i + 1) as f64 / samples as f64;
                self.trail.push(tip_at(result, t));
            }
        }

        reconstruct(result, self.time)
    }
}
