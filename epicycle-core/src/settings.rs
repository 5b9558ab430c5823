//! # Settings Module
//!
//! The drawing profile a caller uses to drive analysis and playback. It is
//! saved to and loaded from pretty-printed JSON; fields missing from a file
//! fall back to their defaults.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::coefficient_budget;
use crate::playback::DEFAULT_TRAIL_CAPACITY;

/// Largest trail a profile may ask for.
pub const MAX_TRAIL_CAPACITY: usize = 1 << 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Number of epicycles to request from the analyzer.
    pub coefficient_count: usize,
    /// Hold the request to half the point count.
    pub cap_at_nyquist: bool,
    /// Playback speed multiplier.
    pub speed: f64,
    /// Trail points kept per traversal during playback.
    pub trail_capacity: usize,
    /// Samples taken when tracing a complete outline.
    pub outline_samples: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            coefficient_count: 150,
            cap_at_nyquist: true,
            speed: 1.0,
            trail_capacity: DEFAULT_TRAIL_CAPACITY,
            outline_samples: 1000,
        }
    }
}

impl Settings {
    /// Epicycle count to request for a path of `point_count` samples.
    pub fn coefficient_budget(&self, point_count: usize) -> usize {
        coefficient_budget(self.coefficient_count, point_count, self.cap_at_nyquist)
    }

    /// Rejects values playback cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.speed.is_finite() {
            bail!("speed must be finite, got {}", self.speed);
        }
        if self.trail_capacity > MAX_TRAIL_CAPACITY {
            bail!(
                "trail_capacity must be at most {MAX_TRAIL_CAPACITY}, got {}",
                self.trail_capacity
            );
        }
        if self.outline_samples == 0 {
            bail!("outline_samples must be at least 1");
        }
        Ok(())
    }

    /// Loads settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&data)
            .with_context(|| format!("parsing settings in {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Saves settings as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing settings to {}", path.display()))?;
        Ok(())
    }
}
