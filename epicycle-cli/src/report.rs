//! Human-readable and JSON summaries of analyzed drawings.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use epicycle_core::{AnalysisResult, Coefficient};
use serde::Serialize;

/// Number of leading coefficients printed in the summary table.
const SUMMARY_ROWS: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct DrawingReport {
    pub path: String,
    pub point_count: usize,
    pub total_amplitude: f64,
    pub coefficients: Vec<Coefficient>,
}

impl DrawingReport {
    pub fn new(path: &Path, result: &AnalysisResult) -> Self {
        Self {
            path: path.display().to_string(),
            point_count: result.point_count(),
            total_amplitude: result.total_amplitude(),
            coefficients: result.coefficients().to_vec(),
        }
    }

    /// Multi-line summary with the largest epicycles.
    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "{}: {} points, {} epicycles, total radius {:.4}",
            self.path,
            self.point_count,
            self.coefficients.len(),
            self.total_amplitude
        )];
        lines.extend(self.coefficients.iter().take(SUMMARY_ROWS).enumerate().map(|(i, c)| {
            format!(
                "  #{:<3} freq {:>5}  amp {:>10.6}  phase {:>8.4}",
                i + 1,
                c.frequency,
                c.amplitude,
                c.phase
            )
        }));
        lines.join("\n")
    }
}

/// Writes every report as one pretty-printed JSON array.
pub fn write_json(reports: &[DrawingReport], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(reports)?;
    fs::write(path, json).with_context(|| format!("writing report to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use epicycle_core::{analysis::analyze, shapes};

    #[test]
    fn summary_lists_leading_epicycles() {
        let result = analyze(&shapes::square(64, 2.0), 8).unwrap();
        let report = DrawingReport::new(Path::new("square.bin"), &result);
        let summary = report.summary();
        assert!(summary.starts_with("square.bin: 64 points, 8 epicycles"));
        assert_eq!(summary.lines().count(), 1 + SUMMARY_ROWS);
    }

    #[test]
    fn json_contains_coefficients() {
        let result = analyze(&shapes::circle(16, 1.0), 1).unwrap();
        let report = DrawingReport::new(Path::new("circle.txt"), &result);
        let json = serde_json::to_value(vec![report]).unwrap();
        assert_eq!(json[0]["point_count"], 16);
        assert_eq!(json[0]["coefficients"][0]["frequency"], 1);
    }
}
