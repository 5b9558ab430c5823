//! Analysis workers.
//!
//! Each input path is loaded and analyzed on its own thread; outcomes are
//! sent back to the main thread over a crossbeam channel, tagged with the
//! position of the job so the caller can restore input order.

use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use epicycle_core::{analysis, path, settings::Settings};
use tracing::{debug, warn};

use crate::report::DrawingReport;

/// What a worker sends back when it is done.
#[derive(Debug)]
pub enum WorkerMessage {
    Finished { index: usize, report: DrawingReport },
    Failed { index: usize, path: PathBuf, error: String },
}

/// Spawns one worker per path and returns the result channel plus the
/// thread handles.
///
/// The channel closes once every worker has finished.
pub fn spawn_analysis(
    paths: Vec<PathBuf>,
    settings: &Settings,
) -> (Receiver<WorkerMessage>, Vec<JoinHandle<()>>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    let handles = paths
        .into_iter()
        .enumerate()
        .map(|(index, path)| {
            let tx = tx.clone();
            let settings = settings.clone();
            thread::spawn(move || run_job(index, path, &settings, &tx))
        })
        .collect();
    (rx, handles)
}

/// A drawing that could not be analyzed.
#[derive(Debug)]
pub struct Failure {
    pub path: PathBuf,
    pub error: String,
}

/// Drains the worker channel and restores input order.
///
/// # Arguments
/// * `rx` - Result channel returned by [`spawn_analysis`]
/// * `total` - Number of jobs that were spawned
///
/// # Returns
/// * `(reports, failures)` - Both in the order the paths were given
pub fn collect_outcomes(
    rx: &Receiver<WorkerMessage>,
    total: usize,
) -> (Vec<DrawingReport>, Vec<Failure>) {
    let mut slots: Vec<Option<Result<DrawingReport, Failure>>> = Vec::with_capacity(total);
    slots.resize_with(total, || None);

    for message in rx.iter() {
        match message {
            WorkerMessage::Finished { index, report } => slots[index] = Some(Ok(report)),
            WorkerMessage::Failed { index, path, error } => {
                slots[index] = Some(Err(Failure { path, error }))
            }
        }
    }

    let mut reports = Vec::new();
    let mut failures = Vec::new();
    for outcome in slots.into_iter().flatten() {
        match outcome {
            Ok(report) => reports.push(report),
            Err(failure) => failures.push(failure),
        }
    }
    (reports, failures)
}

fn run_job(index: usize, file: PathBuf, settings: &Settings, tx: &Sender<WorkerMessage>) {
    debug!(index, path = %file.display(), "worker started");

    let message = match analyze_file(&file, settings) {
        Ok(report) => WorkerMessage::Finished { index, report },
        Err(error) => {
            warn!(path = %file.display(), %error, "analysis failed");
            WorkerMessage::Failed {
                index,
                path: file,
                error: format!("{error:#}"),
            }
        }
    };

    if tx.send(message).is_err() {
        warn!(index, "result channel closed before the worker finished");
    }
}

fn analyze_file(file: &Path, settings: &Settings) -> anyhow::Result<DrawingReport> {
    let points = path::load_path(file)?;
    let requested = settings.coefficient_budget(points.len());
    let result = analysis::analyze(&points, requested)?;
    debug!(
        path = %file.display(),
        points = points.len(),
        coefficients = result.len(),
        "analysis complete"
    );
    Ok(DrawingReport::new(file, &result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use epicycle_core::shapes;
    use tempfile::tempdir;

    #[test]
    fn outcomes_keep_input_order() {
        let dir = tempdir().unwrap();
        let circle = dir.path().join("circle.txt");
        let square = dir.path().join("square.bin");
        path::save_path(&circle, &shapes::circle(32, 1.0)).unwrap();
        path::save_path(&square, &shapes::square(64, 2.0)).unwrap();
        let missing_a = dir.path().join("missing-a.bin");
        let missing_b = dir.path().join("missing-b.txt");

        let paths = vec![missing_b.clone(), circle, missing_a.clone(), square];
        let (rx, handles) = spawn_analysis(paths, &Settings::default());
        let (reports, failures) = collect_outcomes(&rx, 4);
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(reports.len(), 2);
        assert!(reports[0].path.ends_with("circle.txt"));
        assert!(reports[1].path.ends_with("square.bin"));
        assert_eq!(reports[1].coefficients.len(), 32);

        let failed: Vec<&PathBuf> = failures.iter().map(|f| &f.path).collect();
        assert_eq!(failed, vec![&missing_b, &missing_a]);
        assert!(failures[0].error.contains("missing-b.txt"));
    }
}
