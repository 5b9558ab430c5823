//! # Epicycles - command-line front end
//!
//! Headless driver for the epicycle core: loads path files, ranks their
//! Fourier coefficients, and writes reports or reconstructed outlines.
//!
//! ## Architecture
//! - **Main Thread**: argument parsing, settings, output
//! - **Worker Threads**: one per analyzed path
//! - **Communication**: Crossbeam channel carrying finished reports

mod report;
mod worker;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
use epicycle_core::{analysis, epicycles, path, settings::Settings, shapes};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

#[derive(Parser)]
#[command(author, version, about = "Fourier epicycle analysis for closed paths")]
struct Cli {
    /// Settings profile (JSON); command-line flags take precedence over it
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rank the epicycles of one or more path files
    Analyze(AnalyzeArgs),

    /// Write the outline drawn by a truncated series as a path file
    Trace(TraceArgs),

    /// Generate a built-in test shape
    Shape(ShapeArgs),

    /// Resample a path evenly by arc length and/or normalize its size
    Prepare(PrepareArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Path files (.txt/.csv for text, anything else binary)
    #[arg(required = true, value_hint = ValueHint::FilePath)]
    files: Vec<PathBuf>,

    /// Number of epicycles to keep per drawing
    #[arg(long, short = 'n')]
    coefficients: Option<usize>,

    /// Also write all reports to this JSON file
    #[arg(long, value_hint = ValueHint::FilePath)]
    json: Option<PathBuf>,
}

#[derive(Args)]
struct TraceArgs {
    #[arg(value_hint = ValueHint::FilePath)]
    file: PathBuf,

    /// Output path file
    #[arg(long, short = 'o', value_hint = ValueHint::FilePath)]
    out: PathBuf,

    #[arg(long, short = 'n')]
    coefficients: Option<usize>,

    /// Points sampled along one traversal
    #[arg(long)]
    samples: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ShapeKind {
    Circle,
    Square,
}

#[derive(Args)]
struct ShapeArgs {
    #[arg(value_enum)]
    kind: ShapeKind,

    #[arg(long, default_value_t = 400)]
    points: usize,

    /// Circle radius or square side length
    #[arg(long, default_value_t = 6.0)]
    size: f64,

    #[arg(long, short = 'o', value_hint = ValueHint::FilePath)]
    out: PathBuf,
}

#[derive(Args)]
struct PrepareArgs {
    #[arg(value_hint = ValueHint::FilePath)]
    file: PathBuf,

    #[arg(long, short = 'o', value_hint = ValueHint::FilePath)]
    out: PathBuf,

    /// Resample to this many points spaced evenly along the closed loop
    #[arg(long)]
    samples: Option<usize>,

    /// Center the path and scale its larger side to 10
    #[arg(long)]
    normalize: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(file) => Settings::load(file)?,
        None => Settings::default(),
    };

    match cli.command {
        Command::Analyze(args) => run_analyze(args, settings),
        Command::Trace(args) => run_trace(args, settings),
        Command::Shape(args) => run_shape(args),
        Command::Prepare(args) => run_prepare(args),
    }
}

/// Configures the global tracing subscriber. `RUST_LOG` overrides the `info` default.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    Registry::default().with(filter).with(fmt_layer).init();
}

fn run_analyze(args: AnalyzeArgs, mut settings: Settings) -> Result<()> {
    if let Some(count) = args.coefficients {
        settings.coefficient_count = count;
    }

    let total = args.files.len();
    info!(files = total, "starting analysis workers");
    let (results_rx, handles) = worker::spawn_analysis(args.files, &settings);

    let (reports, failed) = worker::collect_outcomes(&results_rx, total);
    let mut failures = failed.len();
    for failure in &failed {
        eprintln!("{}: {}", failure.path.display(), failure.error);
    }
    for handle in handles {
        if handle.join().is_err() {
            warn!("an analysis worker panicked");
            failures += 1;
        }
    }

    for report in &reports {
        println!("{}", report.summary());
    }
    if let Some(out) = &args.json {
        report::write_json(&reports, out)?;
        info!(path = %out.display(), "report written");
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {total} drawings could not be analyzed");
    }
    Ok(())
}

fn run_trace(args: TraceArgs, mut settings: Settings) -> Result<()> {
    if let Some(count) = args.coefficients {
        settings.coefficient_count = count;
    }
    if let Some(samples) = args.samples {
        settings.outline_samples = samples;
    }
    settings.validate()?;

    let points = path::load_path(&args.file)?;
    let requested = settings.coefficient_budget(points.len());
    let result = analysis::analyze(&points, requested)
        .with_context(|| format!("analyzing {}", args.file.display()))?;
    info!(
        points = points.len(),
        epicycles = result.len(),
        samples = settings.outline_samples,
        "tracing outline"
    );

    let outline = epicycles::trace_outline(&result, settings.outline_samples);
    path::save_path(&args.out, &outline)?;
    Ok(())
}

fn run_shape(args: ShapeArgs) -> Result<()> {
    anyhow::ensure!(args.points > 0, "a shape needs at least one point");
    let points = match args.kind {
        ShapeKind::Circle => shapes::circle(args.points, args.size),
        ShapeKind::Square => shapes::square(args.points, args.size),
    };
    path::save_path(&args.out, &points)?;
    Ok(())
}

fn run_prepare(args: PrepareArgs) -> Result<()> {
    let mut points = path::load_path(&args.file)?;
    if let Some(samples) = args.samples {
        anyhow::ensure!(samples > 0, "resampling needs at least one sample");
        points = path::resample_evenly(&points, samples);
    }
    if args.normalize {
        points = path::normalize(&points);
    }
    info!(points = points.len(), normalized = args.normalize, "prepared path");
    path::save_path(&args.out, &points)?;
    Ok(())
}
