//! # Path File Module
//!
//! Loading and saving of closed paths. Two formats are supported:
//!
//! ## Binary
//! - 4 bytes: point count (`u32`, little-endian)
//! - per point: real then imaginary part, each an `f64` (little-endian)
//!
//! ## Text
//! One `real,imaginary` pair per line. Blank lines and lines starting with
//! `#` are ignored; lines that fail to parse are skipped with a warning.
//!
//! A file that yields no points is an error in either format, so the
//! analyzer only ever receives complete, non-empty sequences.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use rustfft::num_complex::Complex64;
use thiserror::Error;
use tracing::{debug, info, warn};

const HEADER_SIZE: usize = 4;
const RECORD_SIZE: usize = 16;

/// Width of the bounding box after [`normalize`].
pub const NORMALIZED_EXTENT: f64 = 10.0;

/// Loops shorter than this are treated as a single point.
const MIN_LOOP_LENGTH: f64 = 1e-12;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("failed to access path file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("path data ended before the point count header")]
    MissingHeader,
    #[error("path data contains no points")]
    Empty,
    #[error("path data is truncated: expected {expected} points, found {found}")]
    Truncated { expected: usize, found: usize },
    #[error("{count} points do not fit the binary point count header")]
    TooManyPoints { count: usize },
}

/// On-disk encodings of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathFormat {
    Binary,
    Text,
}

impl PathFormat {
    /// Picks the format from a file extension: `.txt` and `.csv` are text,
    /// everything else is binary.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("txt") || ext.eq_ignore_ascii_case("csv") => {
                PathFormat::Text
            }
            _ => PathFormat::Binary,
        }
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> PathError + '_ {
    move |source| PathError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn read_f64(bytes: &[u8]) -> f64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    f64::from_le_bytes(buf)
}

/// Decodes a binary path.
///
/// # Arguments
/// * `bytes` - Whole file contents
///
/// # Returns
/// * `Ok(points)` - Exactly as many points as the header declares; bytes
///   after the last record are ignored
/// * `Err(e)` - Missing header, zero count, or fewer records than declared
pub fn parse_binary(bytes: &[u8]) -> Result<Vec<Complex64>, PathError> {
    if bytes.len() < HEADER_SIZE {
        return Err(PathError::MissingHeader);
    }
    let mut header = [0u8; HEADER_SIZE];
    header.copy_from_slice(&bytes[..HEADER_SIZE]);
    let expected = u32::from_le_bytes(header) as usize;
    if expected == 0 {
        return Err(PathError::Empty);
    }

    let body = &bytes[HEADER_SIZE..];
    let found = body.len() / RECORD_SIZE;
    if found < expected {
        return Err(PathError::Truncated { expected, found });
    }
    if body.len() > expected * RECORD_SIZE {
        debug!(
            extra_bytes = body.len() - expected * RECORD_SIZE,
            "ignoring data after the last point"
        );
    }

    Ok(body
        .chunks_exact(RECORD_SIZE)
        .take(expected)
        .map(|record| Complex64::new(read_f64(&record[..8]), read_f64(&record[8..])))
        .collect())
}

/// Encodes points in the binary path format.
pub fn encode_binary(points: &[Complex64]) -> Result<Vec<u8>, PathError> {
    let count = u32::try_from(points.len()).map_err(|_| PathError::TooManyPoints {
        count: points.len(),
    })?;
    let mut bytes = Vec::with_capacity(HEADER_SIZE + points.len() * RECORD_SIZE);
    bytes.extend_from_slice(&count.to_le_bytes());
    for p in points {
        bytes.extend_from_slice(&p.re.to_le_bytes());
        bytes.extend_from_slice(&p.im.to_le_bytes());
    }
    Ok(bytes)
}

fn parse_point(line: &str) -> Option<Complex64> {
    let (re, im) = line.split_once(',')?;
    Some(Complex64::new(re.trim().parse().ok()?, im.trim().parse().ok()?))
}

/// Decodes a text path.
pub fn parse_text(text: &str) -> Result<Vec<Complex64>, PathError> {
    let mut points = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_point(line) {
            Some(point) => points.push(point),
            None => warn!(line = index + 1, content = line, "skipping unparseable path line"),
        }
    }

    if points.is_empty() {
        return Err(PathError::Empty);
    }
    Ok(points)
}

/// Encodes points in the text path format.
///
/// Values are written with round-trip precision.
pub fn encode_text(points: &[Complex64]) -> String {
    let mut text = format!("# {} points (real,imaginary)\n", points.len());
    for p in points {
        // Writing to a String cannot fail.
        let _ = writeln!(text, "{},{}", p.re, p.im);
    }
    text
}

/// Resamples a closed path to `samples` points evenly spaced by arc length.
///
/// The transform treats samples as evenly spaced in time, so paths traced
/// with uneven point density should pass through here first. The loop is
/// closed (last point joins the first) and sample `k` sits at fraction
/// `k / samples` of the perimeter, so the start point is not duplicated.
///
/// # Arguments
/// * `points` - Ordered path
/// * `samples` - Number of output points
///
/// # Returns
/// * The resampled path. Fewer than two input points or zero `samples`
///   return the input unchanged; a loop of (near) zero length repeats its
///   first point.
pub fn resample_evenly(points: &[Complex64], samples: usize) -> Vec<Complex64> {
    let n = points.len();
    if n < 2 || samples == 0 {
        return points.to_vec();
    }

    let lengths: Vec<f64> = (0..n)
        .map(|i| (points[(i + 1) % n] - points[i]).norm())
        .collect();
    let total: f64 = lengths.iter().sum();
    if total <= MIN_LOOP_LENGTH {
        return vec![points[0]; samples];
    }

    // cumulative[i] is the arc length at the start of segment i.
    let mut cumulative = Vec::with_capacity(n + 1);
    cumulative.push(0.0);
    let mut running = 0.0;
    for length in &lengths {
        running += length;
        cumulative.push(running);
    }

    (0..samples)
        .map(|k| {
            let distance = total * k as f64 / samples as f64;
            let segment = cumulative
                .partition_point(|&c| c <= distance)
                .saturating_sub(1)
                .min(n - 1);
            let start = points[segment];
            let end = points[(segment + 1) % n];
            let length = if lengths[segment] > 0.0 { lengths[segment] } else { 1.0 };
            let u = (distance - cumulative[segment]) / length;
            start + (end - start) * u
        })
        .collect()
}

/// Centers a path's bounding box on the origin and scales its larger side
/// to [`NORMALIZED_EXTENT`].
///
/// A path with zero extent is only centered.
pub fn normalize(points: &[Complex64]) -> Vec<Complex64> {
    if points.is_empty() {
        return Vec::new();
    }

    let (mut min_re, mut max_re) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_im, mut max_im) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in points {
        min_re = min_re.min(p.re);
        max_re = max_re.max(p.re);
        min_im = min_im.min(p.im);
        max_im = max_im.max(p.im);
    }

    let center = Complex64::new((max_re + min_re) / 2.0, (max_im + min_im) / 2.0);
    let extent = (max_re - min_re).max(max_im - min_im);
    let scale = if extent > 0.0 { NORMALIZED_EXTENT / extent } else { 1.0 };

    points.iter().map(|&p| (p - center) * scale).collect()
}

/// Reads a binary path file.
///
/// # Arguments
/// * `path` - File to read
///
/// # Returns
/// * `Ok(points)` - The complete, non-empty point sequence
/// * `Err(e)` - IO failure, or data rejected by [`parse_binary`]
pub fn load_binary(path: impl AsRef<Path>) -> Result<Vec<Complex64>, PathError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(io_error(path))?;
    let points = parse_binary(&bytes)?;
    info!(path = %path.display(), points = points.len(), "loaded binary path");
    Ok(points)
}

/// Reads a text path file; see [`parse_text`] for the accepted lines.
pub fn load_text(path: impl AsRef<Path>) -> Result<Vec<Complex64>, PathError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(io_error(path))?;
    let points = parse_text(&text)?;
    info!(path = %path.display(), points = points.len(), "loaded text path");
    Ok(points)
}

/// Loads a path, choosing the format from the file extension.
pub fn load_path(path: impl AsRef<Path>) -> Result<Vec<Complex64>, PathError> {
    let path = path.as_ref();
    match PathFormat::from_path(path) {
        PathFormat::Binary => load_binary(path),
        PathFormat::Text => load_text(path),
    }
}

/// Writes `points` as a binary path file, replacing any existing file.
///
/// # Returns
/// * `Err(PathError::TooManyPoints)` - The count does not fit in a `u32`
/// * `Err(PathError::Io)` - The file could not be written
pub fn save_binary(path: impl AsRef<Path>, points: &[Complex64]) -> Result<(), PathError> {
    let path = path.as_ref();
    let bytes = encode_binary(points)?;
    fs::write(path, bytes).map_err(io_error(path))?;
    info!(path = %path.display(), points = points.len(), "saved binary path");
    Ok(())
}

/// Writes `points` as a text path file with a one-line comment header.
pub fn save_text(path: impl AsRef<Path>, points: &[Complex64]) -> Result<(), PathError> {
    let path = path.as_ref();
    fs::write(path, encode_text(points)).map_err(io_error(path))?;
    info!(path = %path.display(), points = points.len(), "saved text path");
    Ok(())
}

/// Saves a path, choosing the format from the file extension.
pub fn save_path(path: impl AsRef<Path>, points: &[Complex64]) -> Result<(), PathError> {
    let path = path.as_ref();
    match PathFormat::from_path(path) {
        PathFormat::Binary => save_binary(path, points),
        PathFormat::Text => save_text(path, points),
    }
}
