//! Batch orchestration
//!
//! Resolves the input path into a list of encode jobs and runs one
//! worker per file on the rayon pool. Per-file failures are collected
//! into the run summary and never spill into other files; only a
//! platform error tears the whole run down.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, error};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::pipeline::{self, EncodeOptions};

/// Settings for one batch invocation.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Descend into subdirectories when the input is a directory.
    pub recursive: bool,
    /// Explicit output path, single-file input only.
    pub output: Option<PathBuf>,
    pub encode: EncodeOptions,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Files encoded successfully.
    pub encoded: usize,
    /// Failed files with the error that stopped each one.
    pub failed: Vec<(PathBuf, Error)>,
}

impl BatchSummary {
    pub fn all_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Encode a single file or every `.wav` under a directory.
pub fn run(input: &Path, opts: &BatchOptions) -> Result<BatchSummary> {
    if input.is_dir() {
        if opts.output.is_some() {
            return Err(Error::invalid_input(
                "an output path only applies to a single input file",
            ));
        }
        let files = discover(input, opts.recursive);
        let jobs: Vec<(PathBuf, PathBuf)> = files
            .into_iter()
            .map(|path| {
                let output = output_path(&path);
                (path, output)
            })
            .collect();
        encode_all(&jobs, &opts.encode)
    } else if input.is_file() {
        let output = match &opts.output {
            Some(path) => path.with_extension("mp3"),
            None => output_path(input),
        };
        encode_all(&[(input.to_path_buf(), output)], &opts.encode)
    } else {
        Err(Error::invalid_input(format!(
            "no such input: {}",
            input.display()
        )))
    }
}

/// Collect the `.wav` regular files under `dir` in a stable order.
///
/// Unreadable entries and symlinks are skipped, matching a plain
/// directory scan.
fn discover(dir: &Path, recursive: bool) -> Vec<PathBuf> {
    let depth = if recursive { usize::MAX } else { 1 };

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(depth)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_wav(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    for path in &files {
        debug!("queued {}", path.display());
    }
    files
}

/// Extension check, ASCII case-insensitive.
fn is_wav(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("wav"))
        .unwrap_or(false)
}

/// Output path next to the input, extension swapped for `.mp3`.
fn output_path(input: &Path) -> PathBuf {
    input.with_extension("mp3")
}

/// Run every job on the worker pool and fold the results.
fn encode_all(jobs: &[(PathBuf, PathBuf)], opts: &EncodeOptions) -> Result<BatchSummary> {
    let results: Vec<(PathBuf, Result<()>)> = jobs
        .par_iter()
        .map(|(input, output)| {
            let result = pipeline::encode_file(input, output, opts);
            if let Err(e) = &result {
                error!("{}: {}", input.display(), e);
            }
            (input.clone(), result)
        })
        .collect();

    let mut summary = BatchSummary::default();
    for (path, result) in results {
        match result {
            Ok(()) => summary.encoded += 1,
            Err(e) if e.is_run_fatal() => return Err(e),
            Err(e) => summary.failed.push((path, e)),
        }
    }
    Ok(summary)
}
