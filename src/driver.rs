//! Batch driver
//!
//! Runs one generator pipeline per source path. Every file owns its own
//! traversal state and output file, so files are processed on the rayon pool
//! when the configuration allows it. A failing file never stops the others.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::config::BuildConfig;
use crate::error::{GenError, GenResult};
use crate::raw::{self, RawHeader};
use crate::shader::{self, Diagnostic, GeneratedUnit};

/// Which generator to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    /// Stage-aware headers wrapping a `ShaderRD` class
    Staged,
    /// Single-array headers of the fully inlined source
    Raw,
}

/// Anything the driver can report on after writing it
pub trait GeneratedHeader {
    fn path(&self) -> &Path;
    fn diagnostics(&self) -> &[Diagnostic];
}

impl GeneratedHeader for GeneratedUnit {
    fn path(&self) -> &Path {
        GeneratedUnit::path(self)
    }

    fn diagnostics(&self) -> &[Diagnostic] {
        GeneratedUnit::diagnostics(self)
    }
}

impl GeneratedHeader for RawHeader {
    fn path(&self) -> &Path {
        RawHeader::path(self)
    }

    fn diagnostics(&self) -> &[Diagnostic] {
        RawHeader::diagnostics(self)
    }
}

/// A source whose generation failed outright
#[derive(Debug)]
pub struct BuildFailure {
    pub source: PathBuf,
    pub error: GenError,
}

/// Outcome of one batch
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Written output files, in input order
    pub generated: Vec<PathBuf>,
    /// Advisory diagnostics of every written file
    pub diagnostics: Vec<Diagnostic>,
    /// Sources that produced no output
    pub failures: Vec<BuildFailure>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn record<T: GeneratedHeader>(&mut self, source: PathBuf, result: GenResult<T>) {
        match result {
            Ok(header) => {
                self.generated.push(header.path().to_path_buf());
                self.diagnostics.extend_from_slice(header.diagnostics());
            }
            Err(error) => {
                log::error!("{}", error);
                self.failures.push(BuildFailure { source, error });
            }
        }
    }
}

/// Build a staged header for every path
pub fn build_rd_headers(paths: &[PathBuf], config: &BuildConfig) -> BuildReport {
    run_batch(paths, config, shader::build_rd_header)
}

/// Build a raw header for every path
pub fn build_raw_headers(paths: &[PathBuf], config: &BuildConfig) -> BuildReport {
    run_batch(paths, config, raw::build_raw_header)
}

pub fn build_headers(kind: HeaderKind, paths: &[PathBuf], config: &BuildConfig) -> BuildReport {
    match kind {
        HeaderKind::Staged => build_rd_headers(paths, config),
        HeaderKind::Raw => build_raw_headers(paths, config),
    }
}

fn run_batch<T, F>(paths: &[PathBuf], config: &BuildConfig, build: F) -> BuildReport
where
    T: GeneratedHeader + Send,
    F: Fn(&Path, &BuildConfig) -> GenResult<T> + Sync,
{
    let results: Vec<GenResult<T>> = if config.parallel {
        paths.par_iter().map(|path| build(path.as_path(), config)).collect()
    } else {
        paths.iter().map(|path| build(path.as_path(), config)).collect()
    };

    let mut report = BuildReport::default();
    for (path, result) in paths.iter().zip(results) {
        report.record(path.clone(), result);
    }

    log::info!(
        "Generated {} header(s), {} failure(s), {} diagnostic(s)",
        report.generated.len(),
        report.failures.len(),
        report.diagnostics.len()
    );
    report
}
