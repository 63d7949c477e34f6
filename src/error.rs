//! Generator error handling
//!
//! Only conditions that stop a single file's generation live here. Everything
//! recoverable (missing includes, cycles, out-of-range characters) is reported
//! as a [`Diagnostic`](crate::shader::Diagnostic) instead and never surfaces as
//! an error.

use std::path::{Path, PathBuf};

/// Result type for generator operations
pub type GenResult<T> = Result<T, GenError>;

/// Errors that abort the generation of one file
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error("Failed to read shader source {}: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write generated file {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Shader source path has no file name: {}", path.display())]
    InvalidSourcePath { path: PathBuf },

    #[error("Failed to read build configuration {}: {source}", path.display())]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse build configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid build configuration: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },
}

/// Helper trait attaching a path to I/O failures
pub trait GenErrorContext<T> {
    /// Map a failed read of `path` to [`GenError::SourceUnreadable`]
    fn source_context(self, path: &Path) -> GenResult<T>;

    /// Map a failed write of `path` to [`GenError::OutputWrite`]
    fn output_context(self, path: &Path) -> GenResult<T>;
}

impl<T> GenErrorContext<T> for Result<T, std::io::Error> {
    fn source_context(self, path: &Path) -> GenResult<T> {
        self.map_err(|source| GenError::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        })
    }

    fn output_context(self, path: &Path) -> GenResult<T> {
        self.map_err(|source| GenError::OutputWrite {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Create an invalid configuration error
pub fn invalid_config(field: &str, reason: impl std::fmt::Display) -> GenError {
    GenError::InvalidConfig {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
