//! Include statement parsing and path resolution

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::config::BuildConfig;
use crate::constants::markers;

/// One include statement found on a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeStatement<'a> {
    /// The path between the delimiters
    Path(&'a str),
    /// Statement text that has no closing delimiter
    Malformed(&'a str),
}

/// Whether `line` carries at least one include statement
pub fn contains_include(line: &str) -> bool {
    line.contains(markers::INCLUDE)
}

/// Parse every include statement on `line`, in order
///
/// Supports both `#include "file.glsl"` and `#include <file.glsl>`.
pub fn parse_includes(line: &str) -> Vec<IncludeStatement<'_>> {
    let mut statements = Vec::new();
    let mut rest = line;

    while let Some(start) = rest.find(markers::INCLUDE) {
        let statement = &rest[start..];
        let after = statement[markers::INCLUDE.len()..].trim_start();

        let close = match after.chars().next() {
            Some('"') => '"',
            Some('<') => '>',
            _ => {
                statements.push(IncludeStatement::Malformed(statement.trim_end()));
                break;
            }
        };

        match after[1..].find(close) {
            Some(end) => {
                statements.push(IncludeStatement::Path(&after[1..1 + end]));
                rest = &after[1 + end + 1..];
            }
            None => {
                statements.push(IncludeStatement::Malformed(statement.trim_end()));
                break;
            }
        }
    }

    statements
}

/// A normalized include target; equal spellings compare equal
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResolvedInclude(PathBuf);

impl ResolvedInclude {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self(canonical_path(path.as_ref()))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for ResolvedInclude {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ResolvedInclude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Resolves include paths against the including file or the build root
#[derive(Debug, Clone)]
pub struct IncludeResolver {
    build_root: PathBuf,
    thirdparty_prefix: String,
}

impl IncludeResolver {
    pub fn new(build_root: impl Into<PathBuf>, thirdparty_prefix: impl Into<String>) -> Self {
        Self {
            build_root: build_root.into(),
            thirdparty_prefix: thirdparty_prefix.into(),
        }
    }

    pub fn from_config(config: &BuildConfig) -> Self {
        Self::new(config.build_root.clone(), config.thirdparty_prefix.clone())
    }

    /// Resolve `include` as written in `including_file`
    ///
    /// Vendored third-party paths resolve against the build root; everything
    /// else resolves against the including file's directory.
    pub fn resolve(&self, include: &str, including_file: &Path) -> ResolvedInclude {
        if include.starts_with(&self.thirdparty_prefix) {
            ResolvedInclude::new(self.build_root.join(include))
        } else {
            resolve_relative(include, including_file)
        }
    }
}

impl Default for IncludeResolver {
    fn default() -> Self {
        Self::from_config(&BuildConfig::default())
    }
}

/// Resolve `include` against the directory of `including_file` only
pub fn resolve_relative(include: &str, including_file: &Path) -> ResolvedInclude {
    let dir = including_file.parent().unwrap_or(Path::new(""));
    ResolvedInclude::new(dir.join(include))
}

/// Absolute, lexically normalized form of `path`
///
/// Relative paths are anchored at the working directory, so a relative and an
/// absolute spelling of the same file compare equal.
pub fn canonical_path(path: &Path) -> PathBuf {
    let anchored = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    normalize_path(&anchored)
}

/// Lexically fold `.` and `..` segments
///
/// Leading `..` segments of a relative path are kept since there is nothing to
/// fold them into; `..` directly under the root is dropped.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        PathBuf::from(".")
    } else {
        parts.iter().collect()
    }
}
