//! Build configuration
//!
//! Loaded from TOML. Every field has a default so an empty file (or no file at
//! all) reproduces the stock generator behavior.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{output, paths};
use crate::error::{invalid_config, GenError, GenResult};

/// Settings shared by every file of one generator run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Root that third-party includes resolve against
    pub build_root: PathBuf,

    /// Include prefix denoting the vendored third-party tree
    pub thirdparty_prefix: String,

    /// Appended to each source path to form its output path
    pub output_suffix: String,

    /// Process independent files on the rayon pool
    pub parallel: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            build_root: PathBuf::from(paths::DEFAULT_BUILD_ROOT),
            thirdparty_prefix: paths::THIRDPARTY_PREFIX.to_string(),
            output_suffix: output::GENERATED_SUFFIX.to_string(),
            parallel: true,
        }
    }
}

impl BuildConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> GenResult<Self> {
        let config: BuildConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> GenResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| GenError::ConfigUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        log::debug!("Loaded build configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> GenResult<()> {
        if self.thirdparty_prefix.is_empty() {
            return Err(invalid_config("thirdparty_prefix", "must not be empty"));
        }
        if self.output_suffix.is_empty() {
            return Err(invalid_config("output_suffix", "must not be empty"));
        }
        if self.build_root.as_os_str().is_empty() {
            return Err(invalid_config("build_root", "must not be empty"));
        }
        Ok(())
    }

    /// Output path for `source`: the source path with the suffix appended
    pub fn output_path_for(&self, source: &Path) -> PathBuf {
        let mut name = source.as_os_str().to_os_string();
        name.push(&self.output_suffix);
        PathBuf::from(name)
    }
}
