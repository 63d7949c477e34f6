//! Staged shader header generation
//!
//! A staged source is partitioned into shader stages by `#[vertex]`,
//! `#[fragment]`, `#[compute]`, `#[tesc]`, `#[tese]`, `#[task]` and `#[mesh]`
//! markers. Each stage is flattened (includes expanded in place, once per stage),
//! encoded as character codes and embedded in a generated class whose
//! constructor wires the arrays together with a single `setup(...)` call.
//!
//! Pipeline: source file -> [`Flattener`] -> [`FlattenedShader`] ->
//! [`emit_rd_header`] -> [`GeneratedUnit`] -> output file.

pub mod comment;
pub mod diagnostics;
pub mod emitter;
pub mod encoder;
pub mod flatten;
pub mod include;
pub mod source;
pub mod stage;

use std::path::Path;

use crate::config::BuildConfig;
use crate::error::GenResult;

pub use comment::{strip_line_comment, strip_line_ending};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use emitter::{class_name_for, emit_rd_header, Dispatch, GeneratedUnit};
pub use encoder::{encode_stage, encode_text, ByteStream};
pub use flatten::{FlattenState, FlattenedShader, Flattener};
pub use include::{IncludeResolver, ResolvedInclude};
pub use stage::{Stage, StageBuffer, StageSet};

/// Flatten `source` and render its header without touching the output file
pub fn generate_rd_header(source: &Path, config: &BuildConfig) -> GenResult<GeneratedUnit> {
    let resolver = IncludeResolver::from_config(config);
    let flattened = Flattener::new(&resolver).flatten_file(source)?;
    emit_rd_header(flattened, config.output_path_for(source), &config.output_suffix)
}

/// Generate the header for `source` and write it next to the source
pub fn build_rd_header(source: &Path, config: &BuildConfig) -> GenResult<GeneratedUnit> {
    log::info!("build_rd_header: {}", source.display());

    let unit = generate_rd_header(source, config)?;
    unit.write()?;

    if !unit.diagnostics().is_empty() {
        log::warn!(
            "{} generated with {} diagnostic(s)",
            unit.path().display(),
            unit.diagnostics().len()
        );
    }
    Ok(unit)
}
