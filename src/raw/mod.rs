//! Raw (stage-unaware) header generation
//!
//! Inlines every `#include` recursively into one text stream and embeds it as
//! a single array. There is no stage routing, no comment stripping and no
//! per-path deduplication: a file included twice appears twice. Include
//! resolution is always relative to the including file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::BuildConfig;
use crate::constants::output;
use crate::error::{GenError, GenErrorContext, GenResult};
use crate::shader::emitter::{include_guard_stem, output_file_name, push_array_body};
use crate::shader::include::{
    canonical_path, contains_include, parse_includes, resolve_relative, IncludeStatement,
};
use crate::shader::source::{physical_lines, read_source};
use crate::shader::{encode_text, ByteStream, Diagnostic, Diagnostics};

/// Fully inlined text of one root file
#[derive(Debug, Clone)]
pub struct RawShader {
    source: PathBuf,
    code: String,
    diagnostics: Vec<Diagnostic>,
}

impl RawShader {
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Inline every include of `root`
pub fn flatten_raw(root: &Path) -> GenResult<RawShader> {
    let source = read_source(root).source_context(root)?;

    let mut walker = RawWalker::default();
    walker.stack.push(canonical_path(root));
    walker.walk(root, &source);

    Ok(RawShader {
        source: root.to_path_buf(),
        code: walker.code,
        diagnostics: walker.diagnostics.into_vec(),
    })
}

#[derive(Default)]
struct RawWalker {
    code: String,
    stack: Vec<PathBuf>,
    diagnostics: Diagnostics,
}

impl RawWalker {
    fn walk(&mut self, file: &Path, source: &str) {
        for line in physical_lines(source) {
            if contains_include(line.text) {
                for statement in parse_includes(line.text) {
                    self.expand(file, statement);
                }
                continue;
            }

            self.code.push_str(line.text);
            if line.terminated {
                self.code.push('\n');
            }
        }
    }

    fn expand(&mut self, file: &Path, statement: IncludeStatement<'_>) {
        let include = match statement {
            IncludeStatement::Path(include) => include,
            IncludeStatement::Malformed(text) => {
                self.diagnostics.report(Diagnostic::MalformedInclude {
                    file: file.to_path_buf(),
                    text: text.to_string(),
                });
                return;
            }
        };

        let resolved = resolve_relative(include, file).into_path_buf();
        if self.stack.contains(&resolved) {
            self.diagnostics.report(Diagnostic::IncludeCycle {
                including_file: file.to_path_buf(),
                include: include.to_string(),
                resolved,
                stage: None,
            });
            return;
        }

        match read_source(&resolved) {
            Ok(source) => {
                self.stack.push(resolved.clone());
                self.walk(&resolved, &source);
                self.stack.pop();
            }
            Err(e) => self.diagnostics.report(Diagnostic::UnresolvedInclude {
                including_file: file.to_path_buf(),
                include: include.to_string(),
                resolved,
                reason: e.to_string(),
            }),
        }
    }
}

/// One generated raw header, ready to be written
#[derive(Debug, Clone)]
pub struct RawHeader {
    path: PathBuf,
    symbol: String,
    include_guard: String,
    stream: ByteStream,
    text: String,
    diagnostics: Vec<Diagnostic>,
}

impl RawHeader {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the emitted array
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn include_guard(&self) -> &str {
        &self.include_guard
    }

    pub fn stream(&self) -> &ByteStream {
        &self.stream
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn write(&self) -> GenResult<()> {
        fs::write(&self.path, &self.text).output_context(&self.path)
    }
}

/// Array symbol for an output file: `copy.glsl.gen.h` becomes `copy_shader_glsl`
pub fn raw_symbol_for(file_name: &str, output_suffix: &str) -> String {
    let generated_ext = format!("{}{}", output::SOURCE_EXTENSION, output_suffix);
    file_name.replace(&generated_ext, output::RAW_SYMBOL_SUFFIX)
}

/// Render the raw header for an already flattened shader
pub fn emit_raw_header(
    shader: RawShader,
    output_path: PathBuf,
    output_suffix: &str,
) -> GenResult<RawHeader> {
    let file_name = output_file_name(&output_path);
    if file_name.is_empty() {
        return Err(GenError::InvalidSourcePath {
            path: shader.source.clone(),
        });
    }

    let symbol = raw_symbol_for(&file_name, output_suffix);
    let include_guard = format!("{}{}", include_guard_stem(&symbol), output::RAW_GUARD_SUFFIX);
    let stream = encode_text(&shader.code);

    let mut text = String::new();
    text.push_str(output::BANNER);
    text.push('\n');
    text.push_str(&format!("#ifndef {include_guard}\n"));
    text.push_str(&format!("#define {include_guard}\n"));
    text.push('\n');
    text.push_str(&format!("static const char {symbol}[] = {{\n"));
    push_array_body(&mut text, &stream);
    text.push_str("#endif\n");

    Ok(RawHeader {
        path: output_path,
        symbol,
        include_guard,
        stream,
        text,
        diagnostics: shader.diagnostics,
    })
}

/// Flatten and render `source` without touching the output file
pub fn generate_raw_header(source: &Path, config: &BuildConfig) -> GenResult<RawHeader> {
    let shader = flatten_raw(source)?;
    emit_raw_header(shader, config.output_path_for(source), &config.output_suffix)
}

/// Generate the raw header for `source` and write it next to the source
pub fn build_raw_header(source: &Path, config: &BuildConfig) -> GenResult<RawHeader> {
    log::info!("build_raw_header: {}", source.display());

    let header = generate_raw_header(source, config)?;
    header.write()?;
    Ok(header)
}
