//! Stage-aware include flattening
//!
//! Walks a staged source line by line, switching the active stage on directive
//! markers and expanding includes in place. One [`FlattenState`] is threaded by
//! `&mut` through the whole depth-first traversal of a root file; it is the only
//! thing the traversal writes to.
//!
//! Every physical line is classified on its own: a directive on the line right
//! after an include still switches stages, and a file ending on an include adds
//! no trailing empty line. Older generators skipped the directive check on that
//! line and appended the empty one, so their output differs for such sources.

use std::path::{Path, PathBuf};

use crate::error::{GenErrorContext, GenResult};

use super::comment::{strip_line_comment, strip_line_ending};
use super::diagnostics::{Diagnostic, Diagnostics};
use super::include::{
    canonical_path, contains_include, parse_includes, IncludeResolver, IncludeStatement,
};
use super::source::{physical_lines, read_source};
use super::stage::{Stage, StageSet};

/// Traversal context for one root file
#[derive(Debug, Default)]
pub struct FlattenState {
    active: Option<Stage>,
    line_offset: usize,
    stage_offsets: [Option<usize>; Stage::COUNT],
    stages: StageSet,
    include_stack: Vec<PathBuf>,
    diagnostics: Diagnostics,
}

impl FlattenState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_stage(&self) -> Option<Stage> {
        self.active
    }

    /// Physical lines consumed so far, across every file
    pub fn line_offset(&self) -> usize {
        self.line_offset
    }

    pub fn stage_offset(&self, stage: Stage) -> Option<usize> {
        self.stage_offsets[stage.index()]
    }

    pub fn stages(&self) -> &StageSet {
        &self.stages
    }

    pub fn advance_line(&mut self) {
        self.line_offset += 1;
    }

    /// Switch to `stage`, recording its start offset on first activation
    pub fn activate(&mut self, stage: Stage) {
        self.active = Some(stage);
        let offset = &mut self.stage_offsets[stage.index()];
        if offset.is_none() {
            *offset = Some(self.line_offset);
        }
    }

    /// Append to the active stage; returns false (dropping the line) when no
    /// stage is active
    pub fn append_to_active(&mut self, line: String) -> bool {
        match self.active {
            Some(stage) => {
                self.stages.get_mut(stage).push_line(line);
                true
            }
            None => false,
        }
    }

    /// Record `path` in the active stage's dedup set; false if it was already
    /// there or no stage is active
    pub fn mark_included(&mut self, path: &Path) -> bool {
        match self.active {
            Some(stage) => self.stages.get_mut(stage).mark_included(path),
            None => false,
        }
    }

    /// Whether `path` is currently being expanded somewhere up the stack
    pub fn is_expanding(&self, path: &Path) -> bool {
        self.include_stack.iter().any(|open| open == path)
    }

    fn enter(&mut self, path: PathBuf) {
        self.include_stack.push(path);
    }

    fn leave(&mut self) {
        self.include_stack.pop();
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.report(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.entries()
    }

    fn finish(self, source: PathBuf) -> FlattenedShader {
        FlattenedShader {
            source,
            stages: self.stages,
            stage_offsets: self.stage_offsets,
            lines_consumed: self.line_offset,
            diagnostics: self.diagnostics,
        }
    }
}

/// Read-only result of flattening one root file
#[derive(Debug, Clone)]
pub struct FlattenedShader {
    source: PathBuf,
    stages: StageSet,
    stage_offsets: [Option<usize>; Stage::COUNT],
    lines_consumed: usize,
    diagnostics: Diagnostics,
}

impl FlattenedShader {
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn stages(&self) -> &StageSet {
        &self.stages
    }

    pub fn lines(&self, stage: Stage) -> &[String] {
        self.stages.get(stage).lines()
    }

    /// Line counter value right after the stage's first directive
    pub fn stage_offset(&self, stage: Stage) -> Option<usize> {
        self.stage_offsets[stage.index()]
    }

    pub fn lines_consumed(&self) -> usize {
        self.lines_consumed
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.entries()
    }

    pub(crate) fn take_diagnostics(&mut self) -> Diagnostics {
        std::mem::take(&mut self.diagnostics)
    }
}

/// Flattens staged sources using one include resolver
pub struct Flattener<'a> {
    resolver: &'a IncludeResolver,
}

impl<'a> Flattener<'a> {
    pub fn new(resolver: &'a IncludeResolver) -> Self {
        Self { resolver }
    }

    /// Flatten the file at `root`
    ///
    /// Failing to read the root is the only error; every problem with an
    /// included file is reported as a diagnostic instead.
    pub fn flatten_file(&self, root: &Path) -> GenResult<FlattenedShader> {
        let source = read_source(root).source_context(root)?;
        Ok(self.flatten_source(root, &source))
    }

    /// Flatten `source` as if it had been read from `root`
    pub fn flatten_source(&self, root: &Path, source: &str) -> FlattenedShader {
        let mut state = FlattenState::new();

        state.enter(canonical_path(root));
        self.walk(root, source, &mut state);
        state.leave();

        log::debug!(
            "Flattened {} ({} lines consumed)",
            root.display(),
            state.line_offset()
        );
        state.finish(root.to_path_buf())
    }

    fn walk(&self, file: &Path, source: &str, state: &mut FlattenState) {
        for line in physical_lines(source) {
            self.route_line(file, line.text, state);
        }
    }

    fn route_line(&self, file: &Path, raw: &str, state: &mut FlattenState) {
        state.advance_line();

        let scan = strip_line_comment(raw);
        if let Some(stage) = Stage::from_directive_line(scan) {
            state.activate(stage);
            return;
        }

        // Preamble before the first directive is never stored
        if state.active_stage().is_none() {
            return;
        }

        if contains_include(scan) {
            for statement in parse_includes(scan) {
                self.expand_statement(file, statement, state);
            }
            return;
        }

        state.append_to_active(strip_line_ending(strip_line_comment(raw)));
    }

    fn expand_statement(
        &self,
        file: &Path,
        statement: IncludeStatement<'_>,
        state: &mut FlattenState,
    ) {
        let include = match statement {
            IncludeStatement::Path(include) => include,
            IncludeStatement::Malformed(text) => {
                state.report(Diagnostic::MalformedInclude {
                    file: file.to_path_buf(),
                    text: text.to_string(),
                });
                return;
            }
        };

        let resolved = self.resolver.resolve(include, file);
        if !state.mark_included(resolved.as_path()) {
            return;
        }

        if state.is_expanding(resolved.as_path()) {
            state.report(Diagnostic::IncludeCycle {
                including_file: file.to_path_buf(),
                include: include.to_string(),
                resolved: resolved.into_path_buf(),
                stage: state.active_stage(),
            });
            return;
        }

        let source = match read_source(resolved.as_path()) {
            Ok(source) => source,
            Err(e) => {
                state.report(Diagnostic::UnresolvedInclude {
                    including_file: file.to_path_buf(),
                    include: include.to_string(),
                    resolved: resolved.into_path_buf(),
                    reason: e.to_string(),
                });
                return;
            }
        };

        log::debug!(
            "Expanding {} into {} stage",
            resolved,
            state.active_stage().map_or("none", Stage::tag)
        );

        let path = resolved.into_path_buf();
        state.enter(path.clone());
        self.walk(&path, &source, state);
        state.leave();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenError;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn flatten(root: &Path) -> FlattenedShader {
        let resolver = IncludeResolver::default();
        Flattener::new(&resolver).flatten_file(root).unwrap()
    }

    #[test]
    fn test_preamble_is_discarded() {
        let dir = TempDir::new().unwrap();
        let root = write(&dir, "plain.glsl", "#version 450\nvoid main() {}\n");

        let flattened = flatten(&root);
        assert!(flattened.stages().is_empty());
        assert_eq!(flattened.lines_consumed(), 2);
    }

    #[test]
    fn test_lines_route_to_active_stage() {
        let dir = TempDir::new().unwrap();
        let root = write(
            &dir,
            "sky.glsl",
            "ignored\n#[vertex]\nx // vertex comment\n#[fragment] trailing\ny\r\n",
        );

        let flattened = flatten(&root);
        assert_eq!(flattened.lines(Stage::Vertex), ["x "]);
        assert_eq!(flattened.lines(Stage::Fragment), ["y"]);
        assert!(flattened.diagnostics().is_empty());
    }

    #[test]
    fn test_stage_offsets_record_first_activation() {
        let dir = TempDir::new().unwrap();
        let root = write(
            &dir,
            "offsets.glsl",
            "#[vertex]\na\n#[fragment]\nb\n#[vertex]\nc\n",
        );

        let flattened = flatten(&root);
        assert_eq!(flattened.stage_offset(Stage::Vertex), Some(1));
        assert_eq!(flattened.stage_offset(Stage::Fragment), Some(3));
        assert_eq!(flattened.stage_offset(Stage::Compute), None);
        assert_eq!(flattened.lines(Stage::Vertex), ["a", "c"]);
    }

    #[test]
    fn test_include_is_deduplicated_per_stage() {
        let dir = TempDir::new().unwrap();
        write(&dir, "common.glsl", "shared\n");
        let root = write(
            &dir,
            "main.glsl",
            "#[vertex]\n#include \"common.glsl\"\n#include \"./common.glsl\"\nv\n\
             #[fragment]\n#include \"common.glsl\"\nf\n",
        );

        let flattened = flatten(&root);
        assert_eq!(flattened.lines(Stage::Vertex), ["shared", "v"]);
        assert_eq!(flattened.lines(Stage::Fragment), ["shared", "f"]);
    }

    #[test]
    fn test_included_directive_switches_parent_stage() {
        let dir = TempDir::new().unwrap();
        write(&dir, "switch.glsl", "in_vertex\n#[fragment]\nin_fragment\n");
        let root = write(&dir, "main.glsl", "#[vertex]\n#include \"switch.glsl\"\nafter\n");

        let flattened = flatten(&root);
        assert_eq!(flattened.lines(Stage::Vertex), ["in_vertex"]);
        assert_eq!(flattened.lines(Stage::Fragment), ["in_fragment", "after"]);
    }

    #[test]
    fn test_directive_after_include_is_honored() {
        let dir = TempDir::new().unwrap();
        write(&dir, "common.glsl", "shared\n");
        let root = write(
            &dir,
            "main.glsl",
            "#[vertex]\n#include \"common.glsl\"\n#[fragment]\nf\n#include \"common.glsl\"",
        );

        let flattened = flatten(&root);
        assert_eq!(flattened.lines(Stage::Vertex), ["shared"]);
        assert_eq!(flattened.lines(Stage::Fragment), ["f", "shared"]);
    }

    #[cfg(unix)]
    fn relative_from_cwd(path: &Path) -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        let mut relative: PathBuf = cwd.components().skip(1).map(|_| "..").collect();
        relative.push(path.strip_prefix("/").unwrap());
        relative
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_build_root_shares_dedup_with_absolute_source() {
        let dir = TempDir::new().unwrap();
        write(&dir, "thirdparty/lib/common.glsl", "shared\n");
        let root = write(
            &dir,
            "shaders/main.glsl",
            "#[vertex]\n#include \"thirdparty/lib/common.glsl\"\n\
             #include \"../thirdparty/lib/common.glsl\"\nv\n",
        );

        let resolver = IncludeResolver::new(relative_from_cwd(dir.path()), "thirdparty/");
        let flattened = Flattener::new(&resolver).flatten_file(&root).unwrap();

        assert_eq!(flattened.lines(Stage::Vertex), ["shared", "v"]);
        assert!(flattened.diagnostics().is_empty());
    }

    #[test]
    fn test_include_in_preamble_is_ignored() {
        let dir = TempDir::new().unwrap();
        let root = write(&dir, "main.glsl", "#include \"missing.glsl\"\n#[compute]\nc\n");

        let flattened = flatten(&root);
        assert!(flattened.diagnostics().is_empty());
        assert_eq!(flattened.lines(Stage::Compute), ["c"]);
    }

    #[test]
    fn test_missing_include_is_soft() {
        let dir = TempDir::new().unwrap();
        let root = write(&dir, "main.glsl", "#[vertex]\n#include \"missing.glsl\"\nv\n");

        let flattened = flatten(&root);
        assert_eq!(flattened.lines(Stage::Vertex), ["v"]);
        assert!(matches!(
            flattened.diagnostics(),
            [Diagnostic::UnresolvedInclude { include, .. }] if include == "missing.glsl"
        ));
    }

    #[test]
    fn test_commented_include_is_not_expanded() {
        let dir = TempDir::new().unwrap();
        let root = write(&dir, "main.glsl", "#[vertex]\n// #include \"missing.glsl\"\nv\n");

        let flattened = flatten(&root);
        assert_eq!(flattened.lines(Stage::Vertex), ["", "v"]);
        assert!(flattened.diagnostics().is_empty());
    }

    #[test]
    fn test_self_include_reports_cycle() {
        let dir = TempDir::new().unwrap();
        let root = write(&dir, "loop.glsl", "#[vertex]\n#include \"loop.glsl\"\nbody\n");

        let flattened = flatten(&root);
        assert_eq!(flattened.lines(Stage::Vertex), ["body"]);
        assert!(matches!(
            flattened.diagnostics(),
            [Diagnostic::IncludeCycle { stage: Some(Stage::Vertex), .. }]
        ));
    }

    #[test]
    fn test_mutual_include_terminates() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.glsl", "a\n#include \"b.glsl\"\n");
        write(&dir, "b.glsl", "b\n#[fragment]\n#include \"a.glsl\"\n");
        let root = write(&dir, "main.glsl", "#[vertex]\n#include \"a.glsl\"\n");

        let flattened = flatten(&root);
        assert_eq!(flattened.lines(Stage::Vertex), ["a", "b"]);
        // a.glsl is still open when b.glsl re-includes it under fragment
        assert!(flattened.lines(Stage::Fragment).is_empty());
        assert!(matches!(
            flattened.diagnostics(),
            [Diagnostic::IncludeCycle { stage: Some(Stage::Fragment), .. }]
        ));
    }

    #[test]
    fn test_thirdparty_include_resolves_from_build_root() {
        let dir = TempDir::new().unwrap();
        write(&dir, "thirdparty/lib/noise.glsl", "noise\n");
        let root = write(
            &dir,
            "shaders/deep/main.glsl",
            "#[compute]\n#include \"thirdparty/lib/noise.glsl\"\n",
        );

        let resolver = IncludeResolver::new(dir.path(), "thirdparty/");
        let flattened = Flattener::new(&resolver).flatten_file(&root).unwrap();
        assert_eq!(flattened.lines(Stage::Compute), ["noise"]);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        let resolver = IncludeResolver::default();
        let err = Flattener::new(&resolver)
            .flatten_file(&dir.path().join("absent.glsl"))
            .unwrap_err();
        assert!(matches!(err, GenError::SourceUnreadable { .. }));
    }

    #[test]
    fn test_state_accessors() {
        let mut state = FlattenState::new();
        assert!(!state.append_to_active("dropped".to_string()));
        assert!(!state.mark_included(Path::new("x.glsl")));

        state.advance_line();
        state.activate(Stage::Task);
        assert_eq!(state.stage_offset(Stage::Task), Some(1));
        assert!(state.append_to_active("kept".to_string()));
        assert!(state.mark_included(Path::new("x.glsl")));
        assert!(!state.mark_included(Path::new("x.glsl")));
        assert_eq!(state.stages().get(Stage::Task).lines(), ["kept"]);
    }
}
