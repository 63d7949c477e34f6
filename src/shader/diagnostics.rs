//! Advisory diagnostics
//!
//! Recoverable conditions are logged where they are detected and collected so
//! callers (and tests) can inspect them. None of them change the outcome of a
//! generation run.

use std::fmt;
use std::path::PathBuf;

use super::stage::Stage;

/// A recoverable problem found while flattening or encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// An include could not be opened or read; its content was skipped
    UnresolvedInclude {
        including_file: PathBuf,
        include: String,
        resolved: PathBuf,
        reason: String,
    },

    /// An include re-entered a file that is still being expanded
    IncludeCycle {
        including_file: PathBuf,
        include: String,
        resolved: PathBuf,
        stage: Option<Stage>,
    },

    /// An include statement without a closing delimiter
    MalformedInclude { file: PathBuf, text: String },

    /// A character that does not fit a single byte; still encoded verbatim
    CharacterOutOfRange {
        file: PathBuf,
        stage: Stage,
        /// 1-based line within the stage buffer
        line: usize,
        /// 1-based column within that line
        column: usize,
        code: u32,
        character: char,
        line_text: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnresolvedInclude {
                including_file,
                include,
                resolved,
                reason,
            } => write!(
                f,
                "Error in file '{}': #include {} could not be found! ({}: {})",
                including_file.display(),
                include,
                resolved.display(),
                reason
            ),
            Diagnostic::IncludeCycle {
                including_file,
                include,
                resolved,
                stage,
            } => write!(
                f,
                "Error in file '{}': #include {} forms an include cycle through {} \
                 (stage {}), skipped",
                including_file.display(),
                include,
                resolved.display(),
                stage.map_or("none", Stage::tag)
            ),
            Diagnostic::MalformedInclude { file, text } => write!(
                f,
                "Error in file '{}': malformed include statement '{}'",
                file.display(),
                text
            ),
            Diagnostic::CharacterOutOfRange {
                file,
                stage,
                line,
                column,
                code,
                character,
                line_text,
            } => write!(
                f,
                "shader error : {} shader :{}:({}) index:{} code error, code :{}  char :{} line:{}",
                stage,
                file.display(),
                line,
                column,
                code,
                character,
                line_text
            ),
        }
    }
}

/// Collects diagnostics for one invocation, logging each as it arrives
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_include_names_file_and_text() {
        let diagnostic = Diagnostic::UnresolvedInclude {
            including_file: PathBuf::from("shaders/sky.glsl"),
            include: "missing.glsl".to_string(),
            resolved: PathBuf::from("shaders/missing.glsl"),
            reason: "not found".to_string(),
        };
        let message = diagnostic.to_string();
        assert!(message.contains("shaders/sky.glsl"));
        assert!(message.contains("#include missing.glsl could not be found"));
    }

    #[test]
    fn test_report_collects() {
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());
        diagnostics.report(Diagnostic::MalformedInclude {
            file: PathBuf::from("a.glsl"),
            text: "#include \"b.glsl".to_string(),
        });
        assert_eq!(diagnostics.len(), 1);
    }
}
