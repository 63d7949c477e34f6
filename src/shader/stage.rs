//! Shader stages and their per-stage buffers

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::constants::markers;

/// One of the seven sections a staged source is partitioned into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Vertex,
    Fragment,
    Compute,
    TessControl,
    TessEvaluation,
    Task,
    Mesh,
}

impl Stage {
    /// Canonical order; directive markers are tested in this order
    pub const ALL: [Stage; 7] = [
        Stage::Vertex,
        Stage::Fragment,
        Stage::Compute,
        Stage::TessControl,
        Stage::TessEvaluation,
        Stage::Task,
        Stage::Mesh,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short tag used in directives and array names
    pub const fn tag(self) -> &'static str {
        match self {
            Stage::Vertex => "vertex",
            Stage::Fragment => "fragment",
            Stage::Compute => "compute",
            Stage::TessControl => "tesc",
            Stage::TessEvaluation => "tese",
            Stage::Task => "task",
            Stage::Mesh => "mesh",
        }
    }

    /// Marker that switches the router into this stage
    pub const fn directive(self) -> &'static str {
        match self {
            Stage::Vertex => markers::VERTEX,
            Stage::Fragment => markers::FRAGMENT,
            Stage::Compute => markers::COMPUTE,
            Stage::TessControl => markers::TESS_CONTROL,
            Stage::TessEvaluation => markers::TESS_EVALUATION,
            Stage::Task => markers::TASK,
            Stage::Mesh => markers::MESH,
        }
    }

    /// Name of the generated array holding this stage's bytes
    pub fn array_name(self) -> String {
        format!("_{}_code", self.tag())
    }

    /// Stage whose marker appears anywhere in `line`, if any
    pub fn from_directive_line(line: &str) -> Option<Stage> {
        Self::ALL
            .into_iter()
            .find(|stage| line.contains(stage.directive()))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Flattened lines of one stage plus the includes already expanded into it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageBuffer {
    lines: Vec<String>,
    included: HashSet<PathBuf>,
}

impl StageBuffer {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn push_line(&mut self, line: String) {
        self.lines.push(line);
    }

    /// Record `path` as included; returns false if it already was
    pub fn mark_included(&mut self, path: &Path) -> bool {
        self.included.insert(path.to_path_buf())
    }
}

/// All seven stage buffers, addressed by [`Stage`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageSet {
    buffers: [StageBuffer; Stage::COUNT],
}

impl StageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, stage: Stage) -> &StageBuffer {
        &self.buffers[stage.index()]
    }

    pub fn get_mut(&mut self, stage: Stage) -> &mut StageBuffer {
        &mut self.buffers[stage.index()]
    }

    pub fn has_content(&self, stage: Stage) -> bool {
        !self.get(stage).is_empty()
    }

    /// True when no stage holds any line
    pub fn is_empty(&self) -> bool {
        self.buffers.iter().all(StageBuffer::is_empty)
    }
}
