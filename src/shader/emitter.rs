//! Generated header emission
//!
//! Produces the include-guarded class wrapping each emitted stage as a
//! `static const char` array plus one `setup(...)` call. The layout below is
//! byte-for-byte what downstream builds expect, quirks included: the fragment
//! opener has no spaces around `=`, and the task and mesh openers are indented
//! by a single tab.

use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::output;
use crate::error::{GenError, GenErrorContext, GenResult};

use super::diagnostics::{Diagnostic, Diagnostics};
use super::encoder::{encode_stage, ByteStream};
use super::flatten::FlattenedShader;
use super::stage::{Stage, StageSet};

/// Which stages the setup call wires together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Compute only; every other stage is ignored
    Compute,
    /// Vertex, fragment, tessellation control and evaluation
    Tessellation,
    /// Vertex, fragment and whichever of task/mesh is present; tessellation is
    /// always null here, even when both tessellation stages have content
    TaskMesh { task: bool, mesh: bool },
    /// Vertex and fragment only
    Minimal,
}

impl Dispatch {
    /// Apply the fixed precedence: compute, then tessellation (both stages
    /// required), then task/mesh, then the minimal pair
    pub fn select(stages: &StageSet) -> Self {
        if stages.has_content(Stage::Compute) {
            return Dispatch::Compute;
        }

        let task = stages.has_content(Stage::Task);
        let mesh = stages.has_content(Stage::Mesh);

        if stages.has_content(Stage::TessControl) && stages.has_content(Stage::TessEvaluation) {
            Dispatch::Tessellation
        } else if task || mesh {
            Dispatch::TaskMesh { task, mesh }
        } else {
            Dispatch::Minimal
        }
    }

    /// Stages that get an array in the generated unit, in emission order
    pub fn emitted_stages(self, stages: &StageSet) -> Vec<Stage> {
        if self == Dispatch::Compute {
            return vec![Stage::Compute];
        }

        let mut emitted = vec![Stage::Vertex, Stage::Fragment];
        emitted.extend(
            [Stage::TessControl, Stage::TessEvaluation, Stage::Task, Stage::Mesh]
                .into_iter()
                .filter(|&stage| stages.has_content(stage)),
        );
        emitted
    }

    /// Stages passed as non-null arrays to the setup call
    pub fn referenced_stages(self) -> Vec<Stage> {
        match self {
            Dispatch::Compute => vec![Stage::Compute],
            Dispatch::Tessellation => vec![
                Stage::Vertex,
                Stage::Fragment,
                Stage::TessControl,
                Stage::TessEvaluation,
            ],
            Dispatch::TaskMesh { task, mesh } => {
                let mut referenced = vec![Stage::Vertex, Stage::Fragment];
                if task {
                    referenced.push(Stage::Task);
                }
                if mesh {
                    referenced.push(Stage::Mesh);
                }
                referenced
            }
            Dispatch::Minimal => vec![Stage::Vertex, Stage::Fragment],
        }
    }

    /// The setup statement, indented and newline-terminated
    pub fn setup_call(self, class_name: &str) -> String {
        let null = output::NULL_PLACEHOLDER;
        let vertex = Stage::Vertex.array_name();
        let fragment = Stage::Fragment.array_name();

        match self {
            Dispatch::Compute => format!(
                "\t\tsetup({null}, {null}, {}, \"{class_name}\");\n",
                Stage::Compute.array_name()
            ),
            Dispatch::Tessellation => format!(
                "\t\tsetup({vertex}, {fragment}, {null}, \"{class_name}\", {}, {});\n",
                Stage::TessControl.array_name(),
                Stage::TessEvaluation.array_name()
            ),
            Dispatch::TaskMesh { task, mesh } => {
                let task_name = if task { Stage::Task.array_name() } else { null.to_string() };
                let mesh_name = if mesh { Stage::Mesh.array_name() } else { null.to_string() };
                let head = format!("\t\tsetup({vertex}, {fragment}, {null}, \"{class_name}\"");
                format!("{head}, {null}, {null},{task_name},{mesh_name});\n")
            }
            Dispatch::Minimal => {
                format!("\t\tsetup({vertex}, {fragment}, {null}, \"{class_name}\");\n")
            }
        }
    }
}

/// One generated header, ready to be written
#[derive(Debug, Clone)]
pub struct GeneratedUnit {
    path: PathBuf,
    include_guard: String,
    class_name: String,
    dispatch: Dispatch,
    arrays: Vec<(Stage, ByteStream)>,
    text: String,
    diagnostics: Vec<Diagnostic>,
}

impl GeneratedUnit {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn include_guard(&self) -> &str {
        &self.include_guard
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn dispatch(&self) -> Dispatch {
        self.dispatch
    }

    /// Emitted arrays in emission order
    pub fn arrays(&self) -> &[(Stage, ByteStream)] {
        &self.arrays
    }

    pub fn array(&self, stage: Stage) -> Option<&ByteStream> {
        self.arrays
            .iter()
            .find(|(emitted, _)| *emitted == stage)
            .map(|(_, stream)| stream)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Flattening and encoding diagnostics, in the order they were found
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn write(&self) -> GenResult<()> {
        fs::write(&self.path, &self.text).output_context(&self.path)
    }
}

/// Base name of `path`: everything after the last `/` or `\`
pub fn output_file_name(path: &Path) -> String {
    let full = path.to_string_lossy();
    let after_slash = full.rsplit('/').next().unwrap_or(&full);
    after_slash.rsplit('\\').next().unwrap_or(after_slash).to_string()
}

/// Guard symbol stem: `.` becomes `_`, then uppercased
pub fn include_guard_stem(file_name: &str) -> String {
    file_name.replace('.', "_").to_uppercase()
}

/// Derive the class name from the output file name
///
/// `scene_forward_clustered.glsl.gen.h` becomes `SceneForwardClusteredShaderRD`.
pub fn class_name_for(file_name: &str, output_suffix: &str) -> String {
    let generated_ext = format!("{}{}", output::SOURCE_EXTENSION, output_suffix);
    let stem = file_name.replace(&generated_ext, "");
    let mut name = title_case(&stem).replace(['_', '.'], "");
    name.push_str(output::CLASS_SUFFIX);
    name
}

/// Uppercase each cased letter that follows a non-cased character and
/// lowercase every other cased letter
pub fn title_case(text: &str) -> String {
    let mut titled = String::with_capacity(text.len());
    let mut previous_cased = false;

    for character in text.chars() {
        let cased = character.is_lowercase() || character.is_uppercase();
        if !cased {
            titled.push(character);
        } else if previous_cased {
            titled.extend(character.to_lowercase());
        } else {
            titled.extend(character.to_uppercase());
        }
        previous_cased = cased;
    }

    titled
}

fn array_opener(stage: Stage) -> String {
    let name = stage.array_name();
    match stage {
        Stage::Fragment => format!("\t\tstatic const char {name}[]={{\n"),
        Stage::Task | Stage::Mesh => format!("\tstatic const char {name}[] = {{\n"),
        _ => format!("\t\tstatic const char {name}[] = {{\n"),
    }
}

/// Append one array literal: every code followed by a comma, then the sentinel
pub(crate) fn push_array_body(text: &mut String, stream: &ByteStream) {
    for code in stream.body() {
        text.push_str(&code.to_string());
        text.push(',');
    }
    text.push_str(&format!("\t\t{}}};\n\n", stream.sentinel()));
}

/// Encode the emitted stages of `flattened` and render the header text
pub fn emit_rd_header(
    mut flattened: FlattenedShader,
    output_path: PathBuf,
    output_suffix: &str,
) -> GenResult<GeneratedUnit> {
    let file_name = output_file_name(&output_path);
    if file_name.is_empty() {
        return Err(GenError::InvalidSourcePath {
            path: flattened.source().to_path_buf(),
        });
    }

    let include_guard = format!("{}{}", include_guard_stem(&file_name), output::RD_GUARD_SUFFIX);
    let class_name = class_name_for(&file_name, output_suffix);
    let dispatch = Dispatch::select(flattened.stages());

    let mut diagnostics: Diagnostics = flattened.take_diagnostics();
    let arrays: Vec<(Stage, ByteStream)> = dispatch
        .emitted_stages(flattened.stages())
        .into_iter()
        .map(|stage| {
            let stream = encode_stage(
                flattened.source(),
                stage,
                flattened.lines(stage),
                &mut diagnostics,
            );
            (stage, stream)
        })
        .collect();

    let mut text = String::new();
    text.push_str(output::BANNER);
    text.push('\n');
    text.push_str(&format!("#ifndef {include_guard}\n"));
    text.push_str(&format!("#define {include_guard}\n"));
    text.push('\n');
    text.push_str(&format!("#include \"{}\"\n\n", output::BASE_CLASS_HEADER));
    text.push_str(&format!("class {class_name} : public {} {{\n\n", output::BASE_CLASS));
    text.push_str("public:\n\n");
    text.push_str(&format!("\t{class_name}() {{\n\n"));

    for (stage, stream) in &arrays {
        text.push_str(&array_opener(*stage));
        push_array_body(&mut text, stream);
        if matches!(stage, Stage::Task | Stage::Mesh) {
            text.push_str(&format!("\t\tsetup_{}({});\n", stage.tag(), stage.array_name()));
        }
    }

    text.push_str(&dispatch.setup_call(&class_name));
    text.push_str("\t}\n");
    text.push_str("};\n\n");
    text.push_str("#endif\n");

    Ok(GeneratedUnit {
        path: output_path,
        include_guard,
        class_name,
        dispatch,
        arrays,
        text,
        diagnostics: diagnostics.into_vec(),
    })
}
