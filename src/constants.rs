// rd-shader-gen constants - SINGLE SOURCE OF TRUTH
//
// Every literal the generated headers depend on lives here. Changing any of
// these changes the bytes of every generated file.

/// Markers recognized while scanning shader sources
pub mod markers {
    /// Start of a line comment; everything after it is dropped
    pub const LINE_COMMENT: &str = "//";

    /// Include statement keyword, including its mandatory trailing space
    pub const INCLUDE: &str = "#include ";

    pub const VERTEX: &str = "#[vertex]";
    pub const FRAGMENT: &str = "#[fragment]";
    pub const COMPUTE: &str = "#[compute]";
    pub const TESS_CONTROL: &str = "#[tesc]";
    pub const TESS_EVALUATION: &str = "#[tese]";
    pub const TASK: &str = "#[task]";
    pub const MESH: &str = "#[mesh]";
}

/// Include path resolution
pub mod paths {
    /// Includes starting with this prefix resolve against the build root
    pub const THIRDPARTY_PREFIX: &str = "thirdparty/";

    /// Default build root when no configuration is given
    pub const DEFAULT_BUILD_ROOT: &str = ".";
}

/// Generated header layout
pub mod output {
    /// Appended to the source path to form the output path
    pub const GENERATED_SUFFIX: &str = ".gen.h";

    /// Source extension removed when deriving names
    pub const SOURCE_EXTENSION: &str = ".glsl";

    pub const BANNER: &str = "/* WARNING, THIS FILE WAS GENERATED, DO NOT EDIT */";

    /// Header declaring the base class of every staged shader
    pub const BASE_CLASS_HEADER: &str = "servers/rendering/renderer_rd/shader_rd.h";
    pub const BASE_CLASS: &str = "ShaderRD";

    /// Appended to the derived type name
    pub const CLASS_SUFFIX: &str = "ShaderRD";

    pub const RD_GUARD_SUFFIX: &str = "_RD";
    pub const RAW_GUARD_SUFFIX: &str = "_RAW_H";

    /// Replaces `.glsl` + generated suffix in raw array symbols
    pub const RAW_SYMBOL_SUFFIX: &str = "_shader_glsl";

    /// Placeholder for stages that are not wired into the setup call
    pub const NULL_PLACEHOLDER: &str = "nullptr";
}

/// Byte-stream encoding
pub mod encoding {
    /// Highest code point that fits a single `char` byte
    pub const MAX_BYTE_CODE: u32 = 255;

    /// Code emitted after every line
    pub const NEWLINE_CODE: u32 = '\n' as u32;

    /// Terminates every array
    pub const SENTINEL_CODE: u32 = 0;
}

/// Environment variables read by the binary
pub mod env {
    /// Path of a TOML build configuration used when `--config` is absent
    pub const CONFIG_PATH: &str = "RD_SHADER_GEN_CONFIG";
}
