//! rd-shader-gen
//!
//! Build-time generator turning staged GLSL sources into C++ headers that embed
//! each shader stage as a `static const char` array.
//!
//! - [`shader`]: stage-aware flattening and `ShaderRD` header emission
//! - [`raw`]: stage-unaware flattening into a single array
//! - [`driver`]: batch processing of many sources
//!
//! Recoverable problems (missing includes, include cycles, characters outside
//! the single-byte range) never fail a build; they are logged through `log` and
//! returned as [`Diagnostic`]s. Only an unreadable root source or an unwritable
//! output fails a file.

pub mod config;
pub mod constants;
pub mod driver;
pub mod error;
pub mod raw;
pub mod shader;

pub use config::BuildConfig;
pub use driver::{build_headers, build_raw_headers, build_rd_headers, BuildReport, HeaderKind};
pub use error::{GenError, GenResult};
pub use raw::{build_raw_header, RawHeader};
pub use shader::{build_rd_header, generate_rd_header, Diagnostic, Dispatch, GeneratedUnit, Stage};
