//! rd-shader-gen command line entry point
//!
//! Usage: rd-shader-gen [--raw] [--serial] [--config <file.toml>] <source>...
//!
//! Writes `<source>.gen.h` next to every source. Exits with an error when any
//! source could not be generated; diagnostics alone never fail the run.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use rd_shader_gen::constants::env;
use rd_shader_gen::{build_headers, BuildConfig, HeaderKind};

struct Args {
    kind: HeaderKind,
    serial: bool,
    config: Option<PathBuf>,
    sources: Vec<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut parsed = Args {
        kind: HeaderKind::Staged,
        serial: false,
        config: None,
        sources: Vec::new(),
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--raw" => parsed.kind = HeaderKind::Raw,
            "--serial" => parsed.serial = true,
            "--config" => {
                let path = args.next().context("--config expects a file path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => bail!("Unknown flag: {}", flag),
            source => parsed.sources.push(PathBuf::from(source)),
        }
    }

    if parsed.sources.is_empty() {
        bail!("Usage: rd-shader-gen [--raw] [--serial] [--config <file.toml>] <source>...");
    }
    Ok(parsed)
}

fn load_config(explicit: Option<PathBuf>) -> Result<BuildConfig> {
    let path = explicit.or_else(|| std::env::var_os(env::CONFIG_PATH).map(PathBuf::from));
    match path {
        Some(path) => BuildConfig::load(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(BuildConfig::default()),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args(std::env::args().skip(1))?;
    let mut config = load_config(args.config)?;
    if args.serial {
        config.parallel = false;
    }

    let report = build_headers(args.kind, &args.sources, &config);

    if !report.is_success() {
        bail!(
            "{} of {} source(s) failed to generate",
            report.failures.len(),
            args.sources.len()
        );
    }
    Ok(())
}
