//! # BioPrintKit
//!
//! A Rust G-code generator for multi-printhead bioprinters with support for:
//! - EMD, pneumatic, thermo-controlled and syringe pump printheads
//! - Multi-well droplet deposition on standard plates and ibidi slides
//! - Pressure, temperature and extrusion time sweeps across wells
//! - Layered scaffolds with striped, grid and honeycomb infill
//!
//! ## Architecture
//!
//! BioPrintKit is organized as a workspace with multiple crates:
//!
//! 1. **bioprintkit-core** - Data model, plate templates, errors, number formatting
//! 2. **bioprintkit-gcode** - Command emitter, geometry, sweeps, program builders
//! 3. **bioprintkit-settings** - JSON/TOML job files
//! 4. **bioprintkit** - Library facade and the `bioprintkit` command-line tool

pub use bioprintkit_core::{
    available_templates, lookup_template, Error, GeometryError, InfillPattern, ParameterError,
    PrintheadSpec, PrintheadTechnology, Result, ScaffoldSpec, SweepAxis, SweepDirection,
    SweepSpec, TemplateGeometry, WellIndex, TEMPLATE_CATALOG,
};

pub use bioprintkit_gcode::{
    generate, write_gcode_file, DropletGenerator, DropletParameters, GcodeProgram, PreviewSegment,
    PrintJob, ScaffoldGenerator, ScaffoldParameters, ScaffoldPreview, SegmentKind,
};

pub use bioprintkit_settings::{JobConfig, JobFormat, OutputSettings, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Generate the program described by a job file.
pub fn generate_job(config: &JobConfig) -> Result<GcodeProgram> {
    generate(&config.job)
}

/// Write a generated program to the job's configured output path.
pub fn export_job(config: &JobConfig, program: &GcodeProgram) -> Result<std::path::PathBuf> {
    write_gcode_file(config.output.path(), program)
}

/// Preview segments of a scaffold job; droplet jobs have no preview.
pub fn preview_job(config: &JobConfig) -> Result<ScaffoldPreview> {
    match &config.job {
        PrintJob::Scaffold(params) => bioprintkit_gcode::scaffold::preview(params),
        PrintJob::Droplet(_) => Err(Error::other(
            "preview is only available for scaffold jobs",
        )),
    }
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr, so G-code written to stdout stays clean
/// - RUST_LOG environment variable support
/// - `debug` level when `verbose` is set, `info` otherwise
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(verbose);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
