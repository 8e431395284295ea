//! BioPrintKit CLI - build bioprinter G-code from job files
//!
//! Usage:
//!   bioprintkit generate <job.toml> [-o <output.gcode> | --stdout] [--set field=value ...]
//!   bioprintkit preview <scaffold.json> [-o preview.json]
//!   bioprintkit templates
//!   bioprintkit init <job.toml> [--scaffold]

use anyhow::{bail, Context, Result};
use bioprintkit::{
    export_job, generate_job, init_logging, preview_job, write_gcode_file, JobConfig,
    TEMPLATE_CATALOG,
};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// G-code generator for multi-printhead bioprinters
#[derive(Parser, Debug)]
#[command(name = "bioprintkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate G-code from a job file
    Generate {
        /// Job file (JSON or TOML)
        #[arg(value_name = "JOB")]
        job: PathBuf,

        /// Output G-code file (defaults to the job's [output] path)
        #[arg(short, long, value_name = "OUTPUT", conflicts_with = "stdout")]
        output: Option<PathBuf>,

        /// Write the G-code to stdout instead of a file
        #[arg(long)]
        stdout: bool,

        /// Override a job field, e.g. --set pressure=35
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        overrides: Vec<String>,
    },

    /// Write the preview line segments of a scaffold job as JSON
    Preview {
        /// Scaffold job file (JSON or TOML)
        #[arg(value_name = "JOB")]
        job: PathBuf,

        /// Output JSON file (stdout when omitted)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// List the plate templates
    Templates,

    /// Write a default job file
    Init {
        /// Destination (.json or .toml)
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Start from a scaffold job instead of a droplet job
        #[arg(long)]
        scaffold: bool,

        /// Replace an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    debug!(version = bioprintkit::VERSION, built = bioprintkit::BUILD_DATE, "Starting");

    match cli.command {
        Commands::Generate {
            job,
            output,
            stdout,
            overrides,
        } => cmd_generate(&job, output.as_deref(), stdout, &overrides),
        Commands::Preview { job, output } => cmd_preview(&job, output.as_deref()),
        Commands::Templates => cmd_templates(),
        Commands::Init {
            path,
            scaffold,
            force,
        } => cmd_init(&path, scaffold, force),
    }
}

fn load_job(path: &Path) -> Result<JobConfig> {
    JobConfig::load_from_file(path)
        .with_context(|| format!("Failed to load job file {}", path.display()))
}

fn cmd_generate(
    job: &Path,
    output: Option<&Path>,
    stdout: bool,
    overrides: &[String],
) -> Result<()> {
    let mut config = load_job(job)?;
    for assignment in overrides {
        config
            .apply_override(assignment)
            .with_context(|| format!("Invalid override '{}'", assignment))?;
    }
    config.validate().context("Job is not valid after overrides")?;

    let program = generate_job(&config).context("G-code generation failed")?;
    info!(mode = config.mode(), lines = program.len(), "Program generated");

    if stdout {
        let mut out = std::io::stdout().lock();
        out.write_all(program.as_str().as_bytes())?;
        out.flush()?;
        return Ok(());
    }

    let written = match output {
        Some(path) => write_gcode_file(path, &program)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => export_job(&config, &program)
            .with_context(|| format!("Failed to write {}", config.output.path().display()))?,
    };
    println!("Wrote {}", written.display());
    Ok(())
}

fn cmd_preview(job: &Path, output: Option<&Path>) -> Result<()> {
    let config = load_job(job)?;
    let preview = preview_job(&config).context("Preview failed")?;
    let json = preview.to_json().context("Failed to serialise preview")?;
    info!(segments = preview.segments.len(), "Preview built");

    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn cmd_templates() -> Result<()> {
    println!(
        "{:<24} {:>5} {:>5} {:>9} {:>9}  Description",
        "Name", "Rows", "Cols", "Pitch X", "Pitch Y"
    );
    for template in TEMPLATE_CATALOG.iter() {
        println!(
            "{:<24} {:>5} {:>5} {:>9.2} {:>9.2}  {}",
            template.name,
            template.rows,
            template.cols,
            template.well_spacing_x,
            template.well_spacing_y,
            template.description
        );
    }
    Ok(())
}

fn cmd_init(path: &Path, scaffold: bool, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to replace it)", path.display());
    }
    let config = if scaffold {
        JobConfig::scaffold()
    } else {
        JobConfig::default()
    };
    config
        .save_to_file(path)
        .with_context(|| format!("Failed to write job file {}", path.display()))?;
    println!("Wrote {} job to {}", config.mode(), path.display());
    Ok(())
}
