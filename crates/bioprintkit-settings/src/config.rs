//! Job configuration for BioPrintKit
//!
//! A job file carries everything one generation run needs. It is stored as
//! JSON or TOML, chosen by file extension:
//!
//! ```toml
//! [output]
//! directory = "/home/lab/prints"
//! file_name = "viability.gcode"
//!
//! [job]
//! mode = "droplet"
//! template = "96-well plate"
//! print_speed = 10.0
//! layer_height = 0.2
//! bed_movement_position = 5.0
//! extrusion_time = 1.0
//!
//! [job.printhead]
//! technology = "EMD"
//! index = 0
//! default_pressure = 20.0
//! ```

use bioprintkit_core::parse_number;
use bioprintkit_gcode::{DropletParameters, PrintJob, ScaffoldParameters};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{SettingsError, SettingsResult};

/// On-disk format of a job file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobFormat {
    Json,
    Toml,
}

impl JobFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(JobFormat::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(JobFormat::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Where generated programs are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Output directory
    pub directory: PathBuf,
    /// Output file name; the extension is forced to `.gcode`
    pub file_name: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")),
            file_name: "bioprint.gcode".to_string(),
        }
    }
}

impl OutputSettings {
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

/// A complete print job as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    #[serde(default)]
    pub output: OutputSettings,
    pub job: PrintJob,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self::new(PrintJob::Droplet(DropletParameters::default()))
    }
}

impl JobConfig {
    pub fn new(job: PrintJob) -> Self {
        Self {
            output: OutputSettings::default(),
            job,
        }
    }

    /// Default scaffold job
    pub fn scaffold() -> Self {
        Self::new(PrintJob::Scaffold(ScaffoldParameters::default()))
    }

    /// `droplet` or `scaffold`
    pub fn mode(&self) -> &'static str {
        match self.job {
            PrintJob::Droplet(_) => "droplet",
            PrintJob::Scaffold(_) => "scaffold",
        }
    }

    /// Parse job text without validating it
    pub fn parse(content: &str, format: JobFormat) -> SettingsResult<Self> {
        let config = match format {
            JobFormat::Json => serde_json::from_str(content)?,
            JobFormat::Toml => toml::from_str(content)?,
        };
        Ok(config)
    }

    /// Render job text without validating it
    pub fn render(&self, format: JobFormat) -> SettingsResult<String> {
        let content = match format {
            JobFormat::Json => serde_json::to_string_pretty(self)?,
            JobFormat::Toml => toml::to_string_pretty(self)?,
        };
        Ok(content)
    }

    /// Load a job file (JSON or TOML) and validate it
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = JobFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content, format)?;
        config.validate()?;

        info!(path = %path.display(), mode = config.mode(), "Loaded job file");
        Ok(config)
    }

    /// Validate and save a job file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let format = JobFormat::from_path(path)?;
        std::fs::write(path, self.render(format)?)?;

        info!(path = %path.display(), mode = self.mode(), "Saved job file");
        Ok(())
    }

    /// Check the job against the machine's physical bounds
    pub fn validate(&self) -> SettingsResult<()> {
        if self.output.file_name.trim().is_empty() {
            return Err(SettingsError::InvalidSetting {
                key: "output.file_name".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        self.job.validate()?;
        Ok(())
    }

    /// Apply a `key=value` override
    pub fn apply_override(&mut self, assignment: &str) -> SettingsResult<()> {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| SettingsError::MalformedOverride(assignment.to_string()))?;
        self.set(key.trim(), value.trim())
    }

    /// Set a single job field from its text form.
    ///
    /// Numeric fields go through [`parse_number`], so a value that is not a
    /// number is reported as malformed together with the field name.
    pub fn set(&mut self, key: &str, value: &str) -> SettingsResult<()> {
        let mode = self.mode();

        let printhead = match &mut self.job {
            PrintJob::Droplet(params) => &mut params.printhead,
            PrintJob::Scaffold(params) => &mut params.printhead,
        };
        let shared = match key {
            "technology" => {
                printhead.technology = value.parse().map_err(|reason| invalid(key, reason))?;
                true
            }
            "printhead_index" => {
                printhead.index = parse_integer(key, value, u8::MAX as u64)? as u8;
                true
            }
            "pressure" => {
                printhead.default_pressure = parse_number(key, value)?;
                true
            }
            "printhead_temperature" => {
                printhead.temperature = Some(parse_number(key, value)?);
                true
            }
            _ => false,
        };

        if !shared {
            match &mut self.job {
                PrintJob::Droplet(params) => set_droplet(params, key, value, mode)?,
                PrintJob::Scaffold(params) => set_scaffold(params, key, value, mode)?,
            }
        }

        debug!(key, value, "Applied job override");
        Ok(())
    }
}

fn set_droplet(
    params: &mut DropletParameters,
    key: &str,
    value: &str,
    mode: &str,
) -> SettingsResult<()> {
    match key {
        "template" => params.template = value.to_string(),
        "print_speed" => params.print_speed = parse_number(key, value)?,
        "layer_height" => params.layer_height = parse_number(key, value)?,
        "bed_movement_position" => params.bed_movement_position = parse_number(key, value)?,
        "extrusion_time" => params.extrusion_time = parse_number(key, value)?,
        "bed_temperature" => params.bed_temperature = Some(parse_number(key, value)?),
        "control_bed_temperature" => params.control_bed_temperature = parse_flag(key, value)?,
        "control_printhead_temperature" => {
            params.control_printhead_temperature = parse_flag(key, value)?
        }
        "clean_printhead" => params.clean_printhead = parse_flag(key, value)?,
        "terminate_operation" => params.terminate_operation = parse_flag(key, value)?,
        "timed_extrusion" => params.timed_extrusion = parse_flag(key, value)?,
        "sweep_initial" | "sweep_final" => {
            let sweep = params
                .sweep
                .as_mut()
                .ok_or_else(|| invalid(key, "the job has no sweep configured".to_string()))?;
            let number = parse_number(key, value)?;
            if key == "sweep_initial" {
                sweep.initial = number;
            } else {
                sweep.final_value = number;
            }
        }
        _ => return Err(unknown(key, mode)),
    }
    Ok(())
}

fn set_scaffold(
    params: &mut ScaffoldParameters,
    key: &str,
    value: &str,
    mode: &str,
) -> SettingsResult<()> {
    let spec = &mut params.scaffold;
    match key {
        "size_x" => spec.size_x = parse_number(key, value)?,
        "size_y" => spec.size_y = parse_number(key, value)?,
        "infill_percent" => spec.infill_percent = parse_number(key, value)?,
        "nozzle_width" => spec.nozzle_width = parse_number(key, value)?,
        "layer_height" => spec.layer_height = parse_number(key, value)?,
        "layer_count" => spec.layer_count = parse_integer(key, value, u32::MAX as u64)? as u32,
        "pattern" => spec.pattern = value.parse().map_err(|reason| invalid(key, reason))?,
        "speed" => spec.speed = parse_number(key, value)?,
        "extrusion_amount" => params.extrusion_amount = Some(parse_number(key, value)?),
        "terminate_operation" => params.terminate_operation = parse_flag(key, value)?,
        _ => return Err(unknown(key, mode)),
    }
    Ok(())
}

fn invalid(key: &str, reason: String) -> SettingsError {
    SettingsError::InvalidSetting {
        key: key.to_string(),
        reason,
    }
}

fn unknown(key: &str, mode: &str) -> SettingsError {
    SettingsError::UnknownSetting {
        key: key.to_string(),
        mode: mode.to_string(),
    }
}

fn parse_integer(key: &str, value: &str, max: u64) -> SettingsResult<u64> {
    let number = parse_number(key, value)?;
    if number < 0.0 || number.fract() != 0.0 || number > max as f64 {
        return Err(invalid(
            key,
            format!("{value} is not a whole number between 0 and {max}"),
        ));
    }
    Ok(number as u64)
}

fn parse_flag(key: &str, value: &str) -> SettingsResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(invalid(key, format!("'{value}' is not true or false"))),
    }
}
