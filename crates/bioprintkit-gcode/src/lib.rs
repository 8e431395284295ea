//! # BioPrintKit G-code
//!
//! Builds bioprinter G-code programs from validated print parameters.
//!
//! ## Programs
//!
//! - **Droplet** - one droplet per well of a plate template, optionally
//!   sweeping pressure, temperature or extrusion time across the wells
//! - **Scaffold** - a layered rectangular construct with a perimeter and
//!   striped, grid or honeycomb infill, plus a matching 3D preview
//!
//! Generation is a pure function of its parameters: the same parameters
//! always produce byte-identical text, and invalid parameters produce an
//! error before any command is emitted.

pub mod commands;
pub mod droplet;
pub mod export;
pub mod geometry;
pub mod preview;
pub mod program;
pub mod scaffold;
pub mod sweep;

use bioprintkit_core::Result;
use serde::{Deserialize, Serialize};

pub use droplet::{DropletGenerator, DropletParameters, DropletStage};
pub use export::write_gcode_file;
pub use preview::{PreviewSegment, ScaffoldPreview, SegmentKind};
pub use program::GcodeProgram;
pub use scaffold::{ScaffoldGenerator, ScaffoldParameters};

/// A fully described print job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum PrintJob {
    Droplet(DropletParameters),
    Scaffold(ScaffoldParameters),
}

impl PrintJob {
    pub fn validate(&self) -> Result<()> {
        match self {
            PrintJob::Droplet(params) => params.validate().map(|_| ()),
            PrintJob::Scaffold(params) => params.validate(),
        }
    }
}

/// Generate the G-code program for a job.
pub fn generate(job: &PrintJob) -> Result<GcodeProgram> {
    match job {
        PrintJob::Droplet(params) => DropletGenerator::new(params.clone()).generate(),
        PrintJob::Scaffold(params) => ScaffoldGenerator::new(params.clone()).generate(),
    }
}
