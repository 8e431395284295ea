//! Writing finished programs to disk.

use std::fs;
use std::path::{Path, PathBuf};

use bioprintkit_core::Result;
use tracing::info;

use crate::program::GcodeProgram;

/// File extension of exported programs
pub const GCODE_EXTENSION: &str = "gcode";

/// Write `program` byte-for-byte to `path` with a `.gcode` extension.
///
/// Any other extension is replaced. Returns the path actually written.
pub fn write_gcode_file(path: impl AsRef<Path>, program: &GcodeProgram) -> Result<PathBuf> {
    let path = path.as_ref().with_extension(GCODE_EXTENSION);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, program.as_str())?;
    info!(path = %path.display(), bytes = program.len(), "G-code written");
    Ok(path)
}
