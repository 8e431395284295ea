//! BioPrintKit Settings Crate
//!
//! Job files describe a complete print job (printhead, droplet or scaffold
//! parameters, and where to write the result). They are read and written as
//! JSON or TOML and validated on the way in and out.

pub mod config;
pub mod error;

pub use config::{JobConfig, JobFormat, OutputSettings};
pub use error::{SettingsError, SettingsResult};
