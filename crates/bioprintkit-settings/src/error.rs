//! Error types for the settings crate.
//!
//! This module provides structured error types for job file loading,
//! persistence, and command-line overrides.

use std::io;
use thiserror::Error;

/// Errors that can occur while handling job files.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The job file format is not supported.
    #[error("Unsupported job file format: {0}")]
    UnsupportedFormat(String),

    /// An override names a setting that does not exist for this job.
    #[error("Unknown setting '{key}' for a {mode} job")]
    UnknownSetting { key: String, mode: String },

    /// An override value could not be applied.
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    /// An override is not of the form `key=value`.
    #[error("Malformed override '{0}', expected key=value")]
    MalformedOverride(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    /// The job itself failed validation.
    #[error(transparent)]
    Job(#[from] bioprintkit_core::Error),
}

impl From<bioprintkit_core::ParameterError> for SettingsError {
    fn from(err: bioprintkit_core::ParameterError) -> Self {
        SettingsError::Job(err.into())
    }
}

impl SettingsError {
    /// Check if the job parameters, rather than the file, were rejected
    pub fn is_job_error(&self) -> bool {
        matches!(self, SettingsError::Job(_))
    }
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;
