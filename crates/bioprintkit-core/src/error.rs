//! Error handling for BioPrintKit
//!
//! Provides error types for every stage of program generation:
//! - Parameter errors (malformed or out-of-range input fields)
//! - Geometry errors (plates or infill patterns that produce nothing to print)
//! - Template lookup failures
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Parameter error type
///
/// Raised while a parameter record is checked, before any command is emitted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// A field could not be read as a number
    #[error("Malformed value for '{field}': '{value}' is not a number")]
    Malformed {
        /// The offending field name.
        field: String,
        /// The raw text that failed to parse.
        value: String,
    },

    /// A field parsed but lies outside its physical bounds
    #[error("Parameter '{field}' out of range: {value} (valid: {min}..{max})")]
    OutOfRange {
        /// The offending field name.
        field: String,
        /// The rejected value.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },

    /// A field violates a bound that is not a plain closed range
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue {
        /// The offending field name.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Parameters are mutually incompatible
    #[error("Incompatible parameters: {0}")]
    Incompatible(String),
}

impl ParameterError {
    /// Check `value` against the closed range `[min, max]`.
    pub fn check_range(
        field: &str,
        value: f64,
        min: f64,
        max: f64,
    ) -> std::result::Result<(), Self> {
        if value.is_finite() && value >= min && value <= max {
            Ok(())
        } else {
            Err(ParameterError::OutOfRange {
                field: field.to_string(),
                value,
                min,
                max,
            })
        }
    }

    /// Check that `value` is strictly greater than `floor`.
    pub fn check_above(
        field: &str,
        value: f64,
        floor: f64,
    ) -> std::result::Result<(), Self> {
        if value.is_finite() && value > floor {
            Ok(())
        } else {
            Err(ParameterError::InvalidValue {
                field: field.to_string(),
                reason: format!("{value} must be greater than {floor}"),
            })
        }
    }
}

/// Geometry error type
///
/// Raised when computed geometry leaves nothing to print, or far more than
/// a single program should carry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Infill computation produced no lines or cells
    #[error("Degenerate {pattern} infill: computed {lines} lines")]
    DegenerateInfill {
        /// The infill pattern name.
        pattern: String,
        /// The computed line (or cell) count.
        lines: i64,
    },

    /// Honeycomb infill would need more cells per layer than allowed
    #[error("Honeycomb infill needs about {cells} cells per layer (limit {max})")]
    TooManyCells {
        /// Estimated cell count for one layer.
        cells: usize,
        /// The per-layer limit.
        max: usize,
    },

    /// A template resolves to zero wells
    #[error("Template '{template}' has no wells")]
    EmptyPlate {
        /// The template name.
        template: String,
    },
}

/// Main error type for BioPrintKit
///
/// A unified error type that can represent any error raised while turning a
/// parameter record into a G-code program.
#[derive(Error, Debug)]
pub enum Error {
    /// Parameter error
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// The requested plate template is not in the catalog
    #[error("Unknown template: {name}")]
    UnknownTemplate {
        /// The template name that was requested.
        name: String,
    },

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a parameter error
    pub fn is_parameter_error(&self) -> bool {
        matches!(self, Error::Parameter(_))
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }

    /// Check if this is an unknown template error
    pub fn is_unknown_template(&self) -> bool {
        matches!(self, Error::UnknownTemplate { .. })
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
