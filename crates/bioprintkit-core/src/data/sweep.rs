//! Parameter sweep descriptions.
//!
//! A sweep varies one process parameter linearly across the wells of a
//! plate. At most one sweep is active per program, which the data model
//! enforces by carrying a single optional [`SweepSpec`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ParameterError;

/// Process parameter varied by a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepAxis {
    Pressure,
    Temperature,
    ExtrusionTime,
}

impl fmt::Display for SweepAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pressure => write!(f, "pressure"),
            Self::Temperature => write!(f, "temperature"),
            Self::ExtrusionTime => write!(f, "extrusion time"),
        }
    }
}

/// How sweep values are laid out over the plate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepDirection {
    /// One value per well, row-major
    #[default]
    Well,
    /// One value per row, shared by all its columns
    Row,
    /// One value per column, repeated on every row
    Column,
}

impl fmt::Display for SweepDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Well => write!(f, "well"),
            Self::Row => write!(f, "row"),
            Self::Column => write!(f, "column"),
        }
    }
}

/// A linear sweep of one parameter between two values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepSpec {
    pub axis: SweepAxis,
    pub initial: f64,
    #[serde(rename = "final")]
    pub final_value: f64,
    #[serde(default)]
    pub direction: SweepDirection,
}

impl SweepSpec {
    pub fn new(axis: SweepAxis, initial: f64, final_value: f64, direction: SweepDirection) -> Self {
        Self {
            axis,
            initial,
            final_value,
            direction,
        }
    }

    /// Enforce `0 <= initial < final` with `final > 0`.
    pub fn validate(&self) -> Result<(), ParameterError> {
        let field = |end: &str| format!("{} sweep {}", self.axis, end);

        if !self.initial.is_finite() || self.initial < 0.0 {
            return Err(ParameterError::InvalidValue {
                field: field("initial"),
                reason: format!("{} cannot be negative", self.initial),
            });
        }
        ParameterError::check_above(&field("final"), self.final_value, 0.0)?;
        if self.initial >= self.final_value {
            return Err(ParameterError::InvalidValue {
                field: field("initial"),
                reason: format!(
                    "{} must be less than final value {}",
                    self.initial, self.final_value
                ),
            });
        }
        Ok(())
    }
}
