//! Scaffold geometry descriptions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParameterError;

/// Infill pattern laid inside each scaffold perimeter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InfillPattern {
    /// Parallel lines along Y
    Striped,
    /// Two crossed sets of parallel lines
    #[default]
    Grid,
    /// Hexagonal cells
    Honeycomb,
}

impl fmt::Display for InfillPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Striped => write!(f, "striped"),
            Self::Grid => write!(f, "grid"),
            Self::Honeycomb => write!(f, "honeycomb"),
        }
    }
}

impl FromStr for InfillPattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "striped" | "stripes" | "stripped" => Ok(Self::Striped),
            "grid" => Ok(Self::Grid),
            "honeycomb" => Ok(Self::Honeycomb),
            _ => Err(format!("Unknown infill pattern: {}", s)),
        }
    }
}

/// A rectangular, layered scaffold construct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaffoldSpec {
    /// Outer size along X (mm)
    pub size_x: f64,
    /// Outer size along Y (mm)
    pub size_y: f64,
    /// Target infill in percent (0-100)
    pub infill_percent: f64,
    /// Nozzle / extruded line width (mm)
    pub nozzle_width: f64,
    /// Base layer height (mm)
    pub layer_height: f64,
    pub layer_count: u32,
    #[serde(default)]
    pub pattern: InfillPattern,
    /// Print speed (mm/s)
    pub speed: f64,
}

impl Default for ScaffoldSpec {
    fn default() -> Self {
        Self {
            size_x: 10.0,
            size_y: 10.0,
            infill_percent: 50.0,
            nozzle_width: 0.41,
            layer_height: 0.2,
            layer_count: 2,
            pattern: InfillPattern::default(),
            speed: 10.0,
        }
    }
}

impl ScaffoldSpec {
    /// Infill as a fraction in `0..=1`.
    pub fn infill_fraction(&self) -> f64 {
        self.infill_percent / 100.0
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        ParameterError::check_above("nozzle_width", self.nozzle_width, 0.0)?;
        ParameterError::check_above("size_x", self.size_x, self.nozzle_width)?;
        ParameterError::check_above("size_y", self.size_y, self.nozzle_width)?;
        ParameterError::check_above("infill_percent", self.infill_percent, 0.0)?;
        ParameterError::check_range("infill_percent", self.infill_percent, 0.0, 100.0)?;
        ParameterError::check_above("layer_height", self.layer_height, 0.0)?;
        ParameterError::check_above("speed", self.speed, 0.0)?;
        if self.layer_count == 0 {
            return Err(ParameterError::InvalidValue {
                field: "layer_count".to_string(),
                reason: "at least one layer is required".to_string(),
            });
        }
        Ok(())
    }
}
