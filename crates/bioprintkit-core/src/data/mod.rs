//! Data models for print parameters
//!
//! This module provides:
//! - Printhead technology and per-run printhead settings
//! - Well addressing on multi-well plates
//! - The static plate template catalog
//! - Parameter sweep descriptions
//! - Scaffold geometry descriptions

pub mod scaffold;
pub mod sweep;
pub mod templates;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Printhead technology fitted to the selected tool slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrintheadTechnology {
    /// Electro-mechanical dispensing
    #[serde(rename = "EMD", alias = "emd")]
    Emd,
    /// Pneumatic dispensing
    #[serde(rename = "Pneumatic", alias = "pneumatic")]
    Pneumatic,
    /// Temperature-controlled pneumatic dispensing
    #[serde(rename = "Thermo-controlled", alias = "thermo-controlled", alias = "thermo")]
    ThermoControlled,
    /// Syringe pump driven through the extrusion axis
    #[serde(rename = "Syringe Pump", alias = "syringe-pump", alias = "syringe pump")]
    SyringePump,
}

impl PrintheadTechnology {
    /// All supported technologies, in display order.
    pub const ALL: [PrintheadTechnology; 4] = [
        PrintheadTechnology::Emd,
        PrintheadTechnology::Pneumatic,
        PrintheadTechnology::ThermoControlled,
        PrintheadTechnology::SyringePump,
    ];

    /// Allowed printhead temperature range in °C.
    pub fn temperature_limits(&self) -> (f64, f64) {
        match self {
            PrintheadTechnology::ThermoControlled => (4.0, 65.0),
            _ => (30.0, 65.0),
        }
    }
}

impl fmt::Display for PrintheadTechnology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Emd => write!(f, "EMD"),
            Self::Pneumatic => write!(f, "Pneumatic"),
            Self::ThermoControlled => write!(f, "Thermo-controlled"),
            Self::SyringePump => write!(f, "Syringe Pump"),
        }
    }
}

impl FromStr for PrintheadTechnology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "emd" => Ok(Self::Emd),
            "pneumatic" => Ok(Self::Pneumatic),
            "thermo-controlled" | "thermo" => Ok(Self::ThermoControlled),
            "syringe pump" | "syringe-pump" => Ok(Self::SyringePump),
            _ => Err(format!("Unknown printhead technology: {}", s)),
        }
    }
}

/// Printhead settings for one program run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintheadSpec {
    /// Technology of the selected printhead
    pub technology: PrintheadTechnology,
    /// Tool slot (0-2)
    pub index: u8,
    /// Default extrusion pressure in kPa
    pub default_pressure: f64,
    /// Controlled printhead temperature in °C
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl Default for PrintheadSpec {
    fn default() -> Self {
        Self {
            technology: PrintheadTechnology::Emd,
            index: 0,
            default_pressure: 20.0,
            temperature: None,
        }
    }
}

/// Zero-based well address, traversed row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WellIndex {
    pub row: usize,
    pub col: usize,
}

impl WellIndex {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Position of this well in row-major order for a plate with `cols` columns.
    pub fn linear(&self, cols: usize) -> usize {
        self.row * cols + self.col
    }

    /// One-based label, e.g. `(1, 1)` for the first well.
    pub fn label(&self) -> String {
        format!("({}, {})", self.row + 1, self.col + 1)
    }
}
