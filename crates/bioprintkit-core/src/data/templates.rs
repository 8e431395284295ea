//! Static plate template catalog.
//!
//! Well counts and center-to-center spacings of the plates and slides the
//! bioprinter is used with. The catalog is read-only and shared by every
//! generation call.

use serde::Serialize;

use crate::error::{Error, GeometryError, Result};

/// Geometry of a multi-well plate or slide
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemplateGeometry {
    pub name: &'static str,
    pub description: &'static str,
    pub rows: usize,
    pub cols: usize,
    /// Center-to-center spacing between columns (mm)
    pub well_spacing_x: f64,
    /// Center-to-center spacing between rows (mm)
    pub well_spacing_y: f64,
    /// Full plate length (mm)
    pub plate_length: f64,
    /// Full plate width (mm)
    pub plate_width: f64,
}

impl TemplateGeometry {
    /// Number of wells on the plate.
    pub fn well_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Whether this template deposits a single drop.
    pub fn is_single_drop(&self) -> bool {
        self.well_count() == 1
    }

    /// Offset of a well relative to the first well.
    pub fn well_offset(&self, row: usize, col: usize) -> (f64, f64) {
        (
            col as f64 * self.well_spacing_x,
            row as f64 * self.well_spacing_y,
        )
    }

    /// Fail if the template resolves to no wells.
    pub fn ensure_wells(&self) -> Result<()> {
        if self.well_count() == 0 {
            return Err(GeometryError::EmptyPlate {
                template: self.name.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

pub static TEMPLATE_CATALOG: &[TemplateGeometry] = &[
    TemplateGeometry {
        name: "One drop",
        description: "Single drop deposition",
        rows: 1,
        cols: 1,
        well_spacing_x: 0.0,
        well_spacing_y: 0.0,
        plate_length: 0.0,
        plate_width: 0.0,
    },
    TemplateGeometry {
        name: "96-well plate",
        description: "Standard 96-well plate (8x12 configuration)",
        rows: 8,
        cols: 12,
        well_spacing_x: 9.0,
        well_spacing_y: 9.0,
        plate_length: 127.76,
        plate_width: 85.48,
    },
    TemplateGeometry {
        name: "48-well plate",
        description: "Standard 48-well plate (6x8 configuration)",
        rows: 6,
        cols: 8,
        well_spacing_x: 18.16,
        well_spacing_y: 18.16,
        plate_length: 127.76,
        plate_width: 85.48,
    },
    TemplateGeometry {
        name: "u-Slide 8 Well",
        description: "ibidi u-Slide 8 Well plate (2x4 configuration)",
        rows: 2,
        cols: 4,
        well_spacing_x: 19.0,
        well_spacing_y: 19.0,
        plate_length: 75.5,
        plate_width: 25.5,
    },
    TemplateGeometry {
        name: "u-Slide Spheroid Perfusion",
        description: "ibidi u-Slide Spheroid Perfusion plate (3x7 configuration)",
        rows: 3,
        cols: 7,
        well_spacing_x: 4.5,
        well_spacing_y: 9.0,
        plate_length: 75.5,
        plate_width: 25.5,
    },
    TemplateGeometry {
        name: "u-Slide 15 Well 3D",
        description: "ibidi u-Slide 15 Well 3D plate (3x5 configuration)",
        rows: 3,
        cols: 5,
        well_spacing_x: 9.0,
        well_spacing_y: 7.0,
        plate_length: 75.5,
        plate_width: 25.5,
    },
    TemplateGeometry {
        name: "u-Slide 18 Well",
        description: "ibidi u-Slide 18 Well plate (3x6 configuration)",
        rows: 3,
        cols: 6,
        well_spacing_x: 8.10,
        well_spacing_y: 7.45,
        plate_length: 75.5,
        plate_width: 25.5,
    },
];

/// Look up a template by its exact name.
pub fn lookup_template(name: &str) -> Result<&'static TemplateGeometry> {
    TEMPLATE_CATALOG
        .iter()
        .find(|t| t.name == name)
        .ok_or_else(|| Error::UnknownTemplate {
            name: name.to_string(),
        })
}

/// Template names, sorted alphabetically.
pub fn available_templates() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = TEMPLATE_CATALOG.iter().map(|t| t.name).collect();
    names.sort_unstable();
    names
}
