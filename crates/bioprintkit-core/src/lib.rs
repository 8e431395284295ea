//! # BioPrintKit Core
//!
//! Core types and utilities for BioPrintKit.
//! Provides the print parameter data model shared by the G-code builders,
//! the static plate template catalog, number formatting for the controller
//! command syntax, and the error types used across the workspace.

pub mod data;
pub mod error;
pub mod units;

pub use data::{
    scaffold::{InfillPattern, ScaffoldSpec},
    sweep::{SweepAxis, SweepDirection, SweepSpec},
    templates::{available_templates, lookup_template, TemplateGeometry, TEMPLATE_CATALOG},
    PrintheadSpec, PrintheadTechnology, WellIndex,
};

pub use error::{Error, GeometryError, ParameterError, Result};

pub use units::{format_fixed, format_number, parse_number};
