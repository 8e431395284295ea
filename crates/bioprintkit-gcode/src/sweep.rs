//! Sweep resolution.
//!
//! Expands a [`SweepSpec`] into one value per well, in the same row-major
//! order the droplet builder visits wells.

use bioprintkit_core::{PrintheadSpec, SweepAxis, SweepDirection, SweepSpec, TemplateGeometry};

/// `num` evenly spaced values from `start` to `stop`, both included.
///
/// Values are computed as `start + i * step` with the last one pinned to
/// `stop`, so endpoints are exact. A single sample yields `[start]`.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut values: Vec<f64> = (0..num).map(|i| start + i as f64 * step).collect();
            values[num - 1] = stop;
            values
        }
    }
}

/// Per-well values for a linear sweep on a `rows` x `cols` plate.
///
/// - `Row`: one value per row, repeated across its columns
/// - `Column`: one value per column, tiled over every row
/// - `Well`: one value per well
pub fn resolve(
    initial: f64,
    final_value: f64,
    direction: SweepDirection,
    rows: usize,
    cols: usize,
) -> Vec<f64> {
    match direction {
        SweepDirection::Row => linspace(initial, final_value, rows)
            .into_iter()
            .flat_map(|value| std::iter::repeat(value).take(cols))
            .collect(),
        SweepDirection::Column => {
            let per_column = linspace(initial, final_value, cols);
            (0..rows).flat_map(|_| per_column.iter().copied()).collect()
        }
        SweepDirection::Well => linspace(initial, final_value, rows * cols),
    }
}

pub fn resolve_sweep(sweep: &SweepSpec, template: &TemplateGeometry) -> Vec<f64> {
    resolve(
        sweep.initial,
        sweep.final_value,
        sweep.direction,
        template.rows,
        template.cols,
    )
}

/// Process settings for one well
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WellSettings {
    /// Extrusion pressure (kPa)
    pub pressure: f64,
    /// Printhead temperature to set before extruding, if swept
    pub temperature: Option<f64>,
    /// Extrusion duration (s)
    pub extrusion_time: f64,
}

/// Settings for every well in row-major order.
///
/// Only the swept parameter varies. Temperatures are emitted per well only
/// while a temperature sweep is active; otherwise the printhead temperature
/// is set once in the program preamble.
pub fn well_schedule(
    template: &TemplateGeometry,
    printhead: &PrintheadSpec,
    extrusion_time: f64,
    sweep: Option<&SweepSpec>,
) -> Vec<WellSettings> {
    let count = template.well_count();
    let base = WellSettings {
        pressure: printhead.default_pressure,
        temperature: None,
        extrusion_time,
    };

    let Some(sweep) = sweep else {
        return vec![base; count];
    };

    resolve_sweep(sweep, template)
        .into_iter()
        .map(|value| match sweep.axis {
            SweepAxis::Pressure => WellSettings {
                pressure: value,
                ..base
            },
            SweepAxis::Temperature => WellSettings {
                temperature: Some(value),
                ..base
            },
            SweepAxis::ExtrusionTime => WellSettings {
                extrusion_time: value,
                ..base
            },
        })
        .collect()
}
