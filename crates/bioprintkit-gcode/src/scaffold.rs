//! Scaffold Program Builder
//!
//! Prints a rectangular construct layer by layer. Every layer lifts clear,
//! returns to the origin corner, traces the perimeter and then lays the
//! selected infill pattern. The preview walks the same geometry, so the
//! drawn toolpath always matches the emitted G-code.

use bioprintkit_core::{
    format_fixed, InfillPattern, ParameterError, PrintheadSpec, Result, ScaffoldSpec,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::commands::{self, MoveTo, Termination};
use crate::droplet::MAX_PRINTHEAD_INDEX;
use crate::geometry::{
    grid_plans, honeycomb_cells, perimeter_corners, stripe_paths, striped_plan, HoneycombPlan,
    LinePlan, ScaffoldFootprint,
};
use crate::preview::{PreviewPen, ScaffoldPreview, SegmentKind};
use crate::program::GcodeProgram;

/// Feed rate of repositioning rapids (mm/s)
pub const RAPID_SPEED: f64 = 3000.0;
/// Lift above the current layer while repositioning (mm)
pub const LAYER_CLEARANCE: f64 = 1.0;

/// Parameters for a scaffold program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaffoldParameters {
    pub printhead: PrintheadSpec,
    pub scaffold: ScaffoldSpec,
    /// Extrusion per straight line. Defaults to the nozzle width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extrusion_amount: Option<f64>,
    #[serde(default)]
    pub terminate_operation: bool,
}

impl Default for ScaffoldParameters {
    fn default() -> Self {
        Self {
            printhead: PrintheadSpec::default(),
            scaffold: ScaffoldSpec::default(),
            extrusion_amount: None,
            terminate_operation: true,
        }
    }
}

impl ScaffoldParameters {
    pub fn validate(&self) -> Result<()> {
        ParameterError::check_range(
            "printhead_index",
            self.printhead.index as f64,
            0.0,
            MAX_PRINTHEAD_INDEX as f64,
        )?;
        self.scaffold.validate()?;
        if let Some(amount) = self.extrusion_amount {
            ParameterError::check_above("extrusion_amount", amount, 0.0)?;
        }
        Ok(())
    }

    pub fn extrusion_amount(&self) -> f64 {
        self.extrusion_amount.unwrap_or(self.scaffold.nozzle_width)
    }
}

/// Infill geometry resolved once per program
#[derive(Debug, Clone, Copy, PartialEq)]
enum InfillPlan {
    Striped(LinePlan),
    Grid([LinePlan; 2]),
    Honeycomb(HoneycombPlan),
}

impl InfillPlan {
    fn new(spec: &ScaffoldSpec, footprint: &ScaffoldFootprint) -> Result<Self> {
        let plan = match spec.pattern {
            InfillPattern::Striped => InfillPlan::Striped(striped_plan(spec, footprint)?),
            InfillPattern::Grid => InfillPlan::Grid(grid_plans(spec, footprint)?),
            InfillPattern::Honeycomb => InfillPlan::Honeycomb(HoneycombPlan::from_spec(spec)),
        };
        Ok(plan)
    }

    fn line_plans(&self) -> &[LinePlan] {
        match self {
            InfillPlan::Striped(plan) => std::slice::from_ref(plan),
            InfillPlan::Grid(plans) => plans,
            InfillPlan::Honeycomb(_) => &[],
        }
    }
}

/// Generator for scaffold G-code and previews
pub struct ScaffoldGenerator {
    params: ScaffoldParameters,
}

impl ScaffoldGenerator {
    pub fn new(params: ScaffoldParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ScaffoldParameters {
        &self.params
    }

    fn prepare(&self) -> Result<(ScaffoldFootprint, InfillPlan)> {
        self.params.validate()?;
        let footprint = ScaffoldFootprint::from_spec(&self.params.scaffold);
        let infill = InfillPlan::new(&self.params.scaffold, &footprint)?;
        Ok((footprint, infill))
    }

    /// Generate the full program. Nothing is emitted unless validation passes.
    pub fn generate(&self) -> Result<GcodeProgram> {
        let (footprint, infill) = self.prepare()?;
        let p = &self.params;
        let spec = &p.scaffold;

        info!(
            pattern = %spec.pattern,
            layers = spec.layer_count,
            width = footprint.dimensions.x,
            height = footprint.dimensions.y,
            "Generating scaffold program"
        );

        let program = commands::initialize(Some(p.printhead.technology), Some(spec.pattern));
        let mut program =
            commands::select_printhead(program, p.printhead.index, Some(spec.layer_height));

        for layer in 1..=spec.layer_count {
            let z = layer as f64 * spec.layer_height;
            program = self.emit_layer(program, &footprint, &infill, layer, z)?;
        }

        let program = commands::terminate(
            program,
            Termination {
                turn_off_bed_heating: false,
                disable_motors: p.terminate_operation,
            },
        );

        info!(lines = program.lines().count(), "Scaffold program generated");
        Ok(program)
    }

    fn emit_layer(
        &self,
        program: GcodeProgram,
        footprint: &ScaffoldFootprint,
        infill: &InfillPlan,
        layer: u32,
        z: f64,
    ) -> Result<GcodeProgram> {
        let spec = &self.params.scaffold;
        let extrusion = self.params.extrusion_amount();
        let rapid = |target: MoveTo| target.with_speed(RAPID_SPEED).precise();

        let program = program.push_comment(format!(
            "Layer {layer} of {} at Z{}",
            spec.layer_count,
            format_fixed(z)
        ));
        let program = commands::move_to(program, &rapid(MoveTo::z(z + LAYER_CLEARANCE)));
        let program = commands::move_to(program, &rapid(MoveTo::point(footprint.origin)));
        let program = commands::move_to(program, &rapid(MoveTo::z(z)).waiting());

        let program = program.push_comment(format!("Layer {layer} perimeter"));
        let program = commands::generate_perimeter(program, footprint, extrusion, spec.speed);
        let program = commands::move_to(program, &rapid(MoveTo::z(z + LAYER_CLEARANCE)));

        let program = program.push_comment(format!("Layer {layer} {} infill", spec.pattern));
        let program = match infill {
            InfillPlan::Honeycomb(plan) => {
                let cells = honeycomb_cells(footprint, plan, layer)?;
                debug!(layer, cells = cells.len(), "Honeycomb layer");
                commands::generate_honeycomb_infill(
                    program,
                    &cells,
                    z,
                    extrusion / footprint.dimensions.y,
                    spec.speed,
                )
            }
            lines => lines.line_plans().iter().fold(program, |program, plan| {
                debug!(layer, lines = plan.line_count, spacing = plan.spacing, "Line infill pass");
                if plan.line_count < 2 {
                    warn!(layer, "Infill pass has no interior lines");
                }
                commands::generate_stripe_infill(program, footprint, plan, z, extrusion, spec.speed)
            }),
        };
        Ok(program.push_blank())
    }

    /// Line segments of every layer, following the emitted toolpath.
    pub fn preview(&self) -> Result<ScaffoldPreview> {
        let (footprint, infill) = self.prepare()?;
        let spec = &self.params.scaffold;
        let mut pen = PreviewPen::default();

        for layer in 1..=spec.layer_count {
            let z = layer as f64 * spec.layer_height;
            pen.set_layer(layer);
            pen.travel_z(z + LAYER_CLEARANCE);
            pen.travel_xy(footprint.origin);
            pen.travel_z(z);

            for corner in perimeter_corners(&footprint) {
                pen.draw_xy(corner, SegmentKind::Perimeter);
            }
            pen.travel_z(z + LAYER_CLEARANCE);

            match &infill {
                InfillPlan::Honeycomb(plan) => {
                    for cell in honeycomb_cells(&footprint, plan, layer)? {
                        pen.travel_to(cell[0], z);
                        for vertex in cell.iter().skip(1).chain(std::iter::once(&cell[0])) {
                            pen.draw_xy(*vertex, SegmentKind::Infill);
                        }
                    }
                }
                lines => {
                    for plan in lines.line_plans() {
                        for (start, end) in stripe_paths(&footprint, plan) {
                            pen.travel_to(start, z);
                            pen.draw_xy(end, SegmentKind::Infill);
                        }
                    }
                }
            }
        }

        let preview = pen.finish();
        debug!(segments = preview.segments.len(), "Scaffold preview built");
        Ok(preview)
    }
}

/// Generate a scaffold program.
pub fn generate(params: &ScaffoldParameters) -> Result<GcodeProgram> {
    ScaffoldGenerator::new(params.clone()).generate()
}

/// Preview segments of a scaffold.
pub fn preview(params: &ScaffoldParameters) -> Result<ScaffoldPreview> {
    ScaffoldGenerator::new(params.clone()).preview()
}
