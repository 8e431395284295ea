//! Droplet Program Builder
//!
//! Deposits one droplet per well of a plate template, visiting wells
//! row-major, with at most one process parameter swept across the plate.

use bioprintkit_core::{
    lookup_template, ParameterError, PrintheadSpec, PrintheadTechnology, Result, SweepAxis,
    SweepSpec, TemplateGeometry, WellIndex,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::commands::{self, MoveTo, Termination};
use crate::program::GcodeProgram;
use crate::sweep::{well_schedule, WellSettings};

/// Highest printhead tool slot
pub const MAX_PRINTHEAD_INDEX: u8 = 2;
/// Highest print speed the machine accepts (mm/s)
pub const MAX_PRINT_SPEED: f64 = 1500.0;
/// Extrusion pressure limits (kPa)
pub const PRESSURE_LIMITS: (f64, f64) = (0.0, 200.0);
/// Bed temperature limits (°C)
pub const BED_TEMPERATURE_LIMITS: (f64, f64) = (4.0, 65.0);
/// Well height limits for droplet deposition (mm)
pub const LAYER_HEIGHT_LIMITS: (f64, f64) = (0.1, 1.0);

/// Parameters for a droplet program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropletParameters {
    pub printhead: PrintheadSpec,
    /// Plate template name, as listed in the catalog
    pub template: String,
    /// Travel speed between wells (mm/s)
    pub print_speed: f64,
    /// Bed Z used for pneumatic extrusion (mm)
    pub layer_height: f64,
    /// Bed Z used for travel between wells (mm)
    pub bed_movement_position: f64,
    /// Extrusion duration per well (s)
    pub extrusion_time: f64,
    /// Bed temperature (°C), used when `control_bed_temperature` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bed_temperature: Option<f64>,
    #[serde(default)]
    pub control_bed_temperature: bool,
    #[serde(default)]
    pub control_printhead_temperature: bool,
    #[serde(default)]
    pub clean_printhead: bool,
    /// Disable motors at the end instead of holding conditions
    #[serde(default)]
    pub terminate_operation: bool,
    /// Extrude with a single timed `M750 ... D` command
    #[serde(default)]
    pub timed_extrusion: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweep: Option<SweepSpec>,
}

impl Default for DropletParameters {
    fn default() -> Self {
        Self {
            printhead: PrintheadSpec::default(),
            template: "96-well plate".to_string(),
            print_speed: 10.0,
            layer_height: 0.2,
            bed_movement_position: 5.0,
            extrusion_time: 1.0,
            bed_temperature: None,
            control_bed_temperature: false,
            control_printhead_temperature: false,
            clean_printhead: false,
            terminate_operation: true,
            timed_extrusion: false,
            sweep: None,
        }
    }
}

impl DropletParameters {
    /// Check every field against its physical bounds and resolve the template.
    pub fn validate(&self) -> Result<&'static TemplateGeometry> {
        let template = lookup_template(&self.template)?;
        template.ensure_wells()?;

        ParameterError::check_range(
            "printhead_index",
            self.printhead.index as f64,
            0.0,
            MAX_PRINTHEAD_INDEX as f64,
        )?;
        ParameterError::check_above("print_speed", self.print_speed, 0.0)?;
        ParameterError::check_range("print_speed", self.print_speed, 0.0, MAX_PRINT_SPEED)?;
        let (min_z, max_z) = LAYER_HEIGHT_LIMITS;
        ParameterError::check_range("layer_height", self.layer_height, min_z, max_z)?;
        ParameterError::check_above("bed_movement_position", self.bed_movement_position, 0.0)?;
        ParameterError::check_above("extrusion_time", self.extrusion_time, 0.0)?;
        let (min_p, max_p) = PRESSURE_LIMITS;
        ParameterError::check_range("pressure", self.printhead.default_pressure, min_p, max_p)?;

        match &self.sweep {
            Some(sweep) => {
                if template.is_single_drop() {
                    return Err(ParameterError::Incompatible(format!(
                        "{} sweep requires more than one well, '{}' has one",
                        sweep.axis, template.name
                    ))
                    .into());
                }
                sweep.validate()?;
            }
            None => {
                if self.control_bed_temperature {
                    let temperature = required("bed_temperature", self.bed_temperature)?;
                    let (min_t, max_t) = BED_TEMPERATURE_LIMITS;
                    ParameterError::check_range("bed_temperature", temperature, min_t, max_t)?;
                }
                if self.control_printhead_temperature {
                    let temperature =
                        required("printhead_temperature", self.printhead.temperature)?;
                    let (min_t, max_t) = self.printhead.technology.temperature_limits();
                    ParameterError::check_range(
                        "printhead_temperature",
                        temperature,
                        min_t,
                        max_t,
                    )?;
                }
            }
        }

        if self.timed_extrusion
            && !matches!(
                self.printhead.technology,
                PrintheadTechnology::Emd | PrintheadTechnology::ThermoControlled
            )
        {
            return Err(ParameterError::Incompatible(format!(
                "timed extrusion is not available for {} printheads",
                self.printhead.technology
            ))
            .into());
        }

        Ok(template)
    }

    fn sweeps(&self, axis: SweepAxis) -> bool {
        self.sweep.is_some_and(|sweep| sweep.axis == axis)
    }
}

fn required(field: &str, value: Option<f64>) -> std::result::Result<f64, ParameterError> {
    value.ok_or_else(|| ParameterError::InvalidValue {
        field: field.to_string(),
        reason: "a value is required when its control is enabled".to_string(),
    })
}

/// Stages of a droplet program, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropletStage {
    Init,
    HeaderEmitted,
    TemperatureSet,
    PressureDefaulted,
    CleaningDone,
    PerWellLoop,
    Terminated,
}

impl fmt::Display for DropletStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::HeaderEmitted => "header emitted",
            Self::TemperatureSet => "temperature set",
            Self::PressureDefaulted => "pressure defaulted",
            Self::CleaningDone => "cleaning done",
            Self::PerWellLoop => "per-well loop",
            Self::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Generator for droplet G-code
pub struct DropletGenerator {
    params: DropletParameters,
}

impl DropletGenerator {
    pub fn new(params: DropletParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &DropletParameters {
        &self.params
    }

    /// Generate the full program. Nothing is emitted unless validation passes.
    pub fn generate(&self) -> Result<GcodeProgram> {
        let p = &self.params;
        let template = p.validate()?;
        let printhead = &p.printhead;
        let schedule = well_schedule(template, printhead, p.extrusion_time, p.sweep.as_ref());

        info!(
            template = template.name,
            technology = %printhead.technology,
            wells = schedule.len(),
            sweep = ?p.sweep.map(|s| s.axis),
            "Generating droplet program"
        );

        let mut stage = DropletStage::Init;
        let program = commands::initialize(Some(printhead.technology), None);
        let program = commands::template_comment(program, template.name);
        let mut program = commands::select_printhead(program, printhead.index, None);
        stage = advance(stage, DropletStage::HeaderEmitted);

        if p.sweep.is_none() {
            if p.control_bed_temperature {
                program = commands::set_bed_temperature(program, p.bed_temperature);
            }
            if p.control_printhead_temperature {
                if let Some(temperature) = printhead.temperature {
                    program =
                        commands::set_printhead_temperature(program, temperature, printhead.index);
                }
            }
            stage = advance(stage, DropletStage::TemperatureSet);
        }

        if !p.sweeps(SweepAxis::Pressure) {
            program =
                commands::set_default_pressure(program, printhead.default_pressure, printhead.index);
        }
        program = commands::set_speed(program, p.print_speed);
        stage = advance(stage, DropletStage::PressureDefaulted);

        if p.clean_printhead {
            program = commands::clean_printhead(
                program,
                printhead.index,
                p.print_speed,
                p.bed_movement_position,
            );
            stage = advance(stage, DropletStage::CleaningDone);
        }

        stage = advance(stage, DropletStage::PerWellLoop);
        for row in 0..template.rows {
            for col in 0..template.cols {
                let well = WellIndex::new(row, col);
                let settings = schedule[well.linear(template.cols)];
                program = self.deposit(program, template, well, &settings);
            }
        }

        let program = commands::terminate(
            program,
            Termination {
                turn_off_bed_heating: p.control_bed_temperature && p.sweep.is_none(),
                disable_motors: p.terminate_operation,
            },
        );
        advance(stage, DropletStage::Terminated);

        info!(
            lines = program.lines().count(),
            extrusions = schedule.len(),
            "Droplet program generated"
        );
        Ok(program)
    }

    /// Travel to one well and extrude into it.
    fn deposit(
        &self,
        program: GcodeProgram,
        template: &TemplateGeometry,
        well: WellIndex,
        settings: &WellSettings,
    ) -> GcodeProgram {
        let p = &self.params;
        let index = p.printhead.index;
        let speed = Some(p.print_speed);

        let program = match settings.temperature {
            Some(temperature) => commands::wait_for_temperature(
                commands::set_printhead_temperature(program, temperature, index),
            ),
            None => program,
        };

        let (x, y) = template.well_offset(well.row, well.col);
        let program = commands::move_to(
            program,
            &MoveTo::xy(x, y).with_speed(p.print_speed).at_well(well).waiting(),
        );

        let extrude = |program: GcodeProgram| {
            if p.timed_extrusion {
                commands::extrusion_cycle(
                    program,
                    p.printhead.technology,
                    index,
                    settings.pressure,
                    settings.extrusion_time,
                )
            } else {
                commands::extrude(
                    program,
                    p.printhead.technology,
                    index,
                    settings.pressure,
                    settings.extrusion_time,
                )
            }
        };

        match p.printhead.technology {
            PrintheadTechnology::Emd | PrintheadTechnology::ThermoControlled => {
                let program = commands::move_bed(program, 0.0, speed);
                let program = extrude(program);
                commands::move_bed(program, p.bed_movement_position, speed)
            }
            PrintheadTechnology::Pneumatic => {
                let program = commands::move_bed(program, p.layer_height, speed);
                let program = extrude(program);
                commands::move_bed(program, p.bed_movement_position, speed)
            }
            PrintheadTechnology::SyringePump => extrude(program),
        }
    }
}

fn advance(from: DropletStage, to: DropletStage) -> DropletStage {
    debug!(from = %from, to = %to, "Droplet program stage");
    to
}
