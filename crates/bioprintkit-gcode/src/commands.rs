//! Command emitter for the bioprinter controller dialect.
//!
//! Each function appends one self-contained fragment to a [`GcodeProgram`]
//! and returns the extended program. Numbers are written with
//! [`format_number`] unless a move asks for precision mode, in which case
//! coordinates use three fixed decimals.
//!
//! Any step that later steps depend on physically (motion that must finish
//! before extruding, temperature that must settle) is followed by `M400`.

use bioprintkit_core::{format_fixed, format_number, InfillPattern, PrintheadTechnology, WellIndex};
use glam::DVec2;

use crate::geometry::{perimeter_corners, stripe_paths, LinePlan, ScaffoldFootprint};
use crate::program::GcodeProgram;

const WAIT_FOR_MOVES: &str = "M400 ; wait for queued moves to finish";

/// Pressure used to purge the nozzle when cleaning (kPa)
pub const CLEANING_PRESSURE: i32 = 50;
/// Purge duration when cleaning (s)
pub const CLEANING_TIME: f64 = 1.0;
/// XY position of the cleaning station, in whole millimetres
pub const CLEANING_POSITION: (i32, i32) = (-20, -50);
/// Bed Z parked at the end of every program
pub const PARKING_Z: f64 = 50.0;

/// Program header: units, positioning mode and optional selection notes.
pub fn initialize(
    technology: Option<PrintheadTechnology>,
    pattern: Option<InfillPattern>,
) -> GcodeProgram {
    let mut program = GcodeProgram::new().push_comment("Code beginning").push_blank();

    if let Some(technology) = technology {
        program = program
            .push_comment(format!("{technology} printhead selected"))
            .push_blank();
    }
    if let Some(pattern) = pattern {
        program = program
            .push_comment(format!("{pattern} infill pattern selected"))
            .push_blank();
    }

    program
        .push_line("G21 ; set units to millimeters")
        .push_line("G90 ; use absolute coordinates")
        .push_line("M83 ; use relative distances for extrusion")
}

pub fn template_comment(program: GcodeProgram, template_name: &str) -> GcodeProgram {
    program
        .push_blank()
        .push_comment(format!("{template_name} template selected"))
        .push_blank()
}

/// Select the active printhead, optionally with a Z parameter.
pub fn select_printhead(program: GcodeProgram, index: u8, z: Option<f64>) -> GcodeProgram {
    let line = match z {
        Some(z) => {
            let z = format_number(z);
            format!("T{index} Z{z} ; set printhead number {index} at Z{z}")
        }
        None => format!("T{index} ; set printhead number {index}"),
    };
    program.push_line(line).push_blank()
}

/// Set the default feed rate (mm/s).
pub fn set_speed(program: GcodeProgram, speed: f64) -> GcodeProgram {
    let speed = format_number(speed);
    program
        .push_line(format!("G1 F{speed} ; Set print speed to {speed} mm/s"))
        .push_blank()
}

/// Set the bed temperature and wait for it. `None` emits nothing.
pub fn set_bed_temperature(program: GcodeProgram, temperature: Option<f64>) -> GcodeProgram {
    match temperature {
        Some(temperature) => program
            .push_line(format!(
                "M801 S{} ; Set bed temperature",
                format_number(temperature)
            ))
            .push_line("M400 ; wait for bed temperature setting to finish")
            .push_blank(),
        None => program,
    }
}

/// Set a printhead temperature and wait for it.
pub fn set_printhead_temperature(program: GcodeProgram, temperature: f64, index: u8) -> GcodeProgram {
    let temperature = format_number(temperature);
    program
        .push_line(format!(
            "M771 T{index} P{temperature} ; Set printhead at {temperature} ºC"
        ))
        .push_line("M400 ; wait for printhead temperature setting to finish")
        .push_blank()
}

/// Extra settle wait after a per-well temperature change.
pub fn wait_for_temperature(program: GcodeProgram) -> GcodeProgram {
    program.push_line("M400 ; wait for temperature change")
}

pub fn set_default_pressure(program: GcodeProgram, pressure: f64, index: u8) -> GcodeProgram {
    program
        .push_line(format!(
            "M773 T{index} P{} ; Set default pressure for printhead {index}",
            format_number(pressure)
        ))
        .push_blank()
}

/// Target of a single linear move
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveTo {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    /// Feed rate (mm/s). `None` keeps the controller default.
    pub speed: Option<f64>,
    /// Extrusion amount. A move carrying extrusion is written as `G1`.
    pub extrusion: Option<f64>,
    /// Well annotated in the trailing comment
    pub well: Option<WellIndex>,
    /// Write coordinates with three fixed decimals
    pub precise: bool,
    /// Follow the move with `M400`
    pub wait: bool,
}

impl MoveTo {
    pub fn xy(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn z(z: f64) -> Self {
        Self {
            z: Some(z),
            ..Default::default()
        }
    }

    pub fn point(point: DVec2) -> Self {
        Self::xy(point.x, point.y)
    }

    pub fn with_z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_extrusion(mut self, amount: f64) -> Self {
        self.extrusion = Some(amount);
        self
    }

    pub fn at_well(mut self, well: WellIndex) -> Self {
        self.well = Some(well);
        self
    }

    pub fn precise(mut self) -> Self {
        self.precise = true;
        self
    }

    pub fn waiting(mut self) -> Self {
        self.wait = true;
        self
    }
}

/// Linear move, rapid (`G0`) or extruding (`G1`).
pub fn move_to(program: GcodeProgram, target: &MoveTo) -> GcodeProgram {
    let coordinate = |value: f64| {
        if target.precise {
            format_fixed(value)
        } else {
            format_number(value)
        }
    };

    let mut words = vec![if target.extrusion.is_some() { "G1" } else { "G0" }.to_string()];
    let mut position = String::new();
    for (axis, value) in [("X", target.x), ("Y", target.y), ("Z", target.z)] {
        if let Some(value) = value {
            let word = format!("{axis}{}", coordinate(value));
            position.push(' ');
            position.push_str(&word);
            words.push(word);
        }
    }
    if let Some(amount) = target.extrusion {
        words.push(format!("E{}", coordinate(amount)));
    }
    if let Some(speed) = target.speed {
        words.push(format!("F{}", format_number(speed)));
    }

    let verb = if target.extrusion.is_some() {
        "Extrude to"
    } else {
        "Move to"
    };
    let mut line = format!("{} ; {verb}{position}", words.join(" "));
    match target.speed {
        Some(speed) => line.push_str(&format!(" with speed {} mm/s", format_number(speed))),
        None => line.push_str(" with default speed"),
    }
    if let Some(well) = target.well {
        line.push_str(&format!(" well {}", well.label()));
    }

    let program = program.push_line(line);
    if target.wait {
        program.push_line(WAIT_FOR_MOVES).push_blank()
    } else {
        program
    }
}

/// Move the print bed and wait for it. Z 0 is the extrusion position.
pub fn move_bed(program: GcodeProgram, z: f64, speed: Option<f64>) -> GcodeProgram {
    let mut line = format!("G0 Z{}", format_number(z));
    if let Some(speed) = speed {
        line.push_str(&format!(" F{}", format_number(speed)));
    }
    line.push_str(" ; move printbed");
    if z == 0.0 {
        line.push_str(" up to extrusion position");
    } else {
        line.push_str(" down to movement position");
    }
    match speed {
        Some(speed) => line.push_str(&format!(" with speed {} mm/s", format_number(speed))),
        None => line.push_str(" with default speed"),
    }
    program.push_line(line).push_line(WAIT_FOR_MOVES).push_blank()
}

pub fn dwell(program: GcodeProgram, seconds: f64) -> GcodeProgram {
    let seconds = format_number(seconds);
    program.push_line(format!("G4 S{seconds} ; Pause for {seconds} seconds"))
}

/// Human readable name of a technology's extrusion in comments.
fn extrusion_label(technology: PrintheadTechnology) -> &'static str {
    match technology {
        PrintheadTechnology::Emd => "EMD",
        PrintheadTechnology::Pneumatic => "pneumatic",
        PrintheadTechnology::ThermoControlled => "thermo-controlled",
        PrintheadTechnology::SyringePump => "syringe pump",
    }
}

/// `G4` wait split into whole seconds and truncated milliseconds.
fn split_wait(program: GcodeProgram, duration: f64) -> GcodeProgram {
    let seconds = duration.trunc() as i64;
    let millis = ((duration - seconds as f64) * 1000.0) as i64;

    let line = if seconds != 0 && millis != 0 {
        format!("G4 S{seconds} P{millis}; Wait for {seconds} seconds and {millis} milliseconds")
    } else if millis == 0 {
        format!("G4 S{seconds}; Wait for {seconds} seconds")
    } else {
        format!("G4 P{millis}; Wait for {millis} milliseconds")
    };
    program.push_line(line)
}

fn pressure_extrusion(
    program: GcodeProgram,
    technology: PrintheadTechnology,
    index: u8,
    pressure: &str,
    duration: f64,
) -> GcodeProgram {
    let label = extrusion_label(technology);
    let program = program.push_line(format!(
        "M750 T{index} P{pressure}; Start {label} extrusion with pressure {pressure} kPa"
    ));
    split_wait(program, duration)
        .push_line(format!("M751 T{index} ; Stop {label} extrusion"))
        .push_blank()
}

/// Start, hold and stop an EMD extrusion.
pub fn emd_extrusion(program: GcodeProgram, index: u8, pressure: f64, duration: f64) -> GcodeProgram {
    let pressure = format_number(pressure);
    pressure_extrusion(program, PrintheadTechnology::Emd, index, &pressure, duration)
}

/// Start, hold and stop a pneumatic extrusion.
pub fn pneumatic_extrusion(
    program: GcodeProgram,
    index: u8,
    pressure: f64,
    duration: f64,
) -> GcodeProgram {
    let pressure = format_number(pressure);
    pressure_extrusion(program, PrintheadTechnology::Pneumatic, index, &pressure, duration)
}

/// Thermo-controlled extrusion holds with a plain `G4 S` pause, fractional
/// seconds included.
pub fn thermo_extrusion(program: GcodeProgram, index: u8, pressure: f64, duration: f64) -> GcodeProgram {
    let label = extrusion_label(PrintheadTechnology::ThermoControlled);
    let pressure = format_number(pressure);
    let program = program.push_line(format!(
        "M750 T{index} P{pressure}; Start {label} extrusion with pressure {pressure} kPa"
    ));
    dwell(program, duration)
        .push_line(format!("M751 T{index} ; Stop {label} extrusion"))
        .push_blank()
}

/// Syringe pump extrusion through the E axis, 10 units per second.
pub fn syringe_extrusion(program: GcodeProgram, duration: f64) -> GcodeProgram {
    program.push_line(format!(
        "G1 E{} F100 ; Extrude material",
        format_number(10.0 * duration)
    ))
}

/// Extrude with whatever mechanism the technology uses.
pub fn extrude(
    program: GcodeProgram,
    technology: PrintheadTechnology,
    index: u8,
    pressure: f64,
    duration: f64,
) -> GcodeProgram {
    match technology {
        PrintheadTechnology::Emd => emd_extrusion(program, index, pressure, duration),
        PrintheadTechnology::Pneumatic => pneumatic_extrusion(program, index, pressure, duration),
        PrintheadTechnology::ThermoControlled => thermo_extrusion(program, index, pressure, duration),
        PrintheadTechnology::SyringePump => syringe_extrusion(program, duration),
    }
}

/// Single-command timed extrusion (`M750 ... D<seconds>`).
pub fn extrusion_cycle(
    program: GcodeProgram,
    technology: PrintheadTechnology,
    index: u8,
    pressure: f64,
    duration: f64,
) -> GcodeProgram {
    let duration = format_number(duration);
    program
        .push_line(format!(
            "M750 T{index} P{} D{duration}; {} extrusion for {duration} seconds",
            format_number(pressure),
            extrusion_label(technology)
        ))
        .push_blank()
}

/// Purge the nozzle at the cleaning station and return the bed.
pub fn clean_printhead(
    program: GcodeProgram,
    index: u8,
    speed: f64,
    bed_movement_position: f64,
) -> GcodeProgram {
    let (x, y) = CLEANING_POSITION;
    let speed_text = format_number(speed);
    let program = program
        .push_comment(format!("cleaning printhead number {index}"))
        .push_line(format!(
            "G0 X{x} Y{y} F{speed_text} ; Move to X{x} Y{y} with speed {speed_text} mm/s"
        ))
        .push_line(WAIT_FOR_MOVES)
        .push_blank();
    let program = move_bed(program, 0.0, Some(speed));
    let program = pressure_extrusion(
        program,
        PrintheadTechnology::Emd,
        index,
        &CLEANING_PRESSURE.to_string(),
        CLEANING_TIME,
    );
    move_bed(program, bed_movement_position, Some(speed))
        .push_comment(format!("finished cleaning printhead number {index}"))
        .push_blank()
}

/// Extruded rectangle around the footprint, ending back on the origin.
pub fn generate_perimeter(
    program: GcodeProgram,
    footprint: &ScaffoldFootprint,
    extrusion: f64,
    speed: f64,
) -> GcodeProgram {
    let corners = perimeter_corners(footprint);
    let last = corners.len() - 1;
    corners
        .iter()
        .enumerate()
        .fold(program, |program, (i, corner)| {
            let mut target = MoveTo::point(*corner)
                .with_extrusion(extrusion)
                .with_speed(speed)
                .precise();
            target.wait = i == last;
            move_to(program, &target)
        })
}

/// Interior parallel lines of one infill pass at `height`.
///
/// Travels between lines are rapids without a wait; only the final
/// extruding line is followed by `M400`.
pub fn generate_stripe_infill(
    program: GcodeProgram,
    footprint: &ScaffoldFootprint,
    plan: &LinePlan,
    height: f64,
    extrusion: f64,
    speed: f64,
) -> GcodeProgram {
    let paths = stripe_paths(footprint, plan);
    let last = paths.len().saturating_sub(1);
    paths
        .iter()
        .enumerate()
        .fold(program, |program, (i, (start, end))| {
            let program = move_to(program, &MoveTo::point(*start).with_z(height).precise());
            let mut line = MoveTo::point(*end)
                .with_extrusion(extrusion)
                .with_speed(speed)
                .precise();
            line.wait = i == last;
            move_to(program, &line)
        })
}

/// Outline every honeycomb cell at `height`.
///
/// `extrusion_per_mm` scales the amount of each side by its length.
pub fn generate_honeycomb_infill(
    program: GcodeProgram,
    cells: &[[DVec2; 6]],
    height: f64,
    extrusion_per_mm: f64,
    speed: f64,
) -> GcodeProgram {
    let last = cells.len().saturating_sub(1);
    cells.iter().enumerate().fold(program, |program, (i, cell)| {
        let program = move_to(program, &MoveTo::point(cell[0]).with_z(height).precise());
        (1..=cell.len()).fold(program, |program, k| {
            let from = cell[k - 1];
            let to = cell[k % cell.len()];
            let mut side = MoveTo::point(to)
                .with_extrusion(extrusion_per_mm * from.distance(to))
                .with_speed(speed)
                .precise();
            side.wait = i == last && k == cell.len();
            move_to(program, &side)
        })
    })
}

/// End-of-program behaviour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Termination {
    /// Switch bed heating off before parking
    pub turn_off_bed_heating: bool,
    /// Disable motors, otherwise leave the machine holding its state
    pub disable_motors: bool,
}

/// Park the bed and either release the machine or leave it holding.
pub fn terminate(program: GcodeProgram, termination: Termination) -> GcodeProgram {
    let program = if termination.turn_off_bed_heating {
        program.push_line("M800 ; Turn off bed heating")
    } else {
        program
    };
    let program = program
        .push_line(format!(
            "G0 Z{}; move bed to parking position",
            PARKING_Z as i64
        ))
        .push_line("M400; wait for bed to reach parking position");

    if termination.disable_motors {
        program.push_line("M84 ; Disable motors")
    } else {
        program
            .push_comment("Current operation not terminated to maintain conditions")
            .push_comment("Don't forget to terminate operation manually when finished")
    }
}
