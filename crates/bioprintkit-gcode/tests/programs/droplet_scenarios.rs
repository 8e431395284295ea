use bioprintkit_core::{PrintheadSpec, PrintheadTechnology, SweepAxis, SweepDirection, SweepSpec};
use bioprintkit_gcode::{DropletGenerator, DropletParameters, GcodeProgram};

fn plate_96(printhead: PrintheadSpec) -> DropletParameters {
    DropletParameters {
        printhead,
        template: "96-well plate".to_string(),
        extrusion_time: 1.0,
        ..Default::default()
    }
}

fn pressures_of_extrusions(program: &GcodeProgram) -> Vec<String> {
    program
        .commands()
        .filter(|c| c.starts_with("M750 "))
        .map(|c| {
            c.split_whitespace()
                .find_map(|w| w.strip_prefix('P'))
                .unwrap()
                .to_string()
        })
        .collect()
}

#[test]
fn test_emd_plate_extrudes_every_well_between_bed_moves() {
    let program = DropletGenerator::new(plate_96(PrintheadSpec::default()))
        .generate()
        .unwrap();
    let commands: Vec<&str> = program.commands().collect();

    let starts: Vec<usize> = commands
        .iter()
        .enumerate()
        .filter(|(_, c)| c.starts_with("M750 "))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(starts.len(), 96);
    assert_eq!(program.count_command("M751"), 96);

    for k in starts {
        assert_eq!(commands[k], "M750 T0 P20.0");
        assert!(commands[k - 2].starts_with("G0 Z0.0"), "{}", commands[k - 2]);
        assert_eq!(commands[k - 1], "M400");
        assert_eq!(commands[k + 1], "G4 S1");
        assert_eq!(commands[k + 2], "M751 T0");
        assert!(commands[k + 3].starts_with("G0 Z5.0"), "{}", commands[k + 3]);
        assert_eq!(commands[k + 4], "M400");
    }
}

#[test]
fn test_wells_visited_row_major() {
    let program = DropletGenerator::new(plate_96(PrintheadSpec::default()))
        .generate()
        .unwrap();
    let labels: Vec<&str> = program
        .lines()
        .filter_map(|line| line.split_once(" well ").map(|(_, label)| label))
        .collect();

    let expected: Vec<String> = (1..=8)
        .flat_map(|r| (1..=12).map(move |c| format!("({r}, {c})")))
        .collect();
    assert_eq!(labels, expected);

    assert!(program
        .as_str()
        .contains("G0 X99.0 Y63.0 F10.0 ; Move to X99.0 Y63.0 with speed 10.0 mm/s well (8, 12)"));
}

#[test]
fn test_every_well_move_waits() {
    let program = DropletGenerator::new(plate_96(PrintheadSpec::default()))
        .generate()
        .unwrap();
    let lines: Vec<&str> = program.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        if line.starts_with("G0 ") {
            assert!(lines[i + 1].starts_with("M400"), "{line} is not followed by a wait");
        }
    }
}

#[test]
fn test_row_pressure_sweep() {
    let params = DropletParameters {
        sweep: Some(SweepSpec::new(
            SweepAxis::Pressure,
            10.0,
            100.0,
            SweepDirection::Row,
        )),
        ..plate_96(PrintheadSpec::default())
    };
    let program = DropletGenerator::new(params).generate().unwrap();
    let pressures = pressures_of_extrusions(&program);

    assert_eq!(pressures.len(), 96);
    assert!(pressures[..12].iter().all(|p| p == "10.0"));
    assert!(pressures[84..].iter().all(|p| p == "100.0"));
    assert_eq!(program.count_command("M773"), 0);
}

#[test]
fn test_syringe_pump_extrudes_through_e_axis() {
    let params = DropletParameters {
        template: "One drop".to_string(),
        extrusion_time: 2.0,
        printhead: PrintheadSpec {
            technology: PrintheadTechnology::SyringePump,
            ..Default::default()
        },
        ..Default::default()
    };
    let program = DropletGenerator::new(params).generate().unwrap();

    assert!(program.as_str().contains("G1 E20.0 F100 ; Extrude material\n"));
    assert_eq!(program.count_command("M750"), 0);
    assert_eq!(program.count_command("M751"), 0);
    assert_eq!(program.count_command("G4"), 0);
}

#[test]
fn test_thermo_raises_bed_and_pauses() {
    let params = DropletParameters {
        template: "One drop".to_string(),
        extrusion_time: 0.75,
        printhead: PrintheadSpec {
            technology: PrintheadTechnology::ThermoControlled,
            ..Default::default()
        },
        ..Default::default()
    };
    let program = DropletGenerator::new(params).generate().unwrap();
    let text = program.as_str();

    assert!(text.contains("G0 Z0.0 F10.0 ; move printbed up to extrusion position"));
    assert!(text.contains("G4 S0.75 ; Pause for 0.75 seconds\n"));
}

#[test]
fn test_cleaning_always_purges_emd_style() {
    let params = DropletParameters {
        template: "One drop".to_string(),
        clean_printhead: true,
        printhead: PrintheadSpec {
            technology: PrintheadTechnology::Pneumatic,
            index: 2,
            ..Default::default()
        },
        ..Default::default()
    };
    let program = DropletGenerator::new(params).generate().unwrap();
    let text = program.as_str();

    let cleaning = text.find("; cleaning printhead number 2").unwrap();
    let finished = text.find("; finished cleaning printhead number 2").unwrap();
    assert!(text[cleaning..finished].contains("G0 X-20 Y-50 F10.0 ; Move to X-20 Y-50"));
    assert!(text[cleaning..finished].contains("M750 T2 P50; Start EMD extrusion"));
    assert!(text[finished..].contains("Start pneumatic extrusion"));
}

#[test]
fn test_controlled_temperatures_and_holding_termination() {
    let params = DropletParameters {
        template: "u-Slide 8 Well".to_string(),
        control_bed_temperature: true,
        bed_temperature: Some(37.0),
        control_printhead_temperature: true,
        terminate_operation: false,
        printhead: PrintheadSpec {
            temperature: Some(40.0),
            index: 1,
            ..Default::default()
        },
        ..Default::default()
    };
    let program = DropletGenerator::new(params).generate().unwrap();
    let text = program.as_str();

    let bed = text.find("M801 S37.0").unwrap();
    let head = text.find("M771 T1 P40.0").unwrap();
    let pressure = text.find("M773 T1 P20.0").unwrap();
    assert!(bed < head && head < pressure);
    assert_eq!(program.count_command("M800"), 1);
    assert_eq!(program.count_command("M84"), 0);
    assert!(text.ends_with("; Don't forget to terminate operation manually when finished\n"));
}

#[test]
fn test_equal_sweep_endpoints_rejected() {
    let params = DropletParameters {
        sweep: Some(SweepSpec::new(
            SweepAxis::Pressure,
            50.0,
            50.0,
            SweepDirection::Well,
        )),
        ..plate_96(PrintheadSpec::default())
    };
    let err = DropletGenerator::new(params).generate().unwrap_err();
    assert!(err.is_parameter_error());
}

#[test]
fn test_temperature_sweep_heats_before_each_well_move() {
    let params = DropletParameters {
        template: "u-Slide 8 Well".to_string(),
        sweep: Some(SweepSpec::new(
            SweepAxis::Temperature,
            30.0,
            44.0,
            SweepDirection::Well,
        )),
        ..Default::default()
    };
    let program = DropletGenerator::new(params).generate().unwrap();
    let lines: Vec<&str> = program.lines().collect();

    let heats: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.starts_with("M771 "))
        .map(|(i, _)| i)
        .collect();
    let moves: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.starts_with("G0 X") && l.contains(" well ("))
        .map(|(i, _)| i)
        .collect();

    assert_eq!(heats.len(), 8);
    assert_eq!(moves.len(), 8);
    assert!(lines[heats[0]].starts_with("M771 T0 P30.0"));
    assert!(lines[heats[7]].starts_with("M771 T0 P44.0"));
    for (well, (heat, travel)) in heats.iter().zip(&moves).enumerate() {
        assert!(heat < travel, "well {well} moved before heating");
        if well > 0 {
            assert!(moves[well - 1] < *heat);
        }
    }
}
