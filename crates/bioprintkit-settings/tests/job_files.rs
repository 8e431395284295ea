use bioprintkit_core::{InfillPattern, PrintheadTechnology, SweepAxis, SweepDirection, SweepSpec};
use bioprintkit_gcode::{DropletParameters, PrintJob, ScaffoldParameters};
use bioprintkit_settings::{JobConfig, SettingsError};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn swept_droplet_job() -> JobConfig {
    JobConfig::new(PrintJob::Droplet(DropletParameters {
        template: "48-well plate".to_string(),
        clean_printhead: true,
        sweep: Some(SweepSpec::new(
            SweepAxis::Pressure,
            15.0,
            60.0,
            SweepDirection::Column,
        )),
        ..Default::default()
    }))
}

#[test]
fn test_json_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("job.json");
    let config = swept_droplet_job();

    config.save_to_file(&path).unwrap();
    let loaded = JobConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"mode\": \"droplet\""));
    assert!(text.contains("\"final\": 60.0"));
}

#[test]
fn test_toml_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scaffold.toml");
    let mut config = JobConfig::scaffold();
    config.set("pattern", "grid").unwrap();
    config.set("extrusion_amount", "0.5").unwrap();

    config.save_to_file(&path).unwrap();
    let loaded = JobConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_load_handwritten_toml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plate.toml");
    fs::write(
        &path,
        r#"
[output]
directory = "prints"
file_name = "viability.gcode"

[job]
mode = "droplet"
template = "u-Slide 8 Well"
print_speed = 10.0
layer_height = 0.2
bed_movement_position = 5.0
extrusion_time = 0.5
control_bed_temperature = true
bed_temperature = 37.0

[job.printhead]
technology = "Thermo-controlled"
index = 1
default_pressure = 30.0
"#,
    )
    .unwrap();

    let config = JobConfig::load_from_file(&path).unwrap();
    assert_eq!(config.output.path(), PathBuf::from("prints/viability.gcode"));
    let PrintJob::Droplet(params) = config.job else {
        panic!("expected droplet job");
    };
    assert_eq!(params.printhead.technology, PrintheadTechnology::ThermoControlled);
    assert_eq!(params.bed_temperature, Some(37.0));
    assert!(!params.terminate_operation);
}

#[test]
fn test_out_of_range_job_rejected_on_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hot.json");
    let mut config = JobConfig::default();
    if let PrintJob::Droplet(params) = &mut config.job {
        params.control_bed_temperature = true;
        params.bed_temperature = Some(90.0);
    }
    fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

    let err = JobConfig::load_from_file(&path).unwrap_err();
    assert!(err.is_job_error());
    assert!(err.to_string().contains("bed_temperature"));
}

#[test]
fn test_invalid_job_not_saved() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    let mut config = JobConfig::new(PrintJob::Scaffold(ScaffoldParameters::default()));
    config.set("infill_percent", "0").unwrap();

    assert!(config.save_to_file(&path).is_err());
    assert!(!path.exists());
}

#[test]
fn test_unsupported_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("job.yaml");
    assert!(matches!(
        JobConfig::default().save_to_file(&path),
        Err(SettingsError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_unknown_template_surfaces_on_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plate.json");
    let mut config = JobConfig::default();
    config.set("template", "384-well plate").unwrap();
    fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

    match JobConfig::load_from_file(&path) {
        Err(SettingsError::Job(err)) => assert!(err.is_unknown_template()),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_scaffold_pattern_in_json() {
    let config = JobConfig::parse(
        r#"{"job":{"mode":"scaffold","printhead":{"technology":"EMD","index":0,"default_pressure":20.0},
            "scaffold":{"size_x":12.0,"size_y":8.0,"infill_percent":40.0,"nozzle_width":0.41,
            "layer_height":0.2,"layer_count":3,"pattern":"striped","speed":8.0}}}"#,
        bioprintkit_settings::JobFormat::Json,
    )
    .unwrap();
    assert!(config.validate().is_ok());
    let PrintJob::Scaffold(params) = config.job else {
        panic!("expected scaffold job");
    };
    assert_eq!(params.scaffold.pattern, InfillPattern::Striped);
    assert_eq!(params.extrusion_amount(), 0.41);
    assert!(!params.terminate_operation);
}
