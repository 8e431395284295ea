use bioprintkit::{
    export_job, generate_job, preview_job, write_gcode_file, InfillPattern, JobConfig, PrintJob,
};
use tempfile::TempDir;

#[test]
fn test_job_file_to_gcode_file() {
    let dir = TempDir::new().unwrap();
    let job_path = dir.path().join("plate.toml");
    JobConfig::default().save_to_file(&job_path).unwrap();

    let mut config = JobConfig::load_from_file(&job_path).unwrap();
    config.apply_override("template=48-well plate").unwrap();
    config.apply_override("pressure=35").unwrap();

    let program = generate_job(&config).unwrap();
    assert_eq!(program.count_command("M750"), 48);
    assert!(program.as_str().contains("P35.0"));

    let written = write_gcode_file(dir.path().join("plate.txt"), &program).unwrap();
    assert_eq!(written.extension().unwrap(), "gcode");
    assert_eq!(std::fs::read_to_string(written).unwrap(), program.as_str());
}

#[test]
fn test_scaffold_job_preview_matches_program() {
    let mut config = JobConfig::scaffold();
    config.apply_override("pattern=honeycomb").unwrap();
    if let PrintJob::Scaffold(params) = &config.job {
        assert_eq!(params.scaffold.pattern, InfillPattern::Honeycomb);
    } else {
        panic!("expected a scaffold job");
    }

    let program = generate_job(&config).unwrap();
    let preview = preview_job(&config).unwrap();
    assert_eq!(
        preview.count(bioprintkit::SegmentKind::Perimeter)
            + preview.count(bioprintkit::SegmentKind::Infill),
        program.count_command("G1")
    );
}

#[test]
fn test_invalid_override_leaves_job_unchanged() {
    let mut config = JobConfig::default();
    assert!(config.apply_override("pressure=lots").is_err());
    assert_eq!(config, JobConfig::default());
}

#[test]
fn test_program_written_to_configured_output() {
    let dir = TempDir::new().unwrap();
    let job_path = dir.path().join("slide.json");

    let mut config = JobConfig::default();
    config.output.directory = dir.path().join("runs");
    config.output.file_name = "slide-8.txt".to_string();
    config.apply_override("template=u-Slide 8 Well").unwrap();
    config.save_to_file(&job_path).unwrap();

    let loaded = JobConfig::load_from_file(&job_path).unwrap();
    let program = generate_job(&loaded).unwrap();
    let written = export_job(&loaded, &program).unwrap();

    assert_eq!(written, dir.path().join("runs").join("slide-8.gcode"));
    assert_eq!(std::fs::read_to_string(&written).unwrap(), program.as_str());
    assert_eq!(program.count_command("M750"), 8);
}
