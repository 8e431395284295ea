use bioprintkit_core::{InfillPattern, ScaffoldSpec};
use bioprintkit_gcode::{scaffold, ScaffoldParameters, SegmentKind};

fn striped_50mm() -> ScaffoldParameters {
    ScaffoldParameters {
        scaffold: ScaffoldSpec {
            size_x: 50.0,
            size_y: 50.0,
            infill_percent: 50.0,
            nozzle_width: 0.41,
            layer_height: 0.2,
            layer_count: 2,
            pattern: InfillPattern::Striped,
            speed: 10.0,
        },
        ..Default::default()
    }
}

fn z_values(block: &str) -> Vec<String> {
    block
        .lines()
        .filter(|line| !line.starts_with(';'))
        .flat_map(|line| line.split(';').next().unwrap_or("").split_whitespace())
        .filter_map(|word| word.strip_prefix('Z'))
        .map(str::to_string)
        .collect()
}

#[test]
fn test_striped_two_layers() {
    let program = scaffold::generate(&striped_50mm()).unwrap();
    let text = program.as_str();

    assert_eq!(text.matches("; Layer 1 perimeter\n").count(), 1);
    assert_eq!(text.matches("; Layer 2 perimeter\n").count(), 1);
    assert_eq!(text.matches(" perimeter\n").count(), 2);
    assert_eq!(text.matches(" striped infill\n").count(), 2);

    // 4 perimeter sides and 59 interior lines per layer
    assert_eq!(program.count_command("G1"), 2 * (4 + 59));
}

#[test]
fn test_second_layer_offset_by_layer_height() {
    let program = scaffold::generate(&striped_50mm()).unwrap();
    let text = program.as_str();

    let first = text.find("; Layer 1 of 2").unwrap();
    let second = text.find("; Layer 2 of 2").unwrap();
    let end = text.find("G0 Z50; move bed to parking position").unwrap();

    let layer_one = z_values(&text[first..second]);
    let layer_two = z_values(&text[second..end]);
    assert_eq!(layer_one.len(), layer_two.len());

    for (a, b) in layer_one.iter().zip(&layer_two) {
        let a: f64 = a.parse().unwrap();
        let b: f64 = b.parse().unwrap();
        assert!((b - a - 0.2).abs() < 1e-9, "{a} -> {b}");
    }
}

#[test]
fn test_stripes_stay_inside_perimeter() {
    let preview = scaffold::preview(&striped_50mm()).unwrap();
    let (min, max) = preview.extruded_bounds().unwrap();
    assert!((min.x + 24.795).abs() < 1e-9);
    assert!((max.x - 24.795).abs() < 1e-9);
    assert!((min.y + 24.795).abs() < 1e-9);
    assert!((max.y - 24.795).abs() < 1e-9);
    assert_eq!(preview.count(SegmentKind::Infill), 2 * 59);
}

#[test]
fn test_honeycomb_layers_interlock() {
    let params = ScaffoldParameters {
        scaffold: ScaffoldSpec {
            pattern: InfillPattern::Honeycomb,
            size_x: 20.0,
            size_y: 20.0,
            ..striped_50mm().scaffold
        },
        ..Default::default()
    };
    let preview = scaffold::preview(&params).unwrap();
    let first: Vec<_> = preview
        .layer(1)
        .filter(|s| s.kind == SegmentKind::Infill)
        .map(|s| (s.from.x, s.from.y))
        .collect();
    let second: Vec<_> = preview
        .layer(2)
        .filter(|s| s.kind == SegmentKind::Infill)
        .map(|s| (s.from.x, s.from.y))
        .collect();
    assert!(!first.is_empty() && !second.is_empty());
    assert_ne!(first, second);
}

#[test]
fn test_preview_serialises() {
    let preview = scaffold::preview(&striped_50mm()).unwrap();
    let json = preview.to_json().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        parsed["segments"].as_array().unwrap().len(),
        preview.segments.len()
    );
}

#[test]
fn test_overly_dense_honeycomb_fails_before_emitting() {
    let mut params = striped_50mm();
    params.scaffold.size_x = 100.0;
    params.scaffold.size_y = 100.0;
    params.scaffold.infill_percent = 100.0;
    params.scaffold.nozzle_width = 0.05;
    params.scaffold.pattern = InfillPattern::Honeycomb;

    let err = scaffold::generate(&params).unwrap_err();
    assert!(err.is_geometry_error());
    assert!(scaffold::preview(&params).unwrap_err().is_geometry_error());
}
