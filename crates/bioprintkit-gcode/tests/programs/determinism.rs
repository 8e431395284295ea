use bioprintkit_core::{
    InfillPattern, PrintheadSpec, PrintheadTechnology, ScaffoldSpec, SweepAxis, SweepDirection,
    SweepSpec, TEMPLATE_CATALOG,
};
use bioprintkit_gcode::{generate, DropletParameters, PrintJob, ScaffoldParameters};
use proptest::prelude::*;

fn axis() -> impl Strategy<Value = Option<SweepAxis>> {
    prop_oneof![
        Just(None),
        Just(Some(SweepAxis::Pressure)),
        Just(Some(SweepAxis::Temperature)),
        Just(Some(SweepAxis::ExtrusionTime)),
    ]
}

fn direction() -> impl Strategy<Value = SweepDirection> {
    prop_oneof![
        Just(SweepDirection::Well),
        Just(SweepDirection::Row),
        Just(SweepDirection::Column),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn droplet_generation_is_deterministic(
        template_idx in 1..TEMPLATE_CATALOG.len(),
        technology_idx in 0..PrintheadTechnology::ALL.len(),
        index in 0u8..=2,
        axis in axis(),
        direction in direction(),
        clean in any::<bool>(),
    ) {
        let params = DropletParameters {
            template: TEMPLATE_CATALOG[template_idx].name.to_string(),
            printhead: PrintheadSpec {
                technology: PrintheadTechnology::ALL[technology_idx],
                index,
                ..Default::default()
            },
            clean_printhead: clean,
            sweep: axis.map(|axis| SweepSpec::new(axis, 30.0, 60.0, direction)),
            ..Default::default()
        };
        let job = PrintJob::Droplet(params);

        let first = generate(&job).unwrap();
        let second = generate(&job).unwrap();
        prop_assert_eq!(first.as_str(), second.as_str());
    }

    #[test]
    fn scaffold_generation_is_deterministic(
        size in 5.0f64..30.0,
        infill in 20.0f64..90.0,
        layers in 1u32..4,
        pattern in prop_oneof![
            Just(InfillPattern::Striped),
            Just(InfillPattern::Grid),
            Just(InfillPattern::Honeycomb),
        ],
    ) {
        let job = PrintJob::Scaffold(ScaffoldParameters {
            scaffold: ScaffoldSpec {
                size_x: size,
                size_y: size,
                infill_percent: infill,
                layer_count: layers,
                pattern,
                ..Default::default()
            },
            ..Default::default()
        });

        let first = generate(&job).unwrap();
        let second = generate(&job).unwrap();
        prop_assert_eq!(first, second);
    }
}
