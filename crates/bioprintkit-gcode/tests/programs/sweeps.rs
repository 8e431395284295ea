use bioprintkit_core::SweepDirection;
use bioprintkit_gcode::sweep::{linspace, resolve};
use proptest::prelude::*;

proptest! {
    #[test]
    fn row_sweep_is_constant_across_each_row(
        rows in 1usize..10,
        cols in 1usize..14,
        initial in 0.0f64..100.0,
        span in 0.1f64..100.0,
    ) {
        let values = resolve(initial, initial + span, SweepDirection::Row, rows, cols);
        prop_assert_eq!(values.len(), rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                prop_assert_eq!(values[r * cols + c], values[r * cols]);
            }
        }
    }

    #[test]
    fn column_sweep_repeats_every_row(
        rows in 1usize..10,
        cols in 1usize..14,
        initial in 0.0f64..100.0,
        span in 0.1f64..100.0,
    ) {
        let values = resolve(initial, initial + span, SweepDirection::Column, rows, cols);
        prop_assert_eq!(values.len(), rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                prop_assert_eq!(values[r * cols + c], values[c]);
            }
        }
    }

    #[test]
    fn well_sweep_is_strictly_increasing(
        rows in 1usize..10,
        cols in 1usize..14,
        initial in 0.0f64..100.0,
        span in 0.1f64..100.0,
    ) {
        let final_value = initial + span;
        let values = resolve(initial, final_value, SweepDirection::Well, rows, cols);
        prop_assert_eq!(values.len(), rows * cols);
        prop_assert_eq!(values[0], initial);
        if values.len() > 1 {
            prop_assert_eq!(values[values.len() - 1], final_value);
        }
        for pair in values.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn linspace_stays_within_endpoints(
        start in -50.0f64..50.0,
        span in 0.1f64..100.0,
        num in 2usize..200,
    ) {
        let values = linspace(start, start + span, num);
        prop_assert_eq!(values.len(), num);
        for value in values {
            prop_assert!(value >= start && value <= start + span);
        }
    }
}
