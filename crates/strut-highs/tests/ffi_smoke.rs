#![allow(clippy::float_cmp)]

use strut_highs::{extract, highs_version, CallStatus, HighsHandle, ModelStatus, Sense};
use strut_model::pack;

#[test]
fn incremental_build_reaches_the_same_optimum() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let mut handle = HighsHandle::create().expect("engine instance");
    handle.set_bool_option("output_flag", false);

    assert!(handle
        .add_cols(&[2.0, 3.0], &[0.0, 1.0], &[3.0, f64::INFINITY])
        .is_success());

    let matrix = pack(&[vec![0.0, 1.0], vec![1.0, 2.0], vec![2.0, 1.0]]);
    assert!(handle
        .add_rows(
            &[f64::NEG_INFINITY, 10.0, 8.0],
            &[6.0, 14.0, f64::INFINITY],
            &matrix,
        )
        .is_success());

    assert!(handle.change_objective_sense(Sense::Minimize).is_success());
    assert!(handle.run().is_success());
    assert_eq!(handle.model_status(), ModelStatus::Optimal);

    let solution = extract(&handle, 2, 3).expect("solution");
    assert!((solution.col_primal()[0] - 2.0).abs() < 1e-6);
    assert!((solution.col_primal()[1] - 4.0).abs() < 1e-6);
}

#[test]
fn mismatched_column_slices_are_rejected_before_the_engine() {
    let mut handle = HighsHandle::create().expect("engine instance");
    let status = handle.add_cols(&[1.0, 2.0], &[0.0], &[1.0, 2.0]);
    assert_eq!(status, CallStatus::Error);
}

#[test]
fn mismatched_row_bounds_are_rejected_before_the_engine() {
    let mut handle = HighsHandle::create().expect("engine instance");
    handle.set_bool_option("output_flag", false);
    assert!(handle.add_cols(&[1.0], &[0.0], &[1.0]).is_success());

    let matrix = pack(&[vec![1.0], vec![1.0]]);
    let status = handle.add_rows(&[0.0], &[1.0, 2.0], &matrix);
    assert_eq!(status, CallStatus::Error);
}

#[test]
fn objective_sense_round_trips_at_the_handle_level() {
    let mut handle = HighsHandle::create().expect("engine instance");
    handle.set_bool_option("output_flag", false);

    assert!(handle.change_objective_sense(Sense::Maximize).is_success());
    assert_eq!(handle.objective_sense(), Some(Sense::Maximize));

    assert!(handle.change_objective_sense(Sense::Minimize).is_success());
    assert_eq!(handle.objective_sense(), Some(Sense::Minimize));
}

#[test]
fn engine_reports_a_version() {
    let version = highs_version().expect("version string");
    assert!(!version.is_empty());
}
