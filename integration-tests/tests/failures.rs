use darum_core::measure::error::measure_error_hint;
use darum_core::measure::{AnalysisOptions, MeasureError, analyze_logs, read_logs};
use integration_tests::harness::{fixture, runs_dir};

#[test]
fn logs_without_seeds_are_rejected_with_a_hint() {
    // Act
    let err = read_logs(&[fixture("verify_only.json")]).unwrap_err();

    // Assert
    assert!(matches!(err, MeasureError::MalformedLog { .. }));
    assert!(measure_error_hint(&err).unwrap().contains("measure-complexity"));
}

#[test]
fn cost_mismatch_is_inconsistent_accounting() {
    // Act
    let err = read_logs(&[fixture("bad_sum.json")]).unwrap_err();

    // Assert
    assert!(matches!(
        err,
        MeasureError::InconsistentAccounting { ref element, .. } if element == "Sorted"
    ));
}

#[test]
fn limit_below_observed_successes_is_a_ceiling_violation() {
    // Arrange
    let options = AnalysisOptions {
        limit_rc: Some(2_000_000),
        ..AnalysisOptions::default()
    };

    // Act
    let err = analyze_logs(&[runs_dir()], &options).unwrap_err();

    // Assert
    assert!(matches!(
        err,
        MeasureError::CeilingViolation { ref key, .. } if key == "InsertionSort[C] AB2"
    ));
}

#[test]
fn missing_path_is_reported() {
    // Act
    let err = read_logs(&[fixture("does_not_exist")]).unwrap_err();

    // Assert
    assert!(matches!(err, MeasureError::NoLogsFound { .. }));
}

#[test]
fn hcl_config_is_not_a_log() {
    // Act
    let err = read_logs(&[fixture("darum.hcl")]).unwrap_err();

    // Assert
    assert!(matches!(err, MeasureError::UnsupportedFormat { .. }));
}
