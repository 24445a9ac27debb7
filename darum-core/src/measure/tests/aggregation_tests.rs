use crate::measure::error::MeasureError;
use crate::measure::report::{Report, Warning};
use crate::measure::stats_aggregation::{Ceiling, StatsAggregator, StatsSnapshot};
use crate::measure::types::{Details, Results};
use pretty_assertions::assert_eq;

fn details(name: &str, ab: u32, ok: &[u64], oor: &[u64], failed: &[u64]) -> Details {
    let mut d = Details::new(name, ab);
    d.resource_counts = ok.to_vec();
    d.out_of_resource_counts = oor.to_vec();
    d.failure_counts = failed.to_vec();
    d
}

fn key(name: &str, ab: u32) -> String {
    if ab == 0 {
        name.to_string()
    } else {
        format!("{name} AB{ab}")
    }
}

fn results(entries: Vec<Details>) -> Results {
    entries
        .into_iter()
        .map(|d| (key(&d.display_name, d.ab_number), d))
        .collect()
}

fn snapshot(limit: Option<u64>, results: &Results) -> (Result<StatsSnapshot, MeasureError>, Report) {
    let mut report = Report::new();
    let snapshot = StatsAggregator::new(limit).snapshot(results, &mut report);
    (snapshot, report)
}

#[test]
fn success_above_declared_limit_is_fatal() {
    // Arrange
    let results = results(vec![
        details("Foo", 0, &[1200], &[], &[]),
        details("Foo", 1, &[1200], &[], &[]),
    ]);

    // Act
    let (snapshot, _) = snapshot(Some(1000), &results);

    // Assert
    assert!(matches!(
        snapshot,
        Err(MeasureError::CeilingViolation { ref key, .. }) if key == "Foo AB1"
    ));
}

#[test]
fn element_totals_are_not_bound_by_the_limit() {
    // Arrange
    let results = results(vec![
        details("Foo", 0, &[1500], &[], &[]),
        details("Foo", 1, &[800], &[], &[]),
        details("Foo", 2, &[700], &[], &[]),
    ]);

    // Act
    let (snapshot, report) = snapshot(Some(1000), &results);

    // Assert
    let snapshot = snapshot.unwrap();
    assert_eq!(snapshot.ceiling, Ceiling::Declared(1000));
    assert!(!report.has_warnings());
}

#[test]
fn without_batches_elements_are_bound_by_the_limit() {
    // Arrange
    let results = results(vec![details("Foo", 0, &[1200], &[], &[])]);

    // Act
    let (snapshot, _) = snapshot(Some(1000), &results);

    // Assert
    assert!(matches!(
        snapshot,
        Err(MeasureError::CeilingViolation { ref key, .. }) if key == "Foo"
    ));
}

#[test]
fn out_of_resource_below_declared_limit_warns() {
    // Arrange
    let results = results(vec![
        details("Foo", 0, &[], &[800], &[]),
        details("Foo", 1, &[], &[800], &[]),
    ]);

    // Act
    let (snapshot, report) = snapshot(Some(1000), &results);

    // Assert
    assert!(snapshot.is_ok());
    assert_eq!(
        report.warnings,
        vec![Warning::OutOfResourceBelowCeiling {
            key: "Foo AB1".to_string(),
            min_oor: 800,
            ceiling: 1000,
        }]
    );
}

#[test]
fn declared_limit_far_below_out_of_resource_warns() {
    // Arrange
    let results = results(vec![
        details("Foo", 1, &[500], &[], &[]),
        details("Bar", 1, &[], &[2000], &[]),
    ]);

    // Act
    let (_, report) = snapshot(Some(1000), &results);

    // Assert
    assert_eq!(report.count("ceiling_far_below_out_of_resource"), 1);
}

#[test]
fn cheapest_out_of_resource_is_the_inferred_ceiling() {
    // Arrange
    let results = results(vec![
        details("Foo", 1, &[100, 200], &[], &[]),
        details("Foo", 2, &[], &[1000, 1100], &[]),
    ]);

    // Act
    let (snapshot, report) = snapshot(None, &results);

    // Assert
    let snapshot = snapshot.unwrap();
    assert_eq!(snapshot.ceiling, Ceiling::Inferred(1000));
    assert_eq!(snapshot.oor_label(), "OoR > 1k");
    assert_eq!(
        report.warnings,
        vec![Warning::UndeclaredCeiling { min_oor: 1000 }]
    );
}

#[test]
fn results_all_above_inferred_ceiling_are_fatal() {
    // Arrange
    let results = results(vec![
        details("Foo", 1, &[1500], &[], &[]),
        details("Foo", 2, &[], &[1000], &[]),
    ]);

    // Act
    let (snapshot, _) = snapshot(None, &results);

    // Assert
    assert!(matches!(snapshot, Err(MeasureError::CeilingViolation { .. })));
}

#[test]
fn success_above_inferred_ceiling_warns() {
    // Arrange
    let results = results(vec![
        details("Foo", 1, &[100], &[], &[]),
        details("Foo", 2, &[1200], &[], &[]),
        details("Bar", 1, &[], &[1000], &[]),
    ]);

    // Act
    let (snapshot, report) = snapshot(None, &results);

    // Assert
    assert!(snapshot.is_ok());
    assert_eq!(report.count("success_above_inferred_ceiling"), 1);
    assert!(report.warnings.contains(&Warning::SuccessAboveInferredCeiling {
        key: "Foo AB2".to_string(),
        max_success: 1200,
        inferred: 1000,
    }));
}

#[test]
fn no_limit_and_no_out_of_resource_leaves_ceiling_unknown() {
    // Arrange
    let results = results(vec![details("Foo", 1, &[100], &[], &[50])]);

    // Act
    let (snapshot, report) = snapshot(None, &results);

    // Assert
    let snapshot = snapshot.unwrap();
    assert_eq!(snapshot.ceiling, Ceiling::Unknown);
    assert_eq!(snapshot.oor_label(), "");
    assert!(!report.has_warnings());
}

#[test]
fn span_is_relative_to_the_cheapest_success() {
    // Arrange
    let results = results(vec![
        details("Foo", 0, &[100, 150, 120], &[], &[]),
        details("Free", 0, &[0, 10], &[], &[]),
        details("Never", 0, &[], &[], &[10]),
    ]);

    // Act
    let (snapshot, _) = snapshot(None, &results);

    // Assert
    let snapshot = snapshot.unwrap();
    let foo = snapshot.row("Foo").unwrap();
    assert_eq!(foo.min_rc, Some(100));
    assert_eq!(foo.max_rc, Some(150));
    assert_eq!(foo.span, Some(0.5));
    assert_eq!(foo.weighted_span, Some(50.0));

    let free = snapshot.row("Free").unwrap();
    assert_eq!(free.span, Some(0.0));

    let never = snapshot.row("Never").unwrap();
    assert_eq!(never.min_rc, None);
    assert_eq!(never.span, None);
    assert_eq!(never.weighted_span, None);
    assert_eq!(never.failures, 1);
}

#[test]
fn later_batches_are_marked_downstream() {
    // Arrange
    let results = results(vec![
        details("Foo", 0, &[30], &[90], &[60]),
        details("Foo", 1, &[10], &[50], &[]),
        details("Foo", 2, &[10], &[], &[40]),
        details("Foo", 3, &[10], &[], &[]),
        details("Bar", 1, &[10], &[], &[]),
    ]);

    // Act
    let (snapshot, _) = snapshot(Some(100), &results);

    // Assert
    let snapshot = snapshot.unwrap();
    let marks = |key: &str| {
        let row = snapshot.row(key).unwrap();
        (row.downstream_of_oor, row.downstream_of_failure)
    };
    assert_eq!(marks("Foo AB1"), (0, 0));
    assert_eq!(marks("Foo AB2"), (1, 0));
    assert_eq!(marks("Foo AB3"), (1, 1));
    assert_eq!(marks("Bar AB1"), (0, 0));
}

#[test]
fn assertion_batches_are_primary_rows() {
    // Arrange
    let results = results(vec![
        details("Foo", 0, &[30], &[], &[]),
        details("Foo", 1, &[10], &[], &[]),
        details("Foo", 2, &[20], &[], &[]),
    ]);

    // Act
    let (snapshot, _) = snapshot(None, &results);

    // Assert
    let snapshot = snapshot.unwrap();
    assert!(snapshot.has_assertion_batches);
    let primary: Vec<_> = snapshot.primary_rows().map(|r| r.key.as_str()).collect();
    let totals: Vec<_> = snapshot.element_totals().map(|r| r.key.as_str()).collect();
    assert_eq!(primary.len(), 2);
    assert!(primary.iter().all(|k| k.contains(" AB")));
    assert_eq!(totals, vec!["Foo"]);
}

#[test]
fn extremes_cover_all_keys() {
    // Arrange
    let results = results(vec![
        details("Foo", 0, &[300], &[], &[]),
        details("Foo", 1, &[100], &[], &[]),
        details("Foo", 2, &[200], &[], &[]),
    ]);

    // Act
    let (snapshot, _) = snapshot(None, &results);

    // Assert
    let extremes = snapshot.unwrap().extremes;
    assert_eq!(extremes.min_rc, Some(100));
    assert_eq!(extremes.max_rc, Some(300));
    assert_eq!(extremes.min_rc_abs, Some(100));
    assert_eq!(extremes.max_rc_abs, Some(200));
    assert!(!extremes.has_unsuccessful());
}
