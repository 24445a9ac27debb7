use crate::measure::histogram::{Bins, Histogram, build_histograms};
use crate::measure::ranking::Exclusions;
use crate::measure::report::Report;
use crate::measure::stats_aggregation::{StatsAggregator, StatsSnapshot};
use crate::measure::types::{Details, Results};
use pretty_assertions::assert_eq;

fn results(entries: &[(&str, &[u64], &[u64])]) -> Results {
    entries
        .iter()
        .map(|(name, ok, oor)| {
            let mut d = Details::new(name, 1);
            d.resource_counts = ok.to_vec();
            d.out_of_resource_counts = oor.to_vec();
            (format!("{name} AB1"), d)
        })
        .collect()
}

fn selected_snapshot(results: &Results, top: usize) -> StatsSnapshot {
    let mut report = Report::new();
    let mut snapshot = StatsAggregator::new(None)
        .snapshot(results, &mut report)
        .unwrap();
    snapshot.select(top, &Exclusions::default());
    snapshot
}

#[test]
fn bins_cover_the_range_evenly() {
    // Act
    let bins = Bins::new(100, 200, 4, false);

    // Assert
    assert_eq!(bins.len(), 4);
    assert_eq!(bins.width, 25.0);
    assert_eq!(bins.edges, vec![100.0, 125.0, 150.0, 175.0, 200.0]);
    assert_eq!(bins.centers(), vec![112.5, 137.5, 162.5, 187.5]);
}

#[test]
fn equal_samples_still_get_a_width() {
    // Act
    let bins = Bins::new(100, 100, 10, false);

    // Assert
    assert_eq!(bins.width, 1.0);
}

#[test]
fn last_bin_includes_the_maximum() {
    // Arrange
    let bins = Bins::new(100, 200, 4, false);
    let mut histogram = Histogram::new("Foo AB1", &bins);

    // Act
    for value in [100, 124, 125, 200, 250] {
        histogram.record(&bins, value);
    }

    // Assert
    assert_eq!(histogram.counts(), &[2, 1, 0, 1]);
}

#[test]
fn failed_bin_follows_a_margin_bin() {
    // Arrange
    let bins = Bins::new(100, 200, 2, true);
    let mut histogram = Histogram::new("Foo AB1", &bins);
    histogram.record(&bins, 120);
    histogram.record_failed(3);

    // Act
    let snapshot = histogram.snapshot(&bins, "OoR > 1k");

    // Assert
    assert_eq!(
        snapshot,
        vec![
            ("125".to_string(), 1),
            ("175".to_string(), 0),
            (String::new(), 0),
            ("OoR > 1k".to_string(), 3),
        ]
    );
    assert_eq!(histogram.bin_span(&bins), 3);
}

#[test]
fn narrow_rows_are_not_plotted() {
    // Arrange
    let results = results(&[
        ("Wide", &[100, 200], &[]),
        ("Narrow", &[150, 150], &[]),
    ]);
    let mut snapshot = selected_snapshot(&results, 5);

    // Act
    let set = build_histograms(&mut snapshot, &results, 10, 2, 5).unwrap();

    // Assert
    let plotted: Vec<_> = set.histograms.iter().map(|h| h.key.as_str()).collect();
    assert_eq!(plotted, vec!["Wide AB1"]);
    assert!(snapshot.row("Wide AB1").unwrap().plotted);
    assert!(!snapshot.row("Narrow AB1").unwrap().plotted);
}

#[test]
fn unsuccessful_rows_are_always_plotted() {
    // Arrange
    let results = results(&[("Steady", &[100, 100], &[1000]), ("Other", &[90, 110], &[])]);
    let mut snapshot = selected_snapshot(&results, 5);

    // Act
    let set = build_histograms(&mut snapshot, &results, 10, 100, 5).unwrap();

    // Assert
    assert_eq!(set.histograms.len(), 1);
    assert_eq!(set.histograms[0].key, "Steady AB1");
    assert_eq!(set.histograms[0].failed(), 1);
    assert_eq!(set.failed_label, "OoR > 1k");
}

#[test]
fn at_most_top_histograms_are_built() {
    // Arrange
    let results = results(&[
        ("A", &[100, 300], &[]),
        ("B", &[100, 250], &[]),
        ("C", &[100, 200], &[]),
    ]);
    let mut snapshot = selected_snapshot(&results, 2);

    // Act
    let set = build_histograms(&mut snapshot, &results, 10, 0, 2).unwrap();

    // Assert
    let plotted: Vec<_> = set.histograms.iter().map(|h| h.key.as_str()).collect();
    assert_eq!(plotted, vec!["A AB1", "B AB1"]);
}

#[test]
fn nothing_to_plot_without_successes() {
    // Arrange
    let results = results(&[("Never", &[], &[1000])]);
    let mut snapshot = selected_snapshot(&results, 5);

    // Act
    let set = build_histograms(&mut snapshot, &results, 10, 0, 5);

    // Assert
    assert!(set.is_none());
}
