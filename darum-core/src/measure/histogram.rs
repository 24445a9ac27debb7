use crate::measure::quantity::smag_f64;
use crate::measure::stats_aggregation::StatsSnapshot;
use crate::measure::types::Results;
use serde::Serialize;

/// Equal-width bins over the success costs of the selected rows, plus a
/// margin bin and a "failed" bin when anything failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bins {
    pub edges: Vec<f64>,
    pub width: f64,
    pub with_failures: bool,
}

impl Bins {
    pub(crate) fn new(min: u64, max: u64, nbins: usize, with_failures: bool) -> Self {
        let nbins = nbins.max(1);
        let (lo, hi) = (min as f64, max as f64);
        // All samples equal: any width will do, but it cannot be zero.
        let width = if hi > lo { (hi - lo) / nbins as f64 } else { 1.0 };
        let edges = (0..=nbins).map(|i| lo + width * i as f64).collect();

        Self {
            edges,
            width,
            with_failures,
        }
    }

    pub fn len(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of the bin holding `value`. The last bin is closed on the right;
    /// values outside the range are not binned.
    fn index(&self, value: u64) -> Option<usize> {
        let value = value as f64;
        let lo = *self.edges.first()?;
        let hi = *self.edges.last()?;
        if value < lo || value > hi {
            return None;
        }
        let i = ((value - lo) / self.width) as usize;
        Some(i.min(self.len() - 1))
    }

    pub fn centers(&self) -> Vec<f64> {
        self.edges
            .windows(2)
            .map(|w| (w[0] + w[1]) / 2.0)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub key: String,
    counts: Vec<u64>,
    failed: u64,
}

impl Histogram {
    pub(crate) fn new(key: &str, bins: &Bins) -> Self {
        Self {
            key: key.to_string(),
            counts: vec![0; bins.len()],
            failed: 0,
        }
    }

    pub(crate) fn record(&mut self, bins: &Bins, value: u64) {
        if let Some(i) = bins.index(value) {
            self.counts[i] += 1;
        }
    }

    pub(crate) fn record_failed(&mut self, n: u64) {
        self.failed += n;
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }

    /// Counts including the margin and failed bins, when present.
    pub fn all_counts(&self, bins: &Bins) -> Vec<u64> {
        let mut out = self.counts.clone();
        if bins.with_failures {
            out.extend([0, self.failed]);
        }
        out
    }

    /// Distance between the first and last non-empty bin.
    pub fn bin_span(&self, bins: &Bins) -> usize {
        let counts = self.all_counts(bins);
        let first = counts.iter().position(|c| *c != 0);
        let last = counts.iter().rposition(|c| *c != 0);
        match (first, last) {
            (Some(first), Some(last)) => last - first,
            _ => 0,
        }
    }

    /// `(bin label, count)` pairs, with the failed bin labelled `failed_label`.
    pub fn snapshot(&self, bins: &Bins, failed_label: &str) -> Vec<(String, u64)> {
        let mut out: Vec<(String, u64)> = bins
            .centers()
            .iter()
            .zip(&self.counts)
            .map(|(center, count)| (smag_f64(*center), *count))
            .collect();

        if bins.with_failures {
            out.push((String::new(), 0));
            out.push((failed_label.to_string(), self.failed));
        }

        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSet {
    pub bins: Bins,
    pub failed_label: String,
    pub histograms: Vec<Histogram>,
}

/// Builds histograms for the best-ranked non-excluded rows.
///
/// The bins span the success costs of the selected rows. A row gets a
/// histogram if it has unsuccessful trials, or if its samples spread over at
/// least `bspan` bins; at most `top` histograms are built. Rows that got one
/// are marked `plotted`. Returns `None` when the selected rows have no
/// successes at all.
pub fn build_histograms(
    snapshot: &mut StatsSnapshot,
    results: &Results,
    nbins: usize,
    bspan: usize,
    top: usize,
) -> Option<HistogramSet> {
    let min = snapshot.selected().filter_map(|r| r.min_rc).min()?;
    let max = snapshot.selected().filter_map(|r| r.max_rc).max()?;

    let bins = Bins::new(min, max, nbins, snapshot.extremes.has_unsuccessful());
    tracing::info!(
        nbins,
        "range {} - {}, bin width {}",
        smag_f64(min as f64),
        smag_f64(max as f64),
        smag_f64(bins.width)
    );

    let abs = snapshot.has_assertion_batches;
    let mut histograms = Vec::new();

    for row in snapshot.rows.iter_mut() {
        if histograms.len() >= top {
            break;
        }
        if row.excluded || (abs && !row.is_assertion_batch()) {
            continue;
        }
        let Some(details) = results.get(&row.key) else {
            continue;
        };

        let mut histogram = Histogram::new(&row.key, &bins);
        for cost in &details.resource_counts {
            histogram.record(&bins, *cost);
        }
        let unsuccessful = row.unsuccessful() as u64;
        histogram.record_failed(unsuccessful);

        if unsuccessful > 0 || histogram.bin_span(&bins) >= bspan {
            row.plotted = true;
            histograms.push(histogram);
        }
    }

    let failed_label = match snapshot.oor_label() {
        label if label.is_empty() => "FAILED".to_string(),
        label => label,
    };
    Some(HistogramSet {
        bins,
        failed_label,
        histograms,
    })
}
