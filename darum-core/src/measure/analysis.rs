use crate::measure::error::MeasureError;
use crate::measure::histogram::{HistogramSet, build_histograms};
use crate::measure::loader::{LoadedLogs, read_logs};
use crate::measure::ranking::Exclusions;
use crate::measure::report::Report;
use crate::measure::stats_aggregation::{StatsAggregator, StatsSnapshot};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub limit_rc: Option<u64>,
    pub top: usize,
    pub nbins: usize,
    pub bspan: usize,
    pub exclusions: Exclusions,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            limit_rc: None,
            top: 5,
            nbins: 50,
            bspan: 0,
            exclusions: Exclusions::default(),
        }
    }
}

/// Everything one run produces, ready for rendering.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub loaded: LoadedLogs,
    pub report: Report,
    pub snapshot: StatsSnapshot,
    pub histograms: Option<HistogramSet>,
}

pub fn analyze_logs(paths: &[PathBuf], options: &AnalysisOptions) -> Result<Analysis, MeasureError> {
    let loaded = read_logs(paths)?;
    analyze_loaded(loaded, options)
}

/// Checks, aggregates, ranks and selects already merged logs.
pub fn analyze_loaded(
    loaded: LoadedLogs,
    options: &AnalysisOptions,
) -> Result<Analysis, MeasureError> {
    let mut report = loaded.check();

    let mut snapshot =
        StatsAggregator::new(options.limit_rc).snapshot(&loaded.results, &mut report)?;
    snapshot.select(options.top, &options.exclusions);

    let histograms = build_histograms(
        &mut snapshot,
        &loaded.results,
        options.nbins,
        options.bspan,
        options.top,
    );
    if histograms.is_none() {
        tracing::info!("no successful samples among the selected rows; nothing to plot");
    }

    Ok(Analysis {
        loaded,
        report,
        snapshot,
        histograms,
    })
}
