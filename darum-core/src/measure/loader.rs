use crate::measure::discover::collect_log_files;
use crate::measure::error::MeasureError;
use crate::measure::locations::{LocationIndex, check_locations};
use crate::measure::merge::merge_results;
use crate::measure::parse::{ParsedLog, parse_log};
use crate::measure::quantity::smag;
use crate::measure::report::{LoadSummary, Report};
use crate::measure::types::Results;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The accumulated state of one analysis run.
///
/// Documents are folded in one at a time, in the order given; the warnings
/// this produces are therefore reproducible.
#[derive(Debug, Clone, Default)]
pub struct LoadedLogs {
    pub results: Results,
    pub locations: LocationIndex,
    /// Cost of every trial of every document.
    pub trial_costs: Vec<u64>,
    pub files: Vec<PathBuf>,
}

impl LoadedLogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn absorb(&mut self, document: &str, parsed: ParsedLog) -> Result<(), MeasureError> {
        merge_results(&mut self.results, parsed.results, document)?;
        self.locations.merge(parsed.locations);
        self.trial_costs.extend(parsed.trial_costs.into_values());
        Ok(())
    }

    /// Runs the cross-trial checks over everything absorbed so far.
    pub fn check(&self) -> Report {
        let mut report = Report::new();
        check_locations(&self.locations, &mut report);
        report.summary = self.summary();
        report
    }

    pub fn summary(&self) -> LoadSummary {
        LoadSummary {
            files: self.files.len(),
            keys: self.results.len(),
            trials: self.trial_costs.len(),
            min_trial_cost: self.trial_costs.iter().min().copied(),
            max_trial_cost: self.trial_costs.iter().max().copied(),
        }
    }
}

pub fn read_log(path: &Path) -> Result<ParsedLog, MeasureError> {
    let contents = fs::read_to_string(path).map_err(|e| MeasureError::read_file(path, e))?;
    parse_log(&path.display().to_string(), &contents)
}

/// Reads, parses and merges every log found under `paths`.
pub fn read_logs(paths: &[PathBuf]) -> Result<LoadedLogs, MeasureError> {
    let files = collect_log_files(paths)?;
    let mut loaded = LoadedLogs::new();

    for (i, path) in files.iter().enumerate() {
        debug!("file {}: {}", i + 1, path.display());
        let parsed = read_log(path)?;
        loaded.absorb(&path.display().to_string(), parsed)?;
        loaded.files.push(path.clone());
    }

    let summary = loaded.summary();
    info!(
        files = summary.files,
        keys = summary.keys,
        "processed {} files",
        summary.files
    );
    if let (Some(min), Some(max)) = (summary.min_trial_cost, summary.max_trial_cost) {
        info!("iteration costs: {} to {}", smag(min), smag(max));
    }

    Ok(loaded)
}
