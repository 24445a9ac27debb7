//! Verification log analysis
//!
//! Dafny's `measure-complexity` verifies every member many times with
//! different random seeds and logs how much each attempt cost. This module
//! reads those logs and works out which members (or assertion batches) have
//! costs that vary a lot between trials, or that fail or run out of
//! resources in some of them.
//!
//! The logs have no documented schema, so reading them is defensive: every
//! number that can be cross-checked is, and a mismatch stops the analysis
//! rather than producing a table built on a misread log.
//!
//! The overall data processing architecture is:
//!
//! log files
//! parse_log          (one document → Results, LocationIndex)
//! merge_results      (fold into the accumulated Results)
//! check_locations    (same ABs at the same place in every trial?)
//! StatsAggregator
//! StatsSnapshot      (ranked rows, ceiling checks, downstream marks)
//! build_histograms
//!

pub mod analysis;
pub mod discover;
pub mod error;
pub mod histogram;
pub mod loader;
pub mod locations;
pub mod merge;
pub mod parse;
pub mod quantity;
pub mod ranking;
pub mod report;
pub mod schema;
pub mod stats_aggregation;
pub mod types;

#[cfg(test)]
mod tests;

pub use analysis::{Analysis, AnalysisOptions, analyze_loaded, analyze_logs};
pub use error::MeasureError;
pub use histogram::{HistogramSet, build_histograms};
pub use loader::{LoadedLogs, read_log, read_logs};
pub use locations::{LocationIndex, check_locations};
pub use merge::merge_results;
pub use parse::{ParsedLog, parse_document, parse_log};
pub use ranking::Exclusions;
pub use report::{Report, Warning};
pub use stats_aggregation::{Ceiling, StatsAggregator, StatsSnapshot, SummaryRow};
pub use types::{Details, Location, Results};
