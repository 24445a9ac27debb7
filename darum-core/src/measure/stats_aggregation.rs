use crate::measure::error::MeasureError;
use crate::measure::quantity::smag;
use crate::measure::ranking::{Exclusions, rank_rows};
use crate::measure::report::{Report, Warning};
use crate::measure::types::{Details, Results};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

/// A declared limit this far below the cheapest OoR is probably wrong.
const CEILING_SLACK: f64 = 1.5;

/// One line of the statistics table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub key: String,
    pub display_name: String,
    pub ab_number: u32,
    /// `None` when the key never succeeded.
    pub min_rc: Option<u64>,
    pub max_rc: Option<u64>,
    /// (max - min) / min, or 0 when min is 0.
    pub span: Option<f64>,
    /// span * min; large for keys that vary a lot *and* are expensive.
    pub weighted_span: Option<f64>,
    pub successes: usize,
    pub out_of_resources: usize,
    pub failures: usize,
    pub location: String,
    /// Number of earlier ABs of the same element that ran out of resources.
    pub downstream_of_oor: usize,
    /// Number of earlier ABs of the same element that failed.
    pub downstream_of_failure: usize,
    pub excluded: bool,
    pub selected: bool,
    pub plotted: bool,
}

impl SummaryRow {
    pub fn from_details(key: &str, details: &Details) -> Self {
        let min_rc = details.resource_counts.iter().min().copied();
        let max_rc = details.resource_counts.iter().max().copied();

        let span = match (min_rc, max_rc) {
            (Some(0), Some(_)) => Some(0.0),
            (Some(min), Some(max)) => Some((max - min) as f64 / min as f64),
            _ => None,
        };
        let weighted_span = span.zip(min_rc).map(|(s, min)| s * min as f64);

        Self {
            key: key.to_string(),
            display_name: details.display_name.clone(),
            ab_number: details.ab_number,
            min_rc,
            max_rc,
            span,
            weighted_span,
            successes: details.resource_counts.len(),
            out_of_resources: details.out_of_resource_counts.len(),
            failures: details.failure_counts.len(),
            location: details.source_position(),
            downstream_of_oor: 0,
            downstream_of_failure: 0,
            excluded: false,
            selected: false,
            plotted: false,
        }
    }

    pub fn is_assertion_batch(&self) -> bool {
        self.ab_number > 0
    }

    pub fn is_downstream_of_oor(&self) -> bool {
        self.downstream_of_oor > 0
    }

    pub fn is_downstream_of_failure(&self) -> bool {
        self.downstream_of_failure > 0
    }

    pub fn unsuccessful(&self) -> usize {
        self.out_of_resources + self.failures
    }
}

/// Global extremes over all keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Extremes {
    pub min_rc: Option<u64>,
    pub max_rc: Option<u64>,
    /// Same, but only over assertion batches.
    pub min_rc_abs: Option<u64>,
    pub max_rc_abs: Option<u64>,
    pub min_oor: Option<u64>,
    pub min_failure: Option<u64>,
    pub min_failure_abs: Option<u64>,
    pub max_failure: Option<u64>,
}

impl Extremes {
    fn observe(&mut self, details: &Details) {
        let min = details.resource_counts.iter().min().copied();
        let max = details.resource_counts.iter().max().copied();

        self.min_rc = min_opt(self.min_rc, min);
        self.max_rc = max_opt(self.max_rc, max);
        if details.is_assertion_batch() {
            self.min_rc_abs = min_opt(self.min_rc_abs, min);
            self.max_rc_abs = max_opt(self.max_rc_abs, max);
        }
        self.min_oor = min_opt(
            self.min_oor,
            details.out_of_resource_counts.iter().min().copied(),
        );
        let min_failure = details.failure_counts.iter().min().copied();
        self.min_failure = min_opt(self.min_failure, min_failure);
        if details.is_assertion_batch() {
            self.min_failure_abs = min_opt(self.min_failure_abs, min_failure);
        }
        self.max_failure = max_opt(self.max_failure, details.failure_counts.iter().max().copied());
    }

    pub fn has_unsuccessful(&self) -> bool {
        self.min_oor.is_some() || self.min_failure.is_some()
    }
}

fn min_opt(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn max_opt(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    a.max(b)
}

/// The resource limit the verification runs were made with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Ceiling {
    /// Given by the user; authoritative.
    Declared(u64),
    /// Not given, so taken to be at most the cheapest OoR seen.
    Inferred(u64),
    /// Not given, and nothing ran out of resources.
    Unknown,
}

/// The aggregated, ranked table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    /// All rows, most interesting first.
    pub rows: Vec<SummaryRow>,
    pub extremes: Extremes,
    pub ceiling: Ceiling,
    pub has_assertion_batches: bool,
}

impl StatsSnapshot {
    /// The rows that get ranked for display: the ABs when there are any,
    /// everything otherwise.
    pub fn primary_rows(&self) -> impl Iterator<Item = &SummaryRow> {
        let abs = self.has_assertion_batches;
        self.rows
            .iter()
            .filter(move |r| !abs || r.is_assertion_batch())
    }

    /// Per-element totals, shown separately when the log has ABs.
    pub fn element_totals(&self) -> impl Iterator<Item = &SummaryRow> {
        let abs = self.has_assertion_batches;
        self.rows
            .iter()
            .filter(move |r| abs && !r.is_assertion_batch())
    }

    pub fn row(&self, key: &str) -> Option<&SummaryRow> {
        self.rows.iter().find(|r| r.key == key)
    }

    /// Marks excluded rows, then selects the `top` best-ranked primary rows
    /// that are not excluded. Excluded rows stay in the table.
    pub fn select(&mut self, top: usize, exclusions: &Exclusions) {
        let abs = self.has_assertion_batches;
        let mut selected = 0;

        for row in &mut self.rows {
            row.excluded = exclusions.is_excluded(&row.key);
            row.selected = false;

            let primary = !abs || row.is_assertion_batch();
            if primary && !row.excluded && selected < top {
                row.selected = true;
                selected += 1;
            }
        }
    }

    pub fn selected(&self) -> impl Iterator<Item = &SummaryRow> {
        self.rows.iter().filter(|r| r.selected)
    }

    /// Label presenters use for the bucket of unsuccessful trials.
    pub fn oor_label(&self) -> String {
        match self.ceiling {
            Ceiling::Declared(limit) | Ceiling::Inferred(limit) => format!("OoR > {}", smag(limit)),
            Ceiling::Unknown => String::new(),
        }
    }
}

/// Derives per-key statistics from accumulated results and checks them
/// against the resource limit.
pub struct StatsAggregator {
    limit_rc: Option<u64>,
}

impl StatsAggregator {
    pub fn new(limit_rc: Option<u64>) -> Self {
        Self { limit_rc }
    }

    pub fn snapshot(
        &self,
        results: &Results,
        report: &mut Report,
    ) -> Result<StatsSnapshot, MeasureError> {
        let abs_present = results.has_assertion_batches();
        let mut extremes = Extremes::default();
        let mut rows = Vec::with_capacity(results.len());

        for (key, details) in results.iter() {
            extremes.observe(details);

            // In AB mode an element's cost is the sum of its ABs, so only ABs
            // are bound by the limit.
            let bound_by_limit = details.is_assertion_batch() || !abs_present;
            if let (Some(limit), true) = (self.limit_rc, bound_by_limit) {
                check_declared_ceiling(key, details, limit, report)?;
            }

            let row = SummaryRow::from_details(key, details);
            debug!(
                "{:40} {:>10} {:>8} {:>8} {:>8.2}%",
                key,
                row.successes,
                row.min_rc.map(smag).unwrap_or_default(),
                row.max_rc.map(smag).unwrap_or_default(),
                row.span.unwrap_or(f64::NAN) * 100.0
            );
            rows.push(row);
        }

        if abs_present {
            mark_downstream(&mut rows);
        }

        let ceiling = match self.limit_rc {
            Some(limit) => {
                check_declared_totals(&extremes, limit, report);
                Ceiling::Declared(limit)
            }
            None => match extremes.min_oor {
                Some(min_oor) => {
                    check_inferred_ceiling(&rows, &extremes, abs_present, min_oor, report)?;
                    Ceiling::Inferred(min_oor)
                }
                None => Ceiling::Unknown,
            },
        };

        rank_rows(&mut rows);

        Ok(StatsSnapshot {
            rows,
            extremes,
            ceiling,
            has_assertion_batches: abs_present,
        })
    }
}

fn check_declared_ceiling(
    key: &str,
    details: &Details,
    limit: u64,
    report: &mut Report,
) -> Result<(), MeasureError> {
    if let Some(max) = details.resource_counts.iter().max().copied() {
        if max > limit {
            return Err(MeasureError::ceiling(
                key,
                format!(
                    "limit is {} but AB{} succeeded with cost {}; it should have been OoR",
                    smag(limit),
                    details.ab_number,
                    smag(max)
                ),
            ));
        }
    }

    if let Some(min_oor) = details.out_of_resource_counts.iter().min().copied() {
        if min_oor < limit {
            report.warn(Warning::OutOfResourceBelowCeiling {
                key: key.to_string(),
                min_oor,
                ceiling: limit,
            });
        }
    }

    Ok(())
}

fn check_declared_totals(extremes: &Extremes, limit: u64, report: &mut Report) {
    if let Some(max_failure) = extremes.max_failure {
        if max_failure > limit {
            info!(
                "max failure cost {} is greater than the limit {}",
                smag(max_failure),
                smag(limit)
            );
        }
    }

    if let Some(min_oor) = extremes.min_oor {
        if min_oor as f64 > limit as f64 * CEILING_SLACK {
            report.warn(Warning::CeilingFarBelowOutOfResource {
                ceiling: limit,
                min_oor,
            });
        }
    }
}

/// Without a declared limit the cheapest OoR bounds it from above. Successes
/// and failures below that bound are expected; if even the cheapest of them
/// are not below it, the logs were made with different limits.
fn check_inferred_ceiling(
    rows: &[SummaryRow],
    extremes: &Extremes,
    abs_present: bool,
    min_oor: u64,
    report: &mut Report,
) -> Result<(), MeasureError> {
    report.warn(Warning::UndeclaredCeiling { min_oor });

    let (min_rc, min_failure) = if abs_present {
        (extremes.min_rc_abs, extremes.min_failure_abs)
    } else {
        (extremes.min_rc, extremes.min_failure)
    };
    let cheapest = max_opt(min_rc, min_failure);

    if let Some(cheapest) = cheapest {
        if cheapest >= min_oor {
            return Err(MeasureError::ceiling(
                "all results",
                format!(
                    "the limit must have been <= {}, yet some results are higher: minRC={}, minFailures={}",
                    smag(min_oor),
                    min_rc.map(smag).unwrap_or_else(|| "-".to_string()),
                    min_failure
                        .map(smag)
                        .unwrap_or_else(|| "-".to_string()),
                ),
            ));
        }
    }

    for row in rows {
        if abs_present && !row.is_assertion_batch() {
            continue;
        }
        if let Some(max_rc) = row.max_rc {
            if max_rc >= min_oor {
                report.warn(Warning::SuccessAboveInferredCeiling {
                    key: row.key.clone(),
                    max_success: max_rc,
                    inferred: min_oor,
                });
            }
        }
    }

    Ok(())
}

/// Once an AB of an element fails or runs out of resources in some trial,
/// the later ABs of that trial were never really checked. Rows of later ABs
/// count how many earlier ABs of their element did so.
fn mark_downstream(rows: &mut [SummaryRow]) {
    let mut oor_abs: HashMap<String, Vec<u32>> = HashMap::new();
    let mut failed_abs: HashMap<String, Vec<u32>> = HashMap::new();

    for row in rows.iter().filter(|r| r.is_assertion_batch()) {
        if row.out_of_resources > 0 {
            oor_abs
                .entry(row.display_name.clone())
                .or_default()
                .push(row.ab_number);
        }
        if row.failures > 0 {
            failed_abs
                .entry(row.display_name.clone())
                .or_default()
                .push(row.ab_number);
        }
    }

    for row in rows.iter_mut() {
        let ab_number = row.ab_number;
        let later_than = |abs: Option<&Vec<u32>>| {
            abs.map(|abs| abs.iter().filter(|a| ab_number > **a).count())
                .unwrap_or(0)
        };
        row.downstream_of_oor = later_than(oor_abs.get(&row.display_name));
        row.downstream_of_failure = later_than(failed_abs.get(&row.display_name));
    }
}
