use crate::measure::locations::BatchSet;
use crate::measure::quantity::smag;
use crate::measure::types::Location;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Non-fatal findings. Aggregation carries on; they are shown next to the table.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    #[error(
        "{filename}:{location} ({element}) has changing ABs: first trial had {}, but random seed {seed} has {}",
        fmt_batches(.expected),
        fmt_batches(.found)
    )]
    LocationDrift {
        filename: String,
        element: String,
        location: Location,
        seed: u64,
        expected: BatchSet,
        found: BatchSet,
    },

    #[error("min OoR cost for {key} is {}, should be above the limit {}", smag(.min_oor), smag(.ceiling))]
    OutOfResourceBelowCeiling {
        key: String,
        min_oor: u64,
        ceiling: u64,
    },

    #[error(
        "{key} succeeded with cost {} although other trials ran out of resources at {}; logs may come from runs with different limits",
        smag(.max_success),
        smag(.inferred)
    )]
    SuccessAboveInferredCeiling {
        key: String,
        max_success: u64,
        inferred: u64,
    },

    #[error("logs contain OoR results, but no resource limit was given; minimum OoR cost found = {}", smag(.min_oor))]
    UndeclaredCeiling { min_oor: u64 },

    #[error(
        "the given resource limit {} is much smaller than the minimum OoR cost found ({}); it might be incorrect",
        smag(.ceiling),
        smag(.min_oor)
    )]
    CeilingFarBelowOutOfResource { ceiling: u64, min_oor: u64 },
}

impl Warning {
    pub fn kind(&self) -> &'static str {
        match self {
            Warning::LocationDrift { .. } => "location_drift",
            Warning::OutOfResourceBelowCeiling { .. } => "out_of_resource_below_ceiling",
            Warning::SuccessAboveInferredCeiling { .. } => "success_above_inferred_ceiling",
            Warning::UndeclaredCeiling { .. } => "undeclared_ceiling",
            Warning::CeilingFarBelowOutOfResource { .. } => "ceiling_far_below_out_of_resource",
        }
    }
}

fn fmt_batches(batches: &BatchSet) -> String {
    let items: Vec<String> = batches
        .iter()
        .map(|(ab, description)| format!("AB{ab} \"{description}\""))
        .collect();
    format!("{{{}}}", items.join(", "))
}

/// Totals gathered while loading, shown alongside the warnings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadSummary {
    pub files: usize,
    pub keys: usize,
    pub trials: usize,
    pub min_trial_cost: Option<u64>,
    pub max_trial_cost: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct Report {
    pub warnings: Vec<Warning>,
    pub summary: LoadSummary,
}

#[derive(Serialize)]
struct ReportJson<'a> {
    summary: &'a LoadSummary,
    warnings: &'a [Warning],
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(kind = warning.kind(), "{warning}");
        self.warnings.push(warning);
    }

    pub fn count(&self, kind: &str) -> usize {
        self.warnings.iter().filter(|w| w.kind() == kind).count()
    }

    pub fn render_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&ReportJson {
            summary: &self.summary,
            warnings: &self.warnings,
        })
    }

    pub fn render_plain(&self) -> String {
        let s = &self.summary;
        let mut out = format!("{} files, {} keys, {} trials\n", s.files, s.keys, s.trials);
        for warning in &self.warnings {
            out.push_str(&format!("warning: {warning}\n"));
        }
        out
    }

    pub fn render_pretty(&self) -> String {
        let mut out = String::new();
        let s = &self.summary;

        out.push_str(&format!(
            "{} {} files, {} keys, {} trials",
            "✔".green(),
            s.files,
            s.keys,
            s.trials
        ));
        if let (Some(min), Some(max)) = (s.min_trial_cost, s.max_trial_cost) {
            out.push_str(&format!(", trial costs {} to {}", smag(min), smag(max)));
        }
        out.push('\n');

        if self.warnings.is_empty() {
            return out;
        }

        out.push_str(&format!("\n{} warnings\n\n", self.warnings.len()));

        let mut by_kind: BTreeMap<&str, Vec<&Warning>> = BTreeMap::new();
        for warning in &self.warnings {
            by_kind.entry(warning.kind()).or_default().push(warning);
        }

        for (kind, warnings) in by_kind {
            out.push_str(&format!("{}\n", kind.bold()));
            for warning in warnings {
                out.push_str(&format!("  {}: {}\n", "warning".yellow().bold(), warning));
            }
            out.push('\n');
        }

        out
    }
}
