use crate::measure::Analysis;
use crate::measure::histogram::{Histogram, HistogramSet};
use crate::measure::quantity::{smag, smag_f64};
use crate::measure::report::{LoadSummary, Warning};
use crate::measure::stats_aggregation::{Ceiling, Extremes, SummaryRow};
use crate::measure::types::Results;
use owo_colors::OwoColorize;
use serde::Serialize;

const BAR_WIDTH: usize = 40;

/// Terminal styling that can be switched off for plain output.
#[derive(Debug, Clone, Copy)]
struct Paint {
    color: bool,
}

impl Paint {
    fn bold(self, s: &str) -> String {
        if self.color { s.bold().to_string() } else { s.to_string() }
    }

    fn red(self, s: &str) -> String {
        if self.color { s.red().to_string() } else { s.to_string() }
    }

    fn yellow(self, s: &str) -> String {
        if self.color { s.yellow().to_string() } else { s.to_string() }
    }

    fn dimmed(self, s: &str) -> String {
        if self.color { s.dimmed().to_string() } else { s.to_string() }
    }
}

pub fn render_text(analysis: &Analysis, color: bool) -> String {
    let paint = Paint { color };
    let snapshot = &analysis.snapshot;
    let mut out = String::new();

    out.push_str(&render_ceiling(snapshot.ceiling, paint));

    let shown = snapshot.selected().count();
    let title = if snapshot.has_assertion_batches {
        format!("Top {shown} assertion batches")
    } else {
        format!("Top {shown} members")
    };
    out.push_str(&format!("\n{}\n", paint.bold(&title)));
    out.push_str(&render_table(primary_table_rows(analysis), paint));

    if snapshot.has_assertion_batches {
        out.push_str(&format!("\n{}\n", paint.bold("Member totals")));
        out.push_str(&render_table(
            snapshot.element_totals().take(shown.max(1)).collect(),
            paint,
        ));
    }

    if let Some(set) = &analysis.histograms {
        if !set.histograms.is_empty() {
            out.push_str(&format!("\n{}\n", paint.bold("Cost distributions")));
        }
        for histogram in &set.histograms {
            out.push_str(&render_histogram(histogram, set, paint));
        }
    }

    out.push('\n');
    if color {
        out.push_str(&analysis.report.render_pretty());
    } else {
        out.push_str(&analysis.report.render_plain());
    }

    out
}

/// The ranked primary rows down to the last selected one, excluded rows included.
fn primary_table_rows(analysis: &Analysis) -> Vec<&SummaryRow> {
    let wanted = analysis.snapshot.selected().count();
    let mut shown = 0;
    let mut rows = Vec::new();

    for row in analysis.snapshot.primary_rows() {
        if shown == wanted {
            break;
        }
        if row.selected {
            shown += 1;
        } else if !row.excluded {
            continue;
        }
        rows.push(row);
    }

    rows
}

fn render_ceiling(ceiling: Ceiling, paint: Paint) -> String {
    match ceiling {
        Ceiling::Declared(limit) => format!("Resource limit: {}\n", smag(limit)),
        Ceiling::Inferred(limit) => format!(
            "Resource limit: {} {}\n",
            smag(limit),
            paint.yellow("(inferred from the cheapest OoR)")
        ),
        Ceiling::Unknown => "Resource limit: unknown\n".to_string(),
    }
}

fn render_table(rows: Vec<&SummaryRow>, paint: Paint) -> String {
    if rows.is_empty() {
        return format!("  {}\n", paint.dimmed("<nothing to show>"));
    }

    let key_width = rows.iter().map(|r| r.key.len()).max().unwrap_or(0).max(3);
    let mut out = format!(
        "  {:<key_width$}  {:>8} {:>8} {:>8} {:>8} {:>5} {:>5} {:>5}  {}\n",
        "key", "min", "max", "span", "w.span", "ok", "OoR", "fail", "location"
    );

    for row in rows {
        let line = format!(
            "  {:<key_width$}  {:>8} {:>8} {:>8} {:>8} {:>5} {:>5} {:>5}  {}",
            row.key,
            row.min_rc.map(smag).unwrap_or_else(|| "-".to_string()),
            row.max_rc.map(smag).unwrap_or_else(|| "-".to_string()),
            row.span
                .map(|s| format!("{:.1}%", s * 100.0))
                .unwrap_or_else(|| "-".to_string()),
            row.weighted_span
                .map(smag_f64)
                .unwrap_or_else(|| "-".to_string()),
            row.successes,
            row.out_of_resources,
            row.failures,
            row.location,
        );

        let line = if row.excluded {
            paint.dimmed(&line)
        } else if row.failures > 0 {
            paint.red(&line)
        } else if row.out_of_resources > 0 {
            paint.yellow(&line)
        } else {
            line
        };
        out.push_str(&line);

        let flags = row_flags(row);
        if !flags.is_empty() {
            out.push_str(&format!("  {}", paint.dimmed(&format!("[{}]", flags.join(", ")))));
        }
        out.push('\n');
    }

    out
}

fn row_flags(row: &SummaryRow) -> Vec<String> {
    let mut flags = Vec::new();
    if row.excluded {
        flags.push("excluded".to_string());
    }
    if row.is_downstream_of_oor() {
        flags.push(format!("after {} OoR AB(s)", row.downstream_of_oor));
    }
    if row.is_downstream_of_failure() {
        flags.push(format!("after {} failed AB(s)", row.downstream_of_failure));
    }
    flags
}

/// One line per bin, from the first to the last non-empty one.
fn render_histogram(histogram: &Histogram, set: &HistogramSet, paint: Paint) -> String {
    let bins = histogram.snapshot(&set.bins, &set.failed_label);
    let mut out = format!("\n  {}\n", paint.bold(&histogram.key));

    let first = bins.iter().position(|(_, c)| *c != 0);
    let last = bins.iter().rposition(|(_, c)| *c != 0);
    let (Some(first), Some(last)) = (first, last) else {
        out.push_str(&format!("    {}\n", paint.dimmed("<no samples in range>")));
        return out;
    };

    let peak = bins.iter().map(|(_, c)| *c).max().unwrap_or(1).max(1);
    for (label, count) in &bins[first..=last] {
        let bars = (*count as f64 / peak as f64 * BAR_WIDTH as f64).round() as usize;
        let bar = "█".repeat(if *count > 0 { bars.max(1) } else { 0 });
        let bar = if *label == set.failed_label {
            paint.red(&bar)
        } else {
            bar
        };
        out.push_str(&format!("    {label:>10} {bar} {count}\n"));
    }

    out
}

#[derive(Serialize)]
struct AnalysisJson<'a> {
    summary: &'a LoadSummary,
    ceiling: Ceiling,
    extremes: &'a Extremes,
    has_assertion_batches: bool,
    rows: &'a [SummaryRow],
    histograms: Option<&'a HistogramSet>,
    results: &'a Results,
    warnings: &'a [Warning],
}

pub fn render_json(analysis: &Analysis) -> Result<String, serde_json::Error> {
    let snapshot = &analysis.snapshot;
    serde_json::to_string_pretty(&AnalysisJson {
        summary: &analysis.report.summary,
        ceiling: snapshot.ceiling,
        extremes: &snapshot.extremes,
        has_assertion_batches: snapshot.has_assertion_batches,
        rows: &snapshot.rows,
        histograms: analysis.histograms.as_ref(),
        results: &analysis.loaded.results,
        warnings: &analysis.report.warnings,
    })
}
