use crate::measure::stats_aggregation::SummaryRow;
use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;

/// Most interesting first: failures, then OoRs, then weighted span, all
/// descending. Rows without successes have no span and go last among their
/// ties. The sort is stable, so full ties keep their insertion order.
pub fn rank_rows(rows: &mut [SummaryRow]) {
    rows.sort_by(|a, b| {
        b.failures
            .cmp(&a.failures)
            .then(b.out_of_resources.cmp(&a.out_of_resources))
            .then_with(|| descending_span(a.weighted_span, b.weighted_span))
    });
}

fn descending_span(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Case-insensitive denylist on element keys.
#[derive(Debug, Clone, Default)]
pub struct Exclusions {
    patterns: Vec<Regex>,
}

impl Exclusions {
    /// Each pattern is a regex; one that does not compile is matched as a
    /// plain substring instead.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                case_insensitive(p).or_else(|_| case_insensitive(&regex::escape(p)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn is_excluded(&self, key: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(key))
    }
}

fn case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}
