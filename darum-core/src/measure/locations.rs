use crate::measure::report::{Report, Warning};
use crate::measure::types::Location;
use serde::Serialize;
use std::collections::BTreeMap;

/// AB number → description of the batches seen at one source location in one trial.
pub type BatchSet = BTreeMap<u32, String>;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SourceLocation {
    pub filename: String,
    pub element: String,
    pub location: Location,
}

/// Which assertion batches each trial produced at each source location.
///
/// Trials are kept in the order they were first seen so that warnings name the
/// same seed on every run over the same inputs.
#[derive(Debug, Clone, Default)]
pub struct LocationIndex {
    locations: BTreeMap<SourceLocation, Vec<(u64, BatchSet)>>,
}

impl LocationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn record(
        &mut self,
        location: SourceLocation,
        seed: u64,
        ab_number: u32,
        description: &str,
    ) {
        let trials = self.locations.entry(location).or_default();
        let i = match trials.iter().position(|(s, _)| *s == seed) {
            Some(i) => i,
            None => {
                trials.push((seed, BatchSet::new()));
                trials.len() - 1
            }
        };
        trials[i].1.insert(ab_number, description.to_string());
    }

    /// Folds `other` in. The same seed seen in both is treated as the same trial.
    pub fn merge(&mut self, other: LocationIndex) {
        for (location, trials) in other.locations {
            for (seed, batches) in trials {
                for (ab_number, description) in batches {
                    self.record(location.clone(), seed, ab_number, &description);
                }
            }
        }
    }

    pub fn trials_at(&self, location: &SourceLocation) -> Option<&[(u64, BatchSet)]> {
        self.locations.get(location).map(Vec::as_slice)
    }
}

/// Every location seen in more than one trial must have produced the same
/// batches in each of them. A mismatch is reported once per location, naming
/// the first seed that diverges from the first trial.
pub fn check_locations(index: &LocationIndex, report: &mut Report) -> usize {
    let mut drifted = 0;

    for (location, trials) in &index.locations {
        let [(_, first), rest @ ..] = trials.as_slice() else {
            continue;
        };

        if let Some((seed, batches)) = rest.iter().find(|(_, batches)| batches != first) {
            report.warn(Warning::LocationDrift {
                filename: location.filename.clone(),
                element: location.element.clone(),
                location: location.location,
                seed: *seed,
                expected: first.clone(),
                found: batches.clone(),
            });
            drifted += 1;
        }
    }

    drifted
}
