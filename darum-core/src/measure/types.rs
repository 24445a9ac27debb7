use crate::measure::schema::Bucket;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Description used for batches that carry more than one assertion.
pub const MULTI_ASSERTION_DESCRIPTION: &str = "*";
/// Description used for batches that carry no assertion at all.
pub const PHANTOM_DESCRIPTION: &str = "-";

/// Where in the source an assertion batch points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Location {
    /// The batch carries no assertion.
    Phantom,
    /// Exactly one assertion.
    Point { line: u32, col: u32 },
    /// Several assertions, spanning these lines.
    Lines { first: u32, last: u32 },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Phantom => f.write_str(PHANTOM_DESCRIPTION),
            Location::Point { line, col } => write!(f, "{line}:{col}"),
            Location::Lines { first, last } if first == last => write!(f, "L{first}"),
            Location::Lines { first, last } => write!(f, "L{first}-{last}"),
        }
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Everything gathered about one element or assertion batch across trials.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Details {
    /// Element name, without the AB suffix.
    pub display_name: String,
    /// Costs of the successful trials.
    pub resource_counts: Vec<u64>,
    pub out_of_resource_counts: Vec<u64>,
    pub failure_counts: Vec<u64>,
    /// 0 for the element-level totals.
    pub ab_number: u32,
    pub filename: String,
    pub location: Option<Location>,
    pub description: String,
}

impl Details {
    pub fn new(display_name: &str, ab_number: u32) -> Self {
        Self {
            display_name: display_name.to_string(),
            ab_number,
            ..Self::default()
        }
    }

    pub fn record(&mut self, bucket: Bucket, cost: u64) {
        match bucket {
            Bucket::Success => self.resource_counts.push(cost),
            Bucket::OutOfResource => self.out_of_resource_counts.push(cost),
            Bucket::Failure => self.failure_counts.push(cost),
        }
    }

    pub fn samples(&self, bucket: Bucket) -> &[u64] {
        match bucket {
            Bucket::Success => &self.resource_counts,
            Bucket::OutOfResource => &self.out_of_resource_counts,
            Bucket::Failure => &self.failure_counts,
        }
    }

    pub fn trials(&self) -> usize {
        self.resource_counts.len() + self.out_of_resource_counts.len() + self.failure_counts.len()
    }

    pub fn is_assertion_batch(&self) -> bool {
        self.ab_number > 0
    }

    /// `filename:location`, or just the filename when no location is known.
    pub fn source_position(&self) -> String {
        match &self.location {
            Some(loc) => format!("{}:{}", self.filename, loc),
            None => self.filename.clone(),
        }
    }

    /// Filename, location and description must never change for a key once set.
    pub(crate) fn same_origin(&self, other: &Details) -> bool {
        self.filename == other.filename
            && self.location == other.location
            && self.description == other.description
    }
}

/// Keyed by element name, or by `"<element> AB<n>"` for assertion batches.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Results(IndexMap<String, Details>);

impl Results {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Details> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Details> {
        self.0.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: String, details: Details) -> Option<Details> {
        self.0.insert(key, details)
    }

    /// The entry for `key`, created with `make` on first use.
    pub fn get_or_insert_with(
        &mut self,
        key: &str,
        make: impl FnOnce() -> Details,
    ) -> &mut Details {
        self.0.entry(key.to_string()).or_insert_with(make)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Details)> {
        self.0.iter()
    }

    /// True for logs produced in isolated-assertions mode (or with split_here etc.).
    pub fn has_assertion_batches(&self) -> bool {
        self.0.values().any(Details::is_assertion_batch)
    }
}

impl IntoIterator for Results {
    type Item = (String, Details);
    type IntoIter = indexmap::map::IntoIter<String, Details>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, Details)> for Results {
    fn from_iter<I: IntoIterator<Item = (String, Details)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Well-formedness checks are everywhere, so they stay unmarked; correctness
/// checks get a short `[C]` marker.
pub fn shorten_display_name(name: &str) -> String {
    name.replace(" (well-formedness)", "")
        .replace(" (correctness)", "[C]")
        .trim()
        .to_string()
}

/// Number of digits needed to print `max_ab`, so AB keys sort naturally.
pub fn ab_digits(max_ab: u32) -> usize {
    max_ab.max(1).to_string().len()
}

pub fn batch_key(display_name: &str, ab_number: u32, digits: usize) -> String {
    format!("{display_name} AB{ab_number:0digits$}")
}
