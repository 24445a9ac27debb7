use crate::conf::error::ConfigError;
use crate::measure::analysis::AnalysisOptions;
use crate::measure::quantity::parse_quantity;
use crate::measure::ranking::Exclusions;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_TOP: usize = 5;
pub const DEFAULT_NBINS: usize = 50;

/// A resource count, written either as a number or as a string with an SI
/// suffix (`"10M"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Quantity {
    Count(u64),
    Text(String),
}

impl Quantity {
    pub fn value(&self, field: &'static str) -> Result<u64, ConfigError> {
        match self {
            Quantity::Count(n) => Ok(*n),
            Quantity::Text(s) => {
                parse_quantity(s).map_err(|source| ConfigError::InvalidQuantity { field, source })
            }
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Count(n) => write!(f, "{n}"),
            Quantity::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// How many rows to select and plot.
    pub top: usize,
    /// Number of histogram bins.
    pub nbins: usize,
    /// Minimum number of bins a sample set must spread over to be plotted.
    pub bspan: usize,
    /// Patterns of keys to leave out of the selection.
    pub exclude: Vec<String>,
    /// The resource limit the logs were produced with, if known.
    pub limit_rc: Option<Quantity>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top: DEFAULT_TOP,
            nbins: DEFAULT_NBINS,
            bspan: 0,
            exclude: Vec::new(),
            limit_rc: None,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nbins == 0 {
            return Err(ConfigError::ZeroSetting { field: "nbins" });
        }
        self.limit()?;
        self.exclusions()?;
        Ok(())
    }

    pub fn options(&self) -> Result<AnalysisOptions, ConfigError> {
        Ok(AnalysisOptions {
            limit_rc: self.limit()?,
            top: self.top,
            nbins: self.nbins,
            bspan: self.bspan,
            exclusions: self.exclusions()?,
        })
    }

    pub fn limit(&self) -> Result<Option<u64>, ConfigError> {
        self.limit_rc
            .as_ref()
            .map(|q| q.value("limit_rc"))
            .transpose()
    }

    pub fn exclusions(&self) -> Result<Exclusions, ConfigError> {
        Exclusions::new(&self.exclude).map_err(|source| ConfigError::InvalidExclusion { source })
    }

    /// Applies whatever the command line set. Exclusions add up.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(top) = overrides.top {
            self.top = top;
        }
        if let Some(nbins) = overrides.nbins {
            self.nbins = nbins;
        }
        if let Some(bspan) = overrides.bspan {
            self.bspan = bspan;
        }
        if let Some(limit) = overrides.limit_rc {
            self.limit_rc = Some(Quantity::Text(limit));
        }
        self.exclude.extend(overrides.exclude);
    }
}

/// Settings given on the command line; `None` leaves the file value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub top: Option<usize>,
    pub nbins: Option<usize>,
    pub bspan: Option<usize>,
    pub exclude: Vec<String>,
    pub limit_rc: Option<String>,
}

