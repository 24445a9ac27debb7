use crate::measure::quantity::ParseQuantityError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    // IO
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Parsing
    #[error("failed to parse HCL in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: hcl::Error,
    },

    // Validation
    #[error("invalid value for '{field}': {source}")]
    InvalidQuantity {
        field: &'static str,
        #[source]
        source: ParseQuantityError,
    },

    #[error("invalid exclusion pattern: {source}")]
    InvalidExclusion {
        #[source]
        source: regex::Error,
    },

    #[error("'{field}' must be at least 1")]
    ZeroSetting { field: &'static str },
}

impl ConfigError {
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: hcl::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}

pub fn config_error_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        ConfigError::Parse { .. } => Some(
            "The config file is HCL with top-level attributes only.\n\
             \n\
             Example:\n\
             \n\
             top      = 5\n\
             nbins    = 50\n\
             exclude  = [\"Lemma\"]\n\
             limit_rc = \"10M\"",
        ),

        ConfigError::InvalidQuantity { .. } => Some(
            "Resource counts accept an optional magnitude suffix.\n\
             \n\
             Examples: 1200, 1.5k, 10M, 2G",
        ),

        _ => None,
    }
}
