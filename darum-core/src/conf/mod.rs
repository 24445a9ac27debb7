//! Analysis settings.
//!
//! Defaults, then an optional `darum.hcl` file, then command-line flags;
//! each layer only overrides what it sets.

pub mod error;
mod loader;
pub mod types;


pub use error::{ConfigError, config_error_hint};
pub use loader::{DEFAULT_CONFIG_FILE, load_config, resolve_config};
pub use types::{AnalysisConfig, ConfigOverrides, Quantity};
