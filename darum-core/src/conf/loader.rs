use crate::conf::error::ConfigError;
use crate::conf::types::{AnalysisConfig, ConfigOverrides};
use std::fs;
use std::path::Path;

/// Picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "darum.hcl";

pub fn load_config(path: &Path) -> Result<AnalysisConfig, ConfigError> {
    let s = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let cfg: AnalysisConfig = hcl::from_str(&s).map_err(|e| ConfigError::parse(path, e))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(cfg)
}

/// Layers the optional config file and the command line over the defaults.
///
/// An explicit `path` must exist; otherwise `darum.hcl` in `cwd` is used if
/// present.
pub fn resolve_config(
    path: Option<&Path>,
    cwd: &Path,
    overrides: ConfigOverrides,
) -> Result<AnalysisConfig, ConfigError> {
    let mut cfg = match path {
        Some(path) => load_config(path)?,
        None => {
            let default = cwd.join(DEFAULT_CONFIG_FILE);
            if default.is_file() {
                load_config(&default)?
            } else {
                AnalysisConfig::default()
            }
        }
    };

    cfg.apply(overrides);
    cfg.validate()?;
    Ok(cfg)
}
