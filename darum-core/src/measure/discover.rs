use crate::measure::error::MeasureError;
use glob::glob;
use std::path::{Path, PathBuf};

/// Discovers files matching a glob pattern below `root`.
///
/// Returns the matching paths in sorted order. Unreadable entries and
/// directories are filtered out.
///
/// # Errors
///
/// Returns `MeasureError::Glob` if the pattern is malformed.
pub fn discover(root: &Path, glob_pattern: &str) -> Result<Vec<PathBuf>, MeasureError> {
    let pattern = &resolve_glob(root, glob_pattern);
    let mut paths: Vec<_> = glob(pattern)
        .map_err(|e| MeasureError::Glob {
            pattern: pattern.to_string(),
            source: e,
        })?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();

    paths.sort();
    Ok(paths)
}

/// Joins `pattern` onto `root`.
pub fn resolve_glob(root: &Path, pattern: &str) -> String {
    root.join(pattern).to_string_lossy().into_owned()
}

/// Expands the user's paths into the list of log files to read, in order.
///
/// Files are taken as given but must be JSON; directories are searched
/// recursively for `*.json` files and must contain at least one.
pub fn collect_log_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, MeasureError> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            let extension = path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default();
            if extension != "json" {
                return Err(MeasureError::UnsupportedFormat {
                    path: path.clone(),
                    extension,
                });
            }
            files.push(path.clone());
            continue;
        }

        let found = discover(path, "**/*.json")?;
        if found.is_empty() {
            return Err(MeasureError::NoLogsFound { path: path.clone() });
        }
        tracing::debug!(root = %path.display(), files = found.len(), "discovered logs");
        files.extend(found);
    }

    Ok(files)
}

/// The most recently modified entry of `dir`, if it is a JSON file.
pub fn latest_log(dir: &Path) -> Result<PathBuf, MeasureError> {
    let entries = std::fs::read_dir(dir).map_err(|e| MeasureError::read_file(dir, e))?;

    let latest = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let modified = entry.metadata().ok()?.modified().ok()?;
            Some((modified, entry.path()))
        })
        .max_by_key(|(modified, _)| *modified)
        .map(|(_, path)| path);

    match latest {
        Some(path) if path.is_file() && path.extension().is_some_and(|e| e == "json") => Ok(path),
        _ => Err(MeasureError::NoLogsFound {
            path: dir.to_path_buf(),
        }),
    }
}
