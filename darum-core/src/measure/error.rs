use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeasureError {
    //-------------------------------------------------------------------------
    // IO / Discovery
    //-------------------------------------------------------------------------
    #[error("failed to read log file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("glob pattern error: {pattern}: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("no log files found in {path}")]
    NoLogsFound { path: PathBuf },

    #[error("unsupported log format '{extension}' in {path}; only JSON logs can be read")]
    UnsupportedFormat { path: PathBuf, extension: String },

    //-------------------------------------------------------------------------
    // Document structure
    //-------------------------------------------------------------------------
    #[error("malformed log {document}: {reason}")]
    MalformedLog { document: String, reason: String },

    #[error("inconsistent accounting in {document} for '{element}': {reason}")]
    InconsistentAccounting {
        document: String,
        element: String,
        reason: String,
    },

    #[error("log {document} contains no verification results")]
    EmptyInput { document: String },

    //-------------------------------------------------------------------------
    // Aggregation
    //-------------------------------------------------------------------------
    #[error("resource ceiling violated by '{key}': {reason}")]
    CeilingViolation { key: String, reason: String },
}

impl MeasureError {
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(document: &str, reason: impl Into<String>) -> Self {
        Self::MalformedLog {
            document: document.to_string(),
            reason: reason.into(),
        }
    }

    pub fn inconsistent(document: &str, element: &str, reason: impl Into<String>) -> Self {
        Self::InconsistentAccounting {
            document: document.to_string(),
            element: element.to_string(),
            reason: reason.into(),
        }
    }

    pub fn ceiling(key: &str, reason: impl Into<String>) -> Self {
        Self::CeilingViolation {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// A short pointer to what usually causes each fatal error.
pub fn measure_error_hint(err: &MeasureError) -> Option<&'static str> {
    match err {
        MeasureError::MalformedLog { .. } => Some(
            "The log does not have the shape produced by `dafny measure-complexity`.\n\
             \n\
             Logs written by `dafny verify` carry no random seed and cannot be analyzed.\n\
             Regenerate the log with:\n\
             \n\
             dafny measure-complexity --log-format json ...",
        ),

        MeasureError::InconsistentAccounting { .. } => Some(
            "The costs or outcomes reported by the log do not add up.\n\
             \n\
             The log format may have changed; please report this log.",
        ),

        MeasureError::EmptyInput { .. } => Some(
            "The log was read but contains no verified members.\n\
             \n\
             Check that the verification run completed and that the log file is not truncated.",
        ),

        MeasureError::CeilingViolation { .. } => Some(
            "Some costs fall on the wrong side of the resource limit.\n\
             \n\
             Pass the same --limit-rc that was used for verification, and do not mix\n\
             logs produced with different resource limits.",
        ),

        MeasureError::UnsupportedFormat { .. } => Some(
            "Only JSON logs are supported. Use `--log-format json` when running Dafny.",
        ),

        _ => None,
    }
}
