use crate::cli::render::{render_json, render_text};
use crate::cli::{AnalyzeArgs, OutputFormat};
use crate::conf::{AnalysisConfig, ConfigError, config_error_hint, resolve_config};
use crate::measure::discover::latest_log;
use crate::measure::error::measure_error_hint;
use crate::measure::{MeasureError, analyze_logs};
use std::env;
use std::path::{Path, PathBuf};

pub fn analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let format = args.output_format();
    let cwd = env::current_dir()?;

    let cfg = config_or_exit(
        resolve_config(args.config.as_deref(), &cwd, args.overrides()),
        format,
    );
    let paths = paths_or_exit(args.paths, &cwd, format);

    let options = match cfg.options() {
        Ok(options) => options,
        Err(err) => exit_with_config_error(err, format),
    };

    match analyze_logs(&paths, &options) {
        Ok(analysis) => {
            let out = match format {
                OutputFormat::Json => render_json(&analysis)?,
                OutputFormat::Pretty => render_text(&analysis, true),
                OutputFormat::Plain => render_text(&analysis, false),
            };
            println!("{out}");
            Ok(())
        }
        Err(err) => exit_with_measure_error(err, format),
    }
}

/// With no paths given, the newest file in the working directory is used.
pub(crate) fn paths_or_exit(paths: Vec<PathBuf>, cwd: &Path, format: OutputFormat) -> Vec<PathBuf> {
    if !paths.is_empty() {
        return paths;
    }
    match latest_log(cwd) {
        Ok(path) => {
            tracing::info!(path = %path.display(), "using latest log");
            vec![path]
        }
        Err(err) => exit_with_measure_error(err, format),
    }
}

pub(crate) fn config_or_exit(
    cfg: Result<AnalysisConfig, ConfigError>,
    format: OutputFormat,
) -> AnalysisConfig {
    match cfg {
        Ok(cfg) => cfg,
        Err(err) => exit_with_config_error(err, format),
    }
}

pub(crate) fn exit_with_measure_error(err: MeasureError, format: OutputFormat) -> ! {
    print_error(&err, measure_error_hint(&err), format);
    std::process::exit(1);
}

pub(crate) fn exit_with_config_error(err: ConfigError, format: OutputFormat) -> ! {
    print_error(&err, config_error_hint(&err), format);
    std::process::exit(1);
}

fn print_error(err: &dyn std::error::Error, hint: Option<&str>, format: OutputFormat) {
    if format == OutputFormat::Pretty {
        use owo_colors::OwoColorize;
        eprintln!();
        eprintln!("{} {}", "error:".red().bold(), err);
    } else {
        eprintln!("error: {err}");
    }
    if let Some(hint) = hint {
        eprintln!();
        eprintln!("{hint}");
    }
}
