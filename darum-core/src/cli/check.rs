use crate::cli::analyze::{
    config_or_exit, exit_with_config_error, exit_with_measure_error, paths_or_exit,
};
use crate::cli::{AnalyzeArgs, OutputFormat};
use crate::conf::resolve_config;
use crate::measure::{StatsAggregator, read_logs};
use std::env;

/// Loads and cross-checks the logs without rendering any statistics.
pub fn check(args: AnalyzeArgs) -> anyhow::Result<()> {
    let format = args.output_format();
    let cwd = env::current_dir()?;

    let cfg = config_or_exit(
        resolve_config(args.config.as_deref(), &cwd, args.overrides()),
        format,
    );
    let paths = paths_or_exit(args.paths, &cwd, format);
    let limit = match cfg.limit() {
        Ok(limit) => limit,
        Err(err) => exit_with_config_error(err, format),
    };

    let loaded = match read_logs(&paths) {
        Ok(loaded) => loaded,
        Err(err) => exit_with_measure_error(err, format),
    };
    let mut report = loaded.check();
    if let Err(err) = StatsAggregator::new(limit).snapshot(&loaded.results, &mut report) {
        exit_with_measure_error(err, format);
    }

    let out = match format {
        OutputFormat::Json => report.render_json()?,
        OutputFormat::Plain => report.render_plain(),
        OutputFormat::Pretty => report.render_pretty(),
    };
    print!("{out}");
    Ok(())
}
