mod analyze;
mod check;
mod render;

pub use analyze::*;
pub use check::*;
pub use render::*;

use crate::conf::ConfigOverrides;
use clap::{Args, ValueEnum};
use std::io::{self, IsTerminal};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct AnalyzeArgs {
    /// Log files or directories; defaults to the newest file in the current directory
    pub paths: Vec<PathBuf>,

    /// Exclude keys matching this regex (case-insensitive, repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Number of rows to select and plot
    #[arg(short, long)]
    pub top: Option<usize>,

    /// Resource limit the logs were produced with, e.g. 10M
    #[arg(short, long = "limit-rc", value_name = "LIMIT")]
    pub limit_rc: Option<String>,

    /// Number of histogram bins
    #[arg(short, long)]
    pub nbins: Option<usize>,

    /// Only plot rows whose samples spread over at least this many bins
    #[arg(short, long)]
    pub bspan: Option<usize>,

    /// Path to a darum.hcl config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format; pretty on a terminal, plain otherwise
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

impl AnalyzeArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            top: self.top,
            nbins: self.nbins,
            bspan: self.bspan,
            exclude: self.exclude.clone(),
            limit_rc: self.limit_rc.clone(),
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        self.format.unwrap_or_else(OutputFormat::default_for_stdout)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Plain,
    Json,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if io::stdout().is_terminal() {
            OutputFormat::Pretty
        } else {
            OutputFormat::Plain
        }
    }
}
