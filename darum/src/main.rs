use clap::{ArgAction, Parser, Subcommand};
use darum_core::cli::{self, AnalyzeArgs};
use darum_core::logging::init_logging;

#[derive(Parser, Debug)]
#[command(
    name = "darum",
    version,
    about = "Darum: find brittle verification costs in Dafny measure-complexity logs"
)]
struct Cli {
    /// Increase diagnostic output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank members and assertion batches by how erratic their costs are (default)
    Analyze(AnalyzeArgs),

    /// Load and cross-check logs, then print only the warnings
    Check(AnalyzeArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Command::Analyze(args)) => cli::analyze(args),
        Some(Command::Check(args)) => cli::check(args),
        None => cli::analyze(AnalyzeArgs::default()),
    }
}
