use std::path::PathBuf;

use clap::{Parser, Subcommand};
use scorecard_tools::config::{
    DEFAULT_BLOCK_DIR, DEFAULT_DOWNLOAD_DIR, DEFAULT_LINKS_FILE, DEFAULT_NAMES_FILE,
    DEFAULT_SUMMARY_FILE,
};
use scorecard_tools::model::BatchReport;
use scorecard_tools::pipeline::{self, PipelinePaths};
use scorecard_tools::{Result, ScoringConfig, logging};
use tracing::warn;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = logging::init(cli.verbose) {
        eprintln!("error: {error}");
    }
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Fetch(args) => {
            let report = pipeline::run_fetch(&args.links, &args.names, &args.output)?;
            log_failures(&report);
            Ok(())
        }
        Command::Extract(args) => {
            let config = load_config(args.config.as_ref())?;
            let report = pipeline::run_extract(&args.input, &args.output, &config)?;
            log_failures(&report);
            Ok(())
        }
        Command::Aggregate(args) => {
            let config = load_config(args.config.as_ref())?;
            let report = pipeline::run_aggregate(&args.input, &args.output, &config)?;
            log_failures(&report);
            Ok(())
        }
        Command::Run(args) => {
            let config = load_config(args.config.as_ref())?;
            let paths = PipelinePaths {
                links: PathBuf::from(DEFAULT_LINKS_FILE),
                names: PathBuf::from(DEFAULT_NAMES_FILE),
                download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
                block_dir: PathBuf::from(DEFAULT_BLOCK_DIR),
                summary: PathBuf::from(DEFAULT_SUMMARY_FILE),
            };
            pipeline::run_all(&paths, &config)
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<ScoringConfig> {
    match path {
        Some(path) => ScoringConfig::from_json_file(path),
        None => Ok(ScoringConfig::default()),
    }
}

fn log_failures<T>(report: &BatchReport<T>) {
    for failure in &report.failed {
        warn!(item = %failure.item.display(), error = %failure.error, "not processed");
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Collect applicability scores from application workbooks."
)]
struct Cli {
    /// Enable debug logging when RUST_LOG is not set.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download the workbooks listed in the manifests.
    Fetch(FetchArgs),
    /// Cut the applicability block out of every workbook.
    Extract(ExtractArgs),
    /// Fold extracted blocks into the wide summary table.
    Aggregate(AggregateArgs),
    /// Run fetch, extract and aggregate with the default locations.
    Run(RunArgs),
}

#[derive(clap::Args)]
struct FetchArgs {
    /// File listing one download link per line.
    #[arg(long, default_value = DEFAULT_LINKS_FILE)]
    links: PathBuf,

    /// File listing one target file name per line.
    #[arg(long, default_value = DEFAULT_NAMES_FILE)]
    names: PathBuf,

    /// Directory receiving the downloads.
    #[arg(long, default_value = DEFAULT_DOWNLOAD_DIR)]
    output: PathBuf,
}

#[derive(clap::Args)]
struct ExtractArgs {
    /// Directory holding the workbooks.
    #[arg(long, default_value = DEFAULT_DOWNLOAD_DIR)]
    input: PathBuf,

    /// Directory receiving the extracted blocks.
    #[arg(long, default_value = DEFAULT_BLOCK_DIR)]
    output: PathBuf,

    /// Optional JSON file overriding the marker and sheet name.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(clap::Args)]
struct AggregateArgs {
    /// Directory holding the extracted blocks.
    #[arg(long, default_value = DEFAULT_BLOCK_DIR)]
    input: PathBuf,

    /// Summary table to write.
    #[arg(long, default_value = DEFAULT_SUMMARY_FILE)]
    output: PathBuf,

    /// Optional JSON file overriding the scoring heuristics.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(clap::Args)]
struct RunArgs {
    /// Optional JSON file overriding the scoring heuristics.
    #[arg(long)]
    config: Option<PathBuf>,
}
