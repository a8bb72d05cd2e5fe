mod analysis;
mod cli;
mod config;
mod error;
mod jump;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cli::merge::{MergeOutput, MergeSource};
use cli::parse::{FilterArgs, ParseOptions};
use cli::{GroupKey, SortDirection};

#[derive(Parser)]
#[command(name = "dataco-jumps", about = "Parse, compare and merge DATACO jump files")]
struct Cli {
    /// Log debug output to stderr (DATACO_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Base directory holding the project folders (default: DATACO_BASE_DIR or /mobileye/DC/Voice_Tagging/)
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate a single jump file
    Parse {
        file: PathBuf,
        #[command(flatten)]
        filters: FilterArgs,
        /// Sort events by session date, then frame id
        #[arg(long, value_enum)]
        sort: Option<SortDirection>,
        /// Count events per group
        #[arg(long, value_enum)]
        group_by: Option<GroupKey>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Write the selected events to a new jump file
        #[arg(short, long)]
        write: Option<PathBuf>,
    },
    /// Build a dataset summary from jump files
    Summarize {
        /// DATACO number the files belong to
        #[arg(long)]
        dataco: String,
        /// Jump files (searched in the base directory when omitted)
        files: Vec<PathBuf>,
    },
    /// Compare two or more dataset summaries
    Compare {
        /// Summary JSON documents
        #[arg(required = true)]
        summaries: Vec<PathBuf>,
    },
    /// Merge two or more dataset summaries, or the jump files of DATACO numbers
    Merge {
        /// Summary JSON documents
        #[arg(required_unless_present = "datacos")]
        summaries: Vec<PathBuf>,
        /// Merge the jump files of this DATACO number (repeatable) instead of summaries
        #[arg(long = "dataco", conflicts_with = "summaries")]
        datacos: Vec<String>,
        /// Write the merged content to this file
        #[arg(short, long, conflicts_with = "save")]
        output: Option<PathBuf>,
        /// Write the merged content under <base-dir>/merged/
        #[arg(long)]
        save: bool,
    },
    /// Check which DATACO numbers have jump files
    Check {
        #[arg(required = true)]
        datacos: Vec<String>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("DATACO_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let base_dir = cli.base_dir.as_deref();

    match cli.command {
        Commands::Parse {
            file,
            filters,
            sort,
            group_by,
            json,
            write,
        } => {
            let options = ParseOptions {
                filters: filters.filters(),
                sort: sort.map(Into::into),
                group_by,
                json,
                write,
            };
            cli::parse::run(&file, &options)?
        }
        Commands::Summarize { dataco, files } => cli::summarize::run(&dataco, &files, base_dir)?,
        Commands::Compare { summaries } => cli::compare::run(&summaries)?,
        Commands::Merge {
            summaries,
            datacos,
            output,
            save,
        } => {
            let source = if datacos.is_empty() {
                MergeSource::Summaries(summaries)
            } else {
                MergeSource::Datacos {
                    numbers: datacos,
                    base_dir: cli.base_dir.clone(),
                }
            };
            let target = match (output, save) {
                (Some(path), _) => MergeOutput::Path(path),
                (None, true) => MergeOutput::BaseDir(cli.base_dir.clone()),
                (None, false) => MergeOutput::None,
            };
            cli::merge::run(&source, &target)?
        }
        Commands::Check { datacos } => cli::check::run(&datacos, base_dir)?,
    }

    Ok(())
}
