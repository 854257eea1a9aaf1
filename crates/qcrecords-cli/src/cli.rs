use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "qcrecords - Rebuild typed quantum-chemistry records and 3D molecules from cached result batches.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to reconstruct triples.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a batch of result triples into molecules, optionally writing them to disk.
    Convert(ConvertArgs),
    /// Print a summary of every reconstructed (record, molecule) pair in a batch.
    Inspect(InspectArgs),
}

/// Options shared by every command that runs the pipeline.
#[derive(Args, Debug, Clone, Default)]
pub struct PipelineArgs {
    /// Path to the batch file: a JSON array of [record, mapped_smiles, conformers] triples.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Which conformer buffer of each triple to attach (0-based).
    #[arg(long, value_name = "INT")]
    pub conformer_index: Option<usize>,

    /// Fail on molecules whose stereocenters lack descriptors.
    #[arg(long)]
    pub strict_stereo: bool,

    /// Set aside triples that fail to reconstruct instead of aborting the run.
    #[arg(long)]
    pub keep_going: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S pipeline.conformer-index=1
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `convert` subcommand.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Write the molecules here. The format follows the extension (.sdf or .xyz),
    /// falling back to `output.format` from the config file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write per-record reconstruction timings to this CSV file.
    #[arg(long, value_name = "PATH")]
    pub timings: Option<PathBuf>,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Print at most this many pairs.
    #[arg(long, value_name = "INT")]
    pub limit: Option<usize>,
}
