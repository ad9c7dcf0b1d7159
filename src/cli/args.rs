//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Frog call survey pipeline: train a clip classifier, score field
/// recordings, aggregate detections.
#[derive(Debug, Parser)]
#[command(name = "anura")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options shared by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Path to the configuration file (default: platform config dir).
    #[arg(long, global = true, env = "ANURA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Suppress progress output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Stage a training run from labeled clip tables.
    Train(TrainArgs),
    /// Score every card in a dataset with a trained model.
    Predict(PredictArgs),
    /// Reduce per-card score tables to survey summary tables.
    Aggregate(AggregateArgs),
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for the train command.
#[derive(Debug, Args)]
pub struct TrainArgs {
    /// Labeled training clip table (CSV).
    pub train_table: PathBuf,

    /// Labeled validation clip table (CSV).
    pub val_table: PathBuf,

    /// Directory for the staged bundle and checkpoints.
    #[arg(short = 'o', long, env = "ANURA_CHECKPOINT_DIR")]
    pub checkpoint_dir: Option<PathBuf>,

    /// Number of training epochs.
    #[arg(long)]
    pub epochs: Option<u32>,

    /// Training batch size.
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Data loader worker count.
    #[arg(long)]
    pub workers: Option<usize>,

    /// Optimizer learning rate.
    #[arg(long, value_parser = parse_learning_rate)]
    pub learning_rate: Option<f64>,

    /// Name for this run (default: generated from the clock).
    #[arg(long)]
    pub run_name: Option<String>,

    /// Free-form comment stored with the run.
    #[arg(long)]
    pub comment: Option<String>,

    /// Append a JSONL run log to this file.
    #[arg(long)]
    pub tracking: Option<PathBuf>,
}

/// Arguments for the predict command.
#[derive(Debug, Args)]
pub struct PredictArgs {
    /// Dataset root holding one subdirectory per card.
    pub dataset: PathBuf,

    /// Model manifest (TOML) describing the exported model.
    #[arg(short, long, env = "ANURA_MODEL")]
    pub model: Option<PathBuf>,

    /// Directory the per-card score tables are written into.
    #[arg(short = 'o', long, env = "ANURA_SCORE_DIR")]
    pub score_dir: Option<PathBuf>,

    /// Inference batch size.
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Inference session worker threads.
    #[arg(long)]
    pub workers: Option<usize>,

    /// Keep only cards whose name contains this substring.
    #[arg(long)]
    pub card_filter: Option<String>,

    /// Rescore cards whose table already exists.
    #[arg(long)]
    pub force: bool,

    /// Suppress the card progress bar.
    #[arg(long)]
    pub no_progress: bool,

    /// Name for this run (default: generated from the clock).
    #[arg(long)]
    pub run_name: Option<String>,

    /// Free-form comment stored with the run.
    #[arg(long)]
    pub comment: Option<String>,

    /// Append a JSONL run log to this file.
    #[arg(long)]
    pub tracking: Option<PathBuf>,
}

/// Arguments for the aggregate command.
#[derive(Debug, Args)]
pub struct AggregateArgs {
    /// Directory holding the per-card score tables (default: from config).
    pub scores: Option<PathBuf>,

    /// Directory the summary tables are written into.
    #[arg(short = 'o', long, env = "ANURA_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Detection thresholds: comma-separated log-odds cutoffs.
    #[arg(short, long, value_delimiter = ',', value_parser = parse_threshold)]
    pub thresholds: Option<Vec<f64>>,

    /// Timezone the recorder clocks are interpreted in (IANA name).
    #[arg(long, env = "ANURA_TIMEZONE")]
    pub timezone: Option<String>,

    /// Positive class column name in the score tables.
    #[arg(long)]
    pub positive_class: Option<String>,

    /// Negative class column name in the score tables.
    #[arg(long)]
    pub negative_class: Option<String>,
}

/// Parse and validate one detection threshold.
fn parse_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !value.is_finite() {
        return Err(format!("threshold must be finite, got {value}"));
    }

    Ok(value)
}

/// Parse and validate a learning rate.
fn parse_learning_rate(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !value.is_finite() || value <= 0.0 {
        return Err(format!("learning rate must be positive, got {value}"));
    }

    Ok(value)
}
