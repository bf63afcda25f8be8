use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommands,

    /// The amount of log output.
    #[arg(long, global = true, value_enum, default_value_t = CliLogLevel::Info)]
    pub log_level: CliLogLevel,

    /// The number of worker threads, defaults to the number of logical CPUs.
    #[arg(long, global = true)]
    pub threads: Option<usize>,
}

#[derive(Subcommand)]
pub enum CliCommands {
    /// Train a Markov model per class and score the test sequences by their log-likelihood ratio.
    Score(ScoreCommand),

    /// Create negative controls by shuffling every record of a directory of FASTA files.
    Shuffle(ShuffleCommand),
}

#[derive(Args)]
pub struct ScoreCommand {
    /// Directory with the training sequences of the positive class.
    #[arg(long, alias = "train_pos", default_value = "train/pos")]
    pub train_pos: PathBuf,

    /// Directory with the training sequences of the negative class.
    #[arg(long, alias = "train_neg", default_value = "train/neg")]
    pub train_neg: PathBuf,

    /// Directory with the test sequences labeled positive.
    #[arg(long, alias = "test_pos", default_value = "test/pos")]
    pub test_pos: PathBuf,

    /// Directory with the test sequences labeled negative.
    #[arg(long, alias = "test_neg", default_value = "test/neg")]
    pub test_neg: PathBuf,

    /// The order of the Markov models, i.e. the length of a context.
    #[arg(long, default_value_t = 3)]
    pub k: usize,

    /// The additive smoothing constant.
    #[arg(long, default_value_t = 1.0)]
    pub alpha: f64,

    /// The CSV file to write the scores to.
    #[arg(long, default_value = "scores.csv")]
    pub out: PathBuf,
}

#[derive(Args)]
pub struct ShuffleCommand {
    /// Directory with the FASTA files to shuffle.
    #[arg(long)]
    pub input: PathBuf,

    /// Directory to write the shuffled files to. It is created if missing.
    #[arg(long)]
    pub output: PathBuf,

    #[arg(long, default_value_t = 42)]
    pub random_seed: u64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CliLogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LevelFilter {
    fn from(log_level: CliLogLevel) -> Self {
        match log_level {
            CliLogLevel::Off => LevelFilter::Off,
            CliLogLevel::Error => LevelFilter::Error,
            CliLogLevel::Warn => LevelFilter::Warn,
            CliLogLevel::Info => LevelFilter::Info,
            CliLogLevel::Debug => LevelFilter::Debug,
            CliLogLevel::Trace => LevelFilter::Trace,
        }
    }
}
