use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("genome IO error: {0}")]
    GenomeIO(#[from] compact_genome::io::error::IOError),

    #[error("logger initialisation error: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error("thread pool configuration error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("directory not found: {0:?}")]
    DirectoryNotFound(PathBuf),

    #[error("cannot open output file {path:?} for writing: {source}")]
    OutputNotWritable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("the corpus directory {} contains no sequence files", .0.display())]
    EmptyCorpus(PathBuf),

    #[error("no {0} training sequences were given")]
    EmptyTrainingSet(&'static str),

    #[error("the Markov order k must be at least 1")]
    OrderIsZero,

    #[error("the given smoothing constant alpha is not a number")]
    AlphaIsNaN,

    #[error("the given smoothing constant alpha {0} is out of range (0.0, inf)")]
    AlphaOutOfRange(f64),
}
