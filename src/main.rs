use std::{
    path::{Path, PathBuf},
    process,
    time::Instant,
};

use clap::Parser;
use cli::{Cli, CliCommands, ScoreCommand, ShuffleCommand};
use corpus::{list_sequence_files, load_sequence, SCORED_EXTENSIONS};
use log::{error, info};
use rayon::prelude::*;
use result_writer::ScoreFile;
use scoring_pipeline::{LabeledFileGroup, ScoringPipeline};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use crate::error::{Error, Result};

mod cli;
mod corpus;
mod error;
mod markov_model;
mod result_writer;
mod scoring_pipeline;
mod shuffle;

fn main() {
    let cli = Cli::parse();

    if let Err(error) = TermLogger::init(
        cli.log_level.into(),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Error: {}", Error::from(error));
        process::exit(1);
    }

    let start = Instant::now();
    run(cli).unwrap_or_else(|error| {
        error!("{error}");
        process::exit(1);
    });
    info!("Elapsed time: {:.3?}", start.elapsed());
}

fn run(cli: Cli) -> Result<()> {
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    match cli.command {
        CliCommands::Score(score_command) => score(score_command),
        CliCommands::Shuffle(shuffle_command) => shuffle(shuffle_command),
    }
}

fn score(score_command: ScoreCommand) -> Result<()> {
    // Verify inputs before touching any sequence.
    let mut pipeline = ScoringPipeline::new(score_command.k, score_command.alpha)?;
    let train_positive_files = list_training_files(&score_command.train_pos)?;
    let train_negative_files = list_training_files(&score_command.train_neg)?;
    let groups = [
        LabeledFileGroup {
            label: "pos".to_string(),
            files: list_sequence_files(&score_command.test_pos, &SCORED_EXTENSIONS)?,
        },
        LabeledFileGroup {
            label: "neg".to_string(),
            files: list_sequence_files(&score_command.test_neg, &SCORED_EXTENSIONS)?,
        },
    ];
    let score_file = ScoreFile::create(&score_command.out)?;

    // Train.
    let positive_sequences = load_sequences(&train_positive_files)?;
    let negative_sequences = load_sequences(&train_negative_files)?;
    pipeline.train(&positive_sequences, &negative_sequences)?;

    // Score.
    info!(
        "Scoring {} test sequences with k = {}, alpha = {}",
        groups.iter().map(|group| group.files.len()).sum::<usize>(),
        pipeline.positive_model().order(),
        pipeline.positive_model().alpha()
    );
    let rows = pipeline.classify_all(&groups, load_sequence)?;
    score_file.write(&rows)
}

fn list_training_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let files = list_sequence_files(directory, &SCORED_EXTENSIONS)?;
    if files.is_empty() {
        return Err(Error::EmptyCorpus(directory.to_path_buf()));
    }

    info!("Found {} training files in {directory:?}", files.len());
    Ok(files)
}

fn load_sequences(files: &[PathBuf]) -> Result<Vec<Vec<u8>>> {
    files.par_iter().map(|file| load_sequence(file)).collect()
}

fn shuffle(shuffle_command: ShuffleCommand) -> Result<()> {
    let file_count = shuffle::shuffle_directory(
        &shuffle_command.input,
        &shuffle_command.output,
        shuffle_command.random_seed,
    )?;

    info!(
        "Shuffled {file_count} files into {:?}",
        shuffle_command.output
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{
        fs,
        path::{Path, PathBuf},
    };

    use tempfile::TempDir;

    use super::score;
    use crate::{cli::ScoreCommand, error::Error};

    struct Dataset {
        root: TempDir,
    }

    impl Dataset {
        fn new() -> Self {
            let root = tempfile::tempdir().unwrap();
            for directory in ["train/pos", "train/neg", "test/pos", "test/neg", "out"] {
                fs::create_dir_all(root.path().join(directory)).unwrap();
            }

            let dataset = Self { root };
            dataset.write("train/pos/gene_1.fna", ">gene_1\nAAAAAAAA\n");
            dataset.write("train/neg/shuffled_gene_1.fna", ">gene_1\nTTTTTTTT\n");
            dataset.write("test/pos/b.fna", ">b\nAAAAAA\n");
            dataset.write("test/pos/a.fna", ">a\nAAAA\n");
            dataset.write("test/pos/ignored.fa", ">ignored\nAAAA\n");
            dataset.write("test/neg/c.fna", "TTTT\n");
            dataset
        }

        fn path(&self, name: &str) -> PathBuf {
            self.root.path().join(name)
        }

        fn write(&self, name: &str, contents: &str) {
            fs::write(self.path(name), contents).unwrap();
        }

        fn command(&self) -> ScoreCommand {
            ScoreCommand {
                train_pos: self.path("train/pos"),
                train_neg: self.path("train/neg"),
                test_pos: self.path("test/pos"),
                test_neg: self.path("test/neg"),
                k: 2,
                alpha: 1.0,
                out: self.path("out/scores.csv"),
            }
        }
    }

    fn assert_empty(directory: &Path) {
        assert_eq!(fs::read_dir(directory).unwrap().count(), 0);
    }

    #[test]
    fn test_score_directories_to_csv() {
        let dataset = Dataset::new();
        score(dataset.command()).unwrap();

        let output = fs::read_to_string(dataset.path("out/scores.csv")).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "number,label,gene_name,score");

        let rows: Vec<Vec<&str>> = lines[1..]
            .iter()
            .map(|line| line.split(',').collect())
            .collect();
        let keys: Vec<_> = rows.iter().map(|row| (row[0], row[1], row[2])).collect();
        assert_eq!(keys, [("1", "pos", "a"), ("2", "pos", "b"), ("3", "neg", "c")]);

        let scores: Vec<f64> = rows.iter().map(|row| row[3].parse().unwrap()).collect();
        assert!(scores[0] > 0.0);
        assert!(scores[1] > scores[0]);
        assert!(scores[2] < 0.0);
        assert!((scores[0] + scores[2]).abs() < 1e-12);

        assert_eq!(fs::read_dir(dataset.path("out")).unwrap().count(), 1);
    }

    #[test]
    fn test_empty_training_directory() {
        let dataset = Dataset::new();
        fs::remove_file(dataset.path("train/neg/shuffled_gene_1.fna")).unwrap();
        dataset.write("train/neg/notes.txt", "TTTT");

        let result = score(dataset.command());
        assert!(
            matches!(&result, Err(Error::EmptyCorpus(path)) if path == &dataset.path("train/neg"))
        );
        assert_empty(&dataset.path("out"));
    }

    #[test]
    fn test_missing_training_directory() {
        let dataset = Dataset::new();
        fs::remove_dir_all(dataset.path("train/pos")).unwrap();

        let result = score(dataset.command());
        assert!(
            matches!(&result, Err(Error::DirectoryNotFound(path)) if path == &dataset.path("train/pos"))
        );
        assert_empty(&dataset.path("out"));
    }

    #[test]
    fn test_unwritable_output_fails_before_scoring() {
        let dataset = Dataset::new();
        let mut command = dataset.command();
        command.out = dataset.path("missing/scores.csv");

        assert!(matches!(
            score(command),
            Err(Error::OutputNotWritable { path, .. }) if path == dataset.path("missing/scores.csv")
        ));
        assert!(!dataset.path("missing").exists());
    }

    #[test]
    fn test_empty_corpus_message() {
        let error = Error::EmptyCorpus(Path::new("train/pos").to_path_buf());
        assert_eq!(
            error.to_string(),
            "the corpus directory train/pos contains no sequence files"
        );
    }
}
