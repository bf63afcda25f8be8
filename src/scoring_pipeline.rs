use std::path::{Path, PathBuf};

use log::{info, warn};
use rayon::prelude::*;

use crate::{
    corpus::gene_name,
    error::{Error, Result},
    markov_model::MarkovModel,
};

/// Test files that share a label, e.g. all files of the positive test directory.
#[derive(Debug, Clone)]
pub struct LabeledFileGroup {
    pub label: String,
    pub files: Vec<PathBuf>,
}

/// One row of classification output.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSequence {
    /// Position in processing order, starting at 1.
    pub index: usize,
    pub label: String,
    pub name: String,
    pub score: f64,
}

/// A pair of Markov models, one per class, that scores sequences by their log-likelihood ratio.
#[derive(Debug, Clone)]
pub struct ScoringPipeline {
    positive_model: MarkovModel,
    negative_model: MarkovModel,
}

impl ScoringPipeline {
    pub fn new(order: usize, alpha: f64) -> Result<Self> {
        Ok(Self {
            positive_model: MarkovModel::new(order, alpha)?,
            negative_model: MarkovModel::new(order, alpha)?,
        })
    }

    pub fn positive_model(&self) -> &MarkovModel {
        &self.positive_model
    }

    pub fn negative_model(&self) -> &MarkovModel {
        &self.negative_model
    }

    pub fn train<
        PositiveSequence: AsRef<[u8]> + Sync,
        NegativeSequence: AsRef<[u8]> + Sync,
    >(
        &mut self,
        positive_sequences: &[PositiveSequence],
        negative_sequences: &[NegativeSequence],
    ) -> Result<()> {
        if positive_sequences.is_empty() {
            return Err(Error::EmptyTrainingSet("positive"));
        }
        if negative_sequences.is_empty() {
            return Err(Error::EmptyTrainingSet("negative"));
        }

        rayon::join(
            || self.positive_model.fit(positive_sequences),
            || self.negative_model.fit(negative_sequences),
        );

        for (class, model, sequence_count) in [
            ("positive", self.positive_model(), positive_sequences.len()),
            ("negative", self.negative_model(), negative_sequences.len()),
        ] {
            info!(
                "Trained {class} model on {sequence_count} sequences ({} contexts, {} transitions)",
                model.context_count(),
                model.total_count()
            );
        }
        Ok(())
    }

    /// The log-likelihood ratio of `sequence` between the positive and the negative model.
    ///
    /// Positive scores favour the positive class.
    /// If both models assign the same log-likelihood, including negative infinity
    /// for the empty sequence, the score is exactly zero.
    pub fn score(&self, sequence: &[u8]) -> f64 {
        let positive = self.positive_model.log_likelihood(sequence);
        let negative = self.negative_model.log_likelihood(sequence);

        if positive == negative {
            0.0
        } else {
            positive - negative
        }
    }

    /// Scores every file of every group in parallel.
    ///
    /// Rows are numbered by their position in the groups, in the order given,
    /// so the output does not depend on scheduling.
    pub fn classify_all(
        &self,
        groups: &[LabeledFileGroup],
        load: impl Fn(&Path) -> Result<Vec<u8>> + Sync,
    ) -> Result<Vec<ScoredSequence>> {
        let jobs: Vec<_> = groups
            .iter()
            .flat_map(|group| {
                group
                    .files
                    .iter()
                    .map(move |file| (group.label.as_str(), file.as_path()))
            })
            .collect();

        jobs.par_iter()
            .enumerate()
            .map(|(offset, &(label, file))| {
                let sequence = load(file)?;
                if sequence.is_empty() {
                    warn!("{file:?} contains no nucleotides, scoring it as 0");
                }

                Ok(ScoredSequence {
                    index: offset + 1,
                    label: label.to_string(),
                    name: gene_name(file),
                    score: self.score(&sequence),
                })
            })
            .collect()
    }
}
