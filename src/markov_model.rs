use std::collections::BTreeMap;

use crate::error::{Error, Result};

pub const ALPHABET_SIZE: usize = 4;

/// The nucleotides counted by a [`MarkovModel`], in count row order.
pub const ALPHABET: [u8; ALPHABET_SIZE] = *b"ACGT";

/// A context symbol. `None` is the start-of-sequence padding, which no input byte can collide with.
pub type ContextSymbol = Option<u8>;

pub fn alphabet_index(symbol: u8) -> Option<usize> {
    match symbol {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    }
}

/// An order-k Markov chain over nucleotides with additive smoothing.
///
/// The model maps each context of `k` preceding symbols to the abundances of the
/// nucleotides that followed it in the training sequences.
/// Contexts that were never observed behave like an all-zero row.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkovModel {
    order: usize,
    alpha: f64,
    model: BTreeMap<Box<[ContextSymbol]>, [u32; ALPHABET_SIZE]>,
}

impl MarkovModel {
    pub fn new(order: usize, alpha: f64) -> Result<Self> {
        if order == 0 {
            return Err(Error::OrderIsZero);
        }
        if alpha.is_nan() {
            return Err(Error::AlphaIsNaN);
        }
        if alpha <= 0.0 || alpha.is_infinite() {
            return Err(Error::AlphaOutOfRange(alpha));
        }

        Ok(Self {
            order,
            alpha,
            model: Default::default(),
        })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// The number of distinct contexts with at least one count.
    pub fn context_count(&self) -> usize {
        self.model.len()
    }

    /// The number of counted transitions over all contexts.
    pub fn total_count(&self) -> u64 {
        self.model
            .values()
            .flat_map(|abundances| abundances.iter())
            .map(|&abundance| u64::from(abundance))
            .sum()
    }

    /// Adds the transitions of the given sequences to the count table.
    ///
    /// Counts from earlier calls are kept.
    /// Empty sequences are ignored, and successors outside of [`ALPHABET`] are not counted.
    pub fn fit<Sequence: AsRef<[u8]>>(&mut self, sequences: impl IntoIterator<Item = Sequence>) {
        for sequence in sequences {
            let sequence = sequence.as_ref();
            if sequence.is_empty() {
                continue;
            }

            let padded = self.pad(sequence);
            for (offset, &successor) in sequence.iter().enumerate() {
                let Some(index) = alphabet_index(successor) else {
                    continue;
                };
                let context = &padded[offset..offset + self.order];

                if let Some(abundances) = self.model.get_mut(context) {
                    abundances[index] = abundances[index].saturating_add(1);
                } else {
                    let mut abundances = [0; ALPHABET_SIZE];
                    abundances[index] = 1;
                    self.model.insert(context.into(), abundances);
                }
            }
        }
    }

    /// The smoothed probability of `successor` following `context`.
    ///
    /// The denominator always assumes four possible successors, whatever was observed.
    /// A successor outside of [`ALPHABET`] has a count of zero.
    pub fn probability(&self, context: &[ContextSymbol], successor: u8) -> f64 {
        let abundances = self.model.get(context).copied().unwrap_or_default();
        let total: u64 = abundances
            .iter()
            .map(|&abundance| u64::from(abundance))
            .sum();
        let count = alphabet_index(successor).map_or(0, |index| abundances[index]);

        (f64::from(count) + self.alpha) / (total as f64 + self.alpha * ALPHABET_SIZE as f64)
    }

    /// The natural logarithm of the probability of `sequence` under this model.
    ///
    /// Returns negative infinity for the empty sequence.
    pub fn log_likelihood(&self, sequence: &[u8]) -> f64 {
        if sequence.is_empty() {
            return f64::NEG_INFINITY;
        }

        let padded = self.pad(sequence);
        sequence
            .iter()
            .enumerate()
            .map(|(offset, &successor)| {
                self.probability(&padded[offset..offset + self.order], successor)
                    .ln()
            })
            .sum()
    }

    fn pad(&self, sequence: &[u8]) -> Vec<ContextSymbol> {
        std::iter::repeat(None)
            .take(self.order)
            .chain(sequence.iter().copied().map(Some))
            .collect()
    }
}
