use std::{ffi::OsString, fs, path::Path};

use compact_genome::{
    implementation::alphabets::dna_alphabet::DnaAlphabet,
    interface::{alphabet::Alphabet, sequence::GenomeSequence},
    io::fasta::{read_fasta_file, write_fasta_file, FastaRecord},
};
use log::info;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::{
    corpus::{list_sequence_files, DnaGenome, DnaSequenceStore, FASTA_EXTENSIONS},
    error::{Error, Result},
};

pub const SHUFFLED_PREFIX: &str = "shuffled_";

/// Randomly permutes `sequence`, keeping its length and composition.
pub fn shuffle_sequence<Character: Clone>(
    sequence: &[Character],
    rng: &mut impl Rng,
) -> Vec<Character> {
    let mut shuffled = sequence.to_vec();
    if shuffled.len() > 1 {
        shuffled.shuffle(rng);
    }
    shuffled
}

fn characters<AlphabetType, SequenceType, SubsequenceType>(
    sequence: &SequenceType,
) -> Vec<AlphabetType::CharacterType>
where
    AlphabetType: Alphabet,
    SequenceType: GenomeSequence<AlphabetType, SubsequenceType> + ?Sized,
    SubsequenceType: GenomeSequence<AlphabetType, SubsequenceType> + ?Sized,
{
    (0..sequence.len())
        .map(|position| sequence[position].clone())
        .collect()
}

/// Writes a shuffled copy of every FASTA file in `input` to `output`,
/// prefixing file names with [`SHUFFLED_PREFIX`].
///
/// All records are shuffled by one generator seeded with `random_seed`,
/// consumed in sorted file order, so the same input and seed always give the same output.
/// Returns the number of files written.
pub fn shuffle_directory(input: &Path, output: &Path, random_seed: u64) -> Result<usize> {
    let files = list_sequence_files(input, &FASTA_EXTENSIONS)?;
    if files.is_empty() {
        return Err(Error::EmptyCorpus(input.to_path_buf()));
    }
    fs::create_dir_all(output)?;

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(random_seed);
    for file in &files {
        let mut sequence_store = DnaSequenceStore::new();
        let records: Vec<_> = read_fasta_file(file, &mut sequence_store, true, true)?
            .into_iter()
            .map(|record| {
                let shuffled = shuffle_sequence(
                    &characters::<DnaAlphabet, _, _>(&record.sequence_handle),
                    &mut rng,
                );
                FastaRecord {
                    id: record.id,
                    comment: String::new(),
                    sequence_handle: DnaGenome::from_iter(shuffled),
                }
            })
            .collect();

        let mut output_file_name = OsString::from(SHUFFLED_PREFIX);
        output_file_name.push(file.file_name().unwrap_or_default());
        let output_file = output.join(output_file_name);
        write_fasta_file(&output_file, &records, &sequence_store)?;

        info!(
            "Shuffled {} records from {file:?} into {output_file:?}",
            records.len()
        );
    }

    Ok(files.len())
}
