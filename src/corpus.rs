use std::{
    fs::{self, File},
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use compact_genome::{
    implementation::{
        alphabets::dna_alphabet::DnaAlphabet, handle_sequence_store::HandleSequenceStore,
        DefaultGenome, DefaultSubGenome,
    },
    interface::sequence::GenomeSequence,
    io::fasta::read_fasta_file,
};
use log::debug;

use crate::{
    error::{Error, Result},
    markov_model::alphabet_index,
};

pub type DnaGenome = DefaultGenome<DnaAlphabet>;
pub type DnaSequenceStore =
    HandleSequenceStore<DnaAlphabet, DnaGenome, DefaultSubGenome<DnaAlphabet>>;

/// Extensions of the files that are trained on and scored.
pub const SCORED_EXTENSIONS: [&str; 1] = ["fna"];

/// Extensions of the files that are shuffled into negative controls.
pub const FASTA_EXTENSIONS: [&str; 5] = ["fa", "fasta", "fna", "ffn", "fas"];

/// Lists the files in `directory` with one of the given `extensions`, sorted by file name.
///
/// Extensions are compared case-insensitively.
/// Hidden files and subdirectories are skipped.
pub fn list_sequence_files(directory: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    if !directory.is_dir() {
        return Err(Error::DirectoryNotFound(directory.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_string_lossy().starts_with('.') {
            continue;
        }
        if !has_extension(&path, extensions) || !path.is_file() {
            continue;
        }

        files.push(path);
    }

    files.sort();
    debug!("Found {} sequence files in {directory:?}", files.len());
    Ok(files)
}

pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|extension| extension.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|extension| extensions.contains(&extension.as_str()))
}

/// The name a sequence file is reported under: its file name without the extension.
pub fn gene_name(file: &Path) -> String {
    file.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Loads all nucleotides of a sequence file as one uppercase `ACGT` string.
///
/// FASTA files have all their records concatenated.
/// Files that do not start with a header line are read as plain text,
/// skipping any header lines further down.
/// Lowercase characters are capitalised and anything else outside of `ACGT` is dropped.
pub fn load_sequence(file: &Path) -> Result<Vec<u8>> {
    let sequence = if is_fasta(file)? {
        let mut sequence_store = DnaSequenceStore::new();
        read_fasta_file(file, &mut sequence_store, true, true)?
            .into_iter()
            .flat_map(|record| record.sequence_handle.clone_as_vec())
            .collect()
    } else {
        load_plain_sequence(file)?
    };

    debug!("Loaded {} nucleotides from {file:?}", sequence.len());
    Ok(sequence)
}

/// True if the first non-blank line of `file` is a FASTA header.
fn is_fasta(file: &Path) -> Result<bool> {
    for line in BufReader::new(File::open(file)?).split(b'\n') {
        if let Some(first) = first_visible_character(&line?) {
            return Ok(first == b'>');
        }
    }

    Ok(false)
}

fn load_plain_sequence(file: &Path) -> Result<Vec<u8>> {
    let mut sequence = Vec::new();
    for line in BufReader::new(File::open(file)?).split(b'\n') {
        let line = line?;
        if first_visible_character(&line) == Some(b'>') {
            continue;
        }

        sequence.extend(
            line.into_iter()
                .map(|character| character.to_ascii_uppercase())
                .filter(|&character| alphabet_index(character).is_some()),
        );
    }

    Ok(sequence)
}

fn first_visible_character(line: &[u8]) -> Option<u8> {
    line.iter()
        .copied()
        .find(|character| !character.is_ascii_whitespace())
}
