use std::{
    borrow::Cow,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use log::{debug, info};
use tempfile::NamedTempFile;

use crate::{
    error::{Error, Result},
    scoring_pipeline::ScoredSequence,
};

pub const HEADER: [&str; 4] = ["number", "label", "gene_name", "score"];

/// The CSV output of a run.
///
/// Creating it reserves a temporary file next to the target, so an unusable
/// output path is reported before any work is done. The target only appears
/// once [`ScoreFile::write`] succeeds.
pub struct ScoreFile {
    path: PathBuf,
    output: NamedTempFile,
}

impl ScoreFile {
    pub fn create(path: &Path) -> Result<Self> {
        if path.is_dir() {
            return Err(Error::OutputNotWritable {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::Other, "the output path is a directory"),
            });
        }

        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let output =
            NamedTempFile::new_in(directory).map_err(|source| Error::OutputNotWritable {
                path: path.to_path_buf(),
                source,
            })?;
        debug!("Reserved {:?} for the output {path:?}", output.path());

        Ok(Self {
            path: path.to_path_buf(),
            output,
        })
    }

    /// Writes the scored sequences and moves the file to its target, replacing any existing file.
    pub fn write(self, rows: &[ScoredSequence]) -> Result<()> {
        let Self { path, mut output } = self;
        {
            let mut writer = BufWriter::new(&mut output);
            write_score_table(&mut writer, rows)?;
            writer.flush()?;
        }
        output
            .persist(&path)
            .map_err(|error| Error::OutputNotWritable {
                path: path.clone(),
                source: error.error,
            })?;

        info!("Wrote {} scores to {path:?}", rows.len());
        Ok(())
    }
}

/// Scores are written in their shortest representation that parses back to the same `f64`.
pub fn write_score_table(output: &mut impl Write, rows: &[ScoredSequence]) -> Result<()> {
    writeln!(output, "{}", HEADER.join(","))?;
    for row in rows {
        writeln!(
            output,
            "{},{},{},{:?}",
            row.index,
            escape_field(&row.label),
            escape_field(&row.name),
            row.score
        )?;
    }

    Ok(())
}

fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
