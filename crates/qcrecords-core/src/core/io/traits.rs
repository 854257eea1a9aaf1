use crate::core::models::molecule::Molecule;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Errors raised while writing molecules out.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("molecule '{title}' has no conformer to write")]
    NoConformer { title: String },
    #[error("molecule '{title}' has {count} {what}, more than the V2000 limit of 999")]
    TooLarge {
        title: String,
        what: &'static str,
        count: usize,
    },
}

/// Defines the interface for writing reconstructed molecules to a file format.
///
/// Formats are multi-entry: every molecule is written as one block carrying a
/// title line, so a whole batch fits in a single file.
pub trait MolecularFile {
    /// The error type for write operations.
    type Error: Error + From<io::Error>;

    /// The conventional file extension, without the dot.
    const EXTENSION: &'static str;

    /// Writes one molecule block, using the molecule's first conformer for coordinates.
    ///
    /// # Errors
    ///
    /// Returns an error if the molecule has no conformer or the writer fails.
    fn write_to(
        molecule: &Molecule,
        title: &str,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Writes a sequence of `(title, molecule)` entries back to back.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; earlier entries stay written.
    fn write_all_to<'a>(
        entries: impl IntoIterator<Item = (&'a str, &'a Molecule)>,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        for (title, molecule) in entries {
            Self::write_to(molecule, title, writer)?;
        }
        Ok(())
    }

    /// Creates (or truncates) the file at `path` and writes every entry to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_all_to_path<'a, P: AsRef<Path>>(
        entries: impl IntoIterator<Item = (&'a str, &'a Molecule)>,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_all_to(entries, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
