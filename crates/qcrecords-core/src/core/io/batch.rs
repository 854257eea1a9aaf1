use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed batch: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("batch contains no result triples")]
    Empty,
}

type RawTriple = (Map<String, Value>, String, Vec<Vec<f64>>);

/// One archived result: the raw record, its mapped SMILES and its conformer buffers.
///
/// On the wire this is a three-element JSON array
/// `[record_object, mapped_smiles, [[x0, y0, z0, ...], ...]]` with coordinates in bohr.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(from = "RawTriple", into = "RawTriple")]
pub struct ResultTriple {
    pub record: Map<String, Value>,
    pub mapped_smiles: String,
    pub conformers: Vec<Vec<f64>>,
}

impl ResultTriple {
    pub fn new(
        record: Map<String, Value>,
        mapped_smiles: impl Into<String>,
        conformers: Vec<Vec<f64>>,
    ) -> Self {
        Self {
            record,
            mapped_smiles: mapped_smiles.into(),
            conformers,
        }
    }

    /// The raw `procedure` value, if the record has one and it is a string.
    pub fn procedure(&self) -> Option<&str> {
        self.record
            .get(crate::core::records::PROCEDURE_FIELD)
            .and_then(Value::as_str)
    }

    /// The raw `id` value, if the record has one and it is a string.
    pub fn record_id(&self) -> Option<&str> {
        self.record.get("id").and_then(Value::as_str)
    }
}

impl From<RawTriple> for ResultTriple {
    fn from((record, mapped_smiles, conformers): RawTriple) -> Self {
        Self {
            record,
            mapped_smiles,
            conformers,
        }
    }
}

impl From<ResultTriple> for RawTriple {
    fn from(triple: ResultTriple) -> Self {
        (triple.record, triple.mapped_smiles, triple.conformers)
    }
}

/// A non-empty, ordered sequence of result triples read from one source.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    triples: Vec<ResultTriple>,
}

impl Batch {
    /// Wraps already-deserialized triples.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::Empty`] if `triples` is empty.
    pub fn new(triples: Vec<ResultTriple>) -> Result<Self, BatchError> {
        if triples.is_empty() {
            return Err(BatchError::Empty);
        }
        Ok(Self { triples })
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, BatchError> {
        let triples: Vec<ResultTriple> =
            serde_json::from_reader(reader).map_err(|e| match e.io_error_kind() {
                Some(kind) => BatchError::Io(io::Error::new(kind, e)),
                None => BatchError::Malformed(e),
            })?;
        Self::new(triples)
    }

    pub fn triples(&self) -> &[ResultTriple] {
        &self.triples
    }

    pub fn get(&self, index: usize) -> Option<&ResultTriple> {
        self.triples.get(index)
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultTriple> {
        self.triples.iter()
    }

    pub fn into_triples(self) -> Vec<ResultTriple> {
        self.triples
    }
}

impl FromStr for Batch {
    type Err = BatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let triples: Vec<ResultTriple> = serde_json::from_str(s).map_err(BatchError::Malformed)?;
        Self::new(triples)
    }
}

impl IntoIterator for Batch {
    type Item = ResultTriple;
    type IntoIter = std::vec::IntoIter<ResultTriple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.into_iter()
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a ResultTriple;
    type IntoIter = std::slice::Iter<'a, ResultTriple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

/// Reads a batch of result triples from a JSON file.
///
/// # Errors
///
/// Returns [`BatchError::Io`] if the file cannot be read,
/// [`BatchError::Malformed`] if it is not a JSON array of triples, and
/// [`BatchError::Empty`] if the array has no elements.
pub fn load_batch(path: impl AsRef<Path>) -> Result<Batch, BatchError> {
    let file = File::open(path)?;
    Batch::from_reader(BufReader::new(file))
}
