use thiserror::Error;

use crate::core::io::batch::BatchError;
use crate::core::models::conformer::ConformerError;
use crate::core::records::{RecordError, RecordKind};
use crate::core::smiles::SmilesError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),

    #[error("Malformed input: {0}")]
    MalformedInput(#[source] serde_json::Error),

    #[error("Batch contains no result triples")]
    EmptyBatch,

    #[error("Record {index}: unrecognized procedure {}", display_value(.value))]
    UnrecognizedRecordKind { index: usize, value: Option<String> },

    #[error("Record {index}: batch holds {expected} records but this one is {found}")]
    MixedBatch {
        index: usize,
        expected: RecordKind,
        found: RecordKind,
    },

    #[error("Record {index}: failed to decode as {kind}: {source}")]
    RecordDecode {
        index: usize,
        kind: RecordKind,
        #[source]
        source: RecordError,
    },

    #[error("Record {index}: failed to build molecule: {source}")]
    MoleculeBuild {
        index: usize,
        #[source]
        source: SmilesError,
    },

    #[error("Record {index}: bad conformer: {source}")]
    ConformerShape {
        index: usize,
        #[source]
        source: ConformerError,
    },
}

fn display_value(value: &Option<String>) -> String {
    match value {
        Some(v) => format!("'{v}'"),
        None => "(missing)".to_string(),
    }
}

impl PipelineError {
    /// Index of the triple the error belongs to, for per-triple errors.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::UnrecognizedRecordKind { index, .. }
            | Self::MixedBatch { index, .. }
            | Self::RecordDecode { index, .. }
            | Self::MoleculeBuild { index, .. }
            | Self::ConformerShape { index, .. } => Some(*index),
            Self::Io(_) | Self::MalformedInput(_) | Self::EmptyBatch => None,
        }
    }
}

impl From<BatchError> for PipelineError {
    fn from(err: BatchError) -> Self {
        match err {
            BatchError::Io(e) => Self::Io(e),
            BatchError::Malformed(e) => Self::MalformedInput(e),
            BatchError::Empty => Self::EmptyBatch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_kind_message_names_the_value() {
        let err = PipelineError::UnrecognizedRecordKind {
            index: 0,
            value: Some("bogus".into()),
        };
        assert_eq!(err.to_string(), "Record 0: unrecognized procedure 'bogus'");

        let err = PipelineError::UnrecognizedRecordKind {
            index: 3,
            value: None,
        };
        assert_eq!(err.to_string(), "Record 3: unrecognized procedure (missing)");
        assert_eq!(err.index(), Some(3));
    }

    #[test]
    fn batch_errors_convert() {
        assert!(matches!(
            PipelineError::from(BatchError::Empty),
            PipelineError::EmptyBatch
        ));
        assert_eq!(PipelineError::EmptyBatch.index(), None);
    }
}
