use super::error::PipelineError;
use crate::core::io::batch::{Batch, ResultTriple};
use crate::core::records::RecordKind;
use tracing::debug;

/// Determines the record kind of a batch and checks that every triple agrees.
///
/// The first record fixes the kind. Later records may omit `procedure`; the
/// schema decoder still validates them. Runs once, before any reconstruction.
///
/// # Errors
///
/// - [`PipelineError::UnrecognizedRecordKind`] if the first record's procedure
///   is absent or unknown, or a later record's procedure is unknown.
/// - [`PipelineError::MixedBatch`] if a later record names the other kind.
pub fn classify(batch: &Batch) -> Result<RecordKind, PipelineError> {
    classify_triples(batch.triples())
}

pub(crate) fn classify_triples(triples: &[ResultTriple]) -> Result<RecordKind, PipelineError> {
    let Some(first) = triples.first() else {
        return Err(PipelineError::EmptyBatch);
    };
    let kind = recognize(0, first.procedure())?;

    for (index, triple) in triples.iter().enumerate().skip(1) {
        let Some(procedure) = triple.procedure() else {
            continue;
        };
        let found = recognize(index, Some(procedure))?;
        if found != kind {
            return Err(PipelineError::MixedBatch {
                index,
                expected: kind,
                found,
            });
        }
    }

    debug!(%kind, triples = triples.len(), "Classified batch");
    Ok(kind)
}

fn recognize(index: usize, procedure: Option<&str>) -> Result<RecordKind, PipelineError> {
    procedure
        .and_then(RecordKind::from_procedure)
        .ok_or_else(|| PipelineError::UnrecognizedRecordKind {
            index,
            value: procedure.map(str::to_string),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value, json};

    fn triple(procedure: Option<Value>) -> ResultTriple {
        let mut record = Map::new();
        record.insert("id".into(), json!("1"));
        if let Some(p) = procedure {
            record.insert("procedure".into(), p);
        }
        ResultTriple::new(record, "[H:1][H:2]", vec![vec![0.0; 6]])
    }

    fn batch(procedures: &[Option<Value>]) -> Batch {
        Batch::new(procedures.iter().cloned().map(triple).collect()).unwrap()
    }

    #[test]
    fn first_record_fixes_the_kind() {
        let b = batch(&[Some(json!("torsiondrive")), Some(json!("torsiondrive"))]);
        assert_eq!(classify(&b).unwrap(), RecordKind::TorsionDrive);

        let b = batch(&[Some(json!("optimization"))]);
        assert_eq!(classify(&b).unwrap(), RecordKind::Optimization);
    }

    #[test]
    fn unknown_first_procedure_is_rejected() {
        let b = batch(&[Some(json!("bogus"))]);
        assert!(matches!(
            classify(&b),
            Err(PipelineError::UnrecognizedRecordKind { index: 0, value: Some(ref v) }) if v == "bogus"
        ));
    }

    #[test]
    fn missing_or_non_string_first_procedure_is_rejected() {
        for procedure in [None, Some(json!(3))] {
            let b = batch(&[procedure]);
            assert!(matches!(
                classify(&b),
                Err(PipelineError::UnrecognizedRecordKind {
                    index: 0,
                    value: None
                })
            ));
        }
    }

    #[test]
    fn mixed_batch_is_rejected_with_index() {
        let b = batch(&[
            Some(json!("optimization")),
            Some(json!("optimization")),
            Some(json!("torsiondrive")),
        ]);
        assert!(matches!(
            classify(&b),
            Err(PipelineError::MixedBatch {
                index: 2,
                expected: RecordKind::Optimization,
                found: RecordKind::TorsionDrive
            })
        ));
    }

    #[test]
    fn unknown_later_procedure_is_rejected_with_index() {
        let b = batch(&[Some(json!("optimization")), Some(json!("singlepoint"))]);
        assert!(matches!(
            classify(&b),
            Err(PipelineError::UnrecognizedRecordKind { index: 1, .. })
        ));
    }

    #[test]
    fn absent_later_procedure_is_accepted() {
        let b = batch(&[Some(json!("optimization")), None]);
        assert_eq!(classify(&b).unwrap(), RecordKind::Optimization);
    }
}
