//! Typed schemas for archived procedure records.
//!
//! Records arrive as untyped JSON objects. [`RecordKind`] names the schema a
//! batch was produced under, and [`TypedRecord::decode`] validates a raw object
//! against it.

pub mod optimization;
pub mod status;
pub mod torsiondrive;

pub use optimization::{OptimizationRecord, QcSpec};
pub use status::RecordStatus;
pub use torsiondrive::{OptimizationSpec, TorsionDriveKeywords, TorsionDriveRecord};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Field of a raw record naming the procedure that produced it.
pub const PROCEDURE_FIELD: &str = "procedure";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Optimization,
    TorsionDrive,
}

impl RecordKind {
    /// Maps a wire procedure name to a kind. The match is exact.
    pub fn from_procedure(name: &str) -> Option<Self> {
        match name {
            "optimization" => Some(Self::Optimization),
            "torsiondrive" => Some(Self::TorsionDrive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Optimization => "optimization",
            Self::TorsionDrive => "torsiondrive",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record does not match the {kind} schema: {source}")]
    Schema {
        kind: RecordKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("record declares procedure '{found}' but the batch holds {expected} records")]
    ProcedureMismatch { expected: RecordKind, found: String },
}

/// A record decoded under exactly one schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedRecord {
    Optimization(OptimizationRecord),
    TorsionDrive(TorsionDriveRecord),
}

impl TypedRecord {
    /// Decodes `raw` against the schema for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Schema`] if required fields are missing or
    /// mistyped, and [`RecordError::ProcedureMismatch`] if the record names a
    /// different procedure than `kind`.
    pub fn decode(kind: RecordKind, raw: Map<String, Value>) -> Result<Self, RecordError> {
        let value = Value::Object(raw);
        let schema = |source| RecordError::Schema { kind, source };
        let record = match kind {
            RecordKind::Optimization => {
                Self::Optimization(serde_json::from_value(value).map_err(schema)?)
            }
            RecordKind::TorsionDrive => {
                Self::TorsionDrive(serde_json::from_value(value).map_err(schema)?)
            }
        };

        match record.procedure() {
            Some(found) if found != kind.as_str() => Err(RecordError::ProcedureMismatch {
                expected: kind,
                found: found.to_string(),
            }),
            _ => Ok(record),
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Optimization(_) => RecordKind::Optimization,
            Self::TorsionDrive(_) => RecordKind::TorsionDrive,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Optimization(r) => &r.id,
            Self::TorsionDrive(r) => &r.id,
        }
    }

    pub fn status(&self) -> RecordStatus {
        match self {
            Self::Optimization(r) => r.status,
            Self::TorsionDrive(r) => r.status,
        }
    }

    pub fn procedure(&self) -> Option<&str> {
        match self {
            Self::Optimization(r) => r.procedure.as_deref(),
            Self::TorsionDrive(r) => r.procedure.as_deref(),
        }
    }

    pub fn as_optimization(&self) -> Option<&OptimizationRecord> {
        match self {
            Self::Optimization(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_torsiondrive(&self) -> Option<&TorsionDriveRecord> {
        match self {
            Self::TorsionDrive(r) => Some(r),
            _ => None,
        }
    }
}

impl fmt::Display for TypedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Optimization(r) => {
                write!(f, "OptimizationRecord {} [{}]", r.id, r.status)?;
                if let Some(energy) = r.final_energy() {
                    write!(f, " final energy {energy:.8} Eh")?;
                }
                Ok(())
            }
            Self::TorsionDrive(r) => write!(
                f,
                "TorsionDriveRecord {} [{}] {} grid point(s)",
                r.id,
                r.status,
                r.grid_points()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn procedure_names_match_exactly() {
        assert_eq!(
            RecordKind::from_procedure("optimization"),
            Some(RecordKind::Optimization)
        );
        assert_eq!(
            RecordKind::from_procedure("torsiondrive"),
            Some(RecordKind::TorsionDrive)
        );
        assert_eq!(RecordKind::from_procedure("Optimization"), None);
        assert_eq!(RecordKind::from_procedure("bogus"), None);
        assert_eq!(RecordKind::TorsionDrive.to_string(), "torsiondrive");
    }

    #[test]
    fn decode_dispatches_on_kind() {
        let raw = object(json!({
            "id": "7",
            "status": "COMPLETE",
            "procedure": "optimization",
            "initial_molecule": "8",
        }));
        let record = TypedRecord::decode(RecordKind::Optimization, raw).unwrap();

        assert_eq!(record.kind(), RecordKind::Optimization);
        assert_eq!(record.id(), "7");
        assert!(record.as_optimization().is_some());
        assert!(record.as_torsiondrive().is_none());
    }

    #[test]
    fn decode_under_wrong_schema_fails() {
        let raw = object(json!({
            "id": "7",
            "status": "COMPLETE",
            "initial_molecule": "8",
        }));
        let err = TypedRecord::decode(RecordKind::TorsionDrive, raw).unwrap_err();
        assert!(matches!(
            err,
            RecordError::Schema {
                kind: RecordKind::TorsionDrive,
                ..
            }
        ));
    }

    #[test]
    fn decode_rejects_conflicting_procedure() {
        let raw = object(json!({
            "id": "7",
            "status": "COMPLETE",
            "procedure": "torsiondrive",
            "initial_molecule": "8",
        }));
        let err = TypedRecord::decode(RecordKind::Optimization, raw).unwrap_err();
        assert!(matches!(
            err,
            RecordError::ProcedureMismatch { ref found, .. } if found == "torsiondrive"
        ));
    }

    #[test]
    fn display_summarizes_record() {
        let raw = object(json!({
            "id": "7",
            "status": "COMPLETE",
            "initial_molecule": "8",
            "energies": [-1.5],
        }));
        let record = TypedRecord::decode(RecordKind::Optimization, raw).unwrap();
        assert_eq!(
            record.to_string(),
            "OptimizationRecord 7 [COMPLETE] final energy -1.50000000 Eh"
        );
    }
}
