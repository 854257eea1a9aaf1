use super::config::PipelineConfig;
use super::error::PipelineError;
use crate::core::io::batch::ResultTriple;
use crate::core::models::conformer::{Conformer, ConformerError};
use crate::core::models::molecule::Molecule;
use crate::core::records::{RecordKind, TypedRecord};
use crate::core::units::LengthUnit;
use itertools::Itertools;
use tracing::{trace, warn};

/// Length unit of archived conformer buffers.
pub const ARCHIVE_LENGTH_UNIT: LengthUnit = LengthUnit::Bohr;

/// Turns result triples of one fixed kind into `(record, molecule)` pairs.
///
/// Holds no per-triple state, so one instance can be shared by reference
/// across worker threads.
#[derive(Debug, Clone)]
pub struct Reconstructor {
    kind: RecordKind,
    conformer_index: usize,
    allow_undefined_stereo: bool,
    report_undefined_stereo: bool,
}

impl Reconstructor {
    pub fn new(kind: RecordKind, config: &PipelineConfig) -> Self {
        Self {
            kind,
            conformer_index: config.conformer_index,
            allow_undefined_stereo: config.allow_undefined_stereo,
            report_undefined_stereo: config.report_undefined_stereo,
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Decodes the record, builds the molecule and attaches the selected
    /// conformer, converted to angstrom, as the molecule's only conformer.
    ///
    /// `index` is the triple's position in its batch and is carried by every error.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::RecordDecode`] if the record does not fit the schema.
    /// - [`PipelineError::MoleculeBuild`] if the mapped SMILES is rejected.
    /// - [`PipelineError::ConformerShape`] if the selected buffer is missing or
    ///   does not hold exactly three coordinates per atom.
    pub fn reconstruct(
        &self,
        index: usize,
        triple: ResultTriple,
    ) -> Result<(TypedRecord, Molecule), PipelineError> {
        let ResultTriple {
            record,
            mapped_smiles,
            conformers,
        } = triple;

        let record =
            TypedRecord::decode(self.kind, record).map_err(|source| PipelineError::RecordDecode {
                index,
                kind: self.kind,
                source,
            })?;

        let mut molecule = Molecule::from_mapped_smiles(&mapped_smiles, self.allow_undefined_stereo)
            .map_err(|source| PipelineError::MoleculeBuild { index, source })?;

        if self.report_undefined_stereo && !molecule.undefined_stereo().is_empty() {
            warn!(
                index,
                record_id = record.id(),
                centers = %molecule.undefined_stereo().iter().join(", "),
                "Molecule has undefined stereochemistry"
            );
        }

        self.select_conformer(&conformers)
            .and_then(|buffer| Conformer::from_flat(buffer, ARCHIVE_LENGTH_UNIT))
            .and_then(|conformer| molecule.set_conformer(conformer))
            .map_err(|source| PipelineError::ConformerShape { index, source })?;

        trace!(index, record_id = record.id(), %molecule, "Reconstructed triple");
        Ok((record, molecule))
    }

    fn select_conformer<'b>(&self, conformers: &'b [Vec<f64>]) -> Result<&'b [f64], ConformerError> {
        conformers
            .get(self.conformer_index)
            .map(Vec::as_slice)
            .ok_or(ConformerError::MissingBuffer {
                requested: self.conformer_index,
                available: conformers.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::molecule::StereoCenter;
    use crate::core::smiles::SmilesError;
    use crate::core::units::BOHR_TO_ANGSTROM;
    use serde_json::{Map, Value, json};

    fn record(procedure: &str) -> Map<String, Value> {
        match json!({
            "id": "42",
            "status": "COMPLETE",
            "procedure": procedure,
            "initial_molecule": "7",
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn hydrogen(conformers: Vec<Vec<f64>>) -> ResultTriple {
        ResultTriple::new(record("optimization"), "[H:1][H:2]", conformers)
    }

    fn reconstructor(config: PipelineConfig) -> Reconstructor {
        Reconstructor::new(RecordKind::Optimization, &config)
    }

    #[test]
    fn converts_bohr_to_angstrom() {
        let r = reconstructor(PipelineConfig::default());
        let (record, molecule) = r
            .reconstruct(0, hydrogen(vec![vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.4]]))
            .unwrap();

        assert_eq!(record.id(), "42");
        assert_eq!(molecule.conformers().len(), 1);
        let z = molecule.conformers()[0].positions()[1].z;
        assert!((z - 1.4 * BOHR_TO_ANGSTROM).abs() < 1e-12);
    }

    #[test]
    fn selects_configured_conformer_and_ignores_the_rest() {
        let config = PipelineConfig::builder().conformer_index(1).build().unwrap();
        let (_, molecule) = reconstructor(config)
            .reconstruct(
                0,
                hydrogen(vec![vec![0.0; 6], vec![1.0, 0.0, 0.0, 2.0, 0.0, 0.0], vec![9.0; 6]]),
            )
            .unwrap();

        let positions = molecule.conformers()[0].positions();
        assert!((positions[0].x - BOHR_TO_ANGSTROM).abs() < 1e-12);
        assert!((positions[1].x - 2.0 * BOHR_TO_ANGSTROM).abs() < 1e-12);
    }

    #[test]
    fn missing_conformer_buffer_is_a_shape_error() {
        let err = reconstructor(PipelineConfig::default())
            .reconstruct(5, hydrogen(Vec::new()))
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::ConformerShape {
                index: 5,
                source: ConformerError::MissingBuffer {
                    requested: 0,
                    available: 0
                }
            }
        ));
    }

    #[test]
    fn wrong_length_buffers_are_shape_errors() {
        let r = reconstructor(PipelineConfig::default());
        assert!(matches!(
            r.reconstruct(1, hydrogen(vec![vec![0.0; 5]])),
            Err(PipelineError::ConformerShape {
                index: 1,
                source: ConformerError::NotDivisibleByThree { len: 5 }
            })
        ));
        assert!(matches!(
            r.reconstruct(2, hydrogen(vec![vec![0.0; 9]])),
            Err(PipelineError::ConformerShape {
                index: 2,
                source: ConformerError::AtomCountMismatch { points: 3, atoms: 2 }
            })
        ));
    }

    #[test]
    fn schema_mismatch_is_a_decode_error() {
        let r = Reconstructor::new(RecordKind::TorsionDrive, &PipelineConfig::default());
        let triple = ResultTriple::new(record("torsiondrive"), "[H:1][H:2]", vec![vec![0.0; 6]]);
        assert!(matches!(
            r.reconstruct(3, triple),
            Err(PipelineError::RecordDecode {
                index: 3,
                kind: RecordKind::TorsionDrive,
                ..
            })
        ));
    }

    #[test]
    fn bad_smiles_is_a_build_error() {
        let triple = ResultTriple::new(record("optimization"), "[H:1][H]", vec![vec![0.0; 6]]);
        assert!(matches!(
            reconstructor(PipelineConfig::default()).reconstruct(4, triple),
            Err(PipelineError::MoleculeBuild {
                index: 4,
                source: SmilesError::UnmappedAtom { .. }
            })
        ));
    }

    #[test]
    fn stereo_tolerance_follows_config() {
        let smiles = "[C:1]([F:2])([Cl:3])([Br:4])[H:5]";
        let triple = || ResultTriple::new(record("optimization"), smiles, vec![vec![0.0; 15]]);

        let (_, molecule) = reconstructor(PipelineConfig::default())
            .reconstruct(0, triple())
            .unwrap();
        assert_eq!(molecule.undefined_stereo(), &[StereoCenter::Atom(0)]);

        let strict = PipelineConfig::builder()
            .allow_undefined_stereo(false)
            .build()
            .unwrap();
        assert!(matches!(
            reconstructor(strict).reconstruct(0, triple()),
            Err(PipelineError::MoleculeBuild {
                source: SmilesError::UndefinedStereo { .. },
                ..
            })
        ));
    }
}
