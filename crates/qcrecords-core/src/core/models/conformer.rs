use crate::core::units::LengthUnit;
use nalgebra::Point3;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConformerError {
    #[error("conformer buffer {requested} requested but only {available} present")]
    MissingBuffer { requested: usize, available: usize },

    #[error("conformer buffer length {len} is not divisible by 3")]
    NotDivisibleByThree { len: usize },

    #[error("conformer has {points} points but the molecule has {atoms} atoms")]
    AtomCountMismatch { points: usize, atoms: usize },
}

/// One 3D arrangement of a molecule's atoms, stored in angstrom.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Conformer {
    positions: Vec<Point3<f64>>,
}

impl Conformer {
    pub fn new(positions: Vec<Point3<f64>>) -> Self {
        Self { positions }
    }

    /// Reshapes a flat `[x0, y0, z0, x1, ...]` buffer into points and converts
    /// them from `unit` to angstrom.
    ///
    /// # Errors
    ///
    /// Returns [`ConformerError::NotDivisibleByThree`] if the buffer cannot be
    /// split into whole points.
    pub fn from_flat(buffer: &[f64], unit: LengthUnit) -> Result<Self, ConformerError> {
        if buffer.len() % 3 != 0 {
            return Err(ConformerError::NotDivisibleByThree { len: buffer.len() });
        }
        let factor = unit.factor_to(LengthUnit::Angstrom);
        let positions = buffer
            .chunks_exact(3)
            .map(|xyz| Point3::new(xyz[0] * factor, xyz[1] * factor, xyz[2] * factor))
            .collect();
        Ok(Self { positions })
    }

    /// Flattens the points back into `[x0, y0, z0, x1, ...]` expressed in `unit`.
    pub fn to_flat(&self, unit: LengthUnit) -> Vec<f64> {
        let factor = LengthUnit::Angstrom.factor_to(unit);
        self.positions
            .iter()
            .flat_map(|p| [p.x * factor, p.y * factor, p.z * factor])
            .collect()
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
