//! Length units used by archived geometries and by consumers of the reconstructed molecules.

use std::fmt;

/// Angstroms per bohr (CODATA 2018).
pub const BOHR_TO_ANGSTROM: f64 = 0.529177210903;

/// Bohr per angstrom.
pub const ANGSTROM_TO_BOHR: f64 = 1.0 / BOHR_TO_ANGSTROM;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LengthUnit {
    /// Atomic unit of length; archives store geometries in bohr.
    #[default]
    Bohr,
    Angstrom,
}

impl LengthUnit {
    /// Multiplicative factor taking a value in `self` to angstrom.
    #[inline]
    pub fn to_angstrom_factor(&self) -> f64 {
        match self {
            LengthUnit::Bohr => BOHR_TO_ANGSTROM,
            LengthUnit::Angstrom => 1.0,
        }
    }

    /// Multiplicative factor taking a value in `self` to `target`.
    #[inline]
    pub fn factor_to(&self, target: LengthUnit) -> f64 {
        match (self, target) {
            (LengthUnit::Bohr, LengthUnit::Angstrom) => BOHR_TO_ANGSTROM,
            (LengthUnit::Angstrom, LengthUnit::Bohr) => ANGSTROM_TO_BOHR,
            _ => 1.0,
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LengthUnit::Bohr => "bohr",
            LengthUnit::Angstrom => "angstrom",
        })
    }
}

/// Converts a single length value between units.
#[inline]
pub fn convert(value: f64, from: LengthUnit, to: LengthUnit) -> f64 {
    value * from.factor_to(to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bohr_converts_to_angstrom_with_codata_constant() {
        assert_eq!(
            convert(1.0, LengthUnit::Bohr, LengthUnit::Angstrom),
            0.529177210903
        );
        assert_eq!(LengthUnit::Bohr.to_angstrom_factor(), BOHR_TO_ANGSTROM);
        assert_eq!(LengthUnit::Angstrom.to_angstrom_factor(), 1.0);
    }

    #[test]
    fn converting_there_and_back_is_identity_within_tolerance() {
        for &value in &[0.0, 1.0, -2.5, 1234.5678, 1e-6] {
            let there = convert(value, LengthUnit::Bohr, LengthUnit::Angstrom);
            let back = convert(there, LengthUnit::Angstrom, LengthUnit::Bohr);
            assert!((back - value).abs() <= 1e-9 * value.abs().max(1.0));
        }
    }

    #[test]
    fn same_unit_conversion_is_a_no_op() {
        assert_eq!(convert(3.5, LengthUnit::Bohr, LengthUnit::Bohr), 3.5);
        assert_eq!(convert(3.5, LengthUnit::Angstrom, LengthUnit::Angstrom), 3.5);
    }

    #[test]
    fn display_names() {
        assert_eq!(LengthUnit::Bohr.to_string(), "bohr");
        assert_eq!(LengthUnit::Angstrom.to_string(), "angstrom");
    }
}
