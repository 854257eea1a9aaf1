use super::traits::{MolecularFile, WriteError};
use crate::core::models::molecule::Molecule;
use std::io::{self, Write};

/// Largest atom or bond count the fixed-width V2000 counts line can hold.
const V2000_LIMIT: usize = 999;

/// MDL SD file, one V2000 molfile per molecule.
pub struct SdfFile;

impl MolecularFile for SdfFile {
    type Error = WriteError;

    const EXTENSION: &'static str = "sdf";

    fn write_to(
        molecule: &Molecule,
        title: &str,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        let conformer = molecule
            .conformers()
            .first()
            .ok_or_else(|| WriteError::NoConformer {
                title: title.to_string(),
            })?;
        for (what, count) in [("atoms", molecule.n_atoms()), ("bonds", molecule.n_bonds())] {
            if count > V2000_LIMIT {
                return Err(WriteError::TooLarge {
                    title: title.to_string(),
                    what,
                    count,
                });
            }
        }

        writeln!(writer, "{title}")?;
        writeln!(writer, "  qcrecords         3D")?;
        writeln!(writer)?;
        writeln!(
            writer,
            "{:>3}{:>3}  0  0  0  0  0  0  0  0999 V2000",
            molecule.n_atoms(),
            molecule.n_bonds()
        )?;

        for (atom, position) in molecule.atoms().iter().zip(conformer.positions()) {
            writeln!(
                writer,
                "{:>10.4}{:>10.4}{:>10.4} {:<3} 0  0  0  0  0  0  0  0  0  0  0  0",
                position.x,
                position.y,
                position.z,
                atom.element.symbol()
            )?;
        }

        for bond in molecule.bonds() {
            writeln!(
                writer,
                "{:>3}{:>3}{:>3}  0  0  0  0",
                bond.atom1 + 1,
                bond.atom2 + 1,
                bond.order.ctfile_code()
            )?;
        }

        let charged: Vec<(usize, i8)> = molecule
            .atoms()
            .iter()
            .enumerate()
            .filter(|(_, a)| a.formal_charge != 0)
            .map(|(i, a)| (i + 1, a.formal_charge))
            .collect();
        write_property_lines(writer, "CHG", &charged)?;

        let isotopes: Vec<(usize, u16)> = molecule
            .atoms()
            .iter()
            .enumerate()
            .filter_map(|(i, a)| a.isotope.map(|iso| (i + 1, iso)))
            .collect();
        write_property_lines(writer, "ISO", &isotopes)?;

        writeln!(writer, "M  END")?;
        writeln!(writer, "$$$$")?;
        Ok(())
    }
}

/// Emits `M  CHG`/`M  ISO` style lines, at most eight entries per line.
fn write_property_lines<T: std::fmt::Display>(
    writer: &mut impl Write,
    tag: &str,
    entries: &[(usize, T)],
) -> io::Result<()> {
    for chunk in entries.chunks(8) {
        write!(writer, "M  {tag}{:>3}", chunk.len())?;
        for (atom, value) in chunk {
            write!(writer, " {atom:>3} {value:>3}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::conformer::Conformer;
    use crate::core::units::LengthUnit;

    fn hydroxide() -> Molecule {
        let mut mol = Molecule::from_mapped_smiles("[O-:1][2H:2]", true).unwrap();
        mol.set_conformer(
            Conformer::from_flat(&[0.0, 0.0, 0.0, 0.0, 0.0, 0.97], LengthUnit::Angstrom).unwrap(),
        )
        .unwrap();
        mol
    }

    fn render(molecule: &Molecule, title: &str) -> String {
        let mut buf = Vec::new();
        SdfFile::write_to(molecule, title, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn writes_v2000_blocks() {
        let text = render(&hydroxide(), "rec-1");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "rec-1");
        assert_eq!(lines[3], "  2  1  0  0  0  0  0  0  0  0999 V2000");
        assert_eq!(
            lines[4],
            "    0.0000    0.0000    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0"
        );
        assert!(lines[5].starts_with("    0.0000    0.0000    0.9700 H "));
        assert_eq!(lines[6], "  1  2  1  0  0  0  0");
        assert_eq!(lines[7], "M  CHG  1   1  -1");
        assert_eq!(lines[8], "M  ISO  1   2   2");
        assert_eq!(lines[9], "M  END");
        assert_eq!(lines[10], "$$$$");
    }

    #[test]
    fn molecule_without_conformer_is_rejected() {
        let mol = Molecule::from_mapped_smiles("[H:1][H:2]", true).unwrap();
        let mut buf = Vec::new();
        let err = SdfFile::write_to(&mol, "bare", &mut buf).unwrap_err();
        assert!(matches!(err, WriteError::NoConformer { ref title } if title == "bare"));
        assert!(buf.is_empty());
    }

    #[test]
    fn writes_every_entry_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.sdf");
        let mol = hydroxide();

        SdfFile::write_all_to_path([("a", &mol), ("b", &mol)], &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("$$$$").count(), 2);
        assert!(text.starts_with("a\n"));
    }
}
