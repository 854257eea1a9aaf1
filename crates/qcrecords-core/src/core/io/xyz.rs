use super::traits::{MolecularFile, WriteError};
use crate::core::models::molecule::Molecule;
use std::io::Write;

/// Multi-frame XYZ: atom count, title, then one `symbol x y z` line per atom, in angstrom.
pub struct XyzFile;

impl MolecularFile for XyzFile {
    type Error = WriteError;

    const EXTENSION: &'static str = "xyz";

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

        writeln!(writer, "{}", molecule.n_atoms())?;
        // The comment line must stay a single line.
        writeln!(writer, "{}", title.replace(['\n', '\r'], " "))?;
        for (atom, p) in molecule.atoms().iter().zip(conformer.positions()) {
            writeln!(
                writer,
                "{:<2} {:>15.8} {:>15.8} {:>15.8}",
                atom.element.symbol(),
                p.x,
                p.y,
                p.z
            )?;
        }
        Ok(())
    }
}
