use super::residue::ResidueId;
use crate::core::utils::elements;
use nalgebra::Point3;

/// Represents an atom of a typed molecular graph.
///
/// Atoms carry everything the pattern matcher and the geometric detectors
/// need: the element, the 3D position, the formal charge, aromaticity and
/// ring membership, and the number of hydrogens that are not present as
/// explicit atoms. Structures prepared with explicit hydrogens simply leave
/// `implicit_hydrogens` at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom (e.g., "CA", "N1").
    pub name: String,
    /// The canonical element symbol (e.g., "C", "Cl").
    pub element: String,
    /// The atomic number matching `element`.
    pub atomic_number: u8,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// The formal charge in elementary charge units.
    pub formal_charge: i8,
    /// Whether the atom is part of an aromatic system.
    pub is_aromatic: bool,
    /// Whether the atom lies on a ring of the molecular graph.
    pub is_in_ring: bool,
    /// Number of hydrogens attached to this atom but absent from the graph.
    pub implicit_hydrogens: u8,
    /// The residue this atom belongs to, if known.
    pub residue: Option<ResidueId>,
    /// Index of this atom in the parent molecule it was extracted from.
    ///
    /// Equal to the atom's own index unless the molecule is a fragment.
    pub parent_index: usize,
}

impl Atom {
    /// Creates a neutral, non-aromatic atom.
    ///
    /// Returns `None` if `element` is not a known element symbol. The symbol
    /// is matched case-insensitively and stored in its canonical form.
    pub fn new(name: &str, element: &str, position: Point3<f64>) -> Option<Self> {
        let element = elements::canonical_symbol(element)?;
        let atomic_number = elements::atomic_number(&element)?;
        Some(Self {
            name: name.to_string(),
            element,
            atomic_number,
            position,
            formal_charge: 0,
            is_aromatic: false,
            is_in_ring: false,
            implicit_hydrogens: 0,
            residue: None,
            parent_index: 0,
        })
    }

    pub fn is_hydrogen(&self) -> bool {
        self.atomic_number == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_has_expected_default_fields() {
        let atom = Atom::new("CA", "c", Point3::new(1.0, 2.0, 3.0)).unwrap();

        assert_eq!(atom.name, "CA");
        assert_eq!(atom.element, "C");
        assert_eq!(atom.atomic_number, 6);
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.formal_charge, 0);
        assert!(!atom.is_aromatic);
        assert!(!atom.is_in_ring);
        assert_eq!(atom.implicit_hydrogens, 0);
        assert!(atom.residue.is_none());
    }

    #[test]
    fn new_atom_canonicalizes_two_letter_elements() {
        let atom = Atom::new("CL1", "CL", Point3::origin()).unwrap();
        assert_eq!(atom.element, "Cl");
        assert_eq!(atom.atomic_number, 17);
    }

    #[test]
    fn new_atom_rejects_unknown_element() {
        assert!(Atom::new("X", "Xx", Point3::origin()).is_none());
    }

    #[test]
    fn is_hydrogen_checks_atomic_number() {
        assert!(Atom::new("H1", "H", Point3::origin()).unwrap().is_hydrogen());
        assert!(!Atom::new("O", "O", Point3::origin()).unwrap().is_hydrogen());
    }
}
