use super::atom::Atom;
use super::molecule::{ModelError, Molecule};
use super::residue::ResidueId;
use super::topology::{Bond, BondOrder};
use nalgebra::Point3;

struct PendingAtom {
    name: String,
    element: String,
    position: Point3<f64>,
    formal_charge: i8,
    is_aromatic: bool,
    is_in_ring: bool,
    implicit_hydrogens: u8,
    residue: Option<ResidueId>,
}

/// Incrementally assembles a [`Molecule`].
///
/// Property setters (`with_charge`, `aromatic`, ...) apply to the most recently
/// added atom. `residue` sets the residue for every atom added after it.
/// Problems are collected and reported by [`build`](Self::build), so calls can
/// be chained freely.
#[derive(Default)]
pub struct MoleculeBuilder {
    atoms: Vec<PendingAtom>,
    bonds: Vec<Bond>,
    current_residue: Option<ResidueId>,
    error: Option<ModelError>,
}

impl MoleculeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn residue(&mut self, residue: ResidueId) -> &mut Self {
        self.current_residue = Some(residue);
        self
    }

    pub fn add_atom(&mut self, name: &str, element: &str, position: Point3<f64>) -> &mut Self {
        self.atoms.push(PendingAtom {
            name: name.to_string(),
            element: element.to_string(),
            position,
            formal_charge: 0,
            is_aromatic: false,
            is_in_ring: false,
            implicit_hydrogens: 0,
            residue: self.current_residue.clone(),
        });
        self
    }

    pub fn with_charge(&mut self, charge: i8) -> &mut Self {
        self.modify_last("with_charge", |atom| atom.formal_charge = charge)
    }

    /// Marks the last atom as aromatic. Aromatic atoms are ring members.
    pub fn aromatic(&mut self) -> &mut Self {
        self.modify_last("aromatic", |atom| {
            atom.is_aromatic = true;
            atom.is_in_ring = true;
        })
    }

    pub fn in_ring(&mut self) -> &mut Self {
        self.modify_last("in_ring", |atom| atom.is_in_ring = true)
    }

    pub fn implicit_hydrogens(&mut self, count: u8) -> &mut Self {
        self.modify_last("implicit_hydrogens", |atom| atom.implicit_hydrogens = count)
    }

    pub fn add_bond(&mut self, atom1: usize, atom2: usize, order: BondOrder) -> &mut Self {
        self.bonds.push(Bond::new(atom1, atom2, order));
        self
    }

    pub fn build(self) -> Result<Molecule, ModelError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let atoms = self
            .atoms
            .into_iter()
            .enumerate()
            .map(|(index, pending)| -> Result<Atom, ModelError> {
                let mut atom = Atom::new(&pending.name, &pending.element, pending.position)
                    .ok_or_else(|| ModelError::UnknownElement {
                        atom: pending.name.clone(),
                        symbol: pending.element.clone(),
                    })?;
                atom.formal_charge = pending.formal_charge;
                atom.is_aromatic = pending.is_aromatic;
                atom.is_in_ring = pending.is_in_ring;
                atom.implicit_hydrogens = pending.implicit_hydrogens;
                atom.residue = pending.residue;
                atom.parent_index = index;
                Ok(atom)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Molecule::from_parts(atoms, self.bonds)
    }

    fn modify_last(&mut self, setter: &'static str, apply: impl FnOnce(&mut PendingAtom)) -> &mut Self {
        match self.atoms.last_mut() {
            Some(atom) => apply(atom),
            None => {
                self.error.get_or_insert(ModelError::NoCurrentAtom(setter));
            }
        }
        self
    }
}
