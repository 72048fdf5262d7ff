use super::atom::Atom;
use super::residue::ResidueId;
use super::topology::Bond;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unknown element symbol '{symbol}' for atom '{atom}'")]
    UnknownElement { atom: String, symbol: String },

    #[error("Atom index {index} is out of range for a molecule of {len} atoms")]
    AtomIndexOutOfRange { index: usize, len: usize },

    #[error("Bond connects atom {atom} to itself")]
    SelfBond { atom: usize },

    #[error("Duplicate bond between atoms {atom1} and {atom2}")]
    DuplicateBond { atom1: usize, atom2: usize },

    #[error("Atom index {0} appears more than once in the fragment selection")]
    DuplicateFragmentIndex(usize),

    #[error("Cannot apply '{0}': no atom has been added yet")]
    NoCurrentAtom(&'static str),

    #[error("Atom '{atom}' has a non-finite coordinate")]
    NonFiniteCoordinates { atom: String },
}

/// An immutable molecular graph: ordered atoms, bonds, and a cached adjacency list.
///
/// A molecule is either a full structure or a fragment of one (a residue, a
/// binding pocket). In both cases every atom remembers its index in the parent
/// structure, see [`get_mapindex`].
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    adjacency: Vec<Vec<(usize, usize)>>, // (neighbor atom, bond index)
    ring_bonds: Vec<bool>,
}

impl Molecule {
    /// Assembles a molecule, validating bond endpoints and perceiving rings.
    ///
    /// Atoms on a cycle of the graph get `is_in_ring` set; an atom already
    /// flagged by the caller keeps its flag.
    pub(crate) fn from_parts(mut atoms: Vec<Atom>, bonds: Vec<Bond>) -> Result<Self, ModelError> {
        if let Some(atom) = atoms.iter().find(|atom| !atom.position.coords.iter().all(|c| c.is_finite())) {
            return Err(ModelError::NonFiniteCoordinates {
                atom: atom.name.clone(),
            });
        }

        let len = atoms.len();
        let mut adjacency = vec![Vec::new(); len];
        let mut seen = HashSet::with_capacity(bonds.len());

        for (bond_idx, bond) in bonds.iter().enumerate() {
            for index in [bond.atom1, bond.atom2] {
                if index >= len {
                    return Err(ModelError::AtomIndexOutOfRange { index, len });
                }
            }
            if bond.atom1 == bond.atom2 {
                return Err(ModelError::SelfBond { atom: bond.atom1 });
            }
            let key = (bond.atom1.min(bond.atom2), bond.atom1.max(bond.atom2));
            if !seen.insert(key) {
                return Err(ModelError::DuplicateBond {
                    atom1: key.0,
                    atom2: key.1,
                });
            }
            adjacency[bond.atom1].push((bond.atom2, bond_idx));
            adjacency[bond.atom2].push((bond.atom1, bond_idx));
        }

        let ring_bonds = find_ring_bonds(&adjacency, bonds.len());
        for (bond, _) in bonds.iter().zip(&ring_bonds).filter(|(_, in_ring)| **in_ring) {
            atoms[bond.atom1].is_in_ring = true;
            atoms[bond.atom2].is_in_ring = true;
        }

        Ok(Self {
            atoms,
            bonds,
            adjacency,
            ring_bonds,
        })
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Neighbors of an atom as `(neighbor, bond index)` pairs.
    pub fn neighbors(&self, index: usize) -> &[(usize, usize)] {
        self.adjacency.get(index).map_or(&[], Vec::as_slice)
    }

    pub fn degree(&self, index: usize) -> usize {
        self.neighbors(index).len()
    }

    pub fn bond_between(&self, a: usize, b: usize) -> Option<usize> {
        self.neighbors(a)
            .iter()
            .find(|(neighbor, _)| *neighbor == b)
            .map(|&(_, bond_idx)| bond_idx)
    }

    pub fn is_ring_bond(&self, bond_idx: usize) -> bool {
        self.ring_bonds.get(bond_idx).copied().unwrap_or(false)
    }

    /// Number of hydrogens on an atom, explicit neighbors and implicit ones combined.
    pub fn total_hydrogens(&self, index: usize) -> usize {
        let explicit = self
            .neighbors(index)
            .iter()
            .filter(|(neighbor, _)| self.atoms[*neighbor].is_hydrogen())
            .count();
        let implicit = self.atoms.get(index).map_or(0, |a| a.implicit_hydrogens as usize);
        explicit + implicit
    }

    /// The residue shared by every atom of the molecule, if there is exactly one.
    pub fn residue(&self) -> Option<&ResidueId> {
        let first = self.atoms.first()?.residue.as_ref()?;
        self.atoms
            .iter()
            .all(|atom| atom.residue.as_ref() == Some(first))
            .then_some(first)
    }

    /// Extracts the atoms at `indices` (in that order) and the bonds between them.
    ///
    /// Each atom keeps its `parent_index`, so fragments of fragments still map
    /// back to the original structure.
    pub fn fragment(&self, indices: &[usize]) -> Result<Molecule, ModelError> {
        let mut local = HashMap::with_capacity(indices.len());
        for (new_idx, &old_idx) in indices.iter().enumerate() {
            if old_idx >= self.len() {
                return Err(ModelError::AtomIndexOutOfRange {
                    index: old_idx,
                    len: self.len(),
                });
            }
            if local.insert(old_idx, new_idx).is_some() {
                return Err(ModelError::DuplicateFragmentIndex(old_idx));
            }
        }

        let atoms = indices.iter().map(|&i| self.atoms[i].clone()).collect();
        let bonds = self
            .bonds
            .iter()
            .filter_map(|bond| {
                let a = *local.get(&bond.atom1)?;
                let b = *local.get(&bond.atom2)?;
                Some(Bond::new(a, b, bond.order))
            })
            .collect();

        Molecule::from_parts(atoms, bonds)
    }

    /// Splits the molecule into one fragment per residue, in order of first appearance.
    ///
    /// Atoms without a residue are gathered into a single trailing fragment.
    pub fn residue_fragments(&self) -> Result<Vec<Molecule>, ModelError> {
        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut group_of: HashMap<&ResidueId, usize> = HashMap::new();
        let mut unassigned = Vec::new();

        for (index, atom) in self.atoms.iter().enumerate() {
            match atom.residue.as_ref() {
                Some(residue) => {
                    let group = *group_of.entry(residue).or_insert_with(|| {
                        groups.push(Vec::new());
                        groups.len() - 1
                    });
                    groups[group].push(index);
                }
                None => unassigned.push(index),
            }
        }
        if !unassigned.is_empty() {
            groups.push(unassigned);
        }

        groups.iter().map(|group| self.fragment(group)).collect()
    }
}

/// Resolves a local atom index to its index in the parent molecule.
///
/// Identity for molecules that are not fragments.
pub fn get_mapindex(molecule: &Molecule, index: usize) -> Result<usize, ModelError> {
    molecule
        .atom(index)
        .map(|atom| atom.parent_index)
        .ok_or(ModelError::AtomIndexOutOfRange {
            index,
            len: molecule.len(),
        })
}

// Bonds that are not bridges lie on at least one cycle.
fn find_ring_bonds(adjacency: &[Vec<(usize, usize)>], bond_count: usize) -> Vec<bool> {
    const UNVISITED: usize = usize::MAX;

    let mut in_ring = vec![true; bond_count];
    let mut discovery = vec![UNVISITED; adjacency.len()];
    let mut low = vec![0; adjacency.len()];
    let mut timer = 0;

    for root in 0..adjacency.len() {
        if discovery[root] != UNVISITED {
            continue;
        }
        discovery[root] = timer;
        low[root] = timer;
        timer += 1;

        // (atom, bond used to reach it, next neighbor position)
        let mut stack = vec![(root, UNVISITED, 0usize)];
        while let Some(frame) = stack.last_mut() {
            let (node, via_bond) = (frame.0, frame.1);
            if let Some(&(neighbor, bond_idx)) = adjacency[node].get(frame.2) {
                frame.2 += 1;
                if bond_idx == via_bond {
                    continue;
                }
                if discovery[neighbor] == UNVISITED {
                    discovery[neighbor] = timer;
                    low[neighbor] = timer;
                    timer += 1;
                    stack.push((neighbor, bond_idx, 0));
                } else {
                    low[node] = low[node].min(discovery[neighbor]);
                }
            } else {
                stack.pop();
                if let Some(&(parent, _, _)) = stack.last() {
                    low[parent] = low[parent].min(low[node]);
                    if low[node] > discovery[parent] {
                        in_ring[via_bond] = false;
                    }
                }
            }
        }
    }

    in_ring
}
