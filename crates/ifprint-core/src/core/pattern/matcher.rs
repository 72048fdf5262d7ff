use super::smarts::{AtomExpr, AtomPrimitive, BondExpr, SmartsPattern};
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use std::collections::HashSet;

/// Finds every match of `pattern` in `molecule`.
///
/// Each match lists target atom indices in pattern-atom order. Matches that
/// cover the same set of atoms (automorphisms of the pattern) are reported
/// once, keeping the first one found.
pub fn find_all(pattern: &SmartsPattern, molecule: &Molecule) -> Vec<Vec<usize>> {
    let mut state = Vf2State::new(pattern, molecule, None, false);
    state.search();

    let mut seen = HashSet::new();
    state
        .matches
        .into_iter()
        .filter(|mapping| {
            let mut atoms = mapping.clone();
            atoms.sort_unstable();
            seen.insert(atoms)
        })
        .collect()
}

/// Whether some match of `pattern` maps its first atom onto `anchor`.
pub fn matches_at(pattern: &SmartsPattern, molecule: &Molecule, anchor: usize) -> bool {
    let mut state = Vf2State::new(pattern, molecule, Some(anchor), true);
    state.search();
    !state.matches.is_empty()
}

pub fn atom_matches(expr: &AtomExpr, molecule: &Molecule, index: usize) -> bool {
    match expr {
        AtomExpr::Prim(prim) => primitive_matches(prim, molecule, index),
        AtomExpr::And(terms) => terms.iter().all(|t| atom_matches(t, molecule, index)),
        AtomExpr::Or(terms) => terms.iter().any(|t| atom_matches(t, molecule, index)),
        AtomExpr::Not(inner) => !atom_matches(inner, molecule, index),
        AtomExpr::Recursive(pattern) => matches_at(pattern, molecule, index),
    }
}

fn primitive_matches(prim: &AtomPrimitive, molecule: &Molecule, index: usize) -> bool {
    let Some(atom) = molecule.atom(index) else {
        return false;
    };
    let implicit = atom.implicit_hydrogens as usize;
    match *prim {
        AtomPrimitive::AtomicNum(n) => atom.atomic_number == n,
        AtomPrimitive::Aromatic => atom.is_aromatic,
        AtomPrimitive::Aliphatic => !atom.is_aromatic,
        AtomPrimitive::Degree(d) => molecule.degree(index) == d as usize,
        AtomPrimitive::HCount(h) => molecule.total_hydrogens(index) == h as usize,
        AtomPrimitive::ImplicitHCount(h) => implicit == h as usize,
        AtomPrimitive::Connectivity(x) => molecule.degree(index) + implicit == x as usize,
        AtomPrimitive::Valence(v) => {
            let bond_sum: f64 = molecule
                .neighbors(index)
                .iter()
                .map(|&(_, bond_idx)| molecule.bonds()[bond_idx].order.valence_contribution())
                .sum();
            (bond_sum + implicit as f64).round() as usize == v as usize
        }
        AtomPrimitive::Charge(c) => atom.formal_charge == c,
        AtomPrimitive::RingMember => atom.is_in_ring,
        AtomPrimitive::Wildcard => true,
    }
}

fn bond_matches(expr: &BondExpr, molecule: &Molecule, bond_idx: usize) -> bool {
    let order = molecule.bonds()[bond_idx].order;
    match expr {
        BondExpr::Single => order == BondOrder::Single,
        BondExpr::Double => order == BondOrder::Double,
        BondExpr::Triple => order == BondOrder::Triple,
        BondExpr::Aromatic => order == BondOrder::Aromatic,
        BondExpr::Implicit => matches!(order, BondOrder::Single | BondOrder::Aromatic),
        BondExpr::Ring => molecule.is_ring_bond(bond_idx),
        BondExpr::Any => true,
        BondExpr::Not(inner) => !bond_matches(inner, molecule, bond_idx),
        BondExpr::And(terms) => terms.iter().all(|t| bond_matches(t, molecule, bond_idx)),
        BondExpr::Or(terms) => terms.iter().any(|t| bond_matches(t, molecule, bond_idx)),
    }
}

// Pattern atoms are mapped in index order. The parser emits every atom after
// the first of a component bonded to an earlier one, so candidates can be
// drawn from the neighbors of an already mapped atom.
struct Vf2State<'a> {
    pattern: &'a SmartsPattern,
    target: &'a Molecule,
    anchor: Option<usize>,
    first_only: bool,
    core_pattern: Vec<Option<usize>>,
    core_target: Vec<bool>,
    matches: Vec<Vec<usize>>,
}

impl<'a> Vf2State<'a> {
    fn new(
        pattern: &'a SmartsPattern,
        target: &'a Molecule,
        anchor: Option<usize>,
        first_only: bool,
    ) -> Self {
        Self {
            pattern,
            target,
            anchor,
            first_only,
            core_pattern: vec![None; pattern.len()],
            core_target: vec![false; target.len()],
            matches: Vec::new(),
        }
    }

    fn search(&mut self) {
        if self.pattern.is_empty() || self.pattern.len() > self.target.len() {
            return;
        }
        if self.anchor.is_some_and(|a| a >= self.target.len()) {
            return;
        }
        self.extend(0);
    }

    fn done(&self) -> bool {
        self.first_only && !self.matches.is_empty()
    }

    fn extend(&mut self, depth: usize) {
        if depth == self.pattern.len() {
            self.matches
                .push(self.core_pattern.iter().flatten().copied().collect());
            return;
        }

        for target_atom in self.candidates(depth) {
            if self.core_target[target_atom] || !self.is_feasible(depth, target_atom) {
                continue;
            }
            self.core_pattern[depth] = Some(target_atom);
            self.core_target[target_atom] = true;

            self.extend(depth + 1);

            self.core_pattern[depth] = None;
            self.core_target[target_atom] = false;

            if self.done() {
                return;
            }
        }
    }

    fn candidates(&self, pattern_atom: usize) -> Vec<usize> {
        if pattern_atom == 0 {
            if let Some(anchor) = self.anchor {
                return vec![anchor];
            }
        }

        let mapped_neighbor = self
            .pattern
            .neighbors(pattern_atom)
            .iter()
            .find_map(|&(neighbor, _)| self.core_pattern[neighbor]);

        match mapped_neighbor {
            Some(target_atom) => self
                .target
                .neighbors(target_atom)
                .iter()
                .map(|&(neighbor, _)| neighbor)
                .filter(|&n| !self.core_target[n])
                .collect(),
            None => (0..self.target.len())
                .filter(|&i| !self.core_target[i])
                .collect(),
        }
    }

    fn is_feasible(&self, pattern_atom: usize, target_atom: usize) -> bool {
        if !atom_matches(&self.pattern.atoms()[pattern_atom], self.target, target_atom) {
            return false;
        }

        self.pattern
            .neighbors(pattern_atom)
            .iter()
            .all(|&(p_neighbor, p_bond)| match self.core_pattern[p_neighbor] {
                Some(t_neighbor) => self
                    .target
                    .bond_between(target_atom, t_neighbor)
                    .is_some_and(|t_bond| {
                        bond_matches(&self.pattern.bonds()[p_bond].expr, self.target, t_bond)
                    }),
                None => true,
            })
    }
}
