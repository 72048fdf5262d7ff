use crate::core::models::molecule::{Molecule, get_mapindex};

/// Which structure plays the first role of a directional interaction.
///
/// `Forward` means the ligand plays the first role (e.g. the donor of
/// `HBDonor`, the cation of `Cationic`); `Reverse` hands it to the protein.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    Forward,
    Reverse,
}

impl Orientation {
    /// Returns `(first role, second role)` molecules.
    pub fn arrange<'m>(self, ligand: &'m Molecule, protein: &'m Molecule) -> (&'m Molecule, &'m Molecule) {
        match self {
            Self::Forward => (ligand, protein),
            Self::Reverse => (protein, ligand),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionScope {
    /// Stop at the first satisfying candidate.
    First,
    /// Report every satisfying candidate.
    All,
}

/// One satisfied interaction between a ligand and a protein.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionHit {
    /// Parent-space indices of the ligand atoms involved, in pattern-role order.
    pub ligand_indices: Vec<usize>,
    /// Parent-space indices of the protein atoms involved, in pattern-role order.
    pub protein_indices: Vec<usize>,
    /// The distance that was checked, in Angstroms.
    pub distance: f64,
    /// The angles that were checked, in degrees.
    pub angles: Vec<f64>,
}

impl InteractionHit {
    /// Builds a hit from local indices of the first- and second-role molecules.
    pub(crate) fn oriented(
        orientation: Orientation,
        (first, first_local): (&Molecule, &[usize]),
        (second, second_local): (&Molecule, &[usize]),
        distance: f64,
        angles: Vec<f64>,
    ) -> Self {
        let first_indices = to_parent(first, first_local);
        let second_indices = to_parent(second, second_local);
        let (ligand_indices, protein_indices) = match orientation {
            Orientation::Forward => (first_indices, second_indices),
            Orientation::Reverse => (second_indices, first_indices),
        };
        Self {
            ligand_indices,
            protein_indices,
            distance,
            angles,
        }
    }
}

fn to_parent(molecule: &Molecule, local: &[usize]) -> Vec<usize> {
    local
        .iter()
        .filter_map(|&index| get_mapindex(molecule, index).ok())
        .collect()
}

/// A detector for one kind of non-covalent interaction.
///
/// Implementors provide [`detect_hits`](Interaction::detect_hits); the boolean
/// and exhaustive forms derive from it. Detection takes `&mut self` so that
/// detectors can keep per-instance caches.
pub trait Interaction: Send {
    /// The registered name of the interaction, e.g. `"HBDonor"`.
    fn name(&self) -> &str;

    fn detect_hits(
        &mut self,
        ligand: &Molecule,
        protein: &Molecule,
        scope: DetectionScope,
    ) -> Vec<InteractionHit>;

    fn detect(&mut self, ligand: &Molecule, protein: &Molecule) -> bool {
        !self
            .detect_hits(ligand, protein, DetectionScope::First)
            .is_empty()
    }

    fn detect_all(&mut self, ligand: &Molecule, protein: &Molecule) -> Vec<InteractionHit> {
        self.detect_hits(ligand, protein, DetectionScope::All)
    }

    fn first_hit(&mut self, ligand: &Molecule, protein: &Molecule) -> Option<InteractionHit> {
        self.detect_hits(ligand, protein, DetectionScope::First)
            .into_iter()
            .next()
    }
}

/// Collects hits and reports when the scope is satisfied.
pub(crate) struct HitCollector {
    scope: DetectionScope,
    hits: Vec<InteractionHit>,
}

impl HitCollector {
    pub(crate) fn new(scope: DetectionScope) -> Self {
        Self {
            scope,
            hits: Vec::new(),
        }
    }

    /// Records a hit; returns `true` once no more candidates need to be examined.
    pub(crate) fn push(&mut self, hit: InteractionHit) -> bool {
        self.hits.push(hit);
        self.scope == DetectionScope::First
    }

    pub(crate) fn finish(self) -> Vec<InteractionHit> {
        self.hits
    }
}
