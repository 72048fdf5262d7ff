use crate::core::models::molecule::Molecule;
use crate::core::pattern::{Match, Pattern};
use crate::core::utils::geometry;
use nalgebra::{Point3, Vector3};

/// Default aromatic ring queries: six- then five-membered.
pub const AROMATIC_RINGS: [&str; 2] = ["a1:a:a:a:a:a:1", "a1:a:a:a:a:1"];

pub fn default_rings() -> Vec<String> {
    AROMATIC_RINGS.iter().map(|s| s.to_string()).collect()
}

/// A matched ring with its centroid and plane normal.
#[derive(Debug, Clone)]
pub struct RingGeometry {
    pub atoms: Match,
    pub centroid: Point3<f64>,
    pub normal: Vector3<f64>,
}

impl RingGeometry {
    fn from_match(molecule: &Molecule, atoms: Match) -> Option<Self> {
        let coords: Vec<Point3<f64>> = atoms
            .iter()
            .map(|&i| molecule.atoms()[i].position)
            .collect();
        let centroid = geometry::centroid(&coords)?;
        let normal = geometry::ring_normal(&centroid, &coords)?;
        Some(Self {
            atoms,
            centroid,
            normal,
        })
    }
}

/// Geometry of every ring `pattern` finds; degenerate rings are dropped.
pub fn find_rings(pattern: &Pattern, molecule: &Molecule) -> Vec<RingGeometry> {
    pattern
        .find_matches(molecule)
        .into_iter()
        .filter_map(|atoms| RingGeometry::from_match(molecule, atoms))
        .collect()
}
