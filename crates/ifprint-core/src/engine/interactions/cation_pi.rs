use super::ring::{self, RingGeometry};
use crate::core::models::molecule::Molecule;
use crate::core::pattern::Pattern;
use crate::core::utils::geometry;
use crate::engine::config::{self, AngleRange, ConfigError};
use crate::engine::interaction::{
    DetectionScope, HitCollector, Interaction, InteractionHit, Orientation,
};
use itertools::iproduct;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CationPiParams {
    /// Cation query. Aromatic cations are excluded by default.
    pub cation: String,
    /// Aromatic ring queries, tried in order.
    pub pi_ring: Vec<String>,
    /// Upper bound on the cation to ring centroid distance.
    pub distance: f64,
    /// Range for the angle between the ring normal and the centroid to cation
    /// vector, folded into 0 to 90 degrees.
    pub angle: AngleRange,
}

impl Default for CationPiParams {
    fn default() -> Self {
        Self {
            cation: "[+,+2,+3;!a]".to_string(),
            pi_ring: ring::default_rings(),
            distance: 4.5,
            angle: AngleRange::new(0.0, 30.0),
        }
    }
}

/// A cation sitting above the face of an aromatic ring.
///
/// `Forward` (`CationPi`) puts the cation on the ligand, `Reverse`
/// (`PiCation`) puts the ring on the ligand.
#[derive(Debug, Clone)]
pub struct CationPi {
    name: String,
    cation: Pattern,
    pi_ring: Pattern,
    distance: f64,
    angle: AngleRange,
    orientation: Orientation,
}

impl CationPi {
    pub fn new(
        name: &str,
        params: CationPiParams,
        orientation: Orientation,
    ) -> Result<Self, ConfigError> {
        config::validate_distance("distance", params.distance)?;
        params.angle.validate("angle")?;
        let cation = config::compile("cation", &[params.cation])?;
        let pi_ring = config::compile("pi_ring", &params.pi_ring)?;
        debug!(interaction = name, ?orientation, "Built cation-pi interaction.");
        Ok(Self {
            name: name.to_string(),
            cation,
            pi_ring,
            distance: params.distance,
            angle: params.angle,
            orientation,
        })
    }

    pub fn cation_pi() -> Result<Self, ConfigError> {
        Self::new("CationPi", CationPiParams::default(), Orientation::Forward)
    }

    pub fn pi_cation() -> Result<Self, ConfigError> {
        Self::new("PiCation", CationPiParams::default(), Orientation::Reverse)
    }

    fn check(&self, cation: &Point3<f64>, ring: &RingGeometry) -> Option<(f64, f64)> {
        let to_cation = cation - ring.centroid;
        let d = to_cation.norm();
        if d > self.distance {
            return None;
        }
        let angle = geometry::vector_angle(&ring.normal, &to_cation)?;
        geometry::angle_between_limits(angle, self.angle.min, self.angle.max, true)
            .then_some((d, angle))
    }
}

impl Interaction for CationPi {
    fn name(&self) -> &str {
        &self.name
    }

    fn detect_hits(
        &mut self,
        ligand: &Molecule,
        protein: &Molecule,
        scope: DetectionScope,
    ) -> Vec<InteractionHit> {
        let (cation_mol, ring_mol) = self.orientation.arrange(ligand, protein);
        let mut hits = HitCollector::new(scope);

        let cations = self.cation.find_matches(cation_mol);
        if cations.is_empty() {
            return hits.finish();
        }
        let rings = ring::find_rings(&self.pi_ring, ring_mol);

        for (cation, ring) in iproduct!(&cations, &rings) {
            let Some(&c) = cation.first() else {
                continue;
            };
            let Some((d, angle)) = self.check(&cation_mol.atoms()[c].position, ring) else {
                continue;
            };
            trace!(interaction = %self.name, cation = c, distance = d, angle, "Cation-pi hit.");
            let hit = InteractionHit::oriented(
                self.orientation,
                (cation_mol, &[c][..]),
                (ring_mol, &ring.atoms),
                d,
                vec![angle],
            );
            if hits.push(hit) {
                break;
            }
        }
        hits.finish()
    }
}
