use super::ring::{self, RingGeometry};
use crate::core::models::molecule::Molecule;
use crate::core::pattern::Pattern;
use crate::core::utils::geometry;
use crate::engine::config::{self, AngleRange, ConfigError};
use crate::engine::interaction::{
    DetectionScope, HitCollector, Interaction, InteractionHit, Orientation,
};
use itertools::iproduct;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Thresholds for one stacking arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StackingGeometry {
    /// Upper bound on the centroid to centroid distance.
    pub distance: f64,
    /// Range for the angle between the two ring planes.
    pub plane_angle: AngleRange,
    /// Range for the angle between a ring normal and the centroid to centroid
    /// vector. Passing for either ring is enough.
    pub normal_to_centroid_angle: AngleRange,
    /// When set, the centroid of one ring projected onto the line where the two
    /// ring planes meet must lie within this radius of a centroid. Either ring
    /// may serve as the projected one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intersect_radius: Option<f64>,
}

impl StackingGeometry {
    pub fn face_to_face() -> Self {
        Self {
            distance: 5.5,
            plane_angle: AngleRange::new(0.0, 35.0),
            normal_to_centroid_angle: AngleRange::new(0.0, 33.0),
            intersect_radius: None,
        }
    }

    pub fn edge_to_face() -> Self {
        Self {
            distance: 6.5,
            plane_angle: AngleRange::new(50.0, 90.0),
            normal_to_centroid_angle: AngleRange::new(0.0, 30.0),
            intersect_radius: Some(1.5),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        config::validate_distance("distance", self.distance)?;
        self.plane_angle.validate("plane_angle")?;
        self.normal_to_centroid_angle
            .validate("normal_to_centroid_angle")?;
        if let Some(radius) = self.intersect_radius {
            config::validate_distance("intersect_radius", radius)?;
        }
        Ok(())
    }

    /// Returns the centroid distance with the plane and normal-to-centroid
    /// angles when both rings satisfy this arrangement.
    fn check(&self, a: &RingGeometry, b: &RingGeometry) -> Option<(f64, Vec<f64>)> {
        let d = geometry::distance(&a.centroid, &b.centroid);
        if d > self.distance {
            return None;
        }

        let plane = geometry::vector_angle(&a.normal, &b.normal)?;
        if !geometry::angle_between_limits(plane, self.plane_angle.min, self.plane_angle.max, true)
        {
            return None;
        }

        let a_to_b = b.centroid - a.centroid;
        let range = self.normal_to_centroid_angle;
        let ncc = [
            geometry::vector_angle(&a.normal, &a_to_b)?,
            geometry::vector_angle(&b.normal, &(-a_to_b))?,
        ]
        .into_iter()
        .find(|&angle| geometry::angle_between_limits(angle, range.min, range.max, true))?;

        if let Some(radius) = self.intersect_radius {
            if !(intersects_within(a, b, radius) || intersects_within(b, a, radius)) {
                return None;
            }
        }

        Some((d, vec![plane, ncc]))
    }
}

/// Projects the centroid of `plane` onto the line where both ring planes meet
/// and checks that the point lies within `radius` of either centroid.
fn intersects_within(plane: &RingGeometry, tilted: &RingGeometry, radius: f64) -> bool {
    geometry::plane_intersection_point(&plane.normal, &plane.centroid, &tilted.normal, &tilted.centroid)
        .is_some_and(|point| {
            let nearest = geometry::distance(&plane.centroid, &point)
                .min(geometry::distance(&tilted.centroid, &point));
            nearest <= radius
        })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PiStackingParams {
    /// Aromatic ring queries, tried in order.
    pub pi_ring: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_to_face: Option<StackingGeometry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_to_face: Option<StackingGeometry>,
}

impl PiStackingParams {
    pub fn face_to_face() -> Self {
        Self {
            pi_ring: ring::default_rings(),
            face_to_face: Some(StackingGeometry::face_to_face()),
            edge_to_face: None,
        }
    }

    pub fn edge_to_face() -> Self {
        Self {
            pi_ring: ring::default_rings(),
            face_to_face: None,
            edge_to_face: Some(StackingGeometry::edge_to_face()),
        }
    }
}

impl Default for PiStackingParams {
    /// Face-to-face first, then edge-to-face.
    fn default() -> Self {
        Self {
            pi_ring: ring::default_rings(),
            face_to_face: Some(StackingGeometry::face_to_face()),
            edge_to_face: Some(StackingGeometry::edge_to_face()),
        }
    }
}

/// Aromatic ring stacking.
///
/// Backs `FaceToFace`, `EdgeToFace` and `PiStacking`, which differ only in
/// the arrangements they try. Swapping ligand and protein gives the same answer.
#[derive(Debug, Clone)]
pub struct PiStacking {
    name: String,
    pi_ring: Pattern,
    geometries: Vec<StackingGeometry>,
}

impl PiStacking {
    pub fn new(name: &str, params: PiStackingParams) -> Result<Self, ConfigError> {
        let geometries: Vec<StackingGeometry> = [params.face_to_face, params.edge_to_face]
            .into_iter()
            .flatten()
            .collect();
        if geometries.is_empty() {
            return Err(ConfigError::invalid(
                "face_to_face",
                "or `edge_to_face` must be configured",
            ));
        }
        for geometry in &geometries {
            geometry.validate()?;
        }
        let pi_ring = config::compile("pi_ring", &params.pi_ring)?;
        debug!(interaction = name, arrangements = geometries.len(), "Built pi-stacking interaction.");
        Ok(Self {
            name: name.to_string(),
            pi_ring,
            geometries,
        })
    }

    pub fn face_to_face() -> Result<Self, ConfigError> {
        Self::new("FaceToFace", PiStackingParams::face_to_face())
    }

    pub fn edge_to_face() -> Result<Self, ConfigError> {
        Self::new("EdgeToFace", PiStackingParams::edge_to_face())
    }

    pub fn pi_stacking() -> Result<Self, ConfigError> {
        Self::new("PiStacking", PiStackingParams::default())
    }

    fn check(&self, ligand_ring: &RingGeometry, protein_ring: &RingGeometry) -> Option<(f64, Vec<f64>)> {
        self.geometries
            .iter()
            .find_map(|geometry| geometry.check(ligand_ring, protein_ring))
    }
}

impl Interaction for PiStacking {
    fn name(&self) -> &str {
        &self.name
    }

    fn detect_hits(
        &mut self,
        ligand: &Molecule,
        protein: &Molecule,
        scope: DetectionScope,
    ) -> Vec<InteractionHit> {
        let mut hits = HitCollector::new(scope);

        let ligand_rings = ring::find_rings(&self.pi_ring, ligand);
        if ligand_rings.is_empty() {
            return hits.finish();
        }
        let protein_rings = ring::find_rings(&self.pi_ring, protein);

        for (lig_ring, prot_ring) in iproduct!(&ligand_rings, &protein_rings) {
            let Some((d, angles)) = self.check(lig_ring, prot_ring) else {
                continue;
            };
            trace!(interaction = %self.name, distance = d, ?angles, "Pi-stacking hit.");
            let hit = InteractionHit::oriented(
                Orientation::Forward,
                (ligand, &lig_ring.atoms),
                (protein, &prot_ring.atoms),
                d,
                angles,
            );
            if hits.push(hit) {
                break;
            }
        }
        hits.finish()
    }
}
