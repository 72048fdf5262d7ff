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

const DONOR: &str = "[#7,#8,#16]-[#1]";
const ACCEPTOR: &str = "[#7&!$([nX3])&!$([NX3]-*=[O,N,P,S])&!$([NX3]-[a])&!$([#7+]),O&!$([OX2](C)C=O)&!$(O(~a)~a)&!$(O=N-*)&!$([O-]-N=O)]";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HBondParams {
    /// Two-atom query: heavy donor atom, then its hydrogen.
    pub donor: String,
    pub acceptor: String,
    /// Upper bound on the donor to acceptor distance.
    pub distance: f64,
    /// Range for the D-H...A angle, measured at the hydrogen.
    pub angle: AngleRange,
}

impl Default for HBondParams {
    fn default() -> Self {
        Self {
            donor: DONOR.to_string(),
            acceptor: ACCEPTOR.to_string(),
            distance: 3.5,
            angle: AngleRange::new(130.0, 180.0),
        }
    }
}

/// Hydrogen bond. `Forward` (`HBDonor`) makes the ligand the donor,
/// `Reverse` (`HBAcceptor`) makes it the acceptor.
#[derive(Debug, Clone)]
pub struct HBond {
    name: String,
    donor: Pattern,
    acceptor: Pattern,
    distance: f64,
    angle: AngleRange,
    orientation: Orientation,
}

impl HBond {
    pub fn new(
        name: &str,
        params: HBondParams,
        orientation: Orientation,
    ) -> Result<Self, ConfigError> {
        config::validate_distance("distance", params.distance)?;
        params.angle.validate("angle")?;
        let donor = config::compile("donor", &[params.donor])?;
        let acceptor = config::compile("acceptor", &[params.acceptor])?;
        debug!(interaction = name, ?orientation, "Built hydrogen bond interaction.");
        Ok(Self {
            name: name.to_string(),
            donor,
            acceptor,
            distance: params.distance,
            angle: params.angle,
            orientation,
        })
    }

    pub fn donor() -> Result<Self, ConfigError> {
        Self::new("HBDonor", HBondParams::default(), Orientation::Forward)
    }

    pub fn acceptor() -> Result<Self, ConfigError> {
        Self::new("HBAcceptor", HBondParams::default(), Orientation::Reverse)
    }
}

impl Interaction for HBond {
    fn name(&self) -> &str {
        &self.name
    }

    fn detect_hits(
        &mut self,
        ligand: &Molecule,
        protein: &Molecule,
        scope: DetectionScope,
    ) -> Vec<InteractionHit> {
        let (donor_mol, acceptor_mol) = self.orientation.arrange(ligand, protein);
        let mut hits = HitCollector::new(scope);

        let donors = self.donor.find_matches(donor_mol);
        if donors.is_empty() {
            return hits.finish();
        }
        let acceptors = self.acceptor.find_matches(acceptor_mol);

        for (donor, acceptor) in iproduct!(&donors, &acceptors) {
            let (&[d, h, ..], Some(&a)) = (donor.as_slice(), acceptor.first()) else {
                continue;
            };
            let d_pos = &donor_mol.atoms()[d].position;
            let h_pos = &donor_mol.atoms()[h].position;
            let a_pos = &acceptor_mol.atoms()[a].position;

            let dist = geometry::distance(d_pos, a_pos);
            if dist > self.distance {
                continue;
            }
            let Some(dha) = geometry::angle_at(h_pos, d_pos, a_pos) else {
                continue;
            };
            if !geometry::angle_between_limits(dha, self.angle.min, self.angle.max, false) {
                continue;
            }
            trace!(interaction = %self.name, donor = d, acceptor = a, distance = dist, angle = dha, "Hydrogen bond hit.");
            let hit = InteractionHit::oriented(
                self.orientation,
                (donor_mol, &[d, h][..]),
                (acceptor_mol, &[a][..]),
                dist,
                vec![dha],
            );
            if hits.push(hit) {
                break;
            }
        }
        hits.finish()
    }
}
