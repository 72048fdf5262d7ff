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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct XBondParams {
    /// Two-atom query: donor atom, then the halogen.
    pub donor: String,
    /// Two-atom query: acceptor atom, then any atom bonded to it.
    pub acceptor: String,
    /// Upper bound on the halogen to acceptor distance.
    pub distance: f64,
    /// Range for the A...X-D angle.
    pub axd_angle: AngleRange,
    /// Range for the X...A-R angle.
    pub xar_angle: AngleRange,
}

impl Default for XBondParams {
    fn default() -> Self {
        Self {
            donor: "[#6,#7,Si,F,Cl,Br,I]-[Cl,Br,I,At]".to_string(),
            acceptor: "[#7,#8,P,S,Se,Te,a;+0,-,-2]~[*]".to_string(),
            distance: 3.5,
            axd_angle: AngleRange::new(130.0, 180.0),
            xar_angle: AngleRange::new(80.0, 140.0),
        }
    }
}

/// Halogen bond. `Forward` (`XBDonor`) makes the ligand the halogen donor,
/// `Reverse` (`XBAcceptor`) makes it the acceptor.
#[derive(Debug, Clone)]
pub struct XBond {
    name: String,
    donor: Pattern,
    acceptor: Pattern,
    distance: f64,
    axd_angle: AngleRange,
    xar_angle: AngleRange,
    orientation: Orientation,
}

impl XBond {
    pub fn new(
        name: &str,
        params: XBondParams,
        orientation: Orientation,
    ) -> Result<Self, ConfigError> {
        config::validate_distance("distance", params.distance)?;
        params.axd_angle.validate("axd_angle")?;
        params.xar_angle.validate("xar_angle")?;
        let donor = config::compile("donor", &[params.donor])?;
        let acceptor = config::compile("acceptor", &[params.acceptor])?;
        debug!(interaction = name, ?orientation, "Built halogen bond interaction.");
        Ok(Self {
            name: name.to_string(),
            donor,
            acceptor,
            distance: params.distance,
            axd_angle: params.axd_angle,
            xar_angle: params.xar_angle,
            orientation,
        })
    }

    pub fn donor() -> Result<Self, ConfigError> {
        Self::new("XBDonor", XBondParams::default(), Orientation::Forward)
    }

    pub fn acceptor() -> Result<Self, ConfigError> {
        Self::new("XBAcceptor", XBondParams::default(), Orientation::Reverse)
    }
}

impl Interaction for XBond {
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
            let (&[d, x, ..], &[a, r, ..]) = (donor.as_slice(), acceptor.as_slice()) else {
                continue;
            };
            let d_pos = &donor_mol.atoms()[d].position;
            let x_pos = &donor_mol.atoms()[x].position;
            let a_pos = &acceptor_mol.atoms()[a].position;
            let r_pos = &acceptor_mol.atoms()[r].position;

            let dist = geometry::distance(x_pos, a_pos);
            if dist > self.distance {
                continue;
            }
            let Some(axd) = geometry::angle_at(x_pos, a_pos, d_pos) else {
                continue;
            };
            if !geometry::angle_between_limits(axd, self.axd_angle.min, self.axd_angle.max, false) {
                continue;
            }
            let Some(xar) = geometry::angle_at(a_pos, x_pos, r_pos) else {
                continue;
            };
            if !geometry::angle_between_limits(xar, self.xar_angle.min, self.xar_angle.max, false) {
                continue;
            }
            trace!(interaction = %self.name, halogen = x, acceptor = a, distance = dist, axd, xar, "Halogen bond hit.");
            let hit = InteractionHit::oriented(
                self.orientation,
                (donor_mol, &[d, x][..]),
                (acceptor_mol, &[a, r][..]),
                dist,
                vec![axd, xar],
            );
            if hits.push(hit) {
                break;
            }
        }
        hits.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::builder::MoleculeBuilder;
    use crate::core::models::topology::BondOrder;
    use nalgebra::Point3;

    fn chloromethane() -> Molecule {
        let mut builder = MoleculeBuilder::new();
        builder
            .add_atom("C", "C", Point3::new(0.0, 0.0, 0.0))
            .implicit_hydrogens(3)
            .add_atom("CL", "Cl", Point3::new(1.77, 0.0, 0.0))
            .add_bond(0, 1, BondOrder::Single);
        builder.build().unwrap()
    }

    // Carbonyl oxygen at `o` with its carbon placed at `c`.
    fn carbonyl(o: Point3<f64>, c: Point3<f64>) -> Molecule {
        let mut builder = MoleculeBuilder::new();
        builder
            .add_atom("O", "O", o)
            .add_atom("C", "C", c)
            .implicit_hydrogens(2)
            .add_bond(0, 1, BondOrder::Double);
        builder.build().unwrap()
    }

    #[test]
    fn halogen_bond_with_bent_acceptor_is_detected() {
        let donor = chloromethane();
        let acceptor = carbonyl(Point3::new(4.87, 0.0, 0.0), Point3::new(5.475, 1.048, 0.0));
        assert!(XBond::donor().unwrap().detect(&donor, &acceptor));
        assert!(XBond::acceptor().unwrap().detect(&acceptor, &donor));
        assert!(!XBond::donor().unwrap().detect(&acceptor, &donor));
    }

    #[test]
    fn linear_acceptor_fails_the_xar_angle() {
        let donor = chloromethane();
        let acceptor = carbonyl(Point3::new(4.87, 0.0, 0.0), Point3::new(6.08, 0.0, 0.0));
        assert!(!XBond::donor().unwrap().detect(&donor, &acceptor));
    }

    #[test]
    fn side_on_acceptor_fails_the_axd_angle() {
        let donor = chloromethane();
        let acceptor = carbonyl(Point3::new(1.77, 3.1, 0.0), Point3::new(0.722, 3.705, 0.0));
        assert!(!XBond::donor().unwrap().detect(&donor, &acceptor));
    }

    #[test]
    fn hit_carries_both_angles() {
        let donor = chloromethane();
        let acceptor = carbonyl(Point3::new(4.87, 0.0, 0.0), Point3::new(5.475, 1.048, 0.0));
        let hit = XBond::donor().unwrap().first_hit(&donor, &acceptor).unwrap();
        assert_eq!(hit.ligand_indices, vec![0, 1]);
        assert_eq!(hit.protein_indices, vec![0, 1]);
        assert!((hit.angles[0] - 180.0).abs() < 1e-6);
        assert!((hit.angles[1] - 120.0).abs() < 0.1);
    }
}
