use crate::core::models::molecule::Molecule;
use crate::core::pattern::Pattern;
use crate::core::utils::geometry;
use crate::engine::config::{self, ConfigError};
use crate::engine::interaction::{
    DetectionScope, HitCollector, Interaction, InteractionHit, Orientation,
};
use itertools::iproduct;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

const HYDROPHOBIC: &str =
    "[c,s,Br,I,S&H0&v2,$([D3,D4;#6])&!$([#6]~[#7,#8,#9])&!$([#6X4H0]);+0]";
const CATION: &str = "[+,+2,+3]";
const ANION: &str = "[-,-2,-3]";
const METAL: &str = "[Ca,Cd,Co,Cu,Fe,Mg,Mn,Ni,Na,K,Zn]";
const METAL_LIGAND: &str =
    "[O,#7&!$([nX3])&!$([NX3]-*=[!#6])&!$([NX3]-[a])&!$([NX4]),-,-2;!+;!+2]";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DistanceParams {
    /// SMARTS for the atom playing the first role.
    pub first_pattern: String,
    /// SMARTS for the atom playing the second role.
    pub second_pattern: String,
    /// Upper bound on the distance between the two first matched atoms.
    pub distance: f64,
}

impl DistanceParams {
    pub fn hydrophobic() -> Self {
        Self {
            first_pattern: HYDROPHOBIC.to_string(),
            second_pattern: HYDROPHOBIC.to_string(),
            distance: 4.5,
        }
    }

    /// Cation first, anion second.
    pub fn ionic() -> Self {
        Self {
            first_pattern: CATION.to_string(),
            second_pattern: ANION.to_string(),
            distance: 4.5,
        }
    }

    /// Metal first, ligand second.
    pub fn metallic() -> Self {
        Self {
            first_pattern: METAL.to_string(),
            second_pattern: METAL_LIGAND.to_string(),
            distance: 2.8,
        }
    }
}

/// Two matched atoms close enough to each other.
///
/// Backs `Hydrophobic`, `Cationic`/`Anionic` and `MetalDonor`/`MetalAcceptor`.
#[derive(Debug, Clone)]
pub struct Distance {
    name: String,
    first: Pattern,
    second: Pattern,
    distance: f64,
    orientation: Orientation,
}

impl Distance {
    pub fn new(
        name: &str,
        params: DistanceParams,
        orientation: Orientation,
    ) -> Result<Self, ConfigError> {
        config::validate_distance("distance", params.distance)?;
        let first = config::compile("first_pattern", &[params.first_pattern])?;
        let second = config::compile("second_pattern", &[params.second_pattern])?;
        debug!(interaction = name, distance = params.distance, ?orientation, "Built distance interaction.");
        Ok(Self {
            name: name.to_string(),
            first,
            second,
            distance: params.distance,
            orientation,
        })
    }

    pub fn hydrophobic() -> Result<Self, ConfigError> {
        Self::new("Hydrophobic", DistanceParams::hydrophobic(), Orientation::Forward)
    }

    pub fn cationic() -> Result<Self, ConfigError> {
        Self::new("Cationic", DistanceParams::ionic(), Orientation::Forward)
    }

    pub fn anionic() -> Result<Self, ConfigError> {
        Self::new("Anionic", DistanceParams::ionic(), Orientation::Reverse)
    }

    pub fn metal_donor() -> Result<Self, ConfigError> {
        Self::new("MetalDonor", DistanceParams::metallic(), Orientation::Forward)
    }

    pub fn metal_acceptor() -> Result<Self, ConfigError> {
        Self::new("MetalAcceptor", DistanceParams::metallic(), Orientation::Reverse)
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }
}

impl Interaction for Distance {
    fn name(&self) -> &str {
        &self.name
    }

    fn detect_hits(
        &mut self,
        ligand: &Molecule,
        protein: &Molecule,
        scope: DetectionScope,
    ) -> Vec<InteractionHit> {
        let (first_mol, second_mol) = self.orientation.arrange(ligand, protein);
        let mut hits = HitCollector::new(scope);

        let first_matches = self.first.find_matches(first_mol);
        if first_matches.is_empty() {
            return hits.finish();
        }
        let second_matches = self.second.find_matches(second_mol);

        for (m1, m2) in iproduct!(&first_matches, &second_matches) {
            let (Some(&a), Some(&b)) = (m1.first(), m2.first()) else {
                continue;
            };
            let d = geometry::distance(
                &first_mol.atoms()[a].position,
                &second_mol.atoms()[b].position,
            );
            if d > self.distance {
                continue;
            }
            trace!(interaction = %self.name, first = a, second = b, distance = d, "Distance hit.");
            let hit = InteractionHit::oriented(
                self.orientation,
                (first_mol, &[a][..]),
                (second_mol, &[b][..]),
                d,
                Vec::new(),
            );
            if hits.push(hit) {
                break;
            }
        }
        hits.finish()
    }
}
