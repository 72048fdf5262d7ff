use crate::core::models::molecule::Molecule;
use crate::core::utils::{elements, geometry};
use crate::engine::cache::VdwCache;
use crate::engine::config::{self, ConfigError};
use crate::engine::interaction::{
    DetectionScope, HitCollector, Interaction, InteractionHit, Orientation,
};
use itertools::iproduct;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VdwContactParams {
    /// Added to the sum of the two radii.
    pub tolerance: f64,
    /// Radius overrides keyed by element symbol; other elements use the
    /// Bondi table.
    pub radii: BTreeMap<String, f64>,
}

impl Default for VdwContactParams {
    fn default() -> Self {
        Self {
            tolerance: 0.5,
            radii: BTreeMap::new(),
        }
    }
}

/// Any two atoms closer than the sum of their van der Waals radii plus a
/// tolerance.
///
/// Contact limits are memoized per element pair in an instance-owned
/// [`VdwCache`].
#[derive(Debug, Clone)]
pub struct VdwContact {
    name: String,
    tolerance: f64,
    radii: HashMap<String, f64>,
    cache: VdwCache,
    unknown_elements: HashSet<String>,
}

impl VdwContact {
    pub fn new(tolerance: f64) -> Result<Self, ConfigError> {
        Self::with_params(
            "VdWContact",
            VdwContactParams {
                tolerance,
                ..VdwContactParams::default()
            },
        )
    }

    pub fn with_params(name: &str, params: VdwContactParams) -> Result<Self, ConfigError> {
        config::validate_distance("tolerance", params.tolerance)?;
        let mut radii = HashMap::with_capacity(params.radii.len());
        for (element, radius) in params.radii {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(ConfigError::invalid(
                    "radii",
                    format!("radius for `{element}` must be positive"),
                ));
            }
            radii.insert(element.trim().to_ascii_uppercase(), radius);
        }
        debug!(interaction = name, tolerance = params.tolerance, overrides = radii.len(), "Built van der Waals contact interaction.");
        Ok(Self {
            name: name.to_string(),
            tolerance: params.tolerance,
            radii,
            cache: VdwCache::new(),
            unknown_elements: HashSet::new(),
        })
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn cache(&self) -> &VdwCache {
        &self.cache
    }

    /// The radius used for `element`: a configured override, else Bondi.
    pub fn radius(&self, element: &str) -> Option<f64> {
        lookup_radius(&self.radii, element)
    }

    fn contact_limit(&mut self, ligand_element: &str, protein_element: &str) -> Option<f64> {
        let radii = &self.radii;
        let tolerance = self.tolerance;
        let limit = self
            .cache
            .get_or_insert_with(ligand_element, protein_element, || {
                Some(lookup_radius(radii, ligand_element)? + lookup_radius(radii, protein_element)? + tolerance)
            });
        if limit.is_none() {
            for element in [ligand_element, protein_element] {
                if self.radius(element).is_none() && self.unknown_elements.insert(element.to_string()) {
                    warn!(interaction = %self.name, element, "No van der Waals radius for element; its contacts are skipped.");
                }
            }
        }
        limit
    }
}

fn lookup_radius(overrides: &HashMap<String, f64>, element: &str) -> Option<f64> {
    overrides
        .get(element.trim().to_ascii_uppercase().as_str())
        .copied()
        .or_else(|| elements::vdw_radius(element))
}

impl Interaction for VdwContact {
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

        for (i, j) in iproduct!(0..ligand.len(), 0..protein.len()) {
            let (lig_atom, prot_atom) = (&ligand.atoms()[i], &protein.atoms()[j]);
            let Some(limit) = self.contact_limit(&lig_atom.element, &prot_atom.element) else {
                continue;
            };
            let d = geometry::distance(&lig_atom.position, &prot_atom.position);
            if d > limit {
                continue;
            }
            trace!(ligand_atom = i, protein_atom = j, distance = d, limit, "Van der Waals contact.");
            let hit = InteractionHit::oriented(
                Orientation::Forward,
                (ligand, &[i][..]),
                (protein, &[j][..]),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::builder::MoleculeBuilder;
    use nalgebra::Point3;

    fn single(element: &str, x: f64) -> Molecule {
        let mut builder = MoleculeBuilder::new();
        builder.add_atom(element, element, Point3::new(x, 0.0, 0.0));
        builder.build().unwrap()
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let err = VdwContact::new(-1.0).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidArgument { .. }));
        assert_eq!(err.to_string(), "`tolerance` must be 0 or positive");
        assert!(VdwContact::new(0.0).is_ok());
    }

    #[test]
    fn contact_uses_radii_sum_plus_tolerance() {
        // C + O = 1.70 + 1.52 = 3.22
        let mut strict = VdwContact::new(0.0).unwrap();
        assert!(strict.detect(&single("C", 0.0), &single("O", 3.2)));
        assert!(!strict.detect(&single("C", 0.0), &single("O", 3.3)));

        let mut loose = VdwContact::new(0.5).unwrap();
        assert!(loose.detect(&single("C", 0.0), &single("O", 3.7)));
    }

    #[test]
    fn cache_fills_per_element_pair() {
        let mut vdw = VdwContact::new(0.5).unwrap();
        assert!(vdw.cache().is_empty());
        vdw.detect(&single("C", 0.0), &single("N", 10.0));
        assert_eq!(vdw.cache().len(), 1);
        let limit = vdw.cache().get("C", "N").unwrap();
        assert!((limit - (1.70 + 1.55 + 0.5)).abs() < 1e-12);
    }

    #[test]
    fn elements_without_radius_are_skipped() {
        let mut vdw = VdwContact::new(0.5).unwrap();
        assert!(!vdw.detect(&single("Fe", 0.0), &single("O", 1.0)));
        assert!(vdw.cache().is_empty());
    }

    #[test]
    fn radius_overrides_take_precedence() {
        let params = VdwContactParams {
            radii: BTreeMap::from([("fe".to_string(), 1.94), ("C".to_string(), 2.0)]),
            ..VdwContactParams::default()
        };
        let mut vdw = VdwContact::with_params("VdWContact", params).unwrap();
        assert_eq!(vdw.radius("Fe"), Some(1.94));
        assert_eq!(vdw.radius("C"), Some(2.0));
        assert_eq!(vdw.radius("N"), Some(1.55));
        assert!(vdw.detect(&single("Fe", 0.0), &single("O", 3.5)));
    }

    #[test]
    fn non_positive_radius_override_is_rejected() {
        let params = VdwContactParams {
            radii: BTreeMap::from([("C".to_string(), 0.0)]),
            ..VdwContactParams::default()
        };
        assert!(VdwContact::with_params("VdWContact", params).is_err());
    }
}
