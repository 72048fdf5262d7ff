use crate::core::models::molecule::{ModelError, Molecule};
use crate::core::models::residue::ResidueId;
use crate::engine::config::FingerprintConfig;
use crate::engine::interaction::{Interaction, InteractionHit};
use crate::engine::registry::{InteractionRegistry, RegistryError};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("Unknown interaction `{name}`")]
    UnknownInteraction { name: String },

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Molecule error: {0}")]
    Model(#[from] ModelError),
}

/// Bits for one protein residue, in [`Fingerprint::interaction_names`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidueFingerprint {
    /// `None` for the fragment of atoms without residue information.
    pub residue: Option<ResidueId>,
    pub bits: Vec<bool>,
}

impl ResidueFingerprint {
    pub fn any(&self) -> bool {
        self.bits.iter().any(|&bit| bit)
    }
}

/// Evaluates a set of interactions for ligand and protein pairs.
///
/// Interaction names are matched ignoring ASCII case, so `"hbdonor"` and
/// `"HBDonor"` address the same detector.
pub struct Fingerprint {
    registry: InteractionRegistry,
    parameters: BTreeMap<String, toml::Table>,
    /// Registry names of the enabled interactions, parallel to `interactions`.
    enabled: Vec<String>,
    interactions: Vec<Box<dyn Interaction>>,
}

impl Fingerprint {
    /// Enables every concrete interaction of `registry` with default parameters.
    pub fn new(registry: &InteractionRegistry) -> Result<Self, FingerprintError> {
        Self::with_config(registry, &FingerprintConfig::default())
    }

    pub fn with_config(
        registry: &InteractionRegistry,
        config: &FingerprintConfig,
    ) -> Result<Self, FingerprintError> {
        let mut parameters = BTreeMap::new();
        for (name, table) in &config.parameters {
            let resolved = resolve(registry, name)?;
            parameters.insert(resolved.to_string(), table.clone());
        }

        let names: Vec<String> = match &config.interactions {
            Some(selected) => selected
                .iter()
                .map(|name| resolve(registry, name).map(str::to_string))
                .collect::<Result<_, _>>()?,
            None => registry.names().into_iter().map(str::to_string).collect(),
        };

        let interactions = names
            .iter()
            .map(|name| registry.create(name, parameters.get(name)))
            .collect::<Result<Vec<_>, _>>()?;
        info!(interactions = interactions.len(), "Fingerprint initialized.");

        Ok(Self {
            registry: registry.clone(),
            parameters,
            enabled: names,
            interactions,
        })
    }

    /// Whether the named interaction holds between `ligand` and `protein`.
    ///
    /// An enabled interaction is evaluated with the detector this fingerprint
    /// already holds. Any other registered name gets a detector from the
    /// registry, built with the parameter overrides configured for that name
    /// (so the result is `registry.create(name, overrides)?.detect(..)`).
    pub fn call(
        &mut self,
        name: &str,
        ligand: &Molecule,
        protein: &Molecule,
    ) -> Result<bool, FingerprintError> {
        self.with_detector(name, |detector| detector.detect(ligand, protein))
    }

    /// Every hit of the named interaction between `ligand` and `protein`.
    ///
    /// Detectors are chosen as in [`Fingerprint::call`].
    pub fn call_all(
        &mut self,
        name: &str,
        ligand: &Molecule,
        protein: &Molecule,
    ) -> Result<Vec<InteractionHit>, FingerprintError> {
        self.with_detector(name, |detector| detector.detect_all(ligand, protein))
    }

    /// Names of the enabled interactions, in bit order.
    pub fn interaction_names(&self) -> Vec<&str> {
        self.interactions.iter().map(|i| i.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// One bit per enabled interaction.
    #[instrument(skip_all, name = "fingerprint_bitvector")]
    pub fn bitvector(&mut self, ligand: &Molecule, protein: &Molecule) -> Vec<bool> {
        self.interactions
            .iter_mut()
            .map(|interaction| interaction.detect(ligand, protein))
            .collect()
    }

    /// The first hit of every enabled interaction, `None` where it is absent.
    ///
    /// Hit indices refer to the parent molecules of fragmented inputs.
    #[instrument(skip_all, name = "fingerprint_bitvector_atoms")]
    pub fn bitvector_atoms(
        &mut self,
        ligand: &Molecule,
        protein: &Molecule,
    ) -> Vec<Option<InteractionHit>> {
        self.interactions
            .iter_mut()
            .map(|interaction| interaction.first_hit(ligand, protein))
            .collect()
    }

    /// Splits `protein` into residues and computes the bits for each one.
    #[instrument(skip_all, name = "fingerprint_residues")]
    pub fn run_residues(
        &mut self,
        ligand: &Molecule,
        protein: &Molecule,
    ) -> Result<Vec<ResidueFingerprint>, FingerprintError> {
        let residues = protein.residue_fragments()?;
        debug!(residues = residues.len(), "Split protein into residues.");
        Ok(residues
            .iter()
            .map(|residue| ResidueFingerprint {
                residue: residue.residue().cloned(),
                bits: self.bitvector(ligand, residue),
            })
            .collect())
    }

    fn with_detector<T>(
        &mut self,
        name: &str,
        run: impl FnOnce(&mut dyn Interaction) -> T,
    ) -> Result<T, FingerprintError> {
        let resolved = resolve(&self.registry, name)?;
        if let Some(position) = self.enabled.iter().position(|enabled| enabled == resolved) {
            return Ok(run(self.interactions[position].as_mut()));
        }
        let mut detector = self.registry.create(resolved, self.parameters.get(resolved))?;
        Ok(run(detector.as_mut()))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fingerprint")
            .field("interactions", &self.interaction_names())
            .field("parameters", &self.parameters.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn resolve<'r>(registry: &'r InteractionRegistry, name: &str) -> Result<&'r str, FingerprintError> {
    registry
        .resolve(name)
        .ok_or_else(|| FingerprintError::UnknownInteraction {
            name: name.to_string(),
        })
}

/// Names of every concrete interaction in `registry`, sorted.
pub fn list_available(registry: &InteractionRegistry) -> Vec<String> {
    let mut names: Vec<String> = registry.names().into_iter().map(str::to_string).collect();
    names.sort();
    names
}
