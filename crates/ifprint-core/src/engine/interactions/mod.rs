//! # Built-in Interactions
//!
//! One detector type per geometric family. Directional interactions share a
//! type and differ only in their [`Orientation`]: `Cationic` and `Anionic`
//! are the same [`Distance`](distance::Distance) detector with the roles
//! swapped.
//!
//! | Name | Type | Ligand role |
//! |---|---|---|
//! | `Hydrophobic` | [`distance::Distance`] | either |
//! | `Cationic` / `Anionic` | [`distance::Distance`] | cation / anion |
//! | `CationPi` / `PiCation` | [`cation_pi::CationPi`] | cation / ring |
//! | `FaceToFace`, `EdgeToFace`, `PiStacking` | [`pi_stacking::PiStacking`] | ring |
//! | `HBDonor` / `HBAcceptor` | [`hbond::HBond`] | donor / acceptor |
//! | `XBDonor` / `XBAcceptor` | [`xbond::XBond`] | donor / acceptor |
//! | `MetalDonor` / `MetalAcceptor` | [`distance::Distance`] | metal / ligand |
//! | `VdWContact` | [`vdw::VdwContact`] | any atom |

pub mod cation_pi;
pub mod distance;
pub mod hbond;
pub mod pi_stacking;
pub mod ring;
pub mod vdw;
pub mod xbond;

use super::config::{ConfigError, merge_params};
use super::interaction::{Interaction, Orientation};
use super::registry::{ConflictPolicy, InteractionRegistry, RegistryError};
use cation_pi::{CationPi, CationPiParams};
use distance::{Distance, DistanceParams};
use hbond::{HBond, HBondParams};
use pi_stacking::{PiStacking, PiStackingParams};
use serde::Serialize;
use serde::de::DeserializeOwned;
use vdw::{VdwContact, VdwContactParams};
use xbond::{XBond, XBondParams};

/// Wraps a defaults constructor and a detector constructor into a registry
/// factory.
///
/// The default detector is built once, here, and cloned for every creation
/// without overrides; clones share its compiled patterns. Overrides are merged
/// over the defaults and build a new detector.
fn factory<P, I>(
    defaults: fn() -> P,
    build: impl Fn(P) -> Result<I, ConfigError> + Send + Sync + 'static,
) -> Result<
    impl Fn(Option<&toml::Table>) -> Result<Box<dyn Interaction>, ConfigError> + Send + Sync + 'static,
    ConfigError,
>
where
    P: Serialize + DeserializeOwned + 'static,
    I: Interaction + Clone + Sync + 'static,
{
    let prototype = build(defaults())?;
    Ok(
        move |overrides: Option<&toml::Table>| -> Result<Box<dyn Interaction>, ConfigError> {
            match overrides {
                Some(table) if !table.is_empty() => {
                    let params = merge_params(defaults(), Some(table))?;
                    Ok(Box::new(build(params)?))
                }
                _ => Ok(Box::new(prototype.clone())),
            }
        },
    )
}

/// Registers every built-in interaction, replacing existing definitions.
pub fn register_builtins(registry: &mut InteractionRegistry) -> Result<(), RegistryError> {
    use Orientation::{Forward, Reverse};
    let policy = ConflictPolicy::Replace;

    registry.register(
        "Hydrophobic",
        factory(DistanceParams::hydrophobic, |p| Distance::new("Hydrophobic", p, Forward))?,
        policy,
    )?;
    registry.register(
        "Cationic",
        factory(DistanceParams::ionic, |p| Distance::new("Cationic", p, Forward))?,
        policy,
    )?;
    registry.register(
        "Anionic",
        factory(DistanceParams::ionic, |p| Distance::new("Anionic", p, Reverse))?,
        policy,
    )?;
    registry.register(
        "CationPi",
        factory(CationPiParams::default, |p| CationPi::new("CationPi", p, Forward))?,
        policy,
    )?;
    registry.register(
        "PiCation",
        factory(CationPiParams::default, |p| CationPi::new("PiCation", p, Reverse))?,
        policy,
    )?;
    registry.register(
        "FaceToFace",
        factory(PiStackingParams::face_to_face, |p| PiStacking::new("FaceToFace", p))?,
        policy,
    )?;
    registry.register(
        "EdgeToFace",
        factory(PiStackingParams::edge_to_face, |p| PiStacking::new("EdgeToFace", p))?,
        policy,
    )?;
    registry.register(
        "PiStacking",
        factory(PiStackingParams::default, |p| PiStacking::new("PiStacking", p))?,
        policy,
    )?;
    registry.register(
        "HBDonor",
        factory(HBondParams::default, |p| HBond::new("HBDonor", p, Forward))?,
        policy,
    )?;
    registry.register(
        "HBAcceptor",
        factory(HBondParams::default, |p| HBond::new("HBAcceptor", p, Reverse))?,
        policy,
    )?;
    registry.register(
        "XBDonor",
        factory(XBondParams::default, |p| XBond::new("XBDonor", p, Forward))?,
        policy,
    )?;
    registry.register(
        "XBAcceptor",
        factory(XBondParams::default, |p| XBond::new("XBAcceptor", p, Reverse))?,
        policy,
    )?;
    registry.register(
        "MetalDonor",
        factory(DistanceParams::metallic, |p| Distance::new("MetalDonor", p, Forward))?,
        policy,
    )?;
    registry.register(
        "MetalAcceptor",
        factory(DistanceParams::metallic, |p| Distance::new("MetalAcceptor", p, Reverse))?,
        policy,
    )?;
    registry.register(
        "VdWContact",
        factory(VdwContactParams::default, |p| VdwContact::with_params("VdWContact", p))?,
        policy,
    )?;
    Ok(())
}
