//! # ifprint
//!
//! Protein-ligand interaction fingerprints: given a ligand and a protein
//! residue as typed molecular graphs with 3D coordinates, decide which
//! non-covalent interactions they form.
//!
//! ## Architectural Philosophy
//!
//! - **[`core`]: The Foundation.** Molecular graphs, residue fragments and
//!   index mapping, SMARTS patterns and substructure matching, element data
//!   and geometric predicates.
//!
//! - **[`engine`]: The Logic Core.** The interaction detector contract, the
//!   built-in detector families, configuration, and the interaction registry.
//!
//! - **[`workflows`]: The Public API.** The [`Fingerprint`](workflows::fingerprint::Fingerprint)
//!   facade, which evaluates interactions by name and builds interaction
//!   bit vectors for a ligand and residue pair.

pub mod core;
pub mod engine;
pub mod workflows;
