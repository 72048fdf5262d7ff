//! # Engine Module
//!
//! Interaction detection: the detector contract, the built-in geometric
//! families, and the registry that maps names to detector factories.
//!
//! ## Architecture
//!
//! - **Detector Contract** ([`interaction`]) - The [`Interaction`](interaction::Interaction) trait, roles, and hit records
//! - **Built-in Families** ([`interactions`]) - Distance, cation-pi, pi-stacking, hydrogen bond, halogen bond, and van der Waals detectors
//! - **Registry** ([`registry`]) - Named factories with explicit conflict handling
//! - **Configuration** ([`config`]) - Parameter validation, overrides, and fingerprint configuration files
//! - **Caching** ([`cache`]) - Per-detector memoization of element-pair contact limits
//!
//! Detection takes `&mut self` because detectors may own caches; a detector is
//! never shared between threads without each thread owning its own instance.

pub mod cache;
pub mod config;
pub mod interaction;
pub mod interactions;
pub mod registry;
