//! # Core Models Module
//!
//! This module contains the typed molecular graph that every other part of the
//! library consumes: atoms with coordinates and chemical flags, bonds, residue
//! identifiers, and molecules that can be split into fragments.
//!
//! ## Overview
//!
//! Structure loading and format conversion are the job of an external layer.
//! What arrives here is already typed: each atom knows its element, position,
//! formal charge, aromaticity and ring membership. [`builder::MoleculeBuilder`]
//! is the entry point used to construct such molecules.
//!
//! ## Key Components
//!
//! - [`atom`] - Atom representation with coordinates and chemical properties
//! - [`topology`] - Bonds and bond orders
//! - [`residue`] - Residue identifiers such as `ALA42.A`
//! - [`molecule`] - The molecular graph, fragments, and parent index mapping
//! - [`builder`] - Incremental construction with validation and ring perception
//!
//! ## Usage
//!
//! ```ignore
//! use ifprint::core::models::builder::MoleculeBuilder;
//! use ifprint::core::models::topology::BondOrder;
//!
//! let mut builder = MoleculeBuilder::new();
//! builder
//!     .add_atom("O", "O", Point3::new(0.0, 0.0, 0.0))
//!     .add_atom("H1", "H", Point3::new(0.96, 0.0, 0.0))
//!     .add_bond(0, 1, BondOrder::Single);
//! let water = builder.build()?;
//! ```

pub mod atom;
pub mod builder;
pub mod molecule;
pub mod residue;
pub mod topology;
