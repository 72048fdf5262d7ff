//! # Core Module
//!
//! Stateless building blocks shared by every detector.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Typed molecular graphs, fragments, and index mapping
//! - **Substructure Patterns** ([`pattern`]) - SMARTS compilation and subgraph matching
//! - **Utilities** ([`utils`]) - Element tables and geometric predicates
//!
//! Nothing in this layer holds mutable state; molecules and compiled patterns
//! are immutable once built and can be shared freely.

pub mod models;
pub mod pattern;
pub mod utils;
