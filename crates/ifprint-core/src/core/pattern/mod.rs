//! # Substructure Patterns
//!
//! Compiles SMARTS queries and finds their matches inside a [`Molecule`].
//!
//! The supported subset covers what interaction definitions need: element,
//! charge, aromaticity, ring membership, degree, hydrogen count, connectivity
//! and valence primitives, the `!`, `&`, `,` and `;` operators, recursive
//! `$(...)` queries, branches, ring closures, and the `- = # : ~ @` bond
//! primitives. An unwritten bond means single or aromatic.

pub mod matcher;
pub mod smarts;

pub use smarts::PatternError;

use crate::core::models::molecule::Molecule;
use smarts::SmartsPattern;
use std::fmt;
use std::sync::Arc;

/// Target atom indices of one match, in pattern-atom order.
pub type Match = Vec<usize>;

/// A compiled query: one SMARTS string or an ordered list of alternatives.
///
/// Compiled once and shared between clones.
#[derive(Clone)]
pub struct Pattern {
    sources: Vec<String>,
    alternatives: Vec<Arc<SmartsPattern>>,
}

impl Pattern {
    pub fn new(smarts: &str) -> Result<Self, PatternError> {
        Self::compile(&[smarts])
    }

    pub fn compile<S: AsRef<str>>(smarts: &[S]) -> Result<Self, PatternError> {
        if smarts.is_empty() {
            return Err(PatternError::Empty);
        }
        let alternatives = smarts
            .iter()
            .map(|s| smarts::parse_smarts(s.as_ref()).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            sources: smarts.iter().map(|s| s.as_ref().to_string()).collect(),
            alternatives,
        })
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// All unique matches of every alternative, alternatives in declaration order.
    pub fn find_matches(&self, molecule: &Molecule) -> Vec<Match> {
        self.alternatives
            .iter()
            .flat_map(|alternative| matcher::find_all(alternative, molecule))
            .collect()
    }

    pub fn has_match(&self, molecule: &Molecule) -> bool {
        !self.find_matches(molecule).is_empty()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.sources).finish()
    }
}
