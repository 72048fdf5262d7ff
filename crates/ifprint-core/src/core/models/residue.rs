use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifies the residue an atom belongs to, e.g. `ALA42.A`.
///
/// Ligands are usually a single residue such as `LIG1`. Ordering is by
/// chain, then number, then name, so that sorted residues follow the
/// sequence within each chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResidueId {
    /// Residue name (e.g., "ALA", "LIG").
    pub name: String,
    /// Residue sequence number.
    pub number: i32,
    /// Chain identifier, if any.
    pub chain: Option<String>,
}

impl ResidueId {
    pub fn new(name: &str, number: i32, chain: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            number,
            chain: chain.map(str::to_string),
        }
    }
}

impl Ord for ResidueId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.chain
            .cmp(&other.chain)
            .then(self.number.cmp(&other.number))
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for ResidueId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ResidueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.number)?;
        if let Some(chain) = &self.chain {
            write!(f, ".{chain}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid residue identifier: '{0}'")]
pub struct ParseResidueIdError(pub String);

impl FromStr for ResidueId {
    type Err = ParseResidueIdError;

    /// Parses `NAME[NUMBER][.CHAIN]`. A missing number defaults to 0.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseResidueIdError(s.to_string());
        let trimmed = s.trim();

        let (head, chain) = match trimmed.split_once('.') {
            Some((head, chain)) if !chain.is_empty() => (head, Some(chain.to_string())),
            Some(_) => return Err(invalid()),
            None => (trimmed, None),
        };

        let digits_start = head
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_digit())
            .last()
            .map(|(i, _)| i)
            .unwrap_or(head.len());
        // A minus sign directly before the digits belongs to the number.
        let number_start = match head[..digits_start].strip_suffix('-') {
            Some(rest) if digits_start < head.len() && !rest.is_empty() => digits_start - 1,
            _ => digits_start,
        };

        let name = &head[..number_start];
        if name.is_empty() || !name.chars().any(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }
        let number = match &head[number_start..] {
            "" => 0,
            digits => digits.parse::<i32>().map_err(|_| invalid())?,
        };

        Ok(Self {
            name: name.to_string(),
            number,
            chain,
        })
    }
}
