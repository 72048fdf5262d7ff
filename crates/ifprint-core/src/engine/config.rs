use crate::core::pattern::{Pattern, PatternError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{parameter}` {reason}")]
    InvalidArgument { parameter: String, reason: String },

    #[error("Invalid SMARTS for `{parameter}`: {source}")]
    Pattern {
        parameter: String,
        source: PatternError,
    },

    #[error("Invalid parameters: {0}")]
    Parameters(#[from] toml::de::Error),

    #[error("Failed to serialize default parameters: {0}")]
    Defaults(#[from] toml::ser::Error),

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub(crate) fn invalid(parameter: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            parameter: parameter.to_string(),
            reason: reason.into(),
        }
    }
}

/// Inclusive angle range in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AngleRange {
    pub min: f64,
    pub max: f64,
}

impl AngleRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn validate(&self, parameter: &str) -> Result<(), ConfigError> {
        let in_bounds = |a: f64| (0.0..=180.0).contains(&a);
        if !in_bounds(self.min) || !in_bounds(self.max) {
            return Err(ConfigError::invalid(
                parameter,
                "angles must be between 0 and 180 degrees",
            ));
        }
        if self.min > self.max {
            return Err(ConfigError::invalid(
                parameter,
                format!("minimum {} exceeds maximum {}", self.min, self.max),
            ));
        }
        Ok(())
    }
}

pub(crate) fn validate_distance(parameter: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(parameter, "must be 0 or positive"))
    }
}

pub(crate) fn compile(parameter: &str, smarts: &[String]) -> Result<Pattern, ConfigError> {
    Pattern::compile(smarts).map_err(|source| ConfigError::Pattern {
        parameter: parameter.to_string(),
        source,
    })
}

/// Overlays user-supplied keys on an interaction's default parameters.
///
/// Keys absent from `overrides` keep their defaults, including keys of nested
/// tables such as angle ranges. Unknown keys are rejected by the parameter
/// struct's `deny_unknown_fields`.
pub fn merge_params<P>(defaults: P, overrides: Option<&toml::Table>) -> Result<P, ConfigError>
where
    P: Serialize + DeserializeOwned,
{
    let Some(overrides) = overrides else {
        return Ok(defaults);
    };
    let mut table = toml::Table::try_from(&defaults)?;
    overlay(&mut table, overrides);
    Ok(toml::Value::Table(table).try_into()?)
}

// Nested tables merge key by key; any other value replaces the default.
fn overlay(base: &mut toml::Table, overrides: &toml::Table) {
    for (key, value) in overrides {
        match (base.get_mut(key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(nested)) => {
                overlay(existing, nested)
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Which interactions a fingerprint evaluates, and with what parameters.
///
/// ```toml
/// interactions = ["Hydrophobic", "HBDonor", "VdWContact"]
///
/// [parameters.HBDonor]
/// distance = 3.7
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FingerprintConfig {
    /// Interaction names to enable; `None` enables every registered interaction.
    pub interactions: Option<Vec<String>>,
    /// Parameter overrides keyed by interaction name.
    pub parameters: BTreeMap<String, toml::Table>,
}

impl FingerprintConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    pub fn with_interactions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interactions = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_parameters(mut self, interaction: &str, parameters: toml::Table) -> Self {
        self.parameters.insert(interaction.to_string(), parameters);
        self
    }
}
