use super::config::ConfigError;
use super::interaction::Interaction;
use super::interactions;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Builds a detector from optional parameter overrides.
pub type InteractionFactory = Arc<
    dyn Fn(Option<&toml::Table>) -> Result<Box<dyn Interaction>, ConfigError> + Send + Sync,
>;

/// Abstract bases every registry holds; never listed or instantiable.
pub const RESERVED_NAMES: [&str; 2] = ["Interaction", "_Distance"];

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Interaction `{0}` is already registered")]
    AlreadyRegistered(String),

    #[error("`{0}` is a reserved interaction name")]
    Reserved(String),

    #[error("Unknown interaction `{0}`")]
    Unknown(String),

    #[error("Can't instantiate abstract interaction `{name}`")]
    AbstractInteraction { name: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// What to do when registering a name that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Replace the previous definition and log a warning.
    #[default]
    Warn,
    /// Refuse the registration.
    Error,
    /// Replace the previous definition silently.
    Replace,
}

/// Outcome of a successful registration.
pub enum Registration {
    Added,
    /// The name was already taken. `previous` is the replaced factory, or
    /// `None` if the name was an abstract entry.
    Superseded {
        previous: Option<InteractionFactory>,
    },
}

impl Registration {
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded { .. })
    }
}

#[derive(Clone)]
enum RegistryEntry {
    Concrete(InteractionFactory),
    Abstract,
}

/// Name to detector-factory table, kept in registration order.
///
/// The registry is an ordinary owned value: build one, register into it, and
/// hand it to a [`Fingerprint`](crate::workflows::fingerprint::Fingerprint).
#[derive(Clone)]
pub struct InteractionRegistry {
    entries: HashMap<String, RegistryEntry>,
    order: Vec<String>,
}

impl Default for InteractionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionRegistry {
    /// A registry holding only the reserved abstract bases.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: HashMap::new(),
            order: Vec::new(),
        };
        for name in RESERVED_NAMES {
            registry.insert(name, RegistryEntry::Abstract);
        }
        registry
    }

    /// A registry with every built-in interaction.
    pub fn with_builtins() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        interactions::register_builtins(&mut registry)?;
        Ok(registry)
    }

    pub fn register<F>(
        &mut self,
        name: &str,
        factory: F,
        on_conflict: ConflictPolicy,
    ) -> Result<Registration, RegistryError>
    where
        F: Fn(Option<&toml::Table>) -> Result<Box<dyn Interaction>, ConfigError>
            + Send
            + Sync
            + 'static,
    {
        self.register_factory(name, Arc::new(factory), on_conflict)
    }

    pub fn register_factory(
        &mut self,
        name: &str,
        factory: InteractionFactory,
        on_conflict: ConflictPolicy,
    ) -> Result<Registration, RegistryError> {
        if is_reserved(name) {
            return Err(RegistryError::Reserved(name.to_string()));
        }
        let Some(existing) = self.entries.get(name) else {
            self.insert(name, RegistryEntry::Concrete(factory));
            debug!(interaction = name, "Registered interaction.");
            return Ok(Registration::Added);
        };

        let previous = match existing {
            RegistryEntry::Concrete(previous) => Some(Arc::clone(previous)),
            RegistryEntry::Abstract => None,
        };
        match on_conflict {
            ConflictPolicy::Error => return Err(RegistryError::AlreadyRegistered(name.to_string())),
            ConflictPolicy::Warn => {
                warn!("The `{name}` interaction has been superseded by a new definition");
            }
            ConflictPolicy::Replace => {
                debug!(interaction = name, "Replaced interaction definition.");
            }
        }
        self.entries
            .insert(name.to_string(), RegistryEntry::Concrete(factory));
        Ok(Registration::Superseded { previous })
    }

    /// Records a non-instantiable base under `name`.
    pub fn register_abstract(&mut self, name: &str) -> Result<(), RegistryError> {
        match self.entries.get(name) {
            Some(RegistryEntry::Abstract) => Ok(()),
            Some(RegistryEntry::Concrete(_)) => {
                Err(RegistryError::AlreadyRegistered(name.to_string()))
            }
            None => {
                self.insert(name, RegistryEntry::Abstract);
                Ok(())
            }
        }
    }

    pub fn create(
        &self,
        name: &str,
        params: Option<&toml::Table>,
    ) -> Result<Box<dyn Interaction>, RegistryError> {
        match self.entries.get(name) {
            Some(RegistryEntry::Concrete(factory)) => Ok(factory(params)?),
            Some(RegistryEntry::Abstract) => Err(RegistryError::AbstractInteraction {
                name: name.to_string(),
            }),
            None => Err(RegistryError::Unknown(name.to_string())),
        }
    }

    /// The factory registered under `name`; `None` for unknown and abstract names.
    pub fn get(&self, name: &str) -> Option<InteractionFactory> {
        match self.entries.get(name)? {
            RegistryEntry::Concrete(factory) => Some(Arc::clone(factory)),
            RegistryEntry::Abstract => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn is_abstract(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(RegistryEntry::Abstract))
    }

    /// Concrete interaction names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter(|name| matches!(self.entries.get(name.as_str()), Some(RegistryEntry::Concrete(_))))
            .map(String::as_str)
            .collect()
    }

    /// Resolves `name` to its registered spelling, ignoring ASCII case.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        if let Some((key, _)) = self.entries.get_key_value(name) {
            return Some(key.as_str());
        }
        self.order
            .iter()
            .find(|registered| registered.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }

    fn insert(&mut self, name: &str, entry: RegistryEntry) {
        self.entries.insert(name.to_string(), entry);
        self.order.push(name.to_string());
    }
}

fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

impl fmt::Debug for InteractionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionRegistry")
            .field("interactions", &self.names())
            .finish()
    }
}
