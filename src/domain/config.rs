use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for a FAQ storage root.
///
/// Loaded from `config.toml` in the root directory. A missing or invalid
/// file falls back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Whether a save prunes on-disk folders for entities that are no
    /// longer present in the in-memory model.
    prune_on_save: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prune_on_save: default_prune_on_save(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content
    /// is invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML
    /// or if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns whether saves prune orphaned folders.
    #[must_use]
    pub const fn prune_on_save(&self) -> bool {
        self.prune_on_save
    }

    /// Sets the `prune_on_save` configuration option.
    pub const fn set_prune_on_save(&mut self, value: bool) {
        self.prune_on_save = value;
    }
}

const fn default_prune_on_save() -> bool {
    true
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the
/// domain type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_prune_on_save")]
        prune_on_save: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 { prune_on_save } => Self { prune_on_save },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            prune_on_save: config.prune_on_save,
        }
    }
}
