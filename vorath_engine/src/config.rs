//! Runtime configuration.
//!
//! Settings come from `vorath.toml` in the data directory. A missing or
//! malformed file is not fatal: the game falls back to built-in defaults and
//! logs a warning.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Deserialize;

use crate::combatant::DEFAULT_INVENTORY_CAPACITY;
use crate::progression::FIRST_LEVEL_XP;
use crate::save_files::SAVE_DIR;

pub const CONFIG_FILE: &str = "vorath.toml";
pub const SEED_ENV: &str = "VORATH_SEED";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Distinct item stacks a hero can carry.
    pub inventory_capacity: usize,
    /// XP needed for the first level-up.
    pub first_level_xp: u32,
    pub save_dir: PathBuf,
    /// Fixed dice seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            inventory_capacity: DEFAULT_INVENTORY_CAPACITY,
            first_level_xp: FIRST_LEVEL_XP,
            save_dir: PathBuf::from(SAVE_DIR),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Replace values that would break the game with their defaults.
    pub fn sanitized(mut self) -> GameConfig {
        let defaults = GameConfig::default();
        if self.inventory_capacity == 0 {
            warn!("inventory_capacity must be positive; using {}", defaults.inventory_capacity);
            self.inventory_capacity = defaults.inventory_capacity;
        }
        if self.first_level_xp == 0 {
            warn!("first_level_xp must be positive; using {}", defaults.first_level_xp);
            self.first_level_xp = defaults.first_level_xp;
        }
        if self.save_dir.as_os_str().is_empty() {
            self.save_dir = defaults.save_dir;
        }
        self
    }

    /// Apply a seed override given as text, such as the value of [`SEED_ENV`].
    ///
    /// Unparsable values are ignored with a warning.
    pub fn with_seed_override(mut self, raw: Option<&str>) -> GameConfig {
        if let Some(raw) = raw {
            match raw.trim().parse::<u64>() {
                Ok(seed) => {
                    info!("dice seed {seed} taken from {SEED_ENV}");
                    self.seed = Some(seed);
                },
                Err(e) => warn!("ignoring {SEED_ENV}='{raw}': {e}"),
            }
        }
        self
    }
}

/// Load the configuration from `toml_path`, falling back to defaults on error.
pub fn load_config(toml_path: &Path) -> GameConfig {
    match try_load_config(toml_path) {
        Ok(config) => {
            info!("configuration loaded from '{}'", toml_path.display());
            config.sanitized()
        },
        Err(e) => {
            warn!(
                "Could not load configuration from '{}': {e:#}. Using defaults.",
                toml_path.display()
            );
            GameConfig::default()
        },
    }
}

/// Load the configuration file and apply the environment seed override.
pub fn load_runtime_config(toml_path: &Path) -> GameConfig {
    let env_seed = std::env::var(SEED_ENV).ok();
    load_config(toml_path).with_seed_override(env_seed.as_deref())
}

/// # Errors
/// Returns an error if the file cannot be read or parsed.
fn try_load_config(toml_path: &Path) -> Result<GameConfig> {
    let text =
        fs::read_to_string(toml_path).with_context(|| format!("reading configuration from '{}'", toml_path.display()))?;
    let config: GameConfig =
        toml::from_str(&text).with_context(|| format!("parsing configuration from '{}'", toml_path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = tempdir().unwrap();
        assert_eq!(load_config(&temp.path().join("absent.toml")), GameConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, "inventory_capacity = 5\nseed = 99\n").unwrap();
        let config = load_config(&path);
        assert_eq!(config.inventory_capacity, 5);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.first_level_xp, 100);
        assert_eq!(config.save_dir, PathBuf::from("saved_games"));
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, "inventory_capacity = \"lots\"").unwrap();
        assert_eq!(load_config(&path), GameConfig::default());
    }

    #[test]
    fn zero_values_are_replaced() {
        let config = GameConfig {
            inventory_capacity: 0,
            first_level_xp: 0,
            ..GameConfig::default()
        }
        .sanitized();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn seed_override() {
        let config = GameConfig::default().with_seed_override(Some(" 42 "));
        assert_eq!(config.seed, Some(42));
        let config = config.with_seed_override(Some("forty-two"));
        assert_eq!(config.seed, Some(42));
        assert_eq!(GameConfig::default().with_seed_override(None).seed, None);
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let shipped = Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join(CONFIG_FILE);
        assert_eq!(load_config(&shipped), GameConfig::default());
    }
}
