//! RON data loader
//!
//! Loads game data from external RON files, with fallback to hardcoded defaults.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use super::config::GameConfig;
use super::templates::{
    default_actor_templates, default_item_templates, ActorTemplates, ItemTemplates,
};

/// Default location of the data files, relative to the working directory
pub const DATA_DIR: &str = "assets/data";

#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse data file: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Failed to serialize data: {0}")]
    Serialize(#[from] ron::Error),
}

/// Manages all external game data
#[derive(Debug, Clone, PartialEq)]
pub struct DataManager {
    pub config: GameConfig,
    pub actors: ActorTemplates,
    pub items: ItemTemplates,
}

impl DataManager {
    /// Create a new DataManager, loading from files or using defaults
    pub fn new() -> Self {
        Self::load_from(Path::new(DATA_DIR))
    }

    /// Load every data file under `base_path`. Missing or broken files fall
    /// back to the built-in defaults.
    pub fn load_from(base_path: &Path) -> Self {
        Self {
            config: load_or_default(base_path, "config.ron", GameConfig::default),
            actors: load_or_default(base_path, "actors.ron", default_actor_templates),
            items: load_or_default(base_path, "items.ron", default_item_templates),
        }
    }
}

impl Default for DataManager {
    fn default() -> Self {
        Self {
            config: GameConfig::default(),
            actors: default_actor_templates(),
            items: default_item_templates(),
        }
    }
}

fn load_or_default<T: DeserializeOwned>(base_path: &Path, file: &str, default: fn() -> T) -> T {
    let path = base_path.join(file);
    if !path.exists() {
        return default();
    }
    match fs::read_to_string(&path) {
        Ok(content) => match ron::from_str(&content) {
            Ok(value) => {
                log::info!("Loaded {}", path.display());
                return value;
            }
            Err(e) => log::warn!("Failed to parse {}: {}", file, e),
        },
        Err(e) => log::warn!("Failed to read {}: {}", file, e),
    }
    default()
}

fn write_ron<T: Serialize>(base_path: &Path, file: &str, value: &T) -> Result<(), DataError> {
    let text = ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())?;
    fs::write(base_path.join(file), text)?;
    Ok(())
}

/// Export all default data to RON files for easy editing
pub fn export_default_data(base_path: &Path) -> Result<(), DataError> {
    fs::create_dir_all(base_path)?;

    let defaults = DataManager::default();
    write_ron(base_path, "config.ron", &defaults.config)?;
    write_ron(base_path, "actors.ron", &defaults.actors)?;
    write_ron(base_path, "items.ron", &defaults.items)?;

    log::info!("Exported default data to {}", base_path.display());
    Ok(())
}
