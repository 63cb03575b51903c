//! Data loading and external game content
//!
//! This module handles loading game data from external RON files,
//! allowing for data-driven content and easy modding.

pub mod config;
pub mod loader;
pub mod templates;

pub use config::{GameConfig, LevelUpBonus, Palette};
pub use loader::{export_default_data, DataError, DataManager, DATA_DIR};
pub use templates::{ActorTemplate, ActorTemplates, ItemTemplate, ItemTemplates};
