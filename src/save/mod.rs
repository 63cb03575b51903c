//! Save/load system
//!
//! Handles saving and loading a running game.

pub mod save_game;

pub use save_game::{
    SaveData, SaveError, MapSaveData,
    to_bytes, from_bytes,
    save_to_path, load_from_path,
    save_exists, save_path, delete_save,
};
