//! Procedural map generation
//!
//! The engine only sees the `DungeonGenerator` trait. Whatever a generator
//! returns is taken as already consistent.

pub mod rooms;

pub use rooms::RoomsGenerator;

use rand::rngs::StdRng;
use thiserror::Error;

use super::GameMap;
use crate::data::{DataManager, GameConfig};
use crate::ecs::Position;

/// Inputs for generating one floor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationParams {
    pub max_rooms: u32,
    pub room_min_size: i32,
    pub room_max_size: i32,
    pub map_width: i32,
    pub map_height: i32,
    pub depth: u32,
}

impl GenerationParams {
    /// Parameters for a floor at `depth` using the configured sizes
    pub fn from_config(config: &GameConfig, depth: u32) -> Self {
        Self {
            max_rooms: config.max_rooms,
            room_min_size: config.room_min_size,
            room_max_size: config.room_max_size,
            map_width: config.map_width,
            map_height: config.map_height,
            depth,
        }
    }
}

/// A freshly generated floor
#[derive(Debug)]
pub struct Generated {
    /// The floor, with monsters and items already spawned
    pub map: GameMap,
    pub player_start: Position,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid generation parameters: {0}")]
    InvalidParams(String),
    #[error("no room could be placed after {attempts} attempts")]
    NoRooms { attempts: u32 },
}

/// Produces dungeon floors
pub trait DungeonGenerator {
    fn generate(
        &mut self,
        params: &GenerationParams,
        data: &DataManager,
        rng: &mut StdRng,
    ) -> Result<Generated, GenerationError>;
}
