//! World module
//!
//! Contains map data structures, tiles, field of view, and procedural generation.

pub mod fov;
pub mod generation;
pub mod map;
pub mod tile;

pub use fov::compute_fov;
pub use generation::{DungeonGenerator, GenerationError, GenerationParams, Generated, RoomsGenerator};
pub use map::GameMap;
pub use tile::{Graphic, TileType, SHROUD};
