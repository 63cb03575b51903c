//! Tombs of the Forgotten Kings - a turn-based terminal roguelike
//!
//! Explore procedurally generated floors, fight what lives there, and carry
//! what you find ever deeper.

pub mod combat;
pub mod data;
pub mod ecs;
pub mod game;
pub mod items;
pub mod progression;
pub mod render;
pub mod save;
pub mod ui;
pub mod world;

// Re-export commonly used types
pub use ecs::components::*;
pub use game::{Engine, LoopControl, Session};
pub use world::map::GameMap;
