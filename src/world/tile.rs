//! Tile definitions
//!
//! Tile types, their movement and sight properties, and how they look lit,
//! remembered, or never seen.

use serde::{Deserialize, Serialize};
use crate::ecs::Rgb;

/// Glyph with foreground and background colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Graphic {
    pub glyph: char,
    pub fg: Rgb,
    pub bg: Rgb,
}

impl Graphic {
    pub const fn new(glyph: char, fg: Rgb, bg: Rgb) -> Self {
        Self { glyph, fg, bg }
    }
}

/// Drawn for tiles that were never seen
pub const SHROUD: Graphic = Graphic::new(' ', (255, 255, 255), (0, 0, 0));

/// Types of tiles in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileType {
    Floor,
    #[default]
    Wall,
    StairsDown,
}

impl TileType {
    pub fn is_walkable(&self) -> bool {
        !matches!(self, TileType::Wall)
    }

    pub fn is_transparent(&self) -> bool {
        !matches!(self, TileType::Wall)
    }

    /// Appearance while in the field of view
    pub fn lit(&self) -> Graphic {
        match self {
            TileType::Floor => Graphic::new(' ', (255, 255, 255), (200, 180, 50)),
            TileType::Wall => Graphic::new(' ', (255, 255, 255), (130, 110, 50)),
            TileType::StairsDown => Graphic::new('>', (255, 255, 255), (200, 180, 50)),
        }
    }

    /// Appearance once explored but out of sight
    pub fn dark(&self) -> Graphic {
        match self {
            TileType::Floor => Graphic::new(' ', (255, 255, 255), (50, 50, 150)),
            TileType::Wall => Graphic::new(' ', (255, 255, 255), (0, 0, 100)),
            TileType::StairsDown => Graphic::new('>', (0, 0, 100), (50, 50, 150)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TileType::Floor => "Floor",
            TileType::Wall => "Wall",
            TileType::StairsDown => "Stairs Down",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_blocks_everything() {
        assert!(!TileType::Wall.is_walkable());
        assert!(!TileType::Wall.is_transparent());
        assert!(TileType::Floor.is_walkable());
        assert!(TileType::StairsDown.is_transparent());
    }

    #[test]
    fn test_stairs_keep_glyph_when_dark() {
        assert_eq!(TileType::StairsDown.lit().glyph, '>');
        assert_eq!(TileType::StairsDown.dark().glyph, '>');
        assert_ne!(TileType::Floor.lit().bg, TileType::Floor.dark().bg);
    }
}
