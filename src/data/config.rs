//! Game configuration
//!
//! Map and room sizes, view radius, level-up gains and the message palette.

use serde::{Deserialize, Serialize};
use crate::ecs::Rgb;

/// Tuning values, loaded once at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen_width: u16,
    pub screen_height: u16,
    pub map_width: i32,
    pub map_height: i32,
    pub max_rooms: u32,
    pub room_min_size: i32,
    pub room_max_size: i32,
    pub fov_radius: i32,
    /// `(from_depth, count)` steps: maximum monsters per room
    pub max_monsters_by_depth: Vec<(u32, u32)>,
    /// `(from_depth, count)` steps: maximum items per room
    pub max_items_by_depth: Vec<(u32, u32)>,
    pub level_up: LevelUpBonus,
    pub palette: Palette,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 80,
            screen_height: 50,
            map_width: 80,
            map_height: 43,
            max_rooms: 30,
            room_min_size: 6,
            room_max_size: 10,
            fov_radius: 8,
            max_monsters_by_depth: vec![(1, 2), (4, 3), (6, 5)],
            max_items_by_depth: vec![(1, 1), (4, 2)],
            level_up: LevelUpBonus::default(),
            palette: Palette::default(),
        }
    }
}

/// Stats gained per level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelUpBonus {
    pub hp: i32,
    pub power: i32,
    pub defense: i32,
}

impl Default for LevelUpBonus {
    fn default() -> Self {
        Self {
            hp: 20,
            power: 1,
            defense: 1,
        }
    }
}

/// Colors for messages and interface elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub white: Rgb,
    pub black: Rgb,
    pub player_atk: Rgb,
    pub enemy_atk: Rgb,
    pub needs_target: Rgb,
    pub status_effect_applied: Rgb,
    pub descend: Rgb,
    pub player_die: Rgb,
    pub enemy_die: Rgb,
    pub invalid: Rgb,
    pub impossible: Rgb,
    pub error: Rgb,
    pub welcome_text: Rgb,
    pub health_recovered: Rgb,
    pub bar_text: Rgb,
    pub bar_filled: Rgb,
    pub bar_empty: Rgb,
    pub menu_title: Rgb,
    pub menu_text: Rgb,
    pub corpse: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            white: (0xFF, 0xFF, 0xFF),
            black: (0x00, 0x00, 0x00),
            player_atk: (0xE0, 0xE0, 0xE0),
            enemy_atk: (0xFF, 0xC0, 0xC0),
            needs_target: (0x3F, 0xFF, 0xFF),
            status_effect_applied: (0x3F, 0xFF, 0x3F),
            descend: (0x9F, 0x3F, 0xFF),
            player_die: (0xFF, 0x30, 0x30),
            enemy_die: (0xFF, 0xA0, 0x30),
            invalid: (0xFF, 0xFF, 0x00),
            impossible: (0x80, 0x80, 0x80),
            error: (0xFF, 0x40, 0x40),
            welcome_text: (0x20, 0xA0, 0xFF),
            health_recovered: (0x00, 0xFF, 0x00),
            bar_text: (0xFF, 0xFF, 0xFF),
            bar_filled: (0x00, 0x60, 0x00),
            bar_empty: (0x40, 0x10, 0x10),
            menu_title: (255, 255, 63),
            menu_text: (0xFF, 0xFF, 0xFF),
            corpse: (191, 0, 0),
        }
    }
}

/// Value of a `(from_depth, value)` step table at a depth
pub fn value_for_depth(table: &[(u32, u32)], depth: u32) -> u32 {
    table
        .iter()
        .filter(|(from, _)| *from <= depth)
        .max_by_key(|(from, _)| *from)
        .map(|(_, value)| *value)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_for_depth_steps() {
        let table = [(1, 2), (4, 3), (6, 5)];
        assert_eq!(value_for_depth(&table, 1), 2);
        assert_eq!(value_for_depth(&table, 3), 2);
        assert_eq!(value_for_depth(&table, 4), 3);
        assert_eq!(value_for_depth(&table, 20), 5);
        assert_eq!(value_for_depth(&table, 0), 0);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: GameConfig = ron::from_str("(fov_radius: 5)").unwrap();
        assert_eq!(config.fov_radius, 5);
        assert_eq!(config.map_width, 80);
        assert_eq!(config.palette, Palette::default());
    }
}
