//! ECS Components
//!
//! All components attached to entities living in a map's world.

use serde::{Deserialize, Serialize};

/// RGB color triple
pub type Rgb = (u8, u8, u8);

// ============================================================================
// Position & Rendering
// ============================================================================

/// Position on the map grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position shifted by a delta
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Chebyshev distance (allows diagonal)
    pub fn chebyshev_distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Straight-line distance, used for spell ranges and blast radii
    pub fn euclidean_distance(&self, other: &Position) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Draw layer. Higher layers are drawn on top of lower ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RenderOrder {
    Corpse,
    Item,
    Actor,
}

/// Visual representation of an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Renderable {
    /// Character to display
    pub glyph: char,
    /// Foreground color (RGB)
    pub fg: Rgb,
    pub order: RenderOrder,
}

impl Renderable {
    pub fn new(glyph: char, fg: Rgb) -> Self {
        Self {
            glyph,
            fg,
            order: RenderOrder::Corpse,
        }
    }

    pub fn with_order(mut self, order: RenderOrder) -> Self {
        self.order = order;
        self
    }
}

// ============================================================================
// Identity & Markers
// ============================================================================

/// Display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Marks the one actor controlled by the player
#[derive(Debug, Clone, Copy, Default)]
pub struct Player;

/// Marks an entity as blocking movement
#[derive(Debug, Clone, Copy, Default)]
pub struct BlocksMovement;

// ============================================================================
// Combat
// ============================================================================

/// Hit points and base combat stats.
///
/// `hp` never leaves `[0, max_hp]`. Equipment bonuses are not stored here;
/// see `combat::effective_power` and `combat::effective_defense`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fighter {
    pub hp: i32,
    pub max_hp: i32,
    pub base_defense: i32,
    pub base_power: i32,
}

impl Fighter {
    pub fn new(hp: i32, defense: i32, power: i32) -> Self {
        let max_hp = hp.max(1);
        Self {
            hp: max_hp,
            max_hp,
            base_defense: defense,
            base_power: power,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.hp == 0
    }

    pub fn is_full_health(&self) -> bool {
        self.hp == self.max_hp
    }

    /// Set HP, clamped to `[0, max_hp]`
    pub fn set_hp(&mut self, hp: i32) {
        self.hp = hp.clamp(0, self.max_hp);
    }

    /// Apply damage. Returns true only for the hit that brings HP to zero;
    /// hitting an already dead fighter does nothing.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if self.is_dead() || amount <= 0 {
            return false;
        }
        self.set_hp(self.hp - amount);
        self.is_dead()
    }

    /// Restore HP up to the maximum, returning the amount actually recovered
    pub fn heal(&mut self, amount: i32) -> i32 {
        if self.is_dead() || amount <= 0 {
            return 0;
        }
        let before = self.hp;
        self.set_hp(self.hp + amount);
        self.hp - before
    }
}

// ============================================================================
// AI
// ============================================================================

/// Decision strategy of a non-player actor. Corpses have no `Ai` at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ai {
    /// Chases and attacks the player when it can see them
    Hostile,
    /// Stumbles around at random, then reverts to `previous`
    Confused { turns_remaining: u32, previous: Box<Ai> },
}

impl Ai {
    pub fn confused(turns: u32, previous: Ai) -> Self {
        // Re-confusing an already confused actor restarts the timer but keeps
        // the original strategy to fall back on.
        let previous = match previous {
            Ai::Confused { previous, .. } => previous,
            other => Box::new(other),
        };
        Ai::Confused {
            turns_remaining: turns,
            previous,
        }
    }
}

// ============================================================================
// Progression
// ============================================================================

/// Experience and level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub current_level: u32,
    pub current_xp: u32,
    pub level_up_base: u32,
    pub level_up_factor: u32,
    /// XP awarded to whoever kills this actor
    pub xp_given: u32,
}

impl Level {
    pub fn new(level_up_base: u32, level_up_factor: u32, xp_given: u32) -> Self {
        Self {
            current_level: 1,
            current_xp: 0,
            level_up_base,
            level_up_factor,
            xp_given,
        }
    }

    pub fn experience_to_next_level(&self) -> u32 {
        self.level_up_base + self.current_level * self.level_up_factor
    }

    /// Add XP and return how many levels were gained
    pub fn add_xp(&mut self, amount: u32) -> u32 {
        self.current_xp = self.current_xp.saturating_add(amount);
        let mut gained = 0;
        loop {
            let needed = self.experience_to_next_level();
            if needed == 0 || self.current_xp < needed {
                break;
            }
            self.current_xp -= needed;
            self.current_level += 1;
            gained += 1;
        }
        gained
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fighter_hp_is_clamped() {
        let mut fighter = Fighter::new(10, 0, 3);
        assert_eq!(fighter.heal(5), 0);
        assert_eq!(fighter.hp, 10);

        assert!(!fighter.take_damage(4));
        assert_eq!(fighter.hp, 6);

        assert!(fighter.take_damage(100));
        assert_eq!(fighter.hp, 0);
    }

    #[test]
    fn test_second_lethal_hit_is_noop() {
        let mut fighter = Fighter::new(5, 0, 1);
        assert!(fighter.take_damage(5));
        assert!(!fighter.take_damage(5));
        assert_eq!(fighter.hp, 0);
        assert_eq!(fighter.heal(3), 0);
    }

    #[test]
    fn test_level_multiple_level_ups() {
        let mut level = Level::new(200, 150, 0);
        assert_eq!(level.experience_to_next_level(), 350);

        // 350 for level 2, then 500 for level 3, 50 left over
        assert_eq!(level.add_xp(900), 2);
        assert_eq!(level.current_level, 3);
        assert_eq!(level.current_xp, 50);
    }

    #[test]
    fn test_level_zero_threshold_does_not_loop() {
        let mut level = Level::new(0, 0, 0);
        assert_eq!(level.add_xp(10), 0);
    }

    #[test]
    fn test_confused_keeps_original_ai() {
        let once = Ai::confused(3, Ai::Hostile);
        let twice = Ai::confused(5, once);
        assert_eq!(
            twice,
            Ai::Confused { turns_remaining: 5, previous: Box::new(Ai::Hostile) }
        );
    }

    #[test]
    fn test_distances() {
        let a = Position::new(0, 0);
        let b = Position::new(3, 4);
        assert_eq!(a.chebyshev_distance(&b), 4);
        assert!((a.euclidean_distance(&b) - 5.0).abs() < f64::EPSILON);
    }
}
