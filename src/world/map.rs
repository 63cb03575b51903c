//! Map data structure
//!
//! The 2D grid of one dungeon floor together with the world of entities on it.

use std::fmt;

use hecs::{Entity, World};

use super::tile::TileType;
use crate::ecs::{BlocksMovement, Fighter, Position};
use crate::items::Item;

/// Largest width or height a floor may have
pub const MAX_MAP_SIDE: i32 = 1024;

/// A dungeon floor and everything on it
pub struct GameMap {
    pub width: i32,
    pub height: i32,
    /// Dungeon depth, starting at 1
    pub depth: u32,
    pub tiles: Vec<TileType>,
    /// Tiles in the player's field of view this turn
    pub visible: Vec<bool>,
    /// Tiles ever seen. Never cleared.
    pub explored: Vec<bool>,
    /// Stairs down, if the floor has any
    pub stairs: Option<Position>,
    /// Where an arriving player is placed
    pub entry: Position,
    pub world: World,
}

impl GameMap {
    /// Number of tiles in a `width` x `height` floor, or `None` when either
    /// side is outside `1..=MAX_MAP_SIDE`
    pub fn tile_count(width: i32, height: i32) -> Option<usize> {
        let side = |n: i32| (1..=MAX_MAP_SIDE).contains(&n).then_some(n as usize);
        side(width)?.checked_mul(side(height)?)
    }

    /// Create a new map filled with walls. Unusable dimensions give an empty map.
    pub fn new(width: i32, height: i32, depth: u32) -> Self {
        let (width, height, size) = match Self::tile_count(width, height) {
            Some(size) => (width, height, size),
            None => (0, 0, 0),
        };
        Self {
            width,
            height,
            depth,
            tiles: vec![TileType::Wall; size],
            visible: vec![false; size],
            explored: vec![false; size],
            stairs: None,
            entry: Position::new(0, 0),
            world: World::new(),
        }
    }

    /// Walled rectangle with an open floor inside
    pub fn open_arena(width: i32, height: i32, depth: u32) -> Self {
        let mut map = Self::new(width, height, depth);
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                map.set_tile(x, y, TileType::Floor);
            }
        }
        map.entry = Position::new(width / 2, height / 2);
        map
    }

    /// Convert 2D coordinates to 1D index
    #[inline]
    pub fn xy_to_idx(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y).then(|| self.xy_to_idx(x, y))
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<TileType> {
        self.index(x, y).map(|idx| self.tiles[idx])
    }

    /// Set tile type at position
    pub fn set_tile(&mut self, x: i32, y: i32, tile_type: TileType) {
        if let Some(idx) = self.index(x, y) {
            self.tiles[idx] = tile_type;
        }
    }

    /// Check if a position is walkable
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).map_or(false, |t| t.is_walkable())
    }

    /// Check if a position blocks line of sight
    pub fn is_opaque(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).map_or(true, |t| !t.is_transparent())
    }

    pub fn is_visible(&self, x: i32, y: i32) -> bool {
        self.index(x, y).map_or(false, |idx| self.visible[idx])
    }

    pub fn is_explored(&self, x: i32, y: i32) -> bool {
        self.index(x, y).map_or(false, |idx| self.explored[idx])
    }

    /// Replace the visible set and fold it into the explored set
    pub fn replace_visible(&mut self, visible: Vec<bool>) {
        debug_assert_eq!(visible.len(), self.tiles.len());
        for (explored, &seen) in self.explored.iter_mut().zip(&visible) {
            *explored |= seen;
        }
        self.visible = visible;
    }

    /// First entity at a position that blocks movement
    pub fn blocking_entity_at(&self, pos: Position) -> Option<Entity> {
        self.world
            .query::<(&Position, &BlocksMovement)>()
            .iter()
            .filter(|(_, (p, _))| **p == pos)
            .map(|(entity, _)| entity)
            .min_by_key(|e| e.id())
    }

    /// Living actor standing at a position
    pub fn actor_at(&self, pos: Position) -> Option<Entity> {
        self.world
            .query::<(&Position, &Fighter)>()
            .iter()
            .filter(|(_, (p, fighter))| **p == pos && !fighter.is_dead())
            .map(|(entity, _)| entity)
            .min_by_key(|e| e.id())
    }

    /// Items lying on a tile, oldest first
    pub fn items_at(&self, pos: Position) -> Vec<Entity> {
        let mut items: Vec<Entity> = self
            .world
            .query::<(&Position, &Item)>()
            .iter()
            .filter(|(_, (p, _))| **p == pos)
            .map(|(entity, _)| entity)
            .collect();
        items.sort_by_key(|e| e.id());
        items
    }

    /// Every living actor on the map, ordered by entity id
    pub fn living_actors(&self) -> Vec<Entity> {
        let mut actors: Vec<Entity> = self
            .world
            .query::<&Fighter>()
            .iter()
            .filter(|(_, fighter)| !fighter.is_dead())
            .map(|(entity, _)| entity)
            .collect();
        actors.sort_by_key(|e| e.id());
        actors
    }

    /// Position of an entity, if it is on the map
    pub fn position_of(&self, entity: Entity) -> Option<Position> {
        self.world.get::<&Position>(entity).ok().map(|p| *p)
    }
}

impl fmt::Debug for GameMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameMap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("depth", &self.depth)
            .field("stairs", &self.stairs)
            .field("entry", &self.entry)
            .field("entities", &self.world.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Name;

    #[test]
    fn test_open_arena_has_walled_border() {
        let map = GameMap::open_arena(10, 8, 1);
        assert!(!map.is_walkable(0, 0));
        assert!(!map.is_walkable(9, 4));
        assert!(map.is_walkable(1, 1));
        assert!(!map.is_walkable(-1, 3));
        assert!(map.is_opaque(20, 20));
    }

    #[test]
    fn test_oversized_map_is_empty() {
        assert_eq!(GameMap::tile_count(80, 43), Some(80 * 43));
        assert_eq!(GameMap::tile_count(65536, 65536), None);
        assert_eq!(GameMap::tile_count(0, 10), None);
        assert_eq!(GameMap::tile_count(-4, 10), None);

        let map = GameMap::new(65536, 65536, 1);
        assert!(map.tiles.is_empty());
        assert!(!map.in_bounds(0, 0));
    }

    #[test]
    fn test_explored_is_monotonic() {
        let mut map = GameMap::open_arena(4, 4, 1);
        let mut first = vec![false; 16];
        first[5] = true;
        map.replace_visible(first);
        assert!(map.is_visible(1, 1));

        map.replace_visible(vec![false; 16]);
        assert!(!map.is_visible(1, 1));
        assert!(map.is_explored(1, 1));
    }

    #[test]
    fn test_actor_at_ignores_corpses() {
        let mut map = GameMap::open_arena(6, 6, 1);
        let pos = Position::new(2, 2);
        let mut dead = Fighter::new(5, 0, 1);
        dead.set_hp(0);
        map.world.spawn((pos, dead, Name::new("remains of Goblin")));
        assert_eq!(map.actor_at(pos), None);

        let goblin = map.world.spawn((pos, Fighter::new(10, 0, 3), BlocksMovement));
        assert_eq!(map.actor_at(pos), Some(goblin));
        assert_eq!(map.blocking_entity_at(pos), Some(goblin));
    }

    #[test]
    fn test_items_at_in_spawn_order() {
        let mut map = GameMap::open_arena(6, 6, 1);
        let pos = Position::new(3, 3);
        let first = map.world.spawn((pos, Item));
        let second = map.world.spawn((pos, Item));
        map.world.spawn((Position::new(1, 1), Item));
        assert_eq!(map.items_at(pos), vec![first, second]);
    }
}
