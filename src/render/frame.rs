//! Frame description
//!
//! Everything one frame of the main game view shows, computed from the engine
//! without touching the terminal.

use hecs::Entity;

use crate::ecs::{Name, Position, RenderOrder, Renderable, Rgb};
use crate::game::engine::Engine;
use crate::game::message_log::render_lines;
use crate::world::{Graphic, SHROUD};

/// Width of the health bar in cells
pub const BAR_WIDTH: u16 = 20;
/// Top-left of the health bar
pub const BAR_ORIGIN: (u16, u16) = (0, 45);
/// Top-left of the message pane
pub const LOG_ORIGIN: (u16, u16) = (21, 45);
pub const LOG_WIDTH: u16 = 40;
pub const LOG_HEIGHT: u16 = 5;
pub const DEPTH_ORIGIN: (u16, u16) = (0, 47);
/// Where the names under the mouse are printed
pub const NAMES_ORIGIN: (u16, u16) = (21, 44);

/// An entity glyph to draw over its tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityGlyph {
    pub position: Position,
    pub glyph: char,
    pub fg: Rgb,
    pub order: RenderOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthBar {
    pub current: i32,
    pub maximum: i32,
}

impl HealthBar {
    /// Number of filled cells out of `BAR_WIDTH`
    pub fn filled(&self) -> u16 {
        if self.maximum <= 0 {
            return 0;
        }
        let current = self.current.clamp(0, self.maximum) as i64;
        (current * BAR_WIDTH as i64 / self.maximum as i64) as u16
    }
}

/// One frame of the main game view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRequest {
    pub map_width: i32,
    pub map_height: i32,
    /// Row-major, one per map tile
    pub tiles: Vec<Graphic>,
    /// Visible entities, corpses first and actors last
    pub entities: Vec<EntityGlyph>,
    pub health: HealthBar,
    pub depth: u32,
    /// Message pane rows, top to bottom
    pub messages: Vec<(String, Rgb)>,
    /// Names of what is under the mouse, empty when nothing
    pub names_at_mouse: String,
}

/// Describe the main game view for the engine's current state
pub fn build_draw_request(engine: &Engine, mouse: Option<Position>) -> DrawRequest {
    let map = engine.map();

    let mut tiles = Vec::with_capacity(map.tiles.len());
    for (idx, tile) in map.tiles.iter().enumerate() {
        let graphic = if map.visible[idx] {
            tile.lit()
        } else if map.explored[idx] {
            tile.dark()
        } else {
            SHROUD
        };
        tiles.push(graphic);
    }

    let mut drawn: Vec<(Entity, EntityGlyph)> = map
        .world
        .query::<(&Position, &Renderable)>()
        .iter()
        .filter(|(_, (pos, _))| map.is_visible(pos.x, pos.y))
        .map(|(entity, (pos, renderable))| {
            let glyph = EntityGlyph {
                position: *pos,
                glyph: renderable.glyph,
                fg: renderable.fg,
                order: renderable.order,
            };
            (entity, glyph)
        })
        .collect();
    drawn.sort_by_key(|(entity, glyph)| (glyph.order, entity.id()));

    let health = engine
        .player_fighter()
        .map(|f| HealthBar { current: f.hp, maximum: f.max_hp })
        .unwrap_or(HealthBar { current: 0, maximum: 0 });

    DrawRequest {
        map_width: map.width,
        map_height: map.height,
        tiles,
        entities: drawn.into_iter().map(|(_, glyph)| glyph).collect(),
        health,
        depth: engine.depth(),
        messages: render_lines(engine.log().messages(), LOG_WIDTH as usize, LOG_HEIGHT as usize),
        names_at_mouse: mouse.map(|pos| names_at(engine, pos)).unwrap_or_default(),
    }
}

/// Comma separated names of the visible entities on a tile
pub fn names_at(engine: &Engine, pos: Position) -> String {
    let map = engine.map();
    if !map.in_bounds(pos.x, pos.y) || !map.is_visible(pos.x, pos.y) {
        return String::new();
    }

    let mut found: Vec<(Entity, String)> = map
        .world
        .query::<(&Position, &Name)>()
        .iter()
        .filter(|(_, (p, _))| **p == pos)
        .map(|(entity, (_, name))| (entity, name.0.clone()))
        .collect();
    found.sort_by_key(|(entity, _)| entity.id());

    let joined = found.into_iter().map(|(_, name)| name).collect::<Vec<_>>().join(", ");
    capitalize(&joined)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::engine::testing::*;

    #[test]
    fn test_tiles_follow_visibility() {
        let mut engine = arena(30, 12);
        let start = engine.player_position().unwrap();
        // Far corner is outside the view radius and never seen
        let far = engine.map.xy_to_idx(28, 1);
        engine.map.explored[far] = false;
        let request = build_draw_request(&engine, None);

        let here = engine.map.xy_to_idx(start.x, start.y);
        assert_eq!(request.tiles[here], engine.map.tiles[here].lit());
        assert_eq!(request.tiles[far], SHROUD);

        engine.map.explored[far] = true;
        let request = build_draw_request(&engine, None);
        assert_eq!(request.tiles[far], engine.map.tiles[far].dark());
    }

    #[test]
    fn test_entities_sorted_by_render_order() {
        let mut engine = arena(12, 12);
        let start = engine.player_position().unwrap();
        let goblin = spawn_monster(&mut engine, "goblin", start.offset(1, 0));
        spawn_item(&mut engine, "healing_potion", Some(start.offset(0, 1)));
        let palette = engine.palette().clone();
        crate::combat::kill(&mut engine.map.world, goblin, &palette).unwrap();

        let request = build_draw_request(&engine, None);
        let orders: Vec<RenderOrder> = request.entities.iter().map(|e| e.order).collect();
        assert_eq!(orders, vec![RenderOrder::Corpse, RenderOrder::Item, RenderOrder::Actor]);
        assert_eq!(request.entities[2].glyph, '@');
    }

    #[test]
    fn test_health_bar_and_names() {
        let mut engine = arena(12, 12);
        let player = engine.player;
        let start = engine.player_position().unwrap();
        spawn_monster(&mut engine, "goblin", start.offset(1, 0));
        engine.map.world.get::<&mut crate::ecs::Fighter>(player).unwrap().set_hp(15);

        let request = build_draw_request(&engine, Some(start.offset(1, 0)));
        assert_eq!(request.health, HealthBar { current: 15, maximum: 30 });
        assert_eq!(request.health.filled(), 10);
        assert_eq!(request.names_at_mouse, "Goblin");
        assert_eq!(request.depth, 1);

        let nobody = build_draw_request(&engine, Some(start.offset(-1, 0)));
        assert_eq!(nobody.names_at_mouse, "");
    }
}
