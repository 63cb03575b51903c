//! Room and corridor dungeon generator
//!
//! Classic roguelike dungeon with rectangular rooms connected by corridors.

use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::rngs::StdRng;
use rand::Rng;

use super::{DungeonGenerator, GenerationError, GenerationParams, Generated};
use crate::data::config::value_for_depth;
use crate::data::DataManager;
use crate::ecs::Position;
use crate::world::{GameMap, TileType};

/// A rectangular room
#[derive(Debug, Clone)]
struct Room {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
}

impl Room {
    fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    fn center(&self) -> Position {
        Position::new((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    fn intersects(&self, other: &Room) -> bool {
        self.x1 <= other.x2 && self.x2 >= other.x1 && self.y1 <= other.y2 && self.y2 >= other.y1
    }

    fn random_inner(&self, rng: &mut StdRng) -> Position {
        Position::new(rng.gen_range(self.x1 + 1..self.x2), rng.gen_range(self.y1 + 1..self.y2))
    }
}

/// Rooms joined in creation order by L-shaped tunnels, stairs in the last room
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomsGenerator;

impl DungeonGenerator for RoomsGenerator {
    fn generate(
        &mut self,
        params: &GenerationParams,
        data: &DataManager,
        rng: &mut StdRng,
    ) -> Result<Generated, GenerationError> {
        validate(params)?;

        let mut map = GameMap::new(params.map_width, params.map_height, params.depth);
        let mut rooms: Vec<Room> = Vec::new();

        for _ in 0..params.max_rooms {
            let w = rng.gen_range(params.room_min_size..=params.room_max_size);
            let h = rng.gen_range(params.room_min_size..=params.room_max_size);
            let x = rng.gen_range(0..params.map_width - w);
            let y = rng.gen_range(0..params.map_height - h);

            let new_room = Room::new(x, y, w, h);
            if rooms.iter().any(|r| new_room.intersects(r)) {
                continue;
            }

            carve_room(&mut map, &new_room);

            if let Some(prev) = rooms.last() {
                carve_tunnel(&mut map, prev.center(), new_room.center(), rng.gen_bool(0.5));
            }

            rooms.push(new_room);
        }

        let (first, last) = match (rooms.first(), rooms.last()) {
            (Some(first), Some(last)) => (first.clone(), last.clone()),
            _ => return Err(GenerationError::NoRooms { attempts: params.max_rooms }),
        };

        let player_start = first.center();
        map.entry = player_start;

        let stairs = last.center();
        map.set_tile(stairs.x, stairs.y, TileType::StairsDown);
        map.stairs = Some(stairs);

        for room in &rooms {
            place_entities(&mut map, room, data, player_start, rng);
        }

        log::info!(
            "Generated depth {} with {} rooms, {} entities",
            params.depth,
            rooms.len(),
            map.world.len()
        );

        Ok(Generated { map, player_start })
    }
}

fn validate(params: &GenerationParams) -> Result<(), GenerationError> {
    if params.room_min_size < 3 || params.room_min_size > params.room_max_size {
        return Err(GenerationError::InvalidParams(format!(
            "room sizes {}..={} are not usable",
            params.room_min_size, params.room_max_size
        )));
    }
    if params.map_width <= params.room_max_size || params.map_height <= params.room_max_size {
        return Err(GenerationError::InvalidParams(format!(
            "map {}x{} cannot hold rooms of size {}",
            params.map_width, params.map_height, params.room_max_size
        )));
    }
    Ok(())
}

/// Carve out a room
fn carve_room(map: &mut GameMap, room: &Room) {
    for y in room.y1 + 1..room.y2 {
        for x in room.x1 + 1..room.x2 {
            map.set_tile(x, y, TileType::Floor);
        }
    }
}

/// Carve an L-shaped tunnel between two points
fn carve_tunnel(map: &mut GameMap, from: Position, to: Position, horizontal_first: bool) {
    let corner = if horizontal_first {
        Position::new(to.x, from.y)
    } else {
        Position::new(from.x, to.y)
    };
    carve_line(map, from, corner);
    carve_line(map, corner, to);
}

fn carve_line(map: &mut GameMap, a: Position, b: Position) {
    let (x1, x2) = (a.x.min(b.x), a.x.max(b.x));
    let (y1, y2) = (a.y.min(b.y), a.y.max(b.y));
    for y in y1..=y2 {
        for x in x1..=x2 {
            map.set_tile(x, y, TileType::Floor);
        }
    }
}

/// Populate a room with monsters and items weighted for the map's depth
fn place_entities(
    map: &mut GameMap,
    room: &Room,
    data: &DataManager,
    player_start: Position,
    rng: &mut StdRng,
) {
    let depth = map.depth;
    let max_monsters = value_for_depth(&data.config.max_monsters_by_depth, depth);
    let max_items = value_for_depth(&data.config.max_items_by_depth, depth);

    let monsters = data.actors.weighted_for_depth(depth);
    if let Ok(dist) = WeightedIndex::new(monsters.iter().map(|(_, w)| *w)) {
        for _ in 0..rng.gen_range(0..=max_monsters) {
            let pos = room.random_inner(rng);
            if pos == player_start || map.blocking_entity_at(pos).is_some() {
                continue;
            }
            let (template, _) = monsters[dist.sample(rng)];
            template.spawn(&mut map.world, pos);
        }
    }

    let items = data.items.weighted_for_depth(depth);
    if let Ok(dist) = WeightedIndex::new(items.iter().map(|(_, w)| *w)) {
        for _ in 0..rng.gen_range(0..=max_items) {
            let pos = room.random_inner(rng);
            let (template, _) = items[dist.sample(rng)];
            template.spawn(&mut map.world, Some(pos));
        }
    }
}
