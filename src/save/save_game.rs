//! Game save/load system
//!
//! Writes a running session to disk as JSON and rebuilds it again.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use hecs::Entity;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::DataManager;
use crate::ecs::{capture, restore, EntityRecord, Position, SnapshotError};
use crate::game::{Engine, MessageLog, Session};
use crate::ui::handlers::{Handler, HandlerContext};
use crate::world::{DungeonGenerator, GameMap, TileType};

/// Save file version for compatibility checking
const SAVE_VERSION: u32 = 1;

const SAVE_FILE: &str = "savegame.json";

/// Complete save data structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub map: MapSaveData,
    /// Every entity on the floor
    pub entities: Vec<EntityRecord>,
    /// Index of the player in `entities`
    pub player: usize,
    pub log: MessageLog,
    #[serde(default)]
    pub handler: HandlerContext,
    pub seed: u64,
    pub turn: u64,
}

/// Map save data. Visibility is recomputed on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapSaveData {
    pub width: i32,
    pub height: i32,
    pub depth: u32,
    pub tiles: Vec<TileType>,
    pub explored: Vec<bool>,
    pub stairs: Option<Position>,
    pub entry: Position,
}

/// Save error types
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("Invalid save data: {0}")]
    InvalidData(String),
    #[error("Invalid save data: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Get the save directory path
pub fn save_directory() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "tombs", "Tombs") {
        let mut path = proj_dirs.data_local_dir().to_path_buf();
        path.push("saves");
        path
    } else {
        // Fallback to current directory
        PathBuf::from("./saves")
    }
}

pub fn save_path() -> PathBuf {
    save_directory().join(SAVE_FILE)
}

pub fn save_exists(path: &Path) -> bool {
    path.is_file()
}

/// Gather everything needed to rebuild `session`
pub fn extract_save_data(session: &Session) -> Result<SaveData, SaveError> {
    let engine = session.engine();
    let map = engine.map();

    let mut entities: Vec<Entity> = map.world.iter().map(|e| e.entity()).collect();
    entities.sort_by_key(|e| e.id());
    let player = entities
        .iter()
        .position(|&e| e == engine.player())
        .ok_or_else(|| SaveError::InvalidData("No player entity".to_string()))?;

    Ok(SaveData {
        version: SAVE_VERSION,
        map: MapSaveData {
            width: map.width,
            height: map.height,
            depth: map.depth,
            tiles: map.tiles.clone(),
            explored: map.explored.clone(),
            stairs: map.stairs,
            entry: map.entry,
        },
        entities: capture(&map.world, &entities)?,
        player,
        log: engine.log().clone(),
        handler: session.handler().context(),
        seed: engine.seed(),
        turn: engine.turn(),
    })
}

pub fn to_bytes(session: &Session) -> Result<Vec<u8>, SaveError> {
    let save_data = extract_save_data(session)?;
    Ok(serde_json::to_vec_pretty(&save_data)?)
}

/// Rebuild a session from bytes written by `to_bytes`
pub fn from_bytes(
    bytes: &[u8],
    data: Arc<DataManager>,
    generator: Box<dyn DungeonGenerator>,
) -> Result<Session, SaveError> {
    let save: SaveData = serde_json::from_slice(bytes)?;

    // Version check
    if save.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save.version,
        });
    }

    apply_save_data(save, data, generator)
}

fn apply_save_data(
    save: SaveData,
    data: Arc<DataManager>,
    generator: Box<dyn DungeonGenerator>,
) -> Result<Session, SaveError> {
    let MapSaveData { width, height, depth, tiles, explored, stairs, entry } = save.map;
    let size = GameMap::tile_count(width, height)
        .ok_or_else(|| SaveError::InvalidData(format!("map size {}x{}", width, height)))?;
    if tiles.len() != size || explored.len() != size {
        return Err(SaveError::InvalidData("tile count does not match map size".to_string()));
    }
    if save.player >= save.entities.len() {
        return Err(SaveError::InvalidData("player index out of range".to_string()));
    }

    let mut map = GameMap::new(width, height, depth);
    map.tiles = tiles;
    map.explored = explored;
    map.stairs = stairs;
    map.entry = entry;

    let spawned = restore(&mut map.world, &save.entities)?;
    let player = spawned[save.player];

    let mut engine = Engine::from_parts(map, player, save.log, data, generator, save.seed, save.turn)
        .map_err(|e| SaveError::InvalidData(e.to_string()))?;
    engine.update_fov();

    let handler = Handler::from_context(save.handler, &engine);
    Ok(Session::with_handler(engine, handler))
}

/// Write `session` to `path`, creating parent directories
pub fn save_to_path(session: &Session, path: &Path) -> Result<(), SaveError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, to_bytes(session)?)?;
    Ok(())
}

pub fn load_from_path(
    path: &Path,
    data: Arc<DataManager>,
    generator: Box<dyn DungeonGenerator>,
) -> Result<Session, SaveError> {
    let bytes = fs::read(path)?;
    from_bytes(&bytes, data, generator)
}

/// Delete the save file, if any
pub fn delete_save(path: &Path) -> Result<(), SaveError> {
    if save_exists(path) {
        fs::remove_file(path)?;
        log::info!("Deleted save {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Fighter, Name};
    use crate::game::engine::testing::*;
    use crate::items::{Equipment, EquipmentType, Inventory};
    use crate::ui::handlers::HistoryViewer;
    use crate::world::RoomsGenerator;

    fn reload(bytes: &[u8]) -> Result<Session, SaveError> {
        from_bytes(bytes, Arc::new(DataManager::default()), Box::new(RoomsGenerator))
    }

    #[test]
    fn test_session_survives_save_and_load() {
        let mut engine = arena(14, 10);
        let player = engine.player();
        let start = engine.player_position().unwrap();
        spawn_monster(&mut engine, "goblin", start.offset(2, 0));
        give_item(&mut engine, "healing_potion");
        let sword = give_item(&mut engine, "sword");
        engine.map.world.get::<&mut Inventory>(player).unwrap().remove(sword);
        engine
            .map
            .world
            .get::<&mut Equipment>(player)
            .unwrap()
            .set_slot(EquipmentType::Weapon, Some(sword));
        let history = Handler::History(HistoryViewer::new(engine.log().len()));
        let session = Session::with_handler(engine, history.clone());

        let loaded = reload(&to_bytes(&session).unwrap()).unwrap();
        let engine = loaded.engine();
        let player = engine.player();
        assert_eq!(engine.player_position(), session.engine().player_position());
        assert_eq!(engine.turn(), session.engine().turn());
        assert_eq!(engine.log(), session.engine().log());
        assert_eq!(engine.map().tiles, session.engine().map().tiles);
        assert_eq!(loaded.handler(), &history);

        let world = &engine.map().world;
        let inventory = world.get::<&Inventory>(player).unwrap();
        assert_eq!(inventory.len(), 1);
        assert_eq!(world.get::<&Name>(inventory.items()[0]).unwrap().0, "Healing Potion");
        let weapon = world.get::<&Equipment>(player).unwrap().weapon().unwrap();
        assert_eq!(world.get::<&Name>(weapon).unwrap().0, "Sword");
        assert!(engine.map().actor_at(start.offset(2, 0)).is_some());
        assert!(world.get::<&Fighter>(player).is_ok());
    }

    #[test]
    fn test_corrupt_data_is_an_error() {
        assert!(matches!(reload(b"not json"), Err(SaveError::Parse(_))));

        let session = Session::new(arena(10, 10));
        let mut save = extract_save_data(&session).unwrap();
        save.version = 99;
        let bytes = serde_json::to_vec(&save).unwrap();
        assert!(matches!(
            reload(&bytes),
            Err(SaveError::VersionMismatch { expected: 1, found: 99 })
        ));

        let mut save = extract_save_data(&session).unwrap();
        save.map.tiles.pop();
        let bytes = serde_json::to_vec(&save).unwrap();
        assert!(matches!(reload(&bytes), Err(SaveError::InvalidData(_))));

        let mut save = extract_save_data(&session).unwrap();
        save.map.width = 65536;
        save.map.height = 65536;
        save.map.tiles.clear();
        save.map.explored.clear();
        let bytes = serde_json::to_vec(&save).unwrap();
        assert!(matches!(reload(&bytes), Err(SaveError::InvalidData(_))));

        let mut save = extract_save_data(&session).unwrap();
        save.player = 500;
        let bytes = serde_json::to_vec(&save).unwrap();
        assert!(matches!(reload(&bytes), Err(SaveError::InvalidData(_))));
    }

    #[test]
    fn test_save_to_path_round_trip() {
        let dir = std::env::temp_dir().join(format!("tombs-save-{}", std::process::id()));
        let path = dir.join(SAVE_FILE);
        let session = Session::new(arena(10, 10));

        save_to_path(&session, &path).unwrap();
        let loaded =
            load_from_path(&path, Arc::new(DataManager::default()), Box::new(RoomsGenerator)).unwrap();
        assert_eq!(loaded.engine().player_position(), session.engine().player_position());

        assert!(save_exists(&path));
        delete_save(&path).unwrap();
        assert!(!save_exists(&path));
        delete_save(&path).unwrap();

        let _ = fs::remove_dir_all(&dir);
    }
}
