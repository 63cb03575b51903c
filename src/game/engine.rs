//! Turn engine
//!
//! Owns the current floor, the player, the message log and the RNG, and
//! resolves one player action at a time followed by every monster's turn.

use std::fmt;
use std::sync::Arc;

use hecs::Entity;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::actions::{Action, ActionOutcome};
use super::error::{ActionError, EngineFault};
use super::message_log::MessageLog;
use super::turn::{enemy_turn_order, TurnPhase, TurnResult};
use crate::data::{DataManager, GameConfig, Palette};
use crate::ecs::{capture, plan_action, restore, Fighter, Position};
use crate::items::{Equipment, Inventory};
use crate::world::{compute_fov, DungeonGenerator, GameMap, GenerationParams};

pub struct Engine {
    pub(crate) map: GameMap,
    pub(crate) player: Entity,
    pub(crate) log: MessageLog,
    pub(crate) data: Arc<DataManager>,
    pub(crate) rng: StdRng,
    pub(crate) seed: u64,
    pub(crate) turn: u64,
    pub(crate) phase: TurnPhase,
    pub(crate) generator: Box<dyn DungeonGenerator>,
}

impl Engine {
    /// Start a new game on depth 1. Without a seed one is drawn from entropy.
    pub fn new_game(
        data: Arc<DataManager>,
        mut generator: Box<dyn DungeonGenerator>,
        seed: Option<u64>,
    ) -> Result<Self, EngineFault> {
        let seed = seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);

        let params = GenerationParams::from_config(&data.config, 1);
        let generated = generator.generate(&params, &data, &mut rng)?;
        let mut map = generated.map;
        let player = data.actors.player.spawn_player(&mut map.world, generated.player_start);

        let mut engine = Self {
            map,
            player,
            log: MessageLog::new(),
            data,
            rng,
            seed,
            turn: 0,
            phase: TurnPhase::AwaitingInput,
            generator,
        };
        engine.update_fov();

        let welcome = engine.palette().welcome_text;
        engine.log.add_message(
            "Hello and welcome, adventurer, to the Tombs of the Forgotten Kings!",
            welcome,
        );
        log::info!("New game started with seed {}", seed);
        Ok(engine)
    }

    /// Rebuild an engine from saved state. The RNG is reseeded from the seed
    /// and turn so a loaded game stays deterministic.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        map: GameMap,
        player: Entity,
        log: MessageLog,
        data: Arc<DataManager>,
        generator: Box<dyn DungeonGenerator>,
        seed: u64,
        turn: u64,
    ) -> Result<Self, EngineFault> {
        if map.world.get::<&Fighter>(player).is_err() {
            return Err(EngineFault::NoPlayer);
        }
        Ok(Self {
            map,
            player,
            log,
            data,
            rng: StdRng::seed_from_u64(seed ^ turn),
            seed,
            turn,
            phase: TurnPhase::AwaitingInput,
            generator,
        })
    }

    pub fn map(&self) -> &GameMap {
        &self.map
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn data(&self) -> &Arc<DataManager> {
        &self.data
    }

    pub fn config(&self) -> &GameConfig {
        &self.data.config
    }

    pub fn palette(&self) -> &Palette {
        &self.data.config.palette
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn depth(&self) -> u32 {
        self.map.depth
    }

    pub fn player_position(&self) -> Option<Position> {
        self.map.position_of(self.player)
    }

    pub fn player_fighter(&self) -> Option<Fighter> {
        self.map.world.get::<&Fighter>(self.player).ok().map(|f| *f)
    }

    pub fn player_is_dead(&self) -> bool {
        self.player_fighter().map_or(true, |f| f.is_dead())
    }

    /// Log a message directly, e.g. a hint from an input handler
    pub fn add_message(&mut self, text: impl Into<String>, fg: crate::ecs::Rgb) {
        self.log.add_message(text, fg);
    }

    /// Resolve one player action, then run the monsters and refresh the
    /// field of view when it succeeded
    pub fn handle_player_action(&mut self, action: Action) -> TurnResult {
        self.phase = TurnPhase::ResolvingTurn;
        let result = action.perform(self);
        let outcome = match result {
            Ok(ActionOutcome::Quit) => TurnResult::Quit,
            Ok(ActionOutcome::Performed) => {
                self.handle_enemy_turns();
                self.update_fov();
                self.turn += 1;
                if self.player_is_dead() {
                    TurnResult::PlayerDied
                } else {
                    TurnResult::Advanced
                }
            }
            Err(ActionError::Impossible(reason)) => {
                let color = self.palette().impossible;
                self.log.add_message(reason, color);
                TurnResult::NotConsumed
            }
            Err(ActionError::Unexpected(fault)) => {
                log::error!("Action {:?} failed: {}", action.kind, fault);
                let color = self.palette().error;
                self.log.add_message(format!("Something went wrong: {}", fault), color);
                TurnResult::Faulted
            }
        };
        self.phase = TurnPhase::AwaitingInput;
        outcome
    }

    fn handle_enemy_turns(&mut self) {
        for entity in enemy_turn_order(&self.map, self.player) {
            if self.player_is_dead() {
                break;
            }
            let planned = plan_action(
                &mut self.map,
                entity,
                self.player,
                &mut self.rng,
                &mut self.log,
                &self.data.config.palette,
            );
            match planned {
                Ok(Some(action)) => match action.perform(self) {
                    Ok(_) | Err(ActionError::Impossible(_)) => {}
                    Err(ActionError::Unexpected(fault)) => {
                        log::warn!("Monster {:?} failed to act: {}", entity, fault)
                    }
                },
                Ok(None) => {}
                Err(e) => log::warn!("Monster {:?} could not plan: {}", entity, e),
            }
        }
    }

    /// Recompute what the player can see
    pub fn update_fov(&mut self) {
        if let Some(origin) = self.player_position() {
            let visible = compute_fov(&self.map, origin, self.data.config.fov_radius);
            self.map.replace_visible(visible);
        }
    }

    /// Generate the next floor and carry the player and their belongings into it
    pub(crate) fn descend(&mut self) -> Result<(), EngineFault> {
        let params = GenerationParams::from_config(&self.data.config, self.map.depth + 1);
        let generated = self.generator.generate(&params, &self.data, &mut self.rng)?;

        let mut carried = vec![self.player];
        if let Ok(inventory) = self.map.world.get::<&Inventory>(self.player) {
            carried.extend_from_slice(inventory.items());
        }
        if let Ok(equipment) = self.map.world.get::<&Equipment>(self.player) {
            carried.extend(equipment.items());
        }
        let records = capture(&self.map.world, &carried)?;

        let mut map = generated.map;
        let spawned = restore(&mut map.world, &records)?;
        let player = spawned.first().copied().ok_or(EngineFault::NoPlayer)?;
        map.world
            .insert_one(player, generated.player_start)
            .map_err(|_| EngineFault::MissingEntity)?;

        log::info!("Descended to depth {}", map.depth);
        self.map = map;
        self.player = player;
        self.update_fov();
        Ok(())
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("map", &self.map)
            .field("player", &self.player)
            .field("seed", &self.seed)
            .field("turn", &self.turn)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::game::actions::ActionKind;
    use crate::world::{RoomsGenerator, TileType};

    #[test]
    fn test_new_game_is_seeded() {
        let data = Arc::new(DataManager::default());
        let a = Engine::new_game(data.clone(), Box::new(RoomsGenerator), Some(9)).unwrap();
        let b = Engine::new_game(data, Box::new(RoomsGenerator), Some(9)).unwrap();
        assert_eq!(a.map.tiles, b.map.tiles);
        assert_eq!(a.player_position(), b.player_position());
        assert!(a.map.is_visible(a.player_position().unwrap().x, a.player_position().unwrap().y));
        assert_eq!(a.log.len(), 1);
    }

    #[test]
    fn test_impossible_action_does_not_advance() {
        let mut engine = arena(10, 10);
        let player = engine.player;
        // Walk into the west wall
        let start = engine.player_position().unwrap();
        let to_wall = -(start.x);
        let result = engine.handle_player_action(Action::new(player, ActionKind::Move { dx: to_wall, dy: 0 }));

        assert_eq!(result, TurnResult::NotConsumed);
        assert_eq!(engine.turn, 0);
        assert_eq!(last_message(&engine), "That way is blocked.");
        assert_eq!(engine.log.last().unwrap().fg, engine.palette().impossible);
        assert_eq!(engine.phase(), TurnPhase::AwaitingInput);
    }

    #[test]
    fn test_wait_lets_adjacent_goblin_attack() {
        let mut engine = arena(10, 10);
        let player = engine.player;
        let start = engine.player_position().unwrap();
        spawn_monster(&mut engine, "goblin", start.offset(1, 0));

        let result = engine.handle_player_action(Action::new(player, ActionKind::Wait));
        assert_eq!(result, TurnResult::Advanced);
        // Goblin power 3 against player defense 2
        assert_eq!(hp(&engine, player), 29);
        assert_eq!(last_message(&engine), "Goblin attacks Player for 1 hit points.");
        assert_eq!(engine.turn, 1);
    }

    #[test]
    fn test_player_death_reported() {
        let mut engine = arena(10, 10);
        let player = engine.player;
        let start = engine.player_position().unwrap();
        spawn_monster(&mut engine, "ogre", start.offset(0, 1));
        engine.map.world.get::<&mut Fighter>(player).unwrap().set_hp(1);

        let result = engine.handle_player_action(Action::new(player, ActionKind::Wait));
        assert_eq!(result, TurnResult::PlayerDied);
        assert!(engine.player_is_dead());
    }

    #[test]
    fn test_quit_skips_monsters() {
        let mut engine = arena(10, 10);
        let player = engine.player;
        let start = engine.player_position().unwrap();
        spawn_monster(&mut engine, "goblin", start.offset(1, 0));

        assert_eq!(engine.handle_player_action(Action::new(player, ActionKind::Quit)), TurnResult::Quit);
        assert_eq!(hp(&engine, player), 30);
    }

    #[test]
    fn test_descend_carries_belongings() {
        let mut engine = arena(12, 12);
        let player = engine.player;
        give_item(&mut engine, "healing_potion");
        let start = engine.player_position().unwrap();
        engine.map.set_tile(start.x, start.y, TileType::StairsDown);
        engine.map.stairs = Some(start);

        let result = engine.handle_player_action(Action::new(player, ActionKind::DescendStairs));
        assert_eq!(result, TurnResult::Advanced);
        assert_eq!(engine.depth(), 2);

        let player = engine.player;
        assert_eq!(engine.player_position(), Some(engine.map.entry));
        let inventory = engine.map.world.get::<&Inventory>(player).unwrap();
        assert_eq!(inventory.len(), 1);
        let name = engine.map.world.get::<&crate::ecs::Name>(inventory.items()[0]).unwrap();
        assert_eq!(name.0, "Healing Potion");
        drop(name);
        drop(inventory);
        assert!(engine.log.messages().iter().any(|m| m.text == "You descend the staircase."));
    }
}
