//! Turn management
//!
//! Turn phases, turn results, and the order in which monsters act.

use hecs::Entity;

use crate::ecs::Ai;
use crate::world::GameMap;

/// Where the engine is within a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnPhase {
    #[default]
    AwaitingInput,
    ResolvingTurn,
}

/// What happened to a submitted player action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnResult {
    /// The action was refused; no time passed
    NotConsumed,
    /// The action succeeded and the monsters took their turns
    Advanced,
    /// As `Advanced`, but the player is now dead
    PlayerDied,
    /// The action hit an internal fault; no time passed
    Faulted,
    Quit,
}

impl TurnResult {
    pub fn consumed_turn(&self) -> bool {
        matches!(self, TurnResult::Advanced | TurnResult::PlayerDied)
    }
}

/// Every living actor with an `Ai` other than the player, ordered by entity id
pub fn enemy_turn_order(map: &GameMap, player: Entity) -> Vec<Entity> {
    map.living_actors()
        .into_iter()
        .filter(|&e| e != player && map.world.get::<&Ai>(e).is_ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataManager;
    use crate::ecs::Position;

    #[test]
    fn test_turn_order_skips_player_and_corpses() {
        let data = DataManager::default();
        let mut map = GameMap::open_arena(10, 10, 1);
        let goblin = data.actors.find("goblin").unwrap();
        let player = data.actors.player.spawn_player(&mut map.world, Position::new(1, 1));
        let first = goblin.spawn(&mut map.world, Position::new(3, 3));
        let dead = goblin.spawn(&mut map.world, Position::new(4, 4));
        let last = goblin.spawn(&mut map.world, Position::new(5, 5));
        map.world.get::<&mut crate::ecs::Fighter>(dead).unwrap().set_hp(0);

        assert_eq!(enemy_turn_order(&map, player), vec![first, last]);
    }

    #[test]
    fn test_consumed_turn() {
        assert!(TurnResult::Advanced.consumed_turn());
        assert!(TurnResult::PlayerDied.consumed_turn());
        assert!(!TurnResult::NotConsumed.consumed_turn());
        assert!(!TurnResult::Quit.consumed_turn());
    }
}
