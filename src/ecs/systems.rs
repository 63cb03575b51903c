//! ECS Systems
//!
//! Monster AI: turns an actor's `Ai` into the action it takes this turn.

use hecs::{ComponentError, Entity};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::data::Palette;
use crate::ecs::{Ai, Name, Position};
use crate::game::actions::{Action, ActionKind};
use crate::game::message_log::MessageLog;
use crate::world::GameMap;

const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Decide what `entity` does this turn. Confusion bookkeeping happens here;
/// `Ok(None)` means the turn was spent recovering.
pub fn plan_action(
    map: &mut GameMap,
    entity: Entity,
    player: Entity,
    rng: &mut StdRng,
    log: &mut MessageLog,
    palette: &Palette,
) -> Result<Option<Action>, ComponentError> {
    let ai = (*map.world.get::<&Ai>(entity)?).clone();

    match ai {
        Ai::Hostile => hostile_action(map, entity, player).map(Some),
        Ai::Confused { turns_remaining: 0, previous } => {
            map.world
                .insert_one(entity, *previous)
                .map_err(|_| ComponentError::NoSuchEntity)?;
            let name = map.world.get::<&Name>(entity).map(|n| n.0.clone()).unwrap_or_default();
            log.add_message(format!("The {} is no longer confused.", name), palette.white);
            log::debug!("{} recovered from confusion", name);
            Ok(None)
        }
        Ai::Confused { turns_remaining, previous } => {
            map.world
                .insert_one(entity, Ai::Confused { turns_remaining: turns_remaining - 1, previous })
                .map_err(|_| ComponentError::NoSuchEntity)?;
            let (dx, dy) = DIRECTIONS.choose(rng).copied().unwrap_or((0, 0));
            Ok(Some(Action::bump(entity, dx, dy)))
        }
    }
}

/// Attack when adjacent, chase while the player can see us, otherwise wait
fn hostile_action(map: &GameMap, entity: Entity, player: Entity) -> Result<Action, ComponentError> {
    let pos = *map.world.get::<&Position>(entity)?;
    let wait = Action::new(entity, ActionKind::Wait);

    let target = match map.position_of(player) {
        Some(target) => target,
        None => return Ok(wait),
    };
    if !map.is_visible(pos.x, pos.y) {
        return Ok(wait);
    }

    let dx = target.x - pos.x;
    let dy = target.y - pos.y;
    if pos.chebyshev_distance(&target) <= 1 {
        return Ok(Action::new(entity, ActionKind::Melee { dx, dy }));
    }

    Ok(match calculate_chase_move(pos, target, map) {
        Some(step) => Action::new(
            entity,
            ActionKind::Move { dx: step.x - pos.x, dy: step.y - pos.y },
        ),
        None => wait,
    })
}

/// Calculate the best move for chasing the player
fn calculate_chase_move(from: Position, target: Position, map: &GameMap) -> Option<Position> {
    let dx = (target.x - from.x).signum();
    let dy = (target.y - from.y).signum();

    // Straight toward the target first, then the two neighbouring directions
    let candidates = if dx != 0 && dy != 0 {
        [from.offset(dx, dy), from.offset(dx, 0), from.offset(0, dy)]
    } else if dx != 0 {
        [from.offset(dx, 0), from.offset(dx, -1), from.offset(dx, 1)]
    } else if dy != 0 {
        [from.offset(0, dy), from.offset(-1, dy), from.offset(1, dy)]
    } else {
        return None;
    };

    candidates.into_iter().find(|&pos| is_valid_move(pos, map))
}

/// Check if a position is valid for a monster to move to
fn is_valid_move(pos: Position, map: &GameMap) -> bool {
    map.is_walkable(pos.x, pos.y) && map.blocking_entity_at(pos).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataManager;
    use crate::world::compute_fov;
    use rand::SeedableRng;

    struct Fixture {
        map: GameMap,
        player: Entity,
        goblin: Entity,
        rng: StdRng,
        log: MessageLog,
        palette: Palette,
    }

    impl Fixture {
        fn new(player_at: Position, goblin_at: Position) -> Self {
            let data = DataManager::default();
            let mut map = GameMap::open_arena(20, 20, 1);
            let player = data.actors.player.spawn_player(&mut map.world, player_at);
            let goblin = data.actors.find("goblin").unwrap().spawn(&mut map.world, goblin_at);
            let visible = compute_fov(&map, player_at, 8);
            map.replace_visible(visible);
            Self {
                map,
                player,
                goblin,
                rng: StdRng::seed_from_u64(3),
                log: MessageLog::new(),
                palette: Palette::default(),
            }
        }

        fn plan(&mut self) -> Option<Action> {
            plan_action(&mut self.map, self.goblin, self.player, &mut self.rng, &mut self.log, &self.palette)
                .unwrap()
        }
    }

    #[test]
    fn test_adjacent_hostile_attacks() {
        let mut f = Fixture::new(Position::new(5, 5), Position::new(6, 6));
        let action = f.plan().unwrap();
        assert_eq!(action.kind, ActionKind::Melee { dx: -1, dy: -1 });
    }

    #[test]
    fn test_visible_hostile_chases() {
        let mut f = Fixture::new(Position::new(5, 5), Position::new(9, 5));
        let action = f.plan().unwrap();
        assert_eq!(action.kind, ActionKind::Move { dx: -1, dy: 0 });
    }

    #[test]
    fn test_chase_steps_around_blocker() {
        let mut f = Fixture::new(Position::new(5, 5), Position::new(8, 5));
        let data = DataManager::default();
        data.actors.find("ogre").unwrap().spawn(&mut f.map.world, Position::new(7, 5));

        let action = f.plan().unwrap();
        assert_eq!(action.kind, ActionKind::Move { dx: -1, dy: -1 });
    }

    #[test]
    fn test_unseen_hostile_waits() {
        let mut f = Fixture::new(Position::new(2, 2), Position::new(17, 17));
        let action = f.plan().unwrap();
        assert_eq!(action.kind, ActionKind::Wait);
    }

    #[test]
    fn test_confusion_wears_off() {
        let mut f = Fixture::new(Position::new(5, 5), Position::new(6, 6));
        f.map.world.insert_one(f.goblin, Ai::confused(2, Ai::Hostile)).unwrap();

        for remaining in [1, 0] {
            let action = f.plan().unwrap();
            assert!(matches!(action.kind, ActionKind::Bump { .. }));
            assert_eq!(
                *f.map.world.get::<&Ai>(f.goblin).unwrap(),
                Ai::Confused { turns_remaining: remaining, previous: Box::new(Ai::Hostile) }
            );
        }

        assert_eq!(f.plan(), None);
        assert_eq!(*f.map.world.get::<&Ai>(f.goblin).unwrap(), Ai::Hostile);
        assert_eq!(f.log.last().unwrap().text, "The Goblin is no longer confused.");
    }
}
