//! Experience and leveling
//!
//! XP awards and the stat gains that come with each level.

use hecs::{ComponentError, Entity, World};

use crate::data::LevelUpBonus;
use crate::ecs::{Fighter, Level};

/// Raise a fighter's stats for `levels` level-ups and restore it to full health
pub fn apply_level_ups(fighter: &mut Fighter, levels: u32, bonus: LevelUpBonus) {
    if levels == 0 {
        return;
    }
    let levels = levels as i32;
    fighter.max_hp = (fighter.max_hp + bonus.hp * levels).max(1);
    fighter.base_power += bonus.power * levels;
    fighter.base_defense += bonus.defense * levels;
    fighter.set_hp(fighter.max_hp);
}

/// Give XP to an entity, applying any level-ups. Returns the levels gained.
pub fn grant_xp(
    world: &mut World,
    entity: Entity,
    amount: u32,
    bonus: LevelUpBonus,
) -> Result<u32, ComponentError> {
    let gained = world.get::<&mut Level>(entity)?.add_xp(amount);
    if gained > 0 {
        let mut fighter = world.get::<&mut Fighter>(entity)?;
        apply_level_ups(&mut fighter, gained, bonus);
        log::info!("Entity {:?} reached {} new level(s)", entity, gained);
    }
    Ok(gained)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_up_restores_health() {
        let mut fighter = Fighter::new(30, 2, 5);
        fighter.set_hp(3);
        apply_level_ups(&mut fighter, 2, LevelUpBonus { hp: 20, power: 1, defense: 1 });

        assert_eq!(fighter.max_hp, 70);
        assert_eq!(fighter.hp, 70);
        assert_eq!(fighter.base_power, 7);
        assert_eq!(fighter.base_defense, 4);
    }

    #[test]
    fn test_grant_xp_below_threshold() {
        let mut world = World::new();
        let entity = world.spawn((Fighter::new(30, 2, 5), Level::new(200, 150, 0)));

        let gained = grant_xp(&mut world, entity, 35, LevelUpBonus::default()).unwrap();
        assert_eq!(gained, 0);
        assert_eq!(world.get::<&Level>(entity).unwrap().current_xp, 35);
        assert_eq!(world.get::<&Fighter>(entity).unwrap().max_hp, 30);
    }

    #[test]
    fn test_grant_xp_levels_up() {
        let mut world = World::new();
        let entity = world.spawn((Fighter::new(30, 2, 5), Level::new(200, 150, 0)));

        let gained = grant_xp(&mut world, entity, 350, LevelUpBonus::default()).unwrap();
        assert_eq!(gained, 1);
        assert_eq!(world.get::<&Level>(entity).unwrap().current_level, 2);
        assert_eq!(world.get::<&Fighter>(entity).unwrap().max_hp, 50);
    }

    #[test]
    fn test_grant_xp_needs_level() {
        let mut world = World::new();
        let entity = world.spawn((Fighter::new(10, 0, 3),));
        assert!(grant_xp(&mut world, entity, 10, LevelUpBonus::default()).is_err());
    }
}
