//! Damage calculation
//!
//! Effective stats with equipment and the melee damage formula.

use hecs::{ComponentError, Entity, World};

use crate::ecs::Fighter;
use crate::items::Equipment;

fn equipment_bonus(world: &World, entity: Entity, pick: fn(&Equipment, &World) -> i32) -> i32 {
    world
        .get::<&Equipment>(entity)
        .map(|eq| pick(&eq, world))
        .unwrap_or(0)
}

/// Base power plus weapon and armor power bonuses
pub fn effective_power(world: &World, entity: Entity) -> Result<i32, ComponentError> {
    let base = world.get::<&Fighter>(entity)?.base_power;
    Ok(base + equipment_bonus(world, entity, Equipment::power_bonus))
}

/// Base defense plus weapon and armor defense bonuses
pub fn effective_defense(world: &World, entity: Entity) -> Result<i32, ComponentError> {
    let base = world.get::<&Fighter>(entity)?.base_defense;
    Ok(base + equipment_bonus(world, entity, Equipment::defense_bonus))
}

/// Damage of one melee hit. Never negative.
pub fn melee_damage(power: i32, defense: i32) -> i32 {
    (power - defense).max(0)
}

/// Combat log line for a melee hit
pub fn describe_attack(attacker: &str, target: &str, damage: i32) -> String {
    let description = format!("{} attacks {}", attacker, target);
    if damage > 0 {
        format!("{} for {} hit points.", description, damage)
    } else {
        format!("{} but does no damage.", description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{EquipmentType, Equippable};

    #[test]
    fn test_melee_damage_floor() {
        assert_eq!(melee_damage(5, 0), 5);
        assert_eq!(melee_damage(3, 2), 1);
        assert_eq!(melee_damage(2, 6), 0);
    }

    #[test]
    fn test_weapon_adds_power() {
        let mut world = World::new();
        let sword = world.spawn((Equippable::weapon(4),));
        let mail = world.spawn((Equippable::armor(3),));
        let mut equipment = Equipment::new();
        equipment.set_slot(EquipmentType::Weapon, Some(sword));
        equipment.set_slot(EquipmentType::Armor, Some(mail));
        let player = world.spawn((Fighter::new(30, 2, 5), equipment));

        assert_eq!(effective_power(&world, player).unwrap(), 9);
        assert_eq!(effective_defense(&world, player).unwrap(), 5);
    }

    #[test]
    fn test_no_equipment_component() {
        let mut world = World::new();
        let goblin = world.spawn((Fighter::new(10, 0, 3),));
        assert_eq!(effective_power(&world, goblin).unwrap(), 3);

        let rock = world.spawn(());
        assert!(effective_power(&world, rock).is_err());
    }

    #[test]
    fn test_describe_attack() {
        assert_eq!(describe_attack("Player", "Goblin", 5), "Player attacks Goblin for 5 hit points.");
        assert_eq!(describe_attack("Goblin", "Player", 0), "Goblin attacks Player but does no damage.");
    }
}
