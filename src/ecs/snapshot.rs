//! Entity snapshots
//!
//! Plain-data copies of entities that can leave a `hecs::World`, either to be
//! written into a save file or to be moved into another map's world. Entity
//! references inside inventories and equipment become indices into the
//! captured list.

use std::collections::HashMap;

use hecs::{Entity, EntityBuilder, World};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::components::{Ai, BlocksMovement, Fighter, Level, Name, Player, Position, Renderable};
use crate::items::{Consumable, EquipmentType, Equipment, Equippable, Inventory, Item};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("entity {0:?} no longer exists")]
    MissingEntity(Entity),
    #[error("entity refers to an item outside the snapshot")]
    DanglingReference,
    #[error("item index {0} is out of range")]
    IndexOutOfRange(usize),
    #[error("inventory holds {items} items but has room for {capacity}")]
    OverCapacity { items: usize, capacity: usize },
    #[error("item {0} is in more than one place")]
    ItemOwnedTwice(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub capacity: usize,
    pub items: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    pub weapon: Option<usize>,
    pub armor: Option<usize>,
}

/// Every component of one entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub position: Option<Position>,
    pub renderable: Option<Renderable>,
    pub name: Option<Name>,
    #[serde(default)]
    pub player: bool,
    #[serde(default)]
    pub blocks_movement: bool,
    pub fighter: Option<Fighter>,
    pub ai: Option<Ai>,
    pub inventory: Option<InventoryRecord>,
    pub equipment: Option<EquipmentRecord>,
    pub level: Option<Level>,
    #[serde(default)]
    pub item: bool,
    pub consumable: Option<Consumable>,
    pub equippable: Option<Equippable>,
}

fn cloned<T: hecs::Component + Clone>(world: &World, entity: Entity) -> Option<T> {
    world.get::<&T>(entity).ok().map(|c| (*c).clone())
}

/// Capture `entities` in order. Every inventory or equipment reference must
/// point at another entity in the same list.
pub fn capture(world: &World, entities: &[Entity]) -> Result<Vec<EntityRecord>, SnapshotError> {
    let index: HashMap<Entity, usize> = entities.iter().enumerate().map(|(i, &e)| (e, i)).collect();
    let lookup = |e: Entity| index.get(&e).copied().ok_or(SnapshotError::DanglingReference);

    let mut records = Vec::with_capacity(entities.len());
    for &entity in entities {
        if !world.contains(entity) {
            return Err(SnapshotError::MissingEntity(entity));
        }

        let inventory = match world.get::<&Inventory>(entity) {
            Ok(inv) => Some(InventoryRecord {
                capacity: inv.capacity(),
                items: inv.items().iter().map(|&e| lookup(e)).collect::<Result<_, _>>()?,
            }),
            Err(_) => None,
        };

        let equipment = match world.get::<&Equipment>(entity) {
            Ok(eq) => Some(EquipmentRecord {
                weapon: eq.weapon().map(lookup).transpose()?,
                armor: eq.armor().map(lookup).transpose()?,
            }),
            Err(_) => None,
        };

        records.push(EntityRecord {
            position: cloned(world, entity),
            renderable: cloned(world, entity),
            name: cloned(world, entity),
            player: world.get::<&Player>(entity).is_ok(),
            blocks_movement: world.get::<&BlocksMovement>(entity).is_ok(),
            fighter: cloned(world, entity),
            ai: cloned(world, entity),
            inventory,
            equipment,
            level: cloned(world, entity),
            item: world.get::<&Item>(entity).is_ok(),
            consumable: cloned(world, entity),
            equippable: cloned(world, entity),
        });
    }
    Ok(records)
}

/// Spawn records into `world`, returning the new entities in record order.
/// Nothing is spawned when the records are inconsistent.
pub fn restore(world: &mut World, records: &[EntityRecord]) -> Result<Vec<Entity>, SnapshotError> {
    validate(records)?;

    let spawned: Vec<Entity> = records.iter().map(|r| world.spawn(build(r).build())).collect();

    for (record, &entity) in records.iter().zip(&spawned) {
        if let Some(inv) = &record.inventory {
            let mut inventory = Inventory::new(inv.capacity);
            for &i in &inv.items {
                inventory.add(spawned[i]);
            }
            world
                .insert_one(entity, inventory)
                .map_err(|_| SnapshotError::MissingEntity(entity))?;
        }
        if let Some(eq) = &record.equipment {
            let mut equipment = Equipment::new();
            equipment.set_slot(EquipmentType::Weapon, eq.weapon.map(|i| spawned[i]));
            equipment.set_slot(EquipmentType::Armor, eq.armor.map(|i| spawned[i]));
            world
                .insert_one(entity, equipment)
                .map_err(|_| SnapshotError::MissingEntity(entity))?;
        }
    }

    Ok(spawned)
}

/// Every referenced index must exist, and an item sits in exactly one place:
/// on the floor, in one inventory, or in one equipment slot.
fn validate(records: &[EntityRecord]) -> Result<(), SnapshotError> {
    let mut owned = vec![false; records.len()];
    let mut claim = |i: usize| {
        if i >= records.len() {
            return Err(SnapshotError::IndexOutOfRange(i));
        }
        if owned[i] || records[i].position.is_some() {
            return Err(SnapshotError::ItemOwnedTwice(i));
        }
        owned[i] = true;
        Ok(())
    };
    for record in records {
        if let Some(inv) = &record.inventory {
            if inv.items.len() > inv.capacity {
                return Err(SnapshotError::OverCapacity { items: inv.items.len(), capacity: inv.capacity });
            }
            inv.items.iter().try_for_each(|&i| claim(i))?;
        }
        if let Some(eq) = &record.equipment {
            eq.weapon.into_iter().chain(eq.armor).try_for_each(&mut claim)?;
        }
    }
    Ok(())
}

fn build(record: &EntityRecord) -> EntityBuilder {
    let mut builder = EntityBuilder::new();
    if let Some(position) = record.position {
        builder.add(position);
    }
    if let Some(renderable) = &record.renderable {
        builder.add(renderable.clone());
    }
    if let Some(name) = &record.name {
        builder.add(name.clone());
    }
    if record.player {
        builder.add(Player);
    }
    if record.blocks_movement {
        builder.add(BlocksMovement);
    }
    if let Some(fighter) = record.fighter {
        builder.add(fighter);
    }
    if let Some(ai) = &record.ai {
        builder.add(ai.clone());
    }
    if let Some(level) = record.level {
        builder.add(level);
    }
    if record.item {
        builder.add(Item);
    }
    if let Some(consumable) = record.consumable {
        builder.add(consumable);
    }
    if let Some(equippable) = record.equippable {
        builder.add(equippable);
    }
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::templates::{default_actor_templates, default_item_templates};

    fn player_with_gear(world: &mut World) -> (Entity, Entity, Entity) {
        let actors = default_actor_templates();
        let items = default_item_templates();
        let player = actors.player.spawn_player(world, Position::new(4, 4));
        let potion = items.find("healing_potion").unwrap().spawn(world, None);
        let sword = items.find("sword").unwrap().spawn(world, None);
        world.get::<&mut Inventory>(player).unwrap().add(potion);
        world.get::<&mut Equipment>(player).unwrap().set_slot(EquipmentType::Weapon, Some(sword));
        (player, potion, sword)
    }

    #[test]
    fn test_move_between_worlds() {
        let mut old = World::new();
        let (player, potion, sword) = player_with_gear(&mut old);
        let records = capture(&old, &[player, potion, sword]).unwrap();

        let mut new = World::new();
        new.spawn((Position::new(0, 0),));
        let spawned = restore(&mut new, &records).unwrap();
        let (player, potion, sword) = (spawned[0], spawned[1], spawned[2]);

        assert!(new.get::<&Player>(player).is_ok());
        assert_eq!(new.get::<&Inventory>(player).unwrap().items(), &[potion]);
        assert_eq!(new.get::<&Equipment>(player).unwrap().weapon(), Some(sword));
        assert_eq!(new.get::<&Equipment>(player).unwrap().power_bonus(&new), 4);
        assert_eq!(new.get::<&Name>(potion).unwrap().0, "Healing Potion");
    }

    #[test]
    fn test_dangling_reference() {
        let mut world = World::new();
        let (player, potion, _) = player_with_gear(&mut world);
        assert_eq!(capture(&world, &[player, potion]), Err(SnapshotError::DanglingReference));
    }

    #[test]
    fn test_restore_rejects_bad_index() {
        let records = vec![EntityRecord {
            inventory: Some(InventoryRecord { capacity: 5, items: vec![3] }),
            ..Default::default()
        }];
        let mut world = World::new();
        assert_eq!(restore(&mut world, &records), Err(SnapshotError::IndexOutOfRange(3)));
        assert_eq!(world.len(), 0);
    }

    #[test]
    fn test_restore_rejects_item_in_two_places() {
        let mut world = World::new();
        let (player, potion, sword) = player_with_gear(&mut world);
        let records = capture(&world, &[player, potion, sword]).unwrap();

        let mut worn_and_packed = records.clone();
        worn_and_packed[0].inventory.as_mut().unwrap().items.push(2);
        let mut packed_twice = records.clone();
        packed_twice[0].inventory.as_mut().unwrap().items.push(1);
        let mut packed_and_on_floor = records.clone();
        packed_and_on_floor[1].position = Some(Position::new(1, 1));

        for bad in [worn_and_packed, packed_twice, packed_and_on_floor] {
            let mut target = World::new();
            assert!(matches!(restore(&mut target, &bad), Err(SnapshotError::ItemOwnedTwice(_))));
            assert_eq!(target.len(), 0);
        }
    }
}
