//! Equipment system
//!
//! Weapon and armor slots and the bonuses they grant.

use hecs::{Entity, World};
use super::item::{EquipmentType, Equippable};

/// An actor's worn items
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Equipment {
    weapon: Option<Entity>,
    armor: Option<Entity>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weapon(&self) -> Option<Entity> {
        self.weapon
    }

    pub fn armor(&self) -> Option<Entity> {
        self.armor
    }

    /// Put an item in a slot (or clear it), returning the previous occupant
    pub fn set_slot(&mut self, slot: EquipmentType, item: Option<Entity>) -> Option<Entity> {
        let target = match slot {
            EquipmentType::Weapon => &mut self.weapon,
            EquipmentType::Armor => &mut self.armor,
        };
        std::mem::replace(target, item)
    }

    /// Which slot holds this item, if any
    pub fn slot_of(&self, item: Entity) -> Option<EquipmentType> {
        if self.weapon == Some(item) {
            Some(EquipmentType::Weapon)
        } else if self.armor == Some(item) {
            Some(EquipmentType::Armor)
        } else {
            None
        }
    }

    pub fn is_equipped(&self, item: Entity) -> bool {
        self.slot_of(item).is_some()
    }

    /// Equipped items, weapon first
    pub fn items(&self) -> impl Iterator<Item = Entity> {
        self.weapon.into_iter().chain(self.armor)
    }

    /// Sum of the power bonuses of the weapon and the armor, each counted once
    pub fn power_bonus(&self, world: &World) -> i32 {
        self.items()
            .map(|item| bonus_of(world, item, |eq| eq.power_bonus))
            .sum()
    }

    /// Sum of the defense bonuses of the weapon and the armor, each counted once
    pub fn defense_bonus(&self, world: &World) -> i32 {
        self.items()
            .map(|item| bonus_of(world, item, |eq| eq.defense_bonus))
            .sum()
    }
}

fn bonus_of(world: &World, item: Entity, pick: impl Fn(&Equippable) -> i32) -> i32 {
    world
        .get::<&Equippable>(item)
        .map(|eq| pick(&eq))
        .unwrap_or(0)
}
