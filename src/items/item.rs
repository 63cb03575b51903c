//! Item definitions
//!
//! Marker and capability components that make an entity an item.

use serde::{Deserialize, Serialize};

/// Marks an entity as an item. Where it lives is implied by its other
/// attachments: a `Position` means it lies on the map, otherwise exactly one
/// actor's `Inventory` or `Equipment` refers to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Item;

/// Equipment slot an item goes into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentType {
    Weapon,
    Armor,
}

/// Makes an item wearable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equippable {
    pub equipment_type: EquipmentType,
    #[serde(default)]
    pub power_bonus: i32,
    #[serde(default)]
    pub defense_bonus: i32,
}

impl Equippable {
    pub fn weapon(power_bonus: i32) -> Self {
        Self {
            equipment_type: EquipmentType::Weapon,
            power_bonus,
            defense_bonus: 0,
        }
    }

    pub fn armor(defense_bonus: i32) -> Self {
        Self {
            equipment_type: EquipmentType::Armor,
            power_bonus: 0,
            defense_bonus,
        }
    }
}

/// One-shot effect of a usable item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Consumable {
    Healing { amount: i32 },
    SingleTargetDamage { damage: i32, max_range: i32 },
    Confusion { turns: u32 },
    AreaDamage { damage: i32, radius: i32 },
}

/// What the player has to pick before a consumable can be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Targeting {
    None,
    Single,
    Area { radius: i32 },
}

impl Consumable {
    pub fn targeting(&self) -> Targeting {
        match self {
            Consumable::Healing { .. } => Targeting::None,
            Consumable::SingleTargetDamage { .. } | Consumable::Confusion { .. } => Targeting::Single,
            Consumable::AreaDamage { radius, .. } => Targeting::Area { radius: *radius },
        }
    }
}
