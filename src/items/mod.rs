//! Item system

pub mod item;
pub mod inventory;
pub mod equipment;

pub use item::{Consumable, EquipmentType, Equippable, Item, Targeting};
pub use inventory::Inventory;
pub use equipment::Equipment;
