//! Inventory system
//!
//! Ordered, fixed-capacity list of carried item entities.

use hecs::Entity;

/// An actor's carried items, in acquisition order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    capacity: usize,
    items: Vec<Entity>,
}

impl Inventory {
    /// Create an empty inventory
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get current number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// All items in slot order
    pub fn items(&self) -> &[Entity] {
        &self.items
    }

    pub fn contains(&self, item: Entity) -> bool {
        self.items.contains(&item)
    }

    /// Add an item to the last slot.
    /// Returns false, leaving the inventory untouched, if it is full.
    pub fn add(&mut self, item: Entity) -> bool {
        if self.is_full() || self.contains(item) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove an item, keeping the order of the rest
    pub fn remove(&mut self, item: Entity) -> bool {
        match self.items.iter().position(|&e| e == item) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }
}
