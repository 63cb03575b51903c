//! Entity Component System module
//!
//! Defines all components, snapshots, and the monster AI system.

pub mod components;
pub mod snapshot;
pub mod systems;

pub use components::*;
pub use snapshot::{capture, restore, EntityRecord, SnapshotError};
pub use systems::plan_action;
