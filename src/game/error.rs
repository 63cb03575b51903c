//! Action errors
//!
//! `Impossible` is an ordinary refusal shown to the player. `Unexpected`
//! means the game state did not look the way an action assumed.

use hecs::{ComponentError, Entity, NoSuchEntity};
use thiserror::Error;

use crate::ecs::SnapshotError;
use crate::world::GenerationError;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{0}")]
    Impossible(String),
    #[error(transparent)]
    Unexpected(#[from] EngineFault),
}

impl ActionError {
    pub fn impossible(reason: impl Into<String>) -> Self {
        ActionError::Impossible(reason.into())
    }
}

impl From<ComponentError> for ActionError {
    fn from(e: ComponentError) -> Self {
        ActionError::Unexpected(EngineFault::Component(e))
    }
}

impl From<NoSuchEntity> for ActionError {
    fn from(_: NoSuchEntity) -> Self {
        ActionError::Unexpected(EngineFault::MissingEntity)
    }
}

/// Internal inconsistencies and collaborator failures
#[derive(Debug, Error)]
pub enum EngineFault {
    #[error("component lookup failed: {0}")]
    Component(#[from] ComponentError),
    #[error("entity no longer exists")]
    MissingEntity,
    #[error("entity {0:?} lacks a required component")]
    MissingComponent(Entity),
    #[error("floor generation failed: {0}")]
    Generation(#[from] GenerationError),
    #[error("could not move entities between floors: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error("no player on the current map")]
    NoPlayer,
}
