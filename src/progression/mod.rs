//! Progression systems

pub mod xp;

pub use xp::{apply_level_ups, grant_xp};
