//! Combat system
//!
//! Applying damage, dying, and rewarding the player for kills.

pub mod damage;
pub mod death;

pub use damage::{describe_attack, effective_defense, effective_power, melee_damage};
pub use death::{kill, CORPSE_GLYPH};

use hecs::{ComponentError, Entity, World};

use crate::data::GameConfig;
use crate::ecs::{Fighter, Level, Player};
use crate::game::message_log::MessageLog;
use crate::progression::grant_xp;

/// Outcome of damaging an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    Survived,
    Killed,
    /// The target was already dead; nothing changed
    AlreadyDead,
}

/// Deal damage to `target`. On the killing hit the target becomes a corpse
/// and, when `source` is the player, the player earns the target's XP.
pub fn apply_damage(
    world: &mut World,
    log: &mut MessageLog,
    config: &GameConfig,
    target: Entity,
    amount: i32,
    source: Option<Entity>,
) -> Result<DamageOutcome, ComponentError> {
    let killed = {
        let mut fighter = world.get::<&mut Fighter>(target)?;
        if fighter.is_dead() {
            return Ok(DamageOutcome::AlreadyDead);
        }
        fighter.take_damage(amount)
    };
    if !killed {
        return Ok(DamageOutcome::Survived);
    }

    let message = kill(world, target, &config.palette)?;
    log.add_message(message.text, message.fg);

    if let Some(source) = source.filter(|&s| s != target) {
        if world.get::<&Player>(source).is_ok() {
            let xp = world.get::<&Level>(target).map(|l| l.xp_given).unwrap_or(0);
            award_xp(world, log, config, source, xp)?;
        }
    }

    Ok(DamageOutcome::Killed)
}

fn award_xp(
    world: &mut World,
    log: &mut MessageLog,
    config: &GameConfig,
    player: Entity,
    xp: u32,
) -> Result<(), ComponentError> {
    if xp == 0 {
        return Ok(());
    }
    log.add_message(format!("You gain {} experience points.", xp), config.palette.white);
    let gained = grant_xp(world, player, xp, config.level_up)?;
    if gained > 0 {
        let level = world.get::<&Level>(player)?.current_level;
        log.add_message(format!("You advance to level {}!", level), config.palette.welcome_text);
    }
    Ok(())
}
