//! Death handling

use hecs::{ComponentError, Entity, World};

use crate::data::Palette;
use crate::ecs::{Ai, BlocksMovement, Name, Player, RenderOrder, Renderable};
use crate::game::message_log::Message;

pub const CORPSE_GLYPH: char = '%';

/// Turn an entity into its remains and return the death message
pub fn kill(world: &mut World, entity: Entity, palette: &Palette) -> Result<Message, ComponentError> {
    let is_player = world.get::<&Player>(entity).is_ok();

    let original = {
        let mut name = world.get::<&mut Name>(entity)?;
        let original = name.0.clone();
        name.0 = format!("remains of {}", original);
        original
    };

    {
        let mut renderable = world.get::<&mut Renderable>(entity)?;
        renderable.glyph = CORPSE_GLYPH;
        renderable.fg = palette.corpse;
        renderable.order = RenderOrder::Corpse;
    }

    let _ = world.remove_one::<BlocksMovement>(entity);
    let _ = world.remove_one::<Ai>(entity);

    log::debug!("{} died", original);

    Ok(if is_player {
        Message::new("You died!", palette.player_die)
    } else {
        Message::new(format!("{} is dead!", original), palette.enemy_die)
    })
}
