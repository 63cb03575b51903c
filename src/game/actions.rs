//! Actions
//!
//! An `Action` is one actor's intent for a turn. Performing it either changes
//! the game or fails without having changed anything.

use hecs::{Entity, World};

use super::engine::Engine;
use super::error::{ActionError, EngineFault};
use crate::combat::{apply_damage, describe_attack, effective_defense, effective_power, melee_damage};
use crate::ecs::{Ai, Fighter, Name, Position};
use crate::items::{Consumable, EquipmentType, Equipment, Equippable, Inventory};
use crate::world::TileType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Move { dx: i32, dy: i32 },
    Melee { dx: i32, dy: i32 },
    /// Attack whatever stands in the way, otherwise move
    Bump { dx: i32, dy: i32 },
    Wait,
    PickUp,
    Drop { item: Entity },
    EquipToggle { item: Entity },
    ItemUse { item: Entity, target: Option<Position> },
    DescendStairs,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub actor: Entity,
    pub kind: ActionKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Performed,
    /// End the session
    Quit,
}

/// Where a carried item is held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Carried {
    Inventory,
    Equipped(EquipmentType),
}

fn name_of(world: &World, entity: Entity) -> String {
    world
        .get::<&Name>(entity)
        .map(|n| n.0.clone())
        .unwrap_or_else(|_| "something".to_string())
}

fn carried(world: &World, actor: Entity, item: Entity) -> Result<Carried, ActionError> {
    if let Ok(equipment) = world.get::<&Equipment>(actor) {
        if let Some(slot) = equipment.slot_of(item) {
            return Ok(Carried::Equipped(slot));
        }
    }
    if world.get::<&Inventory>(actor)?.contains(item) {
        Ok(Carried::Inventory)
    } else {
        Err(ActionError::impossible("You are not carrying that item."))
    }
}

impl Action {
    pub fn new(actor: Entity, kind: ActionKind) -> Self {
        Self { actor, kind }
    }

    pub fn bump(actor: Entity, dx: i32, dy: i32) -> Self {
        Self::new(actor, ActionKind::Bump { dx, dy })
    }

    /// Validate and apply the action
    pub fn perform(&self, engine: &mut Engine) -> Result<ActionOutcome, ActionError> {
        match self.kind {
            ActionKind::Move { dx, dy } => self.move_by(engine, dx, dy)?,
            ActionKind::Melee { dx, dy } => self.melee(engine, dx, dy)?,
            ActionKind::Bump { dx, dy } => {
                let dest = self.position(engine)?.offset(dx, dy);
                if engine.map.actor_at(dest).is_some() {
                    self.melee(engine, dx, dy)?
                } else {
                    self.move_by(engine, dx, dy)?
                }
            }
            ActionKind::Wait => {}
            ActionKind::PickUp => self.pick_up(engine)?,
            ActionKind::Drop { item } => self.drop_item(engine, item)?,
            ActionKind::EquipToggle { item } => self.toggle_equip(engine, item)?,
            ActionKind::ItemUse { item, target } => self.use_item(engine, item, target)?,
            ActionKind::DescendStairs => self.descend(engine)?,
            ActionKind::Quit => return Ok(ActionOutcome::Quit),
        }
        Ok(ActionOutcome::Performed)
    }

    fn position(&self, engine: &Engine) -> Result<Position, ActionError> {
        engine
            .map
            .position_of(self.actor)
            .ok_or(ActionError::Unexpected(EngineFault::MissingComponent(self.actor)))
    }

    fn move_by(&self, engine: &mut Engine, dx: i32, dy: i32) -> Result<(), ActionError> {
        let dest = self.position(engine)?.offset(dx, dy);
        let map = &engine.map;
        if !map.is_walkable(dest.x, dest.y) || map.blocking_entity_at(dest).is_some() {
            return Err(ActionError::impossible("That way is blocked."));
        }
        *engine.map.world.get::<&mut Position>(self.actor)? = dest;
        Ok(())
    }

    fn melee(&self, engine: &mut Engine, dx: i32, dy: i32) -> Result<(), ActionError> {
        let dest = self.position(engine)?.offset(dx, dy);
        let target = engine
            .map
            .blocking_entity_at(dest)
            .filter(|&e| engine.map.world.get::<&Fighter>(e).is_ok())
            .ok_or_else(|| ActionError::impossible("Nothing to attack."))?;

        let world = &engine.map.world;
        let damage = melee_damage(effective_power(world, self.actor)?, effective_defense(world, target)?);
        let text = describe_attack(&name_of(world, self.actor), &name_of(world, target), damage);

        let palette = &engine.data.config.palette;
        let color = if self.actor == engine.player {
            palette.player_atk
        } else {
            palette.enemy_atk
        };
        engine.log.add_message(text, color);

        if damage > 0 {
            apply_damage(
                &mut engine.map.world,
                &mut engine.log,
                &engine.data.config,
                target,
                damage,
                Some(self.actor),
            )?;
        }
        Ok(())
    }

    fn pick_up(&self, engine: &mut Engine) -> Result<(), ActionError> {
        let pos = self.position(engine)?;
        let item = engine
            .map
            .items_at(pos)
            .first()
            .copied()
            .ok_or_else(|| ActionError::impossible("There is nothing here to pick up."))?;

        // Worn items take up pack room
        let worn = engine
            .map
            .world
            .get::<&Equipment>(self.actor)
            .map(|e| e.items().count())
            .unwrap_or(0);
        let inventory = engine.map.world.get::<&Inventory>(self.actor)?;
        if inventory.is_full() || inventory.len() + worn >= inventory.capacity() {
            return Err(ActionError::impossible("Your inventory is full."));
        }
        drop(inventory);

        engine.map.world.remove_one::<Position>(item)?;
        engine.map.world.get::<&mut Inventory>(self.actor)?.add(item);

        let name = name_of(&engine.map.world, item);
        let color = engine.data.config.palette.white;
        engine.log.add_message(format!("You picked up the {}!", name), color);
        Ok(())
    }

    fn drop_item(&self, engine: &mut Engine, item: Entity) -> Result<(), ActionError> {
        let pos = self.position(engine)?;
        let held = carried(&engine.map.world, self.actor, item)?;
        let name = name_of(&engine.map.world, item);
        let color = engine.data.config.palette.white;

        match held {
            Carried::Equipped(slot) => {
                engine.map.world.get::<&mut Equipment>(self.actor)?.set_slot(slot, None);
                engine.log.add_message(format!("You remove the {}.", name), color);
            }
            Carried::Inventory => {
                engine.map.world.get::<&mut Inventory>(self.actor)?.remove(item);
            }
        }
        engine.map.world.insert_one(item, pos)?;
        engine.log.add_message(format!("You dropped the {}.", name), color);
        Ok(())
    }

    fn toggle_equip(&self, engine: &mut Engine, item: Entity) -> Result<(), ActionError> {
        let world = &engine.map.world;
        let name = name_of(world, item);
        let equippable = world
            .get::<&Equippable>(item)
            .map(|e| *e)
            .map_err(|_| ActionError::impossible(format!("The {} cannot be equipped.", name)))?;
        let held = carried(world, self.actor, item)?;
        world.get::<&Equipment>(self.actor)?;
        let color = engine.data.config.palette.white;

        match held {
            Carried::Equipped(slot) => {
                if world.get::<&Inventory>(self.actor)?.is_full() {
                    return Err(ActionError::impossible("Your inventory is full."));
                }
                engine.map.world.get::<&mut Equipment>(self.actor)?.set_slot(slot, None);
                engine.map.world.get::<&mut Inventory>(self.actor)?.add(item);
                engine.log.add_message(format!("You remove the {}.", name), color);
            }
            Carried::Inventory => {
                let slot = equippable.equipment_type;
                engine.map.world.get::<&mut Inventory>(self.actor)?.remove(item);
                let previous = engine
                    .map
                    .world
                    .get::<&mut Equipment>(self.actor)?
                    .set_slot(slot, Some(item));
                if let Some(previous) = previous {
                    // The freed inventory slot always has room for it
                    engine.map.world.get::<&mut Inventory>(self.actor)?.add(previous);
                    let previous_name = name_of(&engine.map.world, previous);
                    engine.log.add_message(format!("You remove the {}.", previous_name), color);
                }
                engine.log.add_message(format!("You equip the {}.", name), color);
            }
        }
        Ok(())
    }

    fn use_item(&self, engine: &mut Engine, item: Entity, target: Option<Position>) -> Result<(), ActionError> {
        let world = &engine.map.world;
        let name = name_of(world, item);
        if carried(world, self.actor, item)? != Carried::Inventory {
            return Err(ActionError::impossible(format!("The {} cannot be used.", name)));
        }
        let consumable = world
            .get::<&Consumable>(item)
            .map(|c| *c)
            .map_err(|_| ActionError::impossible(format!("The {} cannot be used.", name)))?;

        match consumable {
            Consumable::Healing { amount } => self.heal(engine, item, &name, amount),
            Consumable::SingleTargetDamage { damage, max_range } => {
                self.strike(engine, item, target, damage, max_range)
            }
            Consumable::Confusion { turns } => self.confuse(engine, item, target, turns),
            Consumable::AreaDamage { damage, radius } => self.blast(engine, item, target, damage, radius),
        }
    }

    /// Remove a used-up item from the actor and the world
    fn consume(&self, engine: &mut Engine, item: Entity) -> Result<(), ActionError> {
        engine.map.world.get::<&mut Inventory>(self.actor)?.remove(item);
        engine.map.world.despawn(item)?;
        Ok(())
    }

    fn heal(&self, engine: &mut Engine, item: Entity, name: &str, amount: i32) -> Result<(), ActionError> {
        let recovered = {
            let mut fighter = engine.map.world.get::<&mut Fighter>(self.actor)?;
            if fighter.is_full_health() {
                return Err(ActionError::impossible("Your health is already full."));
            }
            fighter.heal(amount)
        };
        let color = engine.data.config.palette.health_recovered;
        engine
            .log
            .add_message(format!("You consume the {}, and recover {} HP!", name, recovered), color);
        self.consume(engine, item)
    }

    fn strike(
        &self,
        engine: &mut Engine,
        item: Entity,
        target: Option<Position>,
        damage: i32,
        max_range: i32,
    ) -> Result<(), ActionError> {
        let no_target = || ActionError::impossible("No valid target.");
        let tile = target.filter(|t| engine.map.is_visible(t.x, t.y)).ok_or_else(no_target)?;
        let victim = engine
            .map
            .actor_at(tile)
            .filter(|&e| e != self.actor)
            .ok_or_else(no_target)?;
        if self.position(engine)?.euclidean_distance(&tile) > max_range as f64 {
            return Err(ActionError::impossible("Target is out of range."));
        }

        let victim_name = name_of(&engine.map.world, victim);
        let color = engine.data.config.palette.player_atk;
        engine.log.add_message(
            format!(
                "A lightning bolt strikes the {} with a loud thunder, for {} damage!",
                victim_name, damage
            ),
            color,
        );
        apply_damage(
            &mut engine.map.world,
            &mut engine.log,
            &engine.data.config,
            victim,
            damage,
            Some(self.actor),
        )?;
        self.consume(engine, item)
    }

    fn confuse(
        &self,
        engine: &mut Engine,
        item: Entity,
        target: Option<Position>,
        turns: u32,
    ) -> Result<(), ActionError> {
        let no_enemy = || ActionError::impossible("You must select an enemy to target.");
        let tile = target.ok_or_else(no_enemy)?;
        if !engine.map.is_visible(tile.x, tile.y) {
            return Err(ActionError::impossible("You cannot target an area that you cannot see."));
        }
        let victim = engine.map.actor_at(tile).ok_or_else(no_enemy)?;
        if victim == self.actor {
            return Err(ActionError::impossible("You cannot confuse yourself!"));
        }
        let previous = engine
            .map
            .world
            .get::<&Ai>(victim)
            .map(|ai| (*ai).clone())
            .map_err(|_| no_enemy())?;

        let victim_name = name_of(&engine.map.world, victim);
        engine.map.world.insert_one(victim, Ai::confused(turns, previous))?;
        let color = engine.data.config.palette.status_effect_applied;
        engine.log.add_message(
            format!("The eyes of the {} look vacant, as it starts to stumble around!", victim_name),
            color,
        );
        self.consume(engine, item)
    }

    fn blast(
        &self,
        engine: &mut Engine,
        item: Entity,
        target: Option<Position>,
        damage: i32,
        radius: i32,
    ) -> Result<(), ActionError> {
        let tile = target
            .filter(|t| engine.map.is_visible(t.x, t.y))
            .ok_or_else(|| ActionError::impossible("You cannot target an area that you cannot see."))?;

        let victims: Vec<Entity> = engine
            .map
            .living_actors()
            .into_iter()
            .filter(|&e| {
                engine
                    .map
                    .position_of(e)
                    .map_or(false, |p| p.euclidean_distance(&tile) <= radius as f64)
            })
            .collect();
        if victims.is_empty() {
            return Err(ActionError::impossible("There are no targets in the radius."));
        }

        let color = engine.data.config.palette.player_atk;
        for victim in victims {
            let victim_name = name_of(&engine.map.world, victim);
            engine.log.add_message(
                format!("The {} is caught in the blast, taking {} damage!", victim_name, damage),
                color,
            );
            apply_damage(
                &mut engine.map.world,
                &mut engine.log,
                &engine.data.config,
                victim,
                damage,
                Some(self.actor),
            )?;
        }
        self.consume(engine, item)
    }

    fn descend(&self, engine: &mut Engine) -> Result<(), ActionError> {
        let pos = self.position(engine)?;
        if self.actor != engine.player || engine.map.tile(pos.x, pos.y) != Some(TileType::StairsDown) {
            return Err(ActionError::impossible("There are no stairs here."));
        }
        engine.descend()?;
        let color = engine.data.config.palette.descend;
        engine.log.add_message("You descend the staircase.", color);
        Ok(())
    }
}
