//! Actor and item templates
//!
//! Plain data describing what can be spawned. Spawning builds fresh
//! components every time so no two entities share state.

use hecs::{Entity, EntityBuilder, World};
use serde::{Deserialize, Serialize};

use super::config::value_for_depth;
use crate::ecs::{
    Ai, BlocksMovement, Fighter, Level, Name, Player, Position, RenderOrder, Renderable, Rgb,
};
use crate::items::{Consumable, Equipment, Equippable, Inventory, Item};

/// A template for creating actors from external data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorTemplate {
    /// Unique template ID for reference
    pub id: String,
    pub name: String,
    pub glyph: char,
    pub fg: Rgb,
    pub hp: i32,
    pub defense: i32,
    pub power: i32,
    /// XP awarded to the player for the kill
    #[serde(default)]
    pub xp_given: u32,
    #[serde(default)]
    pub inventory_capacity: usize,
    #[serde(default)]
    pub level_up_base: u32,
    #[serde(default)]
    pub level_up_factor: u32,
    /// `(from_depth, weight)` steps
    #[serde(default)]
    pub spawn_weights: Vec<(u32, u32)>,
}

impl ActorTemplate {
    fn components(&self, pos: Position) -> EntityBuilder {
        let mut builder = EntityBuilder::new();
        builder
            .add(pos)
            .add(Renderable::new(self.glyph, self.fg).with_order(RenderOrder::Actor))
            .add(Name::new(&self.name))
            .add(BlocksMovement)
            .add(Fighter::new(self.hp, self.defense, self.power))
            .add(Inventory::new(self.inventory_capacity))
            .add(Equipment::new())
            .add(Level::new(self.level_up_base, self.level_up_factor, self.xp_given));
        builder
    }

    /// Spawn a hostile monster
    pub fn spawn(&self, world: &mut World, pos: Position) -> Entity {
        let mut builder = self.components(pos);
        builder.add(Ai::Hostile);
        world.spawn(builder.build())
    }

    /// Spawn the player-controlled actor
    pub fn spawn_player(&self, world: &mut World, pos: Position) -> Entity {
        let mut builder = self.components(pos);
        builder.add(Player);
        world.spawn(builder.build())
    }
}

/// A template for creating items from external data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemTemplate {
    pub id: String,
    pub name: String,
    pub glyph: char,
    pub fg: Rgb,
    #[serde(default)]
    pub consumable: Option<Consumable>,
    #[serde(default)]
    pub equippable: Option<Equippable>,
    #[serde(default)]
    pub spawn_weights: Vec<(u32, u32)>,
}

impl ItemTemplate {
    /// Spawn the item, on the floor when a position is given
    pub fn spawn(&self, world: &mut World, pos: Option<Position>) -> Entity {
        let mut builder = EntityBuilder::new();
        builder
            .add(Item)
            .add(Renderable::new(self.glyph, self.fg).with_order(RenderOrder::Item))
            .add(Name::new(&self.name));
        if let Some(pos) = pos {
            builder.add(pos);
        }
        if let Some(consumable) = self.consumable {
            builder.add(consumable);
        }
        if let Some(equippable) = self.equippable {
            builder.add(equippable);
        }
        world.spawn(builder.build())
    }
}

/// All actor templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorTemplates {
    pub player: ActorTemplate,
    pub monsters: Vec<ActorTemplate>,
}

impl ActorTemplates {
    /// Find a monster template by ID
    pub fn find(&self, id: &str) -> Option<&ActorTemplate> {
        self.monsters.iter().find(|t| t.id == id)
    }

    /// Monsters with a positive spawn weight at a depth
    pub fn weighted_for_depth(&self, depth: u32) -> Vec<(&ActorTemplate, u32)> {
        self.monsters
            .iter()
            .map(|t| (t, value_for_depth(&t.spawn_weights, depth)))
            .filter(|(_, w)| *w > 0)
            .collect()
    }
}

/// All item templates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemTemplates {
    pub templates: Vec<ItemTemplate>,
}

impl ItemTemplates {
    /// Find a template by ID
    pub fn find(&self, id: &str) -> Option<&ItemTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Items with a positive spawn weight at a depth
    pub fn weighted_for_depth(&self, depth: u32) -> Vec<(&ItemTemplate, u32)> {
        self.templates
            .iter()
            .map(|t| (t, value_for_depth(&t.spawn_weights, depth)))
            .filter(|(_, w)| *w > 0)
            .collect()
    }
}

fn actor(id: &str, name: &str, glyph: char, fg: Rgb, stats: (i32, i32, i32), xp_given: u32) -> ActorTemplate {
    let (hp, defense, power) = stats;
    ActorTemplate {
        id: id.to_string(),
        name: name.to_string(),
        glyph,
        fg,
        hp,
        defense,
        power,
        xp_given,
        inventory_capacity: 0,
        level_up_base: 0,
        level_up_factor: 0,
        spawn_weights: Vec::new(),
    }
}

/// Create default actor templates (hardcoded fallback)
pub fn default_actor_templates() -> ActorTemplates {
    let player = ActorTemplate {
        inventory_capacity: 26,
        level_up_base: 200,
        level_up_factor: 150,
        ..actor("player", "Player", '@', (255, 255, 255), (30, 2, 5), 0)
    };

    ActorTemplates {
        player,
        monsters: vec![
            ActorTemplate {
                spawn_weights: vec![(1, 80)],
                ..actor("goblin", "Goblin", 'g', (63, 127, 63), (10, 0, 3), 35)
            },
            ActorTemplate {
                spawn_weights: vec![(3, 15), (5, 30), (7, 60)],
                ..actor("ogre", "Ogre", 'O', (0, 127, 0), (16, 1, 4), 100)
            },
        ],
    }
}

fn item(id: &str, name: &str, glyph: char, fg: Rgb, weights: Vec<(u32, u32)>) -> ItemTemplate {
    ItemTemplate {
        id: id.to_string(),
        name: name.to_string(),
        glyph,
        fg,
        consumable: None,
        equippable: None,
        spawn_weights: weights,
    }
}

/// Create default item templates (hardcoded fallback)
pub fn default_item_templates() -> ItemTemplates {
    ItemTemplates {
        templates: vec![
            // === Consumables ===
            ItemTemplate {
                consumable: Some(Consumable::Healing { amount: 4 }),
                ..item("healing_potion", "Healing Potion", '!', (127, 0, 255), vec![(1, 35)])
            },
            ItemTemplate {
                consumable: Some(Consumable::Confusion { turns: 10 }),
                ..item("confusion_scroll", "Confusion Scroll", '~', (207, 63, 255), vec![(2, 10)])
            },
            ItemTemplate {
                consumable: Some(Consumable::SingleTargetDamage { damage: 20, max_range: 5 }),
                ..item("lightning_scroll", "Lightning Scroll", '~', (255, 255, 0), vec![(4, 25)])
            },
            ItemTemplate {
                consumable: Some(Consumable::AreaDamage { damage: 6, radius: 1 }),
                ..item("acid_flask", "Acid Flask", '!', (127, 255, 0), vec![(3, 15)])
            },
            ItemTemplate {
                consumable: Some(Consumable::AreaDamage { damage: 12, radius: 3 }),
                ..item("fireball_scroll", "Fireball Scroll", '~', (255, 0, 0), vec![(6, 25)])
            },
            // === Weapons ===
            ItemTemplate {
                equippable: Some(Equippable::weapon(2)),
                ..item("dagger", "Dagger", '/', (0, 191, 255), vec![(1, 5)])
            },
            ItemTemplate {
                equippable: Some(Equippable::weapon(4)),
                ..item("sword", "Sword", '/', (0, 191, 255), vec![(4, 5)])
            },
            ItemTemplate {
                equippable: Some(Equippable::weapon(6)),
                ..item("battle_axe", "Battle Axe", '/', (0, 191, 255), vec![(7, 5)])
            },
            // === Armor ===
            ItemTemplate {
                equippable: Some(Equippable::armor(1)),
                ..item("leather_armor", "Leather Armor", '[', (139, 69, 19), vec![(1, 5)])
            },
            ItemTemplate {
                equippable: Some(Equippable::armor(3)),
                ..item("chain_mail", "Chain Mail", '[', (139, 69, 19), vec![(6, 15)])
            },
            ItemTemplate {
                equippable: Some(Equippable::armor(5)),
                ..item("plate_mail", "Plate Mail", '[', (139, 69, 19), vec![(8, 5)])
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawned_monsters_do_not_share_state() {
        let templates = default_actor_templates();
        let goblin = templates.find("goblin").unwrap();
        let mut world = World::new();
        let a = goblin.spawn(&mut world, Position::new(1, 1));
        let b = goblin.spawn(&mut world, Position::new(2, 1));

        world.get::<&mut Fighter>(a).unwrap().take_damage(4);
        assert_eq!(world.get::<&Fighter>(a).unwrap().hp, 6);
        assert_eq!(world.get::<&Fighter>(b).unwrap().hp, 10);
        assert!(world.get::<&Ai>(b).is_ok());
        assert_eq!(world.get::<&Level>(b).unwrap().xp_given, 35);
    }

    #[test]
    fn test_player_template() {
        let templates = default_actor_templates();
        let mut world = World::new();
        let player = templates.player.spawn_player(&mut world, Position::new(0, 0));

        assert!(world.get::<&Player>(player).is_ok());
        assert!(world.get::<&Ai>(player).is_err());
        assert_eq!(world.get::<&Inventory>(player).unwrap().capacity(), 26);
        assert_eq!(*world.get::<&Fighter>(player).unwrap(), Fighter::new(30, 2, 5));
    }

    #[test]
    fn test_item_on_floor_or_carried() {
        let templates = default_item_templates();
        let sword = templates.find("sword").unwrap();
        let mut world = World::new();
        let on_floor = sword.spawn(&mut world, Some(Position::new(3, 3)));
        let carried = sword.spawn(&mut world, None);

        assert!(world.get::<&Position>(on_floor).is_ok());
        assert!(world.get::<&Position>(carried).is_err());
        assert_eq!(world.get::<&Equippable>(carried).unwrap().power_bonus, 4);
    }

    #[test]
    fn test_weights_by_depth() {
        let actors = default_actor_templates();
        assert_eq!(actors.weighted_for_depth(1).len(), 1);
        assert_eq!(actors.weighted_for_depth(5).len(), 2);

        let items = default_item_templates();
        let depth_one: Vec<_> = items.weighted_for_depth(1).iter().map(|(t, _)| t.id.clone()).collect();
        assert!(depth_one.contains(&"healing_potion".to_string()));
        assert!(!depth_one.contains(&"fireball_scroll".to_string()));
    }
}
