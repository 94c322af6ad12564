//! # Templates
//!
//! Constructors for every kind of thing that exists in the wild: spawnable
//! items (used by restocking and crafting) and the creatures and structures
//! placed by world generation.

use crate::config::BASE_CARRY_WEIGHT;
use crate::game::{
    Attachment, Behaviour, ChaseAndAttack, Entity, EquipSlot, Glyph, Healing, Hostility, Hunger,
    Interactable, KeepStocked, LightCondition, MaterialType, Point, Property, SeekHome, Wander,
    WanderAttach, DOOR_CLOSED, DOOR_OPEN,
};
use crate::rendering::Rgb;
use crate::WildwoodResult;
use serde::{Deserialize, Serialize};

/// Draw layers; higher layers are drawn first.
pub mod layers {
    pub const GROUND: i32 = 4;
    pub const STRUCTURE: i32 = 3;
    pub const ITEM: i32 = 2;
    pub const CREATURE: i32 = 1;
    pub const PLAYER: i32 = 0;
}

pub const PLAYER_ID: &str = "Player";

/// A kind of item that can be spawned on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemTemplate {
    Berry,
    Stick,
    Grass,
    Stone,
    HealingHerb,
    Spear,
    Backpack,
    Torch,
    Campfire,
}

impl ItemTemplate {
    pub fn name(self) -> &'static str {
        match self {
            ItemTemplate::Berry => "Berry",
            ItemTemplate::Stick => "Stick",
            ItemTemplate::Grass => "Grass",
            ItemTemplate::Stone => "Stone",
            ItemTemplate::HealingHerb => "Healing herb",
            ItemTemplate::Spear => "Spear",
            ItemTemplate::Backpack => "Grass backpack",
            ItemTemplate::Torch => "Torch",
            ItemTemplate::Campfire => "Campfire",
        }
    }

    /// Builds a fresh instance with a generated identity at `position`.
    pub fn spawn(self, position: Point) -> WildwoodResult<Entity> {
        let item = |ch: char, fg: Rgb| {
            Entity::new("", self.name(), Glyph::new(ch, fg), position).with_layer(layers::ITEM)
        };
        let entity = match self {
            ItemTemplate::Berry => item('%', Rgb::RED)
                .with_description("A red berry.", "A plump red berry. Probably safe to eat.")
                .with_property(Property::Pickuppable { weight: 1 })
                .with_property(Property::Edible { nutrition: 3 }),
            ItemTemplate::Stick => item('/', Rgb::BROWN)
                .with_description("A stick.", "A dry stick, good for building and burning.")
                .with_property(Property::Pickuppable { weight: 1 })
                .with_property(Property::CraftingMaterial {
                    material: MaterialType::Wood,
                    quality: 1,
                })
                .with_property(Property::Combustible { burn_ticks: 30 }),
            ItemTemplate::Grass => item('"', Rgb::GREEN)
                .with_description("Some grass.", "A handful of long, tough grass.")
                .with_property(Property::Pickuppable { weight: 1 })
                .with_property(Property::CraftingMaterial {
                    material: MaterialType::Grass,
                    quality: 1,
                })
                .with_property(Property::Combustible { burn_ticks: 10 }),
            ItemTemplate::Stone => item('*', Rgb::GREY)
                .with_description("A stone.", "A fist-sized stone with a sharp edge.")
                .with_property(Property::Pickuppable { weight: 2 })
                .with_property(Property::CraftingMaterial {
                    material: MaterialType::Stone,
                    quality: 1,
                }),
            ItemTemplate::HealingHerb => item('+', Rgb::GREEN)
                .with_description("A healing herb.", "A bitter leaf that closes wounds.")
                .with_property(Property::Pickuppable { weight: 1 })
                .with_behaviour(Behaviour::Healing(Healing::new(5)))?,
            ItemTemplate::Spear => item('/', Rgb::GREY)
                .with_description("A spear.", "A sharpened stone lashed to a long stick.")
                .with_property(Property::Pickuppable { weight: 3 })
                .with_property(Property::Equippable {
                    slots: vec![EquipSlot::RightHand],
                })
                .with_property(Property::MeleeWeaponDamage(3)),
            ItemTemplate::Backpack => item('&', Rgb::GREEN)
                .with_description("A grass backpack.", "Woven grass on a wooden frame.")
                .with_property(Property::Pickuppable { weight: 2 })
                .with_property(Property::Equippable {
                    slots: vec![EquipSlot::Back],
                })
                .with_property(Property::AdditionalCarryWeight(15)),
            ItemTemplate::Torch => item('!', Rgb::ORANGE)
                .with_description("A torch.", "A stick with burning grass wound around it.")
                .with_property(Property::Pickuppable { weight: 1 })
                .with_property(Property::Equippable {
                    slots: vec![EquipSlot::RightHand, EquipSlot::LeftHand],
                })
                .with_property(Property::LightEmitting {
                    radius: 5,
                    color: Rgb::ORANGE,
                    condition: LightCondition::WhenEquipped,
                })
                .with_property(Property::Combustible { burn_ticks: 20 }),
            ItemTemplate::Campfire => item('^', Rgb::ORANGE)
                .with_layer(layers::STRUCTURE)
                .with_description("A campfire.", "A ring of stones around a crackling fire.")
                .with_property(Property::LightEmitting {
                    radius: 7,
                    color: Rgb::ORANGE,
                    condition: LightCondition::WhileBurning,
                })
                .with_behaviour(Behaviour::Interactable(Interactable::fire(60)))?,
        };
        Ok(entity)
    }
}

pub fn player(position: Point) -> Entity {
    let mut player = Entity::new(PLAYER_ID, "You", Glyph::new('@', Rgb::WHITE), position)
        .with_description("You.", "Lost in the woods, hungry and alone.")
        .with_health(20, 0)
        .with_attack(1, 2)
        .with_layer(layers::PLAYER)
        .with_carry_weight(BASE_CARRY_WEIGHT)
        .solid();
    player.hunger = Some(Hunger::full(20));
    player
}

pub fn rabbit(position: Point) -> WildwoodResult<Entity> {
    Entity::new("", "Rabbit", Glyph::new('r', Rgb::WHITE), position)
        .with_description("A rabbit.", "A twitchy brown rabbit.")
        .with_health(3, 0)
        .with_layer(layers::CREATURE)
        .with_behaviour(Behaviour::SeekHome(SeekHome::new("Burrow", 10.0, 0.05, 0.05)))?
        .with_behaviour(Behaviour::Wander(Wander::new()))
}

/// A friendly dog that follows the player around for a while.
pub fn dog(position: Point) -> WildwoodResult<Entity> {
    Entity::new("", "Dog", Glyph::new('d', Rgb::BROWN), position)
        .with_description("A dog.", "A scruffy dog. It seems to like you.")
        .with_health(8, 1)
        .with_attack(1, 2)
        .with_layer(layers::CREATURE)
        .solid()
        .with_behaviour(Behaviour::WanderAttach(WanderAttach::new(Attachment::new(
            0.2, 0.8, 0.02, 6.0,
        ))))?
        .with_behaviour(Behaviour::ChaseAndAttack(
            ChaseAndAttack::new(0.9, 0.2, 10.0).dormant(),
        ))
}

pub fn wolf(position: Point) -> WildwoodResult<Entity> {
    let mut wolf = Entity::new("", "Wolf", Glyph::new('w', Rgb::GREY), position)
        .with_description("A wolf.", "A lean grey wolf with yellow eyes.")
        .with_health(10, 0)
        .with_attack(2, 2)
        .with_layer(layers::CREATURE)
        .solid()
        .with_behaviour(Behaviour::Wander(Wander::new()))?
        .with_behaviour(Behaviour::ChaseAndAttack(
            ChaseAndAttack::new(0.8, 0.1, 12.0).dormant(),
        ))?;
    Hostility::attach_to(&mut wolf, 6.0, 0.3)?;
    Ok(wolf)
}

pub fn berry_bush(position: Point) -> WildwoodResult<Entity> {
    Entity::new("", "Berry bush", Glyph::new('&', Rgb::DARK_GREEN), position)
        .with_description("A berry bush.", "A low bush. Berries grow back here.")
        .with_layer(layers::STRUCTURE)
        .with_carry_weight(5)
        .with_behaviour(Behaviour::KeepStocked(KeepStocked::new(ItemTemplate::Berry, 60)))
}

pub fn burrow(position: Point) -> Entity {
    Entity::new("", "Burrow", Glyph::new('o', Rgb::BROWN), position)
        .with_description("A burrow.", "A small hole in the ground.")
        .with_layer(layers::GROUND)
}

pub fn tree(position: Point) -> Entity {
    Entity::new("", "Tree", Glyph::new('T', Rgb::DARK_GREEN), position)
        .with_description("A tree.", "A tall pine.")
        .with_layer(layers::STRUCTURE)
        .solid()
}

pub fn door(position: Point, open: bool) -> WildwoodResult<Entity> {
    let glyph = if open { DOOR_OPEN } else { DOOR_CLOSED };
    let mut door = Entity::new("", "Door", glyph, position)
        .with_description("A door.", "A rough plank door.")
        .with_layer(layers::STRUCTURE)
        .with_behaviour(Behaviour::Interactable(Interactable::door(open)))?;
    door.solid = !open;
    Ok(door)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::BehaviourKind;

    #[test]
    fn test_every_item_template_spawns_with_fresh_ids() {
        let all = [
            ItemTemplate::Berry,
            ItemTemplate::Stick,
            ItemTemplate::Grass,
            ItemTemplate::Stone,
            ItemTemplate::HealingHerb,
            ItemTemplate::Spear,
            ItemTemplate::Backpack,
            ItemTemplate::Torch,
            ItemTemplate::Campfire,
        ];
        for template in all {
            let a = template.spawn(Point::new(1, 2)).unwrap();
            let b = template.spawn(Point::new(1, 2)).unwrap();
            assert_ne!(a.id, b.id);
            assert_eq!(a.name, template.name());
            assert_eq!(a.position, Point::new(1, 2));
        }
    }

    #[test]
    fn test_only_campfire_is_not_pickuppable() {
        assert!(ItemTemplate::Stick.spawn(Point::origin()).unwrap().is_pickuppable());
        assert!(!ItemTemplate::Campfire.spawn(Point::origin()).unwrap().is_pickuppable());
    }

    #[test]
    fn test_wolf_starts_dormant_with_watcher() {
        let wolf = wolf(Point::origin()).unwrap();
        assert!(!wolf.is_hostile());
        assert!(wolf.behaviours.hostility().is_some());
        assert!(wolf.behaviours.is_enabled(BehaviourKind::Wander));
    }

    #[test]
    fn test_door_solidity_matches_state() {
        assert!(door(Point::origin(), false).unwrap().solid);
        assert!(!door(Point::origin(), true).unwrap().solid);
    }
}
