//! # Entities
//!
//! The simulated object. An entity carries its own stats, position and flags,
//! owns its properties and behaviours, and refers to the items it carries by
//! identity only: the [`World`](crate::World) remains the sole owner of every
//! entity, including those sitting in an inventory.

use crate::game::{
    new_entity_id, Behaviour, BehaviourSet, EntityId, MaterialType, Point, Property,
    PropertyKind, PropertySet,
};
use crate::rendering::Rgb;
use crate::WildwoodResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Equipment slots, in the order the equipment screen pages through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EquipSlot {
    Head,
    Torso,
    Legs,
    RightHand,
    LeftHand,
    Feet,
    Back,
}

impl EquipSlot {
    pub const ALL: [EquipSlot; 7] = [
        EquipSlot::Head,
        EquipSlot::Torso,
        EquipSlot::Legs,
        EquipSlot::RightHand,
        EquipSlot::LeftHand,
        EquipSlot::Feet,
        EquipSlot::Back,
    ];

    fn index(self) -> usize {
        EquipSlot::ALL
            .iter()
            .position(|slot| *slot == self)
            .unwrap_or_default()
    }

    /// The following slot, wrapping from `Back` to `Head`.
    pub fn next(self) -> Self {
        EquipSlot::ALL[(self.index() + 1) % EquipSlot::ALL.len()]
    }

    /// The preceding slot, wrapping from `Head` to `Back`.
    pub fn prev(self) -> Self {
        let len = EquipSlot::ALL.len();
        EquipSlot::ALL[(self.index() + len - 1) % len]
    }

    pub fn label(self) -> &'static str {
        match self {
            EquipSlot::Head => "Head",
            EquipSlot::Torso => "Torso",
            EquipSlot::Legs => "Legs",
            EquipSlot::RightHand => "Right hand",
            EquipSlot::LeftHand => "Left hand",
            EquipSlot::Feet => "Feet",
            EquipSlot::Back => "Back",
        }
    }
}

/// Slot to item identity. An absent key is an empty slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    slots: BTreeMap<EquipSlot, EntityId>,
}

impl Equipment {
    pub fn get(&self, slot: EquipSlot) -> Option<&EntityId> {
        self.slots.get(&slot)
    }

    pub fn set(&mut self, slot: EquipSlot, id: EntityId) -> Option<EntityId> {
        self.slots.insert(slot, id)
    }

    pub fn clear(&mut self, slot: EquipSlot) -> Option<EntityId> {
        self.slots.remove(&slot)
    }

    /// The slot this identity is equipped in, if any.
    pub fn slot_of(&self, id: &str) -> Option<EquipSlot> {
        self.slots
            .iter()
            .find(|(_, equipped)| equipped.as_str() == id)
            .map(|(slot, _)| *slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EquipSlot, &EntityId)> {
        self.slots.iter().map(|(slot, id)| (*slot, id))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// How an entity looks on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glyph {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Option<Rgb>,
}

impl Glyph {
    pub const fn new(ch: char, fg: Rgb) -> Self {
        Self { ch, fg, bg: None }
    }
}

/// Hunger meter. Only the player carries one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunger {
    pub current: u32,
    pub max: u32,
}

impl Hunger {
    pub fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Restores up to `amount`, capped at the maximum. Returns what was restored.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max - self.current);
        self.current += restored;
        restored
    }
}

/// Structured capability summary of an entity, used by the item blurbs on the
/// UI screens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemDescription {
    pub name: String,
    pub description: String,
    pub weight: Option<u32>,
    pub slots: Vec<EquipSlot>,
    pub melee_bonus: u32,
    pub carry_bonus: u32,
    pub material: Option<(MaterialType, u8)>,
    pub nutrition: Option<u32>,
    pub heals: Option<i32>,
    pub burn_ticks: Option<u32>,
    pub gives_light: bool,
}

impl ItemDescription {
    /// One short line per known capability.
    pub fn stat_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(weight) = self.weight {
            lines.push(format!("Weight: {}", weight));
        }
        if !self.slots.is_empty() {
            let slots: Vec<&str> = self.slots.iter().map(|slot| slot.label()).collect();
            lines.push(format!("Equip: {}", slots.join(", ")));
        }
        if self.melee_bonus > 0 {
            lines.push(format!("Damage: +{}", self.melee_bonus));
        }
        if self.carry_bonus > 0 {
            lines.push(format!("Carry weight: +{}", self.carry_bonus));
        }
        if let Some((material, quality)) = self.material {
            lines.push(format!("Material: {} (quality {})", material, quality));
        }
        if let Some(nutrition) = self.nutrition {
            lines.push(format!("Nutrition: {}", nutrition));
        }
        if let Some(heals) = self.heals {
            lines.push(format!("Heals: {}", heals));
        }
        if let Some(burn) = self.burn_ticks {
            lines.push(format!("Burns for {} turns", burn));
        }
        if self.gives_light {
            lines.push("Gives light".to_string());
        }
        lines
    }
}

/// A simulated object in the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub short_desc: String,
    pub long_desc: String,
    pub glyph: Glyph,
    pub hp: i32,
    pub max_hp: i32,
    /// Hit points regained per tick
    pub regen: i32,
    /// Number of damage dice rolled per attack
    pub hit_times: u32,
    /// Base size of each damage die
    pub hit_amount: u32,
    pub position: Point,
    /// Higher layers are drawn first
    pub layer: i32,
    pub solid: bool,
    pub in_inventory: bool,
    pub equipped: bool,
    pub visible: bool,
    pub base_carry_weight: u32,
    pub hunger: Option<Hunger>,
    pub inventory: Vec<EntityId>,
    pub equipment: Equipment,
    pub behaviours: BehaviourSet,
    pub properties: PropertySet,
}

impl Entity {
    /// Creates an entity. An empty `id` is replaced by a generated identity.
    ///
    /// # Examples
    ///
    /// ```
    /// use wildwood::{Entity, Glyph, Point, Rgb};
    ///
    /// let stone = Entity::new("", "Stone", Glyph::new('*', Rgb::GREY), Point::new(3, 4));
    /// assert!(stone.id.starts_with("stone-"));
    /// assert_eq!(stone.position, Point::new(3, 4));
    /// ```
    pub fn new(id: &str, name: &str, glyph: Glyph, position: Point) -> Self {
        let id = if id.is_empty() {
            new_entity_id(name)
        } else {
            id.to_string()
        };
        Self {
            id,
            name: name.to_string(),
            short_desc: String::new(),
            long_desc: String::new(),
            glyph,
            hp: 1,
            max_hp: 1,
            regen: 0,
            hit_times: 0,
            hit_amount: 0,
            position,
            layer: 0,
            solid: false,
            in_inventory: false,
            equipped: false,
            visible: true,
            base_carry_weight: 0,
            hunger: None,
            inventory: Vec::new(),
            equipment: Equipment::default(),
            behaviours: BehaviourSet::new(),
            properties: PropertySet::new(),
        }
    }

    pub fn with_description(mut self, short_desc: &str, long_desc: &str) -> Self {
        self.short_desc = short_desc.to_string();
        self.long_desc = long_desc.to_string();
        self
    }

    pub fn with_health(mut self, max_hp: i32, regen: i32) -> Self {
        self.hp = max_hp;
        self.max_hp = max_hp;
        self.regen = regen;
        self
    }

    pub fn with_attack(mut self, hit_times: u32, hit_amount: u32) -> Self {
        self.hit_times = hit_times;
        self.hit_amount = hit_amount;
        self
    }

    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    pub fn solid(mut self) -> Self {
        self.solid = true;
        self
    }

    pub fn with_carry_weight(mut self, weight: u32) -> Self {
        self.base_carry_weight = weight;
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.insert(property);
        self
    }

    /// Attaches a behaviour, enforcing the per-kind and sibling preconditions.
    pub fn add_behaviour(&mut self, behaviour: Behaviour) -> WildwoodResult<()> {
        self.behaviours.insert(&self.id, behaviour)
    }

    pub fn with_behaviour(mut self, behaviour: Behaviour) -> WildwoodResult<Self> {
        self.add_behaviour(behaviour)?;
        Ok(self)
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn has_property(&self, kind: PropertyKind) -> bool {
        self.properties.has(kind)
    }

    pub fn is_pickuppable(&self) -> bool {
        self.properties.weight().is_some()
    }

    pub fn is_equippable_in(&self, slot: EquipSlot) -> bool {
        self.properties.equip_slots().contains(&slot)
    }

    pub fn heal(&mut self, amount: i32) -> i32 {
        let healed = amount.min(self.max_hp - self.hp).max(0);
        self.hp += healed;
        healed
    }

    /// Whether the entity is currently chasing the player.
    pub fn is_hostile(&self) -> bool {
        self.behaviours
            .chase()
            .map(|chase| chase.enabled)
            .unwrap_or(false)
    }

    /// Whether this is a living creature that can be attacked.
    pub fn is_creature(&self) -> bool {
        !self.in_inventory
            && self.behaviours.iter().any(|behaviour| {
                matches!(
                    behaviour,
                    Behaviour::Wander(_)
                        | Behaviour::Attachment(_)
                        | Behaviour::WanderAttach(_)
                        | Behaviour::ChaseAndAttack(_)
                        | Behaviour::SeekHome(_)
                )
            })
    }

    /// Capability summary for item blurbs.
    pub fn describe(&self) -> ItemDescription {
        ItemDescription {
            name: self.name.clone(),
            description: if self.long_desc.is_empty() {
                self.short_desc.clone()
            } else {
                self.long_desc.clone()
            },
            weight: self.properties.weight(),
            slots: self.properties.equip_slots().to_vec(),
            melee_bonus: self.properties.melee_bonus(),
            carry_bonus: self.properties.carry_bonus(),
            material: self.properties.material(),
            nutrition: self.properties.nutrition(),
            heals: self.behaviours.healing().map(|healing| healing.amount),
            burn_ticks: self.properties.burn_ticks(),
            gives_light: self.properties.light().is_some(),
        }
    }
}
