//! # Properties
//!
//! Named, typed attributes an entity may or may not carry. The set of
//! property names is closed: every name an entity can hold is a
//! [`PropertyKind`], and looking up any other name is an error rather than a
//! silent miss.

use crate::game::{EquipSlot, MaterialType};
use crate::rendering::Rgb;
use crate::{WildwoodError, WildwoodResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The registry of property names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PropertyKind {
    Pickuppable,
    Equippable,
    CraftingMaterial,
    LightEmitting,
    AdditionalCarryWeight,
    MeleeWeaponDamage,
    Edible,
    Combustible,
}

impl PropertyKind {
    /// Every registered property kind.
    pub const ALL: [PropertyKind; 8] = [
        PropertyKind::Pickuppable,
        PropertyKind::Equippable,
        PropertyKind::CraftingMaterial,
        PropertyKind::LightEmitting,
        PropertyKind::AdditionalCarryWeight,
        PropertyKind::MeleeWeaponDamage,
        PropertyKind::Edible,
        PropertyKind::Combustible,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PropertyKind::Pickuppable => "Pickuppable",
            PropertyKind::Equippable => "Equippable",
            PropertyKind::CraftingMaterial => "CraftingMaterial",
            PropertyKind::LightEmitting => "LightEmitting",
            PropertyKind::AdditionalCarryWeight => "AdditionalCarryWeight",
            PropertyKind::MeleeWeaponDamage => "MeleeWeaponDamage",
            PropertyKind::Edible => "Edible",
            PropertyKind::Combustible => "Combustible",
        }
    }
}

impl FromStr for PropertyKind {
    type Err = WildwoodError;

    fn from_str(name: &str) -> WildwoodResult<Self> {
        PropertyKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| WildwoodError::UnregisteredProperty(name.to_string()))
    }
}

impl std::fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// When a light-emitting entity actually gives off light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightCondition {
    Always,
    /// Only while the item sits in an equipment slot (torches)
    WhenEquipped,
    /// Only while the entity's fire is lit; the radius flickers
    WhileBurning,
}

/// A property value with its typed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Property {
    Pickuppable {
        weight: u32,
    },
    Equippable {
        slots: Vec<EquipSlot>,
    },
    CraftingMaterial {
        material: MaterialType,
        quality: u8,
    },
    LightEmitting {
        radius: u32,
        color: Rgb,
        condition: LightCondition,
    },
    AdditionalCarryWeight(u32),
    MeleeWeaponDamage(u32),
    Edible {
        nutrition: u32,
    },
    Combustible {
        burn_ticks: u32,
    },
}

impl Property {
    pub fn kind(&self) -> PropertyKind {
        match self {
            Property::Pickuppable { .. } => PropertyKind::Pickuppable,
            Property::Equippable { .. } => PropertyKind::Equippable,
            Property::CraftingMaterial { .. } => PropertyKind::CraftingMaterial,
            Property::LightEmitting { .. } => PropertyKind::LightEmitting,
            Property::AdditionalCarryWeight(_) => PropertyKind::AdditionalCarryWeight,
            Property::MeleeWeaponDamage(_) => PropertyKind::MeleeWeaponDamage,
            Property::Edible { .. } => PropertyKind::Edible,
            Property::Combustible { .. } => PropertyKind::Combustible,
        }
    }
}

/// The properties held by one entity, at most one per kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySet {
    properties: Vec<Property>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a property, replacing any previous value of the same kind.
    pub fn insert(&mut self, property: Property) -> Option<Property> {
        let kind = property.kind();
        match self.properties.iter_mut().find(|p| p.kind() == kind) {
            Some(existing) => Some(std::mem::replace(existing, property)),
            None => {
                self.properties.push(property);
                None
            }
        }
    }

    pub fn remove(&mut self, kind: PropertyKind) -> Option<Property> {
        let index = self.properties.iter().position(|p| p.kind() == kind)?;
        Some(self.properties.remove(index))
    }

    pub fn get(&self, kind: PropertyKind) -> Option<&Property> {
        self.properties.iter().find(|p| p.kind() == kind)
    }

    /// Looks a property up by its registered name.
    ///
    /// Returns `Ok(None)` when the entity does not hold the property and an
    /// `UnregisteredProperty` error when the name is not a property at all.
    pub fn get_by_name(&self, name: &str) -> WildwoodResult<Option<&Property>> {
        let kind: PropertyKind = name.parse()?;
        Ok(self.get(kind))
    }

    pub fn has(&self, kind: PropertyKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    pub fn weight(&self) -> Option<u32> {
        match self.get(PropertyKind::Pickuppable) {
            Some(Property::Pickuppable { weight }) => Some(*weight),
            _ => None,
        }
    }

    pub fn equip_slots(&self) -> &[EquipSlot] {
        match self.get(PropertyKind::Equippable) {
            Some(Property::Equippable { slots }) => slots,
            _ => &[],
        }
    }

    pub fn material(&self) -> Option<(MaterialType, u8)> {
        match self.get(PropertyKind::CraftingMaterial) {
            Some(Property::CraftingMaterial { material, quality }) => Some((*material, *quality)),
            _ => None,
        }
    }

    pub fn light(&self) -> Option<(u32, Rgb, LightCondition)> {
        match self.get(PropertyKind::LightEmitting) {
            Some(Property::LightEmitting {
                radius,
                color,
                condition,
            }) => Some((*radius, *color, *condition)),
            _ => None,
        }
    }

    pub fn carry_bonus(&self) -> u32 {
        match self.get(PropertyKind::AdditionalCarryWeight) {
            Some(Property::AdditionalCarryWeight(bonus)) => *bonus,
            _ => 0,
        }
    }

    pub fn melee_bonus(&self) -> u32 {
        match self.get(PropertyKind::MeleeWeaponDamage) {
            Some(Property::MeleeWeaponDamage(bonus)) => *bonus,
            _ => 0,
        }
    }

    pub fn nutrition(&self) -> Option<u32> {
        match self.get(PropertyKind::Edible) {
            Some(Property::Edible { nutrition }) => Some(*nutrition),
            _ => None,
        }
    }

    pub fn burn_ticks(&self) -> Option<u32> {
        match self.get(PropertyKind::Combustible) {
            Some(Property::Combustible { burn_ticks }) => Some(*burn_ticks),
            _ => None,
        }
    }
}
