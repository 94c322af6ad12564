//! # Crafting
//!
//! Recipes consume concrete material items from an inventory, tracked by
//! identity, against a per-ingredient quantity. A recipe is satisfied once
//! every ingredient quantity has been counted down to zero.

use crate::game::{EntityId, ItemTemplate, Point, World};
use crate::{WildwoodError, WildwoodResult};
use log::info;
use serde::{Deserialize, Serialize};

/// Kind of raw material an item counts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MaterialType {
    Wood,
    Grass,
    Stone,
}

impl std::fmt::Display for MaterialType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MaterialType::Wood => "wood",
            MaterialType::Grass => "grass",
            MaterialType::Stone => "stone",
        };
        f.write_str(name)
    }
}

/// Where a finished product ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    /// Straight into the crafter's inventory
    Inventory,
    /// On a free square next to the crafter
    World,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub material: MaterialType,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub product: ItemTemplate,
    pub ingredients: Vec<Ingredient>,
    pub placement: Placement,
}

impl Recipe {
    pub fn new(name: &str, product: ItemTemplate, placement: Placement) -> Self {
        Self {
            name: name.to_string(),
            product,
            ingredients: Vec::new(),
            placement,
        }
    }

    pub fn needs(mut self, material: MaterialType, quantity: u32) -> Self {
        self.ingredients.push(Ingredient { material, quantity });
        self
    }
}

/// The recipes the player knows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeBook {
    pub recipes: Vec<Recipe>,
}

impl RecipeBook {
    pub fn standard() -> Self {
        Self {
            recipes: vec![
                Recipe::new("Campfire", ItemTemplate::Campfire, Placement::World)
                    .needs(MaterialType::Wood, 2)
                    .needs(MaterialType::Grass, 1),
                Recipe::new("Spear", ItemTemplate::Spear, Placement::Inventory)
                    .needs(MaterialType::Wood, 2)
                    .needs(MaterialType::Stone, 1),
                Recipe::new("Torch", ItemTemplate::Torch, Placement::Inventory)
                    .needs(MaterialType::Wood, 1)
                    .needs(MaterialType::Grass, 1),
                Recipe::new("Grass backpack", ItemTemplate::Backpack, Placement::Inventory)
                    .needs(MaterialType::Grass, 4)
                    .needs(MaterialType::Wood, 1),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Recipe> {
        self.recipes.get(index)
    }
}

/// A recipe being filled in, one material item at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeProgress {
    pub recipe: Recipe,
    /// Units still missing, per ingredient
    pub remaining: Vec<u32>,
    /// Items set aside so far
    pub assigned: Vec<EntityId>,
}

impl RecipeProgress {
    pub fn new(recipe: Recipe) -> Self {
        let remaining = recipe.ingredients.iter().map(|i| i.quantity).collect();
        Self {
            recipe,
            remaining,
            assigned: Vec::new(),
        }
    }

    pub fn is_satisfied(&self) -> bool {
        self.remaining.iter().all(|left| *left == 0)
    }

    /// Items in `holder`'s inventory that can fill `ingredient` and are not
    /// already set aside.
    pub fn candidates(&self, world: &World, holder: &str, ingredient: usize) -> Vec<EntityId> {
        let Some(wanted) = self.recipe.ingredients.get(ingredient) else {
            return Vec::new();
        };
        let Some(holder) = world.get_entity(holder) else {
            return Vec::new();
        };
        holder
            .inventory
            .iter()
            .filter(|id| !self.assigned.contains(id))
            .filter(|id| {
                world
                    .get_entity(id)
                    .and_then(|item| item.properties.material())
                    .map(|(material, _)| material == wanted.material)
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }

    /// Sets `item` aside for `ingredient`, counting its quantity down by one.
    ///
    /// Returns false if the ingredient is already complete, the item is
    /// already assigned, or the item is not made of the right material.
    pub fn assign(&mut self, world: &World, ingredient: usize, item: &str) -> bool {
        let Some(wanted) = self.recipe.ingredients.get(ingredient) else {
            return false;
        };
        if self.remaining[ingredient] == 0 || self.assigned.iter().any(|id| id == item) {
            return false;
        }
        let matches = world
            .get_entity(item)
            .and_then(|entity| entity.properties.material())
            .map(|(material, _)| material == wanted.material)
            .unwrap_or(false);
        if !matches {
            return false;
        }
        self.remaining[ingredient] -= 1;
        self.assigned.push(item.to_string());
        true
    }

    /// Consumes the assigned materials and creates the product.
    ///
    /// Inventory products go to `crafter`'s inventory, or on the ground at the
    /// crafter's feet if they are too heavy to carry. World products are
    /// placed at `target`.
    pub fn build(
        &self,
        world: &mut World,
        crafter: &str,
        target: Option<Point>,
    ) -> WildwoodResult<EntityId> {
        if !self.is_satisfied() {
            return Err(WildwoodError::InvalidState(format!(
                "{} is missing ingredients",
                self.recipe.name
            )));
        }
        let crafter_pos = world
            .position_of(crafter)
            .ok_or_else(|| WildwoodError::EntityNotFound(crafter.to_string()))?;

        for item in &self.assigned {
            world.consume(crafter, item)?;
        }

        let position = match self.recipe.placement {
            Placement::Inventory => crafter_pos,
            Placement::World => target.unwrap_or(crafter_pos),
        };
        let product = self.recipe.product.spawn(position)?;
        let product_id = product.id.clone();
        world.add_entity(product)?;
        info!("{} crafted {}", crafter, product_id);

        if self.recipe.placement == Placement::Inventory
            && !world.add_to_inventory(crafter, &product_id)?
        {
            world.notify(format!(
                "The {} is too heavy to carry; you set it down.",
                self.recipe.name.to_lowercase()
            ));
        }
        Ok(product_id)
    }
}
