//! # Inventory and Equipment
//!
//! Inventories and equipment slots hold identities; the items themselves stay
//! registered in the [`World`] as ordinary entities that are simply not drawn.
//! Carry capacity is looked up on every call, since equipping something on
//! the back can change it at any time.

use crate::game::{EquipSlot, World};
use crate::{WildwoodError, WildwoodResult};
use log::debug;

impl World {
    /// Total weight of everything `holder` carries.
    pub fn carried_weight(&self, holder: &str) -> u32 {
        self.get_entity(holder)
            .map(|entity| {
                entity
                    .inventory
                    .iter()
                    .filter_map(|id| self.get_entity(id))
                    .filter_map(|item| item.properties.weight())
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Base carry weight plus the bonus of whatever is worn on the back.
    pub fn max_carry_weight(&self, holder: &str) -> u32 {
        let Some(entity) = self.get_entity(holder) else {
            return 0;
        };
        let bonus = entity
            .equipment
            .get(EquipSlot::Back)
            .and_then(|id| self.get_entity(id))
            .map(|item| item.properties.carry_bonus())
            .unwrap_or(0);
        entity.base_carry_weight + bonus
    }

    /// Puts `item` into `holder`'s inventory.
    ///
    /// Returns `Ok(false)` without changing anything if the item would take
    /// the holder over its carry weight. Adding an item that cannot be picked
    /// up at all is an error.
    pub fn add_to_inventory(&mut self, holder: &str, item: &str) -> WildwoodResult<bool> {
        let weight = self
            .get_entity(item)
            .ok_or_else(|| WildwoodError::EntityNotFound(item.to_string()))?
            .properties
            .weight()
            .ok_or_else(|| WildwoodError::NotPickuppable(item.to_string()))?;
        let position = self
            .position_of(holder)
            .ok_or_else(|| WildwoodError::EntityNotFound(holder.to_string()))?;
        if self.inventory_contains(holder, item) {
            return Ok(true);
        }
        if self.carried_weight(holder) + weight > self.max_carry_weight(holder) {
            debug!("{} cannot carry {} more for {}", holder, weight, item);
            return Ok(false);
        }

        if let Some(entity) = self.get_entity_mut(item) {
            entity.position = position;
            entity.in_inventory = true;
            entity.visible = false;
        }
        if let Some(entity) = self.get_entity_mut(holder) {
            entity.inventory.push(item.to_string());
        }
        self.refresh_render_order();
        Ok(true)
    }

    pub fn inventory_contains(&self, holder: &str, item: &str) -> bool {
        self.get_entity(holder)
            .map(|entity| entity.inventory.iter().any(|id| id == item))
            .unwrap_or(false)
    }

    /// Takes `item` out of `holder`'s inventory and leaves it on the ground
    /// at the holder's feet, unequipping it first. Returns false if the
    /// holder did not carry it.
    pub fn remove_from_inventory(&mut self, holder: &str, item: &str) -> WildwoodResult<bool> {
        if !self.inventory_contains(holder, item) {
            return Ok(false);
        }
        self.unequip_item(holder, item)?;
        if let Some(entity) = self.get_entity_mut(holder) {
            entity.inventory.retain(|id| id != item);
        }
        if let Some(entity) = self.get_entity_mut(item) {
            entity.in_inventory = false;
            entity.equipped = false;
            entity.visible = true;
        }
        self.refresh_render_order();
        Ok(true)
    }

    /// Uses up `item` carried by `holder`: it leaves the inventory without
    /// touching the ground and is deleted at the next cleanup.
    pub fn consume(&mut self, holder: &str, item: &str) -> WildwoodResult<bool> {
        if !self.inventory_contains(holder, item) {
            return Ok(false);
        }
        self.unequip_item(holder, item)?;
        if let Some(entity) = self.get_entity_mut(holder) {
            entity.inventory.retain(|id| id != item);
        }
        if let Some(entity) = self.get_entity_mut(item) {
            entity.in_inventory = true;
            entity.equipped = false;
            entity.visible = false;
        }
        self.queue_for_deletion(item);
        Ok(true)
    }

    /// Moves `item` from `from`'s inventory to `to`'s, if `to` can carry it.
    pub fn transfer(&mut self, from: &str, to: &str, item: &str) -> WildwoodResult<bool> {
        if !self.inventory_contains(from, item) {
            return Ok(false);
        }
        let weight = self
            .get_entity(item)
            .and_then(|entity| entity.properties.weight())
            .ok_or_else(|| WildwoodError::NotPickuppable(item.to_string()))?;
        if self.carried_weight(to) + weight > self.max_carry_weight(to) {
            return Ok(false);
        }
        self.remove_from_inventory(from, item)?;
        self.add_to_inventory(to, item)
    }

    /// Drops everything `holder` carries. Returns the dropped identities.
    pub fn drop_all(&mut self, holder: &str) -> WildwoodResult<Vec<String>> {
        let items = self
            .get_entity(holder)
            .map(|entity| entity.inventory.clone())
            .unwrap_or_default();
        for item in &items {
            self.remove_from_inventory(holder, item)?;
        }
        Ok(items)
    }

    /// Equips `item` in `slot`, picking it up first if needed.
    ///
    /// Returns false if the item cannot go in that slot, or if it has to be
    /// picked up and is too heavy. Whatever occupied the slot before is
    /// unequipped but stays in the inventory.
    pub fn equip(&mut self, holder: &str, slot: EquipSlot, item: &str) -> WildwoodResult<bool> {
        let fits = self
            .get_entity(item)
            .ok_or_else(|| WildwoodError::EntityNotFound(item.to_string()))
            .map(|entity| entity.is_pickuppable() && entity.is_equippable_in(slot))?;
        if !fits {
            return Ok(false);
        }
        if !self.inventory_contains(holder, item) && !self.add_to_inventory(holder, item)? {
            return Ok(false);
        }

        self.unequip_item(holder, item)?;
        self.unequip_slot(holder, slot)?;
        if let Some(entity) = self.get_entity_mut(holder) {
            entity.equipment.set(slot, item.to_string());
        }
        if let Some(entity) = self.get_entity_mut(item) {
            entity.equipped = true;
        }
        debug!("{} equipped {} in {:?}", holder, item, slot);
        Ok(true)
    }

    /// Empties `slot`. Returns false if nothing was equipped there.
    pub fn unequip_slot(&mut self, holder: &str, slot: EquipSlot) -> WildwoodResult<bool> {
        let entity = self
            .get_entity_mut(holder)
            .ok_or_else(|| WildwoodError::EntityNotFound(holder.to_string()))?;
        let Some(item) = entity.equipment.clear(slot) else {
            return Ok(false);
        };
        if let Some(entity) = self.get_entity_mut(&item) {
            entity.equipped = false;
        }
        Ok(true)
    }

    /// Unequips `item` from whichever slot holds it. Returns false if it was
    /// not equipped by `holder`.
    pub fn unequip_item(&mut self, holder: &str, item: &str) -> WildwoodResult<bool> {
        let slot = self
            .get_entity(holder)
            .ok_or_else(|| WildwoodError::EntityNotFound(holder.to_string()))?
            .equipment
            .slot_of(item);
        match slot {
            Some(slot) => self.unequip_slot(holder, slot),
            None => Ok(false),
        }
    }

    /// Eats an edible item from `holder`'s inventory, restoring hunger and
    /// destroying the item. Returns false if the item is not edible.
    pub fn eat(&mut self, holder: &str, item: &str) -> WildwoodResult<bool> {
        let Some((nutrition, name)) = self
            .get_entity(item)
            .and_then(|entity| Some((entity.properties.nutrition()?, entity.name.clone())))
        else {
            return Ok(false);
        };
        if !self.inventory_contains(holder, item) {
            return Ok(false);
        }
        if let Some(hunger) = self
            .get_entity_mut(holder)
            .and_then(|entity| entity.hunger.as_mut())
        {
            hunger.restore(nutrition);
        }
        self.consume(holder, item)?;
        self.notify(format!("You eat the {}.", name.to_lowercase()));
        Ok(true)
    }

    /// Uses an applyable item carried by the player. Returns false if the
    /// item has no use.
    pub fn apply(&mut self, item: &str) -> WildwoodResult<bool> {
        let Some(healing) = self
            .get_entity(item)
            .and_then(|entity| entity.behaviours.healing())
            .filter(|healing| healing.enabled)
            .cloned()
        else {
            return Ok(false);
        };
        let healed = healing.apply(self, item)?;
        self.notify(format!("You recover {} health.", healed));
        Ok(true)
    }
}
