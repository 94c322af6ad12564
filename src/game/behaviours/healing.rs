//! Consumables applied from the inventory.

use crate::game::World;
use crate::{WildwoodError, WildwoodResult};
use serde::{Deserialize, Serialize};

/// Heals the player when applied, then destroys the item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Healing {
    pub enabled: bool,
    pub amount: i32,
}

impl Healing {
    pub fn new(amount: i32) -> Self {
        Self {
            enabled: true,
            amount,
        }
    }

    /// Applies the item `item` carried by the player.
    ///
    /// Heals up to the player's maximum and consumes the item. Returns the
    /// amount healed.
    pub fn apply(&self, world: &mut World, item: &str) -> WildwoodResult<i32> {
        let player_id = world.player_id().cloned().ok_or(WildwoodError::NoPlayer)?;
        let player = world
            .get_entity_mut(&player_id)
            .ok_or_else(|| WildwoodError::EntityNotFound(player_id.clone()))?;
        let healed = player.heal(self.amount);
        world.consume(&player_id, item)?;
        Ok(healed)
    }
}
