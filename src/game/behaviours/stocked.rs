//! Regrowing resources: bushes that refill with berries, nests with eggs.

use crate::game::{ItemTemplate, World};
use crate::WildwoodResult;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Spawns one `template` item into the parent's inventory whenever the
/// restock timer runs out and the inventory is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeepStocked {
    pub enabled: bool,
    pub template: ItemTemplate,
    pub restock_rate: u32,
    pub timer: u32,
}

impl KeepStocked {
    pub fn new(template: ItemTemplate, restock_rate: u32) -> Self {
        Self {
            enabled: true,
            template,
            restock_rate,
            timer: restock_rate,
        }
    }

    pub fn tick(&mut self, world: &mut World, parent: &str) -> WildwoodResult<()> {
        self.timer = self.timer.saturating_sub(1);
        if self.timer > 0 {
            return Ok(());
        }
        self.timer = self.restock_rate;

        let Some(holder) = world.get_entity(parent) else {
            return Ok(());
        };
        if !holder.inventory.is_empty() {
            return Ok(());
        }
        let item = self.template.spawn(holder.position)?;
        let item_id = item.id.clone();
        world.add_entity(item)?;
        if world.add_to_inventory(parent, &item_id)? {
            debug!("{} restocked with {}", parent, item_id);
        } else {
            warn!("{} cannot hold its own restock {}", parent, item_id);
            world.queue_for_deletion(&item_id);
        }
        Ok(())
    }
}
