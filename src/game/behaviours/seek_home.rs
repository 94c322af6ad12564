//! Opportunistic return to a nearby named home (burrows, dens).

use crate::game::{EntityId, World, WANDERING_KINDS};
use crate::WildwoodResult;
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeekHome {
    pub enabled: bool,
    /// Name of the entities that count as a home
    pub home_name: String,
    pub range: f64,
    /// Chance per tick to start looking for a home while homeless
    pub seek_chance: f64,
    /// Chance per tick to leave home again once inside
    pub flight_chance: f64,
    pub target: Option<EntityId>,
    pub in_home: bool,
}

impl SeekHome {
    pub fn new(home_name: &str, range: f64, seek_chance: f64, flight_chance: f64) -> Self {
        Self {
            enabled: true,
            home_name: home_name.to_string(),
            range,
            seek_chance,
            flight_chance,
            target: None,
            in_home: false,
        }
    }

    pub fn tick(&mut self, world: &mut World, parent: &str) -> WildwoodResult<()> {
        let Some(position) = world.position_of(parent) else {
            return Ok(());
        };

        if self.target.is_none() {
            if !world.roll(self.seek_chance) {
                return Ok(());
            }
            let homes: Vec<EntityId> = world
                .entities_within(position, self.range)
                .into_iter()
                .filter(|id| id.as_str() != parent)
                .filter(|id| {
                    world
                        .get_entity(id)
                        .map(|home| home.name == self.home_name && !home.in_inventory)
                        .unwrap_or(false)
                })
                .collect();
            if homes.is_empty() {
                return Ok(());
            }
            let pick = world.rng_mut().gen_range(0..homes.len());
            debug!("{} heads home to {}", parent, homes[pick]);
            self.target = Some(homes[pick].clone());
        }

        let Some(home_pos) = self.target.as_deref().and_then(|id| world.position_of(id)) else {
            debug!("{} lost its home", parent);
            self.leave_home(world, parent);
            return Ok(());
        };

        if self.in_home {
            if world.roll(self.flight_chance) {
                debug!("{} leaves home", parent);
                self.leave_home(world, parent);
            }
            return Ok(());
        }

        set_wandering(world, parent, false);
        if position != home_pos {
            world.move_entity(parent, position.step_toward(home_pos))?;
        }
        if world.position_of(parent) == Some(home_pos) {
            self.in_home = true;
            if let Some(entity) = world.get_entity_mut(parent) {
                entity.visible = false;
            }
            world.refresh_render_order();
        }
        Ok(())
    }

    fn leave_home(&mut self, world: &mut World, parent: &str) {
        self.target = None;
        self.in_home = false;
        if let Some(entity) = world.get_entity_mut(parent) {
            entity.visible = true;
        }
        world.refresh_render_order();
        set_wandering(world, parent, true);
    }
}

fn set_wandering(world: &mut World, parent: &str, enabled: bool) {
    if let Some(entity) = world.get_entity_mut(parent) {
        for kind in WANDERING_KINDS {
            entity.behaviours.set_enabled(kind, enabled);
        }
    }
}
