//! Probabilistic attach/follow/detach toward the player.

use crate::game::World;
use crate::WildwoodResult;
use log::debug;
use serde::{Deserialize, Serialize};

/// Distance at which an attached entity stops closing in.
const FOLLOW_DISTANCE: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub enabled: bool,
    /// Chance per tick to attach while detached and in range
    pub attachment: f64,
    /// Chance per tick to step toward the player while attached
    pub clinginess: f64,
    /// Chance per tick to detach while attached
    pub unattachment: f64,
    pub range: f64,
    pub attached: bool,
}

impl Attachment {
    pub fn new(attachment: f64, clinginess: f64, unattachment: f64, range: f64) -> Self {
        Self {
            enabled: true,
            attachment,
            clinginess,
            unattachment,
            range,
            attached: false,
        }
    }

    /// Runs one tick and returns whether the entity is attached afterwards.
    pub fn tick(&mut self, world: &mut World, parent: &str) -> WildwoodResult<bool> {
        let (Some(player_pos), Some(position)) = (world.player_position(), world.position_of(parent))
        else {
            return Ok(self.attached);
        };

        if !self.attached {
            if world.roll(self.attachment) && position.distance(player_pos) <= self.range {
                debug!("{} attaches to the player", parent);
                self.attached = true;
            }
            return Ok(self.attached);
        }

        if world.roll(self.clinginess) && position.distance(player_pos) > FOLLOW_DISTANCE {
            world.move_entity(parent, position.step_toward(player_pos))?;
        }
        if world.roll(self.unattachment) {
            debug!("{} detaches from the player", parent);
            self.attached = false;
        }
        Ok(self.attached)
    }
}
