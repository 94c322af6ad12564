//! Entities the player can interact with directly: doors and fires.
//!
//! While the player interacts with one of these, the matching UI state
//! (see [`crate::ui::InteractionMenu`]) takes over input handling and drawing.

use crate::game::{Glyph, World};
use crate::rendering::Rgb;
use crate::{WildwoodError, WildwoodResult};
use log::debug;
use serde::{Deserialize, Serialize};

pub const DOOR_CLOSED: Glyph = Glyph::new('+', Rgb::BROWN);
pub const DOOR_OPEN: Glyph = Glyph::new('\'', Rgb::BROWN);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractableKind {
    Door { open: bool },
    Fire { fuel: u32, lit: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interactable {
    pub enabled: bool,
    pub kind: InteractableKind,
}

impl Interactable {
    pub fn door(open: bool) -> Self {
        Self {
            enabled: true,
            kind: InteractableKind::Door { open },
        }
    }

    pub fn fire(fuel: u32) -> Self {
        Self {
            enabled: true,
            kind: InteractableKind::Fire {
                fuel,
                lit: fuel > 0,
            },
        }
    }

    pub fn is_lit(&self) -> bool {
        matches!(self.kind, InteractableKind::Fire { lit: true, .. })
    }

    /// Fires burn one unit of fuel per tick and go out when empty.
    pub fn tick(&mut self, world: &mut World, parent: &str) -> WildwoodResult<()> {
        if let InteractableKind::Fire { fuel, lit } = &mut self.kind {
            if !*lit {
                return Ok(());
            }
            *fuel = fuel.saturating_sub(1);
            if *fuel == 0 {
                *lit = false;
                debug!("{} burned out", parent);
                world.notify("The fire burns out.".to_string());
            }
        }
        Ok(())
    }
}

/// Opens or closes a door. Closed doors are solid.
pub fn set_door(world: &mut World, door: &str, open: bool) -> WildwoodResult<()> {
    let entity = world
        .get_entity_mut(door)
        .ok_or_else(|| WildwoodError::EntityNotFound(door.to_string()))?;
    let Some(interactable) = entity.behaviours.interactable_mut() else {
        return Err(WildwoodError::InvalidState(format!("{} is not a door", door)));
    };
    if !matches!(interactable.kind, InteractableKind::Door { .. }) {
        return Err(WildwoodError::InvalidState(format!("{} is not a door", door)));
    }
    interactable.kind = InteractableKind::Door { open };
    entity.solid = !open;
    entity.glyph = if open { DOOR_OPEN } else { DOOR_CLOSED };
    Ok(())
}

/// Throws a combustible item from the player's inventory onto a fire.
///
/// Returns false if the item does not burn or the target is not a fire.
pub fn feed_fire(world: &mut World, fire: &str, item: &str) -> WildwoodResult<bool> {
    let Some(burn_ticks) = world
        .get_entity(item)
        .and_then(|entity| entity.properties.burn_ticks())
    else {
        return Ok(false);
    };
    let player_id = world.player_id().cloned().ok_or(WildwoodError::NoPlayer)?;
    {
        let entity = world
            .get_entity_mut(fire)
            .ok_or_else(|| WildwoodError::EntityNotFound(fire.to_string()))?;
        let Some(Interactable {
            kind: InteractableKind::Fire { fuel, lit },
            ..
        }) = entity.behaviours.interactable_mut()
        else {
            return Ok(false);
        };
        *fuel += burn_ticks;
        *lit = true;
    }
    world.consume(&player_id, item)?;
    world.notify("The fire crackles.".to_string());
    Ok(true)
}
