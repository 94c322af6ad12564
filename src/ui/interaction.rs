//! Interacting with doors and fires.

use crate::game::{feed_fire, set_door, EntityId, InteractableKind, World};
use crate::input::Command;
use crate::rendering::{draw_message_box, Canvas};
use crate::ui::{wrap_cursor, Transition, UiState};
use crate::WildwoodResult;

/// Options for one interactable entity next to the player.
#[derive(Debug, Clone)]
pub struct InteractionMenu {
    actor: EntityId,
    target: EntityId,
    cursor: usize,
}

enum Action {
    SetDoor(bool),
    Feed(EntityId),
}

impl InteractionMenu {
    pub fn new(actor: &str, target: &str) -> Self {
        Self {
            actor: actor.to_string(),
            target: target.to_string(),
            cursor: 0,
        }
    }

    fn kind(&self, world: &World) -> Option<InteractableKind> {
        world
            .get_entity(&self.target)
            .and_then(|entity| entity.behaviours.interactable())
            .filter(|interactable| interactable.enabled)
            .map(|interactable| interactable.kind)
    }

    fn actions(&self, world: &World) -> Vec<(String, Action)> {
        match self.kind(world) {
            Some(InteractableKind::Door { open }) => {
                let label = if open { "Close the door" } else { "Open the door" };
                vec![(label.to_string(), Action::SetDoor(!open))]
            }
            Some(InteractableKind::Fire { .. }) => world
                .get_entity(&self.actor)
                .map(|actor| actor.inventory.clone())
                .unwrap_or_default()
                .into_iter()
                .filter_map(|id| {
                    let item = world.get_entity(&id)?;
                    item.properties.burn_ticks()?;
                    Some((format!("Burn the {}", item.name.to_lowercase()), Action::Feed(id)))
                })
                .collect(),
            None => Vec::new(),
        }
    }
}

impl UiState for InteractionMenu {
    fn name(&self) -> &'static str {
        "interaction"
    }

    fn on_entry(&mut self, world: &mut World) -> WildwoodResult<Transition> {
        if self.kind(world).is_none() {
            return Ok(Transition::Close);
        }
        let len = self.actions(world).len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
        Ok(Transition::Stay)
    }

    fn handle_input(&mut self, command: Command, world: &mut World) -> WildwoodResult<Transition> {
        let mut actions = self.actions(world);
        if let Some(step) = command.menu_step() {
            self.cursor = wrap_cursor(self.cursor, step, actions.len());
            return Ok(Transition::Stay);
        }
        match command {
            Command::Cancel | Command::Interact => Ok(Transition::Close),
            Command::Confirm => {
                if self.cursor >= actions.len() {
                    return Ok(Transition::Close);
                }
                match actions.swap_remove(self.cursor).1 {
                    Action::SetDoor(open) => {
                        let position = world.position_of(&self.target);
                        let blocked = !open
                            && position
                                .map(|at| {
                                    world.entities_at(at).iter().any(|id| id != &self.target)
                                })
                                .unwrap_or(false);
                        if blocked {
                            world.notify("Something is in the way.".to_string());
                        } else {
                            set_door(world, &self.target, open)?;
                            let verb = if open { "open" } else { "close" };
                            world.notify(format!("You {} the door.", verb));
                        }
                        Ok(Transition::Close)
                    }
                    Action::Feed(item) => {
                        feed_fire(world, &self.target, &item)?;
                        let left = self.actions(world).len();
                        if left == 0 {
                            return Ok(Transition::Close);
                        }
                        self.cursor = self.cursor.min(left - 1);
                        Ok(Transition::Stay)
                    }
                }
            }
            _ => Ok(Transition::Stay),
        }
    }

    fn render(&self, canvas: &mut dyn Canvas, world: &World) {
        let title = world
            .get_entity(&self.target)
            .map(|entity| entity.name.clone())
            .unwrap_or_default();
        let mut lines = Vec::new();
        if let Some(InteractableKind::Fire { fuel, lit }) = self.kind(world) {
            lines.push(if lit {
                format!("It will burn for {} more turns.", fuel)
            } else {
                "The fire is out.".to_string()
            });
        }
        let actions = self.actions(world);
        if actions.is_empty() {
            lines.push("You have nothing to burn.".to_string());
        }
        for (row, (label, _)) in actions.iter().enumerate() {
            let marker = if row == self.cursor { '>' } else { ' ' };
            lines.push(format!("{} {}", marker, label));
        }
        draw_message_box(canvas, world.config().screen_size(), &title, &lines);
    }
}
