//! # Inventory Screen
//!
//! Browse what the player carries, drop, eat or apply the selected item, or
//! open its full description.

use crate::game::{EntityId, World};
use crate::input::Command;
use crate::rendering::{draw_description, draw_frame, draw_list, Canvas, Rgb};
use crate::ui::{menu_area, wrap_cursor, Popup, Transition, UiState};
use crate::WildwoodResult;

/// Item list with a blurb for the selected item.
#[derive(Debug, Clone)]
pub struct InventoryMenu {
    holder: EntityId,
    cursor: usize,
}

impl InventoryMenu {
    pub fn new(holder: &str) -> Self {
        Self {
            holder: holder.to_string(),
            cursor: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn items(&self, world: &World) -> Vec<EntityId> {
        world
            .get_entity(&self.holder)
            .map(|holder| holder.inventory.clone())
            .unwrap_or_default()
    }

    fn selected(&self, world: &World) -> Option<EntityId> {
        self.items(world).get(self.cursor).cloned()
    }

    fn clamp(&mut self, world: &World) {
        let len = self.items(world).len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }

    fn popup(&self, message: &str) -> Transition {
        Transition::Switch(Box::new(Popup::returning_to(message, Box::new(self.clone()))))
    }
}

impl UiState for InventoryMenu {
    fn name(&self) -> &'static str {
        "inventory"
    }

    fn on_entry(&mut self, world: &mut World) -> WildwoodResult<Transition> {
        self.clamp(world);
        Ok(Transition::Stay)
    }

    fn handle_input(&mut self, command: Command, world: &mut World) -> WildwoodResult<Transition> {
        if command == Command::Cancel || command == Command::OpenInventory {
            return Ok(Transition::Close);
        }
        if let Some(step) = command.menu_step() {
            self.cursor = wrap_cursor(self.cursor, step, self.items(world).len());
            return Ok(Transition::Stay);
        }
        let Some(item) = self.selected(world) else {
            return Ok(Transition::Stay);
        };

        let transition = match command {
            Command::Drop => {
                let name = world
                    .get_entity(&item)
                    .map(|entity| entity.name.to_lowercase())
                    .unwrap_or_default();
                if world.remove_from_inventory(&self.holder, &item)? {
                    world.notify(format!("You drop the {}.", name));
                }
                Transition::Stay
            }
            Command::Eat => {
                if world.eat(&self.holder, &item)? {
                    Transition::Stay
                } else {
                    self.popup("You can't eat that.")
                }
            }
            Command::Apply => {
                if world.apply(&item)? {
                    Transition::Stay
                } else {
                    self.popup("You can't use that.")
                }
            }
            Command::Describe | Command::Confirm => Transition::Switch(Box::new(ItemDescriptionView {
                menu: self.clone(),
                item,
            })),
            _ => Transition::Stay,
        };
        self.clamp(world);
        Ok(transition)
    }

    fn render(&self, canvas: &mut dyn Canvas, world: &World) {
        let (corner, size) = menu_area(world);
        draw_frame(canvas, corner.x, corner.y, size.x, size.y, "Inventory");

        let items = self.items(world);
        if items.is_empty() {
            canvas.draw_text("You are carrying nothing.", corner.x + 2, corner.y + 2, Rgb::GREY);
            return;
        }

        let rows: Vec<String> = items
            .iter()
            .filter_map(|id| world.get_entity(id))
            .map(|item| {
                if item.equipped {
                    format!("{} (equipped)", item.name)
                } else {
                    item.name.clone()
                }
            })
            .collect();
        draw_list(canvas, corner.x + 2, corner.y + 2, &rows, Some(self.cursor));

        let blurb_x = corner.x + size.x / 2;
        if let Some(item) = items.get(self.cursor).and_then(|id| world.get_entity(id)) {
            draw_description(canvas, blurb_x, corner.y + 2, &item.describe());
        }
        canvas.draw_text(
            "d: drop  e: eat  a: apply  v: describe",
            corner.x + 2,
            corner.y + size.y - 2,
            Rgb::GREY,
        );
        canvas.draw_text(
            &format!(
                "Load {}/{}",
                world.carried_weight(&self.holder),
                world.max_carry_weight(&self.holder)
            ),
            blurb_x,
            corner.y + size.y - 2,
            Rgb::WHITE,
        );
    }
}

/// Full description of one item, returning to the list.
#[derive(Debug, Clone)]
pub struct ItemDescriptionView {
    menu: InventoryMenu,
    item: EntityId,
}

impl UiState for ItemDescriptionView {
    fn name(&self) -> &'static str {
        "item description"
    }

    fn handle_input(&mut self, command: Command, _world: &mut World) -> WildwoodResult<Transition> {
        match command {
            Command::Cancel | Command::Confirm | Command::Describe => {
                Ok(Transition::Switch(Box::new(self.menu.clone())))
            }
            _ => Ok(Transition::Stay),
        }
    }

    fn render(&self, canvas: &mut dyn Canvas, world: &World) {
        let (corner, size) = menu_area(world);
        draw_frame(canvas, corner.x, corner.y, size.x, size.y, "Description");
        if let Some(item) = world.get_entity(&self.item) {
            draw_description(canvas, corner.x + 2, corner.y + 2, &item.describe());
        }
    }
}
