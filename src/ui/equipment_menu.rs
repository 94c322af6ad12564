//! Equipment slots: page through them, put something on an empty slot, or
//! unequip or replace what is already there.

use crate::game::{EntityId, EquipSlot, World};
use crate::input::Command;
use crate::rendering::{draw_description, draw_frame, draw_list, Canvas, Rgb};
use crate::ui::{menu_area, wrap_cursor, Popup, Transition, UiState};
use crate::WildwoodResult;

/// Carried items that fit `slot` and are not already in it.
pub fn equippable_items(world: &World, holder: &str, slot: EquipSlot) -> Vec<EntityId> {
    let Some(entity) = world.get_entity(holder) else {
        return Vec::new();
    };
    let current = entity.equipment.get(slot);
    entity
        .inventory
        .iter()
        .filter(|id| Some(*id) != current)
        .filter(|id| {
            world
                .get_entity(id)
                .map(|item| item.is_equippable_in(slot))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

fn item_name(world: &World, id: &str) -> String {
    world
        .get_entity(id)
        .map(|entity| entity.name.to_lowercase())
        .unwrap_or_default()
}

/// Slot overview.
#[derive(Debug, Clone)]
pub struct EquipmentMenu {
    holder: EntityId,
    slot: EquipSlot,
}

impl EquipmentMenu {
    pub fn new(holder: &str) -> Self {
        Self::at(holder, EquipSlot::Head)
    }

    fn at(holder: &str, slot: EquipSlot) -> Self {
        Self {
            holder: holder.to_string(),
            slot,
        }
    }

    pub fn slot(&self) -> EquipSlot {
        self.slot
    }
}

impl UiState for EquipmentMenu {
    fn name(&self) -> &'static str {
        "equipment"
    }

    fn handle_input(&mut self, command: Command, world: &mut World) -> WildwoodResult<Transition> {
        match command.menu_step() {
            Some(1) => {
                self.slot = self.slot.next();
                return Ok(Transition::Stay);
            }
            Some(_) => {
                self.slot = self.slot.prev();
                return Ok(Transition::Stay);
            }
            None => {}
        }
        match command {
            Command::Cancel | Command::OpenEquipment => Ok(Transition::Close),
            Command::Confirm => {
                let occupied = world
                    .get_entity(&self.holder)
                    .and_then(|entity| entity.equipment.get(self.slot))
                    .is_some();
                let candidates = equippable_items(world, &self.holder, self.slot);
                if occupied {
                    return Ok(Transition::Switch(Box::new(ChooseAction {
                        menu: self.clone(),
                        can_replace: !candidates.is_empty(),
                        cursor: 0,
                    })));
                }
                if candidates.is_empty() {
                    return Ok(Transition::Switch(Box::new(Popup::returning_to(
                        "You have nothing that fits there.",
                        Box::new(self.clone()),
                    ))));
                }
                Ok(Transition::Switch(Box::new(ChooseEquipment {
                    menu: self.clone(),
                    candidates,
                    cursor: 0,
                })))
            }
            _ => Ok(Transition::Stay),
        }
    }

    fn render(&self, canvas: &mut dyn Canvas, world: &World) {
        let (corner, size) = menu_area(world);
        draw_frame(canvas, corner.x, corner.y, size.x, size.y, "Equipment");
        let Some(holder) = world.get_entity(&self.holder) else {
            return;
        };
        let rows: Vec<String> = EquipSlot::ALL
            .iter()
            .map(|slot| {
                let worn = holder
                    .equipment
                    .get(*slot)
                    .and_then(|id| world.get_entity(id))
                    .map(|item| item.name.clone())
                    .unwrap_or_else(|| "-".to_string());
                format!("{:<11} {}", slot.label(), worn)
            })
            .collect();
        let selected = EquipSlot::ALL.iter().position(|slot| *slot == self.slot);
        draw_list(canvas, corner.x + 2, corner.y + 2, &rows, selected);

        if let Some(item) = holder.equipment.get(self.slot).and_then(|id| world.get_entity(id)) {
            draw_description(canvas, corner.x + size.x / 2, corner.y + 2, &item.describe());
        }
    }
}

/// What to do with an occupied slot.
#[derive(Debug, Clone)]
pub struct ChooseAction {
    menu: EquipmentMenu,
    can_replace: bool,
    cursor: usize,
}

impl ChooseAction {
    fn options(&self) -> Vec<String> {
        let mut options = vec!["Unequip".to_string()];
        if self.can_replace {
            options.push("Equip something else".to_string());
        }
        options
    }
}

impl UiState for ChooseAction {
    fn name(&self) -> &'static str {
        "equipment action"
    }

    fn handle_input(&mut self, command: Command, world: &mut World) -> WildwoodResult<Transition> {
        if let Some(step) = command.menu_step() {
            self.cursor = wrap_cursor(self.cursor, step, self.options().len());
            return Ok(Transition::Stay);
        }
        let holder = self.menu.holder.clone();
        let slot = self.menu.slot;
        match command {
            Command::Cancel => Ok(Transition::Switch(Box::new(self.menu.clone()))),
            Command::Confirm if self.cursor == 0 => {
                let worn = world
                    .get_entity(&holder)
                    .and_then(|entity| entity.equipment.get(slot).cloned());
                if world.unequip_slot(&holder, slot)? {
                    if let Some(worn) = worn {
                        let message = format!("You take off the {}.", item_name(world, &worn));
                        world.notify(message);
                    }
                }
                Ok(Transition::Switch(Box::new(self.menu.clone())))
            }
            Command::Confirm => Ok(Transition::Switch(Box::new(ChooseEquipment {
                menu: self.menu.clone(),
                candidates: equippable_items(world, &holder, slot),
                cursor: 0,
            }))),
            _ => Ok(Transition::Stay),
        }
    }

    fn render(&self, canvas: &mut dyn Canvas, world: &World) {
        self.menu.render(canvas, world);
        let lines: Vec<String> = self
            .options()
            .iter()
            .enumerate()
            .map(|(row, option)| {
                let marker = if row == self.cursor { '>' } else { ' ' };
                format!("{} {}", marker, option)
            })
            .collect();
        crate::rendering::draw_message_box(
            canvas,
            world.config().screen_size(),
            self.menu.slot.label(),
            &lines,
        );
    }
}

/// Pick an item to put in the slot.
#[derive(Debug, Clone)]
pub struct ChooseEquipment {
    menu: EquipmentMenu,
    candidates: Vec<EntityId>,
    cursor: usize,
}

impl UiState for ChooseEquipment {
    fn name(&self) -> &'static str {
        "choose equipment"
    }

    fn handle_input(&mut self, command: Command, world: &mut World) -> WildwoodResult<Transition> {
        if let Some(step) = command.menu_step() {
            self.cursor = wrap_cursor(self.cursor, step, self.candidates.len());
            return Ok(Transition::Stay);
        }
        match command {
            Command::Cancel => Ok(Transition::Switch(Box::new(self.menu.clone()))),
            Command::Confirm => {
                let Some(item) = self.candidates.get(self.cursor).cloned() else {
                    return Ok(Transition::Switch(Box::new(self.menu.clone())));
                };
                if world.equip(&self.menu.holder, self.menu.slot, &item)? {
                    let message = format!("You equip the {}.", item_name(world, &item));
                    world.notify(message);
                }
                Ok(Transition::Switch(Box::new(self.menu.clone())))
            }
            _ => Ok(Transition::Stay),
        }
    }

    fn render(&self, canvas: &mut dyn Canvas, world: &World) {
        let (corner, size) = menu_area(world);
        draw_frame(canvas, corner.x, corner.y, size.x, size.y, self.menu.slot.label());
        let rows: Vec<String> = self
            .candidates
            .iter()
            .filter_map(|id| world.get_entity(id))
            .map(|item| item.name.clone())
            .collect();
        draw_list(canvas, corner.x + 2, corner.y + 2, &rows, Some(self.cursor));
        if let Some(item) = self.candidates.get(self.cursor).and_then(|id| world.get_entity(id)) {
            draw_description(canvas, corner.x + size.x / 2, corner.y + 2, &item.describe());
        }
        canvas.draw_text("enter: equip  escape: back", corner.x + 2, corner.y + size.y - 2, Rgb::GREY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{templates, ItemTemplate, Point, WorldConfig};
    use crate::ui::Dialog;

    fn world_with(items: &[ItemTemplate]) -> (World, Vec<EntityId>) {
        let mut world = World::new(WorldConfig::for_testing(10));
        world.add_entity(templates::player(Point::new(5, 5))).unwrap();
        world.set_player(templates::PLAYER_ID).unwrap();
        let mut ids = Vec::new();
        for template in items {
            let item = template.spawn(Point::new(5, 5)).unwrap();
            ids.push(item.id.clone());
            world.add_entity(item).unwrap();
            assert!(world.add_to_inventory(templates::PLAYER_ID, ids.last().unwrap()).unwrap());
        }
        (world, ids)
    }

    fn open_at(world: &mut World, slot: EquipSlot) -> Dialog {
        let menu = EquipmentMenu::at(templates::PLAYER_ID, slot);
        Dialog::open(Box::new(menu), world).unwrap().unwrap()
    }

    #[test]
    fn test_slots_cycle_with_menu_steps() {
        let (mut world, _) = world_with(&[]);
        let mut menu = EquipmentMenu::new(templates::PLAYER_ID);
        menu.handle_input(Command::Previous, &mut world).unwrap();
        assert_eq!(menu.slot(), EquipSlot::Back);
        menu.handle_input(Command::Next, &mut world).unwrap();
        assert_eq!(menu.slot(), EquipSlot::Head);
    }

    #[test]
    fn test_equip_into_empty_slot() {
        let (mut world, ids) = world_with(&[ItemTemplate::Backpack]);
        let mut dialog = open_at(&mut world, EquipSlot::Back);
        dialog.handle_input(Command::Confirm, &mut world).unwrap();
        assert_eq!(dialog.state_name(), "choose equipment");
        dialog.handle_input(Command::Confirm, &mut world).unwrap();
        assert_eq!(dialog.state_name(), "equipment");
        assert_eq!(
            world.player().unwrap().equipment.get(EquipSlot::Back),
            Some(&ids[0])
        );
        assert_eq!(world.max_carry_weight(templates::PLAYER_ID), 35);
    }

    #[test]
    fn test_empty_slot_without_candidates_pops_up() {
        let (mut world, _) = world_with(&[ItemTemplate::Stick]);
        let mut dialog = open_at(&mut world, EquipSlot::Head);
        dialog.handle_input(Command::Confirm, &mut world).unwrap();
        assert_eq!(dialog.state_name(), "popup");
    }

    #[test]
    fn test_unequip_from_occupied_slot() {
        let (mut world, ids) = world_with(&[ItemTemplate::Spear]);
        assert!(world.equip(templates::PLAYER_ID, EquipSlot::RightHand, &ids[0]).unwrap());
        let mut dialog = open_at(&mut world, EquipSlot::RightHand);
        dialog.handle_input(Command::Confirm, &mut world).unwrap();
        assert_eq!(dialog.state_name(), "equipment action");
        dialog.handle_input(Command::Confirm, &mut world).unwrap();
        assert_eq!(dialog.state_name(), "equipment");
        assert!(world.player().unwrap().equipment.is_empty());
        assert!(world.inventory_contains(templates::PLAYER_ID, &ids[0]));
        assert_eq!(world.status.last(), Some("You take off the spear."));
    }

    #[test]
    fn test_replace_swaps_torches_between_hands() {
        let (mut world, ids) = world_with(&[ItemTemplate::Torch, ItemTemplate::Torch]);
        assert!(world.equip(templates::PLAYER_ID, EquipSlot::LeftHand, &ids[0]).unwrap());
        let mut dialog = open_at(&mut world, EquipSlot::LeftHand);
        dialog.handle_input(Command::Confirm, &mut world).unwrap();
        dialog.handle_input(Command::Next, &mut world).unwrap();
        dialog.handle_input(Command::Confirm, &mut world).unwrap();
        assert_eq!(dialog.state_name(), "choose equipment");
        dialog.handle_input(Command::Confirm, &mut world).unwrap();
        let player = world.player().unwrap();
        assert_eq!(player.equipment.get(EquipSlot::LeftHand), Some(&ids[1]));
        assert!(!world.get_entity(&ids[0]).unwrap().equipped);
    }
}
