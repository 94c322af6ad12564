//! Picking things up, either off the ground or out of a container such as a
//! berry bush.

use crate::game::{EntityId, Point, World};
use crate::input::Command;
use crate::rendering::{draw_description, draw_frame, draw_list, Canvas, Rgb};
use crate::ui::{menu_area, wrap_cursor, Popup, Transition, UiState};
use crate::WildwoodResult;
use log::debug;

/// Where the loot comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LootSource {
    Ground(Point),
    Container(EntityId),
}

/// List of things to take. Closes by itself once nothing is left.
#[derive(Debug, Clone)]
pub struct LootingMenu {
    taker: EntityId,
    source: LootSource,
    items: Vec<EntityId>,
    cursor: usize,
}

impl LootingMenu {
    pub fn new(taker: &str, source: LootSource) -> Self {
        Self {
            taker: taker.to_string(),
            source,
            items: Vec::new(),
            cursor: 0,
        }
    }

    /// What there is to take from `source`, visible to `taker`.
    pub fn available(world: &World, taker: &str, source: &LootSource) -> Vec<EntityId> {
        let items: Vec<EntityId> = match source {
            LootSource::Ground(position) => world
                .entities_at(*position)
                .into_iter()
                .filter(|id| id != taker)
                .filter(|id| {
                    world
                        .get_entity(id)
                        .map(|entity| entity.is_pickuppable())
                        .unwrap_or(false)
                })
                .collect(),
            LootSource::Container(container) => world
                .get_entity(container)
                .map(|entity| entity.inventory.clone())
                .unwrap_or_default(),
        };
        items
            .into_iter()
            .filter(|id| !world.is_queued_for_deletion(id))
            .collect()
    }

    pub fn items(&self) -> &[EntityId] {
        &self.items
    }

    fn refresh(&mut self, world: &World) {
        self.items = Self::available(world, &self.taker, &self.source);
        if self.cursor >= self.items.len() {
            self.cursor = self.items.len().saturating_sub(1);
        }
    }

    fn take(&mut self, world: &mut World, item: &str) -> WildwoodResult<bool> {
        match &self.source {
            LootSource::Ground(_) => world.add_to_inventory(&self.taker, item),
            LootSource::Container(container) => world.transfer(container, &self.taker, item),
        }
    }
}

impl UiState for LootingMenu {
    fn name(&self) -> &'static str {
        "looting"
    }

    fn on_entry(&mut self, world: &mut World) -> WildwoodResult<Transition> {
        self.refresh(world);
        if self.items.is_empty() {
            debug!("nothing to loot from {:?}", self.source);
            return Ok(Transition::Close);
        }
        Ok(Transition::Stay)
    }

    fn handle_input(&mut self, command: Command, world: &mut World) -> WildwoodResult<Transition> {
        if command == Command::Cancel {
            return Ok(Transition::Close);
        }
        if let Some(step) = command.menu_step() {
            self.cursor = wrap_cursor(self.cursor, step, self.items.len());
            return Ok(Transition::Stay);
        }
        if !matches!(command, Command::Confirm | Command::Loot) {
            return Ok(Transition::Stay);
        }
        let Some(item) = self.items.get(self.cursor).cloned() else {
            return Ok(Transition::Close);
        };

        if !self.take(world, &item)? {
            return Ok(Transition::Switch(Box::new(Popup::returning_to(
                "You cannot carry that much!",
                Box::new(self.clone()),
            ))));
        }
        if let Some(entity) = world.get_entity(&item) {
            let message = format!("You pick up the {}.", entity.name.to_lowercase());
            world.notify(message);
        }
        self.refresh(world);
        Ok(if self.items.is_empty() {
            Transition::Close
        } else {
            Transition::Stay
        })
    }

    fn render(&self, canvas: &mut dyn Canvas, world: &World) {
        let (corner, size) = menu_area(world);
        let title = match &self.source {
            LootSource::Ground(_) => "Pick up".to_string(),
            LootSource::Container(id) => world
                .get_entity(id)
                .map(|entity| entity.name.clone())
                .unwrap_or_default(),
        };
        draw_frame(canvas, corner.x, corner.y, size.x, size.y, &title);

        let rows: Vec<String> = self
            .items
            .iter()
            .filter_map(|id| world.get_entity(id))
            .map(|item| match item.properties.weight() {
                Some(weight) => format!("{} ({})", item.name, weight),
                None => item.name.clone(),
            })
            .collect();
        draw_list(canvas, corner.x + 2, corner.y + 2, &rows, Some(self.cursor));

        if let Some(item) = self.items.get(self.cursor).and_then(|id| world.get_entity(id)) {
            draw_description(canvas, corner.x + size.x / 2, corner.y + 2, &item.describe());
        }
        canvas.draw_text(
            &format!(
                "Load {}/{}",
                world.carried_weight(&self.taker),
                world.max_carry_weight(&self.taker)
            ),
            corner.x + 2,
            corner.y + size.y - 2,
            Rgb::WHITE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{templates, ItemTemplate, WorldConfig};
    use crate::ui::Dialog;

    fn setup() -> World {
        let mut world = World::new(WorldConfig::for_testing(6));
        world.add_entity(templates::player(Point::new(5, 5))).unwrap();
        world.set_player(templates::PLAYER_ID).unwrap();
        world
    }

    fn drop_at(world: &mut World, template: ItemTemplate, position: Point) -> EntityId {
        let item = template.spawn(position).unwrap();
        let id = item.id.clone();
        world.add_entity(item).unwrap();
        id
    }

    #[test]
    fn test_nothing_to_loot_closes_immediately() {
        let mut world = setup();
        let menu = LootingMenu::new(templates::PLAYER_ID, LootSource::Ground(Point::new(5, 5)));
        assert!(Dialog::open(Box::new(menu), &mut world).unwrap().is_none());
    }

    #[test]
    fn test_taking_the_last_item_closes() {
        let mut world = setup();
        let stick = drop_at(&mut world, ItemTemplate::Stick, Point::new(5, 5));
        let menu = LootingMenu::new(templates::PLAYER_ID, LootSource::Ground(Point::new(5, 5)));
        let mut dialog = Dialog::open(Box::new(menu), &mut world).unwrap().unwrap();
        assert!(!dialog.handle_input(Command::Confirm, &mut world).unwrap());
        assert!(world.inventory_contains(templates::PLAYER_ID, &stick));
        assert_eq!(world.status.last(), Some("You pick up the stick."));
    }

    #[test]
    fn test_overweight_shows_popup_and_returns() {
        let mut world = setup();
        world.player_mut().unwrap().base_carry_weight = 1;
        drop_at(&mut world, ItemTemplate::Stone, Point::new(5, 5));
        let menu = LootingMenu::new(templates::PLAYER_ID, LootSource::Ground(Point::new(5, 5)));
        let mut dialog = Dialog::open(Box::new(menu), &mut world).unwrap().unwrap();
        assert!(dialog.handle_input(Command::Confirm, &mut world).unwrap());
        assert_eq!(dialog.state_name(), "popup");
        assert!(dialog.handle_input(Command::Cancel, &mut world).unwrap());
        assert_eq!(dialog.state_name(), "looting");
        assert!(world.get_entity(templates::PLAYER_ID).unwrap().inventory.is_empty());
    }

    #[test]
    fn test_container_loot_transfers() {
        let mut world = setup();
        let bush = templates::berry_bush(Point::new(6, 5)).unwrap();
        let bush_id = bush.id.clone();
        world.add_entity(bush).unwrap();
        let berry = drop_at(&mut world, ItemTemplate::Berry, Point::new(6, 5));
        assert!(world.add_to_inventory(&bush_id, &berry).unwrap());

        let mut menu = LootingMenu::new(templates::PLAYER_ID, LootSource::Container(bush_id.clone()));
        assert!(matches!(menu.on_entry(&mut world).unwrap(), Transition::Stay));
        assert_eq!(menu.items(), &[berry.clone()]);
        assert!(matches!(
            menu.handle_input(Command::Confirm, &mut world).unwrap(),
            Transition::Close
        ));
        assert!(world.inventory_contains(templates::PLAYER_ID, &berry));
        assert!(!world.inventory_contains(&bush_id, &berry));
    }

    #[test]
    fn test_ground_listing_skips_scenery_and_taker() {
        let mut world = setup();
        world.add_entity(templates::burrow(Point::new(5, 5))).unwrap();
        let berry = drop_at(&mut world, ItemTemplate::Berry, Point::new(5, 5));
        let listed = LootingMenu::available(
            &world,
            templates::PLAYER_ID,
            &LootSource::Ground(Point::new(5, 5)),
        );
        assert_eq!(listed, vec![berry]);
    }
}
