//! Looking around: a free cursor over the current screen, then a detail view
//! of whatever stands under it.

use crate::game::{EntityId, Point, World};
use crate::input::Command;
use crate::rendering::{draw_description, draw_frame, Canvas, Rgb};
use crate::ui::{menu_area, wrap_cursor, Transition, UiState};
use crate::WildwoodResult;

/// Cursor over the map.
#[derive(Debug, Clone)]
pub struct InspectionMenu {
    cursor: Point,
}

impl InspectionMenu {
    /// Starts the cursor at `position`, usually the player's.
    pub fn new(position: Point) -> Self {
        Self { cursor: position }
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Visible things under the cursor, topmost first.
    fn under_cursor(&self, world: &World) -> Vec<EntityId> {
        let mut ids: Vec<(i32, EntityId)> = world
            .entities_at(self.cursor)
            .into_iter()
            .filter_map(|id| {
                let entity = world.get_entity(&id)?;
                entity.visible.then_some((entity.layer, id))
            })
            .collect();
        ids.sort();
        ids.into_iter().map(|(_, id)| id).collect()
    }
}

impl UiState for InspectionMenu {
    fn name(&self) -> &'static str {
        "inspection"
    }

    fn handle_input(&mut self, command: Command, world: &mut World) -> WildwoodResult<Transition> {
        if let Some(direction) = command.direction() {
            let size = world.config().screen_size();
            let origin = world.anchor() * size;
            let moved = self.cursor + direction.to_delta();
            self.cursor = Point::new(
                moved.x.clamp(origin.x, origin.x + size.x - 1),
                moved.y.clamp(origin.y, origin.y + size.y - 1),
            );
            return Ok(Transition::Stay);
        }
        match command {
            Command::Cancel | Command::Inspect => Ok(Transition::Close),
            Command::Confirm | Command::Describe => {
                let ids = self.under_cursor(world);
                if ids.is_empty() {
                    return Ok(Transition::Stay);
                }
                Ok(Transition::Switch(Box::new(InspectionDetail {
                    cursor: self.cursor,
                    ids,
                    index: 0,
                })))
            }
            _ => Ok(Transition::Stay),
        }
    }

    fn render(&self, canvas: &mut dyn Canvas, world: &World) {
        let size = world.config().screen_size();
        let local = self.cursor - world.anchor() * size;
        canvas.draw('X', local.x, local.y, Rgb::YELLOW, Some(Rgb::DARK_GREY));

        let label = self
            .under_cursor(world)
            .first()
            .and_then(|id| world.get_entity(id))
            .map(|entity| {
                if entity.short_desc.is_empty() {
                    entity.name.clone()
                } else {
                    entity.short_desc.clone()
                }
            })
            .unwrap_or_else(|| "Nothing of note.".to_string());
        let y = if local.y < size.y / 2 { size.y - 1 } else { 0 };
        canvas.draw_text(&label, 1, y, Rgb::WHITE);
    }
}

/// Detail view of one of the things under the inspection cursor.
#[derive(Debug, Clone)]
pub struct InspectionDetail {
    cursor: Point,
    ids: Vec<EntityId>,
    index: usize,
}

impl UiState for InspectionDetail {
    fn name(&self) -> &'static str {
        "inspection detail"
    }

    fn handle_input(&mut self, command: Command, _world: &mut World) -> WildwoodResult<Transition> {
        if let Some(step) = command.menu_step() {
            self.index = wrap_cursor(self.index, step, self.ids.len());
            return Ok(Transition::Stay);
        }
        match command {
            Command::Cancel | Command::Confirm => Ok(Transition::Switch(Box::new(
                InspectionMenu::new(self.cursor),
            ))),
            _ => Ok(Transition::Stay),
        }
    }

    fn render(&self, canvas: &mut dyn Canvas, world: &World) {
        let (corner, size) = menu_area(world);
        draw_frame(canvas, corner.x, corner.y, size.x, size.y, "Inspect");
        let Some(entity) = self.ids.get(self.index).and_then(|id| world.get_entity(id)) else {
            return;
        };
        let mut row = corner.y + 2;
        row += draw_description(canvas, corner.x + 2, row, &entity.describe());
        if entity.max_hp > 1 || entity.hit_times > 0 {
            canvas.draw_text(
                &format!("Health: {}/{}", entity.hp, entity.max_hp),
                corner.x + 2,
                row,
                Rgb::GREY,
            );
        }
        if self.ids.len() > 1 {
            canvas.draw_text(
                &format!("{} of {} here", self.index + 1, self.ids.len()),
                corner.x + 2,
                corner.y + size.y - 2,
                Rgb::GREY,
            );
        }
    }
}
