//! # User Interface Elements
//!
//! Drawing of the map, the side panel, the message log and the framed boxes
//! the modal screens are built from. Everything here is a read pass over the
//! [`World`].

use crate::game::{DayPhase, Glyph, ItemDescription, Point, World};
use crate::rendering::{Canvas, Rgb};

/// Width of the side panel in cells, frame included.
pub const PANEL_WIDTH: i32 = 26;

/// Rows of the message log under the map.
pub const LOG_LINES: i32 = 5;

/// Size of the whole canvas in cells for a given screen size.
pub fn canvas_size(screen: Point) -> Point {
    Point::new(screen.x + PANEL_WIDTH + 1, screen.y + LOG_LINES + 1)
}

/// Draws the current screen: floor, entities back to front, then the light
/// pass for the time of day.
pub fn draw_world(
    canvas: &mut dyn Canvas,
    world: &World,
    frame: u64,
    floor: &dyn Fn(Point) -> Glyph,
) {
    let size = world.config().screen_size();
    let origin = world.anchor() * size;

    for y in 0..size.y {
        for x in 0..size.x {
            let glyph = floor(origin + Point::new(x, y));
            canvas.draw(glyph.ch, x, y, glyph.fg, glyph.bg);
        }
    }

    for id in world.render_order() {
        let Some(entity) = world.get_entity(id) else {
            continue;
        };
        let local = entity.position - origin;
        canvas.draw(entity.glyph.ch, local.x, local.y, entity.glyph.fg, entity.glyph.bg);
    }

    canvas.draw_lightmap(&world.lights(frame), world.time().darkness());
}

/// Side panel with the player's vitals and the current fight, plus the
/// message log under the map.
pub fn draw_hud(canvas: &mut dyn Canvas, world: &World) {
    let size = world.config().screen_size();
    let x = size.x + 1;
    let mut y = 1;

    draw_frame(canvas, size.x, 0, PANEL_WIDTH, size.y, "Status");

    let time = world.time();
    let phase = match time.phase() {
        DayPhase::Night => "night",
        DayPhase::Dawn => "dawn",
        DayPhase::Day => "day",
        DayPhase::Dusk => "dusk",
    };
    canvas.draw_text(&format!("{} ({})", time, phase), x + 1, y, Rgb::YELLOW);
    y += 2;

    if let (Some(player), Some(player_id)) = (world.player(), world.player_id()) {
        let health = if player.hp * 3 <= player.max_hp {
            Rgb::RED
        } else {
            Rgb::WHITE
        };
        canvas.draw_text(&format!("HP:   {}/{}", player.hp, player.max_hp), x + 1, y, health);
        y += 1;
        if let Some(hunger) = player.hunger {
            let colour = if hunger.current == 0 { Rgb::RED } else { Rgb::WHITE };
            canvas.draw_text(&format!("Food: {}/{}", hunger.current, hunger.max), x + 1, y, colour);
            y += 1;
        }
        canvas.draw_text(
            &format!(
                "Load: {}/{}",
                world.carried_weight(player_id),
                world.max_carry_weight(player_id)
            ),
            x + 1,
            y,
            Rgb::WHITE,
        );
        y += 2;
    }

    if let Some(target) = world.status.attack_target().and_then(|id| world.get_entity(id)) {
        canvas.draw_text("Fighting:", x + 1, y, Rgb::RED);
        y += 1;
        canvas.draw_text(&target.name, x + 2, y, target.glyph.fg);
        y += 1;
        canvas.draw_text(&format!("HP: {}/{}", target.hp, target.max_hp), x + 2, y, Rgb::WHITE);
    }

    for (row, line) in world.status.recent(LOG_LINES as usize).enumerate() {
        canvas.draw_text(line, 0, size.y + 1 + row as i32, Rgb::GREY);
    }
}

/// Clears a rectangle and draws a single-line frame with a title around it.
pub fn draw_frame(canvas: &mut dyn Canvas, x: i32, y: i32, width: i32, height: i32, title: &str) {
    for row in y..y + height {
        for col in x..x + width {
            let top_or_bottom = row == y || row == y + height - 1;
            let side = col == x || col == x + width - 1;
            let ch = match (top_or_bottom, side) {
                (true, true) => '+',
                (true, false) => '-',
                (false, true) => '|',
                (false, false) => ' ',
            };
            canvas.draw(ch, col, row, Rgb::GREY, Some(Rgb::BLACK));
        }
    }
    if !title.is_empty() {
        canvas.draw_text(&format!(" {} ", title), x + 2, y, Rgb::WHITE);
    }
}

/// Draws `items` one per row with a marker on the selected one.
pub fn draw_list(canvas: &mut dyn Canvas, x: i32, y: i32, items: &[String], selected: Option<usize>) {
    for (row, item) in items.iter().enumerate() {
        let chosen = selected == Some(row);
        let (marker, colour) = if chosen { ('>', Rgb::YELLOW) } else { (' ', Rgb::WHITE) };
        canvas.draw(marker, x, y + row as i32, colour, None);
        canvas.draw_text(item, x + 2, y + row as i32, colour);
    }
}

/// Name, description and stat lines of an item. Returns rows used.
pub fn draw_description(canvas: &mut dyn Canvas, x: i32, y: i32, description: &ItemDescription) -> i32 {
    canvas.draw_text(&description.name, x, y, Rgb::YELLOW);
    let mut row = y + 1;
    if !description.description.is_empty() {
        canvas.draw_text(&description.description, x, row, Rgb::WHITE);
        row += 1;
    }
    for line in description.stat_lines() {
        canvas.draw_text(&line, x, row, Rgb::GREY);
        row += 1;
    }
    row - y
}

/// A framed box centred on the map with the given lines.
pub fn draw_message_box(canvas: &mut dyn Canvas, screen: Point, title: &str, lines: &[String]) {
    let width = lines
        .iter()
        .map(|line| line.chars().count() as i32)
        .chain(std::iter::once(title.chars().count() as i32 + 4))
        .max()
        .unwrap_or(0)
        + 4;
    let height = lines.len() as i32 + 2;
    let x = (screen.x - width) / 2;
    let y = (screen.y - height) / 2;
    draw_frame(canvas, x, y, width, height, title);
    for (row, line) in lines.iter().enumerate() {
        canvas.draw_text(line, x + 2, y + 1 + row as i32, Rgb::WHITE);
    }
}
