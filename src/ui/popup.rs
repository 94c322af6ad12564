//! Transient message boxes.

use crate::game::World;
use crate::input::Command;
use crate::rendering::{draw_message_box, Canvas};
use crate::ui::{Transition, UiState};
use crate::WildwoodResult;

/// Shows a message until confirmed or dismissed, then goes back to the
/// state it interrupted, or closes the dialog if there was none.
pub struct Popup {
    pub lines: Vec<String>,
    previous: Option<Box<dyn UiState>>,
}

impl Popup {
    pub fn new(message: &str) -> Self {
        Self {
            lines: vec![message.to_string()],
            previous: None,
        }
    }

    /// A popup that returns to `previous` when dismissed.
    pub fn returning_to(message: &str, previous: Box<dyn UiState>) -> Self {
        Self {
            lines: vec![message.to_string()],
            previous: Some(previous),
        }
    }
}

impl UiState for Popup {
    fn name(&self) -> &'static str {
        "popup"
    }

    fn handle_input(&mut self, command: Command, _world: &mut World) -> WildwoodResult<Transition> {
        match command {
            Command::Confirm | Command::Cancel => Ok(match self.previous.take() {
                Some(previous) => Transition::Switch(previous),
                None => Transition::Close,
            }),
            _ => Ok(Transition::Stay),
        }
    }

    fn render(&self, canvas: &mut dyn Canvas, world: &World) {
        draw_message_box(canvas, world.config().screen_size(), "", &self.lines);
    }
}
