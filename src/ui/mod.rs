//! # Modal Screens
//!
//! Every modal screen is a small explicit state machine. A state reacts to
//! one [`Command`] at a time and answers with a [`Transition`]: stay, switch
//! to another state, or close the dialog. The [`Dialog`] runs the entry and
//! exit hooks around every switch.

pub mod crafting_menu;
pub mod equipment_menu;
pub mod inspection;
pub mod interaction;
pub mod inventory_menu;
pub mod looting;
pub mod popup;

pub use crafting_menu::*;
pub use equipment_menu::*;
pub use inspection::*;
pub use interaction::*;
pub use inventory_menu::*;
pub use looting::*;
pub use popup::*;

use crate::game::{Point, World};
use crate::input::Command;
use crate::rendering::Canvas;
use crate::WildwoodResult;
use log::debug;

/// What a state wants to happen after handling input.
pub enum Transition {
    Stay,
    Switch(Box<dyn UiState>),
    Close,
}

impl std::fmt::Debug for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transition::Stay => f.write_str("Stay"),
            Transition::Switch(state) => write!(f, "Switch({})", state.name()),
            Transition::Close => f.write_str("Close"),
        }
    }
}

/// One state of a modal screen.
pub trait UiState {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Called when the state becomes active. A state with nothing to show
    /// can leave straight away.
    fn on_entry(&mut self, _world: &mut World) -> WildwoodResult<Transition> {
        Ok(Transition::Stay)
    }

    fn handle_input(&mut self, command: Command, world: &mut World) -> WildwoodResult<Transition>;

    fn on_exit(&mut self, _world: &mut World) -> WildwoodResult<()> {
        Ok(())
    }

    fn render(&self, canvas: &mut dyn Canvas, world: &World);
}

/// The active modal screen.
pub struct Dialog {
    state: Box<dyn UiState>,
}

impl Dialog {
    /// Enters `state`. Returns `None` if it closed itself straight away.
    pub fn open(state: Box<dyn UiState>, world: &mut World) -> WildwoodResult<Option<Self>> {
        let mut dialog = Self { state };
        debug!("dialog opens on {}", dialog.state.name());
        let transition = dialog.state.on_entry(world)?;
        Ok(dialog.apply(transition, world)?.then_some(dialog))
    }

    /// Feeds one command to the active state. Returns false once the dialog
    /// has closed.
    pub fn handle_input(&mut self, command: Command, world: &mut World) -> WildwoodResult<bool> {
        let transition = self.state.handle_input(command, world)?;
        self.apply(transition, world)
    }

    fn apply(&mut self, mut transition: Transition, world: &mut World) -> WildwoodResult<bool> {
        loop {
            match transition {
                Transition::Stay => return Ok(true),
                Transition::Close => {
                    self.state.on_exit(world)?;
                    debug!("dialog closes from {}", self.state.name());
                    return Ok(false);
                }
                Transition::Switch(next) => {
                    self.state.on_exit(world)?;
                    debug!("dialog {} -> {}", self.state.name(), next.name());
                    self.state = next;
                    transition = self.state.on_entry(world)?;
                }
            }
        }
    }

    pub fn state_name(&self) -> &'static str {
        self.state.name()
    }

    pub fn render(&self, canvas: &mut dyn Canvas, world: &World) {
        self.state.render(canvas, world);
    }
}

/// Moves a list cursor by `step`, wrapping at both ends.
pub fn wrap_cursor(cursor: usize, step: i32, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (cursor as i64 + step as i64).rem_euclid(len as i64) as usize
}

/// Top-left corner and size of the box the menus draw in: the map area
/// less a margin.
pub fn menu_area(world: &World) -> (Point, Point) {
    let screen = world.config().screen_size();
    let margin = Point::new(4, 2);
    (margin, screen - margin * 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wrap_cursor_both_ends() {
        assert_eq!(wrap_cursor(0, -1, 3), 2);
        assert_eq!(wrap_cursor(2, 1, 3), 0);
        assert_eq!(wrap_cursor(0, 1, 0), 0);
    }

    proptest! {
        #[test]
        fn wrap_cursor_stays_in_range(cursor in 0usize..50, step in -5i32..5, len in 1usize..50) {
            prop_assert!(wrap_cursor(cursor % len, step, len) < len);
        }
    }
}
