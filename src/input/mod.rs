//! # Input Module
//!
//! Keyboard polling. Turns macroquad key presses into [`Command`]s; nothing
//! past this module knows about keys.

pub mod commands;

pub use commands::*;

use crate::game::Direction;
use macroquad::prelude::*;

/// Movement keys: arrows, vi keys and the numeric keypad.
const MOVEMENT_KEYS: [(KeyCode, Direction); 20] = [
    (KeyCode::Up, Direction::North),
    (KeyCode::Down, Direction::South),
    (KeyCode::Left, Direction::West),
    (KeyCode::Right, Direction::East),
    (KeyCode::K, Direction::North),
    (KeyCode::J, Direction::South),
    (KeyCode::H, Direction::West),
    (KeyCode::L, Direction::East),
    (KeyCode::Y, Direction::Northwest),
    (KeyCode::U, Direction::Northeast),
    (KeyCode::B, Direction::Southwest),
    (KeyCode::N, Direction::Southeast),
    (KeyCode::Kp8, Direction::North),
    (KeyCode::Kp2, Direction::South),
    (KeyCode::Kp4, Direction::West),
    (KeyCode::Kp6, Direction::East),
    (KeyCode::Kp7, Direction::Northwest),
    (KeyCode::Kp9, Direction::Northeast),
    (KeyCode::Kp1, Direction::Southwest),
    (KeyCode::Kp3, Direction::Southeast),
];

/// Everything else.
const ACTION_KEYS: [(KeyCode, Command); 19] = [
    (KeyCode::Escape, Command::Cancel),
    (KeyCode::Enter, Command::Confirm),
    (KeyCode::KpEnter, Command::Confirm),
    (KeyCode::Space, Command::Wait),
    (KeyCode::Period, Command::Wait),
    (KeyCode::Kp5, Command::Wait),
    (KeyCode::O, Command::Interact),
    (KeyCode::G, Command::Loot),
    (KeyCode::Comma, Command::Loot),
    (KeyCode::X, Command::Inspect),
    (KeyCode::I, Command::OpenInventory),
    (KeyCode::C, Command::OpenCrafting),
    (KeyCode::W, Command::OpenEquipment),
    (KeyCode::F1, Command::ToggleHelp),
    (KeyCode::Tab, Command::Next),
    (KeyCode::D, Command::Drop),
    (KeyCode::E, Command::Eat),
    (KeyCode::A, Command::Apply),
    (KeyCode::V, Command::Describe),
];

/// Input handler for processing player commands.
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// The command for the key pressed this frame, if any.
    ///
    /// Holding shift turns a movement key into a forced attack.
    pub fn get_command(&self) -> Option<Command> {
        let shift = is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift);

        for (key, direction) in MOVEMENT_KEYS {
            if is_key_pressed(key) {
                return Some(if shift {
                    Command::Attack(direction)
                } else {
                    Command::Move(direction)
                });
            }
        }
        if is_key_pressed(KeyCode::Q) && shift {
            return Some(Command::Quit);
        }
        if is_key_pressed(KeyCode::Tab) && shift {
            return Some(Command::Previous);
        }
        if is_key_pressed(KeyCode::Slash) && shift {
            return Some(Command::ToggleHelp);
        }
        ACTION_KEYS
            .iter()
            .find(|(key, _)| is_key_pressed(*key))
            .map(|(_, command)| *command)
    }
}

/// Key reference shown on the help screen.
pub const HELP_LINES: [&str; 14] = [
    "arrows / hjklyubn / keypad: move",
    "shift + direction: attack",
    "space or .: wait a turn",
    "o: interact with something adjacent",
    "g or ,: pick up",
    "x: inspect surroundings",
    "i: inventory   c: crafting",
    "w: equipment",
    "d: drop  e: eat  a: apply  v: describe",
    "tab / shift-tab: next / previous",
    "enter: confirm",
    "escape: back",
    "F1 or ?: toggle this help",
    "shift-q: quit",
];
