//! # Command Definitions
//!
//! The discrete commands the game understands, independent of any key
//! layout.

use crate::game::Direction;

/// One player command, fed to the active screen or to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Step in a direction; attacks hostile creatures in the way
    Move(Direction),
    /// Attack whatever creature stands in that direction
    Attack(Direction),
    /// Let one turn pass
    Wait,
    Interact,
    Loot,
    Inspect,
    OpenInventory,
    OpenCrafting,
    OpenEquipment,
    ToggleHelp,
    Next,
    Previous,
    Confirm,
    Cancel,
    Drop,
    Eat,
    Apply,
    Describe,
    Quit,
}

impl Command {
    /// Whether carrying out this command outside of any screen costs a turn.
    pub fn costs_turn(self) -> bool {
        matches!(self, Command::Move(_) | Command::Attack(_) | Command::Wait)
    }

    /// Menu cursor movement: `Some(1)` for down, `Some(-1)` for up.
    ///
    /// Vertical and horizontal moves double as list navigation.
    pub fn menu_step(self) -> Option<i32> {
        match self {
            Command::Next
            | Command::Move(Direction::South)
            | Command::Move(Direction::East) => Some(1),
            Command::Previous
            | Command::Move(Direction::North)
            | Command::Move(Direction::West) => Some(-1),
            _ => None,
        }
    }

    /// The direction carried by a move or attack.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Command::Move(direction) | Command::Attack(direction) => Some(direction),
            _ => None,
        }
    }
}
