//! # Wildwood
//!
//! A turn-based ASCII survival game: a tile world with a player, wandering and
//! hostile creatures, an inventory/equipment/crafting system and a day-night
//! lit renderer.
//!
//! ## Architecture Overview
//!
//! - **World**: the entity registry. Owns every entity, keeps screen-local
//!   visibility caches, drives ticks and deferred deletion
//! - **Entity**: identity, stats, inventory, equipment, properties and behaviours
//! - **Behaviours**: per-tick state machines (wander, attachment, chase, hostility,
//!   home seeking, restocking) dispatched by pattern match
//! - **UI**: modal screens as explicit state machines over the inventory model
//! - **Rendering**: a small `Canvas` seam; the macroquad implementation is glue
//!
//! Everything is single-threaded. A world tick only happens as a side effect of
//! a player action that costs a turn.

pub mod game;
pub mod generation;
pub mod input;
pub mod rendering;
pub mod scenes;
pub mod ui;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use input::*;
pub use rendering::*;
pub use scenes::*;
pub use ui::*;

/// Core error type for the Wildwood simulation.
#[derive(thiserror::Error, Debug)]
pub enum WildwoodError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// An entity with this identity is already registered
    #[error("Entity '{0}' already exists")]
    DuplicateEntity(String),

    /// No entity with this identity is registered
    #[error("Entity '{0}' not found")]
    EntityNotFound(String),

    /// A property name that is not part of the property registry
    #[error("Property '{0}' is not registered")]
    UnregisteredProperty(String),

    /// Hostility needs a ChaseAndAttack sibling on the same entity
    #[error("Entity '{0}' has no ChaseAndAttack behaviour to drive hostility")]
    MissingChaseBehaviour(String),

    /// An entity can own at most one behaviour of each kind
    #[error("Entity '{entity}' already owns a {kind} behaviour")]
    DuplicateBehaviour { entity: String, kind: String },

    /// Only pickuppable items may ever enter an inventory
    #[error("Entity '{0}' cannot be picked up")]
    NotPickuppable(String),

    /// The world has no player registered yet
    #[error("No player registered in the world")]
    NoPlayer,

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),
}

/// Result type used throughout the Wildwood codebase.
pub type WildwoodResult<T> = Result<T, WildwoodError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Width of one screen in world cells
    pub const SCREEN_WIDTH: i32 = 60;

    /// Height of one screen in world cells
    pub const SCREEN_HEIGHT: i32 = 30;

    /// Size of one cell in pixels
    pub const CELL_SIZE: f32 = 16.0;

    /// Minutes of in-game time per world tick
    pub const MINUTES_PER_TICK: u32 = 2;

    /// Default player carry weight before equipment bonuses
    pub const BASE_CARRY_WEIGHT: u32 = 20;

    /// Ticks between two points of hunger loss
    pub const HUNGER_INTERVAL: u32 = 40;

    /// Darkness of the lightmap at midnight
    pub const MAX_DARKNESS: f32 = 0.85;

    /// Maximum number of notifications kept in the log
    pub const MAX_NOTIFICATIONS: usize = 50;
}
