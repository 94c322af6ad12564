//! # Game Module
//!
//! The simulation core: spatial primitives, entities, behaviours and the
//! world registry that owns them.
//!
//! This module contains the fundamental building blocks of Wildwood:
//! - Points, directions and the wrapping time of day
//! - Entities with typed properties and behaviours
//! - The `World` registry with its visibility caches and tick driver
//! - Inventory, equipment, combat and crafting resolution

pub mod behaviours;
pub mod combat;
pub mod crafting;
pub mod entity;
pub mod inventory;
pub mod properties;
pub mod settings;
pub mod status;
pub mod templates;
pub mod time;
pub mod world;

pub use behaviours::*;
pub use combat::*;
pub use crafting::*;
pub use entity::*;
pub use inventory::*;
pub use properties::*;
pub use settings::*;
pub use status::*;
pub use templates::*;
pub use time::*;
pub use world::*;

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};
use uuid::Uuid;

/// An integer 2D vector.
///
/// Used both as a fine-grained world coordinate and as a coarse screen-grid
/// coordinate (see [`Point::screen_of`]).
///
/// # Examples
///
/// ```
/// use wildwood::Point;
///
/// let pos = Point::new(10, 5);
/// assert_eq!(pos + Point::new(1, 1), Point::new(11, 6));
/// assert_eq!(pos.manhattan(Point::new(7, 1)), 7);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Creates a new point with the given coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the origin (0, 0).
    pub const fn origin() -> Self {
        Self::new(0, 0)
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Manhattan distance to another point.
    pub fn manhattan(self, other: Point) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Chebyshev (king-move) distance to another point.
    pub fn chebyshev(self, other: Point) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Component-wise sign, so every component is -1, 0 or 1.
    pub fn signum(self) -> Self {
        Self::new(self.x.signum(), self.y.signum())
    }

    /// One Chebyshev step from `self` toward `target`.
    ///
    /// Each axis moves independently by its sign; this is not pathfinding.
    ///
    /// ```
    /// use wildwood::Point;
    ///
    /// let step = Point::new(0, 0).step_toward(Point::new(5, -2));
    /// assert_eq!(step, Point::new(1, -1));
    /// ```
    pub fn step_toward(self, target: Point) -> Self {
        self + (target - self).signum()
    }

    /// Coarse screen coordinate of this world position.
    ///
    /// Uses floor division so that `(-1, -1)` belongs to screen `(-1, -1)`
    /// rather than to screen `(0, 0)`.
    pub fn screen_of(self, screen_size: Point) -> Self {
        Self::new(
            self.x.div_euclid(screen_size.x),
            self.y.div_euclid(screen_size.y),
        )
    }

    /// Returns all 8 neighbouring points.
    pub fn neighbours(self) -> Vec<Point> {
        Direction::all()
            .into_iter()
            .map(|dir| self + dir.to_delta())
            .collect()
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Mul<i32> for Point {
    type Output = Self;

    fn mul(self, scalar: i32) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }
}

impl Mul for Point {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y)
    }
}

impl Div<i32> for Point {
    type Output = Self;

    fn div(self, scalar: i32) -> Self {
        Self::new(self.x / scalar, self.y / scalar)
    }
}

impl Div for Point {
    type Output = Self;

    fn div(self, other: Self) -> Self {
        Self::new(self.x / other.x, self.y / other.y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Directions for movement and orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Northeast,
    Northwest,
    Southeast,
    Southwest,
}

impl Direction {
    /// Converts a direction to a position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use wildwood::{Direction, Point};
    ///
    /// assert_eq!(Direction::North.to_delta(), Point::new(0, -1));
    /// ```
    pub fn to_delta(self) -> Point {
        match self {
            Direction::North => Point::new(0, -1),
            Direction::South => Point::new(0, 1),
            Direction::East => Point::new(1, 0),
            Direction::West => Point::new(-1, 0),
            Direction::Northeast => Point::new(1, -1),
            Direction::Northwest => Point::new(-1, -1),
            Direction::Southeast => Point::new(1, 1),
            Direction::Southwest => Point::new(-1, 1),
        }
    }

    /// Converts a position delta to a direction.
    ///
    /// Returns None if the delta doesn't correspond to a valid direction.
    pub fn from_delta(delta: Point) -> Option<Direction> {
        match (delta.x, delta.y) {
            (0, -1) => Some(Direction::North),
            (0, 1) => Some(Direction::South),
            (1, 0) => Some(Direction::East),
            (-1, 0) => Some(Direction::West),
            (1, -1) => Some(Direction::Northeast),
            (-1, -1) => Some(Direction::Northwest),
            (1, 1) => Some(Direction::Southeast),
            (-1, 1) => Some(Direction::Southwest),
            _ => None,
        }
    }

    /// Returns all 8 directions, cardinals first.
    pub fn all() -> [Direction; 8] {
        [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
            Direction::Northeast,
            Direction::Northwest,
            Direction::Southeast,
            Direction::Southwest,
        ]
    }
}

/// Unique identity of an entity for its entire lifetime.
pub type EntityId = String;

/// Creates a new unique entity identity.
///
/// The identity is prefixed with a readable stem so that log lines stay
/// legible, e.g. `rabbit-3f2a…`.
pub fn new_entity_id(stem: &str) -> EntityId {
    let stem: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    format!("{}-{}", stem, Uuid::new_v4().simple())
}
