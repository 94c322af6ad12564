//! Random walk.

use crate::game::{Direction, World};
use crate::WildwoodResult;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of equally likely outcomes per tick; the first eight are steps.
const WANDER_DIE_SIDES: usize = 20;

/// Unconditional random walk over the 8-neighbourhood.
///
/// Each tick draws one of 20 outcomes: 8 of them step in a direction
/// (diagonals included), the other 12 leave the entity where it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wander {
    pub enabled: bool,
}

impl Wander {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Returns whether the entity actually moved.
    pub fn tick(&mut self, world: &mut World, parent: &str) -> WildwoodResult<bool> {
        let roll = world.rng_mut().gen_range(0..WANDER_DIE_SIDES);
        let Some(direction) = Direction::all().get(roll).copied() else {
            return Ok(false);
        };
        let Some(position) = world.position_of(parent) else {
            return Ok(false);
        };
        world.move_entity(parent, position + direction.to_delta())
    }
}

impl Default for Wander {
    fn default() -> Self {
        Self::new()
    }
}

/// Wander and Attachment composed with mutual exclusion.
///
/// On any tick an attached entity follows the player and a detached one
/// wanders, never both. Once `only_wander` is latched the attachment half is
/// never consulted again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WanderAttach {
    pub enabled: bool,
    pub wander: Wander,
    pub attachment: crate::game::Attachment,
    pub only_wander: bool,
}

impl WanderAttach {
    pub fn new(attachment: crate::game::Attachment) -> Self {
        Self {
            enabled: true,
            wander: Wander::new(),
            attachment,
            only_wander: false,
        }
    }

    /// Permanently disables future attachment.
    pub fn set_only_wander(&mut self) {
        self.only_wander = true;
        self.attachment.attached = false;
    }

    pub fn tick(&mut self, world: &mut World, parent: &str) -> WildwoodResult<()> {
        if self.only_wander {
            self.wander.tick(world, parent)?;
            return Ok(());
        }
        let was_attached = self.attachment.attached;
        let attached = self.attachment.tick(world, parent)?;
        if !was_attached && !attached {
            self.wander.tick(world, parent)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Attachment, Behaviour, Entity, Glyph, Point, WorldConfig};
    use crate::rendering::Rgb;

    fn world_with_player() -> World {
        let mut world = World::new(WorldConfig::for_testing(7));
        let player = Entity::new("Player", "You", Glyph::new('@', Rgb::WHITE), Point::new(40, 20))
            .with_health(10, 0);
        world.add_entity(player).unwrap();
        world.set_player("Player").unwrap();
        world
    }

    fn boulder(at: Point) -> Entity {
        Entity::new("", "Boulder", Glyph::new('O', Rgb::GREY), at).solid()
    }

    #[test]
    fn test_wander_stays_put_when_boxed_in() {
        let mut world = world_with_player();
        let start = Point::new(10, 10);
        let critter = Entity::new("critter", "Critter", Glyph::new('c', Rgb::BROWN), start)
            .with_behaviour(Behaviour::Wander(Wander::new()))
            .unwrap();
        world.add_entity(critter).unwrap();
        for neighbour in start.neighbours() {
            world.add_entity(boulder(neighbour)).unwrap();
        }

        for _ in 0..1000 {
            world.tick_entity("critter").unwrap();
        }
        assert_eq!(world.position_of("critter"), Some(start));
    }

    #[test]
    fn test_wander_moves_at_most_one_step() {
        let mut world = world_with_player();
        let critter = Entity::new("critter", "Critter", Glyph::new('c', Rgb::BROWN), Point::new(10, 10));
        world.add_entity(critter).unwrap();
        let mut wander = Wander::new();
        let mut moved = 0;
        for _ in 0..200 {
            let before = world.position_of("critter").unwrap();
            if wander.tick(&mut world, "critter").unwrap() {
                moved += 1;
            }
            let after = world.position_of("critter").unwrap();
            assert!(before.chebyshev(after) <= 1);
        }
        assert!(moved > 0 && moved < 200);
    }

    #[test]
    fn test_only_wander_never_attaches() {
        let mut world = world_with_player();
        let critter = Entity::new("critter", "Critter", Glyph::new('c', Rgb::BROWN), Point::new(38, 20));
        world.add_entity(critter).unwrap();
        let mut composite = WanderAttach::new(Attachment::new(1.0, 1.0, 0.0, 100.0));
        composite.set_only_wander();
        for _ in 0..20 {
            composite.tick(&mut world, "critter").unwrap();
            assert!(!composite.attachment.attached);
        }
    }

    #[test]
    fn test_detaching_after_a_follow_step_does_not_also_wander() {
        for seed in 0..200 {
            let mut world = World::new(WorldConfig::for_testing(seed));
            let player = Entity::new("Player", "You", Glyph::new('@', Rgb::WHITE), Point::new(40, 20));
            world.add_entity(player).unwrap();
            world.set_player("Player").unwrap();
            let start = Point::new(25, 20);
            let mut composite = WanderAttach::new(Attachment::new(1.0, 1.0, 1.0, 100.0));
            composite.attachment.attached = true;
            let critter = Entity::new("critter", "Critter", Glyph::new('c', Rgb::BROWN), start)
                .with_behaviour(Behaviour::WanderAttach(composite))
                .unwrap();
            world.add_entity(critter).unwrap();

            world.tick_entity("critter").unwrap();
            let after = world.position_of("critter").unwrap();
            assert_eq!(after, Point::new(26, 20), "seed {} moved to {}", seed, after);
        }
    }

    #[test]
    fn test_attached_entity_does_not_wander_away() {
        let mut world = world_with_player();
        let critter = Entity::new("critter", "Critter", Glyph::new('c', Rgb::BROWN), Point::new(41, 20));
        world.add_entity(critter).unwrap();
        let mut composite = WanderAttach::new(Attachment::new(1.0, 1.0, 0.0, 100.0));
        composite.tick(&mut world, "critter").unwrap();
        assert!(composite.attachment.attached);
        for _ in 0..50 {
            composite.tick(&mut world, "critter").unwrap();
            assert_eq!(world.position_of("critter"), Some(Point::new(41, 20)));
        }
    }
}
