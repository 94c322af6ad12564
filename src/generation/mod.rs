//! # Generation Module
//!
//! Seeds a fresh world: the player in the middle of the starting screen,
//! scenery, loose materials and wildlife on that screen and the eight around
//! it, plus the deterministic floor pattern drawn under everything.

use crate::game::{
    templates, Entity, Glyph, ItemTemplate, Point, World, WorldConfig,
};
use crate::rendering::Rgb;
use crate::{WildwoodError, WildwoodResult};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &WorldConfig, rng: &mut StdRng) -> WildwoodResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &WorldConfig) -> WildwoodResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Attempts at finding a free square before giving up on one placement.
const PLACEMENT_ATTEMPTS: usize = 20;

/// Loose items scattered on every screen, as (template, min, max).
const SCATTER: [(ItemTemplate, u32, u32); 4] = [
    (ItemTemplate::Stick, 6, 10),
    (ItemTemplate::Grass, 6, 10),
    (ItemTemplate::Stone, 3, 6),
    (ItemTemplate::HealingHerb, 1, 2),
];

/// Generates the starting wilderness.
#[derive(Debug, Clone, Default)]
pub struct WildernessGenerator {
    /// Trees per screen, inclusive range
    pub trees: (u32, u32),
    /// Berry bushes per screen, inclusive range
    pub bushes: (u32, u32),
}

impl WildernessGenerator {
    pub fn new() -> Self {
        Self {
            trees: (15, 30),
            bushes: (2, 4),
        }
    }

    /// A random free square on `screen` at least three steps from `keep_clear`.
    fn free_square(
        world: &World,
        rng: &mut StdRng,
        screen: Point,
        keep_clear: Point,
    ) -> Option<Point> {
        let size = world.config().screen_size();
        let origin = screen * size;
        (0..PLACEMENT_ATTEMPTS).find_map(|_| {
            let candidate = origin + Point::new(rng.gen_range(1..size.x - 1), rng.gen_range(1..size.y - 1));
            (!world.is_occupied(candidate) && candidate.chebyshev(keep_clear) > 2)
                .then_some(candidate)
        })
    }

    fn place(
        world: &mut World,
        rng: &mut StdRng,
        screen: Point,
        keep_clear: Point,
        build: impl FnOnce(Point) -> WildwoodResult<Entity>,
    ) -> WildwoodResult<Option<Point>> {
        let Some(position) = Self::free_square(world, rng, screen, keep_clear) else {
            debug!("no room left on screen {}", screen);
            return Ok(None);
        };
        world.add_entity(build(position)?)?;
        Ok(Some(position))
    }

    /// A ring of trees with a closed door on its south side.
    fn place_cabin(world: &mut World, corner: Point) -> WildwoodResult<()> {
        let (width, height) = (7, 5);
        for dx in 0..width {
            for dy in 0..height {
                let edge = dx == 0 || dy == 0 || dx == width - 1 || dy == height - 1;
                if !edge {
                    continue;
                }
                let position = corner + Point::new(dx, dy);
                if dy == height - 1 && dx == width / 2 {
                    world.add_entity(templates::door(position, false)?)?;
                } else {
                    world.add_entity(templates::tree(position))?;
                }
            }
        }
        let stash = ItemTemplate::Backpack.spawn(corner + Point::new(width / 2, height / 2))?;
        world.add_entity(stash)?;
        Ok(())
    }

    fn populate_screen(
        &self,
        world: &mut World,
        rng: &mut StdRng,
        screen: Point,
        player: Point,
    ) -> WildwoodResult<()> {
        let config = world.config().clone();

        for _ in 0..rng.gen_range(self.trees.0..=self.trees.1) {
            Self::place(world, rng, screen, player, |at| Ok(templates::tree(at)))?;
        }

        for _ in 0..rng.gen_range(self.bushes.0..=self.bushes.1) {
            let Some(at) = Self::place(world, rng, screen, player, templates::berry_bush)? else {
                continue;
            };
            // Start each bush off with a couple of berries.
            let bush = world
                .entities_at(at)
                .into_iter()
                .next()
                .ok_or_else(|| WildwoodError::InvalidState(format!("bush vanished at {}", at)))?;
            for _ in 0..2 {
                let berry = ItemTemplate::Berry.spawn(at)?;
                let berry_id = berry.id.clone();
                world.add_entity(berry)?;
                world.add_to_inventory(&bush, &berry_id)?;
            }
        }

        for (template, min, max) in SCATTER {
            for _ in 0..rng.gen_range(min..=max) {
                Self::place(world, rng, screen, player, |at| template.spawn(at))?;
            }
        }

        if let Some(burrow) = Self::place(world, rng, screen, player, |at| Ok(templates::burrow(at)))? {
            for offset in [Point::new(1, 0), Point::new(-1, 1)] {
                let at = burrow + offset;
                if !world.is_occupied(at) {
                    world.add_entity(templates::rabbit(at)?)?;
                }
            }
        }

        let wildlife = config.creatures_per_screen.saturating_sub(2);
        for index in 0..wildlife {
            let starting_screen = screen == Point::origin();
            let build: fn(Point) -> WildwoodResult<Entity> = match (starting_screen, index) {
                (true, 0) => templates::dog,
                (true, _) => templates::rabbit,
                (false, 0) => templates::wolf,
                (false, _) => templates::rabbit,
            };
            Self::place(world, rng, screen, player, build)?;
        }
        Ok(())
    }
}

impl Generator<World> for WildernessGenerator {
    fn generate(&self, config: &WorldConfig, rng: &mut StdRng) -> WildwoodResult<World> {
        let mut world = World::new(config.clone());
        let player = config.screen_size() / 2;
        world.add_entity(templates::player(player))?;
        world.set_player(templates::PLAYER_ID)?;

        Self::place_cabin(&mut world, player + Point::new(6, -6))?;
        for dy in -1..=1 {
            for dx in -1..=1 {
                self.populate_screen(&mut world, rng, Point::new(dx, dy), player)?;
            }
        }

        world.refresh_caches();
        info!(
            "{} generated {} entities with seed {}",
            self.generator_type(),
            world.len(),
            config.seed
        );
        self.validate(&world, config)?;
        Ok(world)
    }

    fn validate(&self, content: &World, config: &WorldConfig) -> WildwoodResult<()> {
        let player = content.player_position().ok_or(WildwoodError::NoPlayer)?;
        if player.screen_of(config.screen_size()) != Point::origin() {
            return Err(WildwoodError::InvalidState(format!(
                "player starts off the first screen at {}",
                player
            )));
        }
        if content.is_blocked(player, templates::PLAYER_ID) {
            return Err(WildwoodError::InvalidState(
                "player starts inside something solid".to_string(),
            ));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "WildernessGenerator"
    }
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;
    use rand::SeedableRng;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &WorldConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }
}

/// Generates a world with the default wilderness generator.
pub fn generate_world(config: &WorldConfig) -> WildwoodResult<World> {
    config.validate()?;
    let mut rng = utils::create_rng(config);
    WildernessGenerator::new().generate(config, &mut rng)
}

/// Mixes a world position and seed into a well-spread hash.
fn floor_hash(position: Point, seed: u64) -> u64 {
    let mut h = seed ^ 0x9e37_79b9_7f4a_7c15;
    for value in [position.x as i64 as u64, position.y as i64 as u64] {
        h ^= value.wrapping_mul(0xbf58_476d_1ce4_e5b9);
        h = h.rotate_left(27).wrapping_mul(0x94d0_49bb_1331_11eb);
    }
    h ^ (h >> 31)
}

/// Ground glyph at a world position. The same position and seed always give
/// the same glyph.
pub fn floor_glyph(position: Point, seed: u64) -> Glyph {
    match floor_hash(position, seed) % 20 {
        0 => Glyph::new('"', Rgb::DARK_GREEN),
        1 | 2 => Glyph::new(',', Rgb::DARK_GREEN),
        3 => Glyph::new('\'', Rgb::BROWN),
        _ => Glyph::new('.', Rgb::DARK_GREY),
    }
}
