//! Hostile pursuit of the player and the dormant watcher that re-arms it.

use crate::game::{Behaviour, BehaviourKind, Entity, World};
use crate::{WildwoodError, WildwoodResult};
use log::debug;
use serde::{Deserialize, Serialize};

/// Closes in on the player one step per tick and attacks when adjacent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChaseAndAttack {
    pub enabled: bool,
    /// Chance per tick to step toward the player
    pub clinginess: f64,
    /// Chance per tick to give up while farther than `range`
    pub unattachment: f64,
    pub range: f64,
    /// Hostility chance installed on disengage when nothing else is left to
    /// re-enable; zero installs nothing
    pub post_hostility: f64,
    pub post_hostility_range: f64,
}

impl ChaseAndAttack {
    pub fn new(clinginess: f64, unattachment: f64, range: f64) -> Self {
        Self {
            enabled: true,
            clinginess,
            unattachment,
            range,
            post_hostility: 0.0,
            post_hostility_range: 0.0,
        }
    }

    pub fn with_post_hostility(mut self, range: f64, hostility: f64) -> Self {
        self.post_hostility_range = range;
        self.post_hostility = hostility;
        self
    }

    /// Starts dormant; something else has to enable it.
    pub fn dormant(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn tick(&mut self, world: &mut World, parent: &str) -> WildwoodResult<()> {
        let Some(player_id) = world.player_id().cloned() else {
            return Ok(());
        };
        let (Some(player_pos), Some(position)) = (world.player_position(), world.position_of(parent))
        else {
            return Ok(());
        };
        world.status.set_attack_target(parent);

        let step = position.step_toward(player_pos);
        if step == player_pos {
            world.attack(parent, &player_id)?;
            return Ok(());
        }

        if position.distance(player_pos) > self.range && world.roll(self.unattachment) {
            self.disengage(world, parent)?;
            return Ok(());
        }

        if world.roll(self.clinginess) {
            world.move_entity(parent, step)?;
        }
        Ok(())
    }

    /// Gives up the chase and hands control back to a passive sibling.
    ///
    /// Re-enables the first of Wander, WanderAttach (latched to only-wander)
    /// and Hostility that the parent owns. If it owns none of them and
    /// `post_hostility` is non-zero, a fresh Hostility is installed instead.
    fn disengage(&mut self, world: &mut World, parent: &str) -> WildwoodResult<()> {
        self.enabled = false;
        world.status.clear_attack_target(parent);

        let post_hostility = self.post_hostility;
        let post_range = self.post_hostility_range;
        let Some(entity) = world.get_entity_mut(parent) else {
            return Ok(());
        };
        let behaviours = &mut entity.behaviours;
        if behaviours.set_enabled(BehaviourKind::Wander, true) {
            debug!("{} disengages and wanders off", parent);
        } else if let Some(wander_attach) = behaviours.wander_attach_mut() {
            wander_attach.enabled = true;
            wander_attach.set_only_wander();
            debug!("{} disengages and will no longer attach", parent);
        } else if behaviours.set_enabled(BehaviourKind::Hostility, true) {
            debug!("{} disengages and lies in wait", parent);
        } else if post_hostility != 0.0 {
            behaviours.insert(
                parent,
                Behaviour::Hostility(Hostility::new(post_range, post_hostility)),
            )?;
            debug!("{} disengages and turns watchful", parent);
        }
        let name = entity.name.clone();
        world.notify(format!("The {} loses interest.", name.to_lowercase()));
        Ok(())
    }
}

/// Dormant watcher that re-enables its sibling ChaseAndAttack when the player
/// comes within range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hostility {
    pub enabled: bool,
    pub range: f64,
    /// Chance per tick to turn feral while the player is in range
    pub hostility: f64,
}

impl Hostility {
    pub fn new(range: f64, hostility: f64) -> Self {
        Self {
            enabled: true,
            range,
            hostility,
        }
    }

    /// Attaches a Hostility to `entity`.
    ///
    /// Fails without touching the entity when it has no ChaseAndAttack.
    pub fn attach_to(entity: &mut Entity, range: f64, hostility: f64) -> WildwoodResult<()> {
        if entity.behaviours.chase().is_none() {
            return Err(WildwoodError::MissingChaseBehaviour(entity.id.clone()));
        }
        entity.add_behaviour(Behaviour::Hostility(Self::new(range, hostility)))
    }

    pub fn tick(&mut self, world: &mut World, parent: &str) -> WildwoodResult<()> {
        let (Some(player_pos), Some(position)) = (world.player_position(), world.position_of(parent))
        else {
            return Ok(());
        };
        let chasing = world
            .get_entity(parent)
            .map(|entity| entity.behaviours.is_enabled(BehaviourKind::ChaseAndAttack))
            .unwrap_or(true);
        if chasing || position.distance(player_pos) > self.range {
            return Ok(());
        }
        if !world.roll(self.hostility) {
            return Ok(());
        }

        let Some(entity) = world.get_entity_mut(parent) else {
            return Ok(());
        };
        entity
            .behaviours
            .set_enabled(BehaviourKind::ChaseAndAttack, true);
        let name = entity.name.clone();
        debug!("{} turns hostile", parent);
        world.notify(format!("The {} goes feral!", name.to_lowercase()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Glyph, Point, Wander, WorldConfig};
    use crate::rendering::Rgb;

    fn world_with_player(at: Point) -> World {
        let mut world = World::new(WorldConfig::for_testing(3));
        let player = Entity::new("Player", "You", Glyph::new('@', Rgb::WHITE), at)
            .with_health(100, 0)
            .solid();
        world.add_entity(player).unwrap();
        world.set_player("Player").unwrap();
        world
    }

    fn wolf(at: Point, chase: ChaseAndAttack) -> Entity {
        Entity::new("wolf", "Wolf", Glyph::new('w', Rgb::GREY), at)
            .with_health(10, 0)
            .with_attack(1, 3)
            .solid()
            .with_behaviour(Behaviour::ChaseAndAttack(chase))
            .unwrap()
    }

    #[test]
    fn test_hostility_construction_requires_chase() {
        let mut lone = Entity::new("deer", "Deer", Glyph::new('d', Rgb::BROWN), Point::origin());
        let before = lone.behaviours.clone();
        let err = Hostility::attach_to(&mut lone, 5.0, 1.0).unwrap_err();
        assert!(matches!(err, WildwoodError::MissingChaseBehaviour(_)));
        assert_eq!(lone.behaviours, before);
    }

    #[test]
    fn test_chase_closes_distance_then_attacks() {
        let mut world = world_with_player(Point::new(10, 10));
        world
            .add_entity(wolf(Point::new(14, 10), ChaseAndAttack::new(1.0, 0.0, 20.0)))
            .unwrap();

        for _ in 0..3 {
            world.tick_entity("wolf").unwrap();
        }
        assert_eq!(world.position_of("wolf"), Some(Point::new(11, 10)));
        assert_eq!(world.status.attack_target(), Some("wolf"));

        let hp_before = world.get_entity("Player").unwrap().hp;
        for _ in 0..20 {
            world.tick_entity("wolf").unwrap();
        }
        assert_eq!(world.position_of("wolf"), Some(Point::new(11, 10)));
        assert!(world.get_entity("Player").unwrap().hp <= hp_before);
    }

    #[test]
    fn test_disengage_prefers_wander() {
        let mut world = world_with_player(Point::new(10, 10));
        let mut entity = wolf(Point::new(40, 10), ChaseAndAttack::new(0.0, 1.0, 5.0));
        let mut wander = Wander::new();
        wander.enabled = false;
        entity.add_behaviour(Behaviour::Wander(wander)).unwrap();
        world.add_entity(entity).unwrap();

        world.tick_entity("wolf").unwrap();
        let wolf = world.get_entity("wolf").unwrap();
        assert!(!wolf.behaviours.is_enabled(BehaviourKind::ChaseAndAttack));
        assert!(wolf.behaviours.is_enabled(BehaviourKind::Wander));
        assert_eq!(world.status.attack_target(), None);
    }

    #[test]
    fn test_disengage_installs_post_hostility() {
        let mut world = world_with_player(Point::new(10, 10));
        let chase = ChaseAndAttack::new(0.0, 1.0, 5.0).with_post_hostility(6.0, 0.5);
        world.add_entity(wolf(Point::new(40, 10), chase)).unwrap();

        world.tick_entity("wolf").unwrap();
        let wolf = world.get_entity("wolf").unwrap();
        let hostility = wolf.behaviours.hostility().unwrap();
        assert_eq!(hostility.range, 6.0);
        assert_eq!(hostility.hostility, 0.5);
        assert!(!wolf.behaviours.is_enabled(BehaviourKind::ChaseAndAttack));
    }

    #[test]
    fn test_disengage_without_fallback_just_stops() {
        let mut world = world_with_player(Point::new(10, 10));
        world
            .add_entity(wolf(Point::new(40, 10), ChaseAndAttack::new(0.0, 1.0, 5.0)))
            .unwrap();
        world.tick_entity("wolf").unwrap();
        let wolf = world.get_entity("wolf").unwrap();
        assert!(!wolf.behaviours.is_enabled(BehaviourKind::ChaseAndAttack));
        assert!(wolf.behaviours.hostility().is_none());
    }

    #[test]
    fn test_hostility_rearms_chase_in_range() {
        let mut world = world_with_player(Point::new(10, 10));
        let mut entity = wolf(Point::new(13, 10), ChaseAndAttack::new(1.0, 0.0, 20.0).dormant());
        Hostility::attach_to(&mut entity, 5.0, 1.0).unwrap();
        world.add_entity(entity).unwrap();

        world.tick_entity("wolf").unwrap();
        assert!(world.get_entity("wolf").unwrap().is_hostile());
        assert!(world
            .status
            .notifications()
            .any(|line| line.contains("goes feral")));
    }

    #[test]
    fn test_hostility_ignores_player_out_of_range() {
        let mut world = world_with_player(Point::new(10, 10));
        let mut entity = wolf(Point::new(30, 10), ChaseAndAttack::new(1.0, 0.0, 20.0).dormant());
        Hostility::attach_to(&mut entity, 5.0, 1.0).unwrap();
        world.add_entity(entity).unwrap();

        for _ in 0..10 {
            world.tick_entity("wolf").unwrap();
        }
        assert!(!world.get_entity("wolf").unwrap().is_hostile());
        assert_eq!(world.position_of("wolf"), Some(Point::new(30, 10)));
    }
}
