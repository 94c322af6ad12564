//! # Combat
//!
//! Damage is a sum of `hit_times` independent uniform rolls in
//! `[0, max_damage]`, where the maximum is the attacker's base hit amount
//! plus the melee bonus of whatever it holds in its right hand. Hit points are
//! not clamped: a target at or below zero is dead.

use crate::game::{BehaviourKind, EquipSlot, World, PASSIVE_KINDS};
use crate::{WildwoodError, WildwoodResult};
use log::{debug, info};
use rand::Rng;

/// What one attack did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackOutcome {
    pub damage: i32,
    pub killed: bool,
}

/// Sums `hit_times` rolls in `[0, max_damage]`.
pub fn roll_damage<R: Rng>(rng: &mut R, hit_times: u32, max_damage: u32) -> u32 {
    (0..hit_times).map(|_| rng.gen_range(0..=max_damage)).sum()
}

impl World {
    /// Largest damage a single roll of `attacker` can do.
    pub fn max_damage(&self, attacker: &str) -> u32 {
        let Some(entity) = self.get_entity(attacker) else {
            return 0;
        };
        let weapon = entity
            .equipment
            .get(EquipSlot::RightHand)
            .and_then(|id| self.get_entity(id))
            .map(|item| item.properties.melee_bonus())
            .unwrap_or(0);
        entity.hit_amount + weapon
    }

    /// Rolls one attack's worth of damage for `attacker`.
    pub fn roll_damage(&mut self, attacker: &str) -> i32 {
        let hit_times = self
            .get_entity(attacker)
            .map(|entity| entity.hit_times)
            .unwrap_or(0);
        let max = self.max_damage(attacker);
        roll_damage(self.rng_mut(), hit_times, max) as i32
    }

    /// Resolves one attack of `attacker` on `target`.
    ///
    /// A non-hostile target that owns a ChaseAndAttack and takes damage turns
    /// hostile: its passive behaviours switch off and the chase switches on.
    /// A target brought to zero hit points or below drops what it carried and
    /// is queued for deletion, except the player, which is left for the game
    /// over screen to deal with.
    pub fn attack(&mut self, attacker: &str, target: &str) -> WildwoodResult<AttackOutcome> {
        if !self.contains(attacker) {
            return Err(WildwoodError::EntityNotFound(attacker.to_string()));
        }
        if !self.contains(target) {
            return Err(WildwoodError::EntityNotFound(target.to_string()));
        }
        if self.is_queued_for_deletion(target) {
            return Ok(AttackOutcome {
                damage: 0,
                killed: false,
            });
        }

        let damage = self.roll_damage(attacker);
        let player = self.player_id().cloned();
        let attacker_is_player = player.as_deref() == Some(attacker);
        let target_is_player = player.as_deref() == Some(target);
        let attacker_name = self
            .get_entity(attacker)
            .map(|entity| entity.name.to_lowercase())
            .unwrap_or_default();

        let (target_name, alive, provoked) = {
            let Some(entity) = self.get_entity_mut(target) else {
                return Err(WildwoodError::EntityNotFound(target.to_string()));
            };
            entity.hp -= damage;
            let provoked = damage > 0
                && !entity.is_hostile()
                && entity.behaviours.chase().is_some()
                && entity.is_alive();
            if provoked {
                for kind in PASSIVE_KINDS {
                    entity.behaviours.set_enabled(kind, false);
                }
                entity
                    .behaviours
                    .set_enabled(BehaviourKind::ChaseAndAttack, true);
            }
            (entity.name.to_lowercase(), entity.is_alive(), provoked)
        };
        debug!("{} hit {} for {}", attacker, target, damage);

        let message = match (attacker_is_player, target_is_player, damage > 0) {
            (true, _, true) => format!("You hit the {} for {}.", target_name, damage),
            (true, _, false) => format!("You miss the {}.", target_name),
            (_, true, true) => format!("The {} hits you for {}.", attacker_name, damage),
            (_, true, false) => format!("The {} misses you.", attacker_name),
            (_, _, true) => format!("The {} hits the {}.", attacker_name, target_name),
            (_, _, false) => format!("The {} misses the {}.", attacker_name, target_name),
        };
        self.notify(message);
        if attacker_is_player && alive {
            self.status.set_attack_target(target);
        }
        if provoked {
            self.notify(format!("The {} turns on you!", target_name));
        }

        if !alive {
            self.status.clear_attack_target(target);
            if target_is_player {
                info!("player killed by {}", attacker);
                self.notify("You die...".to_string());
            } else {
                self.drop_all(target)?;
                self.queue_for_deletion(target);
                info!("{} destroyed by {}", target, attacker);
                self.notify(format!("The {} dies.", target_name));
            }
        }
        Ok(AttackOutcome {
            damage,
            killed: !alive,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        Behaviour, ChaseAndAttack, Entity, Glyph, Point, Property, Wander, WorldConfig,
    };
    use crate::rendering::Rgb;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup() -> World {
        let mut world = World::new(WorldConfig::for_testing(6));
        let player = Entity::new("Player", "You", Glyph::new('@', Rgb::WHITE), Point::new(5, 5))
            .with_health(20, 0)
            .with_attack(1, 2)
            .with_carry_weight(20);
        world.add_entity(player).unwrap();
        world.set_player("Player").unwrap();
        world
    }

    fn deer(hp: i32) -> Entity {
        Entity::new("deer", "Deer", Glyph::new('d', Rgb::BROWN), Point::new(6, 5))
            .with_health(hp, 0)
            .with_attack(1, 1)
            .with_behaviour(Behaviour::Wander(Wander::new()))
            .unwrap()
            .with_behaviour(Behaviour::ChaseAndAttack(ChaseAndAttack::new(1.0, 0.0, 8.0).dormant()))
            .unwrap()
    }

    #[test]
    fn test_weapon_in_right_hand_adds_damage() {
        let mut world = setup();
        assert_eq!(world.max_damage("Player"), 2);
        let spear = Entity::new("spear", "Spear", Glyph::new('/', Rgb::BROWN), Point::new(5, 5))
            .with_property(Property::Pickuppable { weight: 3 })
            .with_property(Property::Equippable { slots: vec![EquipSlot::RightHand] })
            .with_property(Property::MeleeWeaponDamage(3));
        world.add_entity(spear).unwrap();
        world.equip("Player", EquipSlot::RightHand, "spear").unwrap();
        assert_eq!(world.max_damage("Player"), 5);
    }

    #[test]
    fn test_hit_provokes_passive_creature() {
        let mut world = setup();
        world.add_entity(deer(100)).unwrap();
        world.get_entity_mut("Player").unwrap().hit_amount = 50;
        let mut outcome = world.attack("Player", "deer").unwrap();
        while outcome.damage == 0 {
            outcome = world.attack("Player", "deer").unwrap();
        }
        let deer = world.get_entity("deer").unwrap();
        assert!(deer.is_hostile());
        assert!(!deer.behaviours.is_enabled(BehaviourKind::Wander));
        assert_eq!(world.status.attack_target(), Some("deer"));
    }

    #[test]
    fn test_kill_drops_loot_and_queues_deletion() {
        let mut world = setup();
        world.add_entity(deer(1).with_carry_weight(10)).unwrap();
        let hide = Entity::new("hide", "Hide", Glyph::new('~', Rgb::BROWN), Point::new(6, 5))
            .with_property(Property::Pickuppable { weight: 2 });
        world.add_entity(hide).unwrap();
        world.add_to_inventory("deer", "hide").unwrap();
        world.get_entity_mut("Player").unwrap().hit_amount = 0;
        world.get_entity_mut("deer").unwrap().hp = 0;

        let outcome = world.attack("Player", "deer").unwrap();
        assert!(outcome.killed);
        assert!(world.get_entity("deer").unwrap().hp <= 0);
        assert!(!world.get_entity("hide").unwrap().in_inventory);
        assert_eq!(world.status.attack_target(), None);
        world.cleanup();
        assert!(world.get_entity("deer").is_none());
        assert!(world.get_entity("hide").is_some());
        assert!(world.entities_at(Point::new(6, 5)).contains(&"hide".to_string()));
    }

    #[test]
    fn test_hp_goes_negative_and_player_is_kept() {
        let mut world = setup();
        world.add_entity(deer(5)).unwrap();
        world.get_entity_mut("deer").unwrap().hit_amount = 0;
        world.get_entity_mut("Player").unwrap().hp = -3;
        let outcome = world.attack("deer", "Player").unwrap();
        assert!(outcome.killed);
        assert!(world.player_is_dead());
        world.cleanup();
        assert!(world.get_entity("Player").is_some());
    }

    proptest! {
        #[test]
        fn damage_within_bounds(seed in any::<u64>(), hit_times in 0u32..6, max in 0u32..20) {
            let mut rng = StdRng::seed_from_u64(seed);
            let damage = roll_damage(&mut rng, hit_times, max);
            prop_assert!(damage <= hit_times * max);
        }
    }
}
