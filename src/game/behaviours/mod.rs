//! # Behaviours
//!
//! Stateful per-tick update units owned by exactly one entity. Each entity
//! owns at most one behaviour of each kind; siblings find each other through
//! the typed accessors on [`BehaviourSet`], and refer to their parent only by
//! identity, resolving it through the [`World`] at use time.

pub mod attachment;
pub mod chase;
pub mod healing;
pub mod interactable;
pub mod seek_home;
pub mod stocked;
pub mod wander;

pub use attachment::*;
pub use chase::*;
pub use healing::*;
pub use interactable::*;
pub use seek_home::*;
pub use stocked::*;
pub use wander::*;

use crate::game::World;
use crate::{WildwoodError, WildwoodResult};
use serde::{Deserialize, Serialize};

/// Discriminant of a [`Behaviour`], used as its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviourKind {
    Wander,
    Attachment,
    WanderAttach,
    ChaseAndAttack,
    Hostility,
    SeekHome,
    KeepStocked,
    Healing,
    Interactable,
}

impl std::fmt::Display for BehaviourKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BehaviourKind::Wander => "Wander",
            BehaviourKind::Attachment => "Attachment",
            BehaviourKind::WanderAttach => "WanderAttach",
            BehaviourKind::ChaseAndAttack => "ChaseAndAttack",
            BehaviourKind::Hostility => "Hostility",
            BehaviourKind::SeekHome => "SeekHome",
            BehaviourKind::KeepStocked => "KeepStocked",
            BehaviourKind::Healing => "Healing",
            BehaviourKind::Interactable => "Interactable",
        };
        f.write_str(name)
    }
}

/// A behaviour attached to an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Behaviour {
    Wander(Wander),
    Attachment(Attachment),
    WanderAttach(WanderAttach),
    ChaseAndAttack(ChaseAndAttack),
    Hostility(Hostility),
    SeekHome(SeekHome),
    KeepStocked(KeepStocked),
    Healing(Healing),
    Interactable(Interactable),
}

impl Behaviour {
    pub fn kind(&self) -> BehaviourKind {
        match self {
            Behaviour::Wander(_) => BehaviourKind::Wander,
            Behaviour::Attachment(_) => BehaviourKind::Attachment,
            Behaviour::WanderAttach(_) => BehaviourKind::WanderAttach,
            Behaviour::ChaseAndAttack(_) => BehaviourKind::ChaseAndAttack,
            Behaviour::Hostility(_) => BehaviourKind::Hostility,
            Behaviour::SeekHome(_) => BehaviourKind::SeekHome,
            Behaviour::KeepStocked(_) => BehaviourKind::KeepStocked,
            Behaviour::Healing(_) => BehaviourKind::Healing,
            Behaviour::Interactable(_) => BehaviourKind::Interactable,
        }
    }

    pub fn is_enabled(&self) -> bool {
        match self {
            Behaviour::Wander(b) => b.enabled,
            Behaviour::Attachment(b) => b.enabled,
            Behaviour::WanderAttach(b) => b.enabled,
            Behaviour::ChaseAndAttack(b) => b.enabled,
            Behaviour::Hostility(b) => b.enabled,
            Behaviour::SeekHome(b) => b.enabled,
            Behaviour::KeepStocked(b) => b.enabled,
            Behaviour::Healing(b) => b.enabled,
            Behaviour::Interactable(b) => b.enabled,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        match self {
            Behaviour::Wander(b) => b.enabled = enabled,
            Behaviour::Attachment(b) => b.enabled = enabled,
            Behaviour::WanderAttach(b) => b.enabled = enabled,
            Behaviour::ChaseAndAttack(b) => b.enabled = enabled,
            Behaviour::Hostility(b) => b.enabled = enabled,
            Behaviour::SeekHome(b) => b.enabled = enabled,
            Behaviour::KeepStocked(b) => b.enabled = enabled,
            Behaviour::Healing(b) => b.enabled = enabled,
            Behaviour::Interactable(b) => b.enabled = enabled,
        }
    }

    /// Advances this behaviour by one simulation tick on behalf of `parent`.
    pub fn tick(&mut self, world: &mut World, parent: &str) -> WildwoodResult<()> {
        match self {
            Behaviour::Wander(b) => b.tick(world, parent).map(|_| ()),
            Behaviour::Attachment(b) => b.tick(world, parent).map(|_| ()),
            Behaviour::WanderAttach(b) => b.tick(world, parent),
            Behaviour::ChaseAndAttack(b) => b.tick(world, parent),
            Behaviour::Hostility(b) => b.tick(world, parent),
            Behaviour::SeekHome(b) => b.tick(world, parent),
            Behaviour::KeepStocked(b) => b.tick(world, parent),
            Behaviour::Healing(_) => Ok(()),
            Behaviour::Interactable(b) => b.tick(world, parent),
        }
    }
}

/// The behaviours owned by one entity, ticked in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BehaviourSet {
    behaviours: Vec<Behaviour>,
}

impl BehaviourSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a behaviour owned by `owner`.
    ///
    /// Fails if the owner already has a behaviour of the same kind, or if a
    /// Hostility is added without a ChaseAndAttack for it to re-enable.
    pub fn insert(&mut self, owner: &str, behaviour: Behaviour) -> WildwoodResult<()> {
        let kind = behaviour.kind();
        if self.contains(kind) {
            return Err(WildwoodError::DuplicateBehaviour {
                entity: owner.to_string(),
                kind: kind.to_string(),
            });
        }
        if kind == BehaviourKind::Hostility && !self.contains(BehaviourKind::ChaseAndAttack) {
            return Err(WildwoodError::MissingChaseBehaviour(owner.to_string()));
        }
        self.behaviours.push(behaviour);
        Ok(())
    }

    /// Writes back a behaviour over the slot of the same kind.
    ///
    /// Returns false (and drops the value) if the slot no longer exists.
    pub fn replace(&mut self, behaviour: Behaviour) -> bool {
        match self.get_mut(behaviour.kind()) {
            Some(slot) => {
                *slot = behaviour;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, kind: BehaviourKind) -> Option<Behaviour> {
        let index = self.behaviours.iter().position(|b| b.kind() == kind)?;
        Some(self.behaviours.remove(index))
    }

    pub fn contains(&self, kind: BehaviourKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn get(&self, kind: BehaviourKind) -> Option<&Behaviour> {
        self.behaviours.iter().find(|b| b.kind() == kind)
    }

    pub fn get_mut(&mut self, kind: BehaviourKind) -> Option<&mut Behaviour> {
        self.behaviours.iter_mut().find(|b| b.kind() == kind)
    }

    /// Kinds in tick order.
    pub fn kinds(&self) -> Vec<BehaviourKind> {
        self.behaviours.iter().map(Behaviour::kind).collect()
    }

    pub fn is_enabled(&self, kind: BehaviourKind) -> bool {
        self.get(kind).map(Behaviour::is_enabled).unwrap_or(false)
    }

    /// Enables or disables the behaviour of `kind`. Returns false if absent.
    pub fn set_enabled(&mut self, kind: BehaviourKind, enabled: bool) -> bool {
        match self.get_mut(kind) {
            Some(behaviour) => {
                behaviour.set_enabled(enabled);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Behaviour> {
        self.behaviours.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviours.is_empty()
    }

    pub fn wander_attach_mut(&mut self) -> Option<&mut WanderAttach> {
        match self.get_mut(BehaviourKind::WanderAttach) {
            Some(Behaviour::WanderAttach(b)) => Some(b),
            _ => None,
        }
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        match self.get(BehaviourKind::Attachment) {
            Some(Behaviour::Attachment(b)) => Some(b),
            _ => None,
        }
    }

    pub fn chase(&self) -> Option<&ChaseAndAttack> {
        match self.get(BehaviourKind::ChaseAndAttack) {
            Some(Behaviour::ChaseAndAttack(b)) => Some(b),
            _ => None,
        }
    }

    pub fn chase_mut(&mut self) -> Option<&mut ChaseAndAttack> {
        match self.get_mut(BehaviourKind::ChaseAndAttack) {
            Some(Behaviour::ChaseAndAttack(b)) => Some(b),
            _ => None,
        }
    }

    pub fn hostility(&self) -> Option<&Hostility> {
        match self.get(BehaviourKind::Hostility) {
            Some(Behaviour::Hostility(b)) => Some(b),
            _ => None,
        }
    }

    pub fn seek_home(&self) -> Option<&SeekHome> {
        match self.get(BehaviourKind::SeekHome) {
            Some(Behaviour::SeekHome(b)) => Some(b),
            _ => None,
        }
    }

    pub fn keep_stocked(&self) -> Option<&KeepStocked> {
        match self.get(BehaviourKind::KeepStocked) {
            Some(Behaviour::KeepStocked(b)) => Some(b),
            _ => None,
        }
    }

    pub fn healing(&self) -> Option<&Healing> {
        match self.get(BehaviourKind::Healing) {
            Some(Behaviour::Healing(b)) => Some(b),
            _ => None,
        }
    }

    pub fn interactable(&self) -> Option<&Interactable> {
        match self.get(BehaviourKind::Interactable) {
            Some(Behaviour::Interactable(b)) => Some(b),
            _ => None,
        }
    }

    pub fn interactable_mut(&mut self) -> Option<&mut Interactable> {
        match self.get_mut(BehaviourKind::Interactable) {
            Some(Behaviour::Interactable(b)) => Some(b),
            _ => None,
        }
    }
}

/// Passive behaviours that keep a creature moving around on its own.
pub const WANDERING_KINDS: [BehaviourKind; 2] = [BehaviourKind::Wander, BehaviourKind::WanderAttach];

/// Passive behaviours switched off when a creature turns hostile.
pub const PASSIVE_KINDS: [BehaviourKind; 3] = [
    BehaviourKind::Wander,
    BehaviourKind::Attachment,
    BehaviourKind::WanderAttach,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_kind_rejected() {
        let mut set = BehaviourSet::new();
        set.insert("fox", Behaviour::Wander(Wander::new())).unwrap();
        let err = set.insert("fox", Behaviour::Wander(Wander::new())).unwrap_err();
        assert!(matches!(err, WildwoodError::DuplicateBehaviour { .. }));
        assert_eq!(set.kinds(), vec![BehaviourKind::Wander]);
    }

    #[test]
    fn test_hostility_requires_chase_sibling() {
        let mut set = BehaviourSet::new();
        let err = set
            .insert("wolf", Behaviour::Hostility(Hostility::new(5.0, 0.5)))
            .unwrap_err();
        assert!(matches!(err, WildwoodError::MissingChaseBehaviour(id) if id == "wolf"));
        assert!(set.is_empty());

        set.insert("wolf", Behaviour::ChaseAndAttack(ChaseAndAttack::new(1.0, 0.1, 8.0)))
            .unwrap();
        set.insert("wolf", Behaviour::Hostility(Hostility::new(5.0, 0.5)))
            .unwrap();
        assert_eq!(
            set.kinds(),
            vec![BehaviourKind::ChaseAndAttack, BehaviourKind::Hostility]
        );
    }

    #[test]
    fn test_enable_toggles_and_missing_lookups() {
        let mut set = BehaviourSet::new();
        assert!(!set.set_enabled(BehaviourKind::Wander, false));
        assert!(set.chase().is_none());
        set.insert("deer", Behaviour::Wander(Wander::new())).unwrap();
        assert!(set.is_enabled(BehaviourKind::Wander));
        assert!(set.set_enabled(BehaviourKind::Wander, false));
        assert!(!set.is_enabled(BehaviourKind::Wander));
    }

    #[test]
    fn test_replace_only_existing_slots() {
        let mut set = BehaviourSet::new();
        let mut wander = Wander::new();
        wander.enabled = false;
        assert!(!set.replace(Behaviour::Wander(wander.clone())));
        set.insert("deer", Behaviour::Wander(Wander::new())).unwrap();
        assert!(set.replace(Behaviour::Wander(wander)));
        assert!(!set.is_enabled(BehaviourKind::Wander));
    }
}
