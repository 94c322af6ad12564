//! # World
//!
//! The entity registry and simulation driver.
//!
//! The world is the sole owner of every entity. Inventories, equipment,
//! behaviours and the status panel only ever hold identities, which are
//! resolved here at use time. Two derived caches hold the identities on the
//! player's screen and on the eight screens around it; ticking, collisions
//! and the render order are all bounded by them.
//!
//! Entities are never erased in the middle of a pass. Anything that wants an
//! entity gone queues it with [`World::queue_for_deletion`], and the queue is
//! drained by [`World::cleanup`] at the start of the next tick.

use crate::game::{
    set_door, Behaviour, Entity, EntityId, InteractableKind, LightCondition, Point, StatusPanel,
    Time, WorldConfig,
};
use crate::rendering::LightSource;
use crate::{WildwoodError, WildwoodResult};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::Reverse;
use std::collections::{BTreeMap, VecDeque};

/// Frames per step of the fire flicker cycle.
const FLICKER_FRAMES: u64 = 8;

/// Registry of every simulated entity plus the session clock, RNG and HUD.
pub struct World {
    /// All entities, ordered by identity
    entities: BTreeMap<EntityId, Entity>,
    /// Identities waiting to be erased at the next cleanup
    pending_deletion: VecDeque<EntityId>,
    /// Identities on the anchor screen
    current: Vec<EntityId>,
    /// Identities on the eight screens around the anchor
    surrounding: Vec<EntityId>,
    /// Drawable identities on the anchor screen, back to front
    render_order: Vec<EntityId>,
    caches_populated: bool,
    /// Screen coordinate the caches were last computed for
    anchor: Point,
    /// Entities ever added minus entities erased
    initialized: usize,
    time: Time,
    ticks: u64,
    player_id: Option<EntityId>,
    /// HUD attack target and message log
    pub status: StatusPanel,
    rng: StdRng,
    config: WorldConfig,
}

impl World {
    pub fn new(config: WorldConfig) -> Self {
        Self {
            entities: BTreeMap::new(),
            pending_deletion: VecDeque::new(),
            current: Vec::new(),
            surrounding: Vec::new(),
            render_order: Vec::new(),
            caches_populated: false,
            anchor: Point::origin(),
            initialized: 0,
            time: Time::new(config.start_hour, 0),
            ticks: 0,
            player_id: None,
            status: StatusPanel::new(config.max_notifications),
            rng: StdRng::seed_from_u64(config.seed),
            config,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn time(&self) -> Time {
        self.time
    }

    pub fn set_time(&mut self, time: Time) {
        self.time = time;
    }

    /// Number of world ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Rolls against probability `p`. A `p` of 1.0 always succeeds and 0.0
    /// never does.
    pub fn roll(&mut self, p: f64) -> bool {
        self.rng.gen::<f64>() < p
    }

    /// Appends a message to the status log.
    pub fn notify(&mut self, message: String) {
        debug!("notify: {}", message);
        self.status.push(message);
    }

    // Registry

    /// Registers an entity.
    ///
    /// Fails without touching the registry if the identity is already taken.
    pub fn add_entity(&mut self, entity: Entity) -> WildwoodResult<()> {
        if self.entities.contains_key(&entity.id) {
            return Err(WildwoodError::DuplicateEntity(entity.id));
        }
        self.entities.insert(entity.id.clone(), entity);
        self.initialized += 1;
        if self.caches_populated {
            self.refresh_caches();
        }
        Ok(())
    }

    /// Removes an entity immediately.
    ///
    /// Every reference held by other entities' inventories and equipment,
    /// and by the status panel, is dropped with it.
    pub fn erase(&mut self, id: &str) -> WildwoodResult<Entity> {
        let entity = self
            .entities
            .remove(id)
            .ok_or_else(|| WildwoodError::EntityNotFound(id.to_string()))?;
        self.initialized = self.initialized.saturating_sub(1);

        for holder in self.entities.values_mut() {
            holder.inventory.retain(|item| item != id);
            if let Some(slot) = holder.equipment.slot_of(id) {
                holder.equipment.clear(slot);
            }
        }
        self.status.clear_attack_target(id);
        if self.player_id.as_deref() == Some(id) {
            warn!("player {} erased from the world", id);
            self.player_id = None;
        }
        if self.caches_populated {
            self.refresh_caches();
        }
        debug!("erased {}", id);
        Ok(entity)
    }

    pub fn queue_for_deletion(&mut self, id: &str) {
        self.pending_deletion.push_back(id.to_string());
    }

    pub fn is_queued_for_deletion(&self, id: &str) -> bool {
        self.pending_deletion.iter().any(|queued| queued == id)
    }

    /// Drains the deletion queue in FIFO order. Returns how many entities
    /// were erased; repeated or stale entries are skipped.
    pub fn cleanup(&mut self) -> usize {
        let mut erased = 0;
        while let Some(id) = self.pending_deletion.pop_front() {
            if self.entities.contains_key(&id) && self.erase(&id).is_ok() {
                erased += 1;
            }
        }
        if self.initialized != self.entities.len() {
            warn!(
                "entity count mismatch: {} initialized, {} live",
                self.initialized,
                self.entities.len()
            );
        }
        erased
    }

    pub fn get_entity(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn get_entity_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    pub fn position_of(&self, id: &str) -> Option<Point> {
        self.entities.get(id).map(|entity| entity.position)
    }

    /// Every entity in identity order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    // Player

    /// Registers `id` as the player and computes the caches around it.
    pub fn set_player(&mut self, id: &str) -> WildwoodResult<()> {
        if !self.entities.contains_key(id) {
            return Err(WildwoodError::EntityNotFound(id.to_string()));
        }
        self.player_id = Some(id.to_string());
        info!("player is {}", id);
        self.refresh_caches();
        Ok(())
    }

    pub fn player_id(&self) -> Option<&EntityId> {
        self.player_id.as_ref()
    }

    pub fn player(&self) -> Option<&Entity> {
        self.player_id.as_deref().and_then(|id| self.entities.get(id))
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        let id = self.player_id.as_deref()?;
        self.entities.get_mut(id)
    }

    pub fn player_position(&self) -> Option<Point> {
        self.player().map(|player| player.position)
    }

    /// True once the player's hit points have run out.
    pub fn player_is_dead(&self) -> bool {
        self.player().map(|player| !player.is_alive()).unwrap_or(false)
    }

    // Caches

    /// Coarse screen coordinate of a world position.
    pub fn screen_of(&self, position: Point) -> Point {
        position.screen_of(self.config.screen_size())
    }

    /// Screen coordinate the caches are anchored to.
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Recomputes the caches around the player's screen, or around the last
    /// anchor if there is no player. Does nothing before the first
    /// [`World::set_player`].
    pub fn refresh_caches(&mut self) {
        if let Some(position) = self.player_position() {
            let anchor = self.screen_of(position);
            self.recompute_caches(anchor);
        } else if self.caches_populated {
            self.recompute_caches(self.anchor);
        }
    }

    /// Sorts every entity into the current and surrounding caches relative to
    /// the `anchor` screen and rebuilds the render order.
    pub fn recompute_caches(&mut self, anchor: Point) {
        self.anchor = anchor;
        self.current.clear();
        self.surrounding.clear();
        let size = self.config.screen_size();
        for (id, entity) in &self.entities {
            let screen = entity.position.screen_of(size);
            if screen == anchor {
                self.current.push(id.clone());
            } else if screen.chebyshev(anchor) == 1 {
                self.surrounding.push(id.clone());
            }
        }
        self.caches_populated = true;
        self.refresh_render_order();
        debug!(
            "caches at {}: {} current, {} surrounding",
            anchor,
            self.current.len(),
            self.surrounding.len()
        );
    }

    /// Rebuilds the render order from the current cache: drawable entities
    /// by descending layer, then by identity.
    pub fn refresh_render_order(&mut self) {
        let entities = &self.entities;
        let mut order: Vec<EntityId> = self
            .current
            .iter()
            .filter(|id| {
                entities
                    .get(*id)
                    .map(|entity| entity.visible && !entity.in_inventory)
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        order.sort_by_key(|id| {
            let layer = entities.get(id).map(|entity| entity.layer).unwrap_or_default();
            (Reverse(layer), id.clone())
        });
        self.render_order = order;
    }

    pub fn caches_populated(&self) -> bool {
        self.caches_populated
    }

    pub fn current_entities(&self) -> &[EntityId] {
        &self.current
    }

    pub fn surrounding_entities(&self) -> &[EntityId] {
        &self.surrounding
    }

    /// Identities to draw, back to front.
    pub fn render_order(&self) -> &[EntityId] {
        &self.render_order
    }

    // Queries

    fn on_ground_at(&self, id: &str, position: Point) -> bool {
        self.entities
            .get(id)
            .map(|entity| entity.position == position && !entity.in_inventory)
            .unwrap_or(false)
            && !self.is_queued_for_deletion(id)
    }

    /// Entities on the ground at `position`, scanning the whole registry.
    /// Anything already queued for deletion is left out.
    pub fn entities_at(&self, position: Point) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|entity| entity.position == position && !entity.in_inventory)
            .filter(|entity| !self.is_queued_for_deletion(&entity.id))
            .map(|entity| entity.id.clone())
            .collect()
    }

    /// Entities on the ground within one step of `position`, `position`
    /// included, scanning the whole registry.
    pub fn entities_surrounding(&self, position: Point) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|entity| entity.position.chebyshev(position) <= 1 && !entity.in_inventory)
            .map(|entity| entity.id.clone())
            .collect()
    }

    /// Entities on the ground within Euclidean `radius` of `position`.
    pub fn entities_within(&self, position: Point, radius: f64) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|entity| entity.position.distance(position) <= radius && !entity.in_inventory)
            .map(|entity| entity.id.clone())
            .collect()
    }

    fn cached(&self) -> impl Iterator<Item = &EntityId> {
        self.current.iter().chain(self.surrounding.iter())
    }

    /// Like [`World::entities_at`], restricted to the caches.
    pub fn entities_at_fast(&self, position: Point) -> Vec<EntityId> {
        if !self.caches_populated {
            return self.entities_at(position);
        }
        self.cached()
            .filter(|id| self.on_ground_at(id, position))
            .cloned()
            .collect()
    }

    /// Like [`World::entities_surrounding`], restricted to the caches.
    pub fn entities_surrounding_fast(&self, position: Point) -> Vec<EntityId> {
        if !self.caches_populated {
            return self.entities_surrounding(position);
        }
        self.cached()
            .filter(|id| {
                self.entities
                    .get(*id)
                    .map(|entity| entity.position.chebyshev(position) <= 1 && !entity.in_inventory)
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }

    /// Candidates for a collision at `position`: the caches when they cover
    /// its screen, the whole registry otherwise.
    fn collision_candidates(&self, position: Point) -> Vec<EntityId> {
        let screen = self.screen_of(position);
        if self.caches_populated && screen.chebyshev(self.anchor) <= 1 {
            self.entities_at_fast(position)
        } else {
            self.entities_at(position)
        }
    }

    /// Whether a visible solid entity other than `mover` stands at `position`.
    pub fn is_blocked(&self, position: Point, mover: &str) -> bool {
        self.collision_candidates(position).iter().any(|id| {
            id != mover
                && self
                    .entities
                    .get(id)
                    .map(|entity| entity.solid && entity.visible)
                    .unwrap_or(false)
        })
    }

    /// Whether anything at all stands on the ground at `position`.
    pub fn is_occupied(&self, position: Point) -> bool {
        !self.collision_candidates(position).is_empty()
    }

    // Movement

    /// Collide hooks of whatever stands at `position`. Returns true if one of
    /// them vetoes the move.
    fn collide(&mut self, mover: &str, position: Point) -> WildwoodResult<bool> {
        let is_player = self.player_id.as_deref() == Some(mover);
        for id in self.collision_candidates(position) {
            let closed_door = self
                .entities
                .get(&id)
                .and_then(|entity| entity.behaviours.interactable())
                .map(|door| door.enabled && door.kind == InteractableKind::Door { open: false })
                .unwrap_or(false);
            if closed_door {
                if is_player {
                    set_door(self, &id, true)?;
                    self.notify("You open the door.".to_string());
                }
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Moves an entity to `to` if nothing blocks it, carrying its inventory
    /// along. Returns whether the entity moved.
    pub fn move_entity(&mut self, id: &str, to: Point) -> WildwoodResult<bool> {
        let from = self
            .position_of(id)
            .ok_or_else(|| WildwoodError::EntityNotFound(id.to_string()))?;
        if from == to {
            return Ok(false);
        }
        if self.collide(id, to)? || self.is_blocked(to, id) {
            return Ok(false);
        }
        self.place(id, to);
        if self.screen_of(from) != self.screen_of(to) {
            debug!("{} crossed from screen {} to {}", id, self.screen_of(from), self.screen_of(to));
            self.refresh_caches();
        }
        Ok(true)
    }

    /// Sets the position of an entity and everything it carries.
    fn place(&mut self, id: &str, to: Point) {
        let items = match self.entities.get_mut(id) {
            Some(entity) => {
                entity.position = to;
                entity.inventory.clone()
            }
            None => return,
        };
        for item in items {
            if let Some(item) = self.entities.get_mut(&item) {
                item.position = to;
            }
        }
    }

    /// Moves an entity without collision checks.
    pub fn teleport(&mut self, id: &str, to: Point) -> WildwoodResult<()> {
        let from = self
            .position_of(id)
            .ok_or_else(|| WildwoodError::EntityNotFound(id.to_string()))?;
        self.place(id, to);
        if self.screen_of(from) != self.screen_of(to) {
            self.refresh_caches();
        }
        Ok(())
    }

    // Ticking

    /// Advances the simulation by one turn.
    ///
    /// Drains the deletion queue, advances the clock, runs player upkeep and
    /// then ticks every entity on the current and surrounding screens.
    pub fn tick(&mut self) -> WildwoodResult<()> {
        self.cleanup();
        self.time.advance(self.config.minutes_per_tick);
        self.ticks += 1;
        self.player_upkeep();

        let active: Vec<EntityId> = if self.caches_populated {
            self.cached().cloned().collect()
        } else {
            self.entities.keys().cloned().collect()
        };
        for id in active {
            if self.is_queued_for_deletion(&id) {
                continue;
            }
            self.tick_entity(&id)?;
        }
        Ok(())
    }

    /// Regenerates an entity's hit points and ticks each of its enabled
    /// behaviours in insertion order.
    ///
    /// Each behaviour is taken out of the entity for the duration of its own
    /// tick, so it can reach the rest of the world (its parent included)
    /// through `self`, and is written back afterwards.
    pub fn tick_entity(&mut self, id: &str) -> WildwoodResult<()> {
        let kinds = match self.entities.get_mut(id) {
            Some(entity) => {
                if entity.regen > 0 && entity.is_alive() {
                    entity.heal(entity.regen);
                }
                entity.behaviours.kinds()
            }
            None => return Ok(()),
        };

        for kind in kinds {
            if self.is_queued_for_deletion(id) {
                break;
            }
            let behaviour: Option<Behaviour> = self
                .entities
                .get(id)
                .and_then(|entity| entity.behaviours.get(kind))
                .filter(|behaviour| behaviour.is_enabled())
                .cloned();
            let Some(mut behaviour) = behaviour else {
                continue;
            };
            behaviour.tick(self, id)?;
            if let Some(entity) = self.entities.get_mut(id) {
                entity.behaviours.replace(behaviour);
            }
        }
        Ok(())
    }

    /// Hunger drops every configured interval; an empty stomach costs one
    /// hit point per tick.
    fn player_upkeep(&mut self) {
        let interval = u64::from(self.config.hunger_interval.max(1));
        let hungrier = self.ticks % interval == 0;
        let Some(player) = self.player_mut() else {
            return;
        };
        let Some(hunger) = player.hunger.as_mut() else {
            return;
        };
        let mut starving = false;
        if hungrier && hunger.current > 0 {
            hunger.current -= 1;
            starving = hunger.current == 0;
        } else if hunger.current == 0 {
            player.hp -= 1;
        }
        if starving {
            self.notify("You are starving!".to_string());
        }
    }

    // Lighting

    /// Light sources on the current screen, in pixels relative to the
    /// screen's top-left corner.
    pub fn lights(&self, frame: u64) -> Vec<LightSource> {
        let size = self.config.screen_size();
        let origin = self.anchor * size;
        let cell = self.config.cell_size;
        let flicker = (frame / FLICKER_FRAMES % 3) as i64 - 1;

        self.current
            .iter()
            .filter_map(|id| self.entities.get(id))
            .filter_map(|entity| {
                let (radius, color, condition) = entity.properties.light()?;
                let radius = match condition {
                    LightCondition::Always if entity.in_inventory && !entity.equipped => return None,
                    LightCondition::Always => i64::from(radius),
                    LightCondition::WhenEquipped if entity.equipped => i64::from(radius),
                    LightCondition::WhenEquipped => return None,
                    LightCondition::WhileBurning => {
                        let lit = entity
                            .behaviours
                            .interactable()
                            .map(|fire| fire.enabled && fire.is_lit())
                            .unwrap_or(false);
                        if !lit {
                            return None;
                        }
                        (i64::from(radius) + flicker).max(1)
                    }
                };
                let local = entity.position - origin;
                Some(LightSource {
                    x: (local.x as f32 + 0.5) * cell,
                    y: (local.y as f32 + 0.5) * cell,
                    radius: radius as f32 * cell,
                    color,
                })
            })
            .collect()
    }
}
