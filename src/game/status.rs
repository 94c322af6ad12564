//! HUD state: the creature currently fighting the player and the message log.

use crate::game::EntityId;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct StatusPanel {
    attack_target: Option<EntityId>,
    notifications: VecDeque<String>,
    capacity: usize,
}

impl StatusPanel {
    pub fn new(capacity: usize) -> Self {
        Self {
            attack_target: None,
            notifications: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn attack_target(&self) -> Option<&str> {
        self.attack_target.as_deref()
    }

    pub fn set_attack_target(&mut self, id: &str) {
        self.attack_target = Some(id.to_string());
    }

    /// Clears the attack target only if it is `id`.
    pub fn clear_attack_target(&mut self, id: &str) {
        if self.attack_target.as_deref() == Some(id) {
            self.attack_target = None;
        }
    }

    /// Appends a message, dropping the oldest once over capacity.
    pub fn push(&mut self, message: String) {
        self.notifications.push_back(message);
        while self.notifications.len() > self.capacity {
            self.notifications.pop_front();
        }
    }

    /// Oldest first.
    pub fn notifications(&self) -> impl Iterator<Item = &String> {
        self.notifications.iter()
    }

    pub fn last(&self) -> Option<&str> {
        self.notifications.back().map(String::as_str)
    }

    /// The `count` most recent messages, oldest first.
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &String> {
        let skip = self.notifications.len().saturating_sub(count);
        self.notifications.iter().skip(skip)
    }
}

impl Default for StatusPanel {
    fn default() -> Self {
        Self::new(crate::config::MAX_NOTIFICATIONS)
    }
}
