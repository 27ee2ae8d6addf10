use serde::{Deserialize, Serialize};

use skyward_core::math::Rect;

/// How close a body must be to a door's edge to count as touching it.
/// Locked doors are obstacles, so a blocked body only ever touches them.
pub const DOOR_CONTACT_MARGIN: f32 = 1.0;

/// A collectible key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Key {
    pub rect: Rect,
    pub active: bool,
}

impl Key {
    pub fn new(rect: Rect) -> Self {
        Self { rect, active: true }
    }

    /// Collect the key if it is still lying around and `body` overlaps it.
    pub fn try_collect(&mut self, body: &Rect) -> bool {
        if self.active && body.overlaps(&self.rect) {
            self.active = false;
            true
        } else {
            false
        }
    }
}

/// A door that blocks movement until opened with a key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub rect: Rect,
    pub locked: bool,
}

impl Door {
    pub fn new(rect: Rect) -> Self {
        Self { rect, locked: true }
    }

    pub fn touches(&self, body: &Rect) -> bool {
        body.overlaps(&self.rect.inflate(DOOR_CONTACT_MARGIN))
    }

    /// Unlock using the key held in `has_key`. The door opening and the key
    /// being spent happen together or not at all.
    pub fn try_unlock(&mut self, body: &Rect, has_key: &mut bool) -> bool {
        if self.locked && *has_key && self.touches(body) {
            self.locked = false;
            *has_key = false;
            true
        } else {
            false
        }
    }
}

/// The level exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub rect: Rect,
}

impl Goal {
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }

    pub fn reached_by(&self, body: &Rect) -> bool {
        body.overlaps(&self.rect)
    }
}
