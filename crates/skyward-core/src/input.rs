use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Key identifiers that move the body left.
pub const LEFT_KEYS: &[&str] = &["ArrowLeft", "KeyA"];
/// Key identifiers that move the body right.
pub const RIGHT_KEYS: &[&str] = &["ArrowRight", "KeyD"];
/// Key identifiers that trigger a jump.
pub const JUMP_KEYS: &[&str] = &["Space", "ArrowUp", "KeyW"];

/// Snapshot of the logical keys currently held down.
///
/// The simulation only asks membership questions; event capture and key
/// repeat handling belong to whoever fills this in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputState {
    held: BTreeSet<String>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an input state with the given keys held.
    pub fn holding<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            held: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn press(&mut self, key: &str) {
        self.held.insert(key.to_string());
    }

    pub fn release(&mut self, key: &str) {
        self.held.remove(key);
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(key)
    }

    fn any_held(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.held.contains(*k))
    }

    pub fn left(&self) -> bool {
        self.any_held(LEFT_KEYS)
    }

    pub fn right(&self) -> bool {
        self.any_held(RIGHT_KEYS)
    }

    pub fn jump(&self) -> bool {
        self.any_held(JUMP_KEYS)
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}
