//! Kinematic body shared by the player and enemies.

use serde::{Deserialize, Serialize};

use skyward_core::math::{Rect, Vec2};

use crate::collision::{Axis, Obstacle, resolve_obstacle};

/// Movement state derived from the body's physics each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyState {
    #[default]
    Idle,
    Running,
    Jumping,
    Falling,
}

impl BodyState {
    pub fn derive(grounded: bool, velocity: Vec2, run_threshold: f32) -> Self {
        match (grounded, velocity.y < 0.0) {
            (false, true) => BodyState::Jumping,
            (false, false) => BodyState::Falling,
            (true, _) if velocity.x.abs() > run_threshold => BodyState::Running,
            (true, _) => BodyState::Idle,
        }
    }
}

/// A moving axis-aligned box with grounding state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KinematicBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub width: f32,
    pub height: f32,
    pub grounded: bool,
    pub was_grounded: bool,
    /// Index of the platform the body landed on this tick.
    pub riding: Option<usize>,
}

impl KinematicBody {
    pub fn new(position: Vec2, width: f32, height: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            width,
            height,
            grounded: false,
            was_grounded: false,
            riding: None,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::at(self.position, self.width, self.height)
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.height
    }

    pub fn state(&self, run_threshold: f32) -> BodyState {
        BodyState::derive(self.grounded, self.velocity, run_threshold)
    }

    /// Resolve against every obstacle in order along one axis. Each
    /// correction overwrites the previous one; later obstacles see the
    /// already-corrected position. A top landing on a platform sets
    /// `riding`.
    pub fn resolve(&mut self, obstacles: &[Obstacle], axis: Axis, dt: f32) {
        for obstacle in obstacles {
            let velocity = match axis {
                Axis::Horizontal => self.velocity.x,
                Axis::Vertical => self.velocity.y,
            };
            let Some(res) = resolve_obstacle(&self.rect(), obstacle, axis, velocity, dt) else {
                continue;
            };
            match axis {
                Axis::Horizontal => {
                    self.position.x = res.position;
                    self.velocity.x = res.velocity;
                },
                Axis::Vertical => {
                    self.position.y = res.position;
                    self.velocity.y = res.velocity;
                },
            }
            if res.landed_on_top {
                self.grounded = true;
                if let Obstacle::Platform { index, .. } = *obstacle {
                    self.riding = Some(index);
                }
            }
        }
    }
}
