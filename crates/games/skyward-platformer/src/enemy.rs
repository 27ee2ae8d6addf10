use serde::{Deserialize, Serialize};

use skyward_core::math::{Rect, Vec2};

use crate::body::KinematicBody;
use crate::config::EnemyConfig;

/// Horizontal patrol track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Patrol {
    pub min_x: f32,
    pub max_x: f32,
    pub speed: f32,
    /// +1 heading right, -1 heading left.
    pub direction: f32,
}

impl Patrol {
    /// Patrol `range` pixels either side of `origin_x`, starting rightward.
    pub fn around(origin_x: f32, range: f32, speed: f32) -> Self {
        Self::between(origin_x - range, origin_x + range, speed)
    }

    pub fn between(a: f32, b: f32, speed: f32) -> Self {
        Self {
            min_x: a.min(b),
            max_x: a.max(b),
            speed,
            direction: 1.0,
        }
    }
}

/// A patrolling enemy. Flies its track: no gravity and no tile collision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub body: KinematicBody,
    pub patrol: Patrol,
    pub active: bool,
}

impl Enemy {
    pub fn new(body: KinematicBody, patrol: Patrol) -> Self {
        Self {
            body,
            patrol,
            active: true,
        }
    }

    /// Spawn an enemy at `(x, y)` patrolling around its spawn point.
    pub fn spawn(x: f32, y: f32, config: &EnemyConfig) -> Self {
        Self::new(
            KinematicBody::new(Vec2::new(x, y), config.width, config.height),
            Patrol::around(x, config.patrol_range, config.speed),
        )
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn update(&mut self, dt: f32) {
        if !self.active || !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let patrol = &mut self.patrol;
        self.body.velocity = Vec2::new(patrol.speed * patrol.direction, 0.0);
        self.body.position.x += self.body.velocity.x * dt;

        if self.body.position.x >= patrol.max_x {
            self.body.position.x = patrol.max_x;
            patrol.direction = -1.0;
        } else if self.body.position.x <= patrol.min_x {
            self.body.position.x = patrol.min_x;
            patrol.direction = 1.0;
        }
    }

    /// Knocked out by a stomp. Deactivation is always external.
    pub fn defeat(&mut self) {
        self.active = false;
        self.body.velocity = Vec2::ZERO;
    }
}
