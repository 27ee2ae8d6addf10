use serde::{Deserialize, Serialize};

use skyward_core::input::InputState;
use skyward_core::math::{Rect, Vec2};

use crate::body::{BodyState, KinematicBody};
use crate::collision::{Axis, gather_obstacles};
use crate::config::PhysicsConfig;
use crate::enemy::Enemy;
use crate::events::{SimEvent, TickOutcome};
use crate::items::{Door, Key};
use crate::level::LevelGrid;
use crate::platform::MovingPlatform;

/// The input-driven body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub body: KinematicBody,
    pub has_key: bool,
    /// +1 facing right, -1 facing left.
    pub facing: f32,
    pub jumps_used: u8,
    /// Jump input as of the previous tick, for press edge detection.
    pub jump_was_held: bool,
    pub state: BodyState,
}

/// Everything in the world the player interacts with during a tick.
pub struct PlayerContext<'a> {
    pub level: &'a mut LevelGrid,
    pub platforms: &'a [MovingPlatform],
    pub enemies: &'a mut [Enemy],
    pub keys: &'a mut [Key],
    pub doors: &'a mut [Door],
}

impl Player {
    pub fn new(body: KinematicBody) -> Self {
        Self {
            body,
            has_key: false,
            facing: 1.0,
            jumps_used: 0,
            jump_was_held: false,
            state: BodyState::Idle,
        }
    }

    pub fn spawn(x: f32, y: f32, physics: &PhysicsConfig) -> Self {
        Self::new(KinematicBody::new(
            Vec2::new(x, y),
            physics.player_width,
            physics.player_height,
        ))
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    /// Advance the player by one fixed tick. Platforms must already have
    /// been moved for this tick.
    pub fn update(
        &mut self,
        dt: f32,
        input: &InputState,
        ctx: &mut PlayerContext<'_>,
        physics: &PhysicsConfig,
        events: &mut Vec<SimEvent>,
    ) -> TickOutcome {
        if !dt.is_finite() || dt <= 0.0 {
            return TickOutcome::Continue;
        }

        self.body.was_grounded = self.body.grounded;
        let rode_last_tick = self.body.riding;

        self.apply_horizontal_input(input, physics);
        self.body.position.x += self.body.velocity.x * dt;
        let obstacles = gather_obstacles(
            &self.body.rect(),
            Axis::Horizontal,
            ctx.level,
            ctx.platforms,
            ctx.doors,
        );
        self.body.resolve(&obstacles, Axis::Horizontal, dt);

        self.body.velocity.y =
            (self.body.velocity.y + physics.gravity * dt).min(physics.terminal_velocity);

        // Follow a platform's vertical motion so the landing test below
        // still sees the rider on its top surface.
        if let Some(platform) = rode_last_tick.and_then(|i| ctx.platforms.get(i)) {
            self.body.position.y += platform.last_displacement.y;
        }

        self.body.position.y += self.body.velocity.y * dt;
        self.body.grounded = false;
        self.body.riding = None;
        let obstacles = gather_obstacles(
            &self.body.rect(),
            Axis::Vertical,
            ctx.level,
            ctx.platforms,
            ctx.doors,
        );
        self.body.resolve(&obstacles, Axis::Vertical, dt);

        if let Some(platform) = self.body.riding.and_then(|i| ctx.platforms.get(i)) {
            self.body.position.x += platform.last_displacement.x;
        }

        if self.body.grounded {
            for tile in ctx.level.tiles_supporting(&self.body.rect()) {
                if ctx.level.on_top_contact(tile) {
                    events.push(SimEvent::TileCrumbling { tile });
                }
            }
        }

        if self.body.grounded && !self.body.was_grounded {
            self.jumps_used = 0;
            tracing::debug!(
                x = self.body.position.x,
                y = self.body.position.y,
                "Player landed"
            );
            events.push(SimEvent::Landed {
                x: self.body.position.x,
                y: self.body.position.y,
            });
        }

        self.try_jump(input, physics, events);
        self.clamp_to_level(ctx.level);

        if self.body.position.y > ctx.level.pixel_height() + physics.kill_plane_margin {
            self.state = self.body.state(physics.run_threshold);
            return TickOutcome::FellOutOfBounds;
        }

        self.interact_with_items(ctx.keys, ctx.doors, events);

        let outcome = self.interact_with_enemies(ctx.enemies, physics, events);
        self.state = self.body.state(physics.run_threshold);
        outcome
    }

    fn apply_horizontal_input(&mut self, input: &InputState, physics: &PhysicsConfig) {
        let velocity = &mut self.body.velocity;
        if input.left() {
            velocity.x = -physics.move_speed;
            self.facing = -1.0;
        } else if input.right() {
            velocity.x = physics.move_speed;
            self.facing = 1.0;
        } else {
            velocity.x *= physics.friction;
            if velocity.x.abs() < physics.velocity_epsilon {
                velocity.x = 0.0;
            }
        }
        velocity.x = velocity.x.clamp(-physics.max_speed_x, physics.max_speed_x);
    }

    fn try_jump(
        &mut self,
        input: &InputState,
        physics: &PhysicsConfig,
        events: &mut Vec<SimEvent>,
    ) {
        let held = input.jump();
        let pressed = held && !self.jump_was_held;
        self.jump_was_held = held;
        if !pressed || !(self.body.grounded || self.jumps_used < physics.max_jumps) {
            return;
        }

        self.body.velocity.y = -physics.jump_force;
        self.body.grounded = false;
        self.body.riding = None;
        self.jumps_used = self.jumps_used.saturating_add(1);
        tracing::debug!(jumps_used = self.jumps_used, "Player jumped");
        events.push(SimEvent::Jumped {
            x: self.body.position.x,
            y: self.body.position.y,
            jumps_used: self.jumps_used,
        });
    }

    fn clamp_to_level(&mut self, level: &LevelGrid) {
        let max_x = (level.pixel_width() - self.body.width).max(0.0);
        let x = self.body.position.x;
        if x < 0.0 || x > max_x {
            self.body.position.x = x.clamp(0.0, max_x);
            self.body.velocity.x = 0.0;
        }
    }

    fn interact_with_items(
        &mut self,
        keys: &mut [Key],
        doors: &mut [Door],
        events: &mut Vec<SimEvent>,
    ) {
        let rect = self.rect();
        for (key, item) in keys.iter_mut().enumerate() {
            if item.try_collect(&rect) {
                self.has_key = true;
                tracing::debug!(key, "Key collected");
                events.push(SimEvent::KeyCollected { key });
            }
        }
        for (door, item) in doors.iter_mut().enumerate() {
            if item.try_unlock(&rect, &mut self.has_key) {
                tracing::debug!(door, "Door unlocked");
                events.push(SimEvent::DoorUnlocked { door });
            }
        }
    }

    fn interact_with_enemies(
        &mut self,
        enemies: &mut [Enemy],
        physics: &PhysicsConfig,
        events: &mut Vec<SimEvent>,
    ) -> TickOutcome {
        // Judged once so two enemies side by side can both be stomped.
        let descending = self.body.velocity.y > 0.0;
        for (index, enemy) in enemies.iter_mut().enumerate() {
            let enemy_rect = enemy.rect();
            if !enemy.active || !self.rect().overlaps(&enemy_rect) {
                continue;
            }
            if descending && self.body.bottom() < enemy_rect.center_y() {
                enemy.defeat();
                self.body.velocity.y = -physics.jump_force * physics.stomp_rebound;
                self.body.grounded = false;
                tracing::debug!(enemy = index, "Enemy stomped");
                events.push(SimEvent::Stomped { enemy: index });
            } else {
                tracing::debug!(enemy = index, "Player struck by enemy");
                return TickOutcome::StruckByEnemy;
            }
        }
        TickOutcome::Continue
    }
}
