use serde::{Deserialize, Serialize};

use skyward_core::math::{Rect, Vec2};

use crate::level::PlatformSpawn;

/// Distance from a waypoint at which a platform counts as arrived.
pub const ARRIVAL_EPSILON: f32 = 1.0;

/// A platform shuttling between two waypoints at constant speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingPlatform {
    pub start: Vec2,
    pub end: Vec2,
    pub speed: f32,
    pub position: Vec2,
    /// Fixed at construction; only `direction` changes at runtime.
    pub velocity: Vec2,
    /// +1 while heading to `end`, -1 while heading back to `start`.
    pub direction: f32,
    pub width: f32,
    pub height: f32,
    /// Actual movement during the most recent update.
    pub last_displacement: Vec2,
}

impl MovingPlatform {
    pub fn new(start: Vec2, end: Vec2, width: f32, height: f32, speed: f32) -> Self {
        Self {
            start,
            end,
            speed,
            position: start,
            velocity: (end - start).normalize() * speed,
            direction: 1.0,
            width,
            height,
            last_displacement: Vec2::ZERO,
        }
    }

    pub fn from_spawn(spawn: &PlatformSpawn) -> Self {
        Self::new(
            Vec2::new(spawn.x, spawn.y),
            Vec2::new(spawn.end_x, spawn.end_y),
            spawn.width,
            spawn.height,
            spawn.speed,
        )
    }

    pub fn rect(&self) -> Rect {
        Rect::at(self.position, self.width, self.height)
    }

    fn target(&self) -> Vec2 {
        if self.direction > 0.0 { self.end } else { self.start }
    }

    pub fn update(&mut self, dt: f32) {
        let before = self.position;
        if !dt.is_finite() || dt <= 0.0 {
            self.last_displacement = Vec2::ZERO;
            return;
        }

        let heading = self.velocity * self.direction;
        self.position = self.position + heading * dt;

        // Arrived, or stepped past the waypoint this tick.
        let target = self.target();
        let remaining = target - self.position;
        if remaining.length() < ARRIVAL_EPSILON || remaining.dot(heading) < 0.0 {
            self.position = target;
            self.direction = -self.direction;
        }

        self.last_displacement = self.position - before;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn horizontal(speed: f32) -> MovingPlatform {
        MovingPlatform::new(
            Vec2::new(100.0, 200.0),
            Vec2::new(200.0, 200.0),
            64.0,
            16.0,
            speed,
        )
    }

    #[test]
    fn velocity_is_normalized_times_speed() {
        let p = MovingPlatform::new(Vec2::ZERO, Vec2::new(30.0, 40.0), 10.0, 10.0, 50.0);
        assert!((p.velocity.x - 30.0).abs() < 1e-4);
        assert!((p.velocity.y - 40.0).abs() < 1e-4);
    }

    #[test]
    fn moves_toward_end() {
        let mut p = horizontal(60.0);
        p.update(0.5);
        assert_eq!(p.position, Vec2::new(130.0, 200.0));
        assert_eq!(p.last_displacement, Vec2::new(30.0, 0.0));
        assert_eq!(p.direction, 1.0);
    }

    #[test]
    fn flips_exactly_at_endpoints() {
        let mut p = horizontal(100.0);
        p.update(0.995);
        assert_eq!(p.position, p.end, "within 1px snaps to the endpoint");
        assert_eq!(p.direction, -1.0);

        p.update(0.5);
        assert_eq!(p.position, Vec2::new(150.0, 200.0));
        p.update(0.5);
        assert_eq!(p.position, p.start);
        assert_eq!(p.direction, 1.0);
    }

    #[test]
    fn fast_platform_never_passes_endpoint() {
        let mut p = horizontal(900.0);
        for _ in 0..600 {
            p.update(DT);
            assert!(p.position.x >= p.start.x && p.position.x <= p.end.x);
        }
    }

    #[test]
    fn zero_length_track_stays_put() {
        let spot = Vec2::new(50.0, 50.0);
        let mut p = MovingPlatform::new(spot, spot, 32.0, 8.0, 80.0);
        assert_eq!(p.velocity, Vec2::ZERO);
        for _ in 0..10 {
            p.update(DT);
            assert_eq!(p.position, spot);
            assert!(p.position.x.is_finite());
        }
    }

    #[test]
    fn zero_dt_does_not_move() {
        let mut p = horizontal(60.0);
        p.update(0.0);
        assert_eq!(p.position, p.start);
        assert_eq!(p.last_displacement, Vec2::ZERO);
    }

    #[test]
    fn spawn_conversion() {
        let spawn = PlatformSpawn {
            x: 10.0,
            y: 20.0,
            width: 64.0,
            height: 16.0,
            end_x: 10.0,
            end_y: 120.0,
            speed: 40.0,
        };
        let p = MovingPlatform::from_spawn(&spawn);
        assert_eq!(p.rect(), Rect::new(10.0, 20.0, 64.0, 16.0));
        assert_eq!(p.velocity, Vec2::new(0.0, 40.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn overshoot_bounded_by_one_step(
                ex in -300.0f32..300.0,
                ey in -300.0f32..300.0,
                speed in 1.0f32..2000.0,
                ticks in 1usize..400,
            ) {
                let start = Vec2::ZERO;
                let end = Vec2::new(ex, ey);
                let track = end.length();
                let mut p = MovingPlatform::new(start, end, 32.0, 8.0, speed);
                for _ in 0..ticks {
                    p.update(DT);
                    let from_start = p.position.distance(start);
                    let from_end = p.position.distance(end);
                    prop_assert!(from_start <= track + 1e-2);
                    prop_assert!(from_end <= track + 1e-2);
                }
            }
        }
    }
}
