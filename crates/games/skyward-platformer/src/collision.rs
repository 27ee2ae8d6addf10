//! Axis-separated AABB collision resolution.
//!
//! Bodies move one axis at a time: integrate X, resolve X, then integrate Y,
//! resolve Y. Each call here looks at a single obstacle and returns the
//! corrected position/velocity along one axis, or `None` when the obstacle
//! needs no correction.

use serde::{Deserialize, Serialize};

use skyward_core::math::Rect;

use crate::items::Door;
use crate::level::LevelGrid;
use crate::platform::MovingPlatform;

/// Tolerance when deciding whether a falling body came from above an
/// obstacle's top edge.
pub const LANDING_EPSILON: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Corrected motion along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// New top-left coordinate of the body along the resolved axis.
    pub position: f32,
    /// New velocity component along the resolved axis.
    pub velocity: f32,
    /// Body came down onto the obstacle's top surface (vertical only).
    pub landed_on_top: bool,
}

/// Something a body can collide with, tagged with its index in the owning
/// list so the caller can react (crumble a tile, ride a platform).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Obstacle {
    Tile {
        index: usize,
        rect: Rect,
    },
    Platform {
        index: usize,
        rect: Rect,
        /// Vertical distance the platform already moved this tick.
        moved_y: f32,
    },
    Door {
        index: usize,
        rect: Rect,
    },
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        match self {
            Obstacle::Tile { rect, .. }
            | Obstacle::Platform { rect, .. }
            | Obstacle::Door { rect, .. } => *rect,
        }
    }

    /// Line a falling body must have started above to land on this
    /// obstacle. For a platform that is its top edge before or after this
    /// tick's move, whichever is lower on screen.
    pub fn landing_line(&self) -> f32 {
        match self {
            Obstacle::Platform { rect, moved_y, .. } => rect.top().max(rect.top() - moved_y),
            other => other.rect().top(),
        }
    }
}

/// Standard AABB overlap test on half-open intervals.
pub fn test_overlap(a: &Rect, b: &Rect) -> bool {
    a.overlaps(b)
}

/// Resolve `body` against `obstacle` along `axis`.
///
/// `velocity` is the body's velocity component on that axis and `dt` the
/// tick length used to integrate it; together they reconstruct where the
/// body's bottom edge was before this tick, which is what separates landing
/// on a top surface from sliding down past a side.
pub fn resolve_axis(
    body: &Rect,
    obstacle: &Rect,
    axis: Axis,
    velocity: f32,
    dt: f32,
) -> Option<Resolution> {
    resolve_axis_from(body, obstacle, obstacle.top(), axis, velocity, dt)
}

/// Resolve `body` against an obstacle that may have moved this tick.
///
/// A platform rising into a falling body has already closed the gap by the
/// time the body integrates, so landing is judged against
/// [`Obstacle::landing_line`]. The snap still goes to where the top is now.
pub fn resolve_obstacle(
    body: &Rect,
    obstacle: &Obstacle,
    axis: Axis,
    velocity: f32,
    dt: f32,
) -> Option<Resolution> {
    resolve_axis_from(
        body,
        &obstacle.rect(),
        obstacle.landing_line(),
        axis,
        velocity,
        dt,
    )
}

fn resolve_axis_from(
    body: &Rect,
    obstacle: &Rect,
    landing_line: f32,
    axis: Axis,
    velocity: f32,
    dt: f32,
) -> Option<Resolution> {
    if !test_overlap(body, obstacle) {
        return None;
    }

    match axis {
        Axis::Vertical if velocity >= 0.0 => {
            let prev_bottom = body.bottom() - velocity * dt;
            if prev_bottom <= landing_line + LANDING_EPSILON {
                Some(Resolution {
                    position: obstacle.top() - body.height,
                    velocity: 0.0,
                    landed_on_top: true,
                })
            } else {
                None
            }
        },
        Axis::Vertical => Some(Resolution {
            position: obstacle.bottom(),
            velocity: 0.0,
            landed_on_top: false,
        }),
        Axis::Horizontal => {
            let position = if velocity > 0.0 {
                obstacle.left() - body.width
            } else if velocity < 0.0 {
                obstacle.right()
            } else {
                // No leading edge: leave through the shallower side.
                let push_left = body.right() - obstacle.left();
                let push_right = obstacle.right() - body.left();
                if push_left <= push_right {
                    obstacle.left() - body.width
                } else {
                    obstacle.right()
                }
            };
            Some(Resolution {
                position,
                velocity: 0.0,
                landed_on_top: false,
            })
        },
    }
}

/// Obstacles a body of extent `area` may touch along `axis`, in resolution
/// order: tiles row-major, then platforms, then locked doors.
///
/// Platforms only take part in vertical resolution so a body is never
/// pushed sideways by a platform it could be standing on.
pub fn gather_obstacles(
    area: &Rect,
    axis: Axis,
    level: &LevelGrid,
    platforms: &[MovingPlatform],
    doors: &[Door],
) -> Vec<Obstacle> {
    let mut obstacles: Vec<Obstacle> = level
        .solid_tiles_near(area)
        .map(|(index, tile)| Obstacle::Tile {
            index,
            rect: tile.rect,
        })
        .collect();

    if axis == Axis::Vertical {
        obstacles.extend(
            platforms
                .iter()
                .enumerate()
                .map(|(index, p)| Obstacle::Platform {
                    index,
                    rect: p.rect(),
                    moved_y: p.last_displacement.y,
                }),
        );
    }

    obstacles.extend(
        doors
            .iter()
            .enumerate()
            .filter(|(_, d)| d.locked)
            .map(|(index, d)| Obstacle::Door {
                index,
                rect: d.rect,
            }),
    );

    obstacles
}
