use serde::{Deserialize, Serialize};

use skyward_core::time::DEFAULT_SLOW_MOTION_SCALE;

/// Gravity acceleration (px/s^2, downward).
pub const GRAVITY: f32 = 980.0;
/// Horizontal run speed (px/s).
pub const MOVE_SPEED: f32 = 250.0;
/// Initial upward jump speed (px/s).
pub const JUMP_FORCE: f32 = 500.0;
/// Horizontal speed cap (px/s).
pub const MAX_SPEED_X: f32 = 300.0;
/// Falling speed cap (px/s).
pub const TERMINAL_VELOCITY: f32 = 1000.0;
/// Per-tick horizontal velocity multiplier with no input held.
pub const FRICTION: f32 = 0.85;
/// Horizontal speeds below this snap to zero.
pub const VELOCITY_EPSILON: f32 = 0.1;
/// Horizontal speed above which a grounded body counts as running.
pub const RUN_THRESHOLD: f32 = 1.0;
/// Jumps available before touching the ground again (ground jump included).
pub const MAX_JUMPS: u8 = 2;
/// Fraction of the jump force given back after a stomp.
pub const STOMP_REBOUND: f32 = 0.6;
/// Distance below the level's bottom edge where a body counts as fallen out.
pub const KILL_PLANE_MARGIN: f32 = 200.0;
/// Player collision box width (px).
pub const PLAYER_WIDTH: f32 = 32.0;
/// Player collision box height (px).
pub const PLAYER_HEIGHT: f32 = 64.0;
/// Seconds between first top contact and a crumbling tile disappearing.
pub const CRUMBLE_DELAY_SECS: f32 = 0.5;

/// Configurable body physics, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub move_speed: f32,
    pub jump_force: f32,
    pub max_speed_x: f32,
    pub terminal_velocity: f32,
    pub friction: f32,
    pub velocity_epsilon: f32,
    pub run_threshold: f32,
    pub max_jumps: u8,
    pub stomp_rebound: f32,
    pub kill_plane_margin: f32,
    pub player_width: f32,
    pub player_height: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            move_speed: MOVE_SPEED,
            jump_force: JUMP_FORCE,
            max_speed_x: MAX_SPEED_X,
            terminal_velocity: TERMINAL_VELOCITY,
            friction: FRICTION,
            velocity_epsilon: VELOCITY_EPSILON,
            run_threshold: RUN_THRESHOLD,
            max_jumps: MAX_JUMPS,
            stomp_rebound: STOMP_REBOUND,
            kill_plane_margin: KILL_PLANE_MARGIN,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
        }
    }
}

/// Patrolling enemy defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnemyConfig {
    pub width: f32,
    pub height: f32,
    /// Patrol speed (px/s).
    pub speed: f32,
    /// Half-width of the patrol track around the spawn point (px).
    pub patrol_range: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            width: 32.0,
            height: 32.0,
            speed: 50.0,
            patrol_range: 100.0,
        }
    }
}

/// Sizes of the static level entities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EntitySizes {
    pub key_width: f32,
    pub key_height: f32,
    pub door_width: f32,
    pub door_height: f32,
    pub goal_width: f32,
    pub goal_height: f32,
}

impl Default for EntitySizes {
    fn default() -> Self {
        Self {
            key_width: 16.0,
            key_height: 32.0,
            door_width: 32.0,
            door_height: 64.0,
            goal_width: 32.0,
            goal_height: 64.0,
        }
    }
}

/// Top-level platformer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlatformerConfig {
    pub physics: PhysicsConfig,
    pub enemy: EnemyConfig,
    pub entities: EntitySizes,
    pub crumble_delay_secs: f32,
    pub tick_rate_hz: f32,
    /// Time scale used while slow motion is toggled on.
    pub slow_motion_scale: f32,
    /// Points awarded per stomped enemy.
    pub stomp_score: u32,
}

impl Default for PlatformerConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            enemy: EnemyConfig::default(),
            entities: EntitySizes::default(),
            crumble_delay_secs: CRUMBLE_DELAY_SECS,
            tick_rate_hz: skyward_core::time::DEFAULT_TICK_RATE_HZ,
            slow_motion_scale: DEFAULT_SLOW_MOTION_SCALE,
            stomp_score: 100,
        }
    }
}

impl PlatformerConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is missing
    /// or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("SKYWARD_PLATFORMER_CONFIG")
            .unwrap_or_else(|_| "config/platformer.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded platformer config from {path}");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    PlatformerConfig::default()
                },
            },
            Err(_) => PlatformerConfig::default(),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<PlatformerConfig>(content)
    }
}
