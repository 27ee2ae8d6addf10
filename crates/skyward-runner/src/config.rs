use serde::Deserialize;

use crate::error::RunnerError;

/// Runner configuration, loaded from `skyward.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Level files, played in order.
    pub levels: Vec<String>,
    /// Optional input script. Without one the player stands still.
    pub script: Option<String>,
    /// Simulated wall-clock duration of one rendered frame.
    pub frame_ms: f32,
    /// Hard stop for the run.
    pub max_frames: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            levels: vec![
                "levels/level1.json".to_string(),
                "levels/level2.json".to_string(),
            ],
            script: None,
            frame_ms: 1000.0 / 60.0,
            max_frames: 3600,
        }
    }
}

impl RunnerConfig {
    /// Load config from `skyward.toml` if it exists, then apply env var overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string("skyward.toml") {
            Ok(content) => match toml::from_str::<RunnerConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from skyward.toml");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse skyward.toml: {e}, using defaults");
                    RunnerConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No skyward.toml found, using defaults");
                RunnerConfig::default()
            },
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply `SKYWARD_*` overrides looked up through `var`.
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(levels) = var("SKYWARD_LEVELS")
            && !levels.is_empty()
        {
            self.levels = levels
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(script) = var("SKYWARD_SCRIPT")
            && !script.is_empty()
        {
            self.script = Some(script);
        }
        if let Some(val) = var("SKYWARD_MAX_FRAMES") {
            match val.parse::<u64>() {
                Ok(n) => self.max_frames = n,
                Err(_) => tracing::warn!(value = %val, "Ignoring unparseable SKYWARD_MAX_FRAMES"),
            }
        }
    }

    pub fn validate(&self) -> Result<(), RunnerError> {
        if self.levels.is_empty() {
            return Err(RunnerError::Config("levels must not be empty".to_string()));
        }
        if !self.frame_ms.is_finite() || self.frame_ms <= 0.0 {
            return Err(RunnerError::Config(format!(
                "frame_ms must be > 0, got {}",
                self.frame_ms
            )));
        }
        if self.max_frames == 0 {
            return Err(RunnerError::Config("max_frames must be > 0".to_string()));
        }
        Ok(())
    }

    /// Frame duration in seconds.
    pub fn frame_secs(&self) -> f32 {
        self.frame_ms / 1000.0
    }
}
