//! A run through a sequence of levels: progression, score, and the
//! fixed-step clock that turns frame time into simulation ticks.

use serde::{Deserialize, Serialize};

use skyward_core::input::InputState;
use skyward_core::time::{FixedTimestep, TimeScale};

use crate::config::PlatformerConfig;
use crate::error::LevelError;
use crate::events::{SimEvent, TickOutcome};
use crate::level::LevelData;
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Playing,
    GameOver,
    Won,
}

#[derive(Debug)]
pub struct Session {
    /// Pristine world per level, cloned on (re)load.
    levels: Vec<World>,
    current: usize,
    world: World,
    state: SessionState,
    score: u32,
    high_score: u32,
    stomp_score: u32,
    timestep: FixedTimestep,
    time_scale: TimeScale,
    paused: bool,
    /// Ticks simulated across every level and restart.
    total_ticks: u64,
}

impl Session {
    /// Validate every level up front and start on the first one.
    pub fn new(levels: Vec<LevelData>, config: PlatformerConfig) -> Result<Self, LevelError> {
        let levels = levels
            .iter()
            .map(|data| World::from_level(data, &config))
            .collect::<Result<Vec<_>, _>>()?;
        let Some(first) = levels.first().cloned() else {
            return Err(LevelError::NoLevels);
        };

        tracing::info!(levels = levels.len(), "Session started");

        Ok(Self {
            levels,
            current: 0,
            world: first,
            state: SessionState::Playing,
            score: 0,
            high_score: 0,
            stomp_score: config.stomp_score,
            timestep: FixedTimestep::new(config.tick_rate_hz),
            time_scale: TimeScale::new(config.slow_motion_scale),
            paused: false,
            total_ticks: 0,
        })
    }

    /// Seed the best score from external storage.
    pub fn with_high_score(mut self, high_score: u32) -> Self {
        self.high_score = high_score;
        self
    }

    /// Feed one rendered frame's wall-clock time and run however many fixed
    /// ticks it covers. Returns the events of every tick run.
    pub fn advance(&mut self, frame_dt: f32, input: &InputState) -> Vec<SimEvent> {
        let mut events = Vec::new();
        if self.paused || self.state != SessionState::Playing {
            return events;
        }

        let steps = self.timestep.accumulate(self.time_scale.apply(frame_dt));
        let dt = self.timestep.step();
        for _ in 0..steps {
            let report = self.world.step(dt, input);
            self.total_ticks += 1;
            let stomps = report
                .events
                .iter()
                .filter(|e| matches!(e, SimEvent::Stomped { .. }))
                .count() as u32;
            self.score = self
                .score
                .saturating_add(stomps.saturating_mul(self.stomp_score));
            events.extend(report.events);

            match report.outcome {
                TickOutcome::ReachedGoal => {
                    self.next_level();
                    break;
                },
                outcome if outcome.is_failure() => {
                    self.end_run(SessionState::GameOver);
                    break;
                },
                _ => {},
            }
        }
        events
    }

    fn next_level(&mut self) {
        self.timestep.reset();
        if self.current + 1 < self.levels.len() {
            self.current += 1;
            self.world = self.levels[self.current].clone();
            tracing::info!(level = self.current, score = self.score, "Next level");
        } else {
            self.end_run(SessionState::Won);
        }
    }

    fn end_run(&mut self, state: SessionState) {
        self.state = state;
        self.timestep.reset();
        if self.score > self.high_score {
            self.high_score = self.score;
            tracing::info!(high_score = self.high_score, "New high score");
        }
        tracing::info!(?state, score = self.score, level = self.current, "Run ended");
    }

    /// Back to the first level with a fresh score. The high score survives.
    pub fn restart(&mut self) {
        self.current = 0;
        self.world = self.levels[0].clone();
        self.state = SessionState::Playing;
        self.score = 0;
        self.paused = false;
        self.timestep.reset();
        tracing::info!("Session restarted");
    }

    /// Toggle slow motion. Returns whether it is now on.
    pub fn toggle_slow_motion(&mut self) -> bool {
        self.time_scale.toggle();
        self.time_scale.is_slowed()
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn level_index(&self) -> usize {
        self.current
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale.scale()
    }
}
