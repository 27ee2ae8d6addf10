pub mod config;
pub mod error;
pub mod script;

use skyward_platformer::{LevelData, PlatformerConfig, Session, SessionState, SimEvent};

use config::RunnerConfig;
use error::RunnerError;
use script::InputScript;

/// How a headless run ended.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub ticks: u64,
    pub state: SessionState,
    pub level_index: usize,
    pub score: u32,
    pub high_score: u32,
    pub events: usize,
}

/// Read and validate every configured level file.
pub fn load_levels(paths: &[String]) -> Result<Vec<LevelData>, RunnerError> {
    paths
        .iter()
        .map(|path| {
            let json = std::fs::read_to_string(path).map_err(|source| RunnerError::Io {
                path: path.clone(),
                source,
            })?;
            LevelData::from_json(&json).map_err(|source| RunnerError::Level {
                path: path.clone(),
                source,
            })
        })
        .collect()
}

/// Replay the configured script through a session until the run ends or
/// `max_frames` frames have been simulated.
pub fn run(config: &RunnerConfig, platformer: PlatformerConfig) -> Result<RunSummary, RunnerError> {
    config.validate()?;
    let levels = load_levels(&config.levels)?;
    let script = match &config.script {
        Some(path) => InputScript::load(path)?,
        None => InputScript::default(),
    };

    let mut session = Session::new(levels, platformer).map_err(|source| RunnerError::Level {
        path: config.levels.join(","),
        source,
    })?;

    let frame_dt = config.frame_secs();
    let mut frames = 0u64;
    let mut events = 0usize;

    for input in script.frames().take(config.max_frames as usize) {
        let frame_events = session.advance(frame_dt, &input);
        frames += 1;
        events += frame_events.len();
        for event in &frame_events {
            log_event(frames, event);
        }
        if session.state() != SessionState::Playing {
            break;
        }
    }

    let summary = RunSummary {
        frames,
        ticks: session.total_ticks(),
        state: session.state(),
        level_index: session.level_index(),
        score: session.score(),
        high_score: session.high_score(),
        events,
    };
    tracing::info!(
        frames,
        ticks = summary.ticks,
        state = ?summary.state,
        level = summary.level_index,
        score = summary.score,
        "Run finished"
    );
    Ok(summary)
}

fn log_event(frame: u64, event: &SimEvent) {
    match event {
        SimEvent::Landed { .. } | SimEvent::Jumped { .. } => {
            tracing::trace!(frame, ?event, "Movement");
        },
        SimEvent::TileCrumbling { .. } | SimEvent::TileCrumbled { .. } => {
            tracing::debug!(frame, ?event, "Tile");
        },
        SimEvent::Stomped { .. }
        | SimEvent::KeyCollected { .. }
        | SimEvent::DoorUnlocked { .. } => {
            tracing::info!(frame, ?event, "Interaction");
        },
        SimEvent::GameOver { outcome } => {
            tracing::info!(frame, ?outcome, "Game over");
        },
        SimEvent::LevelComplete => {
            tracing::info!(frame, "Level complete");
        },
    }
}
