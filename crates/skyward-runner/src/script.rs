use serde::{Deserialize, Serialize};

use skyward_core::input::InputState;

use crate::error::RunnerError;

/// Hold a set of keys for a number of frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub frames: u32,
    #[serde(default)]
    pub held: Vec<String>,
}

/// A recorded input sequence, one step after another.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputScript {
    pub steps: Vec<ScriptStep>,
}

impl InputScript {
    pub fn from_json(json: &str) -> Result<Self, RunnerError> {
        serde_json::from_str(json).map_err(|e| RunnerError::Script(e.to_string()))
    }

    pub fn load(path: &str) -> Result<Self, RunnerError> {
        let json = std::fs::read_to_string(path).map_err(|source| RunnerError::Io {
            path: path.to_string(),
            source,
        })?;
        let script = Self::from_json(&json)?;
        tracing::info!(
            path,
            steps = script.steps.len(),
            frames = script.total_frames(),
            "Loaded input script"
        );
        Ok(script)
    }

    pub fn total_frames(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.frames)).sum()
    }

    /// Per-frame input, followed by nothing held forever.
    pub fn frames(&self) -> impl Iterator<Item = InputState> + '_ {
        self.steps
            .iter()
            .flat_map(|step| {
                let input = InputState::holding(step.held.iter().map(String::as_str));
                std::iter::repeat_n(input, step.frames as usize)
            })
            .chain(std::iter::repeat_with(InputState::new))
    }
}
