use serde::{Deserialize, Serialize};

/// Fire-and-forget notifications for audio, particles, and UI. The
/// simulation never waits on whoever consumes them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    Landed { x: f32, y: f32 },
    Jumped { x: f32, y: f32, jumps_used: u8 },
    Stomped { enemy: usize },
    KeyCollected { key: usize },
    DoorUnlocked { door: usize },
    TileCrumbling { tile: usize },
    TileCrumbled { tile: usize },
    GameOver { outcome: TickOutcome },
    LevelComplete,
}

/// How a simulation tick ended. Exactly one per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickOutcome {
    #[default]
    Continue,
    FellOutOfBounds,
    StruckByEnemy,
    ReachedGoal,
}

impl TickOutcome {
    /// Whether the outcome ends the current level attempt.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TickOutcome::Continue)
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            TickOutcome::FellOutOfBounds | TickOutcome::StruckByEnemy
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_classification() {
        assert!(!TickOutcome::Continue.is_terminal());
        assert!(TickOutcome::ReachedGoal.is_terminal());
        assert!(!TickOutcome::ReachedGoal.is_failure());
        assert!(TickOutcome::FellOutOfBounds.is_failure());
        assert!(TickOutcome::StruckByEnemy.is_failure());
    }

    #[test]
    fn event_msgpack_roundtrip() {
        let events = vec![
            SimEvent::Jumped {
                x: 1.0,
                y: 2.0,
                jumps_used: 1,
            },
            SimEvent::GameOver {
                outcome: TickOutcome::StruckByEnemy,
            },
            SimEvent::LevelComplete,
        ];
        let bytes = rmp_serde::to_vec(&events).unwrap();
        let back: Vec<SimEvent> = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(events, back);
    }
}
