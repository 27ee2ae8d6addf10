pub mod input;
pub mod math;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::input::InputState;

    /// One tick at 60 Hz, in seconds.
    pub const TICK_60HZ: f32 = 1.0 / 60.0;

    /// Input state with the given keys held.
    pub fn held(keys: &[&str]) -> InputState {
        InputState::holding(keys.iter().copied())
    }

    /// Input state with nothing held.
    pub fn idle() -> InputState {
        InputState::new()
    }

    /// Assert two floats are within `eps` of each other.
    #[track_caller]
    pub fn assert_close(actual: f32, expected: f32, eps: f32) {
        assert!(
            (actual - expected).abs() <= eps,
            "expected {expected} ± {eps}, got {actual}"
        );
    }
}
