use skyward_platformer::{PlatformerConfig, SessionState};
use skyward_runner::config::RunnerConfig;
use skyward_runner::error::RunnerError;

fn repo_path(relative: &str) -> String {
    format!("{}/../../{relative}", env!("CARGO_MANIFEST_DIR"))
}

fn config(levels: &[&str], script: Option<&str>, max_frames: u64) -> RunnerConfig {
    RunnerConfig {
        levels: levels.iter().map(|l| repo_path(l)).collect(),
        script: script.map(repo_path),
        max_frames,
        ..RunnerConfig::default()
    }
}

#[test]
fn demo_script_clears_both_levels() {
    let cfg = config(
        &["levels/level1.json", "levels/level2.json"],
        Some("scripts/demo.json"),
        3600,
    );
    let summary = skyward_runner::run(&cfg, PlatformerConfig::default()).unwrap();
    assert_eq!(summary.state, SessionState::Won);
    assert_eq!(summary.level_index, 1);
    assert_eq!(summary.score, 0);
    assert!(summary.frames < 420, "won within the scripted input");
    assert!(summary.ticks <= summary.frames && summary.ticks + 4 >= summary.frames);
}

#[test]
fn idle_run_stops_at_frame_limit() {
    let cfg = config(&["levels/level1.json"], None, 30);
    let summary = skyward_runner::run(&cfg, PlatformerConfig::default()).unwrap();
    assert_eq!(summary.state, SessionState::Playing);
    assert_eq!(summary.frames, 30);
    assert!((29..=30).contains(&summary.ticks));
    assert_eq!(summary.level_index, 0);
}

#[test]
fn missing_level_file_is_io_error() {
    let cfg = config(&["levels/nope.json"], None, 10);
    assert!(matches!(
        skyward_runner::run(&cfg, PlatformerConfig::default()),
        Err(RunnerError::Io { .. })
    ));
}

#[test]
fn non_level_json_is_level_error() {
    let cfg = config(&["scripts/demo.json"], None, 10);
    let err = skyward_runner::run(&cfg, PlatformerConfig::default()).unwrap_err();
    assert!(matches!(err, RunnerError::Level { .. }));
    assert!(err.to_string().contains("demo.json"));
}

#[test]
fn invalid_config_is_rejected_before_loading() {
    let cfg = RunnerConfig {
        levels: Vec::new(),
        ..RunnerConfig::default()
    };
    assert!(matches!(
        skyward_runner::run(&cfg, PlatformerConfig::default()),
        Err(RunnerError::Config(_))
    ));
}
