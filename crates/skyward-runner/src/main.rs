use tracing_subscriber::EnvFilter;

use skyward_platformer::PlatformerConfig;
use skyward_runner::config::RunnerConfig;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Skyward runner starting");

    let config = RunnerConfig::load();
    let platformer = PlatformerConfig::load();

    match skyward_runner::run(&config, platformer) {
        Ok(summary) => {
            println!(
                "{:?} after {} frames ({} ticks): level {}/{}, score {}",
                summary.state,
                summary.frames,
                summary.ticks,
                summary.level_index + 1,
                config.levels.len(),
                summary.score
            );
        },
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        },
    }
}
