//! Mocha - headless frame driver for the Mocha ECS
//!
//! Loads settings, builds a registry with a demo scene and runs the frame
//! loop. Windowing and drawing live outside this binary.

mod settings;
mod systems;

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use mocha_core::GameTime;
use mocha_ecs::Registry;

use settings::{LogSettings, Settings, SettingsSource};
use systems::{DrawList, FrameStats};

fn init_logging(log: &LogSettings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log.level))
        .with_context(|| format!("invalid log filter '{}'", log.level))?;
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")
}

fn main() -> Result<()> {
    let (settings, source) = Settings::load().context("Failed to load settings")?;
    init_logging(&settings.log)?;

    info!("Starting Mocha driver...");
    match &source {
        SettingsSource::File(path) => info!("Settings loaded from {}", path.display()),
        SettingsSource::Defaults(reason) => warn!("{}, using defaults", reason),
    }

    let mut registry = Registry::new();
    registry.insert_resource(GameTime::new(settings.time.clone()));
    registry.insert_resource(DrawList::default());
    registry.insert_resource(FrameStats::default());

    systems::spawn_scene(&mut registry, settings.driver.entities);
    systems::register(&mut registry);
    info!(
        entities = registry.entity_count(),
        systems = registry.system_count(),
        "Scene ready"
    );

    let started = Instant::now();
    for _ in 0..settings.driver.frames {
        registry.tick(settings.driver.frame_delta);
    }
    let elapsed = started.elapsed();

    let stats = registry.resource::<FrameStats>().copied().unwrap_or_default();
    let game_time = registry
        .resource::<GameTime>()
        .map_or(0.0, |time| time.total_time);
    info!(
        frames = settings.driver.frames,
        game_seconds = game_time,
        wall_ms = elapsed.as_secs_f64() * 1000.0,
        expired = stats.expired,
        peak_draws = stats.peak_draws,
        "Frame loop finished"
    );

    Ok(())
}
