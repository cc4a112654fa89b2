use engine::{resolve_app_paths, LoopConfig, Scene, StartupError};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::config::{load_config, ConfigError};
use super::scene::ExplorerScene;
use super::world_map::{JsonFileSource, WorldMap};

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Paths(#[from] StartupError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Resolves paths and config, then loads the world map. A map that fails to
/// load still yields a runnable app that shows the error.
pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== Road Explorer Startup ===");

    let paths = resolve_app_paths()?;
    info!(root = %paths.root.display(), "app_paths_resolved");
    let explorer = load_config(&paths.assets_dir)?;

    let source = JsonFileSource::new(paths.assets_dir.join(&explorer.points_file));
    let map = WorldMap::load(&source, &explorer);
    // Failures surface once the scene loads and shows them.
    if let Ok(map) = &map {
        info!(point_count = map.len(), "world_map_loaded");
    }

    let config = LoopConfig {
        window_title: explorer.window_title.clone(),
        window_width: explorer.window_width,
        window_height: explorer.window_height,
        target_tps: explorer.target_tps,
        ..LoopConfig::default()
    };

    Ok(AppWiring {
        config,
        scene: Box::new(ExplorerScene::new(explorer, map)),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
