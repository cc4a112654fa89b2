use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;

pub use app::{
    glyph_advance, line_advance, run_app, screen_to_world, text_width, world_to_screen, AppError,
    Canvas, ColorStop, DrawCommand, Glow, InputAction, InputSnapshot, LoopConfig,
    LoopMetricsSnapshot, Paint, Renderer, Scene, Space, StrokeStyle, Vec2, Viewport, GLYPH_HEIGHT,
    GLYPH_WIDTH, SLOW_FRAME_ENV_VAR,
};

pub const ROOT_ENV_VAR: &str = "EXPLORER_ROOT";
const ASSETS_DIR_NAME: &str = "assets";

/// Directories the app reads from, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub root: PathBuf,
    pub assets_dir: PathBuf,
}

impl AppPaths {
    pub fn for_root(root: PathBuf) -> Self {
        let assets_dir = root.join(ASSETS_DIR_NAME);
        Self { root, assets_dir }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("{var} points at '{}', which has no assets/ directory", .path.display())]
    InvalidEnvRoot { var: &'static str, path: PathBuf },
    #[error(
        "no directory with an assets/ folder found above {}; set {var} to the project root",
        display_paths(.searched)
    )]
    RootNotFound {
        var: &'static str,
        searched: Vec<PathBuf>,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| format!("'{}'", path.display()))
        .collect::<Vec<_>>()
        .join(" or ")
}

/// Finds the project root: `EXPLORER_ROOT` when set, otherwise the nearest
/// ancestor of the working directory, then of the executable, that holds an
/// `assets/` directory.
pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let root = normalize_path(Path::new(&value));
            if has_assets_dir(&root) {
                Ok(AppPaths::for_root(root))
            } else {
                Err(StartupError::InvalidEnvRoot {
                    var: ROOT_ENV_VAR,
                    path: root,
                })
            }
        }
        Err(env::VarError::NotPresent) => {
            let starts = search_starts();
            let found = starts.iter().find_map(|start| find_root_from(start));
            match found {
                Some(root) => Ok(AppPaths::for_root(root)),
                None => Err(StartupError::RootNotFound {
                    var: ROOT_ENV_VAR,
                    searched: starts,
                }),
            }
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn search_starts() -> Vec<PathBuf> {
    let working_dir = env::current_dir().ok();
    let exe_dir = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    working_dir.into_iter().chain(exe_dir).collect()
}

fn find_root_from(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .find(|candidate| has_assets_dir(candidate))
        .map(normalize_path)
}

fn has_assets_dir(path: &Path) -> bool {
    path.join(ASSETS_DIR_NAME).is_dir()
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_nearest_ancestor_with_assets() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("assets")).expect("assets dir");
        let nested = dir.path().join("target").join("debug");
        fs::create_dir_all(&nested).expect("nested dir");

        let found = find_root_from(&nested).expect("root");
        assert_eq!(found, normalize_path(dir.path()));
    }

    #[test]
    fn cargo_toml_alone_is_not_a_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).expect("nested dir");
        fs::write(dir.path().join("Cargo.toml"), "[workspace]\n").expect("cargo toml");

        assert!(!has_assets_dir(&nested));
        assert!(!has_assets_dir(dir.path()));
    }

    #[test]
    fn assets_dir_hangs_off_root() {
        let paths = AppPaths::for_root(PathBuf::from("/tmp/explorer"));
        assert_eq!(paths.assets_dir, PathBuf::from("/tmp/explorer/assets"));
    }

    #[test]
    fn not_found_error_lists_every_start() {
        let error = StartupError::RootNotFound {
            var: ROOT_ENV_VAR,
            searched: vec![PathBuf::from("/work"), PathBuf::from("/opt/bin")],
        };
        let message = error.to_string();
        assert!(message.contains("'/work' or '/opt/bin'"));
        assert!(message.contains(ROOT_ENV_VAR));
    }
}
