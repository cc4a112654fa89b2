use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine::Vec2;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

pub(crate) const CONFIG_FILE_NAME: &str = "explorer.json";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config '{path}' at {field}: {source}")]
    Parse {
        path: PathBuf,
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigVec2 {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

impl ConfigVec2 {
    const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub(crate) fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Road a point of interest is parked on; its interaction point is projected
/// onto that road's centerline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum RoadAnchor {
    Top,
    Bottom,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RoadConfig {
    pub(crate) width: f32,
    pub(crate) tolerance: f32,
    pub(crate) vertical_x: f32,
    pub(crate) top_y: f32,
    pub(crate) bottom_y: f32,
    /// Shared `[min, max]` extent of all three roads along their own axis.
    pub(crate) extent: [f32; 2],
}

impl Default for RoadConfig {
    fn default() -> Self {
        Self {
            width: 80.0,
            tolerance: 15.0,
            vertical_x: 2500.0,
            top_y: 2200.0,
            bottom_y: 2800.0,
            extent: [1700.0, 3300.0],
        }
    }
}

impl RoadConfig {
    pub(crate) fn anchor_line(&self, anchor: RoadAnchor) -> f32 {
        match anchor {
            RoadAnchor::Top => self.top_y,
            RoadAnchor::Bottom => self.bottom_y,
            RoadAnchor::Vertical => self.vertical_x,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct TravelConfig {
    pub(crate) tolerance: f32,
    pub(crate) align_vertical_seconds: f32,
    pub(crate) vertical_seconds: f32,
    pub(crate) align_horizontal_seconds: f32,
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self {
            tolerance: 5.0,
            align_vertical_seconds: 0.8,
            vertical_seconds: 1.2,
            align_horizontal_seconds: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ExplorerConfig {
    pub(crate) window_title: String,
    pub(crate) window_width: u32,
    pub(crate) window_height: u32,
    pub(crate) target_tps: u32,
    pub(crate) points_file: String,
    pub(crate) world_center: ConfigVec2,
    pub(crate) avatar_spawn: ConfigVec2,
    pub(crate) avatar_speed: f32,
    pub(crate) body_center_offset: ConfigVec2,
    pub(crate) camera_smoothing: f32,
    pub(crate) world_scale: f32,
    pub(crate) trail_max_len: usize,
    pub(crate) trail_fade_per_tick: f32,
    pub(crate) interaction_radius: f32,
    pub(crate) roads: RoadConfig,
    pub(crate) travel: TravelConfig,
    pub(crate) road_assignments: BTreeMap<String, RoadAnchor>,
    pub(crate) ambient_particle_count: usize,
    pub(crate) ambient_seed: u64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        let road_assignments = [
            ("p1", RoadAnchor::Top),
            ("p2", RoadAnchor::Top),
            ("p3", RoadAnchor::Bottom),
            ("p4", RoadAnchor::Bottom),
            ("p5", RoadAnchor::Vertical),
        ]
        .into_iter()
        .map(|(id, anchor)| (id.to_string(), anchor))
        .collect();

        Self {
            window_title: "Road Explorer".to_string(),
            window_width: 1280,
            window_height: 720,
            target_tps: 60,
            points_file: "points.json".to_string(),
            world_center: ConfigVec2::new(2500.0, 2500.0),
            avatar_spawn: ConfigVec2::new(2500.0, 2500.0),
            avatar_speed: 4.0,
            body_center_offset: ConfigVec2::new(35.0, 35.0),
            camera_smoothing: 0.1,
            world_scale: 1.5,
            trail_max_len: 200,
            trail_fade_per_tick: 0.008,
            interaction_radius: 80.0,
            roads: RoadConfig::default(),
            travel: TravelConfig::default(),
            road_assignments,
            ambient_particle_count: 100,
            ambient_seed: 0x5eed_2500,
        }
    }
}

impl ExplorerConfig {
    pub(crate) fn anchor_for(&self, point_id: &str) -> Option<RoadAnchor> {
        self.road_assignments.get(point_id).copied()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        positive("avatar_speed", self.avatar_speed)?;
        positive("world_scale", self.world_scale)?;
        positive("trail_fade_per_tick", self.trail_fade_per_tick)?;
        positive("interaction_radius", self.interaction_radius)?;
        positive("roads.width", self.roads.width)?;
        if !(self.camera_smoothing > 0.0 && self.camera_smoothing <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "camera_smoothing",
                reason: format!("expected a value in (0, 1], got {}", self.camera_smoothing),
            });
        }
        if self.roads.extent[0] >= self.roads.extent[1] {
            return Err(ConfigError::Invalid {
                field: "roads.extent",
                reason: format!(
                    "expected min < max, got [{}, {}]",
                    self.roads.extent[0], self.roads.extent[1]
                ),
            });
        }
        if self.trail_max_len == 0 {
            return Err(ConfigError::Invalid {
                field: "trail_max_len",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(self)
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a positive number, got {value}"),
        })
    }
}

/// Reads `explorer.json` from `assets_dir`, falling back to defaults when the
/// file does not exist.
pub(crate) fn load_config(assets_dir: &Path) -> Result<ExplorerConfig, ConfigError> {
    let path = assets_dir.join(CONFIG_FILE_NAME);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "config_defaults");
            return Ok(ExplorerConfig::default());
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };
    let config = parse_config_json(&raw, &path)?;
    info!(path = %path.display(), "config_loaded");
    Ok(config)
}

fn parse_config_json(raw: &str, path: &Path) -> Result<ExplorerConfig, ConfigError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let config = serde_path_to_error::deserialize::<_, ExplorerConfig>(&mut deserializer)
        .map_err(|error| {
            let field = error.path().to_string();
            ConfigError::Parse {
                path: path.to_path_buf(),
                field,
                source: error.into_inner(),
            }
        })?;
    config.validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_config(dir.path()).expect("defaults");
        assert_eq!(config, ExplorerConfig::default());
        assert_eq!(config.anchor_for("p5"), Some(RoadAnchor::Vertical));
        assert_eq!(config.anchor_for("p9"), None);
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "avatar_speed": 6.0, "roads": { "tolerance": 5.0 } }"#,
        )
        .expect("write config");

        let config = load_config(dir.path()).expect("config");
        assert_eq!(config.avatar_speed, 6.0);
        assert_eq!(config.roads.tolerance, 5.0);
        assert_eq!(config.roads.width, 80.0);
        assert_eq!(config.trail_max_len, 200);
    }

    #[test]
    fn unknown_field_error_names_its_path() {
        let raw = r#"{ "roads": { "widht": 10.0 } }"#;
        let error = parse_config_json(raw, Path::new("explorer.json")).expect_err("typo");
        match error {
            ConfigError::Parse { field, .. } => assert!(field.starts_with("roads")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn road_assignments_parse_from_snake_case() {
        let raw = r#"{ "road_assignments": { "home": "bottom" } }"#;
        let config = parse_config_json(raw, Path::new("explorer.json")).expect("config");
        assert_eq!(config.anchor_for("home"), Some(RoadAnchor::Bottom));
        assert_eq!(config.anchor_for("p1"), None);
    }

    #[test]
    fn out_of_range_smoothing_is_rejected() {
        let raw = r#"{ "camera_smoothing": 1.5 }"#;
        let error = parse_config_json(raw, Path::new("explorer.json")).expect_err("invalid");
        assert!(matches!(
            error,
            ConfigError::Invalid {
                field: "camera_smoothing",
                ..
            }
        ));
    }

    #[test]
    fn zero_speed_is_rejected() {
        let raw = r#"{ "avatar_speed": 0.0 }"#;
        assert!(parse_config_json(raw, Path::new("explorer.json")).is_err());
    }
}
