use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::PathBuf;

use engine::Vec2;
use serde::Deserialize;
use thiserror::Error;

use super::config::{ExplorerConfig, RoadAnchor};

#[derive(Debug, Error)]
pub(crate) enum WorldMapError {
    #[error("failed to read points '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed points payload at {field}: {source}")]
    Parse {
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate point id '{0}'")]
    DuplicateId(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PointOfInterest {
    pub(crate) id: String,
    pub(crate) title: String,
    /// Offset from the world center.
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) description: String,
    pub(crate) image_ref: String,
    pub(crate) link_ref: String,
}

/// Read-once provider of the points of interest.
pub(crate) trait PointSource {
    fn list(&self) -> Result<Vec<PointOfInterest>, WorldMapError>;
}

pub(crate) struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl PointSource for JsonFileSource {
    fn list(&self) -> Result<Vec<PointOfInterest>, WorldMapError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| WorldMapError::Read {
            path: self.path.clone(),
            source,
        })?;
        parse_points_json(&raw)
    }
}

pub(crate) fn parse_points_json(raw: &str) -> Result<Vec<PointOfInterest>, WorldMapError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, Vec<PointOfInterest>>(&mut deserializer).map_err(
        |error| {
            let field = error.path().to_string();
            WorldMapError::Parse {
                field,
                source: error.into_inner(),
            }
        },
    )
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MapPoint {
    pub(crate) poi: PointOfInterest,
    pub(crate) world_position: Vec2,
    /// Where proximity is measured from and where travel parks the avatar.
    pub(crate) interaction_point: Vec2,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct WorldMap {
    points: Vec<MapPoint>,
}

impl WorldMap {
    pub(crate) fn load(
        source: &dyn PointSource,
        config: &ExplorerConfig,
    ) -> Result<Self, WorldMapError> {
        Self::from_points(source.list()?, config)
    }

    pub(crate) fn from_points(
        points: Vec<PointOfInterest>,
        config: &ExplorerConfig,
    ) -> Result<Self, WorldMapError> {
        let mut seen = HashSet::with_capacity(points.len());
        for point in &points {
            if !seen.insert(point.id.as_str()) {
                return Err(WorldMapError::DuplicateId(point.id.clone()));
            }
        }

        let center = config.world_center.to_vec2();
        let points = points
            .into_iter()
            .map(|poi| {
                let world_position = center + Vec2::new(poi.x as f32, poi.y as f32);
                let interaction_point = match config.anchor_for(&poi.id) {
                    Some(anchor) => {
                        project_onto_road(world_position, anchor, config.roads.anchor_line(anchor))
                    }
                    None => world_position,
                };
                MapPoint {
                    poi,
                    world_position,
                    interaction_point,
                }
            })
            .collect();
        Ok(Self { points })
    }

    pub(crate) fn points(&self) -> &[MapPoint] {
        &self.points
    }

    pub(crate) fn get(&self, index: usize) -> Option<&MapPoint> {
        self.points.get(index)
    }

    pub(crate) fn len(&self) -> usize {
        self.points.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn project_onto_road(position: Vec2, anchor: RoadAnchor, line: f32) -> Vec2 {
    match anchor {
        RoadAnchor::Top | RoadAnchor::Bottom => Vec2::new(position.x, line),
        RoadAnchor::Vertical => Vec2::new(line, position.y),
    }
}
