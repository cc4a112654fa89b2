use engine::Vec2;

use crate::app::config::RoadConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RoadAxis {
    Vertical,
    Horizontal,
}

/// A straight road: its centerline sits at `line` on the cross axis and runs
/// from `start` to `end` along `axis`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RoadSegment {
    pub(crate) axis: RoadAxis,
    pub(crate) line: f32,
    pub(crate) start: f32,
    pub(crate) end: f32,
}

impl RoadSegment {
    fn contains(&self, point: Vec2, margin: f32) -> bool {
        let (along, across) = match self.axis {
            RoadAxis::Vertical => (point.y, point.x),
            RoadAxis::Horizontal => (point.x, point.y),
        };
        (across - self.line).abs() < margin && along >= self.start && along <= self.end
    }

    pub(crate) fn endpoints(&self) -> (Vec2, Vec2) {
        match self.axis {
            RoadAxis::Vertical => (
                Vec2::new(self.line, self.start),
                Vec2::new(self.line, self.end),
            ),
            RoadAxis::Horizontal => (
                Vec2::new(self.start, self.line),
                Vec2::new(self.end, self.line),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RoadNetwork {
    segments: Vec<RoadSegment>,
    width: f32,
    margin: f32,
}

impl RoadNetwork {
    pub(crate) fn from_config(roads: &RoadConfig) -> Self {
        let [start, end] = roads.extent;
        let segments = vec![
            RoadSegment {
                axis: RoadAxis::Vertical,
                line: roads.vertical_x,
                start,
                end,
            },
            RoadSegment {
                axis: RoadAxis::Horizontal,
                line: roads.top_y,
                start,
                end,
            },
            RoadSegment {
                axis: RoadAxis::Horizontal,
                line: roads.bottom_y,
                start,
                end,
            },
        ];
        Self {
            segments,
            width: roads.width,
            margin: roads.width / 2.0 + roads.tolerance,
        }
    }

    /// True when `point` lies within the tolerance band of any segment,
    /// inside that segment's extent.
    pub(crate) fn contains(&self, point: Vec2) -> bool {
        self.segments
            .iter()
            .any(|segment| segment.contains(point, self.margin))
    }

    pub(crate) fn segments(&self) -> &[RoadSegment] {
        &self.segments
    }

    pub(crate) fn width(&self) -> f32 {
        self.width
    }
}
