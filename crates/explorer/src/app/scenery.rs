use engine::{text_width, Canvas, Glow, Space, StrokeStyle, Vec2};

use super::explore::{RoadNetwork, RoadSegment};
use super::world_map::MapPoint;

const ASPHALT: [u8; 4] = [34, 34, 34, 255];
const ASPHALT_SHADOW: [u8; 4] = [0, 0, 0, 128];
const SHOULDER: [u8; 4] = [255, 255, 255, 38];
const LANE_MARKING: [u8; 4] = [241, 196, 15, 255];
const ASPHALT_SHADOW_RADIUS: f32 = 15.0;
const SHOULDER_EXTRA_WIDTH: f32 = 4.0;
const LANE_MARKING_WIDTH: f32 = 3.0;
const LANE_DASH: (f32, f32) = (40.0, 25.0);
/// Lane markings stop this far short of a crossing road's centerline.
const JUNCTION_GAP: f32 = 50.0;

const TRUNK: [u8; 4] = [110, 76, 45, 255];
const PINE: [u8; 4] = [30, 110, 60, 255];
const OAK: [u8; 4] = [56, 142, 60, 255];
const OAK_HIGHLIGHT: [u8; 4] = [102, 187, 106, 200];
const STEM: [u8; 4] = [240, 230, 210, 255];
const MUSHROOM_CAP: [u8; 4] = [211, 47, 47, 255];
const FLOWER_CENTER: [u8; 4] = [120, 80, 20, 255];
const SHADOW: [u8; 4] = [0, 0, 0, 70];
/// World units of radius per unit of decoration size.
const DECORATION_SCALE: f32 = 8.0;

const HOUSE_SIZE: Vec2 = Vec2::new(90.0, 64.0);
const HOUSE_PALETTE: [[u8; 4]; 5] = [
    [79, 70, 229, 255],
    [16, 185, 129, 255],
    [245, 158, 11, 255],
    [239, 68, 68, 255],
    [139, 92, 246, 255],
];
const ROOF: [u8; 4] = [60, 40, 50, 255];
const DOOR: [u8; 4] = [40, 28, 20, 255];
const WINDOW_LIGHT: [u8; 4] = [255, 236, 179, 255];
const LABEL: [u8; 4] = [255, 255, 255, 230];
const LABEL_SCALE: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecorationKind {
    Pine,
    Oak,
    Sunflower,
    Blossom,
    Hibiscus,
    Mushroom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Decoration {
    kind: DecorationKind,
    /// Offset from the world center.
    offset: Vec2,
    size: f32,
}

const fn deco(kind: DecorationKind, x: f32, y: f32, size: f32) -> Decoration {
    Decoration {
        kind,
        offset: Vec2::new(x, y),
        size,
    }
}

const DECORATIONS: [Decoration; 30] = [
    // Along the vertical road.
    deco(DecorationKind::Pine, -120.0, -700.0, 6.0),
    deco(DecorationKind::Pine, 120.0, -600.0, 6.0),
    deco(DecorationKind::Pine, -120.0, -500.0, 6.0),
    deco(DecorationKind::Pine, 120.0, -400.0, 6.0),
    deco(DecorationKind::Pine, -120.0, -200.0, 6.0),
    deco(DecorationKind::Pine, 120.0, -100.0, 6.0),
    deco(DecorationKind::Pine, -120.0, 100.0, 6.0),
    deco(DecorationKind::Pine, 120.0, 200.0, 6.0),
    deco(DecorationKind::Pine, -120.0, 400.0, 6.0),
    deco(DecorationKind::Pine, 120.0, 500.0, 6.0),
    deco(DecorationKind::Pine, -50.0, 600.0, 4.0),
    deco(DecorationKind::Pine, 50.0, 700.0, 4.0),
    // Along the top road.
    deco(DecorationKind::Oak, -600.0, -400.0, 4.5),
    deco(DecorationKind::Oak, -200.0, -400.0, 4.5),
    deco(DecorationKind::Oak, 200.0, -400.0, 4.5),
    deco(DecorationKind::Oak, 600.0, -400.0, 4.5),
    // Along the bottom road.
    deco(DecorationKind::Oak, -600.0, 400.0, 4.5),
    deco(DecorationKind::Oak, -200.0, 400.0, 4.5),
    deco(DecorationKind::Oak, 200.0, 400.0, 4.5),
    deco(DecorationKind::Oak, 600.0, 400.0, 4.5),
    // Central garden.
    deco(DecorationKind::Sunflower, -200.0, -100.0, 3.0),
    deco(DecorationKind::Blossom, -150.0, -150.0, 3.0),
    deco(DecorationKind::Hibiscus, -100.0, -100.0, 3.0),
    deco(DecorationKind::Sunflower, 200.0, 100.0, 3.0),
    deco(DecorationKind::Blossom, 150.0, 150.0, 3.0),
    deco(DecorationKind::Hibiscus, 100.0, 100.0, 3.0),
    // Outskirts.
    deco(DecorationKind::Pine, -800.0, -800.0, 5.0),
    deco(DecorationKind::Pine, 800.0, 800.0, 5.0),
    deco(DecorationKind::Mushroom, -700.0, 400.0, 2.5),
    deco(DecorationKind::Mushroom, 700.0, -400.0, 2.5),
];

#[derive(Debug, Clone, PartialEq)]
struct House {
    center: Vec2,
    label: String,
    color: [u8; 4],
}

/// Static world artwork: roads, decorations and one house per point of
/// interest.
#[derive(Debug, Clone)]
pub(crate) struct Scenery {
    segments: Vec<RoadSegment>,
    road_width: f32,
    world_center: Vec2,
    houses: Vec<House>,
}

impl Scenery {
    pub(crate) fn new(roads: &RoadNetwork, world_center: Vec2, points: &[MapPoint]) -> Self {
        let houses = points
            .iter()
            .enumerate()
            .map(|(index, point)| House {
                center: point.world_position,
                label: point.poi.title.clone(),
                color: HOUSE_PALETTE[index % HOUSE_PALETTE.len()],
            })
            .collect();
        Self {
            segments: roads.segments().to_vec(),
            road_width: roads.width(),
            world_center,
            houses,
        }
    }

    /// Asphalt, then shoulders, then dashed lane markings broken at
    /// junctions.
    pub(crate) fn draw_roads(&self, canvas: &mut Canvas) {
        let asphalt = StrokeStyle {
            glow: Some(Glow {
                radius: ASPHALT_SHADOW_RADIUS,
                color: ASPHALT_SHADOW,
            }),
            ..StrokeStyle::solid(self.road_width, ASPHALT)
        };
        for segment in &self.segments {
            let (from, to) = segment.endpoints();
            canvas.stroke(Space::World, from, to, asphalt.clone());
        }

        let shoulder = StrokeStyle::solid(self.road_width + SHOULDER_EXTRA_WIDTH, SHOULDER);
        for segment in &self.segments {
            let (from, to) = segment.endpoints();
            canvas.stroke(Space::World, from, to, shoulder.clone());
        }

        let marking = StrokeStyle {
            dash: Some(LANE_DASH),
            ..StrokeStyle::solid(LANE_MARKING_WIDTH, LANE_MARKING)
        };
        for segment in &self.segments {
            for (start, end) in lane_marking_spans(segment, &self.segments) {
                let span = RoadSegment {
                    start,
                    end,
                    ..*segment
                };
                let (from, to) = span.endpoints();
                canvas.stroke(Space::World, from, to, marking.clone());
            }
        }
    }

    pub(crate) fn draw_decorations(&self, canvas: &mut Canvas) {
        for decoration in &DECORATIONS {
            draw_decoration(canvas, self.world_center + decoration.offset, decoration);
        }
    }

    pub(crate) fn draw_houses(&self, canvas: &mut Canvas, world_scale: f32) {
        for house in &self.houses {
            let origin = house.center - HOUSE_SIZE * 0.5;
            canvas.rect(
                Space::World,
                origin + Vec2::new(6.0, 8.0),
                HOUSE_SIZE,
                SHADOW,
            );
            canvas.rect(Space::World, origin, HOUSE_SIZE, house.color);
            for layer in 0..3 {
                let inset = 8.0 + layer as f32 * 14.0;
                let layer_origin = origin + Vec2::new(inset - 12.0, -14.0 * (layer as f32 + 1.0));
                let width = HOUSE_SIZE.x - 2.0 * inset + 24.0;
                canvas.rect(Space::World, layer_origin, Vec2::new(width, 14.0), ROOF);
            }
            canvas.rect(
                Space::World,
                origin + Vec2::new(HOUSE_SIZE.x * 0.5 - 9.0, HOUSE_SIZE.y - 30.0),
                Vec2::new(18.0, 30.0),
                DOOR,
            );
            for window_x in [12.0, HOUSE_SIZE.x - 30.0] {
                canvas.rect(
                    Space::World,
                    origin + Vec2::new(window_x, 14.0),
                    Vec2::new(18.0, 16.0),
                    WINDOW_LIGHT,
                );
            }

            let label_width = text_width(&house.label, LABEL_SCALE) as f32 / world_scale;
            canvas.text(
                Space::World,
                house.center + Vec2::new(-label_width * 0.5, HOUSE_SIZE.y * 0.5 + 10.0),
                house.label.as_str(),
                LABEL,
                LABEL_SCALE,
            );
        }
    }
}

/// Spans of `segment` that carry lane markings: its full extent minus a gap
/// around every perpendicular road crossing it.
fn lane_marking_spans(segment: &RoadSegment, all: &[RoadSegment]) -> Vec<(f32, f32)> {
    let mut crossings: Vec<f32> = all
        .iter()
        .filter(|other| other.axis != segment.axis)
        .filter(|other| other.start <= segment.line && segment.line <= other.end)
        .map(|other| other.line)
        .filter(|line| segment.start <= *line && *line <= segment.end)
        .collect();
    crossings.sort_by(f32::total_cmp);

    let mut spans = Vec::with_capacity(crossings.len() + 1);
    let mut cursor = segment.start;
    for line in crossings {
        let gap_start = line - JUNCTION_GAP;
        if gap_start > cursor {
            spans.push((cursor, gap_start));
        }
        cursor = cursor.max(line + JUNCTION_GAP);
    }
    if segment.end > cursor {
        spans.push((cursor, segment.end));
    }
    spans
}

fn draw_decoration(canvas: &mut Canvas, center: Vec2, decoration: &Decoration) {
    let r = decoration.size * DECORATION_SCALE;
    canvas.disc(Space::World, center + Vec2::new(r * 0.1, r * 0.9), r * 0.6, SHADOW);
    match decoration.kind {
        DecorationKind::Pine => {
            canvas.rect(
                Space::World,
                center + Vec2::new(-r * 0.12, r * 0.3),
                Vec2::new(r * 0.24, r * 0.6),
                TRUNK,
            );
            for (step, radius) in [0.6, 0.48, 0.34].into_iter().enumerate() {
                let lift = step as f32 * r * 0.35;
                canvas.disc(
                    Space::World,
                    center + Vec2::new(0.0, r * 0.2 - lift),
                    r * radius,
                    PINE,
                );
            }
        }
        DecorationKind::Oak => {
            canvas.rect(
                Space::World,
                center + Vec2::new(-r * 0.12, r * 0.2),
                Vec2::new(r * 0.24, r * 0.7),
                TRUNK,
            );
            canvas.disc(Space::World, center, r * 0.7, OAK);
            canvas.disc(
                Space::World,
                center + Vec2::new(-r * 0.2, -r * 0.2),
                r * 0.3,
                OAK_HIGHLIGHT,
            );
        }
        DecorationKind::Sunflower | DecorationKind::Blossom | DecorationKind::Hibiscus => {
            let petal = match decoration.kind {
                DecorationKind::Sunflower => [250, 204, 21, 255],
                DecorationKind::Blossom => [244, 143, 177, 255],
                _ => [229, 57, 53, 255],
            };
            for step in 0..5 {
                let angle = step as f32 * std::f32::consts::TAU / 5.0;
                let offset = Vec2::new(angle.cos(), angle.sin()) * (r * 0.35);
                canvas.disc(Space::World, center + offset, r * 0.28, petal);
            }
            canvas.disc(Space::World, center, r * 0.2, FLOWER_CENTER);
        }
        DecorationKind::Mushroom => {
            canvas.rect(
                Space::World,
                center + Vec2::new(-r * 0.15, 0.0),
                Vec2::new(r * 0.3, r * 0.6),
                STEM,
            );
            canvas.disc(Space::World, center, r * 0.5, MUSHROOM_CAP);
            for spot in [Vec2::new(-0.2, -0.15), Vec2::new(0.15, -0.25), Vec2::new(0.05, 0.05)] {
                canvas.disc(Space::World, center + spot * r, r * 0.08, STEM);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::RoadConfig;
    use engine::{DrawCommand, Viewport};

    fn network() -> RoadNetwork {
        RoadNetwork::from_config(&RoadConfig::default())
    }

    #[test]
    fn vertical_markings_break_at_both_horizontal_roads() {
        let roads = network();
        let vertical = roads.segments()[0];
        assert_eq!(vertical.endpoints().0.x, 2500.0);
        assert_eq!(
            lane_marking_spans(&vertical, roads.segments()),
            vec![(1700.0, 2150.0), (2250.0, 2750.0), (2850.0, 3300.0)]
        );
    }

    #[test]
    fn horizontal_markings_break_at_the_vertical_road() {
        let roads = network();
        let top = roads.segments()[1];
        assert_eq!(
            lane_marking_spans(&top, roads.segments()),
            vec![(1700.0, 2450.0), (2550.0, 3300.0)]
        );
    }

    #[test]
    fn roads_draw_in_three_passes() {
        let roads = network();
        let scenery = Scenery::new(&roads, Vec2::new(2500.0, 2500.0), &[]);
        let mut canvas = Canvas::new(Viewport {
            width: 100,
            height: 100,
        });
        scenery.draw_roads(&mut canvas);

        let widths: Vec<f32> = canvas
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Stroke { style, .. } => Some(style.width),
                _ => None,
            })
            .collect();
        assert_eq!(widths.len(), 3 + 3 + 7);
        assert!(widths[..3].iter().all(|width| *width == 80.0));
        assert!(widths[3..6].iter().all(|width| *width == 84.0));
        assert!(widths[6..].iter().all(|width| *width == LANE_MARKING_WIDTH));
    }
}
