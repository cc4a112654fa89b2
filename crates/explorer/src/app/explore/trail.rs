use std::collections::VecDeque;

use engine::{ColorStop, Glow, Paint, StrokeStyle, Vec2};

const MAX_STROKE_WIDTH: f32 = 6.0;
const GLOW_RADIUS: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TrailPoint {
    pub(crate) position: Vec2,
    pub(crate) opacity: f32,
}

/// One stroke between consecutive trail points, styled by the older point's
/// opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TrailSegment {
    pub(crate) from: Vec2,
    pub(crate) to: Vec2,
    pub(crate) opacity: f32,
}

impl TrailSegment {
    pub(crate) fn width(&self) -> f32 {
        MAX_STROKE_WIDTH * self.opacity
    }

    pub(crate) fn stroke_style(&self) -> StrokeStyle {
        let a = self.opacity;
        StrokeStyle {
            width: self.width(),
            paint: Paint::LinearGradient(vec![
                ColorStop {
                    offset: 0.0,
                    color: [102, 126, 234, alpha_byte(a * 0.8)],
                },
                ColorStop {
                    offset: 0.5,
                    color: [0, 212, 255, alpha_byte(a * 0.6)],
                },
                ColorStop {
                    offset: 1.0,
                    color: [255, 0, 255, alpha_byte(a * 0.4)],
                },
            ]),
            glow: Some(Glow {
                radius: GLOW_RADIUS,
                color: [0, 212, 255, alpha_byte(a)],
            }),
            dash: None,
        }
    }
}

fn alpha_byte(alpha: f32) -> u8 {
    (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[derive(Debug, Clone)]
pub(crate) struct Trail {
    points: VecDeque<TrailPoint>,
    max_len: usize,
    fade_per_tick: f32,
}

impl Trail {
    pub(crate) fn new(max_len: usize, fade_per_tick: f32) -> Self {
        Self {
            points: VecDeque::with_capacity(max_len.saturating_add(1)),
            max_len,
            fade_per_tick,
        }
    }

    /// Records `position` when a directional key is held, then fades, purges
    /// and caps.
    pub(crate) fn update(&mut self, position: Vec2, directional_held: bool) {
        if directional_held {
            self.points.push_back(TrailPoint {
                position,
                opacity: 1.0,
            });
        }
        for point in &mut self.points {
            point.opacity -= self.fade_per_tick;
        }
        self.points.retain(|point| point.opacity > 0.0);
        while self.points.len() > self.max_len {
            self.points.pop_front();
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.points.len()
    }

    #[cfg(test)]
    pub(crate) fn points(&self) -> impl Iterator<Item = &TrailPoint> {
        self.points.iter()
    }

    pub(crate) fn segments(&self) -> impl Iterator<Item = TrailSegment> + '_ {
        self.points
            .iter()
            .zip(self.points.iter().skip(1))
            .map(|(older, newer)| TrailSegment {
                from: older.position,
                to: newer.position,
                opacity: older.opacity,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_ticks_record_nothing() {
        let mut trail = Trail::new(200, 0.008);
        trail.update(Vec2::new(1.0, 1.0), false);
        assert_eq!(trail.len(), 0);
    }

    #[test]
    fn cap_holds_after_continuous_movement() {
        let mut trail = Trail::new(10, 0.008);
        for step in 0..(10 + 7) {
            trail.update(Vec2::new(step as f32, 0.0), true);
            assert!(trail.len() <= 10);
        }
        assert_eq!(trail.len(), 10);
        let oldest = trail.points().next().expect("oldest");
        assert_eq!(oldest.position, Vec2::new(7.0, 0.0));
    }

    #[test]
    fn points_fade_out_and_are_purged() {
        let mut trail = Trail::new(200, 0.25);
        trail.update(Vec2::ZERO, true);
        assert_eq!(trail.len(), 1);
        for _ in 0..2 {
            trail.update(Vec2::ZERO, false);
        }
        assert_eq!(trail.len(), 1);
        trail.update(Vec2::ZERO, false);
        assert_eq!(trail.len(), 0);
    }

    #[test]
    fn default_fade_outlives_cap_of_two_hundred_ticks() {
        let mut trail = Trail::new(200, 0.008);
        for step in 0..300 {
            trail.update(Vec2::new(step as f32, 0.0), true);
        }
        assert!(trail.len() < 200);
        assert!(trail.len() >= 120);
    }

    #[test]
    fn segments_take_style_from_older_point() {
        let mut trail = Trail::new(200, 0.25);
        trail.update(Vec2::new(0.0, 0.0), true);
        trail.update(Vec2::new(4.0, 0.0), true);

        let segments: Vec<TrailSegment> = trail.segments().collect();
        assert_eq!(
            segments,
            vec![TrailSegment {
                from: Vec2::new(0.0, 0.0),
                to: Vec2::new(4.0, 0.0),
                opacity: 0.5,
            }]
        );
    }

    #[test]
    fn segment_width_and_glow_scale_with_opacity() {
        let segment = TrailSegment {
            from: Vec2::ZERO,
            to: Vec2::new(4.0, 0.0),
            opacity: 0.5,
        };
        assert!((segment.width() - 3.0).abs() < 1e-6);
        let style = segment.stroke_style();
        assert_eq!(style.glow.map(|glow| glow.color[3]), Some(128));
        assert_eq!(style.paint.sample(0.0), [102, 126, 234, 102]);
        assert_eq!(style.paint.sample(1.0), [255, 0, 255, 51]);
    }
}
