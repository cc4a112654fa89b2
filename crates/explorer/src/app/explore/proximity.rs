use engine::Vec2;

use crate::app::world_map::MapPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProximityChange {
    Entered(usize),
    Left,
}

/// Tracks which point of interest, if any, is nearby.
#[derive(Debug, Clone)]
pub(crate) struct ProximityDetector {
    radius: f32,
    current: Option<usize>,
}

impl ProximityDetector {
    pub(crate) fn new(radius: f32) -> Self {
        Self {
            radius,
            current: None,
        }
    }

    pub(crate) fn current(&self) -> Option<usize> {
        self.current
    }

    /// Picks the nearest interaction point strictly inside the radius and
    /// reports at most one change. On an exact distance tie the current
    /// selection is kept, otherwise the earliest point wins.
    pub(crate) fn update(
        &mut self,
        avatar_center: Vec2,
        points: &[MapPoint],
    ) -> Option<ProximityChange> {
        let mut best: Option<(usize, f32)> = None;
        for (index, point) in points.iter().enumerate() {
            let distance = avatar_center.distance(point.interaction_point);
            if distance >= self.radius {
                continue;
            }
            let replace = match best {
                None => true,
                Some((_, best_distance)) if distance < best_distance => true,
                Some((_, best_distance)) => {
                    distance == best_distance && self.current == Some(index)
                }
            };
            if replace {
                best = Some((index, distance));
            }
        }

        let selected = best.map(|(index, _)| index);
        if selected == self.current {
            return None;
        }
        self.current = selected;
        Some(match selected {
            Some(index) => ProximityChange::Entered(index),
            None => ProximityChange::Left,
        })
    }
}
