use engine::Vec2;

/// Exponential-decay follower: each tick closes `smoothing` of the remaining
/// distance to the offset that centers the avatar.
#[derive(Debug, Clone)]
pub(crate) struct CameraFollower {
    offset: Vec2,
    smoothing: f32,
}

impl CameraFollower {
    pub(crate) fn new(smoothing: f32) -> Self {
        Self {
            offset: Vec2::ZERO,
            smoothing,
        }
    }

    pub(crate) fn offset(&self) -> Vec2 {
        self.offset
    }

    pub(crate) fn target_for(avatar_position: Vec2, viewport_center: Vec2) -> Vec2 {
        viewport_center - avatar_position
    }

    pub(crate) fn follow(&mut self, avatar_position: Vec2, viewport_center: Vec2) {
        let target = Self::target_for(avatar_position, viewport_center);
        self.offset += (target - self.offset) * self.smoothing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_covers_smoothing_fraction() {
        let mut camera = CameraFollower::new(0.1);
        camera.follow(Vec2::new(2500.0, 2500.0), Vec2::new(640.0, 360.0));

        let offset = camera.offset();
        assert!((offset.x - (-186.0)).abs() < 1e-3);
        assert!((offset.y - (-214.0)).abs() < 1e-3);
    }

    #[test]
    fn converges_without_overshoot() {
        let mut camera = CameraFollower::new(0.1);
        let avatar = Vec2::new(2500.0, 2200.0);
        let center = Vec2::new(640.0, 360.0);
        let target = CameraFollower::target_for(avatar, center);

        let mut previous_gap = (target - camera.offset()).length();
        for _ in 0..200 {
            camera.follow(avatar, center);
            let gap = (target - camera.offset()).length();
            assert!(gap <= previous_gap);
            previous_gap = gap;
        }
        assert!(previous_gap < 0.01);
    }
}
