use engine::{Vec2, Viewport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Particle {
    /// Screen pixels.
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) radius: f32,
    pub(crate) alpha: f32,
}

/// Drifting background particles in screen space, wrapped at the viewport
/// edges.
#[derive(Debug, Clone)]
pub(crate) struct AmbientField {
    particles: Vec<Particle>,
}

impl AmbientField {
    pub(crate) fn new(count: usize, seed: u64, viewport: Viewport) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let width = viewport.width.max(1) as f32;
        let height = viewport.height.max(1) as f32;
        let particles = (0..count)
            .map(|_| Particle {
                position: Vec2::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height)),
                velocity: Vec2::new(rng.gen_range(-0.25..0.25), rng.gen_range(-0.25..0.25)),
                radius: rng.gen_range(1.0..3.0),
                alpha: rng.gen_range(0.3..0.8),
            })
            .collect();
        Self { particles }
    }

    pub(crate) fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub(crate) fn update(&mut self, viewport: Viewport) {
        let width = viewport.width as f32;
        let height = viewport.height as f32;
        for particle in &mut self.particles {
            particle.position += particle.velocity;
            particle.position.x = wrap(particle.position.x, width);
            particle.position.y = wrap(particle.position.y, height);
        }
    }
}

fn wrap(value: f32, extent: f32) -> f32 {
    if value < 0.0 {
        extent
    } else if value > extent {
        0.0
    } else {
        value
    }
}
