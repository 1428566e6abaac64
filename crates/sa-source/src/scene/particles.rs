use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use sa_core::config::SceneConfig;
use sa_core::frame::FrameBuffer;

use super::Animation;
use super::canvas::{clear, splat};

#[derive(Clone, Copy, Debug)]
struct Particle {
    pos: Vec2,
    vel: Vec2,
    /// Secondes restantes avant réémission.
    life: f32,
}

/// Fontaine de particules : gravité, rebond au sol, réémission.
pub struct Particles {
    particles: Vec<Particle>,
    rng: StdRng,
    gravity: f32,
    spread: f32,
    restitution: f32,
    /// Demi-largeur visible en unités normalisées.
    bound_x: f32,
}

impl Default for Particles {
    fn default() -> Self {
        Self {
            particles: Vec::new(),
            rng: StdRng::seed_from_u64(0),
            gravity: 1.8,
            spread: 0.6,
            restitution: 0.6,
            bound_x: 1.0,
        }
    }
}

impl Particles {
    fn spawn(&mut self) -> Particle {
        Particle {
            pos: Vec2::new(0.0, 0.9),
            vel: Vec2::new(
                self.rng.random_range(-self.spread..=self.spread),
                self.rng.random_range(-2.4..-1.4),
            ),
            life: self.rng.random_range(1.5..4.0),
        }
    }

    fn sync_count(&mut self, count: u32) {
        let target = count.max(1) as usize;
        if self.particles.len() > target {
            self.particles.truncate(target);
        }
        while self.particles.len() < target {
            let mut p = self.spawn();
            // Étale les naissances pour éviter une bouffée unique.
            p.life *= self.rng.random_range(0.1..1.0);
            self.particles.push(p);
        }
    }
}

impl Animation for Particles {
    fn name(&self) -> &'static str {
        "particles"
    }

    fn setup(&mut self, width: u32, height: u32) {
        self.bound_x = if height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        };
    }

    fn update(&mut self, dt: f32, scene: &SceneConfig) {
        self.sync_count(scene.count);
        let dt = dt * scene.speed;
        let gravity = Vec2::new(0.0, self.gravity);

        for i in 0..self.particles.len() {
            let mut p = self.particles[i];
            p.vel += gravity * dt;
            p.pos += p.vel * dt;
            p.life -= dt;

            if p.pos.y > 1.0 {
                p.pos.y = 1.0;
                p.vel.y = -p.vel.y * self.restitution;
            }
            if p.pos.x.abs() > self.bound_x {
                p.pos.x = p.pos.x.clamp(-self.bound_x, self.bound_x);
                p.vel.x = -p.vel.x;
            }
            if p.life <= 0.0 {
                p = self.spawn();
            }
            self.particles[i] = p;
        }
    }

    fn render(&mut self, frame: &mut FrameBuffer, scene: &SceneConfig) {
        clear(frame);
        if frame.width == 0 || frame.height == 0 {
            return;
        }
        let radius = 2.5 / frame.height as f32;
        for p in &self.particles {
            let fade = (p.life / 1.5).clamp(0.25, 1.0);
            splat(frame, p.pos.x, p.pos.y, radius, scene.color, fade);
        }
    }

    fn cleanup(&mut self) {
        self.particles.clear();
    }

    fn randomize(&mut self, rng: &mut dyn RngCore) {
        self.rng = StdRng::seed_from_u64(rng.next_u64());
        self.gravity = rng.random_range(0.8..3.0);
        self.spread = rng.random_range(0.2..1.2);
        self.restitution = rng.random_range(0.3..0.85);
        self.particles.clear();
    }
}
