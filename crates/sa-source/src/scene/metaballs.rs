use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use sa_core::config::SceneConfig;
use sa_core::frame::FrameBuffer;

use super::Animation;
use super::canvas::{aspect, fill_field, smoothstep};

/// Plafond du nombre de billes (coût O(billes × pixels)).
pub const MAX_BALLS: usize = 48;

#[derive(Clone, Copy, Debug)]
struct Ball {
    /// Fréquences et phases de la trajectoire de Lissajous de la bille.
    freq: Vec2,
    phase: Vec2,
    radius: f32,
}

/// Champ implicite Σ r²/d² seuillé avec un bord adouci.
pub struct Metaballs {
    balls: Vec<Ball>,
    centers: Vec<(Vec2, f32)>,
    time: f32,
    threshold: f32,
    seed: u64,
}

impl Default for Metaballs {
    fn default() -> Self {
        Self {
            balls: Vec::new(),
            centers: Vec::new(),
            time: 0.0,
            threshold: 1.0,
            seed: 0,
        }
    }
}

/// Nombre de billes pour un `count` donné.
#[must_use]
pub fn ball_count(count: u32) -> usize {
    (count as usize).clamp(1, MAX_BALLS)
}

impl Metaballs {
    fn make_ball(rng: &mut StdRng) -> Ball {
        Ball {
            freq: Vec2::new(rng.random_range(0.3..1.2), rng.random_range(0.3..1.2)),
            phase: Vec2::new(
                rng.random_range(0.0..std::f32::consts::TAU),
                rng.random_range(0.0..std::f32::consts::TAU),
            ),
            radius: rng.random_range(0.12..0.26),
        }
    }

    fn sync_count(&mut self, count: u32) {
        let target = ball_count(count);
        if self.balls.len() != target {
            let mut rng = StdRng::seed_from_u64(self.seed);
            self.balls = (0..target).map(|_| Self::make_ball(&mut rng)).collect();
        }
    }
}

impl Animation for Metaballs {
    fn name(&self) -> &'static str {
        "metaballs"
    }

    fn setup(&mut self, _width: u32, _height: u32) {}

    fn update(&mut self, dt: f32, scene: &SceneConfig) {
        self.sync_count(scene.count);
        self.time += dt * scene.speed;
    }

    fn render(&mut self, frame: &mut FrameBuffer, scene: &SceneConfig) {
        self.sync_count(scene.count);
        let t = self.time;
        let extent = Vec2::new(aspect(frame) * 0.8, 0.8);
        // Beaucoup de billes : on réduit leur poids pour garder du vide.
        let weight = (6.0 / self.balls.len().max(1) as f32).min(1.0);
        self.centers.clear();
        self.centers.extend(self.balls.iter().map(|b| {
            let c = Vec2::new(
                (b.freq.x * t + b.phase.x).sin(),
                (b.freq.y * t + b.phase.y).cos(),
            ) * extent;
            (c, b.radius * b.radius * weight)
        }));

        let centers = &self.centers;
        let threshold = self.threshold;
        fill_field(frame, scene.color, |u, v| {
            let p = Vec2::new(u, v);
            let field: f32 = centers
                .iter()
                .map(|(c, r2)| r2 / (p - *c).length_squared().max(1e-6))
                .sum();
            smoothstep(threshold * 0.6, threshold, field)
        });
    }

    fn cleanup(&mut self) {
        self.centers = Vec::new();
    }

    fn randomize(&mut self, rng: &mut dyn RngCore) {
        self.seed = rng.next_u64();
        self.threshold = rng.random_range(0.6..1.6);
        self.balls.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ball_count_is_capped() {
        assert_eq!(ball_count(0), 1);
        assert_eq!(ball_count(8), 8);
        assert_eq!(ball_count(512), MAX_BALLS);
    }

    #[test]
    fn ball_centers_are_lit() {
        let scene = SceneConfig {
            count: 4,
            ..SceneConfig::default()
        };
        let mut balls = Metaballs::default();
        balls.update(0.0, &scene);
        let mut fb = FrameBuffer::new(64, 32);
        balls.render(&mut fb, &scene);
        for (c, _) in &balls.centers {
            let (x, y) = crate::scene::canvas::to_pixel(&fb, c.x, c.y);
            let (x, y) = (x.clamp(0, 63) as u32, y.clamp(0, 31) as u32);
            assert_eq!(fb.pixel(x, y).0, 255);
        }
    }

    #[test]
    fn same_seed_gives_same_balls() {
        let scene = SceneConfig::default();
        let mut a = Metaballs::default();
        let mut b = Metaballs::default();
        a.update(0.0, &scene);
        b.update(0.0, &scene);
        assert_eq!(a.balls.len(), b.balls.len());
        for (ba, bb) in a.balls.iter().zip(&b.balls) {
            assert_eq!(ba.freq, bb.freq);
            assert!((0.12..0.26).contains(&ba.radius));
        }
    }

    #[test]
    fn randomize_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut balls = Metaballs::default();
        for _ in 0..20 {
            balls.randomize(&mut rng);
            assert!((0.6..1.6).contains(&balls.threshold));
        }
    }
}
