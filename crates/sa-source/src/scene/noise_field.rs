use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use rand::{Rng, RngCore};
use sa_core::config::SceneConfig;
use sa_core::frame::FrameBuffer;

use super::Animation;
use super::canvas::{fill_field, smoothstep};

/// Nombre d'octaves fBm dérivé de `scene.count` (longueur binaire, 1–6).
#[must_use]
pub fn octaves_for(count: u32) -> usize {
    (32 - count.leading_zeros()).clamp(1, 6) as usize
}

/// Champ de bruit Perlin fBm qui dérive dans le temps (axe z).
pub struct NoiseField {
    fbm: Fbm<Perlin>,
    seed: u32,
    octaves: usize,
    scale: f64,
    drift: (f64, f64),
    time: f64,
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl NoiseField {
    fn with_seed(seed: u32) -> Self {
        let octaves = octaves_for(SceneConfig::default().count);
        Self {
            fbm: Fbm::<Perlin>::new(seed).set_octaves(octaves),
            seed,
            octaves,
            scale: 1.5,
            drift: (0.15, 0.05),
            time: 0.0,
        }
    }

    fn rebuild(&mut self) {
        self.fbm = Fbm::<Perlin>::new(self.seed).set_octaves(self.octaves);
    }
}

impl Animation for NoiseField {
    fn name(&self) -> &'static str {
        "noise"
    }

    fn setup(&mut self, _width: u32, _height: u32) {}

    fn update(&mut self, dt: f32, scene: &SceneConfig) {
        self.time += f64::from(dt * scene.speed);
        let octaves = octaves_for(scene.count);
        if octaves != self.octaves {
            self.octaves = octaves;
            self.rebuild();
        }
    }

    fn render(&mut self, frame: &mut FrameBuffer, scene: &SceneConfig) {
        let fbm = &self.fbm;
        let scale = self.scale;
        let t = self.time;
        let (dx, dy) = (self.drift.0 * t, self.drift.1 * t);
        fill_field(frame, scene.color, |u, v| {
            let n = fbm.get([
                f64::from(u) * scale + dx,
                f64::from(v) * scale + dy,
                t * 0.3,
            ]);
            smoothstep(0.15, 0.85, (n * 0.5 + 0.5) as f32)
        });
    }

    fn randomize(&mut self, rng: &mut dyn RngCore) {
        self.seed = rng.random();
        self.scale = rng.random_range(0.8..3.0);
        self.drift = (rng.random_range(-0.3..0.3), rng.random_range(-0.3..0.3));
        self.rebuild();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn octaves_follow_count() {
        assert_eq!(octaves_for(0), 1);
        assert_eq!(octaves_for(1), 1);
        assert_eq!(octaves_for(4), 3);
        assert_eq!(octaves_for(64), 6);
        assert_eq!(octaves_for(512), 6);
    }

    #[test]
    fn field_varies_across_the_frame() {
        let mut field = NoiseField::default();
        let mut fb = FrameBuffer::new(64, 32);
        field.render(&mut fb, &SceneConfig::default());
        let first = fb.data[0];
        assert!(fb.data.chunks_exact(4).any(|px| px[0] != first));
    }

    #[test]
    fn update_rebuilds_on_count_change() {
        let mut field = NoiseField::default();
        let scene = SceneConfig {
            count: 2,
            ..SceneConfig::default()
        };
        field.update(0.1, &scene);
        assert_eq!(field.octaves, 2);
    }

    #[test]
    fn randomize_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut field = NoiseField::default();
        for _ in 0..20 {
            field.randomize(&mut rng);
            assert!((0.8..3.0).contains(&field.scale));
            assert!(field.drift.0.abs() <= 0.3 && field.drift.1.abs() <= 0.3);
        }
    }
}
