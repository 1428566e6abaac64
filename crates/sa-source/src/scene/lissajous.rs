use rand::{Rng, RngCore};
use sa_core::config::SceneConfig;
use sa_core::frame::FrameBuffer;

use super::Animation;
use super::canvas::{add_point, aspect, clear, splat};

/// Courbe de Lissajous x = sin(a·s + δ), y = sin(b·s) avec une tête brillante.
pub struct Lissajous {
    a: f32,
    b: f32,
    delta: f32,
    /// Vitesse de dérive de δ (rad/s).
    drift: f32,
    /// Position de la tête sur la courbe.
    head: f32,
}

impl Default for Lissajous {
    fn default() -> Self {
        Self {
            a: 3.0,
            b: 2.0,
            delta: std::f32::consts::FRAC_PI_2,
            drift: 0.25,
            head: 0.0,
        }
    }
}

impl Lissajous {
    /// Point de la courbe au paramètre `s`, dans [-1, 1]².
    #[must_use]
    pub fn point(&self, s: f32) -> (f32, f32) {
        ((self.a * s + self.delta).sin(), (self.b * s).sin())
    }
}

impl Animation for Lissajous {
    fn name(&self) -> &'static str {
        "lissajous"
    }

    fn setup(&mut self, _width: u32, _height: u32) {}

    fn update(&mut self, dt: f32, scene: &SceneConfig) {
        let step = dt * scene.speed;
        self.delta = (self.delta + step * self.drift) % std::f32::consts::TAU;
        self.head = (self.head + step * 1.5) % std::f32::consts::TAU;
    }

    fn render(&mut self, frame: &mut FrameBuffer, scene: &SceneConfig) {
        clear(frame);
        if frame.width == 0 || frame.height == 0 {
            return;
        }
        let sx = aspect(frame) * 0.9;
        let sy = 0.9;
        // Assez d'échantillons pour une courbe continue quelle que soit la taille.
        let samples = ((frame.width + frame.height) as usize * 8).clamp(512, 8192);
        for i in 0..samples {
            let s = i as f32 / samples as f32 * std::f32::consts::TAU;
            let (x, y) = self.point(s);
            add_point(frame, x * sx, y * sy, scene.color, 0.45);
        }

        // Traînée décroissante derrière la tête.
        let trail = scene.count.clamp(1, 64);
        for k in 0..trail {
            let s = self.head - k as f32 * 0.02;
            let (x, y) = self.point(s);
            let fade = 1.0 - k as f32 / trail as f32;
            splat(frame, x * sx, y * sy, 0.06, scene.color, fade);
        }
    }

    fn randomize(&mut self, rng: &mut dyn RngCore) {
        self.a = rng.random_range(1..=7) as f32;
        self.b = rng.random_range(1..=7) as f32;
        self.delta = rng.random_range(0.0..std::f32::consts::TAU);
        self.drift = rng.random_range(0.05..0.6);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::canvas::to_pixel;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn curve_stays_in_unit_square() {
        let liss = Lissajous::default();
        for i in 0..100 {
            let (x, y) = liss.point(i as f32 * 0.1);
            assert!(x.abs() <= 1.0 && y.abs() <= 1.0);
        }
    }

    #[test]
    fn head_is_brightest() {
        let scene = SceneConfig::default();
        let mut liss = Lissajous::default();
        let mut fb = FrameBuffer::new(80, 40);
        liss.render(&mut fb, &scene);
        let (x, y) = liss.point(liss.head);
        let (px, py) = to_pixel(&fb, x * aspect(&fb) * 0.9, y * 0.9);
        assert_eq!(fb.pixel(px as u32, py as u32).0, 255);
    }

    #[test]
    fn randomize_keeps_integer_frequencies() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut liss = Lissajous::default();
        for _ in 0..20 {
            liss.randomize(&mut rng);
            assert_eq!(liss.a.fract(), 0.0);
            assert!((1.0..=7.0).contains(&liss.b));
            assert!((0.05..0.6).contains(&liss.drift));
        }
    }
}
