use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::{Rng, RngCore};
use sa_core::config::{SceneConfig, ShapeKind};
use sa_core::frame::FrameBuffer;

use super::Animation;
use super::canvas::{fill_field, smoothstep};
use super::morph::shape_sdf;

/// Plasma sinusoïdal replié en secteurs miroirs.
///
/// Le nombre de secteurs suit `scene.shape` (voir [`shape_segments`]) ;
/// chaque secteur porte le contour de la forme, qui pulse avec le temps.
pub struct Kaleidoscope {
    /// Multiplicateur du nombre de secteurs de base.
    fold: u32,
    /// Fréquences des trois ondes du plasma.
    freqs: [f32; 3],
    twist: f32,
    time: f32,
}

impl Default for Kaleidoscope {
    fn default() -> Self {
        Self {
            fold: 1,
            freqs: [3.0, 5.0, 7.0],
            twist: 0.4,
            time: 0.0,
        }
    }
}

/// Secteurs de base par forme : un par sommet, six pour le cercle.
#[must_use]
pub fn shape_segments(shape: ShapeKind) -> u32 {
    match shape {
        ShapeKind::Circle => 6,
        ShapeKind::Square => 4,
        ShapeKind::Triangle => 3,
        ShapeKind::Star => 5,
    }
}

/// Replie un angle dans un secteur de `segments` parts, avec miroir.
#[must_use]
pub fn fold_angle(angle: f32, segments: u32) -> f32 {
    let sector = TAU / segments.max(1) as f32;
    let a = angle.rem_euclid(sector);
    if a > sector * 0.5 { sector - a } else { a }
}

impl Animation for Kaleidoscope {
    fn name(&self) -> &'static str {
        "kaleidoscope"
    }

    fn setup(&mut self, _width: u32, _height: u32) {}

    fn update(&mut self, dt: f32, scene: &SceneConfig) {
        self.time += dt * scene.speed;
    }

    fn render(&mut self, frame: &mut FrameBuffer, scene: &SceneConfig) {
        let segments = shape_segments(scene.shape) * self.fold;
        let [f1, f2, f3] = self.freqs;
        let t = self.time;
        let twist = self.twist;
        let shape = scene.shape;
        let size = 0.16 + 0.04 * (t * 1.7).sin();
        fill_field(frame, scene.color, |u, v| {
            let r = (u * u + v * v).sqrt();
            let a = fold_angle(v.atan2(u) + t * 0.2 + r * twist, segments);
            let (x, y) = (r * a.cos(), r * a.sin());
            let p = (x * f1 + t).sin() + (y * f2 - t * 0.7).sin() + (r * f3 - t * 1.3).sin();
            // p ∈ [-3, 3] → [0, 1], vignette douce.
            let k = (p / 3.0 * PI).sin() * 0.5 + 0.5;
            let d = shape_sdf(shape, Vec2::new(x - 0.55, y), size);
            let outline = 1.0 - smoothstep(0.0, 0.04, d.abs());
            (k * 0.75).max(outline) * (1.2 - r * 0.5).clamp(0.0, 1.0)
        });
    }

    fn randomize(&mut self, rng: &mut dyn RngCore) {
        self.fold = rng.random_range(1..=3);
        for f in &mut self.freqs {
            *f = rng.random_range(1.5..9.0);
        }
        self.twist = rng.random_range(-1.0..1.0);
    }
}
