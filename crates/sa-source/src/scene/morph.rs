use glam::Vec2;
use rand::{Rng, RngCore};
use sa_core::config::{SceneConfig, ShapeKind};
use sa_core::frame::FrameBuffer;

use super::Animation;
use super::canvas::{fill_field, smoothstep};

/// Distance signée à une forme centrée de taille `size` (négative à l'intérieur).
///
/// `p` est en coordonnées y vers le haut.
#[must_use]
pub fn shape_sdf(shape: ShapeKind, p: Vec2, size: f32) -> f32 {
    match shape {
        ShapeKind::Circle => p.length() - size,
        ShapeKind::Square => {
            let d = p.abs() - Vec2::splat(size * 0.8);
            d.max(Vec2::ZERO).length() + d.x.max(d.y).min(0.0)
        }
        ShapeKind::Triangle => sd_triangle(p, size),
        ShapeKind::Star => sd_star5(p, size, 0.45),
    }
}

fn sd_triangle(mut p: Vec2, r: f32) -> f32 {
    let k = 3.0_f32.sqrt();
    p.x = p.x.abs() - r;
    p.y += r / k;
    if p.x + k * p.y > 0.0 {
        p = Vec2::new(p.x - k * p.y, -k * p.x - p.y) / 2.0;
    }
    p.x -= p.x.clamp(-2.0 * r, 0.0);
    -p.length() * p.y.signum()
}

fn sd_star5(mut p: Vec2, r: f32, rf: f32) -> f32 {
    let k1 = Vec2::new(0.809_017, -0.587_785_25);
    let k2 = Vec2::new(-k1.x, k1.y);
    p.x = p.x.abs();
    p -= 2.0 * k1.dot(p).max(0.0) * k1;
    p -= 2.0 * k2.dot(p).max(0.0) * k2;
    p.x = p.x.abs();
    p.y -= r;
    let ba = rf * Vec2::new(-k1.y, k1.x) - Vec2::new(0.0, 1.0);
    let h = (p.dot(ba) / ba.dot(ba)).clamp(0.0, r);
    (p - ba * h).length() * (p.y * ba.x - p.x * ba.y).signum()
}

/// Fondu d'une forme vers la suivante puis retour (aller-retour).
pub struct Morph {
    phase: f32,
    rate: f32,
    size: f32,
    spin: f32,
    angle: f32,
}

impl Default for Morph {
    fn default() -> Self {
        Self {
            phase: 0.0,
            rate: 0.6,
            size: 0.6,
            spin: 0.3,
            angle: 0.0,
        }
    }
}

impl Morph {
    /// Facteur de mélange ∈ [0, 1] : 0 = forme de départ, 1 = forme suivante.
    #[must_use]
    pub fn blend(&self) -> f32 {
        0.5 - 0.5 * self.phase.cos()
    }
}

impl Animation for Morph {
    fn name(&self) -> &'static str {
        "morph"
    }

    fn setup(&mut self, _width: u32, _height: u32) {}

    fn update(&mut self, dt: f32, scene: &SceneConfig) {
        let step = dt * scene.speed;
        self.phase = (self.phase + step * self.rate) % std::f32::consts::TAU;
        self.angle = (self.angle + step * self.spin) % std::f32::consts::TAU;
    }

    fn render(&mut self, frame: &mut FrameBuffer, scene: &SceneConfig) {
        let from = scene.shape;
        let to = scene.shape.next();
        let t = self.blend();
        let size = self.size;
        let (sin_a, cos_a) = self.angle.sin_cos();
        let edge = 2.0 / frame.height.max(1) as f32;

        fill_field(frame, scene.color, |u, v| {
            // Repère y vers le haut, rotation lente.
            let p = Vec2::new(u * cos_a - v * sin_a, -(u * sin_a + v * cos_a));
            let d = shape_sdf(from, p, size) * (1.0 - t) + shape_sdf(to, p, size) * t;
            let fill = smoothstep(edge, -edge, d);
            let glow = (-d.max(0.0) * 6.0).exp() * 0.35;
            fill.max(glow)
        });
    }

    fn randomize(&mut self, rng: &mut dyn RngCore) {
        self.rate = rng.random_range(0.2..1.5);
        self.size = rng.random_range(0.4..0.8);
        self.spin = rng.random_range(-0.8..0.8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn every_shape_contains_its_center() {
        for shape in ShapeKind::ALL {
            assert!(shape_sdf(shape, Vec2::ZERO, 0.6) < 0.0, "{}", shape.name());
            assert!(shape_sdf(shape, Vec2::new(2.0, 2.0), 0.6) > 0.0, "{}", shape.name());
        }
    }

    #[test]
    fn circle_distance_is_exact() {
        let d = shape_sdf(ShapeKind::Circle, Vec2::new(1.0, 0.0), 0.5);
        assert!((d - 0.5).abs() < 1e-6);
    }

    #[test]
    fn blend_ping_pongs() {
        let mut morph = Morph::default();
        assert!(morph.blend().abs() < 1e-6);
        morph.phase = std::f32::consts::PI;
        assert!((morph.blend() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn center_is_lit_and_corner_dark() {
        let mut morph = Morph::default();
        let mut fb = FrameBuffer::new(40, 40);
        morph.render(&mut fb, &SceneConfig::default());
        assert_eq!(fb.pixel(20, 20).0, 255);
        assert!(fb.pixel(0, 0).0 < 40);
    }

    #[test]
    fn randomize_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut morph = Morph::default();
        for _ in 0..20 {
            morph.randomize(&mut rng);
            assert!((0.4..0.8).contains(&morph.size));
            assert!((0.2..1.5).contains(&morph.rate));
        }
    }
}
