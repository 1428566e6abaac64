use glam::{Mat3, Vec3};
use rand::{Rng, RngCore};
use sa_core::config::SceneConfig;
use sa_core::frame::FrameBuffer;

use super::Animation;
use super::canvas::{clear, shade};

const MAJOR_RADIUS: f32 = 1.0;
const VIEW_DISTANCE: f32 = 4.0;
/// Projection scale: the torus spans roughly 80 % of the frame height.
const PROJECTION: f32 = 2.2;

/// Tore en rotation, éclairage Lambert, z-buffer par pixel.
pub struct Torus {
    angle_a: f32,
    angle_b: f32,
    spin_a: f32,
    spin_b: f32,
    minor_radius: f32,
    light: Vec3,
    zbuf: Vec<f32>,
}

impl Default for Torus {
    fn default() -> Self {
        Self {
            angle_a: 0.6,
            angle_b: 0.0,
            spin_a: 1.0,
            spin_b: 0.5,
            minor_radius: 0.45,
            light: Vec3::new(0.0, -1.0, -1.0).normalize(),
            zbuf: Vec::new(),
        }
    }
}

impl Torus {
    fn rotation(&self) -> Mat3 {
        Mat3::from_rotation_z(self.angle_b) * Mat3::from_rotation_x(self.angle_a)
    }
}

impl Animation for Torus {
    fn name(&self) -> &'static str {
        "torus"
    }

    fn setup(&mut self, width: u32, height: u32) {
        self.zbuf = vec![0.0; width as usize * height as usize];
    }

    fn update(&mut self, dt: f32, scene: &SceneConfig) {
        let step = dt * scene.speed;
        self.angle_a = (self.angle_a + step * self.spin_a) % std::f32::consts::TAU;
        self.angle_b = (self.angle_b + step * self.spin_b) % std::f32::consts::TAU;
    }

    fn render(&mut self, frame: &mut FrameBuffer, scene: &SceneConfig) {
        clear(frame);
        let (w, h) = (frame.width, frame.height);
        if w == 0 || h == 0 {
            return;
        }
        let len = w as usize * h as usize;
        if self.zbuf.len() != len {
            self.zbuf.resize(len, 0.0);
        }
        self.zbuf.fill(0.0);

        let rot = self.rotation();
        let half_w = w as f32 * 0.5;
        let half_h = h as f32 * 0.5;
        // Densité d'échantillonnage suffisante pour ne pas laisser de trous.
        let theta_steps = (h.max(w) as usize * 2).clamp(48, 720);
        let phi_steps = (theta_steps / 2).max(24);

        for i in 0..theta_steps {
            let theta = i as f32 / theta_steps as f32 * std::f32::consts::TAU;
            let (st, ct) = theta.sin_cos();
            for j in 0..phi_steps {
                let phi = j as f32 / phi_steps as f32 * std::f32::consts::TAU;
                let (sp, cp) = phi.sin_cos();

                let ring = MAJOR_RADIUS + self.minor_radius * ct;
                let pos = rot * Vec3::new(ring * cp, self.minor_radius * st, ring * sp);
                let normal = rot * Vec3::new(ct * cp, st, ct * sp);

                let z = pos.z + VIEW_DISTANCE;
                if z <= 0.0 {
                    continue;
                }
                let ooz = 1.0 / z;
                let x = (pos.x * PROJECTION * ooz * half_h + half_w).floor();
                let y = (pos.y * PROJECTION * ooz * half_h + half_h).floor();
                if x < 0.0 || y < 0.0 || x >= w as f32 || y >= h as f32 {
                    continue;
                }

                let idx = y as usize * w as usize + x as usize;
                if ooz > self.zbuf[idx] {
                    self.zbuf[idx] = ooz;
                    let lambert = (-normal.dot(self.light)).max(0.0);
                    let (r, g, b, a) = shade(scene.color, 0.08 + 0.92 * lambert);
                    frame.set_pixel(x as u32, y as u32, (r, g, b, a));
                }
            }
        }
    }

    fn cleanup(&mut self) {
        self.zbuf = Vec::new();
    }

    fn randomize(&mut self, rng: &mut dyn RngCore) {
        self.spin_a = rng.random_range(0.4..1.6);
        self.spin_b = rng.random_range(0.1..1.0);
        self.minor_radius = rng.random_range(0.3..0.6);
        self.angle_a = rng.random_range(0.0..std::f32::consts::TAU);
    }
}
