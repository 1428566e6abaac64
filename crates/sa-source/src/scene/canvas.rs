//! Petites primitives de dessin logiciel partagées par les scènes.
//!
//! Coordonnées normalisées : `v ∈ [-1, 1]` de haut en bas, `u ∈ [-aspect, aspect]`
//! de gauche à droite, pixels carrés.

use rayon::prelude::*;
use sa_core::frame::FrameBuffer;

/// Teinte `color` modulée par `intensity` ∈ [0, 1], alpha opaque.
#[inline(always)]
#[must_use]
pub fn shade(color: (u8, u8, u8), intensity: f32) -> (u8, u8, u8, u8) {
    let k = intensity.clamp(0.0, 1.0);
    (
        (f32::from(color.0) * k) as u8,
        (f32::from(color.1) * k) as u8,
        (f32::from(color.2) * k) as u8,
        255,
    )
}

/// Hermite smoothstep.
#[inline(always)]
#[must_use]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Width / height ratio of the frame (1.0 for an empty frame).
#[inline]
#[must_use]
pub fn aspect(frame: &FrameBuffer) -> f32 {
    if frame.height == 0 {
        1.0
    } else {
        frame.width as f32 / frame.height as f32
    }
}

/// Normalized coordinates → pixel coordinates (may be out of bounds).
#[inline(always)]
#[must_use]
pub fn to_pixel(frame: &FrameBuffer, u: f32, v: f32) -> (i64, i64) {
    let half_h = frame.height as f32 * 0.5;
    let x = u * half_h + frame.width as f32 * 0.5;
    let y = v * half_h + half_h;
    (x.floor() as i64, y.floor() as i64)
}

/// Evaluate `field(u, v)` for every pixel in parallel and shade the result.
///
/// `field` returns an intensity in [0, 1].
pub fn fill_field<F>(frame: &mut FrameBuffer, color: (u8, u8, u8), field: F)
where
    F: Fn(f32, f32) -> f32 + Sync,
{
    if frame.width == 0 || frame.height == 0 {
        return;
    }
    let w = frame.width;
    let half_w = w as f32 * 0.5;
    let half_h = frame.height as f32 * 0.5;
    let stride = w as usize * 4;

    frame
        .data
        .par_chunks_exact_mut(stride)
        .enumerate()
        .for_each(|(py, row)| {
            let v = (py as f32 + 0.5 - half_h) / half_h;
            for px in 0..w {
                let u = (px as f32 + 0.5 - half_w) / half_h;
                let (r, g, b, a) = shade(color, field(u, v));
                let idx = px as usize * 4;
                row[idx..idx + 4].copy_from_slice(&[r, g, b, a]);
            }
        });
}

/// Additive plot of one pixel (saturating), normalized coordinates.
#[inline]
pub fn add_point(frame: &mut FrameBuffer, u: f32, v: f32, color: (u8, u8, u8), intensity: f32) {
    let (x, y) = to_pixel(frame, u, v);
    add_pixel(frame, x, y, color, intensity);
}

/// Additive plot of one pixel (saturating), pixel coordinates.
#[inline]
pub fn add_pixel(frame: &mut FrameBuffer, x: i64, y: i64, color: (u8, u8, u8), intensity: f32) {
    if x < 0 || y < 0 || x >= i64::from(frame.width) || y >= i64::from(frame.height) {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    let (r, g, b, _) = frame.pixel(x, y);
    let (dr, dg, db, _) = shade(color, intensity);
    frame.set_pixel(
        x,
        y,
        (
            r.saturating_add(dr),
            g.saturating_add(dg),
            b.saturating_add(db),
            255,
        ),
    );
}

/// Soft additive disc of `radius` (normalized units) centered on (u, v).
pub fn splat(
    frame: &mut FrameBuffer,
    u: f32,
    v: f32,
    radius: f32,
    color: (u8, u8, u8),
    intensity: f32,
) {
    let half_h = frame.height as f32 * 0.5;
    let r_px = (radius * half_h).max(0.5);
    let (cx, cy) = to_pixel(frame, u, v);
    let reach = r_px.ceil() as i64;
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let d = ((dx * dx + dy * dy) as f32).sqrt() / r_px;
            if d <= 1.0 {
                let falloff = 1.0 - d * d;
                add_pixel(frame, cx + dx, cy + dy, color, intensity * falloff);
            }
        }
    }
}

/// Opaque black background.
pub fn clear(frame: &mut FrameBuffer) {
    frame.fill((0, 0, 0, 255));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shade_scales_and_clamps() {
        assert_eq!(shade((200, 100, 50), 0.5), (100, 50, 25, 255));
        assert_eq!(shade((200, 100, 50), 2.0), (200, 100, 50, 255));
        assert_eq!(shade((200, 100, 50), -1.0), (0, 0, 0, 255));
    }

    #[test]
    fn center_maps_to_middle_pixel() {
        let fb = FrameBuffer::new(40, 20);
        assert_eq!(to_pixel(&fb, 0.0, 0.0), (20, 10));
        assert_eq!(to_pixel(&fb, 0.0, -1.0), (20, 0));
    }

    #[test]
    fn fill_field_is_opaque_everywhere() {
        let mut fb = FrameBuffer::new(9, 5);
        fill_field(&mut fb, (255, 255, 255), |u, _| if u < 0.0 { 0.0 } else { 1.0 });
        assert!(fb.data.chunks_exact(4).all(|px| px[3] == 255));
        assert_eq!(fb.pixel(0, 2), (0, 0, 0, 255));
        assert_eq!(fb.pixel(8, 2), (255, 255, 255, 255));
    }

    #[test]
    fn add_pixel_saturates_and_ignores_outside() {
        let mut fb = FrameBuffer::new(2, 2);
        clear(&mut fb);
        add_pixel(&mut fb, 1, 1, (200, 200, 200), 1.0);
        add_pixel(&mut fb, 1, 1, (200, 200, 200), 1.0);
        add_pixel(&mut fb, -1, 5, (200, 200, 200), 1.0);
        assert_eq!(fb.pixel(1, 1), (255, 255, 255, 255));
        assert_eq!(fb.pixel(0, 0), (0, 0, 0, 255));
    }

    #[test]
    fn splat_lights_its_center() {
        let mut fb = FrameBuffer::new(32, 32);
        clear(&mut fb);
        splat(&mut fb, 0.0, 0.0, 0.2, (255, 255, 255), 1.0);
        assert!(fb.pixel(16, 16).0 > 200);
        assert_eq!(fb.pixel(0, 0).0, 0);
    }
}
