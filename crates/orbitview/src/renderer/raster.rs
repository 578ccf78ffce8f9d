//! Depth-tested software rasterizer.
//!
//! `put_pixel` is the only compositing primitive: a write lands only if its
//! depth is strictly nearer than what the pixel already holds. Lines and
//! spheres are built on top of it, so draw order never affects occlusion.

use glam::Vec3;

use super::camera::OrbitCamera;
use super::color::Color;
use super::projector::{Projection, Projector, NEAR_CLIP};
use crate::api::error::ViewerError;

/// Depth value of a cleared pixel.
pub const FAR_DEPTH: f32 = 1.0e9;

/// Minimum subdivision count for 3D lines.
pub const MIN_LINE_SEGMENTS: usize = 8;

/// Discs smaller than this (pixels) are not rasterized.
pub const MIN_SPHERE_RADIUS_PX: f32 = 0.75;

const AMBIENT: f32 = 0.18;
const DIFFUSE: f32 = 0.82;

/// Upper bound on DDA steps for one 2D segment. Segments whose endpoints
/// project far off-screen are walked sparsely instead of pixel by pixel.
const MAX_LINE_STEPS: f32 = 16_384.0;

/// Color and depth planes for one frame, sized exactly to the surface.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
    depth: Vec<f32>,
}

impl Default for Framebuffer {
    /// Zero-sized buffer, before the first surface size is known.
    fn default() -> Self {
        Self { width: 0, height: 0, pixels: Vec::new(), depth: Vec::new() }
    }
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Result<Self, ViewerError> {
        let (pixels, depth) = Self::allocate(width, height)?;
        Ok(Self { width, height, pixels, depth })
    }

    fn allocate(width: u32, height: u32) -> Result<(Vec<u32>, Vec<f32>), ViewerError> {
        let count = (width as usize)
            .checked_mul(height as usize)
            .ok_or(ViewerError::BufferAllocation { pixels: usize::MAX })?;
        let mut pixels = Vec::new();
        let mut depth = Vec::new();
        pixels
            .try_reserve_exact(count)
            .map_err(|_| ViewerError::BufferAllocation { pixels: count })?;
        depth
            .try_reserve_exact(count)
            .map_err(|_| ViewerError::BufferAllocation { pixels: count })?;
        pixels.resize(count, 0xFF00_0000);
        depth.resize(count, FAR_DEPTH);
        Ok((pixels, depth))
    }

    /// Reallocate both planes for a new surface size.
    /// On failure the previous buffers are kept untouched.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), ViewerError> {
        let (pixels, depth) = Self::allocate(width, height)?;
        self.width = width;
        self.height = height;
        self.pixels = pixels;
        self.depth = depth;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes.
    pub fn stride(&self) -> usize {
        self.width as usize * 4
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixel plane as raw bytes (native-endian ARGB32).
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        self.index(x as i32, y as i32).map(|i| self.pixels[i])
    }

    pub fn depth_at(&self, x: u32, y: u32) -> Option<f32> {
        self.index(x as i32, y as i32).map(|i| self.depth[i])
    }

    /// Fill color with `background` and depth with `FAR_DEPTH`.
    pub fn clear(&mut self, background: u32) {
        self.pixels.fill(background);
        self.depth.fill(FAR_DEPTH);
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Depth-tested write. Returns whether the pixel was updated.
    #[inline]
    pub fn put_pixel(&mut self, x: i32, y: i32, depth: f32, color: Color, intensity: f32) -> bool {
        let Some(idx) = self.index(x, y) else {
            return false;
        };
        if depth < self.depth[idx] {
            self.depth[idx] = depth;
            self.pixels[idx] = color.to_argb(intensity);
            true
        } else {
            false
        }
    }

    /// Screen-space DDA line with linearly interpolated depth.
    pub fn draw_line_2d(&mut self, a: Projection, b: Projection, color: Color, intensity: f32) {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let steps = dx.abs().max(dy.abs()).ceil();
        if !steps.is_finite() {
            return;
        }
        let steps = steps.clamp(1.0, MAX_LINE_STEPS);
        let n = steps as u32;
        for i in 0..=n {
            let t = i as f32 / steps;
            let x = a.x + dx * t;
            let y = a.y + dy * t;
            let z = a.depth + (b.depth - a.depth) * t;
            self.put_pixel(x.round() as i32, y.round() as i32, z, color, intensity);
        }
    }

    /// World-space line, subdivided so perspective and near-clip rejection
    /// are handled per step. A rejected step breaks the polyline.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_line_3d(
        &mut self,
        projector: &Projector,
        camera: &OrbitCamera,
        a: Vec3,
        b: Vec3,
        color: Color,
        intensity: f32,
        segments: usize,
    ) {
        let segments = segments.max(MIN_LINE_SEGMENTS);
        let mut prev: Option<Projection> = None;
        for i in 0..=segments {
            let t = i as f32 / segments as f32;
            let cur = projector.project(a.lerp(b, t), camera);
            if let (Some(p0), Some(p1)) = (prev, cur) {
                self.draw_line_2d(p0, p1, color, intensity);
            }
            prev = cur;
        }
    }

    /// Analytic shaded sphere. Each covered pixel reconstructs its surface
    /// normal from the disc offset; no tessellation.
    /// Returns the number of pixels written.
    pub fn draw_sphere(
        &mut self,
        projector: &Projector,
        camera: &OrbitCamera,
        center: Vec3,
        radius: f32,
        color: Color,
        light_dir: Vec3,
    ) -> usize {
        let Some(c) = projector.project(center, camera) else {
            return 0;
        };
        let r = projector.focal() * radius / c.depth.max(NEAR_CLIP);
        if !r.is_finite() || r < MIN_SPHERE_RADIUS_PX {
            return 0;
        }
        if self.width == 0 || self.height == 0 {
            return 0;
        }

        let x0 = (c.x - r).floor().max(0.0) as i32;
        let y0 = (c.y - r).floor().max(0.0) as i32;
        let x1 = (c.x + r).ceil().min(self.width as f32 - 1.0) as i32;
        let y1 = (c.y + r).ceil().min(self.height as f32 - 1.0) as i32;
        let inv_r = 1.0 / r;

        let mut written = 0;
        for py in y0..=y1 {
            let dy = (py as f32 - c.y) * inv_r;
            for px in x0..=x1 {
                let dx = (px as f32 - c.x) * inv_r;
                let d2 = dx * dx + dy * dy;
                if d2 > 1.0 {
                    continue;
                }
                let nz = (1.0 - d2).max(0.0).sqrt();
                // screen y grows downward; the visible hemisphere faces the eye
                let normal = camera.right * dx - camera.up * dy - camera.forward * nz;
                let diffuse = normal.dot(light_dir).clamp(0.0, 1.0);
                let depth = c.depth - nz * radius;
                if self.put_pixel(px, py, depth, color, AMBIENT + DIFFUSE * diffuse) {
                    written += 1;
                }
            }
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::Rng;
    use crate::renderer::projector::tests::camera_at_origin;

    const RED: Color = Color::new(255, 0, 0);
    const BLUE: Color = Color::new(0, 0, 255);

    #[test]
    fn new_buffer_is_far() {
        let fb = Framebuffer::new(4, 3).unwrap();
        assert_eq!(fb.pixels().len(), 12);
        assert_eq!(fb.depth_at(3, 2), Some(FAR_DEPTH));
        assert_eq!(fb.stride(), 16);
        assert_eq!(fb.as_bytes().len(), 48);
    }

    #[test]
    fn put_pixel_respects_depth() {
        let mut fb = Framebuffer::new(8, 8).unwrap();
        assert!(fb.put_pixel(2, 2, 5.0, RED, 1.0));
        assert!(!fb.put_pixel(2, 2, 8.0, BLUE, 1.0));
        assert!(!fb.put_pixel(2, 2, 5.0, BLUE, 1.0));
        assert_eq!(fb.pixel(2, 2), Some(RED.to_argb(1.0)));
        assert!(fb.put_pixel(2, 2, 1.0, BLUE, 1.0));
        assert_eq!(fb.pixel(2, 2), Some(BLUE.to_argb(1.0)));
        assert!(!fb.put_pixel(2, 2, f32::NAN, RED, 1.0));
    }

    #[test]
    fn put_pixel_bounds() {
        let mut fb = Framebuffer::new(8, 8).unwrap();
        assert!(!fb.put_pixel(-1, 0, 1.0, RED, 1.0));
        assert!(!fb.put_pixel(0, 8, 1.0, RED, 1.0));
        assert!(!fb.put_pixel(8, 0, 1.0, RED, 1.0));
        assert!(fb.put_pixel(7, 7, 1.0, RED, 1.0));
    }

    #[test]
    fn depth_monotonic_under_random_writes() {
        let mut fb = Framebuffer::new(16, 16).unwrap();
        let mut accepted: Vec<Vec<f32>> = vec![Vec::new(); 256];
        let mut rng = Rng::new(2024);
        for _ in 0..5000 {
            let x = rng.next_int(16) as i32;
            let y = rng.next_int(16) as i32;
            let z = rng.range_f32(0.1, 100.0);
            if fb.put_pixel(x, y, z, RED, 1.0) {
                let history = &mut accepted[(y * 16 + x) as usize];
                assert!(history.iter().all(|&prev| z < prev));
                history.push(z);
            }
            assert!(fb.depth_at(x as u32, y as u32).unwrap() <= z);
        }
    }

    #[test]
    fn clear_resets_both_planes() {
        let mut fb = Framebuffer::new(4, 4).unwrap();
        fb.put_pixel(1, 1, 2.0, RED, 1.0);
        fb.clear(0xFF11_2233);
        assert_eq!(fb.pixel(1, 1), Some(0xFF11_2233));
        assert_eq!(fb.depth_at(1, 1), Some(FAR_DEPTH));
    }

    #[test]
    fn resize_is_exact() {
        let mut fb = Framebuffer::new(4, 4).unwrap();
        fb.resize(10, 3).unwrap();
        assert_eq!((fb.width(), fb.height()), (10, 3));
        assert_eq!(fb.pixels().len(), 30);
    }

    #[test]
    fn crossing_lines_nearer_wins_in_any_order() {
        let proj = Projector::with_focal(800, 600, 720.0);
        let cam = camera_at_origin();
        let near = (Vec3::new(-1.0, 0.0, 5.0), Vec3::new(1.0, 0.0, 5.0));
        let far = (Vec3::new(0.0, -1.0, 8.0), Vec3::new(0.0, 1.0, 8.0));

        for near_first in [true, false] {
            let mut fb = Framebuffer::new(800, 600).unwrap();
            if near_first {
                fb.draw_line_3d(&proj, &cam, near.0, near.1, RED, 1.0, 8);
                fb.draw_line_3d(&proj, &cam, far.0, far.1, BLUE, 1.0, 8);
            } else {
                fb.draw_line_3d(&proj, &cam, far.0, far.1, BLUE, 1.0, 8);
                fb.draw_line_3d(&proj, &cam, near.0, near.1, RED, 1.0, 8);
            }
            assert_eq!(fb.pixel(400, 300), Some(RED.to_argb(1.0)));
            assert!((fb.depth_at(400, 300).unwrap() - 5.0).abs() < 1e-4);
            // the far line is still visible away from the crossing
            assert_eq!(fb.pixel(400, 250), Some(BLUE.to_argb(1.0)));
        }
    }

    #[test]
    fn line_behind_camera_breaks_instead_of_wrapping() {
        let proj = Projector::with_focal(800, 600, 720.0);
        let cam = camera_at_origin();
        let mut fb = Framebuffer::new(800, 600).unwrap();
        // from in front of the eye to behind it
        fb.draw_line_3d(&proj, &cam, Vec3::new(0.5, 0.0, 4.0), Vec3::new(0.5, 0.0, -4.0), RED, 1.0, 16);
        // nothing projected from behind the camera may land left of center
        for x in 0..400 {
            assert_eq!(fb.depth_at(x, 300), Some(FAR_DEPTH), "x = {x}");
        }
    }

    #[test]
    fn line_entirely_behind_draws_nothing() {
        let proj = Projector::new(320, 240);
        let cam = camera_at_origin();
        let mut fb = Framebuffer::new(320, 240).unwrap();
        fb.draw_line_3d(&proj, &cam, Vec3::new(-1.0, 0.0, -2.0), Vec3::new(1.0, 0.0, -3.0), RED, 1.0, 8);
        assert!(fb.pixels().iter().all(|&p| p == 0xFF00_0000));
    }

    #[test]
    fn sphere_center_is_nearest_point() {
        let proj = Projector::with_focal(200, 200, 200.0);
        let cam = camera_at_origin();
        let mut fb = Framebuffer::new(200, 200).unwrap();
        let written = fb.draw_sphere(&proj, &cam, Vec3::new(0.0, 0.0, 10.0), 1.0, RED, -Vec3::Z);
        assert!(written > 0);
        // screen radius 20px: center pixel depth = 10 - 1
        assert!((fb.depth_at(100, 100).unwrap() - 9.0).abs() < 1e-4);
        // rim is farther than the center
        assert!(fb.depth_at(118, 100).unwrap() > 9.0);
        // outside the disc untouched
        assert_eq!(fb.depth_at(125, 100), Some(FAR_DEPTH));
    }

    #[test]
    fn sphere_lit_from_front_is_brightest_at_center() {
        let proj = Projector::with_focal(200, 200, 200.0);
        let cam = camera_at_origin();
        let mut fb = Framebuffer::new(200, 200).unwrap();
        fb.draw_sphere(&proj, &cam, Vec3::new(0.0, 0.0, 10.0), 1.0, Color::WHITE, -Vec3::Z);
        let center = fb.pixel(100, 100).unwrap() & 0xFF;
        let edge = fb.pixel(119, 100).unwrap() & 0xFF;
        assert_eq!(center, 255);
        assert!(edge < center);
    }

    #[test]
    fn sphere_backlit_gets_ambient_only() {
        let proj = Projector::with_focal(200, 200, 200.0);
        let cam = camera_at_origin();
        let mut fb = Framebuffer::new(200, 200).unwrap();
        fb.draw_sphere(&proj, &cam, Vec3::new(0.0, 0.0, 10.0), 1.0, Color::WHITE, Vec3::Z);
        let center = fb.pixel(100, 100).unwrap() & 0xFF;
        assert_eq!(center, (255.0f32 * AMBIENT).round() as u32);
    }

    #[test]
    fn tiny_or_clipped_spheres_are_skipped() {
        let proj = Projector::with_focal(200, 200, 200.0);
        let cam = camera_at_origin();
        let mut fb = Framebuffer::new(200, 200).unwrap();
        // 200 * 0.01 / 10 = 0.2px
        assert_eq!(fb.draw_sphere(&proj, &cam, Vec3::new(0.0, 0.0, 10.0), 0.01, RED, Vec3::Z), 0);
        assert_eq!(fb.draw_sphere(&proj, &cam, Vec3::new(0.0, 0.0, -10.0), 1.0, RED, Vec3::Z), 0);
    }

    #[test]
    fn near_sphere_occludes_far_sphere() {
        let proj = Projector::with_focal(200, 200, 200.0);
        let cam = camera_at_origin();
        let mut fb = Framebuffer::new(200, 200).unwrap();
        fb.draw_sphere(&proj, &cam, Vec3::new(0.0, 0.0, 6.0), 1.0, RED, -Vec3::Z);
        fb.draw_sphere(&proj, &cam, Vec3::new(0.0, 0.0, 12.0), 3.0, BLUE, -Vec3::Z);
        assert_eq!(fb.pixel(100, 100), Some(RED.to_argb(1.0)));
    }
}
