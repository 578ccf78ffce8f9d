use glam::Vec3;

use super::camera::OrbitCamera;

/// Points at or closer than this camera-space depth are not projectable.
pub const NEAR_CLIP: f32 = 0.05;

/// Screen-space result of a projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub x: f32,
    pub y: f32,
    /// Camera-space z (distance along the view direction).
    pub depth: f32,
}

/// Perspective transform for a viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct Projector {
    width: u32,
    height: u32,
    focal: f32,
}

impl Projector {
    const MIN_FOCAL: f32 = 280.0;
    const FOCAL_SCALE: f32 = 0.95;

    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            focal: Self::focal_for(width, height),
        }
    }

    /// Projector with a fixed focal length (in pixels).
    pub fn with_focal(width: u32, height: u32, focal: f32) -> Self {
        Self { width, height, focal }
    }

    pub fn focal_for(width: u32, height: u32) -> f32 {
        (width.min(height) as f32 * Self::FOCAL_SCALE).max(Self::MIN_FOCAL)
    }

    /// Adopt a new viewport; focal length is recomputed.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.focal = Self::focal_for(width, height);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn focal(&self) -> f32 {
        self.focal
    }

    /// World point → screen. `None` if the point is at or behind the near plane.
    pub fn project(&self, world: Vec3, camera: &OrbitCamera) -> Option<Projection> {
        let rel = world - camera.position;
        let cam_z = rel.dot(camera.forward);
        if cam_z.is_nan() || cam_z <= NEAR_CLIP {
            return None;
        }
        let cam_x = rel.dot(camera.right);
        let cam_y = rel.dot(camera.up);
        let s = self.focal / cam_z;
        Some(Projection {
            x: self.width as f32 * 0.5 + cam_x * s,
            y: self.height as f32 * 0.5 - cam_y * s,
            depth: cam_z,
        })
    }

    /// On-screen radius (pixels) of a world-space radius at `depth`.
    pub fn screen_radius(&self, radius: f32, depth: f32) -> f32 {
        self.focal * radius / depth.max(NEAR_CLIP)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Camera at the origin looking down +Z with +X right and +Y up.
    pub(crate) fn camera_at_origin() -> OrbitCamera {
        let mut cam = OrbitCamera::new();
        cam.position = Vec3::ZERO;
        cam.target = Vec3::new(0.0, 0.0, cam.distance);
        cam.forward = Vec3::Z;
        cam.right = Vec3::X;
        cam.up = Vec3::Y;
        cam
    }

    #[test]
    fn point_ahead_lands_at_center() {
        let proj = Projector::with_focal(800, 600, 720.0);
        let p = proj.project(Vec3::new(0.0, 0.0, 10.0), &camera_at_origin()).unwrap();
        assert_eq!(p.x, 400.0);
        assert_eq!(p.y, 300.0);
        assert_eq!(p.depth, 10.0);
    }

    #[test]
    fn near_clip_boundary() {
        let proj = Projector::new(800, 600);
        let cam = camera_at_origin();
        assert!(proj.project(Vec3::new(0.0, 0.0, NEAR_CLIP), &cam).is_none());
        assert!(proj.project(Vec3::new(0.0, 0.0, 0.0), &cam).is_none());
        assert!(proj.project(Vec3::new(1.0, 1.0, -5.0), &cam).is_none());

        let p = proj.project(Vec3::new(0.0, 0.0, NEAR_CLIP + 1e-4), &cam);
        assert!(p.is_some());
        let p = p.unwrap();
        assert!(p.x.is_finite() && p.y.is_finite());
    }

    #[test]
    fn up_is_screen_up() {
        let proj = Projector::with_focal(800, 600, 720.0);
        let cam = camera_at_origin();
        let p = proj.project(Vec3::new(1.0, 1.0, 10.0), &cam).unwrap();
        assert!((p.x - 472.0).abs() < 1e-3);
        assert!((p.y - 228.0).abs() < 1e-3);
    }

    #[test]
    fn focal_follows_viewport() {
        assert!((Projector::focal_for(800, 600) - 570.0).abs() < 1e-3);
        assert_eq!(Projector::focal_for(100, 2000), 280.0);
        let mut proj = Projector::new(100, 100);
        proj.resize(2000, 1000);
        assert!((proj.focal() - 950.0).abs() < 1e-3);
        assert_eq!(proj.width(), 2000);
    }

    #[test]
    fn screen_radius_guards_small_depth() {
        let proj = Projector::with_focal(800, 600, 500.0);
        assert_eq!(proj.screen_radius(1.0, 10.0), 50.0);
        assert_eq!(proj.screen_radius(1.0, 0.0), 500.0 / NEAR_CLIP);
    }
}
