use glam::Vec3;

use crate::api::types::BodyId;
use crate::core::sim::BodyPositions;

/// Orbit camera parameterized by yaw, pitch, distance and a look-at target.
///
/// `forward`, `right`, `up` and `position` are derived by `update_transform`;
/// everything that projects or rasterizes reads them directly.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    /// Rotation around world Y (radians).
    pub yaw: f32,
    /// Elevation (radians), positive looks down onto the orbital plane.
    pub pitch: f32,
    pub distance: f32,
    /// Body whose position the target tracks each frame.
    pub follow: Option<BodyId>,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            forward: Vec3::Z,
            right: Vec3::X,
            up: Vec3::Y,
            yaw: 0.0,
            pitch: Self::DEFAULT_PITCH,
            distance: Self::DEFAULT_DISTANCE,
            follow: None,
        };
        camera.derive_basis();
        camera
    }
}

impl OrbitCamera {
    pub const PITCH_LIMIT: f32 = 1.45;
    pub const MIN_DISTANCE: f32 = 3.5;
    pub const MAX_DISTANCE: f32 = 70.0;
    pub const DEFAULT_PITCH: f32 = 0.18;
    pub const DEFAULT_DISTANCE: f32 = 18.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Per-frame update: track the follow target, clamp, derive basis and position.
    pub fn update_transform(&mut self, bodies: &BodyPositions) {
        if let Some(body) = self.follow {
            self.target = bodies.get(body);
        }
        self.clamp();
        self.derive_basis();
    }

    fn derive_basis(&mut self) {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.forward = Vec3::new(sy * cp, -sp, cy * cp).normalize_or_zero();
        let (right, up) = side_vectors(self.forward);
        self.right = right;
        self.up = up;
        self.position = self.target - self.forward * self.distance;
    }

    pub fn clamp(&mut self) {
        if !self.pitch.is_finite() {
            self.pitch = Self::DEFAULT_PITCH;
        }
        if !self.distance.is_finite() {
            self.distance = Self::DEFAULT_DISTANCE;
        }
        self.pitch = self.pitch.clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
        self.distance = self.distance.clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
    }

    /// Add yaw/pitch deltas (radians). Pitch is clamped immediately.
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch += delta_pitch;
        self.clamp();
    }

    /// Multiply the orbit distance by `factor`, then clamp.
    /// A factor that overflowed to infinity or underflowed to zero saturates
    /// at the far or near limit; NaN is ignored.
    pub fn zoom_by(&mut self, factor: f32) {
        if factor.is_nan() {
            return;
        }
        if factor <= 0.0 {
            self.distance = Self::MIN_DISTANCE;
        } else {
            // an overflowed product lands on the far limit, not the default
            self.distance = (self.distance * factor).min(Self::MAX_DISTANCE);
        }
        self.clamp();
    }

    /// Back to the default framing around the sun.
    pub fn reset_view(&mut self, sun: Vec3) {
        self.yaw = 0.0;
        self.pitch = Self::DEFAULT_PITCH;
        self.distance = Self::DEFAULT_DISTANCE;
        self.follow = None;
        self.target = sun;
    }

    /// Select a follow target by wire id (0 = free camera).
    /// Out-of-range ids are ignored; returns whether the selection was applied.
    pub fn apply_follow_target(&mut self, id: u32, bodies: &BodyPositions) -> bool {
        if id == 0 {
            self.follow = None;
            return true;
        }
        match BodyId::from_wire(id) {
            Some(body) => {
                self.follow = Some(body);
                self.target = bodies.get(body);
                true
            }
            None => false,
        }
    }

    pub fn follow_wire(&self) -> u32 {
        self.follow.map_or(0, BodyId::wire)
    }
}

/// Right and up vectors completing a basis around `forward`.
/// Straight up or down leaves cross(Y, forward) degenerate; right falls back to +X.
fn side_vectors(forward: Vec3) -> (Vec3, Vec3) {
    let right = Vec3::Y.cross(forward).try_normalize().unwrap_or(Vec3::X);
    let up = forward.cross(right).normalize_or_zero();
    (right, up)
}
