//! Frame orchestration: input → simulation → camera → raster → present.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::error::ViewerError;
use super::types::{BodyId, CameraSnapshot, ViewerStatus};
use crate::core::sim::{self, BodyPositions, SimulationClock};
use crate::core::stars::StarField;
use crate::core::time::ElapsedClock;
use crate::input::gesture::{GestureConfig, GestureController, GestureRequest, PickScene};
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::camera::OrbitCamera;
use crate::renderer::color::Color;
use crate::renderer::projector::Projector;
use crate::renderer::raster::{Framebuffer, FAR_DEPTH, MIN_LINE_SEGMENTS};
use crate::renderer::traits::{FrameView, Presenter, Surface};

/// Stars sit in front of the cleared depth but behind any scene geometry.
const STAR_DEPTH: f32 = FAR_DEPTH * 0.5;
const STAR_COLOR: Color = Color::new(222, 228, 255);
/// Intensity of the four neighbours of a star's center pixel.
const STAR_ARM: f32 = 0.45;

const ORBIT_INTENSITY: f32 = 0.32;
const MARKER_COLOR: Color = Color::new(255, 244, 160);
/// Crosshair half-length as a multiple of the followed body's radius.
const MARKER_SCALE: f32 = 1.8;

/// Viewer configuration, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Clear color (RGB).
    pub background: [u8; 3],
    pub star_count: usize,
    pub star_seed: u64,
    /// Samples per orbit ring (at least 8).
    pub orbit_segments: usize,
    pub gestures: GestureConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            background: [4, 6, 14],
            star_count: 220,
            star_seed: 0x5EED_0BB1,
            orbit_segments: 96,
            gestures: GestureConfig::default(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json(json: &str) -> Result<Self, ViewerError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Owns the whole scene and drives one frame per `iterate`.
///
/// Before `start` and after a quit request, events are dropped and
/// `iterate` does nothing.
pub struct Viewer {
    config: ViewerConfig,
    status: ViewerStatus,
    backend: &'static str,
    framebuffer: Framebuffer,
    projector: Projector,
    camera: OrbitCamera,
    gestures: GestureController,
    sim: SimulationClock,
    bodies: BodyPositions,
    stars: StarField,
    clock: ElapsedClock,
    input: InputQueue,
    frame: u64,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Self {
        let stars = StarField::generate(config.star_seed, config.star_count);
        let gestures = GestureController::new(config.gestures.clone());
        let sim = SimulationClock::new();
        let bodies = sim.positions(0.0);
        Self {
            config,
            status: ViewerStatus::Idle,
            backend: "none",
            framebuffer: Framebuffer::default(),
            projector: Projector::new(0, 0),
            camera: OrbitCamera::new(),
            gestures,
            sim,
            bodies,
            stars,
            clock: ElapsedClock::new(),
            input: InputQueue::new(),
            frame: 0,
        }
    }

    /// Replace the configuration. Only allowed before `start`.
    pub fn configure(&mut self, config: ViewerConfig) -> Result<(), ViewerError> {
        if self.status != ViewerStatus::Idle {
            return Err(ViewerError::AlreadyStarted);
        }
        *self = Self::new(config);
        Ok(())
    }

    /// Size the buffers to the surface and enter the running state.
    pub fn start<S: Surface + ?Sized>(&mut self, surface: &S) -> Result<(), ViewerError> {
        if self.status != ViewerStatus::Idle {
            return Err(ViewerError::AlreadyStarted);
        }
        let (width, height) = surface.size();
        if width == 0 || height == 0 {
            return Err(ViewerError::SurfaceUnavailable { width, height });
        }

        self.framebuffer.resize(width, height)?;
        self.projector.resize(width, height);
        self.bodies = self.sim.positions(self.clock.seconds());
        self.camera.reset_view(self.bodies.get(BodyId::Sun));
        self.camera.update_transform(&self.bodies);
        self.backend = surface.backend();
        self.status = ViewerStatus::Running;

        log::info!(
            "orbitview started: {}x{} on {} backend, {} stars",
            width,
            height,
            self.backend,
            self.stars.len()
        );
        Ok(())
    }

    /// Queue an event for the next frame.
    pub fn push_event(&mut self, event: InputEvent) {
        if self.status.is_running() {
            self.input.push(event);
        }
    }

    /// Flip to the quit state. Observed by the next `iterate`.
    pub fn request_quit(&mut self) {
        if self.status.is_running() {
            log::info!("quit requested after {} frames", self.frame);
            self.status = ViewerStatus::QuitRequested;
            self.input.clear();
        }
    }

    pub fn status(&self) -> ViewerStatus {
        self.status
    }

    /// Run one frame at `elapsed_nanos` since the host's epoch and hand the
    /// result to `presenter`.
    pub fn iterate<P: Presenter + ?Sized>(&mut self, elapsed_nanos: u64, presenter: &mut P) -> ViewerStatus {
        if !self.status.is_running() {
            return self.status;
        }
        let t = self.clock.advance(elapsed_nanos);

        self.apply_input();
        if !self.status.is_running() {
            return self.status;
        }

        self.bodies = self.sim.positions(t);
        self.camera.update_transform(&self.bodies);
        self.render(t as f32);

        presenter.present(FrameView {
            width: self.framebuffer.width(),
            height: self.framebuffer.height(),
            pixels: self.framebuffer.pixels(),
            stride: self.framebuffer.stride(),
        });
        self.frame += 1;
        self.status
    }

    /// Poll `surface`, run a frame on it, and close it once quit is observed.
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S, elapsed_nanos: u64) -> ViewerStatus {
        if self.status.is_running() {
            surface.poll(&mut self.input);
        }
        let status = self.iterate(elapsed_nanos, surface);
        if status == ViewerStatus::QuitRequested {
            surface.close();
        }
        status
    }

    fn apply_input(&mut self) {
        for event in self.input.drain() {
            if let InputEvent::Resize { width, height } = event {
                self.resize(width, height);
                continue;
            }
            let scene = PickScene {
                projector: &self.projector,
                bodies: &self.bodies,
            };
            if let Some(GestureRequest::Quit) = self.gestures.handle(&event, &mut self.camera, scene) {
                self.request_quit();
                return;
            }
        }
    }

    fn resize(&mut self, width: i32, height: i32) {
        if width <= 0 || height <= 0 {
            log::warn!("ignoring resize to {}x{}", width, height);
            return;
        }
        let (width, height) = (width as u32, height as u32);
        if width == self.framebuffer.width() && height == self.framebuffer.height() {
            return;
        }
        match self.framebuffer.resize(width, height) {
            Ok(()) => {
                self.projector.resize(width, height);
                log::info!("resized to {}x{} (focal {:.1})", width, height, self.projector.focal());
            }
            Err(e) => log::error!("{}; keeping {}x{}", e, self.framebuffer.width(), self.framebuffer.height()),
        }
    }

    fn render(&mut self, t: f32) {
        let background = Color::from_array(self.config.background).to_argb(1.0);
        self.framebuffer.clear(background);
        self.draw_stars(t);
        self.draw_orbits();
        self.draw_bodies();
        if let Some(body) = self.camera.follow {
            self.draw_marker(body);
        }
    }

    fn draw_stars(&mut self, t: f32) {
        let w = self.framebuffer.width() as f32;
        let h = self.framebuffer.height() as f32;
        for star in self.stars.stars() {
            let x = (star.x * w) as i32;
            let y = (star.y * h) as i32;
            let glow = star.twinkle(t);
            let fb = &mut self.framebuffer;
            fb.put_pixel(x, y, STAR_DEPTH, STAR_COLOR, glow);
            for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                fb.put_pixel(x + dx, y + dy, STAR_DEPTH, STAR_COLOR, glow * STAR_ARM);
            }
        }
    }

    fn draw_orbits(&mut self) {
        for body in [BodyId::PlanetA, BodyId::PlanetB, BodyId::Moon] {
            let ring = self.sim.orbit_ring(body, &self.bodies, self.config.orbit_segments);
            let color = sim::visual(body).color.lerp(Color::WHITE, 0.25);
            for (i, &a) in ring.iter().enumerate() {
                let b = ring[(i + 1) % ring.len()];
                self.framebuffer.draw_line_3d(
                    &self.projector,
                    &self.camera,
                    a,
                    b,
                    color,
                    ORBIT_INTENSITY,
                    MIN_LINE_SEGMENTS,
                );
            }
        }
    }

    fn draw_bodies(&mut self) {
        let sun = self.bodies.get(BodyId::Sun);
        let toward_camera = -self.camera.forward;
        for (body, pos) in self.bodies.iter() {
            let visual = sim::visual(body);
            let light = match body {
                BodyId::Sun => toward_camera,
                _ => (sun - pos).try_normalize().unwrap_or(toward_camera),
            };
            self.framebuffer.draw_sphere(
                &self.projector,
                &self.camera,
                pos,
                visual.radius,
                visual.color,
                light,
            );
        }
    }

    /// Three-axis crosshair at the focus point.
    fn draw_marker(&mut self, body: BodyId) {
        let center = self.camera.target;
        let half = sim::visual(body).radius * MARKER_SCALE;
        for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            self.framebuffer.draw_line_3d(
                &self.projector,
                &self.camera,
                center - axis * half,
                center + axis * half,
                MARKER_COLOR,
                1.0,
                MIN_LINE_SEGMENTS,
            );
        }
    }

    pub fn snapshot(&self) -> CameraSnapshot {
        let cam = &self.camera;
        CameraSnapshot {
            yaw: cam.yaw,
            pitch: cam.pitch,
            distance: cam.distance,
            follow: cam.follow_wire() as f32,
            target: cam.target.to_array(),
            position: cam.position.to_array(),
            status: self.status.wire(),
            frame: self.frame as f32,
            width: self.framebuffer.width() as f32,
            height: self.framebuffer.height() as f32,
            reserved: [0.0; 2],
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn bodies(&self) -> &BodyPositions {
        &self.bodies
    }

    pub fn backend(&self) -> &'static str {
        self.backend
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}
