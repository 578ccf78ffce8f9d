//! Pointer and touch gesture recognition.
//!
//! Mouse and touch are independent channels and never rotate the camera at
//! the same time: a mouse drag cannot start while a finger is down, and touch
//! rotation is ignored while a mouse drag is active.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::queue::{InputEvent, Key, MouseButton};
use crate::api::types::BodyId;
use crate::core::sim::{self, BodyPositions};
use crate::renderer::camera::OrbitCamera;
use crate::renderer::projector::Projector;

/// Sensitivities and tap thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Yaw radians per pixel of horizontal mouse drag.
    pub mouse_yaw: f32,
    /// Pitch radians per pixel of vertical mouse drag.
    pub mouse_pitch: f32,
    pub touch_yaw: f32,
    pub touch_pitch: f32,
    /// Distance multiplier per wheel tick.
    pub wheel_base: f32,
    /// A tap must travel strictly less than this (pixels).
    pub tap_max_travel: f32,
    pub tap_max_duration_ms: u64,
    pub double_tap_interval_ms: u64,
    pub double_tap_max_distance: f32,
    /// Smallest pick radius (pixels) regardless of on-screen body size.
    pub min_pick_radius: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            mouse_yaw: 0.0070,
            mouse_pitch: 0.0050,
            touch_yaw: 0.0090,
            touch_pitch: 0.0065,
            wheel_base: 0.90,
            tap_max_travel: 16.0,
            tap_max_duration_ms: 350,
            double_tap_interval_ms: 450,
            double_tap_max_distance: 36.0,
            min_pick_radius: 6.0,
        }
    }
}

/// What a gesture asks of the frame loop beyond camera edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureRequest {
    Quit,
}

/// Read-only view of the scene used for picking.
#[derive(Clone, Copy)]
pub struct PickScene<'a> {
    pub projector: &'a Projector,
    pub bodies: &'a BodyPositions,
}

/// Body under `(px, py)`, nearest to the camera when several overlap.
pub fn pick_target(
    px: f32,
    py: f32,
    projector: &Projector,
    camera: &OrbitCamera,
    bodies: &BodyPositions,
    min_radius: f32,
) -> Option<BodyId> {
    let mut best: Option<(BodyId, f32)> = None;
    for (body, pos) in bodies.iter() {
        let Some(p) = projector.project(pos, camera) else {
            continue;
        };
        let radius = projector
            .screen_radius(sim::visual(body).radius, p.depth)
            .max(min_radius);
        let dx = px - p.x;
        let dy = py - p.y;
        if dx * dx + dy * dy > radius * radius {
            continue;
        }
        if best.map_or(true, |(_, depth)| p.depth < depth) {
            best = Some((body, p.depth));
        }
    }
    best.map(|(body, _)| body)
}

#[derive(Debug, Clone, Copy)]
struct Contact {
    id: u64,
    pos: Vec2,
}

/// Single-finger press that may still turn out to be a tap.
#[derive(Debug, Clone, Copy)]
struct Press {
    id: u64,
    pos: Vec2,
    time_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tap {
    pos: Vec2,
    time_ms: u64,
}

/// Turns raw input into camera edits, picks and resets.
#[derive(Debug, Clone)]
pub struct GestureController {
    config: GestureConfig,
    dragging: bool,
    last_mouse: Vec2,
    contacts: Vec<Contact>,
    /// Finger allowed to rotate; `None` while rotation is disabled.
    rotate_id: Option<u64>,
    pinching: bool,
    press: Option<Press>,
    last_tap: Option<Tap>,
}

impl GestureController {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            dragging: false,
            last_mouse: Vec2::ZERO,
            contacts: Vec::with_capacity(4),
            rotate_id: None,
            pinching: false,
            press: None,
            last_tap: None,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn rotation_enabled(&self) -> bool {
        self.rotate_id.is_some()
    }

    pub fn active_touches(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_pinching(&self) -> bool {
        self.pinching
    }

    pub fn has_pending_tap(&self) -> bool {
        self.last_tap.is_some()
    }

    /// Apply one event. Resize is the frame loop's business and is ignored here.
    pub fn handle(
        &mut self,
        event: &InputEvent,
        camera: &mut OrbitCamera,
        scene: PickScene<'_>,
    ) -> Option<GestureRequest> {
        match *event {
            InputEvent::MouseDown { button, x, y } => self.mouse_down(button, Vec2::new(x, y), camera, scene),
            InputEvent::MouseUp { button, .. } => {
                if button == MouseButton::Primary {
                    self.dragging = false;
                }
            }
            InputEvent::MouseMove { x, y } => self.mouse_move(Vec2::new(x, y), camera),
            InputEvent::Wheel { delta, flipped } => {
                let ticks = if flipped { -delta } else { delta };
                if ticks.is_finite() {
                    camera.zoom_by(self.config.wheel_base.powf(ticks));
                }
            }
            InputEvent::TouchDown { id, x, y, timestamp_ms } => {
                self.touch_down(id, to_pixels(x, y, scene.projector), timestamp_ms)
            }
            InputEvent::TouchMove { id, x, y, .. } => {
                self.touch_move(id, to_pixels(x, y, scene.projector), camera)
            }
            InputEvent::TouchUp { id, x, y, timestamp_ms } => {
                self.touch_up(id, to_pixels(x, y, scene.projector), timestamp_ms, camera, scene)
            }
            InputEvent::TouchCancel { id } => self.touch_cancel(id),
            InputEvent::PinchBegin => {
                self.pinching = true;
                self.rotate_id = None;
                self.press = None;
            }
            InputEvent::PinchUpdate { scale } => {
                if scale.is_finite() && scale > 0.0 {
                    camera.zoom_by(1.0 / scale);
                }
            }
            InputEvent::PinchEnd => {
                self.pinching = false;
                if let [only] = self.contacts.as_slice() {
                    self.rotate_id = Some(only.id);
                }
            }
            InputEvent::KeyDown { key, repeat } => {
                if !repeat {
                    return self.key_down(key, camera, scene);
                }
            }
            InputEvent::CloseRequested => return Some(GestureRequest::Quit),
            InputEvent::Resize { .. } => {}
        }
        None
    }

    fn mouse_down(&mut self, button: MouseButton, pos: Vec2, camera: &mut OrbitCamera, scene: PickScene<'_>) {
        match button {
            MouseButton::Primary => {
                if self.contacts.is_empty() {
                    self.dragging = true;
                    self.last_mouse = pos;
                }
            }
            MouseButton::Secondary => {
                if let Some(body) = self.pick(pos, camera, scene) {
                    self.follow(body, camera, scene);
                }
            }
            MouseButton::Middle => {}
        }
    }

    fn mouse_move(&mut self, pos: Vec2, camera: &mut OrbitCamera) {
        let delta = pos - self.last_mouse;
        self.last_mouse = pos;
        if self.dragging {
            camera.rotate(-delta.x * self.config.mouse_yaw, delta.y * self.config.mouse_pitch);
        }
    }

    fn touch_down(&mut self, id: u64, pos: Vec2, time_ms: u64) {
        self.contacts.retain(|c| c.id != id);
        self.contacts.push(Contact { id, pos });
        if self.contacts.len() == 1 && !self.pinching {
            self.rotate_id = Some(id);
            self.press = Some(Press { id, pos, time_ms });
        } else {
            // a second finger disables rotation until every finger lifts
            self.rotate_id = None;
            self.press = None;
        }
    }

    fn touch_move(&mut self, id: u64, pos: Vec2, camera: &mut OrbitCamera) {
        let single = self.contacts.len() == 1;
        let Some(contact) = self.contacts.iter_mut().find(|c| c.id == id) else {
            return;
        };
        let delta = pos - contact.pos;
        contact.pos = pos;
        if single && self.rotate_id == Some(id) && !self.dragging {
            camera.rotate(-delta.x * self.config.touch_yaw, delta.y * self.config.touch_pitch);
        }
    }

    fn touch_up(
        &mut self,
        id: u64,
        pos: Vec2,
        time_ms: u64,
        camera: &mut OrbitCamera,
        scene: PickScene<'_>,
    ) {
        let before = self.contacts.len();
        self.contacts.retain(|c| c.id != id);
        if self.contacts.len() == before {
            return;
        }
        if self.rotate_id == Some(id) {
            self.rotate_id = None;
        }
        if self.contacts.is_empty() {
            self.pinching = false;
        }
        if let Some(press) = self.press.take() {
            if press.id == id && self.contacts.is_empty() {
                self.finish_press(press, pos, time_ms, camera, scene);
            }
        }
    }

    fn touch_cancel(&mut self, id: u64) {
        self.contacts.retain(|c| c.id != id);
        if self.rotate_id == Some(id) {
            self.rotate_id = None;
        }
        if self.press.map_or(false, |p| p.id == id) {
            self.press = None;
        }
        if self.contacts.is_empty() {
            self.pinching = false;
        }
    }

    /// Classify a released press as tap, pick or double-tap.
    fn finish_press(
        &mut self,
        press: Press,
        pos: Vec2,
        time_ms: u64,
        camera: &mut OrbitCamera,
        scene: PickScene<'_>,
    ) {
        let travel = pos.distance(press.pos);
        let duration = time_ms.saturating_sub(press.time_ms);
        if travel >= self.config.tap_max_travel || duration > self.config.tap_max_duration_ms {
            return;
        }

        if let Some(body) = self.pick(pos, camera, scene) {
            self.follow(body, camera, scene);
            self.last_tap = None;
            return;
        }

        if let Some(last) = self.last_tap {
            let interval = time_ms.saturating_sub(last.time_ms);
            if interval <= self.config.double_tap_interval_ms
                && pos.distance(last.pos) <= self.config.double_tap_max_distance
            {
                log::debug!("double tap: reset view");
                camera.reset_view(scene.bodies.get(BodyId::Sun));
                self.last_tap = None;
                return;
            }
        }
        self.last_tap = Some(Tap { pos, time_ms });
    }

    fn key_down(&mut self, key: Key, camera: &mut OrbitCamera, scene: PickScene<'_>) -> Option<GestureRequest> {
        match key {
            Key::Escape => return Some(GestureRequest::Quit),
            Key::R => {
                log::debug!("reset view");
                camera.reset_view(scene.bodies.get(BodyId::Sun));
            }
            Key::Digit(d) if d <= 4 => {
                camera.apply_follow_target(d as u32, scene.bodies);
                log::debug!("follow target -> {}", d);
            }
            Key::Digit(_) | Key::Other(_) => {}
        }
        None
    }

    fn pick(&self, pos: Vec2, camera: &OrbitCamera, scene: PickScene<'_>) -> Option<BodyId> {
        pick_target(pos.x, pos.y, scene.projector, camera, scene.bodies, self.config.min_pick_radius)
    }

    fn follow(&self, body: BodyId, camera: &mut OrbitCamera, scene: PickScene<'_>) {
        camera.apply_follow_target(body.wire(), scene.bodies);
        log::debug!("follow target -> {}", body.name());
    }
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

/// Normalized touch coordinates → viewport pixels.
fn to_pixels(x: f32, y: f32, projector: &Projector) -> Vec2 {
    Vec2::new(x * projector.width() as f32, y * projector.height() as f32)
}
