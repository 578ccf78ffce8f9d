pub mod runner;

pub use runner::{select_backend, Backend, ViewerRunner, WebSurface};

use std::cell::RefCell;

use orbitview::bridge::protocol::{PROTOCOL_VERSION, SNAPSHOT_FLOATS};
use orbitview::{InputEvent, Key, MouseButton, ViewerConfig, ViewerError};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<ViewerRunner>> = const { RefCell::new(None) };
    static CONFIG: RefCell<ViewerConfig> = RefCell::new(ViewerConfig::default());
}

/// Run `f` against the runner. Calls made before `viewer_init` are reported
/// straight to the browser console (the logger may not be installed yet)
/// and return `None`.
fn with_runner<R>(f: impl FnOnce(&mut ViewerRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => Some(f(runner)),
        None => {
            web_sys::console::warn_1(&JsValue::from_str("orbitview: call viewer_init() first"));
            None
        }
    })
}

fn push(event: InputEvent) {
    with_runner(|r| r.push_input(event));
}

/// Store a JSON configuration for the next `viewer_init`.
/// Returns 0 on success or a `ViewerError` code.
#[wasm_bindgen]
pub fn viewer_configure(json: &str) -> i32 {
    let started = RUNNER.with(|cell| cell.borrow().is_some());
    if started {
        return ViewerError::AlreadyStarted.code();
    }
    match ViewerConfig::from_json(json) {
        Ok(config) => {
            CONFIG.with(|cell| *cell.borrow_mut() = config);
            0
        }
        Err(e) => {
            log::error!("{}", e);
            e.code()
        }
    }
}

/// Create and start the viewer on a `width`×`height` surface.
/// Returns 0 on success or a `ViewerError` code.
#[wasm_bindgen]
pub fn viewer_init(width: u32, height: u32) -> i32 {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    if RUNNER.with(|cell| cell.borrow().is_some()) {
        return ViewerError::AlreadyStarted.code();
    }

    let config = CONFIG.with(|cell| cell.borrow().clone());
    let mut runner = ViewerRunner::new(config, width, height);
    if let Err(e) = runner.start() {
        log::error!("orbitview: {}", e);
        return e.code();
    }
    log::info!("orbitview: initialized ({} backend)", runner.backend());
    RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));
    0
}

/// One frame at `now_ms`. Returns false once the viewer stops running.
#[wasm_bindgen]
pub fn viewer_tick(now_ms: f64) -> bool {
    with_runner(|r| r.tick(now_ms).is_running()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn viewer_request_quit() {
    with_runner(|r| r.request_quit());
}

#[wasm_bindgen]
pub fn viewer_resize(width: i32, height: i32) {
    push(InputEvent::Resize { width, height });
}

// ---- Input ----

#[wasm_bindgen]
pub fn viewer_mouse_down(button: u32, x: f32, y: f32) {
    if let Some(button) = MouseButton::from_dom(button) {
        push(InputEvent::MouseDown { button, x, y });
    }
}

#[wasm_bindgen]
pub fn viewer_mouse_up(button: u32, x: f32, y: f32) {
    if let Some(button) = MouseButton::from_dom(button) {
        push(InputEvent::MouseUp { button, x, y });
    }
}

#[wasm_bindgen]
pub fn viewer_mouse_move(x: f32, y: f32) {
    push(InputEvent::MouseMove { x, y });
}

/// `delta` in wheel ticks, positive zooms in.
#[wasm_bindgen]
pub fn viewer_wheel(delta: f32, flipped: bool) {
    push(InputEvent::Wheel { delta, flipped });
}

/// Touch positions are normalized to [0, 1] of the canvas.
#[wasm_bindgen]
pub fn viewer_touch_down(id: u32, x: f32, y: f32, timestamp_ms: f64) {
    push(InputEvent::TouchDown { id: id as u64, x, y, timestamp_ms: timestamp_ms.max(0.0) as u64 });
}

#[wasm_bindgen]
pub fn viewer_touch_move(id: u32, x: f32, y: f32, timestamp_ms: f64) {
    push(InputEvent::TouchMove { id: id as u64, x, y, timestamp_ms: timestamp_ms.max(0.0) as u64 });
}

#[wasm_bindgen]
pub fn viewer_touch_up(id: u32, x: f32, y: f32, timestamp_ms: f64) {
    push(InputEvent::TouchUp { id: id as u64, x, y, timestamp_ms: timestamp_ms.max(0.0) as u64 });
}

#[wasm_bindgen]
pub fn viewer_touch_cancel(id: u32) {
    push(InputEvent::TouchCancel { id: id as u64 });
}

#[wasm_bindgen]
pub fn viewer_pinch_begin() {
    push(InputEvent::PinchBegin);
}

#[wasm_bindgen]
pub fn viewer_pinch_update(scale: f32) {
    push(InputEvent::PinchUpdate { scale });
}

#[wasm_bindgen]
pub fn viewer_pinch_end() {
    push(InputEvent::PinchEnd);
}

#[wasm_bindgen]
pub fn viewer_key_down(key_code: u32, repeat: bool) {
    push(InputEvent::KeyDown { key: Key::from_key_code(key_code), repeat });
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_frame_ptr() -> *const u8 {
    with_runner(|r| r.frame_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_frame_width() -> u32 {
    with_runner(|r| r.frame_layout().width).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_frame_height() -> u32 {
    with_runner(|r| r.frame_layout().height).unwrap_or(0)
}

/// Row stride in bytes.
#[wasm_bindgen]
pub fn get_frame_stride() -> u32 {
    with_runner(|r| r.frame_layout().stride as u32).unwrap_or(0)
}

/// Copy of the last frame as RGBA bytes, ready for `new ImageData(...)`.
#[wasm_bindgen]
pub fn get_frame_rgba() -> js_sys::Uint8ClampedArray {
    let mut bytes = Vec::new();
    with_runner(|r| runner::argb_to_rgba(r.frame(), &mut bytes));
    js_sys::Uint8ClampedArray::from(bytes.as_slice())
}

#[wasm_bindgen]
pub fn get_snapshot_ptr() -> *const f32 {
    with_runner(|r| r.snapshot_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_snapshot_floats() -> u32 {
    SNAPSHOT_FLOATS as u32
}

#[wasm_bindgen]
pub fn get_protocol_version() -> f32 {
    PROTOCOL_VERSION
}
