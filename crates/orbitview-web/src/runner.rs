use orbitview::bridge::protocol::{encode_snapshot, FrameLayout, SNAPSHOT_FLOATS};
use orbitview::{
    millis_to_nanos, FrameView, HeadlessSurface, InputEvent, InputQueue, Presenter, SharedViewer,
    Surface, ViewerConfig, ViewerError, ViewerStatus,
};

/// Browser-side surface. The canvas lives in JavaScript; this side only
/// keeps the last presented frame where JS can read it out of wasm memory,
/// plus the events the host pushed since the last poll.
#[derive(Debug)]
pub struct WebSurface {
    width: u32,
    height: u32,
    pending: Vec<InputEvent>,
    frame: Vec<u32>,
    layout: FrameLayout,
    closed: bool,
}

impl WebSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pending: Vec::with_capacity(32),
            frame: Vec::new(),
            layout: FrameLayout::new(0, 0),
            closed: false,
        }
    }

    pub fn inject(&mut self, event: InputEvent) {
        if let InputEvent::Resize { width, height } = event {
            if width > 0 && height > 0 {
                self.width = width as u32;
                self.height = height as u32;
            }
        }
        self.pending.push(event);
    }

    pub fn frame(&self) -> &[u32] {
        &self.frame
    }

    pub fn layout(&self) -> FrameLayout {
        self.layout
    }
}

impl Presenter for WebSurface {
    fn present(&mut self, frame: FrameView<'_>) {
        if self.closed {
            return;
        }
        self.frame.clear();
        self.frame.extend_from_slice(frame.pixels);
        self.layout = FrameLayout::new(frame.width, frame.height);
    }
}

impl Surface for WebSurface {
    fn backend(&self) -> &'static str {
        "web"
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn poll(&mut self, queue: &mut InputQueue) {
        for event in self.pending.drain(..) {
            queue.push(event);
        }
    }

    fn close(&mut self) {
        self.closed = true;
        self.pending.clear();
    }
}

/// The surface chosen once at init.
pub enum Backend {
    Web(WebSurface),
    Headless(HeadlessSurface),
}

/// Web surface inside the browser, headless everywhere else (native test
/// runs, smoke tools).
pub fn select_backend(width: u32, height: u32) -> Backend {
    if cfg!(target_arch = "wasm32") {
        Backend::Web(WebSurface::new(width, height))
    } else {
        Backend::Headless(HeadlessSurface::new(width, height))
    }
}

impl Backend {
    pub fn inject(&mut self, event: InputEvent) {
        match self {
            Backend::Web(s) => s.inject(event),
            Backend::Headless(s) => s.inject(event),
        }
    }

    /// Last presented frame.
    pub fn frame(&self) -> &[u32] {
        match self {
            Backend::Web(s) => s.frame(),
            Backend::Headless(s) => s.last_frame(),
        }
    }
}

impl Presenter for Backend {
    fn present(&mut self, frame: FrameView<'_>) {
        match self {
            Backend::Web(s) => s.present(frame),
            Backend::Headless(s) => s.present(frame),
        }
    }
}

impl Surface for Backend {
    fn backend(&self) -> &'static str {
        match self {
            Backend::Web(s) => s.backend(),
            Backend::Headless(s) => s.backend(),
        }
    }

    fn size(&self) -> (u32, u32) {
        match self {
            Backend::Web(s) => s.size(),
            Backend::Headless(s) => s.size(),
        }
    }

    fn poll(&mut self, queue: &mut InputQueue) {
        match self {
            Backend::Web(s) => s.poll(queue),
            Backend::Headless(s) => s.poll(queue),
        }
    }

    fn close(&mut self) {
        match self {
            Backend::Web(s) => s.close(),
            Backend::Headless(s) => s.close(),
        }
    }
}

/// Wires a `SharedViewer` to the selected backend.
///
/// `lib.rs` keeps one in a `thread_local!` and exports free functions around
/// it, because wasm-bindgen exports functions, not singletons.
pub struct ViewerRunner {
    viewer: SharedViewer,
    surface: Backend,
    /// Wire copy of the camera snapshot, refreshed every tick.
    snapshot: [f32; SNAPSHOT_FLOATS],
}

impl ViewerRunner {
    pub fn new(config: ViewerConfig, width: u32, height: u32) -> Self {
        let viewer = SharedViewer::new(config);
        let snapshot = encode_snapshot(&viewer.snapshot());
        Self {
            viewer,
            surface: select_backend(width, height),
            snapshot,
        }
    }

    pub fn start(&mut self) -> Result<(), ViewerError> {
        self.viewer.start(&self.surface)?;
        self.refresh_snapshot();
        Ok(())
    }

    /// Queue a host event. Dropped unless the viewer is running.
    pub fn push_input(&mut self, event: InputEvent) {
        if self.viewer.status().is_running() {
            self.surface.inject(event);
        }
    }

    /// Run one frame at `now_ms` (host monotonic clock, milliseconds).
    pub fn tick(&mut self, now_ms: f64) -> ViewerStatus {
        let status = self.viewer.tick(&mut self.surface, millis_to_nanos(now_ms));
        self.refresh_snapshot();
        status
    }

    pub fn request_quit(&mut self) {
        self.viewer.request_quit();
        self.refresh_snapshot();
    }

    pub fn status(&self) -> ViewerStatus {
        self.viewer.status()
    }

    pub fn backend(&self) -> &'static str {
        self.surface.backend()
    }

    fn refresh_snapshot(&mut self) {
        self.snapshot = encode_snapshot(&self.viewer.snapshot());
    }

    // ---- Pointer accessors for wasm memory reads ----

    pub fn frame(&self) -> &[u32] {
        self.surface.frame()
    }

    pub fn frame_ptr(&self) -> *const u8 {
        self.surface.frame().as_ptr() as *const u8
    }

    pub fn frame_layout(&self) -> FrameLayout {
        let (w, h) = self.viewer.with(|v| (v.framebuffer().width(), v.framebuffer().height()));
        if self.surface.frame().len() == w as usize * h as usize {
            FrameLayout::new(w, h)
        } else {
            // nothing presented at this size yet
            FrameLayout::new(0, 0)
        }
    }

    pub fn snapshot(&self) -> &[f32; SNAPSHOT_FLOATS] {
        &self.snapshot
    }

    pub fn snapshot_ptr(&self) -> *const f32 {
        self.snapshot.as_ptr()
    }
}

/// Packed `0xAARRGGBB` pixels → RGBA bytes, as `ImageData` expects.
pub fn argb_to_rgba(pixels: &[u32], out: &mut Vec<u8>) {
    out.clear();
    out.reserve(pixels.len() * 4);
    for &p in pixels {
        out.extend_from_slice(&[(p >> 16) as u8, (p >> 8) as u8, p as u8, (p >> 24) as u8]);
    }
}
