//! Host-facing seams.
//!
//! The core never talks to a window system directly. A host provides a
//! `Surface` (size, pending input, present, close); the viewer only ever
//! hands it finished frames through `Presenter`.

use crate::input::queue::{InputEvent, InputQueue};

/// One finished frame, borrowed from the framebuffer.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub width: u32,
    pub height: u32,
    /// Packed `0xAARRGGBB` pixels, row-major.
    pub pixels: &'a [u32],
    /// Row stride in bytes.
    pub stride: usize,
}

impl FrameView<'_> {
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.pixels)
    }
}

/// Pixel sink: pushes a finished frame to the display.
pub trait Presenter {
    fn present(&mut self, frame: FrameView<'_>);
}

/// Capability interface of a platform backend.
///
/// Creation is the backend's constructor, chosen once at startup by the
/// host; after that the viewer only polls, presents and closes.
pub trait Surface: Presenter {
    /// Backend identifier (e.g. "web", "headless").
    fn backend(&self) -> &'static str;

    /// Current drawable size in pixels.
    fn size(&self) -> (u32, u32);

    /// Move pending platform events into `queue`.
    fn poll(&mut self, queue: &mut InputQueue);

    /// Release the surface. Further presents are ignored.
    fn close(&mut self);
}

/// In-memory surface: records the last frame and replays scripted events.
/// Used by tests and headless smoke runs.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    width: u32,
    height: u32,
    pending: Vec<InputEvent>,
    last_frame: Vec<u32>,
    presented: u64,
    closed: bool,
}

impl HeadlessSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Queue an event for the next `poll`. Resize events also update the
    /// reported size, as a real window would.
    pub fn inject(&mut self, event: InputEvent) {
        if let InputEvent::Resize { width, height } = event {
            if width > 0 && height > 0 {
                self.width = width as u32;
                self.height = height as u32;
            }
        }
        self.pending.push(event);
    }

    pub fn last_frame(&self) -> &[u32] {
        &self.last_frame
    }

    pub fn presented_frames(&self) -> u64 {
        self.presented
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Presenter for HeadlessSurface {
    fn present(&mut self, frame: FrameView<'_>) {
        if self.closed {
            return;
        }
        self.last_frame.clear();
        self.last_frame.extend_from_slice(frame.pixels);
        self.presented += 1;
    }
}

impl Surface for HeadlessSurface {
    fn backend(&self) -> &'static str {
        "headless"
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_records_frames() {
        let mut surface = HeadlessSurface::new(2, 1);
        let pixels = [0xFF00_0000u32, 0xFFFF_FFFF];
        surface.present(FrameView { width: 2, height: 1, pixels: &pixels, stride: 8 });
        assert_eq!(surface.presented_frames(), 1);
        assert_eq!(surface.last_frame(), &pixels);
    }

    #[test]
    fn closed_surface_ignores_presents() {
        let mut surface = HeadlessSurface::new(1, 1);
        surface.close();
        surface.present(FrameView { width: 1, height: 1, pixels: &[0], stride: 4 });
        assert_eq!(surface.presented_frames(), 0);
        assert!(surface.is_closed());
    }

    #[test]
    fn poll_drains_injected_events() {
        let mut surface = HeadlessSurface::new(10, 10);
        surface.inject(InputEvent::Resize { width: 20, height: 30 });
        surface.inject(InputEvent::CloseRequested);
        assert_eq!(surface.size(), (20, 30));

        let mut queue = InputQueue::new();
        surface.poll(&mut queue);
        assert_eq!(queue.len(), 2);
        surface.poll(&mut queue);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn frame_view_bytes() {
        let pixels = [0u32; 6];
        let view = FrameView { width: 3, height: 2, pixels: &pixels, stride: 12 };
        assert_eq!(view.as_bytes().len(), 24);
    }
}
