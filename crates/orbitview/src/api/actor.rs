use std::sync::{Arc, Mutex, MutexGuard};

use super::error::ViewerError;
use super::types::{CameraSnapshot, ViewerStatus};
use super::viewer::{Viewer, ViewerConfig};
use crate::input::queue::InputEvent;
use crate::renderer::traits::{Presenter, Surface};

/// Cloneable handle to one `Viewer` behind a lock.
///
/// Every operation holds the lock for its whole duration, so input pushed
/// from another thread lands either before or after a frame, never inside it.
/// A poisoned lock is recovered: the viewer state is plain data and stays
/// usable after a panicking caller.
#[derive(Clone, Default)]
pub struct SharedViewer {
    inner: Arc<Mutex<Viewer>>,
}

impl SharedViewer {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Viewer::new(config))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Viewer> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn configure(&self, config: ViewerConfig) -> Result<(), ViewerError> {
        self.lock().configure(config)
    }

    pub fn start<S: Surface + ?Sized>(&self, surface: &S) -> Result<(), ViewerError> {
        self.lock().start(surface)
    }

    pub fn handle_event(&self, event: InputEvent) {
        self.lock().push_event(event);
    }

    pub fn iterate<P: Presenter + ?Sized>(&self, elapsed_nanos: u64, presenter: &mut P) -> ViewerStatus {
        self.lock().iterate(elapsed_nanos, presenter)
    }

    pub fn tick<S: Surface + ?Sized>(&self, surface: &mut S, elapsed_nanos: u64) -> ViewerStatus {
        self.lock().tick(surface, elapsed_nanos)
    }

    pub fn request_quit(&self) {
        self.lock().request_quit();
    }

    pub fn status(&self) -> ViewerStatus {
        self.lock().status()
    }

    pub fn snapshot(&self) -> CameraSnapshot {
        self.lock().snapshot()
    }

    /// Run `f` with exclusive access to the viewer.
    pub fn with<R>(&self, f: impl FnOnce(&mut Viewer) -> R) -> R {
        f(&mut self.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::queue::Key;
    use crate::renderer::traits::HeadlessSurface;
    use std::thread;

    #[test]
    fn events_from_other_threads_apply_on_next_frame() {
        let viewer = SharedViewer::default();
        let mut surface = HeadlessSurface::new(64, 48);
        viewer.start(&surface).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let v = viewer.clone();
                thread::spawn(move || v.handle_event(InputEvent::Wheel { delta: 1.0, flipped: false }))
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        viewer.iterate(0, &mut surface);
        let expected = 18.0 * 0.9f32.powi(4);
        assert!((viewer.snapshot().distance - expected).abs() < 1e-3);
    }

    #[test]
    fn quit_from_another_thread() {
        let viewer = SharedViewer::default();
        let mut surface = HeadlessSurface::new(32, 32);
        viewer.start(&surface).unwrap();

        let v = viewer.clone();
        thread::spawn(move || v.request_quit()).join().unwrap();
        assert_eq!(viewer.iterate(0, &mut surface), ViewerStatus::QuitRequested);
        assert_eq!(surface.presented_frames(), 0);
    }

    #[test]
    fn survives_poisoned_lock() {
        let viewer = SharedViewer::default();
        let v = viewer.clone();
        let _ = thread::spawn(move || {
            v.with(|_| panic!("boom"));
        })
        .join();

        let mut surface = HeadlessSurface::new(16, 16);
        viewer.start(&surface).unwrap();
        viewer.handle_event(InputEvent::KeyDown { key: Key::Digit(4), repeat: false });
        assert_eq!(viewer.iterate(0, &mut surface), ViewerStatus::Running);
        assert_eq!(viewer.snapshot().follow_id(), 4);
    }
}
