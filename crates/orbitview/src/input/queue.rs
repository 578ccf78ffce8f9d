/// Mouse buttons the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Primary,
    Secondary,
    Middle,
}

impl MouseButton {
    /// DOM `MouseEvent.button` numbering (0 primary, 1 middle, 2 secondary).
    pub fn from_dom(button: u32) -> Option<Self> {
        match button {
            0 => Some(MouseButton::Primary),
            1 => Some(MouseButton::Middle),
            2 => Some(MouseButton::Secondary),
            _ => None,
        }
    }
}

/// Keys with a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    R,
    /// Number row digit 0–9.
    Digit(u8),
    Other(u32),
}

impl Key {
    /// Map a legacy `keyCode` / ASCII code to a key.
    pub fn from_key_code(code: u32) -> Self {
        match code {
            27 => Key::Escape,
            82 | 114 => Key::R,
            48..=57 => Key::Digit((code - 48) as u8),
            other => Key::Other(other),
        }
    }
}

/// Input event types the viewer understands.
/// Mouse coordinates are in surface pixels; touch coordinates are
/// normalized to [0, 1] and carry the device timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// The drawable changed size (pixels).
    Resize { width: i32, height: i32 },
    MouseDown { button: MouseButton, x: f32, y: f32 },
    MouseUp { button: MouseButton, x: f32, y: f32 },
    MouseMove { x: f32, y: f32 },
    /// Wheel ticks; positive zooms in unless `flipped`.
    Wheel { delta: f32, flipped: bool },
    TouchDown { id: u64, x: f32, y: f32, timestamp_ms: u64 },
    TouchMove { id: u64, x: f32, y: f32, timestamp_ms: u64 },
    TouchUp { id: u64, x: f32, y: f32, timestamp_ms: u64 },
    TouchCancel { id: u64 },
    PinchBegin,
    /// Incremental scale since the previous update (>1 spreads fingers).
    PinchUpdate { scale: f32 },
    PinchEnd,
    KeyDown { key: Key, repeat: bool },
    /// The host window is closing.
    CloseRequested,
}

/// A queue of input events.
/// Hosts push from their event callbacks; the frame loop drains it once per tick.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop everything pending.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::MouseDown { button: MouseButton::Primary, x: 10.0, y: 20.0 });
        q.push(InputEvent::KeyDown { key: Key::R, repeat: false });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert!(q.is_empty());
        assert_eq!(events[1], InputEvent::KeyDown { key: Key::R, repeat: false });
    }

    #[test]
    fn key_codes() {
        assert_eq!(Key::from_key_code(27), Key::Escape);
        assert_eq!(Key::from_key_code(82), Key::R);
        assert_eq!(Key::from_key_code(114), Key::R);
        assert_eq!(Key::from_key_code(48), Key::Digit(0));
        assert_eq!(Key::from_key_code(52), Key::Digit(4));
        assert_eq!(Key::from_key_code(65), Key::Other(65));
    }

    #[test]
    fn dom_buttons() {
        assert_eq!(MouseButton::from_dom(0), Some(MouseButton::Primary));
        assert_eq!(MouseButton::from_dom(2), Some(MouseButton::Secondary));
        assert_eq!(MouseButton::from_dom(7), None);
    }
}
