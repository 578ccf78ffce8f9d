//! Wire layout shared with the JavaScript host.
//! Read out of wasm memory through the `get_snapshot_ptr` and `get_frame_ptr`
//! exports of `orbitview-web`.
//!
//! The host reads two regions out of wasm memory each frame:
//! ```text
//! [Snapshot: 16 floats]            camera diagnostics, indices below
//! [Frame:    height × stride bytes] packed 0xAARRGGBB pixels, row-major
//! ```
//!
//! Pixels are native-endian `u32`; on little-endian wasm32 a pixel's bytes
//! land as B, G, R, A.

use crate::api::types::CameraSnapshot;

/// Number of floats in the snapshot section.
pub const SNAPSHOT_FLOATS: usize = CameraSnapshot::FLOATS;

/// Snapshot field indices.
pub const SNAPSHOT_YAW: usize = 0;
pub const SNAPSHOT_PITCH: usize = 1;
pub const SNAPSHOT_DISTANCE: usize = 2;
pub const SNAPSHOT_FOLLOW: usize = 3;
pub const SNAPSHOT_TARGET_X: usize = 4;
pub const SNAPSHOT_TARGET_Y: usize = 5;
pub const SNAPSHOT_TARGET_Z: usize = 6;
pub const SNAPSHOT_POSITION_X: usize = 7;
pub const SNAPSHOT_POSITION_Y: usize = 8;
pub const SNAPSHOT_POSITION_Z: usize = 9;
pub const SNAPSHOT_STATUS: usize = 10;
pub const SNAPSHOT_FRAME_COUNTER: usize = 11;
pub const SNAPSHOT_WIDTH: usize = 12;
pub const SNAPSHOT_HEIGHT: usize = 13;
pub const SNAPSHOT_PROTOCOL_VERSION: usize = 14;
// index 15 is reserved

/// Protocol version the host checks at init.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Bytes per packed pixel (wire format, never changes).
pub const PIXEL_BYTES: usize = 4;

/// Flatten a snapshot into its wire form, stamping the protocol version.
pub fn encode_snapshot(snapshot: &CameraSnapshot) -> [f32; SNAPSHOT_FLOATS] {
    let mut out: [f32; SNAPSHOT_FLOATS] = bytemuck::cast(*snapshot);
    out[SNAPSHOT_PROTOCOL_VERSION] = PROTOCOL_VERSION;
    out
}

/// Framebuffer layout for one surface size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    pub width: u32,
    pub height: u32,
    /// Bytes per row.
    pub stride: usize,
    /// Total frame size in bytes.
    pub total_bytes: usize,
}

impl FrameLayout {
    pub fn new(width: u32, height: u32) -> Self {
        let stride = width as usize * PIXEL_BYTES;
        Self {
            width,
            height,
            stride,
            total_bytes: stride * height as usize,
        }
    }

    /// Byte offset of pixel (x, y), if inside the frame.
    pub fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.stride + x as usize * PIXEL_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CameraSnapshot {
        CameraSnapshot {
            yaw: 0.5,
            pitch: 0.18,
            distance: 18.0,
            follow: 3.0,
            target: [1.0, 2.0, 3.0],
            position: [4.0, 5.0, 6.0],
            status: 1.0,
            frame: 42.0,
            width: 800.0,
            height: 600.0,
            reserved: [0.0; 2],
        }
    }

    #[test]
    fn indices_match_struct_layout() {
        let wire = encode_snapshot(&sample());
        assert_eq!(wire[SNAPSHOT_YAW], 0.5);
        assert_eq!(wire[SNAPSHOT_PITCH], 0.18);
        assert_eq!(wire[SNAPSHOT_DISTANCE], 18.0);
        assert_eq!(wire[SNAPSHOT_FOLLOW], 3.0);
        assert_eq!(wire[SNAPSHOT_TARGET_X..=SNAPSHOT_TARGET_Z], [1.0, 2.0, 3.0]);
        assert_eq!(wire[SNAPSHOT_POSITION_X..=SNAPSHOT_POSITION_Z], [4.0, 5.0, 6.0]);
        assert_eq!(wire[SNAPSHOT_STATUS], 1.0);
        assert_eq!(wire[SNAPSHOT_FRAME_COUNTER], 42.0);
        assert_eq!(wire[SNAPSHOT_WIDTH], 800.0);
        assert_eq!(wire[SNAPSHOT_HEIGHT], 600.0);
        assert_eq!(wire[SNAPSHOT_PROTOCOL_VERSION], PROTOCOL_VERSION);
    }

    #[test]
    fn frame_layout_sizes() {
        let layout = FrameLayout::new(800, 600);
        assert_eq!(layout.stride, 3200);
        assert_eq!(layout.total_bytes, 800 * 600 * 4);
        assert_eq!(layout.offset(0, 1), Some(3200));
        assert_eq!(layout.offset(799, 599), Some(layout.total_bytes - 4));
        assert_eq!(layout.offset(800, 0), None);
    }

    #[test]
    fn empty_frame_layout() {
        let layout = FrameLayout::new(0, 0);
        assert_eq!(layout.total_bytes, 0);
        assert_eq!(layout.offset(0, 0), None);
    }
}
