use thiserror::Error;

/// Fatal failures reported to the host.
///
/// Degenerate geometry and invalid caller input never surface here; they are
/// skipped or clamped where they occur.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// The host surface reported a zero dimension at start.
    #[error("surface unavailable ({width}x{height})")]
    SurfaceUnavailable { width: u32, height: u32 },
    /// Framebuffer or depth buffer could not be reserved.
    #[error("failed to allocate frame buffers for {pixels} pixels")]
    BufferAllocation { pixels: usize },
    #[error("invalid viewer config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("viewer already started")]
    AlreadyStarted,
}

impl ViewerError {
    /// Stable numeric code handed to the host (0 is reserved for success).
    pub fn code(&self) -> i32 {
        match self {
            ViewerError::SurfaceUnavailable { .. } => 1,
            ViewerError::BufferAllocation { .. } => 2,
            ViewerError::Config(_) => 3,
            ViewerError::AlreadyStarted => 4,
        }
    }
}
