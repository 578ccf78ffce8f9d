pub mod api;
pub mod core;
pub mod renderer;
pub mod bridge;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::actor::SharedViewer;
pub use api::error::ViewerError;
pub use api::types::{BodyId, CameraSnapshot, ViewerStatus};
pub use api::viewer::{Viewer, ViewerConfig};
pub use core::sim::{BodyPositions, SimulationClock};
pub use core::stars::{Star, StarField};
pub use core::time::{millis_to_nanos, ElapsedClock};
pub use renderer::{
    Color, FrameView, Framebuffer, HeadlessSurface, OrbitCamera, Presenter, Projection, Projector,
    Surface, FAR_DEPTH, NEAR_CLIP,
};
pub use input::gesture::{pick_target, GestureConfig, GestureController};
pub use input::queue::{InputEvent, InputQueue, Key, MouseButton};
pub use bridge::protocol::{encode_snapshot, FrameLayout, PROTOCOL_VERSION};
