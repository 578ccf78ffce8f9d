pub mod camera;
pub mod color;
pub mod projector;
pub mod raster;
pub mod traits;

// Re-export key types for convenient access
pub use camera::OrbitCamera;
pub use color::Color;
pub use projector::{Projection, Projector, NEAR_CLIP};
pub use raster::{Framebuffer, FAR_DEPTH};
pub use traits::{FrameView, HeadlessSurface, Presenter, Surface};
