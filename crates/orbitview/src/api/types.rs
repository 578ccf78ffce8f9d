use bytemuck::{Pod, Zeroable};

/// Identifies one of the four simulated bodies.
/// The discriminant is the wire id used by follow-target selection (0 = none).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BodyId {
    Sun = 1,
    PlanetA = 2,
    PlanetB = 3,
    Moon = 4,
}

impl BodyId {
    pub const ALL: [BodyId; 4] = [BodyId::Sun, BodyId::PlanetA, BodyId::PlanetB, BodyId::Moon];

    /// Map a wire id to a body. Returns `None` for 0 and anything out of range.
    pub fn from_wire(id: u32) -> Option<Self> {
        match id {
            1 => Some(BodyId::Sun),
            2 => Some(BodyId::PlanetA),
            3 => Some(BodyId::PlanetB),
            4 => Some(BodyId::Moon),
            _ => None,
        }
    }

    pub fn wire(self) -> u32 {
        self as u32
    }

    /// Dense 0-based index for per-body arrays.
    pub fn index(self) -> usize {
        self as usize - 1
    }

    pub fn name(self) -> &'static str {
        match self {
            BodyId::Sun => "sun",
            BodyId::PlanetA => "planet-a",
            BodyId::PlanetB => "planet-b",
            BodyId::Moon => "moon",
        }
    }
}

/// Lifecycle of a viewer as seen by its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewerStatus {
    /// Constructed but `start` has not succeeded yet.
    #[default]
    Idle,
    Running,
    /// Quit was requested; the next iteration is a no-op.
    QuitRequested,
}

impl ViewerStatus {
    pub fn is_running(self) -> bool {
        self == ViewerStatus::Running
    }

    pub fn wire(self) -> f32 {
        match self {
            ViewerStatus::Idle => 0.0,
            ViewerStatus::Running => 1.0,
            ViewerStatus::QuitRequested => 2.0,
        }
    }
}

/// Camera parameters exposed for diagnostics and tests.
/// Wire format: 16 floats, indices in `bridge::protocol`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct CameraSnapshot {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    /// Follow target wire id (0 = free camera).
    pub follow: f32,
    pub target: [f32; 3],
    pub position: [f32; 3],
    pub status: f32,
    pub frame: f32,
    pub width: f32,
    pub height: f32,
    /// Wire padding; slot 0 carries the protocol version on the bridge.
    pub reserved: [f32; 2],
}

impl CameraSnapshot {
    pub const FLOATS: usize = 16;

    pub fn follow_id(&self) -> u32 {
        self.follow as u32
    }
}
