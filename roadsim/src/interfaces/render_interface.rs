use crate::core::obstacles::ObstacleKind;
use crate::post::race_result::RaceResult;
use helpers::vec3::Vec3;

/// Upper bound on snapshot sends per simulated second in realtime mode.
pub const MAX_RENDER_UPDATE_FREQUENCY: f64 = 60.0;

/// Desired camera placement for the rendering collaborator. The core
/// only computes targets; the renderer owns the actual camera object.
#[derive(Debug, Clone, Copy, Default)]
pub struct CameraTarget {
    pub position: Vec3,
    pub look_at: Vec3,
}

/// Vehicle pose for the rendering collaborator.
#[derive(Debug, Clone, Copy)]
pub struct CarPose {
    pub position: Vec3,
    pub rotation: Vec3,
    /// burnt tint while exploded, original colors otherwise
    pub burnt: bool,
}

/// Active obstacle pose for the rendering collaborator.
#[derive(Debug, Clone, Copy)]
pub struct ObstacleView {
    pub kind: ObstacleKind,
    pub position: Vec3,
    pub spin: f64,
}

/// FrameSnapshot is the per-frame message sent to a renderer or HUD.
/// Distances are raw numbers; the HUD formats its own text.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub sim_time_ms: f64,
    pub total_distance: f64,
    pub race_distance: f64,
    pub speed: f64,
    pub mode: &'static str,
    pub countdown_value: Option<u32>,
    /// world-scroll delta of this frame, for road/finish-line meshes
    pub scroll_delta: f64,
    pub car: CarPose,
    pub obstacle: Option<ObstacleView>,
    pub camera: CameraTarget,
    pub protection_active: bool,
    pub finished: bool,
    /// sent once with the last snapshot of a run
    pub final_result: Option<RaceResult>,
}
