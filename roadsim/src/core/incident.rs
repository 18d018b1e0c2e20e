use helpers::vec3::Vec3;
use serde::Deserialize;

/// Countdown length: five discrete one-second ticks.
pub const COUNTDOWN_TICKS: u32 = 5;
pub const COUNTDOWN_TICK_MS: f64 = 1000.0;

/// Drive-in animation: the car eases in from behind the camera.
pub const DRIVE_IN_START_Z: f64 = 15.0;
pub const DRIVE_IN_DURATION_MS: f64 = 3000.0;

/// Bounce-back after a rock hit.
pub const BOUNCE_DURATION_MS: f64 = 800.0;

/// Explosion after a bomb hit. The flight animation has its own,
/// shorter duration; it simply stops animating while the explosion-level
/// cleanup waits for the full duration. The two constants are
/// intentionally independent.
pub const EXPLOSION_DURATION_MS: f64 = 3000.0;
pub const FLIGHT_DURATION_MS: f64 = 2000.0;
pub const FLIGHT_HEIGHT: f64 = 8.0;
pub const FLIGHT_BACKWARD: f64 = 2.0;

/// Return-to-normal convergence: per-frame factor and snap epsilon.
pub const RETURN_FACTOR: f64 = 0.1;
pub const RETURN_EPSILON: f64 = 0.01;

/// Holding the handbrake this long forces a tumble at speed.
pub const HANDBRAKE_HOLD_MS: f64 = 1000.0;

/// * `speed` - Rotation increment per frame while tumbling
/// * `threshold` - Minimum speed for a handbrake hold to cause a tumble
/// * `duration_ms` - Tumble duration
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct TumblePars {
    #[serde(default = "default_tumble_speed")]
    pub speed: f64,
    #[serde(default = "default_tumble_threshold")]
    pub threshold: f64,
    #[serde(default = "default_tumble_duration_ms")]
    pub duration_ms: f64,
}

fn default_tumble_speed() -> f64 {
    0.15
}

fn default_tumble_threshold() -> f64 {
    0.1
}

fn default_tumble_duration_ms() -> f64 {
    3000.0
}

impl Default for TumblePars {
    fn default() -> Self {
        TumblePars {
            speed: default_tumble_speed(),
            threshold: default_tumble_threshold(),
            duration_ms: default_tumble_duration_ms(),
        }
    }
}

/// Transient state of the countdown / drive-in sequence.
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    pub start_ms: f64,
}

/// Transient state of a rock bounce-back.
#[derive(Debug, Clone, Copy)]
pub struct Bounce {
    pub start_ms: f64,
    pub duration_ms: f64,
    pub force: f64,
}

/// Transient state of a bomb explosion plus the chaotic flight.
#[derive(Debug, Clone, Copy)]
pub struct Explosion {
    pub start_ms: f64,
    pub explosion_duration_ms: f64,
    pub flight_duration_ms: f64,
    pub origin: Vec3,
    pub origin_rotation: Vec3,
    pub final_rotation: Vec3,
}

/// Transient state of a tumble. Explosion landings are more dramatic
/// than handbrake tumbles, so the trigger decides speed and duration.
#[derive(Debug, Clone, Copy)]
pub struct Tumble {
    pub start_ms: f64,
    pub duration_ms: f64,
    pub rotation_speed: f64,
}

/// Mode is the single tag for the incident state machine. Exactly one
/// variant is active at any instant; per-mode transient data lives on
/// the variant and is discarded when the mode ends.
#[derive(Debug, Clone, Copy)]
pub enum Mode {
    Idle,
    Countdown(Countdown),
    Normal,
    BouncingBack(Bounce),
    Exploding(Explosion),
    Tumbling(Tumble),
    ReturningToNormal,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Idle => "idle",
            Mode::Countdown(_) => "countdown",
            Mode::Normal => "normal",
            Mode::BouncingBack(_) => "bouncing_back",
            Mode::Exploding(_) => "exploding",
            Mode::Tumbling(_) => "tumbling",
            Mode::ReturningToNormal => "returning_to_normal",
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Idle
    }
}
