/// Controls is the per-frame input snapshot the simulation polls.
///
/// `accelerate`, `brake` and `handbrake` are level signals held by the
/// front end; `steer_left`/`steer_right` are edge signals the
/// simulation clears every frame, either by consuming the lane change
/// or by dropping a press that arrived while steering was locked out.
#[derive(Debug, Default)]
pub struct Controls {
    pub accelerate: bool,
    pub brake: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    pub handbrake: bool,
}

impl Controls {
    pub fn new() -> Controls {
        Controls::default()
    }

    pub fn reset(&mut self) {
        *self = Controls::default();
    }
}
