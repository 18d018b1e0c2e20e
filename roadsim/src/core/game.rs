use crate::core::car::{Car, SpeedPars, REST_Y, REST_Z};
use crate::core::controls::Controls;
use crate::core::curves::Curves;
use crate::core::incident::{
    Bounce, Countdown, Explosion, Mode, Tumble, TumblePars, BOUNCE_DURATION_MS, COUNTDOWN_TICKS,
    COUNTDOWN_TICK_MS, DRIVE_IN_DURATION_MS, DRIVE_IN_START_Z, EXPLOSION_DURATION_MS,
    FLIGHT_BACKWARD, FLIGHT_DURATION_MS, FLIGHT_HEIGHT, HANDBRAKE_HOLD_MS, RETURN_EPSILON,
    RETURN_FACTOR,
};
use crate::core::obstacles::{CollisionOutcome, Obstacles};
use crate::interfaces::render_interface::{CameraTarget, CarPose, FrameSnapshot, ObstacleView};
use crate::post::race_result::RaceResult;
use crate::pre::read_game_pars::GamePars;
use helpers::general::{clamp01, ease_in_out, ease_out_cubic};
use helpers::vec3::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

/// Reference frame length; all per-frame constants are calibrated to it.
pub const FRAME_MS: f64 = 16.0;

/// World-scroll multipliers; the world moves slower during an
/// explosion so the flight reads in slow motion.
const SCROLL_NORMAL: f64 = 5.0;
const SCROLL_EXPLODING: f64 = 2.0;

/// Fixed road scroll per frame while the countdown runs.
const COUNTDOWN_ROAD_DELTA: f64 = 0.1;

/// Crossing the line faster than this records a celebratory drift.
const DRIFT_SPEED_THRESHOLD: f64 = 0.4;

/// Speed multiplier applied when protection absorbs a hit.
const PROTECTION_SPEED_PENALTY: f64 = 0.9;

/// Below this speed, lane changes are not accepted.
const MIN_STEERING_SPEED: f64 = 0.01;

/// Game is the per-frame simulation context: it owns the race state,
/// the incident state machine and all gameplay components, and it is
/// the single writer of all of them within one `update` call.
#[derive(Debug)]
pub struct Game {
    // discretization
    pub sim_time_ms: f64,
    pub frames: u64,

    // race state
    pub total_distance: f64,
    pub race_distance: f64,
    pub speed: f64,
    pub lane: usize,
    pub race_finished: bool,
    pub has_crossed_finish_line: bool,
    pub drift_triggered: bool,
    mode: Mode,

    // settings
    speed_pars: SpeedPars,
    tumble_pars: TumblePars,
    protection_distance: f64,
    pub print_events: bool,

    // components
    pub car: Car,
    pub curves: Curves,
    pub obstacles: Obstacles,
    pub controls: Controls,

    // outputs for collaborators
    pub camera: CameraTarget,
    scroll_delta: f64,

    // run statistics
    pub top_speed: f64,
    pub rock_hits: u32,
    pub bomb_hits: u32,
    pub absorbed_hits: u32,

    handbrake_hold_ms: f64,
    rng: StdRng,
}

impl Game {
    pub fn new(pars: &GamePars) -> Game {
        let rng = match pars.race_pars.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut curves = Curves::new();
        for curve in pars.curves.iter() {
            curves.add_curve(curve.start, curve.end, curve.intensity);
        }

        Game {
            sim_time_ms: 0.0,
            frames: 0,
            total_distance: 0.0,
            race_distance: pars.race_pars.distance_km * 1000.0,
            speed: 0.0,
            lane: 1,
            race_finished: false,
            has_crossed_finish_line: false,
            drift_triggered: false,
            mode: Mode::Idle,
            speed_pars: pars.speed_pars,
            tumble_pars: pars.tumble_pars,
            protection_distance: pars.race_pars.protection_distance,
            print_events: false,
            car: Car::new(pars.speed_pars.lane_change_speed),
            curves,
            obstacles: Obstacles::new(),
            controls: Controls::new(),
            camera: CameraTarget {
                position: Vec3::new(0.0, 2.0, 5.0),
                look_at: Vec3::new(0.0, 0.5, 0.0),
            },
            scroll_delta: 0.0,
            top_speed: 0.0,
            rock_hits: 0,
            bomb_hits: 0,
            absorbed_hits: 0,
            handbrake_hold_ms: 0.0,
            rng,
        }
    }

    // ---------------------------------------------------------------------------------------------
    // MAIN METHOD ---------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// update simulates one frame. Exactly one mode is active; higher
    /// priority modes fully short-circuit the normal driving logic for
    /// the frame.
    pub fn update(&mut self, delta_ms: f64) {
        if matches!(self.mode, Mode::Idle) {
            return;
        }

        self.sim_time_ms += delta_ms;
        self.frames += 1;
        let scale = delta_ms / FRAME_MS;

        match self.mode {
            Mode::Idle => unreachable!(),
            Mode::Countdown(_) => self.update_countdown(scale),
            Mode::Exploding(_) => self.update_explosion(scale),
            Mode::BouncingBack(_) => self.update_bounce(scale),
            Mode::Tumbling(_) => self.update_tumble(scale),
            Mode::ReturningToNormal => self.update_return_to_normal(scale),
            Mode::Normal => self.update_normal(delta_ms, scale),
        }

        self.top_speed = self.top_speed.max(self.speed);
        self.obstacles.print_events = self.print_events;
    }

    /// start arms the countdown, places the car behind the camera for
    /// the drive-in animation and grants the starting protection.
    pub fn start(&mut self) {
        self.car.position = Vec3::new(0.0, REST_Y, DRIVE_IN_START_Z);
        self.car.rotation = Vec3::new(0.0, PI, 0.0);
        self.car.activate_protection(self.protection_distance);
        self.mode = Mode::Countdown(Countdown {
            start_ms: self.sim_time_ms,
        });

        if self.print_events {
            println!("INFO: Countdown started: {}", COUNTDOWN_TICKS);
        }
    }

    // ---------------------------------------------------------------------------------------------
    // MODE UPDATES --------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    fn update_countdown(&mut self, scale: f64) {
        let start_ms = match &self.mode {
            Mode::Countdown(c) => c.start_ms,
            _ => return,
        };
        let elapsed = self.sim_time_ms - start_ms;

        // drive-in: ease the car from behind the camera to its rest spot
        let t = clamp01(elapsed / DRIVE_IN_DURATION_MS);
        self.car.position.x = 0.0;
        self.car.position.y = REST_Y;
        self.car.position.z = DRIVE_IN_START_Z + (REST_Z - DRIVE_IN_START_Z) * ease_in_out(t);
        self.car.rotation = Vec3::new(0.0, PI, 0.0);

        // the road scrolls a fixed minimal amount for visual effect;
        // the race distance does not advance yet
        self.scroll_delta = COUNTDOWN_ROAD_DELTA * scale;

        self.camera = CameraTarget {
            position: Vec3::new(0.0, 2.0, 8.0),
            look_at: Vec3::new(
                self.car.position.x,
                self.car.position.y + 0.5,
                self.car.position.z,
            ),
        };

        if elapsed >= f64::from(COUNTDOWN_TICKS) * COUNTDOWN_TICK_MS {
            if self.print_events {
                println!("INFO: GO! Race started");
            }
            self.mode = Mode::Normal;
        }
    }

    fn update_normal(&mut self, delta_ms: f64, scale: f64) {
        self.update_speed(scale);
        self.handle_lane_change();
        self.handle_handbrake(delta_ms);
        if !matches!(self.mode, Mode::Normal) {
            // the handbrake hold may have started a tumble this frame
            return;
        }

        self.curves.update(self.total_distance);
        self.car.update(
            self.lane,
            self.curves.current_intensity(),
            self.curves.offset(),
            self.sim_time_ms,
        );

        let distance_this_frame = self.speed * SCROLL_NORMAL * scale;
        self.total_distance += distance_this_frame;
        self.scroll_delta = distance_this_frame;

        self.obstacles.update(
            distance_this_frame,
            self.total_distance,
            self.race_distance,
            &self.car,
            self.sim_time_ms,
            scale,
            &mut self.rng,
        );
        self.car.update_protection(distance_this_frame);

        if !self.race_finished {
            if let Some(outcome) = self.obstacles.check_collision(&self.car) {
                self.resolve_collision(outcome);
            }
        }

        self.check_finish(scale);

        self.camera = self.normal_camera();
    }

    fn update_bounce(&mut self, scale: f64) {
        let bounce = match &self.mode {
            Mode::BouncingBack(b) => *b,
            _ => return,
        };
        let t = clamp01((self.sim_time_ms - bounce.start_ms) / bounce.duration_ms);
        let eased = ease_out_cubic(t);

        // push the car backwards with decaying force plus a small
        // lateral jitter and a rolling oscillation
        let movement = bounce.force * (1.0 - eased);
        self.car.position.z += movement * 0.5 * scale;
        self.car.position.x += (self.rng.gen::<f64>() - 0.5) * movement * 0.1 * scale;
        self.car.rotation.z = (t * PI * 4.0).sin() * 0.3;

        self.advance_world(SCROLL_NORMAL, scale);

        let shake = (1.0 - t) * 0.4;
        let jitter_x = (self.rng.gen::<f64>() - 0.5) * shake;
        let jitter_y = (self.rng.gen::<f64>() - 0.5) * shake * 0.5;
        self.camera = CameraTarget {
            position: Vec3::new(
                self.car.position.x * 0.3 + jitter_x,
                2.0 + jitter_y,
                self.car.position.z + 5.0,
            ),
            look_at: Vec3::new(
                self.car.position.x,
                self.car.position.y,
                self.car.position.z - 2.0,
            ),
        };

        if t >= 1.0 {
            self.car.rotation.z = 0.0;
            self.mode = Mode::Normal;
            if self.print_events {
                println!("INFO: Bounce back completed");
            }
        }
    }

    fn update_explosion(&mut self, scale: f64) {
        let explosion = match &self.mode {
            Mode::Exploding(e) => *e,
            _ => return,
        };
        let elapsed = self.sim_time_ms - explosion.start_ms;

        // the flight animation runs on its own, shorter clock; it holds
        // its final pose while the explosion-level cleanup waits
        let t = clamp01(elapsed / explosion.flight_duration_ms);
        let eased = ease_out_cubic(t);
        self.car.position.y = explosion.origin.y + FLIGHT_HEIGHT * eased;
        self.car.position.z = explosion.origin.z - FLIGHT_BACKWARD * eased;
        self.car.rotation = explosion.origin_rotation + explosion.final_rotation * eased;

        self.advance_world(SCROLL_EXPLODING, scale);

        let jitter = |rng: &mut StdRng| (rng.gen::<f64>() - 0.5) * 0.5;
        let (jx, jy, jz) = (
            jitter(&mut self.rng),
            jitter(&mut self.rng),
            jitter(&mut self.rng),
        );
        self.camera = CameraTarget {
            position: Vec3::new(
                self.car.position.x + jx,
                self.car.position.y + 3.0 + jy,
                self.car.position.z + 8.0 + jz,
            ),
            look_at: self.car.position,
        };

        if elapsed >= explosion.explosion_duration_ms {
            // cleanup: restore tint and pose, then crash-land
            self.car.reset_tint();
            self.car.position = explosion.origin;
            // landing after a flight tumbles harder and longer
            self.start_tumble(self.tumble_pars.speed.max(0.2), 4000.0);
            if self.print_events {
                println!("INFO: Explosion finished, tumbling");
            }
        }
    }

    fn update_tumble(&mut self, scale: f64) {
        let tumble = match &self.mode {
            Mode::Tumbling(t) => *t,
            _ => return,
        };
        let elapsed = self.sim_time_ms - tumble.start_ms;
        let ts = tumble.rotation_speed;

        // chaotic rotation on all three axes, lateral jitter, bobbing
        self.car.rotation.x += ts * 1.5 * scale;
        self.car.rotation.y += ts * 0.8 * scale;
        self.car.rotation.z += ts * 1.2 * scale;
        self.car.position.x += (self.rng.gen::<f64>() - 0.5) * 0.4 * scale;
        self.car.position.y = REST_Y + (self.sim_time_ms * 0.02).sin() * 0.8;

        // rapid deceleration while tumbling
        self.speed = (self.speed - self.speed_pars.brake_decel * 12.0 * scale).max(0.0);

        self.advance_world(SCROLL_NORMAL, scale);

        // camera shake decays linearly over the tumble
        let shake = 0.4 * (1.0 - clamp01(elapsed / tumble.duration_ms));
        let (jx, jy, jz) = (
            (self.rng.gen::<f64>() - 0.5) * shake,
            (self.rng.gen::<f64>() - 0.5) * shake * 0.6,
            (self.rng.gen::<f64>() - 0.5) * shake * 0.3,
        );
        self.camera = CameraTarget {
            position: Vec3::new(
                self.car.position.x * 0.3 + jx,
                2.0 + jy,
                self.car.position.z + 5.0 + jz,
            ),
            look_at: self.car.position,
        };

        if elapsed >= tumble.duration_ms {
            self.mode = Mode::ReturningToNormal;
            if self.print_events {
                println!("INFO: Tumble finished, returning to normal");
            }
        }
    }

    fn update_return_to_normal(&mut self, scale: f64) {
        // exponential convergence towards the canonical pose; terminal
        // condition is deviation-based, not time-based
        let target_pos = Vec3::new(0.0, REST_Y, self.car.position.z);
        let target_rot = Vec3::new(0.0, PI, 0.0);
        self.car.position.approach(target_pos, RETURN_FACTOR);
        self.car.rotation.approach(target_rot, RETURN_FACTOR);

        self.advance_world(SCROLL_NORMAL, scale);

        self.camera = self.normal_camera();

        let pos_diff = self.car.position.abs_diff_sum(target_pos);
        let rot_diff = self.car.rotation.abs_diff_sum(target_rot);
        if pos_diff < RETURN_EPSILON && rot_diff < RETURN_EPSILON {
            self.car.snap_to_rest();
            self.car.reset_tint();
            self.mode = Mode::Normal;
            if self.print_events {
                println!("INFO: Car returned to normal");
            }
        }
    }

    // ---------------------------------------------------------------------------------------------
    // NORMAL-MODE PARTS ---------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    fn update_speed(&mut self, scale: f64) {
        let pars = self.speed_pars;

        if self.controls.accelerate && !self.race_finished {
            self.speed = (self.speed + pars.accel * scale).min(pars.max_speed);
        }
        if self.controls.brake || self.controls.handbrake {
            self.speed = (self.speed - pars.brake_decel * scale).max(0.0);
        }
        if !self.controls.accelerate
            && !self.controls.brake
            && !self.controls.handbrake
            && !self.race_finished
        {
            self.speed = (self.speed - pars.decel * scale).max(0.0);
        }
    }

    /// One discrete lane step per steering key edge, only while moving
    /// and before the finish line. An edge that arrives while steering
    /// is not accepted is dropped, not deferred.
    fn handle_lane_change(&mut self) {
        if self.speed <= MIN_STEERING_SPEED || self.race_finished || self.has_crossed_finish_line {
            self.controls.steer_left = false;
            self.controls.steer_right = false;
            return;
        }

        if self.controls.steer_left && self.lane > 0 {
            self.lane -= 1;
            self.controls.steer_left = false;
        }
        if self.controls.steer_right && self.lane < 2 {
            self.lane += 1;
            self.controls.steer_right = false;
        }
    }

    /// Holding the handbrake for a full second at speed throws the car
    /// into a tumble; below the threshold it just stops the car.
    fn handle_handbrake(&mut self, delta_ms: f64) {
        if !self.controls.handbrake {
            self.handbrake_hold_ms = 0.0;
            return;
        }

        self.handbrake_hold_ms += delta_ms;
        if self.handbrake_hold_ms < HANDBRAKE_HOLD_MS {
            return;
        }
        self.handbrake_hold_ms = 0.0;

        if self.speed > self.tumble_pars.threshold {
            self.start_tumble(self.tumble_pars.speed, self.tumble_pars.duration_ms);
        } else {
            self.speed = 0.0;
        }
    }

    fn resolve_collision(&mut self, outcome: CollisionOutcome) {
        match outcome {
            CollisionOutcome::Absorbed(kind) => {
                self.absorbed_hits += 1;
                self.speed *= PROTECTION_SPEED_PENALTY;
                if self.print_events {
                    println!("INFO: Protection absorbed a {} hit", kind.name());
                }
            }
            CollisionOutcome::RockHit => {
                self.rock_hits += 1;
                let force = self.speed * 0.8;
                self.speed *= 0.2;
                self.mode = Mode::BouncingBack(Bounce {
                    start_ms: self.sim_time_ms,
                    duration_ms: BOUNCE_DURATION_MS,
                    force,
                });
                if self.print_events {
                    println!(
                        "INFO: Hit rock, bouncing back with force {:.3}, new speed {:.3}",
                        force, self.speed
                    );
                }
            }
            CollisionOutcome::BombHit => {
                self.bomb_hits += 1;
                self.speed = 0.0;
                self.car.set_burnt_tint();

                let final_rotation = Vec3::new(
                    self.rng.gen::<f64>() * 2.0 * PI,
                    self.rng.gen::<f64>() * 2.0 * PI,
                    self.rng.gen::<f64>() * 2.0 * PI,
                );
                self.mode = Mode::Exploding(Explosion {
                    start_ms: self.sim_time_ms,
                    explosion_duration_ms: EXPLOSION_DURATION_MS,
                    flight_duration_ms: FLIGHT_DURATION_MS,
                    origin: self.car.position,
                    origin_rotation: self.car.rotation,
                    final_rotation,
                });
                if self.print_events {
                    println!("INFO: Bomb hit, exploding");
                }
            }
        }
    }

    fn check_finish(&mut self, scale: f64) {
        if !self.has_crossed_finish_line && self.total_distance >= self.race_distance {
            self.has_crossed_finish_line = true;
            self.race_finished = true;

            if self.speed > DRIFT_SPEED_THRESHOLD {
                self.drift_triggered = true;
                if self.print_events {
                    println!("INFO: Finish drift!");
                }
            }
            if self.print_events {
                println!(
                    "INFO: Finish line reached at {:.2} km",
                    self.total_distance / 1000.0
                );
            }
        }

        if self.race_finished {
            // roll out on residual speed, centered on the road
            self.speed = (self.speed - self.speed_pars.brake_decel * 1.5 * scale).max(0.0);
            self.lane = 1;
        }
    }

    fn start_tumble(&mut self, rotation_speed: f64, duration_ms: f64) {
        self.mode = Mode::Tumbling(Tumble {
            start_ms: self.sim_time_ms,
            duration_ms,
            rotation_speed,
        });
        if self.print_events {
            println!("INFO: Tumble triggered");
        }
    }

    /// advance_world scrolls road, obstacles and finish line by the
    /// mode-specific multiplier without advancing the race distance
    /// (pre-emptive modes do not make forward progress).
    fn advance_world(&mut self, multiplier: f64, scale: f64) {
        let distance_this_frame = self.speed * multiplier * scale;
        self.scroll_delta = distance_this_frame;
        self.obstacles.update(
            distance_this_frame,
            self.total_distance,
            self.race_distance,
            &self.car,
            self.sim_time_ms,
            scale,
            &mut self.rng,
        );
    }

    fn normal_camera(&self) -> CameraTarget {
        CameraTarget {
            position: Vec3::new(
                self.car.position.x * 0.3,
                2.0,
                self.car.position.z + 5.0,
            ),
            look_at: Vec3::new(
                self.car.position.x,
                self.car.position.y,
                self.car.position.z - 2.0,
            ),
        }
    }

    // ---------------------------------------------------------------------------------------------
    // CONFIGURATION AND TELEMETRY -----------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    pub fn set_race_distance(&mut self, distance_km: f64) {
        self.race_distance = distance_km * 1000.0;
    }

    pub fn set_speed_settings(&mut self, pars: SpeedPars) {
        self.speed_pars = pars;
    }

    pub fn set_tumble_settings(&mut self, pars: TumblePars) {
        self.tumble_pars = pars;
    }

    pub fn add_curve(&mut self, start: f64, end: f64, intensity: f64) {
        self.curves.add_curve(start, end, intensity);
    }

    pub fn clear_curves(&mut self) {
        self.curves.clear();
    }

    pub fn is_finished(&self) -> bool {
        self.race_finished
    }

    pub fn mode_name(&self) -> &'static str {
        self.mode.name()
    }

    pub fn protection_active(&self) -> bool {
        self.car.is_protected()
    }

    /// countdown_value returns the remaining whole seconds while the
    /// countdown runs, None otherwise.
    pub fn countdown_value(&self) -> Option<u32> {
        match &self.mode {
            Mode::Countdown(c) => {
                let elapsed = self.sim_time_ms - c.start_ms;
                let remaining =
                    (f64::from(COUNTDOWN_TICKS) - elapsed / COUNTDOWN_TICK_MS).ceil();
                Some(remaining.max(0.0) as u32)
            }
            _ => None,
        }
    }

    /// reset force-clears every mode flag, the active obstacle and all
    /// transient timer state back to initial values.
    pub fn reset(&mut self) {
        self.sim_time_ms = 0.0;
        self.frames = 0;
        self.total_distance = 0.0;
        self.speed = 0.0;
        self.lane = 1;
        self.race_finished = false;
        self.has_crossed_finish_line = false;
        self.drift_triggered = false;
        self.mode = Mode::Idle;
        self.scroll_delta = 0.0;
        self.top_speed = 0.0;
        self.rock_hits = 0;
        self.bomb_hits = 0;
        self.absorbed_hits = 0;
        self.handbrake_hold_ms = 0.0;
        self.controls.reset();
        self.obstacles.reset();
        self.curves.reset();
        self.car.reset();
        self.camera = CameraTarget {
            position: Vec3::new(0.0, 2.0, 5.0),
            look_at: Vec3::new(0.0, 0.5, 0.0),
        };

        if self.print_events {
            println!("INFO: Game reset");
        }
    }

    pub fn result(&self) -> RaceResult {
        RaceResult {
            race_distance: self.race_distance,
            total_distance: self.total_distance,
            sim_time_ms: self.sim_time_ms,
            frames: self.frames,
            top_speed: self.top_speed,
            rock_hits: self.rock_hits,
            bomb_hits: self.bomb_hits,
            absorbed_hits: self.absorbed_hits,
            obstacles_spawned: self.obstacles.spawned,
            drift_triggered: self.drift_triggered,
            finished: self.race_finished,
        }
    }

    /// snapshot packages the current frame for a renderer or HUD.
    pub fn snapshot(&self, final_result: Option<RaceResult>) -> FrameSnapshot {
        FrameSnapshot {
            sim_time_ms: self.sim_time_ms,
            total_distance: self.total_distance,
            race_distance: self.race_distance,
            speed: self.speed,
            mode: self.mode.name(),
            countdown_value: self.countdown_value(),
            scroll_delta: self.scroll_delta,
            car: CarPose {
                position: self.car.position,
                rotation: self.car.rotation,
                burnt: self.car.burnt,
            },
            obstacle: self.obstacles.active().map(|obstacle| ObstacleView {
                kind: obstacle.kind,
                position: obstacle.position,
                spin: obstacle.spin,
            }),
            camera: self.camera,
            protection_active: self.car.is_protected(),
            finished: self.race_finished,
            final_result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pre::read_game_pars::GamePars;
    use approx::assert_relative_eq;

    fn game() -> Game {
        let mut pars = GamePars::default();
        pars.race_pars.rng_seed = Some(42);
        pars.race_pars.protection_distance = 0.0;
        pars.curves.clear();
        let mut game = Game::new(&pars);
        game.mode = Mode::Normal;
        game
    }

    #[test]
    fn speed_stays_within_bounds_in_normal_mode() {
        let mut game = game();
        game.controls.accelerate = true;

        // the ramp tops out after 100 frames having covered 50.5 m, so
        // the run stays short of the 100 m spawn mark and no obstacle
        // can knock the car out of normal mode
        for _ in 0..120 {
            game.update(16.0);
            assert!(game.speed >= 0.0);
            assert!(game.speed <= 0.2 + 1e-12);
            assert_eq!(game.mode_name(), "normal");
        }
        assert_relative_eq!(game.speed, 0.2);

        game.controls.accelerate = false;
        game.controls.brake = true;
        for _ in 0..200 {
            game.update(16.0);
            assert!(game.speed >= 0.0);
        }
        assert_eq!(game.mode_name(), "normal");
        assert_relative_eq!(game.speed, 0.0);
    }

    #[test]
    fn rock_hit_enters_bounce_with_deterministic_force() {
        let mut game = game();
        game.speed = 0.5;
        game.resolve_collision(CollisionOutcome::RockHit);

        assert_relative_eq!(game.speed, 0.1, epsilon = 1e-12);
        match &game.mode {
            Mode::BouncingBack(b) => assert_relative_eq!(b.force, 0.4, epsilon = 1e-12),
            other => panic!("expected bounce, got {}", other.name()),
        }
    }

    #[test]
    fn absorbed_hit_keeps_normal_mode() {
        let mut game = game();
        game.speed = 0.2;
        game.resolve_collision(CollisionOutcome::Absorbed(
            crate::core::obstacles::ObstacleKind::Rock,
        ));

        assert_eq!(game.mode_name(), "normal");
        assert_relative_eq!(game.speed, 0.18, epsilon = 1e-12);
        assert_eq!(game.absorbed_hits, 1);
    }

    #[test]
    fn bomb_hit_explodes_then_tumbles_then_recovers() {
        let mut game = game();
        game.speed = 0.2;
        game.resolve_collision(CollisionOutcome::BombHit);

        assert_eq!(game.mode_name(), "exploding");
        assert_relative_eq!(game.speed, 0.0);
        assert!(game.car.burnt);

        // run out the explosion (3000 ms)
        for _ in 0..((3000 / 16) + 1) {
            game.update(16.0);
        }
        assert_eq!(game.mode_name(), "tumbling");
        assert!(!game.car.burnt);

        // run out the extended landing tumble (4000 ms)
        for _ in 0..((4000 / 16) + 1) {
            game.update(16.0);
        }
        assert_eq!(game.mode_name(), "returning_to_normal");

        let mut frames = 0;
        while game.mode_name() == "returning_to_normal" {
            game.update(16.0);
            frames += 1;
            assert!(frames < 1000, "convergence must terminate");
        }
        assert_eq!(game.mode_name(), "normal");
        assert_relative_eq!(game.car.position.x, 0.0);
        assert_relative_eq!(game.car.position.y, REST_Y);
        assert_relative_eq!(game.car.rotation.y, PI);
    }

    #[test]
    fn return_to_normal_deviation_decreases_monotonically() {
        let mut game = game();
        game.car.position = Vec3::new(2.0, 1.0, 5.0);
        game.car.rotation = Vec3::new(1.0, 0.0, 1.0);
        game.mode = Mode::ReturningToNormal;

        let target_rot = Vec3::new(0.0, PI, 0.0);
        let mut prev = game.car.rotation.abs_diff_sum(target_rot)
            + game.car.position.abs_diff_sum(Vec3::new(0.0, REST_Y, 5.0));

        let mut frames = 0;
        while game.mode_name() == "returning_to_normal" {
            game.update(16.0);
            let target_pos = Vec3::new(0.0, REST_Y, game.car.position.z);
            let cur = game.car.rotation.abs_diff_sum(target_rot)
                + game.car.position.abs_diff_sum(target_pos);
            assert!(cur <= prev + 1e-12);
            prev = cur;
            frames += 1;
            assert!(frames < 500);
        }
    }

    #[test]
    fn finish_is_monotonic_and_one_shot() {
        let mut game = game();
        game.set_race_distance(0.01); // 10 m
        game.speed = 0.5;
        game.controls.accelerate = true;

        let mut finish_frame = None;
        for frame in 0..200 {
            game.update(16.0);
            if game.has_crossed_finish_line && finish_frame.is_none() {
                finish_frame = Some(frame);
                assert!(game.total_distance >= game.race_distance);
            }
            if finish_frame.is_some() {
                assert!(game.has_crossed_finish_line);
                assert!(game.race_finished);
                assert_eq!(game.lane, 1);
            }
        }
        assert!(finish_frame.is_some());
        assert_relative_eq!(game.speed, 0.0);
    }

    #[test]
    fn lane_changes_require_speed_and_consume_the_edge() {
        let mut game = game();
        game.controls.steer_left = true;
        game.update(16.0);
        // standing still: the press is dropped, lane unchanged
        assert_eq!(game.lane, 1);
        assert!(!game.controls.steer_left);

        // the dropped edge must not fire once the car gets moving
        game.speed = 0.1;
        game.update(16.0);
        assert_eq!(game.lane, 1);

        game.controls.steer_left = true;
        game.update(16.0);
        assert_eq!(game.lane, 0);
        assert!(!game.controls.steer_left);

        // clamped at the leftmost lane
        game.controls.steer_left = true;
        game.update(16.0);
        assert_eq!(game.lane, 0);
    }

    #[test]
    fn handbrake_hold_at_speed_triggers_tumble() {
        let mut game = game();
        game.speed = 0.2;
        // throttle fights the handbrake drag, keeping the car above the
        // tumble threshold through the full hold
        game.controls.accelerate = true;
        game.controls.handbrake = true;

        for _ in 0..((1000 / 16) + 1) {
            game.update(16.0);
        }
        assert_eq!(game.mode_name(), "tumbling");
    }

    #[test]
    fn handbrake_hold_below_threshold_just_stops() {
        let mut game = game();
        game.speed = 0.05;
        game.controls.handbrake = true;

        for _ in 0..((1000 / 16) + 1) {
            game.update(16.0);
        }
        // brake drag empties the little speed there was; no tumble
        assert_eq!(game.mode_name(), "normal");
        assert_relative_eq!(game.speed, 0.0);
    }

    #[test]
    fn reset_round_trip_from_any_mode() {
        let mut game = game();
        game.speed = 0.3;
        game.resolve_collision(CollisionOutcome::BombHit);
        game.total_distance = 500.0;
        game.race_finished = true;
        game.has_crossed_finish_line = true;

        game.reset();

        assert_relative_eq!(game.total_distance, 0.0);
        assert_relative_eq!(game.speed, 0.0);
        assert_eq!(game.mode_name(), "idle");
        assert!(!game.race_finished);
        assert!(!game.has_crossed_finish_line);
        assert!(game.obstacles.active().is_none());
    }

    #[test]
    fn countdown_runs_five_ticks_then_normal() {
        let mut pars = GamePars::default();
        pars.race_pars.rng_seed = Some(1);
        let mut game = Game::new(&pars);
        game.start();

        assert_eq!(game.mode_name(), "countdown");
        assert_eq!(game.countdown_value(), Some(5));

        // distance must not advance during the countdown
        for _ in 0..100 {
            game.update(16.0);
        }
        assert_relative_eq!(game.total_distance, 0.0);

        while game.mode_name() == "countdown" {
            game.update(16.0);
        }
        assert_eq!(game.mode_name(), "normal");
        assert_relative_eq!(game.car.position.z, REST_Z, epsilon = 1e-9);
        assert_eq!(game.countdown_value(), None);
    }
}
