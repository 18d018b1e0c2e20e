use helpers::vec3::{Aabb, Vec3};
use serde::Deserialize;
use std::f64::consts::PI;

/// Lane center x-coordinates, left to right.
pub const LANE_POSITIONS: [f64; 3] = [-1.5, 0.0, 1.5];

/// Resting pose of the car on the road.
pub const REST_Y: f64 = 0.3;
pub const REST_Z: f64 = 2.0;

/// * `max_speed` - Speed ceiling (distance units per frame unit)
/// * `accel` - Speed gained per frame while accelerating
/// * `decel` - Speed lost per frame while coasting
/// * `brake_decel` - Speed lost per frame while braking
/// * `lane_change_speed` - Lateral smoothing factor per frame
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct SpeedPars {
    #[serde(default = "default_max_speed")]
    pub max_speed: f64,
    #[serde(default = "default_accel")]
    pub accel: f64,
    #[serde(default = "default_decel")]
    pub decel: f64,
    #[serde(default = "default_brake_decel")]
    pub brake_decel: f64,
    #[serde(default = "default_lane_change_speed")]
    pub lane_change_speed: f64,
}

fn default_max_speed() -> f64 {
    0.2
}

fn default_accel() -> f64 {
    0.002
}

fn default_decel() -> f64 {
    0.001
}

fn default_brake_decel() -> f64 {
    0.003
}

fn default_lane_change_speed() -> f64 {
    0.1
}

impl Default for SpeedPars {
    fn default() -> Self {
        SpeedPars {
            max_speed: default_max_speed(),
            accel: default_accel(),
            decel: default_decel(),
            brake_decel: default_brake_decel(),
            lane_change_speed: default_lane_change_speed(),
        }
    }
}

/// Protection absorbs collisions for a limited travel distance. While it
/// is active a hit costs a small speed penalty instead of an incident.
#[derive(Debug, Clone, Copy, Default)]
pub struct Protection {
    pub active: bool,
    pub remaining_distance: f64,
}

/// Car owns the vehicle pose, the lateral lane smoothing, the collision
/// extents and the protection state. Speed itself lives in the game
/// state; the car only integrates position and rotation intent.
#[derive(Debug)]
pub struct Car {
    pub position: Vec3,
    pub rotation: Vec3,
    pub burnt: bool,
    pub protection: Protection,
    half_extents: Vec3,
    lane_change_speed: f64,
}

impl Car {
    pub fn new(lane_change_speed: f64) -> Car {
        Car {
            position: Vec3::new(0.0, REST_Y, REST_Z),
            rotation: Vec3::new(0.0, PI, 0.0),
            burnt: false,
            protection: Protection::default(),
            // placeholder body is a 0.8 x 0.4 x 1.5 box
            half_extents: Vec3::new(0.4, 0.2, 0.75),
            lane_change_speed,
        }
    }

    /// update integrates the lateral lane target and the curve lean for
    /// one frame of normal driving.
    pub fn update(
        &mut self,
        lane: usize,
        curve_intensity: f64,
        curve_offset: f64,
        sim_time_ms: f64,
    ) {
        let target_x = LANE_POSITIONS[lane] + curve_offset;
        self.position.x += (target_x - self.position.x) * self.lane_change_speed;

        if curve_intensity != 0.0 {
            self.rotation.y = PI + curve_intensity * 0.3;
            self.rotation.z = -curve_intensity * 0.2;
        } else {
            self.rotation.y = PI;
            self.rotation.z += (0.0 - self.rotation.z) * 0.1;
        }

        // idle bob
        self.position.y = REST_Y + (sim_time_ms * 0.005).sin() * 0.02;
    }

    pub fn activate_protection(&mut self, distance: f64) {
        self.protection.active = distance > 0.0;
        self.protection.remaining_distance = distance.max(0.0);
    }

    /// update_protection burns protection distance as the world scrolls
    /// by and deactivates automatically once it runs out.
    pub fn update_protection(&mut self, distance_delta: f64) {
        if !self.protection.active {
            return;
        }

        self.protection.remaining_distance -= distance_delta;
        if self.protection.remaining_distance <= 0.0 {
            self.protection.active = false;
            self.protection.remaining_distance = 0.0;
        }
    }

    pub fn is_protected(&self) -> bool {
        self.protection.active
    }

    pub fn set_burnt_tint(&mut self) {
        self.burnt = true;
    }

    pub fn reset_tint(&mut self) {
        self.burnt = false;
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::new(self.position, self.half_extents)
    }

    /// snap_to_rest puts the car exactly on the canonical resting pose,
    /// keeping the current z so the world does not jump.
    pub fn snap_to_rest(&mut self) {
        self.position.x = 0.0;
        self.position.y = REST_Y;
        self.rotation = Vec3::new(0.0, PI, 0.0);
    }

    pub fn reset(&mut self) {
        self.position = Vec3::new(0.0, REST_Y, REST_Z);
        self.rotation = Vec3::new(0.0, PI, 0.0);
        self.burnt = false;
        self.protection = Protection::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn lane_change_is_smoothed_not_snapped() {
        let mut car = Car::new(0.1);
        car.update(2, 0.0, 0.0, 0.0);

        // one frame covers exactly one tenth of the gap
        assert_relative_eq!(car.position.x, 0.15, epsilon = 1e-12);
        assert!(car.position.x < LANE_POSITIONS[2]);
    }

    #[test]
    fn protection_burns_down_and_deactivates() {
        let mut car = Car::new(0.1);
        car.activate_protection(50.0);
        assert!(car.is_protected());

        car.update_protection(30.0);
        assert!(car.is_protected());
        assert_relative_eq!(car.protection.remaining_distance, 20.0);

        car.update_protection(25.0);
        assert!(!car.is_protected());
        assert_relative_eq!(car.protection.remaining_distance, 0.0);
    }

    #[test]
    fn curve_lean_follows_intensity() {
        let mut car = Car::new(0.1);
        car.update(1, 0.02, 0.1, 0.0);

        assert_relative_eq!(car.rotation.y, PI + 0.006, epsilon = 1e-12);
        assert_relative_eq!(car.rotation.z, -0.004, epsilon = 1e-12);
    }
}
