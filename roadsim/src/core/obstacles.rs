use crate::core::car::{Car, LANE_POSITIONS};
use helpers::vec3::{Aabb, Vec3};
use rand::rngs::StdRng;
use rand::Rng;
use std::f64::consts::PI;

/// Road obstacle kinds. Drop-rocks fall in from above before settling
/// into the common floating animation; bombs trigger the explosion path
/// on impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Rock,
    DropRock,
    Bomb,
}

impl ObstacleKind {
    pub fn name(&self) -> &'static str {
        match self {
            ObstacleKind::Rock => "rock",
            ObstacleKind::DropRock => "drop_rock",
            ObstacleKind::Bomb => "bomb",
        }
    }
}

/// Uniform draw over this table; the three bomb entries (road bomb
/// variants plus the car bomb) make bombs collectively more frequent.
const SPAWN_TABLE: [ObstacleKind; 5] = [
    ObstacleKind::Rock,
    ObstacleKind::DropRock,
    ObstacleKind::Bomb,
    ObstacleKind::Bomb,
    ObstacleKind::Bomb,
];

const FIRST_SPAWN_DISTANCE: f64 = 100.0;
const FINISH_SUPPRESS_MARGIN: f64 = 100.0;
const SPAWN_AHEAD_OF_CAR: f64 = 50.0;
const PASS_MARGIN: f64 = 5.0;
const GROUND_Y: f64 = 0.8;
const DROP_START_Y: f64 = 5.0;
const DROP_RATE: f64 = 0.3;

#[derive(Debug)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub lane: usize,
    pub position: Vec3,
    pub spin: f64,
    /// settles at GROUND_Y once a drop-rock has landed
    base_y: f64,
    float_phase: f64,
}

impl Obstacle {
    fn half_extents(&self) -> Vec3 {
        // drop-rocks are slightly bigger cubes than ground obstacles
        match self.kind {
            ObstacleKind::DropRock => Vec3::new(0.35, 0.35, 0.35),
            _ => Vec3::new(0.3, 0.3, 0.3),
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::new(self.position, self.half_extents())
    }
}

/// Outcome of a collision test, after the obstacle has been removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// protection absorbed the hit; only a small speed penalty applies
    Absorbed(ObstacleKind),
    RockHit,
    BombHit,
}

/// Obstacles manages at most one active obstacle: spawn cadence by
/// distance, per-frame advection towards the car, and the collision
/// test against the vehicle bounding volume.
#[derive(Debug)]
pub struct Obstacles {
    active: Option<Obstacle>,
    next_obstacle_distance: f64,
    pub spawned: u32,
    pub print_events: bool,
}

impl Obstacles {
    pub fn new() -> Obstacles {
        Obstacles {
            active: None,
            next_obstacle_distance: FIRST_SPAWN_DISTANCE,
            spawned: 0,
            print_events: false,
        }
    }

    pub fn active(&self) -> Option<&Obstacle> {
        self.active.as_ref()
    }

    pub fn next_obstacle_distance(&self) -> f64 {
        self.next_obstacle_distance
    }

    /// update spawns (if due) and advances the active obstacle by the
    /// world-scroll delta of this frame.
    pub fn update(
        &mut self,
        distance_this_frame: f64,
        total_distance: f64,
        race_distance: f64,
        car: &Car,
        sim_time_ms: f64,
        scale: f64,
        rng: &mut StdRng,
    ) {
        // spawn cadence re-arms only after a successful spawn; a spawn
        // suppressed near the finish line stays pending
        if total_distance >= self.next_obstacle_distance
            && self.active.is_none()
            && total_distance < race_distance - FINISH_SUPPRESS_MARGIN
        {
            self.spawn(car, rng);
            self.next_obstacle_distance += 100.0 + rng.gen::<f64>() * 200.0;
        }

        let obstacle = match self.active.as_mut() {
            Some(obstacle) => obstacle,
            None => return,
        };

        // drop-rocks fall until they reach ground height
        if obstacle.kind == ObstacleKind::DropRock && obstacle.base_y > GROUND_Y {
            obstacle.base_y = (obstacle.base_y - DROP_RATE * scale).max(GROUND_Y);
        }

        // common floating / spinning animation
        let bob = (sim_time_ms * 0.001 + obstacle.float_phase).sin() * 0.2;
        obstacle.position.y = obstacle.base_y + bob;
        obstacle.spin += 0.02 * scale;

        // advect towards the car by the same delta as the road
        obstacle.position.z += distance_this_frame;

        if obstacle.position.z > car.position.z + PASS_MARGIN {
            if self.print_events {
                println!(
                    "INFO: Removed {} obstacle behind the car",
                    obstacle.kind.name()
                );
            }
            self.active = None;
        }
    }

    fn spawn(&mut self, car: &Car, rng: &mut StdRng) {
        let kind = SPAWN_TABLE[rng.gen_range(0..SPAWN_TABLE.len())];
        let lane = rng.gen_range(0..LANE_POSITIONS.len());

        let base_y = if kind == ObstacleKind::DropRock {
            DROP_START_Y
        } else {
            GROUND_Y
        };

        self.active = Some(Obstacle {
            kind,
            lane,
            position: Vec3::new(
                LANE_POSITIONS[lane],
                base_y,
                car.position.z - SPAWN_AHEAD_OF_CAR,
            ),
            spin: 0.0,
            base_y,
            float_phase: rng.gen::<f64>() * 2.0 * PI,
        });
        self.spawned += 1;

        if self.print_events {
            println!("INFO: Spawned {} obstacle at lane {}", kind.name(), lane);
        }
    }

    /// check_collision runs the bounding-volume intersection test. The
    /// obstacle is removed unconditionally once a collision resolves; a
    /// missing obstacle is a no-op.
    pub fn check_collision(&mut self, car: &Car) -> Option<CollisionOutcome> {
        let obstacle = self.active.as_ref()?;

        if !car.bounding_box().intersects(&obstacle.bounding_box()) {
            return None;
        }

        let kind = obstacle.kind;
        if self.print_events {
            println!("INFO: Collision with {}!", kind.name());
        }
        self.active = None;

        if car.is_protected() {
            return Some(CollisionOutcome::Absorbed(kind));
        }

        match kind {
            ObstacleKind::Rock | ObstacleKind::DropRock => Some(CollisionOutcome::RockHit),
            ObstacleKind::Bomb => Some(CollisionOutcome::BombHit),
        }
    }

    pub fn reset(&mut self) {
        self.active = None;
        self.next_obstacle_distance = FIRST_SPAWN_DISTANCE;
        self.spawned = 0;
    }
}
