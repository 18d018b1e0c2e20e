//! End-to-end race scenarios driven through the public crate API.

use roadsim::core::game::{Game, FRAME_MS};
use roadsim::core::handle_game::handle_game;
use roadsim::pre::read_game_pars::GamePars;
use std::thread;

fn short_race_pars(distance_km: f64, seed: u64) -> GamePars {
    let mut pars = GamePars::default();
    pars.race_pars.distance_km = distance_km;
    pars.race_pars.rng_seed = Some(seed);
    pars
}

/// A 150 m race never spawns an obstacle (the first spawn at 100 m
/// falls inside the finish suppression margin), so the crossing frame
/// is fully determined by the speed ramp: the car reaches max speed
/// 0.2 after 100 frames having covered 50.5 m, then gains exactly
/// 1.0 m per frame.
#[test]
fn full_throttle_run_crosses_on_the_exact_frame() {
    let mut game = Game::new(&short_race_pars(0.15, 11));
    game.start();

    // run out the countdown; distance must not move yet
    while game.countdown_value().is_some() {
        game.controls.accelerate = true;
        game.update(FRAME_MS);
    }
    assert_eq!(game.mode_name(), "normal");
    assert!(game.total_distance.abs() < 1e-9);
    let frames_at_go = game.frames;

    while !game.is_finished() {
        game.controls.accelerate = true;
        game.update(FRAME_MS);
        assert!(game.frames - frames_at_go <= 500, "race must terminate");
    }

    // ramp: 0.01 * (1 + ... + 100) * 5-scroll = 50.5 m over 100 frames,
    // then 99.5 m remain at 1.0 m per frame -> crossing on frame 200
    assert_eq!(game.frames - frames_at_go, 200);
    assert!((game.total_distance - 150.5).abs() < 1e-9);
    assert!(game.has_crossed_finish_line);

    // obstacle spawns were all suppressed by the finish margin
    let result = game.result();
    assert_eq!(result.obstacles_spawned, 0);

    // roll-out: the car keeps scrolling on residual speed and stops
    let mut frames = 0;
    while game.speed > 0.0 {
        game.update(FRAME_MS);
        frames += 1;
        assert!(frames < 200);
    }
    assert_eq!(game.lane, 1);
}

/// No obstacle may appear during the protected opening stretch, and
/// the first one has to spawn at or beyond the 100 m cadence mark.
#[test]
fn first_obstacle_spawns_at_the_cadence_mark() {
    let mut game = Game::new(&short_race_pars(5.0, 21));
    game.start();

    let mut first_spawn_distance = None;
    while !game.is_finished() && game.frames < 50_000 {
        game.controls.accelerate = true;
        game.update(FRAME_MS);
        if first_spawn_distance.is_none() && game.obstacles.active().is_some() {
            first_spawn_distance = Some(game.total_distance);
            break;
        }
    }

    let distance = first_spawn_distance.expect("an obstacle must spawn over 5 km");
    assert!(distance >= 100.0);
    assert!(distance < 150.0);
}

/// The realtime driver streams snapshots over the channel in simulated
/// time order and closes with exactly one final-result message.
#[test]
fn realtime_run_streams_ordered_snapshots_and_final_result() {
    let pars = short_race_pars(0.15, 7);
    let (tx, rx) = flume::unbounded();

    let handle = thread::spawn(move || {
        handle_game(&pars, FRAME_MS, 50_000, false, Some(&tx), 16.0, false)
    });

    let snapshots: Vec<_> = rx.iter().collect();
    let result = handle.join().expect("simulation thread must not panic");
    let result = result.expect("realtime run must succeed");

    assert!(result.finished);
    assert!(snapshots.len() > 10);

    let mut last_t = -1.0;
    for snapshot in &snapshots {
        assert!(snapshot.sim_time_ms >= last_t);
        last_t = snapshot.sim_time_ms;
    }

    let finals: Vec<_> = snapshots
        .iter()
        .filter(|s| s.final_result.is_some())
        .collect();
    assert_eq!(finals.len(), 1);
    assert!(snapshots.last().unwrap().final_result.is_some());
}
