use crate::core::game::{Game, FRAME_MS};
use crate::interfaces::render_interface::{FrameSnapshot, MAX_RENDER_UPDATE_FREQUENCY};
use crate::post::race_result::RaceResult;
use crate::pre::read_game_pars::GamePars;
use anyhow::Context;
use flume::Sender;
use std::thread::sleep;
use std::time::{Duration, Instant};

/// Autopilot steers the car for unattended runs: full throttle, and a
/// lane step away from the active obstacle once it comes close enough
/// (unless the starting protection still covers the hit).
const AVOID_DISTANCE: f64 = 20.0;

fn apply_autopilot(game: &mut Game) {
    game.controls.accelerate = true;

    if game.protection_active() {
        return;
    }
    if let Some(obstacle) = game.obstacles.active() {
        let gap = obstacle.position.z - game.car.position.z;
        if obstacle.lane == game.lane && gap.abs() < AVOID_DISTANCE {
            if game.lane == 0 {
                game.controls.steer_right = true;
            } else {
                game.controls.steer_left = true;
            }
        }
    }
}

/// handle_game creates and simulates a race on the basis of the inserted parameters, and returns
/// the result for post-processing.
pub fn handle_game(
    game_pars: &GamePars,
    delta_ms: f64,
    max_frames: u64,
    print_debug: bool,
    tx: Option<&Sender<FrameSnapshot>>,
    realtime_factor: f64,
    print_events: bool,
) -> anyhow::Result<RaceResult> {
    let mut game = Game::new(game_pars);
    game.print_events = print_events;
    game.start();

    // check if sender was inserted -> in that case use real-time simulation for the renderer
    let sim_realtime = tx.is_some();
    if !sim_realtime {
        let mut t_update_print = 0.0;
        while !game.is_finished() && game.frames < max_frames {
            apply_autopilot(&mut game);
            game.update(delta_ms);
            if print_debug && game.sim_time_ms > t_update_print + 999.9 {
                println!(
                    "INFO: Simulating... t={:.1}s, distance={:.1}m, speed={:.3}, mode={}",
                    game.sim_time_ms / 1000.0,
                    game.total_distance,
                    game.speed,
                    game.mode_name()
                );
                t_update_print = game.sim_time_ms;
            }
        }

        // let the car roll out after the finish line
        while game.is_finished() && game.speed > 0.0 && game.frames < max_frames {
            game.controls.reset();
            game.update(delta_ms);
        }
    } else {
        let mut t_update_print = 0.0;
        let mut t_update_render = 0.0;
        let snapshot_interval_ms = 1000.0 / MAX_RENDER_UPDATE_FREQUENCY;

        loop {
            let t_start = Instant::now();
            if game.is_finished() {
                game.controls.reset();
            } else {
                apply_autopilot(&mut game);
            }
            game.update(delta_ms);

            if print_debug && game.sim_time_ms > t_update_print + 999.9 {
                println!(
                    "INFO: Simulating... t={:.1}s, distance={:.1}m, mode={}",
                    game.sim_time_ms / 1000.0,
                    game.total_distance,
                    game.mode_name()
                );
                t_update_print = game.sim_time_ms;
            }

            if game.sim_time_ms > t_update_render + snapshot_interval_ms - 0.001 {
                tx.unwrap()
                    .send(game.snapshot(None))
                    .context("Failed to send frame snapshot to renderer!")?;
                t_update_render = game.sim_time_ms;
            }

            if (game.is_finished() && game.speed <= 0.0) || game.frames >= max_frames {
                break;
            }

            // sleep until the frame is finished in real-time as well (calculation in ms)
            let t_sleep = (delta_ms / realtime_factor) as i64 - t_start.elapsed().as_millis() as i64;
            if t_sleep > 0 {
                sleep(Duration::from_millis(t_sleep as u64));
            } else {
                println!("WARNING: Could not keep up with real-time!")
            }
        }

        // after real-time loop finishes, send final result once
        if let Some(tx) = tx {
            let result = game.result();
            tx.send(game.snapshot(Some(result)))
                .context("Failed to send final result to renderer!")?;
        }
    }

    if print_debug {
        println!(
            "DEBUG: Run took {} frames at {:.1} ms per frame ({:.1}s simulated)",
            game.frames,
            delta_ms,
            game.sim_time_ms / 1000.0
        );
    }

    // return race result
    Ok(game.result())
}

/// handle_game_headless runs with the reference frame length and no renderer.
pub fn handle_game_headless(
    game_pars: &GamePars,
    max_frames: u64,
    print_debug: bool,
    print_events: bool,
) -> anyhow::Result<RaceResult> {
    handle_game(
        game_pars,
        FRAME_MS,
        max_frames,
        print_debug,
        None,
        1.0,
        print_events,
    )
}
