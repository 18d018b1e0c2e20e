mod play;

use clap::Parser;
use roadsim::core::game::FRAME_MS;
use roadsim::core::handle_game::{handle_game, handle_game_headless};
use roadsim::interfaces::render_interface::FrameSnapshot;
use roadsim::pre::read_game_pars::{read_game_pars, GamePars};
use roadsim::pre::sim_opts::SimOpts;
use std::thread;
use std::time::Instant;

/// print_snapshot_hud renders one spectator line for demo mode.
fn print_snapshot_hud(snapshot: &FrameSnapshot) {
    if let Some(countdown) = snapshot.countdown_value {
        println!("INFO: Countdown... {}", countdown);
        return;
    }
    println!(
        "INFO: t={:6.1}s  {:7.1}m / {:.0}m  speed={:.3}  mode={}{}",
        snapshot.sim_time_ms / 1000.0,
        snapshot.total_distance,
        snapshot.race_distance,
        snapshot.speed,
        snapshot.mode,
        if snapshot.protection_active {
            "  [protected]"
        } else {
            ""
        }
    );
}

fn main() -> anyhow::Result<()> {
    // PRE-PROCESSING ------------------------------------------------------------------------------
    // get simulation options from the command line arguments
    let sim_opts: SimOpts = SimOpts::parse();

    // get game parameters
    let mut game_pars = if let Some(parfile_path) = &sim_opts.parfile_path {
        println!("INFO: Reading game parameters from {:?}", parfile_path);
        read_game_pars(parfile_path)?
    } else {
        println!("INFO: No parameter file provided, using defaults");
        GamePars::default()
    };
    if let Some(distance_km) = sim_opts.distance_km {
        game_pars.race_pars.distance_km = distance_km;
    }
    if let Some(seed) = sim_opts.seed {
        game_pars.race_pars.rng_seed = Some(seed);
    }

    println!(
        "INFO: Race distance is {:.2} km, frame length is {:.1} ms",
        game_pars.race_pars.distance_km, FRAME_MS
    );

    // EXECUTION -----------------------------------------------------------------------------------
    if sim_opts.play {
        // INTERACTIVE CASE - player drives in the terminal
        let result = play::run_interactive(&game_pars, sim_opts.max_frames)?;
        result.print_summary();
    } else if sim_opts.demo {
        // DEMO CASE - real-time scripted run, spectated over a channel
        println!("INFO: Starting demo spectator run...");
        let (tx, rx) = flume::unbounded();

        let game_pars_thread = game_pars.clone();
        let sim_opts_thread = sim_opts.clone();
        let sim_handle = thread::spawn(move || {
            handle_game(
                &game_pars_thread,
                FRAME_MS,
                sim_opts_thread.max_frames,
                false,
                Some(&tx),
                sim_opts_thread.realtime_factor,
                true,
            )
        });

        // snapshots arrive at up to 60 Hz; print at a readable pace
        let mut t_last_print = f64::MIN;
        let mut last_countdown = None;
        for snapshot in rx.iter() {
            if let Some(result) = &snapshot.final_result {
                result.print_summary();
                break;
            }
            let countdown_changed = snapshot.countdown_value != last_countdown;
            last_countdown = snapshot.countdown_value;
            if countdown_changed || snapshot.sim_time_ms >= t_last_print + 500.0 {
                print_snapshot_hud(&snapshot);
                t_last_print = snapshot.sim_time_ms;
            }
        }

        match sim_handle.join() {
            Ok(run) => {
                run?;
            }
            Err(_) => anyhow::bail!("Simulation thread panicked!"),
        }
    } else {
        // HEADLESS CASE - batch run without visualization
        println!("INFO: Running headless simulation...");
        let t_start = Instant::now();

        let result = handle_game_headless(
            &game_pars,
            sim_opts.max_frames,
            sim_opts.debug,
            true,
        )?;

        println!("INFO: Execution time: {}ms", t_start.elapsed().as_millis());
        result.print_summary();
    }

    Ok(())
}
