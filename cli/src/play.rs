//! Interactive terminal mode: the player drives the car with the
//! keyboard while the simulation runs at its reference frame rate.

use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::{cursor, execute, queue, terminal};
use roadsim::core::game::{Game, FRAME_MS};
use roadsim::post::race_result::RaceResult;
use roadsim::pre::read_game_pars::GamePars;
use std::collections::HashMap;
use std::io::{stdout, Write};
use std::time::{Duration, Instant};

/// A key counts as "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release
/// events: the OS key-repeat rate refreshes the window before expiry.
const HOLD_WINDOW: u64 = 4;

fn is_held(key_frame: &HashMap<KeyCode, u64>, key: KeyCode, frame: u64) -> bool {
    key_frame
        .get(&key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

/// run_interactive sets up the terminal, drives the game loop and
/// restores the terminal before returning the run result.
pub fn run_interactive(game_pars: &GamePars, max_frames: u64) -> anyhow::Result<RaceResult> {
    let mut out = stdout();
    terminal::enable_raw_mode().context("Failed to enable terminal raw mode!")?;
    execute!(out, terminal::EnterAlternateScreen, cursor::Hide)
        .context("Failed to enter alternate screen!")?;

    let result = game_loop(&mut out, game_pars, max_frames);

    // always restore the terminal, even when the loop errored
    let _ = execute!(out, cursor::Show, terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn game_loop<W: Write>(
    out: &mut W,
    game_pars: &GamePars,
    max_frames: u64,
) -> anyhow::Result<RaceResult> {
    let mut game = Game::new(game_pars);
    game.start();

    // maps each held key to the frame it was last seen (press or repeat)
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let frame_duration = Duration::from_millis(FRAME_MS as u64);

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // drain all pending input events (non-blocking)
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                match kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        key_frame.insert(code, frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Esc => {
                                return Ok(game.result());
                            }
                            // steering is edge-triggered; the core
                            // consumes the flag on the lane step
                            KeyCode::Left if kind == KeyEventKind::Press => {
                                game.controls.steer_left = true;
                            }
                            KeyCode::Right if kind == KeyEventKind::Press => {
                                game.controls.steer_right = true;
                            }
                            _ => {}
                        }
                    }
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                }
            }
        }

        game.controls.accelerate = is_held(&key_frame, KeyCode::Up, frame);
        game.controls.brake = is_held(&key_frame, KeyCode::Down, frame);
        game.controls.handbrake = is_held(&key_frame, KeyCode::Char('b'), frame);

        game.update(FRAME_MS);
        render_hud(out, &game)?;

        if (game.is_finished() && game.speed <= 0.0) || game.frames >= max_frames {
            // leave the result on screen until the player quits
            queue!(out, cursor::MoveTo(0, 15))?;
            write!(out, "Race finished! Press q to exit.")?;
            out.flush()?;
            loop {
                if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                    if kind == KeyEventKind::Press
                        && matches!(code, KeyCode::Char('q') | KeyCode::Esc)
                    {
                        return Ok(game.result());
                    }
                }
            }
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_duration {
            std::thread::sleep(frame_duration - elapsed);
        }
    }
}

fn render_hud<W: Write>(out: &mut W, game: &Game) -> anyhow::Result<()> {
    let snapshot = game.snapshot(None);

    queue!(
        out,
        cursor::MoveTo(0, 0),
        terminal::Clear(terminal::ClearType::All)
    )?;
    write!(
        out,
        "ROAD RACER   [Up] gas  [Down] brake  [Left/Right] lane  [b] handbrake  [q] quit"
    )?;
    queue!(out, cursor::MoveTo(0, 2))?;
    if let Some(countdown) = snapshot.countdown_value {
        write!(out, "Get ready... {}", countdown)?;
    } else {
        write!(
            out,
            "{:7.1} m / {:.0} m   speed {:.3}   lane {}   mode {}{}",
            snapshot.total_distance,
            snapshot.race_distance,
            snapshot.speed,
            game.lane,
            snapshot.mode,
            if snapshot.protection_active {
                "   [protected]"
            } else {
                ""
            }
        )?;
    }

    queue!(out, cursor::MoveTo(0, 4))?;
    match &snapshot.obstacle {
        Some(obstacle) => write!(
            out,
            "Obstacle: {:9} lane {}  z={:7.1}",
            obstacle.kind.name(),
            // lanes are rendered left-to-right as the player sees them
            match obstacle.position.x {
                x if x < -0.5 => 0,
                x if x > 0.5 => 2,
                _ => 1,
            },
            obstacle.position.z
        )?,
        None => write!(out, "Obstacle: none")?,
    }

    // crude road preview: one row per 10 m ahead, indented by the bend
    queue!(out, cursor::MoveTo(0, 6))?;
    write!(out, "Road ahead:")?;
    for row in 0..5u16 {
        let ahead = game.total_distance + f64::from(row + 1) * 10.0;
        let bend = game.curves.road_offset_at(ahead);
        let indent = (20.0 + bend).round().max(0.0) as usize;
        queue!(out, cursor::MoveTo(0, 7 + (4 - row)))?;
        write!(out, "{:indent$}|  |", "", indent = indent)?;
    }

    queue!(out, cursor::MoveTo(0, 13))?;
    write!(
        out,
        "Car: x={:5.2} y={:5.2} z={:5.2}{}",
        snapshot.car.position.x,
        snapshot.car.position.y,
        snapshot.car.position.z,
        if snapshot.car.burnt { "   [burnt]" } else { "" }
    )?;

    out.flush()?;
    Ok(())
}
