//! Headless shooting range driver.
//!
//! Usage: `shooting_range [config.ron]`. Plays a scripted session at a
//! jittered frame rate and logs what happened. Run with `RUST_LOG=debug`
//! to see every shot.

use std::time::Duration;

use anyhow::Result;
use game::{GameEvent, RangeConfig, RangeSession};
use input::{InputEvent, MoveDirection};

/// Game time covered by the scripted run.
const SESSION_LENGTH: Duration = Duration::from_secs(20);

/// Frame deltas cycle through these, roughly 30 to 144 fps.
const FRAME_PATTERN_MS: [u64; 6] = [7, 16, 16, 33, 11, 16];

/// Inputs the script feeds at a given game time, in whole milliseconds.
fn scripted_inputs(at_ms: u64, previous_ms: u64) -> Vec<InputEvent> {
    let crossed = |mark: u64| previous_ms < mark && at_ms >= mark;
    let mut inputs = Vec::new();
    if crossed(500) {
        inputs.push(InputEvent::FireDown);
        inputs.push(InputEvent::FireUp);
    }
    if crossed(1_000) {
        inputs.push(InputEvent::SelectWeapon(1));
        inputs.push(InputEvent::FireDown);
    }
    if crossed(4_500) {
        inputs.push(InputEvent::FireUp);
        inputs.push(InputEvent::Reload);
    }
    if crossed(6_000) {
        inputs.push(InputEvent::Move {
            direction: MoveDirection::Left,
            pressed: true,
        });
        inputs.push(InputEvent::Jump);
    }
    if crossed(8_000) {
        inputs.push(InputEvent::Move {
            direction: MoveDirection::Left,
            pressed: false,
        });
        inputs.push(InputEvent::Move {
            direction: MoveDirection::Forward,
            pressed: true,
        });
        inputs.push(InputEvent::FireDown);
    }
    if crossed(10_000) {
        inputs.push(InputEvent::Move {
            direction: MoveDirection::Forward,
            pressed: false,
        });
        inputs.push(InputEvent::SelectWeapon(0));
    }
    // Sweep the view slowly so shots cross the enemies' paths
    if at_ms >= 10_000 && at_ms / 250 != previous_ms / 250 {
        let yaw = if (at_ms / 2_000) % 2 == 0 { 0.05 } else { -0.05 };
        inputs.push(InputEvent::Look { yaw, pitch: 0.0 });
    }
    if crossed(15_000) {
        inputs.push(InputEvent::FireUp);
        inputs.push(InputEvent::Reload);
    }
    inputs
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => RangeConfig::load_from(&path)?,
        None => RangeConfig::load(),
    };

    let mut session = RangeSession::new(config)?;
    let mut shots = 0usize;
    let mut wall_hits = 0usize;
    let mut decals = 0usize;
    let mut frame = 0usize;

    while session.now() < SESSION_LENGTH {
        let previous = session.now().as_millis() as u64;
        let dt = Duration::from_millis(FRAME_PATTERN_MS[frame % FRAME_PATTERN_MS.len()]);
        for input in scripted_inputs(previous + dt.as_millis() as u64, previous) {
            session.handle_input(input);
        }
        for event in session.tick(dt) {
            match event {
                GameEvent::ShotFired { .. } => shots += 1,
                GameEvent::WallHit { decal, .. } => {
                    wall_hits += 1;
                    decals += usize::from(decal);
                }
                _ => {}
            }
            log::debug!("[{:>6.3}s] {:?}", session.now().as_secs_f32(), event);
        }
        frame += 1;
    }

    let hud = session.hud();
    let snapshot = session.snapshot();
    log::info!(
        "Session over after {} frames ({:.1}s game time)",
        frame,
        session.now().as_secs_f32()
    );
    log::info!(
        "Shots: {}  enemy hits: {}  wall hits: {} ({} decals)",
        shots,
        session.hits(),
        wall_hits,
        decals
    );
    log::info!(
        "Holding {} with {}/{} rounds, {} enemies live, {} effects pending",
        hud.weapon.name(),
        hud.ammo,
        hud.max_ammo,
        snapshot.enemies.len(),
        session.effects().len()
    );
    Ok(())
}
