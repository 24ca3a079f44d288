//! Game loop thread: runs the combat engine at 60 Hz.
//!
//! The engine is created inside the thread. Commands arrive over an `mpsc`
//! channel; the latest snapshot is published to shared state after each tick.

use std::io;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use ironsight_core::constants::TICK_RATE;
use ironsight_core::events::CombatEvent;
use ironsight_sim::engine::{CombatEngine, SimConfig};

use crate::state::{GameLoopCommand, SharedSnapshot};

/// Duration of one tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawn the game loop thread. Returns the command sender and the thread handle.
pub fn spawn_game_loop(
    config: SimConfig,
    latest_snapshot: SharedSnapshot,
) -> io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("ironsight-game-loop".into())
        .spawn(move || run_game_loop(config, cmd_rx, &latest_snapshot))?;

    Ok((cmd_tx, handle))
}

/// Runs until `Shutdown` or channel disconnect.
fn run_game_loop(
    config: SimConfig,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &SharedSnapshot,
) {
    let mut engine = CombatEngine::new(config);
    let mut next_tick_time = Instant::now();
    info!("game loop started");

    loop {
        // 1. Drain pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => engine.queue_command(cmd),
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    engine.teardown();
                    info!(ticks = engine.time().tick, "game loop stopped");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick (pause is handled by the engine)
        let snapshot = engine.tick();
        for event in &snapshot.events {
            log_event(event);
        }

        // 3. Publish
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 4. Sleep until the next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind; don't try to catch up.
            next_tick_time = now;
        }
    }
}

fn log_event(event: &CombatEvent) {
    match event {
        CombatEvent::HostileKilled { position } => info!(?position, "kill"),
        CombatEvent::DryFire { weapon } => info!(?weapon, "click"),
        other => debug!(event = ?other, "combat event"),
    }
}
