use std::error::Error;

use tracing::info;

use ironsight_app::game_loop::spawn_game_loop;
use ironsight_app::script::demo_session;
use ironsight_app::state::{shared_snapshot, GameLoopCommand, SharedSnapshot};
use ironsight_app::telemetry;
use ironsight_core::commands::PlayerCommand;
use ironsight_sim::engine::SimConfig;

/// Usage: `ironsight-app [config.json] [seed]`
///
/// The config file holds a `SimConfig` (`seed` plus `combat` tuning); a seed
/// given on the command line overrides the file's.
fn main() -> Result<(), Box<dyn Error>> {
    telemetry::init();

    let mut args = std::env::args().skip(1);
    let mut config = match args.next() {
        Some(path) => {
            info!(%path, "loading config");
            SimConfig::from_json_str(&std::fs::read_to_string(&path)?)?
        }
        None => SimConfig::default(),
    };
    if let Some(seed) = args.next() {
        config.seed = seed.parse()?;
    }
    info!(seed = config.seed, "starting session");

    let latest = shared_snapshot();
    let (tx, handle) = spawn_game_loop(config, latest.clone())?;

    for step in demo_session() {
        std::thread::sleep(step.delay);
        if matches!(step.command, PlayerCommand::Teardown) {
            log_summary(&latest);
        }
        tx.send(GameLoopCommand::PlayerCommand(step.command))?;
    }

    tx.send(GameLoopCommand::Shutdown)?;
    if handle.join().is_err() {
        return Err("game loop thread panicked".into());
    }
    Ok(())
}

fn log_summary(latest: &SharedSnapshot) {
    let Ok(guard) = latest.lock() else { return };
    if let Some(snapshot) = guard.as_ref() {
        info!(
            ticks = snapshot.time.tick,
            shots = snapshot.score.shots_fired,
            hits = snapshot.score.hostile_hits,
            kills = snapshot.score.kills,
            decals = snapshot.decals,
            ammo = snapshot.weapon.ammo,
            "session summary"
        );
    }
}
