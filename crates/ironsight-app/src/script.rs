//! Scripted demo session: what a player would send over a short run.

use std::time::Duration;

use glam::Vec3;

use ironsight_core::commands::PlayerCommand;
use ironsight_core::constants::VIEWER_START;

/// A command sent `delay` after the previous one.
#[derive(Debug, Clone)]
pub struct ScriptStep {
    pub delay: Duration,
    pub command: PlayerCommand,
}

impl ScriptStep {
    fn after(ms: u64, command: PlayerCommand) -> Self {
        Self {
            delay: Duration::from_millis(ms),
            command,
        }
    }
}

/// Load the level, sweep single shots across the room, switch to the
/// automatic and hold the trigger while turning, then tear down.
pub fn demo_session() -> Vec<ScriptStep> {
    let eye = Vec3::from_array(VIEWER_START);
    let mut steps = vec![
        ScriptStep::after(0, PlayerCommand::LoadLevel),
        ScriptStep::after(0, PlayerCommand::SetViewer { position: eye }),
    ];

    for i in 0..8 {
        let yaw = -0.6 + i as f32 * 0.15;
        steps.push(ScriptStep::after(
            300,
            PlayerCommand::Fire {
                origin: eye,
                direction: Vec3::new(yaw.sin(), -0.05, yaw.cos()),
            },
        ));
    }

    steps.push(ScriptStep::after(200, PlayerCommand::SwitchWeapon));
    for i in 0..60 {
        let yaw = (i as f32 * 0.1).sin() * 0.8;
        steps.push(ScriptStep::after(
            50,
            PlayerCommand::Fire {
                origin: eye,
                direction: Vec3::new(yaw.sin(), 0.0, yaw.cos()),
            },
        ));
    }

    steps.push(ScriptStep::after(500, PlayerCommand::Pause));
    steps.push(ScriptStep::after(300, PlayerCommand::Resume));
    steps.push(ScriptStep::after(1500, PlayerCommand::Teardown));
    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_loads_first_and_tears_down_last() {
        let steps = demo_session();
        assert!(matches!(steps[0].command, PlayerCommand::LoadLevel));
        assert!(matches!(
            steps.last().map(|s| &s.command),
            Some(PlayerCommand::Teardown)
        ));
    }

    #[test]
    fn test_session_fire_directions_are_valid() {
        for step in demo_session() {
            if let PlayerCommand::Fire { direction, .. } = step.command {
                assert!(direction.length() > 0.5);
            }
        }
    }
}
