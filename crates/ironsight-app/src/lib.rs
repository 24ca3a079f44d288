//! Headless runner for the IRONSIGHT combat simulation.

pub mod game_loop;
pub mod script;
pub mod state;
pub mod telemetry;
