//! Core types and definitions for the IRONSIGHT combat simulation.
//!
//! This crate defines the vocabulary shared across the other crates:
//! components, commands, events, snapshots, constants, tuning config
//! and the error taxonomy. It has no dependency on any rendering or
//! runtime framework.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;

pub use error::CombatError;
