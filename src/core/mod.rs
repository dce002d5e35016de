//! Core game module - states, events, configuration, and fundamental systems.
//!
//! This module provides the foundation that all other game systems build upon.

mod config;
mod error;
mod events;
mod plugin;
mod states;
mod stats;
mod tween;

pub use config::*;
pub use error::ConfigError;
pub use events::*;
pub use plugin::{CorePlugin, LoopSet};
pub use states::*;
pub use stats::{tally_stats, GameStats};
pub use tween::*;
