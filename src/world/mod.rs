//! World module - level layouts, trigger volumes, and interactables.

mod builder;
mod interactables;
mod layout;
mod plugin;
mod triggers;

pub use builder::{build_level, BuiltLevel, LevelEntity};
pub use interactables::{Exit, Hazard, JumpPad, PendingLevelLoad};
pub use layout::{ExitDef, ExitMode, HazardDef, JumpPadDef, LevelLayout, PlatformDef, LEVELS_DIR};
pub use plugin::{CurrentLevel, LoadLevelRequest, WorldPlugin};
pub use triggers::{detect_trigger_entries, TriggerEntered, TriggerVolume};
