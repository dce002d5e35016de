//! Player module - movement state machine, reset protocol, and camera.

mod components;
mod input;
mod motor;
mod movement;
mod plugin;
mod reset;

pub use components::*;
pub use input::{axis, KeyBindings, PlayerInput};
pub use motor::{CollisionProbe, MotorInput, RapierProbe, RayHit, StepOutcome};
pub use movement::{spawn_follow_camera, spawn_player, FollowCamera};
pub use plugin::PlayerPlugin;
pub use reset::{begin_reset, finish_reset, reset_to_start, ResetBegin, ResetProtocol};
