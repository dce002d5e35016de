//! Environmental actuators: jump pads, hazards, and exits.

use bevy::prelude::*;

use super::layout::ExitMode;
use super::triggers::TriggerEntered;
use crate::core::{GameState, PlayerDiedEvent};
use crate::ghosts::GhostPool;
use crate::player::{MovementState, Player};

/// Launches the player along the pad's up axis.
#[derive(Component, Debug, Clone, Copy)]
pub struct JumpPad {
    pub active: bool,
    pub launch_force: f32,
}

impl JumpPad {
    /// Launch velocity for a pad oriented by `transform`, if active.
    pub fn launch_velocity(&self, transform: &Transform) -> Option<Vec3> {
        self.active.then(|| *transform.up() * self.launch_force)
    }
}

/// Kills the player on contact.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Hazard;

/// End of a level.
#[derive(Component, Debug, Clone, Copy)]
pub struct Exit {
    pub mode: ExitMode,
}

/// Level load scheduled by an exit.
#[derive(Resource, Debug, Default)]
pub struct PendingLevelLoad {
    pub timer: Option<Timer>,
}

/// Apply jump pad impulses on entry.
pub fn apply_jump_pads(
    mut triggers: EventReader<TriggerEntered>,
    pads: Query<(&JumpPad, &Transform)>,
    mut players: Query<&mut MovementState, With<Player>>,
) {
    for trigger in triggers.read() {
        let Ok((pad, transform)) = pads.get(trigger.trigger) else {
            continue;
        };
        let Some(launch) = pad.launch_velocity(transform) else {
            continue;
        };

        for mut movement in players.iter_mut() {
            movement.launch(launch);
        }
    }
}

/// Touching a hazard ends the run.
pub fn apply_hazards(
    mut triggers: EventReader<TriggerEntered>,
    hazards: Query<(), With<Hazard>>,
    players: Query<Entity, With<Player>>,
    mut died: EventWriter<PlayerDiedEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let hit = triggers.read().any(|trigger| hazards.contains(trigger.trigger));
    if !hit {
        return;
    }

    if let Ok(player) = players.get_single() {
        warn!("Player died");
        died.send(PlayerDiedEvent { player });
        next_state.set(GameState::GameOver);
    }
}

/// React to the player reaching an exit.
pub fn apply_exits(
    mut triggers: EventReader<TriggerEntered>,
    exits: Query<&Exit>,
    mut pool: Option<ResMut<GhostPool>>,
    mut pending: ResMut<PendingLevelLoad>,
) {
    for trigger in triggers.read() {
        let Ok(exit) = exits.get(trigger.trigger) else {
            continue;
        };

        match exit.mode {
            ExitMode::LoadNextLevel { delay } => {
                if pending.timer.is_none() {
                    info!("Exit reached, loading next level in {}s", delay);
                    pending.timer = Some(Timer::from_seconds(delay, TimerMode::Once));
                }
            }
            ExitMode::SetMaxGhosts(max_ghosts) => match pool.as_deref_mut() {
                Some(pool) => {
                    pool.set_max_ghosts(max_ghosts);
                    info!("Exit set max ghosts to {}", pool.settings().max_ghosts);
                }
                None => warn!("Exit wants to set max ghosts but no ghost pool exists"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_pad_does_nothing() {
        let mut pad = JumpPad {
            active: false,
            launch_force: 10.0,
        };
        assert_eq!(pad.launch_velocity(&Transform::default()), None);

        pad.active = true;
        let launch = pad.launch_velocity(&Transform::default()).unwrap();
        assert!((launch - Vec3::Y * 10.0).length() < 1e-5);
    }

    #[test]
    fn tilted_pad_launches_along_its_up_axis() {
        let pad = JumpPad {
            active: true,
            launch_force: 2.0,
        };
        let transform = Transform::from_rotation(Quat::from_rotation_z(-std::f32::consts::FRAC_PI_2));
        let launch = pad.launch_velocity(&transform).unwrap();
        assert!((launch - Vec3::X * 2.0).length() < 1e-5);
    }
}
