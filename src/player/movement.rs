//! Side-on player movement, the reset cycle, and the follow camera.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::*;
use super::input::PlayerInput;
use super::motor::RapierProbe;
use super::reset::{begin_reset, finish_reset, ResetBegin, ResetProtocol};
use crate::checkpoints::CheckpointRegistry;
use crate::core::{GhostCreatedEvent, JumpEvent, LandEvent, SmoothTransform, TimeLoopConfig};
use crate::ghosts::{CommandsGhostSpawner, GhostPool};

/// Marker for the side-on camera.
#[derive(Component)]
pub struct FollowCamera {
    /// Camera position relative to the player
    pub offset: Vec3,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 2.0, 18.0),
        }
    }
}

/// One frame of the player state machine.
///
/// Order: reset trigger, then (if resetting) the suspended reset, otherwise
/// the movement step handed to Rapier's character controller.
#[allow(clippy::too_many_arguments)]
pub fn player_tick(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<TimeLoopConfig>,
    input: Res<PlayerInput>,
    mut pool: Option<ResMut<GhostPool>>,
    mut registry: Option<ResMut<CheckpointRegistry>>,
    rapier_context: Query<&RapierContext>,
    mut player_query: Query<(
        Entity,
        &mut Transform,
        &mut MovementState,
        &mut ResetProtocol,
        &mut Visibility,
        &mut KinematicCharacterController,
        &PlayerBody,
        &PlayerSpawn,
    ), With<Player>>,
    mut jump_events: EventWriter<JumpEvent>,
    mut land_events: EventWriter<LandEvent>,
    mut ghost_events: EventWriter<GhostCreatedEvent>,
) {
    let Ok((
        player_entity,
        mut transform,
        mut movement,
        mut protocol,
        mut visibility,
        mut controller,
        body,
        spawn,
    )) = player_query.get_single_mut() else {
        return;
    };

    let dt = time.delta_secs();

    // Reset trigger edge
    if input.wants_reset() && !protocol.is_in_progress() {
        let mut spawner = CommandsGhostSpawner::new(&mut commands);
        let begun = begin_reset(
            &transform,
            &movement,
            &mut protocol,
            pool.as_deref_mut(),
            &mut spawner,
        );

        if let ResetBegin::Started { ghost, state } = begun {
            *visibility = Visibility::Hidden;
            controller.translation = None;

            if let Some(ghost) = ghost {
                ghost_events.send(GhostCreatedEvent { ghost, state });
            }
            debug!("Reset started, ghost left as {}", state.label());
        }
        return;
    }

    // Frozen until the reset completes
    if protocol.is_in_progress() {
        if protocol.tick(dt, config.movement.reset_delay) {
            // Teleport by writing the transform; no pending move may resolve
            // against the old position
            controller.translation = None;
            let destination = finish_reset(
                &mut transform,
                &mut movement,
                registry.as_deref_mut(),
                spawn,
            );
            *visibility = Visibility::Inherited;
            info!("Respawned at {:?}", destination.translation);
        }
        return;
    }

    let Ok(context) = rapier_context.get_single() else {
        return;
    };
    let probe = RapierProbe::new(context, player_entity);

    let outcome = movement.step(
        transform.translation,
        &input.motor_input(),
        &config.movement,
        body,
        &probe,
        dt,
    );

    if outcome.landed {
        land_events.send(LandEvent { player: player_entity });
    }
    if outcome.jumped {
        jump_events.send(JumpEvent { player: player_entity });
    }

    controller.translation = Some(outcome.displacement);
}

/// Keep the camera's smoothing target on the player.
pub fn follow_player(
    player_query: Query<&Transform, With<Player>>,
    mut camera_query: Query<(&FollowCamera, &mut SmoothTransform)>,
) {
    let Ok(player_transform) = player_query.get_single() else {
        return;
    };

    for (camera, mut smooth) in camera_query.iter_mut() {
        smooth.target_translation = Some(player_transform.translation + camera.offset);
    }
}

/// Spawn the side-on camera.
pub fn spawn_follow_camera(commands: &mut Commands, looking_at: Vec3) -> Entity {
    let camera = FollowCamera::default();
    let position = looking_at + camera.offset;

    commands
        .spawn((
            Camera3d::default(),
            Transform::from_translation(position).looking_to(Vec3::NEG_Z, Vec3::Y),
            SmoothTransform::new(6.0),
            camera,
        ))
        .id()
}

/// Spawn the player entity at `spawn`.
pub fn spawn_player(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    spawn: Transform,
    config: &MovementConfig,
) -> Entity {
    let body = config.body();
    let cylinder_half = body.half_height() - body.radius;

    let player = commands
        .spawn((
            Player,
            Name::new("Player"),
            MovementState::default(),
            ResetProtocol::default(),
            body,
            PlayerSpawn(spawn),
            spawn,
            Visibility::default(),
            // Rapier physics components
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(cylinder_half, body.radius),
            CollisionGroups::new(
                Group::from_bits_truncate(PLAYER_LAYER),
                Group::from_bits_truncate(config.ground_mask),
            ),
            KinematicCharacterController {
                offset: CharacterLength::Absolute(0.01),
                // Vertical motion is integrated by the movement state machine
                snap_to_ground: None,
                autostep: None,
                filter_groups: Some(CollisionGroups::new(
                    Group::from_bits_truncate(PLAYER_LAYER),
                    Group::from_bits_truncate(config.ground_mask),
                )),
                ..default()
            },
        ))
        .id();

    commands.entity(player).with_children(|parent| {
        parent.spawn((
            Mesh3d(meshes.add(Capsule3d::new(body.radius, cylinder_half * 2.0))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.95, 0.45, 0.3),
                ..default()
            })),
            Transform::default(),
        ));
    });

    player
}
