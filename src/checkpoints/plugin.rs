//! Checkpoint plugin - activation, highlighting, and the registry resource.

use bevy::prelude::*;

use super::registry::{CheckpointRegistry, RespawnPoint};
use crate::core::{CheckpointActivatedEvent, LoopSet};
use crate::world::TriggerEntered;

/// A checkpoint the player can activate by walking into it.
#[derive(Component, Debug, Clone, Copy)]
pub struct Checkpoint {
    /// Where the player reappears, relative to the checkpoint
    pub respawn_offset: Vec3,
}

impl Default for Checkpoint {
    fn default() -> Self {
        Self {
            respawn_offset: Vec3::Y,
        }
    }
}

/// Materials swapped onto checkpoint meshes by the highlight sync.
#[derive(Resource, Debug, Clone)]
pub struct CheckpointMaterials {
    pub highlight: Handle<StandardMaterial>,
    pub default: Handle<StandardMaterial>,
}

/// Checkpoint plugin - registers checkpoints and keeps highlights in sync.
pub struct CheckpointPlugin;

impl Plugin for CheckpointPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CheckpointRegistry>()
            .add_systems(PreStartup, setup_checkpoint_materials)
            .add_systems(Update, activate_checkpoints.in_set(LoopSet::Triggers))
            .add_systems(
                Update,
                sync_checkpoint_highlight
                    .in_set(LoopSet::Presentation)
                    .run_if(resource_exists_and_changed::<CheckpointRegistry>),
            );
    }
}

fn setup_checkpoint_materials(mut commands: Commands, mut materials: ResMut<Assets<StandardMaterial>>) {
    commands.insert_resource(CheckpointMaterials {
        highlight: materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 0.85, 0.3),
            emissive: LinearRgba::rgb(2.0, 1.5, 0.4),
            ..default()
        }),
        default: materials.add(StandardMaterial {
            base_color: Color::srgb(0.35, 0.35, 0.4),
            ..default()
        }),
    });
}

/// Register checkpoints the player has just walked into.
fn activate_checkpoints(
    mut triggers: EventReader<TriggerEntered>,
    checkpoints: Query<(&Checkpoint, &Transform)>,
    registry: Option<ResMut<CheckpointRegistry>>,
    mut activated: EventWriter<CheckpointActivatedEvent>,
) {
    let Some(mut registry) = registry else {
        return;
    };

    for trigger in triggers.read() {
        let Ok((checkpoint, transform)) = checkpoints.get(trigger.trigger) else {
            continue;
        };

        let point = RespawnPoint {
            entity: trigger.trigger,
            transform: Transform::from_translation(transform.translation + checkpoint.respawn_offset)
                .with_rotation(transform.rotation),
        };

        if registry.register_checkpoint(point) {
            info!("Checkpoint {:?} activated ({} registered)", trigger.trigger, registry.len());
            activated.send(CheckpointActivatedEvent {
                checkpoint: trigger.trigger,
            });
        }
    }
}

/// Mark the checkpoint under the registry cursor and restore all others.
fn sync_checkpoint_highlight(
    registry: Res<CheckpointRegistry>,
    materials: Option<Res<CheckpointMaterials>>,
    mut checkpoints: Query<(Entity, &mut MeshMaterial3d<StandardMaterial>), With<Checkpoint>>,
) {
    let Some(materials) = materials else {
        return;
    };

    let highlighted = registry.highlighted();
    for (entity, mut material) in checkpoints.iter_mut() {
        let wanted = if highlighted == Some(entity) {
            &materials.highlight
        } else {
            &materials.default
        };
        if material.0 != *wanted {
            material.0 = wanted.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{MovementConfig, Player, ResetProtocol};
    use crate::world::{detect_trigger_entries, TriggerVolume};

    #[derive(Resource, Default)]
    struct Activations(Vec<Entity>);

    fn record_activations(mut events: EventReader<CheckpointActivatedEvent>, mut seen: ResMut<Activations>) {
        seen.0.extend(events.read().map(|event| event.checkpoint));
    }

    fn create_test_app() -> App {
        let mut app = App::new();

        app.add_plugins(MinimalPlugins);
        app.insert_resource(CheckpointRegistry::with_start_point(RespawnPoint {
            entity: Entity::PLACEHOLDER,
            transform: Transform::from_xyz(0.0, 1.0, 0.0),
        }));
        app.init_resource::<Activations>();
        app.add_event::<TriggerEntered>();
        app.add_event::<CheckpointActivatedEvent>();
        app.add_systems(
            Update,
            (detect_trigger_entries, activate_checkpoints, record_activations).chain(),
        );

        app
    }

    fn spawn_test_player(app: &mut App, position: Vec3) -> Entity {
        app.world_mut()
            .spawn((
                Player,
                MovementConfig::default().body(),
                ResetProtocol::default(),
                Transform::from_translation(position),
            ))
            .id()
    }

    fn spawn_checkpoint(app: &mut App, x: f32) -> Entity {
        app.world_mut()
            .spawn((
                Checkpoint {
                    respawn_offset: Vec3::Y,
                },
                Transform::from_xyz(x, 0.0, 0.0),
                TriggerVolume::new(Vec3::splat(0.5)),
            ))
            .id()
    }

    fn move_player(app: &mut App, player: Entity, x: f32) {
        app.world_mut().get_mut::<Transform>(player).unwrap().translation.x = x;
    }

    #[test]
    fn entering_checkpoint_registers_it_once() {
        let mut app = create_test_app();
        let checkpoint = spawn_checkpoint(&mut app, 10.0);
        let player = spawn_test_player(&mut app, Vec3::new(0.0, 1.0, 0.0));

        app.update();
        assert_eq!(app.world().resource::<CheckpointRegistry>().len(), 1);

        move_player(&mut app, player, 10.0);
        app.update();
        app.update();

        let registry = app.world().resource::<CheckpointRegistry>();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.highlighted(), Some(checkpoint));
        assert_eq!(app.world().resource::<Activations>().0, vec![checkpoint]);

        // Leave and come back: already registered, no second activation
        move_player(&mut app, player, 0.0);
        app.update();
        move_player(&mut app, player, 10.0);
        app.update();

        assert_eq!(app.world().resource::<CheckpointRegistry>().len(), 2);
        assert_eq!(app.world().resource::<Activations>().0, vec![checkpoint]);
    }

    #[test]
    fn respawn_pose_includes_offset() {
        let mut app = create_test_app();
        spawn_checkpoint(&mut app, 4.0);
        spawn_test_player(&mut app, Vec3::new(4.0, 1.0, 0.0));

        app.update();

        let mut registry = app.world_mut().resource_mut::<CheckpointRegistry>();
        let respawn = registry.get_next_respawn_point().unwrap();
        assert_eq!(respawn.translation, Vec3::new(4.0, 1.0, 0.0));
    }

    #[test]
    fn hidden_player_activates_nothing() {
        let mut app = create_test_app();
        spawn_checkpoint(&mut app, 4.0);
        let player = spawn_test_player(&mut app, Vec3::new(4.0, 1.0, 0.0));
        *app.world_mut().get_mut::<ResetProtocol>(player).unwrap() = ResetProtocol::Hidden { elapsed: 0.0 };

        app.update();

        assert_eq!(app.world().resource::<CheckpointRegistry>().len(), 1);
        assert!(app.world().resource::<Activations>().0.is_empty());
    }
}
