//! Bevy-backed ghost instantiation.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::pool::{GhostBlueprint, GhostSpawner};
use super::snapshot::GhostStateKind;

/// A frozen replica of a past player pose.
#[derive(Component, Debug, Clone, Copy)]
pub struct Ghost {
    /// Pose tag of the snapshot this ghost was built from
    pub state: GhostStateKind,
    /// Velocity at the moment of capture (diagnostics only, ghosts never move)
    pub captured_velocity: Vec3,
}

/// Marker for the child entity carrying a ghost's box collider.
#[derive(Component)]
pub struct GhostCollider;

/// Spawns ghosts through `Commands`.
///
/// The root, its collider child and its visual child all receive the ghost
/// collision groups before anything else can observe the entity.
pub struct CommandsGhostSpawner<'c, 'w, 's> {
    commands: &'c mut Commands<'w, 's>,
}

impl<'c, 'w, 's> CommandsGhostSpawner<'c, 'w, 's> {
    pub fn new(commands: &'c mut Commands<'w, 's>) -> Self {
        Self { commands }
    }
}

impl GhostSpawner for CommandsGhostSpawner<'_, '_, '_> {
    fn spawn_ghost(&mut self, blueprint: &GhostBlueprint) -> Entity {
        let state = blueprint.snapshot.state;
        let groups = blueprint.groups;
        let half = blueprint.volume.half_extents();

        // Crouching ghosts are squashed visually as well
        let visual_scale = if state == GhostStateKind::Crouching {
            Vec3::new(1.0, 0.5, 1.0)
        } else {
            Vec3::ONE
        };

        self.commands
            .spawn((
                Ghost {
                    state,
                    captured_velocity: blueprint.snapshot.velocity,
                },
                Name::new(format!("Ghost ({})", state.label())),
                Transform::from_translation(blueprint.position).with_rotation(blueprint.rotation),
                Visibility::default(),
                RigidBody::Fixed,
                groups,
            ))
            .with_children(|parent| {
                parent.spawn((
                    GhostCollider,
                    Collider::cuboid(half.x, half.y, half.z),
                    Transform::from_translation(blueprint.volume.center),
                    groups,
                ));
                parent.spawn((
                    Mesh3d(blueprint.template.mesh.clone()),
                    MeshMaterial3d(blueprint.template.material.clone()),
                    Transform::from_translation(blueprint.volume.center).with_scale(visual_scale),
                    groups,
                ));
            })
            .id()
    }

    fn despawn_ghost(&mut self, ghost: Entity) {
        if let Some(entity) = self.commands.get_entity(ghost) {
            entity.despawn_recursive();
        }
    }
}
