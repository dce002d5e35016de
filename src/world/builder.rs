//! Level construction from a `LevelLayout`.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::interactables::{Exit, Hazard, JumpPad};
use super::layout::LevelLayout;
use super::triggers::TriggerVolume;
use crate::checkpoints::{Checkpoint, CheckpointMaterials, RespawnPoint};
use crate::player::{spawn_player, MovementConfig, WORLD_LAYER};

/// Marker for every entity that belongs to the current level.
#[derive(Component)]
pub struct LevelEntity;

/// What a freshly built level hands back to the loader.
#[derive(Debug, Clone, Copy)]
pub struct BuiltLevel {
    /// The permanent first entry of the checkpoint registry
    pub start: RespawnPoint,
}

const PAD_RADIUS: f32 = 0.75;
const PAD_HEIGHT: f32 = 0.2;

/// Spawn all geometry, interactables and the player for `layout`.
pub fn build_level(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    layout: &LevelLayout,
    movement: &MovementConfig,
    checkpoint_materials: &CheckpointMaterials,
) -> BuiltLevel {
    let depth = layout.depth;
    let world_groups = CollisionGroups::new(Group::from_bits_truncate(WORLD_LAYER), Group::ALL);

    let stone = materials.add(StandardMaterial {
        base_color: Color::srgb(0.3, 0.32, 0.36),
        perceptual_roughness: 0.9,
        ..default()
    });
    let lava = materials.add(StandardMaterial {
        base_color: Color::srgb(1.0, 0.3, 0.05),
        emissive: LinearRgba::rgb(4.0, 1.0, 0.1),
        ..default()
    });
    let pad_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.3, 0.9, 0.5),
        ..default()
    });
    let exit_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.9, 0.9, 1.0),
        emissive: LinearRgba::rgb(1.0, 1.0, 1.5),
        ..default()
    });
    let pad_mesh = meshes.add(Cylinder::new(PAD_RADIUS, PAD_HEIGHT));

    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(5.0, 20.0, 15.0).looking_at(Vec3::ZERO, Vec3::Y),
        LevelEntity,
    ));

    for platform in &layout.platforms {
        let (w, h) = platform.size;
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(w, h, depth))),
            MeshMaterial3d(stone.clone()),
            Transform::from_xyz(platform.center.0, platform.center.1, 0.0),
            Collider::cuboid(w / 2.0, h / 2.0, depth / 2.0),
            world_groups,
            LevelEntity,
        ));
    }

    // Respawn pose puts the body center just above the pad
    let stand_offset = Vec3::Y * (movement.body_height / 2.0 + PAD_HEIGHT);
    let trigger_half = Vec3::new(PAD_RADIUS, movement.body_height / 2.0, depth / 2.0);

    for &(x, y) in &layout.checkpoints {
        commands.spawn((
            Checkpoint {
                respawn_offset: stand_offset,
            },
            Name::new(format!("Checkpoint ({}, {})", x, y)),
            Mesh3d(pad_mesh.clone()),
            MeshMaterial3d(checkpoint_materials.default.clone()),
            Transform::from_xyz(x, y + PAD_HEIGHT / 2.0, 0.0),
            TriggerVolume::new(trigger_half).with_offset(Vec3::Y * trigger_half.y),
            LevelEntity,
        ));
    }

    for pad in &layout.jump_pads {
        commands.spawn((
            JumpPad {
                active: pad.active,
                launch_force: pad.launch_force,
            },
            Mesh3d(pad_mesh.clone()),
            MeshMaterial3d(pad_material.clone()),
            Transform::from_xyz(pad.position.0, pad.position.1 + PAD_HEIGHT / 2.0, 0.0),
            TriggerVolume::new(Vec3::new(PAD_RADIUS, 0.3, depth / 2.0)).with_offset(Vec3::Y * 0.3),
            LevelEntity,
        ));
    }

    for hazard in &layout.hazards {
        let (w, h) = hazard.size;
        commands.spawn((
            Hazard,
            Mesh3d(meshes.add(Cuboid::new(w, h, depth))),
            MeshMaterial3d(lava.clone()),
            Transform::from_xyz(hazard.center.0, hazard.center.1, 0.0),
            TriggerVolume::new(Vec3::new(w / 2.0, h / 2.0, depth / 2.0)),
            LevelEntity,
        ));
    }

    for exit in &layout.exits {
        commands.spawn((
            Exit { mode: exit.mode },
            Mesh3d(meshes.add(Cuboid::new(1.0, 2.5, 0.2))),
            MeshMaterial3d(exit_material.clone()),
            Transform::from_xyz(exit.position.0, exit.position.1 + 1.25, -depth / 2.0 + 0.1),
            TriggerVolume::new(Vec3::new(0.5, 1.25, depth / 2.0)).with_offset(Vec3::Z * (depth / 2.0 - 0.1)),
            LevelEntity,
        ));
    }

    let spawn = layout.player_start_transform();

    // The start marker is a checkpoint the registry begins with
    let start_marker = commands
        .spawn((
            Checkpoint {
                respawn_offset: stand_offset,
            },
            Name::new("Start"),
            Mesh3d(pad_mesh),
            MeshMaterial3d(checkpoint_materials.default.clone()),
            Transform::from_translation(spawn.translation - Vec3::Y * (movement.body_height / 2.0 - PAD_HEIGHT / 2.0)),
            LevelEntity,
        ))
        .id();

    let player = spawn_player(commands, meshes, materials, spawn, movement);
    commands.entity(player).insert(LevelEntity);

    info!(
        "Built level '{}': {} platforms, {} checkpoints",
        layout.name,
        layout.platforms.len(),
        layout.checkpoints.len()
    );

    BuiltLevel {
        start: RespawnPoint {
            entity: start_marker,
            transform: spawn,
        },
    }
}
