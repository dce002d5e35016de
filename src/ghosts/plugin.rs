//! Ghost plugin - pool resource and ghost visuals.

use bevy::prelude::*;

use super::pool::{GhostPool, GhostTemplate};
use crate::core::TimeLoopConfig;

/// Ghost plugin - owns the ghost pool and builds the ghost template.
pub struct GhostPlugin;

impl Plugin for GhostPlugin {
    fn build(&self, app: &mut App) {
        let settings = app
            .world()
            .get_resource::<TimeLoopConfig>()
            .map(|config| config.ghosts.clone())
            .unwrap_or_default();

        app.insert_resource(GhostPool::new(settings))
            .add_systems(PreStartup, setup_ghost_template);
    }
}

/// Build the translucent mesh every ghost is instantiated from.
fn setup_ghost_template(
    config: Res<TimeLoopConfig>,
    mut pool: ResMut<GhostPool>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let movement = &config.movement;
    let mesh = meshes.add(Capsule3d::new(
        movement.body_radius,
        movement.body_height - 2.0 * movement.body_radius,
    ));
    let material = materials.add(StandardMaterial {
        base_color: Color::srgba(0.55, 0.8, 1.0, config.ghosts.ghost_alpha),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    pool.set_template(GhostTemplate { mesh, material });
    info!(
        "Ghost pool ready (max {}, infinite: {})",
        pool.settings().max_ghosts,
        pool.settings().infinite_ghosts
    );
}
