//! Transform smoothing used by the follow camera.

use bevy::prelude::*;

/// Component for smooth translation toward a target that may move every frame.
#[derive(Component, Debug, Clone)]
pub struct SmoothTransform {
    /// Target translation (None = don't animate)
    pub target_translation: Option<Vec3>,
    /// Interpolation speed multiplier (higher = faster)
    pub translation_speed: f32,
}

impl Default for SmoothTransform {
    fn default() -> Self {
        Self {
            target_translation: None,
            translation_speed: 6.0,
        }
    }
}

impl SmoothTransform {
    pub fn new(translation_speed: f32) -> Self {
        Self {
            translation_speed,
            ..default()
        }
    }
}

/// Move `current` toward `target` by a frame-rate scaled fraction, never overshooting.
pub fn approach(current: Vec3, target: Vec3, speed: f32, dt: f32) -> Vec3 {
    let t = (speed * dt).clamp(0.0, 1.0);
    current.lerp(target, t)
}

/// System that interpolates transforms toward their targets.
pub fn update_smooth_transforms(
    time: Res<Time>,
    mut query: Query<(&mut Transform, &SmoothTransform)>,
) {
    let dt = time.delta_secs();

    for (mut transform, smooth) in query.iter_mut() {
        if let Some(target) = smooth.target_translation {
            transform.translation = approach(transform.translation, target, smooth.translation_speed, dt);
        }
    }
}
