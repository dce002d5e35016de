//! Axis-aligned trigger volumes that notice the player walking in.
//!
//! Only the player is tested, so ghosts never activate anything.

use bevy::prelude::*;

use crate::player::{Player, PlayerBody, ResetProtocol};

/// Sent on the frame the player starts overlapping a trigger.
#[derive(Event, Debug, Clone, Copy)]
pub struct TriggerEntered {
    pub trigger: Entity,
}

/// Box-shaped trigger attached to an interactable.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct TriggerVolume {
    pub half_extents: Vec3,
    /// Box center relative to the entity's translation
    pub offset: Vec3,
    occupied: bool,
}

impl TriggerVolume {
    pub fn new(half_extents: Vec3) -> Self {
        Self {
            half_extents,
            offset: Vec3::ZERO,
            occupied: false,
        }
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Whether a box at `center` with `half_extents` overlaps this trigger placed at `origin`.
    pub fn overlaps(&self, origin: Vec3, center: Vec3, half_extents: Vec3) -> bool {
        let delta = (origin + self.offset - center).abs();
        let reach = self.half_extents + half_extents;
        delta.x < reach.x && delta.y < reach.y && delta.z < reach.z
    }

    /// Record the current overlap; returns `true` only on entry.
    pub fn update(&mut self, overlapping: bool) -> bool {
        let entered = overlapping && !self.occupied;
        self.occupied = overlapping;
        entered
    }
}

/// Test every trigger against the player's bounding box.
pub fn detect_trigger_entries(
    player_query: Query<(&Transform, &PlayerBody, &ResetProtocol), With<Player>>,
    mut triggers: Query<(Entity, &Transform, &mut TriggerVolume), Without<Player>>,
    mut entered: EventWriter<TriggerEntered>,
) {
    let Ok((player_transform, body, protocol)) = player_query.get_single() else {
        return;
    };

    // Hidden players touch nothing
    if protocol.is_in_progress() {
        return;
    }

    let player_half = Vec3::new(body.radius, body.half_height(), body.radius);

    for (entity, transform, mut volume) in triggers.iter_mut() {
        let overlapping = volume.overlaps(transform.translation, player_transform.translation, player_half);
        if volume.update(overlapping) {
            entered.send(TriggerEntered { trigger: entity });
        }
    }
}
