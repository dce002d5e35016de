//! Per-frame movement integration.
//!
//! `MovementState::step` is the physics half of the player state machine. It
//! only reads the world through a [`CollisionProbe`], so the same code runs
//! against Rapier in game and against scripted probes in tests.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::{MovementConfig, MovementState, PlayerBody};

/// Input sampled for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotorInput {
    /// Signed axis in [-1, 1]
    pub horizontal: f32,
    pub crouch: bool,
    /// Jump pressed this frame (edge, not level)
    pub jump_pressed: bool,
}

/// A ray hit against level geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub distance: f32,
}

/// Ray-cast primitive used for ground and ceiling detection.
pub trait CollisionProbe {
    fn cast_ray(&self, origin: Vec3, direction: Dir3, max_distance: f32, mask: u32) -> Option<RayHit>;
}

/// What a step produced, for the caller to apply and announce.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepOutcome {
    /// Translation to hand to the collision-resolving mover
    pub displacement: Vec3,
    pub jumped: bool,
    pub landed: bool,
}

impl MovementState {
    /// Advance one frame of movement from the body center at `position`.
    pub fn step(
        &mut self,
        position: Vec3,
        input: &MotorInput,
        config: &MovementConfig,
        body: &PlayerBody,
        probe: &impl CollisionProbe,
        dt: f32,
    ) -> StepOutcome {
        self.horizontal_input = input.horizontal.clamp(-1.0, 1.0);
        self.crouching = input.crouch;

        if input.jump_pressed {
            self.jump_buffer = config.jump_buffer_time;
        } else {
            self.jump_buffer -= dt;
        }

        let landed = self.check_ground(position, config, body, probe, dt);
        self.check_ceiling(position, config, body, probe);

        self.velocity.x = self.horizontal_input * config.move_speed;
        if self.crouching {
            self.velocity.x *= 0.5;
        }
        // Depth axis is locked in 2.5D
        self.velocity.z = 0.0;

        let jumped = self.try_jump(config);

        if !self.grounded {
            self.velocity.y += config.gravity * dt;
        }

        StepOutcome {
            displacement: self.velocity * dt,
            jumped,
            landed,
        }
    }

    /// Ground ray, landing edge, coyote timer and grounded clamp.
    fn check_ground(
        &mut self,
        position: Vec3,
        config: &MovementConfig,
        body: &PlayerBody,
        probe: &impl CollisionProbe,
        dt: f32,
    ) -> bool {
        let distance = body.half_height() + config.ground_check_distance;
        let was_grounded = self.grounded;
        self.grounded = probe
            .cast_ray(position, Dir3::NEG_Y, distance, config.ground_mask)
            .is_some();

        if self.grounded {
            self.coyote_timer = config.coyote_time;
        } else {
            self.coyote_timer -= dt;
        }

        if self.grounded && self.velocity.y < 0.0 {
            self.velocity.y = config.grounded_velocity;
        }

        !was_grounded && self.grounded
    }

    /// Stop upward motion when the head touches something.
    fn check_ceiling(
        &mut self,
        position: Vec3,
        config: &MovementConfig,
        body: &PlayerBody,
        probe: &impl CollisionProbe,
    ) {
        let head = position + Vec3::Y * body.half_height();
        let hit = probe.cast_ray(head, Dir3::Y, config.ceiling_check_distance, config.ground_mask);

        if hit.is_some() && self.velocity.y > 0.0 {
            self.velocity.y = 0.0;
        }
    }

    /// Jump when a buffered press meets ground (or coyote) time.
    fn try_jump(&mut self, config: &MovementConfig) -> bool {
        if self.jump_buffer > 0.0 && self.coyote_timer > 0.0 {
            self.velocity.y = config.jump_velocity();
            self.jump_buffer = 0.0;
            self.coyote_timer = 0.0;
            return true;
        }
        false
    }
}

/// [`CollisionProbe`] over the Rapier query pipeline.
pub struct RapierProbe<'a> {
    context: &'a RapierContext,
    /// The player's own collider, which every ray starts inside
    exclude: Entity,
}

impl<'a> RapierProbe<'a> {
    pub fn new(context: &'a RapierContext, exclude: Entity) -> Self {
        Self { context, exclude }
    }
}

impl CollisionProbe for RapierProbe<'_> {
    fn cast_ray(&self, origin: Vec3, direction: Dir3, max_distance: f32, mask: u32) -> Option<RayHit> {
        let filter = QueryFilter::default()
            .exclude_collider(self.exclude)
            .exclude_sensors()
            .groups(CollisionGroups::new(Group::ALL, Group::from_bits_truncate(mask)));

        self.context
            .cast_ray(origin, *direction, max_distance, true, filter)
            .map(|(_, distance)| RayHit {
                point: origin + *direction * distance,
                distance,
            })
    }
}
